//! String escaping for the writer.
//!
//! Only `"`, `\` and the C0 controls U+0000..=U+001F are escaped. Every other
//! byte, including all of a multi-byte UTF-8 sequence, is copied as-is, so
//! U+2028, U+2029 and non-ASCII letters come out as raw UTF-8.

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EscapeAction {
    None,
    Quote,
    Backslash,
    Newline,
    CarriageReturn,
    Tab,
    Backspace,
    FormFeed,
    /// `\u00XX`
    Unicode,
}

#[rustfmt::skip]
static ESCAPE_LUT: [EscapeAction; 256] = {
    use EscapeAction::{Backslash, Backspace, CarriageReturn, FormFeed, Newline, Quote, Tab, Unicode};
    let mut lut = [EscapeAction::None; 256];
    let mut b = 0;
    while b < 0x20 {
        lut[b] = Unicode;
        b += 1;
    }
    lut[0x08] = Backspace;
    lut[0x09] = Tab;
    lut[0x0A] = Newline;
    lut[0x0C] = FormFeed;
    lut[0x0D] = CarriageReturn;
    lut[b'"' as usize] = Quote;
    lut[b'\\' as usize] = Backslash;
    lut
};

const HEX: &[u8; 16] = b"0123456789ABCDEF";

#[inline(always)]
fn needs_escape(b: u8) -> bool {
    ESCAPE_LUT[usize::from(b)] != EscapeAction::None
}

/// Appends `s` as a quoted JSON string literal.
pub(crate) fn write_quoted(buf: &mut Vec<u8>, s: &str) {
    let bytes = s.as_bytes();
    buf.reserve(bytes.len() + 2);
    buf.push(b'"');

    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if !needs_escape(b) {
            continue;
        }
        buf.extend_from_slice(&bytes[start..i]);
        start = i + 1;
        match ESCAPE_LUT[usize::from(b)] {
            EscapeAction::None => {}
            EscapeAction::Quote => buf.extend_from_slice(b"\\\""),
            EscapeAction::Backslash => buf.extend_from_slice(b"\\\\"),
            EscapeAction::Newline => buf.extend_from_slice(b"\\n"),
            EscapeAction::CarriageReturn => buf.extend_from_slice(b"\\r"),
            EscapeAction::Tab => buf.extend_from_slice(b"\\t"),
            EscapeAction::Backspace => buf.extend_from_slice(b"\\b"),
            EscapeAction::FormFeed => buf.extend_from_slice(b"\\f"),
            EscapeAction::Unicode => {
                buf.extend_from_slice(b"\\u00");
                buf.push(HEX[usize::from(b >> 4)]);
                buf.push(HEX[usize::from(b & 0x0F)]);
            }
        }
    }
    buf.extend_from_slice(&bytes[start..]);
    buf.push(b'"');
}
