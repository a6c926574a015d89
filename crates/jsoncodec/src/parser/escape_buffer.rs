//! Decoding of backslash escapes inside JSON strings.
//!
//! Escapes are decoded one input byte at a time:
//!
//! - [`EscapeState`] tracks where the string lexer is inside an escape.
//! - [`UnicodeEscapeBuffer`] accumulates the four hexadecimal digits of a
//!   `\uXXXX` escape into one UTF-16 code unit. An escape is never longer than
//!   four digits; a fifth digit is ordinary string content.
//! - [`SurrogateJoiner`] pairs a high surrogate code unit with the low
//!   surrogate that must follow it and applies the configured [`DecodeMode`] to
//!   code units that end up unpaired.
//!
//! # Errors
//!
//! - Feeding a non-hexadecimal character to [`UnicodeEscapeBuffer::feed`]
//!   returns [`SyntaxError::InvalidUnicodeEscapeChar`].
//! - In [`DecodeMode::StrictUnicode`] an unpaired surrogate returns
//!   [`SyntaxError::UnpairedSurrogate`].

use crate::parser::{error::SyntaxError, options::DecodeMode};

/// Position of the string lexer relative to a backslash escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum EscapeState {
    /// Copying ordinary string content.
    #[default]
    None,
    /// A `\` was consumed; the next byte selects the escape.
    AfterBackslash,
    /// Inside `\u`; the digits seen so far live in [`UnicodeEscapeBuffer`].
    UnicodeEscape,
}

#[derive(Debug)]
/// Accumulates exactly four hexadecimal digits into a UTF-16 code unit.
///
/// Unlike a `char`, the produced code unit may be a surrogate; pairing is the
/// job of [`SurrogateJoiner`].
pub(crate) struct UnicodeEscapeBuffer {
    acc: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self { acc: 0, len: 0 }
    }

    /// Clears any accumulated digits, returning the buffer to its initial
    /// state.
    pub fn reset(&mut self) {
        self.acc = 0;
        self.len = 0;
    }

    #[cfg(test)]
    pub fn len(&self) -> u8 {
        self.len
    }

    #[inline]
    fn hex_val(b: u8) -> Option<u16> {
        match b {
            b'0'..=b'9' => Some(u16::from(b - b'0')),
            b'a'..=b'f' => Some(u16::from(b - b'a') + 10),
            b'A'..=b'F' => Some(u16::from(b - b'A') + 10),
            _ => None,
        }
    }

    /// Feeds one byte of the escape.
    ///
    /// - Returns `Ok(None)` while fewer than four digits have been provided.
    /// - Returns `Ok(Some(unit))` on the fourth digit and resets.
    /// - Returns `Err` if `b` is not an ASCII hex digit.
    pub fn feed(&mut self, b: u8) -> Result<Option<u16>, SyntaxError> {
        let d = Self::hex_val(b).ok_or(SyntaxError::InvalidUnicodeEscapeChar(char::from(b)))?;

        debug_assert!(self.len < 4, "escape buffer holds at most four digits");
        self.acc = (self.acc << 4) | d;
        self.len += 1;

        if self.len < 4 {
            return Ok(None);
        }

        let unit = self.acc;
        self.reset();
        Ok(Some(unit))
    }
}

#[inline]
pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

#[inline]
pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Reassembles UTF-16 code units produced by `\u` escapes into scalar values.
#[derive(Debug)]
pub(crate) struct SurrogateJoiner {
    pending_high: Option<u16>,
    mode: DecodeMode,
}

impl SurrogateJoiner {
    pub fn new(mode: DecodeMode) -> Self {
        Self {
            pending_high: None,
            mode,
        }
    }

    /// Whether a high surrogate is waiting for its low half.
    pub fn is_pending(&self) -> bool {
        self.pending_high.is_some()
    }

    /// Pushes one decoded code unit, appending any completed character to
    /// `out`.
    pub fn push_unit(&mut self, unit: u16, out: &mut String) -> Result<(), SyntaxError> {
        if let Some(high) = self.pending_high.take() {
            if is_low_surrogate(unit) {
                let scalar =
                    0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                // Always a valid scalar: both halves were range checked.
                out.push(char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER));
                return Ok(());
            }
            self.lone(high, out)?;
        }

        if is_high_surrogate(unit) {
            self.pending_high = Some(unit);
            return Ok(());
        }

        match char::from_u32(u32::from(unit)) {
            Some(ch) => {
                out.push(ch);
                Ok(())
            }
            // Only a low surrogate without a preceding high half gets here.
            None => self.lone(unit, out),
        }
    }

    /// Settles a pending high surrogate when anything other than a `\u`
    /// escape follows it.
    pub fn flush(&mut self, out: &mut String) -> Result<(), SyntaxError> {
        match self.pending_high.take() {
            Some(high) => self.lone(high, out),
            None => Ok(()),
        }
    }

    fn lone(&self, unit: u16, out: &mut String) -> Result<(), SyntaxError> {
        match self.mode {
            DecodeMode::ReplaceInvalid => {
                out.push(char::REPLACEMENT_CHARACTER);
                Ok(())
            }
            DecodeMode::StrictUnicode => Err(SyntaxError::UnpairedSurrogate(unit)),
        }
    }
}
