//! JSON output.
//!
//! - [`ByteWriter`] owns the growable output buffer and knows how to emit
//!   escaped strings, integers (`itoa`) and shortest round-trip floats
//!   (`ryu`).
//! - [`ValueWriter`] borrows a [`ByteWriter`] and tracks container nesting so
//!   commas and colons land in the right places.
//! - [`ToJson`] lets typed values write themselves through a [`ValueWriter`].
//!
//! Output is compact: no whitespace between tokens.
//!
//! # Examples
//!
//! ```rust
//! use jsoncodec::{ByteWriter, ValueWriter};
//!
//! let mut out = ByteWriter::new();
//! let mut w = ValueWriter::new(&mut out);
//! w.begin_object();
//! w.key("name");
//! w.write_str("Line\u{2028}feed, \u{D6}l!");
//! w.key("tags");
//! w.begin_array();
//! w.write_i64(-1);
//! w.write_null();
//! w.end_array();
//! w.end_object();
//!
//! assert_eq!(
//!     out.get_bytes(),
//!     "{\"name\":\"Line\u{2028}feed, \u{D6}l!\",\"tags\":[-1,null]}".as_bytes()
//! );
//! ```

#![warn(missing_docs)]

mod escape;

use crate::{error::Error, value::Value};

/// Growable byte sink with JSON-aware emission primitives.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// An empty writer with no allocation.
    #[must_use]
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// An empty writer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    #[must_use]
    pub fn get_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the writer, returning the output buffer.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Discards the output, keeping the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Appends one byte verbatim.
    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        self.buf.push(b);
    }

    /// Appends bytes verbatim. The caller is responsible for them being JSON.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends `s` as a quoted, minimally escaped string literal.
    #[inline]
    pub fn write_quoted(&mut self, s: &str) {
        escape::write_quoted(&mut self.buf, s);
    }

    /// Appends `v` in decimal.
    pub fn write_i64(&mut self, v: i64) {
        let mut b = itoa::Buffer::new();
        self.buf.extend_from_slice(b.format(v).as_bytes());
    }

    /// Appends `v` in decimal.
    pub fn write_u64(&mut self, v: u64) {
        let mut b = itoa::Buffer::new();
        self.buf.extend_from_slice(b.format(v).as_bytes());
    }

    /// Appends the shortest decimal that parses back to exactly `v`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] for NaN and infinities; nothing is
    /// written in that case.
    pub fn write_f64(&mut self, v: f64) -> Result<(), Error> {
        if !v.is_finite() {
            return Err(Error::UnsupportedType {
                type_name: "f64",
                reason: format!("{v} has no JSON representation"),
            });
        }
        let mut b = ryu::Buffer::new();
        self.buf.extend_from_slice(b.format_finite(v).as_bytes());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    is_object: bool,
    empty: bool,
}

/// Writes JSON values into a borrowed [`ByteWriter`].
///
/// The writer inserts separators itself: call [`key`](Self::key) before each
/// object member and any `write_*`/`begin_*` method for each value. It does
/// not validate call order beyond debug assertions; unbalanced or keyless
/// sequences produce invalid JSON.
#[derive(Debug)]
pub struct ValueWriter<'w> {
    out: &'w mut ByteWriter,
    scopes: Vec<Scope>,
}

impl<'w> ValueWriter<'w> {
    /// Starts writing at the end of `out`, outside any container.
    pub fn new(out: &'w mut ByteWriter) -> Self {
        Self {
            out,
            scopes: Vec::new(),
        }
    }

    /// Emits the comma that separates array elements.
    fn before_value(&mut self) {
        if let Some(scope) = self.scopes.last_mut() {
            if !scope.is_object {
                if !scope.empty {
                    self.out.write_byte(b',');
                }
                scope.empty = false;
            }
        }
    }

    /// Opens an array as the next value.
    pub fn begin_array(&mut self) {
        self.before_value();
        self.out.write_byte(b'[');
        self.scopes.push(Scope {
            is_object: false,
            empty: true,
        });
    }

    /// Closes the innermost array.
    pub fn end_array(&mut self) {
        let scope = self.scopes.pop();
        debug_assert!(
            matches!(scope, Some(Scope { is_object: false, .. })),
            "end_array without begin_array"
        );
        self.out.write_byte(b']');
    }

    /// Opens an object as the next value.
    pub fn begin_object(&mut self) {
        self.before_value();
        self.out.write_byte(b'{');
        self.scopes.push(Scope {
            is_object: true,
            empty: true,
        });
    }

    /// Closes the innermost object.
    pub fn end_object(&mut self) {
        let scope = self.scopes.pop();
        debug_assert!(
            matches!(scope, Some(Scope { is_object: true, .. })),
            "end_object without begin_object"
        );
        self.out.write_byte(b'}');
    }

    /// Writes an object member name and the `:` that follows it.
    pub fn key(&mut self, key: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            debug_assert!(scope.is_object, "key outside of an object");
            if !scope.empty {
                self.out.write_byte(b',');
            }
            scope.empty = false;
        }
        self.out.write_quoted(key);
        self.out.write_byte(b':');
    }

    /// Writes a string value with minimal escaping.
    pub fn write_str(&mut self, s: &str) {
        self.before_value();
        self.out.write_quoted(s);
    }

    /// Writes a one-character string.
    pub fn write_char(&mut self, c: char) {
        let mut tmp = [0u8; 4];
        self.write_str(c.encode_utf8(&mut tmp));
    }

    /// Writes a string given as UTF-16 code units.
    ///
    /// Surrogate pairs are joined into one scalar value; unpaired surrogates
    /// become U+FFFD, matching the parser's default
    /// [`DecodeMode::ReplaceInvalid`](crate::DecodeMode::ReplaceInvalid).
    pub fn write_utf16(&mut self, units: &[u16]) {
        let s: String = char::decode_utf16(units.iter().copied())
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        self.write_str(&s);
    }

    /// Writes an integer value.
    pub fn write_i64(&mut self, v: i64) {
        self.before_value();
        self.out.write_i64(v);
    }

    /// Writes an unsigned integer value.
    pub fn write_u64(&mut self, v: u64) {
        self.before_value();
        self.out.write_u64(v);
    }

    /// Writes a float value in shortest round-trip form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] for non-finite values.
    pub fn write_f64(&mut self, v: f64) -> Result<(), Error> {
        if !v.is_finite() {
            // Fail before the separator so the output stays untouched.
            return self.out.write_f64(v);
        }
        self.before_value();
        self.out.write_f64(v)
    }

    /// Writes `true` or `false`.
    pub fn write_bool(&mut self, v: bool) {
        self.before_value();
        let literal: &[u8] = if v { b"true" } else { b"false" };
        self.out.write_raw(literal);
    }

    /// Writes `null`.
    pub fn write_null(&mut self) {
        self.before_value();
        self.out.write_raw(b"null");
    }

    /// Writes a generic value tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if the tree holds a non-finite
    /// float. Output written before the failure is left in the buffer.
    pub fn write_value(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::Null => self.write_null(),
            Value::Boolean(b) => self.write_bool(*b),
            Value::Integer(i) => self.write_i64(*i),
            Value::Float(f) => self.write_f64(*f)?,
            Value::String(s) => self.write_str(s),
            Value::Array(items) => {
                self.begin_array();
                for item in items {
                    self.write_value(item)?;
                }
                self.end_array();
            }
            Value::Object(members) => {
                self.begin_object();
                for (k, v) in members {
                    self.key(k);
                    self.write_value(v)?;
                }
                self.end_object();
            }
        }
        Ok(())
    }

    /// Writes any [`ToJson`] value.
    ///
    /// # Errors
    ///
    /// Propagates the value's own error.
    pub fn write<T: ToJson + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        value.write_json(self)
    }
}

/// A type that can write itself as JSON.
pub trait ToJson {
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] when the value has no JSON form.
    fn write_json(&self, w: &mut ValueWriter<'_>) -> Result<(), Error>;
}

impl ToJson for Value {
    fn write_json(&self, w: &mut ValueWriter<'_>) -> Result<(), Error> {
        w.write_value(self)
    }
}

impl ToJson for str {
    fn write_json(&self, w: &mut ValueWriter<'_>) -> Result<(), Error> {
        w.write_str(self);
        Ok(())
    }
}

impl ToJson for String {
    fn write_json(&self, w: &mut ValueWriter<'_>) -> Result<(), Error> {
        w.write_str(self);
        Ok(())
    }
}

impl ToJson for char {
    fn write_json(&self, w: &mut ValueWriter<'_>) -> Result<(), Error> {
        w.write_char(*self);
        Ok(())
    }
}

impl ToJson for bool {
    fn write_json(&self, w: &mut ValueWriter<'_>) -> Result<(), Error> {
        w.write_bool(*self);
        Ok(())
    }
}

macro_rules! impl_to_json_int {
    ($method:ident as $wide:ty: $($t:ty),*) => {$(
        impl ToJson for $t {
            fn write_json(&self, w: &mut ValueWriter<'_>) -> Result<(), Error> {
                w.$method(<$wide>::from(*self));
                Ok(())
            }
        }
    )*};
}

impl_to_json_int!(write_i64 as i64: i8, i16, i32, i64);
impl_to_json_int!(write_u64 as u64: u8, u16, u32, u64);

impl ToJson for f64 {
    fn write_json(&self, w: &mut ValueWriter<'_>) -> Result<(), Error> {
        w.write_f64(*self)
    }
}

impl ToJson for f32 {
    fn write_json(&self, w: &mut ValueWriter<'_>) -> Result<(), Error> {
        w.write_f64(f64::from(*self))
    }
}

impl<T: ToJson> ToJson for Option<T> {
    fn write_json(&self, w: &mut ValueWriter<'_>) -> Result<(), Error> {
        match self {
            Some(v) => v.write_json(w),
            None => {
                w.write_null();
                Ok(())
            }
        }
    }
}

impl<T: ToJson> ToJson for [T] {
    fn write_json(&self, w: &mut ValueWriter<'_>) -> Result<(), Error> {
        w.begin_array();
        for item in self {
            item.write_json(w)?;
        }
        w.end_array();
        Ok(())
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn write_json(&self, w: &mut ValueWriter<'_>) -> Result<(), Error> {
        self.as_slice().write_json(w)
    }
}

impl<T: ToJson + ?Sized> ToJson for &T {
    fn write_json(&self, w: &mut ValueWriter<'_>) -> Result<(), Error> {
        (**self).write_json(w)
    }
}

#[cfg(test)]
mod tests {
    use super::{ByteWriter, ToJson, ValueWriter};
    use crate::error::ErrorKind;

    fn json<T: ToJson + ?Sized>(v: &T) -> String {
        let mut out = ByteWriter::new();
        ValueWriter::new(&mut out).write(v).unwrap();
        String::from_utf8(out.into_bytes()).unwrap()
    }

    #[test]
    fn scalars() {
        assert_eq!(json(&0i64), "0");
        assert_eq!(json(&-17i32), "-17");
        assert_eq!(json(&u64::MAX), "18446744073709551615");
        assert_eq!(json(&true), "true");
        assert_eq!(json(&None::<bool>), "null");
        assert_eq!(json(&1.0f64), "1.0");
        assert_eq!(json(&0.1f64), "0.1");
        assert_eq!(json(&1e300f64), "1e300");
    }

    #[test]
    fn sequences_and_separators() {
        assert_eq!(json(&vec![1u8, 2, 3]), "[1,2,3]");
        assert_eq!(json(&Vec::<bool>::new()), "[]");
        assert_eq!(json(&vec![vec!["a"], vec![], vec!["b", "c"]]), r#"[["a"],[],["b","c"]]"#);
    }

    #[test]
    fn nested_objects_in_arrays() {
        let mut out = ByteWriter::new();
        let mut w = ValueWriter::new(&mut out);
        w.begin_array();
        w.begin_object();
        w.end_object();
        w.begin_object();
        w.key("a");
        w.begin_object();
        w.key("b");
        w.write_char('c');
        w.end_object();
        w.key("d");
        w.write_u64(4);
        w.end_object();
        w.end_array();
        assert_eq!(out.get_bytes(), br#"[{},{"a":{"b":"c"},"d":4}]"#);
    }

    #[test]
    fn non_finite_float_writes_nothing() {
        let mut out = ByteWriter::new();
        let mut w = ValueWriter::new(&mut out);
        w.begin_array();
        w.write_i64(1);
        let err = w.write_f64(f64::NAN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        assert_eq!(out.get_bytes(), b"[1");
    }

    #[test]
    fn utf16_pairs_joined_and_lone_units_replaced() {
        let mut out = ByteWriter::new();
        let mut w = ValueWriter::new(&mut out);
        w.begin_array();
        w.write_utf16(&[0xD83D, 0xDE80, 0x41]);
        w.write_utf16(&[0xDC00, 0x42, 0xD800]);
        w.end_array();
        assert_eq!(out.get_bytes(), "[\"\u{1F680}A\",\"\u{FFFD}B\u{FFFD}\"]".as_bytes());
    }
}
