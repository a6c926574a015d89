//! A byte-oriented JSON codec.
//!
//! - [`ParserContext`] tokenizes UTF-8 input with exact escape handling
//!   (four-digit `\u` escapes, surrogate pair reassembly) and reports
//!   structure to an [`EventSink`].
//! - The generic decoder ([`decoder::ValueBuilder`]) turns those events into
//!   a [`Value`].
//! - [`ByteWriter`] and [`ValueWriter`] emit compact JSON with minimal
//!   escaping: only `"`, `\` and control characters are escaped, everything
//!   else is written as raw UTF-8.
//! - [`schema`] derives property tables from described types, and [`bind`]
//!   uses them for typed (de)serialization.
//!
//! # Examples
//!
//! ```rust
//! let value = jsoncodec::from_str(r#"{"greeting": "grüß dich", "n": [1, 2.5]}"#).unwrap();
//! assert_eq!(value["greeting"].as_str(), Some("grüß dich"));
//! assert_eq!(
//!     jsoncodec::to_string(&value).unwrap(),
//!     r#"{"greeting":"grüß dich","n":[1,2.5]}"#
//! );
//! ```

#![allow(missing_docs)]

pub mod bind;
pub mod decoder;
mod error;
pub mod parser;
pub mod schema;
mod value;
pub mod writer;

#[cfg(test)]
mod tests;

pub use error::{Error, ErrorKind};
pub use parser::{
    DecodeMode, EventSink, IgnoredSink, Number, ParserContext, ParserError, ParserOptions,
    SyntaxError,
};
pub use value::{Array, Object, Value};
pub use writer::{ByteWriter, ToJson, ValueWriter};

/// Parses one JSON document with the default options.
///
/// # Errors
///
/// [`Error::MalformedJson`] if `input` is not exactly one valid JSON value.
pub fn from_slice(input: &[u8]) -> Result<Value, Error> {
    from_slice_with_options(input, ParserOptions::default())
}

/// # Errors
///
/// See [`from_slice`].
pub fn from_str(input: &str) -> Result<Value, Error> {
    from_slice(input.as_bytes())
}

/// Parses one JSON document.
///
/// # Errors
///
/// [`Error::MalformedJson`] if `input` violates the grammar under `options`.
pub fn from_slice_with_options(input: &[u8], options: ParserOptions) -> Result<Value, Error> {
    ParserContext::new(input, options)
        .parse_value()
        .map_err(|err| {
            tracing::debug!(
                target: "jsoncodec::parser",
                offset = err.offset,
                line = err.line,
                column = err.column,
                reason = %err.syntax_error(),
                "parse failed"
            );
            Error::MalformedJson(err)
        })
}

/// Encodes `value` as compact JSON.
///
/// # Errors
///
/// [`Error::UnsupportedType`] if `value` holds a non-finite float.
pub fn to_vec<T: ToJson + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    let mut out = ByteWriter::new();
    ValueWriter::new(&mut out).write(value)?;
    Ok(out.into_bytes())
}

/// # Errors
///
/// See [`to_vec`].
pub fn to_string<T: ToJson + ?Sized>(value: &T) -> Result<String, Error> {
    let bytes = to_vec(value)?;
    // Writer output is built from `&str` pieces and ASCII, never split.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
