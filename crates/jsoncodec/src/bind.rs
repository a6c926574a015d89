//! Typed (de)serialization driven by a type's [`Schema`].
//!
//! One generic routine serves every [`Describe`] type: output walks the
//! serialize-enabled properties in schema order, input decodes a generic
//! object and hands each member to the matching deserialize-enabled
//! property. Unknown members are skipped.
//!
//! # Examples
//!
//! ```rust
//! use jsoncodec::schema::{DeclaredType, Describe, TypeDescriptor};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Tag { label: String }
//!
//! impl Describe for Tag {
//!     fn describe() -> TypeDescriptor<Self> {
//!         TypeDescriptor::<Self>::new("Tag")
//!             .getter("getLabel", DeclaredType::String, |t| t.label.as_str().into())
//!             .setter("setLabel", DeclaredType::String, |t, v| {
//!                 t.label = v.as_str().unwrap_or_default().to_owned();
//!                 Ok(())
//!             })
//!     }
//! }
//!
//! let bytes = jsoncodec::bind::to_vec(&Tag { label: "\u{2028}".into() }).unwrap();
//! assert_eq!(bytes, "{\"label\":\"\u{2028}\"}".as_bytes());
//! let back: Tag = jsoncodec::bind::from_slice(&bytes).unwrap();
//! assert_eq!(back.label, "\u{2028}");
//! ```

use crate::{
    error::Error,
    schema::{Describe, Schema, schema_for},
    value::{Object, Value},
    writer::{ByteWriter, ValueWriter},
};

/// Writes `value` as one JSON object.
///
/// # Errors
///
/// Schema build errors for `T`, or [`Error::UnsupportedType`] if a property
/// yields a non-finite float.
pub fn write<T: Describe>(w: &mut ValueWriter<'_>, value: &T) -> Result<(), Error> {
    let schema = schema_for::<T>()?;
    write_with(&schema, w, value)
}

fn write_with<T>(schema: &Schema<T>, w: &mut ValueWriter<'_>, value: &T) -> Result<(), Error> {
    w.begin_object();
    for property in schema.iter() {
        if let Some(v) = property.get(value) {
            w.key(property.json_name());
            w.write_value(&v)?;
        }
    }
    w.end_object();
    Ok(())
}

/// # Errors
///
/// See [`write`].
pub fn to_vec<T: Describe>(value: &T) -> Result<Vec<u8>, Error> {
    let mut out = ByteWriter::with_capacity(128);
    write(&mut ValueWriter::new(&mut out), value)?;
    Ok(out.into_bytes())
}

/// Converts `value` to a generic object holding its serialize-enabled
/// properties.
///
/// # Errors
///
/// Schema build errors for `T`.
pub fn to_value<T: Describe>(value: &T) -> Result<Value, Error> {
    let schema = schema_for::<T>()?;
    let mut members = Object::with_capacity(schema.len());
    for property in schema.iter() {
        if let Some(v) = property.get(value) {
            members.insert(property.json_name().to_owned(), v);
        }
    }
    Ok(Value::Object(members))
}

/// Populates a default `T` from a generic object.
///
/// # Errors
///
/// Schema build errors for `T`, [`Error::TypeMismatch`] if `value` is not an
/// object or a member does not fit its property, or a setter's own error.
pub fn from_value<T: Describe + Default>(value: Value) -> Result<T, Error> {
    let schema = schema_for::<T>()?;
    let Value::Object(members) = value else {
        return Err(Error::TypeMismatch {
            property: schema.type_name().to_owned(),
            expected: "object".to_owned(),
            found: value.kind_name(),
        });
    };

    let mut out = T::default();
    for (key, member) in members {
        match schema.get(&key) {
            Some(property) if property.deserialize_enabled() => property.set(&mut out, member)?,
            _ => tracing::trace!(
                target: "jsoncodec::bind",
                type_name = schema.type_name(),
                key = %key,
                "skipping member"
            ),
        }
    }
    Ok(out)
}

/// Parses `input` and populates a default `T` from it.
///
/// # Errors
///
/// [`Error::MalformedJson`] for invalid input, otherwise see [`from_value`].
pub fn from_slice<T: Describe + Default>(input: &[u8]) -> Result<T, Error> {
    from_value(crate::from_slice(input)?)
}
