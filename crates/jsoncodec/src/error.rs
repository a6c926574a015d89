use thiserror::Error;

use crate::{parser::ParserError, schema::SchemaConflict};

/// Every failure the codec reports.
///
/// All kinds are final for the call in progress: no partial value is
/// returned alongside an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The input is not valid JSON.
    #[error("malformed JSON: {0}")]
    MalformedJson(#[from] ParserError),

    /// A type's accessors or overrides contradict each other.
    #[error("schema conflict: {0}")]
    SchemaConflict(#[from] SchemaConflict),

    /// A value or type has no JSON mapping.
    #[error("unsupported type `{type_name}`: {reason}")]
    UnsupportedType {
        type_name: &'static str,
        reason: String,
    },

    /// A decoded value does not fit the property it is bound to.
    #[error("property `{property}` expects {expected}, found {found}")]
    TypeMismatch {
        property: String,
        expected: String,
        found: &'static str,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedJson,
    SchemaConflict,
    UnsupportedType,
    TypeMismatch,
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedJson(_) => ErrorKind::MalformedJson,
            Error::SchemaConflict(_) => ErrorKind::SchemaConflict,
            Error::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        }
    }

    /// Byte offset of the offending input for [`ErrorKind::MalformedJson`].
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::MalformedJson(e) => Some(e.offset),
            _ => None,
        }
    }
}
