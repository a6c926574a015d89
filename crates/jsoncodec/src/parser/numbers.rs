use crate::parser::error::SyntaxError;

/// Lexical hint so sinks can distinguish ints vs floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberLexeme<'a> {
    /// No `.` and no exponent.
    Integer(&'a str),
    /// Has `.` or exponent.
    Float(&'a str),
}

/// A number literal coerced to its in-memory representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl NumberLexeme<'_> {
    /// The literal text exactly as it appeared in the input.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            NumberLexeme::Integer(s) | NumberLexeme::Float(s) => s,
        }
    }

    /// Integer literals that fit `i64` stay integers; everything else is an
    /// `f64`. Magnitudes beyond `f64` become signed infinity, which the
    /// writers refuse to emit.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::InvalidNumber`] if `f64` parsing rejects the text. The
    /// lexer only hands over well-formed literals, so this does not happen
    /// for parser output.
    pub fn to_number(&self) -> Result<Number, SyntaxError> {
        if let NumberLexeme::Integer(s) = self {
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Number::Integer(i));
            }
        }

        self.as_str()
            .parse::<f64>()
            .map(Number::Float)
            .map_err(|_| SyntaxError::InvalidNumber)
    }
}
