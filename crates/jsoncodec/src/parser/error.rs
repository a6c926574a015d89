use thiserror::Error;

/// A syntax violation found by the tokenizer, positioned in the input.
///
/// `offset` is the byte offset of the offending byte (or of the end of input).
/// `line` and `column` are 1-based and count bytes, not characters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{source} at byte {offset} ({line}:{column})")]
pub struct ParserError {
    pub(crate) source: SyntaxError,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl ParserError {
    /// The underlying syntax violation.
    #[must_use]
    pub fn syntax_error(&self) -> &SyntaxError {
        &self.source
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("invalid character '{}'", .0.escape_debug())]
    InvalidCharacter(char),
    #[error("invalid byte 0x{0:02X}")]
    InvalidByte(u8),
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    #[error("unescaped control character 0x{0:02X} in string")]
    ControlCharacterInString(u8),
    #[error("invalid escape character '{}'", .0.escape_debug())]
    InvalidEscape(char),
    #[error("invalid unicode escape sequence at character: '{}'", .0.escape_debug())]
    InvalidUnicodeEscapeChar(char),
    #[error("unpaired surrogate escape \\u{0:04X}")]
    UnpairedSurrogate(u16),
    #[error("expected '{expected}' but found '{found}'")]
    MismatchedCloser { expected: char, found: char },
    #[error("unexpected '{0}' with no open container")]
    UnexpectedCloser(char),
    #[error("invalid number literal")]
    InvalidNumber,
    #[error("trailing data after JSON value")]
    TrailingData,
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}
