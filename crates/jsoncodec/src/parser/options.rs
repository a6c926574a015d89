/// How the parser treats `\u` escapes that leave a UTF-16 surrogate unpaired.
///
/// Rust strings hold Unicode scalar values only, so a lone surrogate cannot
/// be stored as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Replace each unpaired surrogate code unit with U+FFFD.
    #[default]
    ReplaceInvalid,
    /// Reject unpaired surrogates as malformed input.
    StrictUnicode,
}

/// Configuration options for [`ParserContext`](crate::parser::ParserContext).
///
/// The defaults implement strict RFC 8259 parsing of a single value.
///
/// # Examples
///
/// ```rust
/// use jsoncodec::{DecodeMode, ParserOptions};
///
/// let options = ParserOptions {
///     decode_mode: DecodeMode::StrictUnicode,
///     max_depth: Some(64),
///     ..Default::default()
/// };
/// assert!(!options.allow_trailing_data);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// Whether bytes after the first complete top-level value are tolerated.
    ///
    /// When `false`, anything other than JSON whitespace after the value is a
    /// `TrailingData` error. When `true`, parsing stops after the value and
    /// [`ParserContext::parse_with`](crate::parser::ParserContext::parse_with)
    /// returns the offset where it ended.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_trailing_data: bool,

    /// Policy for unpaired surrogate escapes.
    ///
    /// # Default
    ///
    /// [`DecodeMode::ReplaceInvalid`]
    pub decode_mode: DecodeMode,

    /// Maximum container nesting depth, or `None` for no limit.
    ///
    /// The parser keeps its container stack on the heap, so this is a
    /// resource policy for callers that accept untrusted input.
    ///
    /// # Default
    ///
    /// `None`
    pub max_depth: Option<usize>,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on syntax errors instead of returning them.
    ///
    /// Enabled only in test builds to produce backtraces on parse failures.
    pub panic_on_error: bool,
}
