//! Byte-oriented JSON parser.
//!
//! Overview
//! - A [`ParserContext`] is a cursor over one input buffer. It owns the stack
//!   of open containers, the current parse state, and a scratch `String` into
//!   which string and key contents are decoded.
//! - The parser reports structural events to an [`EventSink`]. The generic
//!   decoder ([`ValueBuilder`]) is one such sink; typed consumers can provide
//!   their own.
//! - Input is strict RFC 8259 JSON: no comments, no trailing commas, no
//!   unquoted keys, exactly one top-level value (unless
//!   [`ParserOptions::allow_trailing_data`] is set).
//!
//! Strings
//! - Runs of ordinary bytes between escapes are located with `memchr`,
//!   validated (no raw control bytes, well-formed UTF-8) and copied in one
//!   step.
//! - Escapes are decoded byte by byte by the state machine in
//!   [`escape_buffer`]: `\uXXXX` always consumes exactly four hex digits, and a
//!   high surrogate is joined with an immediately following `\u` low
//!   surrogate.
//!
//! Errors
//! - Every failure is a [`ParserError`] carrying the byte offset of the
//!   offending byte. Parsing cannot resume after an error; the context is
//!   consumed by [`ParserContext::parse_with`].
//!
//! # Examples
//!
//! ```rust
//! use jsoncodec::{ParserContext, ParserOptions, Value};
//!
//! let ctx = ParserContext::new(br#"{"key": [null, true, 3.5]}"#, ParserOptions::default());
//! let value = ctx.parse_value().unwrap();
//! assert_eq!(value["key"][1], Value::Boolean(true));
//! ```

mod error;
mod escape_buffer;
mod event_sink;
mod literal_buffer;
mod numbers;
mod options;


pub use error::{ParserError, SyntaxError};
use escape_buffer::{EscapeState, SurrogateJoiner, UnicodeEscapeBuffer};
pub use event_sink::{EventSink, IgnoredSink};
use literal_buffer::{ExpectedLiteralBuffer, Literal, Step};
pub use numbers::{Number, NumberLexeme};
pub use options::{DecodeMode, ParserOptions};

use crate::{decoder::ValueBuilder, value::Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    /// Directly after `{`: a key or `}`.
    BeforePropertyName,
    /// After `,` in an object: a key only.
    BeforeNextPropertyName,
    AfterPropertyName,
    BeforePropertyValue,
    /// Directly after `[`: a value or `]`.
    BeforeArrayValue,
    /// After `,` in an array: a value only.
    BeforeNextArrayValue,
    AfterPropertyValue,
    AfterArrayValue,
    End,
}

/// Stack entry – one per open container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Array,
    Object,
}

impl Container {
    fn closer(self) -> u8 {
        match self {
            Container::Array => b']',
            Container::Object => b'}',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
}

/// A single-use parsing cursor over one input buffer.
///
/// A context is not meant to be shared: it is mutable cursor state, created
/// for one buffer and consumed by [`parse_with`](Self::parse_with) or
/// [`parse_value`](Self::parse_value). Parse several buffers in parallel by
/// creating one context per buffer.
#[derive(Debug)]
pub struct ParserContext<'src> {
    input: &'src [u8],

    /// Current byte offset into `input`.
    pos: usize,
    line: usize,
    line_start: usize,

    parse_state: ParseState,
    frames: Vec<Container>,

    /// String accumulation buffer, reused for every key and string value.
    buffer: String,
    escape: EscapeState,
    unicode_escape_buffer: UnicodeEscapeBuffer,
    surrogates: SurrogateJoiner,

    options: ParserOptions,
}

impl<'src> ParserContext<'src> {
    /// Creates a context positioned at the start of `input`.
    #[must_use]
    pub fn new(input: &'src [u8], options: ParserOptions) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            line_start: 0,
            parse_state: ParseState::Start,
            frames: Vec::with_capacity(16),
            buffer: String::new(),
            escape: EscapeState::None,
            unicode_escape_buffer: UnicodeEscapeBuffer::new(),
            surrogates: SurrogateJoiner::new(options.decode_mode),
            options,
        }
    }

    /// Parses one top-level value, reporting its structure to `sink`.
    ///
    /// Returns the byte offset just past the parsed value (and, in strict
    /// mode, past any trailing whitespace).
    ///
    /// # Errors
    ///
    /// Returns a [`ParserError`] for any deviation from the JSON grammar. The
    /// sink may have received a prefix of the document.
    pub fn parse_with<S: EventSink + ?Sized>(mut self, sink: &mut S) -> Result<usize, ParserError> {
        while self.parse_state != ParseState::End {
            self.skip_whitespace();
            self.step(sink)?;
        }

        if !self.options.allow_trailing_data {
            self.skip_whitespace();
            if self.pos < self.input.len() {
                return Err(self.error(SyntaxError::TrailingData));
            }
        }

        debug_assert!(self.frames.is_empty(), "container stack must be empty at the end");
        Ok(self.pos)
    }

    /// Parses one top-level value into a generic [`Value`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParserError`] if the input is not valid JSON.
    pub fn parse_value(self) -> Result<Value, ParserError> {
        let mut builder = ValueBuilder::new();
        self.parse_with(&mut builder)?;
        Ok(builder.into_value())
    }

    // ------------------------------------------------------------------------------------------------
    // Parse state dispatcher
    // ------------------------------------------------------------------------------------------------

    fn step<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), ParserError> {
        use ParseState::*;

        let Some(b) = self.peek() else {
            return Err(self.error(SyntaxError::UnexpectedEndOfInput));
        };

        match self.parse_state {
            Start | BeforePropertyValue | BeforeNextArrayValue => self.value(b, sink),
            BeforeArrayValue => match b {
                b']' => self.close(b, sink),
                _ => self.value(b, sink),
            },
            BeforePropertyName => match b {
                b'}' => self.close(b, sink),
                b'"' => self.property_name(sink),
                _ => Err(self.unexpected(b)),
            },
            BeforeNextPropertyName => match b {
                b'"' => self.property_name(sink),
                _ => Err(self.unexpected(b)),
            },
            AfterPropertyName => match b {
                b':' => {
                    self.advance(1);
                    self.parse_state = BeforePropertyValue;
                    Ok(())
                }
                _ => Err(self.unexpected(b)),
            },
            AfterPropertyValue => match b {
                b',' => {
                    self.advance(1);
                    self.parse_state = BeforeNextPropertyName;
                    Ok(())
                }
                b'}' => self.close(b, sink),
                _ => Err(self.unexpected(b)),
            },
            AfterArrayValue => match b {
                b',' => {
                    self.advance(1);
                    self.parse_state = BeforeNextArrayValue;
                    Ok(())
                }
                b']' => self.close(b, sink),
                _ => Err(self.unexpected(b)),
            },
            End => Ok(()),
        }
    }

    fn value<S: EventSink + ?Sized>(&mut self, b: u8, sink: &mut S) -> Result<(), ParserError> {
        match b {
            b'{' => {
                self.push(Container::Object)?;
                self.advance(1);
                sink.begin_object();
                self.parse_state = ParseState::BeforePropertyName;
                return Ok(());
            }
            b'[' => {
                self.push(Container::Array)?;
                self.advance(1);
                sink.begin_array();
                self.parse_state = ParseState::BeforeArrayValue;
                return Ok(());
            }
            b'"' => {
                self.advance(1);
                self.lex_string()?;
                sink.string(&self.buffer);
            }
            b'-' | b'0'..=b'9' => {
                let number = self.lex_number()?;
                sink.number(number);
            }
            b't' | b'f' | b'n' => match self.lex_literal(b)? {
                Literal::Null => sink.null(),
                Literal::True => sink.boolean(true),
                Literal::False => sink.boolean(false),
            },
            _ => return Err(self.unexpected(b)),
        }

        self.after_value();
        Ok(())
    }

    fn property_name<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), ParserError> {
        self.advance(1); // consume quote
        self.lex_string()?;
        sink.key(&self.buffer);
        self.parse_state = ParseState::AfterPropertyName;
        Ok(())
    }

    fn push(&mut self, container: Container) -> Result<(), ParserError> {
        if let Some(max) = self.options.max_depth {
            if self.frames.len() >= max {
                return Err(self.error(SyntaxError::NestingTooDeep(max)));
            }
        }
        self.frames.push(container);
        Ok(())
    }

    fn close<S: EventSink + ?Sized>(&mut self, b: u8, sink: &mut S) -> Result<(), ParserError> {
        match self.frames.last().copied() {
            Some(Container::Array) if b == b']' => {
                self.frames.pop();
                self.advance(1);
                sink.end_array();
            }
            Some(Container::Object) if b == b'}' => {
                self.frames.pop();
                self.advance(1);
                sink.end_object();
            }
            _ => return Err(self.unexpected(b)),
        }

        self.after_value();
        Ok(())
    }

    /// Restores the parse state from the innermost open container once a
    /// value is complete.
    fn after_value(&mut self) {
        self.parse_state = match self.frames.last() {
            None => ParseState::End,
            Some(Container::Array) => ParseState::AfterArrayValue,
            Some(Container::Object) => ParseState::AfterPropertyValue,
        };
    }

    // ------------------------------------------------------------------------------------------------
    // Lexer
    // ------------------------------------------------------------------------------------------------

    #[inline(always)]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline(always)]
    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.line_start = self.pos;
                }
                _ => break,
            }
        }
    }

    /// Decodes a string body into `self.buffer`. The opening quote has been
    /// consumed; on success the closing quote has been consumed too.
    fn lex_string(&mut self) -> Result<(), ParserError> {
        self.buffer.clear();
        self.escape = EscapeState::None;

        loop {
            match self.escape {
                EscapeState::None => {
                    let rest = &self.input[self.pos..];
                    let run = memchr::memchr2(b'"', b'\\', rest).unwrap_or(rest.len());
                    if run > 0 {
                        self.flush_surrogates()?;
                        self.copy_run(run)?;
                    }

                    match self.peek() {
                        None => return Err(self.error(SyntaxError::UnexpectedEndOfInput)),
                        Some(b'"') => {
                            self.flush_surrogates()?;
                            self.advance(1);
                            return Ok(());
                        }
                        Some(_) => {
                            self.advance(1);
                            self.escape = EscapeState::AfterBackslash;
                        }
                    }
                }

                EscapeState::AfterBackslash => {
                    let Some(b) = self.peek() else {
                        return Err(self.error(SyntaxError::UnexpectedEndOfInput));
                    };
                    let decoded = match b {
                        b'"' => '"',
                        b'\\' => '\\',
                        b'/' => '/',
                        b'b' => '\u{0008}',
                        b'f' => '\u{000C}',
                        b'n' => '\n',
                        b'r' => '\r',
                        b't' => '\t',
                        b'u' => {
                            self.advance(1);
                            self.unicode_escape_buffer.reset();
                            self.escape = EscapeState::UnicodeEscape;
                            continue;
                        }
                        _ => return Err(self.error(SyntaxError::InvalidEscape(self.char_at_pos()))),
                    };
                    self.flush_surrogates()?;
                    self.buffer.push(decoded);
                    self.advance(1);
                    self.escape = EscapeState::None;
                }

                EscapeState::UnicodeEscape => {
                    let Some(b) = self.peek() else {
                        return Err(self.error(SyntaxError::UnexpectedEndOfInput));
                    };
                    match self.unicode_escape_buffer.feed(b) {
                        Ok(None) => self.advance(1),
                        Ok(Some(unit)) => {
                            self.advance(1);
                            if let Err(err) = self.surrogates.push_unit(unit, &mut self.buffer) {
                                return Err(self.error(err));
                            }
                            self.escape = EscapeState::None;
                        }
                        Err(_) => {
                            return Err(self.error(SyntaxError::InvalidUnicodeEscapeChar(
                                self.char_at_pos(),
                            )));
                        }
                    }
                }
            }
        }
    }

    /// Copies `run` bytes of unescaped string content, rejecting raw control
    /// bytes and malformed UTF-8.
    fn copy_run(&mut self, run: usize) -> Result<(), ParserError> {
        let input = self.input;
        let start = self.pos;
        let segment = &input[start..start + run];

        if let Some(i) = segment.iter().position(|&b| b < 0x20) {
            self.pos = start + i;
            return Err(self.error(SyntaxError::ControlCharacterInString(segment[i])));
        }

        match core::str::from_utf8(segment) {
            Ok(text) => {
                self.buffer.push_str(text);
                self.pos += run;
                Ok(())
            }
            Err(e) => {
                self.pos = start + e.valid_up_to();
                Err(self.error(SyntaxError::InvalidUtf8))
            }
        }
    }

    fn flush_surrogates(&mut self) -> Result<(), ParserError> {
        if self.surrogates.is_pending() {
            if let Err(err) = self.surrogates.flush(&mut self.buffer) {
                return Err(self.error(err));
            }
        }
        Ok(())
    }

    fn lex_number(&mut self) -> Result<Number, ParserError> {
        use NumberState::*;

        let start = self.pos;
        let mut is_float = false;
        let mut state = match self.input[start] {
            b'-' => Sign,
            b'0' => Zero,
            _ => DecimalInteger,
        };
        self.advance(1);

        loop {
            state = match (state, self.peek()) {
                (Sign, Some(b'0')) => Zero,
                (Sign, Some(b'1'..=b'9')) => DecimalInteger,
                (DecimalInteger, Some(b'0'..=b'9')) => DecimalInteger,
                (Zero | DecimalInteger, Some(b'.')) => {
                    is_float = true;
                    DecimalPoint
                }
                (Zero | DecimalInteger | DecimalFraction, Some(b'e' | b'E')) => {
                    is_float = true;
                    DecimalExponent
                }
                (DecimalPoint | DecimalFraction, Some(b'0'..=b'9')) => DecimalFraction,
                (DecimalExponent, Some(b'+' | b'-')) => DecimalExponentSign,
                (
                    DecimalExponent | DecimalExponentSign | DecimalExponentInteger,
                    Some(b'0'..=b'9'),
                ) => DecimalExponentInteger,
                // Complete states end at the first byte that cannot extend them;
                // the parse state decides whether that byte is legal.
                (Zero | DecimalInteger | DecimalFraction | DecimalExponentInteger, _) => break,
                (_, Some(b)) => return Err(self.unexpected(b)),
                (_, None) => return Err(self.error(SyntaxError::UnexpectedEndOfInput)),
            };
            self.advance(1);
        }

        let Ok(text) = core::str::from_utf8(&self.input[start..self.pos]) else {
            return Err(self.error_at(start, SyntaxError::InvalidUtf8));
        };
        let lexeme = if is_float {
            NumberLexeme::Float(text)
        } else {
            NumberLexeme::Integer(text)
        };
        lexeme.to_number().map_err(|err| self.error_at(start, err))
    }

    fn lex_literal(&mut self, first: u8) -> Result<Literal, ParserError> {
        let mut expected = ExpectedLiteralBuffer::new(first);
        self.advance(1);

        loop {
            let Some(b) = self.peek() else {
                return Err(self.error(SyntaxError::UnexpectedEndOfInput));
            };
            match expected.step(b) {
                Step::NeedMore => self.advance(1),
                Step::Done(literal) => {
                    self.advance(1);
                    return Ok(literal);
                }
                Step::Reject => return Err(self.unexpected(b)),
            }
        }
    }

    // ------------------------------------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------------------------------------

    /// The character starting at the cursor, for diagnostics.
    fn char_at_pos(&self) -> char {
        let (ch, _) = bstr::decode_utf8(&self.input[self.pos..]);
        ch.unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// Classifies an unexpected byte at the cursor. Closers get a structural
    /// diagnosis against the container stack.
    fn unexpected(&self, b: u8) -> ParserError {
        let source = match b {
            b']' | b'}' => match self.frames.last() {
                None => SyntaxError::UnexpectedCloser(char::from(b)),
                Some(open) if open.closer() != b => SyntaxError::MismatchedCloser {
                    expected: char::from(open.closer()),
                    found: char::from(b),
                },
                Some(_) => SyntaxError::InvalidCharacter(char::from(b)),
            },
            0x00..=0x7F => SyntaxError::InvalidCharacter(char::from(b)),
            _ => match bstr::decode_utf8(&self.input[self.pos..]) {
                (Some(ch), _) => SyntaxError::InvalidCharacter(ch),
                (None, _) => SyntaxError::InvalidByte(b),
            },
        };
        self.error(source)
    }

    fn error(&self, source: SyntaxError) -> ParserError {
        self.error_at(self.pos, source)
    }

    fn error_at(&self, offset: usize, source: SyntaxError) -> ParserError {
        let err = ParserError {
            source,
            offset,
            line: self.line,
            column: offset.saturating_sub(self.line_start) + 1,
        };
        #[cfg(any(test, feature = "fuzzing"))]
        assert!(!self.options.panic_on_error, "{err}");
        err
    }
}
