use crate::parser::numbers::Number;

/// Receiver of the structural events a [`ParserContext`] reports.
///
/// Events arrive in document order. Every `begin_*` is matched by the
/// corresponding `end_*` before the parse returns `Ok`; inside an object each
/// value is preceded by exactly one [`key`](EventSink::key). On error the
/// sink may have seen a prefix of the document and should be discarded.
///
/// [`ParserContext`]: crate::parser::ParserContext
pub trait EventSink {
    fn begin_object(&mut self);
    fn end_object(&mut self);
    fn begin_array(&mut self);
    fn end_array(&mut self);

    /// An object key, fully unescaped.
    fn key(&mut self, key: &str);

    /// A string value, fully unescaped.
    fn string(&mut self, value: &str);
    fn number(&mut self, value: Number);
    fn boolean(&mut self, value: bool);
    fn null(&mut self);
}

/// Discards every event; useful for validating input without building values.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoredSink;

impl EventSink for IgnoredSink {
    fn begin_object(&mut self) {}
    fn end_object(&mut self) {}
    fn begin_array(&mut self) {}
    fn end_array(&mut self) {}
    fn key(&mut self, _key: &str) {}
    fn string(&mut self, _value: &str) {}
    fn number(&mut self, _value: Number) {}
    fn boolean(&mut self, _value: bool) {}
    fn null(&mut self) {}
}
