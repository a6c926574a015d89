//! Generic decoder: assembles parser events into a [`Value`] tree.
//!
//! The builder keeps one frame per open container on a heap-allocated stack,
//! so document depth never turns into native recursion. A finished child is
//! moved into its parent when the parent's frame is on top again.

use crate::{
    parser::{EventSink, Number},
    value::{Array, Object, Value},
};

#[derive(Debug)]
enum Frame {
    Array(Array),
    /// The pending key is set by `key` and consumed by the next value.
    Object(Object, Option<String>),
}

/// [`EventSink`] that builds a [`Value`].
///
/// Duplicate keys follow [`IndexMap::insert`](indexmap::IndexMap::insert):
/// the member keeps the position of its first occurrence and the value of
/// its last.
#[derive(Debug, Default)]
pub struct ValueBuilder {
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl ValueBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(8),
            root: None,
        }
    }

    /// The completed top-level value, or `Null` if none was reported.
    #[must_use]
    pub fn into_value(self) -> Value {
        debug_assert!(self.stack.is_empty(), "value taken before the parse finished");
        self.root.unwrap_or_default()
    }

    fn attach(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object(members, key)) => {
                // The parser reports a key before every member value.
                let key = key.take().unwrap_or_default();
                members.insert(key, value);
            }
        }
    }
}

impl EventSink for ValueBuilder {
    fn begin_object(&mut self) {
        self.stack.push(Frame::Object(Object::new(), None));
    }

    fn end_object(&mut self) {
        if let Some(Frame::Object(members, _)) = self.stack.pop() {
            self.attach(Value::Object(members));
        }
    }

    fn begin_array(&mut self) {
        self.stack.push(Frame::Array(Array::new()));
    }

    fn end_array(&mut self) {
        if let Some(Frame::Array(items)) = self.stack.pop() {
            self.attach(Value::Array(items));
        }
    }

    fn key(&mut self, key: &str) {
        if let Some(Frame::Object(_, pending)) = self.stack.last_mut() {
            *pending = Some(key.to_owned());
        }
    }

    fn string(&mut self, value: &str) {
        self.attach(Value::String(value.to_owned()));
    }

    fn number(&mut self, value: Number) {
        self.attach(match value {
            Number::Integer(i) => Value::Integer(i),
            Number::Float(f) => Value::Float(f),
        });
    }

    fn boolean(&mut self, value: bool) {
        self.attach(Value::Boolean(value));
    }

    fn null(&mut self) {
        self.attach(Value::Null);
    }
}

#[cfg(test)]
mod tests {
    use super::ValueBuilder;
    use crate::{
        parser::{EventSink, Number},
        value::Value,
    };

    #[test]
    fn builds_nested_tree_from_events() {
        let mut b = ValueBuilder::new();
        b.begin_object();
        b.key("list");
        b.begin_array();
        b.number(Number::Integer(1));
        b.begin_object();
        b.end_object();
        b.end_array();
        b.key("flag");
        b.boolean(false);
        b.end_object();

        let v = b.into_value();
        assert_eq!(v["list"][0], Value::Integer(1));
        assert!(v["list"][1].as_object().is_some_and(indexmap::IndexMap::is_empty));
        assert_eq!(v["flag"], Value::Boolean(false));
    }

    #[test]
    fn last_duplicate_wins() {
        let mut b = ValueBuilder::new();
        b.begin_object();
        b.key("a");
        b.string("first");
        b.key("b");
        b.null();
        b.key("a");
        b.string("second");
        b.end_object();

        let v = b.into_value();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get_index(0).map(|(k, _)| k.as_str()), Some("a"));
        assert_eq!(v["a"], Value::String("second".into()));
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let depth = if cfg!(miri) { 64 } else { 100_000 };
        let mut b = ValueBuilder::new();
        for _ in 0..depth {
            b.begin_array();
        }
        for _ in 0..depth {
            b.end_array();
        }
        let v = b.into_value();
        assert!(v.is_array());
        // Tear down iteratively; the derived Drop would recurse.
        let mut cur = v;
        while let Value::Array(mut items) = cur {
            cur = items.pop().unwrap_or_default();
        }
    }
}
