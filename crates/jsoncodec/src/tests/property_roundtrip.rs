use quickcheck::QuickCheck;

use super::{
    arbitrary::{JsonNumber, SurrogateRichString},
    quickcheck_tests,
};
use crate::{ByteWriter, Value, ValueWriter, from_slice, to_vec};

#[test]
fn value_round_trips() {
    fn prop(value: Value) -> bool {
        let bytes = to_vec(&value).unwrap();
        from_slice(&bytes).unwrap() == value
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Value) -> bool);
}

#[test]
fn float_formatting_is_exact() {
    fn prop(n: JsonNumber) -> bool {
        let bytes = to_vec(&n.0).unwrap();
        matches!(from_slice(&bytes), Ok(Value::Float(f)) if f.to_bits() == n.0.to_bits()
            || (f == 0.0 && n.0 == 0.0))
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(JsonNumber) -> bool);
}

#[test]
fn surrogate_rich_strings_round_trip() {
    fn prop(s: SurrogateRichString) -> bool {
        let bytes = to_vec(s.0.as_str()).unwrap();
        // No escaping beyond quote, backslash and controls: astral characters
        // appear as their own UTF-8 bytes.
        let plain = !s.0.chars().any(|c| c < ' ' || c == '"' || c == '\\');
        if plain && bytes[1..bytes.len() - 1] != *s.0.as_bytes() {
            return false;
        }
        from_slice(&bytes).unwrap() == Value::String(s.0)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(SurrogateRichString) -> bool);
}

#[test]
fn every_character_round_trips_alone() {
    fn prop(s: SurrogateRichString) -> bool {
        s.0.chars().all(|c| {
            let mut out = ByteWriter::new();
            ValueWriter::new(&mut out).write_char(c);
            from_slice(out.get_bytes()).unwrap() == Value::String(c.to_string())
        })
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(SurrogateRichString) -> bool);
}

#[test]
fn utf16_input_round_trips_through_escapes() {
    // Encode as UTF-16, write through `write_utf16`, then also decode the
    // same units from `\u` escapes: both paths must agree.
    fn prop(s: SurrogateRichString) -> bool {
        let units: Vec<u16> = s.0.encode_utf16().collect();

        let mut out = ByteWriter::new();
        ValueWriter::new(&mut out).write_utf16(&units);
        let written = from_slice(out.get_bytes()).unwrap();

        let mut escaped = String::from("\"");
        for u in &units {
            escaped.push_str(&format!("\\u{u:04x}"));
        }
        escaped.push('"');
        let decoded = from_slice(escaped.as_bytes()).unwrap();

        written == Value::String(s.0.clone()) && decoded == written
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(SurrogateRichString) -> bool);
}
