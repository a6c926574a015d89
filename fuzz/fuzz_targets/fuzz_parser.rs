#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsoncodec::{DecodeMode, ErrorKind, ParserOptions, from_slice_with_options, to_vec};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 1; // option flags

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r"];

/// Escapes that serde_json never emits but the parser must handle.
static ESCAPE_TABLE: &[&[u8]] = &[
    r#""😀""#.as_bytes(),
    br#""\uD800""#,
    br#""\uDC00\uD800""#,
    r#""é\/\b\f""#.as_bytes(),
    br#""\uD834x""#,
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x07);

        let mut prefix = HEADER;
        while prefix < size.max(HEADER + 1) && prefix < max_size {
            let limit = max_size - prefix;
            prefix += append_whitespace(&mut data[prefix..], limit);
            let limit = max_size - prefix;
            prefix += if with_rng(|rng| rng.random_ratio(1, 8)) {
                append_escape(&mut data[prefix..], limit)
            } else {
                append_value(&mut data[prefix..], size, limit)
            };
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        let mut written = 0;
        for _ in 0..rng.random_range(0..=limit.min(4)) {
            let w = WS_TABLE[rng.random_range(0..WS_TABLE.len())];
            if written + w.len() > limit {
                break;
            }
            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

fn append_escape(buf: &mut [u8], limit: usize) -> usize {
    let escape = with_rng(|rng| ESCAPE_TABLE[rng.random_range(0..ESCAPE_TABLE.len())]);
    let len = escape.len().min(limit);
    buf[..len].copy_from_slice(&escape[..len]);
    len
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..=size * 2).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).unwrap_or_default();
    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(22)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 => Value::Number(u.arbitrary::<i64>()?.into()),
            4..=11 => Value::String(u.arbitrary()?),
            12..=16 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            17..=21 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

fn options(flags: u8) -> ParserOptions {
    ParserOptions {
        allow_trailing_data: flags & 1 != 0,
        decode_mode: if flags & 2 != 0 {
            DecodeMode::StrictUnicode
        } else {
            DecodeMode::ReplaceInvalid
        },
        max_depth: (flags & 4 != 0).then_some(64),
        panic_on_error: false,
    }
}

fn parser(data: &[u8]) {
    let Some((&flags, input)) = data.split_first() else {
        return;
    };

    let Ok(value) = from_slice_with_options(input, options(flags)) else {
        // Anything serde_json takes as one document must be accepted too.
        if flags == 0 {
            assert!(serde_json::from_slice::<Value>(input).is_err());
        }
        return;
    };

    // Overflowing numbers parse to infinity, which has no encoding. Anything
    // else must encode, and minimal escaping must read back to the same tree.
    let encoded = match to_vec(&value) {
        Ok(encoded) => encoded,
        Err(err) => {
            assert_eq!(err.kind(), ErrorKind::UnsupportedType);
            return;
        }
    };
    let reparsed = from_slice_with_options(&encoded, ParserOptions::default()).unwrap();
    assert_eq!(reparsed, value);
    assert!(serde_json::from_slice::<Value>(&encoded).is_ok() || flags & 4 == 0);
}

fuzz_target!(|data: &[u8]| parser(data));
