//! Benchmark – `jsoncodec` parse and write throughput
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jsoncodec::{ByteWriter, IgnoredSink, ParserContext, ParserOptions, ValueWriter};

/// A deterministic document of roughly `records` objects, mixing plain
/// ASCII, escapes, astral characters and numbers.
fn make_payload(records: usize) -> String {
    let mut s = String::with_capacity(records * 96);
    s.push('[');
    for i in 0..records {
        if i > 0 {
            s.push(',');
        }
        s.push_str(&format!(
            r#"{{"id":{i},"name":"user-{i}","score":{}.25,"bio":"line\nbreak \"quoted\" é 😀","tags":["a","b"],"ok":true}}"#,
            i % 97
        ));
    }
    s.push(']');
    s
}

/// A single string dominated by text that needs no escaping.
fn make_string_payload(len: usize) -> String {
    let mut s = String::with_capacity(len + 2);
    s.push('"');
    s.extend("grüß dich, ".chars().cycle().take(len));
    s.push('"');
    s
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for &records in &[10usize, 1_000] {
        let payload = make_payload(records);
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::new("value", records), &payload, |b, p| {
            b.iter(|| jsoncodec::from_str(black_box(p)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("events", records), &payload, |b, p| {
            b.iter(|| {
                ParserContext::new(black_box(p.as_bytes()), ParserOptions::default())
                    .parse_with(&mut IgnoredSink)
                    .unwrap()
            });
        });
    }

    let long = make_string_payload(64 * 1024);
    group.throughput(Throughput::Bytes(long.len() as u64));
    group.bench_function("long_string", |b| {
        b.iter(|| jsoncodec::from_str(black_box(&long)).unwrap());
    });
    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");
    for &records in &[10usize, 1_000] {
        let value = jsoncodec::from_str(&make_payload(records)).unwrap();
        group.bench_with_input(BenchmarkId::new("value", records), &value, |b, v| {
            let mut out = ByteWriter::with_capacity(records * 128);
            b.iter(|| {
                out.clear();
                ValueWriter::new(&mut out).write(black_box(v)).unwrap();
                out.len()
            });
        });
    }

    let units: Vec<u16> = make_string_payload(64 * 1024).encode_utf16().collect();
    group.bench_function("utf16", |b| {
        let mut out = ByteWriter::with_capacity(units.len() * 3);
        b.iter(|| {
            out.clear();
            ValueWriter::new(&mut out).write_utf16(black_box(&units));
            out.len()
        });
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = bench_parse, bench_write
}
criterion_main!(benches);
