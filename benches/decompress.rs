//! Benchmarks for LZMA decompression performance.
//!
//! Run with: `cargo bench`
//! Compare with baseline: `cargo bench -- --save-baseline main`
//! Compare against baseline: `cargo bench -- --baseline main`

use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lzma_rust2::{LzmaOptions, LzmaWriter};
use lzma_stream::{DecoderOptions, LzmaDecoder, StreamDecoder};

/// Split a `.lzma` file into decoder options and the range-coded body.
fn parse_alone(data: &[u8]) -> Option<(DecoderOptions, &[u8])> {
    if data.len() < 13 {
        return None;
    }
    let mut props = u32::from(data[0]);
    let lc = props % 9;
    props /= 9;
    let options = DecoderOptions::default()
        .with_literal_bits(lc, props % 5)
        .with_pos_bits(props / 5)
        .with_dict_size(u32::from_le_bytes([data[1], data[2], data[3], data[4]]));
    Some((options, &data[13..]))
}

fn encode(data: &[u8], preset: u32) -> Vec<u8> {
    let options = LzmaOptions::with_preset(preset);
    let mut writer =
        LzmaWriter::new_use_header(Vec::new(), &options, Some(data.len() as u64)).unwrap();
    writer.write_all(data).unwrap();
    writer.finish().unwrap()
}

/// Benchmark the liblzma-produced text fixture
fn bench_lorem(c: &mut Criterion) {
    let data = include_bytes!("../__fixtures__/lzma/lorem.lzma");
    let expected = include_bytes!("../__fixtures__/lzma/lorem.txt");
    let (options, compressed) = parse_alone(data).expect("Failed to parse");

    let mut group = c.benchmark_group("decompress");
    group.throughput(Throughput::Bytes(expected.len() as u64));

    group.bench_function("lorem", |b| {
        b.iter(|| {
            let mut decoder = LzmaDecoder::new(options).unwrap();
            let result = decoder.decompress(black_box(compressed), expected.len());
            black_box(result)
        });
    });

    group.finish();
}

/// Benchmark runs, noise and far copies
fn bench_mixed(c: &mut Criterion) {
    let data = include_bytes!("../__fixtures__/lzma/mixed.lzma");
    let expected = include_bytes!("../__fixtures__/lzma/mixed.bin");
    let (options, compressed) = parse_alone(data).expect("Failed to parse");

    let mut group = c.benchmark_group("decompress");
    group.throughput(Throughput::Bytes(expected.len() as u64));

    group.bench_function("mixed", |b| {
        let mut decoder = LzmaDecoder::new(options).unwrap();
        b.iter(|| {
            let result = decoder.decompress(black_box(compressed), expected.len());
            black_box(result)
        });
    });

    group.bench_function("mixed_streamed_4k", |b| {
        b.iter(|| {
            let mut decoder = StreamDecoder::new(options, expected.len()).unwrap();
            for chunk in black_box(compressed).chunks(4096) {
                decoder.feed(chunk).unwrap();
            }
            black_box(decoder.finish())
        });
    });

    group.finish();
}

/// Benchmark a large, highly compressible buffer (long rep0 copies)
fn bench_runs(c: &mut Criterion) {
    let raw: Vec<u8> = (0..4u8)
        .flat_map(|b| std::iter::repeat(b).take(1 << 20))
        .collect();
    let data = encode(&raw, 6);
    let (options, compressed) = parse_alone(&data).expect("Failed to parse");

    let mut group = c.benchmark_group("decompress");
    group.throughput(Throughput::Bytes(raw.len() as u64));

    group.bench_function("runs_4mb", |b| {
        b.iter(|| {
            let mut decoder = LzmaDecoder::new(options).unwrap();
            let result = decoder.decompress(black_box(compressed), raw.len());
            black_box(result)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_lorem, bench_mixed, bench_runs);
criterion_main!(benches);
