//! # Filter Codec Benchmarks
//!
//! Encoded size depends on how many 64-bit words are neither all-zero nor
//! all-one, so the load factor drives both size and time:
//! - sparse filters (few keys) compress to little more than the flag blocks
//! - dense filters approach the full 1056-byte worst case

use bloom_multicast::{BloomFilter, PublicKey};
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use crate::support::random_keys;

fn filter_with(keys: &[PublicKey]) -> BloomFilter {
    let mut f = BloomFilter::new();
    for k in keys {
        f.insert(k.as_ref());
    }
    f
}

pub fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/encode");
    group.measurement_time(Duration::from_secs(5));

    for count in [0, 8, 64, 512, 4096] {
        let filter = filter_with(&random_keys(count));
        group.throughput(Throughput::Bytes(filter.encoded_len() as u64));
        group.bench_with_input(BenchmarkId::new("keys", count), &filter, |b, f| {
            b.iter(|| black_box(f.encode()))
        });
    }

    group.finish();
}

pub fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/decode");
    group.measurement_time(Duration::from_secs(5));

    for count in [0, 8, 64, 512, 4096] {
        let bytes = filter_with(&random_keys(count))
            .encode()
            .expect("encodes");
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("keys", count), &bytes, |b, data| {
            b.iter(|| black_box(BloomFilter::decode(data)))
        });
    }

    // Garbage must be rejected as cheaply as it is parsed.
    let garbage = vec![0xFFu8; 4096];
    group.bench_function("reject_conflicting_flags", |b| {
        b.iter(|| black_box(BloomFilter::decode(&garbage)))
    });

    group.finish();
}

pub fn bench_union(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/union");

    let a = filter_with(&random_keys(256));
    let b = filter_with(&random_keys(256));
    group.bench_function("union_with", |bench| {
        bench.iter(|| {
            let mut out = a.clone();
            out.union_with(black_box(&b));
            black_box(out)
        })
    });

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_encode(c);
    bench_decode(c);
    bench_union(c);
}
