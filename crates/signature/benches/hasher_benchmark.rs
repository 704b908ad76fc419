//! crates/signature/benches/hasher_benchmark.rs
//!
//! Pooled versus sequential signature generation over an in-memory stream.
//!
//! Run with: `cargo bench -p signature`

use std::io::{Cursor, sink};
use std::num::NonZeroUsize;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use checksums::Crc32Algorithm;
use signature::{HasherConfig, hash_stream, hash_stream_sequential};

const INPUT_LEN: usize = 16 << 20;

fn bench_block_sizes(c: &mut Criterion) {
    let data = test_support::patterned_data(INPUT_LEN, 42);
    let mut group = c.benchmark_group("signature_block_size");
    group.throughput(Throughput::Bytes(INPUT_LEN as u64));
    group.sample_size(20);

    for block in [64 << 10, 1 << 20, 4 << 20] {
        let block_size = NonZeroUsize::new(block).expect("non-zero");
        let config = HasherConfig::new().with_block_size(block_size);

        group.bench_with_input(BenchmarkId::new("pooled", block), &data, |b, data| {
            b.iter(|| {
                hash_stream(Cursor::new(black_box(data)), sink(), config, &Crc32Algorithm)
                    .expect("pooled run")
            });
        });
        group.bench_with_input(BenchmarkId::new("sequential", block), &data, |b, data| {
            b.iter(|| {
                hash_stream_sequential(
                    Cursor::new(black_box(data)),
                    sink(),
                    block_size,
                    &Crc32Algorithm,
                )
                .expect("sequential run")
            });
        });
    }

    group.finish();
}

fn bench_worker_counts(c: &mut Criterion) {
    let data = test_support::patterned_data(INPUT_LEN, 7);
    let mut group = c.benchmark_group("signature_workers");
    group.throughput(Throughput::Bytes(INPUT_LEN as u64));
    group.sample_size(20);

    for workers in [1, 2, 4, 8] {
        let config = HasherConfig::new()
            .with_block_size(NonZeroUsize::new(256 << 10).expect("non-zero"))
            .with_workers(NonZeroUsize::new(workers).expect("non-zero"));

        group.bench_with_input(BenchmarkId::from_parameter(workers), &data, |b, data| {
            b.iter(|| {
                hash_stream(Cursor::new(black_box(data)), sink(), config, &Crc32Algorithm)
                    .expect("pooled run")
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_block_sizes, bench_worker_counts);
criterion_main!(benches);
