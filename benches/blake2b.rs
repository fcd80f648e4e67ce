use warden::hash::blake2b::{blake2b, blake2b_long};

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

pub fn bench_blake2b(c: &mut Criterion) {
    c.bench_function("blake2b-512 64 bytes", |b| {
        b.iter(|| blake2b(64, black_box(&[0u8; 64])))
    });

    c.bench_function("blake2b-512 16 KiB", |b| {
        let data = vec![0x5au8; 16 * 1024];
        b.iter(|| blake2b(64, black_box(&data)))
    });

    c.bench_function("blake2b-long 1024 bytes", |b| {
        b.iter(|| blake2b_long(1024, black_box(&[0u8; 72])))
    });
}

criterion_group!(benches, bench_blake2b);
criterion_main!(benches);
