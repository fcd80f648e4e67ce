use warden::derivation::argon2::{Argon2, Argon2Config};

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn config(memory_cost: u32, threads: u32) -> Argon2Config {
    Argon2Config {
        memory_cost,
        time_cost: 3,
        lanes: 4,
        threads,
        ..Argon2Config::with_password(b"password", b"somesaltsomesalt")
    }
}

pub fn bench_argon2(c: &mut Criterion) {
    let mut group = c.benchmark_group("argon2id");
    group.sample_size(10);

    for (name, memory_cost, threads) in [
        ("1 MiB, 1 thread", 1024, 1),
        ("16 MiB, 1 thread", 16 * 1024, 1),
        ("16 MiB, 4 threads", 16 * 1024, 4),
    ] {
        group.bench_function(name, |b| {
            let mut engine = Argon2::new(config(memory_cost, threads)).unwrap();
            b.iter(|| black_box(engine.hash().unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_argon2);
criterion_main!(benches);
