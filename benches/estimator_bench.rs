//! Benchmarks for compact-walker
//!
//! Run with: cargo bench

use compact_walker::estimate::{decide, estimate_reader};
use compact_walker::walker::queue::{FileQueue, FileTask};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::Cursor;

fn benchmark_estimate(c: &mut Criterion) {
    let text: Vec<u8> = b"GET /index.html 200 1532 \"Mozilla/5.0\"\n"
        .iter()
        .copied()
        .cycle()
        .take(1024 * 1024)
        .collect();
    let mut rng = fastrand::Rng::with_seed(7);
    let mut noise = vec![0u8; 1024 * 1024];
    rng.fill(&mut noise);

    c.bench_function("estimate_1mib_text", |b| {
        b.iter(|| black_box(estimate_reader(Cursor::new(&text), "bench").unwrap()))
    });

    c.bench_function("estimate_1mib_random", |b| {
        b.iter(|| black_box(estimate_reader(Cursor::new(&noise), "bench").unwrap()))
    });

    c.bench_function("decide", |b| {
        b.iter(|| black_box(decide(black_box(1_000_000), black_box(870_000))))
    });
}

fn benchmark_queue_operations(c: &mut Criterion) {
    let mut queue = FileQueue::new();
    let sender = queue.take_sender().unwrap();
    let receiver = queue.receiver();

    c.bench_function("queue_send_recv", |b| {
        b.iter(|| {
            sender.send(FileTask::new("/test/path/file.log")).unwrap();
            black_box(receiver.recv().unwrap());
        })
    });
}

criterion_group!(benches, benchmark_estimate, benchmark_queue_operations);
criterion_main!(benches);
