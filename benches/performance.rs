//! Performance benchmarks for the game load tester
//!
//! The codec and the aggregator sit on every message's hot path; these
//! benchmarks keep their per-call cost visible.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use game_load_tester::{
    cli::Cli,
    models::{Config, RunReport},
    output::OutputFormatterFactory,
    protocol::{decode_kind, encode_move, encode_move_with, encode_state_request, MoveMessage},
    stats::StatsAggregator,
    types::TrackedKind,
};
use chrono::Utc;
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

/// Benchmark frame encoding and decoding
fn benchmark_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    group.bench_function("encode_move_thread_rng", |b| {
        b.iter(|| black_box(encode_move()));
    });

    group.bench_function("encode_move_seeded", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| black_box(encode_move_with(&mut rng)));
    });

    group.bench_function("encode_state_request", |b| {
        b.iter(|| black_box(encode_state_request()));
    });

    group.bench_function("decode_kind", |b| {
        let frame = encode_move();
        b.iter(|| black_box(decode_kind(black_box(&frame))));
    });

    group.bench_function("decode_move", |b| {
        let frame = encode_move();
        b.iter(|| black_box(MoveMessage::decode(black_box(&frame))));
    });

    group.finish();
}

/// Benchmark aggregator updates, uncontended and from many threads
fn benchmark_aggregator(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregator");

    group.bench_function("record_sent_and_received", |b| {
        let stats = StatsAggregator::new();
        b.iter(|| {
            stats.record_sent(TrackedKind::State);
            stats.record_received(TrackedKind::State);
            stats.record_latency(TrackedKind::State, black_box(Duration::from_micros(250)));
        });
    });

    group.bench_function("snapshot", |b| {
        let stats = StatsAggregator::new();
        stats.record_sent(TrackedKind::Move);
        b.iter(|| black_box(stats.snapshot()));
    });

    for threads in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::new("contended_increments", threads), &threads, |b, &threads| {
            b.iter(|| {
                let stats = Arc::new(StatsAggregator::new());
                let workers: Vec<_> = (0..threads)
                    .map(|_| {
                        let stats = stats.clone();
                        std::thread::spawn(move || {
                            for _ in 0..1_000 {
                                stats.record_sent(TrackedKind::Move);
                            }
                        })
                    })
                    .collect();
                for worker in workers {
                    worker.join().unwrap();
                }
                black_box(stats.snapshot())
            });
        });
    }

    group.finish();
}

/// Benchmark configuration and report handling around a run
fn benchmark_run_setup(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_setup");

    group.bench_function("parse_cli_args", |b| {
        let args = ["glt", "--endpoint", "ws://127.0.0.1:8080", "--clients", "500", "--rate", "20"];
        b.iter(|| black_box(Cli::try_parse_from(black_box(args)).unwrap()));
    });

    group.bench_function("validate_config", |b| {
        let config = Config::default();
        b.iter(|| black_box(config.validate()));
    });

    group.bench_function("format_report", |b| {
        let stats = StatsAggregator::new();
        for _ in 0..1_000 {
            stats.record_sent(TrackedKind::Move);
            stats.record_sent(TrackedKind::State);
            stats.record_received(TrackedKind::State);
            stats.record_latency(TrackedKind::State, Duration::from_micros(900));
        }
        let report = RunReport::from_snapshot("ws://127.0.0.1:8080", Utc::now(), Duration::from_secs(30), 100, &stats.snapshot());
        let formatter = OutputFormatterFactory::create_formatter(false, false);
        b.iter(|| black_box(formatter.format_report(&report).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, benchmark_codec, benchmark_aggregator, benchmark_run_setup);

criterion_main!(benches);
