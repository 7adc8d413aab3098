//! Streamer benchmark: Measure the hot paths of the batching core.
//!
//! The interesting costs are the per-push lock traffic below the flush
//! threshold, the full push-drain-deliver cycle when the threshold fires,
//! and the raw drain itself.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use slipstream::{sink_fn, Streamer, StreamerConfig, TokenBuffer};
use std::time::Duration;

/// Interval long enough that the (unstarted) flush loop never interferes.
const IDLE: Duration = Duration::from_secs(3600);

fn push_below_capacity(c: &mut Criterion) {
    c.bench_function("push_below_capacity_100", |b| {
        b.iter_batched_ref(
            || {
                Streamer::with_config(StreamerConfig {
                    capacity: 1_000_000,
                    interval: IDLE,
                })
                .unwrap()
            },
            |streamer| {
                for _ in 0..100 {
                    streamer.push(black_box("token ")).unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

fn push_with_size_triggered_flush(c: &mut Criterion) {
    c.bench_function("push_flush_cycle_cap16_100", |b| {
        b.iter_batched_ref(
            || {
                let streamer = Streamer::with_config(StreamerConfig {
                    capacity: 16,
                    interval: IDLE,
                })
                .unwrap();
                streamer.set_sink(sink_fn(|batch| {
                    black_box(batch.len());
                }));
                streamer
            },
            |streamer| {
                for _ in 0..100 {
                    streamer.push(black_box("token ")).unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

fn buffer_drain(c: &mut Criterion) {
    c.bench_function("token_buffer_drain_64", |b| {
        b.iter_batched_ref(
            || {
                let mut buffer = TokenBuffer::new();
                for _ in 0..64 {
                    buffer.push("token ");
                }
                buffer
            },
            |buffer| black_box(buffer.drain_batch()),
            BatchSize::SmallInput,
        );
    });
}

fn full_text_snapshot(c: &mut Criterion) {
    let streamer = Streamer::with_config(StreamerConfig {
        capacity: 1_000_000,
        interval: IDLE,
    })
    .unwrap();
    for _ in 0..2000 {
        streamer.push("token ").unwrap();
    }

    c.bench_function("full_text_snapshot_12kb", |b| {
        b.iter(|| black_box(streamer.full_text()));
    });
}

criterion_group!(
    benches,
    push_below_capacity,
    push_with_size_triggered_flush,
    buffer_drain,
    full_text_snapshot,
);
criterion_main!(benches);
