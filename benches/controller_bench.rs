//! Performance benchmarks for the gate controller and authorization path.
//!
//! These benchmarks measure the per-cycle cost of the control logic to
//! ensure a full cycle stays far below the 500ms cycle period even on
//! small boards.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench controller_bench
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use boomgate_control::{AllowList, GateConfig, GateController, GateTimings, OccupancyMonitor};
use boomgate_core::{CredentialId, DistanceSample};

/// Build an allow list of the given size plus one known member.
fn allow_list_of(size: u32) -> (AllowList, CredentialId) {
    let member = CredentialId::new([0x03, 0x0C, 0x49, 0x16]);
    let mut entries: Vec<CredentialId> = (0..size.saturating_sub(1))
        .map(|i| CredentialId::new(i.to_be_bytes()))
        .collect();
    entries.push(member);
    (AllowList::new(entries).unwrap(), member)
}

/// Config whose settle windows elapse immediately, so a full open/close
/// cycle runs without sleeping.
fn instant_config() -> GateConfig {
    GateConfig::new(
        12.0,
        GateTimings {
            open_settle: Duration::ZERO,
            close_delay: Duration::ZERO,
        },
    )
    .unwrap()
}

/// Benchmark allow-list lookup for hits and misses.
///
/// The comparison is constant-time per entry, so cost should scale
/// linearly with list size and be identical for hit and miss.
fn bench_authorization(c: &mut Criterion) {
    let mut group = c.benchmark_group("authorization");
    group.throughput(Throughput::Elements(1));

    for size in [1u32, 16, 128] {
        let (list, member) = allow_list_of(size);
        let stranger = CredentialId::new([0xDE, 0xAD, 0xBE, 0xEF]);

        group.bench_with_input(BenchmarkId::new("hit", size), &list, |b, list| {
            b.iter(|| black_box(list.is_authorized(black_box(&member))));
        });
        group.bench_with_input(BenchmarkId::new("miss", size), &list, |b, list| {
            b.iter(|| black_box(list.is_authorized(black_box(&stranger))));
        });
    }

    group.finish();
}

/// Benchmark one complete vehicle entry through the state machine.
///
/// Covers scan, both deadline ticks and the close-triggering sample, the
/// exact sequence the node runs per entry.
fn bench_full_entry_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_entry_cycle");
    group.throughput(Throughput::Elements(1));

    let sample = DistanceSample::from_cm(8.0).unwrap();

    group.bench_function("scan_to_close", |b| {
        let mut gate = GateController::with_config(instant_config());
        b.iter(|| {
            black_box(gate.on_scan(black_box(true)));
            black_box(gate.tick());
            black_box(gate.on_distance(black_box(sample)));
            black_box(gate.tick());
        });
    });

    group.finish();
}

/// Benchmark the idle-cycle inputs: samples and ticks that change nothing.
///
/// These run every 500ms for the lifetime of the node, so they dominate
/// the steady-state cost.
fn bench_idle_inputs(c: &mut Criterion) {
    let mut group = c.benchmark_group("idle_inputs");
    group.throughput(Throughput::Elements(1));

    let far = DistanceSample::from_cm(120.0).unwrap();

    group.bench_function("tick_while_closed", |b| {
        let mut gate = GateController::new();
        b.iter(|| black_box(gate.tick()));
    });

    group.bench_function("far_sample_while_open", |b| {
        let mut gate = GateController::with_config(instant_config());
        gate.on_scan(true);
        gate.tick();
        b.iter(|| black_box(gate.on_distance(black_box(far))));
    });

    group.bench_function("no_echo_while_open", |b| {
        let mut gate = GateController::with_config(instant_config());
        gate.on_scan(true);
        gate.tick();
        b.iter(|| black_box(gate.on_distance(black_box(DistanceSample::NoEcho))));
    });

    group.finish();
}

/// Benchmark classifying one set of pad readings into a snapshot.
fn bench_occupancy_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("occupancy_classify");
    group.throughput(Throughput::Elements(1));

    let monitor = OccupancyMonitor::default();

    let readings = [
        ("all_free", [0u16, 0, 0]),
        ("mixed", [100, 600, 100]),
        ("all_occupied", [1023, 1023, 1023]),
    ];

    for (name, raw) in readings {
        group.bench_function(name, |b| {
            b.iter(|| black_box(monitor.classify(black_box(raw))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_authorization,
    bench_full_entry_cycle,
    bench_idle_inputs,
    bench_occupancy_classify,
);

criterion_main!(benches);
