//! Calculator and dispatcher benchmarks
//!
//! Run with: cargo bench -p rfcalc-core --bench calc_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rfcalc_core::erlang::{erlang_b, max_offered_traffic, required_channels};
use rfcalc_core::prelude::*;
use serde_json::{json, Map, Value};

fn scenario_data() -> Map<String, Value> {
    let data = json!({
        "distance": 12.5, "frequency": 2400, "tx_gain": 14, "rx_gain": 3,
        "bandwidth": 180, "subcarrierSpacing": 15, "modulation": "64",
        "numSymbols": 14, "duration_of_RB": 500, "parallelRB": 50,
        "quantBits": 12, "sourceEncoderRate": 0.6, "channelEncoderRate": 0.5,
        "burstLength": 1.25, "area": 100, "cell_radius": 1, "reuse_factor": 7,
        "channel_bandwidth": 0.2, "spectral_efficiency": 2, "subscribers": 10000,
        "calls_per_day": 3, "call_duration": 2, "gos": 0.02, "snr_db": 15,
    });
    data.as_object().cloned().unwrap_or_default()
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let data = scenario_data();

    for scenario in Scenario::ALL {
        group.bench_with_input(BenchmarkId::new("compute", scenario), &scenario, |b, s| {
            b.iter(|| compute(black_box(*s), black_box(&data)))
        });
    }

    group.bench_function("compute_and_prompt", |b| {
        b.iter(|| {
            let output = compute(Scenario::Cellular, black_box(&data)).ok()?;
            Some(explanation_prompt(&data, &output))
        })
    });

    group.finish();
}

fn bench_erlang(c: &mut Criterion) {
    let mut group = c.benchmark_group("erlang_b");

    for channels in [10u64, 100, 1000] {
        let traffic = channels as f64 * 0.8;
        group.bench_with_input(BenchmarkId::new("blocking", channels), &channels, |b, &n| {
            b.iter(|| erlang_b(black_box(traffic), n))
        });
        group.bench_with_input(BenchmarkId::new("max_traffic", channels), &channels, |b, &n| {
            b.iter(|| max_offered_traffic(black_box(n), 0.02))
        });
    }

    group.bench_function("required_channels", |b| {
        b.iter(|| required_channels(black_box(250.0), 0.01))
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_erlang);
criterion_main!(benches);
