//! Criterion benchmarks for the Chipforge engine.
//!
//! Three benchmark groups:
//! - `tick`: one `advance` over a late-game snapshot with a busy craft queue
//! - `offline`: an eight-hour offline summary
//! - `serialization`: encode and decode of a mid-game save

use std::hint::black_box;

use chipforge_core::automation;
use chipforge_core::big::Big;
use chipforge_core::fabrication;
use chipforge_core::id::*;
use chipforge_core::migration::MigrationRegistry;
use chipforge_core::serialize;
use chipforge_core::sim;
use chipforge_core::state::GameState;
use chipforge_core::test_utils::*;
use criterion::{Criterion, criterion_group, criterion_main};

// ===========================================================================
// State builders
// ===========================================================================

/// Everything researched, every drill tier owned, chips of every kind, and
/// forty queued wafer jobs.
fn build_late_game() -> GameState {
    let mut state = all_research();
    for &miner in AutoMinerId::ALL {
        state.auto_miners[miner].owned = 25;
        state.auto_miners[miner].unlocked = true;
    }
    for &chip in ChipId::ALL {
        give_chips(&mut state, chip, 1_000.0);
    }
    give_minerals(&mut state, 1e9);
    for _ in 0..40 {
        state = fabrication::start_craft_wafer(&state, WaferId::Basic, 5, 0)
            .expect("auto-fab queues wafers");
    }
    state.total_flops = Big::new(1.0, 400);
    state
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    group.sample_size(50);

    let state = build_late_game();
    let mut now = 0;

    group.bench_function("late_game_100ms", |b| {
        b.iter(|| {
            now += 100;
            let next = sim::advance(black_box(&state), now, 0.1);
            black_box(next)
        });
    });

    group.finish();
}

fn bench_offline(c: &mut Criterion) {
    let mut group = c.benchmark_group("offline");
    group.sample_size(50);

    let state = build_late_game();

    group.bench_function("eight_hours", |b| {
        b.iter(|| automation::calculate_offline_progress(black_box(&state), 8.0 * 3_600.0));
    });

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");
    group.sample_size(30);

    let state = progressed_state();
    let blob = serialize::encode(&state).expect("encode");
    let registry = MigrationRegistry::standard();

    group.bench_function("encode", |b| {
        b.iter(|| serialize::encode(black_box(&state)));
    });
    group.bench_function("decode", |b| {
        b.iter(|| serialize::decode(black_box(&blob), 0, &registry));
    });

    group.finish();
}

criterion_group!(benches, bench_tick, bench_offline, bench_serialization);
criterion_main!(benches);
