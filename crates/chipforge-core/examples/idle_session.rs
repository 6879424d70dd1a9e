//! Headless idle session: mine, fabricate, research, and automate on a
//! simulated clock, then save, step away, and come back.
//!
//! Run with `RUST_LOG=chipforge_core=debug` to see rejected actions.

use chipforge_core::config::EngineConfig;
use chipforge_core::engine::Game;
use chipforge_core::format::{format_flops, format_number};
use chipforge_core::id::*;
use chipforge_core::migration::MigrationRegistry;
use chipforge_core::sim::ManualClock;
use chipforge_core::storage::MemoryStorage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let clock = ManualClock::new(0);
    let mut storage = MemoryStorage::new();
    let config = EngineConfig::default();
    let mut game = Game::new(clock.clone(), config.clone());

    // Click until the first wafer is affordable.
    while !game.can_craft_wafer(WaferId::Basic, 1) {
        for mineral in [MineralId::Silicon, MineralId::Copper, MineralId::Aluminum] {
            game.mine(mineral);
        }
        clock.advance_ms(config.tick_interval_ms);
        game.tick();
    }
    game.start_craft_wafer(WaferId::Basic, 1);

    // Let the fab work, then turn the wafer into a chip.
    for _ in 0..30 {
        clock.advance_ms(config.tick_interval_ms);
        game.tick();
    }
    game.start_craft_chip(ChipId::CpuBasic, 1);
    for _ in 0..40 {
        clock.advance_ms(config.tick_interval_ms);
        game.tick();
    }

    let state = game.state();
    println!(
        "after {}s: {} silicon, {} chips, {}",
        state.last_tick / 1_000,
        format_number(state.minerals[MineralId::Silicon].amount),
        format_number(state.chips[ChipId::CpuBasic].amount),
        format_flops(state.flops_per_second),
    );

    if let Err(err) = game.save(&mut storage) {
        tracing::error!("save failed: {err}");
        std::process::exit(1);
    }

    // Come back after a day.
    clock.advance_secs(24.0 * 3_600.0);
    let mut game = Game::load(&mut storage, clock.clone(), config, &MigrationRegistry::standard());
    if let Some(progress) = game.offline_progress() {
        println!(
            "welcome back: {} earned over {:.0}s",
            format_number(progress.flops),
            progress.duration_secs,
        );
    }
    game.dismiss_offline_progress();

    if game.buy_research(ResearchId::Mining2x) {
        println!("researched {}", ResearchId::Mining2x.def().name);
    }
    for event in game.drain_events() {
        println!("event: {event:?}");
    }
    println!("total: {}", format_number(game.state().total_flops));
}
