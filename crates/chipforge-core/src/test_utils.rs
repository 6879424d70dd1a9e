//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::big::Big;
use crate::config::EngineConfig;
use crate::engine::Game;
use crate::fabrication::{self, refresh_flops_per_second};
use crate::id::{AutoMinerId, ChipId, Feature, ResearchId, WaferId};
use crate::research;
use crate::automation;
use crate::sim::{ManualClock, Millis};
use crate::state::GameState;

// ===========================================================================
// Stock helpers
// ===========================================================================

/// Credit `qty` of every mineral, locked ones included.
pub fn give_minerals(state: &mut GameState, qty: f64) {
    for (_, stock) in state.minerals.iter_mut() {
        stock.credit(Big::from_f64(qty));
    }
}

/// Credit `qty` of every wafer.
pub fn give_wafers(state: &mut GameState, qty: f64) {
    for (_, stock) in state.wafers.iter_mut() {
        stock.credit(Big::from_f64(qty));
    }
}

/// Credit `qty` of one chip and refresh the FLOPS/s cache.
pub fn give_chips(state: &mut GameState, chip: ChipId, qty: f64) {
    state.chips[chip].credit(Big::from_f64(qty));
    refresh_flops_per_second(state);
}

pub fn with_feature(mut state: GameState, feature: Feature) -> GameState {
    state.features.insert(feature);
    state
}

// ===========================================================================
// State builders
// ===========================================================================

/// Buy each research in order, funding each purchase exactly.
pub fn researched(mut state: GameState, ids: &[ResearchId]) -> GameState {
    for &id in ids {
        state.total_flops += id.def().cost();
        state = research::buy(&state, id).expect("research should be buyable");
    }
    state
}

/// Every research bought, from a fresh game at time 0.
pub fn all_research() -> GameState {
    researched(GameState::new(0), ResearchId::ALL)
}

/// A mid-game snapshot that touches every field: research, features,
/// auto-miners, an active job with a queue behind it, owned chips, a huge
/// FLOPS pool, and an unclaimed offline summary.
pub fn progressed_state() -> GameState {
    let mut state = GameState::new(1_000);
    give_minerals(&mut state, 1e6);
    give_wafers(&mut state, 50.0);
    let mut state = researched(
        state,
        &[
            ResearchId::Mining2x,
            ResearchId::Node65nm,
            ResearchId::AutoMiner,
            ResearchId::AutoFab,
            ResearchId::FlopsMult2x,
        ],
    );
    state = automation::buy_auto_miner(&state, AutoMinerId::Drill1).expect("drill affordable");
    give_chips(&mut state, ChipId::CpuBasic, 3.0);
    state = fabrication::start_craft_chip(&state, ChipId::CpuBasic, 2, 2_000)
        .expect("chip affordable");
    state = fabrication::start_craft_wafer(&state, WaferId::Basic, 1, 2_000)
        .expect("wafer queues behind the chip");
    state.total_flops = "1.5e300".parse().expect("valid big");
    state.last_tick = 2_000;
    state.offline_progress = Some(automation::calculate_offline_progress(&state, 90.0));
    state
}

// ===========================================================================
// Game helpers
// ===========================================================================

/// A fresh game on a manual clock starting at `start`, plus a handle to the
/// clock.
pub fn manual_game(start: Millis) -> (Game<ManualClock>, ManualClock) {
    let clock = ManualClock::new(start);
    let game = Game::new(clock.clone(), EngineConfig::default());
    (game, clock)
}

/// Wrap a snapshot in a game on a manual clock at the snapshot's
/// `last_tick`.
pub fn manual_game_with(state: GameState) -> (Game<ManualClock>, ManualClock) {
    let clock = ManualClock::new(state.last_tick);
    let game = Game::with_state(state, clock.clone(), EngineConfig::default());
    (game, clock)
}
