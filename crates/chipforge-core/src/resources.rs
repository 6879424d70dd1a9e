//! Manual mining.

use crate::big::Big;
use crate::error::Rejection;
use crate::id::MineralId;
use crate::state::GameState;

/// Yield of one manual mine: `power × base rate × mining multiplier`.
pub fn mining_yield(state: &GameState, mineral: MineralId) -> Big {
    state.mining_power * mineral.def().base_rate() * state.mining_multiplier
}

/// Mine `mineral` once, crediting only that mineral.
pub fn mine(state: &GameState, mineral: MineralId) -> Result<GameState, Rejection> {
    if !state.minerals[mineral].unlocked {
        return Err(Rejection::MineralLocked(mineral));
    }
    let qty = mining_yield(state, mineral);
    let mut next = state.clone();
    next.minerals[mineral].credit(qty);
    Ok(next)
}

/// Unlock a single mineral outside the research path.
pub fn unlock_mineral(state: &GameState, mineral: MineralId) -> Result<GameState, Rejection> {
    if state.minerals[mineral].unlocked {
        return Err(Rejection::MineralAlreadyUnlocked(mineral));
    }
    let mut next = state.clone();
    next.minerals[mineral].unlocked = true;
    Ok(next)
}
