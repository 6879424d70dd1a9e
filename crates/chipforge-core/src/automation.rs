//! Auto-miner purchases, passive production, and offline catch-up.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::big::Big;
use crate::content::NEXT_TIER_THRESHOLD;
use crate::error::Rejection;
use crate::id::{AutoMinerId, Feature, MineralId};
use crate::sim::{Millis, elapsed_secs};
use crate::state::{GameState, OfflineProgress};

// ---------------------------------------------------------------------------
// Purchases
// ---------------------------------------------------------------------------

/// Silicon price of the next unit: `base × multiplier^owned`.
pub fn auto_miner_cost(state: &GameState, id: AutoMinerId) -> Big {
    let def = id.def();
    let owned = state.auto_miners[id].owned;
    def.base_cost() * Big::from_f64(def.cost_multiplier).powi(owned)
}

fn check_purchase(state: &GameState, id: AutoMinerId) -> Result<Big, Rejection> {
    if !state.has_feature(Feature::AutoMiner) {
        return Err(Rejection::AutoMiningLocked);
    }
    if !state.auto_miners[id].unlocked {
        return Err(Rejection::MinerLocked(id));
    }
    let cost = auto_miner_cost(state, id);
    if state.minerals[MineralId::Silicon].amount < cost {
        return Err(Rejection::InsufficientSilicon);
    }
    Ok(cost)
}

pub fn can_buy_auto_miner(state: &GameState, id: AutoMinerId) -> bool {
    check_purchase(state, id).is_ok()
}

/// Pay silicon for one more unit. Reaching the tier threshold unlocks the
/// next tier for good.
pub fn buy_auto_miner(state: &GameState, id: AutoMinerId) -> Result<GameState, Rejection> {
    let cost = check_purchase(state, id)?;

    let mut next = state.clone();
    if !next.minerals[MineralId::Silicon].debit(cost) {
        return Err(Rejection::InsufficientSilicon);
    }
    let miner = &mut next.auto_miners[id];
    miner.owned += 1;
    if miner.owned >= NEXT_TIER_THRESHOLD {
        if let Some(tier) = id.next() {
            next.auto_miners[tier].unlocked = true;
        }
    }
    Ok(next)
}

// ---------------------------------------------------------------------------
// Passive production
// ---------------------------------------------------------------------------

/// Minerals produced by owned auto-miners over `secs` seconds. Every target
/// receives the full rate. Locked minerals and an un-researched auto-miner
/// feature produce nothing.
pub fn mining_production(state: &GameState, secs: f64) -> BTreeMap<MineralId, Big> {
    let mut produced = BTreeMap::new();
    if !state.has_feature(Feature::AutoMiner) || secs <= 0.0 {
        return produced;
    }
    for (id, miner) in state.auto_miners.iter() {
        if miner.owned == 0 {
            continue;
        }
        let def = id.def();
        let qty = def.rate_per_second() * Big::from(miner.owned) * (secs * state.mining_multiplier);
        for &mineral in def.targets {
            if state.minerals[mineral].unlocked {
                *produced.entry(mineral).or_insert(Big::ZERO) += qty;
            }
        }
    }
    produced
}

pub(crate) fn credit_minerals(state: &mut GameState, produced: &BTreeMap<MineralId, Big>) {
    for (&mineral, &qty) in produced {
        state.minerals[mineral].credit(qty);
    }
}

/// Run auto-miners for `secs` seconds.
pub fn auto_mine(state: &GameState, secs: f64) -> GameState {
    let mut next = state.clone();
    credit_minerals(&mut next, &mining_production(state, secs));
    next
}

// ---------------------------------------------------------------------------
// Offline catch-up
// ---------------------------------------------------------------------------

/// What `secs` seconds away would have produced, without applying it.
pub fn calculate_offline_progress(state: &GameState, secs: f64) -> OfflineProgress {
    OfflineProgress {
        minerals: mining_production(state, secs),
        flops: state.flops_per_second * secs.max(0.0),
        duration_secs: secs.max(0.0),
    }
}

/// On return from an absence longer than `threshold_secs`, record the
/// offline summary (merged into any unclaimed one) and move `last_tick` to
/// `now`. Shorter gaps are left for the regular tick. An absence that
/// produced nothing only moves `last_tick`.
pub fn resume(state: &GameState, now: Millis, threshold_secs: f64) -> Result<GameState, Rejection> {
    let secs = elapsed_secs(state.last_tick, now);
    if secs <= threshold_secs {
        return Err(Rejection::TooSoon {
            elapsed_secs: secs,
            min_secs: threshold_secs,
        });
    }

    let progress = calculate_offline_progress(state, secs);
    let mut next = state.clone();
    next.last_tick = now;
    if progress.is_empty() {
        debug!(duration_secs = secs, "nothing produced while away");
        return Ok(next);
    }
    info!(
        duration_secs = secs,
        flops = %progress.flops,
        "offline progress computed"
    );
    match next.offline_progress.as_mut() {
        Some(pending) => pending.merge(&progress),
        None => next.offline_progress = Some(progress),
    }
    Ok(next)
}

/// Claim the pending offline summary into live state.
pub fn dismiss_offline_progress(state: &GameState) -> Result<GameState, Rejection> {
    let progress = state
        .offline_progress
        .as_ref()
        .ok_or(Rejection::NoOfflineProgress)?;
    let mut next = state.clone();
    credit_minerals(&mut next, &progress.minerals);
    next.total_flops += progress.flops;
    next.offline_progress = None;
    Ok(next)
}
