//! Research purchases: validation and effect application.

use tracing::info;

use crate::content::{ResearchDef, ResearchEffect, minerals_of_tier};
use crate::error::Rejection;
use crate::fabrication::{grant_node, refresh_flops_per_second};
use crate::id::ResearchId;
use crate::state::GameState;

/// Check everything `buy` requires, in the order a player would see it.
fn check(state: &GameState, id: ResearchId) -> Result<&'static ResearchDef, Rejection> {
    let def = id.def();
    if state.is_researched(id) {
        return Err(Rejection::AlreadyResearched(id));
    }
    if let Some(&missing) = def.requires.iter().find(|&&r| !state.is_researched(r)) {
        return Err(Rejection::PrerequisiteMissing {
            research: id,
            missing,
        });
    }
    if state.total_flops < def.cost() {
        return Err(Rejection::InsufficientFlops);
    }
    Ok(def)
}

/// Whether every prerequisite of `id` is completed.
pub fn prerequisites_met(state: &GameState, id: ResearchId) -> bool {
    id.def().requires.iter().all(|&r| state.is_researched(r))
}

/// False if completed, a prerequisite is missing, or FLOPS fall short.
pub fn can_buy(state: &GameState, id: ResearchId) -> bool {
    check(state, id).is_ok()
}

/// Research not yet completed whose prerequisites are met, in display order.
pub fn available(state: &GameState) -> Vec<ResearchId> {
    ResearchId::ALL
        .iter()
        .copied()
        .filter(|&id| !state.is_researched(id) && prerequisites_met(state, id))
        .collect()
}

/// Pay for `id` and apply all of its effects to one new snapshot.
pub fn buy(state: &GameState, id: ResearchId) -> Result<GameState, Rejection> {
    let def = check(state, id)?;

    let mut next = state.clone();
    next.total_flops = state.total_flops - def.cost();
    next.research.completed.push(id);
    next.research.total_spent += def.cost();
    for effect in def.effects {
        apply_effect(&mut next, effect);
    }
    info!(research = id.as_str(), cost = %def.cost(), "research completed");
    Ok(next)
}

fn apply_effect(state: &mut GameState, effect: &ResearchEffect) {
    match *effect {
        ResearchEffect::UnlockNode(node) => {
            grant_node(state, node);
        }
        ResearchEffect::UnlockMinerals { tier } => {
            for mineral in minerals_of_tier(tier) {
                state.minerals[mineral].unlocked = true;
            }
        }
        ResearchEffect::MiningMultiplier(v) => state.mining_multiplier *= v,
        ResearchEffect::FabSpeedMultiplier(v) => state.fab_speed_multiplier *= v,
        ResearchEffect::FlopsMultiplier(v) => {
            state.flops_multiplier *= v;
            refresh_flops_per_second(state);
        }
        ResearchEffect::UnlockFeature(feature) => {
            state.features.insert(feature);
        }
    }
}
