//! Wafer and chip fabrication: affordability, cost deduction, the crafting
//! job lifecycle, FLOPS aggregation, and sequential node unlocks.
//!
//! # Job lifecycle
//!
//! ```text
//!   Idle --start--> Active --complete--> Idle
//!                     |  \--complete--> Active (next queued job)
//!                     \--cancel-------> Idle | Active (next queued job)
//! ```
//!
//! Costs are paid in full when a job is accepted (started or queued).
//! Cancelling forfeits them.

use tracing::info;

use crate::big::Big;
use crate::error::Rejection;
use crate::id::{ChipId, Feature, MineralId, ProcessNode, WaferId};
use crate::sim::Millis;
use crate::state::{CraftTarget, CraftingJob, GameState, Ledger, QueuedCraft, Stock};

// ---------------------------------------------------------------------------
// Costs
// ---------------------------------------------------------------------------

fn scaled(per_unit: u32, amount: u32) -> Big {
    Big::from_f64(f64::from(per_unit) * f64::from(amount))
}

fn holds_all(minerals: &Ledger<MineralId, Stock>, costs: &[(MineralId, u32)], amount: u32) -> bool {
    costs
        .iter()
        .all(|&(id, n)| minerals[id].amount >= scaled(n, amount))
}

/// True iff every recipe mineral is held at `required × amount`.
pub fn can_craft_wafer(wafer: WaferId, minerals: &Ledger<MineralId, Stock>, amount: u32) -> bool {
    holds_all(minerals, wafer.def().recipe, amount)
}

/// True iff the wafers and extra minerals are held at `required × amount`
/// and `current_node` is at least the chip's node.
pub fn can_craft_chip(
    chip: ChipId,
    minerals: &Ledger<MineralId, Stock>,
    wafers: &Ledger<WaferId, Stock>,
    current_node: ProcessNode,
    amount: u32,
) -> bool {
    let def = chip.def();
    let (wafer, per_chip) = def.wafer_cost;
    current_node >= def.node
        && wafers[wafer].amount >= scaled(per_chip, amount)
        && holds_all(minerals, def.extra_costs, amount)
}

fn debit(stock: &mut Stock, per_unit: u32, amount: u32) -> Result<(), Rejection> {
    if stock.debit(scaled(per_unit, amount)) {
        Ok(())
    } else {
        Err(Rejection::InsufficientResources)
    }
}

/// Pay for `amount` units of `target`. Callers discard `state` on error.
fn deduct(state: &mut GameState, target: CraftTarget, amount: u32) -> Result<(), Rejection> {
    match target {
        CraftTarget::Wafer(id) => {
            for &(mineral, n) in id.def().recipe {
                debit(&mut state.minerals[mineral], n, amount)?;
            }
        }
        CraftTarget::Chip(id) => {
            let def = id.def();
            let (wafer, n) = def.wafer_cost;
            debit(&mut state.wafers[wafer], n, amount)?;
            for &(mineral, n) in def.extra_costs {
                debit(&mut state.minerals[mineral], n, amount)?;
            }
        }
    }
    Ok(())
}

/// `ceil(base × amount / fab speed)` in milliseconds.
pub fn craft_duration_ms(target: CraftTarget, amount: u32, fab_speed_multiplier: f64) -> u64 {
    let base = target.base_craft_time_ms() as f64 * f64::from(amount);
    if fab_speed_multiplier > 0.0 {
        (base / fab_speed_multiplier).ceil() as u64
    } else {
        base as u64
    }
}

// ---------------------------------------------------------------------------
// Starting and cancelling
// ---------------------------------------------------------------------------

/// Pay for and start (or, with auto-fab and a busy line, enqueue) a job.
pub fn start_craft(
    state: &GameState,
    target: CraftTarget,
    amount: u32,
    now: Millis,
) -> Result<GameState, Rejection> {
    if amount == 0 {
        return Err(Rejection::ZeroAmount);
    }
    let busy = state.crafting.is_some();
    if busy && !state.has_feature(Feature::AutoFab) {
        return Err(Rejection::CraftInProgress);
    }
    if let CraftTarget::Chip(chip) = target {
        let required = chip.def().node;
        if state.current_node < required {
            return Err(Rejection::NodeTooLow {
                required,
                current: state.current_node,
            });
        }
    }

    let mut next = state.clone();
    deduct(&mut next, target, amount)?;

    let duration_ms = craft_duration_ms(target, amount, state.fab_speed_multiplier);
    if busy {
        let id = next.next_queue_id;
        next.next_queue_id = id.checked_add(1).ok_or(Rejection::QueueIdsExhausted)?;
        next.craft_queue.push_back(QueuedCraft {
            id,
            target,
            amount,
            duration_ms,
        });
    } else {
        next.crafting = Some(CraftingJob {
            target,
            amount,
            started_at: now,
            duration_ms,
        });
    }
    Ok(next)
}

pub fn start_craft_wafer(
    state: &GameState,
    wafer: WaferId,
    amount: u32,
    now: Millis,
) -> Result<GameState, Rejection> {
    start_craft(state, CraftTarget::Wafer(wafer), amount, now)
}

pub fn start_craft_chip(
    state: &GameState,
    chip: ChipId,
    amount: u32,
    now: Millis,
) -> Result<GameState, Rejection> {
    start_craft(state, CraftTarget::Chip(chip), amount, now)
}

/// Drop the active job without refund. The next queued job, if any, starts
/// at `now`.
pub fn cancel_crafting(state: &GameState, now: Millis) -> Result<GameState, Rejection> {
    if state.crafting.is_none() {
        return Err(Rejection::NoActiveJob);
    }
    let mut next = state.clone();
    next.crafting = next.craft_queue.pop_front().map(|q| q.start(now));
    Ok(next)
}

/// Drop one queued job without refund.
pub fn cancel_queue_item(state: &GameState, id: u64) -> Result<GameState, Rejection> {
    let pos = state
        .craft_queue
        .iter()
        .position(|q| q.id == id)
        .ok_or(Rejection::QueueItemNotFound(id))?;
    let mut next = state.clone();
    next.craft_queue.remove(pos);
    Ok(next)
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

fn credit_output(state: &mut GameState, job: &CraftingJob) {
    let qty = Big::from(job.amount);
    match job.target {
        CraftTarget::Wafer(id) => state.wafers[id].credit(qty),
        CraftTarget::Chip(id) => state.chips[id].credit(qty),
    }
}

/// Finish every job due by `now`, chaining queued jobs back to back from
/// each predecessor's finish time. Returns the finished jobs in order.
pub(crate) fn settle_jobs(state: &mut GameState, now: Millis) -> Vec<CraftingJob> {
    let mut finished = Vec::new();
    while let Some(job) = state.crafting {
        if !job.is_complete(now) {
            break;
        }
        credit_output(state, &job);
        state.crafting = state
            .craft_queue
            .pop_front()
            .map(|q| q.start(job.finishes_at()));
        finished.push(job);
    }
    if finished
        .iter()
        .any(|job| matches!(job.target, CraftTarget::Chip(_)))
    {
        refresh_flops_per_second(state);
    }
    finished
}

/// Complete the active job (and any queued jobs that are also due).
pub fn complete_jobs(state: &GameState, now: Millis) -> Result<GameState, Rejection> {
    let job = state.crafting.ok_or(Rejection::NoActiveJob)?;
    if !job.is_complete(now) {
        return Err(Rejection::JobNotFinished);
    }
    let mut next = state.clone();
    settle_jobs(&mut next, now);
    Ok(next)
}

/// Progress of the active job in `[0, 1]`; 0 when idle.
pub fn crafting_progress(state: &GameState, now: Millis) -> f64 {
    state.crafting.map_or(0.0, |job| job.progress(now))
}

/// Milliseconds until the active job finishes.
pub fn crafting_remaining_ms(state: &GameState, now: Millis) -> Option<u64> {
    state.crafting.map(|job| job.remaining_ms(now))
}

// ---------------------------------------------------------------------------
// FLOPS
// ---------------------------------------------------------------------------

/// `Σ(chip rate × owned) × node efficiency × FLOPS multiplier`.
pub fn calculate_flops_per_second(
    chips: &Ledger<ChipId, Stock>,
    current_node: ProcessNode,
    flops_multiplier: f64,
) -> Big {
    let base: Big = chips
        .iter()
        .map(|(id, stock)| id.def().flops_per_second() * stock.amount)
        .sum();
    base * current_node.def().efficiency * flops_multiplier
}

pub(crate) fn refresh_flops_per_second(state: &mut GameState) {
    state.flops_per_second =
        calculate_flops_per_second(&state.chips, state.current_node, state.flops_multiplier);
}

// ---------------------------------------------------------------------------
// Process nodes
// ---------------------------------------------------------------------------

/// Make `node` available: record it, advance the current node, and unlock
/// its wafers and chips. Returns false if it was already unlocked.
pub(crate) fn grant_node(state: &mut GameState, node: ProcessNode) -> bool {
    if state.is_node_unlocked(node) {
        return false;
    }
    state.unlocked_nodes.push(node);
    if node > state.current_node {
        state.current_node = node;
    }
    let def = node.def();
    for &wafer in def.unlocks_wafers {
        state.wafers[wafer].unlocked = true;
    }
    for &chip in def.unlocks_chips {
        state.chips[chip].unlocked = true;
    }
    refresh_flops_per_second(state);
    info!(node = node.as_str(), "process node unlocked");
    true
}

/// Buy the next process node with FLOPS. Nodes unlock strictly in order on
/// this path.
pub fn unlock_node(state: &GameState, node: ProcessNode) -> Result<GameState, Rejection> {
    if state.is_node_unlocked(node) {
        return Err(Rejection::NodeAlreadyUnlocked(node));
    }
    if let Some(previous) = node.previous() {
        if !state.is_node_unlocked(previous) {
            return Err(Rejection::NodeOutOfOrder { node, previous });
        }
    }
    let remaining = state
        .total_flops
        .checked_sub(node.def().unlock_cost())
        .ok_or(Rejection::InsufficientFlops)?;

    let mut next = state.clone();
    next.total_flops = remaining;
    grant_node(&mut next, node);
    Ok(next)
}
