//! Time: the clock abstraction and the tick transition.
//!
//! The host calls [`advance`] on a fixed wall-clock cadence. Each call folds
//! the real time elapsed since `last_tick` into the state:
//!
//! 1. **FLOPS** -- `flops_per_second × elapsed` added to the spendable pool.
//! 2. **Auto-mining** -- owned auto-miners credit their targets.
//! 3. **Crafting** -- every job due by `now` completes, queued jobs chaining
//!    from each predecessor's finish time.
//!
//! Production in step 1 uses the rate from before step 3, so chips finished
//! during a tick start producing on the next one.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::automation::{credit_minerals, mining_production};
use crate::big::Big;
use crate::error::Rejection;
use crate::fabrication::settle_jobs;
use crate::id::MineralId;
use crate::state::{CraftingJob, GameState};

/// Wall-clock milliseconds since the Unix epoch.
pub type Millis = u64;

/// Seconds from `from` to `to`; negative if the clock went backwards.
pub fn elapsed_secs(from: Millis, to: Millis) -> f64 {
    (to as f64 - from as f64) / 1000.0
}

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Millis;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Millis)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    pub fn set(&self, now: Millis) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance_ms((secs * 1000.0).round() as u64);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Tick
// ---------------------------------------------------------------------------

/// What one tick changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub elapsed_secs: f64,
    pub flops_gained: Big,
    pub mined: BTreeMap<MineralId, Big>,
    pub completed: Vec<CraftingJob>,
    /// The clock moved backwards; `last_tick` was reset with no production.
    pub resynced: bool,
}

/// Advance `state` to `now`.
///
/// Rejects with [`Rejection::TooSoon`] when less than `min_delta_secs` has
/// passed, leaving `last_tick` alone so the time is not lost.
pub fn advance(
    state: &GameState,
    now: Millis,
    min_delta_secs: f64,
) -> Result<(GameState, TickReport), Rejection> {
    let secs = elapsed_secs(state.last_tick, now);
    if secs < 0.0 {
        debug!(last_tick = state.last_tick, now, "clock moved backwards, resyncing");
        let mut next = state.clone();
        next.last_tick = now;
        let report = TickReport {
            resynced: true,
            ..TickReport::default()
        };
        return Ok((next, report));
    }
    if secs < min_delta_secs {
        return Err(Rejection::TooSoon {
            elapsed_secs: secs,
            min_secs: min_delta_secs,
        });
    }

    let mut next = state.clone();
    let flops_gained = state.flops_per_second * secs;
    next.total_flops += flops_gained;

    let mined = mining_production(state, secs);
    credit_minerals(&mut next, &mined);

    let completed = settle_jobs(&mut next, now);
    next.last_tick = now;

    let report = TickReport {
        elapsed_secs: secs,
        flops_gained,
        mined,
        completed,
        resynced: false,
    };
    Ok((next, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fabrication::start_craft_wafer;
    use crate::id::{AutoMinerId, Feature, WaferId};
    use crate::test_utils::{give_minerals, with_feature};

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new(1_000);
        let other = clock.clone();
        clock.advance_secs(1.5);
        assert_eq!(other.now(), 2_500);
        other.set(10);
        assert_eq!(clock.now(), 10);
    }

    #[test]
    fn short_delta_is_skipped() {
        let state = GameState::new(1_000);
        assert!(matches!(
            advance(&state, 1_050, 0.1),
            Err(Rejection::TooSoon { .. })
        ));
    }

    #[test]
    fn flops_accrue_over_elapsed_time() {
        let mut state = GameState::new(0);
        state.flops_per_second = Big::from(1_000);
        let (next, report) = advance(&state, 2_500, 0.1).unwrap();
        assert_eq!(next.total_flops, Big::from(2_500));
        assert_eq!(report.flops_gained, Big::from(2_500));
        assert_eq!(next.last_tick, 2_500);
    }

    #[test]
    fn backwards_clock_resyncs_without_production() {
        let mut state = GameState::new(10_000);
        state.flops_per_second = Big::from(1_000);
        let (next, report) = advance(&state, 5_000, 0.1).unwrap();
        assert!(report.resynced);
        assert_eq!(next.last_tick, 5_000);
        assert_eq!(next.total_flops, Big::ZERO);
    }

    #[test]
    fn tick_completes_jobs_and_produces() {
        let mut state = with_feature(GameState::new(0), Feature::AutoMiner);
        give_minerals(&mut state, 1_000.0);
        state.auto_miners[AutoMinerId::Drill1].owned = 1;
        state = start_craft_wafer(&state, WaferId::Basic, 1, 0).unwrap();

        let (next, report) = advance(&state, 2_000, 0.1).unwrap();
        assert_eq!(report.completed.len(), 1);
        assert_eq!(next.wafers[WaferId::Basic].amount, Big::ONE);
        // 1000 - 100 spent + 2 s of one drill.
        assert_eq!(next.minerals[MineralId::Silicon].amount, Big::from(902));
        assert!(next.crafting.is_none());
    }
}
