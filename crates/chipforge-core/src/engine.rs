//! The game store: owns the snapshot and applies actions in place.
//!
//! [`Game`] wraps the pure transitions of the other modules for hosts that
//! want a mutable object. Each action reads the clock, runs the transition,
//! and either swaps in the new snapshot or logs the [`Rejection`] at debug
//! level and leaves everything untouched. Actions report which happened with
//! a `bool`; callers that need the reason use the pure functions directly.
//!
//! Accepted actions record [`GameEvent`]s that the host drains.

use tracing::{debug, info, warn};

use crate::automation;
use crate::big::Big;
use crate::config::EngineConfig;
use crate::error::Rejection;
use crate::event::{EventKind, EventLog, GameEvent};
use crate::fabrication;
use crate::id::{AutoMinerId, ChipId, MineralId, ProcessNode, ResearchId, WaferId};
use crate::migration::MigrationRegistry;
use crate::research;
use crate::resources;
use crate::serialize::{self, SnapshotError};
use crate::sim::{self, Clock, Millis, SystemClock, TickReport, elapsed_secs};
use crate::state::{CraftTarget, GameState, OfflineProgress};
use crate::storage::{SaveStorage, StorageError};

/// Failure to persist the current snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Game<C: Clock = SystemClock> {
    state: GameState,
    clock: C,
    config: EngineConfig,
    events: EventLog,
    /// When the snapshot was last written, for the autosave cadence.
    last_save: Millis,
}

impl<C: Clock> Game<C> {
    /// A fresh game starting at the clock's current time.
    pub fn new(clock: C, config: EngineConfig) -> Self {
        let now = clock.now();
        let state = fresh_state(now, &config);
        Self {
            state,
            clock,
            config,
            events: EventLog::new(),
            last_save: now,
        }
    }

    /// Wrap an existing snapshot.
    pub fn with_state(state: GameState, clock: C, config: EngineConfig) -> Self {
        let last_save = clock.now();
        Self {
            state,
            clock,
            config,
            events: EventLog::new(),
            last_save,
        }
    }

    /// Load the save under the configured key and resume from it.
    ///
    /// A missing save starts a fresh game. An unreadable or undecodable one
    /// is logged and discarded.
    pub fn load(
        storage: &mut impl SaveStorage,
        clock: C,
        config: EngineConfig,
        migrations: &MigrationRegistry,
    ) -> Self {
        let now = clock.now();
        let restored = match storage.read(&config.save_key) {
            Ok(Some(blob)) => match serialize::decode(&blob, now, migrations) {
                Ok(state) => Some(state),
                Err(err) => {
                    warn!(key = %config.save_key, %err, "discarding unreadable save");
                    if let Err(err) = storage.remove(&config.save_key) {
                        warn!(key = %config.save_key, %err, "failed to remove unreadable save");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(key = %config.save_key, %err, "save storage failed, starting fresh");
                None
            }
        };
        let mut game = match restored {
            Some(state) => Self::with_state(state, clock, config),
            None => Self::new(clock, config),
        };
        game.resume();
        game
    }

    fn now(&self) -> Millis {
        self.clock.now()
    }

    /// Swap in `result` if the transition was accepted.
    fn commit(&mut self, action: &'static str, result: Result<GameState, Rejection>) -> bool {
        match result {
            Ok(next) => {
                self.state = next;
                true
            }
            Err(reason) => {
                debug!(action, %reason, "action rejected");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Resources
    // -----------------------------------------------------------------------

    pub fn mine(&mut self, mineral: MineralId) -> bool {
        let amount = resources::mining_yield(&self.state, mineral);
        let result = resources::mine(&self.state, mineral);
        let accepted = self.commit("mine", result);
        if accepted {
            self.events.push(GameEvent::Mined { mineral, amount });
        }
        accepted
    }

    pub fn unlock_mineral(&mut self, mineral: MineralId) -> bool {
        let result = resources::unlock_mineral(&self.state, mineral);
        let accepted = self.commit("unlock_mineral", result);
        if accepted {
            self.events.push(GameEvent::MineralUnlocked { mineral });
        }
        accepted
    }

    // -----------------------------------------------------------------------
    // Fabrication
    // -----------------------------------------------------------------------

    fn start_craft(&mut self, target: CraftTarget, amount: u32) -> bool {
        let queue_id = self.state.next_queue_id;
        let busy = self.state.is_crafting();
        let result = fabrication::start_craft(&self.state, target, amount, self.now());
        if !self.commit("start_craft", result) {
            return false;
        }
        let event = if busy {
            GameEvent::CraftQueued {
                id: queue_id,
                target,
                amount,
            }
        } else {
            GameEvent::CraftStarted { target, amount }
        };
        self.events.push(event);
        true
    }

    pub fn start_craft_wafer(&mut self, wafer: WaferId, amount: u32) -> bool {
        self.start_craft(CraftTarget::Wafer(wafer), amount)
    }

    pub fn start_craft_chip(&mut self, chip: ChipId, amount: u32) -> bool {
        self.start_craft(CraftTarget::Chip(chip), amount)
    }

    /// Abandon the active job; its costs are not refunded.
    pub fn cancel_crafting(&mut self) -> bool {
        let Some(job) = self.state.crafting else {
            debug!(action = "cancel_crafting", "no active job");
            return false;
        };
        let result = fabrication::cancel_crafting(&self.state, self.now());
        let accepted = self.commit("cancel_crafting", result);
        if accepted {
            self.events.push(GameEvent::CraftCancelled {
                target: job.target,
                amount: job.amount,
            });
        }
        accepted
    }

    pub fn cancel_queue_item(&mut self, id: u64) -> bool {
        let result = fabrication::cancel_queue_item(&self.state, id);
        let accepted = self.commit("cancel_queue_item", result);
        if accepted {
            self.events.push(GameEvent::QueueItemCancelled { id });
        }
        accepted
    }

    /// Buy the next process node with FLOPS.
    pub fn unlock_node(&mut self, node: ProcessNode) -> bool {
        let result = fabrication::unlock_node(&self.state, node);
        let accepted = self.commit("unlock_node", result);
        if accepted {
            self.events.push(GameEvent::NodeUnlocked { node });
        }
        accepted
    }

    // -----------------------------------------------------------------------
    // Progression
    // -----------------------------------------------------------------------

    pub fn buy_research(&mut self, id: ResearchId) -> bool {
        let nodes_before = self.state.unlocked_nodes.len();
        let result = research::buy(&self.state, id);
        if !self.commit("buy_research", result) {
            return false;
        }
        self.events.push(GameEvent::ResearchCompleted { research: id });
        let gained: Vec<ProcessNode> = self.state.unlocked_nodes[nodes_before..].to_vec();
        for node in gained {
            self.events.push(GameEvent::NodeUnlocked { node });
        }
        true
    }

    pub fn buy_auto_miner(&mut self, miner: AutoMinerId) -> bool {
        let result = automation::buy_auto_miner(&self.state, miner);
        let accepted = self.commit("buy_auto_miner", result);
        if accepted {
            let owned = self.state.auto_miners[miner].owned;
            self.events.push(GameEvent::AutoMinerBought { miner, owned });
        }
        accepted
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// Fold the time since the last tick into the snapshot. Returns `None`
    /// when too little time has passed.
    pub fn tick(&mut self) -> Option<TickReport> {
        match sim::advance(&self.state, self.now(), self.config.min_tick_secs) {
            Ok((next, report)) => {
                self.state = next;
                for job in &report.completed {
                    self.events.push(GameEvent::CraftCompleted {
                        target: job.target,
                        amount: job.amount,
                    });
                }
                Some(report)
            }
            Err(reason) => {
                debug!(%reason, "tick skipped");
                None
            }
        }
    }

    /// Compute offline progress for the gap since the last tick, if it is
    /// longer than the configured threshold. An event is only emitted when
    /// the gap produced something.
    pub fn resume(&mut self) -> bool {
        let result =
            automation::resume(&self.state, self.now(), self.config.offline_threshold_secs);
        let pending_before = self.state.offline_progress.clone();
        let accepted = self.commit("resume", result);
        match &self.state.offline_progress {
            Some(progress) if accepted && self.state.offline_progress != pending_before => {
                self.events.push(GameEvent::OfflineProgressComputed {
                    duration_secs: progress.duration_secs,
                    flops: progress.flops,
                });
            }
            _ => {}
        }
        accepted
    }

    /// Claim the pending offline summary.
    pub fn dismiss_offline_progress(&mut self) -> bool {
        let result = automation::dismiss_offline_progress(&self.state);
        let accepted = self.commit("dismiss_offline_progress", result);
        if accepted {
            self.events.push(GameEvent::OfflineProgressClaimed);
        }
        accepted
    }

    /// Start over from a fresh game.
    pub fn reset(&mut self) {
        let now = self.now();
        info!(total_flops = %self.state.total_flops, "game reset");
        self.state = fresh_state(now, &self.config);
        self.events.push(GameEvent::Reset);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn can_buy_research(&self, id: ResearchId) -> bool {
        research::can_buy(&self.state, id)
    }

    pub fn available_research(&self) -> Vec<ResearchId> {
        research::available(&self.state)
    }

    pub fn can_buy_auto_miner(&self, miner: AutoMinerId) -> bool {
        automation::can_buy_auto_miner(&self.state, miner)
    }

    pub fn auto_miner_cost(&self, miner: AutoMinerId) -> Big {
        automation::auto_miner_cost(&self.state, miner)
    }

    pub fn can_craft_wafer(&self, wafer: WaferId, amount: u32) -> bool {
        fabrication::can_craft_wafer(wafer, &self.state.minerals, amount)
    }

    pub fn can_craft_chip(&self, chip: ChipId, amount: u32) -> bool {
        fabrication::can_craft_chip(
            chip,
            &self.state.minerals,
            &self.state.wafers,
            self.state.current_node,
            amount,
        )
    }

    /// Active job progress in `[0, 1]`.
    pub fn crafting_progress(&self) -> f64 {
        fabrication::crafting_progress(&self.state, self.now())
    }

    pub fn crafting_remaining_ms(&self) -> Option<u64> {
        fabrication::crafting_remaining_ms(&self.state, self.now())
    }

    pub fn offline_progress(&self) -> Option<&OfflineProgress> {
        self.state.offline_progress.as_ref()
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        self.events.pending()
    }

    pub fn suppress_event(&mut self, kind: EventKind) {
        self.events.suppress(kind);
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write the snapshot under the configured key.
    pub fn save(&mut self, storage: &mut impl SaveStorage) -> Result<(), SaveError> {
        let blob = serialize::encode(&self.state)?;
        storage.write(&self.config.save_key, &blob)?;
        self.last_save = self.now();
        self.events.push(GameEvent::Saved);
        Ok(())
    }

    pub fn autosave_due(&self) -> bool {
        elapsed_secs(self.last_save, self.now()) >= self.config.autosave_interval_secs
    }

    /// Save if the autosave interval has passed. Returns whether it saved.
    pub fn autosave(&mut self, storage: &mut impl SaveStorage) -> Result<bool, SaveError> {
        if !self.autosave_due() {
            return Ok(false);
        }
        self.save(storage)?;
        Ok(true)
    }

    /// Remove the save and start over.
    pub fn delete_save(&mut self, storage: &mut impl SaveStorage) -> Result<(), SaveError> {
        storage.remove(&self.config.save_key)?;
        self.reset();
        Ok(())
    }
}

fn fresh_state(now: Millis, config: &EngineConfig) -> GameState {
    let mut state = GameState::new(now);
    state.mining_power = Big::from_f64(config.starting_mining_power);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Feature;
    use crate::sim::ManualClock;
    use crate::storage::MemoryStorage;
    use crate::test_utils::{give_minerals, manual_game};

    // -----------------------------------------------------------------------
    // Test 1: rejected actions leave the snapshot untouched
    // -----------------------------------------------------------------------
    #[test]
    fn rejection_is_a_no_op() {
        let (mut game, _clock) = manual_game(0);
        let before = game.state().clone();
        assert!(!game.mine(MineralId::Gold));
        assert!(!game.start_craft_wafer(WaferId::Basic, 1));
        assert!(!game.buy_research(ResearchId::Node65nm));
        assert!(!game.cancel_crafting());
        assert!(!game.dismiss_offline_progress());
        assert_eq!(game.state(), &before);
        assert!(game.pending_events().is_empty());
    }

    // -----------------------------------------------------------------------
    // Test 2: mining records events
    // -----------------------------------------------------------------------
    #[test]
    fn mining_emits_events() {
        let (mut game, _clock) = manual_game(0);
        for _ in 0..3 {
            assert!(game.mine(MineralId::Silicon));
        }
        assert_eq!(game.state().minerals[MineralId::Silicon].amount, Big::from(3));
        let events = game.drain_events();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            GameEvent::Mined {
                mineral: MineralId::Silicon,
                amount: Big::ONE
            }
        );
        assert!(game.pending_events().is_empty());
    }

    // -----------------------------------------------------------------------
    // Test 3: a craft completes on the tick after its duration
    // -----------------------------------------------------------------------
    #[test]
    fn craft_completes_through_tick() {
        let mut state = GameState::new(0);
        give_minerals(&mut state, 1_000.0);
        let clock = ManualClock::new(0);
        let mut game = Game::with_state(state, clock.clone(), EngineConfig::default());

        assert!(game.start_craft_wafer(WaferId::Basic, 1));
        clock.advance_ms(1_000);
        assert!(game.tick().is_some());
        assert!(game.crafting_progress() > 0.0);
        clock.advance_ms(1_000);
        let report = game.tick().unwrap();
        assert_eq!(report.completed.len(), 1);
        assert_eq!(game.state().wafers[WaferId::Basic].amount, Big::ONE);
        assert_eq!(game.crafting_progress(), 0.0);
        let kinds: Vec<EventKind> = game.drain_events().iter().map(GameEvent::kind).collect();
        assert_eq!(kinds, vec![EventKind::CraftStarted, EventKind::CraftCompleted]);
    }

    #[test]
    fn tick_below_minimum_is_skipped() {
        let (mut game, clock) = manual_game(0);
        clock.advance_ms(50);
        assert!(game.tick().is_none());
        assert_eq!(game.state().last_tick, 0);
        clock.advance_ms(50);
        assert!(game.tick().is_some());
        assert_eq!(game.state().last_tick, 100);
    }

    #[test]
    fn research_reports_node_unlock() {
        let mut state = GameState::new(0);
        state.total_flops = Big::from_f64(1e9);
        let mut game = Game::with_state(state, ManualClock::new(0), EngineConfig::default());
        assert!(game.buy_research(ResearchId::Node65nm));
        assert_eq!(game.state().total_flops, Big::ZERO);
        assert_eq!(game.state().current_node, ProcessNode::Nm65);
        let events = game.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::ResearchCompleted {
                    research: ResearchId::Node65nm
                },
                GameEvent::NodeUnlocked {
                    node: ProcessNode::Nm65
                },
            ]
        );
        assert!(!game.buy_research(ResearchId::Node65nm));
    }

    #[test]
    fn auto_miner_purchase_reports_owned() {
        let clock = ManualClock::new(0);
        let mut state = GameState::new(0);
        state.features.insert(Feature::AutoMiner);
        state.minerals[MineralId::Silicon].credit(Big::from(1_000));
        let mut game = Game::with_state(state, clock, EngineConfig::default());
        assert_eq!(game.auto_miner_cost(AutoMinerId::Drill1), Big::from(100));
        assert!(game.buy_auto_miner(AutoMinerId::Drill1));
        assert!(game.buy_auto_miner(AutoMinerId::Drill1));
        assert_eq!(
            game.drain_events().last(),
            Some(&GameEvent::AutoMinerBought {
                miner: AutoMinerId::Drill1,
                owned: 2
            })
        );
    }

    #[test]
    fn reset_uses_configured_mining_power() {
        let clock = ManualClock::new(0);
        let config = EngineConfig {
            starting_mining_power: 5.0,
            ..EngineConfig::default()
        };
        let mut game = Game::new(clock.clone(), config);
        assert!(game.mine(MineralId::Silicon));
        assert_eq!(game.state().minerals[MineralId::Silicon].amount, Big::from(5));
        clock.advance_secs(10.0);
        game.reset();
        assert_eq!(game.state().minerals[MineralId::Silicon].amount, Big::ZERO);
        assert_eq!(game.state().mining_power, Big::from(5));
        assert_eq!(game.state().last_tick, 10_000);
    }

    // -----------------------------------------------------------------------
    // Test 4: save, reload, and offline catch-up
    // -----------------------------------------------------------------------
    #[test]
    fn save_and_load_with_offline_progress() {
        let mut storage = MemoryStorage::new();
        let clock = ManualClock::new(0);
        let mut state = GameState::new(0);
        state.chips[ChipId::CpuBasic].credit(Big::ONE);
        let mut game = Game::with_state(state, clock.clone(), EngineConfig::default());
        game.save(&mut storage).unwrap();
        assert_eq!(game.drain_events(), vec![GameEvent::Saved]);

        clock.advance_secs(120.0);
        let mut loaded = Game::load(
            &mut storage,
            clock.clone(),
            EngineConfig::default(),
            &MigrationRegistry::standard(),
        );
        // One basic CPU at 90nm produces 1e6 FLOPS/s.
        let progress = loaded.offline_progress().unwrap().clone();
        assert_eq!(progress.duration_secs, 120.0);
        assert_eq!(progress.flops, Big::from_f64(1.2e8));
        assert_eq!(loaded.state().last_tick, 120_000);

        assert!(loaded.dismiss_offline_progress());
        assert_eq!(loaded.state().total_flops, Big::from_f64(1.2e8));
        assert!(loaded.offline_progress().is_none());
    }

    #[test]
    fn corrupted_save_starts_fresh() {
        let mut storage = MemoryStorage::new();
        storage.write("chipforge-save", "{ not json").unwrap();
        let clock = ManualClock::new(42);
        let game = Game::load(
            &mut storage,
            clock,
            EngineConfig::default(),
            &MigrationRegistry::standard(),
        );
        assert_eq!(game.state(), &GameState::new(42));
        assert!(storage.is_empty());
    }

    #[test]
    fn idle_absence_emits_no_offline_event() {
        let (mut game, clock) = manual_game(0);
        clock.advance_secs(120.0);
        assert!(game.resume());
        assert_eq!(game.state().last_tick, 120_000);
        assert!(game.offline_progress().is_none());
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn autosave_cadence() {
        let mut storage = MemoryStorage::new();
        let (mut game, clock) = manual_game(0);
        assert!(!game.autosave(&mut storage).unwrap());
        clock.advance_secs(30.0);
        assert!(game.autosave_due());
        assert!(game.autosave(&mut storage).unwrap());
        assert!(!game.autosave_due());
        assert_eq!(storage.len(), 1);

        game.delete_save(&mut storage).unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn suppressed_events_are_dropped() {
        let (mut game, _clock) = manual_game(0);
        game.suppress_event(EventKind::Mined);
        assert!(game.mine(MineralId::Silicon));
        assert!(game.pending_events().is_empty());
    }
}
