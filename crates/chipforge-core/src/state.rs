//! The game snapshot: every piece of mutable state in one value.
//!
//! [`GameState`] is plain data. Transitions in the engine modules take a
//! `&GameState` and return a new one, so a snapshot can be cloned, compared,
//! and serialized freely.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::big::Big;
use crate::content::{STARTER_CHIPS, minerals_of_tier};
use crate::id::{
    AutoMinerId, ChipId, Feature, MineralId, ProcessNode, ResearchId, TableId, WaferId,
};
use crate::sim::Millis;

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// One value per id of a content table, indexed by the id itself.
///
/// Every id always has an entry, so lookups cannot miss.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger<K, V> {
    entries: Vec<V>,
    _key: PhantomData<K>,
}

impl<K: TableId, V> Ledger<K, V> {
    pub fn from_fn(mut f: impl FnMut(K) -> V) -> Self {
        Self {
            entries: K::ALL.iter().map(|&k| f(k)).collect(),
            _key: PhantomData,
        }
    }

    pub fn get(&self, id: K) -> &V {
        &self.entries[id.index()]
    }

    pub fn get_mut(&mut self, id: K) -> &mut V {
        &mut self.entries[id.index()]
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        K::ALL.iter().copied().zip(self.entries.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut V)> {
        K::ALL.iter().copied().zip(self.entries.iter_mut())
    }
}

impl<K: TableId, V: Default> Default for Ledger<K, V> {
    fn default() -> Self {
        Self::from_fn(|_| V::default())
    }
}

impl<K: TableId, V> Index<K> for Ledger<K, V> {
    type Output = V;
    fn index(&self, id: K) -> &V {
        self.get(id)
    }
}

impl<K: TableId, V> IndexMut<K> for Ledger<K, V> {
    fn index_mut(&mut self, id: K) -> &mut V {
        self.get_mut(id)
    }
}

/// Serialized as a map keyed by the id's string name.
impl<K: TableId, V: Serialize> Serialize for Ledger<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in self.iter() {
            map.serialize_entry(id.as_str(), value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Per-item state
// ---------------------------------------------------------------------------

/// Holdings of one mineral, wafer, or chip.
///
/// `total` is the lifetime amount ever credited and never decreases, so
/// `amount <= total` always holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub amount: Big,
    pub total: Big,
    pub unlocked: bool,
}

impl Stock {
    pub fn unlocked() -> Self {
        Self {
            unlocked: true,
            ..Self::default()
        }
    }

    /// Add to both the held amount and the lifetime total.
    pub fn credit(&mut self, qty: Big) {
        self.amount += qty;
        self.total += qty;
    }

    /// Remove `qty` from the held amount. Returns false, leaving the stock
    /// unchanged, if not enough is held.
    #[must_use]
    pub fn debit(&mut self, qty: Big) -> bool {
        match self.amount.checked_sub(qty) {
            Some(rest) => {
                self.amount = rest;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoMinerState {
    pub owned: u32,
    pub unlocked: bool,
}

/// Completed research and the FLOPS spent on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchProgress {
    /// In purchase order. No duplicates.
    pub completed: Vec<ResearchId>,
    pub total_spent: Big,
}

impl ResearchProgress {
    pub fn is_completed(&self, id: ResearchId) -> bool {
        self.completed.contains(&id)
    }
}

// ---------------------------------------------------------------------------
// Crafting
// ---------------------------------------------------------------------------

/// What a crafting job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "item_id", rename_all = "snake_case")]
pub enum CraftTarget {
    Wafer(WaferId),
    Chip(ChipId),
}

impl CraftTarget {
    /// Craft time of a single unit at fab speed 1.
    pub fn base_craft_time_ms(self) -> u64 {
        match self {
            CraftTarget::Wafer(id) => id.def().craft_time_ms,
            CraftTarget::Chip(id) => id.def().craft_time_ms,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CraftTarget::Wafer(id) => id.as_str(),
            CraftTarget::Chip(id) => id.as_str(),
        }
    }
}

/// The job currently on the fab line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingJob {
    pub target: CraftTarget,
    pub amount: u32,
    pub started_at: Millis,
    pub duration_ms: u64,
}

impl CraftingJob {
    pub fn finishes_at(&self) -> Millis {
        self.started_at.saturating_add(self.duration_ms)
    }

    pub fn is_complete(&self, now: Millis) -> bool {
        now >= self.finishes_at()
    }

    /// Fraction done, clamped to `[0, 1]`.
    pub fn progress(&self, now: Millis) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at) as f64;
        (elapsed / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    pub fn remaining_ms(&self, now: Millis) -> u64 {
        self.finishes_at().saturating_sub(now)
    }
}

/// A paid-for job waiting behind the active one. Its duration was fixed
/// when it was enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedCraft {
    pub id: u64,
    pub target: CraftTarget,
    pub amount: u32,
    pub duration_ms: u64,
}

impl QueuedCraft {
    pub fn start(self, at: Millis) -> CraftingJob {
        CraftingJob {
            target: self.target,
            amount: self.amount,
            started_at: at,
            duration_ms: self.duration_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Offline progress
// ---------------------------------------------------------------------------

/// Production accrued while the game was closed, pending the player's claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfflineProgress {
    pub minerals: BTreeMap<MineralId, Big>,
    pub flops: Big,
    pub duration_secs: f64,
}

impl OfflineProgress {
    /// Fold a later summary into this one.
    pub fn merge(&mut self, other: &OfflineProgress) {
        for (&id, &qty) in &other.minerals {
            *self.minerals.entry(id).or_default() += qty;
        }
        self.flops += other.flops;
        self.duration_secs += other.duration_secs;
    }

    pub fn is_empty(&self) -> bool {
        self.flops.is_zero() && self.minerals.values().all(|v| v.is_zero())
    }
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// The complete, serializable game snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    pub minerals: Ledger<MineralId, Stock>,
    /// Manual mining strength; multiplies every click.
    pub mining_power: Big,
    pub wafers: Ledger<WaferId, Stock>,
    pub chips: Ledger<ChipId, Stock>,

    pub current_node: ProcessNode,
    /// In unlock order. Always contains `current_node`.
    pub unlocked_nodes: Vec<ProcessNode>,

    /// Spendable FLOPS.
    pub total_flops: Big,
    /// Cached production rate; recomputed whenever chips, node, or the
    /// FLOPS multiplier change.
    pub flops_per_second: Big,

    pub crafting: Option<CraftingJob>,
    pub craft_queue: VecDeque<QueuedCraft>,
    pub next_queue_id: u64,

    pub research: ResearchProgress,
    pub mining_multiplier: f64,
    pub fab_speed_multiplier: f64,
    pub flops_multiplier: f64,

    pub auto_miners: Ledger<AutoMinerId, AutoMinerState>,
    pub features: BTreeSet<Feature>,

    pub offline_progress: Option<OfflineProgress>,
    pub last_tick: Millis,
}

impl GameState {
    /// A fresh game: tier-1 minerals, the basic wafer, the starter chips,
    /// the 90nm node, and the first drill tier unlocked.
    pub fn new(now: Millis) -> Self {
        let tier1: Vec<MineralId> = minerals_of_tier(1).collect();
        Self {
            minerals: Ledger::from_fn(|id| Stock {
                unlocked: tier1.contains(&id),
                ..Stock::default()
            }),
            mining_power: Big::ONE,
            wafers: Ledger::from_fn(|id| Stock {
                unlocked: id == WaferId::Basic,
                ..Stock::default()
            }),
            chips: Ledger::from_fn(|id| Stock {
                unlocked: STARTER_CHIPS.contains(&id),
                ..Stock::default()
            }),
            current_node: ProcessNode::Nm90,
            unlocked_nodes: vec![ProcessNode::Nm90],
            total_flops: Big::ZERO,
            flops_per_second: Big::ZERO,
            crafting: None,
            craft_queue: VecDeque::new(),
            next_queue_id: 1,
            research: ResearchProgress::default(),
            mining_multiplier: 1.0,
            fab_speed_multiplier: 1.0,
            flops_multiplier: 1.0,
            auto_miners: Ledger::from_fn(|id| AutoMinerState {
                owned: 0,
                unlocked: id == AutoMinerId::Drill1,
            }),
            features: BTreeSet::new(),
            offline_progress: None,
            last_tick: now,
        }
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn singularity_reached(&self) -> bool {
        self.has_feature(Feature::Singularity)
    }

    pub fn is_node_unlocked(&self, node: ProcessNode) -> bool {
        self.unlocked_nodes.contains(&node)
    }

    pub fn is_researched(&self, id: ResearchId) -> bool {
        self.research.is_completed(id)
    }

    /// True when a job is active or waiting.
    pub fn is_crafting(&self) -> bool {
        self.crafting.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_game_unlocks() {
        let state = GameState::new(1_000);
        assert!(state.minerals[MineralId::Silicon].unlocked);
        assert!(state.minerals[MineralId::Aluminum].unlocked);
        assert!(!state.minerals[MineralId::Gold].unlocked);
        assert!(state.wafers[WaferId::Basic].unlocked);
        assert!(!state.wafers[WaferId::Refined].unlocked);
        assert!(state.chips[ChipId::RamBasic].unlocked);
        assert!(!state.chips[ChipId::CpuCore].unlocked);
        assert!(state.auto_miners[AutoMinerId::Drill1].unlocked);
        assert!(!state.auto_miners[AutoMinerId::Drill2].unlocked);
        assert_eq!(state.unlocked_nodes, vec![ProcessNode::Nm90]);
        assert_eq!(state.mining_power, Big::ONE);
        assert_eq!(state.last_tick, 1_000);
        assert!(state.features.is_empty());
    }

    #[test]
    fn stock_debit_is_all_or_nothing() {
        let mut stock = Stock::unlocked();
        stock.credit(Big::from(10));
        assert!(!stock.debit(Big::from(11)));
        assert_eq!(stock.amount, Big::from(10));
        assert!(stock.debit(Big::from(4)));
        assert_eq!(stock.amount, Big::from(6));
        assert_eq!(stock.total, Big::from(10));
    }

    #[test]
    fn job_progress_clamps() {
        let job = CraftingJob {
            target: CraftTarget::Wafer(WaferId::Basic),
            amount: 1,
            started_at: 1_000,
            duration_ms: 2_000,
        };
        assert_eq!(job.progress(500), 0.0);
        assert_eq!(job.progress(2_000), 0.5);
        assert_eq!(job.progress(9_000), 1.0);
        assert_eq!(job.remaining_ms(2_500), 500);
        assert_eq!(job.remaining_ms(9_000), 0);
        assert!(job.is_complete(3_000));
        assert!(!job.is_complete(2_999));
    }

    #[test]
    fn offline_progress_merges() {
        let mut a = OfflineProgress {
            minerals: BTreeMap::from([(MineralId::Silicon, Big::from(10))]),
            flops: Big::from(5),
            duration_secs: 60.0,
        };
        let b = OfflineProgress {
            minerals: BTreeMap::from([
                (MineralId::Silicon, Big::from(1)),
                (MineralId::Copper, Big::from(2)),
            ]),
            flops: Big::from(7),
            duration_secs: 90.0,
        };
        a.merge(&b);
        assert_eq!(a.minerals[&MineralId::Silicon], Big::from(11));
        assert_eq!(a.minerals[&MineralId::Copper], Big::from(2));
        assert_eq!(a.flops, Big::from(12));
        assert_eq!(a.duration_secs, 150.0);
    }

    #[test]
    fn ledger_serializes_by_name() {
        let state = GameState::new(0);
        let value = serde_json::to_value(&state.auto_miners).unwrap();
        assert_eq!(value["drill_1"]["unlocked"], true);
        assert_eq!(value["quantum_drill"]["owned"], 0);
    }

    #[test]
    fn craft_target_tagging() {
        let json = serde_json::to_string(&CraftTarget::Chip(ChipId::CpuBasic)).unwrap();
        assert_eq!(json, r#"{"type":"chip","item_id":"cpu_basic"}"#);
    }
}
