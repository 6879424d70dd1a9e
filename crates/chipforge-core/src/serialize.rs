//! Save documents: encoding, version migration, and tolerant hydration.
//!
//! A save is a JSON document `{ "version": N, "state": { ... } }`. Big
//! numbers inside `state` are tagged strings (`"__D__1.5e300"`); everything
//! else is plain JSON.
//!
//! Loading never trusts the document's shape. After migration to
//! [`SCHEMA_VERSION`], each field is read on its own: a missing or malformed
//! field falls back to the fresh-game default, unknown ids are dropped, and
//! big numbers stored as plain JSON numbers or untagged strings are accepted.
//! Derived values (`flops_per_second`) are recomputed rather than trusted.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::big::Big;
use crate::fabrication::refresh_flops_per_second;
use crate::id::{Feature, ProcessNode, ResearchId, TableId};
use crate::migration::{MigrationError, MigrationRegistry};
use crate::sim::Millis;
use crate::state::{
    AutoMinerState, CraftingJob, GameState, Ledger, OfflineProgress, QueuedCraft, Stock,
};

pub use crate::big::DECIMAL_TAG;

/// Current save schema. Version 1 stored feature flags as booleans.
pub const SCHEMA_VERSION: u32 = 2;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A save document that cannot be loaded at all.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("save is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("save document has no version marker")]
    MissingVersion,

    /// Written by a newer build.
    #[error("save version {found} is newer than supported version {supported}")]
    FutureVersion { found: u64, supported: u32 },

    #[error("save document has no state object")]
    MissingState,

    #[error(transparent)]
    Migration(#[from] MigrationError),
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SaveDocument<'a> {
    version: u32,
    state: &'a GameState,
}

pub fn encode(state: &GameState) -> Result<String, SnapshotError> {
    let doc = SaveDocument {
        version: SCHEMA_VERSION,
        state,
    };
    Ok(serde_json::to_string(&doc)?)
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Parse, migrate, and hydrate a save. `now` stands in for a missing
/// `last_tick`.
pub fn decode(
    blob: &str,
    now: Millis,
    migrations: &MigrationRegistry,
) -> Result<GameState, SnapshotError> {
    let Value::Object(mut doc) = serde_json::from_str::<Value>(blob)? else {
        return Err(SnapshotError::MissingState);
    };
    let version = doc
        .get("version")
        .and_then(Value::as_u64)
        .ok_or(SnapshotError::MissingVersion)?;
    if version > u64::from(SCHEMA_VERSION) {
        return Err(SnapshotError::FutureVersion {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }
    let state = doc.remove("state").ok_or(SnapshotError::MissingState)?;
    // Bounded by SCHEMA_VERSION above.
    let state = migrations.migrate(state, version as u32, SCHEMA_VERSION)?;
    let Value::Object(fields) = state else {
        return Err(SnapshotError::MissingState);
    };
    Ok(hydrate(&fields, now))
}

/// Read one field. Missing and `null` fields are `None`; malformed ones are
/// logged and also `None`.
fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let raw = obj.get(key).filter(|v| !v.is_null())?;
    match T::deserialize(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(field = key, %err, "discarding malformed save field");
            None
        }
    }
}

/// Known ids from a JSON array of names, first occurrence only.
fn id_list<K: TableId + FromStr>(raw: Option<&Value>) -> Vec<K> {
    let mut ids = Vec::new();
    let Some(Value::Array(items)) = raw else {
        return ids;
    };
    for item in items {
        match item.as_str().map(str::parse::<K>) {
            Some(Ok(id)) if !ids.contains(&id) => ids.push(id),
            Some(Ok(_)) => {}
            _ => debug!(value = %item, "dropping unknown id from save"),
        }
    }
    ids
}

/// Overlay saved entries on a ledger of defaults, dropping unknown ids.
fn hydrate_ledger<K: TableId + FromStr, V>(
    ledger: &mut Ledger<K, V>,
    raw: Option<&Value>,
    merge: fn(&V, &Map<String, Value>) -> V,
) {
    let Some(Value::Object(entries)) = raw else {
        return;
    };
    for (name, value) in entries {
        let (Ok(id), Value::Object(saved)) = (name.parse::<K>(), value) else {
            debug!(id = %name, "dropping unknown or malformed save entry");
            continue;
        };
        ledger[id] = merge(&ledger[id], saved);
    }
}

fn merge_stock(default: &Stock, saved: &Map<String, Value>) -> Stock {
    let amount: Big = field(saved, "amount").unwrap_or(default.amount);
    let total: Big = field(saved, "total").unwrap_or(default.total);
    let unlocked: bool = field(saved, "unlocked").unwrap_or(false);
    Stock {
        amount,
        total: total.max(amount),
        // Unlocks never revert, so fresh-game unlocks survive a bad save.
        unlocked: unlocked || default.unlocked,
    }
}

fn merge_miner(default: &AutoMinerState, saved: &Map<String, Value>) -> AutoMinerState {
    AutoMinerState {
        owned: field(saved, "owned").unwrap_or(default.owned),
        unlocked: field::<bool>(saved, "unlocked").unwrap_or(false) || default.unlocked,
    }
}

/// Multipliers only ever compound factors of at least 1.
fn multiplier(obj: &Map<String, Value>, key: &str) -> f64 {
    match field::<f64>(obj, key) {
        Some(v) if v.is_finite() && v >= 1.0 => v,
        _ => 1.0,
    }
}

fn hydrate(fields: &Map<String, Value>, now: Millis) -> GameState {
    let last_tick = field(fields, "last_tick").unwrap_or(now);
    let mut state = GameState::new(last_tick);

    hydrate_ledger(&mut state.minerals, fields.get("minerals"), merge_stock);
    hydrate_ledger(&mut state.wafers, fields.get("wafers"), merge_stock);
    hydrate_ledger(&mut state.chips, fields.get("chips"), merge_stock);
    hydrate_ledger(&mut state.auto_miners, fields.get("auto_miners"), merge_miner);

    if let Some(power) = field::<Big>(fields, "mining_power").filter(|p| !p.is_zero()) {
        state.mining_power = power;
    }
    state.total_flops = field(fields, "total_flops").unwrap_or(Big::ZERO);

    // Nodes: always include the starting node and the current one.
    let mut nodes: BTreeSet<ProcessNode> = id_list(fields.get("unlocked_nodes"))
        .into_iter()
        .collect();
    nodes.insert(ProcessNode::Nm90);
    if let Some(current) = field::<ProcessNode>(fields, "current_node") {
        nodes.insert(current);
        state.current_node = current;
    } else if let Some(&latest) = nodes.last() {
        state.current_node = latest;
    }
    state.unlocked_nodes = nodes.into_iter().collect();

    if let Some(Value::Object(research)) = fields.get("research") {
        state.research.completed = id_list::<ResearchId>(research.get("completed"));
        state.research.total_spent = field(research, "total_spent").unwrap_or(Big::ZERO);
    }
    state.mining_multiplier = multiplier(fields, "mining_multiplier");
    state.fab_speed_multiplier = multiplier(fields, "fab_speed_multiplier");
    state.flops_multiplier = multiplier(fields, "flops_multiplier");
    state.features = id_list::<Feature>(fields.get("features"))
        .into_iter()
        .collect();

    state.crafting = field::<CraftingJob>(fields, "crafting");
    if let Some(Value::Array(items)) = fields.get("craft_queue") {
        state.craft_queue = items
            .iter()
            .filter_map(|item| QueuedCraft::deserialize(item).ok())
            // No id is left after u64::MAX to hand the next queued craft.
            .filter(|queued| queued.id < u64::MAX)
            .collect();
    }
    let after_queue = state
        .craft_queue
        .iter()
        .map(|q| q.id.saturating_add(1))
        .max()
        .unwrap_or(1);
    state.next_queue_id = field::<u64>(fields, "next_queue_id")
        .unwrap_or(1)
        .max(after_queue);
    if state.crafting.is_none() {
        if let Some(queued) = state.craft_queue.pop_front() {
            state.crafting = Some(queued.start(last_tick));
        }
    }

    state.offline_progress = field::<OfflineProgress>(fields, "offline_progress");

    refresh_flops_per_second(&mut state);
    state
}
