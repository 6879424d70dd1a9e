//! Chipforge Core -- the simulation engine for an incremental chip-fab game.
//!
//! The player mines minerals, fabricates wafers from minerals and chips from
//! wafers, and owned chips produce FLOPS. FLOPS buy research, which unlocks
//! process nodes, mineral tiers, multipliers, and automation. Time-driven
//! production (FLOPS, auto-mining, crafting) advances on a wall-clock tick
//! and catches up after an absence.
//!
//! # State and Transitions
//!
//! All game data lives in one [`state::GameState`] snapshot. Every action is
//! a pure function from a snapshot to a new snapshot:
//!
//! ```rust,ignore
//! let next = resources::mine(&state, MineralId::Silicon)?;
//! let next = fabrication::start_craft_wafer(&next, WaferId::Basic, 1, now)?;
//! ```
//!
//! A refused action returns a [`error::Rejection`] and the input is left
//! as it was. [`engine::Game`] wraps the snapshot for hosts that prefer a
//! mutable store, turning rejections into logged no-ops.
//!
//! # Tick
//!
//! Each call to [`sim::advance`] folds the time since `last_tick` in:
//!
//! 1. **FLOPS** -- production rate times elapsed seconds.
//! 2. **Auto-mining** -- owned auto-miners credit their target minerals.
//! 3. **Crafting** -- due jobs complete; queued jobs chain back to back.
//!
//! # Key Types
//!
//! - [`big::Big`] -- Non-negative mantissa/exponent number for values far
//!   beyond `f64`.
//! - [`content`] -- Static tables: minerals, wafers, chips, nodes, research,
//!   auto-miners.
//! - [`engine::Game`] -- The store: actions, queries, events, autosave.
//! - [`serialize`] -- Versioned JSON saves with tolerant hydration.

pub mod automation;
pub mod big;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod event;
pub mod fabrication;
pub mod format;
pub mod id;
pub mod migration;
pub mod research;
pub mod resources;
pub mod serialize;
pub mod sim;
pub mod state;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
