//! Immutable game content: minerals, wafers, chips, process nodes, research,
//! and auto-miners.
//!
//! Every table is a `static` array laid out in display order and indexed by
//! its id enum, so `id.def()` is a direct lookup. Cross-table references
//! (node unlock lists, recipe inputs, research prerequisites) are checked by
//! [`validate`].

pub mod auto_miners;
pub mod fab;
pub mod minerals;
pub mod research;

pub use auto_miners::{AUTO_MINERS, AutoMinerDef, NEXT_TIER_THRESHOLD};
pub use fab::{CHIPS, ChipDef, PROCESS_NODES, ProcessNodeDef, STARTER_CHIPS, WAFERS, WaferDef};
pub use minerals::{MAX_MINERAL_TIER, MINERALS, MineralDef, minerals_of_tier};
pub use research::{RESEARCH, ResearchDef, ResearchEffect, research_by_category};

use crate::id::{AutoMinerId, ChipId, MineralId, ProcessNode, ResearchId, TableId, WaferId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A referential or ordering inconsistency in the static tables.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContentError {
    #[error("{table} table entry {index} is out of display order")]
    Misordered { table: &'static str, index: usize },
    #[error("mineral {mineral} has tier {tier} outside 1..={max}", max = MAX_MINERAL_TIER)]
    MineralTier { mineral: MineralId, tier: u8 },
    #[error("no minerals in tier {0}")]
    EmptyMineralTier(u8),
    #[error("{item} has an empty or zero-amount cost")]
    ZeroCost { item: &'static str },
    #[error("wafer {wafer} is not listed by exactly its unlocking node {node}")]
    WaferUnlockMismatch { wafer: WaferId, node: ProcessNode },
    #[error("chip {chip} is not listed by exactly its required node {node}")]
    ChipUnlockMismatch { chip: ChipId, node: ProcessNode },
    #[error("chip {chip} consumes {wafer}, which unlocks after the chip's node")]
    WaferAfterChip { chip: ChipId, wafer: WaferId },
    #[error("process node {0} must cost more and be at least as efficient as its predecessor")]
    NodeProgression(ProcessNode),
    #[error("research {research} requires {prerequisite}, which is not listed before it")]
    PrerequisiteOrder {
        research: ResearchId,
        prerequisite: ResearchId,
    },
    #[error("research {research} unlocks {node} but its cost differs from the node's")]
    NodeResearchCost {
        research: ResearchId,
        node: ProcessNode,
    },
    #[error("research {research} unlocks {node} without requiring the previous node's research")]
    NodeResearchChain {
        research: ResearchId,
        node: ProcessNode,
    },
    #[error("no research unlocks process node {0}")]
    MissingNodeResearch(ProcessNode),
    #[error("research {0} has a multiplier below 1")]
    InvalidMultiplier(ResearchId),
    #[error("research {research} unlocks mineral tier {tier}, which does not exist")]
    InvalidTierEffect { research: ResearchId, tier: u8 },
    #[error("auto-miner {0} has a tier out of sequence")]
    AutoMinerTier(AutoMinerId),
    #[error("auto-miner {0} has an invalid cost curve or no targets")]
    AutoMinerCurve(AutoMinerId),
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check every cross-table invariant. The shipped tables always pass; a
/// failure here is a content bug.
pub fn validate() -> Result<(), ContentError> {
    check_order("mineral", MINERALS.iter().map(|d| d.id))?;
    check_order("wafer", WAFERS.iter().map(|d| d.id))?;
    check_order("chip", CHIPS.iter().map(|d| d.id))?;
    check_order("process node", PROCESS_NODES.iter().map(|d| d.id))?;
    check_order("research", RESEARCH.iter().map(|d| d.id))?;
    check_order("auto-miner", AUTO_MINERS.iter().map(|d| d.id))?;

    validate_minerals()?;
    validate_fab()?;
    validate_research()?;
    validate_auto_miners()
}

fn check_order<K: TableId>(
    table: &'static str,
    ids: impl Iterator<Item = K>,
) -> Result<(), ContentError> {
    let mut count = 0;
    for (index, id) in ids.enumerate() {
        if id.index() != index {
            return Err(ContentError::Misordered { table, index });
        }
        count += 1;
    }
    if count != K::ALL.len() {
        return Err(ContentError::Misordered {
            table,
            index: count,
        });
    }
    Ok(())
}

fn validate_minerals() -> Result<(), ContentError> {
    for def in &MINERALS {
        if def.tier == 0 || def.tier > MAX_MINERAL_TIER || def.base_rate <= 0.0 {
            return Err(ContentError::MineralTier {
                mineral: def.id,
                tier: def.tier,
            });
        }
    }
    for tier in 1..=MAX_MINERAL_TIER {
        if minerals_of_tier(tier).next().is_none() {
            return Err(ContentError::EmptyMineralTier(tier));
        }
    }
    Ok(())
}

fn validate_fab() -> Result<(), ContentError> {
    for wafer in &WAFERS {
        if wafer.recipe.is_empty() || wafer.recipe.iter().any(|&(_, n)| n == 0) {
            return Err(ContentError::ZeroCost {
                item: wafer.id.as_str(),
            });
        }
        for node in &PROCESS_NODES {
            let listed = node.unlocks_wafers.contains(&wafer.id);
            if listed != (node.id == wafer.unlocked_at) {
                return Err(ContentError::WaferUnlockMismatch {
                    wafer: wafer.id,
                    node: wafer.unlocked_at,
                });
            }
        }
    }

    for chip in &CHIPS {
        let (wafer, amount) = chip.wafer_cost;
        if amount == 0 || chip.extra_costs.iter().any(|&(_, n)| n == 0) {
            return Err(ContentError::ZeroCost {
                item: chip.id.as_str(),
            });
        }
        if wafer.def().unlocked_at > chip.node {
            return Err(ContentError::WaferAfterChip {
                chip: chip.id,
                wafer,
            });
        }
        for node in &PROCESS_NODES {
            let listed = node.unlocks_chips.contains(&chip.id);
            if listed != (node.id == chip.node) {
                return Err(ContentError::ChipUnlockMismatch {
                    chip: chip.id,
                    node: chip.node,
                });
            }
        }
    }

    for pair in PROCESS_NODES.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.unlock_cost <= prev.unlock_cost || next.efficiency < prev.efficiency {
            return Err(ContentError::NodeProgression(next.id));
        }
    }
    Ok(())
}

/// The research entry that unlocks `node`, if any.
pub fn research_unlocking(node: ProcessNode) -> Option<ResearchId> {
    RESEARCH
        .iter()
        .find(|r| r.effects.contains(&ResearchEffect::UnlockNode(node)))
        .map(|r| r.id)
}

fn validate_research() -> Result<(), ContentError> {
    for def in &RESEARCH {
        // Prerequisites listed earlier also rules out cycles.
        for &prerequisite in def.requires {
            if prerequisite >= def.id {
                return Err(ContentError::PrerequisiteOrder {
                    research: def.id,
                    prerequisite,
                });
            }
        }

        for effect in def.effects {
            match *effect {
                ResearchEffect::UnlockNode(node) => {
                    if def.cost() != node.def().unlock_cost() {
                        return Err(ContentError::NodeResearchCost {
                            research: def.id,
                            node,
                        });
                    }
                    let previous = node.previous().and_then(research_unlocking);
                    if let Some(previous) = previous {
                        if !def.requires.contains(&previous) {
                            return Err(ContentError::NodeResearchChain {
                                research: def.id,
                                node,
                            });
                        }
                    }
                }
                ResearchEffect::UnlockMinerals { tier } => {
                    if tier == 0 || tier > MAX_MINERAL_TIER {
                        return Err(ContentError::InvalidTierEffect {
                            research: def.id,
                            tier,
                        });
                    }
                }
                ResearchEffect::MiningMultiplier(v)
                | ResearchEffect::FabSpeedMultiplier(v)
                | ResearchEffect::FlopsMultiplier(v) => {
                    if !(v >= 1.0) {
                        return Err(ContentError::InvalidMultiplier(def.id));
                    }
                }
                ResearchEffect::UnlockFeature(_) => {}
            }
        }
    }

    // The starting node needs no research; every later one does.
    for &node in &ProcessNode::ALL[1..] {
        if research_unlocking(node).is_none() {
            return Err(ContentError::MissingNodeResearch(node));
        }
    }
    Ok(())
}

fn validate_auto_miners() -> Result<(), ContentError> {
    for (i, def) in AUTO_MINERS.iter().enumerate() {
        if usize::from(def.tier) != i + 1 {
            return Err(ContentError::AutoMinerTier(def.id));
        }
        if def.targets.is_empty() || def.cost_multiplier <= 1.0 || def.base_cost <= 0.0 {
            return Err(ContentError::AutoMinerCurve(def.id));
        }
    }
    Ok(())
}
