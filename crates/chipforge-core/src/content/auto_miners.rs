//! Auto-miner tiers, their targets, and cost curves.

use crate::big::Big;
use crate::id::{AutoMinerId, MineralId};

use MineralId::*;

/// Owning this many of one tier unlocks the next tier.
pub const NEXT_TIER_THRESHOLD: u32 = 10;

/// Static definition of an auto-miner tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoMinerDef {
    pub id: AutoMinerId,
    pub name: &'static str,
    pub tier: u8,
    /// Minerals credited each second, every one at the full rate.
    pub targets: &'static [MineralId],
    /// Output per owned unit per second.
    pub rate_per_second: f64,
    /// Silicon price of the first unit.
    pub base_cost: f64,
    /// Price growth per unit owned.
    pub cost_multiplier: f64,
}

impl AutoMinerDef {
    pub fn rate_per_second(&self) -> Big {
        Big::from_f64(self.rate_per_second)
    }

    pub fn base_cost(&self) -> Big {
        Big::from_f64(self.base_cost)
    }
}

const TIER_1: &[MineralId] = &[Silicon, Copper, Aluminum];
const TIER_2: &[MineralId] = &[Silicon, Copper, Aluminum, Gold, Silver, Tin];
const TIER_3: &[MineralId] = &[
    Silicon, Copper, Aluminum, Gold, Silver, Tin, Lithium, Cobalt, Tantalum,
];
const TIER_4: &[MineralId] = &[
    Silicon, Copper, Aluminum, Gold, Silver, Tin, Lithium, Cobalt, Tantalum, Neodymium, Gallium,
    Indium,
];

pub static AUTO_MINERS: [AutoMinerDef; 5] = [
    AutoMinerDef {
        id: AutoMinerId::Drill1,
        name: "Basic Drill",
        tier: 1,
        targets: TIER_1,
        rate_per_second: 1.0,
        base_cost: 100.0,
        cost_multiplier: 1.15,
    },
    AutoMinerDef {
        id: AutoMinerId::Drill2,
        name: "Precision Drill",
        tier: 2,
        targets: TIER_2,
        rate_per_second: 5.0,
        base_cost: 1_000.0,
        cost_multiplier: 1.18,
    },
    AutoMinerDef {
        id: AutoMinerId::Drill3,
        name: "Deep Core Drill",
        tier: 3,
        targets: TIER_3,
        rate_per_second: 25.0,
        base_cost: 50_000.0,
        cost_multiplier: 1.20,
    },
    AutoMinerDef {
        id: AutoMinerId::Excavator,
        name: "Mega Excavator",
        tier: 4,
        targets: TIER_4,
        rate_per_second: 100.0,
        base_cost: 1e7,
        cost_multiplier: 1.25,
    },
    AutoMinerDef {
        id: AutoMinerId::QuantumDrill,
        name: "Quantum Drill",
        tier: 5,
        targets: MineralId::ALL,
        rate_per_second: 500.0,
        base_cost: 1e10,
        cost_multiplier: 1.30,
    },
];

impl AutoMinerId {
    pub fn def(self) -> &'static AutoMinerDef {
        &AUTO_MINERS[self.index()]
    }

    /// The tier unlocked by owning enough of this one.
    pub fn next(self) -> Option<AutoMinerId> {
        AutoMinerId::ALL.get(self.index() + 1).copied()
    }
}
