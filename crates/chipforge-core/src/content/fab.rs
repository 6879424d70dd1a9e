//! Wafers, chips, and the process nodes that gate them.

use crate::big::Big;
use crate::id::{ChipCategory, ChipId, MineralId, ProcessNode, WaferId};

// ---------------------------------------------------------------------------
// Wafers
// ---------------------------------------------------------------------------

/// Static definition of a wafer: minerals in, one wafer out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaferDef {
    pub id: WaferId,
    pub name: &'static str,
    pub tier: u8,
    /// Minerals consumed per wafer.
    pub recipe: &'static [(MineralId, u32)],
    /// Craft time for one wafer at fab speed 1.
    pub craft_time_ms: u64,
    /// Node whose unlock makes this wafer available.
    pub unlocked_at: ProcessNode,
}

pub static WAFERS: [WaferDef; 4] = [
    WaferDef {
        id: WaferId::Basic,
        name: "Basic Wafer",
        tier: 1,
        recipe: &[
            (MineralId::Silicon, 100),
            (MineralId::Copper, 20),
            (MineralId::Aluminum, 10),
        ],
        craft_time_ms: 2_000,
        unlocked_at: ProcessNode::Nm90,
    },
    WaferDef {
        id: WaferId::Refined,
        name: "Refined Wafer",
        tier: 2,
        recipe: &[
            (MineralId::Silicon, 500),
            (MineralId::Copper, 100),
            (MineralId::Gold, 10),
            (MineralId::Silver, 20),
        ],
        craft_time_ms: 5_000,
        unlocked_at: ProcessNode::Nm65,
    },
    WaferDef {
        id: WaferId::Pure,
        name: "Pure Wafer",
        tier: 3,
        recipe: &[
            (MineralId::Silicon, 2_000),
            (MineralId::Gold, 50),
            (MineralId::Lithium, 20),
            (MineralId::Cobalt, 10),
        ],
        craft_time_ms: 10_000,
        unlocked_at: ProcessNode::Nm28,
    },
    WaferDef {
        id: WaferId::Quantum,
        name: "Quantum Wafer",
        tier: 4,
        recipe: &[
            (MineralId::Silicon, 10_000),
            (MineralId::Gold, 200),
            (MineralId::Neodymium, 50),
            (MineralId::Gallium, 30),
            (MineralId::Germanium, 10),
        ],
        craft_time_ms: 30_000,
        // Released together with the HBM stack, which consumes it.
        unlocked_at: ProcessNode::Nm7,
    },
];

impl WaferId {
    pub fn def(self) -> &'static WaferDef {
        &WAFERS[self.index()]
    }
}

// ---------------------------------------------------------------------------
// Chips
// ---------------------------------------------------------------------------

/// Static definition of a chip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipDef {
    pub id: ChipId,
    pub name: &'static str,
    pub category: ChipCategory,
    pub tier: u8,
    /// Minimum process node required to fabricate.
    pub node: ProcessNode,
    /// Wafers consumed per chip.
    pub wafer_cost: (WaferId, u32),
    /// Minerals consumed per chip on top of the wafers.
    pub extra_costs: &'static [(MineralId, u32)],
    pub craft_time_ms: u64,
    /// Base output of one owned chip before node efficiency and multipliers.
    pub flops_per_second: f64,
    pub description: &'static str,
}

impl ChipDef {
    pub fn flops_per_second(&self) -> Big {
        Big::from_f64(self.flops_per_second)
    }
}

pub static CHIPS: [ChipDef; 12] = [
    ChipDef {
        id: ChipId::CpuBasic,
        name: "Basic CPU",
        category: ChipCategory::Cpu,
        tier: 1,
        node: ProcessNode::Nm90,
        wafer_cost: (WaferId::Basic, 1),
        extra_costs: &[],
        craft_time_ms: 3_000,
        flops_per_second: 1e6,
        description: "Simple processor. Gets the job done.",
    },
    ChipDef {
        id: ChipId::GpuBasic,
        name: "Basic GPU",
        category: ChipCategory::Gpu,
        tier: 1,
        node: ProcessNode::Nm90,
        wafer_cost: (WaferId::Basic, 2),
        extra_costs: &[(MineralId::Copper, 50)],
        craft_time_ms: 4_000,
        flops_per_second: 1e7,
        description: "Parallel processing. Great for graphics.",
    },
    ChipDef {
        id: ChipId::RamBasic,
        name: "Basic RAM",
        category: ChipCategory::Memory,
        tier: 1,
        node: ProcessNode::Nm90,
        wafer_cost: (WaferId::Basic, 1),
        extra_costs: &[],
        craft_time_ms: 2_000,
        flops_per_second: 1e5,
        description: "Volatile storage. Fast but forgetful.",
    },
    ChipDef {
        id: ChipId::CpuCore,
        name: "Core Processor",
        category: ChipCategory::Cpu,
        tier: 2,
        node: ProcessNode::Nm65,
        wafer_cost: (WaferId::Refined, 1),
        extra_costs: &[(MineralId::Gold, 5)],
        craft_time_ms: 5_000,
        flops_per_second: 1e8,
        description: "Multi-core architecture. Serious compute.",
    },
    ChipDef {
        id: ChipId::GpuGaming,
        name: "Gaming GPU",
        category: ChipCategory::Gpu,
        tier: 2,
        node: ProcessNode::Nm45,
        wafer_cost: (WaferId::Refined, 2),
        extra_costs: &[(MineralId::Gold, 15), (MineralId::Tin, 10)],
        craft_time_ms: 8_000,
        flops_per_second: 1e9,
        description: "High-end graphics. Smooth 60fps.",
    },
    ChipDef {
        id: ChipId::RamDdr5,
        name: "DDR5 Module",
        category: ChipCategory::Memory,
        tier: 2,
        node: ProcessNode::Nm45,
        wafer_cost: (WaferId::Refined, 1),
        extra_costs: &[(MineralId::Silver, 10)],
        craft_time_ms: 4_000,
        flops_per_second: 1e7,
        description: "High bandwidth. Feeds hungry CPUs.",
    },
    ChipDef {
        id: ChipId::CpuServer,
        name: "Server CPU",
        category: ChipCategory::Cpu,
        tier: 3,
        node: ProcessNode::Nm28,
        wafer_cost: (WaferId::Pure, 2),
        extra_costs: &[(MineralId::Gold, 20), (MineralId::Cobalt, 5)],
        craft_time_ms: 10_000,
        flops_per_second: 1e10,
        description: "Datacenter-grade. Always-on compute.",
    },
    ChipDef {
        id: ChipId::GpuCompute,
        name: "Compute GPU",
        category: ChipCategory::Gpu,
        tier: 3,
        node: ProcessNode::Nm14,
        wafer_cost: (WaferId::Pure, 3),
        extra_costs: &[(MineralId::Gold, 50), (MineralId::Neodymium, 10)],
        craft_time_ms: 15_000,
        flops_per_second: 1e12,
        description: "AI training beast. Tensor cores included.",
    },
    ChipDef {
        id: ChipId::AsicMiner,
        name: "Mining ASIC",
        category: ChipCategory::Asic,
        tier: 2,
        node: ProcessNode::Nm28,
        wafer_cost: (WaferId::Pure, 1),
        extra_costs: &[(MineralId::Copper, 100), (MineralId::Tantalum, 5)],
        craft_time_ms: 8_000,
        flops_per_second: 1e11,
        description: "One job, done perfectly. Hashes for days.",
    },
    ChipDef {
        id: ChipId::RamHbm,
        name: "HBM Stack",
        category: ChipCategory::Memory,
        tier: 3,
        node: ProcessNode::Nm7,
        wafer_cost: (WaferId::Quantum, 1),
        extra_costs: &[(MineralId::Indium, 5)],
        craft_time_ms: 20_000,
        flops_per_second: 1e11,
        description: "3D stacked memory. Bandwidth monster.",
    },
    ChipDef {
        id: ChipId::AsicAi,
        name: "AI Accelerator",
        category: ChipCategory::Asic,
        tier: 3,
        node: ProcessNode::Nm5,
        wafer_cost: (WaferId::Quantum, 2),
        extra_costs: &[(MineralId::Hafnium, 5), (MineralId::Germanium, 3)],
        craft_time_ms: 25_000,
        flops_per_second: 1e14,
        description: "Neural engine. Thinks faster than you.",
    },
    ChipDef {
        id: ChipId::QpuBasic,
        name: "Quantum Processor",
        category: ChipCategory::Quantum,
        tier: 4,
        node: ProcessNode::Nm3,
        wafer_cost: (WaferId::Quantum, 5),
        extra_costs: &[
            (MineralId::Hafnium, 20),
            (MineralId::Germanium, 10),
            (MineralId::Neodymium, 15),
        ],
        craft_time_ms: 60_000,
        flops_per_second: 1e18,
        description: "Qubits entangled. Reality bends here.",
    },
];

impl ChipId {
    pub fn def(self) -> &'static ChipDef {
        &CHIPS[self.index()]
    }
}

/// Chips unlocked in a fresh game.
pub const STARTER_CHIPS: [ChipId; 3] = [ChipId::CpuBasic, ChipId::GpuBasic, ChipId::RamBasic];

// ---------------------------------------------------------------------------
// Process nodes
// ---------------------------------------------------------------------------

/// Static definition of a lithography process node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessNodeDef {
    pub id: ProcessNode,
    pub name: &'static str,
    pub year: u16,
    pub unlocks_chips: &'static [ChipId],
    pub unlocks_wafers: &'static [WaferId],
    /// FLOPS spent to unlock through the sequential path.
    pub unlock_cost: f64,
    /// Multiplier on the FLOPS output of every owned chip while current.
    pub efficiency: f64,
}

impl ProcessNodeDef {
    pub fn unlock_cost(&self) -> Big {
        Big::from_f64(self.unlock_cost)
    }
}

pub static PROCESS_NODES: [ProcessNodeDef; 8] = [
    ProcessNodeDef {
        id: ProcessNode::Nm90,
        name: "90nm Process",
        year: 2002,
        unlocks_chips: &[ChipId::CpuBasic, ChipId::GpuBasic, ChipId::RamBasic],
        unlocks_wafers: &[WaferId::Basic],
        unlock_cost: 0.0,
        efficiency: 1.0,
    },
    ProcessNodeDef {
        id: ProcessNode::Nm65,
        name: "65nm Process",
        year: 2006,
        unlocks_chips: &[ChipId::CpuCore],
        unlocks_wafers: &[WaferId::Refined],
        unlock_cost: 1e9,
        efficiency: 1.5,
    },
    ProcessNodeDef {
        id: ProcessNode::Nm45,
        name: "45nm Process",
        year: 2008,
        unlocks_chips: &[ChipId::GpuGaming, ChipId::RamDdr5],
        unlocks_wafers: &[],
        unlock_cost: 1e11,
        efficiency: 2.0,
    },
    ProcessNodeDef {
        id: ProcessNode::Nm28,
        name: "28nm Process",
        year: 2011,
        unlocks_chips: &[ChipId::CpuServer, ChipId::AsicMiner],
        unlocks_wafers: &[WaferId::Pure],
        unlock_cost: 1e13,
        efficiency: 3.0,
    },
    ProcessNodeDef {
        id: ProcessNode::Nm14,
        name: "14nm FinFET",
        year: 2014,
        unlocks_chips: &[ChipId::GpuCompute],
        unlocks_wafers: &[],
        unlock_cost: 1e15,
        efficiency: 5.0,
    },
    ProcessNodeDef {
        id: ProcessNode::Nm7,
        name: "7nm EUV",
        year: 2018,
        unlocks_chips: &[ChipId::RamHbm],
        unlocks_wafers: &[WaferId::Quantum],
        unlock_cost: 1e17,
        efficiency: 10.0,
    },
    ProcessNodeDef {
        id: ProcessNode::Nm5,
        name: "5nm EUV",
        year: 2020,
        unlocks_chips: &[ChipId::AsicAi],
        unlocks_wafers: &[],
        unlock_cost: 1e19,
        efficiency: 20.0,
    },
    ProcessNodeDef {
        id: ProcessNode::Nm3,
        name: "3nm GAA",
        year: 2023,
        unlocks_chips: &[ChipId::QpuBasic],
        unlocks_wafers: &[],
        unlock_cost: 1e21,
        efficiency: 50.0,
    },
];

impl ProcessNode {
    pub fn def(self) -> &'static ProcessNodeDef {
        &PROCESS_NODES[self.index()]
    }

    /// The node before this one in unlock order.
    pub fn previous(self) -> Option<ProcessNode> {
        self.index()
            .checked_sub(1)
            .and_then(|i| ProcessNode::ALL.get(i).copied())
    }

    /// The node after this one in unlock order.
    pub fn next(self) -> Option<ProcessNode> {
        ProcessNode::ALL.get(self.index() + 1).copied()
    }
}
