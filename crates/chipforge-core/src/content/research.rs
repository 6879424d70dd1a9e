//! The research tree: costs, prerequisites, and effects.

use crate::big::Big;
use crate::id::{Feature, ProcessNode, ResearchCategory, ResearchId};

/// One consequence of completing a research node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResearchEffect {
    /// Unlock a process node, bypassing the sequential unlock order.
    UnlockNode(ProcessNode),
    /// Unlock every mineral of the given tier.
    UnlockMinerals { tier: u8 },
    MiningMultiplier(f64),
    FabSpeedMultiplier(f64),
    FlopsMultiplier(f64),
    UnlockFeature(Feature),
}

/// Static definition of a research node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResearchDef {
    pub id: ResearchId,
    pub name: &'static str,
    pub description: &'static str,
    pub category: ResearchCategory,
    /// FLOPS spent on purchase.
    pub cost: f64,
    /// Every entry must be completed first.
    pub requires: &'static [ResearchId],
    /// Applied in order, all or nothing.
    pub effects: &'static [ResearchEffect],
}

impl ResearchDef {
    pub fn cost(&self) -> Big {
        Big::from_f64(self.cost)
    }
}

use ResearchEffect::*;
use ResearchId as R;

pub static RESEARCH: [ResearchDef; 23] = [
    ResearchDef {
        id: R::Mining2x,
        name: "Better Picks",
        description: "Double mining yield.",
        category: ResearchCategory::Efficiency,
        cost: 1e7,
        requires: &[],
        effects: &[MiningMultiplier(2.0)],
    },
    ResearchDef {
        id: R::FabSpeed2x,
        name: "Faster Fab",
        description: "Fabrication takes half the time.",
        category: ResearchCategory::Efficiency,
        cost: 5e8,
        requires: &[],
        effects: &[FabSpeedMultiplier(2.0)],
    },
    ResearchDef {
        id: R::FlopsMult2x,
        name: "Optimized Code",
        description: "Chips generate 2x FLOPS.",
        category: ResearchCategory::Efficiency,
        cost: 1e10,
        requires: &[],
        effects: &[FlopsMultiplier(2.0)],
    },
    ResearchDef {
        id: R::Tier2Minerals,
        name: "Precious Metals",
        description: "Unlock Gold, Silver, and Tin for advanced circuits.",
        category: ResearchCategory::Exotic,
        cost: 1e8,
        requires: &[],
        effects: &[UnlockMinerals { tier: 2 }],
    },
    ResearchDef {
        id: R::Node65nm,
        name: "65nm Process",
        description: "Unlock 65nm lithography. Smaller transistors, more power.",
        category: ResearchCategory::Nodes,
        cost: 1e9,
        requires: &[],
        effects: &[UnlockNode(ProcessNode::Nm65)],
    },
    ResearchDef {
        id: R::Node45nm,
        name: "45nm Process",
        description: "High-K metal gate technology.",
        category: ResearchCategory::Nodes,
        cost: 1e11,
        requires: &[R::Node65nm],
        effects: &[UnlockNode(ProcessNode::Nm45)],
    },
    ResearchDef {
        id: R::Mining5x,
        name: "Diamond Drills",
        description: "5x mining yield.",
        category: ResearchCategory::Efficiency,
        cost: 1e11,
        requires: &[R::Mining2x],
        effects: &[MiningMultiplier(5.0)],
    },
    ResearchDef {
        id: R::FabSpeed5x,
        name: "Turbo Fab",
        description: "Fabrication is 5x faster.",
        category: ResearchCategory::Efficiency,
        cost: 1e13,
        requires: &[R::FabSpeed2x],
        effects: &[FabSpeedMultiplier(5.0)],
    },
    ResearchDef {
        id: R::FlopsMult5x,
        name: "Parallel Processing",
        description: "Chips generate 5x FLOPS.",
        category: ResearchCategory::Efficiency,
        cost: 1e14,
        requires: &[R::FlopsMult2x],
        effects: &[FlopsMultiplier(5.0)],
    },
    ResearchDef {
        id: R::Tier3Minerals,
        name: "Rare Earths",
        description: "Unlock Lithium, Cobalt, and Tantalum.",
        category: ResearchCategory::Exotic,
        cost: 1e12,
        requires: &[R::Tier2Minerals, R::Node45nm],
        effects: &[UnlockMinerals { tier: 3 }],
    },
    ResearchDef {
        id: R::Node28nm,
        name: "28nm Process",
        description: "Mature node, excellent efficiency.",
        category: ResearchCategory::Nodes,
        cost: 1e13,
        requires: &[R::Node45nm],
        effects: &[UnlockNode(ProcessNode::Nm28)],
    },
    ResearchDef {
        id: R::Node14nm,
        name: "14nm FinFET",
        description: "First FinFET process. 3D transistors!",
        category: ResearchCategory::Nodes,
        cost: 1e15,
        requires: &[R::Node28nm],
        effects: &[UnlockNode(ProcessNode::Nm14)],
    },
    ResearchDef {
        id: R::AutoMiner,
        name: "Auto-Miners",
        description: "Automatically mine resources over time.",
        category: ResearchCategory::Automation,
        cost: 1e9,
        requires: &[],
        effects: &[UnlockFeature(Feature::AutoMiner)],
    },
    ResearchDef {
        id: R::AutoFab,
        name: "Auto-Fab",
        description: "Queue multiple crafting jobs.",
        category: ResearchCategory::Automation,
        cost: 1e12,
        requires: &[R::AutoMiner],
        effects: &[UnlockFeature(Feature::AutoFab)],
    },
    ResearchDef {
        id: R::Tier4Minerals,
        name: "Exotic Elements",
        description: "Unlock Neodymium, Gallium, and Indium.",
        category: ResearchCategory::Exotic,
        cost: 1e16,
        requires: &[R::Tier3Minerals, R::Node14nm],
        effects: &[UnlockMinerals { tier: 4 }],
    },
    ResearchDef {
        id: R::Node7nm,
        name: "7nm EUV",
        description: "Extreme ultraviolet lithography.",
        category: ResearchCategory::Nodes,
        cost: 1e17,
        requires: &[R::Node14nm],
        effects: &[UnlockNode(ProcessNode::Nm7)],
    },
    ResearchDef {
        id: R::Node5nm,
        name: "5nm EUV",
        description: "Bleeding edge. Used in top smartphones.",
        category: ResearchCategory::Nodes,
        cost: 1e19,
        requires: &[R::Node7nm],
        effects: &[UnlockNode(ProcessNode::Nm5)],
    },
    ResearchDef {
        id: R::Datacenter,
        name: "Datacenter",
        description: "Massive passive FLOPS generation.",
        category: ResearchCategory::Automation,
        cost: 1e15,
        requires: &[R::AutoFab],
        effects: &[UnlockFeature(Feature::Datacenter)],
    },
    ResearchDef {
        id: R::FlopsMult10x,
        name: "Neural Networks",
        description: "Chips generate 10x FLOPS.",
        category: ResearchCategory::Efficiency,
        cost: 1e18,
        requires: &[R::FlopsMult5x],
        effects: &[FlopsMultiplier(10.0)],
    },
    ResearchDef {
        id: R::Tier5Minerals,
        name: "Ultra-Rare",
        description: "Unlock Germanium and Hafnium for quantum wafers.",
        category: ResearchCategory::Exotic,
        cost: 1e20,
        requires: &[R::Tier4Minerals, R::Node5nm],
        effects: &[UnlockMinerals { tier: 5 }],
    },
    ResearchDef {
        id: R::Node3nm,
        name: "3nm GAA",
        description: "Gate-All-Around. The pinnacle.",
        category: ResearchCategory::Nodes,
        cost: 1e21,
        requires: &[R::Node5nm],
        effects: &[UnlockNode(ProcessNode::Nm3)],
    },
    ResearchDef {
        id: R::QuantumComputing,
        name: "Quantum Computing",
        description: "Unlock the Quantum Processor.",
        category: ResearchCategory::Exotic,
        cost: 1e20,
        requires: &[R::Node3nm, R::Tier5Minerals],
        effects: &[UnlockFeature(Feature::Quantum)],
    },
    ResearchDef {
        id: R::Singularity,
        name: "Singularity",
        description: "The end... or the beginning?",
        category: ResearchCategory::Exotic,
        cost: 1e24,
        requires: &[R::QuantumComputing],
        effects: &[UnlockFeature(Feature::Singularity)],
    },
];

impl ResearchId {
    pub fn def(self) -> &'static ResearchDef {
        &RESEARCH[self.index()]
    }
}

/// Research entries of one category, in display order.
pub fn research_by_category(category: ResearchCategory) -> impl Iterator<Item = ResearchId> {
    RESEARCH
        .iter()
        .filter(move |r| r.category == category)
        .map(|r| r.id)
}
