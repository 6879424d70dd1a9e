//! Identifiers for every static content table.
//!
//! Ids are closed enums declared in display order, so `Ord` and iteration
//! over `ALL` both follow the order the game presents items in. Each id
//! serializes as its snake_case string name.

use std::fmt;
use std::str::FromStr;

/// A string failed to name any entry of an id table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} id: {id:?}")]
pub struct UnknownIdError {
    pub kind: &'static str,
    pub id: String,
}

/// Common surface of every id enum: dense indices in display order.
pub trait TableId: Copy + Ord + fmt::Debug + 'static {
    /// Every id, in display order. `ALL[i].index() == i`.
    const ALL: &'static [Self];

    fn index(self) -> usize;
    fn as_str(self) -> &'static str;
}

macro_rules! table_id {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $( $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $( #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }

            pub fn index(self) -> usize {
                self as usize
            }
        }

        impl TableId for $name {
            const ALL: &'static [Self] = $name::ALL;

            fn index(self) -> usize {
                $name::index(self)
            }

            fn as_str(self) -> &'static str {
                $name::as_str(self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(UnknownIdError { kind: $kind, id: s.to_string() }),
                }
            }
        }
    };
}

table_id! {
    /// A mineable raw material.
    pub enum MineralId ("mineral") {
        Silicon => "silicon",
        Copper => "copper",
        Aluminum => "aluminum",
        Gold => "gold",
        Silver => "silver",
        Tin => "tin",
        Lithium => "lithium",
        Cobalt => "cobalt",
        Tantalum => "tantalum",
        Neodymium => "neodymium",
        Gallium => "gallium",
        Indium => "indium",
        Germanium => "germanium",
        Hafnium => "hafnium",
    }
}

table_id! {
    /// An intermediate product crafted from minerals.
    pub enum WaferId ("wafer") {
        Basic => "basic_wafer",
        Refined => "refined_wafer",
        Pure => "pure_wafer",
        Quantum => "quantum_wafer",
    }
}

table_id! {
    /// A finished chip. Owned chips produce FLOPS.
    pub enum ChipId ("chip") {
        CpuBasic => "cpu_basic",
        GpuBasic => "gpu_basic",
        RamBasic => "ram_basic",
        CpuCore => "cpu_core",
        GpuGaming => "gpu_gaming",
        RamDdr5 => "ram_ddr5",
        CpuServer => "cpu_server",
        GpuCompute => "gpu_compute",
        AsicMiner => "asic_miner",
        RamHbm => "ram_hbm",
        AsicAi => "asic_ai",
        QpuBasic => "qpu_basic",
    }
}

table_id! {
    /// A lithography process node, oldest first. Later variants compare greater.
    pub enum ProcessNode ("process node") {
        Nm90 => "90nm",
        Nm65 => "65nm",
        Nm45 => "45nm",
        Nm28 => "28nm",
        Nm14 => "14nm",
        Nm7 => "7nm",
        Nm5 => "5nm",
        Nm3 => "3nm",
    }
}

table_id! {
    /// A research tree entry.
    pub enum ResearchId ("research") {
        Mining2x => "mining_2x",
        FabSpeed2x => "fab_speed_2x",
        FlopsMult2x => "flops_mult_2x",
        Tier2Minerals => "tier2_minerals",
        Node65nm => "node_65nm",
        Node45nm => "node_45nm",
        Mining5x => "mining_5x",
        FabSpeed5x => "fab_speed_5x",
        FlopsMult5x => "flops_mult_5x",
        Tier3Minerals => "tier3_minerals",
        Node28nm => "node_28nm",
        Node14nm => "node_14nm",
        AutoMiner => "auto_miner",
        AutoFab => "auto_fab",
        Tier4Minerals => "tier4_minerals",
        Node7nm => "node_7nm",
        Node5nm => "node_5nm",
        Datacenter => "datacenter",
        FlopsMult10x => "flops_mult_10x",
        Tier5Minerals => "tier5_minerals",
        Node3nm => "node_3nm",
        QuantumComputing => "quantum_computing",
        Singularity => "singularity",
    }
}

table_id! {
    /// A purchasable auto-miner tier.
    pub enum AutoMinerId ("auto-miner") {
        Drill1 => "drill_1",
        Drill2 => "drill_2",
        Drill3 => "drill_3",
        Excavator => "excavator",
        QuantumDrill => "quantum_drill",
    }
}

table_id! {
    /// A named capability switched on by research. Never switched off.
    pub enum Feature ("feature") {
        AutoMiner => "auto_miner",
        AutoFab => "auto_fab",
        Datacenter => "datacenter",
        Quantum => "quantum",
        Singularity => "singularity",
    }
}

table_id! {
    pub enum ChipCategory ("chip category") {
        Cpu => "cpu",
        Gpu => "gpu",
        Memory => "memory",
        Asic => "asic",
        Quantum => "quantum",
    }
}

table_id! {
    pub enum ResearchCategory ("research category") {
        Nodes => "nodes",
        Efficiency => "efficiency",
        Automation => "automation",
        Exotic => "exotic",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_dense<T: TableId>() {
        for (i, id) in T::ALL.iter().enumerate() {
            assert_eq!(id.index(), i, "{id:?}");
        }
    }

    #[test]
    fn indices_are_dense_in_display_order() {
        assert_dense::<MineralId>();
        assert_dense::<WaferId>();
        assert_dense::<ChipId>();
        assert_dense::<ProcessNode>();
        assert_dense::<ResearchId>();
        assert_dense::<AutoMinerId>();
        assert_dense::<Feature>();
        assert_dense::<ChipCategory>();
        assert_dense::<ResearchCategory>();
    }

    #[test]
    fn table_sizes() {
        assert_eq!(MineralId::ALL.len(), 14);
        assert_eq!(WaferId::ALL.len(), 4);
        assert_eq!(ChipId::ALL.len(), 12);
        assert_eq!(ProcessNode::ALL.len(), 8);
        assert_eq!(ResearchId::ALL.len(), 23);
        assert_eq!(AutoMinerId::ALL.len(), 5);
    }

    #[test]
    fn string_names_round_trip() {
        for id in ResearchId::ALL {
            assert_eq!(id.as_str().parse::<ResearchId>(), Ok(*id));
        }
        assert_eq!("90nm".parse::<ProcessNode>(), Ok(ProcessNode::Nm90));
        assert_eq!(ChipId::RamDdr5.to_string(), "ram_ddr5");
    }

    #[test]
    fn unknown_names_are_reported() {
        let err = "unobtainium".parse::<MineralId>().unwrap_err();
        assert_eq!(err.kind, "mineral");
        assert_eq!(err.to_string(), "unknown mineral id: \"unobtainium\"");
    }

    #[test]
    fn serde_uses_string_names() {
        let json = serde_json::to_string(&ProcessNode::Nm65).unwrap();
        assert_eq!(json, "\"65nm\"");
        let back: WaferId = serde_json::from_str("\"pure_wafer\"").unwrap();
        assert_eq!(back, WaferId::Pure);
    }

    #[test]
    fn process_nodes_order_oldest_first() {
        assert!(ProcessNode::Nm90 < ProcessNode::Nm65);
        assert!(ProcessNode::Nm5 < ProcessNode::Nm3);
    }
}
