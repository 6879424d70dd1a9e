//! The mineable resources and their base rates.

use crate::big::Big;
use crate::id::MineralId;

/// Static definition of a mineable resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MineralDef {
    pub id: MineralId,
    pub name: &'static str,
    pub symbol: &'static str,
    /// Rarity tier, 1 (common) to 5 (ultra-rare). Unlocked a tier at a time.
    pub tier: u8,
    /// Yield of one manual mine at power 1 and multiplier 1.
    pub base_rate: f64,
}

impl MineralDef {
    pub fn base_rate(&self) -> Big {
        Big::from_f64(self.base_rate)
    }
}

pub const MAX_MINERAL_TIER: u8 = 5;

pub static MINERALS: [MineralDef; 14] = [
    // Tier 1: common
    mineral(MineralId::Silicon, "Silicon", "Si", 1, 1.0),
    mineral(MineralId::Copper, "Copper", "Cu", 1, 0.8),
    mineral(MineralId::Aluminum, "Aluminum", "Al", 1, 0.6),
    // Tier 2: precious metals
    mineral(MineralId::Gold, "Gold", "Au", 2, 0.3),
    mineral(MineralId::Silver, "Silver", "Ag", 2, 0.4),
    mineral(MineralId::Tin, "Tin", "Sn", 2, 0.5),
    // Tier 3: rare earths
    mineral(MineralId::Lithium, "Lithium", "Li", 3, 0.15),
    mineral(MineralId::Cobalt, "Cobalt", "Co", 3, 0.12),
    mineral(MineralId::Tantalum, "Tantalum", "Ta", 3, 0.1),
    // Tier 4: exotic
    mineral(MineralId::Neodymium, "Neodymium", "Nd", 4, 0.05),
    mineral(MineralId::Gallium, "Gallium", "Ga", 4, 0.04),
    mineral(MineralId::Indium, "Indium", "In", 4, 0.03),
    // Tier 5: ultra-rare
    mineral(MineralId::Germanium, "Germanium", "Ge", 5, 0.01),
    mineral(MineralId::Hafnium, "Hafnium", "Hf", 5, 0.005),
];

const fn mineral(
    id: MineralId,
    name: &'static str,
    symbol: &'static str,
    tier: u8,
    base_rate: f64,
) -> MineralDef {
    MineralDef {
        id,
        name,
        symbol,
        tier,
        base_rate,
    }
}

impl MineralId {
    pub fn def(self) -> &'static MineralDef {
        &MINERALS[self.index()]
    }
}

/// Minerals of one tier, in display order.
pub fn minerals_of_tier(tier: u8) -> impl Iterator<Item = MineralId> {
    MINERALS.iter().filter(move |m| m.tier == tier).map(|m| m.id)
}
