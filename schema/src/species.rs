use crate::ids::{SpeciesId, TypeId};
use serde::{Deserialize, Serialize};

/// The six base stats of a species, in dataset order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

impl BaseStats {
    pub fn total(&self) -> u16 {
        self.hp + self.attack + self.defense + self.sp_attack + self.sp_defense + self.speed
    }

    /// Stats as an array in dataset order (hp, atk, def, satk, sdef, spd).
    pub fn as_array(&self) -> [u16; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.sp_attack,
            self.sp_defense,
            self.speed,
        ]
    }
}

/// Level-up evolution target of a species.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvolutionData {
    pub evolves_into: SpeciesId,
    pub at_level: u8,
}

/// Immutable descriptor of a species as served by the static data provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpeciesData {
    pub id: SpeciesId,
    pub name: String,
    pub types: Vec<TypeId>,
    pub base_stats: BaseStats,
    pub evolution: Option<EvolutionData>,
}
