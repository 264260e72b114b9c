use crate::ids::{MoveId, TypeId};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Which stat pair drives a move's damage. The discriminants match the
/// `damage_class_id` column of the upstream dataset.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageClass {
    Status = 1,
    Physical = 2,
    Special = 3,
}

/// Raw target id of a move. Most moves target a single opponent; the ids in
/// `SPREAD_TARGETS` hit multiple battlers and take a damage discount.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetScope(pub u8);

/// Target ids whose moves hit more than one battler.
pub const SPREAD_TARGETS: [u8; 6] = [5, 9, 10, 11, 13, 14];

/// Target id for moves that affect the user itself (stat boosts, most heals).
pub const TARGET_USER: u8 = 7;

impl TargetScope {
    pub fn is_spread(self) -> bool {
        SPREAD_TARGETS.contains(&self.0)
    }

    pub fn is_user(self) -> bool {
        self.0 == TARGET_USER
    }
}

/// Persistent status conditions a unit can carry between turns.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter,
)]
pub enum Ailment {
    Paralysis,
    Sleep,
    Freeze,
    Burn,
    Poison,
}

/// The nine stage axes a battle can shift. Discriminants match the
/// `change_stat_id` column of the upstream dataset (1-based).
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter,
)]
pub enum StatKind {
    #[strum(serialize = "HP")]
    Hp = 1,
    #[strum(serialize = "Attack")]
    Attack = 2,
    #[strum(serialize = "Defense")]
    Defense = 3,
    #[strum(serialize = "Sp. Attack")]
    SpecialAttack = 4,
    #[strum(serialize = "Sp. Defense")]
    SpecialDefense = 5,
    #[strum(serialize = "Speed")]
    Speed = 6,
    #[strum(serialize = "Evasion")]
    Evasion = 7,
    #[strum(serialize = "Accuracy")]
    Accuracy = 8,
    #[strum(serialize = "Crit Rate")]
    CritRate = 9,
}

/// A single stage shift carried by a move's meta record.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatChange {
    pub stat: StatKind,
    pub delta: i8,
}

/// Secondary-effect record of a move: ailment and stage rolls, drain/heal
/// percentages, and the multi-hit range.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MoveMeta {
    pub ailment: Option<Ailment>,
    /// Percentage chance `[0, 100]` that `ailment` is inflicted on a hit.
    pub ailment_chance: u8,
    pub stat_change: Option<StatChange>,
    /// Percentage chance `[0, 100]` that `stat_change` is applied on a hit.
    pub stat_chance: u8,
    /// Percent of dealt damage returned to the attacker as healing.
    pub drain_pct: i8,
    /// Percent of the attacker's max HP restored on a successful use.
    pub healing_pct: i8,
    pub min_hits: Option<u8>,
    pub max_hits: Option<u8>,
}

/// Immutable descriptor of a move as served by the static data provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MoveData {
    pub id: MoveId,
    pub name: String,
    /// `None` marks a status move with no direct damage.
    pub power: Option<u16>,
    /// `None` means the move never misses.
    pub accuracy: Option<u8>,
    pub priority: i8,
    pub damage_class: DamageClass,
    pub type_id: TypeId,
    pub target: TargetScope,
    #[serde(default)]
    pub meta: MoveMeta,
}

impl MoveData {
    /// Status moves deal no direct damage; their stat and ailment rolls
    /// still run.
    pub fn is_status(&self) -> bool {
        self.damage_class == DamageClass::Status || self.power.is_none()
    }
}
