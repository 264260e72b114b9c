//! Combat snapshots: the unit being fought with and the actor wielding it.

use schema::{ActorId, Ailment, BaseStats, ItemId, MoveId, SpeciesData, SpeciesId, StatChange, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stage offsets for the nine adjustable axes. Offsets accumulate as moves
/// land; the multiplier table bounds them at lookup time, not here.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatStages {
    pub hp: i16,
    pub atk: i16,
    pub def: i16,
    pub satk: i16,
    pub sdef: i16,
    pub spd: i16,
    pub evasion: i16,
    pub accuracy: i16,
    pub crit: i16,
}

impl StatStages {
    pub fn get(&self, stat: StatKind) -> i16 {
        match stat {
            StatKind::Hp => self.hp,
            StatKind::Attack => self.atk,
            StatKind::Defense => self.def,
            StatKind::SpecialAttack => self.satk,
            StatKind::SpecialDefense => self.sdef,
            StatKind::Speed => self.spd,
            StatKind::Evasion => self.evasion,
            StatKind::Accuracy => self.accuracy,
            StatKind::CritRate => self.crit,
        }
    }

    pub fn apply(&mut self, change: StatChange) {
        let slot = match change.stat {
            StatKind::Hp => &mut self.hp,
            StatKind::Attack => &mut self.atk,
            StatKind::Defense => &mut self.def,
            StatKind::SpecialAttack => &mut self.satk,
            StatKind::SpecialDefense => &mut self.sdef,
            StatKind::Speed => &mut self.spd,
            StatKind::Evasion => &mut self.evasion,
            StatKind::Accuracy => &mut self.accuracy,
            StatKind::CritRate => &mut self.crit,
        };
        *slot += change.delta as i16;
    }
}

/// Snapshot of one combat-capable entity for the duration of a session.
///
/// Owned exclusively by its [`Combatant`]; only the turn resolver mutates it.
/// HP is clamped to `[0, max_hp]` by the mutators, never left out of range.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FightingUnit {
    pub species: SpeciesId,
    pub name: String,
    pub level: u8,
    pub hp: u16,
    pub max_hp: u16,
    /// Effective stats in dataset order, already folded from base/IV/nature.
    pub stats: BaseStats,
    pub ivs: [u8; 6],
    pub nature_id: u8,
    pub held_item: Option<ItemId>,
    pub xp: u32,
    /// Known moves, at most four.
    pub moves: Vec<MoveId>,
    pub ailments: HashSet<Ailment>,
    pub stages: StatStages,
}

impl FightingUnit {
    /// Fresh unit built straight from a species record, used for reward
    /// grants. Stats are the species base stats with no IVs or nature.
    pub fn from_species(species: &SpeciesData, level: u8, moves: Vec<MoveId>) -> Self {
        let stats = species.base_stats;
        Self {
            species: species.id,
            name: species.name.clone(),
            level,
            hp: stats.hp,
            max_hp: stats.hp,
            stats,
            ivs: [0; 6],
            nature_id: 0,
            held_item: None,
            xp: 0,
            moves,
            ailments: HashSet::new(),
            stages: StatStages::default(),
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    pub fn knows(&self, move_id: MoveId) -> bool {
        self.moves.contains(&move_id)
    }

    pub fn holds(&self, item: ItemId) -> bool {
        self.held_item == Some(item)
    }

    /// Subtract damage, clamping at zero. Returns the HP actually lost.
    pub fn apply_damage(&mut self, damage: u16) -> u16 {
        let lost = damage.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Restore HP, clamping at max. Returns the HP actually recovered.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let recovered = amount.min(self.max_hp - self.hp);
        self.hp += recovered;
        recovered
    }
}

/// Whether a combatant is driven by a human submission or by the engine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Human,
    Scripted,
}

/// An actor plus the unit it wields in a session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Combatant {
    pub actor: ActorId,
    pub kind: ActorKind,
    pub unit: FightingUnit,
    /// Cumulative damage dealt this session, the ranking input for raid
    /// payouts.
    pub damage_dealt: u32,
}

impl Combatant {
    pub fn new(actor: ActorId, kind: ActorKind, unit: FightingUnit) -> Self {
        Self {
            actor,
            kind,
            unit,
            damage_dealt: 0,
        }
    }

    pub fn is_scripted(&self) -> bool {
        self.kind == ActorKind::Scripted
    }
}
