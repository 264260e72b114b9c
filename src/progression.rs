//! Post-victory experience, leveling, and evolution.

use crate::battle::state::{BattleEvent, EventBus};
use crate::data::{xp_threshold, StaticDataProvider, EVERSTONE};
use crate::errors::BattleResult;
use crate::unit::FightingUnit;
use schema::{ActorId, SpeciesId};

pub const LEVEL_CAP: u8 = 100;

/// What a victory did to the winning unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VictoryProgress {
    pub xp_awarded: u32,
    pub levels_gained: u8,
    pub evolved_into: Option<SpeciesId>,
}

/// Award victory experience to `winner` for defeating `defeated`.
///
/// The award is `round(sum(defeated species base stats) · defeated level /
/// winner level)`. An everstone holder and a level-capped unit get nothing.
/// Accumulated XP rolls the level up repeatedly against the per-level
/// threshold, then the species' evolution threshold is checked once.
pub fn award_victory_experience(
    actor: ActorId,
    winner: &mut FightingUnit,
    defeated: &FightingUnit,
    data: &dyn StaticDataProvider,
    bus: &mut EventBus,
) -> BattleResult<VictoryProgress> {
    if winner.holds(EVERSTONE) || winner.level >= LEVEL_CAP {
        return Ok(VictoryProgress::default());
    }

    let defeated_species = data.require_species(defeated.species)?;
    let stat_total = defeated_species.base_stats.total() as f64;
    let awarded =
        (stat_total * defeated.level as f64 / winner.level as f64).round() as u32;

    bus.push(BattleEvent::ExperienceAwarded {
        actor,
        xp: awarded,
    });

    let mut pool = awarded;
    let mut levels_gained: u8 = 0;
    while pool > 0 && winner.level + levels_gained < LEVEL_CAP {
        let threshold = xp_threshold(winner.level + levels_gained);
        if winner.xp + pool > threshold {
            pool = winner.xp + pool - threshold;
            winner.xp = 0;
            levels_gained += 1;
        } else {
            winner.xp += pool;
            pool = 0;
        }
    }

    if levels_gained > 0 {
        winner.level += levels_gained;
        bus.push(BattleEvent::LeveledUp {
            actor,
            new_level: winner.level,
        });
    }

    let mut evolved_into = None;
    let winner_species = data.require_species(winner.species)?;
    if let Some(evolution) = winner_species.evolution {
        if winner.level >= evolution.at_level {
            let from = winner.species;
            winner.species = evolution.evolves_into;
            evolved_into = Some(evolution.evolves_into);
            bus.push(BattleEvent::Evolved {
                actor,
                from,
                into: evolution.evolves_into,
            });
        }
    }

    Ok(VictoryProgress {
        xp_awarded: awarded,
        levels_gained,
        evolved_into,
    })
}
