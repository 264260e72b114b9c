//! Damage calculator: one move application against a defender snapshot.
//!
//! `resolve_move` is pure aside from RNG draws; it never mutates either unit.
//! Applying the returned [`MoveOutcome`] to session state is the turn
//! resolver's job.

use crate::data::{
    stage_multiplier, StaticDataProvider, SLEEP_USABLE_MOVES, THAW_MOVES,
};
use crate::errors::BattleResult;
use crate::rng::RandomSource;
use crate::unit::FightingUnit;
use schema::{Ailment, DamageClass, MoveData, StatChange};
use serde::{Deserialize, Serialize};

/// Classification of a move application for messaging purposes. A miss
/// overrides every other classification.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEffect {
    Missed,
    SuperEffective,
    NotEffective,
    Normal,
    NoEffect,
}

/// Result of applying one move. Damage and healing are amounts to apply, not
/// yet clamped against anyone's HP.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub success: bool,
    pub damage: u16,
    /// Negative healing is recoil and costs the attacker HP.
    pub healing: i16,
    pub hits: u8,
    pub ailment: Option<Ailment>,
    pub stat_changes: Vec<StatChange>,
    pub critical: bool,
    pub effect: MoveEffect,
    pub messages: Vec<String>,
}

impl MoveOutcome {
    fn cancelled(effect: MoveEffect, messages: Vec<String>) -> Self {
        Self {
            success: false,
            damage: 0,
            healing: 0,
            hits: 0,
            ailment: None,
            stat_changes: Vec::new(),
            critical: false,
            effect,
            messages,
        }
    }
}

/// Pre-move gate for the attacker's own ailments. Sleep and Freeze cancel
/// without an RNG draw (unless the move is exempt); Paralysis cancels on a
/// 25% roll.
fn ailment_cancels(
    attacker: &FightingUnit,
    mv: &MoveData,
    rng: &mut dyn RandomSource,
) -> Option<String> {
    if attacker.ailments.contains(&Ailment::Sleep) && !SLEEP_USABLE_MOVES.contains(&mv.id) {
        return Some(format!("{} is fast asleep!", attacker.name));
    }
    if attacker.ailments.contains(&Ailment::Freeze) && !THAW_MOVES.contains(&mv.id) {
        return Some(format!("{} is frozen solid!", attacker.name));
    }
    if attacker.ailments.contains(&Ailment::Paralysis) && rng.percent("paralysis check") < 25 {
        return Some(format!("{} is paralyzed and can't move!", attacker.name));
    }
    None
}

/// Resolve one application of `mv` by `attacker` against `defender`.
///
/// RNG draw order is fixed so scripted tests stay stable:
/// paralysis check (only when paralyzed), accuracy, hit count (only for
/// multi-hit moves), critical, stat-change chance, ailment chance.
pub fn resolve_move(
    data: &dyn StaticDataProvider,
    mv: &MoveData,
    attacker: &FightingUnit,
    defender: &FightingUnit,
    rng: &mut dyn RandomSource,
) -> BattleResult<MoveOutcome> {
    if let Some(message) = ailment_cancels(attacker, mv, rng) {
        return Ok(MoveOutcome::cancelled(MoveEffect::Missed, vec![message]));
    }

    let mut messages: Vec<String> = Vec::new();

    let (success, mut damage, hits, critical) = if mv.is_status() {
        // Status moves always land; their stat/ailment rolls still run below.
        (true, 0.0_f64, 0_u8, false)
    } else {
        // The roll space has 99 values, so accuracy 99 and accuracy 100 are
        // indistinguishable and accuracy 0 never hits. Kept as-is; changing
        // the boundary would shift combat balance.
        let accuracy = mv.accuracy.unwrap_or(100) as u32;
        let success = rng.roll(1, 99, "accuracy roll") <= accuracy;

        let min_hits = mv.meta.min_hits.unwrap_or(1).max(1) as u32;
        let max_hits = mv.meta.max_hits.unwrap_or(1).max(min_hits as u8) as u32;
        let hits = if max_hits > min_hits {
            rng.roll(min_hits, max_hits, "hit count") as u8
        } else {
            min_hits as u8
        };

        let critical = rng.roll(1, 150, "critical roll") == 1;

        let attacker_species = data.require_species(attacker.species)?;
        let power = mv.power.unwrap_or(0) as f64;
        let stab = if attacker_species.types.contains(&mv.type_id) {
            1.5
        } else {
            1.0
        };
        let spread = if mv.target.is_spread() { 0.75 } else { 1.0 };

        let stats = attacker.stats.as_array();
        let defender_stats = defender.stats.as_array();

        // Stage lookups both key off the attacker's stage table, defense
        // included. That matches the source engine; see DESIGN.md before
        // touching it.
        let (atk, def) = match mv.damage_class {
            DamageClass::Physical => (
                stats[1] as f64 * stage_multiplier(attacker.stages.atk)?,
                defender_stats[2] as f64 * stage_multiplier(attacker.stages.def)?,
            ),
            _ => (
                stats[3] as f64 * stage_multiplier(attacker.stages.satk)?,
                defender_stats[4] as f64 * stage_multiplier(attacker.stages.sdef)?,
            ),
        };

        let level = attacker.level as f64;
        let base = ((2.0 * level / 5.0 + 2.0) * power * atk / def / 50.0).floor() + 2.0;

        let crit_multiplier = if critical { 2.0 } else { 1.0 };
        let damage = base * stab * spread * crit_multiplier * hits as f64;

        (success, damage, hits, critical)
    };

    // Type efficacy is the product over the defender's types.
    let defender_species = data.require_species(defender.species)?;
    let mut type_multiplier = 1.0_f64;
    for defend_type in &defender_species.types {
        type_multiplier *= data.type_efficacy(mv.type_id, *defend_type);
    }

    let effect = if !success {
        messages.push("It missed!".to_string());
        type_multiplier = 0.0;
        MoveEffect::Missed
    } else if mv.is_status() {
        MoveEffect::Normal
    } else if type_multiplier == 0.0 {
        messages.push("It had no effect!".to_string());
        MoveEffect::NoEffect
    } else if type_multiplier < 1.0 {
        messages.push("It was not very effective...".to_string());
        MoveEffect::NotEffective
    } else if type_multiplier == 1.0 {
        MoveEffect::Normal
    } else {
        messages.push("It was super effective!".to_string());
        MoveEffect::SuperEffective
    };

    damage *= type_multiplier;

    // Burn halves physical damage, keyed off the move's own class.
    if attacker.ailments.contains(&Ailment::Burn) && mv.damage_class == DamageClass::Physical {
        damage /= 2.0;
    }

    if success && hits > 1 {
        messages.push(format!("It hit {} times!", hits));
    }

    let mut healing = damage * mv.meta.drain_pct as f64 / 100.0;
    healing += attacker.max_hp as f64 * mv.meta.healing_pct as f64 / 100.0;

    // At most one stat-change and one ailment event per application.
    let mut stat_changes = Vec::new();
    if let Some(change) = mv.meta.stat_change {
        if mv.meta.stat_chance > 0 && rng.percent("stat change chance") < mv.meta.stat_chance as u32
        {
            stat_changes.push(change);
        }
    }

    let ailment = match mv.meta.ailment {
        Some(ailment)
            if mv.meta.ailment_chance > 0
                && rng.percent("ailment chance") < mv.meta.ailment_chance as u32 =>
        {
            Some(ailment)
        }
        _ => None,
    };

    Ok(MoveOutcome {
        success,
        damage: damage.round().max(0.0) as u16,
        healing: healing.round() as i16,
        hits,
        ailment,
        stat_changes,
        critical,
        effect,
        messages,
    })
}
