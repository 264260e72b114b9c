//! Turn resolution: accepting submissions, chip damage, applying outcomes,
//! and detecting termination.
//!
//! Everything here is synchronous and port-free so the state machine can be
//! tested without a registry. The registry serializes calls per session and
//! handles persistence, rewards, and event delivery around these functions.

use crate::battle::calc::{resolve_move, MoveOutcome};
use crate::battle::registry::SessionId;
use crate::battle::state::{
    BattleEvent, BattleSession, DriveMode, EventBus, OutcomeRecord, SessionPhase,
};
use crate::data::StaticDataProvider;
use crate::errors::{BattleError, BattleResult};
use crate::rng::RandomSource;
use schema::{ActorId, Ailment, MoveId};

/// Winner/loser pair of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalOutcome {
    pub winner: ActorId,
    pub loser: ActorId,
}

/// What one accepted submission produced.
///
/// A first submission in a human-vs-human turn is accepted but resolves
/// nothing (`resolved == false`, no events beyond none). Once the second
/// submission arrives, the whole turn resolves in that call and the report
/// carries every event and outcome from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnReport {
    pub events: EventBus,
    pub resolved: bool,
    pub terminal: Option<TerminalOutcome>,
}

impl TurnReport {
    /// Outcome of the given actor's move this turn, if it was applied.
    pub fn outcome_for(&self, actor: ActorId) -> Option<&MoveOutcome> {
        self.events.events().iter().find_map(|event| match event {
            BattleEvent::MoveApplied {
                actor: a, outcome, ..
            } if *a == actor => Some(outcome),
            _ => None,
        })
    }
}

/// Accept a move submission for `actor` and resolve the turn if it is now
/// complete.
///
/// Rejections: [`BattleError::SessionTerminal`] after the win condition,
/// [`BattleError::AlreadySubmitted`] for a duplicate submission in the same
/// turn, [`BattleError::InvalidMove`] when the combatant does not know the
/// move, and [`BattleError::SessionNotFound`] when the actor is not part of
/// this session. Calculator failures during resolution (a missing data
/// record, a stat stage outside the multiplier table) propagate instead of
/// being dropped.
pub fn submit_move(
    session: &mut BattleSession,
    session_id: SessionId,
    actor: ActorId,
    move_id: MoveId,
    data: &dyn StaticDataProvider,
    rng: &mut dyn RandomSource,
) -> BattleResult<TurnReport> {
    if session.is_terminal() {
        return Err(BattleError::SessionTerminal(session_id));
    }

    let index = session
        .index_of(actor)
        .ok_or(BattleError::SessionNotFound(session_id))?;

    if session.submitted.contains(&actor) {
        return Err(BattleError::AlreadySubmitted { actor });
    }

    if !session.combatants[index].unit.knows(move_id) {
        return Err(BattleError::InvalidMove { actor, move_id });
    }

    session.submitted.insert(actor);
    session.pending.push((actor, move_id));
    session.touch();

    // A scripted opponent answers in the same submission, picked uniformly
    // from its known moves.
    if session.drive == DriveMode::Scripted {
        let opponent = &session.combatants[1 - index];
        if opponent.is_scripted() && !session.submitted.contains(&opponent.actor) {
            let moves = &opponent.unit.moves;
            let choice = if moves.len() > 1 {
                rng.roll(0, moves.len() as u32 - 1, "scripted move choice") as usize
            } else {
                0
            };
            let opponent_actor = opponent.actor;
            let opponent_move = moves[choice];
            session.submitted.insert(opponent_actor);
            session.pending.push((opponent_actor, opponent_move));
        }
    }

    if session.submitted.len() < 2 {
        return Ok(TurnReport::default());
    }

    resolve_turn(session, data, rng)
}

/// Resolve a complete turn: chip damage for both sides, then each pending
/// move in submission order. The session goes terminal the moment a unit's
/// HP first reaches zero; anything still pending after that is dropped.
/// A calculator error aborts resolution and surfaces to the caller.
fn resolve_turn(
    session: &mut BattleSession,
    data: &dyn StaticDataProvider,
    rng: &mut dyn RandomSource,
) -> BattleResult<TurnReport> {
    session.phase = SessionPhase::Resolving;

    let mut bus = EventBus::new();
    bus.push(BattleEvent::TurnStarted { turn: session.turn });

    let mut terminal = apply_chip_damage(session, &mut bus);

    if terminal.is_none() {
        let pending = std::mem::take(&mut session.pending);
        for (actor, move_id) in pending {
            terminal = apply_submission(session, actor, move_id, data, rng, &mut bus)?;
            if terminal.is_some() {
                break;
            }
        }
    }

    let terminal = terminal;
    if let Some(outcome) = terminal {
        session.phase = SessionPhase::Terminal;
        bus.push(BattleEvent::SessionTerminal {
            winner: outcome.winner,
            loser: outcome.loser,
        });
    } else {
        session.begin_next_turn();
    }

    Ok(TurnReport {
        events: bus,
        resolved: true,
        terminal,
    })
}

/// Burn and Poison tick on both combatants before any move lands. A unit
/// dropped to zero here loses on the spot.
fn apply_chip_damage(session: &mut BattleSession, bus: &mut EventBus) -> Option<TerminalOutcome> {
    for index in 0..2 {
        let combatant = &mut session.combatants[index];
        let max_hp = combatant.unit.max_hp;

        for (ailment, divisor) in [(Ailment::Burn, 16), (Ailment::Poison, 8)] {
            if !combatant.unit.ailments.contains(&ailment) {
                continue;
            }
            let damage = max_hp / divisor;
            combatant.unit.apply_damage(damage);
            bus.push(BattleEvent::ChipDamage {
                actor: combatant.actor,
                ailment,
                damage,
                remaining_hp: combatant.unit.hp,
            });
        }

        if combatant.unit.is_fainted() {
            let loser = combatant.actor;
            bus.push(BattleEvent::UnitFainted { actor: loser });
            let winner = session.combatants[1 - index].actor;
            return Some(TerminalOutcome { winner, loser });
        }
    }
    None
}

/// Apply one submitted move. Returns the terminal outcome if either side
/// fainted from it; a data-lookup or calculator failure propagates.
fn apply_submission(
    session: &mut BattleSession,
    actor: ActorId,
    move_id: MoveId,
    data: &dyn StaticDataProvider,
    rng: &mut dyn RandomSource,
    bus: &mut EventBus,
) -> BattleResult<Option<TerminalOutcome>> {
    let Some(attacker_index) = session.index_of(actor) else {
        return Ok(None);
    };
    let defender_index = 1 - attacker_index;

    let move_data = data.require_move(move_id)?.clone();

    let outcome = resolve_move(
        data,
        &move_data,
        &session.combatants[attacker_index].unit,
        &session.combatants[defender_index].unit,
        rng,
    )?;

    session.log.push(OutcomeRecord {
        turn: session.turn,
        actor,
        move_id,
        outcome: outcome.clone(),
    });
    bus.push(BattleEvent::MoveApplied {
        actor,
        move_id,
        outcome: outcome.clone(),
    });

    if outcome.success {
        let defender_actor = session.combatants[defender_index].actor;

        if outcome.damage > 0 {
            let lost = session.combatants[defender_index]
                .unit
                .apply_damage(outcome.damage);
            session.combatants[attacker_index].damage_dealt += lost as u32;
            bus.push(BattleEvent::DamageDealt {
                target: defender_actor,
                damage: lost,
                remaining_hp: session.combatants[defender_index].unit.hp,
            });
        }

        if outcome.healing > 0 {
            let recovered = session.combatants[attacker_index]
                .unit
                .heal(outcome.healing as u16);
            bus.push(BattleEvent::Healed {
                actor,
                amount: recovered,
                new_hp: session.combatants[attacker_index].unit.hp,
            });
        } else if outcome.healing < 0 {
            let recoil = session.combatants[attacker_index]
                .unit
                .apply_damage((-outcome.healing) as u16);
            bus.push(BattleEvent::Recoil {
                actor,
                damage: recoil,
                remaining_hp: session.combatants[attacker_index].unit.hp,
            });
        }

        if let Some(ailment) = outcome.ailment {
            if session.combatants[defender_index]
                .unit
                .ailments
                .insert(ailment)
            {
                bus.push(BattleEvent::AilmentInflicted {
                    target: defender_actor,
                    ailment,
                });
            }
        }

        // Self-targeting moves shift the user's stages; everything else
        // shifts the defender's.
        let stat_target_index = if move_data.target.is_user() {
            attacker_index
        } else {
            defender_index
        };
        for change in &outcome.stat_changes {
            session.combatants[stat_target_index]
                .unit
                .stages
                .apply(*change);
            bus.push(BattleEvent::StatStageChanged {
                target: session.combatants[stat_target_index].actor,
                stat: change.stat,
                delta: change.delta,
            });
        }
    }

    // Defender first: a mutual KO through recoil goes to the attacker only
    // if the defender was still standing.
    for (fainted, other) in [
        (defender_index, attacker_index),
        (attacker_index, defender_index),
    ] {
        if session.combatants[fainted].unit.is_fainted() {
            let loser = session.combatants[fainted].actor;
            bus.push(BattleEvent::UnitFainted { actor: loser });
            return Ok(Some(TerminalOutcome {
                winner: session.combatants[other].actor,
                loser,
            }));
        }
    }
    Ok(None)
}
