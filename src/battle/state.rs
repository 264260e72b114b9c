//! Per-session battle state and the event stream it produces.

use crate::battle::calc::MoveOutcome;
use crate::unit::Combatant;
use schema::{ActorId, Ailment, MoveId, SpeciesId, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

/// What kind of match this session is. Only 1v1 exists today; the enum keeps
/// the wire open for the formats the bot exposes around the engine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleKind {
    OneVsOne,
}

/// Who drives the second combatant: another human, or the engine picking
/// uniformly from the scripted unit's known moves.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveMode {
    Human,
    Scripted,
}

/// Cosmetic/terrain flavor of a battle. Gym is also load-bearing: the gym
/// reward strategy keys off it for journey battles.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleCategory {
    Normal,
    Water,
    Gym,
    JourneyGrass,
    JourneyDesert,
    JourneyBadland,
    JourneyWild,
    JourneyCave,
}

/// Phase of the per-session state machine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingMoves,
    Resolving,
    Terminal,
}

/// One applied move in the session log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutcomeRecord {
    pub turn: u32,
    pub actor: ActorId,
    pub move_id: MoveId,
    pub outcome: MoveOutcome,
}

/// Events observed during resolution, delivered to the presentation sink.
/// The engine never formats user-facing text; sinks do.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    TurnStarted {
        turn: u32,
    },
    /// Per-turn chip damage from a persistent ailment (Burn, Poison).
    ChipDamage {
        actor: ActorId,
        ailment: Ailment,
        damage: u16,
        remaining_hp: u16,
    },
    MoveApplied {
        actor: ActorId,
        move_id: MoveId,
        outcome: MoveOutcome,
    },
    DamageDealt {
        target: ActorId,
        damage: u16,
        remaining_hp: u16,
    },
    Healed {
        actor: ActorId,
        amount: u16,
        new_hp: u16,
    },
    Recoil {
        actor: ActorId,
        damage: u16,
        remaining_hp: u16,
    },
    AilmentInflicted {
        target: ActorId,
        ailment: Ailment,
    },
    StatStageChanged {
        target: ActorId,
        stat: StatKind,
        delta: i8,
    },
    UnitFainted {
        actor: ActorId,
    },
    ExperienceAwarded {
        actor: ActorId,
        xp: u32,
    },
    LeveledUp {
        actor: ActorId,
        new_level: u8,
    },
    Evolved {
        actor: ActorId,
        from: SpeciesId,
        into: SpeciesId,
    },
    RewardIssued {
        actor: ActorId,
        notice: String,
    },
    /// A brand-new unit of this species was created and handed to the actor.
    SpeciesGranted {
        actor: ActorId,
        species: SpeciesId,
    },
    GymLeadershipTransferred {
        to: ActorId,
    },
    GymDefeatRecorded {
        challenger: ActorId,
    },
    /// Winner-side damage total for raid ranking, done outside the engine.
    RaidDamageReport {
        actor: ActorId,
        damage: u32,
    },
    SessionTerminal {
        winner: ActorId,
        loser: ActorId,
    },
    SessionTimedOut,
}

/// Ordered collection of events from one engine operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Print all events in debug format with indentation. Test helper.
    pub fn print_debug(&self) {
        for event in &self.events {
            println!("  {:?}", event);
        }
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Reward category of a session, selecting the payout strategy that runs on
/// termination.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewardCategory {
    Basic,
    Capture,
    Christmas,
    TeamRocket,
    SpawnDuel,
    Raid,
    Gym,
    Journey,
    JourneyTrainer,
}

/// One active 1v1 match: two combatants, this turn's submissions, and the
/// accumulated outcome log.
#[derive(Debug, Clone)]
pub struct BattleSession {
    pub combatants: [Combatant; 2],
    pub kind: BattleKind,
    pub drive: DriveMode,
    pub reward: RewardCategory,
    pub category: BattleCategory,
    pub turn: u32,
    /// Actors that have submitted this turn. Never exceeds two entries and
    /// is cleared when a new turn begins.
    pub submitted: HashSet<ActorId>,
    /// Submissions in arrival order; resolution applies them in this order.
    pub pending: Vec<(ActorId, MoveId)>,
    pub phase: SessionPhase,
    /// Set by the watchdog when it evicts the session. A submission still
    /// holding the session handle uses this to tell an eviction apart from
    /// a normal win.
    pub evicted: bool,
    pub last_activity: Instant,
    pub log: Vec<OutcomeRecord>,
}

impl BattleSession {
    pub fn new(
        combatants: [Combatant; 2],
        kind: BattleKind,
        drive: DriveMode,
        reward: RewardCategory,
        category: BattleCategory,
    ) -> Self {
        Self {
            combatants,
            kind,
            drive,
            reward,
            category,
            turn: 1,
            submitted: HashSet::new(),
            pending: Vec::new(),
            phase: SessionPhase::AwaitingMoves,
            evicted: false,
            last_activity: Instant::now(),
            log: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == SessionPhase::Terminal
    }

    pub fn actors(&self) -> [ActorId; 2] {
        [self.combatants[0].actor, self.combatants[1].actor]
    }

    pub fn index_of(&self, actor: ActorId) -> Option<usize> {
        self.combatants.iter().position(|c| c.actor == actor)
    }

    pub fn combatant(&self, actor: ActorId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.actor == actor)
    }

    /// The other side of the match.
    pub fn opponent_index(&self, actor: ActorId) -> Option<usize> {
        self.index_of(actor).map(|i| 1 - i)
    }

    /// Record activity for the idle watchdog.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Start the next turn: submissions reset, phase returns to awaiting.
    pub fn begin_next_turn(&mut self) {
        self.turn += 1;
        self.submitted.clear();
        self.pending.clear();
        self.phase = SessionPhase::AwaitingMoves;
    }
}
