// In: src/lib.rs

//! Pokedream Battle Engine
//!
//! A turn-based 1v1 combat core for a creature-collecting chat game:
//! deterministic-given-RNG damage resolution, per-session state machines,
//! reward strategies, and a concurrency-safe registry with an idle
//! watchdog. Presentation, command parsing, and long-term persistence live
//! outside the crate and talk to it through the ports in [`ports`].

// --- MODULE DECLARATIONS ---
// This declares the module hierarchy for the crate.
pub mod battle;
pub mod data;
pub mod errors;
pub mod ports;
pub mod progression;
pub mod rng;
pub mod unit;

// --- PUBLIC API RE-EXPORTS ---
// The public-facing API of the `pokedream-battle` crate, making the most
// important types importable directly.

// --- From the `schema` crate ---
// Re-export the shared data descriptors.
pub use schema::{
    ActorId,
    Ailment,
    BaseStats,
    DamageClass,
    EvolutionData,
    ItemId,
    MoveData,
    MoveId,
    MoveMeta,
    SpeciesData,
    SpeciesId,
    StatChange,
    StatKind,
    TargetScope,
    TypeId,
};

// --- From this crate's modules (`src/`) ---

// Core engine surface.
pub use battle::calc::{resolve_move, MoveEffect, MoveOutcome};
pub use battle::registry::{BattleRegistry, RegistryConfig, SessionId};
pub use battle::rewards::{
    strategy_for, GymDirective, Payout, RewardContext, RewardOutcome, RewardStrategy, UnitTransfer,
};
pub use battle::state::{
    BattleCategory, BattleEvent, BattleKind, BattleSession, DriveMode, EventBus, RewardCategory,
    SessionPhase,
};
pub use battle::turn::{TerminalOutcome, TurnReport};

// Core runtime types for a battle.
pub use progression::{award_victory_experience, VictoryProgress, LEVEL_CAP};
pub use unit::{ActorKind, Combatant, FightingUnit, StatStages};

// Collaborator interfaces and data access.
pub use data::{stage_multiplier, StaticDataProvider};
pub use ports::{EconomyPort, PersistencePort, PresentationSink, UnitRef};
pub use rng::{RandomSource, ScriptedRng, SeededRng};

// Crate-specific error and result types.
pub use errors::{BattleError, BattleResult};
