use crate::battle::registry::SessionId;
use schema::{ActorId, MoveId, SpeciesId};
use thiserror::Error;

/// Main error type for the battle engine. Every rejection the presentation
/// layer may need to message on is a distinct variant; nothing is swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    /// The move is unknown or not among the combatant's known moves.
    #[error("{actor} cannot use {move_id}: not a known move")]
    InvalidMove { actor: ActorId, move_id: MoveId },

    /// The combatant already submitted a move this turn.
    #[error("{actor} already submitted a move this turn")]
    AlreadySubmitted { actor: ActorId },

    /// Session creation was attempted for a combatant that is already
    /// fighting elsewhere.
    #[error("{actor} is already in an active battle")]
    CombatantBusy { actor: ActorId },

    /// No active session matches the given id (unknown, evicted, or already
    /// cleaned up).
    #[error("no active battle session {0}")]
    SessionNotFound(SessionId),

    /// The session already reached its win condition; no further moves are
    /// accepted.
    #[error("battle session {0} is already over")]
    SessionTerminal(SessionId),

    /// A stat stage fell outside the multiplier table. The table covers
    /// [-6, +6] and the engine does not clamp, so an excursion is a caller
    /// bug that must surface instead of wrapping.
    #[error("stat stage {0} is outside the multiplier table range [-6, 6]")]
    StatStageOutOfRange(i16),

    /// The static data provider has no record for this move.
    #[error("move {0} missing from static data")]
    MoveNotFound(MoveId),

    /// The static data provider has no record for this species.
    #[error("species {0} missing from static data")]
    SpeciesNotFound(SpeciesId),
}

/// Type alias for Results using BattleError.
pub type BattleResult<T> = Result<T, BattleError>;
