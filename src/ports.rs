//! Collaborator interfaces the engine calls out through.
//!
//! The core performs no I/O of its own: persistence, currency, and
//! presentation all go through these ports, injected at registry
//! construction. Implementations are expected to be cheap to clone behind an
//! `Arc` and safe to call from concurrent tasks.

use crate::battle::registry::SessionId;
use crate::battle::state::BattleEvent;
use crate::unit::FightingUnit;
use async_trait::async_trait;
use schema::{ActorId, ItemId};

/// Stable reference to a persisted unit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitRef {
    pub owner: ActorId,
    pub index: u32,
}

/// Narrow load/save contract for unit records. Used only around battle
/// boundaries: loading the snapshot going in, saving level/species/HP-state
/// changes coming out.
#[async_trait]
pub trait PersistencePort: Send + Sync {
    async fn load_unit(&self, unit: UnitRef) -> Option<FightingUnit>;

    async fn save_unit(&self, owner: ActorId, unit: &FightingUnit);

    /// Transfer ownership of a unit to another actor (capture rewards).
    async fn transfer_unit(&self, unit: &FightingUnit, to: ActorId);
}

/// Currency and item grants. The engine computes amounts; it never mutates
/// balances itself.
#[async_trait]
pub trait EconomyPort: Send + Sync {
    async fn grant(
        &self,
        actor: ActorId,
        credits: u32,
        shards: u32,
        redeems: u32,
        items: &[ItemId],
    );
}

/// Observer for the battle event stream. Purely one-way: the engine never
/// waits on the sink, and the sink formats user-facing text on its own.
#[async_trait]
pub trait PresentationSink: Send + Sync {
    async fn publish(&self, session: SessionId, events: &[BattleEvent]);
}
