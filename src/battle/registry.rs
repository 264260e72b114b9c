//! Concurrency-safe store of active battle sessions.
//!
//! The registry owns all shared state: a session map guarded by its own
//! mutex, plus one mutex per session so a turn's "both submitted" detection
//! and double-apply are atomic. There is no ambient global battle list; the
//! embedding layer constructs a registry and injects its collaborators.
//!
//! Lock order is session before inner map. `tick` snapshots the map, then
//! locks sessions one at a time, so the watchdog never holds both.

use crate::battle::rewards::{strategy_for, GymDirective, RewardContext, RewardOutcome};
use crate::battle::state::{
    BattleCategory, BattleEvent, BattleKind, BattleSession, DriveMode, EventBus, RewardCategory,
    SessionPhase,
};
use crate::battle::turn::{self, TerminalOutcome, TurnReport};
use crate::data::StaticDataProvider;
use crate::errors::{BattleError, BattleResult};
use crate::ports::{EconomyPort, PersistencePort, PresentationSink};
use crate::progression::award_victory_experience;
use crate::rng::RandomSource;
use crate::unit::{Combatant, FightingUnit};
use schema::{ActorId, MoveId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Opaque id of an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "battle#{}", self.0)
    }
}

/// Timing knobs for the idle watchdog.
#[derive(Debug, Clone, Copy)]
pub struct RegistryConfig {
    /// A session with no accepted submission for this long is evicted.
    pub idle_timeout: Duration,
    /// Cadence of the watchdog loop started by `spawn_watchdog`.
    pub tick_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(120),
            tick_interval: Duration::from_secs(5),
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    sessions: HashMap<SessionId, Arc<Mutex<BattleSession>>>,
    by_actor: HashMap<ActorId, SessionId>,
    next_id: u64,
}

/// The public face of the engine: session creation, move submission, lookup,
/// and the idle watchdog.
pub struct BattleRegistry {
    config: RegistryConfig,
    data: Arc<dyn StaticDataProvider>,
    persistence: Arc<dyn PersistencePort>,
    economy: Arc<dyn EconomyPort>,
    sink: Arc<dyn PresentationSink>,
    rng: Mutex<Box<dyn RandomSource>>,
    inner: Mutex<RegistryInner>,
}

impl BattleRegistry {
    pub fn new(
        config: RegistryConfig,
        data: Arc<dyn StaticDataProvider>,
        persistence: Arc<dyn PersistencePort>,
        economy: Arc<dyn EconomyPort>,
        sink: Arc<dyn PresentationSink>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            config,
            data,
            persistence,
            economy,
            sink,
            rng: Mutex::new(rng),
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Open a session for two combatants. Fails with
    /// [`BattleError::CombatantBusy`] if either actor already has one; an
    /// actor is in at most one active session at a time.
    pub async fn create_session(
        &self,
        combatant_a: Combatant,
        combatant_b: Combatant,
        kind: BattleKind,
        drive: DriveMode,
        reward: RewardCategory,
        category: BattleCategory,
    ) -> BattleResult<SessionId> {
        let mut inner = self.inner.lock().await;

        for actor in [combatant_a.actor, combatant_b.actor] {
            if inner.by_actor.contains_key(&actor) {
                return Err(BattleError::CombatantBusy { actor });
            }
        }

        inner.next_id += 1;
        let id = SessionId(inner.next_id);
        let session = BattleSession::new([combatant_a, combatant_b], kind, drive, reward, category);
        let actors = session.actors();

        inner.sessions.insert(id, Arc::new(Mutex::new(session)));
        for actor in actors {
            inner.by_actor.insert(actor, id);
        }

        info!(session = %id, a = %actors[0], b = %actors[1], ?reward, "battle session created");
        Ok(id)
    }

    /// Look up the active session a combatant is fighting in.
    pub async fn get_session_for(
        &self,
        actor: ActorId,
    ) -> Option<(SessionId, Arc<Mutex<BattleSession>>)> {
        let inner = self.inner.lock().await;
        let id = *inner.by_actor.get(&actor)?;
        let session = inner.sessions.get(&id)?.clone();
        Some((id, session))
    }

    /// Submit a move for `actor`. Resolution and event delivery happen in
    /// this call when the submission completes the turn; on termination the
    /// reward strategy runs exactly once and the session leaves the
    /// registry.
    pub async fn submit_move(
        &self,
        session_id: SessionId,
        actor: ActorId,
        move_id: MoveId,
    ) -> BattleResult<TurnReport> {
        let session_arc = {
            let inner = self.inner.lock().await;
            inner
                .sessions
                .get(&session_id)
                .cloned()
                .ok_or(BattleError::SessionNotFound(session_id))?
        };

        let mut session = session_arc.lock().await;

        // The watchdog may have evicted this session between the map lookup
        // and taking its lock. The eviction flag is set under the session
        // lock, so checking it here cannot race; an evicted session is
        // rejected the same way as an unknown one, never as a finished win.
        if session.evicted {
            return Err(BattleError::SessionNotFound(session_id));
        }
        {
            let inner = self.inner.lock().await;
            if !inner.sessions.contains_key(&session_id) {
                return Err(BattleError::SessionNotFound(session_id));
            }
        }

        let mut report = {
            let mut rng = self.rng.lock().await;
            turn::submit_move(
                &mut session,
                session_id,
                actor,
                move_id,
                self.data.as_ref(),
                rng.as_mut(),
            )?
        };

        if let Some(terminal) = report.terminal {
            self.settle_terminal(session_id, &mut session, terminal, &mut report.events)
                .await;
        }

        if !report.events.is_empty() {
            self.sink.publish(session_id, report.events.events()).await;
        }

        if report.terminal.is_some() {
            self.remove_session(session_id).await;
        }

        Ok(report)
    }

    /// Run the reward strategy, post payouts, apply victory progression, and
    /// persist the surviving human units.
    async fn settle_terminal(
        &self,
        session_id: SessionId,
        session: &mut BattleSession,
        terminal: TerminalOutcome,
        bus: &mut EventBus,
    ) {
        debug!(session = %session_id, winner = %terminal.winner, "settling finished battle");

        let winner_index = match session.index_of(terminal.winner) {
            Some(index) => index,
            None => return,
        };
        let loser_index = 1 - winner_index;

        let outcome: RewardOutcome = {
            let ctx = RewardContext {
                winner: &session.combatants[winner_index],
                loser: &session.combatants[loser_index],
                category: session.category,
            };
            strategy_for(session.reward).resolve(&ctx)
        };

        if outcome.grants_xp && !session.combatants[winner_index].is_scripted() {
            let defeated = session.combatants[loser_index].unit.clone();
            let winner = &mut session.combatants[winner_index];
            if let Err(error) = award_victory_experience(
                winner.actor,
                &mut winner.unit,
                &defeated,
                self.data.as_ref(),
                bus,
            ) {
                warn!(session = %session_id, %error, "victory progression failed");
            }
        }

        for payout in &outcome.payouts {
            self.economy
                .grant(
                    payout.actor,
                    payout.credits,
                    payout.shards,
                    payout.redeems,
                    &payout.items,
                )
                .await;
            bus.push(BattleEvent::RewardIssued {
                actor: payout.actor,
                notice: payout.notice.clone(),
            });
        }

        if let Some(transfer) = &outcome.transfer {
            self.persistence
                .transfer_unit(&transfer.unit, transfer.to)
                .await;
        }

        // A species grant mints a fresh unit at the defeated unit's level
        // and hands it over like a capture.
        if let Some(species_id) = outcome.grant_species {
            match self.data.require_species(species_id) {
                Ok(species) => {
                    let mut moves = self.data.moves_learnable_by(species_id);
                    moves.truncate(4);
                    let granted = FightingUnit::from_species(
                        species,
                        session.combatants[loser_index].unit.level,
                        moves,
                    );
                    self.persistence
                        .transfer_unit(&granted, terminal.winner)
                        .await;
                    bus.push(BattleEvent::SpeciesGranted {
                        actor: terminal.winner,
                        species: species_id,
                    });
                }
                Err(error) => {
                    warn!(session = %session_id, %error, "species grant failed");
                }
            }
        }

        if let Some(gym) = &outcome.gym {
            bus.push(match gym {
                GymDirective::TransferLeadership { to } => {
                    BattleEvent::GymLeadershipTransferred { to: *to }
                }
                GymDirective::RecordDefeat { challenger } => BattleEvent::GymDefeatRecorded {
                    challenger: *challenger,
                },
            });
        }

        if let Some((actor, damage)) = outcome.damage_report {
            bus.push(BattleEvent::RaidDamageReport { actor, damage });
        }

        // Post-battle persistence: levels, evolution, and cleared battle
        // state for the human side(s).
        for combatant in session.combatants.iter_mut() {
            if combatant.is_scripted() {
                continue;
            }
            combatant.unit.ailments.clear();
            combatant.unit.stages = Default::default();
            self.persistence
                .save_unit(combatant.actor, &combatant.unit)
                .await;
        }
    }

    /// Drop a session from the registry. Idempotent: removing an unknown or
    /// already-removed id is a no-op.
    pub async fn remove_session(&self, session_id: SessionId) {
        let mut inner = self.inner.lock().await;
        if let Some(session) = inner.sessions.remove(&session_id) {
            // The index may only be cleaned for actors still mapped to this
            // session.
            let actors: Vec<ActorId> = inner
                .by_actor
                .iter()
                .filter(|(_, id)| **id == session_id)
                .map(|(actor, _)| *actor)
                .collect();
            for actor in actors {
                inner.by_actor.remove(&actor);
            }
            drop(session);
            debug!(session = %session_id, "battle session removed");
        }
    }

    /// Number of active sessions.
    pub async fn active_sessions(&self) -> usize {
        self.inner.lock().await.sessions.len()
    }

    /// Watchdog entry point: evict every session idle past the threshold,
    /// emitting [`BattleEvent::SessionTimedOut`] exactly once per eviction.
    /// Eviction is unconditional and terminal; partial-turn state does not
    /// survive it.
    pub async fn tick(&self) {
        let snapshot: Vec<(SessionId, Arc<Mutex<BattleSession>>)> = {
            let inner = self.inner.lock().await;
            inner
                .sessions
                .iter()
                .map(|(id, session)| (*id, session.clone()))
                .collect()
        };

        for (id, session_arc) in snapshot {
            let expired = {
                let mut session = session_arc.lock().await;
                if session.last_activity.elapsed() >= self.config.idle_timeout {
                    // Marking terminal and flagging the eviction close the
                    // race with a submission that already holds the session
                    // handle.
                    session.evicted = true;
                    session.phase = SessionPhase::Terminal;
                    true
                } else {
                    false
                }
            };

            if expired {
                warn!(session = %id, "battle timed out, evicting");
                self.sink.publish(id, &[BattleEvent::SessionTimedOut]).await;
                self.remove_session(id).await;
            }
        }
    }

    /// Drive `tick` on the configured interval until the registry is
    /// dropped.
    pub fn spawn_watchdog(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(registry.config.tick_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                registry.tick().await;
            }
        })
    }
}
