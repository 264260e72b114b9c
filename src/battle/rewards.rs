//! Reward resolution on session termination.
//!
//! Each [`RewardCategory`] maps to one strategy through `strategy_for`; the
//! strategies are independent and individually testable. A strategy computes
//! a structured [`RewardOutcome`] only — posting payouts to the economy and
//! persisting units is the registry's job, and the engine never mutates
//! currency itself.

use crate::battle::state::{BattleCategory, RewardCategory};
use crate::unit::{Combatant, FightingUnit};
use schema::{ActorId, ItemId, SpeciesId};

/// Everything a strategy may look at when a session ends.
pub struct RewardContext<'a> {
    pub winner: &'a Combatant,
    pub loser: &'a Combatant,
    pub category: BattleCategory,
}

/// One grant to post through the economy port.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payout {
    pub actor: ActorId,
    pub credits: u32,
    pub shards: u32,
    pub redeems: u32,
    pub items: Vec<ItemId>,
    pub notice: String,
}

/// Instruction to hand a unit to an actor (capture victories).
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTransfer {
    pub unit: FightingUnit,
    pub to: ActorId,
}

/// Gym-specific follow-up the embedding layer must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GymDirective {
    /// The challenger beat the leader and takes the gym.
    TransferLeadership { to: ActorId },
    /// The leader's unit held; record the challenger's defeat.
    RecordDefeat { challenger: ActorId },
}

/// Structured payout instructions for one finished session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardOutcome {
    pub payouts: Vec<Payout>,
    /// Whether the turn pipeline should run victory XP for the winner.
    pub grants_xp: bool,
    pub transfer: Option<UnitTransfer>,
    /// A brand-new unit of this species is granted to the winner.
    pub grant_species: Option<SpeciesId>,
    pub gym: Option<GymDirective>,
    /// Raid payouts are ranked externally; this carries the winner-side
    /// damage total the ranking needs.
    pub damage_report: Option<(ActorId, u32)>,
}

/// A payout strategy for one reward category.
pub trait RewardStrategy: Send + Sync {
    fn resolve(&self, ctx: &RewardContext<'_>) -> RewardOutcome;
}

/// Credits granted for a plain victory.
pub const BASIC_WIN_CREDITS: u32 = 100;
/// Shards for beating the Christmas boss, and the consolation shard for
/// losing to it.
pub const CHRISTMAS_WIN_SHARDS: u32 = 50;
pub const CHRISTMAS_CONSOLATION_SHARDS: u32 = 1;
/// Journey coin payouts, posted through the credits channel.
pub const JOURNEY_WIN_COINS: u32 = 50;
pub const JOURNEY_TRAINER_WIN_COINS: u32 = 100;
/// Shards for clearing an elite-four gym on the journey map.
pub const JOURNEY_GYM_SHARDS: u32 = 50;
/// The armored boss unit granted for beating Team Rocket.
pub const TEAM_ROCKET_GRANT_SPECIES: SpeciesId = SpeciesId(150);

struct Basic;
struct Capture;
struct Christmas;
struct TeamRocket;
struct SpawnDuel;
struct Raid;
struct Gym;
struct Journey;
struct JourneyTrainer;

impl RewardStrategy for Basic {
    fn resolve(&self, ctx: &RewardContext<'_>) -> RewardOutcome {
        let mut outcome = RewardOutcome {
            grants_xp: true,
            ..RewardOutcome::default()
        };
        if !ctx.winner.is_scripted() {
            outcome.payouts.push(Payout {
                actor: ctx.winner.actor,
                credits: BASIC_WIN_CREDITS,
                notice: format!("{} credits for winning!", BASIC_WIN_CREDITS),
                ..Payout::default()
            });
        }
        outcome
    }
}

impl RewardStrategy for Capture {
    fn resolve(&self, ctx: &RewardContext<'_>) -> RewardOutcome {
        let mut outcome = RewardOutcome::default();
        if !ctx.winner.is_scripted() {
            // The defeated wild unit changes hands.
            outcome.transfer = Some(UnitTransfer {
                unit: ctx.loser.unit.clone(),
                to: ctx.winner.actor,
            });
        }
        outcome
    }
}

impl RewardStrategy for Christmas {
    fn resolve(&self, ctx: &RewardContext<'_>) -> RewardOutcome {
        let mut outcome = RewardOutcome::default();
        if ctx.winner.is_scripted() {
            // Losing to the seasonal boss still pays a consolation shard.
            outcome.payouts.push(Payout {
                actor: ctx.loser.actor,
                shards: CHRISTMAS_CONSOLATION_SHARDS,
                notice: "A nice match! Here is 1 shard.".to_string(),
                ..Payout::default()
            });
        } else {
            outcome.payouts.push(Payout {
                actor: ctx.winner.actor,
                shards: CHRISTMAS_WIN_SHARDS,
                notice: format!("You received {} shards!", CHRISTMAS_WIN_SHARDS),
                ..Payout::default()
            });
        }
        outcome
    }
}

impl RewardStrategy for TeamRocket {
    fn resolve(&self, ctx: &RewardContext<'_>) -> RewardOutcome {
        let mut outcome = RewardOutcome::default();
        if !ctx.winner.is_scripted() {
            outcome.grant_species = Some(TEAM_ROCKET_GRANT_SPECIES);
            outcome.payouts.push(Payout {
                actor: ctx.winner.actor,
                notice: "An armored boss unit has been added to your account!".to_string(),
                ..Payout::default()
            });
        }
        outcome
    }
}

impl RewardStrategy for SpawnDuel {
    fn resolve(&self, ctx: &RewardContext<'_>) -> RewardOutcome {
        // Same shape as a capture: the contested spawn goes to the winner.
        Capture.resolve(ctx)
    }
}

impl RewardStrategy for Raid {
    fn resolve(&self, ctx: &RewardContext<'_>) -> RewardOutcome {
        let human = if ctx.winner.is_scripted() {
            ctx.loser
        } else {
            ctx.winner
        };
        RewardOutcome {
            damage_report: Some((human.actor, human.damage_dealt)),
            ..RewardOutcome::default()
        }
    }
}

impl RewardStrategy for Gym {
    fn resolve(&self, ctx: &RewardContext<'_>) -> RewardOutcome {
        let gym = if ctx.winner.is_scripted() {
            GymDirective::RecordDefeat {
                challenger: ctx.loser.actor,
            }
        } else {
            GymDirective::TransferLeadership {
                to: ctx.winner.actor,
            }
        };
        RewardOutcome {
            gym: Some(gym),
            ..RewardOutcome::default()
        }
    }
}

impl RewardStrategy for Journey {
    fn resolve(&self, ctx: &RewardContext<'_>) -> RewardOutcome {
        if ctx.category == BattleCategory::Gym {
            // Journey elite-four battles pay shards instead of coins.
            let mut outcome = RewardOutcome {
                grants_xp: true,
                ..RewardOutcome::default()
            };
            if !ctx.winner.is_scripted() {
                outcome.payouts.push(Payout {
                    actor: ctx.winner.actor,
                    shards: JOURNEY_GYM_SHARDS,
                    notice: format!(
                        "{} shards for clearing the gym! New routes unlocked!",
                        JOURNEY_GYM_SHARDS
                    ),
                    ..Payout::default()
                });
            }
            return outcome;
        }
        journey_coins(ctx, JOURNEY_WIN_COINS)
    }
}

impl RewardStrategy for JourneyTrainer {
    fn resolve(&self, ctx: &RewardContext<'_>) -> RewardOutcome {
        journey_coins(ctx, JOURNEY_TRAINER_WIN_COINS)
    }
}

fn journey_coins(ctx: &RewardContext<'_>, coins: u32) -> RewardOutcome {
    let mut outcome = RewardOutcome {
        grants_xp: true,
        ..RewardOutcome::default()
    };
    if !ctx.winner.is_scripted() {
        outcome.payouts.push(Payout {
            actor: ctx.winner.actor,
            credits: coins,
            notice: format!("{} JC for winning!", coins),
            ..Payout::default()
        });
    }
    outcome
}

/// The category → strategy table. A lookup, not a conditional chain: each
/// arm only names the strategy instance.
pub fn strategy_for(category: RewardCategory) -> &'static dyn RewardStrategy {
    match category {
        RewardCategory::Basic => &Basic,
        RewardCategory::Capture => &Capture,
        RewardCategory::Christmas => &Christmas,
        RewardCategory::TeamRocket => &TeamRocket,
        RewardCategory::SpawnDuel => &SpawnDuel,
        RewardCategory::Raid => &Raid,
        RewardCategory::Gym => &Gym,
        RewardCategory::Journey => &Journey,
        RewardCategory::JourneyTrainer => &JourneyTrainer,
    }
}
