//! Static-data access and the fixed numeric tables of the combat model.

use crate::errors::{BattleError, BattleResult};
use schema::{ItemId, MoveData, MoveId, SpeciesData, SpeciesId, TypeId};

/// Read-only lookup of species, move, and type-efficacy records.
///
/// The engine owns none of this data; the embedding layer decides whether it
/// comes from a baked-in dataset, a database, or test fixtures.
pub trait StaticDataProvider: Send + Sync {
    fn move_by_id(&self, id: MoveId) -> Option<&MoveData>;

    fn species_by_id(&self, id: SpeciesId) -> Option<&SpeciesData>;

    /// Damage multiplier of `attack` type against one `defend` type. The
    /// product over a defender's types gives the overall effectiveness.
    fn type_efficacy(&self, attack: TypeId, defend: TypeId) -> f64;

    /// Moves a species can know, used to roll scripted opponents' movesets.
    fn moves_learnable_by(&self, species: SpeciesId) -> Vec<MoveId>;
}

impl dyn StaticDataProvider + '_ {
    /// Move lookup that surfaces a missing record as a typed error.
    pub fn require_move(&self, id: MoveId) -> BattleResult<&MoveData> {
        self.move_by_id(id).ok_or(BattleError::MoveNotFound(id))
    }

    /// Species lookup that surfaces a missing record as a typed error.
    pub fn require_species(&self, id: SpeciesId) -> BattleResult<&SpeciesData> {
        self.species_by_id(id)
            .ok_or(BattleError::SpeciesNotFound(id))
    }
}

/// Multipliers for stat stages -6..=+6, in stage order.
const STAT_STAGE_MULTIPLIERS: [f64; 13] = [
    2.0 / 8.0,
    2.0 / 7.0,
    2.0 / 6.0,
    2.0 / 5.0,
    2.0 / 4.0,
    2.0 / 3.0,
    1.0,
    1.5,
    2.0,
    2.5,
    3.0,
    3.5,
    4.0,
];

/// Look up the multiplier for a stat stage.
///
/// The table covers `[-6, +6]` only. Stages are accumulated without a clamp,
/// so an excursion past the table is reported as an error rather than wrapped
/// or truncated.
pub fn stage_multiplier(stage: i16) -> BattleResult<f64> {
    if !(-6..=6).contains(&stage) {
        return Err(BattleError::StatStageOutOfRange(stage));
    }
    Ok(STAT_STAGE_MULTIPLIERS[(stage + 6) as usize])
}

/// Moves usable while asleep (Snore, Sleep Talk).
pub const SLEEP_USABLE_MOVES: [MoveId; 2] = [MoveId(173), MoveId(214)];

/// Moves that thaw the user and can be used while frozen.
pub const THAW_MOVES: [MoveId; 6] = [
    MoveId(172),
    MoveId(221),
    MoveId(293),
    MoveId(503),
    MoveId(588),
    MoveId(592),
];

/// Held item that blocks experience gain and evolution.
pub const EVERSTONE: ItemId = ItemId(13001);

/// Experience required to advance past `level`.
pub fn xp_threshold(level: u8) -> u32 {
    250 + 25 * level as u32
}
