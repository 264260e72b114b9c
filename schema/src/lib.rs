// Pokedream Battle Schema - Shared type definitions
// This crate contains the plain data descriptors shared between the battle
// engine and whatever layer embeds it (bot commands, fixtures, tooling).
// Nothing in here knows about sessions, registries, or rendering.

pub use ids::*;
pub use moves::*;
pub use species::*;

pub mod ids;
pub mod moves;
pub mod species;
