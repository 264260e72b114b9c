//! Injectable randomness for the battle engine.
//!
//! Every roll the engine makes goes through [`RandomSource`], so a battle is
//! deterministic given the source's state. Production code uses [`SeededRng`];
//! tests script exact outcomes with [`ScriptedRng`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform-draw abstraction used by the damage calculator and turn resolver.
///
/// `roll` returns a uniform integer in `[lo, hi]` inclusive. The `reason`
/// string names the draw site so a scripted source can report which value a
/// test forgot to supply.
pub trait RandomSource: Send {
    fn roll(&mut self, lo: u32, hi: u32, reason: &str) -> u32;

    /// Percentage roll in `[0, 99]`, for "X% chance" effects.
    fn percent(&mut self, reason: &str) -> u32 {
        self.roll(0, 99, reason)
    }
}

/// Real RNG backed by `StdRng`. Seeding makes whole battles reproducible.
#[derive(Debug)]
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_rng(&mut rand::rng()),
        }
    }
}

impl RandomSource for SeededRng {
    fn roll(&mut self, lo: u32, hi: u32, _reason: &str) -> u32 {
        self.inner.random_range(lo..=hi)
    }
}

/// Test source replaying a fixed list of outcomes in draw order.
///
/// Values are consumed verbatim, so a test scripts exactly the rolls the code
/// under test will make. Running out of values panics with the reason of the
/// draw that starved, which pinpoints the missing entry.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    outcomes: Vec<u32>,
    index: usize,
}

impl ScriptedRng {
    pub fn new(outcomes: Vec<u32>) -> Self {
        Self { outcomes, index: 0 }
    }

    /// Number of scripted values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.outcomes.len() - self.index
    }
}

impl RandomSource for ScriptedRng {
    fn roll(&mut self, lo: u32, hi: u32, reason: &str) -> u32 {
        let Some(&outcome) = self.outcomes.get(self.index) else {
            panic!(
                "ScriptedRng exhausted! Tried to get a value for: '{}'. Need more scripted values.",
                reason
            );
        };
        self.index += 1;

        assert!(
            (lo..=hi).contains(&outcome),
            "scripted value {} for '{}' is outside the requested range [{}, {}]",
            outcome,
            reason,
            lo,
            hi
        );

        #[cfg(test)]
        println!("[RNG] Consumed {} for: {}", outcome, reason);

        outcome
    }
}
