//! Dice sources for every chance-based outcome.
//!
//! # Determinism
//!
//! A [`RandomSource`] must be reproducible: after `set_seed(s)`, the same
//! sequence of `roll` calls yields the same values. Replay, audits and any
//! future on-chain verification depend on this, so the engine never draws
//! randomness from anywhere else.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::warn;

/// Seedable die roller.
pub trait RandomSource {
    /// Rolls one die and returns a value in `1..=sides`.
    ///
    /// `sides == 0` is a contract violation. Implementations clamp it to a
    /// one-sided die and return `1`.
    fn roll(&mut self, sides: u32) -> u32;

    /// Reinitialises the stream from `seed`.
    fn set_seed(&mut self, seed: u64);
}

/// Production dice backed by ChaCha8.
///
/// # Example
///
/// ```
/// use moloch_core::random::{ChaChaDice, RandomSource};
///
/// let mut a = ChaChaDice::new(7);
/// let mut b = ChaChaDice::new(7);
/// let rolls_a: Vec<u32> = (0..10).map(|_| a.roll(6)).collect();
/// let rolls_b: Vec<u32> = (0..10).map(|_| b.roll(6)).collect();
/// assert_eq!(rolls_a, rolls_b);
/// assert!(rolls_a.iter().all(|r| (1..=6).contains(r)));
/// ```
#[derive(Debug, Clone)]
pub struct ChaChaDice {
    rng: ChaCha8Rng,
    seed: u64,
}

impl ChaChaDice {
    /// Creates dice seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed the stream was last initialised with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for ChaChaDice {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RandomSource for ChaChaDice {
    fn roll(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            warn!("roll requested with zero sides; clamping to 1");
            return 1;
        }
        self.rng.gen_range(1..=sides)
    }

    fn set_seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.seed = seed;
    }
}

/// Dice that replay a fixed sequence, cycling when exhausted.
///
/// Values are clamped into `1..=sides` so the contract holds even when the
/// script was written for bigger dice. `set_seed` rewinds to the start of the
/// script and ignores the seed value.
///
/// # Example
///
/// ```
/// use moloch_core::random::{RandomSource, ScriptedRolls};
///
/// let mut dice = ScriptedRolls::new(vec![6, 2]);
/// assert_eq!(dice.roll(6), 6);
/// assert_eq!(dice.roll(6), 2);
/// assert_eq!(dice.roll(6), 6);
/// assert_eq!(dice.roll(4), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    rolls: Vec<u32>,
    cursor: usize,
}

impl ScriptedRolls {
    /// Creates dice that return `rolls` in order.
    #[must_use]
    pub fn new(rolls: Vec<u32>) -> Self {
        Self { rolls, cursor: 0 }
    }

    /// Number of rolls drawn so far.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRolls {
    fn roll(&mut self, sides: u32) -> u32 {
        let sides = sides.max(1);
        if self.rolls.is_empty() {
            return 1;
        }
        let value = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        value.clamp(1, sides)
    }

    fn set_seed(&mut self, _seed: u64) {
        self.cursor = 0;
    }
}
