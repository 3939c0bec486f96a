//! Random Replacement Policy.
//!
//! This policy evicts a random way from the set. It uses a xorshift generator
//! instead of a full RNG so that runs are reproducible from the configured seed.
//! `reset` rewinds the generator to the seed.

use super::ReplacementPolicy;

/// Seed used when the configured seed is zero (xorshift never leaves zero).
const FALLBACK_SEED: u64 = 123456789;

/// Random Policy state.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    /// Number of ways.
    ways: usize,
    /// Seed restored by `reset`.
    seed: u64,
    /// Internal state for the pseudo-random number generator.
    state: u64,
}

impl RandomPolicy {
    /// Creates a new Random policy instance with the default seed.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets (unused in this policy but required by interface).
    /// * `ways` - The associativity (number of ways).
    pub fn new(sets: usize, ways: usize) -> Self {
        Self::with_seed(sets, ways, FALLBACK_SEED)
    }

    /// Creates a new Random policy instance with an explicit seed.
    pub fn with_seed(_sets: usize, ways: usize, seed: u64) -> Self {
        let seed = if seed == 0 { FALLBACK_SEED } else { seed };
        Self {
            ways: ways.max(1),
            seed,
            state: seed,
        }
    }

    #[inline(always)]
    const fn step(mut x: u64) -> u64 {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        x
    }
}

impl ReplacementPolicy for RandomPolicy {
    /// Access patterns do not affect the state.
    fn update(&mut self, _set: usize, _way: usize) {}

    fn get_victim(&mut self, set: usize) -> usize {
        let way = self.peek_victim(set);
        self.state = Self::step(self.state);
        way
    }

    fn peek_victim(&self, _set: usize) -> usize {
        (Self::step(self.state) % self.ways as u64) as usize
    }

    fn reset(&mut self) {
        self.state = self.seed;
    }
}
