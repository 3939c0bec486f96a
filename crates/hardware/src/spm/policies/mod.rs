//! Scratchpad Replacement Policies.
//!
//! Implements the algorithms that pick a victim way when a fill lands in a full set.
//!
//! # Policies
//!
//! - `Plru`: Pseudo-LRU (binary tree, one bit per internal node).
//! - `Lru`: Least Recently Used (per-set recency stack).
//! - `Random`: Seeded xorshift selection.
//!
//! The policy is a closed set chosen once at construction. [`Replacer`] holds the selected
//! variant and forwards to it with a `match`, so the access path never dispatches on names
//! or through a vtable.
//!
//! Every policy breaks ties toward the lowest way index and is fully deterministic for a
//! given access sequence (and seed, for `Random`).

/// Least Recently Used replacement policy.
pub mod lru;

/// Pseudo-LRU (tree-based) replacement policy.
pub mod plru;

/// Random replacement policy.
pub mod random;

pub use lru::LruPolicy;
pub use plru::PlruPolicy;
pub use random::RandomPolicy;

use crate::config::ReplacementPolicy as PolicyKind;

/// Trait for scratchpad replacement policies.
///
/// Defines the interface for updating usage state and selecting victim ways.
pub trait ReplacementPolicy {
    /// Updates the policy state when a way is accessed or filled.
    ///
    /// # Arguments
    ///
    /// * `set` - The set index.
    /// * `way` - The way index within the set that was touched.
    fn update(&mut self, set: usize, way: usize);

    /// Selects the way to evict from a full set, advancing any internal state.
    ///
    /// # Arguments
    ///
    /// * `set` - The set index.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn get_victim(&mut self, set: usize) -> usize;

    /// Returns the way `get_victim` would select next, without changing any state.
    fn peek_victim(&self, set: usize) -> usize;

    /// Restores the state the policy had at construction.
    fn reset(&mut self);
}

/// The replacement policy selected for one scratchpad.
#[derive(Debug, Clone)]
pub enum Replacer {
    /// Tree pseudo-LRU.
    PseudoLru(PlruPolicy),
    /// True LRU.
    Lru(LruPolicy),
    /// Seeded random.
    Random(RandomPolicy),
}

impl Replacer {
    /// Builds the policy named by `kind` for an array of `sets` x `ways`.
    ///
    /// # Arguments
    ///
    /// * `kind` - Which algorithm to instantiate.
    /// * `sets` - Number of sets.
    /// * `ways` - Associativity.
    /// * `seed` - Generator seed (only used by `Random`).
    pub fn new(kind: PolicyKind, sets: usize, ways: usize, seed: u64) -> Self {
        match kind {
            PolicyKind::PseudoLru => Self::PseudoLru(PlruPolicy::new(sets, ways)),
            PolicyKind::Lru => Self::Lru(LruPolicy::new(sets, ways)),
            PolicyKind::Random => Self::Random(RandomPolicy::with_seed(sets, ways, seed)),
        }
    }

    /// The algorithm this replacer runs.
    pub const fn kind(&self) -> PolicyKind {
        match self {
            Self::PseudoLru(_) => PolicyKind::PseudoLru,
            Self::Lru(_) => PolicyKind::Lru,
            Self::Random(_) => PolicyKind::Random,
        }
    }
}

impl ReplacementPolicy for Replacer {
    #[inline]
    fn update(&mut self, set: usize, way: usize) {
        match self {
            Self::PseudoLru(p) => p.update(set, way),
            Self::Lru(p) => p.update(set, way),
            Self::Random(p) => p.update(set, way),
        }
    }

    #[inline]
    fn get_victim(&mut self, set: usize) -> usize {
        match self {
            Self::PseudoLru(p) => p.get_victim(set),
            Self::Lru(p) => p.get_victim(set),
            Self::Random(p) => p.get_victim(set),
        }
    }

    #[inline]
    fn peek_victim(&self, set: usize) -> usize {
        match self {
            Self::PseudoLru(p) => p.peek_victim(set),
            Self::Lru(p) => p.peek_victim(set),
            Self::Random(p) => p.peek_victim(set),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::PseudoLru(p) => p.reset(),
            Self::Lru(p) => p.reset(),
            Self::Random(p) => p.reset(),
        }
    }
}
