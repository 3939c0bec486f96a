//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the way that has not been accessed for the longest time.
//! It maintains a usage stack for each set. When a way is accessed, it is moved
//! to the top (Most Recently Used position). The bottom of the stack represents
//! the Least Recently Used way.
//!
//! Untouched ways start in descending order, so before any access the bottom of
//! the stack is way 0 and ties resolve to the lowest index.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(W) where W is the number of ways (associativity)
//!   - `get_victim()`: O(1)
//! - **Space Complexity:** O(S × W) where S is the number of sets
//! - **Hardware Cost:** High - requires priority encoding and shifting
//! - **Worst Case:** Scanning patterns larger than the set (thrashing)

use super::ReplacementPolicy;

/// LRU Policy state.
#[derive(Debug, Clone)]
pub struct LruPolicy {
    /// A vector of usage stacks (one per set).
    /// Index 0 is MRU, last index is LRU.
    usage: Vec<Vec<usize>>,
    ways: usize,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets.
    /// * `ways` - The associativity (number of ways).
    pub fn new(sets: usize, ways: usize) -> Self {
        let ways = ways.max(1);
        Self {
            usage: (0..sets).map(|_| Self::fresh_stack(ways)).collect(),
            ways,
        }
    }

    fn fresh_stack(ways: usize) -> Vec<usize> {
        (0..ways).rev().collect()
    }

    /// Recency order of `set`, most recent first.
    pub fn order(&self, set: usize) -> &[usize] {
        &self.usage[set]
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Moves the accessed `way` to the front of the usage stack (MRU position),
    /// shifting other elements down.
    fn update(&mut self, set: usize, way: usize) {
        let stack = &mut self.usage[set];
        if let Some(pos) = stack.iter().position(|&x| x == way) {
            let moved = stack.remove(pos);
            stack.insert(0, moved);
        }
    }

    fn get_victim(&mut self, set: usize) -> usize {
        self.peek_victim(set)
    }

    /// Returns the way at the bottom of the usage stack (LRU position).
    fn peek_victim(&self, set: usize) -> usize {
        self.usage[set].last().copied().unwrap_or(0)
    }

    fn reset(&mut self) {
        let ways = self.ways;
        for stack in &mut self.usage {
            *stack = Self::fresh_stack(ways);
        }
    }
}
