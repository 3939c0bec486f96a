//! Pseudo-LRU (PLRU) Replacement Policy.
//!
//! PLRU approximates the Least Recently Used algorithm using a binary tree of bits.
//! It requires significantly less storage than full LRU (N-1 bits for N ways).
//!
//! Each internal node holds one bit pointing toward the subtree that should be
//! evicted next: `false` points left (lower ways), `true` points right. An access
//! walks from the root to the touched leaf and flips every node on the way to point
//! at the *other* subtree. To find a victim, the tree is followed from the root
//! along the bits.
//!
//! Nodes are stored heap-style: node 1 is the root, node `n` has children `2n` and
//! `2n + 1`, so a set with `W` ways uses nodes `1..W`. A freshly reset tree has all
//! bits clear and therefore selects way 0, the lowest index.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(log W)
//!   - `get_victim()`: O(log W)
//! - **Space Complexity:** O(S × W) bits where S is sets, W is ways
//! - **Hardware Cost:** Low - simple bit operations
//! - **Worst Case:** Pathological patterns can evict a line that true LRU would keep

use super::ReplacementPolicy;

/// PLRU Policy state.
#[derive(Debug, Clone)]
pub struct PlruPolicy {
    /// Tree bits for every set, `ways` slots per set (slot 0 unused).
    tree: Vec<bool>,
    /// Number of ways (a power of two).
    ways: usize,
    /// Tree depth, log2(ways).
    levels: u32,
}

impl PlruPolicy {
    /// Creates a new PLRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets.
    /// * `ways` - The associativity; must be a power of two.
    pub fn new(sets: usize, ways: usize) -> Self {
        let ways = ways.max(1);
        debug_assert!(ways.is_power_of_two(), "PLRU needs a power-of-two associativity");
        Self {
            tree: vec![false; sets * ways],
            ways,
            levels: ways.trailing_zeros(),
        }
    }

    #[inline(always)]
    const fn slot(&self, set: usize, node: usize) -> usize {
        set * self.ways + node
    }

    /// Raw tree bit for `node` (heap index, root = 1) in `set`.
    pub fn node_bit(&self, set: usize, node: usize) -> bool {
        self.tree[self.slot(set, node)]
    }
}

impl ReplacementPolicy for PlruPolicy {
    /// Points every node on the path to `way` away from it.
    fn update(&mut self, set: usize, way: usize) {
        let mut node = 1;
        for level in (0..self.levels).rev() {
            let dir = (way >> level) & 1;
            let slot = self.slot(set, node);
            self.tree[slot] = dir == 0;
            node = 2 * node + dir;
        }
    }

    fn get_victim(&mut self, set: usize) -> usize {
        self.peek_victim(set)
    }

    /// Follows the tree bits from the root to a leaf.
    fn peek_victim(&self, set: usize) -> usize {
        let mut node = 1;
        let mut way = 0;
        for _ in 0..self.levels {
            let dir = usize::from(self.tree[self.slot(set, node)]);
            way = (way << 1) | dir;
            node = 2 * node + dir;
        }
        way
    }

    fn reset(&mut self) {
        self.tree.fill(false);
    }
}
