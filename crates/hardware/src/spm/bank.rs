//! Banked tag/data array timing.
//!
//! A `BankedArray` models one of the scratchpad's two arrays (tag or data) as a row of
//! independently clocked banks. It tracks timing only; the line contents live in the
//! controller.
//!
//! 1. **Bank selection:** `set % banks`, a pure function of the address.
//! 2. **Occupancy:** a bank accepts at most one access per cycle and stays busy for its
//!    access latency (at least one cycle).
//! 3. **Contention:** with resource stalls enabled the controller asks [`BankedArray::is_busy`]
//!    first and refuses the access. Otherwise it calls [`BankedArray::reserve`] directly, which
//!    serializes: the access starts when the bank frees up and the wait is added to its cost.

/// Timing state of one tag or data array.
#[derive(Debug, Clone)]
pub struct BankedArray {
    /// First cycle at which each bank is free again.
    busy_until: Vec<u64>,
    /// Cycles charged per access.
    latency: u64,
}

impl BankedArray {
    /// Creates an idle array.
    ///
    /// # Arguments
    ///
    /// * `banks` - Number of banks (at least one; zero is treated as one).
    /// * `latency` - Access latency of each bank in cycles.
    pub fn new(banks: usize, latency: u64) -> Self {
        Self {
            busy_until: vec![0; banks.max(1)],
            latency,
        }
    }

    /// Number of banks.
    pub const fn banks(&self) -> usize {
        self.busy_until.len()
    }

    /// Per-access latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Bank owning `set`.
    #[inline]
    pub const fn bank_of(&self, set: usize) -> usize {
        set % self.busy_until.len()
    }

    /// First cycle at which the bank owning `set` can start a new access.
    #[inline]
    pub fn ready_at(&self, set: usize) -> u64 {
        self.busy_until[self.bank_of(set)]
    }

    /// Whether the bank owning `set` is still occupied at `cycle`.
    #[inline]
    pub fn is_busy(&self, set: usize, cycle: u64) -> bool {
        cycle < self.ready_at(set)
    }

    /// Books the bank owning `set` for one access requested at `cycle`.
    ///
    /// # Returns
    ///
    /// Cycles from `cycle` until the access completes: the wait for the bank plus its latency.
    pub fn reserve(&mut self, set: usize, cycle: u64) -> u64 {
        let bank = self.bank_of(set);
        let start = cycle.max(self.busy_until[bank]);
        self.busy_until[bank] = start.saturating_add(self.latency.max(1));
        (start - cycle).saturating_add(self.latency)
    }

    /// Marks every bank idle.
    pub fn reset(&mut self) {
        self.busy_until.fill(0);
    }
}
