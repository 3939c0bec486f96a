//! Physical address type.
//!
//! This module defines a strong type for addresses presented to the scratchpad. It provides:
//! 1. **Type Safety:** Keeps raw `u64` addresses apart from set, way and tag indices.
//! 2. **Bit Selection:** Inclusive bit-range extraction used for set and bank indexing.
//! 3. **Line Alignment:** Conversion between byte addresses and line addresses.

use std::fmt;

/// A physical address presented to the scratchpad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PhysAddr(pub u64);

impl PhysAddr {
    /// Creates a new physical address from a raw 64-bit value.
    ///
    /// # Arguments
    ///
    /// * `addr` - The raw 64-bit address value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Extracts the inclusive bit range `[lo, hi]` as a right-aligned value.
    ///
    /// Returns zero when `hi < lo`, which is what a zero-width field (for example
    /// the set index of a single-set array) selects.
    ///
    /// # Arguments
    ///
    /// * `lo` - Lowest bit position (inclusive).
    /// * `hi` - Highest bit position (inclusive).
    #[inline(always)]
    pub const fn bit_select(&self, lo: u32, hi: u32) -> u64 {
        if hi < lo || lo >= 64 {
            return 0;
        }
        let width = hi - lo + 1;
        let shifted = self.0 >> lo;
        if width >= 64 {
            shifted
        } else {
            shifted & ((1u64 << width) - 1)
        }
    }

    /// Returns the line address (the address with the block offset stripped and shifted out).
    ///
    /// # Arguments
    ///
    /// * `block_bits` - log2 of the line size in bytes.
    #[inline(always)]
    pub const fn line_number(&self, block_bits: u32) -> u64 {
        self.0 >> block_bits
    }

    /// Returns the address rounded down to the start of its line.
    ///
    /// # Arguments
    ///
    /// * `block_bits` - log2 of the line size in bytes.
    #[inline(always)]
    pub const fn line_base(&self, block_bits: u32) -> Self {
        Self((self.0 >> block_bits) << block_bits)
    }
}

impl From<u64> for PhysAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
