//! Configuration and access error definitions.
//!
//! This module defines the two error families of the scratchpad:
//! 1. **Configuration Errors:** Fatal; detected while building the controller, which is then never created.
//! 2. **Access Errors:** Local to one request; the controller state is left untouched.
//!
//! Bank contention is not an error. It is reported as
//! [`AccessResult::Busy`](crate::spm::AccessResult::Busy).

use thiserror::Error;

use super::addr::PhysAddr;

/// A scratchpad configuration that cannot be instantiated.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Associativity of zero ways.
    #[error("associativity must be at least 1 way")]
    ZeroAssoc,

    /// Associativity is not a power of two (the pseudo-LRU tree needs a full binary tree).
    #[error("associativity {0} is not a power of two")]
    NonPowerOfTwoAssoc(usize),

    /// Capacity does not divide evenly into `assoc` ways of `line_bytes` lines.
    #[error("capacity of {size} bytes is not a non-zero multiple of {assoc} ways x {line_bytes} byte lines")]
    CapacityNotMultiple {
        /// Configured capacity in bytes.
        size: usize,
        /// Configured associativity.
        assoc: usize,
        /// Line size in bytes.
        line_bytes: usize,
    },

    /// The derived set count cannot be selected by a contiguous bit field.
    #[error("set count {0} is not a power of two")]
    SetCountNotPowerOfTwo(usize),

    /// Set index would start inside the block offset.
    #[error("start_index_bit {start_index_bit} lies inside the {block_size_bits}-bit block offset")]
    IndexBelowBlockOffset {
        /// Configured first index bit.
        start_index_bit: u32,
        /// Configured block-size bits.
        block_size_bits: u32,
    },

    /// Set index field would extend past bit 63.
    #[error("set index bits [{start_index_bit}, {start_index_bit}+{set_bits}) exceed a 64-bit address")]
    IndexBitsOverflow {
        /// Configured first index bit.
        start_index_bit: u32,
        /// Number of set index bits.
        set_bits: u32,
    },

    /// Line size does not fit the address width.
    #[error("block_size_bits {0} is too large")]
    BlockSizeTooLarge(u32),

    /// A tag or data array configured with zero banks.
    #[error("{array} array needs at least one bank")]
    ZeroBanks {
        /// `"tag"` or `"data"`.
        array: &'static str,
    },

    /// Scratchpad address window of zero bytes.
    #[error("scratchpad window size must be non-zero")]
    EmptyWindow,

    /// Scratchpad address window wraps past the end of the address space.
    #[error("scratchpad window {base} + {size:#x} overflows the address space")]
    WindowOverflow {
        /// Window base address.
        base: PhysAddr,
        /// Window size in bytes.
        size: u64,
    },

    /// Unrecognised replacement policy name.
    #[error("unknown replacement policy `{0}` (expected PSEUDO_LRU, LRU or RANDOM)")]
    UnknownPolicy(String),

    /// Unparseable memory-size string such as `"64 parsecs"`.
    #[error("invalid memory size `{0}`")]
    InvalidSize(String),

    /// Malformed JSON configuration.
    #[error("invalid scratchpad configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single access that the scratchpad refused. The controller state is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Address outside the scratchpad window. Not retryable.
    #[error("address {addr} outside scratchpad window [{base}, {base}+{size:#x})")]
    OutOfRange {
        /// Offending address.
        addr: PhysAddr,
        /// Window base address.
        base: PhysAddr,
        /// Window size in bytes.
        size: u64,
    },

    /// Write to an instruction-only scratchpad.
    #[error("write to {0} rejected: scratchpad is instruction-only")]
    ReadOnly(PhysAddr),

    /// Operation needs a resident line and the address has none.
    #[error("no resident line for {0}")]
    NotResident(PhysAddr),
}
