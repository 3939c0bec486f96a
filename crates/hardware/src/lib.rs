//! Scratchpad memory controller model.
//!
//! This crate implements the scratchpad component of a cycle-accurate simulator:
//! 1. **Config:** Declared parameters (capacity, latency, associativity, banks, policy) and their validation.
//! 2. **Controller:** A banked, set-associative line array resolving accesses into hit, miss or busy.
//! 3. **Policies:** Pseudo-LRU, LRU and Random victim selection.
//! 4. **Common:** Address type and error enums.
//!
//! The controller is driven by an external cycle-stepped scheduler: it calls
//! [`ScratchpadMemory::access`] once per requester per cycle, advances time by the returned
//! cost, resubmits busy requests and calls [`ScratchpadMemory::flush`] at reset boundaries.

/// Common types (addresses, errors).
pub mod common;
/// Scratchpad configuration (defaults, policy enum, geometry).
pub mod config;
/// Scratchpad controller, bank timing and replacement policies.
pub mod spm;

/// Error returned while building a controller.
pub use crate::common::{AccessError, ConfigError};
/// Controller configuration; use `ScratchpadConfig::default()` or deserialize from JSON.
pub use crate::config::{ReplacementPolicy, ScratchpadConfig};
/// Main controller type and its access outcomes.
pub use crate::spm::{AccessResult, ArrayResource, Eviction, ResidentLine, ScratchpadMemory};
