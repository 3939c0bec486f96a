//! Common types shared across the scratchpad model.
//!
//! 1. **Address Type:** A strong physical-address type with bit-select helpers.
//! 2. **Error Handling:** Configuration and per-access error enums.

/// Address type definitions.
pub mod addr;

/// Error types.
pub mod error;

pub use addr::PhysAddr;
pub use error::{AccessError, ConfigError};
