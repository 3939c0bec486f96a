//! Scratchpad controller tests.


/// Hit/miss resolution, eviction, flush and error paths.
pub mod controller;


/// Invariants over arbitrary access streams.
pub mod properties;
