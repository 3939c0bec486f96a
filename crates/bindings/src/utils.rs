//! Utility functions exposed to Python.
//!
//! Provides the version string and a logging switch for the `spmsim` module.

use pyo3::prelude::*;
use tracing_subscriber::EnvFilter;

/// Returns the package version string (e.g., for scripting or diagnostics).
///
/// # Returns
///
/// A version string such as `"0.3.0"`.
#[pyfunction]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Routes controller `tracing` events to stderr.
///
/// # Arguments
///
/// * `filter` - An `EnvFilter` directive such as `"spmsim_core=debug"`; defaults to `RUST_LOG`.
///
/// # Returns
///
/// `False` if a subscriber was already installed in this process.
#[pyfunction]
#[pyo3(signature = (filter=None))]
pub fn init_logging(filter: Option<&str>) -> bool {
    let filter = filter.map_or_else(EnvFilter::from_default_env, EnvFilter::new);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
