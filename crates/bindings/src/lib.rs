//! Python bindings for the scratchpad memory controller.
//!
//! This crate exposes the controller to Python via PyO3. It provides:
//! 1. **Controller:** `Scratchpad` for configuration, accesses and maintenance operations.
//! 2. **Results:** `AccessResult` describing one hit, miss or busy outcome.
//! 3. **Utilities:** Version string, logging setup and dict/error conversion helpers.

use pyo3::prelude::*;

/// Python dict to Rust `ScratchpadConfig` conversion and error mapping.
pub mod conversion;
/// Access outcome binding (`PyAccessResult`).
pub mod result;
/// Controller binding (`PyScratchpad`).
pub mod scratchpad;
/// Utility functions (version, logging).
pub mod utils;

/// Registers all scratchpad classes and functions onto the given Python module.
///
/// # Arguments
///
/// * `m` - The Python module to register types and functions on.
///
/// # Returns
///
/// `Ok(())` on success, or a `PyErr` if registration fails.
pub fn register_scratchpad_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<scratchpad::PyScratchpad>()?;
    m.add_class::<result::PyAccessResult>()?;

    m.add_function(wrap_pyfunction!(utils::version, m)?)?;
    m.add_function(wrap_pyfunction!(utils::init_logging, m)?)?;

    Ok(())
}

#[pymodule]
#[pyo3(name = "_core")]
fn spmsim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_scratchpad_module(m)
}
