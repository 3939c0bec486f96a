//! Python↔Rust conversion helpers.
//!
//! Converts Python dicts into the core `ScratchpadConfig` via JSON serialization, so the
//! same schema (including the camelCase parameter aliases) is accepted from both Python
//! and JSON files. Also maps core errors onto Python exception types.

use pyo3::exceptions::{PyIndexError, PyKeyError, PyValueError};
use pyo3::prelude::*;
use spmsim_core::{AccessError, ConfigError, ScratchpadConfig};

/// Converts a Python dict to a `ScratchpadConfig`.
///
/// The dict is serialized to JSON and then deserialized into `ScratchpadConfig`. Omitted
/// keys take their defaults; unknown keys are rejected.
///
/// # Arguments
///
/// * `py` - Python interpreter handle.
/// * `dict` - A Python dict such as `{"size": "64kB", "assoc": 4, "replacement_policy": "LRU"}`.
///
/// # Returns
///
/// The deserialized `ScratchpadConfig`, or a `ValueError` if the dict is invalid.
pub fn py_dict_to_config(py: Python<'_>, dict: &Bound<'_, PyAny>) -> PyResult<ScratchpadConfig> {
    let json = py.import("json")?;
    let dumps = json.getattr("dumps")?;
    let json_str: String = dumps.call1((dict,))?.extract()?;

    ScratchpadConfig::from_json(&json_str).map_err(config_error)
}

/// Maps a configuration error to `ValueError`.
pub fn config_error(err: ConfigError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Maps an access error to the closest Python exception.
///
/// Out-of-window addresses raise `IndexError`, absent lines raise `KeyError` and writes to
/// an instruction-only scratchpad raise `ValueError`.
pub fn access_error(err: AccessError) -> PyErr {
    match err {
        AccessError::OutOfRange { .. } => PyIndexError::new_err(err.to_string()),
        AccessError::NotResident(_) => PyKeyError::new_err(err.to_string()),
        AccessError::ReadOnly(_) => PyValueError::new_err(err.to_string()),
    }
}
