//! Scratchpad controller Python binding.
//!
//! Exposes `ScratchpadMemory` to Python: build from an optional config dict, drive it with
//! `access` once per request per cycle, and use the maintenance calls for probing,
//! deallocation and locks.

use pyo3::prelude::*;
use spmsim_core::{ScratchpadConfig, ScratchpadMemory};

use crate::conversion::{access_error, config_error, py_dict_to_config};
use crate::result::PyAccessResult;

/// Python-exposed scratchpad controller.
#[pyclass(name = "Scratchpad")]
#[derive(Debug)]
pub struct PyScratchpad {
    /// The wrapped controller.
    pub inner: ScratchpadMemory,
}

#[pymethods]
impl PyScratchpad {
    /// Creates a controller from a config dict; `None` uses every default.
    ///
    /// Raises `ValueError` for an invalid configuration.
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(py: Python<'_>, config: Option<&Bound<'_, PyAny>>) -> PyResult<Self> {
        let config = match config {
            Some(dict) => py_dict_to_config(py, dict)?,
            None => ScratchpadConfig::default(),
        };
        let inner = ScratchpadMemory::new(config).map_err(config_error)?;
        Ok(Self { inner })
    }

    /// Performs one access issued at `cycle`.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address inside the scratchpad window.
    /// * `is_write` - Store access.
    /// * `cycle` - Issue cycle, used for bank occupancy.
    #[pyo3(signature = (addr, is_write=false, cycle=0))]
    fn access(&mut self, addr: u64, is_write: bool, cycle: u64) -> PyResult<PyAccessResult> {
        let inner = self.inner.access(addr, is_write, cycle).map_err(access_error)?;
        Ok(PyAccessResult { inner })
    }

    /// Invalidates every line; dirty data is dropped.
    fn flush(&mut self) {
        self.inner.flush();
    }

    /// Whether `addr` has a resident line; does not touch replacement state.
    fn contains(&self, addr: u64) -> PyResult<bool> {
        self.inner.contains(addr).map_err(access_error)
    }

    /// Whether a fill for `addr` needs no eviction.
    fn has_free_way(&self, addr: u64) -> PyResult<bool> {
        self.inner.has_free_way(addr).map_err(access_error)
    }

    /// Line address a fill for `addr` would evict, or `None` if no eviction is needed.
    fn probe_victim(&self, addr: u64) -> PyResult<Option<u64>> {
        self.inner.probe_victim(addr).map_err(access_error)
    }

    /// Marks the line holding `addr` most recently used; returns whether it was resident.
    #[pyo3(signature = (addr, cycle=0))]
    fn touch(&mut self, addr: u64, cycle: u64) -> PyResult<bool> {
        self.inner.touch(addr, cycle).map_err(access_error)
    }

    /// Frees the line holding `addr`; returns `(line_addr, dirty)`.
    fn deallocate(&mut self, addr: u64) -> PyResult<(u64, bool)> {
        let freed = self.inner.deallocate(addr).map_err(access_error)?;
        Ok((freed.addr, freed.dirty))
    }

    /// Records `context` as the lock owner of the line holding `addr`.
    fn lock(&mut self, addr: u64, context: u32) -> PyResult<()> {
        self.inner.lock(addr, context).map_err(access_error)
    }

    /// Clears the lock owner of the line holding `addr`.
    fn unlock(&mut self, addr: u64) -> PyResult<()> {
        self.inner.unlock(addr).map_err(access_error)
    }

    /// Whether the line holding `addr` is locked by `context`.
    fn is_locked(&self, addr: u64, context: u32) -> PyResult<bool> {
        self.inner.is_locked(addr, context).map_err(access_error)
    }

    /// Valid lines as `(addr, set, way, dirty, last_access)` tuples in set/way order.
    fn resident_lines(&self) -> Vec<(u64, usize, usize, bool, u64)> {
        self.inner
            .resident_lines()
            .into_iter()
            .map(|l| (l.addr, l.set, l.way, l.dirty, l.last_access))
            .collect()
    }

    /// Number of sets.
    #[getter]
    fn num_sets(&self) -> usize {
        self.inner.num_sets()
    }

    /// Ways per set.
    #[getter]
    fn assoc(&self) -> usize {
        self.inner.geometry().assoc
    }

    /// Line size in bytes.
    #[getter]
    fn line_bytes(&self) -> usize {
        self.inner.geometry().line_bytes
    }

    /// Canonical policy name such as `"PSEUDO_LRU"`.
    #[getter]
    fn replacement_policy(&self) -> &'static str {
        self.inner.config().replacement_policy.name()
    }

    /// Number of valid lines.
    #[getter]
    fn valid_lines(&self) -> usize {
        self.inner.valid_lines()
    }

    /// Set that `addr` maps to.
    fn set_of(&self, addr: u64) -> usize {
        self.inner.set_of(addr)
    }

    /// Full per-slot text dump.
    fn dump(&self) -> String {
        self.inner.to_string()
    }

    /// Geometry and occupancy summary.
    fn __repr__(&self) -> String {
        let geometry = self.inner.geometry();
        format!(
            "Scratchpad(sets={}, assoc={}, line_bytes={}, policy={}, valid={})",
            geometry.num_sets,
            geometry.assoc,
            geometry.line_bytes,
            self.inner.config().replacement_policy,
            self.inner.valid_lines()
        )
    }
}
