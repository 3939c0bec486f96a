//! Access result Python binding.
//!
//! Exposes one resolved access to Python as a read-only object with a `kind` string and
//! optional fields that are `None` where the outcome does not carry them.

use pyo3::prelude::*;
use spmsim_core::AccessResult;

/// Python-exposed access outcome: wraps `AccessResult`.
#[pyclass(frozen, name = "AccessResult")]
#[derive(Debug, Clone, Copy)]
pub struct PyAccessResult {
    /// The wrapped core outcome.
    pub inner: AccessResult,
}

#[pymethods]
impl PyAccessResult {
    /// `"hit"`, `"miss"` or `"busy"`.
    #[getter]
    fn kind(&self) -> &'static str {
        match self.inner {
            AccessResult::Hit { .. } => "hit",
            AccessResult::Miss { .. } => "miss",
            AccessResult::Busy { .. } => "busy",
        }
    }

    /// Whether the access hit.
    #[getter]
    fn is_hit(&self) -> bool {
        self.inner.is_hit()
    }

    /// Whether the access missed and filled.
    #[getter]
    fn is_miss(&self) -> bool {
        self.inner.is_miss()
    }

    /// Whether a busy bank refused the access.
    #[getter]
    fn is_busy(&self) -> bool {
        self.inner.is_busy()
    }

    /// Cycles until completion; `None` when busy.
    #[getter]
    fn cycles(&self) -> Option<u64> {
        self.inner.cycles()
    }

    /// Way that serviced the access; `None` when busy.
    #[getter]
    fn way(&self) -> Option<usize> {
        self.inner.way()
    }

    /// Line address displaced by a miss.
    #[getter]
    fn evicted_addr(&self) -> Option<u64> {
        self.inner.eviction().map(|e| e.addr)
    }

    /// Line address the caller must write back.
    #[getter]
    fn writeback(&self) -> Option<u64> {
        self.inner.writeback()
    }

    /// `"tag_array"` or `"data_array"` for a busy result.
    #[getter]
    fn resource(&self) -> Option<String> {
        match self.inner {
            AccessResult::Busy { resource, .. } => Some(resource.to_string()),
            _ => None,
        }
    }

    /// First cycle the refusing bank is free again.
    #[getter]
    fn ready_at(&self) -> Option<u64> {
        match self.inner {
            AccessResult::Busy { ready_at, .. } => Some(ready_at),
            _ => None,
        }
    }

    /// Outcomes compare equal field by field.
    fn __eq__(&self, other: &Self) -> bool {
        self.inner == other.inner
    }

    /// Compact one-line description.
    fn __repr__(&self) -> String {
        match self.inner {
            AccessResult::Hit { way, cycles } => format!("AccessResult(hit, way={way}, cycles={cycles})"),
            AccessResult::Miss {
                way,
                cycles,
                eviction,
            } => match eviction {
                Some(e) => format!(
                    "AccessResult(miss, way={way}, cycles={cycles}, evicted={:#x}, dirty={})",
                    e.addr, e.dirty
                ),
                None => format!("AccessResult(miss, way={way}, cycles={cycles})"),
            },
            AccessResult::Busy { resource, ready_at } => {
                format!("AccessResult(busy, resource={resource}, ready_at={ready_at})")
            }
        }
    }
}
