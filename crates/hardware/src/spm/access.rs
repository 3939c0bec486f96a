//! Access results reported by the scratchpad controller.
//!
//! Every `access` resolves synchronously into one of three outcomes:
//! 1. **Hit:** the tag was resident; the cost is the tag and data bank time.
//! 2. **Miss:** the line was filled, possibly evicting another; the cost adds the miss penalty.
//! 3. **Busy:** a bank was occupied and resource stalls are enabled; nothing changed and the
//!    caller must resubmit.

use std::fmt;

/// Which array refused an access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayResource {
    /// The tag array bank owning the set.
    TagArray,
    /// The data array bank owning the set.
    DataArray,
}

impl fmt::Display for ArrayResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TagArray => write!(f, "tag_array"),
            Self::DataArray => write!(f, "data_array"),
        }
    }
}

/// A valid line displaced by a fill or an explicit deallocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eviction {
    /// First byte address of the displaced line.
    pub addr: u64,
    /// The line was modified; the caller owes a writeback.
    pub dirty: bool,
}

impl Eviction {
    /// Address the caller must write back, if any.
    pub const fn writeback(&self) -> Option<u64> {
        if self.dirty { Some(self.addr) } else { None }
    }
}

/// Outcome of one scratchpad access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessResult {
    /// Tag match.
    Hit {
        /// Way holding the line.
        way: usize,
        /// Cycles until the access completes.
        cycles: u64,
    },
    /// Tag miss; the line has been installed.
    Miss {
        /// Way the line was installed in.
        way: usize,
        /// Cycles until the access completes, including the miss penalty.
        cycles: u64,
        /// Valid line displaced by the fill, if the chosen way held one.
        eviction: Option<Eviction>,
    },
    /// A bank was occupied; no state was modified.
    Busy {
        /// The array whose bank was occupied.
        resource: ArrayResource,
        /// First cycle at which that bank is free again.
        ready_at: u64,
    },
}

impl AccessResult {
    /// Whether the access hit.
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// Whether the access missed (and filled).
    pub const fn is_miss(&self) -> bool {
        matches!(self, Self::Miss { .. })
    }

    /// Whether the access was refused for bank contention.
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    /// Timing cost, `None` for a busy result.
    pub const fn cycles(&self) -> Option<u64> {
        match self {
            Self::Hit { cycles, .. } | Self::Miss { cycles, .. } => Some(*cycles),
            Self::Busy { .. } => None,
        }
    }

    /// Way that serviced the access, `None` for a busy result.
    pub const fn way(&self) -> Option<usize> {
        match self {
            Self::Hit { way, .. } | Self::Miss { way, .. } => Some(*way),
            Self::Busy { .. } => None,
        }
    }

    /// Line displaced by a miss.
    pub const fn eviction(&self) -> Option<Eviction> {
        match self {
            Self::Miss { eviction, .. } => *eviction,
            _ => None,
        }
    }

    /// Address of a dirty line the caller must write back.
    pub const fn writeback(&self) -> Option<u64> {
        match self.eviction() {
            Some(e) => e.writeback(),
            None => None,
        }
    }
}

/// One valid line, as reported by [`ScratchpadMemory::resident_lines`](super::ScratchpadMemory::resident_lines).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidentLine {
    /// First byte address of the line.
    pub addr: u64,
    /// Set holding the line.
    pub set: usize,
    /// Way holding the line.
    pub way: usize,
    /// Modified since it was filled.
    pub dirty: bool,
    /// Cycle of the most recent fill or hit.
    pub last_access: u64,
}
