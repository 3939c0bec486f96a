//! Banked, Set-Associative Scratchpad Controller.
//!
//! This module implements the scratchpad memory controller. It owns the line array,
//! the replacement policy and the tag/data bank timing, and resolves every access
//! synchronously into a hit, a miss (with fill and optional eviction) or a busy result.
//!
//! Address decomposition:
//! - **Set index:** bits `[start_index_bit, start_index_bit + log2(sets))`.
//! - **Tag:** the full line number (`addr >> block_size_bits`).
//! - **Bank:** `set % banks`, separately for the tag and data arrays.
//!
//! The controller keeps no in-flight transaction state between calls. Multi-cycle
//! latency is reported as a cost; the external scheduler advances time.

/// Access outcome types.
pub mod access;

/// Tag/data bank timing.
pub mod bank;

/// Replacement policy implementations (PLRU, LRU, Random).
pub mod policies;

use std::fmt;

use tracing::{debug, trace};

pub use self::access::{AccessResult, ArrayResource, Eviction, ResidentLine};
use self::bank::BankedArray;
use self::policies::{ReplacementPolicy, Replacer};
use crate::common::{AccessError, ConfigError, PhysAddr};
use crate::config::{Geometry, ScratchpadConfig};

/// One line slot: tag, validity, dirty bit and lock owner.
#[derive(Debug, Clone, Default)]
struct Line {
    tag: u64,
    valid: bool,
    dirty: bool,
    locked: Option<u32>,
    last_access: u64,
}

/// Scratchpad controller built from a validated [`ScratchpadConfig`].
///
/// # Examples
///
/// ```
/// use spmsim_core::{ScratchpadConfig, ScratchpadMemory};
///
/// let mut spm = ScratchpadMemory::new(ScratchpadConfig::default()).unwrap();
/// let first = spm.access(0x40, true, 0).unwrap();
/// assert!(first.is_miss());
/// let second = spm.access(0x40, false, 1).unwrap();
/// assert!(second.is_hit());
/// ```
#[derive(Debug, Clone)]
pub struct ScratchpadMemory {
    config: ScratchpadConfig,
    geometry: Geometry,
    lines: Vec<Line>,
    policy: Replacer,
    tag_array: BankedArray,
    data_array: BankedArray,
}

impl ScratchpadMemory {
    /// Builds a controller with every line invalid and every bank idle.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] reported by [`ScratchpadConfig::geometry`]; no controller is created.
    pub fn new(config: ScratchpadConfig) -> Result<Self, ConfigError> {
        let geometry = config.geometry()?;
        let policy = Replacer::new(
            config.replacement_policy,
            geometry.num_sets,
            geometry.assoc,
            config.random_seed,
        );
        debug!(
            size = config.size_bytes,
            sets = geometry.num_sets,
            assoc = geometry.assoc,
            line_bytes = geometry.line_bytes,
            policy = %config.replacement_policy,
            "scratchpad configured"
        );
        Ok(Self {
            lines: vec![Line::default(); geometry.total_lines()],
            tag_array: BankedArray::new(config.tag_array_banks, config.tag_access_latency),
            data_array: BankedArray::new(config.data_array_banks, config.data_access_latency),
            policy,
            geometry,
            config,
        })
    }

    /// Configuration this controller was built from.
    pub const fn config(&self) -> &ScratchpadConfig {
        &self.config
    }

    /// Derived array geometry.
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.geometry.num_sets
    }

    /// Number of valid lines across all sets.
    pub fn valid_lines(&self) -> usize {
        self.lines.iter().filter(|l| l.valid).count()
    }

    /// Set that `addr` maps to (no range check).
    pub const fn set_of(&self, addr: u64) -> usize {
        self.geometry.set_index(PhysAddr::new(addr))
    }

    /// Performs one access and resolves it to a hit, a miss or a busy result.
    ///
    /// With `resource_stalls` enabled, an access whose tag or data bank is occupied at
    /// `cycle` is refused with [`AccessResult::Busy`] before any lookup, and nothing is
    /// modified. Otherwise bank contention serializes: the wait is added to the cost.
    ///
    /// Hit cost is the tag bank time plus the data bank time. Miss cost adds the
    /// configured miss `latency`. Costs saturate at `u64::MAX`.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address inside the scratchpad window.
    /// * `is_write` - Store access; marks the line dirty.
    /// * `cycle` - Simulation cycle the request is issued in.
    ///
    /// # Errors
    ///
    /// [`AccessError::OutOfRange`] outside the window, [`AccessError::ReadOnly`] for a
    /// write to an instruction-only scratchpad. State is unchanged in both cases.
    pub fn access(
        &mut self,
        addr: u64,
        is_write: bool,
        cycle: u64,
    ) -> Result<AccessResult, AccessError> {
        let addr = PhysAddr::new(addr);
        self.check_range(addr)?;
        if is_write && self.config.is_icache {
            return Err(AccessError::ReadOnly(addr));
        }

        let set = self.geometry.set_index(addr);
        let tag = self.geometry.tag(addr);

        if self.config.resource_stalls {
            if let Some(busy) = self.check_banks(set, cycle) {
                trace!(%addr, set, cycle, ?busy, "resource stall");
                return Ok(busy);
            }
        }

        let bank_cycles = self
            .tag_array
            .reserve(set, cycle)
            .saturating_add(self.data_array.reserve(set, cycle));

        if let Some(way) = self.find_way(set, tag) {
            self.policy.update(set, way);
            let idx = self.line_index(set, way);
            let line = &mut self.lines[idx];
            line.last_access = cycle;
            line.dirty |= is_write;
            trace!(%addr, set, way, is_write, cycles = bank_cycles, "hit");
            return Ok(AccessResult::Hit {
                way,
                cycles: bank_cycles,
            });
        }

        let (way, eviction) = self.fill(set, tag, is_write, cycle);
        let cycles = self.config.latency.saturating_add(bank_cycles);
        debug!(%addr, set, way, is_write, cycles, ?eviction, "miss");
        Ok(AccessResult::Miss {
            way,
            cycles,
            eviction,
        })
    }

    /// Invalidates every line and returns policy and bank state to power-on.
    ///
    /// Dirty lines are dropped without writeback. Calling it again is a no-op.
    pub fn flush(&mut self) {
        let dropped = self.lines.iter().filter(|l| l.valid && l.dirty).count();
        for line in &mut self.lines {
            *line = Line::default();
        }
        self.policy.reset();
        self.tag_array.reset();
        self.data_array.reset();
        debug!(dropped_dirty = dropped, "flush");
    }

    /// Whether `addr` has a resident line. Does not touch the replacement state.
    ///
    /// # Errors
    ///
    /// [`AccessError::OutOfRange`] outside the window.
    pub fn contains(&self, addr: u64) -> Result<bool, AccessError> {
        let addr = PhysAddr::new(addr);
        self.check_range(addr)?;
        Ok(self.lookup(addr).is_some())
    }

    /// Whether a fill for `addr` can proceed without eviction: the tag is already
    /// resident or its set has an invalid way.
    ///
    /// # Errors
    ///
    /// [`AccessError::OutOfRange`] outside the window.
    pub fn has_free_way(&self, addr: u64) -> Result<bool, AccessError> {
        let addr = PhysAddr::new(addr);
        self.check_range(addr)?;
        let set = self.geometry.set_index(addr);
        Ok(self.find_way(set, self.geometry.tag(addr)).is_some() || self.free_way(set).is_some())
    }

    /// Line address that a fill for `addr` would evict, without modifying anything.
    ///
    /// # Returns
    ///
    /// `None` when no eviction is needed (see [`has_free_way`](Self::has_free_way)).
    ///
    /// # Errors
    ///
    /// [`AccessError::OutOfRange`] outside the window.
    pub fn probe_victim(&self, addr: u64) -> Result<Option<u64>, AccessError> {
        if self.has_free_way(addr)? {
            return Ok(None);
        }
        let set = self.set_of(addr);
        let victim = self.policy.peek_victim(set);
        let line = &self.lines[self.line_index(set, victim)];
        Ok(Some(self.geometry.line_addr(line.tag).val()))
    }

    /// Marks a resident line most recently used.
    ///
    /// # Returns
    ///
    /// Whether the line was resident.
    ///
    /// # Errors
    ///
    /// [`AccessError::OutOfRange`] outside the window.
    pub fn touch(&mut self, addr: u64, cycle: u64) -> Result<bool, AccessError> {
        let addr = PhysAddr::new(addr);
        self.check_range(addr)?;
        let Some((set, way)) = self.lookup(addr) else {
            return Ok(false);
        };
        self.policy.update(set, way);
        let idx = self.line_index(set, way);
        self.lines[idx].last_access = cycle;
        Ok(true)
    }

    /// Frees the line holding `addr`.
    ///
    /// # Returns
    ///
    /// The freed line; `dirty` means the caller owes a writeback.
    ///
    /// # Errors
    ///
    /// [`AccessError::OutOfRange`] outside the window, [`AccessError::NotResident`] if
    /// no line holds `addr`.
    pub fn deallocate(&mut self, addr: u64) -> Result<Eviction, AccessError> {
        let (set, way) = self.resident(addr)?;
        let idx = self.line_index(set, way);
        let line = std::mem::take(&mut self.lines[idx]);
        let freed = Eviction {
            addr: self.geometry.line_addr(line.tag).val(),
            dirty: line.dirty,
        };
        debug!(addr = freed.addr, set, way, dirty = freed.dirty, "deallocate");
        Ok(freed)
    }

    /// Records `context` as the lock owner of the line holding `addr`.
    ///
    /// # Errors
    ///
    /// [`AccessError::OutOfRange`] or [`AccessError::NotResident`].
    pub fn lock(&mut self, addr: u64, context: u32) -> Result<(), AccessError> {
        let (set, way) = self.resident(addr)?;
        let idx = self.line_index(set, way);
        self.lines[idx].locked = Some(context);
        trace!(addr, context, "lock");
        Ok(())
    }

    /// Clears the lock owner of the line holding `addr`.
    ///
    /// # Errors
    ///
    /// [`AccessError::OutOfRange`] or [`AccessError::NotResident`].
    pub fn unlock(&mut self, addr: u64) -> Result<(), AccessError> {
        let (set, way) = self.resident(addr)?;
        let idx = self.line_index(set, way);
        self.lines[idx].locked = None;
        trace!(addr, "unlock");
        Ok(())
    }

    /// Whether the line holding `addr` is locked by `context`.
    ///
    /// # Errors
    ///
    /// [`AccessError::OutOfRange`] or [`AccessError::NotResident`].
    pub fn is_locked(&self, addr: u64, context: u32) -> Result<bool, AccessError> {
        let (set, way) = self.resident(addr)?;
        Ok(self.lines[self.line_index(set, way)].locked == Some(context))
    }

    /// Snapshot of every valid line in set/way order.
    pub fn resident_lines(&self) -> Vec<ResidentLine> {
        let assoc = self.geometry.assoc;
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.valid)
            .map(|(idx, line)| ResidentLine {
                addr: self.geometry.line_addr(line.tag).val(),
                set: idx / assoc,
                way: idx % assoc,
                dirty: line.dirty,
                last_access: line.last_access,
            })
            .collect()
    }

    #[inline(always)]
    const fn line_index(&self, set: usize, way: usize) -> usize {
        set * self.geometry.assoc + way
    }

    fn set_lines(&self, set: usize) -> &[Line] {
        let base = self.line_index(set, 0);
        &self.lines[base..base + self.geometry.assoc]
    }

    fn check_range(&self, addr: PhysAddr) -> Result<(), AccessError> {
        let base = self.config.spm_base;
        if addr.val() < base || addr.val() - base >= self.config.spm_size {
            return Err(AccessError::OutOfRange {
                addr,
                base: PhysAddr::new(base),
                size: self.config.spm_size,
            });
        }
        Ok(())
    }

    /// Returns a busy result if either bank owning `set` is occupied at `cycle`.
    fn check_banks(&self, set: usize, cycle: u64) -> Option<AccessResult> {
        if self.tag_array.is_busy(set, cycle) {
            return Some(AccessResult::Busy {
                resource: ArrayResource::TagArray,
                ready_at: self.tag_array.ready_at(set),
            });
        }
        if self.data_array.is_busy(set, cycle) {
            return Some(AccessResult::Busy {
                resource: ArrayResource::DataArray,
                ready_at: self.data_array.ready_at(set),
            });
        }
        None
    }

    fn find_way(&self, set: usize, tag: u64) -> Option<usize> {
        self.set_lines(set)
            .iter()
            .position(|l| l.valid && l.tag == tag)
    }

    fn free_way(&self, set: usize) -> Option<usize> {
        self.set_lines(set).iter().position(|l| !l.valid)
    }

    fn lookup(&self, addr: PhysAddr) -> Option<(usize, usize)> {
        let set = self.geometry.set_index(addr);
        self.find_way(set, self.geometry.tag(addr)).map(|way| (set, way))
    }

    fn resident(&self, addr: u64) -> Result<(usize, usize), AccessError> {
        let addr = PhysAddr::new(addr);
        self.check_range(addr)?;
        self.lookup(addr).ok_or(AccessError::NotResident(addr))
    }

    /// Installs `tag` in `set`, preferring the lowest invalid way over a policy victim.
    fn fill(&mut self, set: usize, tag: u64, is_write: bool, cycle: u64) -> (usize, Option<Eviction>) {
        let way = match self.free_way(set) {
            Some(way) => way,
            None => self.policy.get_victim(set),
        };
        let idx = self.line_index(set, way);
        let old = &self.lines[idx];
        let eviction = old.valid.then(|| Eviction {
            addr: self.geometry.line_addr(old.tag).val(),
            dirty: old.dirty,
        });

        self.lines[idx] = Line {
            tag,
            valid: true,
            dirty: is_write,
            locked: None,
            last_access: cycle,
        };
        self.policy.update(set, way);
        (way, eviction)
    }
}

impl fmt::Display for ScratchpadMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Scratchpad dump: {} sets x {} ways, {} B lines, {}",
            self.geometry.num_sets, self.geometry.assoc, self.geometry.line_bytes, self.policy.kind()
        )?;
        for (idx, line) in self.lines.iter().enumerate() {
            let (set, way) = (idx / self.geometry.assoc, idx % self.geometry.assoc);
            if line.valid {
                writeln!(
                    f,
                    "  Index: {set} way: {way} entry: {} dirty={} last={}",
                    self.geometry.line_addr(line.tag),
                    line.dirty,
                    line.last_access
                )?;
            } else {
                writeln!(f, "  Index: {set} way: {way} entry: NULL")?;
            }
        }
        Ok(())
    }
}
