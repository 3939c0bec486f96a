//! Configuration for the scratchpad controller.
//!
//! This module defines the parameters used to build a [`ScratchpadMemory`](crate::ScratchpadMemory).
//! It provides:
//! 1. **Defaults:** Baseline values for every parameter (64 KiB, 4 ways, 64-byte lines, one bank each).
//! 2. **Structures:** `ScratchpadConfig` (what the caller declares) and `Geometry` (what is derived from it).
//! 3. **Enums:** The replacement policy selector.
//!
//! Configuration is supplied as JSON (the Python binding serializes its dict to JSON) or built
//! with `ScratchpadConfig::default()` and struct update syntax. Declaration-style field names
//! (`dataArrayBanks`, `spm_blksize_bit`, ...) are accepted as aliases, and sizes may be given as
//! strings such as `"64kB"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};

use crate::common::{ConfigError, PhysAddr};

/// Default configuration constants for the scratchpad.
mod defaults {
    /// Default array capacity (64 KiB).
    pub const SIZE_BYTES: usize = 64 * 1024;

    /// Default miss penalty in cycles.
    pub const LATENCY: u64 = 20;

    /// Default associativity.
    pub const ASSOC: usize = 4;

    /// First set-index bit; 6 matches a 64-byte line.
    pub const START_INDEX_BIT: u32 = 6;

    /// Default number of banks in each of the tag and data arrays.
    pub const ARRAY_BANKS: usize = 1;

    /// Default per-bank access latency in cycles.
    pub const ARRAY_LATENCY: u64 = 1;

    /// Default base of the scratchpad address window.
    pub const SPM_BASE: u64 = 0;

    /// Default size of the scratchpad address window (64 KiB).
    pub const SPM_SIZE: u64 = 64 * 1024;

    /// Default block-size bits (64-byte lines).
    pub const BLOCK_SIZE_BITS: u32 = 6;

    /// Default seed for the random replacement policy.
    pub const RANDOM_SEED: u64 = 123456789;
}

/// Scratchpad replacement policy algorithms.
///
/// Selected once at construction; names are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum ReplacementPolicy {
    /// Tree-based pseudo-LRU: `assoc - 1` bits per set.
    #[default]
    PseudoLru,
    /// True least-recently-used ordering per set.
    Lru,
    /// Seeded pseudo-random victim selection.
    Random,
}

impl ReplacementPolicy {
    /// Canonical declaration name (`PSEUDO_LRU`, `LRU` or `RANDOM`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::PseudoLru => "PSEUDO_LRU",
            Self::Lru => "LRU",
            Self::Random => "RANDOM",
        }
    }
}

impl FromStr for ReplacementPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "PSEUDO_LRU" | "PSEUDOLRU" | "PLRU" | "TREE_PLRU" => Ok(Self::PseudoLru),
            "LRU" => Ok(Self::Lru),
            "RANDOM" | "RAND" => Ok(Self::Random),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for ReplacementPolicy {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a memory size such as `"64kB"`, `"1 MiB"` or `"4096"` into bytes.
///
/// Suffixes are binary multiples regardless of spelling (`kB` = `KiB` = 1024), matching how
/// simulator parameter files write capacities.
///
/// # Arguments
///
/// * `text` - Size string; a bare number is a byte count.
///
/// # Errors
///
/// [`ConfigError::InvalidSize`] if the number or suffix is malformed or the result overflows.
///
/// # Examples
///
/// ```
/// use spmsim_core::config::parse_memory_size;
///
/// assert_eq!(parse_memory_size("64kB").unwrap(), 65536);
/// assert_eq!(parse_memory_size("2 MiB").unwrap(), 2 * 1024 * 1024);
/// assert!(parse_memory_size("12 parsecs").is_err());
/// ```
pub fn parse_memory_size(text: &str) -> Result<u64, ConfigError> {
    let invalid = || ConfigError::InvalidSize(text.to_string());
    let trimmed = text.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, suffix) = trimmed.split_at(split);
    let value: u64 = digits.parse().map_err(|_| invalid())?;

    let multiplier: u64 = match suffix.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" | "kib" => 1 << 10,
        "m" | "mb" | "mib" => 1 << 20,
        "g" | "gb" | "gib" => 1 << 30,
        _ => return Err(invalid()),
    };
    value.checked_mul(multiplier).ok_or_else(invalid)
}

/// A size written either as a byte count or as a suffixed string.
#[derive(Deserialize)]
#[serde(untagged)]
enum SizeRepr {
    Bytes(u64),
    Text(String),
}

impl SizeRepr {
    fn bytes(self) -> Result<u64, ConfigError> {
        match self {
            Self::Bytes(n) => Ok(n),
            Self::Text(s) => parse_memory_size(&s),
        }
    }
}

fn deserialize_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let bytes = SizeRepr::deserialize(deserializer)?
        .bytes()
        .map_err(de::Error::custom)?;
    usize::try_from(bytes).map_err(de::Error::custom)
}

fn deserialize_window<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    SizeRepr::deserialize(deserializer)?
        .bytes()
        .map_err(de::Error::custom)
}

/// Parameters of one scratchpad instance.
///
/// # Examples
///
/// Default configuration:
///
/// ```
/// use spmsim_core::config::{ReplacementPolicy, ScratchpadConfig};
///
/// let config = ScratchpadConfig::default();
/// assert_eq!(config.size_bytes, 64 * 1024);
/// assert_eq!(config.replacement_policy, ReplacementPolicy::PseudoLru);
/// assert_eq!(config.geometry().unwrap().num_sets, 256);
/// ```
///
/// Deserializing from JSON with declaration-style names:
///
/// ```
/// use spmsim_core::config::{ReplacementPolicy, ScratchpadConfig};
///
/// let json = r#"{
///     "size": "32kB",
///     "latency": 12,
///     "assoc": 8,
///     "replacement_policy": "LRU",
///     "dataArrayBanks": 4,
///     "tagArrayBanks": 2,
///     "resourceStalls": true,
///     "spm_size": "1MB"
/// }"#;
///
/// let config = ScratchpadConfig::from_json(json).unwrap();
/// assert_eq!(config.size_bytes, 32 * 1024);
/// assert_eq!(config.replacement_policy, ReplacementPolicy::Lru);
/// assert_eq!(config.data_array_banks, 4);
/// assert!(config.resource_stalls);
/// assert_eq!(config.spm_size, 1 << 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScratchpadConfig {
    /// Array capacity in bytes.
    #[serde(
        alias = "size",
        default = "ScratchpadConfig::default_size",
        deserialize_with = "deserialize_size"
    )]
    pub size_bytes: usize,

    /// Miss penalty in cycles, charged on every fill.
    #[serde(default = "ScratchpadConfig::default_latency")]
    pub latency: u64,

    /// Number of ways per set.
    #[serde(default = "ScratchpadConfig::default_assoc")]
    pub assoc: usize,

    /// Victim selection algorithm.
    #[serde(default)]
    pub replacement_policy: ReplacementPolicy,

    /// Lowest address bit of the set index.
    #[serde(default = "ScratchpadConfig::default_start_index_bit")]
    pub start_index_bit: u32,

    /// Instruction-only scratchpad; writes are rejected.
    #[serde(default)]
    pub is_icache: bool,

    /// Number of banks in the data array.
    #[serde(alias = "dataArrayBanks", default = "ScratchpadConfig::default_banks")]
    pub data_array_banks: usize,

    /// Number of banks in the tag array.
    #[serde(alias = "tagArrayBanks", default = "ScratchpadConfig::default_banks")]
    pub tag_array_banks: usize,

    /// Cycles a data bank is occupied per access.
    #[serde(
        alias = "dataAccessLatency",
        default = "ScratchpadConfig::default_array_latency"
    )]
    pub data_access_latency: u64,

    /// Cycles a tag bank is occupied per access.
    #[serde(
        alias = "tagAccessLatency",
        default = "ScratchpadConfig::default_array_latency"
    )]
    pub tag_access_latency: u64,

    /// Refuse (rather than serialize) accesses that find their bank busy.
    #[serde(alias = "resourceStalls", default)]
    pub resource_stalls: bool,

    /// First address of the scratchpad window.
    #[serde(default = "ScratchpadConfig::default_spm_base")]
    pub spm_base: u64,

    /// Size of the scratchpad window in bytes.
    #[serde(
        default = "ScratchpadConfig::default_spm_size",
        deserialize_with = "deserialize_window"
    )]
    pub spm_size: u64,

    /// log2 of the line size in bytes.
    #[serde(
        alias = "spm_blksize_bit",
        default = "ScratchpadConfig::default_block_size_bits"
    )]
    pub block_size_bits: u32,

    /// Seed of the random replacement policy.
    #[serde(default = "ScratchpadConfig::default_random_seed")]
    pub random_seed: u64,
}

impl ScratchpadConfig {
    fn default_size() -> usize {
        defaults::SIZE_BYTES
    }

    fn default_latency() -> u64 {
        defaults::LATENCY
    }

    fn default_assoc() -> usize {
        defaults::ASSOC
    }

    fn default_start_index_bit() -> u32 {
        defaults::START_INDEX_BIT
    }

    fn default_banks() -> usize {
        defaults::ARRAY_BANKS
    }

    fn default_array_latency() -> u64 {
        defaults::ARRAY_LATENCY
    }

    fn default_spm_base() -> u64 {
        defaults::SPM_BASE
    }

    fn default_spm_size() -> u64 {
        defaults::SPM_SIZE
    }

    fn default_block_size_bits() -> u32 {
        defaults::BLOCK_SIZE_BITS
    }

    fn default_random_seed() -> u64 {
        defaults::RANDOM_SEED
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON, unknown fields, unknown policy names or bad sizes.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Line size in bytes.
    pub const fn line_bytes(&self) -> usize {
        1 << self.block_size_bits
    }

    /// Validates the configuration and derives the array geometry.
    ///
    /// # Errors
    ///
    /// The first [`ConfigError`] the configuration violates.
    pub fn geometry(&self) -> Result<Geometry, ConfigError> {
        if self.block_size_bits >= 32 {
            return Err(ConfigError::BlockSizeTooLarge(self.block_size_bits));
        }
        let line_bytes = self.line_bytes();

        if self.assoc == 0 {
            return Err(ConfigError::ZeroAssoc);
        }
        if !self.assoc.is_power_of_two() {
            return Err(ConfigError::NonPowerOfTwoAssoc(self.assoc));
        }

        let not_multiple = || ConfigError::CapacityNotMultiple {
            size: self.size_bytes,
            assoc: self.assoc,
            line_bytes,
        };
        let way_bytes = self.assoc.checked_mul(line_bytes).ok_or_else(not_multiple)?;
        if self.size_bytes == 0 || self.size_bytes % way_bytes != 0 {
            return Err(not_multiple());
        }

        let num_sets = self.size_bytes / way_bytes;
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::SetCountNotPowerOfTwo(num_sets));
        }
        let set_bits = num_sets.trailing_zeros();

        if self.start_index_bit < self.block_size_bits {
            return Err(ConfigError::IndexBelowBlockOffset {
                start_index_bit: self.start_index_bit,
                block_size_bits: self.block_size_bits,
            });
        }
        if self.start_index_bit.saturating_add(set_bits) > 64 {
            return Err(ConfigError::IndexBitsOverflow {
                start_index_bit: self.start_index_bit,
                set_bits,
            });
        }

        if self.tag_array_banks == 0 {
            return Err(ConfigError::ZeroBanks { array: "tag" });
        }
        if self.data_array_banks == 0 {
            return Err(ConfigError::ZeroBanks { array: "data" });
        }

        if self.spm_size == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if self.spm_base.checked_add(self.spm_size).is_none() {
            return Err(ConfigError::WindowOverflow {
                base: PhysAddr::new(self.spm_base),
                size: self.spm_size,
            });
        }

        Ok(Geometry {
            line_bytes,
            block_size_bits: self.block_size_bits,
            num_sets,
            set_bits,
            assoc: self.assoc,
            start_index_bit: self.start_index_bit,
        })
    }
}

impl Default for ScratchpadConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::SIZE_BYTES,
            latency: defaults::LATENCY,
            assoc: defaults::ASSOC,
            replacement_policy: ReplacementPolicy::default(),
            start_index_bit: defaults::START_INDEX_BIT,
            is_icache: false,
            data_array_banks: defaults::ARRAY_BANKS,
            tag_array_banks: defaults::ARRAY_BANKS,
            data_access_latency: defaults::ARRAY_LATENCY,
            tag_access_latency: defaults::ARRAY_LATENCY,
            resource_stalls: false,
            spm_base: defaults::SPM_BASE,
            spm_size: defaults::SPM_SIZE,
            block_size_bits: defaults::BLOCK_SIZE_BITS,
            random_seed: defaults::RANDOM_SEED,
        }
    }
}

/// Array shape derived from a validated [`ScratchpadConfig`].
///
/// Capacity = `assoc` x `num_sets` x `line_bytes` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Line size in bytes.
    pub line_bytes: usize,
    /// log2 of `line_bytes`.
    pub block_size_bits: u32,
    /// Number of sets (a power of two).
    pub num_sets: usize,
    /// log2 of `num_sets`.
    pub set_bits: u32,
    /// Ways per set.
    pub assoc: usize,
    /// Lowest address bit of the set index.
    pub start_index_bit: u32,
}

impl Geometry {
    /// Set selected by `addr`: bits `[start_index_bit, start_index_bit + set_bits)`.
    #[inline]
    pub const fn set_index(&self, addr: PhysAddr) -> usize {
        if self.set_bits == 0 {
            return 0;
        }
        addr.bit_select(self.start_index_bit, self.start_index_bit + self.set_bits - 1) as usize
    }

    /// Tag stored for `addr`.
    ///
    /// The whole line number is kept, so addresses whose index field starts above the block
    /// offset never alias.
    #[inline]
    pub const fn tag(&self, addr: PhysAddr) -> u64 {
        addr.line_number(self.block_size_bits)
    }

    /// First byte address of the line holding `tag`.
    #[inline]
    pub const fn line_addr(&self, tag: u64) -> PhysAddr {
        PhysAddr::new(tag << self.block_size_bits)
    }

    /// Total number of line slots.
    #[inline]
    pub const fn total_lines(&self) -> usize {
        self.num_sets * self.assoc
    }

    /// Capacity in bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.total_lines() * self.line_bytes
    }
}
