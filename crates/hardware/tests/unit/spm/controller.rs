//! Scratchpad Controller Unit Tests.
//!
//! Verifies hit/miss resolution, dirty tracking, eviction reporting, access
//! costs, flush behavior and the per-access error paths.
//!
//! Most tests use `small_config`: 4 sets x 2 ways of 64-byte lines, so that
//! addresses 256 bytes apart collide in the same set.

use rstest::rstest;
use spmsim_core::config::ReplacementPolicy;
use spmsim_core::{AccessError, AccessResult, Eviction, ScratchpadConfig};

use crate::common::{SMALL_SET_STRIDE, access, build, small_config};

// ══════════════════════════════════════════════════════════
// 1. Cold miss and warm hit
// ══════════════════════════════════════════════════════════

/// First access to any address is a compulsory miss into way 0 with no eviction.
/// Cost = miss latency (10) + tag bank (1) + data bank (1).
#[test]
fn cold_miss_fills_lowest_way() {
    let mut spm = build(small_config(ReplacementPolicy::PseudoLru));
    let result = access(&mut spm, 0x1000, false, 0);

    assert_eq!(
        result,
        AccessResult::Miss {
            way: 0,
            cycles: 12,
            eviction: None
        }
    );
    assert_eq!(spm.valid_lines(), 1);
}

/// Second access to the same line is a hit costing only the bank latencies.
#[test]
fn warm_hit_costs_bank_latency() {
    let mut spm = build(small_config(ReplacementPolicy::PseudoLru));
    let _ = access(&mut spm, 0x1000, false, 0);

    let result = access(&mut spm, 0x1010, false, 5);
    assert_eq!(result, AccessResult::Hit { way: 0, cycles: 2 });
}

/// Tag and data latencies are charged separately.
#[test]
fn hit_cost_sums_tag_and_data_latency() {
    let mut spm = build(ScratchpadConfig {
        tag_access_latency: 2,
        data_access_latency: 3,
        ..small_config(ReplacementPolicy::Lru)
    });
    let miss = access(&mut spm, 0x40, false, 0);
    assert_eq!(miss.cycles(), Some(10 + 2 + 3));

    let hit = access(&mut spm, 0x40, false, 100);
    assert_eq!(hit.cycles(), Some(5));
}

/// Reading immediately after writing the same address hits.
#[rstest]
#[case(ReplacementPolicy::PseudoLru)]
#[case(ReplacementPolicy::Lru)]
#[case(ReplacementPolicy::Random)]
fn read_after_write_hits(#[case] policy: ReplacementPolicy) {
    let mut spm = build(small_config(policy));
    let _ = access(&mut spm, 0x2A0, true, 0);
    assert!(access(&mut spm, 0x2A0, false, 1).is_hit());
}

// ══════════════════════════════════════════════════════════
// 2. Set conflicts and eviction
// ══════════════════════════════════════════════════════════

/// Filling a third tag into a 2-way set evicts exactly one resident line,
/// and the evicted tag misses afterwards.
#[rstest]
#[case(ReplacementPolicy::PseudoLru)]
#[case(ReplacementPolicy::Lru)]
#[case(ReplacementPolicy::Random)]
fn third_tag_evicts_one(#[case] policy: ReplacementPolicy) {
    let mut spm = build(small_config(policy));
    let a = 0x0;
    let b = a + SMALL_SET_STRIDE;
    let c = b + SMALL_SET_STRIDE;

    let _ = access(&mut spm, a, false, 0);
    let _ = access(&mut spm, b, false, 1);
    let result = access(&mut spm, c, false, 2);

    let evicted = result.eviction().unwrap();
    assert!(evicted.addr == a || evicted.addr == b);
    assert!(!evicted.dirty);
    assert_eq!(spm.valid_lines(), 2);
    assert!(!spm.contains(evicted.addr).unwrap());
    assert!(spm.contains(c).unwrap());
    assert!(access(&mut spm, evicted.addr, false, 3).is_miss());
}

/// LRU keeps the recently re-read line and evicts the other.
#[test]
fn lru_evicts_least_recent() {
    let mut spm = build(small_config(ReplacementPolicy::Lru));
    let a = 0x0;
    let b = a + SMALL_SET_STRIDE;
    let c = b + SMALL_SET_STRIDE;

    let _ = access(&mut spm, a, false, 0);
    let _ = access(&mut spm, b, false, 1);
    assert!(access(&mut spm, a, false, 2).is_hit());

    let result = access(&mut spm, c, false, 3);
    assert_eq!(result.eviction().map(|e| e.addr), Some(b));
    assert!(spm.contains(a).unwrap());
}

/// A dirty victim carries a writeback obligation; a clean one does not.
#[test]
fn dirty_victim_reports_writeback() {
    let mut spm = build(small_config(ReplacementPolicy::Lru));
    let a = 0x40;
    let b = a + SMALL_SET_STRIDE;
    let c = b + SMALL_SET_STRIDE;

    let _ = access(&mut spm, a, true, 0);
    let _ = access(&mut spm, b, false, 1);
    let first = access(&mut spm, c, false, 2);
    assert_eq!(
        first.eviction(),
        Some(Eviction {
            addr: a,
            dirty: true
        })
    );
    assert_eq!(first.writeback(), Some(a));

    let second = access(&mut spm, a, false, 3);
    assert_eq!(second.eviction().map(|e| e.addr), Some(b));
    assert_eq!(second.writeback(), None);
}

/// A write hit marks a clean line dirty.
#[test]
fn write_hit_sets_dirty() {
    let mut spm = build(small_config(ReplacementPolicy::PseudoLru));
    let _ = access(&mut spm, 0x80, false, 0);
    assert!(access(&mut spm, 0x80, true, 1).is_hit());

    let lines = spm.resident_lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].dirty);
}

/// Evicted addresses are reported line-aligned even when the access was not.
#[test]
fn eviction_address_is_line_aligned() {
    let mut spm = build(small_config(ReplacementPolicy::Lru));
    let _ = access(&mut spm, 0x13, false, 0);
    let _ = access(&mut spm, 0x13 + SMALL_SET_STRIDE, false, 1);
    let result = access(&mut spm, 0x13 + 2 * SMALL_SET_STRIDE, false, 2);
    assert_eq!(result.eviction().map(|e| e.addr), Some(0x0));
}

/// Different sets never interfere.
#[test]
fn sets_are_independent() {
    let mut spm = build(small_config(ReplacementPolicy::PseudoLru));
    for set in 0..4u64 {
        let _ = access(&mut spm, set * 64, false, set);
        let _ = access(&mut spm, set * 64 + SMALL_SET_STRIDE, false, set);
    }
    assert_eq!(spm.valid_lines(), 8);
    for set in 0..4u64 {
        assert!(spm.contains(set * 64).unwrap());
    }
}

// ══════════════════════════════════════════════════════════
// 3. Flush
// ══════════════════════════════════════════════════════════

#[test]
fn flush_invalidates_everything() {
    let mut spm = build(small_config(ReplacementPolicy::PseudoLru));
    let _ = access(&mut spm, 0x0, true, 0);
    let _ = access(&mut spm, 0x40, false, 1);

    spm.flush();
    assert_eq!(spm.valid_lines(), 0);
    assert!(!spm.contains(0x0).unwrap());
    assert!(access(&mut spm, 0x0, false, 2).is_miss());
}

#[test]
fn flush_twice_matches_flush_once() {
    let mut once = build(small_config(ReplacementPolicy::Random));
    let mut twice = build(small_config(ReplacementPolicy::Random));
    for spm in [&mut once, &mut twice] {
        for i in 0..16u64 {
            let _ = access(spm, i * 0x90, i % 3 == 0, i);
        }
    }

    once.flush();
    twice.flush();
    twice.flush();

    assert_eq!(once.to_string(), twice.to_string());
    assert_eq!(twice.valid_lines(), 0);
}

/// Flush also frees busy banks.
#[test]
fn flush_clears_bank_occupancy() {
    let mut spm = build(ScratchpadConfig {
        resource_stalls: true,
        tag_access_latency: 50,
        ..small_config(ReplacementPolicy::PseudoLru)
    });
    let _ = access(&mut spm, 0x0, false, 0);
    assert!(access(&mut spm, 0x40, false, 1).is_busy());

    spm.flush();
    assert!(access(&mut spm, 0x40, false, 1).is_miss());
}

// ══════════════════════════════════════════════════════════
// 4. Errors
// ══════════════════════════════════════════════════════════

#[test]
fn out_of_range_address_is_rejected_without_side_effects() {
    let mut spm = build(ScratchpadConfig {
        spm_base: 0x1000,
        spm_size: 0x1000,
        ..small_config(ReplacementPolicy::PseudoLru)
    });

    for addr in [0x0, 0xFFF, 0x2000, u64::MAX] {
        let err = spm.access(addr, false, 0).unwrap_err();
        assert!(matches!(err, AccessError::OutOfRange { .. }), "{addr:#x}");
    }
    assert_eq!(spm.valid_lines(), 0);

    assert!(access(&mut spm, 0x1000, false, 0).is_miss());
    assert!(access(&mut spm, 0x1FFF, false, 1).is_miss());
}

#[test]
fn instruction_only_scratchpad_rejects_writes() {
    let mut spm = build(ScratchpadConfig {
        is_icache: true,
        ..small_config(ReplacementPolicy::PseudoLru)
    });

    let err = spm.access(0x40, true, 0).unwrap_err();
    assert!(matches!(err, AccessError::ReadOnly(_)));
    assert_eq!(spm.valid_lines(), 0);

    assert!(access(&mut spm, 0x40, false, 0).is_miss());
    assert!(spm.access(0x40, true, 1).is_err());
    assert!(!spm.resident_lines()[0].dirty);
}

#[test]
fn queries_reject_out_of_range() {
    let spm = build(small_config(ReplacementPolicy::Lru));
    let far = 64 * 1024;
    assert!(spm.contains(far).is_err());
    assert!(spm.has_free_way(far).is_err());
    assert!(spm.probe_victim(far).is_err());
}

// ══════════════════════════════════════════════════════════
// 5. Index placement
// ══════════════════════════════════════════════════════════

/// Moving the index start bit up spreads consecutive lines over fewer sets.
#[test]
fn start_index_bit_selects_set_field() {
    let spm = build(ScratchpadConfig {
        start_index_bit: 8,
        ..small_config(ReplacementPolicy::PseudoLru)
    });
    assert_eq!(spm.set_of(0x000), 0);
    assert_eq!(spm.set_of(0x0C0), 0);
    assert_eq!(spm.set_of(0x100), 1);
    assert_eq!(spm.set_of(0x300), 3);
    assert_eq!(spm.set_of(0x400), 0);
}

/// With the index above the block offset, lines that share a set are still
/// told apart by the full line-number tag.
#[test]
fn high_index_bit_does_not_alias_lines() {
    let mut spm = build(ScratchpadConfig {
        start_index_bit: 8,
        ..small_config(ReplacementPolicy::PseudoLru)
    });
    let _ = access(&mut spm, 0x000, false, 0);
    assert!(access(&mut spm, 0x040, false, 1).is_miss());
    assert!(access(&mut spm, 0x000, false, 2).is_hit());
    assert!(access(&mut spm, 0x040, false, 3).is_hit());
}
