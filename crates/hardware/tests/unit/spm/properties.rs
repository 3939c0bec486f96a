//! Property Tests.
//!
//! Random access streams over `small_config` (4 sets x 2 ways, 64 KiB window)
//! check the invariants that must hold after any sequence of operations.

use std::collections::HashSet;

use proptest::prelude::*;
use spmsim_core::ScratchpadMemory;
use spmsim_core::config::ReplacementPolicy;

use crate::common::{access, build, small_config};

/// Addresses drawn from a few tags per set so that conflicts are frequent.
fn op() -> impl Strategy<Value = (u64, bool)> {
    (0u64..32 * 64, any::<bool>())
}

fn policy() -> impl Strategy<Value = ReplacementPolicy> {
    prop_oneof![
        Just(ReplacementPolicy::PseudoLru),
        Just(ReplacementPolicy::Lru),
        Just(ReplacementPolicy::Random),
    ]
}

fn run(spm: &mut ScratchpadMemory, ops: &[(u64, bool)]) {
    for (cycle, &(addr, is_write)) in ops.iter().enumerate() {
        let _ = access(spm, addr, is_write, cycle as u64);
    }
}

proptest! {
    /// Never more valid lines than capacity, never more than `assoc` per set,
    /// never the same line twice.
    #[test]
    fn capacity_and_uniqueness(policy in policy(), ops in prop::collection::vec(op(), 1..200)) {
        let mut spm = build(small_config(policy));
        run(&mut spm, &ops);

        let lines = spm.resident_lines();
        prop_assert!(lines.len() <= 8);
        prop_assert_eq!(lines.len(), spm.valid_lines());

        let mut per_set = [0usize; 4];
        let mut seen = HashSet::new();
        for line in &lines {
            per_set[line.set] += 1;
            prop_assert!(seen.insert(line.addr), "duplicate line {:#x}", line.addr);
            prop_assert_eq!(spm.set_of(line.addr), line.set);
        }
        prop_assert!(per_set.iter().all(|&n| n <= 2));
    }

    /// The address just accessed is always resident afterwards.
    #[test]
    fn accessed_line_is_resident(policy in policy(), ops in prop::collection::vec(op(), 1..100)) {
        let mut spm = build(small_config(policy));
        for (cycle, &(addr, is_write)) in ops.iter().enumerate() {
            let _ = access(&mut spm, addr, is_write, cycle as u64);
            prop_assert!(spm.contains(addr).unwrap());
            prop_assert!(access(&mut spm, addr, false, cycle as u64 + 1000).is_hit());
        }
    }

    /// Identical streams produce identical state and victim choices.
    #[test]
    fn replacement_is_deterministic(policy in policy(), ops in prop::collection::vec(op(), 1..200)) {
        let mut a = build(small_config(policy));
        let mut b = build(small_config(policy));
        run(&mut a, &ops);
        run(&mut b, &ops);

        prop_assert_eq!(a.resident_lines(), b.resident_lines());
        for set in 0..4u64 {
            let probe = set * 64 + 31 * 256;
            prop_assert_eq!(a.probe_victim(probe).unwrap(), b.probe_victim(probe).unwrap());
        }
    }

    /// A reported eviction is never of the line being filled, and the evicted
    /// line is gone afterwards.
    #[test]
    fn evictions_remove_exactly_the_victim(policy in policy(), ops in prop::collection::vec(op(), 1..200)) {
        let mut spm = build(small_config(policy));
        for (cycle, &(addr, is_write)) in ops.iter().enumerate() {
            let before = spm.valid_lines();
            let result = access(&mut spm, addr, is_write, cycle as u64);
            if let Some(evicted) = result.eviction() {
                prop_assert_ne!(evicted.addr, addr & !63);
                prop_assert!(!spm.contains(evicted.addr).unwrap());
                prop_assert_eq!(spm.valid_lines(), before);
            }
        }
    }

    /// After a flush the controller behaves exactly like a freshly built one.
    #[test]
    fn flush_restores_power_on_state(
        policy in policy(),
        warmup in prop::collection::vec(op(), 0..100),
        ops in prop::collection::vec(op(), 1..100),
    ) {
        let mut flushed = build(small_config(policy));
        run(&mut flushed, &warmup);
        flushed.flush();
        prop_assert_eq!(flushed.valid_lines(), 0);

        let mut fresh = build(small_config(policy));
        for (cycle, &(addr, is_write)) in ops.iter().enumerate() {
            prop_assert_eq!(
                access(&mut flushed, addr, is_write, cycle as u64),
                access(&mut fresh, addr, is_write, cycle as u64)
            );
        }
    }
}
