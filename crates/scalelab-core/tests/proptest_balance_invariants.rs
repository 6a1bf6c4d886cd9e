//! Property-based invariant tests for the balance engine.
//!
//! ## Invariants
//!
//! 1. Difference always equals the recomputed left sum minus right sum.
//! 2. A mismatched placement never changes either pan.
//! 3. Removing an unknown instance never changes either pan.
//! 4. Status agrees with the strict ±15 threshold.
//! 5. Instance ids are unique across every placement, resets included.

use std::collections::HashSet;

use proptest::prelude::*;
use scalelab_core::{
    BalanceEngine, Factor, InstanceId, Side, Status, forces_factors, relations_factors,
};

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Place { forces: bool, idx: usize, side: Side },
    RemoveNth { side: Side, nth: usize },
    RemoveUnknown { side: Side },
    Reset,
}

fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Left), Just(Side::Right)]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (any::<bool>(), 0usize..8, arb_side())
            .prop_map(|(forces, idx, side)| Op::Place { forces, idx, side }),
        3 => (arb_side(), 0usize..6).prop_map(|(side, nth)| Op::RemoveNth { side, nth }),
        1 => arb_side().prop_map(|side| Op::RemoveUnknown { side }),
        1 => Just(Op::Reset),
    ]
}

fn pick(forces: bool, idx: usize) -> &'static Factor {
    if forces {
        &forces_factors()[idx]
    } else {
        &relations_factors()[idx]
    }
}

fn recomputed(engine: &BalanceEngine) -> i32 {
    let left: i32 = engine.left().iter().map(|p| p.factor.weight).sum();
    let right: i32 = engine.right().iter().map(|p| p.factor.weight).sum();
    left - right
}

// ── 1, 2, 3, 5 over random op sequences ──────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn difference_never_stale(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut engine = BalanceEngine::new();
        let mut seen: HashSet<InstanceId> = HashSet::new();

        for op in ops {
            let before = (engine.left().len(), engine.right().len());
            match op {
                Op::Place { forces, idx, side } => {
                    let factor = pick(forces, idx);
                    let placement = engine.place(factor, side);
                    if factor.category.side() == side {
                        let id = placement.instance().expect("matching category accepted");
                        prop_assert!(seen.insert(id), "instance id {id} reused");
                    } else {
                        prop_assert!(!placement.is_accepted());
                        prop_assert_eq!((engine.left().len(), engine.right().len()), before);
                    }
                }
                Op::RemoveNth { side, nth } => {
                    let target = engine.pan(side).as_slice().get(nth).map(|p| p.instance);
                    if let Some(id) = target {
                        prop_assert!(engine.remove(id, side).is_some());
                        prop_assert!(!engine.pan(side).contains(id));
                    }
                }
                Op::RemoveUnknown { side } => {
                    prop_assert!(engine.remove(InstanceId::from_raw(u64::MAX), side).is_none());
                    prop_assert_eq!((engine.left().len(), engine.right().len()), before);
                }
                Op::Reset => {
                    engine.reset();
                    prop_assert!(engine.is_empty());
                }
            }

            prop_assert_eq!(engine.difference(), recomputed(&engine));
            prop_assert!(engine.left().iter().all(|p| p.factor.category.side() == Side::Left));
            prop_assert!(engine.right().iter().all(|p| p.factor.category.side() == Side::Right));
        }
    }
}

// ── 4. Status threshold ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn status_matches_threshold(d in -200i32..=200) {
        let status = Status::classify(d);
        if d > 15 {
            prop_assert_eq!(status, Status::RelationsLagging);
        } else if d < -15 {
            prop_assert_eq!(status, Status::RelationsFormalistic);
        } else {
            prop_assert_eq!(status, Status::Balanced);
        }
    }

    #[test]
    fn tilt_stays_within_limit(forces in prop::collection::vec(0usize..8, 0..10),
                               relations in prop::collection::vec(0usize..8, 0..10)) {
        let mut engine = BalanceEngine::new();
        for idx in forces {
            engine.place(&forces_factors()[idx], Side::Left);
        }
        for idx in relations {
            engine.place(&relations_factors()[idx], Side::Right);
        }
        let tilt = engine.tilt_degrees();
        prop_assert!((-25.0..=25.0).contains(&tilt), "tilt={tilt}");
    }
}
