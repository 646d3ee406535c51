//! API contract tests for gramdex-merge
//!
//! Every strategy must honor the same observable contract:
//!
//! 1. **Exact result set** - ids whose weights reach T, each once
//! 2. **Capacity guard** - T above the total weight returns immediately
//! 3. **Threshold monotonicity** - raising T never adds ids
//! 4. **Union and intersection** - T=1 and T=k with unit weights
//! 5. **Weight aggregation** - k copies of a list equal one list of weight k
//! 6. **Input untouched** - lists are identical after every call
//!
//! ## Running These Tests
//!
//! ```bash
//! cargo test -p gramdex-merge --test api_contracts
//! ```

use gramdex_merge::{
    Error, HeapMerger, HybridConfig, HybridMerger, ListMerger, ResultOrder, ScanCountMerger,
    ShortListMode, SkipMerger, SplitPolicy, WeightedList, DEFAULT_MAX_UNIVERSE,
};
use std::collections::BTreeSet;

// ============================================================================
// Test Helpers
// ============================================================================

fn strategies() -> Vec<Box<dyn ListMerger>> {
    vec![
        Box::new(HeapMerger::new()),
        Box::new(SkipMerger::new()),
        Box::new(ScanCountMerger::new(64)),
        Box::new(ScanCountMerger::growable()),
        Box::new(HybridMerger::default()),
        Box::new(HybridMerger::new(HybridConfig {
            split: SplitPolicy::adaptive(),
            short_lists: ShortListMode::Heap,
        })),
        Box::new(HybridMerger::new(HybridConfig {
            split: SplitPolicy::LongLists(1),
            short_lists: ShortListMode::Array,
        })),
        Box::new(HybridMerger::new(HybridConfig {
            split: SplitPolicy::ThresholdMinusOne,
            short_lists: ShortListMode::ScanCount,
        })),
    ]
}

fn example() -> [Vec<u32>; 4] {
    [
        vec![1, 5, 8],
        vec![8, 10, 13, 15],
        vec![3, 4, 5],
        vec![8, 10, 13, 15],
    ]
}

fn as_slices(lists: &[Vec<u32>]) -> Vec<&[u32]> {
    lists.iter().map(|l| l.as_slice()).collect()
}

fn sorted_ids(merger: &mut dyn ListMerger, lists: &[&[u32]], threshold: u32) -> Vec<u32> {
    merger
        .merge_unweighted(lists, threshold)
        .unwrap()
        .into_sorted()
}

// ============================================================================
// Exact results
// ============================================================================

#[test]
fn test_example_thresholds() {
    let lists = example();
    let refs = as_slices(&lists);
    for mut merger in strategies() {
        let name = merger.name().to_string();
        assert_eq!(
            sorted_ids(merger.as_mut(), &refs, 2),
            vec![5, 8, 10, 13, 15],
            "{}",
            name
        );
        assert_eq!(sorted_ids(merger.as_mut(), &refs, 3), vec![8], "{}", name);
        assert!(sorted_ids(merger.as_mut(), &refs, 4).is_empty(), "{}", name);
    }
}

#[test]
fn test_result_order_declared() {
    let lists = example();
    let refs = as_slices(&lists);
    for mut merger in strategies() {
        let out = merger.merge_unweighted(&refs, 2).unwrap();
        assert_eq!(out.order, merger.result_order());
        if out.order == ResultOrder::Ascending {
            assert!(out.ids.windows(2).all(|w| w[0] < w[1]), "{}", merger.name());
        }
        let unique: BTreeSet<u32> = out.ids.iter().copied().collect();
        assert_eq!(unique.len(), out.ids.len(), "{}", merger.name());
    }
}

// ============================================================================
// Capacity guard
// ============================================================================

#[test]
fn test_threshold_above_capacity() {
    let lists = example();
    let refs = as_slices(&lists);
    for mut merger in strategies() {
        let out = merger.merge_unweighted(&refs, 5).unwrap();
        assert!(out.is_empty());
        assert!(out.stats.early_exit, "{}", merger.name());
        assert_eq!(out.stats.elements_visited, 0, "{}", merger.name());
        assert_eq!(out.stats.total_weight, 4);
    }
}

#[test]
fn test_empty_input() {
    for mut merger in strategies() {
        let out = merger.merge_unweighted(&[], 1).unwrap();
        assert!(out.is_empty());
        assert!(out.stats.early_exit);
    }
}

#[test]
fn test_zero_threshold_rejected() {
    let lists = example();
    let refs = as_slices(&lists);
    for mut merger in strategies() {
        let err = merger.merge_unweighted(&refs, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidThreshold), "{}", merger.name());
    }
}

// ============================================================================
// Set properties
// ============================================================================

#[test]
fn test_threshold_monotonicity() {
    let a: Vec<u32> = (0..60).step_by(2).collect();
    let b: Vec<u32> = (0..60).step_by(3).collect();
    let c: Vec<u32> = (0..60).step_by(5).collect();
    let d: Vec<u32> = (10..30).collect();
    let refs: Vec<&[u32]> = vec![&a[..], &b[..], &c[..], &d[..]];
    for mut merger in strategies() {
        let mut previous: Option<BTreeSet<u32>> = None;
        for t in 1..=4 {
            let ids: BTreeSet<u32> = sorted_ids(merger.as_mut(), &refs, t).into_iter().collect();
            if let Some(prev) = &previous {
                assert!(ids.is_subset(prev), "{} T={}", merger.name(), t);
            }
            previous = Some(ids);
        }
    }
}

#[test]
fn test_union_and_intersection() {
    let a = [1, 2, 3, 10];
    let b = [2, 3, 11];
    let c = [0, 3, 12];
    let refs: [&[u32]; 3] = [&a, &b, &c];
    for mut merger in strategies() {
        assert_eq!(
            sorted_ids(merger.as_mut(), &refs, 1),
            vec![0, 1, 2, 3, 10, 11, 12],
            "{}",
            merger.name()
        );
        assert_eq!(sorted_ids(merger.as_mut(), &refs, 3), vec![3], "{}", merger.name());
    }
}

#[test]
fn test_weight_aggregation() {
    let a = [1, 4, 6, 9];
    let b = [4, 9, 12];
    let copies: [&[u32]; 4] = [&a, &a, &a, &b];
    let weighted = [WeightedList::new(&a, 3), WeightedList::unit(&b)];
    for mut merger in strategies() {
        for t in 1..=4 {
            let expected = sorted_ids(merger.as_mut(), &copies, t);
            let got = merger.merge(&weighted, t).unwrap().into_sorted();
            assert_eq!(got, expected, "{} T={}", merger.name(), t);
        }
    }
}

#[test]
fn test_inputs_unchanged() {
    let lists = example();
    let before = lists.clone();
    let refs = as_slices(&lists);
    for mut merger in strategies() {
        for t in 1..=5 {
            merger.merge_unweighted(&refs, t).unwrap();
        }
    }
    assert_eq!(lists, before);
}

#[test]
fn test_largest_identifier() {
    let a = [3, u32::MAX];
    let b = [u32::MAX];
    let refs: [&[u32]; 2] = [&a, &b];
    let mut mergers: Vec<Box<dyn ListMerger>> = vec![
        Box::new(HeapMerger::new()),
        Box::new(SkipMerger::new()),
        Box::new(HybridMerger::default()),
        Box::new(HybridMerger::new(HybridConfig {
            split: SplitPolicy::ThresholdMinusOne,
            short_lists: ShortListMode::ScanCount,
        })),
    ];
    for merger in mergers.iter_mut() {
        assert_eq!(sorted_ids(merger.as_mut(), &refs, 2), vec![u32::MAX]);
    }

    // a growable table refuses ids past its limit instead of allocating them
    let mut growable = ScanCountMerger::growable();
    let err = growable.merge_unweighted(&refs, 2).unwrap_err();
    assert!(matches!(
        err,
        Error::IdentifierOutOfRange { id: u32::MAX, universe } if universe == DEFAULT_MAX_UNIVERSE
    ));
    assert_eq!(growable.universe(), 0);
    let small = [3, 7];
    let refs: [&[u32]; 2] = [&small, &small];
    assert_eq!(sorted_ids(&mut growable, &refs, 2), vec![3, 7]);
}

// ============================================================================
// Scan-count bounds
// ============================================================================

#[test]
fn test_scan_count_universe_bound() {
    let lists = example();
    let refs = as_slices(&lists);
    let mut merger = ScanCountMerger::new(20);
    assert_eq!(sorted_ids(&mut merger, &refs, 2), vec![5, 8, 10, 13, 15]);

    let mut small = ScanCountMerger::new(10);
    let err = small.merge_unweighted(&refs, 2).unwrap_err();
    assert!(matches!(err, Error::IdentifierOutOfRange { id: 15, universe: 10 }));
    // the failed call left nothing behind
    let inside = [1, 5, 8];
    let refs: [&[u32]; 2] = [&inside, &inside];
    assert_eq!(sorted_ids(&mut small, &refs, 2), vec![1, 5, 8]);
}
