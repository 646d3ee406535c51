//! Differential tests for gramdex-merge
//!
//! Every strategy and every hybrid configuration is run against a brute-force
//! counter on generated inputs. Results are compared as sets.
//!
//! Inputs come from two sources:
//! - proptest strategies (shrinkable, small universes)
//! - seeded `StdRng` workloads with skewed list lengths, closer to real gram
//!   lists where a few lists are much longer than the rest

use gramdex_merge::{
    detect_duplicate_lists, HeapMerger, HybridConfig, HybridMerger, ListMerger, RecordId,
    ScanCountMerger, ShortListMode, SkipMerger, SplitPolicy, WeightedList,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

// ============================================================================
// Reference implementation
// ============================================================================

fn brute_force(lists: &[WeightedList<'_>], threshold: u32) -> Vec<RecordId> {
    let mut counts: BTreeMap<RecordId, u64> = BTreeMap::new();
    for list in lists {
        for &id in list.ids {
            *counts.entry(id).or_insert(0) += u64::from(list.weight);
        }
    }
    counts
        .into_iter()
        .filter(|&(_, count)| count >= u64::from(threshold))
        .map(|(id, _)| id)
        .collect()
}

fn all_mergers() -> Vec<Box<dyn ListMerger>> {
    let mut mergers: Vec<Box<dyn ListMerger>> = vec![
        Box::new(HeapMerger::new()),
        Box::new(SkipMerger::new()),
        Box::new(ScanCountMerger::growable()),
    ];
    let splits = [
        SplitPolicy::ThresholdMinusOne,
        SplitPolicy::LongLists(1),
        SplitPolicy::LongLists(3),
        SplitPolicy::adaptive(),
        SplitPolicy::Adaptive { mu: 0.5 },
    ];
    for split in splits {
        for short_lists in [
            ShortListMode::Skip,
            ShortListMode::Heap,
            ShortListMode::Array,
            ShortListMode::ScanCount,
        ] {
            mergers.push(Box::new(HybridMerger::new(HybridConfig { split, short_lists })));
        }
    }
    mergers
}

fn check_all(lists: &[WeightedList<'_>], threshold: u32) {
    let expected = brute_force(lists, threshold);
    for mut merger in all_mergers() {
        let out = merger.merge(lists, threshold).unwrap();
        assert_eq!(
            out.into_sorted(),
            expected,
            "strategy {} disagrees at T={}",
            merger.name(),
            threshold
        );
    }
}

// ============================================================================
// Generators
// ============================================================================

fn sorted_list(universe: u32, max_len: usize) -> impl Strategy<Value = Vec<RecordId>> {
    prop::collection::btree_set(0..universe, 0..max_len).prop_map(|s| s.into_iter().collect())
}

fn weighted_lists() -> impl Strategy<Value = Vec<(Vec<RecordId>, u32)>> {
    prop::collection::vec((sorted_list(200, 40), 1u32..4), 0..8)
}

/// Skewed workload: most lists short, a few covering much of the universe
fn skewed_lists(rng: &mut StdRng, count: usize, universe: u32) -> Vec<Vec<RecordId>> {
    (0..count)
        .map(|_| {
            let density = if rng.gen_bool(0.25) { 0.6 } else { 0.02 };
            (0..universe).filter(|_| rng.gen_bool(density)).collect()
        })
        .collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_strategies_match_brute_force(
        input in weighted_lists(),
        threshold in 1u32..12,
    ) {
        let lists: Vec<WeightedList<'_>> = input
            .iter()
            .map(|(ids, weight)| WeightedList::new(ids, *weight))
            .collect();
        check_all(&lists, threshold);
    }

    #[test]
    fn test_duplicate_detection_preserves_result(
        base in prop::collection::vec(sorted_list(100, 30), 1..5),
        picks in prop::collection::vec(0usize..5, 1..10),
        threshold in 1u32..6,
    ) {
        let refs: Vec<&[RecordId]> = picks
            .iter()
            .map(|&p| base[p % base.len()].as_slice())
            .collect();
        let weighted = detect_duplicate_lists(&refs);
        let total: u32 = weighted.iter().map(|l| l.weight).sum();
        prop_assert_eq!(total as usize, refs.len());

        let mut heap = HeapMerger::new();
        let expected = heap.merge_unweighted(&refs, threshold).unwrap().ids;
        for mut merger in all_mergers() {
            let got = merger.merge(&weighted, threshold).unwrap().into_sorted();
            prop_assert_eq!(&got, &expected, "{}", merger.name());
        }
    }
}

// ============================================================================
// Seeded workloads
// ============================================================================

#[test]
fn test_seeded_skewed_workloads() {
    let mut rng = StdRng::seed_from_u64(0x6772_616d_6465_7800);
    for _ in 0..20 {
        let count = rng.gen_range(2..12);
        let lists = skewed_lists(&mut rng, count, 1_000);
        let weighted: Vec<WeightedList<'_>> = lists
            .iter()
            .map(|ids| WeightedList::new(ids, rng.gen_range(1..3)))
            .collect();
        let total: u32 = weighted.iter().map(|l| l.weight).sum();
        for threshold in 1..=total + 1 {
            check_all(&weighted, threshold);
        }
    }
}

#[test]
fn test_seeded_scan_count_reuse() {
    // one table reused across many calls must behave like a fresh one
    let mut rng = StdRng::seed_from_u64(7);
    let mut shared = ScanCountMerger::new(1_000);
    for _ in 0..50 {
        let count = rng.gen_range(1..6);
        let lists = skewed_lists(&mut rng, count, 1_000);
        let refs: Vec<&[RecordId]> = lists.iter().map(|l| l.as_slice()).collect();
        let threshold = rng.gen_range(1..=count as u32);
        let expected = ScanCountMerger::new(1_000)
            .merge_unweighted(&refs, threshold)
            .unwrap()
            .into_sorted();
        let got = shared.merge_unweighted(&refs, threshold).unwrap().into_sorted();
        assert_eq!(got, expected);
    }
}
