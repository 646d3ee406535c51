//! Duplicate-list detection
//!
//! Several grams of one query can resolve to the same physical inverted list
//! (a gram that occurs twice in the query, or grams sharing a list after
//! index compression). Merging that list once with weight `k` is equivalent
//! to merging it `k` times and is cheaper for every strategy.

use gramdex_core::{RecordId, WeightedList};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// Collapse repeated physical lists into weighted lists
///
/// Lists are matched by identity (same data pointer and length), not by
/// content. The output keeps first-occurrence order and the weights sum to
/// `lists.len()`.
pub fn detect_duplicate_lists<'a>(lists: &[&'a [RecordId]]) -> Vec<WeightedList<'a>> {
    let mut slots: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    let mut weighted: Vec<WeightedList<'a>> = Vec::with_capacity(lists.len());

    for &ids in lists {
        match slots.entry((ids.as_ptr() as usize, ids.len())) {
            Entry::Occupied(slot) => weighted[*slot.get()].weight += 1,
            Entry::Vacant(slot) => {
                slot.insert(weighted.len());
                weighted.push(WeightedList::unit(ids));
            }
        }
    }

    weighted
}

/// Number of list references that were folded into another list
pub fn duplicate_count(lists: &[&[RecordId]], weighted: &[WeightedList<'_>]) -> usize {
    lists.len().saturating_sub(weighted.len())
}
