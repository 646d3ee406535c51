//! Skip merge
//!
//! Heap merge that exploits the threshold. When the id at the top of the
//! heap cannot reach T, cursors are popped until their combined weight is
//! T-1, and every popped cursor gallops straight to the new heap minimum.
//!
//! Skipping is safe: an id smaller than the new minimum can only occur in
//! the popped lists, and their weight is below T. The more lists must agree
//! (large T relative to k), the further cursors jump.

use crate::cursor::{CursorHeap, EXHAUSTED};
use crate::merger::{capacity_guard, ListMerger, MergeOutput, MergeStats, ResultOrder};
use gramdex_core::{RecordId, Result, WeightedList};
use smallvec::SmallVec;

/// Skip-merge strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipMerger;

impl SkipMerger {
    /// Create a new SkipMerger
    pub fn new() -> Self {
        SkipMerger
    }
}

impl ListMerger for SkipMerger {
    fn merge(&mut self, lists: &[WeightedList<'_>], threshold: u32) -> Result<MergeOutput> {
        let (mut stats, done) = capacity_guard(self.name(), self.result_order(), lists, threshold)?;
        if let Some(out) = done {
            return Ok(out);
        }

        let mut ids = Vec::new();
        skip_merge_into(lists, threshold, &mut stats, |id, _| ids.push(id));
        Ok(MergeOutput::new(ids, ResultOrder::Ascending, stats))
    }

    fn name(&self) -> &str {
        "skip"
    }

    fn result_order(&self) -> ResultOrder {
        ResultOrder::Ascending
    }
}

/// Skip-merge `lists`, calling `emit(id, weight)` for each id whose weight
/// reaches `threshold`, in ascending id order
///
/// `threshold` must be at least 1.
pub(crate) fn skip_merge_into<F>(
    lists: &[WeightedList<'_>],
    threshold: u32,
    stats: &mut MergeStats,
    mut emit: F,
) where
    F: FnMut(RecordId, u64),
{
    debug_assert!(threshold > 0);
    let threshold = u64::from(threshold);
    let pivot = threshold - 1;
    let mut heap = CursorHeap::new(lists);
    let mut popped: SmallVec<[usize; 16]> = SmallVec::new();

    loop {
        let current = heap.peek_key();
        if current == EXHAUSTED {
            break;
        }

        popped.clear();
        let mut weight = 0u64;
        while heap.peek_key() == current {
            let Some(list) = heap.pop() else { break };
            weight += heap.weight(list);
            popped.push(list);
        }

        if weight >= threshold {
            emit(current as RecordId, weight);
            for &list in &popped {
                heap.advance(list);
            }
            continue;
        }

        // Pop further cursors while their weight keeps the popped total at
        // or below T-1. A list heavier than the remaining room stays put.
        while weight < pivot {
            let Some(next) = heap.peek_list() else { break };
            let next_weight = heap.weight(next);
            if weight + next_weight > pivot {
                break;
            }
            heap.pop();
            weight += next_weight;
            popped.push(next);
        }

        let target = heap.peek_key();
        for &list in &popped {
            heap.seek(list, target);
        }
    }

    stats.elements_visited += heap.elements_visited;
    stats.heap_pops += heap.heap_pops;
    stats.probes += heap.probes;
}
