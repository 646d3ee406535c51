//! Heap merge
//!
//! k-way merge of all lists through a min-heap of cursors. Every element of
//! every list passes through the heap exactly once: O(N log k) for N total
//! elements over k lists. Results come out in ascending id order.

use crate::cursor::{CursorHeap, EXHAUSTED};
use crate::merger::{capacity_guard, ListMerger, MergeOutput, MergeStats, ResultOrder};
use gramdex_core::{RecordId, Result, WeightedList};
use smallvec::SmallVec;

/// Heap-merge strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapMerger;

impl HeapMerger {
    /// Create a new HeapMerger
    pub fn new() -> Self {
        HeapMerger
    }
}

impl ListMerger for HeapMerger {
    fn merge(&mut self, lists: &[WeightedList<'_>], threshold: u32) -> Result<MergeOutput> {
        let (mut stats, done) = capacity_guard(self.name(), self.result_order(), lists, threshold)?;
        if let Some(out) = done {
            return Ok(out);
        }

        let mut ids = Vec::new();
        heap_merge_into(lists, threshold, &mut stats, |id, _| ids.push(id));
        Ok(MergeOutput::new(ids, ResultOrder::Ascending, stats))
    }

    fn name(&self) -> &str {
        "heap"
    }

    fn result_order(&self) -> ResultOrder {
        ResultOrder::Ascending
    }
}

/// Heap-merge `lists`, calling `emit(id, weight)` for each id whose weight
/// reaches `threshold`, in ascending id order
pub(crate) fn heap_merge_into<F>(
    lists: &[WeightedList<'_>],
    threshold: u32,
    stats: &mut MergeStats,
    mut emit: F,
) where
    F: FnMut(RecordId, u64),
{
    let threshold = u64::from(threshold);
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
            // current < EXHAUSTED, so it is a valid u32 id
            emit(current as RecordId, weight);
        }

        for &list in &popped {
            heap.advance(list);
        }
    }

    stats.elements_visited += heap.elements_visited;
    stats.heap_pops += heap.heap_pops;
}
