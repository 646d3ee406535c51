//! List cursors and galloping search
//!
//! A cursor is a position into one borrowed list. Cursors live in an arena
//! (`positions`, indexed by list) and the heap only stores `(key, list)`
//! pairs, so no reference into a list is ever held across heap operations.
//!
//! A cursor past the end of its list has key `EXHAUSTED`, which compares
//! greater than every `u32` id. Lists are never extended with a terminator.

use gramdex_core::{RecordId, WeightedList};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Key of a cursor that ran off the end of its list
pub(crate) const EXHAUSTED: u64 = u64::MAX;

/// Heap key of the element at `pos`, `EXHAUSTED` past the end
#[inline]
pub(crate) fn key_at(ids: &[RecordId], pos: usize) -> u64 {
    ids.get(pos).map_or(EXHAUSTED, |&id| u64::from(id))
}

/// First position at or after `from` whose id is >= `target`
///
/// Exponential probe from `from` (steps 1, 2, 4, ...) until an element
/// >= `target` is passed, then binary search inside the last bracket. Costs
/// O(log d) where d is the distance moved, so short hops stay cheap on long
/// lists.
pub fn gallop(ids: &[RecordId], from: usize, target: u64) -> usize {
    let len = ids.len();
    if from >= len || target == EXHAUSTED {
        return len;
    }
    if u64::from(ids[from]) >= target {
        return from;
    }

    // ids[lo] < target holds throughout
    let mut lo = from;
    let mut step = 1usize;
    let hi = loop {
        let probe = from.saturating_add(step);
        if probe >= len {
            break len;
        }
        if u64::from(ids[probe]) >= target {
            break probe;
        }
        lo = probe;
        step <<= 1;
    };

    lo + 1 + ids[lo + 1..hi].partition_point(|&id| u64::from(id) < target)
}

// ============================================================================
// CursorHeap
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    key: u64,
    list: usize,
}

/// Min-heap of list cursors ordered by the id each cursor points at
pub(crate) struct CursorHeap<'l, 'a> {
    lists: &'l [WeightedList<'a>],
    positions: Vec<usize>,
    heap: BinaryHeap<Reverse<HeapEntry>>,
    pub(crate) elements_visited: u64,
    pub(crate) heap_pops: u64,
    pub(crate) probes: u64,
}

impl<'l, 'a> CursorHeap<'l, 'a> {
    /// One cursor per list, each at position 0
    pub(crate) fn new(lists: &'l [WeightedList<'a>]) -> Self {
        let mut cursors = CursorHeap {
            lists,
            positions: vec![0; lists.len()],
            heap: BinaryHeap::with_capacity(lists.len()),
            elements_visited: 0,
            heap_pops: 0,
            probes: 0,
        };
        for list in 0..lists.len() {
            cursors.push(list);
        }
        cursors
    }

    /// Smallest key in the heap, `EXHAUSTED` when every cursor is done
    #[inline]
    pub(crate) fn peek_key(&self) -> u64 {
        self.heap.peek().map_or(EXHAUSTED, |Reverse(e)| e.key)
    }

    /// List whose cursor holds the smallest key
    #[inline]
    pub(crate) fn peek_list(&self) -> Option<usize> {
        self.heap.peek().map(|Reverse(e)| e.list)
    }

    /// Remove the cursor with the smallest key and return its list
    #[inline]
    pub(crate) fn pop(&mut self) -> Option<usize> {
        let Reverse(entry) = self.heap.pop()?;
        self.heap_pops += 1;
        Some(entry.list)
    }

    /// Weight of a list
    #[inline]
    pub(crate) fn weight(&self, list: usize) -> u64 {
        u64::from(self.lists[list].weight)
    }

    /// Move a popped cursor one element forward and reinsert it
    #[inline]
    pub(crate) fn advance(&mut self, list: usize) {
        self.positions[list] += 1;
        self.push(list);
    }

    /// Gallop a popped cursor to the first id >= `target` and reinsert it
    #[inline]
    pub(crate) fn seek(&mut self, list: usize, target: u64) {
        let ids = self.lists[list].ids;
        self.probes += 1;
        self.positions[list] = gallop(ids, self.positions[list], target);
        self.push(list);
    }

    fn push(&mut self, list: usize) {
        let key = key_at(self.lists[list].ids, self.positions[list]);
        if key != EXHAUSTED {
            self.elements_visited += 1;
        }
        self.heap.push(Reverse(HeapEntry { key, list }));
    }
}
