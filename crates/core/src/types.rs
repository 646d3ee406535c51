//! Core list types for the merge engine
//!
//! This module provides:
//! - RecordId: identifier of one indexed string
//! - PostingList: owned, strictly ascending list of record ids
//! - WeightedList: borrowed list paired with the number of query grams
//!   that resolved to it
//!
//! Lists are always strictly ascending. The merge engine only ever borrows
//! them and never writes to them.

use crate::error::{Error, Result};

/// Identifier of an indexed record (string)
pub type RecordId = u32;

// ============================================================================
// PostingList
// ============================================================================

/// Owned inverted list for one gram
///
/// Invariant: `ids[i] < ids[i + 1]` for every adjacent pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    ids: Vec<RecordId>,
}

impl PostingList {
    /// Create a new empty posting list
    pub fn new() -> Self {
        PostingList { ids: Vec::new() }
    }

    /// Wrap a vector that is already strictly ascending
    ///
    /// Returns `Error::UnsortedList` (with list index 0) pointing at the
    /// first element that breaks the order.
    pub fn from_sorted(ids: Vec<RecordId>) -> Result<Self> {
        if let Some(position) = first_unsorted_position(&ids) {
            return Err(Error::UnsortedList { list: 0, position });
        }
        Ok(PostingList { ids })
    }

    /// Build a posting list from ids in any order, dropping duplicates
    pub fn from_unsorted<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = RecordId>,
    {
        let mut ids: Vec<RecordId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        PostingList { ids }
    }

    /// Append an id larger than every id already present
    pub fn push(&mut self, id: RecordId) -> Result<()> {
        if let Some(&last) = self.ids.last() {
            if id <= last {
                return Err(Error::UnsortedList {
                    list: 0,
                    position: self.ids.len(),
                });
            }
        }
        self.ids.push(id);
        Ok(())
    }

    /// Borrow the ids as a slice
    pub fn as_slice(&self) -> &[RecordId] {
        &self.ids
    }

    /// Number of records containing this gram
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if posting list is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Largest id in the list
    pub fn last(&self) -> Option<RecordId> {
        self.ids.last().copied()
    }

    /// Membership test by binary search
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Iterate over the ids in ascending order
    pub fn iter(&self) -> std::slice::Iter<'_, RecordId> {
        self.ids.iter()
    }

    /// Consume the list and return the underlying vector
    pub fn into_vec(self) -> Vec<RecordId> {
        self.ids
    }
}

impl AsRef<[RecordId]> for PostingList {
    fn as_ref(&self) -> &[RecordId] {
        &self.ids
    }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = &'a RecordId;
    type IntoIter = std::slice::Iter<'a, RecordId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// Position of the first element that is not greater than its predecessor
pub fn first_unsorted_position(ids: &[RecordId]) -> Option<usize> {
    ids.windows(2).position(|w| w[0] >= w[1]).map(|i| i + 1)
}

/// Check the strictly-ascending invariant
pub fn is_strictly_sorted(ids: &[RecordId]) -> bool {
    first_unsorted_position(ids).is_none()
}

// ============================================================================
// WeightedList
// ============================================================================

/// A borrowed list with the number of times it counts toward an id's total
///
/// The weight is the number of query grams that resolved to this physical
/// list. A list of weight `w` containing an id adds `w` to its occurrence
/// count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedList<'a> {
    /// Strictly ascending record ids
    pub ids: &'a [RecordId],
    /// Occurrence weight, at least 1
    pub weight: u32,
}

impl<'a> WeightedList<'a> {
    /// Pair a list with an explicit weight
    pub fn new(ids: &'a [RecordId], weight: u32) -> Self {
        WeightedList { ids, weight }
    }

    /// A list that counts once
    pub fn unit(ids: &'a [RecordId]) -> Self {
        WeightedList { ids, weight: 1 }
    }

    /// Number of ids in the underlying list
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the underlying list is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<'a> From<&'a PostingList> for WeightedList<'a> {
    fn from(list: &'a PostingList) -> Self {
        WeightedList::unit(list.as_slice())
    }
}

/// Sum of all list weights, the largest count any id can reach
pub fn total_weight(lists: &[WeightedList<'_>]) -> u64 {
    lists.iter().map(|l| u64::from(l.weight)).sum()
}

/// Wrap plain lists as unit-weight lists, one entry per input position
pub fn unit_weighted<'a>(lists: &[&'a [RecordId]]) -> Vec<WeightedList<'a>> {
    lists.iter().map(|&ids| WeightedList::unit(ids)).collect()
}
