//! Merge strategy interface
//!
//! This module provides:
//! - ListMerger trait implemented by every merge algorithm
//! - MergeOutput: ids reaching the threshold plus call statistics
//! - MergeStats: per-call instrumentation
//! - ResultOrder: ordering guarantee of a strategy's output
//!
//! Every strategy answers the same question: which ids occur in lists whose
//! weights sum to at least T. Strategies differ only in cost and in output
//! order.

use gramdex_core::{
    is_strictly_sorted, total_weight, unit_weighted, Error, RecordId, Result, WeightedList,
};
use tracing::trace;

/// Tracing target shared by all strategies
pub(crate) const LOG_TARGET: &str = "gramdex::merge";

// ============================================================================
// ResultOrder
// ============================================================================

/// Ordering guarantee of a merge result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultOrder {
    /// Ids are strictly ascending
    Ascending,
    /// No ordering guarantee
    Unordered,
}

// ============================================================================
// MergeStats
// ============================================================================

/// Execution statistics for one merge call
///
/// Counters are exact, phase timings are only filled by the hybrid strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Number of (weighted) lists handed to the strategy
    pub lists: usize,
    /// Sum of list weights
    pub total_weight: u64,
    /// Threshold of the call
    pub threshold: u32,
    /// List elements read by scans, cursor advances and array folds
    pub elements_visited: u64,
    /// Galloping / binary searches performed
    pub probes: u64,
    /// Cursors popped from the merge heap
    pub heap_pops: u64,
    /// Candidates produced by a short-list pass
    pub candidates: usize,
    /// Ids in the result
    pub results: usize,
    /// The capacity guard answered without reading any list
    pub early_exit: bool,
    /// Time spent merging short lists (hybrid only)
    pub short_phase_nanos: u64,
    /// Time spent probing long lists (hybrid only)
    pub probe_phase_nanos: u64,
}

impl MergeStats {
    /// Stats for a call that has not run yet
    pub fn for_call(lists: &[WeightedList<'_>], threshold: u32) -> Self {
        MergeStats {
            lists: lists.len(),
            total_weight: total_weight(lists),
            threshold,
            ..MergeStats::default()
        }
    }
}

// ============================================================================
// MergeOutput
// ============================================================================

/// Result of one merge call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutput {
    /// Ids whose weighted occurrence count reaches the threshold, each once
    pub ids: Vec<RecordId>,
    /// Ordering guarantee of `ids`
    pub order: ResultOrder,
    /// Call statistics
    pub stats: MergeStats,
}

impl MergeOutput {
    /// Create a new MergeOutput, recording the result count in `stats`
    pub fn new(ids: Vec<RecordId>, order: ResultOrder, mut stats: MergeStats) -> Self {
        stats.results = ids.len();
        MergeOutput { ids, order, stats }
    }

    /// Empty result produced by the capacity guard
    pub fn early_exit(order: ResultOrder, mut stats: MergeStats) -> Self {
        stats.early_exit = true;
        MergeOutput::new(Vec::new(), order, stats)
    }

    /// Number of ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if no id reached the threshold
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in ascending order regardless of the strategy
    pub fn into_sorted(self) -> Vec<RecordId> {
        let mut ids = self.ids;
        if self.order == ResultOrder::Unordered {
            ids.sort_unstable();
        }
        ids
    }
}

// ============================================================================
// ListMerger Trait
// ============================================================================

/// Pluggable T-occurrence merge algorithm
///
/// Implementations never modify the lists they are given. A strategy that
/// keeps working tables between calls (scan-count) relies on the `&mut self`
/// receiver for one-call-at-a-time use; stateless strategies are cheap to
/// clone per worker thread.
pub trait ListMerger: Send {
    /// Find every id whose summed list weight reaches `threshold`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidThreshold` for a zero threshold. Strategies
    /// with a resource bound report ids outside it.
    fn merge(&mut self, lists: &[WeightedList<'_>], threshold: u32) -> Result<MergeOutput>;

    /// Name for debugging and logging
    fn name(&self) -> &str;

    /// Ordering guarantee of `merge` results
    fn result_order(&self) -> ResultOrder;

    /// Merge lists that each count once
    ///
    /// Repeated lists are NOT collapsed, each position counts separately.
    fn merge_unweighted(&mut self, lists: &[&[RecordId]], threshold: u32) -> Result<MergeOutput> {
        let weighted = unit_weighted(lists);
        self.merge(&weighted, threshold)
    }
}

/// Shared prologue of every strategy
///
/// Rejects a zero threshold and answers `Some(empty output)` when the
/// threshold exceeds the total weight, without reading list contents.
pub(crate) fn capacity_guard(
    name: &str,
    order: ResultOrder,
    lists: &[WeightedList<'_>],
    threshold: u32,
) -> Result<(MergeStats, Option<MergeOutput>)> {
    if threshold == 0 {
        return Err(Error::InvalidThreshold);
    }
    debug_assert!(
        lists.iter().all(|l| l.weight > 0 && is_strictly_sorted(l.ids)),
        "merge input lists must be strictly ascending with non-zero weights"
    );

    let stats = MergeStats::for_call(lists, threshold);
    if u64::from(threshold) > stats.total_weight {
        trace!(
            target: LOG_TARGET,
            strategy = name,
            threshold = threshold,
            total_weight = stats.total_weight,
            "threshold exceeds total list weight"
        );
        return Ok((stats.clone(), Some(MergeOutput::early_exit(order, stats))));
    }
    Ok((stats, None))
}
