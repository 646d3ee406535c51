//! Hybrid long/short merge
//!
//! This module provides:
//! - HybridMerger: divide the lists into a long set and a short set, merge
//!   the short set, probe the long set for each candidate
//! - ListSplit: the long/short partition for one call
//! - Cost-model calibration over a query workload
//!
//! If the long lists carry total weight L <= T-1, an id reaching T must
//! occur in short lists of weight at least T-L. The short set is merged with
//! threshold T-L, and only the resulting candidates are looked up in the long
//! lists. Long lists are never scanned, which pays off when a few lists hold
//! most of the elements.

use crate::cost::{CostModel, CostSample, QueryFeatures};
use crate::cursor::gallop;
use crate::heap::heap_merge_into;
use crate::merger::{capacity_guard, ListMerger, MergeOutput, MergeStats, ResultOrder, LOG_TARGET};
use crate::skip::skip_merge_into;
use gramdex_core::{
    total_weight, unit_weighted, HybridConfig, RecordId, Result, ShortListMode, SplitPolicy,
    WeightedList,
};
use std::time::Instant;
use tracing::{debug, trace};

/// Widest id range the counting short pass allocates a table for
const MAX_COUNT_RANGE: usize = 1 << 22;

// ============================================================================
// Long/short split
// ============================================================================

/// Long/short partition of the lists of one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSplit {
    /// List indices ordered by ascending length (ties by index)
    pub order: Vec<usize>,
    /// The first `short_count` entries of `order` are short lists
    pub short_count: usize,
    /// Total weight of the long lists, at most T-1
    pub long_weight: u64,
}

impl ListSplit {
    /// Partition `lists` for `threshold` according to `policy`
    ///
    /// The long set is taken from the longest list downward and stops at the
    /// first list that would push the long weight above the policy's target.
    /// The target never exceeds T-1.
    pub fn compute(lists: &[WeightedList<'_>], threshold: u32, policy: &SplitPolicy) -> Self {
        let mut order: Vec<usize> = (0..lists.len()).collect();
        order.sort_by_key(|&i| (lists[i].len(), i));

        let max_weight = u64::from(threshold.saturating_sub(1));
        let longest = order.last().map_or(0, |&i| lists[i].len());
        let (target, max_lists) = match *policy {
            SplitPolicy::ThresholdMinusOne => (max_weight, usize::MAX),
            SplitPolicy::LongLists(n) => (max_weight, n),
            SplitPolicy::Adaptive { mu } => {
                let divisor = mu * (longest.max(1) as f64).log2() + 1.0;
                let target = (f64::from(threshold) / divisor).floor();
                // NaN and negatives saturate to 0 in the cast
                ((target as u64).min(max_weight), usize::MAX)
            }
        };

        let mut long_count = 0;
        let mut long_weight = 0u64;
        for &i in order.iter().rev() {
            if long_count == max_lists {
                break;
            }
            let weight = u64::from(lists[i].weight);
            if long_weight + weight > target {
                break;
            }
            long_weight += weight;
            long_count += 1;
        }

        ListSplit {
            short_count: order.len() - long_count,
            order,
            long_weight,
        }
    }

    /// Number of long lists
    pub fn long_count(&self) -> usize {
        self.order.len() - self.short_count
    }

    /// Indices of the short lists, shortest first
    pub fn short_indices(&self) -> &[usize] {
        &self.order[..self.short_count]
    }

    /// Indices of the long lists, shortest first
    pub fn long_indices(&self) -> &[usize] {
        &self.order[self.short_count..]
    }
}

// ============================================================================
// HybridMerger
// ============================================================================

/// Hybrid long/short strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridMerger {
    config: HybridConfig,
}

impl HybridMerger {
    /// Create a new HybridMerger
    pub fn new(config: HybridConfig) -> Self {
        HybridMerger { config }
    }

    /// Split policy and short-list mode in use
    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    /// Time both phases over a workload and fit a cost model
    ///
    /// Each entry is one query: its lists (unit weight) and threshold.
    /// Queries whose threshold is zero or not below the list count teach the
    /// model nothing and are skipped.
    pub fn calibrate(&mut self, workload: &[(Vec<&[RecordId]>, u32)]) -> Result<CostModel> {
        let mut samples = Vec::with_capacity(workload.len());
        for (lists, threshold) in workload {
            let weighted = unit_weighted(lists);
            let Some(features) = QueryFeatures::compute(&weighted, *threshold, &self.config.split)
            else {
                continue;
            };
            let out = self.merge(&weighted, *threshold)?;
            samples.push(CostSample {
                features,
                short_micros: out.stats.short_phase_nanos as f64 / 1_000.0,
                long_micros: out.stats.probe_phase_nanos as f64 / 1_000.0,
            });
        }

        debug!(
            target: LOG_TARGET,
            queries = workload.len(),
            samples = samples.len(),
            "calibrating hybrid cost model"
        );
        Ok(CostModel::fit(self.config.split, &samples))
    }

    /// Candidates `(id, short weight)` of the short set, ascending by id
    fn short_candidates(
        &self,
        short: &[WeightedList<'_>],
        threshold: u32,
        stats: &mut MergeStats,
    ) -> Vec<(RecordId, u64)> {
        let mut candidates = Vec::new();
        match self.config.short_lists {
            ShortListMode::Skip => {
                skip_merge_into(short, threshold, stats, |id, w| candidates.push((id, w)))
            }
            ShortListMode::Heap => {
                heap_merge_into(short, threshold, stats, |id, w| candidates.push((id, w)))
            }
            ShortListMode::Array => candidates = fold_short_lists(short, threshold, stats),
            ShortListMode::ScanCount => candidates = count_short_lists(short, threshold, stats),
        }
        candidates
    }
}

impl ListMerger for HybridMerger {
    fn merge(&mut self, lists: &[WeightedList<'_>], threshold: u32) -> Result<MergeOutput> {
        let (mut stats, done) = capacity_guard(self.name(), self.result_order(), lists, threshold)?;
        if let Some(out) = done {
            return Ok(out);
        }

        let split = ListSplit::compute(lists, threshold, &self.config.split);
        let short: Vec<WeightedList<'_>> =
            split.short_indices().iter().map(|&i| lists[i]).collect();
        let long: Vec<WeightedList<'_>> = split.long_indices().iter().map(|&i| lists[i]).collect();

        // long_weight <= T-1, so the short threshold is at least 1
        let short_threshold = threshold - split.long_weight as u32;

        let started = Instant::now();
        let candidates = self.short_candidates(&short, short_threshold, &mut stats);
        stats.short_phase_nanos = started.elapsed().as_nanos() as u64;
        stats.candidates = candidates.len();

        let started = Instant::now();
        let ids = probe_long_lists(&long, &candidates, u64::from(threshold), &mut stats);
        stats.probe_phase_nanos = started.elapsed().as_nanos() as u64;

        trace!(
            target: LOG_TARGET,
            long_lists = long.len(),
            long_weight = split.long_weight,
            short_threshold = short_threshold,
            candidates = candidates.len(),
            "hybrid split"
        );
        Ok(MergeOutput::new(ids, ResultOrder::Ascending, stats))
    }

    fn name(&self) -> &str {
        "hybrid"
    }

    fn result_order(&self) -> ResultOrder {
        ResultOrder::Ascending
    }
}

/// Look up ascending candidates in the long lists
///
/// Each long list keeps a pointer that only moves forward. A candidate stops
/// probing once the long weight still unseen cannot lift it to `threshold`.
fn probe_long_lists(
    long: &[WeightedList<'_>],
    candidates: &[(RecordId, u64)],
    threshold: u64,
    stats: &mut MergeStats,
) -> Vec<RecordId> {
    let mut pointers = vec![0usize; long.len()];
    // weight of the long lists after position j
    let mut remaining_after = vec![0u64; long.len()];
    let mut suffix = 0u64;
    for (j, list) in long.iter().enumerate().rev() {
        remaining_after[j] = suffix;
        suffix += u64::from(list.weight);
    }

    let mut ids = Vec::new();
    for &(id, short_weight) in candidates {
        if short_weight >= threshold {
            ids.push(id);
            continue;
        }

        let mut weight = short_weight;
        for (j, list) in long.iter().enumerate() {
            stats.probes += 1;
            let pos = gallop(list.ids, pointers[j], u64::from(id));
            pointers[j] = pos;
            if list.ids.get(pos) == Some(&id) {
                weight += u64::from(list.weight);
                if weight >= threshold {
                    ids.push(id);
                    break;
                }
            } else if weight + remaining_after[j] < threshold {
                break;
            }
        }
    }
    ids
}

/// Fold the short lists pairwise into a sorted `(id, weight)` array
///
/// After each list, entries that cannot reach `threshold` even with every
/// remaining list are dropped, so the final array holds exactly the ids of
/// weight >= `threshold`.
fn fold_short_lists(
    short: &[WeightedList<'_>],
    threshold: u32,
    stats: &mut MergeStats,
) -> Vec<(RecordId, u64)> {
    let threshold = u64::from(threshold);
    let mut remaining = total_weight(short);
    let mut acc: Vec<(RecordId, u64)> = Vec::new();
    let mut next: Vec<(RecordId, u64)> = Vec::new();

    for list in short {
        let weight = u64::from(list.weight);
        remaining -= weight;
        stats.elements_visited += (acc.len() + list.len()) as u64;

        next.clear();
        next.reserve(acc.len() + list.len());
        let keep = |entry: (RecordId, u64), out: &mut Vec<(RecordId, u64)>| {
            if entry.1 + remaining >= threshold {
                out.push(entry);
            }
        };

        let (mut i, mut j) = (0, 0);
        while i < acc.len() && j < list.ids.len() {
            let (id, w) = acc[i];
            let other = list.ids[j];
            if id < other {
                keep((id, w), &mut next);
                i += 1;
            } else if other < id {
                keep((other, weight), &mut next);
                j += 1;
            } else {
                keep((id, w + weight), &mut next);
                i += 1;
                j += 1;
            }
        }
        for &entry in &acc[i..] {
            keep(entry, &mut next);
        }
        for &other in &list.ids[j..] {
            keep((other, weight), &mut next);
        }

        std::mem::swap(&mut acc, &mut next);
    }

    acc
}

/// Count the short lists into a table spanning their smallest to largest id
///
/// Returns ascending `(id, weight)` pairs of weight >= `threshold`. A range
/// wider than `MAX_COUNT_RANGE`, or one the allocator refuses, is merged
/// with the skip merge instead.
fn count_short_lists(
    short: &[WeightedList<'_>],
    threshold: u32,
    stats: &mut MergeStats,
) -> Vec<(RecordId, u64)> {
    let min = short.iter().filter_map(|l| l.ids.first().copied()).min();
    let max = short.iter().filter_map(|l| l.ids.last().copied()).max();
    let (Some(min), Some(max)) = (min, max) else {
        return Vec::new();
    };

    let range = ((max - min) as usize).saturating_add(1);
    let mut counts: Vec<u64> = Vec::new();
    if range > MAX_COUNT_RANGE || counts.try_reserve_exact(range).is_err() {
        trace!(target: LOG_TARGET, range, "short id range too wide to count");
        let mut candidates = Vec::new();
        skip_merge_into(short, threshold, stats, |id, w| candidates.push((id, w)));
        return candidates;
    }
    counts.resize(range, 0);

    for list in short {
        let weight = u64::from(list.weight);
        for &id in list.ids {
            counts[(id - min) as usize] += weight;
        }
        stats.elements_visited += list.ids.len() as u64;
    }

    let threshold = u64::from(threshold);
    counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count >= threshold)
        .map(|(offset, &count)| (min + offset as u32, count))
        .collect()
}
