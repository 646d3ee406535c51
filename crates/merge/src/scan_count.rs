//! Scan-count merge
//!
//! Scan every list once and count occurrences in a table indexed by record
//! id. O(N) time independent of k and T, O(universe) memory, no useful
//! output order.
//!
//! # Table reuse
//!
//! The counting table is not cleared between calls. Each call bumps a
//! generation number and every slot carries the generation that last wrote
//! it; a slot stamped with an older generation counts as zero. The tables
//! belong to one `ScanCountMerger` and `merge` takes `&mut self`, so two
//! calls can never share them. Use one instance per worker thread.
//!
//! # Growth limit
//!
//! A growable table never grows past its `max_universe`. A call carrying a
//! larger id, or one whose growth the allocator refuses, fails with
//! `Error::IdentifierOutOfRange` and leaves the table as it was.

use crate::merger::{capacity_guard, ListMerger, MergeOutput, ResultOrder, LOG_TARGET};
use gramdex_core::{Error, RecordId, Result, WeightedList, DEFAULT_MAX_UNIVERSE};
use tracing::warn;

/// Scan-count strategy
#[derive(Debug, Clone)]
pub struct ScanCountMerger {
    counts: Vec<u32>,
    stamps: Vec<u32>,
    generation: u32,
    growable: bool,
    max_universe: usize,
}

impl ScanCountMerger {
    /// Counting table for ids in `0..universe`
    ///
    /// Ids at or beyond `universe` make `merge` fail with
    /// `Error::IdentifierOutOfRange`.
    pub fn new(universe: usize) -> Self {
        ScanCountMerger {
            counts: vec![0; universe],
            stamps: vec![0; universe],
            generation: 0,
            growable: false,
            max_universe: universe,
        }
    }

    /// Counting table that grows to fit the largest id of each call, up to
    /// `DEFAULT_MAX_UNIVERSE` ids
    pub fn growable() -> Self {
        Self::growable_with_limit(DEFAULT_MAX_UNIVERSE)
    }

    /// Counting table that grows on demand but never past `max_universe` ids
    pub fn growable_with_limit(max_universe: usize) -> Self {
        ScanCountMerger {
            counts: Vec::new(),
            stamps: Vec::new(),
            generation: 0,
            growable: true,
            max_universe,
        }
    }

    /// Number of ids the table currently covers
    pub fn universe(&self) -> usize {
        self.counts.len()
    }

    /// Whether the table grows on demand
    pub fn is_growable(&self) -> bool {
        self.growable
    }

    /// Largest number of ids the table may ever cover
    pub fn max_universe(&self) -> usize {
        self.max_universe
    }

    #[cfg(test)]
    fn set_generation(&mut self, generation: u32) {
        self.generation = generation;
    }

    /// Make sure every id of the call fits in the table
    ///
    /// Lists are ascending, so each list's last element is its largest.
    fn reserve_for(&mut self, lists: &[WeightedList<'_>]) -> Result<()> {
        let Some(max_id) = lists.iter().filter_map(|l| l.ids.last().copied()).max() else {
            return Ok(());
        };
        let needed = (max_id as usize).saturating_add(1);
        let current = self.counts.len();
        if needed <= current {
            return Ok(());
        }

        let limit = if self.growable { self.max_universe } else { current };
        if needed > limit {
            warn!(
                target: LOG_TARGET,
                id = max_id,
                universe = limit,
                growable = self.growable,
                "record id outside scan-count table"
            );
            return Err(Error::IdentifierOutOfRange {
                id: max_id,
                universe: limit,
            });
        }

        let additional = needed - current;
        if self.counts.try_reserve_exact(additional).is_err()
            || self.stamps.try_reserve_exact(additional).is_err()
        {
            warn!(
                target: LOG_TARGET,
                id = max_id,
                needed,
                "scan-count table allocation failed"
            );
            return Err(Error::IdentifierOutOfRange {
                id: max_id,
                universe: current,
            });
        }
        self.counts.resize(needed, 0);
        self.stamps.resize(needed, 0);
        Ok(())
    }

    /// Start a new generation, clearing stamps when the counter wraps
    fn next_generation(&mut self) -> u32 {
        if self.generation == u32::MAX {
            warn!(
                target: LOG_TARGET,
                universe = self.stamps.len(),
                "scan-count generation wrapped, clearing stamps"
            );
            self.stamps.fill(0);
            self.generation = 0;
        }
        self.generation += 1;
        self.generation
    }
}

impl ListMerger for ScanCountMerger {
    fn merge(&mut self, lists: &[WeightedList<'_>], threshold: u32) -> Result<MergeOutput> {
        let (mut stats, done) = capacity_guard(self.name(), self.result_order(), lists, threshold)?;
        if let Some(out) = done {
            return Ok(out);
        }

        self.reserve_for(lists)?;
        let generation = self.next_generation();
        let universe = self.counts.len();
        let mut ids: Vec<RecordId> = Vec::new();

        for list in lists {
            let weight = list.weight;
            for &id in list.ids {
                let slot = id as usize;
                // only reachable with unsorted input
                if slot >= universe {
                    return Err(Error::IdentifierOutOfRange { id, universe });
                }
                let before = if self.stamps[slot] == generation {
                    self.counts[slot]
                } else {
                    self.stamps[slot] = generation;
                    0
                };
                let after = before.saturating_add(weight);
                self.counts[slot] = after;
                if before < threshold && after >= threshold {
                    ids.push(id);
                }
            }
            stats.elements_visited += list.ids.len() as u64;
        }

        Ok(MergeOutput::new(ids, ResultOrder::Unordered, stats))
    }

    fn name(&self) -> &str {
        "scan_count"
    }

    fn result_order(&self) -> ResultOrder {
        ResultOrder::Unordered
    }
}
