//! Merge engine facade
//!
//! `MergeEngine` owns one strategy, chosen from a `MergeConfig` at
//! construction, and runs the optional pre-merge steps around it:
//! duplicate-list detection and input validation.

use crate::duplicates::detect_duplicate_lists;
use crate::heap::HeapMerger;
use crate::hybrid::HybridMerger;
use crate::merger::{ListMerger, MergeOutput, LOG_TARGET};
use crate::scan_count::ScanCountMerger;
use crate::skip::SkipMerger;
use gramdex_core::{
    unit_weighted, validate_merge_input, MergeConfig, RecordId, Result, StrategyKind,
    WeightedList,
};
use std::time::Instant;
use tracing::debug;

/// Build the strategy a configuration selects
///
/// The configuration is not validated here; see `MergeConfig::validate`.
pub fn build_merger(config: &MergeConfig) -> Box<dyn ListMerger> {
    match config.strategy {
        StrategyKind::Heap => Box::new(HeapMerger::new()),
        StrategyKind::Skip => Box::new(SkipMerger::new()),
        StrategyKind::ScanCount => match config.scan_count.universe {
            Some(universe) => Box::new(ScanCountMerger::new(universe)),
            None => Box::new(ScanCountMerger::growable_with_limit(
                config.scan_count.max_universe,
            )),
        },
        StrategyKind::Hybrid => Box::new(HybridMerger::new(config.hybrid)),
    }
}

/// T-occurrence merge engine
///
/// # Example
///
/// ```
/// use gramdex_merge::{MergeConfig, MergeEngine, StrategyKind};
///
/// let mut engine = MergeEngine::new(MergeConfig::for_strategy(StrategyKind::Skip))?;
/// let a = [1, 5, 8];
/// let b = [8, 10, 13, 15];
/// let c = [3, 4, 5];
/// let out = engine.merge(&[&a, &b, &c, &b], 2)?;
/// assert_eq!(out.ids, vec![5, 8, 10, 13, 15]);
/// # Ok::<(), gramdex_merge::Error>(())
/// ```
pub struct MergeEngine {
    config: MergeConfig,
    merger: Box<dyn ListMerger>,
}

impl MergeEngine {
    /// Validate `config` and build its strategy
    pub fn new(config: MergeConfig) -> Result<Self> {
        config.validate()?;
        let merger = build_merger(&config);
        Ok(MergeEngine { config, merger })
    }

    /// Engine around a custom strategy
    ///
    /// `config.strategy` is ignored; the other settings still apply.
    pub fn with_merger(config: MergeConfig, merger: Box<dyn ListMerger>) -> Result<Self> {
        config.validate()?;
        Ok(MergeEngine { config, merger })
    }

    /// Merge unweighted lists
    ///
    /// With `detect_duplicates` set, repeated physical lists are collapsed
    /// into one weighted list first. The result is the same either way.
    pub fn merge(&mut self, lists: &[&[RecordId]], threshold: u32) -> Result<MergeOutput> {
        let weighted = if self.config.detect_duplicates {
            detect_duplicate_lists(lists)
        } else {
            unit_weighted(lists)
        };
        self.merge_weighted(&weighted, threshold)
    }

    /// Merge weighted lists
    pub fn merge_weighted(
        &mut self,
        lists: &[WeightedList<'_>],
        threshold: u32,
    ) -> Result<MergeOutput> {
        if self.config.verify_inputs {
            validate_merge_input(lists, threshold)?;
        }

        let started = Instant::now();
        let out = self.merger.merge(lists, threshold)?;
        debug!(
            target: LOG_TARGET,
            strategy = self.merger.name(),
            lists = lists.len(),
            threshold = threshold,
            results = out.len(),
            micros = started.elapsed().as_micros() as u64,
            "merge"
        );
        Ok(out)
    }

    /// Name of the active strategy
    pub fn strategy_name(&self) -> &str {
        self.merger.name()
    }

    /// Engine configuration
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }
}

impl std::fmt::Debug for MergeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeEngine")
            .field("strategy", &self.merger.name())
            .field("config", &self.config)
            .finish()
    }
}
