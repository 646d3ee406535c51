//! T-occurrence merge strategies for gramdex
//!
//! Given sorted inverted lists (one per query gram, possibly weighted) and a
//! threshold T, find every record id whose lists' weights sum to at least T.
//!
//! This crate provides:
//! - ListMerger: the strategy interface
//! - HeapMerger: k-way heap merge, O(N log k)
//! - SkipMerger: heap merge that gallops past ids that cannot reach T
//! - ScanCountMerger: counting table indexed by id, O(N)
//! - HybridMerger: merge short lists, probe long lists
//! - CostModel: query-time estimation for the hybrid strategy
//! - detect_duplicate_lists: fold repeated lists into weights
//! - MergeEngine: configuration-driven facade
//!
//! All strategies return the same id set for the same input; they differ in
//! cost and output order.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cost;
mod cursor;
pub mod duplicates;
pub mod engine;
pub mod heap;
pub mod hybrid;
pub mod merger;
pub mod scan_count;
pub mod skip;

pub use cost::{linear_regression, CostModel, CostSample, LinearFit, QueryFeatures};
pub use cursor::gallop;
pub use duplicates::{detect_duplicate_lists, duplicate_count};
pub use engine::{build_merger, MergeEngine};
pub use heap::HeapMerger;
pub use hybrid::{HybridMerger, ListSplit};
pub use merger::{ListMerger, MergeOutput, MergeStats, ResultOrder};
pub use scan_count::ScanCountMerger;
pub use skip::SkipMerger;

pub use gramdex_core::{
    total_weight, unit_weighted, Error, HybridConfig, MergeConfig, PostingList, RecordId, Result,
    ScanCountConfig, ShortListMode, SplitPolicy, StrategyKind, WeightedList, DEFAULT_MAX_UNIVERSE,
};
