//! Core types for gramdex
//!
//! This crate defines the foundational types shared by the merge engine:
//! - RecordId, PostingList, WeightedList: the sorted inverted lists a query
//!   hands to the engine
//! - Error: error type hierarchy
//! - MergeConfig: strategy selection and tuning, loadable from TOML
//! - validate: explicit precondition checks for merge calls

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod types;
pub mod validate;

pub use config::{
    HybridConfig, MergeConfig, ScanCountConfig, ShortListMode, SplitPolicy, StrategyKind,
    DEFAULT_MAX_UNIVERSE, DEFAULT_MU,
};
pub use error::{Error, Result};
pub use types::{
    first_unsorted_position, is_strictly_sorted, total_weight, unit_weighted, PostingList,
    RecordId, WeightedList,
};
pub use validate::{validate_lists, validate_merge_input, validate_threshold};
