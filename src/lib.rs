//! gramdex - threshold merging of gram inverted lists
//!
//! Approximate string search breaks a query into grams, looks up one sorted
//! inverted list per gram, and asks which records occur in at least T of
//! them. gramdex answers that question with interchangeable strategies.
//!
//! # Quick Start
//!
//! ```
//! use gramdex::{MergeConfig, MergeEngine};
//!
//! let mut engine = MergeEngine::new(MergeConfig::default())?;
//!
//! let a = [1, 5, 8];
//! let b = [8, 10, 13, 15];
//! let c = [3, 4, 5];
//! let out = engine.merge(&[&a, &b, &c, &b], 2)?;
//! assert_eq!(out.ids, vec![5, 8, 10, 13, 15]);
//! # Ok::<(), gramdex::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `gramdex-core`: ids, lists, errors, configuration, validation
//! - `gramdex-merge`: the strategies, cost model and `MergeEngine`

pub use gramdex_core::{
    first_unsorted_position, is_strictly_sorted, validate_lists, validate_merge_input,
    validate_threshold, DEFAULT_MU,
};
pub use gramdex_merge::*;
