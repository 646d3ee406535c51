//! Error types for gramdex
//!
//! This module defines all error types used by the merge engine and its
//! configuration layer. We use `thiserror` for automatic `Display` and
//! `Error` trait implementations.
//!
//! An empty merge result is NOT an error: a threshold larger than the total
//! list weight simply yields no candidates.

use crate::types::RecordId;
use std::io;
use thiserror::Error;

/// Result type alias for gramdex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the merge engine
#[derive(Debug, Error)]
pub enum Error {
    /// Merge threshold was zero
    #[error("Invalid threshold: merge threshold must be at least 1")]
    InvalidThreshold,

    /// A list is not strictly ascending
    #[error("Unsorted list {list}: element at position {position} is not greater than its predecessor")]
    UnsortedList {
        /// Index of the offending list in the caller's input
        list: usize,
        /// Position of the first out-of-order element
        position: usize,
    },

    /// A weighted list carries weight zero
    #[error("Zero weight on list {list}")]
    ZeroWeight {
        /// Index of the offending list in the caller's input
        list: usize,
    },

    /// Record id outside the scan-count table
    #[error("Record id {id} out of range for a counting table of {universe} ids")]
    IdentifierOutOfRange {
        /// The identifier that did not fit
        id: RecordId,
        /// Size of the counting table
        universe: usize,
    },

    /// Configuration value is not acceptable
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed or written
    #[error("Config parse error: {0}")]
    ConfigParse(String),

    /// I/O error while reading or writing a config file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::ConfigParse(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::ConfigParse(e.to_string())
    }
}

impl Error {
    /// Whether this error reports a caller contract violation
    ///
    /// Contract violations come from internal callers handing the engine
    /// malformed lists or thresholds. They are never retried.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            Error::InvalidThreshold
                | Error::UnsortedList { .. }
                | Error::ZeroWeight { .. }
                | Error::IdentifierOutOfRange { .. }
        )
    }
}
