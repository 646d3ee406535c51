//! Merge engine configuration
//!
//! Configuration is a plain serde struct that can be built in code or loaded
//! from TOML. Every field has a default, so an empty document is a valid
//! configuration (hybrid strategy, skip short-list pass, T-1 split).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default DivideSkip tuning constant for the adaptive split
pub const DEFAULT_MU: f64 = 0.01;

/// Default cap on a growable scan-count table (16M ids, 128 MiB of tables)
pub const DEFAULT_MAX_UNIVERSE: usize = 1 << 24;

// ============================================================================
// Strategy selection
// ============================================================================

/// Which merge algorithm the engine runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// k-way heap merge over all lists
    Heap,
    /// Heap merge that gallops cursors past ids that cannot reach T
    Skip,
    /// Counting table indexed by record id
    ScanCount,
    /// Long lists probed, short lists merged
    #[default]
    Hybrid,
}

impl StrategyKind {
    /// Stable lowercase name, matching the config file spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Heap => "heap",
            StrategyKind::Skip => "skip",
            StrategyKind::ScanCount => "scan_count",
            StrategyKind::Hybrid => "hybrid",
        }
    }

    /// All strategies, in a fixed order
    pub fn all() -> [StrategyKind; 4] {
        [
            StrategyKind::Heap,
            StrategyKind::Skip,
            StrategyKind::ScanCount,
            StrategyKind::Hybrid,
        ]
    }
}

// ============================================================================
// Hybrid tuning
// ============================================================================

/// How the hybrid strategy chooses its long lists
///
/// The long set is taken from the longest list downward. Its total weight
/// never exceeds T-1, otherwise the short-list threshold would drop to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Long weight target of T-1
    #[default]
    ThresholdMinusOne,
    /// At most this many lists are long
    LongLists(usize),
    /// DivideSkip target `floor(T / (mu * log2(longest) + 1))`
    Adaptive {
        /// Tuning constant, larger values move weight to the short set
        mu: f64,
    },
}

impl SplitPolicy {
    /// Adaptive split with the default tuning constant
    pub fn adaptive() -> Self {
        SplitPolicy::Adaptive { mu: DEFAULT_MU }
    }
}

/// Algorithm used for the hybrid's short-list pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortListMode {
    /// Skip merge (DivideSkip)
    #[default]
    Skip,
    /// Plain heap merge
    Heap,
    /// Pairwise folding into a sorted candidate array (MergeOpt)
    Array,
    /// Counting array over the short lists' min..max id range
    ScanCount,
}

/// Hybrid strategy settings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridConfig {
    /// Long/short split policy
    pub split: SplitPolicy,
    /// Short-list merge algorithm
    pub short_lists: ShortListMode,
}

/// Scan-count strategy settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanCountConfig {
    /// Number of ids the counting table covers (`0..universe`).
    /// `None` grows the table to fit each call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub universe: Option<usize>,
    /// Largest table a growable merger may allocate
    pub max_universe: usize,
}

impl Default for ScanCountConfig {
    fn default() -> Self {
        ScanCountConfig {
            universe: None,
            max_universe: DEFAULT_MAX_UNIVERSE,
        }
    }
}

// ============================================================================
// MergeConfig
// ============================================================================

/// Merge engine configuration
///
/// # Example
///
/// ```toml
/// strategy = "hybrid"
/// detect_duplicates = true
///
/// [hybrid]
/// short_lists = "skip"
/// split = { adaptive = { mu = 0.01 } }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Merge algorithm
    pub strategy: StrategyKind,
    /// Collapse repeated physical lists into weighted lists before merging
    pub detect_duplicates: bool,
    /// Check sortedness, weights and threshold before every merge
    pub verify_inputs: bool,
    /// Scan-count settings
    pub scan_count: ScanCountConfig,
    /// Hybrid settings
    pub hybrid: HybridConfig,
}

impl MergeConfig {
    /// Configuration for one strategy with all other settings defaulted
    pub fn for_strategy(strategy: StrategyKind) -> Self {
        MergeConfig {
            strategy,
            ..MergeConfig::default()
        }
    }

    /// Builder: enable duplicate-list detection
    pub fn with_duplicate_detection(mut self, enabled: bool) -> Self {
        self.detect_duplicates = enabled;
        self
    }

    /// Builder: enable input verification
    pub fn with_input_verification(mut self, enabled: bool) -> Self {
        self.verify_inputs = enabled;
        self
    }

    /// Builder: fixed scan-count universe
    pub fn with_universe(mut self, universe: usize) -> Self {
        self.scan_count.universe = Some(universe);
        self
    }

    /// Builder: hybrid settings
    pub fn with_hybrid(mut self, hybrid: HybridConfig) -> Self {
        self.hybrid = hybrid;
        self
    }

    /// Check values serde cannot check
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` for a zero universe or growth cap, or
    /// a non-positive or non-finite adaptive `mu`.
    pub fn validate(&self) -> Result<()> {
        if self.scan_count.universe == Some(0) {
            return Err(Error::InvalidConfig(
                "scan_count.universe must be greater than 0".to_string(),
            ));
        }
        if self.scan_count.max_universe == 0 {
            return Err(Error::InvalidConfig(
                "scan_count.max_universe must be greater than 0".to_string(),
            ));
        }
        if let SplitPolicy::Adaptive { mu } = self.hybrid.split {
            if !mu.is_finite() || mu <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "hybrid.split.adaptive.mu must be a positive number, got {}",
                    mu
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MergeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Write this configuration to a TOML file
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Commented default configuration
    pub fn default_toml() -> &'static str {
        r#"# gramdex merge configuration
#
# Merge strategy: "heap", "skip", "scan_count" or "hybrid" (default)
strategy = "hybrid"

# Collapse lists requested by several grams into one weighted list
detect_duplicates = false

# Check list order, weights and threshold on every call
verify_inputs = false

[scan_count]
# Size of the counting table. Omit to grow it to fit each query.
# universe = 1048576

# Upper bound for a growing table. Larger ids fail the query.
max_universe = 16777216

[hybrid]
# Short-list pass: "skip" (default), "heap", "array" or "scan_count"
short_lists = "skip"

# Long/short split: "threshold_minus_one" (default),
# { long_lists = 3 } or { adaptive = { mu = 0.01 } }
split = "threshold_minus_one"
"#
    }
}
