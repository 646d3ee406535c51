//! Query-cost estimation for the hybrid strategy
//!
//! A linear time model over two features of a query:
//! - `merge_cost`: short-list elements times log2 of the list count, the
//!   heap work of the short pass
//! - `probe_cost`: candidates per unit of short threshold times the summed
//!   log2 sizes of the long lists, the galloping work of the probe pass
//!
//! Each feature gets its own least-squares line, fitted against the time
//! of the phase it describes. The estimate is the sum of both lines.

use crate::hybrid::ListSplit;
use gramdex_core::{SplitPolicy, WeightedList};

// ============================================================================
// Linear regression
// ============================================================================

/// A fitted line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearFit {
    /// Slope
    pub slope: f64,
    /// Intercept
    pub intercept: f64,
}

impl LinearFit {
    /// Value of the line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares fit of `ys` against `xs`
///
/// With fewer than two points, or when every x is the same, the slope is 0
/// and the intercept is the mean of `ys` (0 when empty). Extra entries of
/// the longer slice are ignored.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> LinearFit {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return LinearFit::default();
    }

    let (xs, ys) = (&xs[..n], &ys[..n]);
    let count = n as f64;
    let mean_x = xs.iter().sum::<f64>() / count;
    let mean_y = ys.iter().sum::<f64>() / count;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }

    if n < 2 || sxx <= f64::EPSILON * count {
        return LinearFit {
            slope: 0.0,
            intercept: mean_y,
        };
    }

    let slope = sxy / sxx;
    LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    }
}

// ============================================================================
// Features
// ============================================================================

/// Cost features of one query
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QueryFeatures {
    /// Short-list elements times log2 of the list count
    pub merge_cost: f64,
    /// Short elements per unit of short threshold times the summed log2
    /// sizes of the long lists
    pub probe_cost: f64,
}

impl QueryFeatures {
    /// Features of `lists` at `threshold` under `policy`
    ///
    /// `None` when the threshold is zero or not below the number of lists;
    /// such queries are cheap and outside the model.
    pub fn compute(
        lists: &[WeightedList<'_>],
        threshold: u32,
        policy: &SplitPolicy,
    ) -> Option<Self> {
        if threshold == 0 || threshold as usize >= lists.len() {
            return None;
        }

        let split = ListSplit::compute(lists, threshold, policy);
        let short_elements: usize = split.short_indices().iter().map(|&i| lists[i].len()).sum();
        let long_log_sizes: f64 = split
            .long_indices()
            .iter()
            .map(|&i| (lists[i].len().max(1) as f64).log2())
            .sum();
        let short_threshold = (u64::from(threshold) - split.long_weight) as f64;

        let short_elements = short_elements as f64;
        Some(QueryFeatures {
            merge_cost: short_elements * (lists.len() as f64).log2(),
            probe_cost: short_elements / short_threshold * long_log_sizes,
        })
    }
}

/// One timed query
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostSample {
    /// Features of the query
    pub features: QueryFeatures,
    /// Time of the short-list pass in microseconds
    pub short_micros: f64,
    /// Time of the long-list probe pass in microseconds
    pub long_micros: f64,
}

// ============================================================================
// CostModel
// ============================================================================

/// Fitted query-time model for the hybrid strategy
#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    split: SplitPolicy,
    short_phase: LinearFit,
    probe_phase: LinearFit,
    samples: usize,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            split: SplitPolicy::adaptive(),
            short_phase: LinearFit::default(),
            probe_phase: LinearFit::default(),
            samples: 0,
        }
    }
}

impl CostModel {
    /// Fit both phase lines to `samples`
    ///
    /// `split` must be the policy the samples were timed with; estimates
    /// recompute features with it.
    pub fn fit(split: SplitPolicy, samples: &[CostSample]) -> Self {
        let merge_x: Vec<f64> = samples.iter().map(|s| s.features.merge_cost).collect();
        let probe_x: Vec<f64> = samples.iter().map(|s| s.features.probe_cost).collect();
        let short_y: Vec<f64> = samples.iter().map(|s| s.short_micros).collect();
        let long_y: Vec<f64> = samples.iter().map(|s| s.long_micros).collect();

        CostModel {
            split,
            short_phase: linear_regression(&merge_x, &short_y),
            probe_phase: linear_regression(&probe_x, &long_y),
            samples: samples.len(),
        }
    }

    /// Fitted line for the short-list pass
    pub fn short_phase(&self) -> LinearFit {
        self.short_phase
    }

    /// Fitted line for the long-list probe pass
    pub fn probe_phase(&self) -> LinearFit {
        self.probe_phase
    }

    /// Split policy the model was fitted with
    pub fn split(&self) -> SplitPolicy {
        self.split
    }

    /// Number of samples behind the fit
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Features of a query under the model's split policy
    pub fn features(&self, lists: &[WeightedList<'_>], threshold: u32) -> Option<QueryFeatures> {
        QueryFeatures::compute(lists, threshold, &self.split)
    }

    /// Estimated merge time in microseconds, 0 for queries outside the model
    pub fn estimate_micros(&self, lists: &[WeightedList<'_>], threshold: u32) -> f64 {
        match self.features(lists, threshold) {
            Some(f) => {
                self.short_phase.predict(f.merge_cost) + self.probe_phase.predict(f.probe_cost)
            }
            None => 0.0,
        }
    }
}
