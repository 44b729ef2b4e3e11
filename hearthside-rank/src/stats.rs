//! Robust and central-tendency summaries over a named metric dataset.
//!
//! The national ranking pass computes one summary per tracked metric and
//! every record is classified against it. Missing observations are recorded
//! as zero upstream, so the summary excludes zeros before computing; a
//! dataset with no usable observations is a typed error rather than a
//! zeroed summary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hearthside_core::{ClassifierKind, Metric};

/// Errors raised while summarising a metric dataset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    /// The dataset had no usable (non-zero, finite) observations.
    #[error("metric {metric} has no usable observations")]
    Degenerate {
        /// The metric whose dataset was degenerate.
        metric: Metric,
    },
}

/// Median, MAD, mean, and population standard deviation for one metric's
/// national dataset.
///
/// MAD and the standard deviation are always non-negative. A spread of zero
/// means the distribution has no discriminating power; classifiers
/// short-circuit to "no band" rather than dividing by it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// The metric this summary describes.
    pub metric: Metric,
    /// Median of the usable observations.
    pub median: f64,
    /// Median absolute deviation from the median.
    pub mad: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl StatsSummary {
    /// The centre statistic for a classifier variant (median for symmetric,
    /// mean for skewed).
    #[must_use]
    pub fn center(&self, kind: ClassifierKind) -> f64 {
        match kind {
            ClassifierKind::Symmetric => self.median,
            ClassifierKind::Skewed => self.mean,
        }
    }

    /// The spread statistic for a classifier variant (MAD for symmetric,
    /// standard deviation for skewed).
    #[must_use]
    pub fn spread(&self, kind: ClassifierKind) -> f64 {
        match kind {
            ClassifierKind::Symmetric => self.mad,
            ClassifierKind::Skewed => self.std_dev,
        }
    }
}

/// Summarise the national dataset for `metric`.
///
/// The input is not mutated; zero and non-finite observations are excluded
/// before any statistic is computed.
///
/// # Errors
/// Returns [`StatsError::Degenerate`] when no usable observations remain.
pub fn summarize(metric: Metric, values: &[f64]) -> Result<StatsSummary, StatsError> {
    let usable: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v != 0.0)
        .collect();
    if usable.is_empty() {
        return Err(StatsError::Degenerate { metric });
    }

    let median = median_of(&usable);
    let deviations: Vec<f64> = usable.iter().map(|v| (v - median).abs()).collect();
    let mad = median_of(&deviations);

    #[allow(
        clippy::cast_precision_loss,
        reason = "dataset sizes are far below the f64 mantissa"
    )]
    let count = usable.len() as f64;
    let mean = usable.iter().sum::<f64>() / count;
    let variance = usable.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    let std_dev = variance.sqrt();

    Ok(StatsSummary {
        metric,
        median,
        mad,
        mean,
        std_dev,
    })
}

/// Median of a non-empty slice; sorts a copy so the caller's order is
/// untouched.
fn median_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        f64::midpoint(sorted[mid - 1], sorted[mid])
    }
}
