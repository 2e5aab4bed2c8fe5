//! Speed-up ratios from single baseline/optimized timing pairs.
//!
//! Each category gets `ratio = baseline / optimized`, is placed in one of four
//! ordered bands, and the whole set is reduced to a handful of aggregates plus
//! a yes/no verdict on the overall speed-up claim.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::{ensure_unique, BenchmarkSample};
use crate::stats::{StatsError, MIN_SIGNIFICANT_CATEGORIES};

/// Ratio at or above which a category is a significant improvement.
pub const SIGNIFICANT_RATIO: f64 = 2.0;
/// Lower bound of the "good" band.
pub const GOOD_RATIO: f64 = 1.5;
/// Lower bound of the "modest" band; anything below is a regression.
pub const MODEST_RATIO: f64 = 1.1;

/// Ordered classification of a speed-up ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioBand {
    Regression,
    Modest,
    Good,
    Significant,
}

impl RatioBand {
    /// Classify a ratio. Every value falls in exactly one band.
    pub fn classify(ratio: f64) -> Self {
        if ratio >= SIGNIFICANT_RATIO {
            RatioBand::Significant
        } else if ratio >= GOOD_RATIO {
            RatioBand::Good
        } else if ratio >= MODEST_RATIO {
            RatioBand::Modest
        } else {
            RatioBand::Regression
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RatioBand::Significant => "SIGNIFICANT",
            RatioBand::Good => "GOOD",
            RatioBand::Modest => "MODEST",
            RatioBand::Regression => "REGRESSION",
        }
    }
}

/// Whether enough categories cleared the 2x bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimVerdict {
    Supported,
    Unsupported,
}

impl ClaimVerdict {
    pub fn from_count(significant_count: usize) -> Self {
        if significant_count >= MIN_SIGNIFICANT_CATEGORIES {
            ClaimVerdict::Supported
        } else {
            ClaimVerdict::Unsupported
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioEntry {
    pub category: String,
    pub baseline_value: f64,
    pub optimized_value: f64,
    pub ratio: f64,
    pub band: RatioBand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioSummary {
    /// Entries in input order.
    pub entries: Vec<RatioEntry>,
    pub significant_count: usize,
    pub mean_ratio: f64,
    pub min_ratio: f64,
    pub max_ratio: f64,
    pub verdict: ClaimVerdict,
}

impl RatioSummary {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Share of categories in the significant band, as a percentage.
    pub fn success_rate(&self) -> f64 {
        self.significant_count as f64 / self.entries.len() as f64 * 100.0
    }

    pub fn best(&self) -> Option<&RatioEntry> {
        self.entries.iter().max_by(|a, b| a.ratio.total_cmp(&b.ratio))
    }

    pub fn worst(&self) -> Option<&RatioEntry> {
        self.entries.iter().min_by(|a, b| a.ratio.total_cmp(&b.ratio))
    }

    pub fn count_in(&self, band: RatioBand) -> usize {
        self.entries.iter().filter(|e| e.band == band).count()
    }
}

/// Compute the ratio for a single pair.
pub fn improvement_ratio(sample: &BenchmarkSample) -> Result<f64, StatsError> {
    sample.validate()?;
    if sample.optimized_value == 0.0 {
        return Err(StatsError::division(&sample.category, "improvement ratio"));
    }
    StatsError::finite(
        &sample.category,
        "improvement ratio",
        sample.baseline_value / sample.optimized_value,
    )
}

/// Summarize a set of timing pairs.
///
/// Every pair is validated before anything is aggregated; the first failure
/// aborts the whole summary.
pub fn summarize(samples: &[BenchmarkSample]) -> Result<RatioSummary, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::EmptyDataset);
    }
    ensure_unique(samples.iter().map(|s| s.category.as_str()))?;

    let entries = samples
        .iter()
        .map(|sample| {
            let ratio = improvement_ratio(sample)?;
            let band = RatioBand::classify(ratio);
            debug!(category = %sample.category, ratio, band = band.label(), "classified ratio");
            Ok(RatioEntry {
                category: sample.category.clone(),
                baseline_value: sample.baseline_value,
                optimized_value: sample.optimized_value,
                ratio,
                band,
            })
        })
        .collect::<Result<Vec<_>, StatsError>>()?;

    let significant_count = entries
        .iter()
        .filter(|e| e.band == RatioBand::Significant)
        .count();
    let n = entries.len() as f64;
    let mean_ratio = entries.iter().map(|e| e.ratio / n).sum::<f64>();
    let min_ratio = entries.iter().map(|e| e.ratio).fold(f64::INFINITY, f64::min);
    let max_ratio = entries
        .iter()
        .map(|e| e.ratio)
        .fold(f64::NEG_INFINITY, f64::max);
    let verdict = ClaimVerdict::from_count(significant_count);

    info!(
        total = entries.len(),
        significant_count,
        mean_ratio,
        ?verdict,
        "ratio summary complete"
    );

    Ok(RatioSummary {
        entries,
        significant_count,
        mean_ratio,
        min_ratio,
        max_ratio,
        verdict,
    })
}
