use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::BenchmarkSeries;

/// p-value below which a category counts as statistically significant.
pub const SIGNIFICANCE_ALPHA: f64 = 0.05;

/// Cohen's d must exceed this for a category to count as a large effect.
pub const LARGE_EFFECT_SIZE: f64 = 0.8;

/// Confidence level of the per-group intervals.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Number of significant categories needed before the overall claim holds.
///
/// Fixed, and deliberately independent of how many categories were tested.
pub const MIN_SIGNIFICANT_CATEGORIES: usize = 3;

/// Coarse classification of [`StatsError`], matching the two ways an analysis
/// can refuse to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The input was malformed (empty, too short, duplicated, non-finite), or
    /// so large that the arithmetic overflowed.
    InputValidation,
    /// A denominator in the computation was zero.
    Division,
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("no categories to analyze")]
    EmptyDataset,

    #[error("category '{category}': {group} samples are empty")]
    EmptySamples { category: String, group: Group },

    #[error("category '{category}': {group} has {len} sample(s), at least 2 are required")]
    InsufficientSamples {
        category: String,
        group: Group,
        len: usize,
    },

    #[error("category '{category}': invalid {group} value {value} (must be finite and non-negative)")]
    InvalidValue {
        category: String,
        group: Group,
        value: f64,
    },

    #[error("category '{0}' appears more than once")]
    DuplicateCategory(String),

    #[error("category '{category}': division by zero computing {quantity}")]
    DivisionByZero {
        category: String,
        quantity: &'static str,
    },

    #[error("category '{category}': {quantity} overflowed to a non-finite value")]
    NonFinite {
        category: String,
        quantity: &'static str,
    },

    #[error("t-distribution error: {0}")]
    Distribution(String),
}

impl StatsError {
    pub fn class(&self) -> ErrorClass {
        match self {
            StatsError::DivisionByZero { .. } => ErrorClass::Division,
            _ => ErrorClass::InputValidation,
        }
    }

    pub(crate) fn division(category: &str, quantity: &'static str) -> Self {
        StatsError::DivisionByZero {
            category: category.to_string(),
            quantity,
        }
    }

    /// Pass `value` through, or fail when an intermediate result overflowed.
    pub(crate) fn finite(
        category: &str,
        quantity: &'static str,
        value: f64,
    ) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(StatsError::NonFinite {
                category: category.to_string(),
                quantity,
            })
        }
    }
}

/// Identifies which group of a comparison a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Baseline,
    Optimized,
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Group::Baseline => f.write_str("baseline"),
            Group::Optimized => f.write_str("optimized"),
        }
    }
}

/// How the two groups' variances are combined for the t-test.
///
/// Chosen once per run; every category is tested with the same model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceModel {
    /// Student's independent t-test with a pooled variance estimate.
    #[default]
    Pooled,
    /// Welch's t-test with Welch-Satterthwaite degrees of freedom.
    Welch,
}

impl VarianceModel {
    /// Build the statistical test for this variance model.
    pub fn test(self) -> Box<dyn StatisticalTest> {
        match self {
            VarianceModel::Pooled => Box::new(StudentTTest),
            VarianceModel::Welch => Box::new(WelchTTest),
        }
    }
}

/// A closed interval `(low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// The outcome of comparing one category's baseline and optimized samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatResult {
    pub category: String,
    pub baseline_mean: f64,
    pub optimized_mean: f64,
    /// `baseline_mean / optimized_mean`; above 1.0 means the optimized side is faster.
    pub improvement_ratio: f64,
    /// Two-sided p-value of the t-test.
    pub p_value: f64,
    /// Standardized mean difference; positive when the optimized side is faster.
    pub cohens_d: f64,
    pub baseline_ci: Interval,
    pub optimized_ci: Interval,
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    pub baseline_samples: usize,
    pub optimized_samples: usize,
    /// `p_value < 0.05` and `cohens_d > 0.8`. Neither gate alone is enough.
    pub is_significant: bool,
}

/// Apply the significance rule shared by every test variant.
pub fn is_significant(p_value: f64, cohens_d: f64) -> bool {
    p_value < SIGNIFICANCE_ALPHA && cohens_d > LARGE_EFFECT_SIZE
}

/// Trait for statistical tests that compare the two groups of a series.
pub trait StatisticalTest: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Analyze one category. Fails on malformed input instead of returning NaN.
    fn analyze(&self, series: &BenchmarkSeries) -> Result<StatResult, StatsError>;
}

pub mod descriptive;
mod ttest;
pub use ttest::{StudentTTest, WelchTTest};
