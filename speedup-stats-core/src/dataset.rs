//! Input records: scalar timing pairs and sample series per benchmark category.
//!
//! All values are milliseconds. Records are plain data; validation happens at
//! the boundary of each analysis so that nothing is computed from bad input.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::stats::{Group, StatsError};

/// A single baseline/optimized timing pair for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSample {
    pub category: String,
    #[serde(rename = "baseline")]
    pub baseline_value: f64,
    #[serde(rename = "optimized")]
    pub optimized_value: f64,
}

impl BenchmarkSample {
    pub fn new(category: impl Into<String>, baseline_value: f64, optimized_value: f64) -> Self {
        Self {
            category: category.into(),
            baseline_value,
            optimized_value,
        }
    }

    pub fn validate(&self) -> Result<(), StatsError> {
        check_value(&self.category, Group::Baseline, self.baseline_value)?;
        check_value(&self.category, Group::Optimized, self.optimized_value)
    }
}

/// Independent baseline and optimized sample sequences for one category.
///
/// The two sequences need not have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSeries {
    pub category: String,
    #[serde(rename = "baseline")]
    pub baseline_values: Vec<f64>,
    #[serde(rename = "optimized")]
    pub optimized_values: Vec<f64>,
}

impl BenchmarkSeries {
    pub fn new(
        category: impl Into<String>,
        baseline_values: Vec<f64>,
        optimized_values: Vec<f64>,
    ) -> Self {
        Self {
            category: category.into(),
            baseline_values,
            optimized_values,
        }
    }

    /// Both groups must hold at least two finite, non-negative values.
    pub fn validate(&self) -> Result<(), StatsError> {
        for (group, values) in [
            (Group::Baseline, &self.baseline_values),
            (Group::Optimized, &self.optimized_values),
        ] {
            if values.is_empty() {
                return Err(StatsError::EmptySamples {
                    category: self.category.clone(),
                    group,
                });
            }
            if values.len() < 2 {
                return Err(StatsError::InsufficientSamples {
                    category: self.category.clone(),
                    group,
                    len: values.len(),
                });
            }
            for &value in values {
                check_value(&self.category, group, value)?;
            }
        }
        Ok(())
    }
}

/// The full analysis input, in the order the categories were written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    /// Scalar pairs for the ratio summary.
    #[serde(rename = "sample")]
    pub samples: Vec<BenchmarkSample>,
    /// Sample sequences for the hypothesis test.
    pub series: Vec<BenchmarkSeries>,
}

impl Dataset {
    /// Reject duplicated category names in either list.
    pub fn validate(&self) -> Result<(), StatsError> {
        ensure_unique(self.samples.iter().map(|s| s.category.as_str()))?;
        ensure_unique(self.series.iter().map(|s| s.category.as_str()))
    }
}

/// Fail with [`StatsError::DuplicateCategory`] on the first repeated name.
pub fn ensure_unique<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<(), StatsError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(StatsError::DuplicateCategory(name.to_string()));
        }
    }
    Ok(())
}

fn check_value(category: &str, group: Group, value: f64) -> Result<(), StatsError> {
    if !value.is_finite() || value < 0.0 {
        return Err(StatsError::InvalidValue {
            category: category.to_string(),
            group,
            value,
        });
    }
    Ok(())
}
