//! Descriptive statistics over raw millisecond samples.

use statrs::distribution::{ContinuousCDF, StudentsT};

use super::{Interval, StatsError};

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Whether every sample has the same value.
pub fn is_constant(samples: &[f64]) -> bool {
    samples.windows(2).all(|w| w[0] == w[1])
}

/// Sample variance with Bessel's correction (n-1 denominator).
///
/// Exactly zero for a constant slice, even when `mean` carries rounding error.
pub fn variance(samples: &[f64], mean: f64) -> f64 {
    if samples.len() < 2 || is_constant(samples) {
        return 0.0;
    }
    let sum_sq_diff: f64 = samples
        .iter()
        .map(|x| {
            let diff = x - mean;
            diff * diff
        })
        .sum();
    sum_sq_diff / (samples.len() - 1) as f64
}

/// Standard error of the mean, `s / sqrt(n)`.
pub fn standard_error(samples: &[f64], mean: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    (variance(samples, mean) / samples.len() as f64).sqrt()
}

/// Two-sided t-distribution quantile for `level` at `df` degrees of freedom.
pub fn t_critical(level: f64, df: f64) -> Result<f64, StatsError> {
    let dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution(e.to_string()))?;
    Ok(dist.inverse_cdf((1.0 + level) / 2.0))
}

/// Confidence interval for the mean of `samples`, centred on the sample mean
/// and scaled by the standard error, using `n - 1` degrees of freedom.
///
/// Requires at least two samples.
pub fn confidence_interval(samples: &[f64], level: f64) -> Result<Interval, StatsError> {
    if samples.len() < 2 {
        return Err(StatsError::Distribution(format!(
            "confidence interval needs at least 2 samples, got {}",
            samples.len()
        )));
    }
    let m = mean(samples);
    let sem = standard_error(samples, m);
    let half_width = t_critical(level, (samples.len() - 1) as f64)? * sem;
    Ok(Interval {
        low: m - half_width,
        high: m + half_width,
    })
}

/// Pooled standard deviation of two independent groups.
///
/// `sqrt(((n1-1)*var1 + (n2-1)*var2) / (n1+n2-2))`. Returns `None` when
/// `n1 + n2 <= 2`.
pub fn pooled_std_dev(var1: f64, n1: usize, var2: f64, n2: usize) -> Option<f64> {
    if n1 + n2 <= 2 {
        return None;
    }
    let numerator = (n1 as f64 - 1.0) * var1 + (n2 as f64 - 1.0) * var2;
    Some((numerator / (n1 + n2 - 2) as f64).sqrt())
}

/// Cohen's d: `(baseline_mean - optimized_mean) / pooled_std`.
pub fn cohens_d(baseline_mean: f64, optimized_mean: f64, pooled_std: f64) -> f64 {
    (baseline_mean - optimized_mean) / pooled_std
}
