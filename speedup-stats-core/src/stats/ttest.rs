use statrs::distribution::{ContinuousCDF, StudentsT};

use super::descriptive::{self, cohens_d, pooled_std_dev};
use super::{is_significant, StatResult, StatisticalTest, StatsError, CONFIDENCE_LEVEL};
use crate::dataset::BenchmarkSeries;

/// Student's independent two-sample t-test.
///
/// Assumes both groups share a variance and pools them, giving
/// `n1 + n2 - 2` degrees of freedom.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentTTest;

/// Welch's t-test for two independent samples with potentially unequal variances.
#[derive(Debug, Clone, Copy, Default)]
pub struct WelchTTest;

/// Per-group moments needed by both test variants.
struct Moments {
    n: usize,
    mean: f64,
    variance: f64,
}

impl Moments {
    fn of(category: &str, samples: &[f64]) -> Result<Self, StatsError> {
        let mean = StatsError::finite(category, "mean", descriptive::mean(samples))?;
        let variance = StatsError::finite(
            category,
            "variance",
            descriptive::variance(samples, mean),
        )?;
        Ok(Self {
            n: samples.len(),
            mean,
            variance,
        })
    }
}

/// Shared front half of both tests: validate, compute moments and the pooled SD.
fn prepare(series: &BenchmarkSeries) -> Result<(Moments, Moments, f64), StatsError> {
    series.validate()?;

    let baseline = Moments::of(&series.category, &series.baseline_values)?;
    let optimized = Moments::of(&series.category, &series.optimized_values)?;

    let pooled = pooled_std_dev(baseline.variance, baseline.n, optimized.variance, optimized.n)
        .ok_or_else(|| StatsError::division(&series.category, "pooled standard deviation"))?;
    let pooled = StatsError::finite(&series.category, "pooled standard deviation", pooled)?;
    // Both groups constant: the t-statistic would be 0/0 or x/0.
    if pooled == 0.0 {
        return Err(StatsError::division(
            &series.category,
            "pooled standard deviation",
        ));
    }

    Ok((baseline, optimized, pooled))
}

/// Shared back half: p-value, effect size, intervals and the significance gate.
fn assemble(
    series: &BenchmarkSeries,
    baseline: &Moments,
    optimized: &Moments,
    pooled: f64,
    t_statistic: f64,
    df: f64,
) -> Result<StatResult, StatsError> {
    if optimized.mean == 0.0 {
        return Err(StatsError::division(&series.category, "improvement ratio"));
    }

    let category = series.category.as_str();
    let improvement_ratio =
        StatsError::finite(category, "improvement ratio", baseline.mean / optimized.mean)?;
    let t_statistic = StatsError::finite(category, "t-statistic", t_statistic)?;
    let df = StatsError::finite(category, "degrees of freedom", df)?;

    let t_dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution(e.to_string()))?;
    // Two-tailed test: p = 2 * P(T > |t|)
    let p_value = (2.0 * t_dist.sf(t_statistic.abs())).min(1.0);

    let cohens_d = StatsError::finite(
        category,
        "effect size",
        cohens_d(baseline.mean, optimized.mean, pooled),
    )?;

    let baseline_ci = descriptive::confidence_interval(&series.baseline_values, CONFIDENCE_LEVEL)?;
    let optimized_ci =
        descriptive::confidence_interval(&series.optimized_values, CONFIDENCE_LEVEL)?;

    Ok(StatResult {
        category: series.category.clone(),
        baseline_mean: baseline.mean,
        optimized_mean: optimized.mean,
        improvement_ratio,
        p_value,
        cohens_d,
        baseline_ci,
        optimized_ci,
        t_statistic,
        degrees_of_freedom: df,
        baseline_samples: baseline.n,
        optimized_samples: optimized.n,
        is_significant: is_significant(p_value, cohens_d),
    })
}

impl StatisticalTest for StudentTTest {
    fn name(&self) -> &'static str {
        "Student's t-test (pooled variance)"
    }

    fn analyze(&self, series: &BenchmarkSeries) -> Result<StatResult, StatsError> {
        let (baseline, optimized, pooled) = prepare(series)?;

        // t = (mean1 - mean2) / (sp * sqrt(1/n1 + 1/n2))
        let se = pooled * (1.0 / baseline.n as f64 + 1.0 / optimized.n as f64).sqrt();
        let t_statistic = (baseline.mean - optimized.mean) / se;
        let df = (baseline.n + optimized.n - 2) as f64;

        assemble(series, &baseline, &optimized, pooled, t_statistic, df)
    }
}

impl WelchTTest {
    /// Calculate degrees of freedom using the Welch-Satterthwaite equation.
    ///
    /// df = (var1/n1 + var2/n2)^2 / ((var1/n1)^2/(n1-1) + (var2/n2)^2/(n2-1))
    fn welch_satterthwaite_df(var1: f64, n1: usize, var2: f64, n2: usize) -> f64 {
        let s1 = var1 / n1 as f64;
        let s2 = var2 / n2 as f64;
        let numerator = (s1 + s2).powi(2);
        let denominator = (s1.powi(2) / (n1 - 1) as f64) + (s2.powi(2) / (n2 - 1) as f64);

        numerator / denominator
    }
}

impl StatisticalTest for WelchTTest {
    fn name(&self) -> &'static str {
        "Welch's t-test (unequal variances)"
    }

    fn analyze(&self, series: &BenchmarkSeries) -> Result<StatResult, StatsError> {
        let (baseline, optimized, pooled) = prepare(series)?;

        let se = StatsError::finite(
            &series.category,
            "standard error",
            (baseline.variance / baseline.n as f64 + optimized.variance / optimized.n as f64)
                .sqrt(),
        )?;
        if se == 0.0 {
            return Err(StatsError::division(&series.category, "standard error"));
        }
        let t_statistic = (baseline.mean - optimized.mean) / se;
        let df = Self::welch_satterthwaite_df(
            baseline.variance,
            baseline.n,
            optimized.variance,
            optimized.n,
        );

        assemble(series, &baseline, &optimized, pooled, t_statistic, df)
    }
}
