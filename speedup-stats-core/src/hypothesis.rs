//! Per-category t-tests rolled up into a single accept/reject decision.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::{ensure_unique, BenchmarkSeries};
use crate::stats::{
    StatResult, StatisticalTest, StatsError, VarianceModel, MIN_SIGNIFICANT_CATEGORIES,
    SIGNIFICANCE_ALPHA,
};

/// Overall decision on the null hypothesis that the optimizations make no
/// meaningful difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullDecision {
    Reject,
    FailToReject,
}

impl NullDecision {
    pub fn from_count(significant_count: usize) -> Self {
        if significant_count >= MIN_SIGNIFICANT_CATEGORIES {
            NullDecision::Reject
        } else {
            NullDecision::FailToReject
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            NullDecision::Reject => "reject null hypothesis",
            NullDecision::FailToReject => "fail to reject null hypothesis (insufficient evidence)",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HypothesisOutcome {
    /// Name of the test that produced every result.
    pub test: String,
    /// Results in input order.
    pub results: Vec<StatResult>,
    pub significant_count: usize,
    pub decision: NullDecision,
}

impl HypothesisOutcome {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn success_rate(&self) -> f64 {
        self.significant_count as f64 / self.results.len() as f64 * 100.0
    }

    pub fn average_improvement(&self) -> f64 {
        let n = self.results.len() as f64;
        self.results.iter().map(|r| r.improvement_ratio / n).sum()
    }

    pub fn average_effect_size(&self) -> f64 {
        let n = self.results.len() as f64;
        self.results.iter().map(|r| r.cohens_d / n).sum()
    }

    pub fn get(&self, category: &str) -> Option<&StatResult> {
        self.results.iter().find(|r| r.category == category)
    }

    /// Alpha after a Bonferroni correction over all categories.
    ///
    /// Informational only: the decision uses uncorrected p-values.
    pub fn bonferroni_alpha(&self) -> f64 {
        SIGNIFICANCE_ALPHA / self.results.len() as f64
    }

    /// Number of significant categories whose p-value also clears the
    /// Bonferroni-adjusted alpha.
    pub fn bonferroni_survivors(&self) -> usize {
        let alpha = self.bonferroni_alpha();
        self.results
            .iter()
            .filter(|r| r.is_significant && r.p_value < alpha)
            .count()
    }
}

/// Runs one statistical test over every category of a dataset.
pub struct HypothesisTester {
    test: Box<dyn StatisticalTest>,
}

impl Default for HypothesisTester {
    fn default() -> Self {
        Self::new(VarianceModel::default())
    }
}

impl HypothesisTester {
    pub fn new(model: VarianceModel) -> Self {
        Self::with_test(model.test())
    }

    pub fn with_test(test: Box<dyn StatisticalTest>) -> Self {
        Self { test }
    }

    pub fn test_name(&self) -> &'static str {
        self.test.name()
    }

    /// Test every category and decide.
    ///
    /// Any invalid category fails the whole run; there are no partial results.
    pub fn evaluate(&self, series: &[BenchmarkSeries]) -> Result<HypothesisOutcome, StatsError> {
        if series.is_empty() {
            return Err(StatsError::EmptyDataset);
        }
        ensure_unique(series.iter().map(|s| s.category.as_str()))?;

        let results = series
            .iter()
            .map(|s| {
                let result = self.test.analyze(s)?;
                debug!(
                    category = %result.category,
                    p_value = result.p_value,
                    cohens_d = result.cohens_d,
                    significant = result.is_significant,
                    "category tested"
                );
                Ok(result)
            })
            .collect::<Result<Vec<_>, StatsError>>()?;

        let significant_count = results.iter().filter(|r| r.is_significant).count();
        let decision = NullDecision::from_count(significant_count);

        info!(
            test = self.test.name(),
            total = results.len(),
            significant_count,
            ?decision,
            "hypothesis test complete"
        );

        Ok(HypothesisOutcome {
            test: self.test.name().to_string(),
            results,
            significant_count,
            decision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{Interval, StudentTTest};

    /// Tight, well separated groups: always significant.
    fn fast(name: &str) -> BenchmarkSeries {
        BenchmarkSeries::new(
            name,
            vec![100.0, 101.0, 99.0, 100.5, 99.5],
            vec![10.0, 10.2, 9.8, 10.1, 9.9],
        )
    }

    /// Overlapping groups: never significant.
    fn flat(name: &str) -> BenchmarkSeries {
        BenchmarkSeries::new(
            name,
            vec![10.0, 12.0, 11.0, 9.0],
            vec![11.0, 10.0, 12.0, 9.5],
        )
    }

    #[test]
    fn test_nine_categories_two_significant() {
        let mut series = vec![fast("a"), fast("b")];
        series.extend((0..7).map(|i| flat(&format!("flat_{i}"))));

        let outcome = HypothesisTester::default().evaluate(&series).unwrap();

        assert_eq!(outcome.total(), 9);
        assert_eq!(outcome.significant_count, 2);
        assert_eq!(outcome.decision, NullDecision::FailToReject);
        assert!(outcome.decision.describe().contains("insufficient evidence"));
    }

    #[test]
    fn test_three_significant_rejects() {
        let series = vec![fast("a"), fast("b"), fast("c"), flat("d")];
        let outcome = HypothesisTester::default().evaluate(&series).unwrap();

        assert_eq!(outcome.significant_count, 3);
        assert_eq!(outcome.decision, NullDecision::Reject);
        assert_eq!(outcome.get("d").map(|r| r.is_significant), Some(false));
    }

    #[test]
    fn test_order_preserved() {
        let series = vec![flat("z"), fast("a"), flat("m")];
        let outcome = HypothesisTester::default().evaluate(&series).unwrap();
        let names: Vec<_> = outcome.results.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, ["z", "a", "m"]);
    }

    #[test]
    fn test_no_partial_results() {
        let series = vec![
            fast("a"),
            BenchmarkSeries::new("bad", vec![1.0], vec![1.0, 2.0]),
        ];
        let err = HypothesisTester::default().evaluate(&series).unwrap_err();
        assert!(matches!(err, StatsError::InsufficientSamples { .. }));
    }

    #[test]
    fn test_empty_and_duplicate_inputs() {
        let tester = HypothesisTester::default();
        assert!(matches!(
            tester.evaluate(&[]).unwrap_err(),
            StatsError::EmptyDataset
        ));
        assert!(matches!(
            tester.evaluate(&[fast("a"), fast("a")]).unwrap_err(),
            StatsError::DuplicateCategory(_)
        ));
    }

    #[test]
    fn test_variance_model_selects_test() {
        assert!(HypothesisTester::new(VarianceModel::Pooled)
            .test_name()
            .starts_with("Student"));
        assert!(HypothesisTester::new(VarianceModel::Welch)
            .test_name()
            .starts_with("Welch"));
        assert_eq!(
            HypothesisTester::with_test(Box::new(StudentTTest)).test_name(),
            HypothesisTester::default().test_name()
        );
    }

    fn result(category: &str, p_value: f64, cohens_d: f64, ratio: f64) -> StatResult {
        StatResult {
            category: category.to_string(),
            baseline_mean: ratio,
            optimized_mean: 1.0,
            improvement_ratio: ratio,
            p_value,
            cohens_d,
            baseline_ci: Interval { low: 0.0, high: 0.0 },
            optimized_ci: Interval { low: 0.0, high: 0.0 },
            t_statistic: 0.0,
            degrees_of_freedom: 8.0,
            baseline_samples: 5,
            optimized_samples: 5,
            is_significant: crate::stats::is_significant(p_value, cohens_d),
        }
    }

    #[test]
    fn test_aggregates_and_bonferroni_note() {
        let outcome = HypothesisOutcome {
            test: "test".to_string(),
            results: vec![
                result("a", 0.001, 2.0, 3.0),
                result("b", 0.02, 1.5, 2.0),
                result("c", 0.5, 0.1, 1.0),
                result("d", 0.001, 0.5, 2.0),
            ],
            significant_count: 2,
            decision: NullDecision::FailToReject,
        };

        assert!((outcome.average_improvement() - 2.0).abs() < 1e-12);
        assert!((outcome.average_effect_size() - 1.025).abs() < 1e-12);
        assert_eq!(outcome.success_rate(), 50.0);
        assert_eq!(outcome.bonferroni_alpha(), 0.0125);
        // "b" is significant uncorrected but not after correction
        assert_eq!(outcome.bonferroni_survivors(), 1);
    }
}
