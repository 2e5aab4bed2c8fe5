//! Property tests for the invariants every analysis must hold.

use proptest::prelude::*;
use speedup_stats_core::stats::{descriptive, is_significant, LARGE_EFFECT_SIZE};
use speedup_stats_core::{
    summarize, BenchmarkSample, BenchmarkSeries, ErrorClass, RatioBand, StatisticalTest,
    StatsError, StudentTTest, WelchTTest,
};

fn samples() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.1f64..1000.0, 2..10)
}

proptest! {
    #[test]
    fn equal_timings_are_a_regression(value in 0.001f64..1e6) {
        let summary = summarize(&[BenchmarkSample::new("same", value, value)]).unwrap();
        prop_assert_eq!(summary.entries[0].ratio, 1.0);
        prop_assert_eq!(summary.entries[0].band, RatioBand::Regression);
    }

    #[test]
    fn bands_partition_positive_ratios(ratio in 0.0f64..100.0) {
        let band = RatioBand::classify(ratio);
        let matching = [
            ratio >= 2.0,
            (1.5..2.0).contains(&ratio),
            (1.1..1.5).contains(&ratio),
            ratio < 1.1,
        ];
        prop_assert_eq!(matching.iter().filter(|m| **m).count(), 1);
        let expected = match matching.iter().position(|m| *m) {
            Some(0) => RatioBand::Significant,
            Some(1) => RatioBand::Good,
            Some(2) => RatioBand::Modest,
            _ => RatioBand::Regression,
        };
        prop_assert_eq!(band, expected);
    }

    #[test]
    fn small_effects_are_never_significant(p in 0.0f64..1.0, d in -5.0f64..=LARGE_EFFECT_SIZE) {
        prop_assert!(!is_significant(p, d));
    }

    #[test]
    fn identical_groups_have_zero_effect(values in samples()) {
        let constant = descriptive::is_constant(&values);
        let series = BenchmarkSeries::new("same", values.clone(), values);
        let outcome = StudentTTest.analyze(&series);
        if constant {
            prop_assert!(matches!(outcome, Err(StatsError::DivisionByZero { .. })), "expected DivisionByZero, got {:?}", outcome);
        } else {
            let result = outcome.unwrap();
            prop_assert_eq!(result.cohens_d, 0.0);
            prop_assert!(!result.is_significant);
        }
    }

    #[test]
    fn constant_groups_are_division_errors(
        baseline in 0.1f64..1000.0,
        optimized in 0.1f64..1000.0,
        n in 2usize..10,
    ) {
        let series = BenchmarkSeries::new("flat", vec![baseline; n], vec![optimized; n]);
        for test in [&StudentTTest as &dyn StatisticalTest, &WelchTTest] {
            let err = test.analyze(&series).unwrap_err();
            prop_assert_eq!(err.class(), ErrorClass::Division);
        }
    }

    #[test]
    fn intervals_bracket_the_mean(values in samples()) {
        let ci = descriptive::confidence_interval(&values, 0.95).unwrap();
        let mean = descriptive::mean(&values);
        prop_assert!(ci.low <= mean && mean <= ci.high);
    }

    #[test]
    fn results_are_finite_or_rejected(baseline in samples(), optimized in samples()) {
        let series = BenchmarkSeries::new("random", baseline, optimized);
        for test in [&StudentTTest as &dyn StatisticalTest, &WelchTTest] {
            match test.analyze(&series) {
                Ok(r) => {
                    prop_assert!(r.p_value.is_finite() && (0.0..=1.0).contains(&r.p_value));
                    prop_assert!(r.cohens_d.is_finite());
                    prop_assert!(r.baseline_ci.contains(r.baseline_mean));
                    prop_assert!(r.optimized_ci.contains(r.optimized_mean));
                    prop_assert_eq!(r.is_significant, is_significant(r.p_value, r.cohens_d));
                }
                Err(e) => prop_assert_eq!(e.class(), ErrorClass::Division),
            }
        }
    }
}
