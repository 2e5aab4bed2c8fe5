//! Core of speedup-stats: input records, statistics, decision rules and
//! reporters for comparing baseline and optimized benchmark timings.
//!
//! Two analyses are provided and share nothing but the input types:
//! [`summary::summarize`] for single timing pairs and
//! [`hypothesis::HypothesisTester`] for sample series.

pub mod dataset;
pub mod hypothesis;
pub mod report;
pub mod stats;
pub mod summary;

// Re-export main types for convenience
pub use dataset::{BenchmarkSample, BenchmarkSeries, Dataset};
pub use hypothesis::{HypothesisOutcome, HypothesisTester, NullDecision};
pub use report::{
    Analysis, JsonReporter, MarkdownReporter, ReportError, Reporter, TerminalReporter,
};
pub use stats::{
    ErrorClass, Interval, StatResult, StatisticalTest, StatsError, StudentTTest, VarianceModel,
    WelchTTest,
};
pub use summary::{summarize, ClaimVerdict, RatioBand, RatioEntry, RatioSummary};
