//! speedup-stats: speed-up ratios and hypothesis tests over benchmark timings
//!
//! This library wires the analyses of `speedup-stats-core` to a command line:
//! configuration, dataset loading and report selection.

pub mod cli;
pub mod config;
pub mod data;
pub mod runner;

// Re-export core types for convenience
pub use speedup_stats_core::{
    Analysis, BenchmarkSample, BenchmarkSeries, Dataset, HypothesisOutcome, NullDecision,
    RatioSummary, StatResult, StatsError, VarianceModel,
};

// Re-export main types from this crate
pub use cli::{Cli, Command};
pub use config::Config;
pub use runner::{analyze, report};
