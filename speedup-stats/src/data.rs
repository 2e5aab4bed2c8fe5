//! Dataset loading.
//!
//! Datasets are TOML documents made of `[[sample]]` tables (one timing pair
//! per category) and `[[series]]` tables (sample sequences per category).

use anyhow::{Context, Result};
use speedup_stats_core::Dataset;
use std::path::Path;

/// The memory-workload dataset shipped with the binary.
pub const BUNDLED_DATASET: &str = include_str!("../../demos/memory_workloads.toml");

/// Parse and validate a dataset. `origin` names the source in error messages.
pub fn parse(content: &str, origin: &str) -> Result<Dataset> {
    let dataset: Dataset =
        toml::from_str(content).with_context(|| format!("Failed to parse dataset: {origin}"))?;
    dataset
        .validate()
        .with_context(|| format!("Invalid dataset: {origin}"))?;
    Ok(dataset)
}

/// Load a dataset from `path`, or the bundled dataset when no path is given.
pub fn load(path: Option<&Path>) -> Result<Dataset> {
    match path {
        Some(p) => {
            let content = std::fs::read_to_string(p)
                .with_context(|| format!("Failed to read dataset: {}", p.display()))?;
            parse(&content, &p.display().to_string())
        }
        None => parse(BUNDLED_DATASET, "bundled memory workloads"),
    }
}
