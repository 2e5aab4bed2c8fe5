//! Configuration loading for speedup-stats.
//!
//! Supports loading configuration from TOML files, with sensible defaults
//! for all settings. The decision thresholds themselves are constants in
//! `speedup-stats-core` and cannot be configured.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use speedup_stats_core::VarianceModel;
use std::path::{Path, PathBuf};

/// Top-level configuration for speedup-stats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for the hypothesis test.
    pub hypothesis: HypothesisConfig,
    /// Where reports are written.
    pub report: ReportConfig,
    /// Where input data comes from.
    pub data: DataConfig,
}

/// Configuration for statistical hypothesis testing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HypothesisConfig {
    /// `pooled` (Student) or `welch`; applied to every category of a run.
    pub variance: VarianceModel,
}

/// Configuration for report output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Markdown report path; no markdown report when unset.
    pub markdown_path: Option<PathBuf>,
    /// JSON output path, `-` for stdout; no JSON when unset.
    pub json_path: Option<PathBuf>,
    /// Whether the terminal report uses colors.
    pub colors: bool,
}

/// Configuration for input data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Dataset file; the bundled dataset is used when unset.
    pub path: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            markdown_path: None,
            json_path: None,
            colors: true,
        }
    }
}

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".speedup-stats.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from `path` if it exists, otherwise use defaults.
    ///
    /// A missing file is not an error; a file that exists but cannot be
    /// parsed is.
    pub fn load_or_default(path: &Path) -> Result<Config> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }
}
