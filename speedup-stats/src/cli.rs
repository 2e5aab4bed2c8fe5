//! Command-line interface for speedup-stats.

use crate::config::Config;
use clap::{Parser, Subcommand, ValueEnum};
use speedup_stats_core::VarianceModel;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "speedup-stats")]
#[command(about = "Speed-up ratios and hypothesis tests over baseline/optimized benchmark timings")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// TOML dataset with [[sample]] and [[series]] tables (defaults to the bundled data)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Path to config file
    #[arg(long, global = true, default_value = ".speedup-stats.toml")]
    pub config: PathBuf,

    /// Variance model for the t-test
    #[arg(long, global = true, value_enum)]
    pub variance: Option<VarianceArg>,

    /// Write a markdown report to this path
    #[arg(long, global = true)]
    pub markdown: Option<PathBuf>,

    /// Write the analysis as JSON to this path ("-" for stdout)
    #[arg(long, global = true)]
    pub json: Option<PathBuf>,

    /// Disable colored terminal output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Summarize speed-up ratios of single timing pairs
    Ratios,
    /// Run t-tests over sample series and decide on the null hypothesis
    Hypothesis,
    /// Run both analyses (the default)
    All,
}

impl Command {
    pub fn runs_ratios(self) -> bool {
        matches!(self, Command::Ratios | Command::All)
    }

    pub fn runs_hypothesis(self) -> bool {
        matches!(self, Command::Hypothesis | Command::All)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VarianceArg {
    /// Student's t-test with pooled variance
    Pooled,
    /// Welch's t-test
    Welch,
}

impl From<VarianceArg> for VarianceModel {
    fn from(arg: VarianceArg) -> Self {
        match arg {
            VarianceArg::Pooled => VarianceModel::Pooled,
            VarianceArg::Welch => VarianceModel::Welch,
        }
    }
}

impl Cli {
    /// The subcommand to run, `all` when none was given.
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::All)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values.
    /// Only non-None optional values will override the config.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(data) = &self.data {
            config.data.path = Some(data.clone());
        }

        if let Some(variance) = self.variance {
            config.hypothesis.variance = variance.into();
        }

        if let Some(markdown) = &self.markdown {
            config.report.markdown_path = Some(markdown.clone());
        }

        if let Some(json) = &self.json {
            config.report.json_path = Some(json.clone());
        }

        if self.no_color {
            config.report.colors = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_minimal() {
        let cli = Cli::parse_from(["speedup-stats"]);

        assert_eq!(cli.command(), Command::All);
        assert!(cli.data.is_none());
        assert_eq!(cli.config, PathBuf::from(".speedup-stats.toml"));
        assert!(cli.variance.is_none());
        assert!(!cli.no_color);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_subcommand_with_global_flags() {
        let cli = Cli::parse_from([
            "speedup-stats",
            "hypothesis",
            "--variance",
            "welch",
            "--data",
            "bench.toml",
            "--json",
            "-",
            "-v",
        ]);

        assert_eq!(cli.command(), Command::Hypothesis);
        assert_eq!(cli.variance, Some(VarianceArg::Welch));
        assert_eq!(cli.data, Some(PathBuf::from("bench.toml")));
        assert_eq!(cli.json, Some(PathBuf::from("-")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_command_selection() {
        assert!(Command::Ratios.runs_ratios());
        assert!(!Command::Ratios.runs_hypothesis());
        assert!(Command::Hypothesis.runs_hypothesis());
        assert!(!Command::Hypothesis.runs_ratios());
        assert!(Command::All.runs_ratios() && Command::All.runs_hypothesis());
    }

    #[test]
    fn test_rejects_unknown_variance() {
        let result = Cli::try_parse_from(["speedup-stats", "--variance", "paired"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_to_config_with_overrides() {
        let cli = Cli::parse_from([
            "speedup-stats",
            "--data",
            "custom.toml",
            "--variance",
            "welch",
            "--markdown",
            "out/report.md",
            "--no-color",
        ]);

        let mut config = Config::default();
        cli.apply_to_config(&mut config);

        assert_eq!(config.data.path, Some(PathBuf::from("custom.toml")));
        assert_eq!(config.hypothesis.variance, VarianceModel::Welch);
        assert_eq!(
            config.report.markdown_path,
            Some(PathBuf::from("out/report.md"))
        );
        assert!(config.report.json_path.is_none());
        assert!(!config.report.colors);
    }

    #[test]
    fn test_apply_to_config_without_overrides() {
        let cli = Cli::parse_from(["speedup-stats", "ratios"]);

        let mut config = Config::default();
        config.report.markdown_path = Some(PathBuf::from("keep.md"));
        cli.apply_to_config(&mut config);

        // Values should remain unchanged
        assert!(config.data.path.is_none());
        assert_eq!(config.hypothesis.variance, VarianceModel::Pooled);
        assert_eq!(config.report.markdown_path, Some(PathBuf::from("keep.md")));
        assert!(config.report.colors);
    }
}
