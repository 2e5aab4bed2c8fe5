//! Runs the selected analyses over a dataset and hands the result to reporters.

use anyhow::{Context, Result};
use speedup_stats_core::{
    summarize, Analysis, Dataset, HypothesisTester, JsonReporter, MarkdownReporter, Reporter,
    TerminalReporter,
};
use std::path::Path;
use tracing::{info, warn};

use crate::cli::Command;
use crate::config::Config;

/// Run the analyses `command` asks for.
///
/// An explicitly requested analysis fails on an empty input list. Under
/// `all`, an empty list just skips that analysis.
pub fn analyze(command: Command, dataset: &Dataset, config: &Config) -> Result<Analysis> {
    let mut analysis = Analysis::default();
    let explicit = command != Command::All;

    if command.runs_ratios() {
        if dataset.samples.is_empty() && !explicit {
            warn!("dataset has no [[sample]] tables, skipping ratio summary");
        } else {
            info!(categories = dataset.samples.len(), "summarizing ratios");
            let summary = summarize(&dataset.samples).context("Ratio summary failed")?;
            analysis.ratios = Some(summary);
        }
    }

    if command.runs_hypothesis() {
        if dataset.series.is_empty() && !explicit {
            warn!("dataset has no [[series]] tables, skipping hypothesis test");
        } else {
            let tester = HypothesisTester::new(config.hypothesis.variance);
            info!(
                categories = dataset.series.len(),
                test = tester.test_name(),
                "running hypothesis tests"
            );
            let outcome = tester
                .evaluate(&dataset.series)
                .context("Hypothesis test failed")?;
            analysis.hypothesis = Some(outcome);
        }
    }

    Ok(analysis)
}

/// Build the reporters the configuration asks for.
///
/// JSON to stdout replaces the terminal tables so the output stays parseable.
pub fn reporters(config: &Config) -> Vec<Box<dyn Reporter>> {
    let mut reporters: Vec<Box<dyn Reporter>> = Vec::new();
    let json_to_stdout = config
        .report
        .json_path
        .as_deref()
        .is_some_and(|p| p == Path::new("-"));

    if !json_to_stdout {
        reporters.push(Box::new(TerminalReporter::with_colors(config.report.colors)));
    }
    if let Some(path) = &config.report.markdown_path {
        reporters.push(Box::new(MarkdownReporter::new(path)));
    }
    match &config.report.json_path {
        Some(_) if json_to_stdout => reporters.push(Box::new(JsonReporter::stdout())),
        Some(path) => reporters.push(Box::new(JsonReporter::to_file(path))),
        None => {}
    }
    reporters
}

/// Render `analysis` through every configured reporter.
pub fn report(analysis: &Analysis, config: &Config) -> Result<()> {
    for reporter in reporters(config) {
        reporter.report(analysis).context("Failed to write report")?;
    }
    if let Some(path) = &config.report.markdown_path {
        info!(path = %path.display(), "markdown report written");
    }
    Ok(())
}
