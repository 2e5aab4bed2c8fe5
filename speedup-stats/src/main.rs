use anyhow::{Context, Result};
use clap::Parser;
use speedup_stats::{analyze, data, report, Cli, Config};
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber; `--verbose` lowers the default level to debug.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config and apply CLI overrides
    let mut config = Config::load_or_default(&cli.config)?;
    cli.apply_to_config(&mut config);
    tracing::debug!(?config, "configuration");

    // 1. Load data
    let dataset = data::load(config.data.path.as_deref()).context("Failed to load dataset")?;
    tracing::info!(
        samples = dataset.samples.len(),
        series = dataset.series.len(),
        "dataset loaded"
    );

    // 2. Analyze
    let analysis = analyze(cli.command(), &dataset, &config)?;

    // 3. Report
    report(&analysis, &config)?;

    Ok(())
}
