//! # Pod Start-up Analysis Entry Point
//!
//! Computes start-up latency, queue time and scheduling latency for every
//! (setup, instance count) batch of a cluster experiment.
//!
//! ## Commands
//! - **table:** parse each setup's log and write one results row per batch.
//! - **boxplot:** grouped box plots of per-pod values or per-run averages.
//! - **graph:** bar and line charts of an existing results table.
//!
//! ## Outputs
//! - `results/experiment_X_results.csv` by default (comma-space separated).
//! - `images/*.svg` charts.

#[macro_use]
extern crate log;

use std::path::Path;

use anyhow::Context as _;
use clap::Parser as _;

use pod_startup_analysis::{
    experiment::{AnalysisError, Breakdown, ExperimentConfig, preset, run_experiment},
    plot::{
        Distribution, PlotMetric, box_series_from_results, render_grouped_boxplot,
        render_metric_lines, render_startup_bars,
    },
    utils::export::{ResultRow, ResultsWriter, read_results},
};

use crate::cli::{CliArgs, Command};

mod cli;

const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    info!("{CRATE_NAME} {CRATE_VERSION}");

    let mut config = match &args.config {
        Some(path) => ExperimentConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => preset(args.experiment)?,
    };
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(images_dir) = args.images_dir {
        config.images_dir = images_dir;
    }
    info!(
        "Experiment {}: {} setups, instance counts {:?}",
        config.name,
        config.setups.len(),
        config.instances
    );

    let outcome = match args.command {
        Command::Table => write_table(&config),
        Command::Boxplot { source, metric } => draw_boxplot(&config, source, metric),
        Command::Graph { results } => {
            draw_graphs(&config, results.as_deref().unwrap_or(&config.output))
        }
    };
    if let Err(e) = &outcome {
        error!("{} aborted: {e:#}", config.name);
    }
    outcome
}

fn write_table(config: &ExperimentConfig) -> anyhow::Result<()> {
    let mut writer = ResultsWriter::create(&config.output)?;

    let results = run_experiment(config, Breakdown::Batch, |result| {
        writer
            .append(&ResultRow::from(result))
            .map_err(AnalysisError::from)
    })?;

    info!(
        "{} of {} rows written to {}",
        writer.rows_written(),
        results.len(),
        config.output.display()
    );
    Ok(())
}

fn draw_boxplot(
    config: &ExperimentConfig,
    source: Distribution,
    metric: PlotMetric,
) -> anyhow::Result<()> {
    let breakdown = match source {
        Distribution::PerPod => Breakdown::Batch,
        Distribution::PerRun => Breakdown::PerRun,
    };
    let results = run_experiment(config, breakdown, |_| Ok(()))?;

    let series = box_series_from_results(&results, metric, source);
    let path = config.images_dir.join(source.file_name(&config.name, metric));
    render_grouped_boxplot(&path, &config.instances, &series, &source.axis_label(metric))?;
    Ok(())
}

fn draw_graphs(config: &ExperimentConfig, results: &Path) -> anyhow::Result<()> {
    let rows = read_results(results)?;
    debug!("{} rows read from {}", rows.len(), results.display());

    let label_for = |name: &str| config.label_for(name).to_string();

    let bars = config
        .images_dir
        .join(format!("{}_average_start_up_time.svg", config.name));
    render_startup_bars(&bars, &rows, label_for)?;

    let lines = config
        .images_dir
        .join(format!("{}_performance_metrics.svg", config.name));
    render_metric_lines(&lines, &rows, label_for)?;
    Ok(())
}
