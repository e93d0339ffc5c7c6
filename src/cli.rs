use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pod_startup_analysis::plot::{Distribution, PlotMetric};

#[derive(Parser)]
#[command(about, long_about = None)]
pub struct CliArgs {
    /// TOML experiment configuration. Takes precedence over `--experiment`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Built-in reference experiment (2, 3 or 4).
    #[arg(long, default_value_t = 4)]
    pub experiment: u32,

    /// Results table path, overriding the configured one.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory charts are written to, overriding the configured one.
    #[arg(long)]
    pub images_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute every batch and write the results table.
    Table,

    /// Render grouped box plots of per-pod values or per-run averages.
    Boxplot {
        /// What one box is made of.
        #[arg(long, value_enum, default_value_t)]
        source: Distribution,

        /// Metric to plot.
        #[arg(long, value_enum, default_value_t = PlotMetric::Scheduling)]
        metric: PlotMetric,
    },

    /// Render the bar and line charts of an existing results table.
    Graph {
        /// Results table to read; defaults to the configured output.
        #[arg(long)]
        results: Option<PathBuf>,
    },
}
