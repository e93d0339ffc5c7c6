//! Chart rendering with plotters: grouped box plots of latency distributions and
//! bar/line charts of the results table. All charts are written as SVG.

pub mod boxplot;
pub mod charts;

use std::path::PathBuf;

use clap::ValueEnum;
use plotters::style::{Color, Palette, Palette99, RGBAColor};
use thiserror::Error;

use crate::metrics::{BatchSummary, MetricSeries};

pub use boxplot::{BoxSeries, box_series_from_results, render_grouped_boxplot};
pub use charts::{render_metric_lines, render_startup_bars};

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },
    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("nothing to plot for {0}")]
    Empty(String),
}

/// Metric shown in a box plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlotMetric {
    /// Start-up latency (creation to scheduling).
    Startup,
    /// Queue time behind the previous pod.
    Queue,
    /// Start-up latency minus the previous pod's queue time.
    Scheduling,
}

impl PlotMetric {
    /// Per-pod values of this metric.
    pub fn per_pod<'a>(&self, series: &'a MetricSeries) -> &'a [f64] {
        match self {
            PlotMetric::Startup => &series.durations,
            PlotMetric::Queue => &series.queue_times,
            PlotMetric::Scheduling => &series.scheduling_latencies,
        }
    }

    /// Aggregate of this metric in one summary.
    pub fn average(&self, summary: &BatchSummary) -> f64 {
        match self {
            PlotMetric::Startup => summary.average_startup_latency,
            PlotMetric::Queue => summary.average_queue_time,
            PlotMetric::Scheduling => summary.average_scheduling_latency,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PlotMetric::Startup => "Start-up Time",
            PlotMetric::Queue => "Queue Time",
            PlotMetric::Scheduling => "Scheduling Latencies",
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            PlotMetric::Startup => "start_up_time",
            PlotMetric::Queue => "queue_times",
            PlotMetric::Scheduling => "scheduling_latencies",
        }
    }
}

/// Which values make up one box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Distribution {
    /// Every pod of the batch.
    #[default]
    PerPod,
    /// One average per repeated run.
    PerRun,
}

impl Distribution {
    pub fn axis_label(&self, metric: PlotMetric) -> String {
        match self {
            Distribution::PerPod => format!("{} (seconds)", metric.title()),
            Distribution::PerRun => format!("Average {} (seconds)", metric.title()),
        }
    }

    pub fn file_name(&self, experiment: &str, metric: PlotMetric) -> String {
        match self {
            Distribution::PerPod => format!("{experiment}_boxplot_{}.svg", metric.file_stem()),
            Distribution::PerRun => format!("avg_{experiment}_boxplot_{}.svg", metric.file_stem()),
        }
    }
}

/// Colour of the n-th setup.
pub fn series_color(idx: usize) -> RGBAColor {
    Palette99::pick(idx).to_rgba()
}
