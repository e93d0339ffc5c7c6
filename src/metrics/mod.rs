//! Metric Calculator: start-up latency, queue time and scheduling latency.
//!
//! One calculator covers both reporting styles: a single aggregate per batch, and
//! (with a run size) one aggregate per repeated run for box-plot distributions.

pub mod chunk;
pub mod series;
pub mod summary;

use std::num::NonZeroUsize;

use crate::timeline::Timeline;

pub use chunk::split_runs;
pub use series::{MetricSeries, scheduling_latencies};
pub use summary::{BatchSummary, mean_or_zero, population_std_dev_or_zero};

/// Derives metrics from a reconstructed timeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricCalculator {
    run_size: Option<NonZeroUsize>,
}

impl MetricCalculator {
    /// Single aggregate per batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Additionally reports one summary per run of `run_size` pods.
    pub fn with_run_size(run_size: NonZeroUsize) -> Self {
        Self {
            run_size: Some(run_size),
        }
    }

    pub fn run_size(&self) -> Option<NonZeroUsize> {
        self.run_size
    }

    pub fn compute(&self, timeline: &Timeline) -> BatchMetrics {
        let series = MetricSeries::from_timeline(timeline);
        let summary = BatchSummary::from_series(&series);
        let runs = match self.run_size {
            Some(size) => split_runs(&series, size)
                .iter()
                .map(BatchSummary::from_series)
                .collect(),
            None => Vec::new(),
        };

        BatchMetrics {
            series,
            summary,
            runs,
        }
    }
}

/// Everything derived for one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchMetrics {
    pub series: MetricSeries,
    pub summary: BatchSummary,
    /// Per-run summaries; empty unless a run size was set.
    pub runs: Vec<BatchSummary>,
}
