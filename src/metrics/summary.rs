//! Scalar aggregates over a metric series.

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::metrics::series::MetricSeries;

/// The four aggregates reported per batch (and per run in the batched variant).
///
/// Every field is `0.0` when the underlying series is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub average_startup_latency: f64,
    pub startup_std_dev: f64,
    pub average_queue_time: f64,
    pub average_scheduling_latency: f64,
}

impl BatchSummary {
    pub fn from_series(series: &MetricSeries) -> Self {
        Self {
            average_startup_latency: mean_or_zero(&series.durations),
            startup_std_dev: population_std_dev_or_zero(&series.durations),
            average_queue_time: mean_or_zero(&series.queue_times),
            average_scheduling_latency: mean_or_zero(&series.scheduling_latencies),
        }
    }
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

/// Population standard deviation (divides by N), `0.0` for an empty slice.
pub fn population_std_dev_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().population_std_dev()
}
