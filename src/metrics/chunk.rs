//! Per-run breakdown for log files holding several repetitions of one batch.
//!
//! Complete records are taken in completion order and cut into consecutive runs of
//! `run_size` pods. Queue times are computed over the whole batch first, so the
//! previous scheduling timestamp carries over from one run into the next.

use std::num::NonZeroUsize;

use log::warn;

use crate::metrics::series::MetricSeries;

/// Splits a batch series into runs of `run_size` pods.
///
/// Inside a run the leading pod has no in-run predecessor, so its scheduling
/// latency is its own start-up latency; the remaining pods follow the
/// previous-queue-time rule of [`MetricSeries`]. A trailing partial run is kept.
pub fn split_runs(series: &MetricSeries, run_size: NonZeroUsize) -> Vec<MetricSeries> {
    let size = run_size.get();
    let runs: Vec<MetricSeries> = series
        .durations
        .chunks(size)
        .zip(series.queue_times.chunks(size))
        .map(|(durations, queue_times)| MetricSeries {
            durations: durations.to_vec(),
            queue_times: queue_times.to_vec(),
            scheduling_latencies: run_scheduling_latencies(durations, queue_times),
        })
        .collect();

    if let Some(last) = runs.last() {
        if last.len() < size {
            warn!(
                "last run holds {} of {} pods; {} complete records are not a multiple of the run size",
                last.len(),
                size,
                series.len()
            );
        }
    }

    runs
}

fn run_scheduling_latencies(durations: &[f64], queue_times: &[f64]) -> Vec<f64> {
    durations
        .iter()
        .enumerate()
        .map(|(j, duration)| match j {
            0 => *duration,
            _ => duration - queue_times[j - 1],
        })
        .collect()
}
