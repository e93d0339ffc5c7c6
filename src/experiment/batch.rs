//! Batch driver: runs the parser, timeline and calculator for every
//! (setup, instance count) pair of an experiment.

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    experiment::config::ExperimentConfig,
    metrics::{BatchMetrics, MetricCalculator},
    parser::{MalformedLineError, PodPrefix, parse_line},
    timeline::Timeline,
    utils::{export::ExportError, log_reader::LogLines},
};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to read log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}: line matches `{prefix}` but does not fit the event schema: {source}")]
    SchemaMismatch {
        path: PathBuf,
        line: usize,
        prefix: String,
        #[source]
        source: MalformedLineError,
    },
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Whether to additionally break each batch down into repeated runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Breakdown {
    /// One aggregate per batch.
    #[default]
    Batch,
    /// One aggregate per run of `instances` pods as well.
    PerRun,
}

impl Breakdown {
    fn calculator(self, instances: u32) -> MetricCalculator {
        match self {
            Breakdown::Batch => MetricCalculator::new(),
            Breakdown::PerRun => NonZeroUsize::new(instances as usize)
                .map(MetricCalculator::with_run_size)
                .unwrap_or_default(),
        }
    }
}

/// Metrics of one (setup, instance count) batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub setup: String,
    pub label: String,
    pub instances: u32,
    pub metrics: BatchMetrics,
}

/// Computes one batch from an already loaded log.
///
/// Only lines matching `prefix` are parsed. A matching line that fails to parse
/// means the log does not have the expected layout and aborts the batch.
pub fn analyze_batch(
    log: &LogLines,
    path: &Path,
    prefix: &PodPrefix,
    calculator: MetricCalculator,
) -> Result<BatchMetrics, AnalysisError> {
    let mut timeline = Timeline::new();
    let mut matched = 0usize;

    for (line_number, line) in log.numbered().filter(|(_, line)| prefix.matches(line)) {
        let event = parse_line(line).map_err(|source| AnalysisError::SchemaMismatch {
            path: path.to_path_buf(),
            line: line_number,
            prefix: prefix.to_string(),
            source,
        })?;
        timeline.record(event);
        matched += 1;
    }

    debug!(
        "{prefix}: {matched} matching lines, {} pods, {} complete",
        timeline.len(),
        timeline.complete_count()
    );

    Ok(calculator.compute(&timeline))
}

/// Runs every batch of the experiment in configuration order.
///
/// Each setup's log file is read once. `on_result` sees every batch as soon as it is
/// computed, so callers can persist rows before later batches run. The first error
/// stops the experiment.
pub fn run_experiment<F>(
    config: &ExperimentConfig,
    breakdown: Breakdown,
    mut on_result: F,
) -> Result<Vec<BatchResult>, AnalysisError>
where
    F: FnMut(&BatchResult) -> Result<(), AnalysisError>,
{
    let mut results = Vec::new();

    for setup in &config.setups {
        let path = config.log_path(setup);
        info!("[{}] reading {}", setup.name, path.display());

        let log = LogLines::read_from_file(&path).map_err(|source| AnalysisError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("[{}] {} lines loaded", setup.name, log.len());

        for instances in config.instances_for(setup) {
            let prefix = PodPrefix::new(instances);
            let metrics = analyze_batch(&log, &path, &prefix, breakdown.calculator(instances))?;

            if metrics.series.is_empty() {
                warn!(
                    "[{}] no complete pod records for {prefix} in {}",
                    setup.name,
                    path.display()
                );
            }

            let summary = &metrics.summary;
            info!(
                "[{}] instances={} pods={} start-up={:.4}s sd={:.4}s queue={:.4}s scheduling={:.4}s",
                setup.name,
                instances,
                metrics.series.len(),
                summary.average_startup_latency,
                summary.startup_std_dev,
                summary.average_queue_time,
                summary.average_scheduling_latency
            );

            let result = BatchResult {
                setup: setup.name.clone(),
                label: setup.label().to_string(),
                instances,
                metrics,
            };
            on_result(&result)?;
            results.push(result);
        }
    }

    Ok(results)
}
