//! Results table export: one row per (setup, instance count) batch.
//!
//! The table is comma-space separated with a fixed header:
//!
//! ```text
//! setup, instances, average start-up time, start-up time std dev, average queue time, scheduling latency
//! base, 1, 1.75, 0.25, 0.5, 1.5
//! ```
//!
//! Rows are flushed as soon as they are appended, so a batch failing later in an
//! experiment leaves the rows written before it intact.

use std::{
    fs::{File, create_dir_all},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::experiment::BatchResult;

pub const RESULTS_HEADER: [&str; 6] = [
    "setup",
    "instances",
    "average start-up time",
    "start-up time std dev",
    "average queue time",
    "scheduling latency",
];

const SEPARATOR: &str = ", ";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write results to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read results from {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// One line of the results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub setup: String,
    pub instances: u32,
    #[serde(rename = "average start-up time")]
    pub average_startup_time: f64,
    #[serde(rename = "start-up time std dev")]
    pub startup_std_dev: f64,
    #[serde(rename = "average queue time")]
    pub average_queue_time: f64,
    #[serde(rename = "scheduling latency")]
    pub scheduling_latency: f64,
}

impl ResultRow {
    fn to_line(&self) -> String {
        [
            self.setup.clone(),
            self.instances.to_string(),
            self.average_startup_time.to_string(),
            self.startup_std_dev.to_string(),
            self.average_queue_time.to_string(),
            self.scheduling_latency.to_string(),
        ]
        .join(SEPARATOR)
    }
}

impl From<&BatchResult> for ResultRow {
    fn from(result: &BatchResult) -> Self {
        let summary = &result.metrics.summary;
        Self {
            setup: result.setup.clone(),
            instances: result.instances,
            average_startup_time: summary.average_startup_latency,
            startup_std_dev: summary.startup_std_dev,
            average_queue_time: summary.average_queue_time,
            scheduling_latency: summary.average_scheduling_latency,
        }
    }
}

/// Append-only writer for the results table.
pub struct ResultsWriter<W: Write> {
    out: W,
    path: PathBuf,
    rows: usize,
}

impl ResultsWriter<BufWriter<File>> {
    /// Creates (or truncates) the results file and writes the header.
    /// Missing parent directories are created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let path = path.as_ref().to_path_buf();
        let io_err = |source| ExportError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent).map_err(io_err)?;
        }
        let file = File::create(&path).map_err(io_err)?;
        info!("Writing results to {}", path.display());

        Self::new(BufWriter::new(file), path)
    }
}

impl<W: Write> ResultsWriter<W> {
    pub fn new(out: W, path: PathBuf) -> Result<Self, ExportError> {
        let mut writer = Self { out, path, rows: 0 };
        writer.write_line(&RESULTS_HEADER.join(SEPARATOR))?;
        Ok(writer)
    }

    /// Appends one row and flushes it.
    pub fn append(&mut self, row: &ResultRow) -> Result<(), ExportError> {
        self.write_line(&row.to_line())?;
        self.rows += 1;
        debug!("results row {}: {} x {}", self.rows, row.setup, row.instances);
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) -> Result<(), ExportError> {
        writeln!(self.out, "{line}")
            .and_then(|_| self.out.flush())
            .map_err(|source| ExportError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// Reads a results table written by [`ResultsWriter`]. Whitespace around fields is ignored.
pub fn read_results<P: AsRef<Path>>(path: P) -> Result<Vec<ResultRow>, ExportError> {
    let path = path.as_ref();
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    reader
        .deserialize()
        .collect::<Result<Vec<ResultRow>, csv::Error>>()
        .map_err(csv_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(setup: &str, instances: u32, startup: f64) -> ResultRow {
        ResultRow {
            setup: setup.to_string(),
            instances,
            average_startup_time: startup,
            startup_std_dev: 0.25,
            average_queue_time: 0.5,
            scheduling_latency: 1.5,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let mut writer = ResultsWriter::new(Vec::new(), PathBuf::from("mem")).unwrap();
        writer.append(&row("base", 1, 1.75)).unwrap();
        writer.append(&row("base", 5, 0.0)).unwrap();
        assert_eq!(writer.rows_written(), 2);

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            text,
            "setup, instances, average start-up time, start-up time std dev, average queue time, scheduling latency\n\
             base, 1, 1.75, 0.25, 0.5, 1.5\n\
             base, 5, 0, 0.25, 0.5, 1.5\n"
        );
    }

    #[test]
    fn reads_back_what_was_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results").join("experiment.csv");

        let rows = vec![row("1_worker", 1, 1.75), row("2_worker", 10, 0.125)];
        let mut writer = ResultsWriter::create(&path).unwrap();
        for r in &rows {
            writer.append(r).unwrap();
        }
        drop(writer);

        assert_eq!(read_results(&path).unwrap(), rows);
    }

    #[test]
    fn missing_results_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_results(dir.path().join("none.csv")).unwrap_err();
        assert!(matches!(err, ExportError::Csv { .. }));
    }
}
