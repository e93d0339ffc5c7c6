//! Pod start-up latency analysis.
//!
//! Reads pod lifecycle event logs produced by cluster experiments, rebuilds a
//! per-pod timeline for every batch of simultaneously started pods, and derives
//! start-up latency, queue time and scheduling latency. Results are written as a
//! comma-space separated table and rendered as SVG charts.
//!
//! ```text
//! log file -> parser -> timeline -> metrics -> results table / plots
//! ```

pub mod experiment;
pub mod metrics;
pub mod parser;
pub mod plot;
pub mod timeline;
pub mod utils;
