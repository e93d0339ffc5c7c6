//! Experiment description and batch driver.

pub mod batch;
pub mod config;
pub mod presets;

pub use batch::{AnalysisError, BatchResult, Breakdown, analyze_batch, run_experiment};
pub use config::{ConfigError, ExperimentConfig, SetupConfig};
pub use presets::preset;
