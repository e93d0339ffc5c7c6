//! Built-in configurations for the reference experiments.
//!
//! - 2: stock scheduler vs. extended scheduler with and without the extension algorithm
//! - 3: round-robin scheduling with 0s, 1s and 5s sleeps
//! - 4: one to five worker nodes (the single-node cluster only ran up to 50 pods)

use std::path::PathBuf;

use crate::experiment::config::{
    ConfigError, DEFAULT_IMAGES_DIR, DEFAULT_LOG_PATH_TEMPLATE, ExperimentConfig, SetupConfig,
};

pub const REFERENCE_INSTANCES: [u32; 6] = [1, 5, 10, 25, 50, 100];

pub const KNOWN_PRESETS: [u32; 3] = [2, 3, 4];

/// Returns the configuration of a reference experiment.
pub fn preset(experiment: u32) -> Result<ExperimentConfig, ConfigError> {
    let setups = match experiment {
        2 => vec![
            SetupConfig::new("base", "Stock Knative Serving"),
            SetupConfig::new("default_custom", "FlexSched w/o Ext. Algorithm"),
            SetupConfig::new("ext_custom", "FlexSched with Ext. Algorithm"),
        ],
        3 => vec![
            SetupConfig::new("rr_sleep_0s", "Round Robin (Sleep 0s)"),
            SetupConfig::new("rr_sleep_1s", "Round Robin (Sleep 1s)"),
            SetupConfig::new("rr_sleep_5s", "Round Robin (Sleep 5s)"),
        ],
        4 => vec![
            SetupConfig {
                log_file: Some(PathBuf::from(
                    "./log-outputs/pod_event_logs_1_worker-1-50.txt",
                )),
                skip_instances: vec![100],
                ..SetupConfig::new("1_worker", "1 Worker Node")
            },
            SetupConfig::new("2_worker", "2 Worker Nodes"),
            SetupConfig::new("3_worker", "3 Worker Nodes"),
            SetupConfig::new("4_worker", "4 Worker Nodes"),
            SetupConfig::new("5_worker", "5 Worker Nodes"),
        ],
        other => return Err(ConfigError::UnknownPreset(other)),
    };

    Ok(ExperimentConfig {
        name: format!("experiment_{experiment}"),
        setups,
        instances: REFERENCE_INSTANCES.to_vec(),
        log_path_template: DEFAULT_LOG_PATH_TEMPLATE.to_string(),
        output: PathBuf::from(format!("./results/experiment_{experiment}_results.csv")),
        images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
    })
}
