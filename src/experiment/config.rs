//! Experiment configuration: which log files to read and which batches to compute.
//!
//! ```toml
//! name = "experiment_4"
//! instances = [1, 5, 10, 25, 50, 100]
//! log_path_template = "./log-outputs/pod_event_logs_{setup}-1-100.txt"
//! output = "./results/experiment_4_results.csv"
//! images_dir = "./images"
//!
//! [[setups]]
//! name = "1_worker"
//! label = "1 Worker Node"
//! log_file = "./log-outputs/pod_event_logs_1_worker-1-50.txt"
//! skip_instances = [100]
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder replaced with the setup name in `log_path_template`.
pub const SETUP_PLACEHOLDER: &str = "{setup}";

pub const DEFAULT_LOG_PATH_TEMPLATE: &str = "./log-outputs/pod_event_logs_{setup}-1-100.txt";
pub const DEFAULT_IMAGES_DIR: &str = "./images";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("no preset for experiment {0} (known: 2, 3, 4)")]
    UnknownPreset(u32),
}

/// One experiment configuration (cluster setup) and its log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupConfig {
    pub name: String,
    /// Legend label for plots; defaults to `name`.
    #[serde(default)]
    pub label: Option<String>,
    /// Log file for this setup, overriding the experiment's path template.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Instance counts this setup was not run with.
    #[serde(default)]
    pub skip_instances: Vec<u32>,
}

impl SetupConfig {
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: Some(label.to_string()),
            log_file: None,
            skip_instances: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn includes(&self, instances: u32) -> bool {
        !self.skip_instances.contains(&instances)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub name: String,
    pub setups: Vec<SetupConfig>,
    pub instances: Vec<u32>,
    #[serde(default = "default_log_path_template")]
    pub log_path_template: String,
    /// Results table path.
    pub output: PathBuf,
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
}

fn default_log_path_template() -> String {
    DEFAULT_LOG_PATH_TEMPLATE.to_string()
}

fn default_images_dir() -> PathBuf {
    PathBuf::from(DEFAULT_IMAGES_DIR)
}

impl ExperimentConfig {
    /// Loads and validates a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.setups.is_empty() {
            return Err(ConfigError::Invalid("no setups configured".into()));
        }
        if self.instances.is_empty() {
            return Err(ConfigError::Invalid("no instance counts configured".into()));
        }
        if self.instances.contains(&0) {
            return Err(ConfigError::Invalid("instance counts must be positive".into()));
        }
        for setup in &self.setups {
            if setup.name.is_empty() || setup.name.contains(',') {
                return Err(ConfigError::Invalid(format!(
                    "setup name `{}` must be non-empty and free of commas",
                    setup.name
                )));
            }
            if setup.log_file.is_none() && !self.log_path_template.contains(SETUP_PLACEHOLDER) {
                return Err(ConfigError::Invalid(format!(
                    "log_path_template `{}` lacks {SETUP_PLACEHOLDER} and setup `{}` has no log_file",
                    self.log_path_template, setup.name
                )));
            }
        }
        Ok(())
    }

    /// Log file of a setup: its own `log_file`, or the template with the setup name filled in.
    pub fn log_path(&self, setup: &SetupConfig) -> PathBuf {
        match &setup.log_file {
            Some(path) => path.clone(),
            None => PathBuf::from(
                self.log_path_template
                    .replace(SETUP_PLACEHOLDER, &setup.name),
            ),
        }
    }

    /// Instance counts computed for a setup, in configured order.
    pub fn instances_for<'a>(&'a self, setup: &'a SetupConfig) -> impl Iterator<Item = u32> + 'a {
        self.instances
            .iter()
            .copied()
            .filter(move |&n| setup.includes(n))
    }

    pub fn setup(&self, name: &str) -> Option<&SetupConfig> {
        self.setups.iter().find(|s| s.name == name)
    }

    /// Legend label for a setup name, falling back to the name itself.
    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.setup(name).map(SetupConfig::label).unwrap_or(name)
    }
}
