use crate::application::batch::BatchInput;
use crate::domain::activity::ActivityOptions;
use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Task list used when none is configured
pub const DEFAULT_TASK_LIST: &str = "cadenza-worker";

/// Log filter used when none is configured
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Worker configuration, usually loaded from YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkerConfig {
    /// Name the worker identifies itself by in logs
    pub task_list: String,

    /// `tracing` filter directive; `RUST_LOG` takes precedence
    pub log_filter: String,

    /// Options applied to every activity dispatch
    pub activity: ActivityOptions,

    /// Shape of batch runs started by the worker
    pub batch: BatchInput,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            task_list: DEFAULT_TASK_LIST.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            activity: ActivityOptions::default(),
            batch: BatchInput::default(),
        }
    }
}

impl WorkerConfig {
    /// Parse, fill defaults and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CoreError> {
        let mut config: WorkerConfig = serde_yaml::from_str(yaml)
            .map_err(|e| CoreError::ConfigurationError(format!("invalid worker config: {}", e)))?;
        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading worker config");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Replace blank names with defaults
    pub fn apply_defaults(&mut self) {
        if self.task_list.trim().is_empty() {
            self.task_list = DEFAULT_TASK_LIST.to_string();
        }
        if self.log_filter.trim().is_empty() {
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }
    }

    /// Reject values no worker can run with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.task_list.trim().is_empty() {
            return Err(CoreError::ConfigurationError(
                "task_list must not be empty".to_string(),
            ));
        }
        if self.activity.start_to_close_timeout_ms == Some(0) {
            return Err(CoreError::ConfigurationError(
                "activity.start_to_close_timeout_ms must be greater than zero".to_string(),
            ));
        }
        self.batch.validate()
    }
}
