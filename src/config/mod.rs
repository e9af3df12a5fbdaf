//! Configuration loading and management

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;
use crate::core::query::{PageSizeOptions, STANDARD_PAGE_SIZES};
use crate::storage::{FileSessionStorage, InMemorySessionStorage, SessionStorage};

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the API paths are appended to
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3005".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Table defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Initial page size; must be one of `page_size_options`
    pub page_size: usize,

    pub page_size_options: Vec<usize>,

    /// Quiet period of the global filter input, in milliseconds
    pub debounce_ms: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: STANDARD_PAGE_SIZES[0],
            page_size_options: STANDARD_PAGE_SIZES.to_vec(),
            debounce_ms: 500,
        }
    }
}

impl TableConfig {
    pub fn page_sizes(&self) -> PageSizeOptions {
        PageSizeOptions::new(self.page_size_options.iter().copied())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Background refresh settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Period of the task list reload, in seconds
    pub task_refresh_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            task_refresh_secs: 60,
        }
    }
}

impl PollingConfig {
    pub fn task_refresh(&self) -> Duration {
        Duration::from_secs(self.task_refresh_secs)
    }
}

/// Session persistence of the inventory mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Key the inventory collection is stored under
    pub namespace: String,

    /// Directory for file-backed sessions; in-memory when absent
    pub storage_dir: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            namespace: "inventory".to_string(),
            storage_dir: None,
        }
    }
}

impl SessionConfig {
    /// Open a new session on the configured backend
    pub fn open_storage(&self) -> Arc<dyn SessionStorage> {
        match &self.storage_dir {
            Some(dir) => Arc::new(FileSessionStorage::new(dir)),
            None => Arc::new(InMemorySessionStorage::new()),
        }
    }
}

/// Complete configuration of the household client
///
/// Every section and key is optional; missing values fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdConfig {
    pub api: ApiConfig,
    pub table: TableConfig,
    pub polling: PollingConfig,
    pub session: SessionConfig,
}

impl HouseholdConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                value: self.api.base_url.clone(),
                message: "must not be empty".to_string(),
            });
        }

        if self.table.page_size_options.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "table.page_size_options".to_string(),
                value: "[]".to_string(),
                message: "at least one page size is required".to_string(),
            });
        }

        if !self.table.page_size_options.contains(&self.table.page_size) {
            return Err(ConfigError::InvalidValue {
                field: "table.page_size".to_string(),
                value: self.table.page_size.to_string(),
                message: format!("must be one of {:?}", self.table.page_size_options),
            });
        }

        if self.polling.task_refresh_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.task_refresh_secs".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
