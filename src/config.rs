//! Configuration loading for the task list.
//!
//! Settings live in `<dir>/.tasklist/settings.json`. A missing file yields
//! the defaults; command line flags are applied on top by the binary.
//!
//! # Example settings.json
//!
//! ```json
//! {
//!   "maxHistory": 100,
//!   "dateFormat": "%Y-%m-%d",
//!   "color": false
//! }
//! ```

use crate::error::{Result, TaskListError};
use crate::history::ManagerConfig;
use crate::task::DISPLAY_DATE_FORMAT;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Task list settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListConfig {
    /// Maximum undo depth. Unbounded when absent.
    #[serde(default)]
    pub max_history: Option<usize>,

    /// `chrono` format for parsing due dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Colorize terminal output.
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_date_format() -> String {
    DISPLAY_DATE_FORMAT.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TaskListConfig {
    fn default() -> Self {
        Self {
            max_history: None,
            date_format: default_date_format(),
            color: true,
        }
    }
}

impl TaskListConfig {
    /// Load configuration from a directory
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::Config`] if the settings file exists but
    /// cannot be read or parsed.
    pub fn load(dir: &Path) -> Result<Self> {
        let settings_path = Self::settings_path(dir);

        if !settings_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&settings_path).map_err(|e| {
            TaskListError::config_with_path(format!("failed to read: {}", e), settings_path.clone())
        })?;
        let config: TaskListConfig = serde_json::from_str(&content).map_err(|e| {
            TaskListError::config_with_path(format!("failed to parse: {}", e), settings_path.clone())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Get the settings.json path for a directory
    pub fn settings_path(dir: &Path) -> PathBuf {
        dir.join(".tasklist/settings.json")
    }

    /// Check values that deserialize fine but make no sense.
    ///
    /// # Errors
    ///
    /// Returns [`TaskListError::Config`] describing the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.max_history == Some(0) {
            return Err(TaskListError::config("maxHistory must be at least 1"));
        }
        if self.date_format.trim().is_empty() {
            return Err(TaskListError::config("dateFormat must not be empty"));
        }
        Ok(())
    }

    /// Manager settings derived from this configuration.
    #[must_use]
    pub fn manager_config(&self) -> ManagerConfig {
        let config = ManagerConfig::new().with_date_format(self.date_format.clone());
        match self.max_history {
            Some(max) => config.with_max_history(max),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_settings(dir: &TempDir, content: &str) {
        let path = TaskListConfig::settings_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = TaskListConfig::load(temp.path()).unwrap();
        assert_eq!(config, TaskListConfig::default());
        assert!(config.color);
        assert_eq!(config.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_load_partial_settings() {
        let temp = TempDir::new().unwrap();
        write_settings(&temp, r#"{ "maxHistory": 10 }"#);

        let config = TaskListConfig::load(temp.path()).unwrap();
        assert_eq!(config.max_history, Some(10));
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert!(config.color);
    }

    #[test]
    fn test_load_full_settings() {
        let temp = TempDir::new().unwrap();
        write_settings(
            &temp,
            r#"{ "maxHistory": 3, "dateFormat": "%d/%m/%Y", "color": false }"#,
        );

        let config = TaskListConfig::load(temp.path()).unwrap();
        let manager = config.manager_config();
        assert_eq!(manager.max_history, Some(3));
        assert_eq!(manager.date_format, "%d/%m/%Y");
        assert!(!config.color);
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let temp = TempDir::new().unwrap();
        write_settings(&temp, "{ not json");

        let err = TaskListConfig::load(temp.path()).unwrap_err();
        match err {
            TaskListError::Config { path, message } => {
                assert!(message.contains("failed to parse"));
                assert_eq!(path, Some(TaskListConfig::settings_path(temp.path())));
            }
            other => panic!("Wrong error variant: {other:?}"),
        }
    }

    #[test]
    fn test_zero_max_history_rejected() {
        let temp = TempDir::new().unwrap();
        write_settings(&temp, r#"{ "maxHistory": 0 }"#);
        assert!(TaskListConfig::load(temp.path()).is_err());
    }
}
