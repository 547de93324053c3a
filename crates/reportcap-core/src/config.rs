//! Configuration management for reportcap
//!
//! This module provides the capture pipeline configuration: backend base URL,
//! browser executable, deadlines, and the stabilization poll parameters.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Result;

/// Capture pipeline configuration
///
/// Loaded from `reportcap.toml` in the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Base URL of the dashboards application
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chromium/Chrome executable path; discovered from PATH when unset
    #[serde(default)]
    pub browser_path: Option<PathBuf>,

    /// Upper bound on navigation, in seconds
    #[serde(default = "default_navigation_deadline_secs")]
    pub navigation_deadline_secs: u64,

    /// Default timeout applied to individual browser operations, in seconds
    #[serde(default = "default_operation_timeout_secs")]
    pub operation_timeout_secs: u64,

    /// Dynamic-content stabilization parameters
    #[serde(default)]
    pub stabilization: StabilizationConfig,

    /// Directory artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// Parameters for the content-length stabilization poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilizationConfig {
    /// Hard ceiling on total polling time, in seconds
    #[serde(default = "default_stabilization_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling interval, in seconds
    #[serde(default = "default_stabilization_interval_secs")]
    pub interval_secs: u64,

    /// Consecutive unchanged samples required to declare the page stable
    #[serde(default = "default_stabilization_checks")]
    pub required_checks: u32,
}

impl StabilizationConfig {
    /// Maximum number of samples taken before the poll gives up
    pub fn max_samples(&self) -> u32 {
        (self.timeout_secs / self.interval_secs.max(1)) as u32
    }
}

// Default value providers
fn default_base_url() -> String {
    "http://localhost:5601".to_string()
}

fn default_navigation_deadline_secs() -> u64 {
    120
}

fn default_operation_timeout_secs() -> u64 {
    100
}

fn default_stabilization_timeout_secs() -> u64 {
    30
}

fn default_stabilization_interval_secs() -> u64 {
    1
}

fn default_stabilization_checks() -> u32 {
    5
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl CaptureConfig {
    /// Load configuration from `reportcap.toml` under `dir`, or use defaults
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let config_path = dir.join("reportcap.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content).map_err(|e| {
                crate::ReportError::Config(format!("Failed to parse config file: {}", e))
            })?)
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to `reportcap.toml` under `dir`
    pub fn write_default(dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let config_path = dir.join("reportcap.toml");
        let config = Self::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| crate::ReportError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            browser_path: None,
            navigation_deadline_secs: default_navigation_deadline_secs(),
            operation_timeout_secs: default_operation_timeout_secs(),
            stabilization: StabilizationConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for StabilizationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_stabilization_timeout_secs(),
            interval_secs: default_stabilization_interval_secs(),
            required_checks: default_stabilization_checks(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CaptureConfig::default();
        assert_eq!(config.base_url, "http://localhost:5601");
        assert!(config.browser_path.is_none());
        assert_eq!(config.navigation_deadline_secs, 120);
        assert_eq!(config.operation_timeout_secs, 100);
        assert_eq!(config.stabilization.required_checks, 5);
        assert_eq!(config.stabilization.max_samples(), 30);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = CaptureConfig::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(config.base_url, "http://localhost:5601");
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("reportcap.toml"),
            "base_url = \"https://dashboards.internal:5601\"\n\n[stabilization]\ntimeout_secs = 10\n",
        )
        .unwrap();

        let config = CaptureConfig::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(config.base_url, "https://dashboards.internal:5601");
        assert_eq!(config.stabilization.timeout_secs, 10);
        // untouched fields fall back to defaults
        assert_eq!(config.stabilization.required_checks, 5);
        assert_eq!(config.navigation_deadline_secs, 120);
    }

    #[test]
    fn test_write_default_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        CaptureConfig::write_default(temp_dir.path()).unwrap();
        let config = CaptureConfig::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(config.operation_timeout_secs, 100);
    }
}
