//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/focusmania/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/focusmania/` (~/.config/focusmania/)
//! - Data: `$XDG_DATA_HOME/focusmania/` (~/.local/share/focusmania/)
//! - State/Logs: `$XDG_STATE_HOME/focusmania/` (~/.local/state/focusmania/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Task log locations
    #[serde(default)]
    pub data: DataConfig,

    /// Classifier and evaluation settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where task logs are read from and written to
#[derive(Debug, Deserialize)]
pub struct DataConfig {
    /// Directory holding the raw and cleaned CSV files
    /// (defaults to the XDG data directory)
    pub dir: Option<PathBuf>,

    /// File name of the raw task log
    #[serde(default = "default_raw_file")]
    pub raw_file: String,

    /// File name of the cleaned task log
    #[serde(default = "default_cleaned_file")]
    pub cleaned_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: None,
            raw_file: default_raw_file(),
            cleaned_file: default_cleaned_file(),
        }
    }
}

impl DataConfig {
    /// Directory holding the task logs.
    pub fn data_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(Config::data_dir)
    }

    /// Full path of the raw task log.
    pub fn raw_path(&self) -> PathBuf {
        self.data_dir().join(&self.raw_file)
    }

    /// Full path of the cleaned task log.
    pub fn cleaned_path(&self) -> PathBuf {
        self.data_dir().join(&self.cleaned_file)
    }
}

fn default_raw_file() -> String {
    "productivity_data.csv".to_string()
}

fn default_cleaned_file() -> String {
    "cleaned_productivity_data.csv".to_string()
}

/// Random forest, logistic baseline and split settings
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Number of trees in the forest
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,

    /// Seed for bootstrap sampling, feature sampling and splits
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Maximum tree depth (unlimited when absent)
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Minimum samples a node needs before it may split
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,

    /// Minimum samples on each side of a split
    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,

    /// Fraction of rows held out by `focusmania-compare`
    #[serde(default = "default_test_size")]
    pub test_size: f64,

    /// Gradient descent iterations for the logistic baseline
    #[serde(default = "default_logistic_max_iter")]
    pub logistic_max_iter: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_estimators: default_n_estimators(),
            seed: default_seed(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            min_samples_leaf: default_min_samples_leaf(),
            test_size: default_test_size(),
            logistic_max_iter: default_logistic_max_iter(),
        }
    }
}

impl ModelConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(Error::Config(
                "model.n_estimators must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(Error::Config(
                "model.min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(Error::Config(
                "model.min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(Error::Config(
                "model.max_depth must be at least 1 when set".to_string(),
            ));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(Error::Config(
                "model.test_size must be between 0 and 1 (exclusive)".to_string(),
            ));
        }
        if self.logistic_max_iter == 0 {
            return Err(Error::Config(
                "model.logistic_max_iter must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_n_estimators() -> usize {
    100
}

fn default_seed() -> u64 {
    42
}

fn default_min_samples_split() -> usize {
    2
}

fn default_min_samples_leaf() -> usize {
    1
}

fn default_test_size() -> f64 {
    0.2
}

fn default_logistic_max_iter() -> usize {
    1000
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.model.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/focusmania/config.toml` (~/.config/focusmania/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("focusmania").join("config.toml")
    }

    /// Returns the data directory path (for task logs)
    ///
    /// `$XDG_DATA_HOME/focusmania/` (~/.local/share/focusmania/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("focusmania")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/focusmania/` (~/.local/state/focusmania/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("focusmania")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.n_estimators, 100);
        assert_eq!(config.model.seed, 42);
        assert_eq!(config.model.max_depth, None);
        assert_eq!(config.model.test_size, 0.2);
        assert_eq!(config.data.cleaned_file, "cleaned_productivity_data.csv");
        assert!(config.model.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[data]
dir = "/tmp/focus"
cleaned_file = "clean.csv"

[model]
n_estimators = 25
seed = 7
max_depth = 6

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.data.cleaned_path(), PathBuf::from("/tmp/focus/clean.csv"));
        assert_eq!(
            config.data.raw_path(),
            PathBuf::from("/tmp/focus/productivity_data.csv")
        );
        assert_eq!(config.model.n_estimators, 25);
        assert_eq!(config.model.seed, 7);
        assert_eq!(config.model.max_depth, Some(6));
        assert_eq!(config.model.min_samples_split, 2);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_model_config_validation() {
        let config = ModelConfig {
            n_estimators: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ModelConfig {
            test_size: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ModelConfig {
            min_samples_split: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ModelConfig {
            max_depth: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_rejects_invalid_model() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[model]\nn_estimators = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
