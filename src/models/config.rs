//! Configuration data model and validation

use crate::types::{AppError, ColumnPair, OutputFormat, Result};
use serde::{Deserialize, Serialize};

/// Environment variable names understood by [`Config::merge_from_env`]
pub mod env_keys {
    pub const COLUMNS: &str = "USL_COLUMNS";
    pub const FORMAT: &str = "USL_FORMAT";
    pub const PREDICT: &str = "USL_PREDICT";
    pub const ENABLE_COLOR: &str = "USL_ENABLE_COLOR";
}

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Measurement file path, `-` for stdin
    #[serde(default)]
    pub input: Option<String>,

    /// Which two quantities each input row holds
    #[serde(default)]
    pub columns: ColumnPair,

    /// Report format
    #[serde(default)]
    pub format: OutputFormat,

    /// Concurrency levels to predict throughput and latency at
    #[serde(default)]
    pub predictions: Vec<f64>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            columns: crate::defaults::DEFAULT_COLUMNS,
            format: crate::defaults::DEFAULT_FORMAT,
            predictions: Vec::new(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            if input.trim().is_empty() {
                return Err(AppError::config("Input path cannot be empty"));
            }
        }

        for &n in &self.predictions {
            if !n.is_finite() || n <= 0.0 {
                return Err(AppError::config(format!(
                    "Prediction concurrency must be a positive number, got {}",
                    n
                )));
            }
        }

        if self.predictions.len() > crate::defaults::MAX_PREDICTIONS {
            return Err(AppError::config(format!(
                "At most {} prediction levels are supported",
                crate::defaults::MAX_PREDICTIONS
            )));
        }

        Ok(())
    }

    /// Merge process environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_lookup(|key| std::env::var(key).ok())
    }

    /// Merge values from an arbitrary key lookup (process env, .env map, tests)
    pub fn merge_from_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(columns) = lookup(env_keys::COLUMNS) {
            self.columns = columns.parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", env_keys::COLUMNS, columns, e)))?;
        }

        if let Some(format) = lookup(env_keys::FORMAT) {
            self.format = format.parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", env_keys::FORMAT, format, e)))?;
        }

        if let Some(predict) = lookup(env_keys::PREDICT) {
            self.predictions = parse_prediction_list(&predict)
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", env_keys::PREDICT, predict, e)))?;
        }

        if let Some(enable_color) = lookup(env_keys::ENABLE_COLOR) {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", env_keys::ENABLE_COLOR, enable_color, e)))?;
        }

        Ok(())
    }
}

/// Parse a comma-separated list of concurrency levels
pub fn parse_prediction_list(value: &str) -> Result<Vec<f64>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(AppError::from))
        .collect()
}

// Default value functions for serde
fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
