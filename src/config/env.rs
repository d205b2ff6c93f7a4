//! Environment variable handling and .env file management

use crate::config::parse_prediction_list;
use crate::error::{AppError, Result};
use crate::models::config::env_keys;
use crate::types::{ColumnPair, OutputFormat};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                eprintln!("Loaded configuration from .env file");
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# USL Planner Configuration
#
# Values set here act as defaults and are overridden by environment
# variables and command-line arguments.

# Which two quantities each measurement row holds:
# concurrency-throughput, concurrency-latency or throughput-latency
# USL_COLUMNS=concurrency-throughput

# Report format (text/json)
# USL_FORMAT=text

# Concurrency levels to predict at (comma-separated)
# USL_PREDICT=32,64,128

# Enable colored output (true/false)
# USL_ENABLE_COLOR=true
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        std::fs::write(path, Self::create_example_env_content())
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            env_keys::COLUMNS => {
                value.parse::<ColumnPair>()?;
            }
            env_keys::FORMAT => {
                value.parse::<OutputFormat>()?;
            }
            env_keys::PREDICT => {
                let levels = parse_prediction_list(value)
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if let Some(bad) = levels.iter().find(|n| !n.is_finite() || **n <= 0.0) {
                    return Err(AppError::config(format!(
                        "{} entries must be positive, got: {}",
                        key, bad
                    )));
                }
            }
            env_keys::ENABLE_COLOR => {
                value
                    .trim()
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            (env_keys::COLUMNS, "Which two quantities each row holds", "concurrency-throughput"),
            (env_keys::FORMAT, "Report format (text/json)", "text"),
            (env_keys::PREDICT, "Comma-separated concurrency levels to predict at", "32,64,128"),
            (env_keys::ENABLE_COLOR, "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<18} {}\n", var, description));
            help.push_str(&format!("  {:<18} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Collect warnings for every supported variable currently set to a bad value
    pub fn validate_current_env() -> Vec<String> {
        Self::validate_lookup(|key| std::env::var(key).ok())
    }

    fn validate_lookup<F>(lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var, _, _)| {
                let value = lookup(var)?;
                Self::validate_env_var(var, &value)
                    .err()
                    .map(|e| format!("Warning: {}", e))
            })
            .collect()
    }
}
