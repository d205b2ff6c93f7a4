//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::{AppError, Result},
    models::Config,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    ///
    /// Defaults, then `.env`, then the process environment, then CLI flags.
    pub fn parse(&self) -> Result<Config> {
        self.cli.validate().map_err(AppError::config)?;
        EnvManager::load_env_file(self.cli.debug)?;
        self.parse_with_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an explicit environment lookup
    pub fn parse_with_lookup<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.merge_from_lookup(lookup)?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        config.input = self.cli.input.clone();

        if let Some(columns) = self.cli.columns {
            config.columns = columns;
        }

        if let Some(format) = self.cli.format {
            config.format = format;
        }

        if !self.cli.predictions.is_empty() {
            config.predictions = self.cli.predictions.clone();
        }

        // --color wins over the environment; otherwise the terminal can only turn color off
        if self.cli.color {
            config.enable_color = true;
        } else if !self.cli.use_colors() {
            config.enable_color = false;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!(
                "Final config: columns={}, format={:?}, predictions={}, enable_color={}",
                config.columns,
                config.format,
                config.predictions.len(),
                config.enable_color
            );
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let predictions: Vec<String> = config.predictions.iter().map(|n| n.to_string()).collect();

    let summary = [
        format!("Input: {}", config.input.as_deref().unwrap_or("(none)")),
        format!("Columns: {}", config.columns),
        format!("Format: {:?}", config.format),
        format!(
            "Predictions: {}",
            if predictions.is_empty() { "(none)".to_string() } else { predictions.join(", ") }
        ),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ];

    summary.join("\n")
}
