//! Main application orchestration and execution

use crate::{
    config::{display_config_summary, validate_config, ConfigValidator, ValidationLevel},
    error::{AppError, Result},
    input::{parse_measurements, read_input},
    logging::{Logger, LoggerFactory},
    models::{Config, MeasurementSet},
    output::OutputCoordinator,
    stats::{ModelFitter, ModelReport},
};

/// Main application struct that coordinates all components
pub struct App {
    config: Config,
    logger: Logger,
}

impl App {
    /// Create a new application instance from a loaded configuration
    pub fn new(config: Config) -> Self {
        let logger = LoggerFactory::new(config.clone()).create_logger("usl");
        Self { config, logger }
    }

    /// Create an application that logs through `logger`
    pub fn with_logger(config: Config, logger: Logger) -> Self {
        Self { config, logger }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read the configured input and render the report
    pub fn run(&self) -> Result<String> {
        let path = self
            .config
            .input
            .as_deref()
            .ok_or_else(|| AppError::config("No input specified"))?;

        if self.config.debug {
            crate::log_debug!(self.logger, "Configuration:\n{}", display_config_summary(&self.config));
        }

        let text = read_input(path)?;
        self.run_on_text(&text)
    }

    /// Parse, fit and render measurements already held in memory
    pub fn run_on_text(&self, text: &str) -> Result<String> {
        let measurements = parse_measurements(text, self.config.columns)?;
        crate::log_info!(
            self.logger,
            "Parsed {} measurements as {}",
            measurements.len(),
            self.config.columns
        );

        let report = self.fit(&measurements)?;
        OutputCoordinator::from_config(&self.config).display_report(&report, &measurements)
    }

    /// Validate and fit a measurement set.
    ///
    /// Error-level findings reject the set before fitting; the rest are logged.
    pub fn fit(&self, measurements: &MeasurementSet) -> Result<ModelReport> {
        let mut warnings = validate_config(&self.config)?;
        warnings.extend(ConfigValidator::validate_measurements(measurements, &self.config));

        if let Some(error) = warnings.iter().find(|w| w.level == ValidationLevel::Error) {
            return Err(AppError::invalid_argument(error.message.clone()));
        }

        for warning in &warnings {
            match warning.level {
                ValidationLevel::Info => crate::log_info!(self.logger, "{}", warning.message),
                _ => crate::log_warn!(self.logger, "{}", warning.message),
            }
        }

        ModelFitter::with_logger(self.logger.clone()).report(measurements, &self.config.predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use crate::models::Model;
    use crate::types::{ColumnPair, OutputFormat};

    fn csv(model: &Model, levels: &[f64]) -> String {
        levels
            .iter()
            .map(|&n| format!("{},{}", n, model.throughput_at_concurrency(n)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn config() -> Config {
        Config {
            enable_color: false,
            ..Config::default()
        }
    }

    #[test]
    fn test_run_on_text() {
        let model = Model::new(0.05, 0.002, 40.0);
        let text = format!("concurrency,throughput\n{}", csv(&model, &[1.0, 2.0, 4.0, 8.0, 16.0, 32.0]));
        let (logger, _) = Logger::capturing("usl", LogLevel::Warn);

        let output = App::with_logger(config(), logger).run_on_text(&text).unwrap();
        assert!(output.contains("Max concurrency:    21"));
    }

    #[test]
    fn test_json_with_latency_columns() {
        let model = Model::new(0.05, 0.002, 40.0);
        let text = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0]
            .iter()
            .map(|&n| format!("{} {}", n, model.latency_at_concurrency(n)))
            .collect::<Vec<_>>()
            .join("\n");
        let config = Config {
            columns: ColumnPair::ConcurrencyLatency,
            format: OutputFormat::Json,
            predictions: vec![64.0],
            ..config()
        };
        let (logger, lines) = Logger::capturing("usl", LogLevel::Warn);

        let output = App::with_logger(config, logger).run_on_text(&text).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!((value["model"]["kappa"].as_f64().unwrap() - 0.002).abs() < 1e-8);

        // 64 is exactly twice the largest level, which is not yet extrapolation
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_warnings_are_logged() {
        let model = Model::new(0.05, 0.002, 40.0);
        let config = Config {
            predictions: vec![500.0],
            ..config()
        };
        let (logger, lines) = Logger::capturing("usl", LogLevel::Warn);

        App::with_logger(config, logger)
            .run_on_text(&csv(&model, &[2.0, 4.0, 8.0, 16.0, 32.0, 64.0]))
            .unwrap();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Lowest concurrency is 2"));
        assert!(lines[1].contains("500"));
    }

    #[test]
    fn test_insufficient_data() {
        let (logger, _) = Logger::capturing("usl", LogLevel::Warn);
        let err = App::with_logger(config(), logger).run_on_text("1,10\n2,19\n").unwrap_err();
        assert_eq!(err, AppError::insufficient_data(6, 2));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_non_positive_measurements_rejected() {
        let text = "-1,65\n2,108\n4,162\n8,222\n16,253\n32,257\n";
        let (logger, _) = Logger::capturing("usl", LogLevel::Warn);

        let err = App::with_logger(config(), logger).run_on_text(text).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(ref msg) if msg.contains("1 measurement(s)")));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_too_few_levels_rejected() {
        let (logger, _) = Logger::capturing("usl", LogLevel::Warn);
        let err = App::with_logger(config(), logger)
            .run_on_text("1,10\n10,90\n1,10\n10,90\n1,10\n10,90\n")
            .unwrap_err();
        assert!(err.to_string().contains("3 distinct concurrency levels"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_input() {
        let err = App::new(config()).run().unwrap_err();
        assert_eq!(err.category(), "CONFIG");
    }
}
