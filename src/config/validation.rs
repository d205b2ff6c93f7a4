//! Configuration and measurement validation rules
//!
//! Findings are leveled: `Error` findings on a measurement set reject it
//! before fitting, `Warning` and `Info` findings flag inputs that fit but
//! may mislead.

use crate::{
    error::Result,
    models::{Config, MeasurementSet},
    stats::MIN_MEASUREMENTS,
};
use colored::Colorize;

/// Predictions further than this multiple of the largest observed
/// concurrency are flagged as extrapolation.
pub const EXTRAPOLATION_FACTOR: f64 = 2.0;

/// Configuration validator with advanced validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_predictions(&config.predictions));
        Ok(warnings)
    }

    fn validate_predictions(predictions: &[f64]) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        let mut sorted = predictions.to_vec();
        sorted.sort_by(f64::total_cmp);
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Duplicate prediction levels will be reported more than once".to_string(),
            ));
        }

        if let Some(n) = predictions.iter().find(|n| n.fract() != 0.0) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Prediction level {} is not a whole number of workers", n),
            ));
        }

        warnings
    }

    /// Check a measurement set against the configuration before fitting
    pub fn validate_measurements(measurements: &MeasurementSet, config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        let invalid = measurements
            .iter()
            .filter(|m| {
                [m.concurrency, m.throughput, m.latency]
                    .iter()
                    .any(|v| !v.is_finite() || *v <= 0.0)
            })
            .count();
        if invalid > 0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Error,
                format!("{} measurement(s) have zero, negative or non-finite values", invalid),
            ));
        }

        if measurements.len() >= MIN_MEASUREMENTS && measurements.distinct_concurrency_levels() < 3 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Error,
                "At least 3 distinct concurrency levels are needed to fit the model".to_string(),
            ));
        }

        if let Some((lowest, highest)) = measurements.concurrency_range() {
            if lowest > 1.0 {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!(
                        "Lowest concurrency is {}; single-worker throughput is extrapolated from it",
                        lowest
                    ),
                ));
            }

            for &n in &config.predictions {
                if n > highest * EXTRAPOLATION_FACTOR {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!(
                            "Prediction at {} is far beyond the largest measured concurrency {}",
                            n, highest
                        ),
                    ));
                }
            }
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let label = self.level.as_str();
        if !use_color {
            return format!("[{}] {}", label, self.message);
        }

        let label = match self.level {
            ValidationLevel::Info => label.blue(),
            ValidationLevel::Warning => label.yellow(),
            ValidationLevel::Error => label.red(),
        };
        format!("[{}] {}", label.bold(), self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Measurement;

    fn set(levels: &[f64]) -> MeasurementSet {
        levels
            .iter()
            .map(|&n| Measurement::from_concurrency_and_throughput(n, n * 10.0))
            .collect()
    }

    #[test]
    fn test_default_config_has_no_warnings() {
        let warnings = validate_config(&Config::default()).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_invalid_config_is_error() {
        let mut config = Config::default();
        config.predictions = vec![-4.0];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_prediction_warnings() {
        let mut config = Config::default();
        config.predictions = vec![8.0, 8.0, 2.5];
        let warnings = validate_config(&config).unwrap();

        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.level == ValidationLevel::Info));
    }

    #[test]
    fn test_clean_measurements() {
        let warnings = ConfigValidator::validate_measurements(&set(&[1.0, 2.0, 4.0, 8.0, 16.0, 32.0]), &Config::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_non_positive_measurements_flagged() {
        let mut measurements = set(&[1.0, 2.0, 4.0]);
        measurements.push(Measurement::from_concurrency_and_throughput(8.0, 0.0));
        let warnings = ConfigValidator::validate_measurements(&measurements, &Config::default());

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, ValidationLevel::Error);
        assert!(warnings[0].message.starts_with("1 measurement(s)"));
    }

    #[test]
    fn test_too_few_levels_flagged() {
        let warnings =
            ConfigValidator::validate_measurements(&set(&[1.0, 1.0, 1.0, 4.0, 4.0, 4.0]), &Config::default());
        assert!(warnings
            .iter()
            .any(|w| w.level == ValidationLevel::Error && w.message.contains("distinct")));
    }

    #[test]
    fn test_extrapolation_flagged() {
        let mut config = Config::default();
        config.predictions = vec![16.0, 200.0];
        let warnings = ConfigValidator::validate_measurements(&set(&[2.0, 4.0, 8.0, 16.0, 32.0, 64.0]), &config);

        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].message.contains("Lowest concurrency is 2"));
        assert!(warnings[1].message.contains("200"));
    }

    #[test]
    fn test_warning_format() {
        let warning = ValidationWarning::new(ValidationLevel::Warning, "careful".to_string());
        assert_eq!(warning.format(false), "[WARNING] careful");
        assert!(warning.format(true).contains("careful"));
    }
}
