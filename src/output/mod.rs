//! Output formatting and display system
//!
//! Renders a [`ModelReport`] as colored or plain text sections, or as
//! pretty-printed JSON.

mod colored;
mod formatter;

pub use self::colored::{ColorScheme, ColoredFormatter};
pub use self::formatter::{
    format_parameter, format_percentage, format_quantity, Alignment, Column, FitQuality, FormattingOptions,
    OutputFormatter, PlainFormatter, RowData, TableFormat,
};

use crate::{
    error::Result,
    models::{Config, MeasurementSet},
    stats::ModelReport,
    types::OutputFormat,
};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            table_borders: true,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}

/// Main output coordinator that handles all report display
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    format: OutputFormat,
    verbose: bool,
}

impl OutputCoordinator {
    /// Create a new output coordinator with the specified formatter
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self {
            formatter,
            format: OutputFormat::Text,
            verbose: false,
        }
    }

    /// Coordinator matching a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            formatter: OutputFormatterFactory::create_formatter(config.enable_color, config.verbose),
            format: config.format,
            verbose: config.verbose,
        }
    }

    /// Render the complete report in the configured format
    pub fn display_report(&self, report: &ModelReport, measurements: &MeasurementSet) -> Result<String> {
        match self.format {
            OutputFormat::Json => export_json(report),
            OutputFormat::Text => self.display_text(report, measurements),
        }
    }

    fn display_text(&self, report: &ModelReport, measurements: &MeasurementSet) -> Result<String> {
        let mut sections = vec![
            self.formatter.format_header("Universal Scalability Law Fit")?,
            self.formatter.format_model(report)?,
            self.formatter.format_limits(report)?,
            self.formatter.format_fit_quality(report)?,
            self.formatter.format_predictions(&report.predictions)?,
        ];

        if self.verbose {
            sections.push(self.formatter.format_residuals(&report.model, measurements.as_slice())?);
        }

        sections.retain(|s| !s.is_empty());
        Ok(sections.join("\n\n"))
    }

    /// Format warning lines for stderr
    pub fn display_warnings(&self, warnings: &[String]) -> Result<String> {
        let lines = warnings
            .iter()
            .map(|w| self.formatter.format_warning(w))
            .collect::<Result<Vec<_>>>()?;
        Ok(lines.join("\n"))
    }
}

/// Pretty-printed JSON of a report
pub fn export_json(report: &ModelReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
