//! Colored formatter implementation with terminal color support

use super::formatter::{
    format_parameter, format_quantity, FitQuality, FormattingOptions, OutputFormatter, PlainFormatter,
};
use crate::{
    error::Result,
    models::{Measurement, Model},
    stats::{ModelReport, Prediction},
    types::Constraint,
};
use colored::*;

impl FitQuality {
    /// Get color for this fit quality
    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub label: Color,
    pub value: Color,
    pub warning: Color,
    pub error: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            label: Color::Cyan,
            value: Color::BrightWhite,
            warning: Color::Yellow,
            error: Color::Red,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            plain_formatter: PlainFormatter::new(options),
            color_scheme: ColorScheme::default(),
        }
    }

    /// Create a colored formatter with a custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self {
            plain_formatter: PlainFormatter::new(options),
            color_scheme,
        }
    }

    fn section(&self, title: &str) -> String {
        format!("{}", title.color(self.color_scheme.header).bold())
    }

    fn line(&self, label: &str, value: String) -> String {
        format!(
            "{} {}",
            format!("{:<19}", label).color(self.color_scheme.label),
            value.color(self.color_scheme.value)
        )
    }

    fn constraint_color(constraint: Constraint) -> Color {
        match constraint {
            Constraint::Contention => Color::Yellow,
            Constraint::Coherency => Color::Magenta,
            Constraint::Balanced => Color::Green,
        }
    }

    /// Tint the border lines of a plain table, bold its header row
    fn colorize_table(&self, table: &str) -> String {
        let mut header_done = false;
        table
            .lines()
            .map(|line| {
                if line.starts_with('+') {
                    line.color(self.color_scheme.border).to_string()
                } else if !header_done {
                    header_done = true;
                    line.bold().to_string()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "═".repeat(title.chars().count() + 4);
        Ok(format!(
            "{}\n  {}  \n{}",
            border.color(self.color_scheme.header),
            title.color(self.color_scheme.header).bold(),
            border.color(self.color_scheme.header)
        ))
    }

    fn format_model(&self, report: &ModelReport) -> Result<String> {
        let model = &report.model;
        let constraint = format!("{:?}", report.constraint);

        Ok([
            self.section("Model"),
            self.line("Contention (σ):", format_parameter(model.sigma)),
            self.line("Coherency (κ):", format_parameter(model.kappa)),
            self.line("Single worker (λ):", format_quantity(model.lambda)),
            format!(
                "{} {} ({})",
                format!("{:<19}", "Constraint:").color(self.color_scheme.label),
                constraint.color(Self::constraint_color(report.constraint)).bold(),
                report.constraint.description()
            ),
        ]
        .join("\n"))
    }

    fn format_limits(&self, report: &ModelReport) -> Result<String> {
        let mut lines = vec![self.section("Limits")];
        match (report.max_concurrency, report.max_throughput) {
            (Some(concurrency), Some(throughput)) => {
                lines.push(self.line("Max concurrency:", format_quantity(concurrency)));
                lines.push(self.line("Max throughput:", format_quantity(throughput)));
            }
            _ => {
                lines.push(format!(
                    "{} {}",
                    format!("{:<19}", "Limitless:").color(self.color_scheme.label),
                    "throughput never declines (κ = 0)".green()
                ));
            }
        }
        Ok(lines.join("\n"))
    }

    fn format_fit_quality(&self, report: &ModelReport) -> Result<String> {
        let (lowest, highest) = report.concurrency_range;
        let quality = FitQuality::from_r_squared(report.r_squared);

        Ok([
            self.section("Fit"),
            self.line("Measurements:", report.sample_count.to_string()),
            self.line(
                "Concurrency range:",
                format!("{} - {}", format_quantity(lowest), format_quantity(highest)),
            ),
            format!(
                "{} {} ({})",
                format!("{:<19}", "R²:").color(self.color_scheme.label),
                format!("{:.6}", report.r_squared).color(quality.color()).bold(),
                quality.description().color(quality.color())
            ),
        ]
        .join("\n"))
    }

    fn format_predictions(&self, predictions: &[Prediction]) -> Result<String> {
        if predictions.is_empty() {
            return Ok(String::new());
        }
        Ok(format!(
            "{}\n{}",
            self.section("Predictions"),
            self.colorize_table(&self.plain_formatter.prediction_table(predictions))
        ))
    }

    fn format_residuals(&self, model: &Model, measurements: &[Measurement]) -> Result<String> {
        if measurements.is_empty() {
            return Ok(String::new());
        }
        Ok(format!(
            "{}\n{}",
            self.section("Residuals"),
            self.colorize_table(&self.plain_formatter.residual_table(model, measurements))
        ))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}", "⚠".color(self.color_scheme.warning), warning.color(self.color_scheme.warning)))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("{} {}", "✗".color(self.color_scheme.error).bold(), error.color(self.color_scheme.error)))
    }
}
