//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    error::{AppError, Result},
    models::{Measurement, Model},
    stats::{ModelReport, Prediction},
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the fitted parameters and the dominant constraint
    fn format_model(&self, report: &ModelReport) -> Result<String>;

    /// Format peak concurrency and throughput
    fn format_limits(&self, report: &ModelReport) -> Result<String>;

    /// Format sample count, observed range and goodness of fit
    fn format_fit_quality(&self, report: &ModelReport) -> Result<String>;

    /// Format predictions as a table
    fn format_predictions(&self, predictions: &[Prediction]) -> Result<String>;

    /// Format observed against fitted throughput for every measurement
    fn format_residuals(&self, model: &Model, measurements: &[Measurement]) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Include the per-measurement residual table
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Show borders around table
    pub show_borders: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    /// Column header
    pub header: String,
    /// Column alignment
    pub alignment: Alignment,
}

impl Column {
    pub fn right(header: &str) -> Self {
        Self {
            header: header.to_string(),
            alignment: Alignment::Right,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format output: {}", e))
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }

    /// Create a table with the given format and data
    pub(crate) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let widths = self.calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&widths));
            output.push('\n');
        }

        let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
        output.push_str(&self.create_row(&headers, &widths, format));
        output.push('\n');

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&widths));
            output.push('\n');
        }

        for row in rows {
            output.push_str(&self.create_row(row, &widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&widths));
        }

        output.trim_end().to_string()
    }

    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        format
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                rows.iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(column.header.chars().count(), usize::max)
            })
            .collect()
    }

    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for ((cell, &width), column) in data.iter().zip(widths).zip(&format.columns) {
            let padded_cell = align_text(cell, width, column.alignment);

            if format.show_borders {
                row.push(' ');
                row.push_str(&padded_cell);
                row.push_str(" |");
            } else {
                row.push_str(&padded_cell);
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::from("+");
        for &width in widths {
            border.push_str(&"-".repeat(width + 2));
            border.push('+');
        }
        border
    }

    pub(crate) fn prediction_table(&self, predictions: &[Prediction]) -> String {
        let format = TableFormat {
            columns: vec![Column::right("Concurrency"), Column::right("Throughput"), Column::right("Latency")],
            show_borders: self.options.table_borders,
        };
        let rows: Vec<RowData> = predictions
            .iter()
            .map(|p| vec![format_quantity(p.concurrency), format_quantity(p.throughput), format_quantity(p.latency)])
            .collect();
        self.create_table(&format, &rows)
    }

    pub(crate) fn residual_table(&self, model: &Model, measurements: &[Measurement]) -> String {
        let format = TableFormat {
            columns: vec![
                Column::right("Concurrency"),
                Column::right("Observed X"),
                Column::right("Fitted X"),
                Column::right("Error"),
            ],
            show_borders: self.options.table_borders,
        };

        let mut sorted = measurements.to_vec();
        sorted.sort_by(|a, b| a.concurrency.total_cmp(&b.concurrency));

        let rows: Vec<RowData> = sorted
            .iter()
            .map(|m| {
                let fitted = model.throughput_at_concurrency(m.concurrency);
                vec![
                    format_quantity(m.concurrency),
                    format_quantity(m.throughput),
                    format_quantity(fitted),
                    format_percentage(relative_error(m.throughput, fitted)),
                ]
            })
            .collect();
        self.create_table(&format, &rows)
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.chars().count() + 4);

        writeln!(output, "{}", border).map_err(fmt_err)?;
        writeln!(output, "  {}  ", title).map_err(fmt_err)?;
        write!(output, "{}", border).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_model(&self, report: &ModelReport) -> Result<String> {
        let mut output = String::new();
        let model = &report.model;

        writeln!(output, "Model:").map_err(fmt_err)?;
        writeln!(output, "------").map_err(fmt_err)?;
        writeln!(output, "Contention (σ):     {}", format_parameter(model.sigma)).map_err(fmt_err)?;
        writeln!(output, "Coherency (κ):      {}", format_parameter(model.kappa)).map_err(fmt_err)?;
        writeln!(output, "Single worker (λ):  {}", format_quantity(model.lambda)).map_err(fmt_err)?;
        write!(
            output,
            "Constraint:         {:?} ({})",
            report.constraint,
            report.constraint.description()
        )
        .map_err(fmt_err)?;

        Ok(output)
    }

    fn format_limits(&self, report: &ModelReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Limits:").map_err(fmt_err)?;
        writeln!(output, "-------").map_err(fmt_err)?;
        match (report.max_concurrency, report.max_throughput) {
            (Some(concurrency), Some(throughput)) => {
                writeln!(output, "Max concurrency:    {}", format_quantity(concurrency)).map_err(fmt_err)?;
                write!(output, "Max throughput:     {}", format_quantity(throughput)).map_err(fmt_err)?;
            }
            _ => {
                write!(output, "Limitless:          throughput never declines (κ = 0)").map_err(fmt_err)?;
            }
        }

        Ok(output)
    }

    fn format_fit_quality(&self, report: &ModelReport) -> Result<String> {
        let mut output = String::new();
        let (lowest, highest) = report.concurrency_range;

        writeln!(output, "Fit:").map_err(fmt_err)?;
        writeln!(output, "----").map_err(fmt_err)?;
        writeln!(output, "Measurements:       {}", report.sample_count).map_err(fmt_err)?;
        writeln!(
            output,
            "Concurrency range:  {} - {}",
            format_quantity(lowest),
            format_quantity(highest)
        )
        .map_err(fmt_err)?;
        write!(
            output,
            "R²:                 {:.6} ({})",
            report.r_squared,
            FitQuality::from_r_squared(report.r_squared).description()
        )
        .map_err(fmt_err)?;

        Ok(output)
    }

    fn format_predictions(&self, predictions: &[Prediction]) -> Result<String> {
        if predictions.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("Predictions:\n{}", self.prediction_table(predictions)))
    }

    fn format_residuals(&self, model: &Model, measurements: &[Measurement]) -> Result<String> {
        if measurements.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("Residuals:\n{}", self.residual_table(model, measurements)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }
}

/// How closely the fitted curve tracks the observed throughput
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl FitQuality {
    pub fn from_r_squared(r_squared: f64) -> Self {
        if r_squared >= 0.99 {
            Self::Excellent
        } else if r_squared >= 0.95 {
            Self::Good
        } else if r_squared >= 0.8 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

pub(crate) fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }

    let padding = " ".repeat(width - len);
    match alignment {
        Alignment::Left => format!("{}{}", text, padding),
        Alignment::Right => format!("{}{}", padding, text),
    }
}

/// σ and κ are often tiny; switch to scientific notation below 0.001
pub fn format_parameter(value: f64) -> String {
    if value != 0.0 && value.is_finite() && value.abs() < 1e-3 {
        format!("{:.4e}", value)
    } else {
        format!("{:.6}", value)
    }
}

/// Throughput, latency and concurrency with precision scaled to magnitude
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value);
    }

    let magnitude = value.abs();
    if magnitude >= 1000.0 {
        format!("{:.1}", value)
    } else if magnitude >= 1.0 {
        format!("{:.3}", value)
    } else {
        format!("{:.6}", value)
    }
}

/// Format percentage with appropriate precision
pub fn format_percentage(percentage: f64) -> String {
    if !percentage.is_finite() {
        return percentage.to_string();
    }
    format!("{:+.2}%", percentage)
}

fn relative_error(observed: f64, fitted: f64) -> f64 {
    (fitted - observed) / observed * 100.0
}
