//! Measurement file parsing
//!
//! One measurement per line, two numbers separated by a comma, semicolon,
//! or whitespace. Blank lines and `#` comments are skipped, and a first
//! data line that does not parse as numbers is treated as a header.

use crate::error::{AppError, ErrorContext, Result};
use crate::models::{Measurement, MeasurementSet};
use crate::types::ColumnPair;
use std::io::Read;

/// Path that selects standard input
pub const STDIN_PATH: &str = "-";

/// Read the raw text of a measurement file, or stdin for [`STDIN_PATH`]
pub fn read_input(path: &str) -> Result<String> {
    if path == STDIN_PATH {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .with_context(|| "Failed to read measurements from stdin".to_string())?;
        return Ok(text);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path))
}

/// Parse measurement rows, interpreting each pair according to `columns`
pub fn parse_measurements(text: &str, columns: ColumnPair) -> Result<MeasurementSet> {
    let mut set = MeasurementSet::new();
    let mut seen_data = false;

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = split_fields(line);
        let values: std::result::Result<Vec<f64>, _> = fields.iter().map(|f| f.parse::<f64>()).collect();

        let values = match values {
            Ok(values) => values,
            Err(_) if !seen_data && fields.iter().all(|f| f.parse::<f64>().is_err()) => {
                // header row
                seen_data = true;
                continue;
            }
            Err(e) => {
                return Err(AppError::parse(format!("line {}: {} in '{}'", line_number, e, line)));
            }
        };
        seen_data = true;

        let measurement = Measurement::from_point(&values, columns).map_err(|e| match e {
            AppError::InvalidArgument(msg) => AppError::invalid_argument(format!("line {}: {}", line_number, msg)),
            other => other,
        })?;
        set.push(measurement);
    }

    Ok(set)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect()
}
