//! Command-line interface module

pub mod help;

pub use help::HelpSystem;

use crate::types::{ColumnPair, OutputFormat};
use clap::{ArgAction, Parser};
use std::io::IsTerminal;

/// USL Planner - fit the Universal Scalability Law to load-test measurements
#[derive(Parser, Debug, Clone)]
#[command(name = "usl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Measurement file, or '-' to read from stdin
    #[arg(value_name = "INPUT")]
    pub input: Option<String>,

    /// Which two quantities each row holds
    #[arg(short, long, value_name = "PAIR", value_parser = parse_columns)]
    pub columns: Option<ColumnPair>,

    /// Concurrency level to predict at (repeatable, or comma-separated)
    #[arg(short, long = "predict", value_name = "N", action = ArgAction::Append, value_delimiter = ',', value_parser = parse_concurrency)]
    pub predictions: Vec<f64>,

    /// Report format (text, json)
    #[arg(short, long, value_name = "FORMAT", value_parser = parse_format)]
    pub format: Option<OutputFormat>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Show help for specific topic (input, columns, model, config, output, examples)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.help_topic.is_none() && self.input.is_none() {
            return Err("Must specify an input file, or '-' to read from stdin".to_string());
        }

        Ok(())
    }

    /// Check if help should be displayed for a specific topic
    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Display help for the specified topic or main help
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        match &self.help_topic {
            Some(topic) => help_system.display_topic_help(topic, use_colors).unwrap_or_else(|| {
                format!(
                    "Unknown help topic: '{}'\n\nAvailable topics: {}\n\n{}",
                    topic,
                    help::HELP_TOPICS.join(", "),
                    help_system.display_main_help(use_colors)
                )
            }),
            None => help_system.display_main_help(use_colors),
        }
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Configuration Summary:\n");
        summary.push_str(&format!("  Input: {}\n", self.input.as_deref().unwrap_or("(none)")));
        if let Some(columns) = self.columns {
            summary.push_str(&format!("  Columns: {}\n", columns));
        }
        if !self.predictions.is_empty() {
            let levels: Vec<String> = self.predictions.iter().map(|n| n.to_string()).collect();
            summary.push_str(&format!("  Predictions: {}\n", levels.join(", ")));
        }
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        summary
    }
}

fn parse_columns(s: &str) -> Result<ColumnPair, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid column pair '{}': expected concurrency-throughput, concurrency-latency or throughput-latency",
            s
        )
    })
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse().map_err(|_| format!("Invalid format '{}': expected text or json", s))
}

/// Parse a positive concurrency level
fn parse_concurrency(s: &str) -> Result<f64, String> {
    let n: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid concurrency: {}", s))?;
    if !n.is_finite() || n <= 0.0 {
        return Err(format!("Concurrency must be a positive number, got {}", s));
    }
    Ok(n)
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    std::io::stdout().is_terminal()
}
