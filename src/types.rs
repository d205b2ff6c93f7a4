//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Which two of the three Little's Law quantities a measurement row carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnPair {
    /// Concurrency and throughput; latency is derived
    #[default]
    ConcurrencyThroughput,
    /// Concurrency and latency; throughput is derived
    ConcurrencyLatency,
    /// Throughput and latency; concurrency is derived
    ThroughputLatency,
}

impl ColumnPair {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnPair::ConcurrencyThroughput => "concurrency-throughput",
            ColumnPair::ConcurrencyLatency => "concurrency-latency",
            ColumnPair::ThroughputLatency => "throughput-latency",
        }
    }
}

impl fmt::Display for ColumnPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnPair {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "concurrency-throughput" | "nx" => Ok(ColumnPair::ConcurrencyThroughput),
            "concurrency-latency" | "nr" => Ok(ColumnPair::ConcurrencyLatency),
            "throughput-latency" | "xr" => Ok(ColumnPair::ThroughputLatency),
            _ => Err(AppError::config(format!("Invalid column pair: {}", s))),
        }
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(AppError::config(format!("Invalid output format: {}", s))),
        }
    }
}

/// Which penalty dominates a fitted model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Constraint {
    /// σ > κ: serialization on shared resources dominates
    Contention,
    /// σ < κ: coordination between workers dominates
    Coherency,
    /// σ = κ
    Balanced,
}

impl Constraint {
    pub fn description(&self) -> &'static str {
        match self {
            Constraint::Contention => "contention-constrained",
            Constraint::Coherency => "coherency-constrained",
            Constraint::Balanced => "balanced",
        }
    }
}
