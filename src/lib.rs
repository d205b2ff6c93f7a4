//! USL Planner
//!
//! Builds Universal Scalability Law models from measurements of a system's
//! concurrency, throughput and latency, and answers capacity-planning
//! questions from the fitted model: where throughput peaks, what latency to
//! expect at a given load, and which penalty limits scaling.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod models;
pub mod output;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, Measurement, MeasurementSet, Model};
pub use output::{ColoredFormatter, OutputCoordinator, OutputFormatter, OutputFormatterFactory, PlainFormatter};
pub use stats::{ModelFitter, ModelReport, Prediction};
pub use types::{ColumnPair, Constraint, OutputFormat};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata emitted by the build script
pub mod build_info {
    pub const BUILD_TIME: &str = env!("BUILD_TIME");
    pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
    pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");
}

/// Default configuration values
pub mod defaults {
    pub use crate::stats::MIN_MEASUREMENTS;
    use crate::types::{ColumnPair, OutputFormat};

    pub const DEFAULT_COLUMNS: ColumnPair = ColumnPair::ConcurrencyThroughput;
    pub const DEFAULT_FORMAT: OutputFormat = OutputFormat::Text;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    /// Upper bound on `--predict` levels per run
    pub const MAX_PREDICTIONS: usize = 64;
}
