//! Data models and structures for the USL planner

pub mod config;
pub mod measurement;
pub mod model;

// Re-export main model types
pub use config::Config;
pub use measurement::{Measurement, MeasurementSet};
pub use model::Model;
