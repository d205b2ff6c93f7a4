//! Fitting engine: measurements in, Universal Scalability Law model out
//!
//! The fitter sorts a copy of the measurements, fixes λ from the
//! lowest-concurrency sample, linearizes the remaining unknowns into a
//! quadratic regression and solves it with a QR least-squares solve.

pub mod linearize;
pub mod qr;

pub use linearize::{LinearizedSystem, Linearizer};
pub use qr::{LeastSquaresSolver, QrDecomposition};

use crate::{
    error::{AppError, Result},
    logging::Logger,
    models::{Measurement, MeasurementSet, Model},
    types::Constraint,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fitting needs at least this many measurements
pub const MIN_MEASUREMENTS: usize = 6;

/// Orchestrates sort, linearize, solve and parameter extraction
#[derive(Clone, Default)]
pub struct ModelFitter {
    logger: Option<Logger>,
}

/// Throughput and latency predicted at one concurrency level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub concurrency: f64,
    pub throughput: f64,
    pub latency: f64,
}

/// Fitted model plus the capacity-planning figures derived from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    /// Fitted parameters
    pub model: Model,
    /// Number of measurements the model was fit to
    pub sample_count: usize,
    /// Lowest and highest concurrency observed
    pub concurrency_range: (f64, f64),
    /// Concurrency at peak throughput; `None` for limitless models
    pub max_concurrency: Option<f64>,
    /// Peak throughput; `None` for limitless models
    pub max_throughput: Option<f64>,
    /// Dominant scalability penalty
    pub constraint: Constraint,
    /// κ = 0
    pub limitless: bool,
    /// Coefficient of determination of predicted vs observed throughput
    pub r_squared: f64,
    /// Requested predictions
    pub predictions: Vec<Prediction>,
    /// When this report was generated
    pub generated_at: DateTime<Utc>,
}

impl ModelFitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a debug entry for each fitting stage through `logger`
    pub fn with_logger(logger: Logger) -> Self {
        Self { logger: Some(logger) }
    }

    /// Fit a model to `measurements`.
    ///
    /// Fails with `InsufficientData` for fewer than [`MIN_MEASUREMENTS`]
    /// samples and `FittingFailure` when the regression is degenerate.
    pub fn fit(&self, measurements: &MeasurementSet) -> Result<Model> {
        if measurements.len() < MIN_MEASUREMENTS {
            let error = AppError::insufficient_data(MIN_MEASUREMENTS, measurements.len());
            self.log_failure(&error);
            return Err(error);
        }

        let sorted = measurements.sorted_by_concurrency();
        let lambda = Linearizer::lambda(&sorted)?;
        if let Some(logger) = &self.logger {
            logger.debug("Estimated lambda from lowest-concurrency sample")
                .field("lambda", lambda)
                .field("concurrency", sorted[0].concurrency)
                .field("samples", sorted.len())
                .log();
        }

        let system = Linearizer::linearize(&sorted, lambda);
        let coefficients = LeastSquaresSolver::solve(&system.design, &system.target)
            .inspect_err(|error| self.log_failure(error))?;
        if let Some(logger) = &self.logger {
            logger.debug("Solved linearized system")
                .field("coefficients", coefficients)
                .log();
        }

        let model = Model::new(
            (coefficients[2] - coefficients[1]).abs(),
            coefficients[2].abs(),
            lambda,
        );
        if let Some(logger) = &self.logger {
            logger.info("Fitted USL model").model(&model).log();
        }

        Ok(model)
    }

    /// Fit and summarize, predicting at each of `concurrency_levels`
    pub fn report(&self, measurements: &MeasurementSet, concurrency_levels: &[f64]) -> Result<ModelReport> {
        let model = self.fit(measurements)?;
        let concurrency_range = measurements
            .concurrency_range()
            .ok_or_else(|| AppError::internal("fitted an empty measurement set"))?;

        let limitless = model.is_limitless();
        let (max_concurrency, max_throughput) = if limitless {
            (None, None)
        } else {
            (Some(model.max_concurrency()), Some(model.max_throughput()))
        };

        let predictions = concurrency_levels
            .iter()
            .map(|&n| predict(&model, n))
            .collect();

        Ok(ModelReport {
            model,
            sample_count: measurements.len(),
            concurrency_range,
            max_concurrency,
            max_throughput,
            constraint: model.constraint(),
            limitless,
            r_squared: coefficient_of_determination(&model, measurements.as_slice()),
            predictions,
            generated_at: Utc::now(),
        })
    }

    fn log_failure(&self, error: &AppError) {
        if let Some(logger) = &self.logger {
            logger.warn("Model fitting failed").error_info(error).log();
        }
    }
}

/// Throughput and latency the model expects at concurrency `n`
pub fn predict(model: &Model, n: f64) -> Prediction {
    Prediction {
        concurrency: n,
        throughput: model.throughput_at_concurrency(n),
        latency: model.latency_at_concurrency(n),
    }
}

/// R² of the model's throughput predictions against the observed throughput
pub fn coefficient_of_determination(model: &Model, measurements: &[Measurement]) -> f64 {
    if measurements.is_empty() {
        return 0.0;
    }

    let n = measurements.len() as f64;
    let mean = measurements.iter().map(|m| m.throughput).sum::<f64>() / n;

    let ss_res: f64 = measurements.iter()
        .map(|m| (m.throughput - model.throughput_at_concurrency(m.concurrency)).powi(2))
        .sum();
    let ss_tot: f64 = measurements.iter()
        .map(|m| (m.throughput - mean).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}
