//! The Universal Scalability Law model and its closed-form equations

use crate::error::Result;
use crate::models::measurement::{Measurement, MeasurementSet};
use crate::stats::ModelFitter;
use crate::types::Constraint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parametrized USL model: `X(N) = λN / (1 + σ(N-1) + κN(N-1))`.
///
/// Construction performs no validation. Every query is a pure evaluation
/// of the three parameters; out-of-domain inputs (including κ = 0 for the
/// queries that divide by κ) produce infinities or NaN instead of errors,
/// so check [`Model::is_limitless`] before asking for a ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Coefficient of contention (σ)
    pub sigma: f64,

    /// Coefficient of crosstalk/coherency (κ)
    pub kappa: f64,

    /// Throughput of a single worker (λ)
    pub lambda: f64,
}

impl Model {
    pub fn new(sigma: f64, kappa: f64, lambda: f64) -> Self {
        Self { sigma, kappa, lambda }
    }

    /// Fit a model to any collection of measurements.
    ///
    /// Shorthand for [`ModelFitter::fit`] with the default fitter.
    pub fn build<I>(measurements: I) -> Result<Self>
    where
        I: IntoIterator<Item = Measurement>,
    {
        let set: MeasurementSet = measurements.into_iter().collect();
        ModelFitter::new().fit(&set)
    }

    fn penalty(&self, n: f64) -> f64 {
        1.0 + self.sigma * (n - 1.0) + self.kappa * n * (n - 1.0)
    }

    /// Expected throughput at `n` concurrent workers, `X(N)`
    pub fn throughput_at_concurrency(&self, n: f64) -> f64 {
        (self.lambda * n) / self.penalty(n)
    }

    /// Expected mean latency at `n` concurrent workers, `R(N)`
    pub fn latency_at_concurrency(&self, n: f64) -> f64 {
        self.penalty(n) / self.lambda
    }

    /// Concurrency at which throughput peaks, `floor(sqrt((1-σ)/κ))`
    pub fn max_concurrency(&self) -> f64 {
        ((1.0 - self.sigma) / self.kappa).sqrt().floor()
    }

    /// Throughput at [`Self::max_concurrency`], the peak of `X(N)`
    pub fn max_throughput(&self) -> f64 {
        self.throughput_at_concurrency(self.max_concurrency())
    }

    /// Expected mean latency at throughput `x`, `R(X)`
    pub fn latency_at_throughput(&self, x: f64) -> f64 {
        (self.sigma - 1.0) / (self.sigma * x - self.lambda)
    }

    /// Expected throughput at mean latency `r`, `X(R)`
    pub fn throughput_at_latency(&self, r: f64) -> f64 {
        let b = self.latency_discriminant(r);
        (b - self.kappa + self.sigma) / (2.0 * self.kappa * r)
    }

    /// Expected concurrency at mean latency `r`, `N(R)`
    pub fn concurrency_at_latency(&self, r: f64) -> f64 {
        let b = self.latency_discriminant(r);
        (self.kappa - self.sigma + b) / (2.0 * self.kappa)
    }

    fn latency_discriminant(&self, r: f64) -> f64 {
        let a = 2.0 * self.kappa * (2.0 * self.lambda * r + self.sigma - 2.0);
        (self.sigma.powi(2) + self.kappa.powi(2) + a).sqrt()
    }

    /// Expected concurrency at throughput `x`, `N(X) = R(X) * X`
    pub fn concurrency_at_throughput(&self, x: f64) -> f64 {
        self.latency_at_throughput(x) * x
    }

    /// True when crosstalk (κ) costs more than contention (σ)
    pub fn is_coherency_constrained(&self) -> bool {
        self.sigma < self.kappa
    }

    /// True when contention (σ) costs more than crosstalk (κ)
    pub fn is_contention_constrained(&self) -> bool {
        self.sigma > self.kappa
    }

    /// True when κ = 0, i.e. throughput never retrogrades
    pub fn is_limitless(&self) -> bool {
        self.kappa == 0.0
    }

    pub fn constraint(&self) -> Constraint {
        if self.is_contention_constrained() {
            Constraint::Contention
        } else if self.is_coherency_constrained() {
            Constraint::Coherency
        } else {
            Constraint::Balanced
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "σ={}, κ={}, λ={}", self.sigma, self.kappa, self.lambda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-4;

    fn model() -> Model {
        Model::new(0.02, 0.0008, 65.0)
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} to be within {} of {}",
            actual,
            tolerance,
            expected
        );
    }

    #[test]
    fn test_throughput_at_concurrency() {
        let m = model();
        assert_close(m.throughput_at_concurrency(1.0), 65.0, EPSILON);
        // 65*8 / (1 + 0.14 + 0.0448)
        assert_close(m.throughput_at_concurrency(8.0), 520.0 / 1.1848, EPSILON);
    }

    #[test]
    fn test_latency_at_concurrency() {
        let m = model();
        assert_close(m.latency_at_concurrency(1.0), 1.0 / 65.0, 1e-12);
        assert_close(m.latency_at_concurrency(8.0), 1.1848 / 65.0, 1e-12);
    }

    #[test]
    fn test_max_concurrency() {
        // sqrt(0.98 / 0.0008) = 35.0
        assert_eq!(model().max_concurrency(), 35.0);
        assert_eq!(Model::new(0.06, 0.06, 40.0).max_concurrency(), 3.0);
    }

    #[test]
    fn test_max_throughput() {
        let m = model();
        assert_close(m.max_throughput(), m.throughput_at_concurrency(35.0), 1e-12);
        assert!(m.max_throughput() >= m.throughput_at_concurrency(34.0) - 1.0);
    }

    #[test]
    fn test_latency_at_throughput() {
        let m = model();
        // (0.02 - 1) / (0.02 * 400 - 65) = -0.98 / -57
        assert_close(m.latency_at_throughput(400.0), 0.98 / 57.0, 1e-12);
    }

    #[test]
    fn test_throughput_at_latency() {
        let m = model();
        let r = 0.03;
        let a = 2.0 * 0.0008 * (2.0 * 65.0 * r + 0.02 - 2.0);
        let b = (0.02f64.powi(2) + 0.0008f64.powi(2) + a).sqrt();
        assert_close(m.throughput_at_latency(r), (b - 0.0008 + 0.02) / (2.0 * 0.0008 * r), 1e-9);
    }

    #[test]
    fn test_concurrency_at_latency_inverts_latency_at_concurrency() {
        let m = model();
        for n in [1.0, 2.0, 8.0, 20.0, 35.0, 100.0] {
            let r = m.latency_at_concurrency(n);
            assert_close(m.concurrency_at_latency(r), n, 1e-6);
        }
    }

    #[test]
    fn test_concurrency_at_throughput() {
        let m = model();
        assert_close(m.concurrency_at_throughput(400.0), 400.0 * 0.98 / 57.0, 1e-9);

        // exact inverse when there is no crosstalk
        let linear = Model::new(0.05, 0.0, 100.0);
        for n in [1.0, 3.0, 10.0, 50.0] {
            let x = linear.throughput_at_concurrency(n);
            assert_close(linear.concurrency_at_throughput(x), n, 1e-6);
        }
    }

    #[test]
    fn test_littles_law_round_trip() {
        let m = model();
        for n in [1.0, 4.0, 16.0, 35.0] {
            let x = m.throughput_at_concurrency(n);
            let r = m.latency_at_concurrency(n);
            assert_close(x * r, n, 1e-9);
        }
    }

    #[test]
    fn test_constraints() {
        let m = model();
        assert!(m.is_contention_constrained());
        assert!(!m.is_coherency_constrained());
        assert_eq!(m.constraint(), Constraint::Contention);

        let coherency = Model::new(0.0001, 0.01, 10.0);
        assert!(coherency.is_coherency_constrained());
        assert_eq!(coherency.constraint(), Constraint::Coherency);

        assert_eq!(Model::new(0.01, 0.01, 10.0).constraint(), Constraint::Balanced);
    }

    #[test]
    fn test_limitless() {
        assert!(!model().is_limitless());

        let limitless = Model::new(0.05, 0.0, 100.0);
        assert!(limitless.is_limitless());
        assert!(limitless.max_concurrency().is_infinite());
        assert!(limitless.concurrency_at_latency(0.1).is_nan());
    }

    #[test]
    fn test_display() {
        assert_eq!(Model::new(0.5, 0.25, 2.0).to_string(), "σ=0.5, κ=0.25, λ=2");
    }
}
