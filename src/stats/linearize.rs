//! Rewrites the rational USL equation as a quadratic regression problem.
//!
//! With `λ` fixed, `X(N) = λN / (1 + σ(N-1) + κN(N-1))` rearranges to
//! `N / (X/λ) - 1 = c₀ + c₁z + c₂z²` where `z = N - 1`, which is linear in
//! the coefficients and can be solved by ordinary least squares.

use crate::error::{AppError, Result};
use crate::models::Measurement;
use crate::stats::qr::DesignRow;

/// Design matrix and target vector of the linearized system
#[derive(Debug, Clone, PartialEq)]
pub struct LinearizedSystem {
    /// One `[1, z, z²]` row per measurement
    pub design: Vec<DesignRow>,
    /// `N / (X/λ) - 1` per measurement
    pub target: Vec<f64>,
}

impl LinearizedSystem {
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }
}

pub struct Linearizer;

impl Linearizer {
    /// Ideal single-worker throughput estimated from the lowest-concurrency sample.
    ///
    /// `sorted` must be ordered by ascending concurrency.
    pub fn lambda(sorted: &[Measurement]) -> Result<f64> {
        let first = sorted
            .first()
            .ok_or_else(|| AppError::insufficient_data(1, 0))?;
        Ok(first.throughput / first.concurrency)
    }

    /// Build the regression system for measurements sorted by concurrency.
    pub fn linearize(sorted: &[Measurement], lambda: f64) -> LinearizedSystem {
        let mut design = Vec::with_capacity(sorted.len());
        let mut target = Vec::with_capacity(sorted.len());

        for m in sorted {
            let z = m.concurrency - 1.0;
            design.push([1.0, z, z * z]);
            target.push((m.concurrency / (m.throughput / lambda)) - 1.0);
        }

        LinearizedSystem { design, target }
    }
}
