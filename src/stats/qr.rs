//! Householder QR least-squares solver for the fixed three-column USL basis.
//!
//! The design matrix always has exactly [`BASIS_SIZE`] columns, so rows are
//! stored as fixed-size arrays and `R` is a small square array.

use crate::error::{AppError, Result};

/// Number of columns in the design matrix: `[1, z, z²]`
pub const BASIS_SIZE: usize = 3;

/// A diagonal entry of `R` smaller than this fraction of the largest one
/// marks the design matrix as rank-deficient.
pub const SINGULAR_THRESHOLD: f64 = 1e-10;

/// Row-major `m x 3` matrix
pub type DesignRow = [f64; BASIS_SIZE];

/// Thin QR factorization `A = Q R` of an `m x 3` matrix, `m >= 3`.
#[derive(Debug, Clone)]
pub struct QrDecomposition {
    /// `m x 3`, orthonormal columns
    q: Vec<DesignRow>,
    /// `3 x 3`, upper triangular
    r: [DesignRow; BASIS_SIZE],
}

impl QrDecomposition {
    /// Factor `a` with Householder reflections.
    ///
    /// Returns `None` when `a` has fewer rows than columns, contains
    /// non-finite values, or is rank-deficient.
    #[allow(clippy::needless_range_loop)]
    pub fn decompose(a: &[DesignRow]) -> Option<Self> {
        let m = a.len();
        if m < BASIS_SIZE || a.iter().flatten().any(|v| !v.is_finite()) {
            return None;
        }

        let mut work = a.to_vec();
        let mut reflectors: Vec<Vec<f64>> = Vec::with_capacity(BASIS_SIZE);

        for k in 0..BASIS_SIZE {
            let norm = (k..m).map(|i| work[i][k] * work[i][k]).sum::<f64>().sqrt();
            let mut v: Vec<f64> = (k..m).map(|i| work[i][k]).collect();
            let alpha = if v[0] >= 0.0 { -norm } else { norm };
            v[0] -= alpha;

            let v_norm_sq: f64 = v.iter().map(|x| x * x).sum();
            if v_norm_sq > 0.0 {
                for j in k..BASIS_SIZE {
                    let dot: f64 = (k..m).map(|i| v[i - k] * work[i][j]).sum();
                    let factor = 2.0 * dot / v_norm_sq;
                    for i in k..m {
                        work[i][j] -= factor * v[i - k];
                    }
                }
            }
            reflectors.push(v);
        }

        let mut r = [[0.0; BASIS_SIZE]; BASIS_SIZE];
        for i in 0..BASIS_SIZE {
            for j in i..BASIS_SIZE {
                r[i][j] = work[i][j];
            }
        }

        let scale = (0..BASIS_SIZE).map(|i| r[i][i].abs()).fold(0.0, f64::max);
        let singular = (0..BASIS_SIZE)
            .any(|i| !r[i][i].is_finite() || r[i][i].abs() <= SINGULAR_THRESHOLD * scale);
        if scale == 0.0 || singular {
            return None;
        }

        // Q = H0 H1 H2 applied to the first three columns of the identity
        let mut q = vec![[0.0; BASIS_SIZE]; m];
        for j in 0..BASIS_SIZE {
            q[j][j] = 1.0;
        }
        for (k, v) in reflectors.iter().enumerate().rev() {
            let v_norm_sq: f64 = v.iter().map(|x| x * x).sum();
            if v_norm_sq == 0.0 {
                continue;
            }
            for j in 0..BASIS_SIZE {
                let dot: f64 = (k..m).map(|i| v[i - k] * q[i][j]).sum();
                let factor = 2.0 * dot / v_norm_sq;
                for i in k..m {
                    q[i][j] -= factor * v[i - k];
                }
            }
        }

        Some(Self { q, r })
    }

    pub fn q(&self) -> &[DesignRow] {
        &self.q
    }

    pub fn r(&self) -> &[DesignRow; BASIS_SIZE] {
        &self.r
    }

    /// Least-squares solution of `A c = b`: forms `Qᵗb`, then back-substitutes
    /// through `R` from the last coefficient to the first.
    pub fn solve(&self, b: &[f64]) -> Option<[f64; BASIS_SIZE]> {
        if b.len() != self.q.len() {
            return None;
        }

        let mut qtb = [0.0; BASIS_SIZE];
        for (row, &bi) in self.q.iter().zip(b) {
            for j in 0..BASIS_SIZE {
                qtb[j] += row[j] * bi;
            }
        }

        let mut c = [0.0; BASIS_SIZE];
        for i in (0..BASIS_SIZE).rev() {
            let mut sum = qtb[i];
            for j in (i + 1)..BASIS_SIZE {
                sum -= c[j] * self.r[i][j];
            }
            c[i] = sum / self.r[i][i];
        }

        Some(c)
    }
}

/// Ordinary least squares over the quadratic basis
pub struct LeastSquaresSolver;

impl LeastSquaresSolver {
    /// Solve the overdetermined system `design * c ≈ target`.
    ///
    /// Fails with `FittingFailure` when the design matrix cannot be factored
    /// or the solution is not finite.
    pub fn solve(design: &[DesignRow], target: &[f64]) -> Result<[f64; BASIS_SIZE]> {
        if design.len() != target.len() {
            return Err(AppError::internal(format!(
                "design matrix has {} rows but target has {} entries",
                design.len(),
                target.len()
            )));
        }

        let qr = QrDecomposition::decompose(design).ok_or_else(|| {
            AppError::fitting_failure("unable to fit to the USL: design matrix is rank-deficient")
        })?;

        let coefficients = qr
            .solve(target)
            .ok_or_else(|| AppError::internal("target length does not match decomposition"))?;

        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(AppError::fitting_failure(
                "unable to fit to the USL: regression produced non-finite coefficients",
            ));
        }

        Ok(coefficients)
    }
}
