//! Dense multivariate-normal evaluation and ndarray ↔ nalgebra bridging.
//!
//! Purpose
//! -------
//! Provide the general-purpose fallback path: build a dense kernel
//! correlation matrix over arbitrary points and evaluate the Gaussian
//! log-density through a Cholesky factorization. The structured paths in
//! [`crate::likelihood::tridiagonal`] and [`crate::likelihood::kron`] are
//! preferred wherever they apply; this module handles 2D/3D spatial
//! correlation and the covariances no factorization fits.
//!
//! Notes
//! -----
//! - A failed Cholesky factorization means the covariance is not positive
//!   definite for the current parameter values; callers receive
//!   `f64::NEG_INFINITY` rather than an error, matching the domain policy
//!   for out-of-range parameters.
use crate::likelihood::kernel::CorrelationKernel;
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

const LN_2PI: f64 = 1.8378770664093453;

/// Copy an `ndarray` matrix into a freshly allocated `DMatrix`.
pub fn to_dmatrix(data: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(data.nrows(), data.ncols(), |i, j| data[[i, j]])
}

/// Copy an `ndarray` vector into a freshly allocated `DVector`.
pub fn to_dvector(data: &Array1<f64>) -> DVector<f64> {
    DVector::from_iterator(data.len(), data.iter().copied())
}

/// Build the dense kernel correlation matrix over `n` points in `d`
/// dimensions (rows of `points`), using Euclidean distances.
pub fn correlation_matrix(
    points: &Array2<f64>, kernel: CorrelationKernel, length: f64,
) -> DMatrix<f64> {
    let n = points.nrows();
    DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            return 1.0;
        }
        let mut dist2 = 0.0;
        for k in 0..points.ncols() {
            let diff = points[[i, k]] - points[[j, k]];
            dist2 += diff * diff;
        }
        kernel.correlation(dist2.sqrt(), length)
    })
}

/// Evaluate `log N(r; 0, cov)` through a dense Cholesky factorization.
///
/// Returns
/// -------
/// - `f64`: the log-density; `f64::NEG_INFINITY` when `cov` is not positive
///   definite.
pub fn loglike_multivariate_normal(residual: &DVector<f64>, cov: DMatrix<f64>) -> f64 {
    let n = residual.len();
    let chol = match cov.cholesky() {
        Some(chol) => chol,
        None => return f64::NEG_INFINITY,
    };
    let logdet: f64 = chol.l().diagonal().iter().map(|d| 2.0 * d.ln()).sum();
    let solved = chol.solve(residual);
    -0.5 * (n as f64 * LN_2PI + logdet + residual.dot(&solved))
}
