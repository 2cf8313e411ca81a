//! Kronecker-factorized evaluation for separable space-time correlation.
//!
//! Purpose
//! -------
//! When residuals live on a full (channel × grid) product — every channel
//! observed on one shared, strictly increasing grid — the separable
//! covariance `σ² (R_c ⊗ R_g)` never has to be formed. This module
//! evaluates the Gaussian log-density through the factors alone:
//!
//! - Without a noise term, via a trace identity:
//!   `rᵀ Σ⁻¹ r = tr(R_c⁻¹ · E · R_g⁻¹ · Eᵀ) / σ²` where `E` is the residual
//!   reshaped to (channel × grid), `R_c⁻¹` comes from a small dense Cholesky
//!   and `R_g⁻¹` is the closed-form tridiagonal precision of
//!   [`crate::likelihood::tridiagonal`].
//! - With a homoscedastic noise term `σ_d² I`, via the symmetric
//!   eigendecompositions of both factors: the eigenvalues of
//!   `σ² (R_c ⊗ R_g) + σ_d² I` are `σ² λ_c λ_g + σ_d²`, and the quadratic
//!   form diagonalizes in the rotated residual `Q_cᵀ E Q_g`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The residual matrix is laid out channel-major: entry `(i, j)` is
//!   channel `i` at grid point `j`, matching the flattened index
//!   `i · n_g + j` of `R_c ⊗ R_g`.
//! - `grid` is strictly increasing; `grid_length`, `std_model` are positive
//!   (enforced upstream).
use crate::likelihood::dense::to_dmatrix;
use crate::likelihood::tridiagonal::{exp_precision_1d, sym_tridiag_mul};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

const LN_2PI: f64 = 1.8378770664093453;

/// Evaluate `log N(vec(E); 0, σ² (R_c ⊗ R_g) + σ_d² I)` without forming the
/// Kronecker product.
///
/// Parameters
/// ----------
/// - `residual`: channel-major residual matrix `E`, shape (n_c, n_g).
/// - `channel_corr`: dense channel correlation factor `R_c`, (n_c, n_c).
/// - `grid`: the shared strictly increasing grid, length n_g.
/// - `grid_length`: correlation length along the grid.
/// - `std_model`: model-error standard deviation `σ`.
/// - `noise_var`: optional homoscedastic noise variance `σ_d²`.
///
/// Returns
/// -------
/// - `f64`: the log-density; `f64::NEG_INFINITY` when the covariance is not
///   positive definite for the current values.
pub fn kron_loglike_exp_grid(
    residual: &Array2<f64>,
    channel_corr: &DMatrix<f64>,
    grid: &Array1<f64>,
    grid_length: f64,
    std_model: f64,
    noise_var: Option<f64>,
) -> f64 {
    let (nc, ng) = (residual.nrows(), residual.ncols());
    let n = nc * ng;
    let sigma2 = std_model * std_model;
    let r = to_dmatrix(residual);

    match noise_var {
        None => {
            let chol = match channel_corr.clone().cholesky() {
                Some(chol) => chol,
                None => return f64::NEG_INFINITY,
            };
            let logdet_channel: f64 =
                chol.l().diagonal().iter().map(|d| 2.0 * d.ln()).sum();
            let grid_prec = exp_precision_1d(grid, grid_length);

            // tr(R_c⁻¹ E R_g⁻¹ Eᵀ) = Σ_ij (R_c⁻¹ E)_ij (E R_g⁻¹)_ij
            let left = chol.solve(&r);
            let mut quad = 0.0;
            for i in 0..nc {
                let row = residual.row(i).to_owned();
                let right = sym_tridiag_mul(&grid_prec.d0, &grid_prec.d1, &row);
                for j in 0..ng {
                    quad += left[(i, j)] * right[j];
                }
            }
            quad /= sigma2;

            let logdet = n as f64 * sigma2.ln()
                + ng as f64 * logdet_channel
                + nc as f64 * grid_prec.logdet_corr;
            -0.5 * (n as f64 * LN_2PI + logdet + quad)
        }
        Some(noise) => {
            let eig_channel = channel_corr.clone().symmetric_eigen();
            let grid_corr = DMatrix::from_fn(ng, ng, |i, j| {
                (-(grid[i] - grid[j]).abs() / grid_length).exp()
            });
            let eig_grid = grid_corr.symmetric_eigen();

            let rotated = eig_channel.eigenvectors.transpose() * r * &eig_grid.eigenvectors;
            let mut logdet = 0.0;
            let mut quad = 0.0;
            for i in 0..nc {
                for j in 0..ng {
                    let lam =
                        sigma2 * eig_channel.eigenvalues[i] * eig_grid.eigenvalues[j] + noise;
                    if lam <= 0.0 {
                        return f64::NEG_INFINITY;
                    }
                    logdet += lam.ln();
                    quad += rotated[(i, j)] * rotated[(i, j)] / lam;
                }
            }
            -0.5 * (n as f64 * LN_2PI + logdet + quad)
        }
    }
}
