//! Correlation kernels for residual covariance matrices.
//!
//! Purpose
//! -------
//! Provide the stationary correlation functions the engine can build
//! covariance structures from. Only the exponential kernel is supported;
//! it is the one kernel whose 1D correlation matrix on sorted coordinates
//! has a closed-form tridiagonal inverse, which every fast evaluation path
//! in this crate relies on.
//!
//! Notes
//! -----
//! - Kernel values are pure correlations in [0, 1]; variance scaling is
//!   applied by the evaluation routines, never here.
use crate::definition::errors::{ConfigError, ConfigResult};

/// Supported stationary correlation kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationKernel {
    /// Exponential kernel `exp(-d / l)` with correlation length `l`.
    Exponential,
}

impl CorrelationKernel {
    /// Resolve a kernel from its declarative name.
    ///
    /// # Errors
    /// - `ConfigError::UnknownCorrelationModel` for any name other than
    ///   `"exp"`.
    pub fn from_name(name: &str) -> ConfigResult<CorrelationKernel> {
        match name {
            "exp" => Ok(CorrelationKernel::Exponential),
            _ => Err(ConfigError::UnknownCorrelationModel { name: name.to_string() }),
        }
    }

    /// The declarative name of this kernel.
    pub fn name(&self) -> &'static str {
        match self {
            CorrelationKernel::Exponential => "exp",
        }
    }

    /// Correlation between two points at the given non-negative distance.
    ///
    /// The caller guarantees `length > 0`; out-of-domain lengths are handled
    /// upstream by the evaluator's domain policy.
    pub fn correlation(&self, distance: f64, length: f64) -> f64 {
        match self {
            CorrelationKernel::Exponential => (-distance / length).exp(),
        }
    }
}
