//! Structured Gaussian likelihood evaluation.
//!
//! The numeric half of the crate: translate a declarative
//! [`crate::definition::likelihood_model::GaussianLikelihoodSpec`] into an
//! [`evaluator::Evaluator`] and evaluate log-likelihoods through the
//! cheapest algorithm the detected covariance structure admits. The
//! specialized paths live in [`tridiagonal`] (closed-form O(n) for 1D
//! exponential correlation), [`kron`] (separable space-time factors) and
//! [`dense`] (general Cholesky fallback).

pub mod dense;
pub mod errors;
pub mod evaluator;
pub mod kernel;
pub mod kron;
pub mod translate;
pub mod tridiagonal;

pub use self::errors::{EvalError, EvalResult, StructuralError, StructuralResult};
pub use self::evaluator::{ErrorModel, Evaluator, StructuralClass};
pub use self::kernel::CorrelationKernel;
pub use self::translate::{classify, translate};
