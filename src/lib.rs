//! corrgauss — correlated Gaussian likelihood evaluation for Bayesian
//! inverse problems.
//!
//! Purpose
//! -------
//! Turn a declarative noise-model description (which sensors, which
//! experiments, additive vs multiplicative model error, which correlation
//! axes) plus per-experiment correlation metadata into a concrete,
//! numerically efficient log-likelihood evaluator, and evaluate it.
//!
//! Key behaviors
//! -------------
//! - Classify, from declarative flags and experiment data, which covariance
//!   structure applies: none, 1D correlated, 2D/3D spatial, or combined
//!   space-time (Kronecker).
//! - Validate at construction time that the experiment data is actually
//!   consistent with the declared structure.
//! - Evaluate the multivariate-normal log-density of the residual with the
//!   cheapest valid algorithm per structure: closed-form O(n) tridiagonal
//!   recursions for exponential-kernel 1D correlation, Kronecker-factorized
//!   solves for space-time correlation, dense Cholesky only where no
//!   structure can be exploited.
//!
//! Invariants & assumptions
//! ------------------------
//! - Configuration problems (unknown kernel, inconsistent error flags) are
//!   reported when the likelihood spec is constructed; structural problems
//!   (axis data inconsistent with the declared structure) are reported when
//!   the evaluator is built. Neither is ever downgraded to −∞.
//! - Out-of-domain *numeric parameter values* (non-positive standard
//!   deviations or correlation lengths) yield −∞ from the evaluation call so
//!   that samplers can treat them as zero posterior density and continue.
//! - An [`likelihood::evaluator::Evaluator`] is immutable after construction
//!   and safe to share across parallel chains or walkers; each call only
//!   consumes fresh model responses and parameter values.
//!
//! Downstream usage
//! ----------------
//! - Define sensors, experiments and a
//!   [`definition::likelihood_model::GaussianLikelihoodSpec`], call
//!   [`likelihood::translate::translate`] once, then hand the resulting
//!   evaluator's `loglike` to an external optimizer / MCMC / nested-sampling
//!   driver. Samplers, forward-model execution and priors are external
//!   collaborators; this crate only reads their data at the boundary types
//!   in [`definition::experiment`].

pub mod definition;
pub mod likelihood;
