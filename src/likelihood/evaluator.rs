//! Structured log-likelihood evaluation.
//!
//! Purpose
//! -------
//! Hold the immutable result of translating a declarative likelihood spec
//! against the experiment store, and evaluate the total Gaussian
//! log-likelihood for fresh model responses and parameter values. An
//! [`Evaluator`] owns all measured data and correlation coordinates in the
//! layout its structure needs, so each call touches only the parameter map
//! and the response vectors.
//!
//! Key behaviors
//! -------------
//! - Each experiment is an independent realization; its log-density
//!   contributions are summed.
//! - Model error enters additively (`r = response − data`) or
//!   multiplicatively (covariance scaled by the response through a change
//!   of variables); an optional additive measurement-error term
//!   `σ_d² I` sits on top in both cases.
//! - The cheapest valid algorithm is chosen per structure: closed-form
//!   diagonal densities, O(n) tridiagonal recursions, Kronecker-factorized
//!   solves, dense Cholesky only where no structure can be exploited.
//!
//! Invariants & assumptions
//! ------------------------
//! - Out-of-domain parameter *values* (non-positive standard deviations or
//!   correlation lengths, a zero response under multiplicative error) yield
//!   `Ok(f64::NEG_INFINITY)`; missing parameters or malformed responses are
//!   hard errors.
//! - The structure data was validated at construction time: coordinate
//!   vectors match their data lengths, ordering axes are strictly
//!   increasing, and space-time grids are shared.
use crate::definition::experiment::{ModelResponse, ParameterMap};
use crate::likelihood::dense::{
    correlation_matrix, loglike_multivariate_normal, to_dvector,
};
use crate::likelihood::errors::{EvalError, EvalResult};
use crate::likelihood::kernel::CorrelationKernel;
use crate::likelihood::kron::kron_loglike_exp_grid;
use crate::likelihood::tridiagonal::{loglike_exp_1d, NoiseVariance};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

const LN_2PI: f64 = 1.8378770664093453;

/// How the model-prediction-error standard deviation enters the covariance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorModel {
    /// `cov = σ² R (+ σ_d² I)`.
    Additive,
    /// `cov = σ² D R D (+ σ_d² I)` with `D = diag(model response)`.
    Multiplicative,
}

/// The covariance structure detected for a likelihood spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralClass {
    /// No correlation variables; diagonal covariance.
    Uncorrelated,
    /// One correlation variable (spatial or temporal); tridiagonal path.
    Correlated1D,
    /// Two or three spatial variables, no time; dense path.
    SpaceCorrelated2D3D,
    /// One spatial variable plus time; Kronecker path with 1D channels.
    SpaceTimeCorrelated1D,
    /// Two spatial variables plus time; Kronecker path with 2D channels.
    SpaceTimeCorrelated2D3D,
}

impl StructuralClass {
    /// Short structure name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            StructuralClass::Uncorrelated => "uncorrelated",
            StructuralClass::Correlated1D => "correlated-1d",
            StructuralClass::SpaceCorrelated2D3D => "space-correlated-2d3d",
            StructuralClass::SpaceTimeCorrelated1D => "space-time-correlated-1d",
            StructuralClass::SpaceTimeCorrelated2D3D => "space-time-correlated-2d3d",
        }
    }
}

/// Resolved global parameter names, one per role the structure consumes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParameterRoles {
    /// Model-error standard deviation; always consumed.
    pub std_model: String,
    /// Measurement-error standard deviation; `Some` iff the spec enables
    /// additive measurement error.
    pub std_measurement: Option<String>,
    /// Correlation length of the (sole or spatial) correlation axis.
    pub length_space: Option<String>,
    /// Correlation length of the temporal axis in space-time structures.
    pub length_time: Option<String>,
}

/// One uncorrelated data channel: the measured vector of one
/// (experiment, sensor) pair.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Channel {
    pub experiment: String,
    pub sensor: String,
    pub data: Array1<f64>,
}

/// One 1D-correlated series with its strictly increasing ordering
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Series1D {
    pub experiment: String,
    pub sensor: String,
    pub data: Array1<f64>,
    pub coords: Array1<f64>,
}

/// One spatially correlated block: data over `n` points in 2 or 3
/// dimensions.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpaceBlock {
    pub experiment: String,
    pub sensor: String,
    pub data: Array1<f64>,
    pub points: Array2<f64>,
}

/// One space-time experiment: the (channel × grid) measured matrix.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpaceTimeBlock {
    pub experiment: String,
    pub data: Array2<f64>,
}

/// Per-structure data layout owned by the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StructureData {
    Uncorrelated {
        channels: Vec<Channel>,
    },
    Correlated1D {
        series: Vec<Series1D>,
    },
    Space2D3D {
        blocks: Vec<SpaceBlock>,
    },
    SpaceTime {
        /// Sensor names in channel (row) order.
        sensors: Vec<String>,
        /// Per-channel coordinates, (n_c, d); the scalar-valued axis.
        channel_coords: Array2<f64>,
        /// Whether the channel axis is the temporal one (role swap: the
        /// sensors are time points and the shared grid is spatial).
        channel_axis_time: bool,
        /// Shared strictly increasing grid, length n_g.
        grid: Array1<f64>,
        blocks: Vec<SpaceTimeBlock>,
    },
}

/// `Evaluator` — immutable structured log-likelihood evaluator.
///
/// Built once by [`crate::likelihood::translate::translate`]; thereafter
/// every call to [`Evaluator::loglike`] is read-only, so one evaluator can
/// be shared across parallel chains or walkers.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluator {
    /// Name of the likelihood contribution, for diagnostics.
    pub name: String,
    pub class: StructuralClass,
    pub error_model: ErrorModel,
    pub additive_measurement_error: bool,
    pub kernel: CorrelationKernel,
    pub(crate) prms: ParameterRoles,
    pub(crate) structure: StructureData,
}

impl Evaluator {
    /// Evaluate the total log-likelihood across all experiments.
    ///
    /// Parameters
    /// ----------
    /// - `response`: model responses, one vector per (experiment, sensor).
    /// - `prms`: current global parameter values.
    ///
    /// Returns
    /// -------
    /// - `Ok(f64)`: the summed log-density; `f64::NEG_INFINITY` for
    ///   out-of-domain parameter values or non-positive-definite
    ///   covariances.
    ///
    /// # Errors
    /// - `EvalError::MissingParameter` when a resolved parameter name is
    ///   absent from `prms`.
    /// - `EvalError::MissingResponse` / `ResponseLengthMismatch` when the
    ///   response map does not line up with the measured data.
    pub fn loglike(&self, response: &ModelResponse, prms: &ParameterMap) -> EvalResult<f64> {
        let std_model = fetch_prm(prms, &self.prms.std_model)?;
        let std_measurement = match &self.prms.std_measurement {
            Some(name) => Some(fetch_prm(prms, name)?),
            None => None,
        };
        let length_space = match &self.prms.length_space {
            Some(name) => Some(fetch_prm(prms, name)?),
            None => None,
        };
        let length_time = match &self.prms.length_time {
            Some(name) => Some(fetch_prm(prms, name)?),
            None => None,
        };

        // Domain policy: out-of-range values are zero likelihood, not errors.
        if std_model <= 0.0 {
            return Ok(f64::NEG_INFINITY);
        }
        if let Some(std) = std_measurement {
            if std <= 0.0 {
                return Ok(f64::NEG_INFINITY);
            }
        }
        if length_space.map_or(false, |l| l <= 0.0)
            || length_time.map_or(false, |l| l <= 0.0)
        {
            return Ok(f64::NEG_INFINITY);
        }
        let noise_var = std_measurement.map(|std| std * std);

        match &self.structure {
            StructureData::Uncorrelated { channels } => {
                self.loglike_uncorrelated(channels, response, std_model, noise_var)
            }
            StructureData::Correlated1D { series } => {
                // length_space is always resolved for this structure
                let length = length_space.unwrap_or(f64::NAN);
                self.loglike_correlated_1d(series, response, std_model, noise_var, length)
            }
            StructureData::Space2D3D { blocks } => {
                let length = length_space.unwrap_or(f64::NAN);
                self.loglike_space(blocks, response, std_model, noise_var, length)
            }
            StructureData::SpaceTime {
                sensors,
                channel_coords,
                channel_axis_time,
                grid,
                blocks,
            } => {
                let (l_space, l_time) = (
                    length_space.unwrap_or(f64::NAN),
                    length_time.unwrap_or(f64::NAN),
                );
                // Role swap: whichever axis carries the per-channel scalars
                // uses that axis's correlation length.
                let (channel_length, grid_length) = if *channel_axis_time {
                    (l_time, l_space)
                } else {
                    (l_space, l_time)
                };
                self.loglike_space_time(
                    sensors,
                    channel_coords,
                    grid,
                    blocks,
                    response,
                    std_model,
                    noise_var,
                    channel_length,
                    grid_length,
                )
            }
        }
    }

    /// Diagonal covariance: per-point univariate normals.
    fn loglike_uncorrelated(
        &self,
        channels: &[Channel],
        response: &ModelResponse,
        std_model: f64,
        noise_var: Option<f64>,
    ) -> EvalResult<f64> {
        let sigma2 = std_model * std_model;
        let noise = noise_var.unwrap_or(0.0);
        let mut total = 0.0;
        for channel in channels {
            let model = response_vector(
                response, &channel.experiment, &channel.sensor, channel.data.len(),
            )?;
            match self.error_model {
                ErrorModel::Additive => {
                    let var = sigma2 + noise;
                    let ln_var = var.ln();
                    for (m, d) in model.iter().zip(channel.data.iter()) {
                        let r = m - d;
                        total += -0.5 * (LN_2PI + ln_var + r * r / var);
                    }
                }
                ErrorModel::Multiplicative => {
                    for (m, d) in model.iter().zip(channel.data.iter()) {
                        let var = m * m * sigma2 + noise;
                        if var <= 0.0 {
                            return Ok(f64::NEG_INFINITY);
                        }
                        let r = m - d;
                        total += -0.5 * (LN_2PI + var.ln() + r * r / var);
                    }
                }
            }
        }
        Ok(total)
    }

    /// Tridiagonal O(n) path for one correlation variable.
    ///
    /// Multiplicative error is reduced to the additive form by the change of
    /// variables `z = r ⊘ m`: the measurement-noise term transforms into the
    /// heteroscedastic diagonal `σ_d² / m_i²`, which the tridiagonal
    /// correction handles exactly, at the cost of the Jacobian `Σ log |m_i|`.
    fn loglike_correlated_1d(
        &self,
        series: &[Series1D],
        response: &ModelResponse,
        std_model: f64,
        noise_var: Option<f64>,
        length: f64,
    ) -> EvalResult<f64> {
        let mut total = 0.0;
        for s in series {
            let model = response_vector(response, &s.experiment, &s.sensor, s.data.len())?;
            let residual = model - &s.data;
            match self.error_model {
                ErrorModel::Additive => {
                    let noise = match noise_var {
                        Some(v) => NoiseVariance::Scalar(v),
                        None => NoiseVariance::None,
                    };
                    total += loglike_exp_1d(&residual, &s.coords, length, std_model, noise);
                }
                ErrorModel::Multiplicative => {
                    if model.iter().any(|m| *m == 0.0) {
                        return Ok(f64::NEG_INFINITY);
                    }
                    let z = &residual / model;
                    let log_jacobian: f64 = model.iter().map(|m| m.abs().ln()).sum();
                    let ll = match noise_var {
                        Some(v) => {
                            let hetero = model.mapv(|m| v / (m * m));
                            loglike_exp_1d(
                                &z,
                                &s.coords,
                                length,
                                std_model,
                                NoiseVariance::Vector(&hetero),
                            )
                        }
                        None => {
                            loglike_exp_1d(&z, &s.coords, length, std_model, NoiseVariance::None)
                        }
                    };
                    total += ll - log_jacobian;
                }
            }
        }
        Ok(total)
    }

    /// Dense path for 2D/3D spatial correlation.
    fn loglike_space(
        &self,
        blocks: &[SpaceBlock],
        response: &ModelResponse,
        std_model: f64,
        noise_var: Option<f64>,
        length: f64,
    ) -> EvalResult<f64> {
        let sigma2 = std_model * std_model;
        let noise = noise_var.unwrap_or(0.0);
        let mut total = 0.0;
        for block in blocks {
            let model =
                response_vector(response, &block.experiment, &block.sensor, block.data.len())?;
            let residual = model - &block.data;
            let corr = correlation_matrix(&block.points, self.kernel, length);
            let n = residual.len();
            let cov = match self.error_model {
                ErrorModel::Additive => DMatrix::from_fn(n, n, |i, j| {
                    let mut c = sigma2 * corr[(i, j)];
                    if i == j {
                        c += noise;
                    }
                    c
                }),
                ErrorModel::Multiplicative => DMatrix::from_fn(n, n, |i, j| {
                    let mut c = model[i] * model[j] * sigma2 * corr[(i, j)];
                    if i == j {
                        c += noise;
                    }
                    c
                }),
            };
            total += loglike_multivariate_normal(&to_dvector(&residual), cov);
        }
        Ok(total)
    }

    /// Kronecker-factorized path for separable space-time correlation.
    ///
    /// The multiplicative + measurement-noise combination has no separable
    /// form (the transformed noise is no longer homoscedastic), so that one
    /// case falls back to an exact dense Cholesky on the full covariance.
    #[allow(clippy::too_many_arguments)]
    fn loglike_space_time(
        &self,
        sensors: &[String],
        channel_coords: &Array2<f64>,
        grid: &Array1<f64>,
        blocks: &[SpaceTimeBlock],
        response: &ModelResponse,
        std_model: f64,
        noise_var: Option<f64>,
        channel_length: f64,
        grid_length: f64,
    ) -> EvalResult<f64> {
        let (nc, ng) = (sensors.len(), grid.len());
        let channel_corr = correlation_matrix(channel_coords, self.kernel, channel_length);
        let mut total = 0.0;
        for block in blocks {
            let mut model = Array2::<f64>::zeros((nc, ng));
            for (i, sensor) in sensors.iter().enumerate() {
                let vec = response_vector(response, &block.experiment, sensor, ng)?;
                for j in 0..ng {
                    model[[i, j]] = vec[j];
                }
            }
            let residual = &model - &block.data;

            match self.error_model {
                ErrorModel::Additive => {
                    total += kron_loglike_exp_grid(
                        &residual, &channel_corr, grid, grid_length, std_model, noise_var,
                    );
                }
                ErrorModel::Multiplicative => {
                    if model.iter().any(|m| *m == 0.0) {
                        return Ok(f64::NEG_INFINITY);
                    }
                    match noise_var {
                        None => {
                            let z = &residual / &model;
                            let log_jacobian: f64 =
                                model.iter().map(|m| m.abs().ln()).sum();
                            total += kron_loglike_exp_grid(
                                &z, &channel_corr, grid, grid_length, std_model, None,
                            ) - log_jacobian;
                        }
                        Some(noise) => {
                            total += dense_multiplicative_kron(
                                &residual,
                                &model,
                                &channel_corr,
                                grid,
                                grid_length,
                                std_model,
                                noise,
                            );
                        }
                    }
                }
            }
        }
        Ok(total)
    }
}

/// Fetch one parameter value by name.
fn fetch_prm(prms: &ParameterMap, name: &str) -> EvalResult<f64> {
    prms.get(name)
        .copied()
        .ok_or_else(|| EvalError::MissingParameter { name: name.to_string() })
}

/// Fetch and length-check one response vector.
fn response_vector<'a>(
    response: &'a ModelResponse, experiment: &str, sensor: &str, expected: usize,
) -> EvalResult<&'a Array1<f64>> {
    let vec = response
        .get(experiment)
        .and_then(|per_sensor| per_sensor.get(sensor))
        .ok_or_else(|| EvalError::MissingResponse {
            experiment: experiment.to_string(),
            sensor: sensor.to_string(),
        })?;
    if vec.len() != expected {
        return Err(EvalError::ResponseLengthMismatch {
            experiment: experiment.to_string(),
            sensor: sensor.to_string(),
            response_len: vec.len(),
            data_len: expected,
        });
    }
    Ok(vec)
}

/// Exact dense evaluation of the multiplicative space-time covariance
/// `D (σ² R_c ⊗ R_g) D + σ_d² I`, channel-major flattening.
fn dense_multiplicative_kron(
    residual: &Array2<f64>,
    model: &Array2<f64>,
    channel_corr: &DMatrix<f64>,
    grid: &Array1<f64>,
    grid_length: f64,
    std_model: f64,
    noise_var: f64,
) -> f64 {
    let ng = grid.len();
    let grid_corr = DMatrix::from_fn(ng, ng, |i, j| {
        (-(grid[i] - grid[j]).abs() / grid_length).exp()
    });
    let kron = channel_corr.kronecker(&grid_corr);
    let sigma2 = std_model * std_model;
    let flat_model: Vec<f64> = model.iter().copied().collect();
    let n = flat_model.len();
    let cov = DMatrix::from_fn(n, n, |i, j| {
        let mut c = flat_model[i] * flat_model[j] * sigma2 * kron[(i, j)];
        if i == j {
            c += noise_var;
        }
        c
    });
    let flat_residual: Vec<f64> = residual.iter().copied().collect();
    loglike_multivariate_normal(&nalgebra::DVector::from_vec(flat_residual), cov)
}
