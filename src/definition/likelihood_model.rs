//! Declarative Gaussian likelihood specification.
//!
//! Purpose
//! -------
//! Capture, as plain data, everything a user declares about one Gaussian
//! noise model: which sensors it covers, which experiments it applies to,
//! whether model error enters additively or multiplicatively, whether an
//! additive measurement-error term is present, which correlation variables
//! are active and which correlation kernel to use. All configuration-level
//! validation happens in [`GaussianLikelihoodSpec::new`]; validation against
//! actual experiment data is deferred to evaluator construction in
//! [`crate::likelihood::translate`].
//!
//! Key behaviors
//! -------------
//! - Correlation variables are declared as a compact letter string such as
//!   `""`, `"t"`, `"xy"` or `"xt"`; parsing rejects unknown letters,
//!   duplicates and strings longer than three variables.
//! - Exactly one of additive/multiplicative model error must be enabled.
use crate::definition::errors::{ConfigError, ConfigResult};
use crate::definition::sensor::{AxisVar, SensorDescriptor};
use crate::likelihood::kernel::CorrelationKernel;

/// Most correlation variables any supported structure carries: up to three
/// spatial coordinates, or two spatial coordinates plus time.
const MAX_CORRELATION_VARIABLES: usize = 3;

/// `GaussianLikelihoodSpec` — validated declarative description of one
/// Gaussian noise model.
///
/// Purpose
/// -------
/// The single input of the translation step. A spec is immutable once
/// constructed and carries no experiment data; experiments are referenced by
/// name and resolved against the store at translation time.
///
/// Fields
/// ------
/// - `name`: `String`
///   Name of this likelihood contribution, used in diagnostics.
/// - `sensors`: `Vec<SensorDescriptor>`
///   The output sensors whose residuals this model covers.
/// - `experiment_names`: `Vec<String>`
///   The experiments this model applies to, each an independent realization.
/// - `additive_model_error` / `multiplicative_model_error`: `bool`
///   How the model-prediction-error standard deviation enters; exactly one
///   is true.
/// - `additive_measurement_error`: `bool`
///   Whether an uncorrelated measurement-noise term is added on top.
/// - `correlation_variables`: `Vec<AxisVar>`
///   The active correlation variables, in declaration order; empty means
///   fully uncorrelated.
/// - `correlation_model`: `CorrelationKernel`
///   The stationary kernel used for every correlation factor.
///
/// Invariants
/// ----------
/// - `correlation_variables` has no duplicates and at most three entries.
/// - Exactly one of the two model-error flags is set.
/// - All sensors declare identical noise and correlation-length parameter
///   names: one likelihood term binds one set of global parameters, so the
///   evaluator resolves them from the first sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianLikelihoodSpec {
    pub name: String,
    pub sensors: Vec<SensorDescriptor>,
    pub experiment_names: Vec<String>,
    pub additive_model_error: bool,
    pub multiplicative_model_error: bool,
    pub additive_measurement_error: bool,
    pub correlation_variables: Vec<AxisVar>,
    pub correlation_model: CorrelationKernel,
}

impl GaussianLikelihoodSpec {
    /// Construct and validate a likelihood spec.
    ///
    /// Parameters
    /// ----------
    /// - `correlation_variables`: compact letter string over `{x, y, z, t}`,
    ///   e.g. `"t"`, `"xy"`, `"xt"`; the empty string declares an
    ///   uncorrelated model.
    /// - `correlation_model`: declarative kernel name, currently `"exp"`.
    ///
    /// # Errors
    /// - `ConfigError::InconsistentModelErrorFlags` unless exactly one of
    ///   `additive_model_error` / `multiplicative_model_error` is true.
    /// - `ConfigError::UnknownCorrelationVariable` /
    ///   `DuplicateCorrelationVariable` / `TooManyCorrelationVariables` for
    ///   malformed variable strings.
    /// - `ConfigError::UnknownCorrelationModel` for unknown kernel names.
    /// - `ConfigError::InconsistentSensorParameters` when sensors disagree
    ///   on noise or correlation-length parameter names.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        sensors: Vec<SensorDescriptor>,
        experiment_names: Vec<String>,
        additive_model_error: bool,
        multiplicative_model_error: bool,
        additive_measurement_error: bool,
        correlation_variables: &str,
        correlation_model: &str,
    ) -> ConfigResult<GaussianLikelihoodSpec> {
        if additive_model_error == multiplicative_model_error {
            return Err(ConfigError::InconsistentModelErrorFlags {
                additive: additive_model_error,
                multiplicative: multiplicative_model_error,
            });
        }
        if let Some((first, rest)) = sensors.split_first() {
            for sensor in rest {
                if sensor.std_model != first.std_model
                    || sensor.std_measurement != first.std_measurement
                    || sensor.correlated_in != first.correlated_in
                {
                    return Err(ConfigError::InconsistentSensorParameters {
                        sensor: sensor.name.clone(),
                    });
                }
            }
        }
        let variables = parse_correlation_variables(correlation_variables)?;
        let kernel = CorrelationKernel::from_name(correlation_model)?;
        Ok(GaussianLikelihoodSpec {
            name: name.to_string(),
            sensors,
            experiment_names,
            additive_model_error,
            multiplicative_model_error,
            additive_measurement_error,
            correlation_variables: variables,
            correlation_model: kernel,
        })
    }

    /// The spatial correlation variables, in declaration order.
    pub fn spatial_variables(&self) -> Vec<AxisVar> {
        self.correlation_variables
            .iter()
            .copied()
            .filter(|v| !v.is_temporal())
            .collect()
    }

    /// Whether time is among the correlation variables.
    pub fn has_temporal_variable(&self) -> bool {
        self.correlation_variables.iter().any(|v| v.is_temporal())
    }
}

/// Parse a compact correlation-variable string such as `"xt"`.
///
/// # Errors
/// - `ConfigError::TooManyCorrelationVariables` when more than three
///   variables are given.
/// - `ConfigError::UnknownCorrelationVariable` for letters outside the
///   `{x, y, z, t}` alphabet.
/// - `ConfigError::DuplicateCorrelationVariable` for repeated letters.
fn parse_correlation_variables(spec: &str) -> ConfigResult<Vec<AxisVar>> {
    if spec.chars().count() > MAX_CORRELATION_VARIABLES {
        return Err(ConfigError::TooManyCorrelationVariables {
            given: spec.to_string(),
            max: MAX_CORRELATION_VARIABLES,
        });
    }
    let mut variables: Vec<AxisVar> = Vec::with_capacity(spec.len());
    for letter in spec.chars() {
        let var = AxisVar::from_letter(letter)?;
        if variables.contains(&var) {
            return Err(ConfigError::DuplicateCorrelationVariable { letter });
        }
        variables.push(var);
    }
    Ok(variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Model-error flag exclusivity.
    // - Correlation-variable string parsing (alphabet, duplicates, length).
    // - Kernel name resolution through the constructor.
    //
    // They intentionally DO NOT cover:
    // - Structural classification (translate tests) or evaluation.
    // -------------------------------------------------------------------------

    fn spec_with(variables: &str) -> ConfigResult<GaussianLikelihoodSpec> {
        GaussianLikelihoodSpec::new(
            "L1",
            vec![SensorDescriptor::new("y")],
            vec!["Exp_1".to_string()],
            true,
            false,
            false,
            variables,
            "exp",
        )
    }

    #[test]
    fn new_requires_exactly_one_model_error_flag() {
        let both = GaussianLikelihoodSpec::new(
            "L1", vec![], vec![], true, true, false, "", "exp",
        );
        let neither = GaussianLikelihoodSpec::new(
            "L1", vec![], vec![], false, false, false, "", "exp",
        );

        assert_eq!(
            both.unwrap_err(),
            ConfigError::InconsistentModelErrorFlags { additive: true, multiplicative: true }
        );
        assert_eq!(
            neither.unwrap_err(),
            ConfigError::InconsistentModelErrorFlags { additive: false, multiplicative: false }
        );
    }

    #[test]
    // Purpose
    // -------
    // Check all three failure modes of the correlation-variable string and
    // one representative success.
    //
    // Given
    // -----
    // - Variable strings "xt", "xq", "xx" and "xyzt".
    //
    // Expect
    // ------
    // - "xt" parses to [X, T]; the others fail with the matching error.
    fn correlation_variable_strings_are_validated() {
        let valid = spec_with("xt").unwrap();
        assert_eq!(valid.correlation_variables, vec![AxisVar::X, AxisVar::T]);
        assert_eq!(valid.spatial_variables(), vec![AxisVar::X]);
        assert!(valid.has_temporal_variable());

        assert_eq!(
            spec_with("xq").unwrap_err(),
            ConfigError::UnknownCorrelationVariable { letter: 'q' }
        );
        assert_eq!(
            spec_with("xx").unwrap_err(),
            ConfigError::DuplicateCorrelationVariable { letter: 'x' }
        );
        assert_eq!(
            spec_with("xyzt").unwrap_err(),
            ConfigError::TooManyCorrelationVariables { given: "xyzt".to_string(), max: 3 }
        );
    }

    #[test]
    fn empty_variable_string_means_uncorrelated() {
        let spec = spec_with("").unwrap();
        assert!(spec.correlation_variables.is_empty());
        assert!(!spec.has_temporal_variable());
    }

    #[test]
    // Purpose
    // -------
    // One likelihood term binds one set of global parameters; a sensor
    // silently declaring different names would be ignored by parameter
    // resolution, so the mismatch must fail at construction.
    //
    // Given
    // -----
    // - Two sensors, the second with a diverging model-error parameter name.
    //
    // Expect
    // ------
    // - Construction fails with `InconsistentSensorParameters` naming the
    //   diverging sensor.
    fn sensors_must_agree_on_parameter_names() {
        let sensors = vec![
            SensorDescriptor::new("y1"),
            SensorDescriptor::new("y2").with_noise_prms("sigma_b", "std_measurement"),
        ];
        let result = GaussianLikelihoodSpec::new(
            "L1",
            sensors,
            vec!["Exp_1".to_string()],
            true,
            false,
            false,
            "xt",
            "exp",
        );

        assert_eq!(
            result.unwrap_err(),
            ConfigError::InconsistentSensorParameters { sensor: "y2".to_string() }
        );
    }

    #[test]
    fn unknown_kernel_name_is_rejected() {
        let result = GaussianLikelihoodSpec::new(
            "L1", vec![], vec![], true, false, false, "t", "gaussian",
        );
        assert_eq!(
            result.unwrap_err(),
            ConfigError::UnknownCorrelationModel { name: "gaussian".to_string() }
        );
    }
}
