//! Sensor descriptors and correlation-axis metadata.
//!
//! Purpose
//! -------
//! Describe one output sensor of a forward model: its name, the global
//! parameter names carrying its noise standard deviations, and which
//! correlation axes (spatial coordinates and/or time) its residuals are
//! modeled to be correlated in, together with the global parameter name
//! supplying each axis's correlation length.
//!
//! Key behaviors
//! -------------
//! - [`AxisVar`] enumerates the four recognized correlation variables
//!   (x, y, z, t) and parses them from their single-letter names.
//! - [`CorrelationAxis`] distinguishes a single 1D axis from a
//!   multidimensional spatial axis declared as a tuple (e.g. x & y sharing
//!   one correlation length).
//! - [`SensorDescriptor`] is a plain immutable descriptor; measured values
//!   live with the experiment record (see [`crate::definition::experiment`]),
//!   which references the sensor by name.
//!
//! Invariants & assumptions
//! ------------------------
//! - The set of axis letters across all of a sensor's correlation keys
//!   contains no duplicates; [`SensorDescriptor::correlated_in`] enforces
//!   this at construction.
//! - Parameter names default to the conventional `std_model`,
//!   `std_measurement`, `l_corr`, `l_corr_space`, `l_corr_time` roles when
//!   not set explicitly; the evaluator resolves the defaults per structure.
use crate::definition::errors::{ConfigError, ConfigResult};

/// One of the four recognized correlation variables.
///
/// `X`, `Y` and `Z` are spatial coordinates; `T` is time. The temporal axis
/// plays a special role during structural classification: it is the default
/// ordering axis of combined space-time structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisVar {
    X,
    Y,
    Z,
    T,
}

impl AxisVar {
    /// Parse a correlation variable from its single-letter name.
    ///
    /// # Errors
    /// - `ConfigError::UnknownCorrelationVariable` for anything outside
    ///   `{x, y, z, t}`.
    pub fn from_letter(letter: char) -> ConfigResult<AxisVar> {
        match letter {
            'x' => Ok(AxisVar::X),
            'y' => Ok(AxisVar::Y),
            'z' => Ok(AxisVar::Z),
            't' => Ok(AxisVar::T),
            _ => Err(ConfigError::UnknownCorrelationVariable { letter }),
        }
    }

    /// The single-letter name of this variable.
    pub fn letter(&self) -> char {
        match self {
            AxisVar::X => 'x',
            AxisVar::Y => 'y',
            AxisVar::Z => 'z',
            AxisVar::T => 't',
        }
    }

    /// Whether this is the temporal axis.
    pub fn is_temporal(&self) -> bool {
        matches!(self, AxisVar::T)
    }
}

impl std::fmt::Display for AxisVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A correlation-axis key of a sensor: one 1D variable, or a tuple of
/// spatial variables forming a single multidimensional spatial axis.
///
/// A tuple axis shares one correlation length across its components: a
/// sensor correlated in `('x', 'y')` with parameter `l_corr_space` models
/// the decay over the Euclidean distance in the x-y plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrelationAxis {
    /// A single 1D correlation variable (spatial or temporal).
    Single(AxisVar),
    /// A multidimensional spatial axis, e.g. `('x', 'y')` or
    /// `('x', 'y', 'z')`. Must not contain the temporal variable.
    Spatial(Vec<AxisVar>),
}

impl CorrelationAxis {
    /// The variables covered by this axis key, in declaration order.
    pub fn variables(&self) -> Vec<AxisVar> {
        match self {
            CorrelationAxis::Single(v) => vec![*v],
            CorrelationAxis::Spatial(vs) => vs.clone(),
        }
    }
}

/// `SensorDescriptor` — immutable descriptor of one output sensor.
///
/// Purpose
/// -------
/// Carry the sensor's name, the global parameter names describing its noise
/// standard deviations, and its correlation-axis metadata. The descriptor is
/// deliberately free of measured data: experiments own their measurements
/// and reference the sensor by name.
///
/// Fields
/// ------
/// - `name`: `String`
///   Sensor name, unique among the sensors of one forward model.
/// - `std_model`: `String`
///   Global parameter name of the model-prediction-error standard deviation.
/// - `std_measurement`: `String`
///   Global parameter name of the measurement-error standard deviation; only
///   consulted when the likelihood spec enables additive measurement error.
/// - `correlated_in`: `Vec<(CorrelationAxis, String)>`
///   Mapping from correlation axis to the global parameter name supplying
///   that axis's correlation length.
///
/// Invariants
/// ----------
/// - No axis letter appears in more than one `correlated_in` key.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorDescriptor {
    /// Sensor name; experiments reference it as a key.
    pub name: String,
    /// Global parameter name of the model-error standard deviation.
    pub std_model: String,
    /// Global parameter name of the measurement-error standard deviation.
    pub std_measurement: String,
    /// Correlation axis → global correlation-length parameter name.
    pub correlated_in: Vec<(CorrelationAxis, String)>,
}

impl SensorDescriptor {
    /// Construct a descriptor with the conventional default parameter names
    /// (`std_model`, `std_measurement`) and no correlation axes.
    pub fn new(name: &str) -> SensorDescriptor {
        SensorDescriptor {
            name: name.to_string(),
            std_model: "std_model".to_string(),
            std_measurement: "std_measurement".to_string(),
            correlated_in: Vec::new(),
        }
    }

    /// Override the noise-parameter names.
    pub fn with_noise_prms(mut self, std_model: &str, std_measurement: &str) -> SensorDescriptor {
        self.std_model = std_model.to_string();
        self.std_measurement = std_measurement.to_string();
        self
    }

    /// Declare a correlation axis together with the global parameter name
    /// supplying its correlation length.
    ///
    /// # Errors
    /// - `ConfigError::DuplicateCorrelationVariable` when any variable of
    ///   `axis` already appears in a previously declared axis key.
    pub fn correlated_in(
        mut self, axis: CorrelationAxis, length_prm: &str,
    ) -> ConfigResult<SensorDescriptor> {
        for var in axis.variables() {
            let declared = self
                .correlated_in
                .iter()
                .any(|(existing, _)| existing.variables().contains(&var));
            if declared {
                return Err(ConfigError::DuplicateCorrelationVariable { letter: var.letter() });
            }
        }
        self.correlated_in.push((axis, length_prm.to_string()));
        Ok(self)
    }

    /// The correlation-length parameter name declared for an axis covering
    /// exactly the given variable set, if any.
    pub fn length_prm_for(&self, variables: &[AxisVar]) -> Option<&str> {
        self.correlated_in
            .iter()
            .find(|(axis, _)| {
                let covered = axis.variables();
                covered.len() == variables.len() && variables.iter().all(|v| covered.contains(v))
            })
            .map(|(_, prm)| prm.as_str())
    }
}
