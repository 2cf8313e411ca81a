//! Unified error handling for evaluator construction and evaluation.
//!
//! Two error families live here, mirroring the two phases of the engine:
//!
//! - [`StructuralError`]: raised while translating a likelihood spec against
//!   the experiment store, when the declared correlation structure does not
//!   match the actual experiment data. Structural errors are programming or
//!   data errors and are never downgraded to −∞.
//! - [`EvalError`]: raised per evaluation call, for missing parameters or
//!   malformed model responses. Out-of-domain *parameter values* are not
//!   errors; the evaluator returns `Ok(f64::NEG_INFINITY)` for those so
//!   samplers can continue.

/// Errors detected while validating experiment data against the declared
/// correlation structure.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralError {
    // ---- Resolution ----
    /// A named experiment is absent from the store.
    UnknownExperiment { experiment: String },

    /// A sensor has no correlation info entry in an experiment although the
    /// spec declares correlation variables.
    MissingCorrelationInfo { experiment: String, sensor: String },

    /// An experiment's correlation info does not name a value for a declared
    /// correlation variable.
    MissingCorrelationVariable { experiment: String, sensor: String, variable: char },

    /// A key referenced by correlation info is absent from the experiment's
    /// sensor values.
    MissingSensorValue { experiment: String, key: String },

    // ---- Axis structure ----
    /// Correlation variables that must share scalar/vector form across one
    /// sensor do not (e.g. a spatial pair given as one scalar, one vector).
    InconsistentAxisStructure { experiment: String, sensor: String },

    /// Both the spatial and the temporal variable carry vectors, so no
    /// single ordering axis can be identified.
    AmbiguousVectorAxes { experiment: String, sensor: String },

    /// Neither declared variable carries a vector, so there is no data axis
    /// to correlate along.
    NoVectorAxis { experiment: String, sensor: String },

    /// A scalar correlation value differs between experiments although the
    /// structure requires it to be shared.
    ScalarValueMismatch { sensor: String, variable: char },

    /// A vector correlation value differs across sensors or experiments
    /// although the structure requires a single shared grid.
    VectorAxisMismatch { sensor: String, variable: char },

    /// A correlation vector's length differs from the sensor's data length.
    AxisLengthMismatch {
        experiment: String,
        sensor: String,
        axis_len: usize,
        data_len: usize,
    },

    /// An ordering axis is not strictly increasing.
    UnorderedCoordinates { experiment: String, sensor: String },

    /// A sensor's measured vector holds no data points.
    EmptySensorData { experiment: String, sensor: String },

    // ---- Class restrictions ----
    /// The detected structure supports only a single sensor.
    TooManySensors { structure: String, given: usize },
}

pub type StructuralResult<T> = Result<T, StructuralError>;

impl std::error::Error for StructuralError {}

impl std::fmt::Display for StructuralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Resolution ----
            StructuralError::UnknownExperiment { experiment } => {
                write!(f, "Structural Error: Experiment '{experiment}' not found in the store")
            }
            StructuralError::MissingCorrelationInfo { experiment, sensor } => {
                write!(
                    f,
                    "Structural Error: Experiment '{experiment}' defines no correlation info \
                     for sensor '{sensor}'"
                )
            }
            StructuralError::MissingCorrelationVariable { experiment, sensor, variable } => {
                write!(
                    f,
                    "Structural Error: Experiment '{experiment}', sensor '{sensor}': no value \
                     declared for correlation variable '{variable}'"
                )
            }
            StructuralError::MissingSensorValue { experiment, key } => {
                write!(
                    f,
                    "Structural Error: Experiment '{experiment}' has no sensor value under \
                     key '{key}'"
                )
            }

            // ---- Axis structure ----
            StructuralError::InconsistentAxisStructure { experiment, sensor } => {
                write!(
                    f,
                    "Structural Error: Experiment '{experiment}', sensor '{sensor}': correlation \
                     variables mix scalar and vector values where a uniform form is required"
                )
            }
            StructuralError::AmbiguousVectorAxes { experiment, sensor } => {
                write!(
                    f,
                    "Structural Error: Experiment '{experiment}', sensor '{sensor}': more than \
                     one correlation variable carries a vector; the ordering axis is ambiguous"
                )
            }
            StructuralError::NoVectorAxis { experiment, sensor } => {
                write!(
                    f,
                    "Structural Error: Experiment '{experiment}', sensor '{sensor}': no \
                     correlation variable carries a vector to correlate along"
                )
            }
            StructuralError::ScalarValueMismatch { sensor, variable } => {
                write!(
                    f,
                    "Structural Error: Sensor '{sensor}': scalar value of correlation variable \
                     '{variable}' differs between experiments"
                )
            }
            StructuralError::VectorAxisMismatch { sensor, variable } => {
                write!(
                    f,
                    "Structural Error: Sensor '{sensor}': vector of correlation variable \
                     '{variable}' differs across sensors or experiments"
                )
            }
            StructuralError::AxisLengthMismatch { experiment, sensor, axis_len, data_len } => {
                write!(
                    f,
                    "Structural Error: Experiment '{experiment}', sensor '{sensor}': correlation \
                     vector has length {axis_len} but the data has length {data_len}"
                )
            }
            StructuralError::UnorderedCoordinates { experiment, sensor } => {
                write!(
                    f,
                    "Structural Error: Experiment '{experiment}', sensor '{sensor}': ordering \
                     coordinates must be strictly increasing"
                )
            }
            StructuralError::EmptySensorData { experiment, sensor } => {
                write!(
                    f,
                    "Structural Error: Experiment '{experiment}', sensor '{sensor}': measured \
                     vector holds no data points"
                )
            }

            // ---- Class restrictions ----
            StructuralError::TooManySensors { structure, given } => {
                write!(
                    f,
                    "Structural Error: The '{structure}' structure supports a single sensor; \
                     {given} were declared"
                )
            }
        }
    }
}

/// Errors raised per evaluation call.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A parameter name resolved at construction time is absent from the
    /// parameter map.
    MissingParameter { name: String },

    /// The model response carries no vector for an (experiment, sensor) pair.
    MissingResponse { experiment: String, sensor: String },

    /// A response vector's length differs from the measured data length.
    ResponseLengthMismatch {
        experiment: String,
        sensor: String,
        response_len: usize,
        data_len: usize,
    },
}

pub type EvalResult<T> = Result<T, EvalError>;

impl std::error::Error for EvalError {}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::MissingParameter { name } => {
                write!(f, "Evaluation Error: Parameter '{name}' missing from the parameter map")
            }
            EvalError::MissingResponse { experiment, sensor } => {
                write!(
                    f,
                    "Evaluation Error: No model response for experiment '{experiment}', \
                     sensor '{sensor}'"
                )
            }
            EvalError::ResponseLengthMismatch { experiment, sensor, response_len, data_len } => {
                write!(
                    f,
                    "Evaluation Error: Experiment '{experiment}', sensor '{sensor}': response \
                     has length {response_len} but the measured data has length {data_len}"
                )
            }
        }
    }
}
