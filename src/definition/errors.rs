//! Unified error handling for problem-definition types.
//!
//! This module defines `ConfigError`, the central error type raised while a
//! likelihood spec or sensor descriptor is being constructed. Configuration
//! errors are fatal and surfaced immediately; they are never deferred to
//! evaluation time and never downgraded to −∞. An alias `ConfigResult<T>`
//! standardizes the return type across definition code.

/// Unified error type for declarative configuration.
///
/// Covers unknown kernel names, inconsistent model-error flags, and invalid
/// correlation-variable declarations. Designed to provide readable
/// diagnostics through `Display`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    // ---- Correlation model ----
    /// The requested correlation model name is not a known kernel.
    UnknownCorrelationModel { name: String },

    // ---- Model-error flags ----
    /// Exactly one of additive/multiplicative model error must be set.
    InconsistentModelErrorFlags { additive: bool, multiplicative: bool },

    // ---- Correlation variables ----
    /// A correlation-variable letter is outside the {x, y, z, t} alphabet.
    UnknownCorrelationVariable { letter: char },

    /// The same correlation variable was declared twice.
    DuplicateCorrelationVariable { letter: char },

    /// More correlation variables than any supported structure can carry.
    TooManyCorrelationVariables { given: String, max: usize },

    // ---- Sensors ----
    /// A sensor declares parameter names differing from its siblings on the
    /// same likelihood spec.
    InconsistentSensorParameters { sensor: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Correlation model ----
            ConfigError::UnknownCorrelationModel { name } => {
                write!(f, "Config Error: Unknown correlation model '{name}' (known: 'exp')")
            }

            // ---- Model-error flags ----
            ConfigError::InconsistentModelErrorFlags { additive, multiplicative } => {
                write!(
                    f,
                    "Config Error: Exactly one of additive/multiplicative model error must be \
                     set; got additive={additive}, multiplicative={multiplicative}"
                )
            }

            // ---- Correlation variables ----
            ConfigError::UnknownCorrelationVariable { letter } => {
                write!(
                    f,
                    "Config Error: Correlation variable '{letter}' is not one of 'x', 'y', 'z', 't'"
                )
            }
            ConfigError::DuplicateCorrelationVariable { letter } => {
                write!(f, "Config Error: Correlation variable '{letter}' declared more than once")
            }
            ConfigError::TooManyCorrelationVariables { given, max } => {
                write!(
                    f,
                    "Config Error: Correlation variables '{given}' exceed the supported maximum \
                     of {max}"
                )
            }

            // ---- Sensors ----
            ConfigError::InconsistentSensorParameters { sensor } => {
                write!(
                    f,
                    "Config Error: Sensor '{sensor}' declares noise or correlation-length \
                     parameter names differing from the other sensors of the same likelihood"
                )
            }
        }
    }
}
