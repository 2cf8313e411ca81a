//! Declarative problem-definition types consumed by the likelihood engine.
//!
//! This module holds the boundary data model: sensor descriptors with their
//! correlation metadata, experiment records as read from the (external)
//! experiment store, and the declarative Gaussian likelihood spec. All
//! configuration-level validation lives here; structural validation against
//! actual experiment data happens in [`crate::likelihood`].

pub mod errors;
pub mod experiment;
pub mod likelihood_model;
pub mod sensor;

pub use self::errors::{ConfigError, ConfigResult};
pub use self::experiment::{
    Experiment, ExperimentStore, ModelResponse, ParameterMap, SensorValue,
};
pub use self::likelihood_model::GaussianLikelihoodSpec;
pub use self::sensor::{AxisVar, CorrelationAxis, SensorDescriptor};
