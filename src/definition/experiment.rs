//! Experiment records and the boundary aliases of the likelihood engine.
//!
//! Purpose
//! -------
//! Represent the data the engine reads from its external collaborators: the
//! experiment store (measured values plus correlation metadata), the
//! forward-model execution component (model responses) and the parameter
//! component (a flat name → value map). The engine only ever reads these
//! types; ownership and persistence belong to the surrounding problem
//! definition.
//!
//! Key behaviors
//! -------------
//! - [`SensorValue`] holds either a scalar (one value identifying a channel,
//!   e.g. a sensor position) or a vector (one value per observed data
//!   point, e.g. a shared time series).
//! - [`Experiment`] couples measured sensor values with `correlation_info`,
//!   the per-sensor mapping from correlation axis to the key in
//!   `sensor_values` holding that axis's value for this experiment.
//!
//! Conventions
//! -----------
//! - Model responses are structured identically to measured values: one
//!   vector per (experiment, sensor) pair.
//! - Scalar measured values are treated as length-one vectors.
use crate::definition::sensor::AxisVar;
use ndarray::Array1;
use std::collections::HashMap;

/// A value recorded for one key of an experiment: a scalar or a vector.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorValue {
    /// One number, shared identically by every observation (e.g. a channel
    /// position or a discrete channel index).
    Scalar(f64),
    /// One value per observed data point (e.g. a time series).
    Vector(Array1<f64>),
}

impl SensorValue {
    /// Number of data points this value spans; scalars count as one.
    pub fn len_or_one(&self) -> usize {
        match self {
            SensorValue::Scalar(_) => 1,
            SensorValue::Vector(v) => v.len(),
        }
    }

    /// View the value as a vector, promoting a scalar to length one.
    pub fn to_vector(&self) -> Array1<f64> {
        match self {
            SensorValue::Scalar(s) => Array1::from_vec(vec![*s]),
            SensorValue::Vector(v) => v.clone(),
        }
    }

    /// The scalar payload, if this value is a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            SensorValue::Scalar(s) => Some(*s),
            SensorValue::Vector(_) => None,
        }
    }

    /// The vector payload, if this value is a vector.
    pub fn as_vector(&self) -> Option<&Array1<f64>> {
        match self {
            SensorValue::Scalar(_) => None,
            SensorValue::Vector(v) => Some(v),
        }
    }
}

/// `Experiment` — one experiment record as read from the experiment store.
///
/// Fields
/// ------
/// - `name`: experiment name, unique within the store.
/// - `forward_model`: name of the forward model that produced (or will
///   produce) the corresponding responses; carried for bookkeeping only.
/// - `sensor_values`: key → measured value. Keys cover both output sensors
///   and auxiliary series such as coordinate or time vectors.
/// - `correlation_info`: output sensor name → (correlation variable → key in
///   `sensor_values` holding that variable's value for this experiment).
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    pub name: String,
    pub forward_model: String,
    pub sensor_values: HashMap<String, SensorValue>,
    pub correlation_info: HashMap<String, HashMap<AxisVar, String>>,
}

impl Experiment {
    /// Construct an experiment record without correlation metadata.
    pub fn new(
        name: &str, forward_model: &str, sensor_values: HashMap<String, SensorValue>,
    ) -> Experiment {
        Experiment {
            name: name.to_string(),
            forward_model: forward_model.to_string(),
            sensor_values,
            correlation_info: HashMap::new(),
        }
    }

    /// Attach the correlation info of one output sensor: which key of
    /// `sensor_values` supplies each declared correlation variable.
    pub fn with_correlation_info(
        mut self, sensor: &str, info: HashMap<AxisVar, String>,
    ) -> Experiment {
        self.correlation_info.insert(sensor.to_string(), info);
        self
    }
}

/// Experiment name → experiment record; owned by the external store.
pub type ExperimentStore = HashMap<String, Experiment>;

/// Experiment name → (sensor name → model response vector); produced by the
/// external forward-model execution component per evaluation.
pub type ModelResponse = HashMap<String, HashMap<String, Array1<f64>>>;

/// Flat global parameter name → current numeric value; produced by the
/// external parameter/prior component per evaluation.
pub type ParameterMap = HashMap<String, f64>;

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Scalar/vector accessors of `SensorValue`.
    // - Experiment construction with correlation info attached per sensor.
    // -------------------------------------------------------------------------

    #[test]
    fn sensor_value_promotes_scalars_to_length_one_vectors() {
        let scalar = SensorValue::Scalar(3.5);
        let vector = SensorValue::Vector(array![1.0, 2.0]);

        assert_eq!(scalar.len_or_one(), 1);
        assert_eq!(vector.len_or_one(), 2);
        assert_eq!(scalar.to_vector(), array![3.5]);
        assert_eq!(scalar.as_scalar(), Some(3.5));
        assert!(vector.as_scalar().is_none());
        assert_eq!(vector.as_vector().unwrap(), &array![1.0, 2.0]);
    }

    #[test]
    fn experiment_attaches_correlation_info_per_sensor() {
        let mut values = HashMap::new();
        values.insert("y".to_string(), SensorValue::Vector(array![0.1, 0.2]));
        values.insert("pos".to_string(), SensorValue::Vector(array![0.0, 1.0]));

        let mut info = HashMap::new();
        info.insert(AxisVar::X, "pos".to_string());
        let experiment = Experiment::new("Exp_1", "FwdModel", values)
            .with_correlation_info("y", info.clone());

        assert_eq!(experiment.correlation_info.get("y"), Some(&info));
        assert_eq!(experiment.forward_model, "FwdModel");
    }
}
