//! Translation of declarative likelihood specs into structured evaluators.
//!
//! Purpose
//! -------
//! Bridge the declarative problem definition and the numeric evaluation
//! paths: [`classify`] maps a validated spec to its covariance structure,
//! and [`translate`] resolves the spec against the experiment store,
//! validates that the experiment data actually fits the declared structure,
//! and assembles an immutable [`Evaluator`].
//!
//! Key behaviors
//! -------------
//! - Classification is a pure function of the correlation variables: no
//!   variables → uncorrelated; one variable → 1D; several spatial variables
//!   → dense spatial; spatial variables plus time → separable space-time.
//! - Space-time structures identify the *channel* axis (the one whose value
//!   is a per-sensor scalar) and the *grid* axis (the shared vector). With
//!   one spatial variable either axis may play either role; the
//!   `channel_axis_time` flag records the assignment so evaluation applies
//!   each axis's correlation length to the right factor.
//! - All structural checks happen here, once; evaluation never re-validates
//!   coordinates.
//!
//! Invariants & assumptions
//! ------------------------
//! - The likelihood spec was already validated at construction (flags, variable
//!   alphabet, kernel name), so [`classify`] is infallible.
//! - Experiments are kept in spec order, making translation deterministic.
use crate::definition::experiment::{Experiment, ExperimentStore, SensorValue};
use crate::definition::likelihood_model::GaussianLikelihoodSpec;
use crate::definition::sensor::AxisVar;
use crate::likelihood::errors::{StructuralError, StructuralResult};
use crate::likelihood::evaluator::{
    Channel, ErrorModel, Evaluator, ParameterRoles, Series1D, SpaceBlock, SpaceTimeBlock,
    StructuralClass, StructureData,
};
use ndarray::{Array1, Array2};

/// Determine the covariance structure of a validated likelihood spec.
pub fn classify(spec: &GaussianLikelihoodSpec) -> StructuralClass {
    let has_time = spec.has_temporal_variable();
    let n_spatial = spec.spatial_variables().len();
    match (n_spatial, has_time) {
        (0, false) => StructuralClass::Uncorrelated,
        (0, true) | (1, false) => StructuralClass::Correlated1D,
        (1, true) => StructuralClass::SpaceTimeCorrelated1D,
        (_, false) => StructuralClass::SpaceCorrelated2D3D,
        (_, true) => StructuralClass::SpaceTimeCorrelated2D3D,
    }
}

/// Resolve a likelihood spec against the experiment store and build the
/// matching evaluator.
///
/// # Errors
/// - `StructuralError::UnknownExperiment` for experiment names absent from
///   the store.
/// - Any of the structural variants when the experiment data does not fit
///   the declared correlation structure (see [`StructuralError`]).
pub fn translate(
    spec: &GaussianLikelihoodSpec, store: &ExperimentStore,
) -> StructuralResult<Evaluator> {
    let class = classify(spec);
    let experiments = resolve_experiments(spec, store)?;
    let structure = match class {
        StructuralClass::Uncorrelated => build_uncorrelated(spec, &experiments)?,
        StructuralClass::Correlated1D => build_correlated_1d(spec, &experiments, class)?,
        StructuralClass::SpaceCorrelated2D3D => build_space(spec, &experiments, class)?,
        StructuralClass::SpaceTimeCorrelated1D => build_space_time_1d(spec, &experiments)?,
        StructuralClass::SpaceTimeCorrelated2D3D => build_space_time_2d3d(spec, &experiments)?,
    };
    Ok(Evaluator {
        name: spec.name.clone(),
        class,
        error_model: if spec.additive_model_error {
            ErrorModel::Additive
        } else {
            ErrorModel::Multiplicative
        },
        additive_measurement_error: spec.additive_measurement_error,
        kernel: spec.correlation_model,
        prms: resolve_parameter_roles(spec, class),
        structure,
    })
}

// -----------------------------------------------------------------------------
// Resolution helpers
// -----------------------------------------------------------------------------

fn resolve_experiments<'a>(
    spec: &GaussianLikelihoodSpec, store: &'a ExperimentStore,
) -> StructuralResult<Vec<&'a Experiment>> {
    spec.experiment_names
        .iter()
        .map(|name| {
            store.get(name).ok_or_else(|| StructuralError::UnknownExperiment {
                experiment: name.clone(),
            })
        })
        .collect()
}

/// Resolve the global parameter names the structure consumes, falling back
/// to the conventional defaults where the sensor declares none. The spec
/// constructor guarantees all sensors agree on these names, so the first
/// sensor is representative.
fn resolve_parameter_roles(
    spec: &GaussianLikelihoodSpec, class: StructuralClass,
) -> ParameterRoles {
    let first = spec.sensors.first();
    let std_model = first
        .map(|s| s.std_model.clone())
        .unwrap_or_else(|| "std_model".to_string());
    let std_measurement = if spec.additive_measurement_error {
        Some(
            first
                .map(|s| s.std_measurement.clone())
                .unwrap_or_else(|| "std_measurement".to_string()),
        )
    } else {
        None
    };

    let (length_space, length_time) = match class {
        StructuralClass::Uncorrelated => (None, None),
        StructuralClass::Correlated1D => {
            let var = spec.correlation_variables[0];
            let name = first
                .and_then(|s| s.length_prm_for(&[var]))
                .unwrap_or("l_corr")
                .to_string();
            (Some(name), None)
        }
        StructuralClass::SpaceCorrelated2D3D => {
            let spatial = spec.spatial_variables();
            let name = first
                .and_then(|s| s.length_prm_for(&spatial))
                .unwrap_or("l_corr")
                .to_string();
            (Some(name), None)
        }
        StructuralClass::SpaceTimeCorrelated1D | StructuralClass::SpaceTimeCorrelated2D3D => {
            let spatial = spec.spatial_variables();
            let space = first
                .and_then(|s| s.length_prm_for(&spatial))
                .unwrap_or("l_corr_space")
                .to_string();
            let time = first
                .and_then(|s| s.length_prm_for(&[AxisVar::T]))
                .unwrap_or("l_corr_time")
                .to_string();
            (Some(space), Some(time))
        }
    };

    ParameterRoles { std_model, std_measurement, length_space, length_time }
}

/// Look up the measured data vector of one sensor in one experiment.
///
/// Empty vectors are rejected here: a series without data points carries no
/// likelihood information and would reach the numeric routines with
/// zero-length arrays.
fn sensor_data(exp: &Experiment, sensor: &str) -> StructuralResult<Array1<f64>> {
    let data = exp
        .sensor_values
        .get(sensor)
        .map(SensorValue::to_vector)
        .ok_or_else(|| StructuralError::MissingSensorValue {
            experiment: exp.name.clone(),
            key: sensor.to_string(),
        })?;
    if data.is_empty() {
        return Err(StructuralError::EmptySensorData {
            experiment: exp.name.clone(),
            sensor: sensor.to_string(),
        });
    }
    Ok(data)
}

/// Look up the value declared for one correlation variable of one sensor.
fn axis_value<'a>(
    exp: &'a Experiment, sensor: &str, var: AxisVar,
) -> StructuralResult<&'a SensorValue> {
    let info = exp.correlation_info.get(sensor).ok_or_else(|| {
        StructuralError::MissingCorrelationInfo {
            experiment: exp.name.clone(),
            sensor: sensor.to_string(),
        }
    })?;
    let key = info.get(&var).ok_or_else(|| StructuralError::MissingCorrelationVariable {
        experiment: exp.name.clone(),
        sensor: sensor.to_string(),
        variable: var.letter(),
    })?;
    exp.sensor_values.get(key).ok_or_else(|| StructuralError::MissingSensorValue {
        experiment: exp.name.clone(),
        key: key.clone(),
    })
}

fn is_strictly_increasing(v: &Array1<f64>) -> bool {
    (1..v.len()).all(|i| v[i - 1] < v[i])
}

fn require_single_sensor(
    spec: &GaussianLikelihoodSpec, class: StructuralClass,
) -> StructuralResult<()> {
    if spec.sensors.len() > 1 {
        return Err(StructuralError::TooManySensors {
            structure: class.name().to_string(),
            given: spec.sensors.len(),
        });
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Per-structure builders
// -----------------------------------------------------------------------------

fn build_uncorrelated(
    spec: &GaussianLikelihoodSpec, experiments: &[&Experiment],
) -> StructuralResult<StructureData> {
    let mut channels = Vec::with_capacity(experiments.len() * spec.sensors.len());
    for exp in experiments {
        for sensor in &spec.sensors {
            channels.push(Channel {
                experiment: exp.name.clone(),
                sensor: sensor.name.clone(),
                data: sensor_data(exp, &sensor.name)?,
            });
        }
    }
    Ok(StructureData::Uncorrelated { channels })
}

fn build_correlated_1d(
    spec: &GaussianLikelihoodSpec, experiments: &[&Experiment], class: StructuralClass,
) -> StructuralResult<StructureData> {
    require_single_sensor(spec, class)?;
    let sensor = match spec.sensors.first() {
        Some(sensor) => sensor,
        None => return Ok(StructureData::Correlated1D { series: Vec::new() }),
    };
    let var = spec.correlation_variables[0];

    let mut series = Vec::with_capacity(experiments.len());
    for exp in experiments {
        let data = sensor_data(exp, &sensor.name)?;
        let coords = axis_value(exp, &sensor.name, var)?.to_vector();
        if coords.len() != data.len() {
            return Err(StructuralError::AxisLengthMismatch {
                experiment: exp.name.clone(),
                sensor: sensor.name.clone(),
                axis_len: coords.len(),
                data_len: data.len(),
            });
        }
        if !is_strictly_increasing(&coords) {
            return Err(StructuralError::UnorderedCoordinates {
                experiment: exp.name.clone(),
                sensor: sensor.name.clone(),
            });
        }
        series.push(Series1D {
            experiment: exp.name.clone(),
            sensor: sensor.name.clone(),
            data,
            coords,
        });
    }
    Ok(StructureData::Correlated1D { series })
}

fn build_space(
    spec: &GaussianLikelihoodSpec, experiments: &[&Experiment], class: StructuralClass,
) -> StructuralResult<StructureData> {
    require_single_sensor(spec, class)?;
    let sensor = match spec.sensors.first() {
        Some(sensor) => sensor,
        None => return Ok(StructureData::Space2D3D { blocks: Vec::new() }),
    };
    let spatial = spec.spatial_variables();

    let mut blocks = Vec::with_capacity(experiments.len());
    for exp in experiments {
        let data = sensor_data(exp, &sensor.name)?;
        let n = data.len();

        let values: Vec<&SensorValue> = spatial
            .iter()
            .map(|var| axis_value(exp, &sensor.name, *var))
            .collect::<StructuralResult<_>>()?;
        let any_scalar = values.iter().any(|v| matches!(v, SensorValue::Scalar(_)));
        let any_vector = values.iter().any(|v| matches!(v, SensorValue::Vector(_)));
        if any_scalar && any_vector {
            return Err(StructuralError::InconsistentAxisStructure {
                experiment: exp.name.clone(),
                sensor: sensor.name.clone(),
            });
        }

        let mut points = Array2::<f64>::zeros((n, spatial.len()));
        for (k, value) in values.iter().enumerate() {
            let column = value.to_vector();
            if column.len() != n {
                return Err(StructuralError::AxisLengthMismatch {
                    experiment: exp.name.clone(),
                    sensor: sensor.name.clone(),
                    axis_len: column.len(),
                    data_len: n,
                });
            }
            for i in 0..n {
                points[[i, k]] = column[i];
            }
        }
        blocks.push(SpaceBlock {
            experiment: exp.name.clone(),
            sensor: sensor.name.clone(),
            data,
            points,
        });
    }
    Ok(StructureData::Space2D3D { blocks })
}

/// Build the separable structure for one spatial variable plus time.
///
/// Either variable may carry the per-sensor scalar; the first sensor of the
/// first experiment fixes the assignment and every other (sensor,
/// experiment) pair must agree with it.
fn build_space_time_1d(
    spec: &GaussianLikelihoodSpec, experiments: &[&Experiment],
) -> StructuralResult<StructureData> {
    let spatial_var = spec.spatial_variables()[0];
    let nc = spec.sensors.len();
    let sensors: Vec<String> = spec.sensors.iter().map(|s| s.name.clone()).collect();

    let mut channel_axis_time: Option<bool> = None;
    let mut channel_vals: Vec<Option<f64>> = vec![None; nc];
    let mut grid: Option<Array1<f64>> = None;
    let mut blocks = Vec::with_capacity(experiments.len());

    for exp in experiments {
        let mut rows: Vec<Array1<f64>> = Vec::with_capacity(nc);
        for (idx, sensor) in spec.sensors.iter().enumerate() {
            let space_value = axis_value(exp, &sensor.name, spatial_var)?;
            let time_value = axis_value(exp, &sensor.name, AxisVar::T)?;
            let (scalar_is_time, scalar_val, vector) = match (space_value, time_value) {
                (SensorValue::Scalar(s), SensorValue::Vector(t)) => (false, *s, t),
                (SensorValue::Vector(x), SensorValue::Scalar(t)) => (true, *t, x),
                (SensorValue::Vector(_), SensorValue::Vector(_)) => {
                    return Err(StructuralError::AmbiguousVectorAxes {
                        experiment: exp.name.clone(),
                        sensor: sensor.name.clone(),
                    });
                }
                (SensorValue::Scalar(_), SensorValue::Scalar(_)) => {
                    return Err(StructuralError::NoVectorAxis {
                        experiment: exp.name.clone(),
                        sensor: sensor.name.clone(),
                    });
                }
            };

            match channel_axis_time {
                None => channel_axis_time = Some(scalar_is_time),
                Some(flag) if flag != scalar_is_time => {
                    return Err(StructuralError::InconsistentAxisStructure {
                        experiment: exp.name.clone(),
                        sensor: sensor.name.clone(),
                    });
                }
                Some(_) => {}
            }

            let scalar_var = if scalar_is_time { AxisVar::T } else { spatial_var };
            match channel_vals[idx] {
                None => channel_vals[idx] = Some(scalar_val),
                Some(existing) if existing != scalar_val => {
                    return Err(StructuralError::ScalarValueMismatch {
                        sensor: sensor.name.clone(),
                        variable: scalar_var.letter(),
                    });
                }
                Some(_) => {}
            }

            let vector_var = if scalar_is_time { spatial_var } else { AxisVar::T };
            match &grid {
                None => {
                    if !is_strictly_increasing(vector) {
                        return Err(StructuralError::UnorderedCoordinates {
                            experiment: exp.name.clone(),
                            sensor: sensor.name.clone(),
                        });
                    }
                    grid = Some(vector.clone());
                }
                Some(g) if g != vector => {
                    return Err(StructuralError::VectorAxisMismatch {
                        sensor: sensor.name.clone(),
                        variable: vector_var.letter(),
                    });
                }
                Some(_) => {}
            }

            let data_row = sensor_data(exp, &sensor.name)?;
            if data_row.len() != vector.len() {
                return Err(StructuralError::AxisLengthMismatch {
                    experiment: exp.name.clone(),
                    sensor: sensor.name.clone(),
                    axis_len: vector.len(),
                    data_len: data_row.len(),
                });
            }
            rows.push(data_row);
        }
        blocks.push(SpaceTimeBlock {
            experiment: exp.name.clone(),
            data: stack_rows(&rows),
        });
    }

    let channel_coords =
        Array2::from_shape_fn((nc, 1), |(i, _)| channel_vals[i].unwrap_or(0.0));
    Ok(StructureData::SpaceTime {
        sensors,
        channel_coords,
        channel_axis_time: channel_axis_time.unwrap_or(false),
        grid: grid.unwrap_or_else(|| Array1::zeros(0)),
        blocks,
    })
}

/// Build the separable structure for two spatial variables plus time: the
/// sensors sit at scalar positions in the plane and share one time grid.
fn build_space_time_2d3d(
    spec: &GaussianLikelihoodSpec, experiments: &[&Experiment],
) -> StructuralResult<StructureData> {
    let spatial = spec.spatial_variables();
    let nc = spec.sensors.len();
    let d = spatial.len();
    let sensors: Vec<String> = spec.sensors.iter().map(|s| s.name.clone()).collect();

    let mut channel_vals: Vec<Option<Vec<f64>>> = vec![None; nc];
    let mut grid: Option<Array1<f64>> = None;
    let mut blocks = Vec::with_capacity(experiments.len());

    for exp in experiments {
        let mut rows: Vec<Array1<f64>> = Vec::with_capacity(nc);
        for (idx, sensor) in spec.sensors.iter().enumerate() {
            let mut position = Vec::with_capacity(d);
            for var in &spatial {
                match axis_value(exp, &sensor.name, *var)? {
                    SensorValue::Scalar(s) => position.push(*s),
                    SensorValue::Vector(_) => {
                        return Err(StructuralError::InconsistentAxisStructure {
                            experiment: exp.name.clone(),
                            sensor: sensor.name.clone(),
                        });
                    }
                }
            }
            let time = match axis_value(exp, &sensor.name, AxisVar::T)? {
                SensorValue::Vector(t) => t,
                SensorValue::Scalar(_) => {
                    return Err(StructuralError::NoVectorAxis {
                        experiment: exp.name.clone(),
                        sensor: sensor.name.clone(),
                    });
                }
            };

            match &channel_vals[idx] {
                None => channel_vals[idx] = Some(position),
                Some(existing) if *existing != position => {
                    // name the first differing component in the diagnostic
                    let letter = spatial
                        .iter()
                        .zip(existing.iter().zip(position.iter()))
                        .find(|(_, (a, b))| a != b)
                        .map(|(var, _)| var.letter())
                        .unwrap_or(spatial[0].letter());
                    return Err(StructuralError::ScalarValueMismatch {
                        sensor: sensor.name.clone(),
                        variable: letter,
                    });
                }
                Some(_) => {}
            }

            match &grid {
                None => {
                    if !is_strictly_increasing(time) {
                        return Err(StructuralError::UnorderedCoordinates {
                            experiment: exp.name.clone(),
                            sensor: sensor.name.clone(),
                        });
                    }
                    grid = Some(time.clone());
                }
                Some(g) if g != time => {
                    return Err(StructuralError::VectorAxisMismatch {
                        sensor: sensor.name.clone(),
                        variable: 't',
                    });
                }
                Some(_) => {}
            }

            let data_row = sensor_data(exp, &sensor.name)?;
            if data_row.len() != time.len() {
                return Err(StructuralError::AxisLengthMismatch {
                    experiment: exp.name.clone(),
                    sensor: sensor.name.clone(),
                    axis_len: time.len(),
                    data_len: data_row.len(),
                });
            }
            rows.push(data_row);
        }
        blocks.push(SpaceTimeBlock {
            experiment: exp.name.clone(),
            data: stack_rows(&rows),
        });
    }

    let channel_coords = Array2::from_shape_fn((nc, d), |(i, k)| {
        channel_vals[i].as_ref().map(|p| p[k]).unwrap_or(0.0)
    });
    Ok(StructureData::SpaceTime {
        sensors,
        channel_coords,
        channel_axis_time: false,
        grid: grid.unwrap_or_else(|| Array1::zeros(0)),
        blocks,
    })
}

/// Stack equally long rows into a (rows × len) matrix.
fn stack_rows(rows: &[Array1<f64>]) -> Array2<f64> {
    let ng = rows.first().map(|r| r.len()).unwrap_or(0);
    Array2::from_shape_fn((rows.len(), ng), |(i, j)| rows[i][j])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::sensor::{CorrelationAxis, SensorDescriptor};
    use ndarray::array;
    use std::collections::HashMap;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Classification of every correlation-variable combination.
    // - Parameter-role resolution, explicit names and defaults.
    // - Structural validation: missing metadata, ambiguous axes, mismatched
    //   grids, unordered coordinates, sensor-count restrictions.
    // - The channel/grid role swap of the 1D space-time structure.
    // -------------------------------------------------------------------------

    fn spec_for(variables: &str, sensors: Vec<SensorDescriptor>) -> GaussianLikelihoodSpec {
        GaussianLikelihoodSpec::new(
            "L1",
            sensors,
            vec!["Exp_1".to_string()],
            true,
            false,
            false,
            variables,
            "exp",
        )
        .unwrap()
    }

    fn store_with(experiment: Experiment) -> ExperimentStore {
        let mut store = HashMap::new();
        store.insert(experiment.name.clone(), experiment);
        store
    }

    fn values(pairs: Vec<(&str, SensorValue)>) -> HashMap<String, SensorValue> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    fn info(pairs: Vec<(AxisVar, &str)>) -> HashMap<AxisVar, String> {
        pairs.into_iter().map(|(k, v)| (k, v.to_string())).collect()
    }

    #[test]
    fn classify_covers_every_variable_combination() {
        let cases = [
            ("", StructuralClass::Uncorrelated),
            ("x", StructuralClass::Correlated1D),
            ("t", StructuralClass::Correlated1D),
            ("xy", StructuralClass::SpaceCorrelated2D3D),
            ("xyz", StructuralClass::SpaceCorrelated2D3D),
            ("xt", StructuralClass::SpaceTimeCorrelated1D),
            ("zt", StructuralClass::SpaceTimeCorrelated1D),
            ("xyt", StructuralClass::SpaceTimeCorrelated2D3D),
        ];
        for (variables, expected) in cases {
            assert_eq!(classify(&spec_for(variables, vec![])), expected, "{variables}");
        }
    }

    #[test]
    fn unknown_experiment_names_are_rejected() {
        let spec = spec_for("", vec![SensorDescriptor::new("y")]);
        let result = translate(&spec, &HashMap::new());
        assert_eq!(
            result.unwrap_err(),
            StructuralError::UnknownExperiment { experiment: "Exp_1".to_string() }
        );
    }

    #[test]
    // Purpose
    // -------
    // Explicit per-sensor parameter names override the conventional
    // defaults during role resolution.
    fn parameter_roles_prefer_explicit_sensor_names() {
        let sensor = SensorDescriptor::new("y")
            .with_noise_prms("sigma", "sigma_d")
            .correlated_in(CorrelationAxis::Single(AxisVar::T), "l_t")
            .unwrap();
        let spec = spec_for("t", vec![sensor]);
        let roles = resolve_parameter_roles(&spec, classify(&spec));

        assert_eq!(roles.std_model, "sigma");
        assert_eq!(roles.std_measurement, None); // measurement error disabled
        assert_eq!(roles.length_space.as_deref(), Some("l_t"));
        assert_eq!(roles.length_time, None);
    }

    #[test]
    fn parameter_roles_fall_back_to_conventional_defaults() {
        let spec = spec_for("xt", vec![SensorDescriptor::new("y")]);
        let roles = resolve_parameter_roles(&spec, classify(&spec));

        assert_eq!(roles.std_model, "std_model");
        assert_eq!(roles.length_space.as_deref(), Some("l_corr_space"));
        assert_eq!(roles.length_time.as_deref(), Some("l_corr_time"));
    }

    #[test]
    fn correlated_1d_requires_matching_ordered_coordinates() {
        let spec = spec_for("t", vec![SensorDescriptor::new("y")]);

        let unordered = Experiment::new(
            "Exp_1",
            "Fwd",
            values(vec![
                ("y", SensorValue::Vector(array![1.0, 2.0, 3.0])),
                ("time", SensorValue::Vector(array![0.0, 2.0, 1.0])),
            ]),
        )
        .with_correlation_info("y", info(vec![(AxisVar::T, "time")]));
        assert_eq!(
            translate(&spec, &store_with(unordered)).unwrap_err(),
            StructuralError::UnorderedCoordinates {
                experiment: "Exp_1".to_string(),
                sensor: "y".to_string()
            }
        );

        let short_axis = Experiment::new(
            "Exp_1",
            "Fwd",
            values(vec![
                ("y", SensorValue::Vector(array![1.0, 2.0, 3.0])),
                ("time", SensorValue::Vector(array![0.0, 1.0])),
            ]),
        )
        .with_correlation_info("y", info(vec![(AxisVar::T, "time")]));
        assert_eq!(
            translate(&spec, &store_with(short_axis)).unwrap_err(),
            StructuralError::AxisLengthMismatch {
                experiment: "Exp_1".to_string(),
                sensor: "y".to_string(),
                axis_len: 2,
                data_len: 3
            }
        );
    }

    #[test]
    // Purpose
    // -------
    // A sensor with an empty measured vector must be rejected during
    // translation; letting it through would hand zero-length arrays to the
    // numeric routines at evaluation time.
    //
    // Given
    // -----
    // - A 1D time-correlated sensor whose data and time vectors are empty.
    //
    // Expect
    // ------
    // - Translation fails with `EmptySensorData` instead of producing an
    //   evaluator.
    fn empty_measured_vectors_are_rejected_at_translation() {
        let spec = spec_for("t", vec![SensorDescriptor::new("y")]);
        let empty = Experiment::new(
            "Exp_1",
            "Fwd",
            values(vec![
                ("y", SensorValue::Vector(Array1::zeros(0))),
                ("time", SensorValue::Vector(Array1::zeros(0))),
            ]),
        )
        .with_correlation_info("y", info(vec![(AxisVar::T, "time")]));

        assert_eq!(
            translate(&spec, &store_with(empty)).unwrap_err(),
            StructuralError::EmptySensorData {
                experiment: "Exp_1".to_string(),
                sensor: "y".to_string()
            }
        );
    }

    #[test]
    fn correlated_1d_rejects_multiple_sensors() {
        let spec = spec_for(
            "t",
            vec![SensorDescriptor::new("y1"), SensorDescriptor::new("y2")],
        );
        let experiment = Experiment::new("Exp_1", "Fwd", values(vec![]));
        assert_eq!(
            translate(&spec, &store_with(experiment)).unwrap_err(),
            StructuralError::TooManySensors {
                structure: "correlated-1d".to_string(),
                given: 2
            }
        );
    }

    #[test]
    fn missing_correlation_metadata_is_reported_precisely() {
        let spec = spec_for("t", vec![SensorDescriptor::new("y")]);

        let no_info = Experiment::new(
            "Exp_1",
            "Fwd",
            values(vec![("y", SensorValue::Vector(array![1.0]))]),
        );
        assert_eq!(
            translate(&spec, &store_with(no_info)).unwrap_err(),
            StructuralError::MissingCorrelationInfo {
                experiment: "Exp_1".to_string(),
                sensor: "y".to_string()
            }
        );

        let wrong_variable = Experiment::new(
            "Exp_1",
            "Fwd",
            values(vec![("y", SensorValue::Vector(array![1.0]))]),
        )
        .with_correlation_info("y", info(vec![(AxisVar::X, "y")]));
        assert_eq!(
            translate(&spec, &store_with(wrong_variable)).unwrap_err(),
            StructuralError::MissingCorrelationVariable {
                experiment: "Exp_1".to_string(),
                sensor: "y".to_string(),
                variable: 't'
            }
        );

        let dangling_key = Experiment::new(
            "Exp_1",
            "Fwd",
            values(vec![("y", SensorValue::Vector(array![1.0]))]),
        )
        .with_correlation_info("y", info(vec![(AxisVar::T, "time")]));
        assert_eq!(
            translate(&spec, &store_with(dangling_key)).unwrap_err(),
            StructuralError::MissingSensorValue {
                experiment: "Exp_1".to_string(),
                key: "time".to_string()
            }
        );
    }

    fn space_time_sensor(name: &str, position: SensorValue, time: SensorValue) -> Experiment {
        Experiment::new(
            "Exp_1",
            "Fwd",
            values(vec![
                (name, SensorValue::Vector(array![1.0, 2.0, 3.0])),
                ("pos", position),
                ("time", time),
            ]),
        )
        .with_correlation_info(
            name,
            info(vec![(AxisVar::X, "pos"), (AxisVar::T, "time")]),
        )
    }

    #[test]
    // Purpose
    // -------
    // With one spatial variable plus time, the scalar-valued axis becomes
    // the channel axis; the role swap is recorded in `channel_axis_time`.
    fn space_time_1d_assigns_channel_and_grid_roles() {
        let spec = spec_for("xt", vec![SensorDescriptor::new("y")]);

        let spatial_channels = space_time_sensor(
            "y",
            SensorValue::Scalar(0.5),
            SensorValue::Vector(array![0.0, 1.0, 2.0]),
        );
        let evaluator = translate(&spec, &store_with(spatial_channels)).unwrap();
        match &evaluator.structure {
            StructureData::SpaceTime { channel_axis_time, channel_coords, grid, .. } => {
                assert!(!*channel_axis_time);
                assert_eq!(channel_coords[[0, 0]], 0.5);
                assert_eq!(grid, &array![0.0, 1.0, 2.0]);
            }
            other => panic!("unexpected structure: {other:?}"),
        }

        let temporal_channels = space_time_sensor(
            "y",
            SensorValue::Vector(array![0.0, 1.0, 2.0]),
            SensorValue::Scalar(4.0),
        );
        let evaluator = translate(&spec, &store_with(temporal_channels)).unwrap();
        match &evaluator.structure {
            StructureData::SpaceTime { channel_axis_time, channel_coords, .. } => {
                assert!(*channel_axis_time);
                assert_eq!(channel_coords[[0, 0]], 4.0);
            }
            other => panic!("unexpected structure: {other:?}"),
        }
    }

    #[test]
    fn space_time_1d_rejects_ambiguous_and_missing_vector_axes() {
        let spec = spec_for("xt", vec![SensorDescriptor::new("y")]);

        let both_vectors = space_time_sensor(
            "y",
            SensorValue::Vector(array![0.0, 1.0, 2.0]),
            SensorValue::Vector(array![0.0, 1.0, 2.0]),
        );
        assert_eq!(
            translate(&spec, &store_with(both_vectors)).unwrap_err(),
            StructuralError::AmbiguousVectorAxes {
                experiment: "Exp_1".to_string(),
                sensor: "y".to_string()
            }
        );

        let both_scalars =
            space_time_sensor("y", SensorValue::Scalar(0.5), SensorValue::Scalar(1.0));
        assert_eq!(
            translate(&spec, &store_with(both_scalars)).unwrap_err(),
            StructuralError::NoVectorAxis {
                experiment: "Exp_1".to_string(),
                sensor: "y".to_string()
            }
        );
    }

    #[test]
    // Purpose
    // -------
    // Two sensors sharing one time grid form a two-channel structure; a
    // sensor bringing a different grid is rejected.
    fn space_time_1d_requires_one_shared_grid_across_sensors() {
        let spec = spec_for(
            "xt",
            vec![SensorDescriptor::new("y1"), SensorDescriptor::new("y2")],
        );
        let shared = Experiment::new(
            "Exp_1",
            "Fwd",
            values(vec![
                ("y1", SensorValue::Vector(array![1.0, 2.0])),
                ("y2", SensorValue::Vector(array![3.0, 4.0])),
                ("p1", SensorValue::Scalar(0.0)),
                ("p2", SensorValue::Scalar(1.0)),
                ("time", SensorValue::Vector(array![0.0, 1.0])),
            ]),
        )
        .with_correlation_info("y1", info(vec![(AxisVar::X, "p1"), (AxisVar::T, "time")]))
        .with_correlation_info("y2", info(vec![(AxisVar::X, "p2"), (AxisVar::T, "time")]));
        let evaluator = translate(&spec, &store_with(shared)).unwrap();
        match &evaluator.structure {
            StructureData::SpaceTime { sensors, channel_coords, blocks, .. } => {
                assert_eq!(sensors, &vec!["y1".to_string(), "y2".to_string()]);
                assert_eq!(channel_coords[[1, 0]], 1.0);
                assert_eq!(blocks[0].data, array![[1.0, 2.0], [3.0, 4.0]]);
            }
            other => panic!("unexpected structure: {other:?}"),
        }

        let diverging = Experiment::new(
            "Exp_1",
            "Fwd",
            values(vec![
                ("y1", SensorValue::Vector(array![1.0, 2.0])),
                ("y2", SensorValue::Vector(array![3.0, 4.0])),
                ("p1", SensorValue::Scalar(0.0)),
                ("p2", SensorValue::Scalar(1.0)),
                ("t1", SensorValue::Vector(array![0.0, 1.0])),
                ("t2", SensorValue::Vector(array![0.0, 2.0])),
            ]),
        )
        .with_correlation_info("y1", info(vec![(AxisVar::X, "p1"), (AxisVar::T, "t1")]))
        .with_correlation_info("y2", info(vec![(AxisVar::X, "p2"), (AxisVar::T, "t2")]));
        assert_eq!(
            translate(&spec, &store_with(diverging)).unwrap_err(),
            StructuralError::VectorAxisMismatch { sensor: "y2".to_string(), variable: 't' }
        );
    }

    #[test]
    // Purpose
    // -------
    // A sensor's scalar channel coordinate must not move between the
    // experiments one evaluator jointly models.
    fn space_time_1d_rejects_scalar_values_diverging_across_experiments() {
        let spec = GaussianLikelihoodSpec::new(
            "L1",
            vec![SensorDescriptor::new("y")],
            vec!["Exp_1".to_string(), "Exp_2".to_string()],
            true,
            false,
            false,
            "xt",
            "exp",
        )
        .unwrap();
        let experiment_at = |name: &str, position: f64| {
            Experiment::new(
                name,
                "Fwd",
                values(vec![
                    ("y", SensorValue::Vector(array![1.0, 2.0])),
                    ("pos", SensorValue::Scalar(position)),
                    ("time", SensorValue::Vector(array![0.0, 1.0])),
                ]),
            )
            .with_correlation_info("y", info(vec![(AxisVar::X, "pos"), (AxisVar::T, "time")]))
        };
        let mut store = store_with(experiment_at("Exp_1", 0.5));
        store.extend(store_with(experiment_at("Exp_2", 0.7)));

        assert_eq!(
            translate(&spec, &store).unwrap_err(),
            StructuralError::ScalarValueMismatch { sensor: "y".to_string(), variable: 'x' }
        );
    }

    #[test]
    fn space_2d3d_rejects_mixed_scalar_and_vector_components() {
        let spec = spec_for("xy", vec![SensorDescriptor::new("u")]);
        let mixed = Experiment::new(
            "Exp_1",
            "Fwd",
            values(vec![
                ("u", SensorValue::Vector(array![1.0, 2.0])),
                ("xs", SensorValue::Vector(array![0.0, 1.0])),
                ("ys", SensorValue::Scalar(0.0)),
            ]),
        )
        .with_correlation_info("u", info(vec![(AxisVar::X, "xs"), (AxisVar::Y, "ys")]));
        assert_eq!(
            translate(&spec, &store_with(mixed)).unwrap_err(),
            StructuralError::InconsistentAxisStructure {
                experiment: "Exp_1".to_string(),
                sensor: "u".to_string()
            }
        );
    }

    #[test]
    fn space_2d3d_builds_point_rows_from_vector_components() {
        let spec = spec_for("xy", vec![SensorDescriptor::new("u")]);
        let experiment = Experiment::new(
            "Exp_1",
            "Fwd",
            values(vec![
                ("u", SensorValue::Vector(array![1.0, 2.0, 3.0])),
                ("xs", SensorValue::Vector(array![0.0, 1.0, 0.0])),
                ("ys", SensorValue::Vector(array![0.0, 0.0, 1.0])),
            ]),
        )
        .with_correlation_info("u", info(vec![(AxisVar::X, "xs"), (AxisVar::Y, "ys")]));
        let evaluator = translate(&spec, &store_with(experiment)).unwrap();

        assert_eq!(evaluator.class, StructuralClass::SpaceCorrelated2D3D);
        match &evaluator.structure {
            StructureData::Space2D3D { blocks } => {
                assert_eq!(blocks[0].points, array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
            }
            other => panic!("unexpected structure: {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Translation is deterministic: translating the same spec twice yields
    // equal evaluators.
    fn translation_is_deterministic() {
        let spec = spec_for("t", vec![SensorDescriptor::new("y")]);
        let experiment = Experiment::new(
            "Exp_1",
            "Fwd",
            values(vec![
                ("y", SensorValue::Vector(array![1.0, 2.0])),
                ("time", SensorValue::Vector(array![0.0, 1.0])),
            ]),
        )
        .with_correlation_info("y", info(vec![(AxisVar::T, "time")]));
        let store = store_with(experiment);

        let first = translate(&spec, &store).unwrap();
        let second = translate(&spec, &store).unwrap();
        assert_eq!(first, second);
    }
}
