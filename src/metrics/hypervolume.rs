use chrono::{DateTime, Utc};
use log::debug;

use crate::core::{Fitnesses, FrontExport, HvError, WeightedFitness};
use crate::metrics::hv_sweep::hypervolume;
use crate::utils::vector_max;

/// Check the input arguments of the hyper-volume functions.
///
/// # Arguments
///
/// * `points`: The points to use in the calculation.
/// * `reference_point`: The reference or anti-optimal point to use in the calculation.
///
/// returns: `Result<(), String>`
pub(crate) fn check_args(points: &[Vec<f64>], reference_point: &[f64]) -> Result<(), String> {
    if points.is_empty() {
        return Err("There are no points in the array".to_string());
    }
    if reference_point.is_empty() {
        return Err("The reference point must have at least one coordinate".to_string());
    }

    for (point_idx, point) in points.iter().enumerate() {
        if point.len() != reference_point.len() {
            return Err(format!(
                "The number of objectives of point #{} ({}) must match the number of coordinates of the reference point ({})",
                point_idx + 1,
                point.len(),
                reference_point.len()
            ));
        }
        if point.iter().any(|value| value.is_nan()) {
            return Err(format!("NaN detected in objective of point #{}", point_idx + 1));
        }
    }

    // the reference point must be dominated by all points
    for (coordinate_idx, coordinate) in reference_point.iter().enumerate() {
        let objective_values: Vec<f64> = points.iter().map(|p| p[coordinate_idx]).collect();
        check_ref_point_coordinate(&objective_values, *coordinate, coordinate_idx)?;
    }
    Ok(())
}

/// Check that a reference point coordinate is strictly larger than all the values of the
/// corresponding (minimised) objective.
///
/// # Arguments
///
/// * `objective_values`: The values of the objective from all points.
/// * `ref_point_coordinate`: The coordinate of the reference point.
/// * `coordinate_idx`: The index or position of the coordinate.
///
/// returns: `Result<(), String>`
pub(crate) fn check_ref_point_coordinate(
    objective_values: &[f64],
    ref_point_coordinate: f64,
    coordinate_idx: usize,
) -> Result<(), String> {
    let max_obj = vector_max(objective_values).map_err(|e| e.to_string())?;
    if ref_point_coordinate.is_nan() || ref_point_coordinate <= max_obj {
        return Err(format!(
            "The coordinate #{} of the reference point ({}) must be strictly larger than the maximum value of objective #{} ({}). The reference point must be dominated by all points.",
            coordinate_idx + 1,
            ref_point_coordinate,
            coordinate_idx + 1,
            max_obj
        ));
    }
    Ok(())
}

/// Validated calculation of the exact hyper-volume metric with the dimension-sweep algorithm in
/// [`crate::metrics::HyperVolumeSweep`]. All objectives are assumed to be minimised.
///
/// Unlike the raw engine, the arguments are checked before the calculation: there must be at
/// least one point, all points must have as many objectives as the reference point, no value can
/// be NaN, and the reference point must be strictly dominated by all points.
///
/// The hyper-volume can be calculated from the following sources:
/// - an array of points given as `f64` using [`HyperVolume::from_values`]
/// - an array of items with a weighted fitness using [`HyperVolume::from_fitnesses`]
/// - a front exported to a JSON file using [`HyperVolume::from_file`]
/// - a set of exported fronts using [`HyperVolume::from_files`]
///
/// # Example
/// ```
///  use hvsweep::metrics::HyperVolume;
///
///  let points = vec![vec![1.0, 2.0], vec![0.5, 4.0], vec![0.0, 6.0]];
///  let ref_point = HyperVolume::estimate_reference_point(&points, Some(vec![4.0, 4.0])).unwrap();
///  assert_eq!(ref_point, vec![5.0, 10.0]);
///  assert_eq!(HyperVolume::from_values(&points, &ref_point).unwrap(), 37.0);
/// ```
pub struct HyperVolume;

/// The hyper-volume value and other file data. This struct is used to store the metric calculated
/// from a front exported to a JSON file.
#[derive(Debug)]
pub struct HyperVolumeFileData {
    /// The generation the metric was calculated for.
    pub generation: usize,
    /// The time when the front was exported.
    pub time: DateTime<Utc>,
    /// The hyper-volume value.
    pub value: f64,
}

/// The vector with hyper-volume data from multiple files.
pub struct AllHyperVolumeFileData(Vec<HyperVolumeFileData>);

impl AllHyperVolumeFileData {
    /// Get all hyper-volume values.
    ///
    /// returns: `Vec<f64>`
    pub fn values(&self) -> Vec<f64> {
        self.0.iter().map(|s| s.value).collect()
    }

    /// Get all hyper-volume generations.
    ///
    /// returns: `Vec<usize>`
    pub fn generations(&self) -> Vec<usize> {
        self.0.iter().map(|s| s.generation).collect()
    }

    /// Get all [`DateTime<Utc>`] when the fronts were exported.
    ///
    /// returns: `Vec<DateTime<Utc>>`
    pub fn times(&self) -> Vec<DateTime<Utc>> {
        self.0.iter().map(|s| s.time).collect()
    }
}

impl HyperVolume {
    /// Calculate the exact hyper-volume metric for the points.
    ///
    /// # Arguments
    ///
    /// * `points`: The objective values; each item is a point with one value per objective.
    /// * `reference_point`: The reference or anti-optimal point to use in the calculation. If you
    ///   are not sure about the point to use, you could pick the worst value of each objective
    ///   using [`HyperVolume::estimate_reference_point`].
    ///
    /// returns: `Result<f64, HvError>`
    pub fn from_values(points: &[Vec<f64>], reference_point: &[f64]) -> Result<f64, HvError> {
        check_args(points, reference_point)
            .map_err(|e| HvError::Metric("Hyper-volume".to_string(), e))?;

        debug!("Reference point is {:?}", reference_point);
        Ok(hypervolume(points, reference_point))
    }

    /// Calculate the exact hyper-volume metric for items with a weighted fitness. The weighted
    /// values are maximised and are negated before the calculation, therefore the reference point
    /// must be given in the negated space as well.
    ///
    /// # Arguments
    ///
    /// * `population`: The items to use in the calculation.
    /// * `reference_point`: The reference point in the negated weighted space. When `None`, this
    ///    is the worst negated weighted value of each objective plus one.
    ///
    /// returns: `Result<f64, HvError>`
    pub fn from_fitnesses<T: WeightedFitness>(
        population: &[T],
        reference_point: Option<&[f64]>,
    ) -> Result<f64, HvError> {
        let points = population.minimised_points();
        let reference_point = match reference_point {
            Some(r) => r.to_vec(),
            None => {
                let size = points.first().map_or(0, |p| p.len());
                Self::estimate_reference_point(&points, Some(vec![1.0; size]))?
            }
        };
        Self::from_values(&points, &reference_point)
    }

    /// Calculate the hyper-volume of a front exported with [`FrontExport::save_to_json`].
    ///
    /// # Arguments
    ///
    /// * `data`: The exported front. This can be imported using [`FrontExport::read_json_file`].
    /// * `reference_point`: The reference or anti-optimal point to use in the calculation.
    ///
    /// returns: `Result<HyperVolumeFileData, HvError>`: the hyper-volume value and the file
    /// information.
    pub fn from_file(
        data: &FrontExport,
        reference_point: &[f64],
    ) -> Result<HyperVolumeFileData, HvError> {
        let value = Self::from_values(&data.objective_values, reference_point)?;
        Ok(HyperVolumeFileData {
            generation: data.generation,
            time: data.exported_on,
            value,
        })
    }

    /// Calculate the hyper-volume of several exported fronts. The results are sorted by
    /// generation.
    ///
    /// # Arguments
    ///
    /// * `data`: The exported fronts. These can be imported using
    ///    [`FrontExport::read_json_files`].
    /// * `reference_point`: The reference or anti-optimal point to use in the calculation.
    ///
    /// returns: `Result<AllHyperVolumeFileData, HvError>`
    pub fn from_files(
        data: &[FrontExport],
        reference_point: &[f64],
    ) -> Result<AllHyperVolumeFileData, HvError> {
        let mut results = data
            .iter()
            .map(|front| Self::from_file(front, reference_point))
            .collect::<Result<Vec<HyperVolumeFileData>, HvError>>()?;

        results.sort_by_key(|r| r.generation);
        Ok(AllHyperVolumeFileData(results))
    }

    /// Calculate a reference point by taking the maximum of each objective, so that the point
    /// is dominated by all other points. An optional offset for each objective can be added to
    /// enforce strict dominance.
    ///
    /// # Arguments
    ///
    /// * `points`: The points to use in the calculation.
    /// * `offset`: The offset to add to each coordinate of the reference point. This must have a
    ///    size equal to the number of objectives.
    ///
    /// returns: `Result<Vec<f64>, HvError>` The reference point. This returns an error if there
    /// are no points or the size of the offset does not match the number of objectives.
    pub fn estimate_reference_point(
        points: &[Vec<f64>],
        offset: Option<Vec<f64>>,
    ) -> Result<Vec<f64>, HvError> {
        let metric_name = "reference_point".to_string();
        let number_of_objectives = match points.first() {
            None => {
                return Err(HvError::Metric(
                    metric_name,
                    "There are no points in the array".to_string(),
                ))
            }
            Some(p) => p.len(),
        };

        if let Some(ref offset) = offset {
            if offset.len() != number_of_objectives {
                return Err(HvError::Metric(
                    metric_name,
                    format!(
                        "The offset size ({}) must match the number of objectives ({})",
                        offset.len(),
                        number_of_objectives
                    ),
                ));
            }
        }

        let mut ref_point = Vec::with_capacity(number_of_objectives);
        for obj_idx in 0..number_of_objectives {
            let values = points
                .iter()
                .map(|p| {
                    p.get(obj_idx).copied().ok_or(HvError::Metric(
                        metric_name.clone(),
                        "All points must have the same number of objectives".to_string(),
                    ))
                })
                .collect::<Result<Vec<f64>, HvError>>()?;
            ref_point.push(vector_max(&values)?);
        }

        if let Some(offset) = offset {
            for (coordinate, o) in ref_point.iter_mut().zip(offset) {
                *coordinate += o;
            }
        }
        Ok(ref_point)
    }
}

#[cfg(test)]
mod test {
    use std::env;
    use std::fs;

    use float_cmp::assert_approx_eq;

    use crate::core::{Fitness, FrontExport, ObjectiveDirection};
    use crate::metrics::HyperVolume;

    #[test]
    /// Test when the estimate_reference_point function returns an error
    fn test_worst_point_error() {
        let points: Vec<Vec<f64>> = Vec::new();
        assert!(HyperVolume::estimate_reference_point(&points, None)
            .unwrap_err()
            .to_string()
            .contains("There are no points in the array"));

        let points = vec![vec![-1.0, -2.0], vec![3.0, 4.0], vec![0.0, 6.0]];
        let err = HyperVolume::estimate_reference_point(&points, Some(vec![0.0]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("The offset size (1) must match the number of objectives (2)"));

        let points = vec![vec![-1.0, -2.0], vec![3.0]];
        let err = HyperVolume::estimate_reference_point(&points, None)
            .unwrap_err()
            .to_string();
        assert!(err.contains("same number of objectives"), "{}", err);
    }

    #[test]
    fn test_worst_point() {
        let points = vec![vec![-1.0, -2.0], vec![3.0, 4.0], vec![0.0, 6.0]];
        assert_eq!(
            HyperVolume::estimate_reference_point(&points, None).unwrap(),
            vec![3.0, 6.0]
        );
        assert_eq!(
            HyperVolume::estimate_reference_point(&points, Some(vec![1.0, 2.0])).unwrap(),
            vec![4.0, 8.0]
        );
    }

    #[test]
    fn test_check_args() {
        let points = vec![vec![1.0, 2.0], vec![0.5, 4.0], vec![0.0, 6.0]];

        let err = HyperVolume::from_values(&[], &[1.0, 1.0]).unwrap_err().to_string();
        assert!(err.contains("There are no points"), "{}", err);

        let err = HyperVolume::from_values(&points, &[10.0, 10.0, 10.0])
            .unwrap_err()
            .to_string();
        assert!(
            err.contains("objectives of point #1 (2) must match the number of coordinates of the reference point (3)"),
            "{}",
            err
        );

        let err = HyperVolume::from_values(&[vec![1.0, f64::NAN]], &[10.0, 10.0])
            .unwrap_err()
            .to_string();
        assert!(err.contains("NaN detected in objective of point #1"), "{}", err);

        // x too small
        let err = HyperVolume::from_values(&points, &[0.2, 20.0])
            .unwrap_err()
            .to_string();
        assert!(err.contains("The coordinate #1 of the reference point (0.2) must be strictly larger than the maximum value of objective #1"), "{}", err);

        // y equal to the worst point
        let err = HyperVolume::from_values(&points, &[20.0, 6.0])
            .unwrap_err()
            .to_string();
        assert!(err.contains("The coordinate #2 of the reference point (6)"), "{}", err);
    }

    #[test]
    fn test_from_values() {
        let points = vec![vec![1.0, 2.0], vec![0.5, 4.0], vec![0.0, 6.0]];
        assert_eq!(HyperVolume::from_values(&points, &[10.0, 10.0]).unwrap(), 77.0);

        // a dominated point does not change the value
        let points = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![0.0, 6.0]];
        assert_eq!(HyperVolume::from_values(&points, &[10.0, 10.0]).unwrap(), 76.0);
    }

    #[test]
    /// Maximise objective #1. Values are negated, so the reference point is in the negated
    /// space.
    fn test_from_fitnesses() {
        let directions = [ObjectiveDirection::Maximise, ObjectiveDirection::Minimise];
        let population: Vec<Fitness> = [[11.1, 8.1], [8.1, 6.1], [5.1, 4.1], [0.0, 5.1]]
            .iter()
            .map(|v| Fitness::with_directions(v.to_vec(), &directions).unwrap())
            .collect();

        // horizontal slabs between consecutive y values of the front, the last point is dominated
        let value = HyperVolume::from_fitnesses(&population, Some(&[10.0, 10.0][..])).unwrap();
        assert_approx_eq!(f64, value, 21.1 * 1.9 + 18.1 * 2.0 + 15.1 * 2.0, epsilon = 1e-9);

        // default reference point is (1.0, 9.1)
        let value = HyperVolume::from_fitnesses(&population, None).unwrap();
        assert_approx_eq!(f64, value, 12.1 * 1.0 + 9.1 * 2.0 + 6.1 * 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_from_files() {
        let folder = env::temp_dir().join(format!("hvsweep_hv_files_{}", std::process::id()));
        if folder.exists() {
            fs::remove_dir_all(&folder).unwrap();
        }
        fs::create_dir_all(&folder).unwrap();
        let fronts = [
            (20, vec![vec![1.0, 2.0], vec![0.5, 4.0], vec![0.0, 6.0]]),
            (10, vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![0.0, 6.0]]),
        ];
        for (generation, values) in fronts {
            FrontExport::new("NSGA2", values, generation)
                .save_to_json(&folder, None)
                .unwrap();
        }

        let data = FrontExport::read_json_files(&folder).unwrap();
        let results = HyperVolume::from_files(&data, &[10.0, 10.0]).unwrap();
        assert_eq!(results.generations(), vec![10, 20]);
        assert_eq!(results.values(), vec![76.0, 77.0]);
        assert_eq!(results.times().len(), 2);

        let single = HyperVolume::from_file(&data[0], &[10.0, 10.0]).unwrap();
        assert_eq!(single.generation, data[0].generation);
        fs::remove_dir_all(folder).unwrap();
    }
}
