use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::core::{HvError, ObjectiveDirection};

/// Trait implemented by the members of a population whose hyper-volume contribution is measured.
/// The weighted values follow the maximisation convention: each objective value is multiplied by
/// its weight, so a larger weighted value is always better.
pub trait WeightedFitness {
    /// Get the weighted objective values.
    ///
    /// return: `Vec<f64>`
    fn weighted_values(&self) -> Vec<f64>;
}

/// A plain vector is interpreted as weighted values already.
impl WeightedFitness for Vec<f64> {
    fn weighted_values(&self) -> Vec<f64> {
        self.clone()
    }
}

impl<const N: usize> WeightedFitness for [f64; N] {
    fn weighted_values(&self) -> Vec<f64> {
        self.to_vec()
    }
}

/// Trait to fetch the points to pass to the hyper-volume engine from a population.
pub trait Fitnesses {
    /// Negate the weighted values of each population member, so that all objectives are
    /// minimised.
    ///
    /// return: `Vec<Vec<f64>>`
    fn minimised_points(&self) -> Vec<Vec<f64>>;
}

impl<T: WeightedFitness> Fitnesses for [T] {
    fn minimised_points(&self) -> Vec<Vec<f64>> {
        self.iter()
            .map(|member| member.weighted_values().iter().map(|v| -v).collect())
            .collect()
    }
}

/// The objective values of a solution with their weights. The weights define whether an objective
/// is minimised (negative weight) or maximised (positive weight) and its relative importance.
///
/// # Example
/// ```
///  use hvsweep::core::{Fitness, ObjectiveDirection, WeightedFitness};
///
///  let fitness = Fitness::with_directions(
///     vec![1.0, 3.0],
///     &[ObjectiveDirection::Minimise, ObjectiveDirection::Maximise]
///  ).unwrap();
///  assert_eq!(fitness.weighted_values(), vec![-1.0, 3.0]);
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Fitness {
    /// The raw objective values.
    values: Vec<f64>,
    /// The weight of each objective.
    weights: Vec<f64>,
}

impl Fitness {
    /// Create the fitness from the objective values and their weights. This returns an error if
    /// the sizes do not match or a value is NaN.
    ///
    /// # Arguments
    ///
    /// * `values`: The objective values.
    /// * `weights`: The weight of each objective.
    ///
    /// returns: `Result<Fitness, HvError>`
    pub fn new(values: Vec<f64>, weights: Vec<f64>) -> Result<Self, HvError> {
        if values.len() != weights.len() {
            return Err(HvError::Generic(format!(
                "The number of objective values ({}) must match the number of weights ({})",
                values.len(),
                weights.len()
            )));
        }
        if let Some(idx) = values.iter().position(|v| v.is_nan()) {
            return Err(HvError::Generic(format!(
                "NaN detected in the value of objective #{}",
                idx + 1
            )));
        }
        Ok(Self { values, weights })
    }

    /// Create the fitness using unit weights derived from the objective directions.
    ///
    /// # Arguments
    ///
    /// * `values`: The objective values.
    /// * `directions`: Whether each objective is minimised or maximised.
    ///
    /// returns: `Result<Fitness, HvError>`
    pub fn with_directions(
        values: Vec<f64>,
        directions: &[ObjectiveDirection],
    ) -> Result<Self, HvError> {
        Self::new(values, directions.iter().map(|d| d.weight()).collect())
    }

    /// Get the raw objective values.
    ///
    /// return: `&[f64]`
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the objective weights.
    ///
    /// return: `&[f64]`
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl WeightedFitness for Fitness {
    fn weighted_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .zip(&self.weights)
            .map(|(v, w)| v * w)
            .collect()
    }
}

impl Display for Fitness {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fitness {:?} with weights {:?}", self.values, self.weights)
    }
}

#[cfg(test)]
mod test {
    use crate::core::{Fitness, Fitnesses, ObjectiveDirection, WeightedFitness};

    #[test]
    fn test_new_errors() {
        let err = Fitness::new(vec![1.0, 2.0], vec![1.0]).unwrap_err().to_string();
        assert!(err.contains("(2) must match the number of weights (1)"), "{}", err);

        let err = Fitness::new(vec![1.0, f64::NAN], vec![1.0, 1.0])
            .unwrap_err()
            .to_string();
        assert!(err.contains("NaN detected in the value of objective #2"), "{}", err);
    }

    #[test]
    fn test_weighted_values() {
        let fitness = Fitness::new(vec![2.0, 4.0], vec![-0.5, 2.0]).unwrap();
        assert_eq!(fitness.weighted_values(), vec![-1.0, 8.0]);
        assert_eq!(fitness.values(), &[2.0, 4.0]);
    }

    #[test]
    fn test_minimised_points() {
        let population = vec![
            Fitness::with_directions(
                vec![1.0, 5.0],
                &[ObjectiveDirection::Minimise, ObjectiveDirection::Maximise],
            )
            .unwrap(),
            Fitness::with_directions(
                vec![3.0, 2.0],
                &[ObjectiveDirection::Minimise, ObjectiveDirection::Maximise],
            )
            .unwrap(),
        ];
        assert_eq!(
            population.minimised_points(),
            vec![vec![1.0, -5.0], vec![3.0, -2.0]]
        );

        let raw = [[1.0, -2.0], [0.5, 4.0]];
        assert_eq!(raw.minimised_points(), vec![vec![-1.0, 2.0], vec![-0.5, -4.0]]);
    }
}
