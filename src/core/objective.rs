use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Whether the objective should be minimised or maximised. Default is minimise.
#[derive(Default, Copy, Clone, Debug, PartialOrd, PartialEq, Serialize, Deserialize)]
pub enum ObjectiveDirection {
    #[default]
    /// Minimise an objective.
    Minimise,
    /// Maximise an objective.
    Maximise,
}

impl ObjectiveDirection {
    /// The unit weight to apply to the objective value. Weighted values are always maximised,
    /// therefore a minimised objective has a negative weight.
    ///
    /// return: `f64`
    pub fn weight(&self) -> f64 {
        match self {
            ObjectiveDirection::Minimise => -1.0,
            ObjectiveDirection::Maximise => 1.0,
        }
    }
}

impl Display for ObjectiveDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectiveDirection::Minimise => f.write_str("minimised"),
            ObjectiveDirection::Maximise => f.write_str("maximised"),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::core::ObjectiveDirection;

    #[test]
    fn test_weight() {
        assert_eq!(ObjectiveDirection::Minimise.weight(), -1.0);
        assert_eq!(ObjectiveDirection::Maximise.weight(), 1.0);
        assert_eq!(ObjectiveDirection::default(), ObjectiveDirection::Minimise);
        assert_eq!(ObjectiveDirection::Maximise.to_string(), "maximised");
    }
}
