pub use error::HvError;
pub use export::FrontExport;
pub use fitness::{Fitness, Fitnesses, WeightedFitness};
pub use objective::ObjectiveDirection;

mod error;
mod export;
mod fitness;
mod objective;
pub(crate) mod test_utils;
