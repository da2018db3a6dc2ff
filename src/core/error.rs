use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised by the library.
pub enum HvError {
    #[error("The following error occurred: {0}")]
    Generic(String),
    #[error("An error occurred in the calculation of the '{0}' metric: {1}")]
    Metric(String, String),
    #[error("The indicator '{0}' needs at least one individual, but the population is empty")]
    EmptyPopulation(String),
    #[error("The indicator '{0}' hyper-volume calculation exceeded the timeout of {1:?}")]
    Timeout(String, Duration),
    #[error("An error occurred when dispatching the '{0}' calculations: {1}")]
    Dispatch(String, String),
    #[error("An error occurred when exporting the front data: {0}")]
    Export(String),
    #[error("An error occurred when importing the front data: {0}")]
    Import(String),
}
