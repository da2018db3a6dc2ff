use std::time::Duration;

use hvsweep::core::{Fitness, HvError, ObjectiveDirection};
use hvsweep::metrics::{reduce_front, LeastContribution, LeastContributionArg};

/// This example shows how to find the individual with the least hyper-volume contribution in a
/// non-dominated population and how to truncate the population to a given size, as done by the
/// environmental selection of the MO-CMA-ES algorithm.
///
/// The first objective is minimised and the second one is maximised. The hyper-volume is
/// calculated on the negated weighted values, where all objectives are minimised.
///
/// `cargo run --example least_contribution --release`
fn main() -> Result<(), HvError> {
    env_logger::init();

    let directions = [ObjectiveDirection::Minimise, ObjectiveDirection::Maximise];
    let population = (0..20)
        .map(|i| {
            let x = i as f64 / 19.0;
            Fitness::with_directions(vec![x, 1.0 - x * x], &directions)
        })
        .collect::<Result<Vec<Fitness>, HvError>>()?;

    // calculations run in parallel on a pool with 4 threads and must complete within a second
    let indicator = LeastContribution::new(LeastContributionArg {
        reference_point: None,
        timeout: Some(Duration::from_secs(1)),
        parallel: Some(true),
        number_of_threads: Some(4),
    })?;
    let index = indicator.index(&population)?;
    println!(
        "{} has the least hyper-volume contribution",
        population[index]
    );

    // keep the 8 individuals that contribute the most
    let reduction = reduce_front(&population, 8, None)?;
    println!("Removed individuals in order: {:?}", reduction.removed);
    for idx in reduction.kept {
        println!("Kept {}", population[idx]);
    }

    Ok(())
}
