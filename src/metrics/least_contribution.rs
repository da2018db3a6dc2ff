use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::core::{Fitnesses, HvError, WeightedFitness};
use crate::metrics::hv_sweep::hypervolume;
use crate::metrics::HyperVolume;
use crate::utils::argmax;

const INDICATOR_NAME: &str = "least contribution";

/// Calculate the hyper-volume of all the points but the one at `excluded`.
///
/// # Arguments
///
/// * `points`: The points.
/// * `excluded`: The index of the point to leave out.
/// * `reference_point`: The reference point.
///
/// returns: `f64`
fn exclusion_volume(points: &[Vec<f64>], excluded: usize, reference_point: &[f64]) -> f64 {
    let front: Vec<&[f64]> = points
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != excluded)
        .map(|(_, p)| p.as_slice())
        .collect();
    hypervolume(&front, reference_point)
}

/// Input arguments for the [`LeastContribution`] indicator.
#[derive(Clone, Debug, Default)]
pub struct LeastContributionArg {
    /// The reference point in the negated weighted space (where all objectives are minimised).
    /// When `None`, this is the worst negated weighted value of each objective plus one.
    pub reference_point: Option<Vec<f64>>,
    /// Stop waiting for the hyper-volume calculations after this time and return an
    /// [`HvError::Timeout`]. Calculations that have not started yet are cancelled. No timeout is
    /// applied when `None`.
    pub timeout: Option<Duration>,
    /// Whether the hyper-volume calculations should run in parallel using threads. This defaults
    /// to `true`.
    pub parallel: Option<bool>,
    /// The number of threads of a dedicated thread pool. When `None`, the global rayon thread
    /// pool is used. This is ignored if `parallel` is `false`.
    pub number_of_threads: Option<usize>,
}

/// The indexes of the points kept and removed by [`LeastContribution::reduce_front`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrontReduction {
    /// The indexes of the kept points, in their original order.
    pub kept: Vec<usize>,
    /// The indexes of the removed points, in the order they were removed.
    pub removed: Vec<usize>,
}

/// The least hyper-volume contribution indicator. Given a set of non-dominated individuals, this
/// finds the individual whose removal costs the least hyper-volume; this is the individual that,
/// when excluded, leaves the largest hyper-volume covered by the remaining ones.
///
/// The individuals expose their weighted fitness (where larger values are better) through
/// [`WeightedFitness`]. The weighted values are negated, so that all objectives are minimised,
/// before being passed to the hyper-volume engine.
///
/// The hyper-volume is calculated once per individual. Each calculation is independent and is
/// dispatched to the rayon thread pool unless [`LeastContributionArg::parallel`] is `false`.
///
/// # Example
/// ```
///  use hvsweep::metrics::{LeastContribution, LeastContributionArg};
///
///  // weighted values of maximised objectives
///  let population = vec![vec![-1.0, -3.0], vec![-1.5, -1.5], vec![-3.0, -1.2]];
///  let indicator = LeastContribution::new(LeastContributionArg::default()).unwrap();
///  assert_eq!(indicator.index(&population).unwrap(), 2);
/// ```
pub struct LeastContribution {
    /// The reference point.
    reference_point: Option<Vec<f64>>,
    /// The timeout.
    timeout: Option<Duration>,
    /// Whether to run the calculations in parallel.
    parallel: bool,
    /// The dedicated thread pool.
    pool: Option<Arc<ThreadPool>>,
}

impl LeastContribution {
    /// Initialise the indicator. This returns an error if the dedicated thread pool cannot be
    /// created.
    ///
    /// # Arguments
    ///
    /// * `args`: The [`LeastContributionArg`] arguments.
    ///
    /// returns: `Result<LeastContribution, HvError>`
    pub fn new(args: LeastContributionArg) -> Result<Self, HvError> {
        let parallel = args.parallel.unwrap_or(true);
        let pool = match (parallel, args.number_of_threads) {
            (true, Some(number_of_threads)) => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(number_of_threads)
                    .thread_name(|idx| format!("hv-worker-{idx}"))
                    .build()
                    .map_err(|e| HvError::Dispatch(INDICATOR_NAME.to_string(), e.to_string()))?;
                Some(Arc::new(pool))
            }
            _ => None,
        };

        Ok(Self {
            reference_point: args.reference_point,
            timeout: args.timeout,
            parallel,
            pool,
        })
    }

    /// Get the index of the individual with the least hyper-volume contribution. When more than
    /// one individual has the least contribution, the first index is returned.
    ///
    /// # Arguments
    ///
    /// * `population`: The non-dominated individuals.
    ///
    /// returns: `Result<usize, HvError>`
    pub fn index<T: WeightedFitness>(&self, population: &[T]) -> Result<usize, HvError> {
        let volumes = self.contributions(population)?;
        let index = argmax(&volumes)?;
        info!("Individual #{} has the least hyper-volume contribution", index);
        Ok(index)
    }

    /// Calculate, for each individual, the hyper-volume of the population without that
    /// individual.
    ///
    /// # Arguments
    ///
    /// * `population`: The non-dominated individuals.
    ///
    /// returns: `Result<Vec<f64>, HvError>`
    pub fn contributions<T: WeightedFitness>(&self, population: &[T]) -> Result<Vec<f64>, HvError> {
        if population.is_empty() {
            return Err(HvError::EmptyPopulation(INDICATOR_NAME.to_string()));
        }
        let points = population.minimised_points();
        let reference_point = self.reference_point_for(&points)?;
        self.exclusion_volumes(points, reference_point)
    }

    /// Remove the individuals with the least hyper-volume contribution, one at a time, until `k`
    /// individuals are left. The contributions are calculated again after each removal, always
    /// using the same reference point. When this is not given, it is derived from the full
    /// population.
    ///
    /// # Arguments
    ///
    /// * `population`: The non-dominated individuals.
    /// * `k`: The number of individuals to keep.
    ///
    /// returns: `Result<FrontReduction, HvError>`
    pub fn reduce_front<T: WeightedFitness>(
        &self,
        population: &[T],
        k: usize,
    ) -> Result<FrontReduction, HvError> {
        if population.is_empty() {
            return Err(HvError::EmptyPopulation(INDICATOR_NAME.to_string()));
        }
        let points = population.minimised_points();
        let reference_point = self.reference_point_for(&points)?;

        let mut kept: Vec<usize> = (0..points.len()).collect();
        let mut removed = vec![];
        while kept.len() > k {
            let remaining: Vec<Vec<f64>> = kept.iter().map(|idx| points[*idx].clone()).collect();
            let volumes = self.exclusion_volumes(remaining, reference_point.clone())?;
            let position = argmax(&volumes)?;
            debug!("Removing individual #{}", kept[position]);
            removed.push(kept.remove(position));
        }

        Ok(FrontReduction { kept, removed })
    }

    /// Return the reference point given in the arguments or derive it from the points. This
    /// returns an error if the points have different sizes or the size of the given reference
    /// point does not match the number of objectives.
    ///
    /// # Arguments
    ///
    /// * `points`: The points with minimised objectives.
    ///
    /// returns: `Result<Vec<f64>, HvError>`
    fn reference_point_for(&self, points: &[Vec<f64>]) -> Result<Vec<f64>, HvError> {
        let size = points.first().map_or(0, |p| p.len());
        if let Some(idx) = points.iter().position(|p| p.len() != size) {
            return Err(HvError::Metric(
                INDICATOR_NAME.to_string(),
                format!(
                    "Individual #{} has {} objectives, but the first one has {}",
                    idx,
                    points[idx].len(),
                    size
                ),
            ));
        }

        match &self.reference_point {
            Some(r) if r.len() != size => Err(HvError::Metric(
                INDICATOR_NAME.to_string(),
                format!(
                    "The reference point size ({}) must match the number of objectives ({})",
                    r.len(),
                    size
                ),
            )),
            Some(r) => Ok(r.clone()),
            None => HyperVolume::estimate_reference_point(points, Some(vec![1.0; size])),
        }
    }

    /// Calculate the hyper-volume of the points, leaving out one point at a time.
    ///
    /// # Arguments
    ///
    /// * `points`: The points with minimised objectives.
    /// * `reference_point`: The reference point.
    ///
    /// returns: `Result<Vec<f64>, HvError>`
    fn exclusion_volumes(
        &self,
        points: Vec<Vec<f64>>,
        reference_point: Vec<f64>,
    ) -> Result<Vec<f64>, HvError> {
        debug!(
            "Calculating {} hyper-volumes with reference point {:?}",
            points.len(),
            reference_point
        );
        match (self.parallel, self.timeout) {
            (false, timeout) => Self::sequential(&points, &reference_point, timeout),
            (true, None) => {
                let calculate = || {
                    (0..points.len())
                        .into_par_iter()
                        .map(|idx| exclusion_volume(&points, idx, &reference_point))
                        .collect::<Vec<f64>>()
                };
                Ok(match &self.pool {
                    Some(pool) => pool.install(calculate),
                    None => calculate(),
                })
            }
            (true, Some(timeout)) => self.dispatch_with_timeout(points, reference_point, timeout),
        }
    }

    /// Run the calculations one after the other. The timeout is checked before each calculation.
    fn sequential(
        points: &[Vec<f64>],
        reference_point: &[f64],
        timeout: Option<Duration>,
    ) -> Result<Vec<f64>, HvError> {
        let deadline = timeout.map(|t| (Instant::now() + t, t));
        let mut volumes = Vec::with_capacity(points.len());
        for idx in 0..points.len() {
            if let Some((deadline, timeout)) = deadline {
                if Instant::now() >= deadline {
                    warn!("Timeout reached after {} of {} calculations", idx, points.len());
                    return Err(HvError::Timeout(INDICATOR_NAME.to_string(), timeout));
                }
            }
            volumes.push(exclusion_volume(points, idx, reference_point));
        }
        Ok(volumes)
    }

    /// Spawn one task per calculation on the thread pool and collect the results until the
    /// deadline. When the deadline is reached, the tasks that have not started yet are cancelled
    /// and an error is returned.
    ///
    /// # Arguments
    ///
    /// * `points`: The points with minimised objectives.
    /// * `reference_point`: The reference point.
    /// * `timeout`: The time to wait for all the results.
    ///
    /// returns: `Result<Vec<f64>, HvError>`
    fn dispatch_with_timeout(
        &self,
        points: Vec<Vec<f64>>,
        reference_point: Vec<f64>,
        timeout: Duration,
    ) -> Result<Vec<f64>, HvError> {
        let deadline = Instant::now() + timeout;
        let size = points.len();
        let cancelled = Arc::new(AtomicBool::new(false));
        let result_rx =
            self.spawn_calculations(Arc::new(points), Arc::new(reference_point), &cancelled);
        Self::collect_results(&result_rx, size, deadline, timeout, &cancelled)
    }

    /// Spawn one task per point on the thread pool. Each task sends the index of the excluded
    /// point and the hyper-volume of the others. A task does nothing if `cancelled` is set when
    /// it starts.
    ///
    /// # Arguments
    ///
    /// * `points`: The points with minimised objectives.
    /// * `reference_point`: The reference point.
    /// * `cancelled`: The cancellation flag.
    ///
    /// returns: `Receiver<(usize, f64)>`. This disconnects once all the tasks have completed.
    fn spawn_calculations(
        &self,
        points: Arc<Vec<Vec<f64>>>,
        reference_point: Arc<Vec<f64>>,
        cancelled: &Arc<AtomicBool>,
    ) -> Receiver<(usize, f64)> {
        let (result_tx, result_rx) = mpsc::channel::<(usize, f64)>();
        for idx in 0..points.len() {
            let points = Arc::clone(&points);
            let reference_point = Arc::clone(&reference_point);
            let cancelled = Arc::clone(cancelled);
            let result_tx = result_tx.clone();
            let task = move || {
                if cancelled.load(Ordering::Relaxed) {
                    return;
                }
                let volume = exclusion_volume(&points, idx, &reference_point);
                // the receiver is gone after a timeout
                result_tx.send((idx, volume)).ok();
            };
            match &self.pool {
                Some(pool) => pool.spawn(task),
                None => rayon::spawn(task),
            }
        }
        result_rx
    }

    /// Wait for `size` results until `deadline`. On timeout, `cancelled` is set and an error is
    /// returned.
    ///
    /// # Arguments
    ///
    /// * `result_rx`: The channel the tasks send the results to.
    /// * `size`: The number of expected results.
    /// * `deadline`: When to stop waiting.
    /// * `timeout`: The timeout the deadline was set from. This is only used in the error.
    /// * `cancelled`: The cancellation flag shared with the tasks.
    ///
    /// returns: `Result<Vec<f64>, HvError>`
    fn collect_results(
        result_rx: &Receiver<(usize, f64)>,
        size: usize,
        deadline: Instant,
        timeout: Duration,
        cancelled: &AtomicBool,
    ) -> Result<Vec<f64>, HvError> {
        let mut volumes = vec![0.0; size];
        let mut received = 0;
        while received < size {
            let now = Instant::now();
            let outcome = if now >= deadline {
                Err(RecvTimeoutError::Timeout)
            } else {
                result_rx.recv_timeout(deadline - now)
            };
            match outcome {
                Ok((idx, volume)) => {
                    volumes[idx] = volume;
                    received += 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    cancelled.store(true, Ordering::Relaxed);
                    warn!(
                        "Timeout reached with {} of {} calculations completed. The outstanding ones were cancelled",
                        received, size
                    );
                    return Err(HvError::Timeout(INDICATOR_NAME.to_string(), timeout));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(HvError::Dispatch(
                        INDICATOR_NAME.to_string(),
                        format!("only {} of {} calculations returned a result", received, size),
                    ));
                }
            }
        }
        Ok(volumes)
    }
}

/// Get the index of the individual with the least hyper-volume contribution. The calculations run
/// in parallel on the global rayon thread pool. See [`LeastContribution`] for the details.
///
/// # Arguments
///
/// * `population`: The non-dominated individuals.
/// * `reference_point`: The reference point in the negated weighted space. When `None`, this is
///    the worst negated weighted value of each objective plus one.
/// * `timeout`: The maximum time to wait for the calculations.
///
/// returns: `Result<usize, HvError>`
pub fn least_contribution<T: WeightedFitness>(
    population: &[T],
    reference_point: Option<&[f64]>,
    timeout: Option<Duration>,
) -> Result<usize, HvError> {
    let indicator = LeastContribution::new(LeastContributionArg {
        reference_point: reference_point.map(|r| r.to_vec()),
        timeout,
        parallel: Some(true),
        number_of_threads: None,
    })?;
    indicator.index(population)
}

/// Remove the individuals with the least hyper-volume contribution until `k` individuals are
/// left. See [`LeastContribution::reduce_front`] for the details.
///
/// # Arguments
///
/// * `population`: The non-dominated individuals.
/// * `k`: The number of individuals to keep.
/// * `reference_point`: The reference point in the negated weighted space. When `None`, this is
///    derived once from the full population.
///
/// returns: `Result<FrontReduction, HvError>`
pub fn reduce_front<T: WeightedFitness>(
    population: &[T],
    k: usize,
    reference_point: Option<&[f64]>,
) -> Result<FrontReduction, HvError> {
    let indicator = LeastContribution::new(LeastContributionArg {
        reference_point: reference_point.map(|r| r.to_vec()),
        ..LeastContributionArg::default()
    })?;
    indicator.reduce_front(population, k)
}
