//! Exact hyper-volume indicator for multi-objective optimisation.
//!
//! The crate computes the volume of the objective space dominated by a set of points and bounded
//! by a reference point, using the dimension-sweep algorithm by
//! [Fonseca et al. (2006)](http://dx.doi.org/10.1109/CEC.2006.1688440). On top of the engine it
//! provides:
//!
//! - [`metrics::hypervolume()`]: the raw, unvalidated engine working on plain point sets;
//! - [`metrics::HyperVolume`]: a validated calculator for point sets, weighted fitness values and
//!   fronts exported to JSON files;
//! - [`metrics::LeastContribution`]: the indicator returning the point whose removal costs the
//!   least hyper-volume, with optional parallel dispatch and timeout.
//!
//! All objectives are assumed to be minimised by the engine. Weighted fitness values (where a
//! larger value is better) are negated before being passed to the engine.
pub mod core;
pub mod metrics;
pub mod utils;
