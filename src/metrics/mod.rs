pub use hv_sweep::{hypervolume, HyperVolumeSweep};
pub use hypervolume::{AllHyperVolumeFileData, HyperVolume, HyperVolumeFileData};
pub use least_contribution::{
    least_contribution, reduce_front, FrontReduction, LeastContribution, LeastContributionArg,
};

mod hv_sweep;
mod hypervolume;
mod least_contribution;
