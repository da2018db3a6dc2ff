use std::env;
use std::fs;

use hvsweep::core::{FrontExport, HvError};
use hvsweep::metrics::HyperVolume;

/// This example shows how to track the convergence of an algorithm by calculating the
/// hyper-volume of the fronts it exported to JSON files at different generations.
///
/// The fronts below approach the Pareto front `y = 1 - sqrt(x)` as the generation increases. Each
/// front is saved to a JSON file, then all the files are read back and their hyper-volume is
/// calculated with the same reference point. The hyper-volume increases as the fronts converge.
///
/// `cargo run --example convergence --release`
fn main() -> Result<(), HvError> {
    env_logger::init();

    let out_path = env::temp_dir().join("hvsweep_convergence");
    fs::create_dir_all(&out_path)
        .map_err(|e| HvError::Export(format!("Cannot create the output folder: {e}")))?;

    for generation in (0..=1000).step_by(100) {
        let distance = 1.0 / (1.0 + generation as f64 / 50.0);
        let objective_values = (0..30)
            .map(|i| {
                let x = i as f64 / 29.0;
                vec![x + distance, 1.0 - x.sqrt() + distance]
            })
            .collect();
        FrontExport::new("Synthetic", objective_values, generation).save_to_json(&out_path, None)?;
    }

    // select a reference point to use for the calculation. This must be dominated by all the
    // points of all fronts
    let ref_point = vec![10.0, 10.0];

    let front = FrontExport::read_json_file(&out_path.join("History_Synthetic_gen200.json"))?;
    let hv = HyperVolume::from_file(&front, &ref_point)?;
    println!(
        "Hyper-volume at generation #{} is {}",
        hv.generation, hv.value
    );

    // calculate the hyper-volume at all generations to check the overall convergence
    let all_fronts = FrontExport::read_json_files(&out_path)?;
    let hvs = HyperVolume::from_files(&all_fronts, &ref_point)?;
    println!("Hyper-volumes generations: {:?}", hvs.generations());
    println!("Hyper-volumes values: {:?}", hvs.values());

    Ok(())
}
