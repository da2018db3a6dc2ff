use hvsweep::core::HvError;
use hvsweep::metrics::{hypervolume, HyperVolume, HyperVolumeSweep};

/// This example shows how to calculate the hyper-volume of a front with the dimension-sweep
/// algorithm by [Fonseca et al. (2006)](http://dx.doi.org/10.1109/CEC.2006.1688440).
///
/// The front is made of points on the hyperplane where the coordinates sum to one. All objectives
/// are minimised, so the reference point must be dominated by every point.
///
/// Make sure to compile this in release mode to speed up the calculation:
///
/// `cargo run --example hypervolume_front --release`
fn main() -> Result<(), HvError> {
    env_logger::init();

    // 3-objective front with 0.1 spacing
    let steps = 10;
    let mut front = vec![];
    for i in 0..=steps {
        for j in 0..=(steps - i) {
            let x = i as f64 / steps as f64;
            let y = j as f64 / steps as f64;
            front.push(vec![x, y, 1.0 - x - y]);
        }
    }
    println!("The front has {} points", front.len());

    // the validated calculator checks the points and the reference point first
    let reference_point = HyperVolume::estimate_reference_point(&front, Some(vec![0.5; 3]))?;
    let hv = HyperVolume::from_values(&front, &reference_point)?;
    println!("Hyper-volume with reference point {reference_point:?} is {hv}");

    // the raw engine skips the validation. With a reference point that is not dominated by all
    // the points, its result is meaningless, so the points outside the reference box must be
    // removed first
    let reference_point = [0.5, 0.5, 0.5];
    let inside: Vec<&Vec<f64>> = front
        .iter()
        .filter(|p| p.iter().zip(&reference_point).all(|(x, r)| x < r))
        .collect();
    let hv = hypervolume(&inside, &reference_point);
    println!(
        "Hyper-volume of the {} points dominating {reference_point:?} is {hv}",
        inside.len()
    );

    // the engine can be reused with the same reference point
    let engine = HyperVolumeSweep::new(&[2.0, 2.0, 2.0]);
    for size in [10, 30, front.len()] {
        println!(
            "Hyper-volume of the first {size} points is {}",
            engine.compute(&front[..size])
        );
    }

    Ok(())
}
