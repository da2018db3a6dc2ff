#[cfg(test)]
use float_cmp::{approx_eq, F64Margin};

#[cfg(test)]
/// Compare two arrays of f64
pub(crate) fn assert_approx_array_eq(calculated_values: &[f64], expected_values: &[f64]) {
    assert_eq!(
        calculated_values.len(),
        expected_values.len(),
        "the arrays have different lengths"
    );
    let margins = F64Margin {
        epsilon: 1e-9,
        ulps: 4,
    };
    for (i, (calculated, expected)) in calculated_values.iter().zip(expected_values).enumerate() {
        if !approx_eq!(f64, *calculated, *expected, margins) {
            panic!(
                r#"assertion failed on item #{i:?}
                    actual: `{calculated:?}`,
                    expected: `{expected:?}`"#,
            )
        }
    }
}

/// Evenly spaced values within `[start, stop)` with the given `step`. The values are generated as
/// `start + i * delta`, where `delta` is the distance between the first two values, as numpy's
/// `arange` does. This makes the generated fronts bit-identical to the ones used to produce the
/// reference hyper-volume values in the tests.
///
/// # Arguments
///
/// * `start`: The first value.
/// * `stop`: The end of the interval (excluded).
/// * `step`: The spacing between values.
///
/// returns: `Vec<f64>`
#[cfg(test)]
pub(crate) fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let size = ((stop - start) / step).ceil().max(0.0) as usize;
    let delta = (start + step) - start;
    (0..size).map(|i| start + i as f64 * delta).collect()
}

/// Build a front of points lying on the diagonal, i.e. with all `N` coordinates equal.
///
/// # Arguments
///
/// * `values`: The coordinate of each point.
///
/// returns: `Vec<Vec<f64>>`
#[cfg(test)]
pub(crate) fn diagonal_front<const N: usize>(values: &[f64]) -> Vec<Vec<f64>> {
    values.iter().map(|a| vec![*a; N]).collect()
}
