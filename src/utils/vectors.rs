use ordered_float::OrderedFloat;

use crate::core::HvError;

/// Calculate the vector maximum value.
///
/// # Arguments
///
/// * `v`: The vector.
///
/// returns: `Result<f64, HvError>`
pub fn vector_max(v: &[f64]) -> Result<f64, HvError> {
    Ok(*v
        .iter()
        .max_by(|a, b| a.total_cmp(b))
        .ok_or(HvError::Generic(
            "Cannot calculate vector max value".to_string(),
        ))?)
}

/// Return the index of the maximum value. When the maximum appears more than once, the first
/// index is returned.
///
/// # Arguments
///
/// * `v`: The vector.
///
/// returns: `Result<usize, HvError>`
pub fn argmax(v: &[f64]) -> Result<usize, HvError> {
    v.iter()
        .enumerate()
        .rev()
        .max_by_key(|(_, value)| OrderedFloat(**value))
        .map(|(idx, _)| idx)
        .ok_or(HvError::Generic(
            "Cannot calculate the index of the vector max value".to_string(),
        ))
}
