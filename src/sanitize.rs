//! Removal of invalid numeric entries from measurement sequences.
//!
//! Scan collaborators mark unusable samples with NaN or infinities. Every
//! statistic, regression and curve classification in this crate runs on
//! sanitized input.

/// Returns a new vector containing only the finite entries of `values`, in order.
///
/// The input is never mutated; an input with no finite entries yields an
/// empty vector.
///
/// # Example
/// ```rust
/// use fractal_scan::sanitize::sanitize;
///
/// let raw = [1.0, f64::NAN, 2.0, f64::INFINITY, 3.0];
/// assert_eq!(sanitize(&raw), vec![1.0, 2.0, 3.0]);
/// ```
pub fn sanitize(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Sanitizes `Option` entries, treating `None` like an invalid number.
pub fn sanitize_optional(values: &[Option<f64>]) -> Vec<f64> {
    values
        .iter()
        .filter_map(|v| v.filter(|x| x.is_finite()))
        .collect()
}

/// True if every entry is finite (an empty slice counts as clean).
pub fn is_clean(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}
