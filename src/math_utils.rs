//! Mathematical utility functions and constants shared by the scan analysis modules.
//!
//! Robust floating-point helpers live here so the statistics, regression and
//! classification code can agree on what "zero", "equal" and "invalid" mean.

/// Safe comparison for floating point values (handles NaN)
pub fn float_total_cmp(a: &f64, b: &f64) -> std::cmp::Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater, // push NaN to end
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal),
    }
}

/// Numerical constants used across the crate.
pub mod constants {
    /// Default epsilon for floating point comparisons
    pub const DEFAULT_EPSILON: f64 = 1e-12;

    /// Minimum acceptable variance of a regression predictor
    pub const MIN_VARIANCE: f64 = 1e-15;

    /// Largest number of exponents a q grid may hold
    pub const MAX_EXPONENT_COUNT: usize = 10_000;

    /// Tolerance when matching an exponent to a window boundary or a named q
    pub const EXPONENT_MATCH_EPSILON: f64 = 1e-9;
}

/// Safe floating point comparison functions
pub mod float_ops {
    use super::constants::DEFAULT_EPSILON;

    /// Check if two floating point numbers are approximately equal
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        approx_eq_eps(a, b, DEFAULT_EPSILON)
    }

    /// Check if two floating point numbers are approximately equal with custom epsilon
    #[inline]
    pub fn approx_eq_eps(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    /// Check if a floating point number is approximately zero
    #[inline]
    pub fn approx_zero(x: f64) -> bool {
        x.abs() < DEFAULT_EPSILON
    }

    /// Check if a floating point number is approximately zero with custom epsilon
    #[inline]
    pub fn approx_zero_eps(x: f64, epsilon: f64) -> bool {
        x.abs() < epsilon
    }

    /// Safe division that checks for near-zero denominators and infinite/NaN inputs
    pub fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
        if approx_zero(denominator) || !numerator.is_finite() || !denominator.is_finite() {
            None
        } else {
            Some(numerator / denominator)
        }
    }

    /// Safe logarithm that checks for positive arguments and finite inputs
    pub fn safe_ln(x: f64) -> Option<f64> {
        if x > 0.0 && x.is_finite() {
            Some(x.ln())
        } else {
            None
        }
    }
}

/// Evenly spaced exponents from `start` to `end` inclusive.
///
/// The last value is clamped to `end` so accumulated rounding never drops it.
/// Returns an empty vector for a non-positive step, an inverted range or a
/// grid that would exceed [`constants::MAX_EXPONENT_COUNT`] values.
pub fn exponent_range(start: f64, end: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !start.is_finite() || !end.is_finite() || start > end {
        return Vec::new();
    }
    let span = ((end - start) / step + constants::EXPONENT_MATCH_EPSILON).floor();
    if !span.is_finite() || span >= constants::MAX_EXPONENT_COUNT as f64 {
        return Vec::new();
    }
    let count = span as usize + 1;
    (0..count)
        .map(|i| {
            let q = start + i as f64 * step;
            // snap values like 1.0000000000000002 so exponent lookups stay exact
            let rounded = (q / step).round() * step;
            if float_ops::approx_eq_eps(q, rounded, constants::EXPONENT_MATCH_EPSILON) {
                rounded.min(end)
            } else {
                q.min(end)
            }
        })
        .collect()
}
