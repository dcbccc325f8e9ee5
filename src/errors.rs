//! Error types and validation functions for fractal scan analysis.
//!
//! Missing or insufficient data is not an error in this crate: statistics,
//! regressions and classifications report it through `Option::None` or an
//! explicit `Unknown` variant. The errors below are reserved for broken
//! contracts such as mismatched parallel arrays or impossible sampling sizes.

use thiserror::Error;

/// Error types for fractal scan analysis.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FractalAnalysisError {
    /// Insufficient data for the requested operation.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual number of data points provided
        actual: usize,
    },

    /// Invalid parameter value for analysis configuration.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Parallel arrays that must line up element-wise do not.
    #[error("Length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Which pair of arrays disagreed
        context: String,
        /// Length of the reference array
        expected: usize,
        /// Length of the offending array
        actual: usize,
    },

    /// A sampling size that is not strictly positive and finite.
    #[error("Invalid sampling size at index {index}: {value}")]
    InvalidSize {
        /// Position in the size sequence
        index: usize,
        /// Offending value
        value: f64,
    },

    /// Numerical computation error.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for numerical failure
        reason: String,
        /// Operation that failed
        operation: Option<String>,
    },
}

/// Result type for fractal analysis operations.
pub type FractalResult<T> = Result<T, FractalAnalysisError>;

/// Validates that data has sufficient length for analysis.
///
/// # Example
/// ```rust
/// use fractal_scan::errors::validate_data_length;
///
/// let data = vec![1.0, 2.0, 3.0];
/// assert!(validate_data_length(&data, 2, "test").is_ok());
/// assert!(validate_data_length(&data, 5, "test").is_err());
/// ```
pub fn validate_data_length(data: &[f64], min_required: usize, operation: &str) -> FractalResult<()> {
    if data.len() < min_required {
        log::debug!(
            "{}: need {} points, got {}",
            operation,
            min_required,
            data.len()
        );
        Err(FractalAnalysisError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that a parameter is within expected bounds (inclusive).
///
/// # Example
/// ```rust
/// use fractal_scan::errors::validate_parameter;
///
/// assert!(validate_parameter(0.5, 0.0, 1.0, "flip_threshold").is_ok());
/// assert!(validate_parameter(1.5, 0.0, 1.0, "flip_threshold").is_err());
/// ```
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> FractalResult<()> {
    if value.is_nan() {
        return Err(FractalAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must not be NaN".to_string(),
        });
    }

    if min.is_nan() || max.is_nan() || min > max {
        return Err(FractalAnalysisError::NumericalError {
            reason: format!(
                "Invalid bounds for parameter {}: min={}, max={}",
                name, min, max
            ),
            operation: None,
        });
    }

    if value < min || value > max {
        Err(FractalAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: format!("[{}, {}]", min, max),
        })
    } else {
        Ok(())
    }
}

/// Validates that a value is finite and not NaN.
///
/// # Example
/// ```rust
/// use fractal_scan::errors::validate_finite;
///
/// assert!(validate_finite(1.0, "test").is_ok());
/// assert!(validate_finite(f64::NAN, "test").is_err());
/// assert!(validate_finite(f64::INFINITY, "test").is_err());
/// ```
pub fn validate_finite(value: f64, name: &str) -> FractalResult<()> {
    if !value.is_finite() {
        Err(FractalAnalysisError::NumericalError {
            reason: format!("{} is not finite: {}", name, value),
            operation: None,
        })
    } else {
        Ok(())
    }
}

/// Validates that two parallel arrays have the same length.
pub fn validate_matching_lengths(expected: usize, actual: usize, context: &str) -> FractalResult<()> {
    if expected != actual {
        return Err(FractalAnalysisError::LengthMismatch {
            context: context.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Validates a sampling size sequence: every size must be finite and > 0.
///
/// Sizes need not be sorted; the regression does not depend on order.
pub fn validate_sizes(sizes: &[f64]) -> FractalResult<()> {
    if let Some((index, &value)) = sizes
        .iter()
        .enumerate()
        .find(|(_, &s)| !(s.is_finite() && s > 0.0))
    {
        return Err(FractalAnalysisError::InvalidSize { index, value });
    }
    Ok(())
}
