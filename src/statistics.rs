//! Descriptive statistics of a measurement sequence.
//!
//! [`SampleStatistics::compute`] sanitizes its input and returns `None` when
//! nothing valid remains, which is the crate-wide "not computed" sentinel.
//! Standard deviation is the population form (divide by `n`), which is the
//! form lacunarity is defined on.

use crate::math_utils::float_ops;
use crate::sanitize::sanitize;
use statrs::statistics::Statistics;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Summary statistics of the finite entries of a sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleStatistics {
    /// Number of finite entries used
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Smallest entry
    pub min: f64,
    /// Largest entry
    pub max: f64,
}

impl SampleStatistics {
    /// Compute statistics over the finite entries of `values`.
    ///
    /// # Example
    /// ```rust
    /// use fractal_scan::statistics::SampleStatistics;
    ///
    /// let stats = SampleStatistics::compute(&[2.0, 4.0, f64::NAN, 6.0]).unwrap();
    /// assert_eq!(stats.count, 3);
    /// assert!((stats.mean - 4.0).abs() < 1e-12);
    /// assert!(SampleStatistics::compute(&[f64::NAN]).is_none());
    /// ```
    pub fn compute(values: &[f64]) -> Option<Self> {
        let clean = sanitize(values);
        Self::compute_clean(&clean)
    }

    /// Compute statistics over data already known to be finite.
    pub(crate) fn compute_clean(clean: &[f64]) -> Option<Self> {
        if clean.is_empty() {
            return None;
        }

        let mean = Statistics::mean(clean.iter());
        let std_dev = if clean.len() == 1 {
            0.0
        } else {
            Statistics::population_std_dev(clean.iter())
        };

        Some(Self {
            count: clean.len(),
            mean,
            std_dev,
            // qualified: Iterator::min/max would otherwise shadow these
            min: Statistics::min(clean.iter()),
            max: Statistics::max(clean.iter()),
        })
    }

    /// Coefficient of variation, `std_dev / mean`.
    ///
    /// `None` when the mean is zero: the ratio is undefined there.
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        float_ops::safe_div(self.std_dev, self.mean)
    }

    /// Population variance.
    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }

    /// `max - min`.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Mean of the finite entries, or `None`.
pub fn mean(values: &[f64]) -> Option<f64> {
    SampleStatistics::compute(values).map(|s| s.mean)
}

/// Population standard deviation of the finite entries, or `None`.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    SampleStatistics::compute(values).map(|s| s.std_dev)
}

/// Coefficient of variation of the finite entries, or `None`.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    SampleStatistics::compute(values).and_then(|s| s.coefficient_of_variation())
}

/// Minimum of the finite entries, or `None`.
pub fn min(values: &[f64]) -> Option<f64> {
    SampleStatistics::compute(values).map(|s| s.min)
}

/// Maximum of the finite entries, or `None`.
pub fn max(values: &[f64]) -> Option<f64> {
    SampleStatistics::compute(values).map(|s| s.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_basic_statistics() {
        let stats = SampleStatistics::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert_approx_eq!(stats.mean, 5.0, 1e-12);
        assert_approx_eq!(stats.std_dev, 2.0, 1e-12);
        assert_approx_eq!(stats.coefficient_of_variation().unwrap(), 0.4, 1e-12);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.range(), 7.0);
    }

    #[test]
    fn test_empty_and_invalid_are_not_computed() {
        assert!(SampleStatistics::compute(&[]).is_none());
        assert!(SampleStatistics::compute(&[f64::NAN, f64::NEG_INFINITY]).is_none());
        assert!(mean(&[]).is_none());
        assert!(coefficient_of_variation(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_single_value() {
        let stats = SampleStatistics::compute(&[3.5]).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.min, 3.5);
        assert_eq!(stats.max, 3.5);
        assert_eq!(stats.coefficient_of_variation(), Some(0.0));
    }

    #[test]
    fn test_zero_mean_has_no_cv() {
        let stats = SampleStatistics::compute(&[-1.0, 1.0]).unwrap();
        assert_approx_eq!(stats.mean, 0.0, 1e-15);
        assert!(stats.coefficient_of_variation().is_none());
    }

    #[test]
    fn test_invalid_entries_ignored() {
        assert_approx_eq!(mean(&[1.0, f64::NAN, 3.0]).unwrap(), 2.0, 1e-12);
        assert_eq!(max(&[1.0, f64::INFINITY, 3.0]), Some(3.0));
        assert_eq!(min(&[f64::NEG_INFINITY, 1.0, 3.0]), Some(1.0));
        assert_approx_eq!(std_dev(&[1.0, f64::NAN, 3.0]).unwrap(), 1.0, 1e-12);
    }
}
