//! Shape classification of exponent-indexed curves.
//!
//! A multifractal object shows generalized dimensions that fall steadily as
//! the moment exponent grows. A curve with a single interior peak ("humped")
//! points at a sampling problem rather than real scaling, so the descriptor
//! needs to tell humps apart from monotone or flat curves.
//!
//! Classification runs on the sanitized sequence: invalid entries are removed
//! first and indices below refer to the remaining values. A pair of
//! neighbours `(i, i + 1)` is said to sit at index `i`.
//!
//! The peak index is the later index of the last strict rise (index 0 if the
//! curve never rises). A curve is [`CurveShape::Humped`] only when all of
//! these hold:
//!
//! 1. values between index 1 and the peak never fall (false if the peak is 0);
//! 2. values after the peak never rise (false if the peak is the last index);
//! 3. some pair at or after the peak strictly falls;
//! 4. some pair before the peak strictly rises.
//!
//! Anything else with at least two valid points is [`CurveShape::NotCurved`];
//! fewer than two valid points is [`CurveShape::Unknown`].

use crate::results::ScalingVerdict;
use crate::sanitize::sanitize;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape of a classified curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CurveShape {
    /// Not enough valid data to say anything
    Unknown,
    /// Evidence against a single interior peak
    NotCurved,
    /// Single peak with real rise before and real fall after it
    Humped,
}

impl CurveShape {
    /// True for [`CurveShape::Humped`].
    pub fn is_humped(self) -> bool {
        matches!(self, CurveShape::Humped)
    }
}

/// Outcome of classifying one curve. A fresh value per call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurveClassification {
    /// Overall shape
    pub shape: CurveShape,
    /// Peak index in the sanitized curve, `None` when no valid data
    pub peak_index: Option<usize>,
    /// Number of valid points classified
    pub valid_points: usize,
    /// Values between index 1 and the peak never fall
    pub non_decreasing_to_peak: bool,
    /// Values after the peak never rise
    pub non_increasing_after_peak: bool,
    /// A strict fall exists at or after the peak
    pub falls_after_peak: bool,
    /// A strict rise exists before the peak
    pub rises_before_peak: bool,
    /// The whole curve never rises
    pub never_increases: bool,
    /// The whole curve never falls
    pub never_decreases: bool,
    /// Scaling suggestion attached by the caller; classification alone never decides it
    pub scaling: ScalingVerdict,
}

impl CurveClassification {
    fn unknown(valid_points: usize) -> Self {
        Self {
            shape: CurveShape::Unknown,
            peak_index: None,
            valid_points,
            non_decreasing_to_peak: false,
            non_increasing_after_peak: false,
            falls_after_peak: false,
            rises_before_peak: false,
            never_increases: true,
            never_decreases: true,
            scaling: ScalingVerdict::NotDetermined,
        }
    }

    /// Copy of this classification carrying `scaling`.
    pub fn with_scaling(&self, scaling: ScalingVerdict) -> Self {
        Self {
            scaling,
            ..self.clone()
        }
    }

    /// Shorthand for `shape.is_humped()`.
    pub fn is_humped(&self) -> bool {
        self.shape.is_humped()
    }
}

/// Classify an ordered curve that may contain invalid entries.
///
/// # Example
/// ```rust
/// use fractal_scan::curve_shape::{classify_curve, CurveShape};
///
/// assert_eq!(classify_curve(&[1.0, 2.0, 3.0, 2.0, 1.0]).shape, CurveShape::Humped);
/// assert_eq!(classify_curve(&[1.0, 2.0, 3.0, 4.0, 5.0]).shape, CurveShape::NotCurved);
/// assert_eq!(classify_curve(&[]).shape, CurveShape::Unknown);
/// ```
pub fn classify_curve(values: &[f64]) -> CurveClassification {
    let v = sanitize(values);
    let n = v.len();
    if n < 2 {
        return CurveClassification::unknown(n);
    }

    let mut peak = 0;
    for i in 1..n {
        if v[i] > v[i - 1] {
            peak = i;
        }
    }

    let non_decreasing_to_peak = peak > 0 && (1..peak).all(|i| v[i] >= v[i - 1]);
    let non_increasing_after_peak = peak < n - 1 && (peak + 1..n).all(|i| v[i] <= v[i - 1]);
    let falls_after_peak = (peak..n - 1).any(|i| v[i + 1] < v[i]);
    let rises_before_peak = (0..peak).any(|i| v[i + 1] > v[i]);

    let shape = if non_decreasing_to_peak
        && non_increasing_after_peak
        && falls_after_peak
        && rises_before_peak
    {
        CurveShape::Humped
    } else {
        CurveShape::NotCurved
    };

    CurveClassification {
        shape,
        peak_index: Some(peak),
        valid_points: n,
        non_decreasing_to_peak,
        non_increasing_after_peak,
        falls_after_peak,
        rises_before_peak,
        never_increases: never_increases_within(&v, 0.0),
        never_decreases: never_decreases_within(&v, 0.0),
        scaling: ScalingVerdict::NotDetermined,
    }
}

/// Classify a curve whose missing points are `None`.
pub fn classify_optional_curve(values: &[Option<f64>]) -> CurveClassification {
    let raw: Vec<f64> = values.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    classify_curve(&raw)
}

/// True unless some rightward step rises by more than `tolerance`.
///
/// Invalid entries are dropped first. Empty and single-point curves are
/// true: there is nothing that contradicts the claim.
///
/// # Example
/// ```rust
/// use fractal_scan::curve_shape::never_increases_within;
///
/// let curve = [1.0, 1.0001, 1.0, 1.0];
/// assert!(never_increases_within(&curve, 0.001));
/// assert!(!never_increases_within(&curve, 0.00001));
/// ```
pub fn never_increases_within(values: &[f64], tolerance: f64) -> bool {
    sanitize(values).windows(2).all(|w| w[1] - w[0] <= tolerance)
}

/// True unless some rightward step falls by more than `tolerance`.
pub fn never_decreases_within(values: &[f64], tolerance: f64) -> bool {
    sanitize(values).windows(2).all(|w| w[0] - w[1] <= tolerance)
}

/// Number of rightward steps that rise by more than `tolerance`.
pub fn count_rises(values: &[f64], tolerance: f64) -> usize {
    sanitize(values)
        .windows(2)
        .filter(|w| w[1] - w[0] > tolerance)
        .count()
}
