//! Aggregation of per-size box-counting measurements.
//!
//! A grid-scanning collaborator hands over, for every sampling size, either a
//! ready count of occupied boxes or the raw mass found in each occupied box.
//! [`BoxCountResult`] owns an independent copy of whatever it is built from,
//! so later edits on either side never leak across.

use crate::errors::{validate_matching_lengths, validate_sizes, FractalResult};
use crate::regression::{log_log_fit, RegressionFit};
use crate::statistics::SampleStatistics;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Measurements taken with one sampling size.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SizeCountSample {
    /// Box edge length, strictly positive
    pub size: f64,
    /// Mass found in each occupied box at this size
    pub measurements: Vec<f64>,
}

impl SizeCountSample {
    /// Create a sample for one size.
    pub fn new(size: f64, measurements: Vec<f64>) -> Self {
        Self { size, measurements }
    }
}

/// Sizes with their box counts and, optionally, the per-box masses.
///
/// Invariants: `sizes.len() == counts.len()`; when masses are present,
/// `counts[i] == masses[i].len()`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxCountResult {
    sizes: Vec<f64>,
    counts: Vec<f64>,
    masses: Option<Vec<Vec<f64>>>,
}

impl BoxCountResult {
    /// Build from sizes and the mass of every occupied box at each size.
    ///
    /// `count[i]` is the number of entries in `masses[i]`.
    ///
    /// # Errors
    /// `LengthMismatch` if the outer lengths differ, `InvalidSize` if a size is
    /// not strictly positive and finite.
    ///
    /// # Example
    /// ```rust
    /// use fractal_scan::box_count::BoxCountResult;
    ///
    /// let sizes = [4.0, 5.0, 8.0];
    /// let masses = vec![
    ///     vec![12.0, 12.0, 9.0, 15.0, 5.0, 2.0],
    ///     vec![20.0, 10.0, 20.0, 5.0],
    ///     vec![40.0, 15.0],
    /// ];
    /// let result = BoxCountResult::from_masses(&sizes, &masses).unwrap();
    /// assert_eq!(result.counts(), &[6.0, 4.0, 2.0]);
    /// ```
    pub fn from_masses(sizes: &[f64], masses: &[Vec<f64>]) -> FractalResult<Self> {
        validate_matching_lengths(sizes.len(), masses.len(), "box count sizes/masses")?;
        validate_sizes(sizes)?;

        let masses: Vec<Vec<f64>> = masses.to_vec();
        let counts = masses.iter().map(|m| m.len() as f64).collect();

        Ok(Self {
            sizes: sizes.to_vec(),
            counts,
            masses: Some(masses),
        })
    }

    /// Build from sizes and pre-computed counts; no masses are retained.
    pub fn from_counts(sizes: &[f64], counts: &[f64]) -> FractalResult<Self> {
        validate_matching_lengths(sizes.len(), counts.len(), "box count sizes/counts")?;
        validate_sizes(sizes)?;

        Ok(Self {
            sizes: sizes.to_vec(),
            counts: counts.to_vec(),
            masses: None,
        })
    }

    /// Build from a family of per-size samples.
    pub fn from_samples(samples: &[SizeCountSample]) -> FractalResult<Self> {
        let sizes: Vec<f64> = samples.iter().map(|s| s.size).collect();
        let masses: Vec<Vec<f64>> = samples.iter().map(|s| s.measurements.clone()).collect();
        Self::from_masses(&sizes, &masses)
    }

    /// Sampling sizes.
    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    /// Box counts, parallel to [`sizes`](Self::sizes).
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Per-box masses, if the result was built from them.
    pub fn masses(&self) -> Option<&[Vec<f64>]> {
        self.masses.as_deref()
    }

    /// Number of sizes.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// True when no sizes were sampled.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Sum of the finite masses at size index `i`.
    pub fn total_mass(&self, i: usize) -> Option<f64> {
        let masses = self.masses.as_ref()?.get(i)?;
        SampleStatistics::compute(masses).map(|s| s.mean * s.count as f64)
    }

    /// Mean mass per occupied box at each size; NaN where not computed.
    pub fn mean_masses(&self) -> Option<Vec<f64>> {
        let masses = self.masses.as_ref()?;
        Some(
            masses
                .iter()
                .map(|m| SampleStatistics::compute(m).map_or(f64::NAN, |s| s.mean))
                .collect(),
        )
    }

    /// Box-counting dimension: the negated slope of `ln(count)` vs `ln(size)`.
    ///
    /// `None` when fewer than two sizes have a positive count.
    pub fn fractal_dimension(&self) -> Option<RegressionFit> {
        // lengths are equal by construction, so the fit cannot fail
        log_log_fit(&self.sizes, &self.counts)
            .ok()
            .flatten()
            .map(|fit| fit.negated())
    }

    /// Mass dimension: slope of `ln(mean mass per box)` vs `ln(size)`.
    pub fn mass_dimension(&self) -> Option<RegressionFit> {
        let means = self.mean_masses()?;
        log_log_fit(&self.sizes, &means).ok().flatten()
    }

    /// Compare sizes and counts only, ignoring any retained masses.
    pub fn eq_ignoring_masses(&self, other: &Self) -> bool {
        slices_eq(&self.sizes, &other.sizes) && slices_eq(&self.counts, &other.counts)
    }
}

impl PartialEq for BoxCountResult {
    fn eq(&self, other: &Self) -> bool {
        if !self.eq_ignoring_masses(other) {
            return false;
        }
        match (&self.masses, &other.masses) {
            (None, None) => true,
            (Some(a), Some(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| slices_eq(x, y)),
            _ => false,
        }
    }
}

impl Eq for BoxCountResult {}

impl Hash for BoxCountResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_slice(&self.sizes, state);
        hash_slice(&self.counts, state);
        match &self.masses {
            None => 0u8.hash(state),
            Some(masses) => {
                1u8.hash(state);
                masses.len().hash(state);
                for m in masses {
                    hash_slice(m, state);
                }
            }
        }
    }
}

/// Bit pattern used for both equality and hashing.
///
/// All NaNs collapse to one pattern and `-0.0` to `0.0`, so `Eq` stays
/// reflexive and agrees with `Hash`.
fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

fn slices_eq(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| canonical_bits(*x) == canonical_bits(*y))
}

fn hash_slice<H: Hasher>(values: &[f64], state: &mut H) {
    values.len().hash(state);
    for &v in values {
        canonical_bits(v).hash(state);
    }
}
