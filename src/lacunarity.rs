//! Lacunarity: how unevenly mass fills the sampling boxes.
//!
//! For one size, λ = CV² + 1 where CV is the coefficient of variation of the
//! per-box masses (population standard deviation over mean). λ = 1 means every
//! box holds the same mass. Values are summarised across sizes and, when the
//! grid was placed more than once, across placements.

use crate::box_count::BoxCountResult;
use crate::errors::{validate_matching_lengths, validate_sizes, FractalResult};
use crate::sanitize::sanitize_optional;
use crate::statistics::SampleStatistics;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lacunarity of the mass distribution at one size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SizeLacunarity {
    /// Sampling size
    pub size: f64,
    /// Statistics of the finite masses at this size
    pub statistics: SampleStatistics,
    /// Coefficient of variation of the masses
    pub cv: f64,
    /// CV² + 1
    pub lambda: f64,
}

impl SizeLacunarity {
    /// Lacunarity of `masses` sampled at `size`.
    ///
    /// `None` when no finite mass remains or the mean mass is zero.
    pub fn compute(size: f64, masses: &[f64]) -> Option<Self> {
        let statistics = SampleStatistics::compute(masses)?;
        let cv = statistics.coefficient_of_variation()?;
        Some(Self {
            size,
            statistics,
            cv,
            lambda: cv * cv + 1.0,
        })
    }
}

/// λ = CV² + 1 of a single distribution, or `None`.
///
/// # Example
/// ```rust
/// use fractal_scan::lacunarity::lacunarity;
///
/// assert_eq!(lacunarity(&[10.0, 10.0, 10.0, 10.0]), Some(1.0));
/// assert!(lacunarity(&[]).is_none());
/// ```
pub fn lacunarity(masses: &[f64]) -> Option<f64> {
    SizeLacunarity::compute(1.0, masses).map(|l| l.lambda)
}

/// Lacunarity across all sizes of one grid placement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LacunaritySummary {
    /// Per-size results, `None` where the size had nothing usable
    pub per_size: Vec<Option<SizeLacunarity>>,
    /// Mean λ over computed sizes
    pub mean: Option<f64>,
    /// Smallest λ
    pub min: Option<f64>,
    /// Largest λ
    pub max: Option<f64>,
    /// Coefficient of variation of λ over sizes
    pub cv: Option<f64>,
}

impl LacunaritySummary {
    /// Summarise per-size mass distributions.
    ///
    /// # Errors
    /// `LengthMismatch` or `InvalidSize` for broken size/mass inputs.
    pub fn from_distributions(sizes: &[f64], masses: &[Vec<f64>]) -> FractalResult<Self> {
        validate_matching_lengths(sizes.len(), masses.len(), "lacunarity sizes/masses")?;
        validate_sizes(sizes)?;

        let per_size: Vec<Option<SizeLacunarity>> = sizes
            .iter()
            .zip(masses)
            .map(|(&size, m)| {
                let result = SizeLacunarity::compute(size, m);
                if result.is_none() {
                    log::debug!("lacunarity not computed at size {}", size);
                }
                result
            })
            .collect();

        Ok(Self::from_per_size(per_size))
    }

    /// Summarise a box count that retained its masses.
    pub fn from_box_count(result: &BoxCountResult) -> Option<FractalResult<Self>> {
        result
            .masses()
            .map(|masses| Self::from_distributions(result.sizes(), masses))
    }

    fn from_per_size(per_size: Vec<Option<SizeLacunarity>>) -> Self {
        let lambdas: Vec<Option<f64>> = per_size.iter().map(|l| l.map(|l| l.lambda)).collect();
        let stats = SampleStatistics::compute(&sanitize_optional(&lambdas));

        Self {
            per_size,
            mean: stats.map(|s| s.mean),
            min: stats.map(|s| s.min),
            max: stats.map(|s| s.max),
            cv: stats.and_then(|s| s.coefficient_of_variation()),
        }
    }

    /// λ values in size order, `None` where not computed.
    pub fn lambdas(&self) -> Vec<Option<f64>> {
        self.per_size.iter().map(|l| l.map(|l| l.lambda)).collect()
    }

    /// Number of sizes with a computed λ.
    pub fn computed_sizes(&self) -> usize {
        self.per_size.iter().filter(|l| l.is_some()).count()
    }
}

/// Lacunarity across several placements of the sampling grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridLacunarity {
    /// One summary per placement, in input order
    pub placements: Vec<LacunaritySummary>,
    /// Per size, the mean λ over placements where it was computed
    pub lambda_by_size: Vec<Option<f64>>,
    /// Mean of the per-placement mean λ
    pub mean: Option<f64>,
    /// Smallest per-placement mean λ
    pub min: Option<f64>,
    /// Largest per-placement mean λ
    pub max: Option<f64>,
    /// Coefficient of variation of the per-placement mean λ
    pub cv: Option<f64>,
}

impl GridLacunarity {
    /// Summarise every placement, each given as per-size mass distributions
    /// over the shared `sizes`.
    pub fn from_placements(sizes: &[f64], placements: &[Vec<Vec<f64>>]) -> FractalResult<Self> {
        #[cfg(feature = "parallel")]
        let summaries: FractalResult<Vec<LacunaritySummary>> = placements
            .par_iter()
            .map(|masses| LacunaritySummary::from_distributions(sizes, masses))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let summaries: FractalResult<Vec<LacunaritySummary>> = placements
            .iter()
            .map(|masses| LacunaritySummary::from_distributions(sizes, masses))
            .collect();

        Ok(Self::from_summaries(sizes.len(), summaries?))
    }

    fn from_summaries(size_count: usize, placements: Vec<LacunaritySummary>) -> Self {
        let lambda_by_size = (0..size_count)
            .map(|i| {
                let at_size: Vec<Option<f64>> = placements
                    .iter()
                    .map(|p| p.per_size.get(i).copied().flatten().map(|l| l.lambda))
                    .collect();
                SampleStatistics::compute(&sanitize_optional(&at_size)).map(|s| s.mean)
            })
            .collect();

        let means: Vec<Option<f64>> = placements.iter().map(|p| p.mean).collect();
        let stats = SampleStatistics::compute(&sanitize_optional(&means));

        Self {
            placements,
            lambda_by_size,
            mean: stats.map(|s| s.mean),
            min: stats.map(|s| s.min),
            max: stats.map(|s| s.max),
            cv: stats.and_then(|s| s.coefficient_of_variation()),
        }
    }
}
