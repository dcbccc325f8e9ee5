//! # Analysis Results Structures
//!
//! Verdict enums shared by the classifier and the multifractal descriptor,
//! and the per-scan records produced by [`ScanAnalyzer`](crate::analyzer::ScanAnalyzer).

use crate::{
    box_count::BoxCountResult, labels::ScanVariant, lacunarity::GridLacunarity,
    multifractal::MultifractalDescription, regression::RegressionFit,
    spectrum::MultifractalSpectrum,
};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Suggested scaling behaviour of a scanned object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScalingVerdict {
    /// Evidence was insufficient to decide
    #[default]
    NotDetermined,
    /// Generalized dimensions barely vary with the exponent
    ProbablyMonofractal,
    /// Generalized dimensions fall with the exponent in the expected way
    ProbablyMultifractal,
}

impl fmt::Display for ScalingVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScalingVerdict::NotDetermined => "not determined",
            ScalingVerdict::ProbablyMonofractal => "probably monofractal",
            ScalingVerdict::ProbablyMultifractal => "probably multifractal",
        };
        f.write_str(s)
    }
}

/// Whether D(0) ≥ D(1) ≥ D(2), the ordering generalized dimensions must obey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DimensionalOrdering {
    /// One of D(0), D(1), D(2) is missing
    #[default]
    NotDetermined,
    /// D(0) ≥ D(1) ≥ D(2) within tolerance
    Expected,
    /// The ordering is violated
    Unexpected,
}

impl fmt::Display for DimensionalOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DimensionalOrdering::NotDetermined => "unknown",
            DimensionalOrdering::Expected => "D0>=D1>=D2",
            DimensionalOrdering::Unexpected => "not D0>=D1>=D2",
        };
        f.write_str(s)
    }
}

/// Everything computed for one placement of the sampling grid.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementResult {
    /// Counts (and masses) per size
    pub box_count: BoxCountResult,
    /// Box-counting dimension with fit quality; `None` if not computed
    pub dimension: Option<RegressionFit>,
    /// Generalized-dimension family, when multifractal analysis ran
    pub spectrum: Option<MultifractalSpectrum>,
    /// Multifractal verdict, when multifractal analysis ran
    pub multifractal: Option<MultifractalDescription>,
}

/// Results of one scan across all its grid placements.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanResults {
    /// Scan variant the input came from
    pub variant: ScanVariant,
    /// Per-placement results, in input order
    pub placements: Vec<PlacementResult>,
    /// Mean box-counting dimension across placements
    pub mean_dimension: Option<f64>,
    /// Standard deviation of the dimension across placements
    pub dimension_std_dev: Option<f64>,
    /// Lacunarity summary, when enabled
    pub lacunarity: Option<GridLacunarity>,
}

impl ScanResults {
    /// Dimension fits of every placement, `None` where not computed.
    pub fn dimensions(&self) -> Vec<Option<f64>> {
        self.placements
            .iter()
            .map(|p| p.dimension.map(|fit| fit.slope))
            .collect()
    }

    /// Multifractal descriptions in placement order.
    pub fn multifractal_descriptions(&self) -> impl Iterator<Item = &MultifractalDescription> {
        self.placements.iter().filter_map(|p| p.multifractal.as_ref())
    }
}
