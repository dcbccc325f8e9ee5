//! # Scan Analyzer
//!
//! [`ScanAnalyzer`] is the entry point for analysing one box-counting scan.
//! A scan is a shared size sequence plus, for every placement of the sampling
//! grid, the per-box masses measured at each size. For each placement the
//! analyzer builds the box count, fits the box-counting dimension and, when
//! enabled, computes the generalized-dimension spectrum and its multifractal
//! description. Lacunarity is summarised across all placements.
//!
//! ## Usage Example
//!
//! ```rust
//! use fractal_scan::{AnalysisConfig, ScanAnalyzer, ScanInput, ScanVariant};
//!
//! # fn main() -> Result<(), fractal_scan::FractalAnalysisError> {
//! // a filled 64 x 64 square, one grid placement
//! let sizes = vec![2.0, 4.0, 8.0, 16.0];
//! let masses: Vec<Vec<f64>> = sizes
//!     .iter()
//!     .map(|&s: &f64| vec![s * s; (64.0 / s).powi(2) as usize])
//!     .collect();
//! let input = ScanInput::new(sizes, vec![masses], ScanVariant::OneGrid);
//!
//! let analyzer = ScanAnalyzer::new(AnalysisConfig::deep())?;
//! let results = analyzer.analyze(&input)?;
//! let dimension = results.mean_dimension.unwrap();
//! assert!((dimension - 2.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```

use crate::{
    box_count::BoxCountResult,
    config::AnalysisConfig,
    errors::{validate_matching_lengths, validate_sizes, FractalAnalysisError, FractalResult},
    labels::ScanVariant,
    lacunarity::GridLacunarity,
    multifractal::{MultifractalDescriptor, ScalingPolicy, ThresholdScalingPolicy},
    results::{PlacementResult, ScanResults},
    statistics::SampleStatistics,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Masses of one scan: shared sizes and per-placement, per-size box masses.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanInput {
    /// Box sizes shared by every placement, strictly positive
    pub sizes: Vec<f64>,
    /// `placements[p][i]` holds the box masses of placement `p` at `sizes[i]`
    pub placements: Vec<Vec<Vec<f64>>>,
    /// How the scan was taken
    pub variant: ScanVariant,
}

impl ScanInput {
    /// Bundle a scan.
    pub fn new(sizes: Vec<f64>, placements: Vec<Vec<Vec<f64>>>, variant: ScanVariant) -> Self {
        Self {
            sizes,
            placements,
            variant,
        }
    }

    /// Scan with a single grid placement.
    pub fn single(sizes: Vec<f64>, masses: Vec<Vec<f64>>, variant: ScanVariant) -> Self {
        Self::new(sizes, vec![masses], variant)
    }
}

/// Runs the configured analysis on scans.
#[derive(Debug, Clone)]
pub struct ScanAnalyzer<P = ThresholdScalingPolicy> {
    config: AnalysisConfig,
    descriptor: MultifractalDescriptor<P>,
}

impl ScanAnalyzer<ThresholdScalingPolicy> {
    /// Analyzer with the stock scaling policy.
    ///
    /// # Errors
    /// `InvalidParameter` when the descriptor configuration is invalid.
    pub fn new(config: AnalysisConfig) -> FractalResult<Self> {
        let descriptor = MultifractalDescriptor::new(config.descriptor.clone())?;
        Ok(Self { config, descriptor })
    }
}

impl<P: ScalingPolicy> ScanAnalyzer<P> {
    /// Analyzer whose multifractal verdicts come from `policy`.
    pub fn with_policy(config: AnalysisConfig, policy: P) -> FractalResult<Self> {
        let descriptor = MultifractalDescriptor::with_policy(config.descriptor.clone(), policy)?;
        Ok(Self { config, descriptor })
    }

    /// Configuration in use.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyse every placement of `input`.
    ///
    /// # Errors
    /// - `InsufficientData` when the scan has no placement
    /// - `InvalidSize` for a non-positive or non-finite size
    /// - `LengthMismatch` when a placement does not have one mass list per size
    pub fn analyze(&self, input: &ScanInput) -> FractalResult<ScanResults> {
        validate_sizes(&input.sizes)?;
        if input.placements.is_empty() {
            return Err(FractalAnalysisError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        for masses in &input.placements {
            validate_matching_lengths(input.sizes.len(), masses.len(), "scan placement sizes/masses")?;
        }

        log::debug!(
            "analyzing {} scan: {} sizes, {} placements, depth {:?}",
            input.variant,
            input.sizes.len(),
            input.placements.len(),
            self.config.depth()
        );

        #[cfg(feature = "parallel")]
        let placements: FractalResult<Vec<PlacementResult>> = input
            .placements
            .par_iter()
            .map(|masses| self.analyze_placement(&input.sizes, masses))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let placements: FractalResult<Vec<PlacementResult>> = input
            .placements
            .iter()
            .map(|masses| self.analyze_placement(&input.sizes, masses))
            .collect();

        let placements = placements?;

        let dimensions: Vec<f64> = placements
            .iter()
            .filter_map(|p| p.dimension.map(|fit| fit.slope))
            .collect();
        let stats = SampleStatistics::compute(&dimensions);
        if stats.is_none() {
            log::warn!("no placement produced a box-counting dimension");
        }

        let lacunarity = if self.config.enable_lacunarity {
            Some(GridLacunarity::from_placements(&input.sizes, &input.placements)?)
        } else {
            None
        };

        Ok(ScanResults {
            variant: input.variant,
            placements,
            mean_dimension: stats.map(|s| s.mean),
            dimension_std_dev: stats.map(|s| s.std_dev),
            lacunarity,
        })
    }

    fn analyze_placement(&self, sizes: &[f64], masses: &[Vec<f64>]) -> FractalResult<PlacementResult> {
        let box_count = BoxCountResult::from_masses(sizes, masses)?;
        let dimension = box_count.fractal_dimension();

        let (spectrum, multifractal) = if self.config.enable_multifractal {
            let (spectrum, description) = self.descriptor.describe_masses(sizes, masses)?;
            (Some(spectrum), Some(description))
        } else {
            (None, None)
        };

        Ok(PlacementResult {
            box_count,
            dimension,
            spectrum,
            multifractal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multifractal::MultifractalDescription;
    use crate::results::ScalingVerdict;
    use assert_approx_eq::assert_approx_eq;

    fn square(offset_mass: f64) -> (Vec<f64>, Vec<Vec<f64>>) {
        let sizes = vec![2.0, 4.0, 8.0, 16.0];
        let masses = sizes
            .iter()
            .map(|&s: &f64| vec![s * s + offset_mass; (64.0 / s).powi(2) as usize])
            .collect();
        (sizes, masses)
    }

    #[test]
    fn test_light_analysis_skips_optional_parts() {
        let (sizes, masses) = square(0.0);
        let input = ScanInput::single(sizes, masses, ScanVariant::OneGrid);
        let results = ScanAnalyzer::new(AnalysisConfig::light())
            .unwrap()
            .analyze(&input)
            .unwrap();

        assert_eq!(results.placements.len(), 1);
        assert_approx_eq!(results.mean_dimension.unwrap(), 2.0, 1e-9);
        assert_eq!(results.dimension_std_dev, Some(0.0));
        assert!(results.lacunarity.is_none());
        assert!(results.placements[0].spectrum.is_none());
        assert_eq!(results.multifractal_descriptions().count(), 0);
    }

    #[test]
    fn test_deep_analysis_describes_every_placement() {
        let (sizes, first) = square(0.0);
        let (_, second) = square(1.0);
        let input = ScanInput::new(sizes, vec![first, second], ScanVariant::GrayAllGrid);
        let results = ScanAnalyzer::new(AnalysisConfig::deep())
            .unwrap()
            .analyze(&input)
            .unwrap();

        assert_eq!(results.variant, ScanVariant::GrayAllGrid);
        assert_eq!(results.dimensions().len(), 2);
        let descriptions: Vec<_> = results.multifractal_descriptions().collect();
        assert_eq!(descriptions.len(), 2);
        for d in descriptions {
            assert_eq!(d.scaling, ScalingVerdict::ProbablyMonofractal);
        }

        let lacunarity = results.lacunarity.unwrap();
        assert_eq!(lacunarity.placements.len(), 2);
        assert_approx_eq!(lacunarity.mean.unwrap(), 1.0, 1e-12);
    }

    #[test]
    fn test_custom_policy() {
        let (sizes, masses) = square(0.0);
        let input = ScanInput::single(sizes, masses, ScanVariant::OneGrid);
        let always = |_: &MultifractalDescription| true;
        let results = ScanAnalyzer::with_policy(AnalysisConfig::deep(), always)
            .unwrap()
            .analyze(&input)
            .unwrap();
        let d = results.multifractal_descriptions().next().unwrap();
        assert_eq!(d.scaling, ScalingVerdict::ProbablyMultifractal);
    }

    #[test]
    fn test_contract_errors() {
        let analyzer = ScanAnalyzer::new(AnalysisConfig::default()).unwrap();

        let empty = ScanInput::new(vec![2.0, 4.0], Vec::new(), ScanVariant::AllGrid);
        assert!(matches!(
            analyzer.analyze(&empty),
            Err(FractalAnalysisError::InsufficientData { .. })
        ));

        let short = ScanInput::single(vec![2.0, 4.0], vec![vec![1.0]], ScanVariant::AllGrid);
        assert!(matches!(
            analyzer.analyze(&short),
            Err(FractalAnalysisError::LengthMismatch { .. })
        ));

        let bad_size = ScanInput::single(vec![0.0, 4.0], vec![vec![1.0], vec![1.0]], ScanVariant::AllGrid);
        assert!(matches!(
            analyzer.analyze(&bad_size),
            Err(FractalAnalysisError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_placement_without_dimension_is_not_an_error() {
        let input = ScanInput::single(vec![2.0], vec![vec![1.0, 1.0]], ScanVariant::OneGrid);
        let results = ScanAnalyzer::new(AnalysisConfig::default())
            .unwrap()
            .analyze(&input)
            .unwrap();
        assert!(results.placements[0].dimension.is_none());
        assert!(results.mean_dimension.is_none());
    }
}
