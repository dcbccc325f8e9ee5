//! # Box-Count Fractal Analysis
//!
//! Quantitative fractal-geometry analysis of box-counting scans.
//!
//! A scan measures, for a sequence of box sizes, the mass inside every box
//! of a sampling grid laid over an image, possibly for several placements of
//! that grid. This crate turns those measurements into a fractal dimension
//! with fit quality, a lacunarity summary and, for multifractal scans, a
//! description of the generalized-dimension spectrum with a
//! probably-monofractal / probably-multifractal verdict.
//!
//! ## Key Features
//!
//! - **Sanitization**: every computation ignores NaN and infinite entries
//! - **Log-log regression**: slope, intercept, R², standard error and confidence intervals
//! - **Lacunarity**: CV² + 1 per size, summarised across sizes and grid placements
//! - **Multifractal spectrum**: D(q), τ(q), α(q) and f(α) from box masses
//! - **Curve classification**: humped / monotone detection of exponent-indexed curves
//! - **Pluggable verdicts**: the mono/multi decision is a [`ScalingPolicy`]
//!
//! Quantities that cannot be computed are `None`, never an error. Errors are
//! reserved for broken inputs such as mismatched lengths or non-positive sizes.
//!
//! ## Quick Start
//!
//! ```rust
//! use fractal_scan::{AnalysisConfig, ScanAnalyzer, ScanInput, ScanVariant};
//! use fractal_scan::report::{render_description, to_tab_rows};
//! use fractal_scan::labels::NoHeadings;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // a binomial cascade on a line: every split keeps 70% of the mass left
//!     let mut sizes = Vec::new();
//!     let mut masses = Vec::new();
//!     let mut level = vec![1.0f64];
//!     for k in 0..8 {
//!         sizes.push(0.5f64.powi(k));
//!         masses.push(level.clone());
//!         level = level.iter().flat_map(|m| [m * 0.7, m * 0.3]).collect();
//!     }
//!
//!     let input = ScanInput::single(sizes, masses, ScanVariant::GrayOneGrid);
//!     let results = ScanAnalyzer::new(AnalysisConfig::deep())?.analyze(&input)?;
//!
//!     for description in results.multifractal_descriptions() {
//!         let rows = render_description(description, &NoHeadings, input.variant);
//!         let [headings, values] = to_tab_rows(&rows);
//!         println!("{headings}\n{values}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The leaf modules ([`sanitize`], [`statistics`], [`regression`],
//! [`box_count`], [`lacunarity`], [`curve_shape`], [`spectrum`]) can be used
//! on their own. [`multifractal`] combines them into a description and
//! [`ScanAnalyzer`] runs everything over a whole scan.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod math_utils;
pub mod results;
pub mod sanitize;
pub mod statistics;

// Analysis methods
pub mod analyzer;
pub mod box_count;
pub mod curve_shape;
pub mod lacunarity;
pub mod multifractal;
pub mod regression;
pub mod spectrum;

// Output helpers
pub mod labels;
pub mod report;

// Re-exports for convenience - main public API
pub use analyzer::{ScanAnalyzer, ScanInput};
pub use config::{AnalysisConfig, AnalysisDepth, DescriptorConfig};
pub use errors::{FractalAnalysisError, FractalResult};
pub use results::{DimensionalOrdering, PlacementResult, ScalingVerdict, ScanResults};

pub use box_count::{BoxCountResult, SizeCountSample};
pub use curve_shape::{classify_curve, CurveClassification, CurveShape};
pub use lacunarity::{lacunarity, GridLacunarity, LacunaritySummary, SizeLacunarity};
pub use regression::{linear_fit, log_log_fit, log_log_fit_points, log_log_slope, RegressionFit};
pub use sanitize::sanitize;
pub use statistics::SampleStatistics;

// Multifractal exports
pub use multifractal::{
    MultifractalDescription, MultifractalDescriptor, ScalingPolicy, ThresholdScalingPolicy,
};
pub use spectrum::{MultifractalSpectrum, SpectrumPoint};

pub use labels::{HeadingLookup, NoHeadings, ScanVariant};
