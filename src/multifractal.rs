//! Mono/multifractal description of a generalized-dimension family.
//!
//! [`MultifractalDescriptor`] reads a [`MultifractalSpectrum`] and condenses it
//! into a [`MultifractalDescription`]: D(q) amplitudes over two exponent
//! windows, spectrum sums, curve-shape and monotonicity verdicts, the
//! D(0) ≥ D(1) ≥ D(2) ordering check and a handful of deviation measures.
//!
//! The final mono/multi call is not made here. It is delegated to a
//! [`ScalingPolicy`], which sees the fully assembled description;
//! [`ThresholdScalingPolicy`] is the stock policy built from
//! [`DescriptorConfig`].

use crate::config::DescriptorConfig;
use crate::curve_shape::{classify_curve, count_rises, never_increases_within, CurveClassification};
use crate::errors::FractalResult;
use crate::math_utils::{constants, float_ops};
use crate::results::{DimensionalOrdering, ScalingVerdict};
use crate::sanitize::sanitize;
use crate::spectrum::{MultifractalSpectrum, SpectrumPoint};
use crate::statistics::SampleStatistics;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// |α(q) − f(q)| at or below this counts as the curves touching.
const CROSSING_EPSILON: f64 = 1e-9;

/// Condensed description of one scan's multifractal spectrum.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MultifractalDescription {
    /// Suggested scaling, decided by the policy
    pub scaling: ScalingVerdict,
    /// max − min of D(q) over the narrow window, [0, 2] by default
    pub dimension_amplitude_narrow: Option<f64>,
    /// max − min of D(q) over the wide window, [−1, 2] by default
    pub dimension_amplitude_wide: Option<f64>,
    /// Σ f(α(q)) over q > 0
    pub summed_f_positive_q: Option<f64>,
    /// f(α(q)) at q = 0, the peak of the spectrum
    pub f_at_q0: Option<f64>,
    /// Shape of the D(q) curve
    pub dimension_curve: CurveClassification,
    /// D(q) never rises beyond tolerance
    pub dimension_never_increases: bool,
    /// α(q) never rises beyond tolerance
    pub alpha_never_increases: bool,
    /// D(0) ≥ D(1) ≥ D(2) check
    pub ordering: DimensionalOrdering,
    /// Fraction of adjacent D(q) steps that rise beyond tolerance
    pub flip_error: Option<f64>,
    /// `flip_error` exceeds the configured threshold
    pub flipped: bool,
    /// Mean |α(q) − D(q)| over exponents where both exist
    pub divergence: Option<f64>,
    /// Number of adjacent α(q) steps that rise beyond tolerance
    pub anomaly_count: usize,
    /// Exponent where α(q) meets or crosses f(α(q))
    pub cross_over: Option<f64>,
}

/// Decides the mono/multi verdict from an assembled description.
///
/// Any `Fn(&MultifractalDescription) -> bool` closure is a policy; `true`
/// means "probably multifractal".
pub trait ScalingPolicy: Send + Sync {
    /// True if the description suggests multifractal scaling.
    fn is_multifractal(&self, description: &MultifractalDescription) -> bool;
}

impl<F> ScalingPolicy for F
where
    F: Fn(&MultifractalDescription) -> bool + Send + Sync,
{
    fn is_multifractal(&self, description: &MultifractalDescription) -> bool {
        self(description)
    }
}

/// Stock policy: D(q) falls by a real amount over the narrow window, falls
/// consistently, is not humped, and α(q) has few anomalous rises.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThresholdScalingPolicy {
    /// Minimum narrow-window amplitude
    pub amplitude_threshold: f64,
    /// Largest tolerated α(q) rise count
    pub max_anomalies: usize,
}

impl ThresholdScalingPolicy {
    /// Policy using the thresholds in `config`.
    pub fn from_config(config: &DescriptorConfig) -> Self {
        Self {
            amplitude_threshold: config.amplitude_threshold,
            max_anomalies: config.max_anomalies,
        }
    }
}

impl Default for ThresholdScalingPolicy {
    fn default() -> Self {
        Self::from_config(&DescriptorConfig::default())
    }
}

impl ScalingPolicy for ThresholdScalingPolicy {
    fn is_multifractal(&self, d: &MultifractalDescription) -> bool {
        let wide_enough = d
            .dimension_amplitude_narrow
            .is_some_and(|a| a > self.amplitude_threshold);

        wide_enough
            && d.dimension_never_increases
            && !d.flipped
            && !d.dimension_curve.is_humped()
            && d.ordering != DimensionalOrdering::Unexpected
            && d.anomaly_count <= self.max_anomalies
    }
}

/// Builds [`MultifractalDescription`]s with a fixed configuration and policy.
#[derive(Debug, Clone)]
pub struct MultifractalDescriptor<P = ThresholdScalingPolicy> {
    config: DescriptorConfig,
    policy: P,
}

impl MultifractalDescriptor<ThresholdScalingPolicy> {
    /// Descriptor with the stock threshold policy.
    pub fn new(config: DescriptorConfig) -> FractalResult<Self> {
        let policy = ThresholdScalingPolicy::from_config(&config);
        Self::with_policy(config, policy)
    }
}

impl<P: ScalingPolicy> MultifractalDescriptor<P> {
    /// Descriptor delegating the verdict to `policy`.
    ///
    /// # Errors
    /// `InvalidParameter` when `config` fails validation.
    pub fn with_policy(config: DescriptorConfig, policy: P) -> FractalResult<Self> {
        config.validate()?;
        Ok(Self { config, policy })
    }

    /// Configuration in use.
    pub fn config(&self) -> &DescriptorConfig {
        &self.config
    }

    /// Compute the spectrum of one placement at the configured exponents.
    pub fn spectrum(&self, sizes: &[f64], masses: &[Vec<f64>]) -> FractalResult<MultifractalSpectrum> {
        MultifractalSpectrum::from_masses(sizes, masses, &self.config.exponents())
    }

    /// Spectrum and description of one placement.
    pub fn describe_masses(
        &self,
        sizes: &[f64],
        masses: &[Vec<f64>],
    ) -> FractalResult<(MultifractalSpectrum, MultifractalDescription)> {
        let spectrum = self.spectrum(sizes, masses)?;
        let description = self.describe(&spectrum);
        Ok((spectrum, description))
    }

    /// Describe an already computed spectrum.
    pub fn describe(&self, spectrum: &MultifractalSpectrum) -> MultifractalDescription {
        let tolerance = self.config.monotonic_tolerance;
        let points = spectrum.points();
        let dims = as_raw(&spectrum.dimensions());
        let alphas = as_raw(&spectrum.alphas());

        let dimension_curve = classify_curve(&dims);
        let flip_error = rise_fraction(&dims, tolerance);

        let mut description = MultifractalDescription {
            scaling: ScalingVerdict::NotDetermined,
            dimension_amplitude_narrow: window_amplitude(points, self.config.narrow_window),
            dimension_amplitude_wide: window_amplitude(points, self.config.wide_window),
            summed_f_positive_q: summed_f_positive(points),
            f_at_q0: spectrum.f_alpha_at(0.0),
            dimension_curve,
            dimension_never_increases: never_increases_within(&dims, tolerance),
            alpha_never_increases: never_increases_within(&alphas, tolerance),
            ordering: ordering(spectrum, tolerance),
            flip_error,
            flipped: flip_error.is_some_and(|f| f > self.config.flip_threshold),
            divergence: divergence(points),
            anomaly_count: count_rises(&alphas, tolerance),
            cross_over: cross_over(points),
        };

        let scaling = if sanitize(&dims).is_empty() {
            log::warn!("no generalized dimension was computed; scaling not determined");
            ScalingVerdict::NotDetermined
        } else if self.policy.is_multifractal(&description) {
            ScalingVerdict::ProbablyMultifractal
        } else {
            ScalingVerdict::ProbablyMonofractal
        };

        description.scaling = scaling;
        description.dimension_curve = description.dimension_curve.with_scaling(scaling);
        description
    }
}

fn as_raw(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}

fn in_window(q: f64, window: (f64, f64)) -> bool {
    q >= window.0 - constants::EXPONENT_MATCH_EPSILON && q <= window.1 + constants::EXPONENT_MATCH_EPSILON
}

fn window_amplitude(points: &[SpectrumPoint], window: (f64, f64)) -> Option<f64> {
    let dims: Vec<f64> = points
        .iter()
        .filter(|p| in_window(p.q, window))
        .filter_map(|p| p.dimension)
        .collect();
    SampleStatistics::compute(&dims).map(|s| s.range())
}

fn summed_f_positive(points: &[SpectrumPoint]) -> Option<f64> {
    let values: Vec<f64> = points
        .iter()
        .filter(|p| p.q > constants::EXPONENT_MATCH_EPSILON)
        .filter_map(|p| p.f_alpha)
        .collect();
    SampleStatistics::compute(&values).map(|s| s.mean * s.count as f64)
}

fn ordering(spectrum: &MultifractalSpectrum, tolerance: f64) -> DimensionalOrdering {
    match (
        spectrum.dimension_at(0.0),
        spectrum.dimension_at(1.0),
        spectrum.dimension_at(2.0),
    ) {
        (Some(d0), Some(d1), Some(d2)) if d0.is_finite() && d1.is_finite() && d2.is_finite() => {
            if d0 + tolerance >= d1 && d1 + tolerance >= d2 {
                DimensionalOrdering::Expected
            } else {
                DimensionalOrdering::Unexpected
            }
        }
        _ => DimensionalOrdering::NotDetermined,
    }
}

fn rise_fraction(values: &[f64], tolerance: f64) -> Option<f64> {
    let steps = sanitize(values).len().checked_sub(1).filter(|&s| s > 0)?;
    Some(count_rises(values, tolerance) as f64 / steps as f64)
}

fn divergence(points: &[SpectrumPoint]) -> Option<f64> {
    let gaps: Vec<f64> = points
        .iter()
        .filter_map(|p| Some((p.alpha? - p.dimension?).abs()))
        .collect();
    SampleStatistics::compute(&gaps).map(|s| s.mean)
}

/// First exponent where α(q) − f(q) is zero, or where it changes sign
/// (linearly interpolated between the bracketing exponents).
fn cross_over(points: &[SpectrumPoint]) -> Option<f64> {
    let gaps: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| {
            let gap = p.alpha? - p.f_alpha?;
            gap.is_finite().then_some((p.q, gap))
        })
        .collect();

    for (i, &(q, gap)) in gaps.iter().enumerate() {
        if gap.abs() <= CROSSING_EPSILON {
            return Some(q);
        }
        if let Some(&(q_next, gap_next)) = gaps.get(i + 1) {
            if gap_next.abs() > CROSSING_EPSILON && gap.signum() != gap_next.signum() {
                let t = float_ops::safe_div(gap, gap - gap_next)?;
                return Some(q + t * (q_next - q));
            }
        }
    }
    None
}
