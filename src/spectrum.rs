//! Generalized dimensions and the singularity spectrum from box masses.
//!
//! For every size ε the per-box masses are normalised to probabilities
//! `p_i = m_i / Σ m`. For each moment exponent q:
//!
//! - D(q) is the slope of `ln Σ p^q` against `ln ε`, divided by `q - 1`
//!   (for q = 1 the slope of `Σ p ln p`);
//! - with `μ_i = p_i^q / Σ p^q`, α(q) is the slope of `Σ μ ln p` and f(q) the
//!   slope of `Σ μ ln μ` against `ln ε` (Chhabra–Jensen direct method);
//! - τ(q) = (q - 1)·D(q).
//!
//! Powers are taken in log space with a log-sum-exp so large negative
//! exponents do not overflow. Sizes without positive mass are left out of the
//! regressions; an exponent whose fit cannot be computed keeps its slot with
//! `None` values so the family stays indexed by q.

use crate::box_count::BoxCountResult;
use crate::errors::{validate_matching_lengths, validate_sizes, FractalResult};
use crate::math_utils::{constants, float_ops};
use crate::regression::linear_fit;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Spectrum values at one moment exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpectrumPoint {
    /// Moment exponent
    pub q: f64,
    /// Generalized dimension D(q)
    pub dimension: Option<f64>,
    /// R² of the fit behind D(q)
    pub dimension_r_squared: Option<f64>,
    /// Mass exponent τ(q)
    pub tau: Option<f64>,
    /// Singularity strength α(q)
    pub alpha: Option<f64>,
    /// Spectrum value f(α(q))
    pub f_alpha: Option<f64>,
}

/// Generalized-dimension family of one grid placement, ordered by q.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MultifractalSpectrum {
    points: Vec<SpectrumPoint>,
}

/// Log-probabilities of the boxes at one size.
struct SizeDistribution {
    ln_size: f64,
    ln_p: Vec<f64>,
}

impl SizeDistribution {
    fn new(size: f64, masses: &[f64]) -> Option<Self> {
        let positive: Vec<f64> = masses
            .iter()
            .copied()
            .filter(|m| m.is_finite() && *m > 0.0)
            .collect();
        let total: f64 = positive.iter().sum();
        let ln_total = float_ops::safe_ln(total)?;
        Some(Self {
            ln_size: size.ln(),
            ln_p: positive.iter().map(|m| m.ln() - ln_total).collect(),
        })
    }

    /// `(ln Σ p^q, Σ p ln p, Σ μ ln p, Σ μ ln μ)` for one exponent.
    fn moments(&self, q: f64) -> (f64, f64, f64, f64) {
        let scaled: Vec<f64> = self.ln_p.iter().map(|lp| q * lp).collect();
        let peak = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let ln_sum = peak + scaled.iter().map(|s| (s - peak).exp()).sum::<f64>().ln();

        let mut alpha_sum = 0.0;
        let mut f_sum = 0.0;
        for (lp, s) in self.ln_p.iter().zip(&scaled) {
            let ln_mu = s - ln_sum;
            let mu = ln_mu.exp();
            alpha_sum += mu * lp;
            f_sum += mu * ln_mu;
        }

        let entropy = self.ln_p.iter().map(|lp| lp.exp() * lp).sum();
        (ln_sum, entropy, alpha_sum, f_sum)
    }
}

impl MultifractalSpectrum {
    /// Compute the spectrum of one placement at the given exponents.
    ///
    /// # Errors
    /// `LengthMismatch` or `InvalidSize` for broken size/mass inputs.
    pub fn from_masses(sizes: &[f64], masses: &[Vec<f64>], exponents: &[f64]) -> FractalResult<Self> {
        validate_matching_lengths(sizes.len(), masses.len(), "spectrum sizes/masses")?;
        validate_sizes(sizes)?;

        let distributions: Vec<SizeDistribution> = sizes
            .iter()
            .zip(masses)
            .filter_map(|(&size, m)| SizeDistribution::new(size, m))
            .collect();

        if distributions.len() < sizes.len() {
            log::debug!(
                "spectrum: {} of {} sizes had no positive mass",
                sizes.len() - distributions.len(),
                sizes.len()
            );
        }

        #[cfg(feature = "parallel")]
        let points: FractalResult<Vec<SpectrumPoint>> = exponents
            .par_iter()
            .map(|&q| spectrum_point(&distributions, q))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let points: FractalResult<Vec<SpectrumPoint>> = exponents
            .iter()
            .map(|&q| spectrum_point(&distributions, q))
            .collect();

        let spectrum = Self { points: points? };
        if spectrum.dimensions().iter().filter(|d| d.is_some()).count() < 3 {
            log::warn!(
                "spectrum: fewer than three exponents produced a generalized dimension ({} sizes usable)",
                distributions.len()
            );
        }
        Ok(spectrum)
    }

    /// Compute the spectrum of a box count that retained its masses.
    pub fn from_box_count(result: &BoxCountResult, exponents: &[f64]) -> Option<FractalResult<Self>> {
        result
            .masses()
            .map(|masses| Self::from_masses(result.sizes(), masses, exponents))
    }

    /// Build from already computed points (sorted by q on construction).
    pub fn from_points(mut points: Vec<SpectrumPoint>) -> Self {
        points.sort_by(|a, b| crate::math_utils::float_total_cmp(&a.q, &b.q));
        Self { points }
    }

    /// All points, ordered by q.
    pub fn points(&self) -> &[SpectrumPoint] {
        &self.points
    }

    /// Moment exponents.
    pub fn exponents(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.q).collect()
    }

    /// D(q) per exponent.
    pub fn dimensions(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.dimension).collect()
    }

    /// α(q) per exponent.
    pub fn alphas(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.alpha).collect()
    }

    /// f(α(q)) per exponent.
    pub fn f_alphas(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.f_alpha).collect()
    }

    /// The point at exponent `q`, if it was evaluated.
    pub fn point_at(&self, q: f64) -> Option<&SpectrumPoint> {
        self.points
            .iter()
            .find(|p| float_ops::approx_eq_eps(p.q, q, constants::EXPONENT_MATCH_EPSILON))
    }

    /// D(q) at a specific exponent.
    pub fn dimension_at(&self, q: f64) -> Option<f64> {
        self.point_at(q).and_then(|p| p.dimension)
    }

    /// f(α) at a specific exponent.
    pub fn f_alpha_at(&self, q: f64) -> Option<f64> {
        self.point_at(q).and_then(|p| p.f_alpha)
    }
}

fn spectrum_point(distributions: &[SizeDistribution], q: f64) -> FractalResult<SpectrumPoint> {
    let n = distributions.len();
    let mut ln_sizes = Vec::with_capacity(n);
    let mut ln_sums = Vec::with_capacity(n);
    let mut entropies = Vec::with_capacity(n);
    let mut alpha_sums = Vec::with_capacity(n);
    let mut f_sums = Vec::with_capacity(n);

    for d in distributions {
        let (ln_sum, entropy, alpha_sum, f_sum) = d.moments(q);
        ln_sizes.push(d.ln_size);
        ln_sums.push(ln_sum);
        entropies.push(entropy);
        alpha_sums.push(alpha_sum);
        f_sums.push(f_sum);
    }

    let is_information = float_ops::approx_eq_eps(q, 1.0, constants::EXPONENT_MATCH_EPSILON);
    let dimension_fit = if is_information {
        linear_fit(&ln_sizes, &entropies)?
    } else {
        linear_fit(&ln_sizes, &ln_sums)?
    };

    let dimension = dimension_fit.map(|fit| {
        if is_information {
            fit.slope
        } else {
            fit.slope / (q - 1.0)
        }
    });

    Ok(SpectrumPoint {
        q,
        dimension,
        dimension_r_squared: dimension_fit.map(|fit| fit.r_squared),
        tau: dimension.map(|d| (q - 1.0) * d),
        alpha: linear_fit(&ln_sizes, &alpha_sums)?.map(|fit| fit.slope),
        f_alpha: linear_fit(&ln_sizes, &f_sums)?.map(|fit| fit.slope),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    /// Uniform masses on a filled square: N = (64/ε)² boxes of equal mass.
    fn uniform_square() -> (Vec<f64>, Vec<Vec<f64>>) {
        let sizes = vec![2.0, 4.0, 8.0, 16.0];
        let masses = sizes
            .iter()
            .map(|&s| {
                let boxes = (64.0_f64 / s).powi(2) as usize;
                vec![s * s; boxes]
            })
            .collect();
        (sizes, masses)
    }

    /// Binomial cascade on a line: at level k each box splits its mass
    /// 0.7 / 0.3 between two halves.
    fn binomial_cascade(levels: usize) -> (Vec<f64>, Vec<Vec<f64>>) {
        let mut sizes = Vec::new();
        let mut masses = Vec::new();
        let mut current = vec![1.0];
        for k in 0..=levels {
            if k > 0 {
                current = current.iter().flat_map(|m| [m * 0.7, m * 0.3]).collect();
            }
            sizes.push(2f64.powi(-(k as i32)));
            masses.push(current.clone());
        }
        (sizes, masses)
    }

    #[test]
    fn test_uniform_mass_is_monofractal() {
        let (sizes, masses) = uniform_square();
        let qs = [-2.0, -1.0, 0.0, 1.0, 2.0, 3.0];
        let spectrum = MultifractalSpectrum::from_masses(&sizes, &masses, &qs).unwrap();
        for p in spectrum.points() {
            assert_approx_eq!(p.dimension.unwrap(), 2.0, 1e-9);
            assert_approx_eq!(p.alpha.unwrap(), 2.0, 1e-9);
            assert_approx_eq!(p.f_alpha.unwrap(), 2.0, 1e-9);
            assert_approx_eq!(p.tau.unwrap(), (p.q - 1.0) * 2.0, 1e-9);
        }
    }

    #[test]
    fn test_binomial_cascade_is_multifractal() {
        let (sizes, masses) = binomial_cascade(8);
        let qs = [-2.0, 0.0, 1.0, 2.0, 4.0];
        let spectrum = MultifractalSpectrum::from_masses(&sizes, &masses, &qs).unwrap();

        // D(0) is the support dimension of the line
        assert_approx_eq!(spectrum.dimension_at(0.0).unwrap(), 1.0, 1e-9);
        // D(2) = -log2(0.7² + 0.3²)
        let d2 = -(0.7f64.powi(2) + 0.3f64.powi(2)).log2();
        assert_approx_eq!(spectrum.dimension_at(2.0).unwrap(), d2, 1e-9);

        let dims: Vec<f64> = spectrum.dimensions().into_iter().map(|d| d.unwrap()).collect();
        assert!(dims.windows(2).all(|w| w[1] < w[0]));

        // at q = 1, α = f = D(1)
        let p1 = spectrum.point_at(1.0).unwrap();
        assert_approx_eq!(p1.alpha.unwrap(), p1.f_alpha.unwrap(), 1e-9);
        assert_approx_eq!(p1.alpha.unwrap(), p1.dimension.unwrap(), 1e-9);
        // f at q = 0 equals D(0)
        assert_approx_eq!(spectrum.f_alpha_at(0.0).unwrap(), 1.0, 1e-9);
    }

    #[test]
    fn test_tiny_masses_give_the_same_dimensions() {
        let (sizes, masses) = uniform_square();
        let tiny: Vec<Vec<f64>> = masses
            .iter()
            .map(|row| row.iter().map(|m| m * 1e-305).collect())
            .collect();
        let qs = [-1.0, 0.0, 2.0];
        let spectrum = MultifractalSpectrum::from_masses(&sizes, &tiny, &qs).unwrap();
        for p in spectrum.points() {
            assert_approx_eq!(p.dimension.unwrap(), 2.0, 1e-9);
        }
    }

    #[test]
    fn test_large_negative_exponent_stays_finite() {
        let (sizes, masses) = binomial_cascade(10);
        let spectrum = MultifractalSpectrum::from_masses(&sizes, &masses, &[-10.0]).unwrap();
        let p = spectrum.points()[0];
        assert!(p.dimension.unwrap().is_finite());
        assert!(p.alpha.unwrap().is_finite());
    }

    #[test]
    fn test_insufficient_sizes_keep_exponent_slots() {
        let sizes = [2.0, 4.0];
        let masses = vec![vec![1.0, 1.0], vec![0.0, f64::NAN]];
        let spectrum = MultifractalSpectrum::from_masses(&sizes, &masses, &[0.0, 1.0]).unwrap();
        assert_eq!(spectrum.exponents(), vec![0.0, 1.0]);
        assert!(spectrum.dimensions().iter().all(|d| d.is_none()));
        assert!(spectrum.alphas().iter().all(|a| a.is_none()));
    }

    #[test]
    fn test_contract_errors() {
        assert!(MultifractalSpectrum::from_masses(&[2.0], &[], &[0.0]).is_err());
        assert!(MultifractalSpectrum::from_masses(&[-2.0], &[vec![1.0]], &[0.0]).is_err());
    }

    #[test]
    fn test_from_box_count_and_points() {
        let counted = BoxCountResult::from_counts(&[2.0, 4.0], &[4.0, 1.0]).unwrap();
        assert!(MultifractalSpectrum::from_box_count(&counted, &[0.0]).is_none());

        let point = |q: f64, d: f64| SpectrumPoint {
            q,
            dimension: Some(d),
            dimension_r_squared: None,
            tau: None,
            alpha: None,
            f_alpha: None,
        };
        let spectrum = MultifractalSpectrum::from_points(vec![point(1.0, 1.5), point(-1.0, 1.8)]);
        assert_eq!(spectrum.exponents(), vec![-1.0, 1.0]);
        assert_eq!(spectrum.dimension_at(1.0), Some(1.5));
        assert_eq!(spectrum.dimension_at(0.5), None);
    }
}
