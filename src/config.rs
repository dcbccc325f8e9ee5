//! # Analysis Configuration
//!
//! Configuration structures controlling which parts of a scan analysis run
//! and the thresholds the multifractal descriptor applies.

use crate::errors::{validate_parameter, FractalAnalysisError, FractalResult};
use crate::math_utils::{constants::MAX_EXPONENT_COUNT, exponent_range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for controlling which analysis components to run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalysisConfig {
    /// Compute lacunarity from per-box masses
    pub enable_lacunarity: bool,
    /// Compute the generalized-dimension spectrum and its description
    pub enable_multifractal: bool,
    /// Thresholds for the multifractal descriptor
    pub descriptor: DescriptorConfig,
}

/// Analysis depth presets for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnalysisDepth {
    /// Light: box-counting dimension only
    Light,
    /// Standard: dimension and lacunarity (default)
    Standard,
    /// Deep: dimension, lacunarity and multifractal description
    Deep,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl AnalysisConfig {
    /// Light configuration: dimension only
    pub fn light() -> Self {
        Self {
            enable_lacunarity: false,
            enable_multifractal: false,
            descriptor: DescriptorConfig::default(),
        }
    }

    /// Standard configuration: dimension and lacunarity
    pub fn standard() -> Self {
        Self {
            enable_lacunarity: true,
            enable_multifractal: false,
            descriptor: DescriptorConfig::default(),
        }
    }

    /// Deep configuration: full analysis
    pub fn deep() -> Self {
        Self {
            enable_lacunarity: true,
            enable_multifractal: true,
            descriptor: DescriptorConfig::default(),
        }
    }

    /// Depth implied by the enabled components.
    pub fn depth(&self) -> AnalysisDepth {
        if self.enable_multifractal {
            AnalysisDepth::Deep
        } else if self.enable_lacunarity {
            AnalysisDepth::Standard
        } else {
            AnalysisDepth::Light
        }
    }
}

/// Exponent range and thresholds for the multifractal descriptor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DescriptorConfig {
    /// Inclusive range of moment exponents q
    pub q_range: (f64, f64),
    /// Spacing between consecutive exponents
    pub q_step: f64,
    /// Narrow amplitude window, inclusive
    pub narrow_window: (f64, f64),
    /// Wide amplitude window, inclusive
    pub wide_window: (f64, f64),
    /// Rise that still counts as "not increasing"
    pub monotonic_tolerance: f64,
    /// Flip error above which the D(q) curve counts as flipped
    pub flip_threshold: f64,
    /// Minimum narrow-window amplitude for a multifractal verdict
    pub amplitude_threshold: f64,
    /// Largest α(q) rise count still compatible with a multifractal verdict
    pub max_anomalies: usize,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            q_range: (-10.0, 10.0),
            q_step: 0.25,
            narrow_window: (0.0, 2.0),
            wide_window: (-1.0, 2.0),
            monotonic_tolerance: 0.01,
            flip_threshold: 0.2,
            amplitude_threshold: 0.05,
            max_anomalies: 2,
        }
    }
}

impl DescriptorConfig {
    /// Check the configuration for values the descriptor cannot work with.
    pub fn validate(&self) -> FractalResult<()> {
        validate_parameter(self.q_range.0, f64::MIN, f64::MAX, "q_range.start")?;
        validate_parameter(self.q_range.1, f64::MIN, f64::MAX, "q_range.end")?;
        if self.q_range.0 > self.q_range.1 {
            return Err(FractalAnalysisError::InvalidParameter {
                parameter: "q_range".to_string(),
                value: self.q_range.0,
                constraint: format!("start <= end ({})", self.q_range.1),
            });
        }
        if !(self.q_step > 0.0 && self.q_step.is_finite()) {
            return Err(FractalAnalysisError::InvalidParameter {
                parameter: "q_step".to_string(),
                value: self.q_step,
                constraint: "finite and > 0".to_string(),
            });
        }
        let steps = (self.q_range.1 - self.q_range.0) / self.q_step;
        if !(steps < MAX_EXPONENT_COUNT as f64) {
            return Err(FractalAnalysisError::InvalidParameter {
                parameter: "q_step".to_string(),
                value: self.q_step,
                constraint: format!("at most {MAX_EXPONENT_COUNT} exponents over q_range"),
            });
        }
        for (name, window) in [("narrow_window", self.narrow_window), ("wide_window", self.wide_window)] {
            validate_parameter(window.0, f64::MIN, f64::MAX, name)?;
            validate_parameter(window.1, f64::MIN, f64::MAX, name)?;
            if window.0 > window.1 {
                return Err(FractalAnalysisError::InvalidParameter {
                    parameter: name.to_string(),
                    value: window.0,
                    constraint: format!("start <= end ({})", window.1),
                });
            }
        }
        validate_parameter(self.monotonic_tolerance, 0.0, f64::MAX, "monotonic_tolerance")?;
        validate_parameter(self.flip_threshold, 0.0, 1.0, "flip_threshold")?;
        validate_parameter(self.amplitude_threshold, 0.0, f64::MAX, "amplitude_threshold")?;
        Ok(())
    }

    /// The exponents q the spectrum is evaluated at.
    pub fn exponents(&self) -> Vec<f64> {
        exponent_range(self.q_range.0, self.q_range.1, self.q_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(!AnalysisConfig::light().enable_lacunarity);
        assert_eq!(AnalysisConfig::default(), AnalysisConfig::standard());
        let deep = AnalysisConfig::deep();
        assert!(deep.enable_multifractal && deep.enable_lacunarity);
        assert_eq!(deep.depth(), AnalysisDepth::Deep);
        assert_eq!(AnalysisConfig::light().depth(), AnalysisDepth::Light);
        assert_eq!(AnalysisConfig::standard().depth(), AnalysisDepth::Standard);
    }

    #[test]
    fn test_depth_follows_enabled_components() {
        let multifractal_only = AnalysisConfig {
            enable_lacunarity: false,
            enable_multifractal: true,
            ..AnalysisConfig::light()
        };
        assert_eq!(multifractal_only.depth(), AnalysisDepth::Deep);

        let mut config = AnalysisConfig::deep();
        config.enable_multifractal = false;
        config.enable_lacunarity = false;
        assert_eq!(config.depth(), AnalysisDepth::Light);
    }

    #[test]
    fn test_tiny_q_step_is_rejected() {
        let dense = DescriptorConfig {
            q_step: 1e-300,
            ..Default::default()
        };
        assert!(matches!(
            dense.validate(),
            Err(FractalAnalysisError::InvalidParameter { ref parameter, .. }) if parameter == "q_step"
        ));
        assert!(dense.exponents().is_empty());

        let fine = DescriptorConfig {
            q_step: 0.01,
            ..Default::default()
        };
        assert!(fine.validate().is_ok());
        assert_eq!(fine.exponents().len(), 2001);
    }

    #[test]
    fn test_non_finite_bounds_are_invalid_parameters() {
        let nan_start = DescriptorConfig {
            q_range: (f64::NAN, 10.0),
            ..Default::default()
        };
        let infinite_end = DescriptorConfig {
            q_range: (-10.0, f64::INFINITY),
            ..Default::default()
        };
        let infinite_window = DescriptorConfig {
            narrow_window: (0.0, f64::INFINITY),
            ..Default::default()
        };
        let nan_window = DescriptorConfig {
            wide_window: (f64::NAN, 2.0),
            ..Default::default()
        };
        for config in [nan_start, infinite_end, infinite_window, nan_window] {
            assert!(matches!(
                config.validate(),
                Err(FractalAnalysisError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_default_descriptor_config_is_valid() {
        let config = DescriptorConfig::default();
        assert!(config.validate().is_ok());
        let qs = config.exponents();
        assert_eq!(qs.len(), 81);
        assert_eq!(qs[0], -10.0);
        assert_eq!(qs[80], 10.0);
        assert!(qs.contains(&0.0) && qs.contains(&1.0) && qs.contains(&2.0));
    }

    #[test]
    fn test_invalid_descriptor_configs() {
        let bad_step = DescriptorConfig {
            q_step: 0.0,
            ..Default::default()
        };
        assert!(bad_step.validate().is_err());

        let inverted = DescriptorConfig {
            q_range: (3.0, -3.0),
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let bad_flip = DescriptorConfig {
            flip_threshold: 1.5,
            ..Default::default()
        };
        assert!(bad_flip.validate().is_err());

        let bad_tol = DescriptorConfig {
            monotonic_tolerance: -0.1,
            ..Default::default()
        };
        assert!(bad_tol.validate().is_err());

        let bad_window = DescriptorConfig {
            wide_window: (2.0, -1.0),
            ..Default::default()
        };
        assert!(bad_window.validate().is_err());
    }
}
