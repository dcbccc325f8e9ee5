//! Least-squares regression for fractal dimension estimation.
//!
//! A box-counting dimension is the slope of `ln(count)` against `ln(size)`;
//! the multifractal spectrum needs the same fit on quantities that are
//! already logarithmic. Both go through [`linear_fit`], which centres the data
//! before forming the sums so that large `ln` offsets do not cancel out.
//!
//! Unusable pairs are dropped rather than rejected: a non-finite value in
//! either coordinate (and, for [`log_log_fit`], a non-positive one) removes
//! that pair. Fewer than two remaining pairs, or a predictor with no spread,
//! yields `Ok(None)`. Only mismatched array lengths are an error.

use crate::errors::{validate_data_length, validate_matching_lengths, FractalResult};
use crate::math_utils::{constants, float_ops};
use statrs::distribution::{ContinuousCDF, StudentsT};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of an ordinary least-squares line fit `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegressionFit {
    /// Fitted slope
    pub slope: f64,
    /// Fitted intercept
    pub intercept: f64,
    /// Coefficient of determination
    pub r_squared: f64,
    /// Standard error of the slope (0 when only two points were used)
    pub standard_error: f64,
    /// Number of pairs that survived filtering
    pub points_used: usize,
}

impl RegressionFit {
    /// Value of the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Two-sided Student-t confidence interval for the slope.
    ///
    /// `level` is the coverage, e.g. `0.95`. Needs at least three points
    /// (one residual degree of freedom).
    pub fn slope_confidence_interval(&self, level: f64) -> Option<(f64, f64)> {
        if !(level > 0.0 && level < 1.0) || self.points_used < 3 {
            return None;
        }
        let df = (self.points_used - 2) as f64;
        let t = StudentsT::new(0.0, 1.0, df).ok()?;
        let critical = t.inverse_cdf(0.5 + level / 2.0);
        if !critical.is_finite() {
            return None;
        }
        let half_width = critical * self.standard_error;
        Some((self.slope - half_width, self.slope + half_width))
    }

    /// The same fit with slope and intercept negated.
    ///
    /// Box-counting dimensions are reported as the negated slope of
    /// `ln(count)` vs `ln(size)`; fit quality is unchanged.
    pub fn negated(&self) -> Self {
        Self {
            slope: -self.slope,
            intercept: -self.intercept,
            ..*self
        }
    }
}

/// Ordinary least squares on raw values.
///
/// Pairs with a non-finite coordinate are excluded.
///
/// # Errors
/// `LengthMismatch` when `x` and `y` differ in length.
///
/// # Example
/// ```rust
/// use fractal_scan::regression::linear_fit;
///
/// let fit = linear_fit(&[1.0, 2.0, 3.0], &[3.0, 5.0, 7.0]).unwrap().unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
/// ```
pub fn linear_fit(x: &[f64], y: &[f64]) -> FractalResult<Option<RegressionFit>> {
    validate_matching_lengths(x.len(), y.len(), "regression x/y")?;

    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter(|(xi, yi)| xi.is_finite() && yi.is_finite())
        .map(|(&xi, &yi)| (xi, yi))
        .unzip();

    if xs.len() < x.len() {
        log::debug!(
            "linear_fit: dropped {} of {} pairs with non-finite values",
            x.len() - xs.len(),
            x.len()
        );
    }

    Ok(fit_clean(&xs, &ys))
}

/// Least squares on `(ln x, ln y)`; the slope is the scaling exponent.
///
/// Pairs where either coordinate is zero, negative, NaN or infinite are
/// excluded before taking logarithms.
///
/// # Example
/// ```rust
/// use fractal_scan::regression::log_log_fit;
///
/// let sizes = [1.0, 2.0, 4.0, 8.0];
/// let masses = [1.0, 4.0, 16.0, 64.0];
/// let fit = log_log_fit(&sizes, &masses).unwrap().unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// ```
pub fn log_log_fit(x: &[f64], y: &[f64]) -> FractalResult<Option<RegressionFit>> {
    validate_matching_lengths(x.len(), y.len(), "regression x/y")?;

    let (ln_x, ln_y): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter_map(|(&xi, &yi)| Some((float_ops::safe_ln(xi)?, float_ops::safe_ln(yi)?)))
        .unzip();

    if ln_x.len() < x.len() {
        log::debug!(
            "log_log_fit: dropped {} of {} pairs that cannot be logged",
            x.len() - ln_x.len(),
            x.len()
        );
    }

    Ok(fit_clean(&ln_x, &ln_y))
}

/// [`log_log_fit`] restricted to the first `points` pairs.
///
/// # Errors
/// `LengthMismatch` when the arrays differ in length, `InsufficientData`
/// when `points` exceeds their length.
pub fn log_log_fit_points(x: &[f64], y: &[f64], points: usize) -> FractalResult<Option<RegressionFit>> {
    validate_matching_lengths(x.len(), y.len(), "regression x/y")?;
    validate_data_length(x, points, "log_log_fit_points")?;
    log_log_fit(&x[..points], &y[..points])
}

/// Slope-only convenience wrapper over [`log_log_fit`].
pub fn log_log_slope(x: &[f64], y: &[f64]) -> FractalResult<Option<f64>> {
    Ok(log_log_fit(x, y)?.map(|fit| fit.slope))
}

/// Fit on pairs already known to be finite.
fn fit_clean(x: &[f64], y: &[f64]) -> Option<RegressionFit> {
    let n = x.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;

    // Centre first: ln-sizes share a large common offset
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let (sxx, sxy, syy) = x.iter().zip(y).fold((0.0, 0.0, 0.0), |(sxx, sxy, syy), (xi, yi)| {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        (sxx + dx * dx, sxy + dx * dy, syy + dy * dy)
    });

    if float_ops::approx_zero_eps(sxx, constants::MIN_VARIANCE) {
        log::debug!("regression predictor has zero variance; fit not computed");
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    if !slope.is_finite() || !intercept.is_finite() {
        return None;
    }

    let rss: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| {
            let residual = yi - (intercept + slope * xi);
            residual * residual
        })
        .sum();

    let r_squared = if float_ops::approx_zero(syy) {
        // constant response: the horizontal line is exact
        1.0
    } else {
        (1.0 - rss / syy).clamp(0.0, 1.0)
    };

    let standard_error = if n > 2 {
        (rss / (nf - 2.0) / sxx).sqrt()
    } else {
        0.0
    };

    Some(RegressionFit {
        slope,
        intercept,
        r_squared,
        standard_error,
        points_used: n,
    })
}
