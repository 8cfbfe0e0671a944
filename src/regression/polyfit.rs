//! regression::polyfit — least-squares polynomial fits along a named
//! dimension.
//!
//! Purpose
//! -------
//! Fit a polynomial of `y` on `x` independently in every lane along a
//! sample dimension (typically `time`) of two broadcastable labeled arrays,
//! and expose the fitted values, the residuals (detrended data) and the
//! linear slope.
//!
//! Key behaviors
//! -------------
//! - [`polyfit`] returns fitted values in the broadcast layout of `y` and
//!   `x` (dims of `y` first).
//! - [`rm_poly`] returns `y − polyfit(x, y)`; [`rm_trend`] is the order-1
//!   case.
//! - [`linear_slope`] returns the order-1 coefficient per lane with the
//!   sample dimension removed.
//! - Missing samples follow [`NanPolicy`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Each lane is solved in the Vandermonde basis `1, x, …, x^order` with
//!   column scaling and an SVD least-squares solve; singular values below
//!   `n · ε · σ_max` are treated as zero.
//! - A lane that cannot be fitted (too few finite samples under `Omit`,
//!   non-finite samples under `Propagate`, or a failed solve) is NaN.
//!
//! Conventions
//! -----------
//! - Coefficients are ordered from the constant term upwards.
//!
//! Testing notes
//! -------------
//! - Exact polynomials are recovered; fitted values plus residuals
//!   reconstruct `y`; per-lane output matches the 1-D fit.

use crate::labeled::DataArray;
use crate::regression::{
    lanes::{LanePair, lane_samples},
    nan_policy::NanPolicy,
};
use crate::statistical_tests::errors::{StatsError, StatsResult};
use nalgebra::{DMatrix, DVector};

/// Least-squares polynomial coefficients of `y` on `x`.
///
/// Parameters
/// ----------
/// - `x`, `y`: `&[f64]`
///   Finite samples of equal length.
/// - `order`: `usize`
///   Polynomial degree.
///
/// Returns
/// -------
/// `Option<Vec<f64>>`
///   `order + 1` coefficients from the constant term upwards, or `None`
///   when there are fewer samples than coefficients, the lengths differ or
///   the solve fails.
///
/// Examples
/// --------
/// ```rust
/// use esm_stats::regression::polyfit::fit_polynomial;
///
/// let x = [0.0, 1.0, 2.0, 3.0];
/// let y = [1.0, 3.0, 5.0, 7.0];
/// let coefs = fit_polynomial(&x, &y, 1).unwrap();
/// assert!((coefs[0] - 1.0).abs() < 1e-10 && (coefs[1] - 2.0).abs() < 1e-10);
/// ```
pub fn fit_polynomial(x: &[f64], y: &[f64], order: usize) -> Option<Vec<f64>> {
    let n = x.len();
    let ncoef = order + 1;
    if n < ncoef || y.len() != n {
        return None;
    }

    let powers = |xi: f64, k: usize| xi.powi(k as i32);
    let scale: Vec<f64> = (0..ncoef)
        .map(|k| {
            let norm = x.iter().map(|&xi| powers(xi, k).powi(2)).sum::<f64>().sqrt();
            if norm > 0.0 { norm } else { 1.0 }
        })
        .collect();
    let vander = DMatrix::<f64>::from_fn(n, ncoef, |i, k| powers(x[i], k) / scale[k]);
    let rhs = DVector::<f64>::from_column_slice(y);

    let svd = vander.svd(true, true);
    let cutoff = svd.singular_values.max() * n as f64 * f64::EPSILON;
    let solution = svd.solve(&rhs, cutoff).ok()?;

    let coefs: Vec<f64> = solution.iter().zip(&scale).map(|(c, s)| c / s).collect();
    coefs.iter().all(|c| c.is_finite()).then_some(coefs)
}

/// Evaluate a polynomial (constant term first) at `x` with Horner's rule.
pub fn eval_polynomial(coefs: &[f64], x: f64) -> f64 {
    coefs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Fitted polynomial values along `dim`.
///
/// Parameters
/// ----------
/// - `x`: `&DataArray<f64>`
///   Independent variable; a 1-D series along `dim` or a full grid.
/// - `y`: `&DataArray<f64>`
///   Dependent variable; must contain `dim`.
/// - `order`: `usize`
///   Polynomial degree.
/// - `dim`: `&str`
///   Sample dimension.
/// - `nan_policy`: `NanPolicy`
///   Handling of non-finite samples.
///
/// Returns
/// -------
/// `StatsResult<DataArray<f64>>`
///   Fitted values in the broadcast layout of `y` and `x`.
///
/// Errors
/// ------
/// - `StatsError::Labeled(..)` if `dim` is missing or inputs do not
///   broadcast.
/// - `StatsError::InsufficientData` if `dim` has fewer than `order + 1`
///   samples.
/// - `StatsError::MissingValues` under `NanPolicy::Raise`.
pub fn polyfit(
    x: &DataArray<f64>, y: &DataArray<f64>, order: usize, dim: &str, nan_policy: NanPolicy,
) -> StatsResult<DataArray<f64>> {
    fit_lanes(x, y, order, dim, nan_policy, LaneOutput::Fitted)
}

/// Remove a polynomial fit along `dim`: `y − polyfit(x, y, order)`.
///
/// Errors
/// ------
/// - As for [`polyfit`].
///
/// Examples
/// --------
/// ```rust
/// use esm_stats::labeled::DataArray;
/// use esm_stats::regression::{rm_poly, NanPolicy};
///
/// let t = DataArray::from_vec("time", vec![0.0, 1.0, 2.0, 3.0, 4.0]);
/// let y = DataArray::from_vec("time", vec![1.0, 2.0, 5.0, 10.0, 17.0]);
/// let detrended = rm_poly(&t, &y, 2, "time", NanPolicy::Propagate).unwrap();
/// assert!(detrended.data().iter().all(|r| r.abs() < 1e-9));
/// ```
pub fn rm_poly(
    x: &DataArray<f64>, y: &DataArray<f64>, order: usize, dim: &str, nan_policy: NanPolicy,
) -> StatsResult<DataArray<f64>> {
    fit_lanes(x, y, order, dim, nan_policy, LaneOutput::Residual)
}

/// Remove a linear trend along `dim`; [`rm_poly`] with `order = 1`.
pub fn rm_trend(
    x: &DataArray<f64>, y: &DataArray<f64>, dim: &str, nan_policy: NanPolicy,
) -> StatsResult<DataArray<f64>> {
    rm_poly(x, y, 1, dim, nan_policy)
}

/// Least-squares slope of `y` on `x` along `dim`, with `dim` removed.
///
/// Errors
/// ------
/// - As for [`polyfit`] with `order = 1`.
pub fn linear_slope(
    x: &DataArray<f64>, y: &DataArray<f64>, dim: &str, nan_policy: NanPolicy,
) -> StatsResult<DataArray<f64>> {
    let lanes = LanePair::new(x, y, dim, nan_policy)?;
    ensure_samples(lanes.lane_len(), 2)?;

    let slopes = lanes.reduce_lanes(|xl, yl| {
        lane_samples(xl, yl, nan_policy)
            .and_then(|(xs, ys)| fit_polynomial(&xs, &ys, 1))
            .map_or(f64::NAN, |coefs| coefs[1])
    });

    #[cfg(feature = "obs_slog")]
    slog::debug!(crate::logging::logger(), "linear_slope";
        "dim" => dim, "lanes" => slopes.len(), "nan_policy" => nan_policy.as_str());

    Ok(lanes.reduced_plan()?.wrap(slopes)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LaneOutput {
    Fitted,
    Residual,
}

fn fit_lanes(
    x: &DataArray<f64>, y: &DataArray<f64>, order: usize, dim: &str, nan_policy: NanPolicy,
    output: LaneOutput,
) -> StatsResult<DataArray<f64>> {
    let lanes = LanePair::new(x, y, dim, nan_policy)?;
    ensure_samples(lanes.lane_len(), order + 1)?;

    let fitted = lanes.map_lanes(|xl, yl, mut out| {
        let Some(coefs) =
            lane_samples(xl, yl, nan_policy).and_then(|(xs, ys)| fit_polynomial(&xs, &ys, order))
        else {
            return;
        };
        for ((o, &xv), &yv) in out.iter_mut().zip(xl.iter()).zip(yl.iter()) {
            let fit = if xv.is_finite() { eval_polynomial(&coefs, xv) } else { f64::NAN };
            *o = match output {
                LaneOutput::Fitted => fit,
                LaneOutput::Residual => yv - fit,
            };
        }
    })?;

    #[cfg(feature = "obs_slog")]
    slog::debug!(crate::logging::logger(), "polynomial fit";
        "dim" => dim, "order" => order, "output" => ?output,
        "shape" => ?fitted.shape(), "nan_policy" => nan_policy.as_str());

    Ok(fitted)
}

fn ensure_samples(got: usize, needed: usize) -> StatsResult<()> {
    if got < needed {
        return Err(StatsError::InsufficientData { needed, got });
    }
    Ok(())
}
