//! regression::corr — lead/lag Pearson correlation along a named dimension.
//!
//! Purpose
//! -------
//! Correlate two broadcastable labeled arrays along a sample dimension,
//! optionally shifting one series against the other, and optionally return
//! a two-sided p-value for zero correlation.
//!
//! Key behaviors
//! -------------
//! - `lead > 0`: `x` leads `y`; `x[0..N−lead]` is paired with `y[lead..N]`.
//! - `lead < 0`: `y` leads `x`; `y[0..N−|lead|]` is paired with
//!   `x[|lead|..N]`.
//! - Pairs with a non-finite member are skipped in each lane.
//!
//! Invariants & assumptions
//! ------------------------
//! - `r` is clipped to [−1, 1]; a lane with zero variance in either series
//!   gives NaN.
//! - The p-value uses `t = r·sqrt((n−2)/(1−r²))` with `n − 2` degrees of
//!   freedom, `n` being the number of usable pairs; it is NaN for `n < 3`.

use crate::labeled::DataArray;
use crate::regression::{
    lanes::{LanePair, finite_pairs},
    nan_policy::NanPolicy,
};
use crate::statistical_tests::{
    errors::{StatsError, StatsResult},
    ttest::two_sided_t_pvalue,
};
use ndarray::{ArrayView1, s};

/// Pearson correlation of `x` and `y` along `dim`.
///
/// Parameters
/// ----------
/// - `x`, `y`: `&DataArray<f64>`
///   Broadcastable inputs that both contain `dim`.
/// - `dim`: `&str`
///   Sample dimension, removed from the output.
/// - `lead`: `isize`
///   Shift of `x` relative to `y` in samples (see module docs).
/// - `return_p`: `bool`
///   Also compute two-sided p-values.
///
/// Returns
/// -------
/// `StatsResult<(DataArray<f64>, Option<DataArray<f64>>)>`
///   Correlation coefficients and, when requested, p-values, both in the
///   broadcast layout without `dim`.
///
/// Errors
/// ------
/// - `StatsError::Labeled(..)` if `dim` is missing or inputs do not
///   broadcast.
/// - `StatsError::InvalidLead` if `|lead|` is not smaller than the length
///   of `dim`.
///
/// Examples
/// --------
/// ```rust
/// use esm_stats::labeled::DataArray;
/// use esm_stats::regression::corr;
///
/// let x = DataArray::from_vec("time", vec![1.0, 2.0, 4.0, 3.0, 5.0]);
/// let (r, p) = corr(&x, &x, "time", 0, true).unwrap();
/// assert!((r.data().iter().next().copied().unwrap() - 1.0).abs() < 1e-12);
/// assert!(p.is_some());
/// ```
pub fn corr(
    x: &DataArray<f64>, y: &DataArray<f64>, dim: &str, lead: isize, return_p: bool,
) -> StatsResult<(DataArray<f64>, Option<DataArray<f64>>)> {
    let lanes = LanePair::new(x, y, dim, NanPolicy::Omit)?;
    let len = lanes.lane_len();
    if lead.unsigned_abs() >= len {
        return Err(StatsError::InvalidLead { lead, len });
    }

    let per_lane = lanes.reduce_lanes(|xl, yl| {
        let (xs, ys) = shifted(xl, yl, lead);
        pearson_with_p(xs, ys)
    });

    #[cfg(feature = "obs_slog")]
    slog::debug!(crate::logging::logger(), "corr";
        "dim" => dim, "lead" => lead, "lanes" => per_lane.len(), "return_p" => return_p);

    let plan = lanes.reduced_plan()?;
    let r = plan.wrap(per_lane.map(|stats| stats.0))?;
    let p = if return_p { Some(plan.wrap(per_lane.map(|stats| stats.1))?) } else { None };
    Ok((r, p))
}

/// Pair the lanes according to `lead`.
fn shifted<'a, 'b>(
    x: ArrayView1<'a, f64>, y: ArrayView1<'b, f64>, lead: isize,
) -> (ArrayView1<'a, f64>, ArrayView1<'b, f64>) {
    let n = x.len();
    let shift = lead.unsigned_abs();
    if lead >= 0 {
        (x.slice_move(s![..n - shift]), y.slice_move(s![shift..]))
    } else {
        (x.slice_move(s![shift..]), y.slice_move(s![..n - shift]))
    }
}

/// `(r, p)` over the finite pairs of `x` and `y`.
fn pearson_with_p(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> (f64, f64) {
    let (xs, ys) = finite_pairs(x, y);
    let n = xs.len();
    if n < 2 {
        return (f64::NAN, f64::NAN);
    }
    let r = pearson(&xs, &ys);
    if n < 3 || r.is_nan() {
        return (r, f64::NAN);
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    (r, two_sided_t_pvalue(t, df))
}

/// Pearson correlation coefficient, clipped to [−1, 1]; NaN for zero
/// variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let xmean = x.iter().sum::<f64>() / n;
    let ymean = y.iter().sum::<f64>() / n;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - xmean;
        let dy = yi - ymean;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array, IxDyn};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Self-correlation of a grid (r = 1, no NaN) and with a time series.
    // - Lead and lag pairing, including exact recovery of a shifted series.
    // - p-values in [0, 1] and the invalid-lead error.
    // -------------------------------------------------------------------------

    fn gridded(n: usize) -> DataArray<f64> {
        let data = Array::from_shape_fn(IxDyn(&[n, 3, 2]), |ix| {
            let t = ix[0] as f64;
            (0.7 * t + ix[1] as f64).sin() + 0.1 * t * (1 + ix[2]) as f64
        });
        DataArray::new(data, ["time", "lat", "lon"]).expect("valid grid")
    }

    #[test]
    // Purpose
    // -------
    // A grid correlated with itself gives r = 1 everywhere and p-values in
    // [0, 1].
    //
    // Given
    // -----
    // - A (time=20, lat=3, lon=2) grid.
    //
    // Expect
    // ------
    // - r has dims ["lat", "lon"], all values 1; p is finite and in [0, 1].
    fn grid_self_correlation_is_one() {
        // Arrange
        let grid = gridded(20);

        // Act
        let (r, p) = corr(&grid, &grid, "time", 0, true).expect("corr");
        let p = p.expect("p requested");

        // Assert
        assert_eq!(r.dims(), &["lat".to_string(), "lon".to_string()]);
        assert!(r.data().iter().all(|&v| (v - 1.0).abs() < 1e-12));
        assert!(p.data().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    // Purpose
    // -------
    // Lead and lag variants produce finite coefficients, and a series
    // shifted by `lead` is recovered exactly.
    //
    // Given
    // -----
    // - The grid with lead ±3; x a series and y = x delayed by 2 steps.
    //
    // Expect
    // ------
    // - No NaN for ±3; r = 1 for lead = 2 on the delayed pair.
    fn lead_and_lag_pair_shifted_samples() {
        let grid = gridded(20);
        for lead in [3, -3] {
            let (r, p) = corr(&grid, &grid, "time", lead, false).expect("corr");
            assert!(p.is_none());
            assert!(r.data().iter().all(|v| v.is_finite()));
        }

        let base: Vec<f64> = (0..12).map(|t| (0.9 * t as f64).cos() + 0.05 * t as f64).collect();
        let x = DataArray::from_vec("time", base.clone());
        let delayed: Vec<f64> = (0..12).map(|t| if t < 2 { 0.0 } else { base[t - 2] }).collect();
        let y = DataArray::from_vec("time", delayed);

        let (r_lead, _) = corr(&x, &y, "time", 2, false).expect("lead");
        let (r_lag, _) = corr(&y, &x, "time", -2, false).expect("lag");

        let r_lead = r_lead.data().iter().copied().next().expect("scalar");
        let r_lag = r_lag.data().iter().copied().next().expect("scalar");
        assert_relative_eq!(r_lead, 1.0, epsilon = 1e-12);
        assert_relative_eq!(r_lag, 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Correlation between a grid and a single time series broadcasts.
    //
    // Given
    // -----
    // - The grid as y and a 1-D time series as x.
    //
    // Expect
    // ------
    // - Output over ("lat", "lon") without NaN.
    fn grid_against_series_broadcasts() {
        let grid = gridded(15);
        let series = DataArray::from_vec("time", (0..15).map(|t| (t as f64).sqrt()).collect());

        let (r, _) = corr(&series, &grid, "time", 0, false).expect("corr");

        assert_eq!(r.shape(), &[3, 2]);
        assert!(r.data().iter().all(|v| v.is_finite()));
    }

    #[test]
    // Purpose
    // -------
    // A lead as long as the series is rejected.
    //
    // Given
    // -----
    // - A series of length 5 with lead −5.
    //
    // Expect
    // ------
    // - `InvalidLead { lead: -5, len: 5 }`.
    fn lead_must_leave_overlap() {
        let x = DataArray::from_vec("time", vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(
            corr(&x, &x, "time", -5, false),
            Err(StatsError::InvalidLead { lead: -5, len: 5 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Non-finite pairs are skipped.
    //
    // Given
    // -----
    // - x = [1, 2, NaN, 4, 5], y = 2x.
    //
    // Expect
    // ------
    // - r = 1 from the four finite pairs.
    fn non_finite_pairs_are_skipped() {
        let x = DataArray::from_vec("time", vec![1.0, 2.0, f64::NAN, 4.0, 5.0]);
        let y = x.map(|&v| 2.0 * v);

        let (r, _) = corr(&x, &y, "time", 0, false).expect("corr");

        assert_relative_eq!(r.data().iter().copied().next().expect("scalar"), 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Lanes borrowed from two unrelated arrays are paired by `lead`.
    //
    // Given
    // -----
    // - x = [0..6) and y = [10..16) held in separate arrays; lead 2 and -2.
    //
    // Expect
    // ------
    // - lead 2: x[0..4] with y[2..6]; lead -2: x[2..6] with y[0..4].
    fn shifted_pairs_independent_lanes() {
        let x = ndarray::Array1::from_iter((0..6).map(f64::from));
        let pairs = {
            let y = ndarray::Array1::from_iter((10..16).map(f64::from));
            let (xs, ys) = shifted(x.view(), y.view(), 2);
            let lead = (xs.to_vec(), ys.to_vec());
            let (xs, ys) = shifted(x.view(), y.view(), -2);
            (lead, (xs.to_vec(), ys.to_vec()))
        };

        assert_eq!(pairs.0, (vec![0.0, 1.0, 2.0, 3.0], vec![12.0, 13.0, 14.0, 15.0]));
        assert_eq!(pairs.1, (vec![2.0, 3.0, 4.0, 5.0], vec![10.0, 11.0, 12.0, 13.0]));
    }
}
