//! statistical_tests::ttest — two-sample t-test from summary statistics,
//! broadcast over labeled arrays.
//!
//! Purpose
//! -------
//! Apply the independent two-sample t-test computed from group means,
//! standard deviations and sample counts elementwise across arbitrarily
//! shaped labeled arrays, returning the t statistic and two-sided p-value
//! with the broadcast labeling.
//!
//! Key behaviors
//! -------------
//! - The six inputs are aligned by dimension name through
//!   [`BroadcastPlan`]; nothing is reduced.
//! - Each position is computed independently with
//!   [`ttest_ind_from_stats_scalar`]; the default is the pooled-variance
//!   test, Welch's test is available through [`TTestOptions`].
//! - With the `parallel` feature the elementwise pass runs on rayon via
//!   `Zip::par_map_collect`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Degenerate groups are not special-cased. Zero counts or zero variance
//!   flow through IEEE arithmetic: `t` may be ±∞ or NaN; the p-value is NaN
//!   when `t` or the degrees of freedom are NaN or `df ≤ 0`, and 0 when
//!   `|t| = ∞`.
//! - Input arrays are only read.
//!
//! Testing notes
//! -------------
//! - Unit tests compare the broadcast output against the scalar formula at
//!   every position, check textbook values for pooled and Welch variants,
//!   and exercise broadcast failures.

use crate::labeled::{BroadcastPlan, DataArray};
use crate::statistical_tests::errors::StatsResult;
use ndarray::{ArrayD, ArrayViewD, Zip};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// TTestOptions — variant selection for the summary-statistics t-test.
///
/// Fields
/// ------
/// - `equal_var`: `bool`
///   `true` (default) pools the two variances; `false` runs Welch's test
///   with Welch–Satterthwaite degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTestOptions {
    pub equal_var: bool,
}

impl Default for TTestOptions {
    fn default() -> Self {
        TTestOptions { equal_var: true }
    }
}

/// Summary statistics for one group at one grid position.
#[derive(Debug, Clone, Copy)]
struct GroupStats {
    mean: f64,
    std: f64,
    nobs: f64,
}

/// Elementwise two-sample t-test from summary statistics.
///
/// Parameters
/// ----------
/// - `mean1`, `std1`, `nobs1`: group-1 mean, standard deviation and sample
///   count.
/// - `mean2`, `std2`, `nobs2`: the same for group 2.
///
/// All six must be mutually broadcastable by dimension name.
///
/// Returns
/// -------
/// `StatsResult<(DataArray<f64>, DataArray<f64>)>`
///   `(statistic, pvalue)` labeled with the broadcast dims and coordinates.
///
/// Errors
/// ------
/// - `StatsError::Labeled(..)` when a shared dimension differs in length or
///   coordinates between inputs.
///
/// Examples
/// --------
/// ```rust
/// use esm_stats::labeled::DataArray;
/// use esm_stats::statistical_tests::ttest::ttest_ind_from_stats;
///
/// let m1 = DataArray::from_vec("lat", vec![1.0, 2.0, 3.0]);
/// let m2 = DataArray::scalar(0.0);
/// let s = DataArray::scalar(1.0);
/// let n = DataArray::scalar(30.0);
///
/// let (t, p) = ttest_ind_from_stats(&m1, &s, &n, &m2, &s, &n).unwrap();
/// assert_eq!(t.shape(), &[3]);
/// assert!(p.data().iter().all(|&v| (0.0..=1.0).contains(&v)));
/// ```
pub fn ttest_ind_from_stats(
    mean1: &DataArray<f64>, std1: &DataArray<f64>, nobs1: &DataArray<f64>,
    mean2: &DataArray<f64>, std2: &DataArray<f64>, nobs2: &DataArray<f64>,
) -> StatsResult<(DataArray<f64>, DataArray<f64>)> {
    ttest_ind_from_stats_with(mean1, std1, nobs1, mean2, std2, nobs2, TTestOptions::default())
}

/// [`ttest_ind_from_stats`] with an explicit variant.
pub fn ttest_ind_from_stats_with(
    mean1: &DataArray<f64>, std1: &DataArray<f64>, nobs1: &DataArray<f64>,
    mean2: &DataArray<f64>, std2: &DataArray<f64>, nobs2: &DataArray<f64>,
    options: TTestOptions,
) -> StatsResult<(DataArray<f64>, DataArray<f64>)> {
    let plan = BroadcastPlan::from_arrays(&[mean1, std1, nobs1, mean2, std2, nobs2])?;

    let aligned: Vec<ArrayViewD<'_, f64>> = [mean1, std1, nobs1, mean2, std2, nobs2]
        .into_iter()
        .map(|arr| plan.aligned(arr))
        .collect::<Result<_, _>>()?;
    let full: Vec<ArrayViewD<'_, f64>> =
        aligned.iter().map(|view| plan.expand(view)).collect::<Result<_, _>>()?;

    let group1 = collect_group(&full[0], &full[1], &full[2]);
    let group2 = collect_group(&full[3], &full[4], &full[5]);
    let equal_var = options.equal_var;
    let kernel = |g1: &GroupStats, g2: &GroupStats| {
        ttest_ind_from_stats_scalar(g1.mean, g1.std, g1.nobs, g2.mean, g2.std, g2.nobs, equal_var)
    };

    #[cfg(feature = "parallel")]
    let results: ArrayD<(f64, f64)> = Zip::from(&group1).and(&group2).par_map_collect(kernel);
    #[cfg(not(feature = "parallel"))]
    let results: ArrayD<(f64, f64)> = Zip::from(&group1).and(&group2).map_collect(kernel);

    #[cfg(feature = "obs_slog")]
    slog::debug!(crate::logging::logger(), "ttest_ind_from_stats";
        "shape" => ?plan.shape(), "equal_var" => equal_var);

    let statistic = plan.wrap(results.map(|r| r.0))?;
    let pvalue = plan.wrap(results.map(|r| r.1))?;
    Ok((statistic, pvalue))
}

/// Two-sample t-test for a single pair of groups.
///
/// Parameters
/// ----------
/// - `mean1`, `std1`, `nobs1`, `mean2`, `std2`, `nobs2`: `f64`
///   Group summary statistics; `std` is the sample standard deviation
///   (`ddof = 1`).
/// - `equal_var`: `bool`
///   Pooled (`true`) or Welch (`false`) variant.
///
/// Returns
/// -------
/// `(f64, f64)`
///   `(t, p)` with `p` the two-sided p-value.
///
/// Notes
/// -----
/// - Pooled: `df = n1 + n2 − 2`,
///   `s² = ((n1−1)s1² + (n2−1)s2²) / df`, `t = (m1−m2) / sqrt(s²(1/n1 + 1/n2))`.
/// - Welch: `v = s²/n`, `df = (v1+v2)² / (v1²/(n1−1) + v2²/(n2−1))` with a
///   NaN `df` replaced by 1, `t = (m1−m2) / sqrt(v1+v2)`.
pub fn ttest_ind_from_stats_scalar(
    mean1: f64, std1: f64, nobs1: f64, mean2: f64, std2: f64, nobs2: f64, equal_var: bool,
) -> (f64, f64) {
    let var1 = std1 * std1;
    let var2 = std2 * std2;
    let (df, denom) = if equal_var {
        let df = nobs1 + nobs2 - 2.0;
        let pooled = ((nobs1 - 1.0) * var1 + (nobs2 - 1.0) * var2) / df;
        (df, (pooled * (1.0 / nobs1 + 1.0 / nobs2)).sqrt())
    } else {
        let vn1 = var1 / nobs1;
        let vn2 = var2 / nobs2;
        let df = (vn1 + vn2).powi(2) / (vn1 * vn1 / (nobs1 - 1.0) + vn2 * vn2 / (nobs2 - 1.0));
        (if df.is_nan() { 1.0 } else { df }, (vn1 + vn2).sqrt())
    };
    let t = (mean1 - mean2) / denom;
    (t, two_sided_t_pvalue(t, df))
}

/// Two-sided Student-t tail probability `2·P(T > |t|)` with `df` degrees of
/// freedom.
///
/// Returns NaN for NaN inputs or `df ≤ 0`, and 0 for infinite `t`.
pub fn two_sided_t_pvalue(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}

fn collect_group(
    mean: &ArrayViewD<'_, f64>, std: &ArrayViewD<'_, f64>, nobs: &ArrayViewD<'_, f64>,
) -> ArrayD<GroupStats> {
    Zip::from(mean)
        .and(std)
        .and(nobs)
        .map_collect(|&mean, &std, &nobs| GroupStats { mean, std, nobs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array, Dimension, IxDyn};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Textbook values for the pooled and Welch scalar kernels.
    // - Degenerate inputs flowing through without special-casing.
    // - Broadcast output shape/labels and agreement with the scalar kernel
    //   at every position.
    // - Broadcast failure on mismatched shared dimensions.
    // -------------------------------------------------------------------------

    const TOL: f64 = 1e-10;

    fn field(dims: &[&str], shape: &[usize], f: impl Fn(&[usize]) -> f64) -> DataArray<f64> {
        let data = Array::from_shape_fn(IxDyn(shape), |ix| f(ix.slice()));
        DataArray::new(data, dims.iter().copied()).expect("valid field")
    }

    #[test]
    // Purpose
    // -------
    // The pooled kernel reproduces a hand-computed example.
    //
    // Given
    // -----
    // - m1 = 15.9, s1 = 3.0, n1 = 10; m2 = 14.0, s2 = 3.0, n2 = 10.
    //
    // Expect
    // ------
    // - df = 18, pooled s² = 9, t = 1.9 / sqrt(1.8).
    // - p equals 2·sf(|t|; 18) from statrs and lies in (0, 1).
    fn pooled_kernel_matches_hand_computation() {
        // Arrange
        let expected_t = 1.9 / 1.8_f64.sqrt();
        let dist = StudentsT::new(0.0, 1.0, 18.0).expect("valid df");

        // Act
        let (t, p) = ttest_ind_from_stats_scalar(15.9, 3.0, 10.0, 14.0, 3.0, 10.0, true);

        // Assert
        assert_relative_eq!(t, expected_t, epsilon = TOL);
        assert_relative_eq!(p, 2.0 * dist.sf(expected_t), epsilon = TOL);
        assert!(p > 0.0 && p < 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Welch's kernel uses per-group variances and Satterthwaite df.
    //
    // Given
    // -----
    // - m1 = 1, s1 = 1, n1 = 10; m2 = 0, s2 = 2, n2 = 20.
    //
    // Expect
    // ------
    // - v1 = 0.1, v2 = 0.2, t = 1 / sqrt(0.3),
    //   df = 0.09 / (0.01/9 + 0.04/19).
    fn welch_kernel_matches_hand_computation() {
        // Arrange
        let expected_t = 1.0 / 0.3_f64.sqrt();
        let df = 0.09 / (0.01 / 9.0 + 0.04 / 19.0);
        let dist = StudentsT::new(0.0, 1.0, df).expect("valid df");

        // Act
        let (t, p) = ttest_ind_from_stats_scalar(1.0, 1.0, 10.0, 0.0, 2.0, 20.0, false);

        // Assert
        assert_relative_eq!(t, expected_t, epsilon = TOL);
        assert_relative_eq!(p, 2.0 * dist.sf(expected_t), epsilon = TOL);
    }

    #[test]
    // Purpose
    // -------
    // Degenerate groups are surfaced, not special-cased.
    //
    // Given
    // -----
    // - Zero standard deviations with different means.
    // - Zero standard deviations with equal means.
    // - One observation per group (df = 0 in the pooled test).
    //
    // Expect
    // ------
    // - (+∞, 0), (NaN, NaN), and a NaN p-value respectively.
    fn degenerate_inputs_follow_ieee_arithmetic() {
        let (t_inf, p_inf) = ttest_ind_from_stats_scalar(1.0, 0.0, 5.0, 0.0, 0.0, 5.0, true);
        let (t_nan, p_nan) = ttest_ind_from_stats_scalar(1.0, 0.0, 5.0, 1.0, 0.0, 5.0, true);
        let (_, p_df0) = ttest_ind_from_stats_scalar(1.0, 1.0, 1.0, 0.0, 1.0, 1.0, true);

        assert!(t_inf.is_infinite() && t_inf > 0.0);
        assert_eq!(p_inf, 0.0);
        assert!(t_nan.is_nan() && p_nan.is_nan());
        assert!(p_df0.is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Broadcast output has the union shape and matches the scalar kernel
    // position by position.
    //
    // Given
    // -----
    // - mean1 on (lat=3, lon=4) with a lat coordinate, mean2 on (lon=4),
    //   std1 on (lat=3), scalar std2, nobs1 = 12 and nobs2 on (lon=4).
    //
    // Expect
    // ------
    // - Outputs have dims [lat, lon], shape [3, 4] and the lat coordinate.
    // - Each (i, j) equals the scalar kernel on the broadcast inputs.
    fn broadcast_matches_scalar_kernel_everywhere() {
        // Arrange
        let mean1 = field(&["lat", "lon"], &[3, 4], |ix| ix[0] as f64 + 0.5 * ix[1] as f64)
            .with_coord("lat", vec![-30.0, 0.0, 30.0])
            .expect("coord");
        let std1 = field(&["lat"], &[3], |ix| 1.0 + ix[0] as f64);
        let nobs1 = DataArray::scalar(12.0);
        let mean2 = field(&["lon"], &[4], |ix| 0.25 * ix[0] as f64);
        let std2 = DataArray::scalar(1.5);
        let nobs2 = field(&["lon"], &[4], |ix| 8.0 + ix[0] as f64);

        // Act
        let (t, p) = ttest_ind_from_stats(&mean1, &std1, &nobs1, &mean2, &std2, &nobs2)
            .expect("broadcastable");

        // Assert
        assert_eq!(t.dims(), &["lat".to_string(), "lon".to_string()]);
        assert_eq!(p.shape(), &[3, 4]);
        assert_eq!(t.coord("lat"), mean1.coord("lat"));
        for i in 0..3 {
            for j in 0..4 {
                let (et, ep) = ttest_ind_from_stats_scalar(
                    mean1.data()[[i, j]],
                    std1.data()[[i]],
                    12.0,
                    mean2.data()[[j]],
                    1.5,
                    nobs2.data()[[j]],
                    true,
                );
                assert_eq!(t.data()[[i, j]], et, "t mismatch at ({i}, {j})");
                assert_eq!(p.data()[[i, j]], ep, "p mismatch at ({i}, {j})");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The Welch option reaches the kernel.
    //
    // Given
    // -----
    // - Unequal variances and counts at a single position.
    //
    // Expect
    // ------
    // - The broadcast output equals the Welch scalar kernel, and differs
    //   from the pooled result.
    fn options_select_welch_variant() {
        let m1 = DataArray::from_vec("x", vec![1.0]);
        let s1 = DataArray::from_vec("x", vec![1.0]);
        let n1 = DataArray::from_vec("x", vec![10.0]);
        let m2 = DataArray::from_vec("x", vec![0.0]);
        let s2 = DataArray::from_vec("x", vec![3.0]);
        let n2 = DataArray::from_vec("x", vec![40.0]);

        let (t_welch, _) = ttest_ind_from_stats_with(
            &m1, &s1, &n1, &m2, &s2, &n2, TTestOptions { equal_var: false },
        )
        .expect("broadcastable");
        let (t_pooled, _) =
            ttest_ind_from_stats(&m1, &s1, &n1, &m2, &s2, &n2).expect("broadcastable");

        let (expected, _) = ttest_ind_from_stats_scalar(1.0, 1.0, 10.0, 0.0, 3.0, 40.0, false);
        assert_eq!(t_welch.data()[[0]], expected);
        assert_ne!(t_welch.data()[[0]], t_pooled.data()[[0]]);
    }

    #[test]
    // Purpose
    // -------
    // Inputs that disagree on a shared dimension fail with a labeled error.
    //
    // Given
    // -----
    // - mean1 on (lat=3) and mean2 on (lat=4).
    //
    // Expect
    // ------
    // - `StatsError::Labeled(SizeMismatch { .. })`.
    fn mismatched_inputs_fail_to_broadcast() {
        use crate::labeled::LabeledError;
        use crate::statistical_tests::errors::StatsError;

        let m1 = field(&["lat"], &[3], |_| 1.0);
        let m2 = field(&["lat"], &[4], |_| 0.0);
        let one = DataArray::scalar(1.0);
        let n = DataArray::scalar(10.0);

        let err = ttest_ind_from_stats(&m1, &one, &n, &m2, &one, &n).unwrap_err();

        assert!(matches!(err, StatsError::Labeled(LabeledError::SizeMismatch { .. })));
    }
}
