//! regression::linregress — ordinary least-squares line with inference
//! statistics along a named dimension.
//!
//! Purpose
//! -------
//! Compute, per lane along the sample dimension, the slope, intercept,
//! Pearson correlation, two-sided p-value for a zero slope and the slope's
//! standard error, returning them stacked along a trailing `parameter`
//! dimension.
//!
//! Invariants & assumptions
//! ------------------------
//! - Sums of squares use the population (biased) normalization; the
//!   correlation is clipped to [−1, 1].
//! - With exactly two samples the p-value is 1 when the two `y` values are
//!   equal and 0 otherwise, and the standard error is 0.
//! - A lane whose `x` values are all equal, or that has fewer than two
//!   usable samples, is NaN.

use crate::labeled::{DataArray, LabeledError};
use crate::regression::{
    lanes::{LanePair, lane_samples},
    nan_policy::NanPolicy,
};
use crate::statistical_tests::{
    errors::{StatsError, StatsResult},
    ttest::two_sided_t_pvalue,
};
use ndarray::{ArrayD, IxDyn};

/// Name of the dimension holding the regression statistics.
pub const PARAMETER_DIM: &str = "parameter";

/// Labels of the `parameter` dimension, in storage order.
pub const LINREGRESS_PARAMETERS: [&str; 5] = ["slope", "intercept", "rvalue", "pvalue", "stderr"];

/// Linear regression of `y` on `x` along `dim`.
///
/// Parameters
/// ----------
/// - `x`, `y`: `&DataArray<f64>`
///   Broadcastable inputs that both contain `dim`.
/// - `dim`: `&str`
///   Sample dimension; replaced in the output by [`PARAMETER_DIM`].
/// - `nan_policy`: `NanPolicy`
///   Handling of non-finite samples.
///
/// Returns
/// -------
/// `StatsResult<DataArray<f64>>`
///   The broadcast layout without `dim`, with a trailing `parameter`
///   dimension of length 5 ordered as [`LINREGRESS_PARAMETERS`].
///
/// Errors
/// ------
/// - `StatsError::Labeled(..)` if `dim` is missing or inputs do not
///   broadcast.
/// - `StatsError::InsufficientData` if `dim` has fewer than 2 samples.
/// - `StatsError::MissingValues` under `NanPolicy::Raise`.
///
/// Examples
/// --------
/// ```rust
/// use esm_stats::labeled::DataArray;
/// use esm_stats::regression::{linregress, NanPolicy};
///
/// let t = DataArray::from_vec("time", vec![0.0, 1.0, 2.0, 3.0]);
/// let y = DataArray::from_vec("time", vec![1.0, 3.1, 4.9, 7.0]);
/// let stats = linregress(&t, &y, "time", NanPolicy::Propagate).unwrap();
/// assert_eq!(stats.dims(), &["parameter".to_string()]);
/// let slope = stats.data().iter().next().copied().unwrap();
/// assert!((slope - 1.98).abs() < 1e-12);
/// ```
pub fn linregress(
    x: &DataArray<f64>, y: &DataArray<f64>, dim: &str, nan_policy: NanPolicy,
) -> StatsResult<DataArray<f64>> {
    let lanes = LanePair::new(x, y, dim, nan_policy)?;
    if lanes.lane_len() < 2 {
        return Err(StatsError::InsufficientData { needed: 2, got: lanes.lane_len() });
    }

    let per_lane = lanes.reduce_lanes(|xl, yl| {
        lane_samples(xl, yl, nan_policy)
            .map_or([f64::NAN; 5], |(xs, ys)| linregress_samples(&xs, &ys))
    });

    let mut shape = per_lane.shape().to_vec();
    shape.push(LINREGRESS_PARAMETERS.len());
    let flat: Vec<f64> = per_lane.iter().flat_map(|stats| stats.iter().copied()).collect();
    let stacked = ArrayD::from_shape_vec(IxDyn(&shape), flat).map_err(|_| {
        LabeledError::ShapeMismatch { expected: shape.clone(), actual: per_lane.len() * 5 }
    })?;

    let plan = lanes.reduced_plan()?.append_dim(PARAMETER_DIM, LINREGRESS_PARAMETERS.len())?;
    Ok(plan.wrap(stacked)?)
}

/// `[slope, intercept, rvalue, pvalue, stderr]` for one set of samples.
///
/// Returns all NaN for fewer than two samples or constant `x`.
pub fn linregress_samples(x: &[f64], y: &[f64]) -> [f64; 5] {
    let n = x.len();
    if n < 2 || y.len() != n {
        return [f64::NAN; 5];
    }
    let nf = n as f64;
    let xmean = x.iter().sum::<f64>() / nf;
    let ymean = y.iter().sum::<f64>() / nf;

    let (mut ssxm, mut ssym, mut ssxym) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - xmean;
        let dy = yi - ymean;
        ssxm += dx * dx;
        ssym += dy * dy;
        ssxym += dx * dy;
    }
    ssxm /= nf;
    ssym /= nf;
    ssxym /= nf;

    if ssxm == 0.0 {
        return [f64::NAN; 5];
    }

    let r = if ssym == 0.0 { 0.0 } else { (ssxym / (ssxm * ssym).sqrt()).clamp(-1.0, 1.0) };
    let slope = ssxym / ssxm;
    let intercept = ymean - slope * xmean;

    let (pvalue, stderr) = if n == 2 {
        (if y[0] == y[1] { 1.0 } else { 0.0 }, 0.0)
    } else {
        const TINY: f64 = 1.0e-20;
        let df = nf - 2.0;
        let t = r * (df / ((1.0 - r + TINY) * (1.0 + r + TINY))).sqrt();
        (two_sided_t_pvalue(t, df), ((1.0 - r * r) * ssym / ssxm / df).sqrt())
    };

    [slope, intercept, r, pvalue, stderr]
}
