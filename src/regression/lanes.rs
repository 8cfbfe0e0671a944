//! regression::lanes — per-lane evaluation of two broadcast arrays along a
//! named dimension.
//!
//! Purpose
//! -------
//! Align `x` and `y` by dimension name, materialize both in the broadcast
//! layout and run a 1-D kernel on every pair of lanes along the sample
//! dimension. All regression adapters go through [`LanePair`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Both inputs carry the sample dimension; the broadcast layout lists
//!   `y`'s dims first.
//! - Lanes are independent; with the `parallel` feature they are evaluated
//!   on rayon.

use crate::labeled::{BroadcastPlan, DataArray};
use crate::regression::nan_policy::NanPolicy;
use crate::statistical_tests::errors::{StatsError, StatsResult};
use ndarray::{ArrayD, ArrayView1, ArrayViewMut1, Axis, Zip};

/// `x` and `y` materialized in a shared layout, with the sample axis.
#[derive(Debug, Clone)]
pub(crate) struct LanePair {
    plan: BroadcastPlan,
    dim: String,
    axis: Axis,
    x: ArrayD<f64>,
    y: ArrayD<f64>,
}

impl LanePair {
    /// Errors
    /// ------
    /// - `StatsError::Labeled(MissingDim)` if either input lacks `dim`.
    /// - `StatsError::Labeled(..)` if the inputs do not broadcast.
    /// - `StatsError::MissingValues` under `NanPolicy::Raise` when any
    ///   sample is non-finite.
    pub(crate) fn new(
        x: &DataArray<f64>, y: &DataArray<f64>, dim: &str, nan_policy: NanPolicy,
    ) -> StatsResult<Self> {
        x.axis_of(dim)?;
        y.axis_of(dim)?;
        let plan = BroadcastPlan::from_arrays(&[y, x])?;
        let axis = plan.axis_of(dim)?;
        let x = plan.broadcast_owned(x)?;
        let y = plan.broadcast_owned(y)?;

        if nan_policy == NanPolicy::Raise && x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(StatsError::MissingValues { dim: dim.to_string() });
        }
        Ok(LanePair { plan, dim: dim.to_string(), axis, x, y })
    }

    /// Number of samples along the sample dimension.
    pub(crate) fn lane_len(&self) -> usize {
        self.plan.shape()[self.axis.index()]
    }

    pub(crate) fn plan(&self) -> &BroadcastPlan {
        &self.plan
    }

    /// Layout with the sample dimension removed.
    pub(crate) fn reduced_plan(&self) -> StatsResult<BroadcastPlan> {
        Ok(self.plan.reduce(&self.dim)?)
    }

    /// Fill an output of the broadcast shape lane by lane.
    ///
    /// The output starts as NaN; `kernel` writes the lanes it can compute.
    pub(crate) fn map_lanes<F>(&self, kernel: F) -> StatsResult<DataArray<f64>>
    where
        F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>, ArrayViewMut1<'_, f64>) + Send + Sync,
    {
        let mut out = ArrayD::<f64>::from_elem(self.y.raw_dim(), f64::NAN);
        let zip = Zip::from(out.lanes_mut(self.axis))
            .and(self.x.lanes(self.axis))
            .and(self.y.lanes(self.axis));

        #[cfg(feature = "parallel")]
        zip.par_for_each(|o, xl, yl| kernel(xl, yl, o));
        #[cfg(not(feature = "parallel"))]
        zip.for_each(|o, xl, yl| kernel(xl, yl, o));

        Ok(self.plan().wrap(out)?)
    }

    /// Reduce every lane to one value; the result has the reduced layout.
    pub(crate) fn reduce_lanes<R, F>(&self, kernel: F) -> ArrayD<R>
    where
        R: Send,
        F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> R + Send + Sync,
    {
        let zip = Zip::from(self.x.lanes(self.axis)).and(self.y.lanes(self.axis));

        #[cfg(feature = "parallel")]
        let reduced = zip.par_map_collect(|xl, yl| kernel(xl, yl));
        #[cfg(not(feature = "parallel"))]
        let reduced = zip.map_collect(|xl, yl| kernel(xl, yl));

        reduced
    }
}

/// Samples where both `x` and `y` are finite, in lane order.
pub(crate) fn finite_pairs(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> (Vec<f64>, Vec<f64>) {
    x.iter().zip(y.iter()).filter(|(a, b)| a.is_finite() && b.is_finite()).map(|(&a, &b)| (a, b)).unzip()
}

/// Lane samples under `nan_policy`: finite pairs for `Omit`, otherwise the
/// full lane or `None` when it holds a non-finite value.
pub(crate) fn lane_samples(
    x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>, nan_policy: NanPolicy,
) -> Option<(Vec<f64>, Vec<f64>)> {
    match nan_policy {
        NanPolicy::Omit => Some(finite_pairs(x, y)),
        NanPolicy::Propagate | NanPolicy::Raise => {
            if x.iter().chain(y.iter()).all(|v| v.is_finite()) {
                Some((x.to_vec(), y.to_vec()))
            } else {
                None
            }
        }
    }
}
