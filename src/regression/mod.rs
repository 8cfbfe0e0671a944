//! regression — detrending and correlation along a named dimension.
//!
//! Purpose
//! -------
//! Broadcast 1-D regression kernels (polynomial least squares, simple
//! linear regression, Pearson correlation) across every lane of labeled
//! arrays along a sample dimension such as `time`, keeping the remaining
//! dimensions and their coordinates.
//!
//! Key behaviors
//! -------------
//! - [`polyfit`], [`rm_poly`] and [`rm_trend`] keep the sample dimension;
//!   [`linear_slope`] and [`corr`] remove it; [`linregress`] replaces it
//!   with a `parameter` dimension.
//! - `x` may be a 1-D series along the sample dimension or a full grid;
//!   it is broadcast against `y` by dimension name.
//! - Missing samples follow [`NanPolicy`] (`corr` always skips non-finite
//!   pairs).
//!
//! Invariants & assumptions
//! ------------------------
//! - Both inputs must contain the sample dimension.
//! - Inputs are only read; outputs are new labeled arrays.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use esm_stats::labeled::DataArray;
//! use esm_stats::regression::prelude::*;
//!
//! let t = DataArray::from_vec("time", vec![0.0, 1.0, 2.0, 3.0]);
//! let y = DataArray::from_vec("time", vec![0.5, 1.4, 2.6, 3.5]);
//! let anomalies = rm_trend(&t, &y, "time", NanPolicy::Propagate)?;
//! assert_eq!(anomalies.shape(), &[4]);
//! # Ok::<(), esm_stats::statistical_tests::StatsError>(())
//! ```
//!
//! Testing notes
//! -------------
//! - Each submodule tests its kernel against hand-computed values and its
//!   adapter against the kernel applied lane by lane.

pub mod corr;
pub(crate) mod lanes;
pub mod linregress;
pub mod nan_policy;
pub mod polyfit;

pub use self::corr::corr;
pub use self::linregress::{linregress, LINREGRESS_PARAMETERS, PARAMETER_DIM};
pub use self::nan_policy::NanPolicy;
pub use self::polyfit::{linear_slope, polyfit, rm_poly, rm_trend};

pub mod prelude {
    pub use super::corr::corr;
    pub use super::linregress::{linregress, LINREGRESS_PARAMETERS};
    pub use super::nan_policy::NanPolicy;
    pub use super::polyfit::{linear_slope, polyfit, rm_poly, rm_trend};
}
