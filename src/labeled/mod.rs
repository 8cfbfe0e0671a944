//! labeled — minimal labeled-array layer for the statistical adapters.
//!
//! Purpose
//! -------
//! Provide just enough of a labeled N-dimensional array for the adapters in
//! `statistical_tests` and `regression`: named dimensions, optional numeric
//! coordinates, name-based broadcasting and reversible flattening. It is not
//! a general array runtime.
//!
//! Key behaviors
//! -------------
//! - [`DataArray`] wraps an `ndarray::ArrayD` with dimension names,
//!   coordinates and an optional variable name.
//! - [`BroadcastPlan`] aligns several arrays by dimension name and yields
//!   zero-copy views in a shared layout.
//! - [`DataArray::stack`] / [`StackedIndex::unstack`] collapse all
//!   dimensions into one composite index and back.
//!
//! Invariants & assumptions
//! ------------------------
//! - Dimension names are unique per array and match the storage rank.
//! - Coordinates always match their axis length.
//! - Every fallible operation reports a [`LabeledError`]; nothing here
//!   panics on user input.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use esm_stats::labeled::{BroadcastPlan, DataArray};
//! use ndarray::{ArrayD, IxDyn};
//!
//! let grid = DataArray::new(ArrayD::<f64>::zeros(IxDyn(&[2, 3])), ["lat", "lon"]).unwrap();
//! let series = DataArray::from_vec("time", vec![1.0, 2.0]);
//! let plan = BroadcastPlan::from_arrays(&[&grid, &series]).unwrap();
//! assert_eq!(plan.shape(), &[2, 3, 2]);
//! ```

pub mod array;
pub mod broadcast;
pub mod errors;
pub mod stack;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::array::DataArray;
pub use self::broadcast::BroadcastPlan;
pub use self::errors::{LabeledError, LabeledResult};
pub use self::stack::StackedIndex;
