//! statistical_tests::validation — array-input guard for the adapters.
//!
//! Purpose
//! -------
//! Centralize the precondition that an adapter's array argument is a
//! well-formed labeled array before any other logic runs. This is the
//! explicit guard clause each entry point calls first.
//!
//! Invariants & assumptions
//! ------------------------
//! - Storage rank equals the number of dimension names.
//! - Every coordinate belongs to an existing dimension and has that
//!   dimension's length.
//! - The array has at least one dimension (a 0-d value has nothing to stack).
//!
//! Conventions
//! -----------
//! - `arg_index` is the 0-based positional index of the argument being
//!   checked; it is echoed in the error so callers with several arrays can
//!   tell which one failed.
//! - Zero-element arrays pass: they stack to an empty buffer and produce
//!   empty outputs.

use crate::labeled::DataArray;
use crate::statistical_tests::errors::{StatsError, StatsResult};

/// Check that `arr` is a usable labeled array.
///
/// Parameters
/// ----------
/// - `arr`: `&DataArray<T>`
///   Array argument of an adapter.
/// - `arg_index`: `usize`
///   Position of `arr` in the adapter's argument list.
///
/// Returns
/// -------
/// `StatsResult<()>`
///   `Ok(())` when every invariant above holds.
///
/// Errors
/// ------
/// - `StatsError::NotArrayLike { arg_index, reason }` naming the first
///   violated condition.
///
/// Examples
/// --------
/// ```rust
/// # use esm_stats::labeled::DataArray;
/// # use esm_stats::statistical_tests::validation::check_array_input;
/// # use esm_stats::statistical_tests::StatsError;
/// let p = DataArray::from_vec("x", vec![0.01, 0.5]);
/// assert!(check_array_input(&p, 0).is_ok());
///
/// match check_array_input(&DataArray::scalar(0.5), 0) {
///     Err(StatsError::NotArrayLike { arg_index: 0, .. }) => (),
///     other => panic!("expected NotArrayLike, got {other:?}"),
/// }
/// ```
pub fn check_array_input<T>(arr: &DataArray<T>, arg_index: usize) -> StatsResult<()> {
    if arr.dims().len() != arr.data().ndim() {
        return Err(StatsError::NotArrayLike {
            arg_index,
            reason: "number of dimension names differs from array rank",
        });
    }
    if arr.ndim() == 0 {
        return Err(StatsError::NotArrayLike {
            arg_index,
            reason: "zero-dimensional input has no dimensions to stack",
        });
    }
    for (dim, values) in arr.coords() {
        match arr.dim_len(dim) {
            Ok(len) if len == values.len() => {}
            Ok(_) => {
                return Err(StatsError::NotArrayLike {
                    arg_index,
                    reason: "coordinate length differs from its dimension",
                });
            }
            Err(_) => {
                return Err(StatsError::NotArrayLike {
                    arg_index,
                    reason: "coordinate refers to an unknown dimension",
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Acceptance of regular and zero-element labeled arrays.
    // - Rejection of 0-d inputs with the argument index echoed.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Well-formed arrays, including empty ones, pass the guard.
    //
    // Given
    // -----
    // - A (2, 3) array with a coordinate and a (0,) array.
    //
    // Expect
    // ------
    // - Both return `Ok(())`.
    fn check_array_input_accepts_regular_and_empty_arrays() {
        // Arrange
        let grid = DataArray::new(ArrayD::<f64>::zeros(IxDyn(&[2, 3])), ["lat", "lon"])
            .and_then(|a| a.with_coord("lat", vec![0.0, 1.0]))
            .expect("valid grid");
        let empty = DataArray::<f64>::from_vec("x", Vec::new());

        // Act / Assert
        assert!(check_array_input(&grid, 0).is_ok());
        assert!(check_array_input(&empty, 0).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // A 0-d input is rejected and the argument position is reported.
    //
    // Given
    // -----
    // - A scalar checked as argument 2.
    //
    // Expect
    // ------
    // - `NotArrayLike { arg_index: 2, .. }`.
    fn check_array_input_rejects_scalars_with_position() {
        // Arrange
        let scalar = DataArray::scalar(0.5);

        // Act
        let result = check_array_input(&scalar, 2);

        // Assert
        match result {
            Err(StatsError::NotArrayLike { arg_index, .. }) => assert_eq!(arg_index, 2),
            other => panic!("expected NotArrayLike, got {other:?}"),
        }
    }
}
