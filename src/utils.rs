//! utils — conversions between Python array-likes and labeled arrays for the
//! PyO3 bindings.
//!
//! Purpose
//! -------
//! Turn NumPy arrays, pandas/xarray objects exposing `to_numpy()`, Python
//! floats and float sequences into [`DataArray`] values, and turn adapter
//! results back into NumPy arrays of the shape NumPy broadcasting would give.
//!
//! Conventions
//! -----------
//! - Dimension names are synthesized right-aligned: the last axis is
//!   `dim_0`, the one before it `dim_1`, and so on.
//! - Inputs that broadcast against each other are squeezed first: size-1
//!   axes are dropped, so a (3, 1) array and a (1, 4) array meet as
//!   `dim_1` and `dim_0` and broadcast to (3, 4) the way NumPy does.
//! - Results are transposed into descending `dim_k` order and reshaped to
//!   the NumPy broadcast shape, which restores any squeezed size-1 axes.

use crate::labeled::{DataArray, LabeledError};
use crate::statistical_tests::errors::{StatsError, StatsResult};
use ndarray::{ArrayD, Axis, IxDyn};

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArrayDyn, PyReadonlyArrayDyn};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

/// Name of the axis at `axis` in an array of rank `ndim`.
pub fn synthesized_dim(axis: usize, ndim: usize) -> String {
    format!("dim_{}", ndim - 1 - axis)
}

/// Right-aligned rank encoded in a synthesized name (`dim_3` → 3).
fn dim_rank(dim: &str) -> usize {
    dim.strip_prefix("dim_").and_then(|k| k.parse().ok()).unwrap_or(0)
}

/// Dims of `dims` ordered from the highest to the lowest right-aligned rank.
pub fn numpy_axis_order(dims: &[String]) -> Vec<&str> {
    let mut order: Vec<&str> = dims.iter().map(String::as_str).collect();
    order.sort_by_key(|dim| std::cmp::Reverse(dim_rank(dim)));
    order
}

/// Label the axes of `data` right-aligned; with `squeeze`, size-1 axes are
/// dropped first so they broadcast against any length.
pub fn name_axes(data: ArrayD<f64>, squeeze: bool) -> StatsResult<DataArray<f64>> {
    let ndim = data.ndim();
    let mut data = data;
    let mut dims = Vec::with_capacity(ndim);
    for axis in (0..ndim).rev() {
        if squeeze && data.len_of(Axis(axis)) == 1 {
            data = data.index_axis_move(Axis(axis), 0);
        } else {
            dims.push(synthesized_dim(axis, ndim));
        }
    }
    dims.reverse();
    Ok(DataArray::new(data, dims)?)
}

/// Shape NumPy broadcasting gives for inputs of the given shapes.
///
/// Shapes are right-aligned; at each position the result is the first
/// length other than 1, or 1 when every input has 1 or lacks the axis.
pub fn numpy_broadcast_shape(shapes: &[&[usize]]) -> Vec<usize> {
    let ndim = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    (0..ndim)
        .map(|pos| {
            let from_end = ndim - pos;
            shapes
                .iter()
                .filter_map(|s| s.len().checked_sub(from_end).map(|axis| s[axis]))
                .find(|&len| len != 1)
                .unwrap_or(1)
        })
        .collect()
}

/// Values of `arr` in NumPy axis order, laid out with `shape`.
///
/// Errors
/// ------
/// - `StatsError::Labeled(ShapeMismatch)` if `shape` does not hold exactly
///   `arr.len()` elements.
pub fn restore_numpy_shape(arr: &DataArray<f64>, shape: &[usize]) -> StatsResult<ArrayD<f64>> {
    let ordered = arr.transpose(&numpy_axis_order(arr.dims()))?;
    let values: Vec<f64> = ordered.data().iter().copied().collect();
    let actual = values.len();
    ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|_| {
        StatsError::from(LabeledError::ShapeMismatch { expected: shape.to_vec(), actual })
    })
}

/// Convert a Python array-like into an owned `f64` array.
///
/// Errors
/// ------
/// - `TypeError` naming `arg_index` when the object is not a float array,
///   a float, or a sequence of floats.
#[cfg(feature = "python-bindings")]
pub fn extract_array<'py>(raw: &Bound<'py, PyAny>, arg_index: usize) -> PyResult<ArrayD<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArrayDyn<f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    if let Ok(value) = raw.extract::<f64>() {
        return Ok(ArrayD::from_elem(IxDyn(&[]), value));
    }
    if let Some(arr) = raw
        .call_method0("to_numpy")
        .ok()
        .and_then(|obj| obj.extract::<PyReadonlyArrayDyn<f64>>().ok())
    {
        return Ok(arr.as_array().to_owned());
    }
    let values: Vec<f64> = raw.extract().map_err(|_| {
        PyTypeError::new_err(format!(
            "argument {arg_index}: expected a numpy.ndarray, pandas/xarray object, float, or sequence of float64"
        ))
    })?;
    Ok(Array1::from(values).into_dyn())
}

/// Convert a Python array-like into a labeled array with synthesized dims,
/// keeping every axis.
#[cfg(feature = "python-bindings")]
pub fn extract_labeled<'py>(raw: &Bound<'py, PyAny>, arg_index: usize) -> PyResult<DataArray<f64>> {
    Ok(name_axes(extract_array(raw, arg_index)?, false)?)
}

/// Convert an adapter result into a NumPy array of `shape`.
#[cfg(feature = "python-bindings")]
pub fn labeled_to_numpy<'py>(
    py: Python<'py>, arr: &DataArray<f64>, shape: &[usize],
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    Ok(restore_numpy_shape(arr, shape)?.into_pyarray(py))
}
