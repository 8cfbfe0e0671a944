//! labeled::array — `DataArray`, an N-dimensional array with named axes.
//!
//! Purpose
//! -------
//! Carry dimension names and per-dimension coordinate values alongside an
//! `ndarray::ArrayD` so that statistical adapters can broadcast by name and
//! hand back results that keep the caller's labeling.
//!
//! Invariants
//! ----------
//! - `dims.len() == data.ndim()` and dimension names are unique.
//! - Every coordinate vector is keyed by an existing dimension and has the
//!   same length as that axis.
//! - Fields are private; every constructor and transformation re-establishes
//!   the invariants above, so downstream code may rely on them without
//!   re-checking.
//!
//! Conventions
//! -----------
//! - Coordinates are `f64` (numeric time axes are expressed as, e.g., days
//!   or fractional years since an epoch).
//! - Positional selections (`isel`, `slice_dim`) drop or trim coordinates in
//!   lockstep with the data.

use crate::labeled::errors::{LabeledError, LabeledResult};
use ndarray::{Array1, ArrayD, Axis, IxDyn, Slice};
use std::collections::BTreeMap;

/// DataArray — labeled N-dimensional array.
///
/// Fields
/// ------
/// - `data`: `ArrayD<T>`
///   Element storage, any memory layout.
/// - `dims`: `Vec<String>`
///   One unique name per axis, in axis order.
/// - `coords`: `BTreeMap<String, Array1<f64>>`
///   Optional coordinate values per dimension.
/// - `name`: `Option<String>`
///   Optional variable name carried through transformations.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray<T = f64> {
    data: ArrayD<T>,
    dims: Vec<String>,
    coords: BTreeMap<String, Array1<f64>>,
    name: Option<String>,
}

impl<T> DataArray<T> {
    /// Build a labeled array from storage and one name per axis.
    ///
    /// Errors
    /// ------
    /// - `LabeledError::DimCountMismatch` if the number of names differs
    ///   from `data.ndim()`.
    /// - `LabeledError::DuplicateDim` if a name repeats.
    pub fn new<I, S>(data: ArrayD<T>, dims: I) -> LabeledResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        validate_dims(data.ndim(), &dims)?;
        Ok(DataArray { data, dims, coords: BTreeMap::new(), name: None })
    }

    /// One-dimensional array along `dim`.
    pub fn from_vec(dim: impl Into<String>, values: Vec<T>) -> Self {
        DataArray {
            data: Array1::from(values).into_dyn(),
            dims: vec![dim.into()],
            coords: BTreeMap::new(),
            name: None,
        }
    }

    /// Assemble from parts, validating every invariant.
    pub fn from_parts(
        data: ArrayD<T>, dims: Vec<String>, coords: BTreeMap<String, Array1<f64>>,
        name: Option<String>,
    ) -> LabeledResult<Self> {
        validate_dims(data.ndim(), &dims)?;
        for (dim, values) in &coords {
            let axis = dims
                .iter()
                .position(|d| d == dim)
                .ok_or_else(|| LabeledError::MissingDim { dim: dim.clone() })?;
            let expected = data.shape()[axis];
            if values.len() != expected {
                return Err(LabeledError::CoordLengthMismatch {
                    dim: dim.clone(),
                    expected,
                    actual: values.len(),
                });
            }
        }
        Ok(DataArray { data, dims, coords, name })
    }

    /// Attach coordinate values to an existing dimension.
    pub fn with_coord(
        mut self, dim: &str, values: impl Into<Array1<f64>>,
    ) -> LabeledResult<Self> {
        let values: Array1<f64> = values.into();
        let expected = self.dim_len(dim)?;
        if values.len() != expected {
            return Err(LabeledError::CoordLengthMismatch {
                dim: dim.to_string(),
                expected,
                actual: values.len(),
            });
        }
        self.coords.insert(dim.to_string(), values);
        Ok(self)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<T> {
        self.data
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn coord(&self, dim: &str) -> Option<&Array1<f64>> {
        self.coords.get(dim)
    }

    pub fn coords(&self) -> &BTreeMap<String, Array1<f64>> {
        &self.coords
    }

    pub fn has_dim(&self, dim: &str) -> bool {
        self.dims.iter().any(|d| d == dim)
    }

    /// Axis index of `dim`.
    pub fn axis_of(&self, dim: &str) -> LabeledResult<Axis> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .map(Axis)
            .ok_or_else(|| LabeledError::MissingDim { dim: dim.to_string() })
    }

    /// Length of `dim`.
    pub fn dim_len(&self, dim: &str) -> LabeledResult<usize> {
        let axis = self.axis_of(dim)?;
        Ok(self.data.len_of(axis))
    }

    /// Apply `f` elementwise, keeping dims, coords and name.
    pub fn map<U, F>(&self, f: F) -> DataArray<U>
    where
        F: FnMut(&T) -> U,
    {
        DataArray {
            data: self.data.map(f),
            dims: self.dims.clone(),
            coords: self.coords.clone(),
            name: self.name.clone(),
        }
    }
}

impl<T: Clone> DataArray<T> {
    /// Zero-dimensional array holding a single value; broadcasts against
    /// anything.
    pub fn scalar(value: T) -> Self {
        DataArray {
            data: ArrayD::from_elem(IxDyn(&[]), value),
            dims: Vec::new(),
            coords: BTreeMap::new(),
            name: None,
        }
    }

    /// Select position `index` along `dim`, dropping that dimension.
    pub fn isel(&self, dim: &str, index: usize) -> LabeledResult<Self> {
        let axis = self.axis_of(dim)?;
        let len = self.data.len_of(axis);
        if index >= len {
            return Err(LabeledError::IndexOutOfBounds { dim: dim.to_string(), index, len });
        }
        let data = self.data.index_axis(axis, index).to_owned();
        let mut dims = self.dims.clone();
        dims.remove(axis.index());
        let mut coords = self.coords.clone();
        coords.remove(dim);
        Ok(DataArray { data, dims, coords, name: self.name.clone() })
    }

    /// Keep positions `start..end` along `dim`.
    pub fn slice_dim(&self, dim: &str, start: usize, end: usize) -> LabeledResult<Self> {
        let axis = self.axis_of(dim)?;
        let len = self.data.len_of(axis);
        if start > end || end > len {
            return Err(LabeledError::IndexOutOfBounds { dim: dim.to_string(), index: end, len });
        }
        let data = self.data.slice_axis(axis, Slice::from(start..end)).to_owned();
        let mut coords = self.coords.clone();
        if let Some(values) = coords.get_mut(dim) {
            *values = values.slice(ndarray::s![start..end]).to_owned();
        }
        Ok(DataArray { data, dims: self.dims.clone(), coords, name: self.name.clone() })
    }

    /// Reorder axes so that they follow `order`, which must name every
    /// dimension exactly once.
    pub fn transpose(&self, order: &[&str]) -> LabeledResult<Self> {
        if order.len() != self.ndim() {
            return Err(LabeledError::DimCountMismatch { ndim: self.ndim(), dims: order.len() });
        }
        let perm: Vec<usize> = order
            .iter()
            .map(|dim| self.axis_of(dim).map(|axis| axis.index()))
            .collect::<LabeledResult<_>>()?;
        let dims: Vec<String> = order.iter().map(|d| d.to_string()).collect();
        validate_dims(self.ndim(), &dims)?;
        let data = self.data.view().permuted_axes(perm).to_owned();
        Ok(DataArray { data, dims, coords: self.coords.clone(), name: self.name.clone() })
    }
}

fn validate_dims(ndim: usize, dims: &[String]) -> LabeledResult<()> {
    if dims.len() != ndim {
        return Err(LabeledError::DimCountMismatch { ndim, dims: dims.len() });
    }
    for (i, dim) in dims.iter().enumerate() {
        if dims[..i].contains(dim) {
            return Err(LabeledError::DuplicateDim { dim: dim.clone() });
        }
    }
    Ok(())
}
