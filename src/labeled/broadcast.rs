//! labeled::broadcast — align labeled arrays by dimension name.
//!
//! Purpose
//! -------
//! Compute the common labeled shape of several `DataArray`s and produce
//! zero-copy views of each input laid out in that common shape, so that
//! elementwise kernels can run over `ndarray::Zip` without caring about the
//! inputs' original axis order.
//!
//! Key behaviors
//! -------------
//! - The broadcast dimension order is the union of input dimensions in
//!   first-appearance order (the first array's order wins).
//! - A dimension shared by several inputs must have the same length in all
//!   of them; if two inputs carry coordinates for it, the coordinate values
//!   must be identical.
//! - Dimensions missing from an input are inserted as length-1 axes and then
//!   broadcast (stride 0), so no element is copied.
//!
//! Conventions
//! -----------
//! - Views are produced in two steps: [`BroadcastPlan::aligned`] permutes and
//!   pads an input, [`BroadcastPlan::expand`] stretches the padded view to
//!   the full shape. The split keeps the expanded view's borrow tied to a
//!   caller-owned binding.

use crate::labeled::{
    array::DataArray,
    errors::{LabeledError, LabeledResult},
};
use ndarray::{Array1, ArrayD, ArrayViewD, Axis, IxDyn};
use std::collections::BTreeMap;

/// BroadcastPlan — common dims, shape and coordinates for a set of inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastPlan {
    dims: Vec<String>,
    shape: Vec<usize>,
    coords: BTreeMap<String, Array1<f64>>,
}

impl BroadcastPlan {
    /// Build the plan for `arrays`.
    ///
    /// Errors
    /// ------
    /// - `LabeledError::SizeMismatch` when a shared dimension differs in
    ///   length between inputs.
    /// - `LabeledError::CoordMismatch` when two inputs carry different
    ///   coordinate values for a shared dimension.
    pub fn from_arrays<T>(arrays: &[&DataArray<T>]) -> LabeledResult<Self> {
        let mut plan = BroadcastPlan { dims: Vec::new(), shape: Vec::new(), coords: BTreeMap::new() };
        for arr in arrays {
            for (axis, dim) in arr.dims().iter().enumerate() {
                let len = arr.shape()[axis];
                match plan.position(dim) {
                    Some(pos) if plan.shape[pos] != len => {
                        return Err(LabeledError::SizeMismatch {
                            dim: dim.clone(),
                            left: plan.shape[pos],
                            right: len,
                        });
                    }
                    Some(_) => {}
                    None => {
                        plan.dims.push(dim.clone());
                        plan.shape.push(len);
                    }
                }
                if let Some(values) = arr.coord(dim) {
                    match plan.coords.get(dim) {
                        Some(existing) if existing != values => {
                            return Err(LabeledError::CoordMismatch { dim: dim.clone() });
                        }
                        Some(_) => {}
                        None => {
                            plan.coords.insert(dim.clone(), values.clone());
                        }
                    }
                }
            }
        }
        Ok(plan)
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn coords(&self) -> &BTreeMap<String, Array1<f64>> {
        &self.coords
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Axis index of `dim` in the broadcast layout.
    pub fn axis_of(&self, dim: &str) -> LabeledResult<Axis> {
        self.position(dim)
            .map(Axis)
            .ok_or_else(|| LabeledError::MissingDim { dim: dim.to_string() })
    }

    /// Permute `arr` into plan order and pad missing dimensions with
    /// length-1 axes.
    pub fn aligned<'a, T>(&self, arr: &'a DataArray<T>) -> LabeledResult<ArrayViewD<'a, T>> {
        let mut positions = Vec::with_capacity(arr.ndim());
        for (axis, dim) in arr.dims().iter().enumerate() {
            let pos = self
                .position(dim)
                .ok_or_else(|| LabeledError::MissingDim { dim: dim.clone() })?;
            if self.shape[pos] != arr.shape()[axis] {
                return Err(LabeledError::SizeMismatch {
                    dim: dim.clone(),
                    left: self.shape[pos],
                    right: arr.shape()[axis],
                });
            }
            positions.push(pos);
        }

        let mut order: Vec<usize> = (0..arr.ndim()).collect();
        order.sort_by_key(|&axis| positions[axis]);
        let mut view = arr.data().view().permuted_axes(order);

        // Axes before `pos` are already in plan order, so inserting in
        // increasing position keeps the present axes in their slots.
        for (pos, dim) in self.dims.iter().enumerate() {
            if !arr.has_dim(dim) {
                view = view.insert_axis(Axis(pos));
            }
        }
        Ok(view)
    }

    /// Stretch an aligned view to the full broadcast shape.
    pub fn expand<'v, T>(&self, aligned: &'v ArrayViewD<'_, T>) -> LabeledResult<ArrayViewD<'v, T>> {
        aligned.broadcast(IxDyn(&self.shape)).ok_or_else(|| LabeledError::ShapeMismatch {
            expected: self.shape.clone(),
            actual: aligned.len(),
        })
    }

    /// Materialize `arr` in the full broadcast shape.
    pub fn broadcast_owned<T: Clone>(&self, arr: &DataArray<T>) -> LabeledResult<ArrayD<T>> {
        let aligned = self.aligned(arr)?;
        let full = self.expand(&aligned)?;
        Ok(full.to_owned())
    }

    /// Label `data` (which must have the plan's shape) with the plan's dims
    /// and coordinates.
    pub fn wrap<U>(&self, data: ArrayD<U>) -> LabeledResult<DataArray<U>> {
        if data.shape() != self.shape.as_slice() {
            return Err(LabeledError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: data.len(),
            });
        }
        DataArray::from_parts(data, self.dims.clone(), self.coords.clone(), None)
    }

    /// Plan with `dim` removed, for reductions along `dim`.
    pub fn reduce(&self, dim: &str) -> LabeledResult<Self> {
        let pos = self.axis_of(dim)?.index();
        let mut reduced = self.clone();
        reduced.dims.remove(pos);
        reduced.shape.remove(pos);
        reduced.coords.remove(dim);
        Ok(reduced)
    }

    /// Plan with a trailing dimension `dim` of length `len` appended.
    pub fn append_dim(mut self, dim: &str, len: usize) -> LabeledResult<Self> {
        if self.position(dim).is_some() {
            return Err(LabeledError::DuplicateDim { dim: dim.to_string() });
        }
        self.dims.push(dim.to_string());
        self.shape.push(len);
        Ok(self)
    }

    fn position(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }
}
