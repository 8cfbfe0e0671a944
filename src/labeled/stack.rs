//! labeled::stack — reversible flattening of a labeled array.
//!
//! Purpose
//! -------
//! Collapse every dimension of a `DataArray` into one composite index (C
//! order over the labeled axes) for routines that only understand 1-D
//! buffers, and fold 1-D results back into the original labeled shape.
//!
//! Invariants
//! ----------
//! - Flat position `k` corresponds to the multi-index returned by
//!   [`StackedIndex::unravel`]`(k)`, and `ravel` is its inverse.
//! - `unstack` restores dims, coordinates and name exactly as recorded.

use crate::labeled::{
    array::DataArray,
    errors::{LabeledError, LabeledResult},
};
use ndarray::{Array1, ArrayD, IxDyn};
use std::collections::BTreeMap;

/// StackedIndex — the record needed to undo [`DataArray::stack`].
#[derive(Debug, Clone, PartialEq)]
pub struct StackedIndex {
    dims: Vec<String>,
    shape: Vec<usize>,
    coords: BTreeMap<String, Array1<f64>>,
    name: Option<String>,
}

impl<T: Clone> DataArray<T> {
    /// Flatten into a 1-D buffer in logical C order.
    pub fn stack(&self) -> (Vec<T>, StackedIndex) {
        let flat: Vec<T> = self.data().iter().cloned().collect();
        let index = StackedIndex {
            dims: self.dims().to_vec(),
            shape: self.shape().to_vec(),
            coords: self.coords().clone(),
            name: self.name().map(str::to_string),
        };
        (flat, index)
    }
}

impl StackedIndex {
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of flat positions.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-axis index of flat position `flat`.
    pub fn unravel(&self, mut flat: usize) -> LabeledResult<Vec<usize>> {
        let len = self.len();
        if flat >= len {
            return Err(LabeledError::IndexOutOfBounds { dim: "stacked".into(), index: flat, len });
        }
        let mut index = vec![0; self.shape.len()];
        for (slot, &extent) in index.iter_mut().zip(&self.shape).rev() {
            *slot = flat % extent;
            flat /= extent;
        }
        Ok(index)
    }

    /// Flat position of the per-axis index `index`.
    pub fn ravel(&self, index: &[usize]) -> LabeledResult<usize> {
        if index.len() != self.shape.len() {
            return Err(LabeledError::DimCountMismatch { ndim: self.shape.len(), dims: index.len() });
        }
        let mut flat = 0;
        for ((&i, &extent), dim) in index.iter().zip(&self.shape).zip(&self.dims) {
            if i >= extent {
                return Err(LabeledError::IndexOutOfBounds { dim: dim.clone(), index: i, len: extent });
            }
            flat = flat * extent + i;
        }
        Ok(flat)
    }

    /// Fold a flat buffer back into the recorded labeled shape.
    ///
    /// Errors
    /// ------
    /// - `LabeledError::ShapeMismatch` if `flat.len()` differs from the
    ///   recorded element count.
    pub fn unstack<U>(&self, flat: Vec<U>) -> LabeledResult<DataArray<U>> {
        let actual = flat.len();
        let data = ArrayD::from_shape_vec(IxDyn(&self.shape), flat).map_err(|_| {
            LabeledError::ShapeMismatch { expected: self.shape.clone(), actual }
        })?;
        DataArray::from_parts(data, self.dims.clone(), self.coords.clone(), self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn cube() -> DataArray<f64> {
        let data = Array::from_shape_fn(IxDyn(&[3, 4, 5]), |ix| (100 * ix[0] + 10 * ix[1] + ix[2]) as f64);
        DataArray::new(data, ["time", "lat", "lon"])
            .and_then(|a| a.with_coord("lat", vec![-60.0, -20.0, 20.0, 60.0]))
            .map(|a| a.with_name("p"))
            .expect("valid cube")
    }

    #[test]
    // Purpose
    // -------
    // stack followed by unstack is the identity on data and labels.
    //
    // Given
    // -----
    // - A named (3, 4, 5) cube with a lat coordinate.
    //
    // Expect
    // ------
    // - `unstack(stack(a)) == a`.
    fn unstack_inverts_stack() {
        let a = cube();

        let (flat, index) = a.stack();
        let back = index.unstack(flat).expect("same length");

        assert_eq!(back, a);
    }

    #[test]
    // Purpose
    // -------
    // Flat positions map to per-axis indices in C order.
    //
    // Given
    // -----
    // - The (3, 4, 5) cube, whose values encode their own index.
    //
    // Expect
    // ------
    // - For every k, `flat[k]` equals the value at `unravel(k)` and
    //   `ravel(unravel(k)) == k`.
    fn unravel_matches_flat_order() {
        let a = cube();
        let (flat, index) = a.stack();

        for (k, value) in flat.iter().enumerate() {
            let ix = index.unravel(k).expect("in range");
            assert_eq!(a.data()[IxDyn(&ix)], *value);
            assert_eq!(index.ravel(&ix).expect("valid index"), k);
        }
    }

    #[test]
    // Purpose
    // -------
    // Buffers of the wrong length cannot be unstacked.
    //
    // Given
    // -----
    // - The cube's index and a buffer one element short.
    //
    // Expect
    // ------
    // - `ShapeMismatch { expected: [3, 4, 5], actual: 59 }`.
    fn unstack_rejects_wrong_length() {
        let (_, index) = cube().stack();

        let err = index.unstack(vec![0.0; 59]).unwrap_err();

        assert_eq!(err, LabeledError::ShapeMismatch { expected: vec![3, 4, 5], actual: 59 });
    }
}
