//! labeled::errors — error type for labeled-array construction and alignment.
//!
//! Purpose
//! -------
//! Report every way a labeled array can be malformed or fail to align with
//! another labeled array: label/storage disagreement, duplicate or missing
//! dimension names, coordinate length or value conflicts, and flat buffers
//! that cannot be folded back into the recorded shape.
//!
//! Conventions
//! -----------
//! - Each variant carries the offending dimension name and sizes so that a
//!   `Display` message is actionable without access to the arrays.
//! - Statistical routines wrap these errors in
//!   `statistical_tests::StatsError::Labeled` rather than re-declaring them.

/// Result alias for labeled-array operations.
pub type LabeledResult<T> = Result<T, LabeledError>;

/// LabeledError — construction and broadcasting failures for `DataArray`.
///
/// Variants
/// --------
/// - `DimCountMismatch { ndim, dims }`
///   Number of dimension names differs from the storage rank.
/// - `DuplicateDim { dim }`
///   A dimension name appears more than once on one array.
/// - `MissingDim { dim }`
///   A requested dimension does not exist on the array (or broadcast).
/// - `CoordLengthMismatch { dim, expected, actual }`
///   A coordinate vector does not match the axis length.
/// - `SizeMismatch { dim, left, right }`
///   Two arrays share a dimension name but disagree on its length.
/// - `CoordMismatch { dim }`
///   Two arrays share a dimension name and length but carry different
///   coordinate values.
/// - `ShapeMismatch { expected, actual }`
///   A flat buffer cannot be reshaped to the recorded shape.
/// - `IndexOutOfBounds { dim, index, len }`
///   Positional selection past the end of a dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum LabeledError {
    // ---- Construction ----
    DimCountMismatch { ndim: usize, dims: usize },
    DuplicateDim { dim: String },
    MissingDim { dim: String },
    CoordLengthMismatch { dim: String, expected: usize, actual: usize },

    // ---- Alignment ----
    SizeMismatch { dim: String, left: usize, right: usize },
    CoordMismatch { dim: String },

    // ---- Reshaping / selection ----
    ShapeMismatch { expected: Vec<usize>, actual: usize },
    IndexOutOfBounds { dim: String, index: usize, len: usize },
}

impl std::error::Error for LabeledError {}

impl std::fmt::Display for LabeledError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabeledError::DimCountMismatch { ndim, dims } => write!(
                f,
                "Labeled Error: array has {ndim} axes but {dims} dimension names were given"
            ),
            LabeledError::DuplicateDim { dim } => {
                write!(f, "Labeled Error: dimension '{dim}' appears more than once")
            }
            LabeledError::MissingDim { dim } => {
                write!(f, "Labeled Error: dimension '{dim}' not found")
            }
            LabeledError::CoordLengthMismatch { dim, expected, actual } => write!(
                f,
                "Labeled Error: coordinate for '{dim}' has length {actual}, expected {expected}"
            ),
            LabeledError::SizeMismatch { dim, left, right } => write!(
                f,
                "Labeled Error: cannot broadcast dimension '{dim}' with sizes {left} and {right}"
            ),
            LabeledError::CoordMismatch { dim } => write!(
                f,
                "Labeled Error: coordinates along '{dim}' differ between inputs"
            ),
            LabeledError::ShapeMismatch { expected, actual } => write!(
                f,
                "Labeled Error: cannot reshape {actual} elements into shape {expected:?}"
            ),
            LabeledError::IndexOutOfBounds { dim, index, len } => write!(
                f,
                "Labeled Error: index {index} out of bounds for '{dim}' of length {len}"
            ),
        }
    }
}
