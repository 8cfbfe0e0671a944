//! statistical_tests::errors — shared error type and Python bridge.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias used by every statistical adapter
//! in this crate (t-test, multiple-testing correction, detrending and
//! correlation), together with a conversion layer to Python exceptions for
//! the PyO3 bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`StatsResult`] and [`StatsError`] as the canonical result and
//!   error types for the adapters and their input guards.
//! - Wrap labeled-array failures (broadcast conflicts, missing dims) as
//!   [`StatsError::Labeled`] via `From<LabeledError>`, so `?` works across
//!   the layer boundary.
//! - Attach human-readable `Display` messages; invalid-argument messages
//!   name the offending value and, for correction methods, list the
//!   accepted identifiers.
//! - Implement `From<StatsError> for PyErr`, mapping everything to
//!   `ValueError`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Invalid arguments are reported before any computation starts.
//! - Non-finite data is never an error for the correction adapter; it is
//!   masked and echoed back as NaN. Only `NanPolicy::Raise` in the
//!   regression adapters turns missing values into
//!   [`StatsError::MissingValues`].
//!
//! Testing notes
//! -------------
//! - Unit tests verify `Display` payloads; conversion to `PyErr` is left to
//!   Python-level tests.

use crate::labeled::LabeledError;
use crate::statistical_tests::multitest::methods::MULTIPLE_TESTS;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type StatsResult<T> = Result<T, StatsError>;

/// StatsError — failure conditions for the statistical adapters.
///
/// Variants
/// --------
/// - `Labeled(LabeledError)`
///   Inputs could not be aligned or a named dimension is missing.
/// - `NotArrayLike { arg_index, reason }`
///   The positional argument `arg_index` failed the array-input guard.
/// - `MissingMethod`
///   No multiple-testing method was supplied.
/// - `UnknownMethod { given }`
///   The supplied method is not one of [`MULTIPLE_TESTS`].
/// - `InvalidNanPolicy(given)`
///   Unrecognized NaN-policy string.
/// - `MissingValues { dim }`
///   Non-finite values found along `dim` under `NanPolicy::Raise`.
/// - `InsufficientData { needed, got }`
///   Too few samples along the fit dimension for the requested order.
/// - `InvalidLead { lead, len }`
///   `|lead|` leaves no overlap between the shifted series.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsError {
    // ---- Labeled-array layer ----
    Labeled(LabeledError),

    // ---- Argument validation ----
    NotArrayLike { arg_index: usize, reason: &'static str },
    MissingMethod,
    UnknownMethod { given: String },
    InvalidNanPolicy(String),

    // ---- Data conditions ----
    MissingValues { dim: String },
    InsufficientData { needed: usize, got: usize },
    InvalidLead { lead: isize, len: usize },
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StatsError::Labeled(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::Labeled(err) => write!(f, "{err}"),
            StatsError::NotArrayLike { arg_index, reason } => {
                write!(f, "Argument {arg_index} is not a valid labeled array: {reason}")
            }
            StatsError::MissingMethod => write!(
                f,
                "Please indicate a method using the 'method=...' keyword. Select from {MULTIPLE_TESTS:?}"
            ),
            StatsError::UnknownMethod { given } => write!(
                f,
                "Your method '{given}' is not in the accepted methods: {MULTIPLE_TESTS:?}"
            ),
            StatsError::InvalidNanPolicy(given) => write!(
                f,
                "Invalid nan_policy '{given}'. Expected 'propagate', 'raise' or 'omit'."
            ),
            StatsError::MissingValues { dim } => {
                write!(f, "Input contains non-finite values along '{dim}' and nan_policy='raise'")
            }
            StatsError::InsufficientData { needed, got } => write!(
                f,
                "Need at least {needed} samples along the fit dimension, got {got}"
            ),
            StatsError::InvalidLead { lead, len } => {
                write!(f, "Invalid lead {lead}: must satisfy |lead| < {len}")
            }
        }
    }
}

impl From<LabeledError> for StatsError {
    fn from(err: LabeledError) -> StatsError {
        StatsError::Labeled(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<StatsError> for PyErr {
    fn from(err: StatsError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` payloads for the invalid-argument variants.
    // - Wrapping of `LabeledError` through `From`.
    //
    // They intentionally DO NOT cover:
    // - The `From<StatsError> for PyErr` conversion, which needs the Python
    //   C API and belongs to Python-level tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A missing method must tell the caller which methods exist.
    //
    // Given
    // -----
    // - `StatsError::MissingMethod`.
    //
    // Expect
    // ------
    // - The message mentions every accepted identifier.
    fn missing_method_lists_accepted_methods() {
        // Arrange
        let err = StatsError::MissingMethod;

        // Act
        let msg = err.to_string();

        // Assert
        for method in MULTIPLE_TESTS {
            assert!(msg.contains(method), "message should list '{method}'.\nGot: {msg}");
        }
    }

    #[test]
    // Purpose
    // -------
    // An unknown method echoes the given identifier and the accepted set.
    //
    // Given
    // -----
    // - `UnknownMethod { given: "not_a_method" }`.
    //
    // Expect
    // ------
    // - The message contains "not_a_method" and "fdr_bh".
    fn unknown_method_names_given_value_and_accepted_set() {
        // Arrange
        let err = StatsError::UnknownMethod { given: "not_a_method".into() };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("not_a_method"), "missing given value.\nGot: {msg}");
        assert!(msg.contains("fdr_bh"), "missing accepted set.\nGot: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Labeled-array failures convert transparently and keep their message.
    //
    // Given
    // -----
    // - `LabeledError::MissingDim { dim: "time" }` converted with `into`.
    //
    // Expect
    // ------
    // - `StatsError::Labeled(..)` whose message contains "time", with the
    //   original error as `source`.
    fn labeled_error_converts_and_keeps_source() {
        // Arrange
        let inner = LabeledError::MissingDim { dim: "time".into() };

        // Act
        let err: StatsError = inner.clone().into();

        // Assert
        assert_eq!(err, StatsError::Labeled(inner));
        assert!(err.to_string().contains("time"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    // Purpose
    // -------
    // Lead errors embed the offending values.
    //
    // Given
    // -----
    // - `InvalidLead { lead: -12, len: 10 }`.
    //
    // Expect
    // ------
    // - The message contains "-12" and "10".
    fn numeric_payloads_are_embedded() {
        let lead = StatsError::InvalidLead { lead: -12, len: 10 }.to_string();

        assert!(lead.contains("-12") && lead.contains("10"), "Got: {lead}");
    }
}
