//! statistical_tests — hypothesis tests broadcast over labeled arrays.
//!
//! Purpose
//! -------
//! Collect the vectorized hypothesis-testing adapters and their shared
//! infrastructure: a two-sample t-test computed from summary statistics,
//! NaN-aware multiple-testing correction, the array-input guard and the
//! error type used across the crate's adapters.
//!
//! Key behaviors
//! -------------
//! - [`ttest_ind_from_stats`] aligns six summary-statistic arrays by
//!   dimension name and returns the t statistic and two-sided p-value at
//!   every broadcast position.
//! - [`multipletests`] corrects every finite p-value of an array as one
//!   family and returns decisions and adjusted p-values with NaN at masked
//!   positions.
//! - [`check_array_input`] is the guard clause run before any adapter work.
//! - [`StatsError`] / [`StatsResult`] are shared with the `regression`
//!   adapters and convert to Python `ValueError` under `python-bindings`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Adapters never modify their inputs and return freshly labeled arrays.
//! - Invalid arguments are reported before computation; missing data is
//!   masked, never an error, in the correction adapter.
//! - The t-test and correction adapters are independent; callers compose
//!   them.
//!
//! Conventions
//! -----------
//! - Error messages are phrased in terms of the offending argument and, for
//!   correction methods, list the accepted identifiers.
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code imports the main surface as:
//!
//!   ```rust
//!   use esm_stats::statistical_tests::prelude::*;
//!   ```
//!
//!   and reaches into [`multitest::procedures`] only for the 1-D
//!   procedures.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`errors`] verify `Display` payloads.
//! - Unit tests in [`validation`] cover the guard's accept/reject cases.
//! - Unit tests in [`ttest`] compare broadcast output to the scalar kernel.
//! - Unit tests in [`multitest`] cover masking, validation order and each
//!   procedure family.

pub mod errors;
pub mod multitest;
pub mod ttest;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{StatsError, StatsResult};
pub use self::multitest::{
    multipletests, multipletests_with, MultipleTestMethod, MultipleTestsConfig,
    MultipleTestsOptions, MULTIPLE_TESTS,
};
pub use self::ttest::{ttest_ind_from_stats, ttest_ind_from_stats_with, TTestOptions};
pub use self::validation::check_array_input;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use esm_stats::statistical_tests::prelude::*;
//
// to import the main statistical-testing surface in a single line.

pub mod prelude {
    pub use super::errors::{StatsError, StatsResult};
    pub use super::multitest::{
        multipletests, MultipleTestMethod, MultipleTestsConfig, MultipleTestsOptions,
    };
    pub use super::ttest::{ttest_ind_from_stats, ttest_ind_from_stats_with, TTestOptions};
}
