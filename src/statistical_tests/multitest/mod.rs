//! multitest — multiple-testing correction for labeled p-value arrays.
//!
//! Purpose
//! -------
//! Correct a whole N-d array of p-values as one family of tests, skipping
//! missing entries, with any of the procedures in [`MULTIPLE_TESTS`].
//!
//! Key behaviors
//! -------------
//! - [`multipletests`] is the string-keyed entry point; it validates its
//!   arguments and delegates to the same path as [`multipletests_with`].
//! - [`procedures::correct`] implements the 1-D procedures on a finite
//!   buffer and is usable on its own.
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code combines this with the t-test adapter:
//!
//!   ```rust
//!   use esm_stats::labeled::DataArray;
//!   use esm_stats::statistical_tests::prelude::*;
//!
//!   let m1 = DataArray::from_vec("cell", vec![1.0, 0.1, 0.0]);
//!   let zero = DataArray::scalar(0.0);
//!   let s = DataArray::scalar(1.0);
//!   let n = DataArray::scalar(50.0);
//!
//!   let (_, p) = ttest_ind_from_stats(&m1, &s, &n, &zero, &s, &n)?;
//!   let (reject, _) = multipletests(&p, 0.05, Some("fdr_bh"), MultipleTestsOptions::default())?;
//!   assert_eq!(reject.shape(), &[3]);
//!   # Ok::<(), StatsError>(())
//!   ```
//!
//! Testing notes
//! -------------
//! - Procedure arithmetic is tested in [`procedures`]; masking, labeling
//!   and validation order in [`adapter`].

pub mod adapter;
pub mod methods;
pub mod options;
pub mod procedures;

pub use self::adapter::{multipletests, multipletests_with};
pub use self::methods::{MultipleTestMethod, MULTIPLE_TESTS};
pub use self::options::{MultipleTestsConfig, MultipleTestsOptions, DEFAULT_ALPHA};
pub use self::procedures::CorrectionOutcome;
