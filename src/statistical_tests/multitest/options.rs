//! multitest::options — configuration for the correction adapter.
//!
//! Purpose
//! -------
//! Hold the significance level, the chosen method and the pass-through
//! options forwarded verbatim to the 1-D procedure. `MultipleTestsOptions`
//! plays the role of free-form keyword options with a closed, typed set.
//!
//! Conventions
//! -----------
//! - `MultipleTestsOptions::default()` reproduces the procedure defaults
//!   (`is_sorted = false`, `returnsorted = false`, `maxiter = 1`).
//! - `alpha` is not range-checked; it reaches the procedure unchanged, so
//!   `alpha = 0` rejects nothing and `alpha = 1` is accepted.

use crate::statistical_tests::multitest::methods::MultipleTestMethod;

/// Default family-wise error rate / false discovery rate.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// MultipleTestsOptions — options forwarded to the 1-D procedure.
///
/// Fields
/// ------
/// - `is_sorted`: `bool`
///   The finite p-values are already in ascending order; sorting is skipped
///   and results are returned in input order.
/// - `returnsorted`: `bool`
///   Return results in ascending p-value order instead of input order. The
///   adapter scatters them positionally into the finite slots.
/// - `maxiter`: `usize`
///   Iterations of the second stage for `fdr_tsbh` / `fdr_tsbky`; ignored by
///   the other methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultipleTestsOptions {
    pub is_sorted: bool,
    pub returnsorted: bool,
    pub maxiter: usize,
}

impl MultipleTestsOptions {
    pub fn new(is_sorted: bool, returnsorted: bool, maxiter: Option<usize>) -> Self {
        MultipleTestsOptions { is_sorted, returnsorted, maxiter: maxiter.unwrap_or(1) }
    }
}

impl Default for MultipleTestsOptions {
    fn default() -> Self {
        MultipleTestsOptions::new(false, false, None)
    }
}

/// MultipleTestsConfig — parsed inputs for
/// [`multipletests_with`](crate::statistical_tests::multitest::multipletests_with).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultipleTestsConfig {
    pub alpha: f64,
    pub method: MultipleTestMethod,
    pub options: MultipleTestsOptions,
}

impl MultipleTestsConfig {
    pub fn new(alpha: f64, method: MultipleTestMethod, options: MultipleTestsOptions) -> Self {
        MultipleTestsConfig { alpha, method, options }
    }

    /// Default alpha and options for `method`.
    pub fn for_method(method: MultipleTestMethod) -> Self {
        MultipleTestsConfig { alpha: DEFAULT_ALPHA, method, options: MultipleTestsOptions::default() }
    }
}
