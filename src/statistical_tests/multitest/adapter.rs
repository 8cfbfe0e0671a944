//! multitest::adapter — NaN-aware multiple-testing correction over labeled
//! arrays.
//!
//! Purpose
//! -------
//! Apply a 1-D correction procedure to every finite p-value of an N-d
//! labeled array at once, treating the whole array as one family of tests,
//! and return decisions and adjusted p-values with the input's labeling.
//!
//! Key behaviors
//! -------------
//! - Arguments are checked before any work: the array guard on `p`, then
//!   the method identifier. `alpha` is forwarded to the procedure as given.
//! - The array is stacked into one flat buffer, the finite entries are
//!   gathered into a contiguous subset, the procedure runs on that subset
//!   only, and results are scattered back into NaN-prefilled outputs which
//!   are unstacked to the original shape.
//! - If no entry is finite the procedure is not called and both outputs are
//!   entirely NaN.
//!
//! Invariants & assumptions
//! ------------------------
//! - Outputs have the dims, shape, coordinates and name of `p`.
//! - Output positions are NaN exactly where `p` is non-finite.
//! - `reject` is numeric: 1.0 for rejected, 0.0 for retained, NaN for
//!   masked positions.
//! - `p` is only read.
//!
//! Conventions
//! -----------
//! - The flattening order is C order over `p`'s dims; the finite subset
//!   keeps that order, so the procedure sees the same sequence a caller
//!   flattening the finite values of `p` would.
//! - With `returnsorted`, the procedure's ascending-order results are
//!   scattered positionally into the finite slots.

use crate::labeled::DataArray;
use crate::statistical_tests::{
    errors::StatsResult,
    multitest::{
        methods::MultipleTestMethod,
        options::{MultipleTestsConfig, MultipleTestsOptions},
        procedures::correct,
    },
    validation::check_array_input,
};

/// Correct the p-values of a labeled array for multiple testing.
///
/// Parameters
/// ----------
/// - `p`: `&DataArray<f64>`
///   Uncorrected p-values of any shape with at least one dimension;
///   non-finite entries are masked.
/// - `alpha`: `f64`
///   Family-wise error rate or false discovery rate, forwarded unchecked
///   (conventionally [`DEFAULT_ALPHA`](super::options::DEFAULT_ALPHA)).
/// - `method`: `Option<&str>`
///   One of [`MULTIPLE_TESTS`](super::methods::MULTIPLE_TESTS).
/// - `options`: `MultipleTestsOptions`
///   Forwarded unchanged to the 1-D procedure.
///
/// Returns
/// -------
/// `StatsResult<(DataArray<f64>, DataArray<f64>)>`
///   `(reject, pvals_corrected)`, both labeled like `p`.
///
/// Errors
/// ------
/// - `StatsError::NotArrayLike { arg_index: 0, .. }` if `p` fails the array
///   guard.
/// - `StatsError::MissingMethod` if `method` is `None`.
/// - `StatsError::UnknownMethod { given }` if `method` is not accepted.
///
/// Examples
/// --------
/// ```rust
/// use esm_stats::labeled::DataArray;
/// use esm_stats::statistical_tests::multitest::{multipletests, MultipleTestsOptions};
///
/// let p = DataArray::from_vec("station", vec![0.01, 0.04, f64::NAN, 0.20, 0.003]);
/// let (reject, corrected) =
///     multipletests(&p, 0.05, Some("bonferroni"), MultipleTestsOptions::default()).unwrap();
///
/// let reject: Vec<f64> = reject.data().iter().copied().collect();
/// let corrected: Vec<f64> = corrected.data().iter().copied().collect();
/// assert!(reject[2].is_nan());
/// assert_eq!(reject[4], 1.0);
/// assert!((corrected[0] - 0.04).abs() < 1e-12);
/// ```
pub fn multipletests(
    p: &DataArray<f64>, alpha: f64, method: Option<&str>, options: MultipleTestsOptions,
) -> StatsResult<(DataArray<f64>, DataArray<f64>)> {
    check_array_input(p, 0)?;
    let method = MultipleTestMethod::parse(method)?;
    run_correction(p, &MultipleTestsConfig::new(alpha, method, options))
}

/// [`multipletests`] with an already validated configuration.
///
/// Errors
/// ------
/// - `StatsError::NotArrayLike { arg_index: 0, .. }` if `p` fails the array
///   guard.
pub fn multipletests_with(
    p: &DataArray<f64>, config: &MultipleTestsConfig,
) -> StatsResult<(DataArray<f64>, DataArray<f64>)> {
    check_array_input(p, 0)?;
    run_correction(p, config)
}

fn run_correction(
    p: &DataArray<f64>, config: &MultipleTestsConfig,
) -> StatsResult<(DataArray<f64>, DataArray<f64>)> {
    let (flat, index) = p.stack();

    let valid: Vec<usize> =
        flat.iter().enumerate().filter(|(_, v)| v.is_finite()).map(|(i, _)| i).collect();

    let mut reject = vec![f64::NAN; flat.len()];
    let mut corrected = vec![f64::NAN; flat.len()];

    if !valid.is_empty() {
        let subset: Vec<f64> = valid.iter().map(|&i| flat[i]).collect();
        let outcome = correct(&subset, config.alpha, config.method, &config.options);
        for (k, &i) in valid.iter().enumerate() {
            reject[i] = if outcome.reject[k] { 1.0 } else { 0.0 };
            corrected[i] = outcome.pvals_corrected[k];
        }
    }

    #[cfg(feature = "obs_slog")]
    slog::debug!(crate::logging::logger(), "multipletests";
        "method" => config.method.as_str(), "alpha" => config.alpha,
        "n_total" => flat.len(), "n_finite" => valid.len());

    Ok((index.unstack(reject)?, index.unstack(corrected)?))
}
