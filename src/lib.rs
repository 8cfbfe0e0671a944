//! esm_stats — hypothesis tests, multiple-testing correction, detrending and
//! correlation broadcast over labeled N-dimensional arrays.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the vectorized statistics to Python via the `_esm_stats`
//! extension module. Gridded data (e.g. `lat`/`lon`/`time` model output)
//! is represented by [`labeled::DataArray`]; every adapter keeps dimension
//! names and coordinates intact and only changes the dimension it reduces
//! or transforms.
//!
//! Key behaviors
//! -------------
//! - [`statistical_tests`] provides the summary-statistics t-test and the
//!   NaN-aware multiple-testing correction.
//! - [`regression`] provides polynomial detrending, linear regression and
//!   lead/lag correlation along a named dimension.
//! - [`labeled`] provides the labeled array, name-based broadcasting and
//!   reversible flattening used by both.
//! - With `python-bindings`, `#[pyclass]` wrappers and the `_esm_stats`
//!   module expose the statistical tests to Python.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue and error mapping.
//! - Errors from core Rust code surface as [`statistical_tests::StatsError`]
//!   and become Python `ValueError`s at the boundary.
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_esm_stats.statistical_tests`, which
//!   is also registered in `sys.modules` as `esm_stats.statistical_tests`.
//! - NumPy inputs receive right-aligned synthesized dimension names, with
//!   size-1 axes squeezed for the t-test so they broadcast (see [`utils`]).
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on the inner modules and can ignore the
//!   items guarded by `python-bindings`.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   the integration tests under `tests/`.

pub mod labeled;
#[cfg(feature = "obs_slog")]
pub mod logging;
pub mod regression;
pub mod statistical_tests;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::PyArrayDyn;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    labeled::DataArray,
    statistical_tests::{
        multitest::{MULTIPLE_TESTS, MultipleTestsOptions, multipletests},
        ttest::{TTestOptions, ttest_ind_from_stats_with},
    },
    utils::{extract_array, extract_labeled, labeled_to_numpy, name_axes, numpy_broadcast_shape},
};

/// TTestIndFromStats — Python-facing wrapper for the vectorized
/// summary-statistics t-test.
///
/// Purpose
/// -------
/// Convert six array-likes, run
/// [`ttest_ind_from_stats_with`](statistical_tests::ttest::ttest_ind_from_stats_with)
/// and keep the labeled results for the `statistic` / `pvalue` getters.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `TTestIndFromStats(mean1, std1, nobs1, mean2, std2, nobs2, equal_var=True)`;
/// arrays broadcast NumPy-style from the trailing axis, scalars broadcast
/// everywhere.
///
/// Notes
/// -----
/// - Size-1 axes are squeezed before labeling, so they stretch against
///   any length; results are returned in the NumPy broadcast shape.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "esm_stats.statistical_tests")]
pub struct TTestIndFromStats {
    statistic: DataArray<f64>,
    pvalue: DataArray<f64>,
    shape: Vec<usize>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl TTestIndFromStats {
    #[new]
    #[pyo3(
        text_signature = "(mean1, std1, nobs1, mean2, std2, nobs2, /, equal_var=True)",
        signature = (mean1, std1, nobs1, mean2, std2, nobs2, equal_var = true)
    )]
    pub fn new<'py>(
        mean1: &Bound<'py, PyAny>, std1: &Bound<'py, PyAny>, nobs1: &Bound<'py, PyAny>,
        mean2: &Bound<'py, PyAny>, std2: &Bound<'py, PyAny>, nobs2: &Bound<'py, PyAny>,
        equal_var: bool,
    ) -> PyResult<TTestIndFromStats> {
        let raw = [mean1, std1, nobs1, mean2, std2, nobs2]
            .into_iter()
            .enumerate()
            .map(|(arg_index, obj)| extract_array(obj, arg_index))
            .collect::<PyResult<Vec<_>>>()?;
        let shapes: Vec<&[usize]> = raw.iter().map(|arr| arr.shape()).collect();
        let shape = numpy_broadcast_shape(&shapes);
        let inputs = raw
            .into_iter()
            .map(|arr| name_axes(arr, true))
            .collect::<Result<Vec<DataArray<f64>>, _>>()?;
        let (statistic, pvalue) = ttest_ind_from_stats_with(
            &inputs[0], &inputs[1], &inputs[2], &inputs[3], &inputs[4], &inputs[5],
            TTestOptions { equal_var },
        )?;
        Ok(TTestIndFromStats { statistic, pvalue, shape })
    }

    /// t statistic at every broadcast position.
    #[getter]
    pub fn statistic<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
        labeled_to_numpy(py, &self.statistic, &self.shape)
    }

    /// Two-sided p-value at every broadcast position.
    #[getter]
    pub fn pvalue<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
        labeled_to_numpy(py, &self.pvalue, &self.shape)
    }
}

/// MultipleTests — Python-facing wrapper for NaN-aware multiple-testing
/// correction over an N-d p-value array.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `MultipleTests(p, alpha=0.05, method=None, is_sorted=False,
/// returnsorted=False, maxiter=1)`.
///
/// Notes
/// -----
/// - `reject` is returned as floats (1.0 / 0.0) with NaN where `p` is not
///   finite, matching `pvals_corrected`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "esm_stats.statistical_tests")]
pub struct MultipleTests {
    reject: DataArray<f64>,
    pvals_corrected: DataArray<f64>,
    shape: Vec<usize>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MultipleTests {
    #[new]
    #[pyo3(
        text_signature = "(p, /, alpha=0.05, method=None, is_sorted=False, returnsorted=False, maxiter=1)",
        signature = (p, alpha = 0.05, method = None, is_sorted = false, returnsorted = false, maxiter = 1)
    )]
    pub fn new<'py>(
        p: &Bound<'py, PyAny>, alpha: f64, method: Option<&str>, is_sorted: bool,
        returnsorted: bool, maxiter: usize,
    ) -> PyResult<MultipleTests> {
        let p = extract_labeled(p, 0)?;
        let shape = p.shape().to_vec();
        let options = MultipleTestsOptions::new(is_sorted, returnsorted, Some(maxiter));
        let (reject, pvals_corrected) = multipletests(&p, alpha, method, options)?;
        Ok(MultipleTests { reject, pvals_corrected, shape })
    }

    /// 1.0 where the hypothesis is rejected, 0.0 where retained, NaN where
    /// masked.
    #[getter]
    pub fn reject<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
        labeled_to_numpy(py, &self.reject, &self.shape)
    }

    /// Corrected p-values, NaN where masked.
    #[getter]
    pub fn pvals_corrected<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
        labeled_to_numpy(py, &self.pvals_corrected, &self.shape)
    }
}

/// _esm_stats — PyO3 module initializer for the Python extension.
///
/// Key behaviors
/// -------------
/// - Create the `statistical_tests` submodule, attach it to `_esm_stats`
///   and register it in `sys.modules` so dotted imports work.
///
/// Errors
/// ------
/// - `PyErr` if creating the submodule or updating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _esm_stats<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let statistical_tests_mod = PyModule::new(_py, "statistical_tests")?;
    statistical_tests(_py, m, &statistical_tests_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("esm_stats.statistical_tests", statistical_tests_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn statistical_tests<'py>(
    _py: Python, esm_stats: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<TTestIndFromStats>()?;
    m.add_class::<MultipleTests>()?;
    m.add("MULTIPLE_TESTS", MULTIPLE_TESTS.to_vec())?;
    esm_stats.add_submodule(m)?;
    Ok(())
}
