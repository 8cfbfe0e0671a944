//! multitest::procedures — 1-D multiple-testing corrections.
//!
//! Purpose
//! -------
//! Correct a one-dimensional buffer of p-values for multiple testing with
//! the family-wise error rate and false discovery rate procedures named in
//! [`MultipleTestMethod`]. The labeled adapter treats this module as an
//! opaque collaborator: it only ever passes finite, contiguous buffers.
//!
//! Key behaviors
//! -------------
//! - Unless `is_sorted`, p-values are sorted ascending (stable, total order)
//!   before the procedure runs and results are restored to input order
//!   unless `returnsorted` is set.
//! - Corrected p-values are clipped at 1.
//! - Step-down procedures (`holm`, `holm-sidak`) stop rejecting at the first
//!   non-rejected sorted p-value; step-up procedures (`simes-hochberg`,
//!   `fdr_*`) reject everything up to the last rejected one.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite probabilities in [0, 1]; values outside that range
//!   are not checked and flow through the formulas.
//! - Output length equals input length; `reject[i]` and
//!   `pvals_corrected[i]` refer to the same test.
//!
//! Conventions
//! -----------
//! - With `m` tests and 0-based sorted rank `i`, the step factors are
//!   `m − i` (`m, m−1, …, 1`).

use crate::statistical_tests::multitest::{
    methods::MultipleTestMethod, options::MultipleTestsOptions,
};

/// CorrectionOutcome — result of a 1-D correction.
///
/// Fields
/// ------
/// - `reject`: `Vec<bool>`
///   `true` where the null hypothesis is rejected at `alpha`.
/// - `pvals_corrected`: `Vec<f64>`
///   Adjusted p-values, clipped at 1.
/// - `alpha_sidak`: `f64`
///   Šidák-corrected per-test level `1 − (1 − alpha)^(1/m)`.
/// - `alpha_bonf`: `f64`
///   Bonferroni-corrected per-test level `alpha / m`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionOutcome {
    pub reject: Vec<bool>,
    pub pvals_corrected: Vec<f64>,
    pub alpha_sidak: f64,
    pub alpha_bonf: f64,
}

/// Correct `pvals` for multiple testing.
///
/// Parameters
/// ----------
/// - `pvals`: `&[f64]`
///   Uncorrected p-values.
/// - `alpha`: `f64`
///   Family-wise error rate or false discovery rate.
/// - `method`: `MultipleTestMethod`
///   Procedure to apply.
/// - `options`: `&MultipleTestsOptions`
///   Sorting behavior and the two-stage iteration count.
///
/// Returns
/// -------
/// `CorrectionOutcome`
///   Decisions and adjusted p-values in input order (or ascending order
///   when `options.returnsorted` is set).
///
/// Examples
/// --------
/// ```rust
/// use esm_stats::statistical_tests::multitest::{
///     procedures::correct, MultipleTestMethod, MultipleTestsOptions,
/// };
///
/// let out = correct(&[0.01, 0.04], 0.05, MultipleTestMethod::Bonferroni,
///     &MultipleTestsOptions::default());
/// assert_eq!(out.reject, vec![true, false]);
/// assert_eq!(out.pvals_corrected, vec![0.02, 0.08]);
/// ```
pub fn correct(
    pvals: &[f64], alpha: f64, method: MultipleTestMethod, options: &MultipleTestsOptions,
) -> CorrectionOutcome {
    let order = if options.is_sorted { None } else { Some(argsort(pvals)) };
    let sorted: Vec<f64> = match &order {
        Some(idx) => idx.iter().map(|&i| pvals[i]).collect(),
        None => pvals.to_vec(),
    };

    let m = sorted.len();
    let ntests = m as f64;
    let alpha_sidak = 1.0 - (1.0 - alpha).powf(1.0 / ntests);
    let alpha_bonf = alpha / ntests;

    let (reject, mut corrected) = match method {
        MultipleTestMethod::Bonferroni => (
            sorted.iter().map(|&p| p <= alpha_bonf).collect(),
            sorted.iter().map(|&p| p * ntests).collect(),
        ),
        MultipleTestMethod::Sidak => (
            sorted.iter().map(|&p| p <= alpha_sidak).collect(),
            sorted.iter().map(|&p| -(ntests * (-p).ln_1p()).exp_m1()).collect(),
        ),
        MultipleTestMethod::HolmSidak => holm_sidak(&sorted, alpha),
        MultipleTestMethod::Holm => holm(&sorted, alpha),
        MultipleTestMethod::SimesHochberg => simes_hochberg(&sorted, alpha),
        MultipleTestMethod::Hommel => hommel(&sorted, alpha),
        MultipleTestMethod::FdrBh => fdr_correction(&sorted, alpha, false),
        MultipleTestMethod::FdrBy => fdr_correction(&sorted, alpha, true),
        MultipleTestMethod::FdrTsbh => fdr_two_stage(&sorted, alpha, false, options.maxiter),
        MultipleTestMethod::FdrTsbky => fdr_two_stage(&sorted, alpha, true, options.maxiter),
    };
    clip_at_one(&mut corrected);

    let (reject, pvals_corrected) = match order {
        Some(idx) if !options.returnsorted => (unsort(&idx, &reject), unsort(&idx, &corrected)),
        _ => (reject, corrected),
    };

    CorrectionOutcome { reject, pvals_corrected, alpha_sidak, alpha_bonf }
}

/// Stable ascending argsort under `f64::total_cmp`.
fn argsort(values: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    idx
}

fn unsort<T: Copy + Default>(order: &[usize], sorted: &[T]) -> Vec<T> {
    let mut out = vec![T::default(); sorted.len()];
    for (&target, &value) in order.iter().zip(sorted) {
        out[target] = value;
    }
    out
}

fn clip_at_one(values: &mut [f64]) {
    values.iter_mut().filter(|v| **v > 1.0).for_each(|v| *v = 1.0);
}

/// `m − i` for each sorted rank `i`.
fn step_factors(m: usize) -> impl Iterator<Item = f64> {
    (1..=m).rev().map(|k| k as f64)
}

/// Everything from the first non-rejection onwards is not rejected.
fn step_down(notreject: Vec<bool>) -> Vec<bool> {
    let first = notreject.iter().position(|&nr| nr).unwrap_or(notreject.len());
    (0..notreject.len()).map(|i| i < first).collect()
}

/// Everything before the last rejection is rejected.
fn step_up(mut reject: Vec<bool>) -> Vec<bool> {
    if let Some(last) = reject.iter().rposition(|&r| r) {
        reject[..last].iter_mut().for_each(|r| *r = true);
    }
    reject
}

fn cummax(values: &mut [f64]) {
    for i in 1..values.len() {
        values[i] = values[i].max(values[i - 1]);
    }
}

fn reverse_cummin(values: &mut [f64]) {
    for i in (0..values.len().saturating_sub(1)).rev() {
        values[i] = values[i].min(values[i + 1]);
    }
}

fn holm_sidak(sorted: &[f64], alpha: f64) -> (Vec<bool>, Vec<f64>) {
    let m = sorted.len();
    let notreject = sorted
        .iter()
        .zip(step_factors(m))
        .map(|(&p, k)| p > 1.0 - (1.0 - alpha).powf(1.0 / k))
        .collect();
    let mut corrected: Vec<f64> = sorted
        .iter()
        .zip(step_factors(m))
        .map(|(&p, k)| -(k * (-p).ln_1p()).exp_m1())
        .collect();
    cummax(&mut corrected);
    (step_down(notreject), corrected)
}

fn holm(sorted: &[f64], alpha: f64) -> (Vec<bool>, Vec<f64>) {
    let m = sorted.len();
    let notreject = sorted.iter().zip(step_factors(m)).map(|(&p, k)| p > alpha / k).collect();
    let mut corrected: Vec<f64> = sorted.iter().zip(step_factors(m)).map(|(&p, k)| p * k).collect();
    cummax(&mut corrected);
    (step_down(notreject), corrected)
}

fn simes_hochberg(sorted: &[f64], alpha: f64) -> (Vec<bool>, Vec<f64>) {
    let m = sorted.len();
    let reject = sorted.iter().zip(step_factors(m)).map(|(&p, k)| p <= alpha / k).collect();
    let mut corrected: Vec<f64> = sorted.iter().zip(step_factors(m)).map(|(&p, k)| p * k).collect();
    reverse_cummin(&mut corrected);
    (step_up(reject), corrected)
}

fn hommel(sorted: &[f64], alpha: f64) -> (Vec<bool>, Vec<f64>) {
    let m = sorted.len();
    let mut adjusted = sorted.to_vec();
    for size in (2..=m).rev() {
        let split = m - size;
        let scale = size as f64;
        let cim = sorted[split..]
            .iter()
            .enumerate()
            .map(|(j, &p)| scale * p / (j + 1) as f64)
            .fold(f64::INFINITY, f64::min);
        for a in &mut adjusted[split..] {
            *a = a.max(cim);
        }
        for (a, &p) in adjusted[..split].iter_mut().zip(&sorted[..split]) {
            *a = a.max((scale * p).min(cim));
        }
    }
    let reject = adjusted.iter().map(|&a| a <= alpha).collect();
    (reject, adjusted)
}

/// Benjamini–Hochberg on sorted p-values; Benjamini–Yekutieli when
/// `negcorr` is set.
fn fdr_correction(sorted: &[f64], alpha: f64, negcorr: bool) -> (Vec<bool>, Vec<f64>) {
    let m = sorted.len();
    let harmonic: f64 = if negcorr { (1..=m).map(|k| 1.0 / k as f64).sum() } else { 1.0 };
    let ecdf: Vec<f64> = (1..=m).map(|k| k as f64 / m as f64 / harmonic).collect();

    let reject = sorted.iter().zip(&ecdf).map(|(&p, &e)| p <= e * alpha).collect();
    let mut corrected: Vec<f64> = sorted.iter().zip(&ecdf).map(|(&p, &e)| p / e).collect();
    reverse_cummin(&mut corrected);
    clip_at_one(&mut corrected);
    (step_up(reject), corrected)
}

/// Two-stage FDR control. `bky` selects the Benjamini–Krieger–Yekutieli
/// variant, otherwise the first stage is plain Benjamini–Hochberg.
fn fdr_two_stage(sorted: &[f64], alpha: f64, bky: bool, maxiter: usize) -> (Vec<bool>, Vec<f64>) {
    let m = sorted.len();
    let ntests = m as f64;
    let fact = if bky { 1.0 + alpha } else { 1.0 };
    let alpha_prime = alpha / fact;

    let (mut reject, mut corrected) = fdr_correction(sorted, alpha_prime, false);
    let r1 = count(&reject);

    if r1 == 0 || r1 == m {
        corrected.iter_mut().for_each(|c| *c *= fact);
        return (reject, corrected);
    }

    let mut ri_old = r1;
    let mut ntests0 = ntests;
    for it in 0..maxiter {
        ntests0 = ntests - ri_old as f64;
        let alpha_star = alpha_prime * ntests / ntests0;
        (reject, corrected) = fdr_correction(sorted, alpha_star, false);
        let ri = count(&reject);
        if it + 1 >= maxiter || ri == ri_old {
            break;
        }
        ri_old = ri;
    }

    let scale = ntests0 / ntests * if bky { 1.0 + alpha } else { 1.0 };
    corrected.iter_mut().for_each(|c| *c *= scale);
    (reject, corrected)
}

fn count(flags: &[bool]) -> usize {
    flags.iter().filter(|&&f| f).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Hand-computed decisions and adjusted p-values for each procedure
    //   family on small inputs.
    // - Sorting behavior (`is_sorted`, `returnsorted`) and clipping at 1.
    // - The two-stage branches (all rejected, intermediate rejection).
    // -------------------------------------------------------------------------

    const TOL: f64 = 1e-12;
    const P4: [f64; 4] = [0.01, 0.04, 0.20, 0.003];

    fn run(pvals: &[f64], method: MultipleTestMethod) -> CorrectionOutcome {
        correct(pvals, 0.05, method, &MultipleTestsOptions::default())
    }

    fn assert_all_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_relative_eq!(*a, *e, epsilon = TOL);
        }
    }

    #[test]
    // Purpose
    // -------
    // Bonferroni scales by m and compares against alpha / m.
    //
    // Given
    // -----
    // - p = [0.01, 0.04, 0.20, 0.003], alpha = 0.05.
    //
    // Expect
    // ------
    // - corrected = 4p, reject where p ≤ 0.0125, alpha_bonf = 0.0125.
    fn bonferroni_matches_hand_computation() {
        // Act
        let out = run(&P4, MultipleTestMethod::Bonferroni);

        // Assert
        assert_eq!(out.reject, vec![true, false, false, true]);
        assert_all_close(&out.pvals_corrected, &[0.04, 0.16, 0.8, 0.012]);
        assert_relative_eq!(out.alpha_bonf, 0.0125, epsilon = TOL);
        assert_relative_eq!(out.alpha_sidak, 1.0 - 0.95_f64.powf(0.25), epsilon = TOL);
    }

    #[test]
    // Purpose
    // -------
    // Šidák uses 1 − (1 − p)^m.
    //
    // Given
    // -----
    // - p = [0.05, 0.5].
    //
    // Expect
    // ------
    // - corrected = [0.0975, 0.75]; nothing rejected at alpha_sidak ≈ 0.0253.
    fn sidak_matches_closed_form() {
        let out = run(&[0.05, 0.5], MultipleTestMethod::Sidak);

        assert_eq!(out.reject, vec![false, false]);
        assert_all_close(&out.pvals_corrected, &[0.0975, 0.75]);
    }

    #[test]
    // Purpose
    // -------
    // Holm steps down and restores input order.
    //
    // Given
    // -----
    // - p = [0.01, 0.04, 0.20, 0.003] (sorted: 0.003, 0.01, 0.04, 0.20).
    //
    // Expect
    // ------
    // - sorted raw = [0.012, 0.03, 0.08, 0.20]; the two smallest rejected.
    fn holm_steps_down_in_input_order() {
        let out = run(&P4, MultipleTestMethod::Holm);

        assert_eq!(out.reject, vec![true, false, false, true]);
        assert_all_close(&out.pvals_corrected, &[0.03, 0.08, 0.20, 0.012]);
    }

    #[test]
    // Purpose
    // -------
    // Holm–Šidák stops at the first non-rejection and is monotone.
    //
    // Given
    // -----
    // - p = [0.01, 0.04, 0.20, 0.003].
    //
    // Expect
    // ------
    // - The same decisions as Holm; corrected values never below the raw
    //   Šidák step values and non-decreasing in sorted order.
    fn holm_sidak_is_monotone_step_down() {
        let opts = MultipleTestsOptions { returnsorted: true, ..Default::default() };
        let out = correct(&P4, 0.05, MultipleTestMethod::HolmSidak, &opts);

        assert_eq!(out.reject, vec![true, true, false, false]);
        assert_relative_eq!(out.pvals_corrected[0], 1.0 - 0.997_f64.powi(4), epsilon = TOL);
        assert!(out.pvals_corrected.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    // Purpose
    // -------
    // Simes–Hochberg steps up with reverse cumulative minima.
    //
    // Given
    // -----
    // - Sorted p = [0.003, 0.01, 0.04, 0.20] marked `is_sorted`.
    //
    // Expect
    // ------
    // - corrected = [0.012, 0.03, 0.08, 0.20]; the two smallest rejected.
    fn simes_hochberg_steps_up() {
        let opts = MultipleTestsOptions { is_sorted: true, ..Default::default() };
        let out = correct(&[0.003, 0.01, 0.04, 0.20], 0.05, MultipleTestMethod::SimesHochberg, &opts);

        assert_eq!(out.reject, vec![true, true, false, false]);
        assert_all_close(&out.pvals_corrected, &[0.012, 0.03, 0.08, 0.20]);
    }

    #[test]
    // Purpose
    // -------
    // Step-up rejection covers earlier ranks that miss their own threshold.
    //
    // Given
    // -----
    // - Sorted p = [0.03, 0.04]: 0.03 > 0.05/2 but 0.04 ≤ 0.05.
    //
    // Expect
    // ------
    // - Both rejected by Simes–Hochberg and by fdr_bh.
    fn step_up_rejects_below_last_rejection() {
        let hochberg = run(&[0.03, 0.04], MultipleTestMethod::SimesHochberg);
        let bh = run(&[0.03, 0.04], MultipleTestMethod::FdrBh);

        assert_eq!(hochberg.reject, vec![true, true]);
        assert_eq!(bh.reject, vec![true, true]);
    }

    #[test]
    // Purpose
    // -------
    // Hommel's closed procedure on evenly spaced p-values.
    //
    // Given
    // -----
    // - p = [0.01, 0.02, 0.03, 0.04].
    //
    // Expect
    // ------
    // - Every adjusted value equals 0.04 and all are rejected.
    fn hommel_adjusts_evenly_spaced_pvalues() {
        let out = run(&[0.01, 0.02, 0.03, 0.04], MultipleTestMethod::Hommel);

        assert_eq!(out.reject, vec![true; 4]);
        assert_all_close(&out.pvals_corrected, &[0.04; 4]);
    }

    #[test]
    // Purpose
    // -------
    // Benjamini–Hochberg and Benjamini–Yekutieli adjustments.
    //
    // Given
    // -----
    // - p = [0.01, 0.04, 0.20, 0.003] for BH; p = [0.01, 0.04] for BY.
    //
    // Expect
    // ------
    // - BH corrected = [0.02, 0.16/3, 0.20, 0.012], two rejections.
    // - BY divides the ecdf by 1 + 1/2: corrected = [0.03, 0.06].
    fn fdr_bh_and_by_match_hand_computation() {
        let bh = run(&P4, MultipleTestMethod::FdrBh);
        let by = run(&[0.01, 0.04], MultipleTestMethod::FdrBy);

        assert_eq!(bh.reject, vec![true, false, false, true]);
        assert_all_close(&bh.pvals_corrected, &[0.02, 0.16 / 3.0, 0.20, 0.012]);
        assert_all_close(&by.pvals_corrected, &[0.03, 0.06]);
        assert_eq!(by.reject, vec![true, false]);
    }

    #[test]
    // Purpose
    // -------
    // Two-stage procedures when the first stage rejects everything.
    //
    // Given
    // -----
    // - p = [0.001, 0.002], alpha = 0.05.
    //
    // Expect
    // ------
    // - tsbh equals BH ([0.002, 0.002]); tsbky scales BH by 1.05.
    fn two_stage_all_rejected_scales_by_factor() {
        let tsbh = run(&[0.001, 0.002], MultipleTestMethod::FdrTsbh);
        let tsbky = run(&[0.001, 0.002], MultipleTestMethod::FdrTsbky);

        assert_eq!(tsbh.reject, vec![true, true]);
        assert_all_close(&tsbh.pvals_corrected, &[0.002, 0.002]);
        assert_all_close(&tsbky.pvals_corrected, &[0.0021, 0.0021]);
    }

    #[test]
    // Purpose
    // -------
    // Two-stage BH with a partial first-stage rejection re-estimates the
    // number of true nulls.
    //
    // Given
    // -----
    // - p = [0.001, 0.9], alpha = 0.05, maxiter = 1.
    //
    // Expect
    // ------
    // - r1 = 1, so m0 = 1 and corrected = BH · 1/2 = [0.001, 0.45].
    fn two_stage_partial_rejection_rescales_by_null_estimate() {
        let out = run(&[0.001, 0.9], MultipleTestMethod::FdrTsbh);

        assert_eq!(out.reject, vec![true, false]);
        assert_all_close(&out.pvals_corrected, &[0.001, 0.45]);
    }

    #[test]
    // Purpose
    // -------
    // Adjusted values are clipped at 1 and `returnsorted` reorders output.
    //
    // Given
    // -----
    // - p = [0.9, 0.3] with Bonferroni and `returnsorted = true`.
    //
    // Expect
    // ------
    // - Output in ascending-p order: [0.6, 1.0].
    fn clips_at_one_and_returns_sorted_on_request() {
        let opts = MultipleTestsOptions { returnsorted: true, ..Default::default() };
        let out = correct(&[0.9, 0.3], 0.05, MultipleTestMethod::Bonferroni, &opts);

        assert_all_close(&out.pvals_corrected, &[0.6, 1.0]);
        assert_eq!(out.reject, vec![false, false]);
    }
}
