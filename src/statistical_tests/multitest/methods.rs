//! multitest::methods — the closed set of correction procedures.
//!
//! Purpose
//! -------
//! Name the accepted multiple-testing correction identifiers and parse
//! caller-supplied strings into [`MultipleTestMethod`], reporting missing or
//! unknown identifiers as invalid-argument errors.
//!
//! Conventions
//! -----------
//! - Identifiers are matched exactly (case-sensitive, no abbreviations);
//!   [`MULTIPLE_TESTS`] is the authoritative list and its order is the order
//!   used in error messages.

use crate::statistical_tests::errors::{StatsError, StatsResult};
use std::str::FromStr;

/// Accepted correction identifiers.
pub const MULTIPLE_TESTS: [&str; 10] = [
    "bonferroni",
    "sidak",
    "holm-sidak",
    "holm",
    "simes-hochberg",
    "hommel",
    "fdr_bh",
    "fdr_by",
    "fdr_tsbh",
    "fdr_tsbky",
];

/// MultipleTestMethod — family-wise error rate and false discovery rate
/// procedures.
///
/// - `Bonferroni`: one-step correction.
/// - `Sidak`: one-step correction.
/// - `HolmSidak`: step-down using Šidák adjustments.
/// - `Holm`: step-down using Bonferroni adjustments.
/// - `SimesHochberg`: step-up (independent tests).
/// - `Hommel`: closed method based on Simes tests (non-negative dependence).
/// - `FdrBh`: Benjamini–Hochberg (non-negative dependence).
/// - `FdrBy`: Benjamini–Yekutieli (arbitrary dependence).
/// - `FdrTsbh`: two-stage FDR with Benjamini–Hochberg first stage.
/// - `FdrTsbky`: two-stage FDR of Benjamini–Krieger–Yekutieli.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultipleTestMethod {
    Bonferroni,
    Sidak,
    HolmSidak,
    Holm,
    SimesHochberg,
    Hommel,
    FdrBh,
    FdrBy,
    FdrTsbh,
    FdrTsbky,
}

impl MultipleTestMethod {
    /// Every method, in [`MULTIPLE_TESTS`] order.
    pub const ALL: [MultipleTestMethod; 10] = [
        MultipleTestMethod::Bonferroni,
        MultipleTestMethod::Sidak,
        MultipleTestMethod::HolmSidak,
        MultipleTestMethod::Holm,
        MultipleTestMethod::SimesHochberg,
        MultipleTestMethod::Hommel,
        MultipleTestMethod::FdrBh,
        MultipleTestMethod::FdrBy,
        MultipleTestMethod::FdrTsbh,
        MultipleTestMethod::FdrTsbky,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MultipleTestMethod::Bonferroni => "bonferroni",
            MultipleTestMethod::Sidak => "sidak",
            MultipleTestMethod::HolmSidak => "holm-sidak",
            MultipleTestMethod::Holm => "holm",
            MultipleTestMethod::SimesHochberg => "simes-hochberg",
            MultipleTestMethod::Hommel => "hommel",
            MultipleTestMethod::FdrBh => "fdr_bh",
            MultipleTestMethod::FdrBy => "fdr_by",
            MultipleTestMethod::FdrTsbh => "fdr_tsbh",
            MultipleTestMethod::FdrTsbky => "fdr_tsbky",
        }
    }

    /// Parse an optional identifier.
    ///
    /// Errors
    /// ------
    /// - `StatsError::MissingMethod` for `None`.
    /// - `StatsError::UnknownMethod { given }` for an identifier outside
    ///   [`MULTIPLE_TESTS`].
    pub fn parse(method: Option<&str>) -> StatsResult<Self> {
        method.ok_or(StatsError::MissingMethod)?.parse()
    }
}

impl FromStr for MultipleTestMethod {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MultipleTestMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| StatsError::UnknownMethod { given: s.to_string() })
    }
}

impl std::fmt::Display for MultipleTestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
