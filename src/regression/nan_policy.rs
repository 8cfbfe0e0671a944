//! regression::nan_policy — handling of missing samples along the fit
//! dimension.

use crate::statistical_tests::errors::StatsError;
use std::str::FromStr;

/// NanPolicy — what a regression adapter does with non-finite samples.
///
/// Variants
/// --------
/// - `Propagate` (default)
///   A lane containing any non-finite `x` or `y` sample yields NaN outputs
///   for that lane.
/// - `Raise`
///   Any non-finite sample along the fit dimension is an error
///   (`StatsError::MissingValues`), reported before computation.
/// - `Omit`
///   Each lane is fitted on its finite `(x, y)` pairs only; fitted values
///   are still evaluated wherever `x` is finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NanPolicy {
    #[default]
    Propagate,
    Raise,
    Omit,
}

impl NanPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NanPolicy::Propagate => "propagate",
            NanPolicy::Raise => "raise",
            NanPolicy::Omit => "omit",
        }
    }
}

impl FromStr for NanPolicy {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "propagate" => Ok(NanPolicy::Propagate),
            "raise" => Ok(NanPolicy::Raise),
            "omit" => Ok(NanPolicy::Omit),
            other => Err(StatsError::InvalidNanPolicy(other.to_string())),
        }
    }
}
