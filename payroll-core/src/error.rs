use rust_decimal::Decimal;
use thiserror::Error;

use crate::ContributionKind;

/// Errors reported by [`ContributionConfig::validate`](crate::ContributionConfig::validate)
/// and [`TaxConfig::validate`](crate::TaxConfig::validate).
///
/// The calculators never return these. Validation is meant for the boundary
/// where configurations are read from files or flags.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The bracket table is empty.
    #[error("no tax brackets provided")]
    NoBrackets,

    /// A bracket threshold is not strictly greater than the one before it.
    #[error("bracket {index} threshold {threshold} is not greater than the previous threshold")]
    NonIncreasingThreshold { index: usize, threshold: Decimal },

    /// Only the last bracket may be unbounded.
    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedNotLast { index: usize },

    /// A bracket threshold is zero or negative.
    #[error("bracket {index} threshold must be positive, got {threshold}")]
    NonPositiveThreshold { index: usize, threshold: Decimal },

    /// A marginal tax rate is negative.
    #[error("bracket {index} rate must be non-negative, got {rate}")]
    NegativeBracketRate { index: usize, rate: Decimal },

    /// A contribution rate is negative.
    #[error("{kind} contribution rate must be non-negative, got {rate}")]
    NegativeContributionRate { kind: ContributionKind, rate: Decimal },

    /// A fixed contribution amount is negative.
    #[error("{kind} fixed contribution must be non-negative, got {amount}")]
    NegativeFixedAmount {
        kind: ContributionKind,
        amount: Decimal,
    },

    /// The flat tax credit is negative.
    #[error("tax credit must be non-negative, got {0}")]
    NegativeTaxCredit(Decimal),
}
