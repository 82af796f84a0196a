use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ContributionKind;

/// Per-category social contributions for one period, each rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    pub pension: Decimal,
    pub unemployment: Decimal,
    pub health: Decimal,
    pub union_levy: Decimal,
    pub housing_levy: Decimal,
    /// Sum of the five categories, rounded again.
    pub total: Decimal,
}

impl ContributionBreakdown {
    pub fn amount(
        &self,
        kind: ContributionKind,
    ) -> Decimal {
        match kind {
            ContributionKind::Pension => self.pension,
            ContributionKind::Unemployment => self.unemployment,
            ContributionKind::Health => self.health,
            ContributionKind::UnionLevy => self.union_levy,
            ContributionKind::HousingLevy => self.housing_levy,
        }
    }

    /// Category name and amount pairs in [`ContributionKind::ALL`] order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, Decimal)> + '_ {
        ContributionKind::ALL
            .into_iter()
            .map(|kind| (kind.as_str(), self.amount(kind)))
    }
}

/// Outcome of a gross-to-net calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    pub gross: Decimal,
    pub contributions: ContributionBreakdown,
    /// Gross minus total contributions, floored at zero.
    pub taxable_income: Decimal,
    pub income_tax: Decimal,
    pub net: Decimal,
}

/// Outcome of a net-to-gross search.
///
/// `payroll` is the forward calculation at the final trial gross. The search
/// never fails; check `converged` or `net_difference` to judge the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetToGrossResult {
    #[serde(flatten)]
    pub payroll: PayrollResult,

    /// Trial gross the search settled on, rounded to cents.
    pub guessed_gross: Decimal,

    /// Resulting net minus the requested net.
    pub net_difference: Decimal,

    /// Bisection steps performed.
    pub iterations: u32,

    /// Whether `net_difference` is within the search tolerance.
    pub converged: bool,
}
