//! Employee-side social contributions.
//!
//! Each category is computed independently and rounded to cents, then the
//! rounded amounts are summed and rounded again:
//!
//! | Category state              | Amount                   |
//! |-----------------------------|--------------------------|
//! | disabled                    | 0                        |
//! | enabled, `Fixed(amount)`    | `amount`                 |
//! | enabled, `Rate(rate)`       | `gross × rate`           |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::{
//!     ContributionBasis, ContributionConfig, ContributionRule, SocialContributionCalculator,
//! };
//!
//! let config = ContributionConfig::new(
//!     ContributionRule::fixed(dec!(297.25)),
//!     ContributionRule::disabled(ContributionBasis::Rate(dec!(0.0295))),
//!     ContributionRule::rate(dec!(0.0387)),
//!     ContributionRule::disabled(ContributionBasis::Rate(dec!(0.005))),
//!     ContributionRule::rate(dec!(0.005)),
//! );
//!
//! let breakdown = SocialContributionCalculator::new(&config).calculate(dec!(4500.00));
//!
//! assert_eq!(breakdown.pension, dec!(297.25));
//! assert_eq!(breakdown.health, dec!(174.15));
//! assert_eq!(breakdown.housing_levy, dec!(22.50));
//! assert_eq!(breakdown.total, dec!(493.90));
//! ```

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::common::round_currency;
use crate::{ContributionBasis, ContributionBreakdown, ContributionConfig, ContributionKind};

/// Computes contributions against a borrowed [`ContributionConfig`].
#[derive(Debug, Clone)]
pub struct SocialContributionCalculator<'a> {
    config: &'a ContributionConfig,
}

impl<'a> SocialContributionCalculator<'a> {
    pub fn new(config: &'a ContributionConfig) -> Self {
        Self { config }
    }

    /// Computes every category and the rounded total for one period's gross.
    ///
    /// # Arguments
    ///
    /// * `gross` - Monthly gross income
    ///
    /// # Returns
    ///
    /// A [`ContributionBreakdown`] with each category rounded to cents and the
    /// total summed from the rounded amounts. Negative gross is accepted and
    /// yields negative rate-based amounts.
    pub fn calculate(
        &self,
        gross: Decimal,
    ) -> ContributionBreakdown {
        if gross < Decimal::ZERO {
            warn!(gross = %gross, "Gross income is negative; contributions will be negative");
        }

        let pension = self.category_amount(ContributionKind::Pension, gross);
        let unemployment = self.category_amount(ContributionKind::Unemployment, gross);
        let health = self.category_amount(ContributionKind::Health, gross);
        let union_levy = self.category_amount(ContributionKind::UnionLevy, gross);
        let housing_levy = self.category_amount(ContributionKind::HousingLevy, gross);

        ContributionBreakdown {
            pension,
            unemployment,
            health,
            union_levy,
            housing_levy,
            total: round_currency(pension + unemployment + health + union_levy + housing_levy),
        }
    }

    fn category_amount(
        &self,
        kind: ContributionKind,
        gross: Decimal,
    ) -> Decimal {
        let rule = self.config.rule(kind);
        if !rule.enabled {
            return Decimal::ZERO;
        }

        match rule.basis {
            ContributionBasis::Fixed(amount) => round_currency(amount),
            ContributionBasis::Rate(rate) => round_currency(gross * rate),
        }
    }
}
