//! Progressive income tax over a bracket table.
//!
//! Bracket thresholds are annual figures while the taxable income is monthly,
//! so each threshold applies as `threshold / 12`. Income is split across the
//! brackets in ascending order, each slice taxed at its bracket's marginal rate:
//!
//! ```text
//! tax = Σ max(0, min(upper / 12, income) - lower) × rate
//! ```
//!
//! The walk stops at the first bracket that covers the whole income, so an
//! unbounded top bracket always ends it. The flat credit is then subtracted and
//! the result floored at zero and rounded to cents.
//!
//! Slices are accumulated in annual units and divided by 12 once. Both forms
//! are equal; the single division keeps the sum exact, so a tax landing on a
//! half cent is rounded from its true value. Income too large to multiply by
//! 12 without overflowing a `Decimal` falls back to the monthly thresholds.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::{ProgressiveTaxCalculator, TaxBracket, TaxConfig};
//!
//! let config = TaxConfig::new(
//!     vec![
//!         TaxBracket::up_to(dec!(13308), dec!(0.0)),
//!         TaxBracket::up_to(dec!(21617), dec!(0.20)),
//!         TaxBracket::up_to(dec!(35836), dec!(0.30)),
//!         TaxBracket::up_to(dec!(69166), dec!(0.40)),
//!         TaxBracket::up_to(dec!(103072), dec!(0.48)),
//!         TaxBracket::unbounded(dec!(0.50)),
//!     ],
//!     dec!(40.58),
//! );
//!
//! let tax = ProgressiveTaxCalculator::new(&config).calculate(dec!(4006.10));
//!
//! // 901.865 before the credit, 861.285 after, rounded half-even
//! assert_eq!(tax, dec!(861.28));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::{max, round_currency};
use crate::{BracketLimit, TaxConfig};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Computes monthly income tax against a borrowed [`TaxConfig`].
#[derive(Debug, Clone)]
pub struct ProgressiveTaxCalculator<'a> {
    config: &'a TaxConfig,
}

impl<'a> ProgressiveTaxCalculator<'a> {
    pub fn new(config: &'a TaxConfig) -> Self {
        Self { config }
    }

    /// Calculates the tax owed on one month's taxable income, after the credit.
    ///
    /// # Arguments
    ///
    /// * `taxable_income` - Monthly income after social contributions
    ///
    /// # Returns
    ///
    /// The tax rounded to cents. Never negative; zero or negative income owes
    /// nothing.
    pub fn calculate(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let gross_tax = self.bracket_tax(taxable_income);
        self.apply_credit(gross_tax)
    }

    /// Sums the marginal tax across brackets, before the credit and unrounded.
    ///
    /// Income too large to scale to a year is walked against monthly
    /// thresholds instead.
    fn bracket_tax(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        match taxable_income.checked_mul(MONTHS_PER_YEAR) {
            Some(annual_income) => {
                self.marginal_tax(annual_income, Decimal::ONE) / MONTHS_PER_YEAR
            }
            None => self.marginal_tax(taxable_income, MONTHS_PER_YEAR),
        }
    }

    /// Marginal tax on `income`, with each bracket threshold divided by
    /// `threshold_divisor`.
    fn marginal_tax(
        &self,
        income: Decimal,
        threshold_divisor: Decimal,
    ) -> Decimal {
        let mut lower = Decimal::ZERO;
        let mut tax = Decimal::ZERO;

        for bracket in &self.config.brackets {
            if income <= lower {
                break;
            }

            let upper = match bracket.upper {
                BracketLimit::UpTo(upper) => Some(upper / threshold_divisor),
                BracketLimit::Unbounded => None,
            };
            let segment_upper = upper.map_or(income, |upper| upper.min(income));
            let segment = max(segment_upper - lower, Decimal::ZERO);
            tax += segment * bracket.rate;

            match upper {
                Some(upper) if segment_upper < income => lower = upper,
                _ => break,
            }
        }

        tax
    }

    /// Subtracts the flat credit, floors at zero, and rounds to cents.
    fn apply_credit(
        &self,
        gross_tax: Decimal,
    ) -> Decimal {
        round_currency(max(gross_tax - self.config.tax_credit, Decimal::ZERO))
    }
}
