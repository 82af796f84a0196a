//! Gross-to-net pipeline and its numeric inverse.
//!
//! # Forward
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Social contributions on gross (each category and the total rounded) |
//! | 2    | Taxable income: gross - total contributions, minimum 0 |
//! | 3    | Income tax on taxable income (rounded, after credit) |
//! | 4    | Net: gross - total contributions - income tax, rounded |
//!
//! Rounded values from earlier steps feed the later ones. Reported `gross` and
//! `taxable_income` are rounded to cents; the tax is computed on the taxable
//! income at full precision.
//!
//! # Inverse
//!
//! Net is non-decreasing in gross, so [`PayrollEngine::net_to_gross`] bisects
//! over gross until the forward net is within [`NET_TOLERANCE`] of the target,
//! giving up after [`MAX_SEARCH_ITERATIONS`] steps. The default interval is
//! `[max(0, net), max(1.5 × net + 1000, net + 4000)]`; a guess replaces it with
//! `[max(0, 0.5 × guess), 1.5 × guess + 1000]`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::{
//!     ContributionBasis, ContributionConfig, ContributionRule, PayrollEngine, TaxBracket,
//!     TaxConfig,
//! };
//!
//! let contributions = ContributionConfig::new(
//!     ContributionRule::fixed(dec!(297.25)),
//!     ContributionRule::disabled(ContributionBasis::Rate(dec!(0.0295))),
//!     ContributionRule::rate(dec!(0.0387)),
//!     ContributionRule::disabled(ContributionBasis::Rate(dec!(0.005))),
//!     ContributionRule::rate(dec!(0.005)),
//! );
//! let tax = TaxConfig::new(
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
//! let engine = PayrollEngine::new(&contributions, &tax);
//!
//! let forward = engine.gross_to_net(dec!(4500.00));
//! assert_eq!(forward.contributions.total, dec!(493.90));
//! assert_eq!(forward.income_tax, dec!(861.28));
//! assert_eq!(forward.net, dec!(3144.82));
//!
//! let inverse = engine.net_to_gross(dec!(2300.00), None);
//! assert!(inverse.converged);
//! assert_eq!(inverse.guessed_gross, dec!(3085.64));
//! assert_eq!(inverse.net_difference, dec!(0.01));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, trace, warn};

use crate::calculations::common::{max, round_currency};
use crate::calculations::income_tax::ProgressiveTaxCalculator;
use crate::calculations::social::SocialContributionCalculator;
use crate::{ContributionConfig, NetToGrossResult, PayrollResult, TaxConfig};

/// Bisection steps performed before the search settles for its best estimate.
pub const MAX_SEARCH_ITERATIONS: u32 = 60;

/// Largest accepted gap between the computed and the requested net.
pub const NET_TOLERANCE: Decimal = dec!(0.01);

const UPPER_BOUND_FACTOR: Decimal = dec!(1.5);
const UPPER_BOUND_OFFSET: Decimal = dec!(1000);
const UPPER_BOUND_MIN_SPAN: Decimal = dec!(4000);
const GUESS_LOWER_FACTOR: Decimal = dec!(0.5);

/// Composes the contribution and tax calculators over borrowed configs.
///
/// Holds no state of its own, so one engine can serve any number of
/// calculations, including from several threads.
#[derive(Debug, Clone)]
pub struct PayrollEngine<'a> {
    social: SocialContributionCalculator<'a>,
    tax: ProgressiveTaxCalculator<'a>,
}

impl<'a> PayrollEngine<'a> {
    pub fn new(
        contributions: &'a ContributionConfig,
        tax: &'a TaxConfig,
    ) -> Self {
        Self {
            social: SocialContributionCalculator::new(contributions),
            tax: ProgressiveTaxCalculator::new(tax),
        }
    }

    /// Computes the contribution breakdown, tax and net for a monthly gross.
    ///
    /// # Arguments
    ///
    /// * `gross` - Monthly gross income; negative values are accepted
    ///
    /// # Returns
    ///
    /// A [`PayrollResult`] whose parts reconcile:
    /// `net = gross - contributions.total - income_tax`.
    pub fn gross_to_net(
        &self,
        gross: Decimal,
    ) -> PayrollResult {
        let contributions = self.social.calculate(gross);
        let taxable_income = max(gross - contributions.total, Decimal::ZERO);
        let income_tax = self.tax.calculate(taxable_income);
        let net = round_currency(gross - contributions.total - income_tax);

        PayrollResult {
            gross: round_currency(gross),
            contributions,
            taxable_income: round_currency(taxable_income),
            income_tax,
            net,
        }
    }

    /// Searches for the gross whose net is within [`NET_TOLERANCE`] of `target_net`.
    ///
    /// # Arguments
    ///
    /// * `target_net` - The monthly net pay to reach
    /// * `guess` - Expected gross to narrow the search around; `None` or zero
    ///   uses the default interval
    ///
    /// # Returns
    ///
    /// A [`NetToGrossResult`] with the forward calculation at the searched gross.
    /// The search does not fail: when it runs out of iterations, or the answer
    /// lies outside the interval, the result carries the last trial it reached
    /// with `converged` set to `false`.
    pub fn net_to_gross(
        &self,
        target_net: Decimal,
        guess: Option<Decimal>,
    ) -> NetToGrossResult {
        let (mut low, mut high) = Self::search_interval(target_net, guess);
        debug!(target_net = %target_net, low = %low, high = %high, "Starting net-to-gross search");

        for iteration in 1..=MAX_SEARCH_ITERATIONS {
            let mid = Self::midpoint(low, high);
            let trial = self.gross_to_net(mid);
            trace!(iteration, gross = %mid, net = %trial.net, "Bisection step");

            if (trial.net - target_net).abs() <= NET_TOLERANCE {
                debug!(iteration, gross = %mid, "Net-to-gross search converged");
                return Self::search_result(trial, mid, target_net, iteration);
            }

            if trial.net > target_net {
                high = mid;
            } else {
                low = mid;
            }
        }

        let mid = Self::midpoint(low, high);
        let result = Self::search_result(
            self.gross_to_net(mid),
            mid,
            target_net,
            MAX_SEARCH_ITERATIONS,
        );
        if !result.converged {
            warn!(
                target_net = %target_net,
                guessed_gross = %result.guessed_gross,
                net_difference = %result.net_difference,
                "Net-to-gross search did not reach tolerance; returning closest estimate"
            );
        }
        result
    }

    /// Initial `(low, high)` bracket for the gross search. Bounds saturate at
    /// the `Decimal` range.
    fn search_interval(
        target_net: Decimal,
        guess: Option<Decimal>,
    ) -> (Decimal, Decimal) {
        match guess.filter(|g| !g.is_zero()) {
            Some(guess) => (
                max(Decimal::ZERO, guess * GUESS_LOWER_FACTOR),
                guess
                    .saturating_mul(UPPER_BOUND_FACTOR)
                    .saturating_add(UPPER_BOUND_OFFSET),
            ),
            None => (
                max(Decimal::ZERO, target_net),
                max(
                    target_net
                        .saturating_mul(UPPER_BOUND_FACTOR)
                        .saturating_add(UPPER_BOUND_OFFSET),
                    target_net.saturating_add(UPPER_BOUND_MIN_SPAN),
                ),
            ),
        }
    }

    /// Halfway between `low` and `high`, without overflowing near the
    /// `Decimal` limits.
    fn midpoint(
        low: Decimal,
        high: Decimal,
    ) -> Decimal {
        match low.checked_add(high) {
            Some(sum) => sum / Decimal::TWO,
            None => low + (high - low) / Decimal::TWO,
        }
    }

    fn search_result(
        payroll: PayrollResult,
        trial_gross: Decimal,
        target_net: Decimal,
        iterations: u32,
    ) -> NetToGrossResult {
        let difference = payroll.net - target_net;
        NetToGrossResult {
            guessed_gross: round_currency(trial_gross),
            net_difference: round_currency(difference),
            iterations,
            converged: difference.abs() <= NET_TOLERANCE,
            payroll,
        }
    }
}
