//! Rounding and comparison helpers shared by the calculators.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to exactly two decimal places using banker's rounding.
///
/// Values at exactly half a cent go to the even cent, so 0.125 becomes 0.12 and
/// 0.135 becomes 0.14. Every amount the calculators report passes through here.
///
/// # Arguments
///
/// * `value` - The decimal value to round
///
/// # Returns
///
/// The value rounded to two decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::round_currency;
///
/// assert_eq!(round_currency(dec!(861.285)), dec!(861.28));
/// assert_eq!(round_currency(dec!(861.295)), dec!(861.30));
/// assert_eq!(round_currency(dec!(96.45045)), dec!(96.45));
/// assert_eq!(round_currency(dec!(-0.125)), dec!(-0.12));
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Returns the maximum of two decimal values.
///
/// # Arguments
///
/// * `a` - First decimal value
/// * `b` - Second decimal value
///
/// # Returns
///
/// The larger of `a` and `b`. Used to floor amounts at zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-12.50), dec!(0)), dec!(0));
/// assert_eq!(max(dec!(4006.10), dec!(0)), dec!(4006.10));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
