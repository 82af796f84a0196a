use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Upper end of a tax bracket, as an annual figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketLimit {
    /// The bracket ends at this annual income.
    UpTo(Decimal),

    /// Top bracket with no upper end.
    Unbounded,
}

/// One band of a progressive tax table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper: BracketLimit,
    /// Marginal rate as a decimal fraction (0.20 = 20%).
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn up_to(
        upper: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper: BracketLimit::UpTo(upper),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper: BracketLimit::Unbounded,
            rate,
        }
    }
}

/// Progressive bracket table plus a flat credit subtracted from the computed tax.
///
/// Thresholds are annual; the tax calculator applies them to monthly income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxConfig {
    /// Brackets in ascending threshold order.
    pub brackets: Vec<TaxBracket>,
    pub tax_credit: Decimal,
}

impl TaxConfig {
    pub fn new(
        brackets: Vec<TaxBracket>,
        tax_credit: Decimal,
    ) -> Self {
        Self {
            brackets,
            tax_credit,
        }
    }

    /// Checks the shape of the bracket table and the credit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - the table is empty
    /// - a threshold is zero or negative, or not above its predecessor
    /// - an unbounded bracket is followed by another bracket
    /// - a rate or the tax credit is negative
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::{ConfigError, TaxBracket, TaxConfig};
    ///
    /// let config = TaxConfig::new(
    ///     vec![
    ///         TaxBracket::up_to(dec!(18000), dec!(0.20)),
    ///         TaxBracket::up_to(dec!(11000), dec!(0.35)),
    ///     ],
    ///     dec!(0),
    /// );
    ///
    /// assert_eq!(
    ///     config.validate(),
    ///     Err(ConfigError::NonIncreasingThreshold { index: 1, threshold: dec!(11000) })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.brackets.is_empty() {
            return Err(ConfigError::NoBrackets);
        }
        if self.tax_credit < Decimal::ZERO {
            return Err(ConfigError::NegativeTaxCredit(self.tax_credit));
        }

        let last = self.brackets.len() - 1;
        let mut previous: Option<Decimal> = None;
        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO {
                return Err(ConfigError::NegativeBracketRate {
                    index,
                    rate: bracket.rate,
                });
            }
            match bracket.upper {
                BracketLimit::Unbounded if index != last => {
                    return Err(ConfigError::UnboundedNotLast { index });
                }
                BracketLimit::Unbounded => {}
                BracketLimit::UpTo(threshold) => {
                    if threshold <= Decimal::ZERO {
                        return Err(ConfigError::NonPositiveThreshold { index, threshold });
                    }
                    if previous.is_some_and(|p| threshold <= p) {
                        return Err(ConfigError::NonIncreasingThreshold { index, threshold });
                    }
                    previous = Some(threshold);
                }
            }
        }
        Ok(())
    }
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            brackets: vec![
                TaxBracket::up_to(dec!(11000), dec!(0.0)),
                TaxBracket::up_to(dec!(18000), dec!(0.20)),
                TaxBracket::up_to(dec!(31000), dec!(0.35)),
                TaxBracket::up_to(dec!(60000), dec!(0.42)),
                TaxBracket::up_to(dec!(90000), dec!(0.48)),
                TaxBracket::unbounded(dec!(0.50)),
            ],
            tax_credit: Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn two_bracket_config() -> TaxConfig {
        TaxConfig::new(
            vec![
                TaxBracket::up_to(dec!(12000), dec!(0.0)),
                TaxBracket::unbounded(dec!(0.5)),
            ],
            dec!(0),
        )
    }

    #[test]
    fn validate_accepts_default_table() {
        assert_eq!(TaxConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_accepts_table_without_unbounded_top() {
        let config = TaxConfig::new(vec![TaxBracket::up_to(dec!(12000), dec!(0.1))], dec!(0));

        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_table() {
        let config = TaxConfig::new(Vec::new(), dec!(0));

        assert_eq!(config.validate(), Err(ConfigError::NoBrackets));
    }

    #[test]
    fn validate_rejects_equal_thresholds() {
        let config = TaxConfig::new(
            vec![
                TaxBracket::up_to(dec!(12000), dec!(0.0)),
                TaxBracket::up_to(dec!(12000), dec!(0.2)),
            ],
            dec!(0),
        );

        assert_eq!(
            config.validate(),
            Err(ConfigError::NonIncreasingThreshold {
                index: 1,
                threshold: dec!(12000),
            })
        );
    }

    #[test]
    fn validate_rejects_unbounded_before_last() {
        let config = TaxConfig::new(
            vec![
                TaxBracket::unbounded(dec!(0.5)),
                TaxBracket::up_to(dec!(12000), dec!(0.0)),
            ],
            dec!(0),
        );

        assert_eq!(
            config.validate(),
            Err(ConfigError::UnboundedNotLast { index: 0 })
        );
    }

    #[test]
    fn validate_rejects_zero_threshold() {
        let config = TaxConfig::new(vec![TaxBracket::up_to(dec!(0), dec!(0.1))], dec!(0));

        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveThreshold {
                index: 0,
                threshold: dec!(0),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_rate() {
        let config = TaxConfig {
            brackets: vec![
                TaxBracket::up_to(dec!(12000), dec!(0.0)),
                TaxBracket::unbounded(dec!(-0.5)),
            ],
            ..two_bracket_config()
        };

        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativeBracketRate {
                index: 1,
                rate: dec!(-0.5),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_credit() {
        let config = TaxConfig {
            tax_credit: dec!(-40.58),
            ..two_bracket_config()
        };

        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativeTaxCredit(dec!(-40.58)))
        );
    }
}
