use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The employee-side social contribution categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    Pension,
    Unemployment,
    Health,
    UnionLevy,
    HousingLevy,
}

impl ContributionKind {
    /// Every category, in breakdown order.
    pub const ALL: [ContributionKind; 5] = [
        Self::Pension,
        Self::Unemployment,
        Self::Health,
        Self::UnionLevy,
        Self::HousingLevy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pension => "pension",
            Self::Unemployment => "unemployment",
            Self::Health => "health",
            Self::UnionLevy => "union_levy",
            Self::HousingLevy => "housing_levy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pension" => Some(Self::Pension),
            "unemployment" => Some(Self::Unemployment),
            "health" => Some(Self::Health),
            "union_levy" => Some(Self::UnionLevy),
            "housing_levy" => Some(Self::HousingLevy),
            _ => None,
        }
    }
}

impl fmt::Display for ContributionKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single contribution category is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionBasis {
    /// A fraction of gross income (0.0387 = 3.87%).
    Rate(Decimal),

    /// A flat amount per period, independent of gross income.
    Fixed(Decimal),
}

impl ContributionBasis {
    /// Maps the numeric "rate plus optional fixed amount" convention onto a basis.
    ///
    /// A positive `fixed` wins; zero or less falls back to `rate`.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::ContributionBasis;
    ///
    /// assert_eq!(
    ///     ContributionBasis::from_rate_and_fixed(dec!(0.1025), dec!(297.25)),
    ///     ContributionBasis::Fixed(dec!(297.25))
    /// );
    /// assert_eq!(
    ///     ContributionBasis::from_rate_and_fixed(dec!(0.1025), dec!(0)),
    ///     ContributionBasis::Rate(dec!(0.1025))
    /// );
    /// ```
    pub fn from_rate_and_fixed(
        rate: Decimal,
        fixed: Decimal,
    ) -> Self {
        if fixed > Decimal::ZERO {
            Self::Fixed(fixed)
        } else {
            Self::Rate(rate)
        }
    }
}

/// Toggle plus charging basis for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRule {
    pub enabled: bool,
    pub basis: ContributionBasis,
}

impl ContributionRule {
    /// An enabled rule charging `rate` of gross.
    pub fn rate(rate: Decimal) -> Self {
        Self {
            enabled: true,
            basis: ContributionBasis::Rate(rate),
        }
    }

    /// An enabled rule charging a flat `amount`.
    pub fn fixed(amount: Decimal) -> Self {
        Self {
            enabled: true,
            basis: ContributionBasis::Fixed(amount),
        }
    }

    /// A switched-off rule. The basis is kept so the category can be
    /// re-enabled without losing its rate.
    pub fn disabled(basis: ContributionBasis) -> Self {
        Self {
            enabled: false,
            basis,
        }
    }
}

/// Which social contributions apply and how each is charged.
///
/// Built once by the caller and shared read-only across calculations.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::{ContributionBasis, ContributionConfig, ContributionRule};
///
/// let config = ContributionConfig::new(
///     ContributionRule::fixed(dec!(297.25)),
///     ContributionRule::disabled(ContributionBasis::Rate(dec!(0.0295))),
///     ContributionRule::rate(dec!(0.0387)),
///     ContributionRule::disabled(ContributionBasis::Rate(dec!(0.005))),
///     ContributionRule::rate(dec!(0.005)),
/// );
///
/// assert!(config.validate().is_ok());
/// assert!(!config.unemployment.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionConfig {
    pub pension: ContributionRule,
    pub unemployment: ContributionRule,
    pub health: ContributionRule,
    pub union_levy: ContributionRule,
    pub housing_levy: ContributionRule,
}

impl ContributionConfig {
    pub fn new(
        pension: ContributionRule,
        unemployment: ContributionRule,
        health: ContributionRule,
        union_levy: ContributionRule,
        housing_levy: ContributionRule,
    ) -> Self {
        Self {
            pension,
            unemployment,
            health,
            union_levy,
            housing_levy,
        }
    }

    /// Returns the rule configured for `kind`.
    pub fn rule(
        &self,
        kind: ContributionKind,
    ) -> &ContributionRule {
        match kind {
            ContributionKind::Pension => &self.pension,
            ContributionKind::Unemployment => &self.unemployment,
            ContributionKind::Health => &self.health,
            ContributionKind::UnionLevy => &self.union_levy,
            ContributionKind::HousingLevy => &self.housing_levy,
        }
    }

    /// Checks that no rate or fixed amount is negative.
    ///
    /// Disabled categories are checked too, since they can be switched back on.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, in [`ContributionKind::ALL`] order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in ContributionKind::ALL {
            match self.rule(kind).basis {
                ContributionBasis::Rate(rate) if rate < Decimal::ZERO => {
                    return Err(ConfigError::NegativeContributionRate { kind, rate });
                }
                ContributionBasis::Fixed(amount) if amount < Decimal::ZERO => {
                    return Err(ConfigError::NegativeFixedAmount { kind, amount });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl Default for ContributionConfig {
    /// Every category enabled at its example rate.
    fn default() -> Self {
        Self {
            pension: ContributionRule::rate(dec!(0.1025)),
            unemployment: ContributionRule::rate(dec!(0.00295)),
            health: ContributionRule::rate(dec!(0.0387)),
            union_levy: ContributionRule::rate(dec!(0.0050)),
            housing_levy: ContributionRule::rate(dec!(0.0050)),
        }
    }
}
