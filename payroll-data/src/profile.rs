//! Named payroll profiles stored as TOML.
//!
//! A profile carries everything the engine needs: the five contribution
//! categories and the tax table with its credit.
//!
//! ```toml
//! name = "raa"
//! description = "Pension as a flat amount"
//!
//! [contributions.pension]
//! rate = 0.1025
//! fixed = 297.25          # a positive fixed amount takes precedence over rate
//!
//! [contributions.unemployment]
//! enabled = false
//! rate = 0.0295
//!
//! [tax]
//! tax_credit = 40.58
//! brackets = [
//!     { upper = 13308, rate = 0.0 },
//!     { rate = 0.50 },    # no upper: unbounded
//! ]
//! ```
//!
//! Categories left out of `[contributions]` are disabled. Unknown keys are
//! rejected so a misspelt category does not silently drop out.

use std::path::{Path, PathBuf};

use payroll_core::{
    ConfigError, ContributionBasis, ContributionConfig, ContributionRule, TaxBracket, TaxConfig,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Names accepted by [`PayrollProfile::builtin`].
pub const BUILTIN_PROFILES: [&str; 2] = ["raa", "uni"];

const RAA_PROFILE: &str = include_str!("../profiles/raa.toml");
const UNI_PROFILE: &str = include_str!("../profiles/uni.toml");

/// Errors that can occur when loading a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot read profile '{}': {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("unknown built-in profile '{0}' (expected one of: raa, uni)")]
    UnknownBuiltin(String),

    #[error("profile '{name}' is invalid: {source}")]
    Invalid { name: String, source: ConfigError },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    name: String,
    description: Option<String>,
    #[serde(default)]
    contributions: ContributionsSection,
    tax: TaxSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ContributionsSection {
    pension: Option<CategorySection>,
    unemployment: Option<CategorySection>,
    health: Option<CategorySection>,
    union_levy: Option<CategorySection>,
    housing_levy: Option<CategorySection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CategorySection {
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(default)]
    rate: Decimal,
    #[serde(default)]
    fixed: Decimal,
}

fn enabled_by_default() -> bool {
    true
}

impl CategorySection {
    fn to_rule(&self) -> ContributionRule {
        ContributionRule {
            enabled: self.enabled,
            basis: ContributionBasis::from_rate_and_fixed(self.rate, self.fixed),
        }
    }
}

fn category_rule(section: &Option<CategorySection>) -> ContributionRule {
    section
        .as_ref()
        .map(CategorySection::to_rule)
        .unwrap_or_else(|| ContributionRule::disabled(ContributionBasis::Rate(Decimal::ZERO)))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaxSection {
    #[serde(default)]
    tax_credit: Decimal,
    brackets: Vec<BracketSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BracketSection {
    upper: Option<Decimal>,
    rate: Decimal,
}

/// A validated, named pair of contribution and tax configurations.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollProfile {
    pub name: String,
    pub description: Option<String>,
    pub contributions: ContributionConfig,
    pub tax: TaxConfig,
}

impl PayrollProfile {
    /// Parse and validate a profile from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self, ProfileError> {
        let file: ProfileFile = toml::from_str(source)?;

        let contributions = ContributionConfig::new(
            category_rule(&file.contributions.pension),
            category_rule(&file.contributions.unemployment),
            category_rule(&file.contributions.health),
            category_rule(&file.contributions.union_levy),
            category_rule(&file.contributions.housing_levy),
        );

        let brackets = file
            .tax
            .brackets
            .iter()
            .map(|bracket| match bracket.upper {
                Some(upper) => TaxBracket::up_to(upper, bracket.rate),
                None => TaxBracket::unbounded(bracket.rate),
            })
            .collect();
        let tax = TaxConfig::new(brackets, file.tax.tax_credit);

        let validation = contributions.validate().and_then(|()| tax.validate());
        if let Err(source) = validation {
            warn!(profile = %file.name, error = %source, "Rejected payroll profile");
            return Err(ProfileError::Invalid {
                name: file.name,
                source,
            });
        }

        debug!(
            profile = %file.name,
            brackets = tax.brackets.len(),
            "Loaded payroll profile"
        );

        Ok(Self {
            name: file.name,
            description: file.description,
            contributions,
            tax,
        })
    }

    /// Read a profile from disk.
    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let source = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// One of the profiles shipped with the crate; see [`BUILTIN_PROFILES`].
    pub fn builtin(name: &str) -> Result<Self, ProfileError> {
        let source = match name {
            "raa" => RAA_PROFILE,
            "uni" => UNI_PROFILE,
            other => return Err(ProfileError::UnknownBuiltin(other.to_string())),
        };
        Self::from_toml_str(source)
    }

    /// Replaces the tax table, keeping contributions and the name.
    pub fn with_tax(
        self,
        tax: TaxConfig,
    ) -> Self {
        Self { tax, ..self }
    }
}
