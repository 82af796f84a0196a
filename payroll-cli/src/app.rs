//! Resolving profiles from command-line options and running calculations.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use payroll_core::{PayrollEngine, PayrollResult};
use payroll_data::{BracketTableLoader, PayrollProfile};
use rust_decimal::Decimal;
use tracing::debug;

/// Where the active profile comes from and what to override in it.
#[derive(Debug, Clone, Default)]
pub struct ProfileOptions {
    /// Built-in profile name, used when no profile file is given.
    pub profile: String,
    pub profile_file: Option<PathBuf>,
    /// Bracket table CSV replacing the profile's table.
    pub brackets: Option<PathBuf>,
    pub tax_credit: Option<Decimal>,
}

impl ProfileOptions {
    /// The profile selected by `--profile-file` or `--profile`, with
    /// overrides applied.
    pub fn resolve(&self) -> anyhow::Result<PayrollProfile> {
        let profile = match &self.profile_file {
            Some(path) => PayrollProfile::from_file(path)
                .with_context(|| format!("loading profile file {}", path.display()))?,
            None => PayrollProfile::builtin(&self.profile)
                .with_context(|| format!("loading built-in profile '{}'", self.profile))?,
        };
        self.apply_overrides(profile)
    }

    /// A built-in profile by name, with the same overrides applied.
    pub fn resolve_builtin(
        &self,
        name: &str,
    ) -> anyhow::Result<PayrollProfile> {
        let profile = PayrollProfile::builtin(name)
            .with_context(|| format!("loading built-in profile '{name}'"))?;
        self.apply_overrides(profile)
    }

    fn apply_overrides(
        &self,
        mut profile: PayrollProfile,
    ) -> anyhow::Result<PayrollProfile> {
        let credit = self.tax_credit.unwrap_or(profile.tax.tax_credit);

        if let Some(path) = &self.brackets {
            let tax = BracketTableLoader::load_file(path, credit)
                .with_context(|| format!("loading bracket table {}", path.display()))?;
            debug!(path = %path.display(), brackets = tax.brackets.len(), "Replaced bracket table");
            return Ok(profile.with_tax(tax));
        }

        if self.tax_credit.is_some() {
            profile.tax.tax_credit = credit;
            profile.tax.validate().context("applying --tax-credit")?;
        }

        Ok(profile)
    }
}

/// One employment in a combined run: an optional built-in profile name and a
/// gross amount, written `uni:3000` or just `3000`.
#[derive(Debug, Clone, PartialEq)]
pub struct Employment {
    pub profile: Option<String>,
    pub gross: Decimal,
}

impl FromStr for Employment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (profile, amount) = match s.split_once(':') {
            Some((profile, amount)) if !profile.trim().is_empty() => {
                (Some(profile.trim().to_string()), amount)
            }
            Some(_) => return Err(anyhow!("missing profile name before ':' in '{s}'")),
            None => (None, s),
        };

        let gross = Decimal::from_str(amount.trim())
            .with_context(|| format!("invalid gross amount in '{s}'"))?;

        Ok(Self { profile, gross })
    }
}

/// Result of one employment in a combined run.
#[derive(Debug, Clone, PartialEq)]
pub struct EmploymentResult {
    pub profile: String,
    pub result: PayrollResult,
}

/// Runs gross-to-net for each employment. Entries without a profile prefix
/// use the profile resolved from `options`.
pub fn run_combined(
    options: &ProfileOptions,
    employments: &[Employment],
) -> anyhow::Result<Vec<EmploymentResult>> {
    let default_profile = options.resolve()?;

    let mut results = Vec::with_capacity(employments.len());
    for employment in employments {
        let profile = match &employment.profile {
            Some(name) => options.resolve_builtin(name)?,
            None => default_profile.clone(),
        };
        let result = PayrollEngine::new(&profile.contributions, &profile.tax)
            .gross_to_net(employment.gross);
        results.push(EmploymentResult {
            profile: profile.name,
            result,
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn raa_options() -> ProfileOptions {
        ProfileOptions {
            profile: "raa".to_string(),
            ..Default::default()
        }
    }

    // =========================================================================
    // ProfileOptions tests
    // =========================================================================

    #[test]
    fn resolve_builtin_by_name() {
        let profile = raa_options().resolve().expect("should resolve");

        assert_eq!(profile.name, "raa");
        assert_eq!(profile.tax.tax_credit, dec!(40.58));
    }

    #[test]
    fn resolve_unknown_builtin_fails_with_context() {
        let options = ProfileOptions {
            profile: "nope".to_string(),
            ..Default::default()
        };

        let err = options.resolve().expect_err("should fail");

        assert!(format!("{err:#}").contains("unknown built-in profile 'nope'"));
    }

    #[test]
    fn tax_credit_override_replaces_credit() {
        let options = ProfileOptions {
            tax_credit: Some(dec!(0)),
            ..raa_options()
        };

        let profile = options.resolve().expect("should resolve");

        assert_eq!(profile.tax.tax_credit, dec!(0));
        assert_eq!(profile.tax.brackets.len(), 6);
    }

    #[test]
    fn negative_tax_credit_override_is_rejected() {
        let options = ProfileOptions {
            tax_credit: Some(dec!(-1)),
            ..raa_options()
        };

        assert!(options.resolve().is_err());
    }

    #[test]
    fn missing_bracket_file_is_reported() {
        let options = ProfileOptions {
            brackets: Some(PathBuf::from("no/such/brackets.csv")),
            ..raa_options()
        };

        let err = options.resolve().expect_err("should fail");

        assert!(format!("{err:#}").contains("no/such/brackets.csv"));
    }

    // =========================================================================
    // Employment tests
    // =========================================================================

    #[test]
    fn employment_without_profile() {
        let employment: Employment = "4500.00".parse().expect("should parse");

        assert_eq!(
            employment,
            Employment {
                profile: None,
                gross: dec!(4500.00),
            }
        );
    }

    #[test]
    fn employment_with_profile() {
        let employment: Employment = "uni: 940.98".parse().expect("should parse");

        assert_eq!(employment.profile.as_deref(), Some("uni"));
        assert_eq!(employment.gross, dec!(940.98));
    }

    #[test]
    fn employment_rejects_bad_amount() {
        assert!("uni:lots".parse::<Employment>().is_err());
        assert!(":100".parse::<Employment>().is_err());
    }

    // =========================================================================
    // run_combined tests
    // =========================================================================

    #[test]
    fn run_combined_mixes_profiles() {
        let employments = vec![
            Employment {
                profile: None,
                gross: dec!(4500.00),
            },
            Employment {
                profile: Some("uni".to_string()),
                gross: dec!(940.98),
            },
        ];

        let results = run_combined(&raa_options(), &employments).expect("should run");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].profile, "raa");
        assert_eq!(results[0].result.net, dec!(3144.82));
        assert_eq!(results[1].profile, "uni");
        assert_eq!(results[1].result.net, dec!(770.95));
    }
}
