//! Plain-text rendering of calculation results.

use std::fmt;

use payroll_core::{NET_TOLERANCE, NetToGrossResult, PayrollResult};
use payroll_data::PayrollProfile;
use rust_decimal::Decimal;

use crate::app::EmploymentResult;

const LABEL_WIDTH: usize = 18;
const VALUE_WIDTH: usize = 12;

fn write_row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: impl fmt::Display,
) -> fmt::Result {
    writeln!(
        f,
        "{label:<label_width$}{value:>value_width$}",
        value = value.to_string(),
        label_width = LABEL_WIDTH,
        value_width = VALUE_WIDTH,
    )
}

fn write_money(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    amount: Decimal,
) -> fmt::Result {
    write_row(f, label, format!("{amount:.2}"))
}

/// Breakdown of a single gross-to-net calculation.
pub struct PayslipReport<'a>(pub &'a PayrollResult);

impl fmt::Display for PayslipReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let result = self.0;

        write_money(f, "Gross", result.gross)?;
        for (name, amount) in result.contributions.entries() {
            write_money(f, &format!("  {name}"), amount)?;
        }
        write_money(f, "Contributions", result.contributions.total)?;
        write_money(f, "Taxable income", result.taxable_income)?;
        write_money(f, "Income tax", result.income_tax)?;
        write_money(f, "Net", result.net)
    }
}

/// Breakdown at the searched gross plus the search outcome.
pub struct SearchReport<'a>(pub &'a NetToGrossResult);

impl fmt::Display for SearchReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let search = self.0;

        write!(f, "{}", PayslipReport(&search.payroll))?;
        write_money(f, "Searched gross", search.guessed_gross)?;
        write_money(f, "Net difference", search.net_difference)?;
        write_row(f, "Iterations", search.iterations)?;

        if !search.converged {
            writeln!(
                f,
                "warning: net is not within {NET_TOLERANCE} of the target after {} iterations",
                search.iterations
            )?;
        }

        Ok(())
    }
}

/// Each employment's breakdown followed by the summed net.
pub struct CombinedReport<'a>(pub &'a [EmploymentResult]);

impl fmt::Display for CombinedReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for (index, entry) in self.0.iter().enumerate() {
            writeln!(f, "[{}] {}", index + 1, entry.profile)?;
            write!(f, "{}", PayslipReport(&entry.result))?;
            writeln!(f)?;
        }

        let total: Decimal = self.0.iter().map(|entry| entry.result.net).sum();
        write_money(f, "Combined net", total)
    }
}

/// Names and descriptions of the available profiles.
pub struct ProfileListing<'a>(pub &'a [PayrollProfile]);

impl fmt::Display for ProfileListing<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for profile in self.0 {
            match &profile.description {
                Some(description) => writeln!(f, "{:<8}{description}", profile.name)?,
                None => writeln!(f, "{}", profile.name)?,
            }
        }
        Ok(())
    }
}
