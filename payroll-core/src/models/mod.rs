mod contribution_config;
mod payroll_result;
mod tax_config;

pub use contribution_config::{
    ContributionBasis, ContributionConfig, ContributionKind, ContributionRule,
};
pub use payroll_result::{ContributionBreakdown, NetToGrossResult, PayrollResult};
pub use tax_config::{BracketLimit, TaxBracket, TaxConfig};
