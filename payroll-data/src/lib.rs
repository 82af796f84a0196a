//! Loading payroll configurations from files.
//!
//! Profiles bundle a [`ContributionConfig`](payroll_core::ContributionConfig)
//! and a [`TaxConfig`](payroll_core::TaxConfig) in one TOML document. Bracket
//! tables can also come from CSV. Everything loaded here is validated before
//! it is returned.

pub mod brackets;
pub mod profile;

pub use brackets::{BracketRecord, BracketTableError, BracketTableLoader};
pub use profile::{BUILTIN_PROFILES, PayrollProfile, ProfileError};
