//! Payroll calculations.
//!
//! Social contributions and progressive income tax are computed by their own
//! calculators; [`PayrollEngine`] composes them into the gross-to-net pipeline
//! and searches it in reverse for net-to-gross.

pub mod common;
pub mod engine;
pub mod income_tax;
pub mod social;

pub use engine::{MAX_SEARCH_ITERATIONS, NET_TOLERANCE, PayrollEngine};
pub use income_tax::ProgressiveTaxCalculator;
pub use social::SocialContributionCalculator;
