//! Command-line front end for the payroll engine.

pub mod app;
pub mod report;
