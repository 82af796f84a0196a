pub mod calculations;
pub mod error;
pub mod models;

pub use calculations::{
    MAX_SEARCH_ITERATIONS, NET_TOLERANCE, PayrollEngine, ProgressiveTaxCalculator,
    SocialContributionCalculator,
};
pub use error::ConfigError;
pub use models::*;
