//! Bracket tables from CSV.
//!
//! ## CSV Format
//!
//! | Column         | Required | Type    | Notes                                   |
//! |----------------|----------|---------|-----------------------------------------|
//! | `upper_annual` | yes      | decimal | Annual upper threshold; empty = no cap  |
//! | `rate`         | yes      | decimal | Marginal rate, e.g. `0.20` for 20%      |
//!
//! Rows must be in ascending threshold order, with at most the last row
//! left uncapped.
//!
//! ```csv
//! upper_annual,rate
//! 13308,0.0
//! 21617,0.20
//! ,0.50
//! ```

use std::io::Read;
use std::path::Path;

use payroll_core::{ConfigError, TaxBracket, TaxConfig};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur when loading a bracket table.
#[derive(Debug, Error)]
pub enum BracketTableError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read bracket table '{}': {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("invalid bracket table: {0}")]
    InvalidTable(#[from] ConfigError),
}

impl From<csv::Error> for BracketTableError {
    fn from(err: csv::Error) -> Self {
        BracketTableError::CsvParse(err.to_string())
    }
}

/// A single row of a bracket table CSV.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_annual: Option<Decimal>,
    pub rate: Decimal,
}

impl BracketRecord {
    fn to_bracket(&self) -> TaxBracket {
        match self.upper_annual {
            Some(upper) => TaxBracket::up_to(upper, self.rate),
            None => TaxBracket::unbounded(self.rate),
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Reads bracket tables and turns them into validated [`TaxConfig`]s.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from any CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketTableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build a tax configuration from parsed records and a flat credit.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError::InvalidTable`] when the resulting
    /// configuration fails [`TaxConfig::validate`].
    pub fn to_tax_config(
        records: &[BracketRecord],
        tax_credit: Decimal,
    ) -> Result<TaxConfig, BracketTableError> {
        let config = TaxConfig::new(
            records.iter().map(BracketRecord::to_bracket).collect(),
            tax_credit,
        );

        if let Err(err) = config.validate() {
            warn!(error = %err, rows = records.len(), "Rejected bracket table");
            return Err(err.into());
        }

        Ok(config)
    }

    /// Read, parse and validate a bracket table file.
    pub fn load_file(
        path: &Path,
        tax_credit: Decimal,
    ) -> Result<TaxConfig, BracketTableError> {
        let file = std::fs::File::open(path).map_err(|source| BracketTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records = Self::parse(file)?;
        Self::to_tax_config(&records, tax_credit)
    }
}
