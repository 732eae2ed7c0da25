//! Weekly competitive-pressure signals: ingestion, dataset queries, and the
//! shared read-only snapshot used by request handlers.

mod dataset;
mod normalizer;
mod parser;
mod store;

pub use dataset::SignalDataset;
pub use store::SignalStore;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One customer's signals for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSignal {
    pub customer_id: String,
    pub region: String,
    #[serde(rename = "date")]
    pub week: NaiveDate,
    #[serde(rename = "cpi")]
    pub competitive_pressure_index: u8,
    pub contract_days_remaining: i64,
    pub price_sensitivity_flag: bool,
    pub peer_port_count_30d: u32,
    pub weekly_ad_intensity_index: f64,
}

/// Errors raised while loading the signal dataset.
#[derive(Debug, thiserror::Error)]
pub enum SignalLoadError {
    #[error("signal dataset not found at {}", path.display())]
    MissingDataSource { path: PathBuf },
    #[error("failed to read signal dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid signal CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: column '{column}' has unparseable value '{value}'")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: column '{column}' value {value} is outside {expected}")]
    InvalidRange {
        line: u64,
        column: &'static str,
        value: String,
        expected: &'static str,
    },
}
