//! Error types for dataset ingestion and portfolio assembly
//!
//! The simulators themselves never fail; only the data boundary does.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {dataset}: {source}")]
    Csv {
        dataset: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("json error in {dataset}: {source}")]
    Json {
        dataset: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid record in {dataset}: {reason}")]
    InvalidRecord { dataset: &'static str, reason: String },

    #[error("dataset '{0}' is empty")]
    EmptyDataset(&'static str),

    #[error("customer {0} not found or has no debts")]
    CustomerNotFound(String),

    #[error("cashflow data not found for customer {0}")]
    CashflowMissing(String),

    #[error("invalid date '{value}' in {dataset}")]
    InvalidDate { dataset: &'static str, value: String },
}

impl DataError {
    pub(crate) fn csv(dataset: &'static str) -> impl FnOnce(csv::Error) -> Self {
        move |source| DataError::Csv { dataset, source }
    }

    pub(crate) fn json(dataset: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| DataError::Json { dataset, source }
    }
}
