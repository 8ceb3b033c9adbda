//! Engine error types
//!
//! Load-time and fit-time failures abort startup. Query-time "unavailable"
//! outcomes are ordinary values and never appear here.

use thiserror::Error;

use super::model_error::ModelError;
use crate::model::{ModelOrder, Pollutant};

/// Errors raised while building or querying the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AirQualityError {
    /// A row could not be parsed (bad timestamp or non-numeric cell)
    #[error("Malformed input at row {row}: {reason}")]
    MalformedInput { row: usize, reason: String },

    /// A required column is absent from a row
    #[error("Missing column '{column}' at row {row}")]
    MissingColumn { row: usize, column: String },

    /// A pollutant model could not be fitted
    #[error("Failed to fit ARIMA{order} for '{pollutant}': {source}")]
    ModelFit {
        pollutant: Pollutant,
        order: ModelOrder,
        #[source]
        source: ModelError,
    },

    /// Model fitting overran the configured startup budget
    #[error("Model fitting took {elapsed_ms} ms, exceeding the {budget_ms} ms budget")]
    FitBudgetExceeded { elapsed_ms: u128, budget_ms: u64 },

    /// A fitted model failed to produce a forecast
    #[error("Forecast failed for '{pollutant}': {source}")]
    Forecast {
        pollutant: Pollutant,
        #[source]
        source: ModelError,
    },

    /// The record source could not be read
    #[error("Record source error: {0}")]
    Source(String),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
