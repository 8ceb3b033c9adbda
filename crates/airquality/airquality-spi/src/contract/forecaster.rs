//! Pollutant-level forecasting contract.

use std::num::NonZeroUsize;

use crate::error::Result;
use crate::model::Pollutant;

/// Source of per-pollutant forecasts for the query router.
///
/// Implementations are built once and read concurrently, hence the
/// `Send + Sync` bound. The model bank is the production implementation;
/// tests substitute fixed-value forecasters.
pub trait Forecaster: Send + Sync {
    /// Forecast `horizon` future values for `pollutant`, starting one step
    /// after the end of the training data.
    fn forecast(&self, pollutant: Pollutant, horizon: NonZeroUsize) -> Result<Vec<f64>>;
}
