//! Air Quality Service Provider Interface
//!
//! Defines the contracts, data models and error types shared by every layer
//! of the air quality forecast engine:
//!
//! - [`Predictor`]: fit/predict contract for univariate time series models
//! - [`Forecaster`]: per-pollutant forecasting consumed by the query router
//! - [`RecordSource`]: provider of raw historical records
//! - [`ModelError`] / [`AirQualityError`]: algorithm and system level errors

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{Forecaster, Predictor, RecordSource};
pub use error::{AirQualityError, ModelError, ModelResult, Result};
pub use model::{
    Concentrations, ModelOrder, ModelOrders, Pollutant, RawRecord, DATE_COLUMN,
};
