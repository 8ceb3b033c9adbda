//! Air quality engine API
//!
//! Configuration and startup orchestration on top of the core:
//!
//! - [`config`]: [`EngineConfig`] and its builder, TOML loading
//! - [`engine`]: [`AirQualityEngine`], load then train then ready

pub mod config;
pub mod engine;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::AirQualityEngine;

// Re-export from core
pub use airquality_core::{
    aqi, aqi_from_map, aqi_of, format_timestamp, parse_timestamp, AirQualityContext, Arima,
    CsvRecordSource, Dataset, FittedModel, ForecastRecord, ModelBank, QueryOutcome, QueryRouter,
    Reading, Series, UnavailableReason, DEFAULT_HORIZON, TIMESTAMP_FORMAT,
};

// Re-export from SPI
pub use airquality_spi::{
    AirQualityError, Concentrations, Forecaster, ModelError, ModelOrder, ModelOrders,
    ModelResult, Pollutant, Predictor, RawRecord, RecordSource, Result, DATE_COLUMN,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AirQualityContext, AirQualityEngine, AirQualityError, Arima, CsvRecordSource, Dataset,
        EngineConfig, ForecastRecord, ModelOrder, ModelOrders, Pollutant, Predictor, QueryOutcome,
        Result, UnavailableReason,
    };
}
