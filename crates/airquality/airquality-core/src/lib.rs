//! Air Quality Core
//!
//! Implementations behind the air quality forecast engine:
//!
//! - [`aqi`]: weighted AQI formula
//! - [`dataset`]: ordered, deduplicated readings
//! - [`arima`]: ARIMA(p, d, q) estimation and forecasting
//! - [`model_bank`]: one fitted model per pollutant
//! - [`router`]: exact match, forecast, or unavailable
//! - [`context`]: immutable dataset plus bank, shareable across threads
//! - [`csv_source`]: CSV-backed [`RecordSource`]

pub mod aqi;
pub mod arima;
pub mod context;
pub mod csv_source;
pub mod dataset;
pub mod model_bank;
pub mod router;
pub mod timestamp;

// Re-export from SPI
pub use airquality_spi::{
    AirQualityError, Concentrations, Forecaster, ModelError, ModelOrder, ModelOrders,
    ModelResult, Pollutant, Predictor, RawRecord, RecordSource, Result, DATE_COLUMN,
};

pub use aqi::{aqi, aqi_from_map, aqi_of};
pub use arima::Arima;
pub use context::AirQualityContext;
pub use csv_source::CsvRecordSource;
pub use dataset::{Dataset, Reading, Series};
pub use model_bank::{FittedModel, ModelBank};
pub use router::{ForecastRecord, QueryOutcome, QueryRouter, UnavailableReason, DEFAULT_HORIZON};
pub use timestamp::{format_timestamp, parse_timestamp, TIMESTAMP_FORMAT};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AirQualityContext, AirQualityError, Arima, Dataset, ForecastRecord, ModelBank,
        ModelOrder, ModelOrders, Pollutant, Predictor, QueryOutcome, QueryRouter, Result,
        UnavailableReason,
    };
}
