//! Contract traits for engine implementations
//!
//! - [`Predictor`]: univariate fit/predict models (ARIMA)
//! - [`Forecaster`]: pollutant-keyed forecasting used by the query router
//! - [`RecordSource`]: where raw historical rows come from

mod forecaster;
mod predictor;
mod record_source;

pub use forecaster::Forecaster;
pub use predictor::Predictor;
pub use record_source::RecordSource;
