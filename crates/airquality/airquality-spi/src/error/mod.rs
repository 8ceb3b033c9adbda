//! Error module containing error types and result aliases

mod airquality_error;
mod model_error;

pub use airquality_error::AirQualityError;
pub use model_error::ModelError;

/// Result type for engine operations (load, train, resolve)
pub type Result<T> = std::result::Result<T, AirQualityError>;

/// Result type for individual model operations
pub type ModelResult<T> = std::result::Result<T, ModelError>;
