//! Air Quality Facade
//!
//! High-level API for the air quality forecast engine. Re-exports all public
//! types from the airquality stack for convenient usage.

// Re-export everything from API (which includes SPI and core)
pub use airquality_api::*;

// Explicit re-exports for documentation
pub use airquality_api::prelude;
pub use airquality_core::{arima, context, csv_source, dataset, model_bank, router, timestamp};
