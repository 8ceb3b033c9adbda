//! Data models shared across the engine

mod model_order;
mod pollutant;
mod raw_record;

pub use model_order::{ModelOrder, ModelOrders};
pub use pollutant::{Concentrations, Pollutant};
pub use raw_record::{RawRecord, DATE_COLUMN};
