//! AQI calculator
//!
//! The index is a weighted sum of the eight pollutant concentrations
//! divided by the pollutant count (8), **not** by the sum of the weights
//! (1.10). The divisor is a documented quirk of the deployed formula and is
//! kept as-is: changing it would rescale every published AQI value.
//!
//! A NaN concentration yields a NaN index. There is no partial computation.

use std::collections::BTreeMap;

use airquality_spi::{Concentrations, Pollutant};

/// Divisor applied to the weighted sum
pub const NORMALIZATION_DIVISOR: f64 = 8.0;

/// Weight of a pollutant in the weighted sum
pub fn weight(pollutant: Pollutant) -> f64 {
    match pollutant {
        Pollutant::Co => 0.25,
        Pollutant::No => 0.10,
        Pollutant::No2 => 0.20,
        Pollutant::O3 => 0.10,
        Pollutant::So2 => 0.15,
        Pollutant::Pm2_5 => 0.10,
        Pollutant::Pm10 => 0.10,
        Pollutant::Nh3 => 0.10,
    }
}

/// Compute the AQI from the eight concentrations
#[allow(clippy::too_many_arguments)]
pub fn aqi(co: f64, no: f64, no2: f64, o3: f64, so2: f64, pm2_5: f64, pm10: f64, nh3: f64) -> f64 {
    (0.25 * co
        + 0.10 * no
        + 0.20 * no2
        + 0.10 * o3
        + 0.15 * so2
        + 0.10 * pm2_5
        + 0.10 * pm10
        + 0.10 * nh3)
        / NORMALIZATION_DIVISOR
}

/// Compute the AQI of a concentration record
pub fn aqi_of(values: &Concentrations) -> f64 {
    aqi(
        values.co,
        values.no,
        values.no2,
        values.o3,
        values.so2,
        values.pm2_5,
        values.pm10,
        values.nh3,
    )
}

/// Compute the AQI of a pollutant-value mapping
///
/// Pollutants absent from the mapping count as NaN, so an incomplete
/// mapping yields NaN.
pub fn aqi_from_map(values: &BTreeMap<Pollutant, f64>) -> f64 {
    aqi_of(&Concentrations::from_fn(|p| {
        values.get(&p).copied().unwrap_or(f64::NAN)
    }))
}
