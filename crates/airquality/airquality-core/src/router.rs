//! Query router
//!
//! Resolves a timestamp string to one of three outcomes:
//!
//! 1. the string does not parse -> [`UnavailableReason::InvalidFormat`]
//! 2. a reading exists at that instant -> [`QueryOutcome::ExactMatch`]
//! 3. the instant is strictly after the latest reading -> [`QueryOutcome::Forecast`],
//!    otherwise -> [`UnavailableReason::NoDataAtTimestamp`]
//!
//! An exact match always wins, including at the latest timestamp itself.
//!
//! The forecast path asks each pollutant model for `horizon` steps but only
//! uses the first (one step past the end of the data), whatever the distance
//! between the requested instant and the latest reading.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use serde::Serialize;
use tracing::debug;

use airquality_spi::{Forecaster, Pollutant, Result};

use crate::aqi::aqi_from_map;
use crate::dataset::{Dataset, Reading};
use crate::model_bank::ModelBank;
use crate::timestamp::parse_timestamp;

/// Default number of steps requested from each model
pub const DEFAULT_HORIZON: NonZeroUsize = match NonZeroUsize::new(24) {
    Some(horizon) => horizon,
    None => panic!("default horizon must be non-zero"),
};

/// Why a query has no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The timestamp did not match `YYYY-MM-DD HH:MM`
    InvalidFormat,
    /// The timestamp lies within the observed range but has no reading
    NoDataAtTimestamp,
}

/// Synthesized pollutant estimates for an instant past the observed data
///
/// Carries no timestamp of record: the values are model output, not
/// observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRecord {
    values: BTreeMap<Pollutant, f64>,
    aqi: f64,
    horizon: usize,
}

impl ForecastRecord {
    /// Build from a pollutant-value mapping; the AQI is derived from it
    pub fn new(values: BTreeMap<Pollutant, f64>, horizon: usize) -> Self {
        let aqi = aqi_from_map(&values);
        Self {
            values,
            aqi,
            horizon,
        }
    }

    pub fn values(&self) -> &BTreeMap<Pollutant, f64> {
        &self.values
    }

    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        self.values.get(&pollutant).copied()
    }

    pub fn aqi(&self) -> f64 {
        self.aqi
    }

    /// Steps requested from each model
    pub fn horizon(&self) -> usize {
        self.horizon
    }
}

/// Result of resolving a query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// Historical reading at exactly the requested instant
    ExactMatch(Reading),
    /// One-step-ahead model estimate
    Forecast(ForecastRecord),
    /// No answer; consumers treat this as not-found
    Unavailable { reason: UnavailableReason },
}

impl QueryOutcome {
    fn unavailable(reason: UnavailableReason) -> Self {
        QueryOutcome::Unavailable { reason }
    }

    pub fn is_exact_match(&self) -> bool {
        matches!(self, QueryOutcome::ExactMatch(_))
    }

    pub fn is_forecast(&self) -> bool {
        matches!(self, QueryOutcome::Forecast(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, QueryOutcome::Unavailable { .. })
    }

    /// Reason code when unavailable
    pub fn unavailable_reason(&self) -> Option<UnavailableReason> {
        match self {
            QueryOutcome::Unavailable { reason } => Some(*reason),
            _ => None,
        }
    }

    /// AQI of the matched reading or forecast
    pub fn aqi(&self) -> Option<f64> {
        match self {
            QueryOutcome::ExactMatch(reading) => Some(reading.aqi()),
            QueryOutcome::Forecast(forecast) => Some(forecast.aqi()),
            QueryOutcome::Unavailable { .. } => None,
        }
    }

    /// Concentration of one pollutant in the matched reading or forecast
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        match self {
            QueryOutcome::ExactMatch(reading) => Some(reading.concentrations().get(pollutant)),
            QueryOutcome::Forecast(forecast) => forecast.value(pollutant),
            QueryOutcome::Unavailable { .. } => None,
        }
    }
}

/// Routes queries to exact lookup, forecast or rejection
///
/// Stateless per call; borrows the dataset and forecaster it was built with.
pub struct QueryRouter<'a, F: ?Sized = ModelBank> {
    dataset: &'a Dataset,
    forecaster: &'a F,
    horizon: NonZeroUsize,
}

impl<'a, F> QueryRouter<'a, F>
where
    F: Forecaster + ?Sized,
{
    pub fn new(dataset: &'a Dataset, forecaster: &'a F) -> Self {
        Self {
            dataset,
            forecaster,
            horizon: DEFAULT_HORIZON,
        }
    }

    /// Override the default horizon
    pub fn with_horizon(mut self, horizon: NonZeroUsize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn horizon(&self) -> NonZeroUsize {
        self.horizon
    }

    /// Resolve with the router's default horizon
    pub fn resolve(&self, input: &str) -> Result<QueryOutcome> {
        self.resolve_with_horizon(input, self.horizon)
    }

    /// Resolve with an explicit horizon
    ///
    /// `Err` only when the forecaster fails; unavailable answers are `Ok`.
    pub fn resolve_with_horizon(&self, input: &str, horizon: NonZeroUsize) -> Result<QueryOutcome> {
        let Some(requested) = parse_timestamp(input) else {
            debug!(input, "query timestamp did not parse");
            return Ok(QueryOutcome::unavailable(UnavailableReason::InvalidFormat));
        };

        if let Some(reading) = self.dataset.find_exact(requested) {
            return Ok(QueryOutcome::ExactMatch(*reading));
        }

        match self.dataset.latest_timestamp() {
            Some(latest) if requested > latest => {
                debug!(%requested, %latest, horizon = horizon.get(), "forecasting past latest reading");
                self.forecast_next(horizon).map(QueryOutcome::Forecast)
            }
            _ => Ok(QueryOutcome::unavailable(UnavailableReason::NoDataAtTimestamp)),
        }
    }

    /// First forecast step for every pollutant
    pub fn forecast_next(&self, horizon: NonZeroUsize) -> Result<ForecastRecord> {
        let mut values = BTreeMap::new();
        for pollutant in Pollutant::ALL {
            let forecast = self.forecaster.forecast(pollutant, horizon)?;
            if let Some(first) = forecast.first() {
                values.insert(pollutant, *first);
            }
        }
        Ok(ForecastRecord::new(values, horizon.get()))
    }
}
