//! Dataset store
//!
//! An immutable, time-ordered table of historical readings. Rows are
//! parsed from [`RawRecord`]s, normalized to UTC, stable-sorted ascending
//! and deduplicated by timestamp (the first occurrence in input order wins).
//! The AQI of every reading is recomputed from its concentrations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use airquality_spi::{
    AirQualityError, Concentrations, Pollutant, RawRecord, RecordSource, Result, DATE_COLUMN,
};

use crate::aqi::aqi_of;
use crate::timestamp::parse_timestamp;

/// One timestamped observation of all tracked pollutants
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    #[serde(rename = "date")]
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    concentrations: Concentrations,
    aqi: f64,
}

impl Reading {
    /// Create a reading; the AQI is derived from `concentrations`
    pub fn new(timestamp: DateTime<Utc>, concentrations: Concentrations) -> Self {
        Self {
            timestamp,
            concentrations,
            aqi: aqi_of(&concentrations),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn concentrations(&self) -> &Concentrations {
        &self.concentrations
    }

    pub fn aqi(&self) -> f64 {
        self.aqi
    }
}

/// A single pollutant's history in time order
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pollutant: Pollutant,
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl Series {
    pub fn pollutant(&self) -> Pollutant {
        self.pollutant
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(timestamp, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter().copied())
    }
}

/// Time-ordered, deduplicated historical readings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    readings: Vec<Reading>,
}

impl Dataset {
    /// Parse, sort and deduplicate raw rows
    ///
    /// Row numbers in errors are zero-based positions in `rows`.
    pub fn load<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut readings = rows
            .into_iter()
            .enumerate()
            .map(|(row, record)| parse_row(row, &record))
            .collect::<Result<Vec<_>>>()?;

        let parsed = readings.len();
        readings.sort_by_key(Reading::timestamp);
        readings.dedup_by_key(|r| r.timestamp);

        let duplicates = parsed - readings.len();
        if duplicates > 0 {
            debug!(duplicates, "dropped duplicate timestamps");
        }
        let degraded = readings.iter().filter(|r| r.aqi.is_nan()).count();
        if degraded > 0 {
            warn!(rows = degraded, "readings with missing concentrations have NaN AQI");
        }

        let dataset = Self { readings };
        info!(
            rows = dataset.len(),
            earliest = ?dataset.earliest_timestamp(),
            latest = ?dataset.latest_timestamp(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Load every record a source delivers
    pub fn from_source(source: &dyn RecordSource) -> Result<Self> {
        let records = source.records()?;
        debug!(source = source.name(), records = records.len(), "read records");
        Self::load(records)
    }

    /// Latest timestamp in the dataset
    pub fn latest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.readings.last().map(Reading::timestamp)
    }

    /// Earliest timestamp in the dataset
    pub fn earliest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.readings.first().map(Reading::timestamp)
    }

    /// Reading recorded exactly at `timestamp`
    pub fn find_exact(&self, timestamp: DateTime<Utc>) -> Option<&Reading> {
        self.readings
            .binary_search_by_key(&timestamp, Reading::timestamp)
            .ok()
            .map(|idx| &self.readings[idx])
    }

    /// One pollutant's values in time order, indexed by timestamp
    pub fn series_for(&self, pollutant: Pollutant) -> Series {
        Series {
            pollutant,
            timestamps: self.readings.iter().map(Reading::timestamp).collect(),
            values: self
                .readings
                .iter()
                .map(|r| r.concentrations.get(pollutant))
                .collect(),
        }
    }

    /// AQI values in time order
    pub fn aqi_series(&self) -> Vec<(DateTime<Utc>, f64)> {
        self.readings.iter().map(|r| (r.timestamp, r.aqi)).collect()
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

fn parse_row(row: usize, record: &RawRecord) -> Result<Reading> {
    let date = record.date().ok_or_else(|| AirQualityError::MissingColumn {
        row,
        column: DATE_COLUMN.to_string(),
    })?;
    let timestamp = parse_timestamp(date).ok_or_else(|| AirQualityError::MalformedInput {
        row,
        reason: format!("invalid timestamp '{}'", date),
    })?;

    let mut values = [0.0; 8];
    for pollutant in Pollutant::ALL {
        values[pollutant.index()] = parse_concentration(row, record, pollutant)?;
    }

    Ok(Reading::new(
        timestamp,
        Concentrations::from_fn(|p| values[p.index()]),
    ))
}

fn parse_concentration(row: usize, record: &RawRecord, pollutant: Pollutant) -> Result<f64> {
    let cell = record
        .pollutant(pollutant)
        .ok_or_else(|| AirQualityError::MissingColumn {
            row,
            column: pollutant.to_string(),
        })?
        .trim();

    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }

    let value: f64 = cell.parse().map_err(|_| AirQualityError::MalformedInput {
        row,
        reason: format!("{} value '{}' is not a number", pollutant, cell),
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(AirQualityError::MalformedInput {
            row,
            reason: format!("{} value {} is not a non-negative finite number", pollutant, value),
        });
    }
    Ok(value)
}
