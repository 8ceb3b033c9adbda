//! Raw input rows as delivered by a record source.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::pollutant::{Concentrations, Pollutant};

/// Name of the timestamp column
pub const DATE_COLUMN: &str = "date";

/// One unparsed input row: column name to cell text.
///
/// Columns other than `date` and the eight pollutants are carried but
/// ignored on load. In particular an `AQI` column is never trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    cells: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record with a date and all eight pollutant values
    pub fn reading(date: &str, values: &Concentrations) -> Self {
        values
            .iter()
            .fold(Self::new().with(DATE_COLUMN, date), |record, (p, v)| {
                record.with_value(p.as_str(), v)
            })
    }

    /// Set a cell from text
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.cells.insert(column.to_string(), value.to_string());
        self
    }

    /// Set a numeric cell. NaN is written as an empty cell.
    pub fn with_value(self, column: &str, value: f64) -> Self {
        if value.is_nan() {
            self.with(column, "")
        } else {
            self.with(column, &value.to_string())
        }
    }

    /// Remove a column
    pub fn without(mut self, column: &str) -> Self {
        self.cells.remove(column);
        self
    }

    /// Cell text for `column`, if the column is present
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Timestamp cell text
    pub fn date(&self) -> Option<&str> {
        self.get(DATE_COLUMN)
    }

    /// Cell text for a pollutant column
    pub fn pollutant(&self, pollutant: Pollutant) -> Option<&str> {
        self.get(pollutant.as_str())
    }

    /// Column names in sorted order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, String>> for RawRecord {
    fn from(cells: BTreeMap<String, String>) -> Self {
        Self { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_populates_all_columns() {
        let values = Concentrations::from_fn(|p| p.index() as f64 + 0.5);
        let record = RawRecord::reading("2024-01-01 00:00", &values);

        assert_eq!(record.date(), Some("2024-01-01 00:00"));
        assert_eq!(record.pollutant(Pollutant::Pm2_5), Some("5.5"));
        assert_eq!(record.columns().count(), 9);
    }

    #[test]
    fn test_nan_becomes_empty_cell() {
        let record = RawRecord::new().with_value("co", f64::NAN);
        assert_eq!(record.get("co"), Some(""));
    }

    #[test]
    fn test_without_removes_column() {
        let record = RawRecord::new().with("no2", "1.0").without("no2");
        assert_eq!(record.get("no2"), None);
    }
}
