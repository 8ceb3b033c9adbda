//! CSV record source
//!
//! Reads rows with a header line into [`RawRecord`]s. Cells are kept as
//! text; parsing happens in the dataset store.

use std::io::Read;
use std::path::{Path, PathBuf};

use airquality_spi::{AirQualityError, RawRecord, RecordSource, Result};

enum Origin {
    File(PathBuf),
    Text(String),
}

/// Record source backed by a CSV file or in-memory CSV text
pub struct CsvRecordSource {
    name: String,
    origin: Origin,
}

impl CsvRecordSource {
    /// Read from a file path when `records` is called
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: path.display().to_string(),
            origin: Origin::File(path),
        }
    }

    /// Read from CSV text held in memory
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            name: "inline".to_string(),
            origin: Origin::Text(text.into()),
        }
    }

    /// Buffer an arbitrary reader
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| AirQualityError::Source(format!("Failed to read CSV: {}", e)))?;
        Ok(Self::from_text(text))
    }

    fn parse<R: Read>(&self, mut reader: csv::Reader<R>) -> Result<Vec<RawRecord>> {
        let records = reader
            .deserialize::<RawRecord>()
            .enumerate()
            .map(|(row, record)| {
                record.map_err(|e| {
                    AirQualityError::Source(format!("{}: bad record {}: {}", self.name, row, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }
}

impl RecordSource for CsvRecordSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn records(&self) -> Result<Vec<RawRecord>> {
        let builder = || {
            let mut builder = csv::ReaderBuilder::new();
            builder.trim(csv::Trim::All).flexible(false);
            builder
        };
        match &self.origin {
            Origin::File(path) => {
                let reader = builder().from_path(path).map_err(|e| {
                    AirQualityError::Source(format!("Failed to open {}: {}", path.display(), e))
                })?;
                self.parse(reader)
            }
            Origin::Text(text) => self.parse(builder().from_reader(text.as_bytes())),
        }
    }
}
