//! Record source trait definition.

use crate::error::Result;
use crate::model::RawRecord;

/// Trait for sources of raw historical pollutant records.
///
/// Implementations only deliver rows as text cells. Parsing, validation,
/// ordering and deduplication are the dataset store's job.
pub trait RecordSource: Send + Sync {
    /// Source name, used in log output.
    fn name(&self) -> &str;

    /// Read every record in source order.
    fn records(&self) -> Result<Vec<RawRecord>>;
}
