//! Text codec for structured columns, and the timestamp column encoding.
//!
//! Structured fields (queries, coordination, property maps, descriptors) are
//! stored as JSON text, one value per column. Timestamps are stored as
//! INTEGER Unix nanoseconds so equality survives the round trip exactly.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{StorageError, StorageResult};

/// Encodes one structured field as JSON text.
pub fn encode<T: Serialize>(value: &T) -> StorageResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decodes one structured column. `column` names the source in errors.
pub fn decode<T: DeserializeOwned>(column: &str, text: &str) -> StorageResult<T> {
    serde_json::from_str(text)
        .map_err(|e| StorageError::InvalidData(format!("column {column}: {e}")))
}

/// Encodes a timestamp as Unix nanoseconds.
///
/// Fails for times outside 1677-09-21..2262-04-11.
pub fn timestamp_to_nanos(ts: DateTime<Utc>) -> StorageResult<i64> {
    ts.timestamp_nanos_opt()
        .ok_or_else(|| StorageError::InvalidData(format!("timestamp {ts} out of range")))
}

#[must_use]
pub fn nanos_to_timestamp(nanos: i64) -> DateTime<Utc> {
    Utc.timestamp_nanos(nanos)
}
