// libs/ingestion-cell/src/error.rs
use thiserror::Error;

use ride_match_cell::ViaError;

#[derive(Error, Debug)]
pub enum IngestError {
    /// A single upstream record is missing expected fields. Recovered
    /// locally: the record is skipped and the batch proceeds.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Object fetch failed: {0}")]
    ObjectStore(String),

    #[error("Scheduling API error: {0}")]
    Epic(String),

    #[error("Trip provider error: {0}")]
    Via(#[from] ViaError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
