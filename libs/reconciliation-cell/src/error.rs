// libs/reconciliation-cell/src/error.rs
use thiserror::Error;

use ingestion_cell::IngestError;
use ride_match_cell::ViaError;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("Trip provider error: {0}")]
    Via(#[from] ViaError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
