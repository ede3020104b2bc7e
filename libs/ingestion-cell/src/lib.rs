// libs/ingestion-cell/src/lib.rs
//! # Ingestion Cell
//!
//! Source adapters for the two upstream clinical-scheduling systems: the
//! Epic-family API (pulled per mapped patient) and Veradigm delimited
//! file drops (pushed to object storage). Both produce appointment
//! records committed as one atomic batch per invocation.

pub mod error;
pub mod models;
pub mod services;

pub use error::IngestError;
pub use models::VeradigmRow;
pub use services::epic::{EpicAdapter, EpicClient};
pub use services::object_store::{MemoryObjectStore, ObjectStore, RestObjectStore};
pub use services::veradigm::VeradigmAdapter;
