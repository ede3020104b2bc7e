// libs/ingestion-cell/src/services/mod.rs

pub mod epic;
pub mod object_store;
pub mod veradigm;

pub use epic::{EpicAdapter, EpicClient};
pub use object_store::{MemoryObjectStore, ObjectStore, RestObjectStore};
pub use veradigm::VeradigmAdapter;
