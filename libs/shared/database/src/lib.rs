// libs/shared/database/src/lib.rs
//! Data-access contract for the reconciliation engine, plus the two
//! implementations: a REST-backed key-value store and an in-memory store
//! for tests and local runs.

pub mod memory;
pub mod rest;
pub mod store;

pub use memory::MemoryStore;
pub use rest::RestStore;
pub use store::{RecordStore, WriteBatch};
