// libs/reconciliation-cell/src/lib.rs
//! # Reconciliation Cell
//!
//! Event-driven orchestration of the ride-appointment reconciliation
//! pipeline: a periodic scheduled pass over all Booked, not-yet-ended
//! appointments, and per-file Veradigm ingestion with immediate matching.
//! Two orchestrator variants share the matching and merge logic; the
//! reduced single-source variant exists for controlled rollout and skips
//! external file ingestion and the Epic pull.

pub mod error;
pub mod events;
pub mod services;

pub use error::ReconcileError;
pub use events::TriggerEvent;
pub use services::orchestrator::{build_reconciler, DualSourceReconciler, Reconciler, SingleSourceReconciler};
pub use services::pass::{PatientMapping, ReconciliationPass};
