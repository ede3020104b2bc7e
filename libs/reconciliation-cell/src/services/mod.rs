// libs/reconciliation-cell/src/services/mod.rs

pub mod orchestrator;
pub mod pass;

pub use orchestrator::{build_reconciler, DualSourceReconciler, Reconciler, SingleSourceReconciler};
pub use pass::{PatientMapping, ReconciliationPass};
