// libs/reconciliation-cell/src/services/orchestrator.rs
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use shared_config::{AppConfig, ReconcilerMode};
use shared_database::RecordStore;

use ingestion_cell::{EpicAdapter, EpicClient, ObjectStore, RestObjectStore, VeradigmAdapter};
use ride_match_cell::{GeocodingResolver, LocationResolver, MatchSettings, TripSource, ViaClient};

use crate::error::ReconcileError;
use crate::events::TriggerEvent;
use crate::services::pass::{PatientMapping, ReconciliationPass};

/// Single entry point for one reconciliation invocation, dispatched by
/// triggering event shape. The variant is chosen once at process start.
#[async_trait]
pub trait Reconciler: Send + Sync {
    async fn handle(&self, event: TriggerEvent) -> Result<(), ReconcileError>;
}

/// Full dual-source orchestrator: file drops feed the Veradigm adapter,
/// the scheduled fire pulls Epic appointments and then runs the full
/// reconciliation pass across all providers.
pub struct DualSourceReconciler {
    store: Arc<dyn RecordStore>,
    epic: EpicAdapter,
    veradigm: VeradigmAdapter,
    pass: ReconciliationPass,
}

impl DualSourceReconciler {
    pub fn new(
        store: Arc<dyn RecordStore>,
        epic: EpicAdapter,
        veradigm: VeradigmAdapter,
        pass: ReconciliationPass,
    ) -> Self {
        Self {
            store,
            epic,
            veradigm,
            pass,
        }
    }
}

#[async_trait]
impl Reconciler for DualSourceReconciler {
    async fn handle(&self, event: TriggerEvent) -> Result<(), ReconcileError> {
        let mapping = PatientMapping::load(self.store.as_ref()).await?;
        match event {
            TriggerEvent::FileDrop { bucket, key } => {
                info!("Dispatching file drop {}/{}", bucket, key);
                self.veradigm.ingest(&bucket, &key, &mapping.veradigm).await?;
            }
            TriggerEvent::Scheduled => {
                info!("Dispatching scheduled reconciliation");
                self.epic.ingest(&mapping.epic).await?;
                self.pass.run(&mapping.all).await?;
            }
        }
        Ok(())
    }
}

/// Reduced single-source variant for controlled rollout: still exercises
/// the matching and merge logic over already-stored appointments, but
/// skips external file ingestion and the Epic pull.
pub struct SingleSourceReconciler {
    store: Arc<dyn RecordStore>,
    pass: ReconciliationPass,
}

impl SingleSourceReconciler {
    pub fn new(store: Arc<dyn RecordStore>, pass: ReconciliationPass) -> Self {
        Self { store, pass }
    }
}

#[async_trait]
impl Reconciler for SingleSourceReconciler {
    async fn handle(&self, event: TriggerEvent) -> Result<(), ReconcileError> {
        match event {
            TriggerEvent::FileDrop { bucket, key } => {
                info!(
                    "Single-source mode: ignoring file drop {}/{}",
                    bucket, key
                );
            }
            TriggerEvent::Scheduled => {
                let mapping = PatientMapping::load(self.store.as_ref()).await?;
                self.pass.run(&mapping.epic).await?;
            }
        }
        Ok(())
    }
}

/// Builds the orchestrator variant selected by configuration, wiring the
/// per-invocation clients (trip provider, geocoder, object store) that
/// are reused across calls within the invocation's lifetime.
pub fn build_reconciler(
    config: &AppConfig,
    store: Arc<dyn RecordStore>,
) -> Result<Arc<dyn Reconciler>, ReconcileError> {
    let trips: Arc<dyn TripSource> = Arc::new(ViaClient::new(config)?);
    let resolver: Arc<dyn LocationResolver> = Arc::new(GeocodingResolver::new(config));
    let settings = Arc::new(MatchSettings::new(Arc::clone(&store)));
    let pass = ReconciliationPass::new(
        Arc::clone(&store),
        Arc::clone(&trips),
        Arc::clone(&resolver),
        Arc::clone(&settings),
    );

    match config.reconciler_mode {
        ReconcilerMode::Single => Ok(Arc::new(SingleSourceReconciler::new(store, pass))),
        ReconcilerMode::Dual => {
            let epic = EpicAdapter::new(EpicClient::new(config), Arc::clone(&store));
            let objects: Arc<dyn ObjectStore> = Arc::new(RestObjectStore::new(config));
            let veradigm = VeradigmAdapter::new(
                Arc::clone(&store),
                objects,
                trips,
                resolver,
                settings,
            );
            Ok(Arc::new(DualSourceReconciler::new(store, epic, veradigm, pass)))
        }
    }
}
