// libs/reconciliation-cell/src/services/pass.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use shared_database::{RecordStore, WriteBatch};
use shared_models::{Provider, Ride};

use ride_match_cell::{find_matching_ride, merge_rides, LocationResolver, MatchSettings, Trip, TripSource};

use crate::error::ReconcileError;

/// Patient-to-rider associations, split by provider scope. Only patients
/// with a non-empty rider id (after trim) appear.
#[derive(Debug, Default)]
pub struct PatientMapping {
    pub epic: HashMap<String, String>,
    pub veradigm: HashMap<String, String>,
    pub all: HashMap<String, String>,
}

impl PatientMapping {
    pub async fn load(store: &dyn RecordStore) -> Result<Self, ReconcileError> {
        let mut mapping = Self::default();
        for patient in store.scan_patients().await? {
            let Some(rider_id) = patient.rider_id() else {
                continue;
            };
            let rider_id = rider_id.to_string();
            let scope = match patient.provider {
                Provider::Epic => &mut mapping.epic,
                Provider::Veradigm => &mut mapping.veradigm,
            };
            scope.insert(patient.patient_id.clone(), rider_id.clone());
            mapping.all.insert(patient.patient_id, rider_id);
        }
        debug!(
            "Loaded rider mapping: {} epic, {} veradigm",
            mapping.epic.len(),
            mapping.veradigm.len()
        );
        Ok(mapping)
    }
}

/// One full reconciliation sweep: every Booked, future-ending appointment
/// with a rider mapping gets its ride recomputed and merged against the
/// stored value. Appointments with no mapping are left untouched.
pub struct ReconciliationPass {
    store: Arc<dyn RecordStore>,
    trips: Arc<dyn TripSource>,
    resolver: Arc<dyn LocationResolver>,
    settings: Arc<MatchSettings>,
}

impl ReconciliationPass {
    pub fn new(
        store: Arc<dyn RecordStore>,
        trips: Arc<dyn TripSource>,
        resolver: Arc<dyn LocationResolver>,
        settings: Arc<MatchSettings>,
    ) -> Self {
        Self {
            store,
            trips,
            resolver,
            settings,
        }
    }

    pub async fn run(&self, rider_mapping: &HashMap<String, String>) -> Result<(), ReconcileError> {
        let window = self.settings.window().await?;
        let now = Utc::now();
        let mut patient_trips: HashMap<String, Vec<Trip>> = HashMap::new();
        let mut batch = WriteBatch::default();

        for mut appointment in self.store.scan_open_appointments(now).await? {
            let Some(rider_id) = rider_mapping.get(&appointment.patient_id) else {
                continue;
            };
            debug!(
                "Reconciling appointment {} for rider {}",
                appointment.id, rider_id
            );

            // Memoized per pass so a patient with several appointments
            // costs one provider round-trip.
            if !patient_trips.contains_key(&appointment.patient_id) {
                let fetched = self.trips.trips_for(rider_id).await?;
                patient_trips.insert(appointment.patient_id.clone(), fetched);
            }
            let trips = &patient_trips[&appointment.patient_id];

            let new_ride = find_matching_ride(
                self.resolver.as_ref(),
                &appointment.location,
                appointment.start_time,
                trips,
                window,
            )
            .await?;

            // Re-read the stored ride as close to the write as the store
            // allows; a concurrent file ingestion may have enriched it
            // since the scan.
            let existing_ride = self
                .store
                .get_appointment(&appointment.id)
                .await?
                .map(|stored| stored.ride)
                .unwrap_or_else(Ride::no_ride);

            appointment.ride = merge_rides(&existing_ride, new_ride);
            batch.appointments.push(appointment);
        }

        info!("Reconciliation pass writing {} appointments", batch.appointments.len());
        if !batch.is_empty() {
            self.store.commit(batch).await?;
        }
        Ok(())
    }
}
