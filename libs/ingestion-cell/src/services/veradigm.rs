// libs/ingestion-cell/src/services/veradigm.rs
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use shared_database::{RecordStore, WriteBatch};
use shared_models::{Appointment, IngestionLog, Patient, Provider, Ride};

use ride_match_cell::{find_matching_ride, merge_rides, LocationResolver, MatchSettings, Trip, TripSource};

use crate::error::IngestError;
use crate::models::VeradigmRow;
use crate::services::object_store::ObjectStore;

/// Parses a Veradigm file drop into appointment records, matching each
/// row against the patient's candidate trips as it goes. One invocation
/// per uploaded file; all writes land in a single atomic batch.
pub struct VeradigmAdapter {
    store: Arc<dyn RecordStore>,
    objects: Arc<dyn ObjectStore>,
    trips: Arc<dyn TripSource>,
    resolver: Arc<dyn LocationResolver>,
    settings: Arc<MatchSettings>,
}

impl VeradigmAdapter {
    pub fn new(
        store: Arc<dyn RecordStore>,
        objects: Arc<dyn ObjectStore>,
        trips: Arc<dyn TripSource>,
        resolver: Arc<dyn LocationResolver>,
        settings: Arc<MatchSettings>,
    ) -> Self {
        Self {
            store,
            objects,
            trips,
            resolver,
            settings,
        }
    }

    /// Ingests one uploaded file. Re-delivery of an already ingested file
    /// (same key, same source-last-modified) is a no-op; re-ingestion of
    /// a changed file upserts by appointment id, never appends.
    pub async fn ingest(
        &self,
        bucket: &str,
        key: &str,
        rider_mapping: &HashMap<String, String>,
    ) -> Result<(), IngestError> {
        let (body, last_modified) = self.objects.fetch(bucket, key).await?;

        if let Some(log) = self.store.get_ingestion_log(key).await? {
            if log.server_last_modified == last_modified.timestamp() {
                info!("File {} already ingested at this version, skipping", key);
                return Ok(());
            }
        }

        let known_patients: HashSet<String> = self
            .store
            .scan_patients()
            .await?
            .into_iter()
            .map(|patient| patient.patient_id)
            .collect();

        let window = self.settings.window().await?;
        let mut patient_trips: HashMap<String, Vec<Trip>> = HashMap::new();
        let mut new_patients: HashMap<String, String> = HashMap::new();
        let mut batch = WriteBatch::default();

        let mut reader = csv::Reader::from_reader(body.as_bytes());
        for (index, result) in reader.deserialize::<VeradigmRow>().enumerate() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    warn!("Skipping malformed row {} in {}: {}", index + 1, key, e);
                    continue;
                }
            };

            let appointment = match self.build_appointment(&row, rider_mapping, &mut patient_trips, window).await {
                Ok(appointment) => appointment,
                Err(IngestError::MalformedRecord(reason)) => {
                    warn!("Skipping row {} in {}: {}", index + 1, key, reason);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if !known_patients.contains(&appointment.patient_id) {
                new_patients.insert(appointment.patient_id.clone(), appointment.patient_name.clone());
            }
            batch.appointments.push(appointment);
        }

        info!(
            "Veradigm ingestion of {} parsed {} appointments, {} new patients",
            key,
            batch.appointments.len(),
            new_patients.len()
        );

        let now = Utc::now();
        for (patient_id, name) in new_patients {
            batch.patients.push(Patient {
                patient_id,
                name,
                via_rider_id: String::new(),
                provider: Provider::Veradigm,
                created: now,
                modified: now,
            });
        }
        batch.ingestion_logs.push(IngestionLog {
            name: key.to_string(),
            server_last_modified: last_modified.timestamp(),
            created: now,
            modified: now,
        });

        self.store.commit(batch).await?;
        Ok(())
    }

    async fn build_appointment(
        &self,
        row: &VeradigmRow,
        rider_mapping: &HashMap<String, String>,
        patient_trips: &mut HashMap<String, Vec<Trip>>,
        window: ride_match_cell::MatchWindow,
    ) -> Result<Appointment, IngestError> {
        let start_time = row.start_time_utc()?;
        let end_time = start_time + Duration::minutes(row.appointment_duration);
        let location = row.address();

        // Trips are fetched once per patient per run, rider-mapped
        // patients only.
        if let Some(rider_id) = rider_mapping.get(&row.patient_number) {
            if !patient_trips.contains_key(&row.patient_number) {
                let fetched = self.trips.trips_for(rider_id).await?;
                patient_trips.insert(row.patient_number.clone(), fetched);
            }
        }
        let trips = patient_trips
            .get(&row.patient_number)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let new_ride =
            find_matching_ride(self.resolver.as_ref(), &location, start_time, trips, window).await?;

        // Same-trip enrichment captured by an earlier run survives a
        // re-delivered or re-exported file.
        let ride = match self.store.get_appointment(&row.appointment_id).await? {
            Some(existing) => merge_rides(&existing.ride, new_ride),
            None => new_ride,
        };

        let now = Utc::now();
        Ok(Appointment {
            id: row.appointment_id.clone(),
            patient_id: row.patient_number.clone(),
            patient_name: row.patient_name(),
            location,
            start_time,
            end_time,
            status: row.status.clone(),
            provider: Provider::Veradigm,
            ride,
            created: now,
            modified: now,
        })
    }
}
