// libs/shared/database/src/memory.rs
use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use shared_models::{Appointment, IngestionLog, Patient, Setting, STATUS_BOOKED};

use crate::store::{RecordStore, WriteBatch};

#[derive(Default)]
struct Tables {
    appointments: HashMap<String, Appointment>,
    patients: HashMap<String, Patient>,
    settings: HashMap<String, Setting>,
    ingestion_logs: HashMap<String, IngestionLog>,
}

/// In-memory record store used by tests and local runs. Upsert semantics
/// match the REST store: one row per identity, `modified` stamped on
/// every commit.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_setting(&self, name: &str, value: &str) {
        let now = Utc::now();
        self.tables.lock().await.settings.insert(
            name.to_string(),
            Setting {
                name: name.to_string(),
                value: value.to_string(),
                created: now,
                modified: now,
            },
        );
    }

    pub async fn put_patient(&self, patient: Patient) {
        self.tables
            .lock()
            .await
            .patients
            .insert(patient.patient_id.clone(), patient);
    }

    pub async fn put_appointment(&self, appointment: Appointment) {
        self.tables
            .lock()
            .await
            .appointments
            .insert(appointment.id.clone(), appointment);
    }

    pub async fn appointment_count(&self) -> usize {
        self.tables.lock().await.appointments.len()
    }

    pub async fn patient_count(&self) -> usize {
        self.tables.lock().await.patients.len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_setting(&self, name: &str) -> Result<Option<Setting>> {
        Ok(self.tables.lock().await.settings.get(name).cloned())
    }

    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>> {
        Ok(self.tables.lock().await.appointments.get(id).cloned())
    }

    async fn scan_open_appointments(&self, now: DateTime<Utc>) -> Result<Vec<Appointment>> {
        Ok(self
            .tables
            .lock()
            .await
            .appointments
            .values()
            .filter(|a| a.status == STATUS_BOOKED && a.end_time >= now)
            .cloned()
            .collect())
    }

    async fn appointments_for_patient(&self, patient_id: &str) -> Result<Vec<Appointment>> {
        Ok(self
            .tables
            .lock()
            .await
            .appointments
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn scan_patients(&self) -> Result<Vec<Patient>> {
        Ok(self.tables.lock().await.patients.values().cloned().collect())
    }

    async fn get_ingestion_log(&self, name: &str) -> Result<Option<IngestionLog>> {
        Ok(self.tables.lock().await.ingestion_logs.get(name).cloned())
    }

    async fn commit(&self, mut batch: WriteBatch) -> Result<()> {
        let now = Utc::now();
        let mut tables = self.tables.lock().await;
        for mut appointment in batch.appointments.drain(..) {
            appointment.stamp(now);
            tables.appointments.insert(appointment.id.clone(), appointment);
        }
        for mut patient in batch.patients.drain(..) {
            patient.stamp(now);
            tables.patients.insert(patient.patient_id.clone(), patient);
        }
        for mut log in batch.ingestion_logs.drain(..) {
            log.stamp(now);
            tables.ingestion_logs.insert(log.name.clone(), log);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared_models::Provider;

    fn appointment(id: &str, patient_id: &str, start: DateTime<Utc>) -> Appointment {
        Appointment {
            id: id.to_string(),
            patient_id: patient_id.to_string(),
            patient_name: "Test Patient".to_string(),
            location: "600 W Chicago Ave,Chicago,IL".to_string(),
            start_time: start,
            end_time: start + Duration::hours(1),
            status: STATUS_BOOKED.to_string(),
            provider: Provider::Epic,
            ride: Default::default(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    #[tokio::test]
    async fn commit_upserts_by_identity_and_stamps_modified() {
        let store = MemoryStore::new();
        let start = Utc::now() + Duration::hours(1);
        let original = appointment("A-1", "P-1", start);
        let stamped_before = original.modified;

        let mut batch = WriteBatch::default();
        batch.appointments.push(original);
        store.commit(batch).await.unwrap();

        let mut updated = appointment("A-1", "P-1", start + Duration::hours(2));
        updated.status = "Cancelled".to_string();
        let mut batch = WriteBatch::default();
        batch.appointments.push(updated);
        store.commit(batch).await.unwrap();

        assert_eq!(store.appointment_count().await, 1);
        let stored = store.get_appointment("A-1").await.unwrap().unwrap();
        assert_eq!(stored.status, "Cancelled");
        assert!(stored.modified >= stamped_before);
    }

    #[tokio::test]
    async fn open_scan_excludes_ended_and_unbooked_appointments() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.put_appointment(appointment("A-open", "P-1", now + Duration::hours(1))).await;
        store.put_appointment(appointment("A-past", "P-1", now - Duration::hours(3))).await;
        let mut cancelled = appointment("A-cancelled", "P-1", now + Duration::hours(1));
        cancelled.status = "Cancelled".to_string();
        store.put_appointment(cancelled).await;

        let open = store.scan_open_appointments(now).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, "A-open");
    }

    #[tokio::test]
    async fn patient_lookup_filters_on_the_secondary_attribute() {
        let store = MemoryStore::new();
        let start = Utc::now();
        store.put_appointment(appointment("A-1", "P-1", start)).await;
        store.put_appointment(appointment("A-2", "P-1", start)).await;
        store.put_appointment(appointment("A-3", "P-2", start)).await;

        let mut found = store.appointments_for_patient("P-1").await.unwrap();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, "A-1");
        assert_eq!(found[1].id, "A-2");
    }
}
