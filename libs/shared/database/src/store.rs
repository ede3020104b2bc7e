// libs/shared/database/src/store.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shared_models::{Appointment, IngestionLog, Patient, Setting};

/// Records committed together by one adapter invocation. The batch is
/// applied atomically: either every record lands or the invocation fails
/// and is retried wholesale by the host scheduler.
#[derive(Debug, Default)]
pub struct WriteBatch {
    pub appointments: Vec<Appointment>,
    pub patients: Vec<Patient>,
    pub ingestion_logs: Vec<IngestionLog>,
}

impl WriteBatch {
    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty() && self.patients.is_empty() && self.ingestion_logs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.appointments.len() + self.patients.len() + self.ingestion_logs.len()
    }
}

/// Key-value record store with secondary lookup by patient id and an
/// atomic batched-write primitive. The persistence engine itself lives
/// behind this seam.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_setting(&self, name: &str) -> Result<Option<Setting>>;

    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>>;

    /// Appointments with status "Booked" whose end time is still in the
    /// future as of `now`.
    async fn scan_open_appointments(&self, now: DateTime<Utc>) -> Result<Vec<Appointment>>;

    /// Secondary-index lookup by the non-primary patient id attribute.
    async fn appointments_for_patient(&self, patient_id: &str) -> Result<Vec<Appointment>>;

    async fn scan_patients(&self) -> Result<Vec<Patient>>;

    async fn get_ingestion_log(&self, name: &str) -> Result<Option<IngestionLog>>;

    /// Upserts every record in the batch by identity, stamping `modified`
    /// at commit time. Must not leave a partial commit visible on failure.
    async fn commit(&self, batch: WriteBatch) -> Result<()>;
}
