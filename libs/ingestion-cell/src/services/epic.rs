// libs/ingestion-cell/src/services/epic.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::{RecordStore, WriteBatch};
use shared_models::{Appointment, Provider, Ride};

use crate::error::IngestError;

/// Upstream appointment timestamp format (UTC).
const EPIC_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Epic-family scheduling API client: per-patient appointment bundles
/// plus Location reference resolution.
pub struct EpicClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl EpicClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.epic_base_url.clone(),
            api_token: config.epic_api_token.clone(),
        }
    }

    async fn get(&self, path: &str) -> Result<Value, IngestError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making scheduling API request to {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .send()
            .await
            .map_err(|e| IngestError::Epic(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IngestError::Epic(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| IngestError::Epic(e.to_string()))
    }

    /// Raw appointment bundle for one patient.
    pub async fn appointments_for(&self, patient_id: &str) -> Result<Value, IngestError> {
        self.get(&format!("/Appointment?patient={}", patient_id)).await
    }

    /// Resolves a Location reference to a display address, best-effort.
    pub async fn location_address(&self, location_id: &str) -> Result<Option<String>, IngestError> {
        let location = self.get(&format!("/Location/{}", location_id)).await?;
        Ok(location
            .pointer("/Location/address/text/@value")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}

/// Pulls appointments from the scheduling API for every rider-mapped epic
/// patient. Produces appointments unmatched; ride matching for this
/// provider happens in the scheduled full pass.
pub struct EpicAdapter {
    client: EpicClient,
    store: Arc<dyn RecordStore>,
}

struct ParticipantDetails {
    patient_id: Option<String>,
    patient_name: Option<String>,
    location: Option<String>,
}

impl EpicAdapter {
    pub fn new(client: EpicClient, store: Arc<dyn RecordStore>) -> Self {
        Self { client, store }
    }

    /// Ingests appointments for every patient in the epic rider mapping
    /// and commits them as one batch. Malformed bundle entries are logged
    /// and skipped; upstream API failures fail the invocation.
    pub async fn ingest(&self, mapping: &HashMap<String, String>) -> Result<(), IngestError> {
        let mut batch = WriteBatch::default();

        for patient_id in mapping.keys() {
            let bundle = self.client.appointments_for(patient_id).await?;
            let entries = bundle
                .pointer("/Bundle/entry")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            for entry in &entries {
                match self.parse_entry(entry).await {
                    Ok(appointment) => batch.appointments.push(appointment),
                    Err(IngestError::MalformedRecord(reason)) => {
                        warn!("Skipping malformed appointment entry: {}", reason);
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!("Epic ingestion parsed {} appointments", batch.appointments.len());
        if !batch.is_empty() {
            self.store.commit(batch).await?;
        }
        Ok(())
    }

    async fn parse_entry(&self, entry: &Value) -> Result<Appointment, IngestError> {
        let appointment = entry
            .pointer("/resource/Appointment")
            .ok_or_else(|| IngestError::MalformedRecord("entry has no Appointment resource".into()))?;

        let id = string_at(appointment, "/id/@value")?;
        let status = string_at(appointment, "/status/@value")?;
        let start_time = datetime_at(appointment, "/start/@value")?;
        let end_time = datetime_at(appointment, "/end/@value")?;

        let participants = self.map_participants(appointment).await?;
        let patient_id = participants
            .patient_id
            .ok_or_else(|| IngestError::MalformedRecord(format!("appointment {}: no Patient participant", id)))?;
        let patient_name = participants
            .patient_name
            .ok_or_else(|| IngestError::MalformedRecord(format!("appointment {}: no patient display name", id)))?;
        let location = participants
            .location
            .ok_or_else(|| IngestError::MalformedRecord(format!("appointment {}: no Location participant", id)))?;

        let now = Utc::now();
        Ok(Appointment {
            id,
            patient_id,
            patient_name,
            location,
            start_time,
            end_time,
            status,
            provider: Provider::Epic,
            ride: Ride::no_ride(),
            created: now,
            modified: now,
        })
    }

    /// Walks the nested participant list, picking out the actors tagged
    /// by reference prefix `Patient` and `Location`.
    async fn map_participants(&self, appointment: &Value) -> Result<ParticipantDetails, IngestError> {
        let mut details = ParticipantDetails {
            patient_id: None,
            patient_name: None,
            location: None,
        };

        let participants = appointment
            .pointer("/participant")
            .and_then(Value::as_array)
            .ok_or_else(|| IngestError::MalformedRecord("appointment has no participant list".into()))?;

        for participant in participants {
            let Some(reference) = participant
                .pointer("/actor/reference/@value")
                .and_then(Value::as_str)
            else {
                continue;
            };
            let mut segments = reference.split('/');
            let role = segments.next().unwrap_or_default();
            let reference_id = segments.last().unwrap_or_default();

            match role {
                "Patient" => {
                    details.patient_name = participant
                        .pointer("/actor/display/@value")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    details.patient_id = Some(reference_id.to_string());
                }
                "Location" => {
                    details.location = self.client.location_address(reference_id).await?;
                }
                _ => {}
            }
        }

        Ok(details)
    }
}

fn string_at(value: &Value, pointer: &str) -> Result<String, IngestError> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| IngestError::MalformedRecord(format!("missing field at {}", pointer)))
}

fn datetime_at(value: &Value, pointer: &str) -> Result<DateTime<Utc>, IngestError> {
    let raw = string_at(value, pointer)?;
    let naive = NaiveDateTime::parse_from_str(&raw, EPIC_DATETIME_FORMAT)
        .map_err(|e| IngestError::MalformedRecord(format!("bad timestamp '{}': {}", raw, e)))?;
    Ok(naive.and_utc())
}
