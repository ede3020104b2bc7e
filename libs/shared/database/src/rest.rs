// libs/shared/database/src/rest.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde_json::json;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::{Appointment, IngestionLog, Patient, Setting};

use crate::store::{RecordStore, WriteBatch};

/// PostgREST-style record store. Reads are per-table GETs with equality
/// filters; the batched write goes through a single `commit_batch` RPC so
/// the backend applies it in one transaction.
pub struct RestStore {
    client: Client,
    base_url: String,
    service_key: String,
}

impl RestStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.store_url.clone(),
            service_key: config.store_service_key.clone(),
        }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&self.service_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn request<T>(&self, method: Method, path: &str, body: Option<serde_json::Value>) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making store request to {}", url);

        let mut req = self.client.request(method, &url).headers(self.headers()?);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Store error ({}): {}", status, error_text);
            return Err(anyhow!("store error ({}): {}", status, error_text));
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    async fn get_one<T>(&self, path: &str) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut rows: Vec<T> = self.request(Method::GET, path, None).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.swap_remove(0)))
        }
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn get_setting(&self, name: &str) -> Result<Option<Setting>> {
        self.get_one(&format!("/rest/v1/settings?name=eq.{}", name)).await
    }

    async fn get_appointment(&self, id: &str) -> Result<Option<Appointment>> {
        self.get_one(&format!("/rest/v1/appointments?id=eq.{}", id)).await
    }

    async fn scan_open_appointments(&self, now: DateTime<Utc>) -> Result<Vec<Appointment>> {
        let path = format!(
            "/rest/v1/appointments?status=eq.Booked&end_time=gte.{}",
            now.to_rfc3339()
        );
        self.request(Method::GET, &path, None).await
    }

    async fn appointments_for_patient(&self, patient_id: &str) -> Result<Vec<Appointment>> {
        let path = format!("/rest/v1/appointments?patient_id=eq.{}", patient_id);
        self.request(Method::GET, &path, None).await
    }

    async fn scan_patients(&self) -> Result<Vec<Patient>> {
        self.request(Method::GET, "/rest/v1/patients", None).await
    }

    async fn get_ingestion_log(&self, name: &str) -> Result<Option<IngestionLog>> {
        self.get_one(&format!("/rest/v1/ingestion_logs?name=eq.{}", name)).await
    }

    async fn commit(&self, mut batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        for appointment in &mut batch.appointments {
            appointment.stamp(now);
        }
        for patient in &mut batch.patients {
            patient.stamp(now);
        }
        for log in &mut batch.ingestion_logs {
            log.stamp(now);
        }

        debug!("Committing batch of {} records", batch.len());

        let body = json!({
            "appointments": batch.appointments,
            "patients": batch.patients,
            "ingestion_logs": batch.ingestion_logs,
        });

        // Single RPC so the backend upserts all three tables in one
        // transaction; a partial commit must never become visible.
        let _: serde_json::Value = self
            .request(Method::POST, "/rest/v1/rpc/commit_batch", Some(body))
            .await?;
        Ok(())
    }
}
