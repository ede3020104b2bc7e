// libs/ingestion-cell/src/services/object_store.rs
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::debug;

use shared_config::AppConfig;

use crate::error::IngestError;

/// Fetches an uploaded object's body and its source-last-modified
/// instant. Storage mechanics live behind this seam.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<(String, DateTime<Utc>), IngestError>;
}

/// HTTP-fronted object store; the last-modified instant comes from the
/// standard `Last-Modified` response header.
pub struct RestObjectStore {
    client: Client,
    base_url: String,
}

impl RestObjectStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.object_store_url.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for RestObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<(String, DateTime<Utc>), IngestError> {
        let url = format!("{}/{}/{}", self.base_url, bucket, key);
        debug!("Fetching object {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| IngestError::ObjectStore(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::ObjectStore(format!(
                "object {}/{} returned {}",
                bucket, key, status
            )));
        }

        let last_modified = response
            .headers()
            .get(reqwest::header::LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
            .map(|value| value.with_timezone(&Utc))
            .ok_or_else(|| {
                IngestError::ObjectStore(format!(
                    "object {}/{} has no parseable Last-Modified header",
                    bucket, key
                ))
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| IngestError::ObjectStore(e.to_string()))?;

        Ok((body, last_modified))
    }
}

/// In-memory object store for tests and local runs.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(String, String), (String, DateTime<Utc>)>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, bucket: &str, key: &str, body: &str, last_modified: DateTime<Utc>) {
        self.objects.lock().await.insert(
            (bucket.to_string(), key.to_string()),
            (body.to_string(), last_modified),
        );
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<(String, DateTime<Utc>), IngestError> {
        self.objects
            .lock()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| IngestError::ObjectStore(format!("object {}/{} not found", bucket, key)))
    }
}
