// libs/ride-match-cell/src/services/location.rs
use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::GeoPoint;
use shared_utils::geo::haversine_meters;

/// Distance, in meters, between a free-form appointment address and a
/// trip's drop-off coordinates.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn distance_to(&self, address: &str, dropoff: &GeoPoint) -> Result<f64>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    lat: f64,
    lng: f64,
}

/// Forward-geocodes addresses over HTTP and computes great-circle
/// distance to the drop-off point. Geocoding results are memoized for the
/// resolver's lifetime; one resolver lives for one reconciliation run.
pub struct GeocodingResolver {
    client: Client,
    base_url: String,
    cache: Mutex<HashMap<String, GeoPoint>>,
}

impl GeocodingResolver {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.geocoder_url.clone(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    async fn geocode(&self, address: &str) -> Result<GeoPoint> {
        if let Some(point) = self.cache.lock().await.get(address) {
            return Ok(*point);
        }

        debug!("Geocoding address '{}'", address);
        let url = format!("{}/geocode", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("address", address)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(anyhow!("geocoder error ({}): {}", status, body));
        }

        let geocoded: GeocodeResponse = response.json().await?;
        let point = GeoPoint {
            lat: geocoded.lat,
            lng: geocoded.lng,
        };
        self.cache.lock().await.insert(address.to_string(), point);
        Ok(point)
    }
}

#[async_trait]
impl LocationResolver for GeocodingResolver {
    async fn distance_to(&self, address: &str, dropoff: &GeoPoint) -> Result<f64> {
        let origin = self.geocode(address).await?;
        Ok(haversine_meters(&origin, dropoff))
    }
}
