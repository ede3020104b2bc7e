// libs/ride-match-cell/src/services/via.rs
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use shared_config::AppConfig;

use crate::error::ViaError;
use crate::models::{Trip, TRIP_STATUSES};

/// Upper bound on trips returned per status query. Only the first page is
/// fetched.
const PAGE_LIST_SIZE: u32 = 100;

/// Tokens are treated as expired this long before the provider says so.
const TOKEN_EXPIRY_SKEW_SECS: i64 = 60;

const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Source of candidate trips for a rider. The production implementation
/// is [`ViaClient`]; tests substitute fixed trip sets.
#[async_trait]
pub trait TripSource: Send + Sync {
    async fn trips_for(&self, rider_id: &str) -> Result<Vec<Trip>, ViaError>;
}

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TripsResponse {
    #[serde(default)]
    trips: Vec<Trip>,
}

#[derive(Debug, Deserialize)]
struct TripDetailsResponse {
    trip_details: TripDetails,
}

#[derive(Debug, Deserialize)]
struct TripDetails {
    driver_info: Option<serde_json::Value>,
    vehicle_info: Option<serde_json::Value>,
}

/// Via trip provider client. Authenticates with an OAuth2
/// client-credentials flow, queries trips per relevant status, and
/// enriches each trip with driver/vehicle detail via a follow-up lookup.
///
/// The bearer token is cached for the client's lifetime with expiry
/// tracking; a 401 from the trips API forces one refresh and retry.
#[derive(Debug)]
pub struct ViaClient {
    client: Client,
    auth_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
    api_key: String,
    token: Mutex<Option<CachedToken>>,
}

impl ViaClient {
    pub fn new(config: &AppConfig) -> Result<Self, ViaError> {
        if !config.is_via_configured() {
            return Err(ViaError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            auth_url: config.via_auth_url.clone(),
            api_url: config.via_api_url.clone(),
            client_id: config.via_client_id.clone(),
            client_secret: config.via_client_secret.clone(),
            api_key: config.via_api_key.clone(),
            token: Mutex::new(None),
        })
    }

    async fn fetch_token(&self) -> Result<CachedToken, ViaError> {
        debug!("Requesting Via access token");

        let response = self
            .client
            .post(&self.auth_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ViaError::Auth(format!("token endpoint returned {}: {}", status, body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ViaError::Auth(format!("malformed token response: {}", e)))?;

        let ttl = token.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(ttl - TOKEN_EXPIRY_SKEW_SECS),
        })
    }

    async fn bearer(&self, force_refresh: bool) -> Result<String, ViaError> {
        let mut guard = self.token.lock().await;
        if !force_refresh {
            if let Some(cached) = guard.as_ref() {
                if cached.expires_at > Utc::now() {
                    return Ok(cached.access_token.clone());
                }
                debug!("Via token expired, refreshing");
            }
        }
        let fetched = self.fetch_token().await?;
        let access_token = fetched.access_token.clone();
        *guard = Some(fetched);
        Ok(access_token)
    }

    async fn authed_get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, ViaError> {
        let url = format!("{}{}", self.api_url, path);
        let mut force_refresh = false;
        loop {
            let token = self.bearer(force_refresh).await?;
            let response = self
                .client
                .get(&url)
                .header("x-api-key", &self.api_key)
                .header("Authorization", token)
                .query(query)
                .send()
                .await?;

            if response.status() == StatusCode::UNAUTHORIZED && !force_refresh {
                warn!("Via returned 401 for {}, forcing token refresh and retrying", path);
                force_refresh = true;
                continue;
            }
            return Ok(response);
        }
    }

    /// Attaches driver/vehicle detail to a trip. Best-effort: a failed or
    /// incomplete detail response leaves the fields absent rather than
    /// failing the trips call.
    async fn attach_details(&self, trip: &mut Trip) {
        let query = [("trip_id", trip.trip_id.clone())];
        let response = match self.authed_get("/trips/details", &query).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Detail lookup failed for trip {}: {}", trip.trip_id, e);
                return;
            }
        };

        if !response.status().is_success() {
            warn!(
                "Detail lookup for trip {} returned {}",
                trip.trip_id,
                response.status()
            );
            return;
        }

        match response.json::<TripDetailsResponse>().await {
            Ok(details) => {
                trip.driver_info = details.trip_details.driver_info;
                trip.vehicle_info = details.trip_details.vehicle_info;
            }
            Err(e) => {
                warn!("Incomplete detail response for trip {}: {}", trip.trip_id, e);
            }
        }
    }
}

#[async_trait]
impl TripSource for ViaClient {
    /// Queries the provider once per relevant trip status and concatenates
    /// the results. Ordering is provider-defined.
    async fn trips_for(&self, rider_id: &str) -> Result<Vec<Trip>, ViaError> {
        let mut trips = Vec::new();

        for trip_status in TRIP_STATUSES {
            let query = [
                ("page_list_size", PAGE_LIST_SIZE.to_string()),
                ("rider_id", rider_id.to_string()),
                ("trip_status", trip_status.to_string()),
            ];
            let response = self.authed_get("/trips/get", &query).await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await?;
                return Err(ViaError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let page: TripsResponse = response.json().await?;
            trips.extend(page.trips);
        }

        for trip in &mut trips {
            self.attach_details(trip).await;
        }

        info!("Fetched {} trips for rider {}", trips.len(), rider_id);
        Ok(trips)
    }
}
