use std::env;
use tracing::warn;

/// Which orchestrator variant the process runs. `Single` is the reduced
/// rollout variant that skips external file ingestion and the Epic pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilerMode {
    Dual,
    Single,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_service_key: String,
    pub via_auth_url: String,
    pub via_api_url: String,
    pub via_client_id: String,
    pub via_client_secret: String,
    pub via_api_key: String,
    pub epic_base_url: String,
    pub epic_api_token: String,
    pub geocoder_url: String,
    pub object_store_url: String,
    pub reconciler_mode: ReconcilerMode,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("STORE_URL not set, using empty value");
                    String::new()
                }),
            store_service_key: env::var("STORE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("STORE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            via_auth_url: env::var("VIA_AUTH_URL")
                .unwrap_or_else(|_| {
                    "https://trip-api.auth.us-east-1.amazoncognito.com/oauth2/token".to_string()
                }),
            via_api_url: env::var("VIA_API_URL")
                .unwrap_or_else(|_| {
                    "https://us-east-1.trip-api.ridewithvia.com".to_string()
                }),
            via_client_id: env::var("VIA_CLIENT_ID")
                .unwrap_or_else(|_| {
                    warn!("VIA_CLIENT_ID not set, using empty value");
                    String::new()
                }),
            via_client_secret: env::var("VIA_CLIENT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("VIA_CLIENT_SECRET not set, using empty value");
                    String::new()
                }),
            via_api_key: env::var("VIA_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("VIA_API_KEY not set, using empty value");
                    String::new()
                }),
            epic_base_url: env::var("EPIC_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("EPIC_BASE_URL not set, using empty value");
                    String::new()
                }),
            epic_api_token: env::var("EPIC_API_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("EPIC_API_TOKEN not set, using empty value");
                    String::new()
                }),
            geocoder_url: env::var("GEOCODER_URL")
                .unwrap_or_else(|_| {
                    warn!("GEOCODER_URL not set, using empty value");
                    String::new()
                }),
            object_store_url: env::var("OBJECT_STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("OBJECT_STORE_URL not set, using empty value");
                    String::new()
                }),
            reconciler_mode: match env::var("RECONCILER_MODE").as_deref() {
                Ok("single") => ReconcilerMode::Single,
                Ok("dual") | Err(_) => ReconcilerMode::Dual,
                Ok(other) => {
                    warn!("RECONCILER_MODE '{}' not recognized, using dual", other);
                    ReconcilerMode::Dual
                }
            },
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty() && !self.store_service_key.is_empty()
    }

    pub fn is_via_configured(&self) -> bool {
        !self.via_client_id.is_empty()
            && !self.via_client_secret.is_empty()
            && !self.via_api_key.is_empty()
    }

    pub fn is_epic_configured(&self) -> bool {
        !self.epic_base_url.is_empty() && !self.epic_api_token.is_empty()
    }
}
