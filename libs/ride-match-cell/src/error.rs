// libs/ride-match-cell/src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViaError {
    #[error("Via client is not configured")]
    NotConfigured,

    #[error("Via authentication failed: {0}")]
    Auth(String),

    #[error("Via API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}
