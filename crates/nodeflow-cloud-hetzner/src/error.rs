//! Hetzner aggregator error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HetznerError {
    #[error("Hetzner rejected the credential (401 Unauthorized)")]
    Unauthorized,

    #[error("Hetzner API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Response has no `{0}` array")]
    MissingItems(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HetznerError>;
