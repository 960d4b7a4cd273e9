//! Node configuration error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Configuration record must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
