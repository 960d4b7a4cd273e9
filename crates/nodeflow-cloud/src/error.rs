//! Cloud model error types

use thiserror::Error;

/// Cloud model errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Unknown resource kind: {0}")]
    UnknownResourceKind(String),
}

pub type Result<T> = std::result::Result<T, CloudError>;
