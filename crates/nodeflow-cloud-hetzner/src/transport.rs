//! Transport for Hetzner Cloud API requests
//!
//! Requests never carry the API token itself. They go through the host's
//! metadata proxy, which swaps the credential reference in the auth header
//! for the stored secret.

use crate::error::{HetznerError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;

/// Relative path of the proxied Hetzner Cloud API
pub const API_BASE_PATH: &str = "/meta/proxy/api.hetzner.cloud/v1";

/// Header the proxy reads the credential reference from
pub const AUTH_HEADER: &str = "X-API-Auth-Header";

/// Name of the secret field inside the stored credential
pub const SECRET_FIELD: &str = "apiToken";

/// Items requested per page
pub const PER_PAGE: u32 = 50;

/// Opaque reference to a stored cloud credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRef {
    id: String,
}

impl CredentialRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Bearer value resolved by the proxy
    pub fn header_value(&self) -> String {
        format!("Bearer credID={} passwordField={}", self.id, SECRET_FIELD)
    }
}

/// Fetches one page of one resource collection as raw JSON
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_page(&self, path: &str, page: u32) -> Result<serde_json::Value>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credential: CredentialRef,
}

impl HttpTransport {
    /// Create a transport against `endpoint` (scheme + host of the proxy)
    pub fn new(endpoint: &str, credential: CredentialRef, timeout: Duration) -> Result<Self> {
        let url = reqwest::Url::parse(endpoint)
            .map_err(|e| HetznerError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        if url.cannot_be_a_base() {
            return Err(HetznerError::InvalidEndpoint(endpoint.to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: format!("{}{}", endpoint.trim_end_matches('/'), API_BASE_PATH),
            credential,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_page(&self, path: &str, page: u32) -> Result<serde_json::Value> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        tracing::debug!("GET {} (page {})", url, page);

        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("per_page", PER_PAGE)])
            .header(AUTH_HEADER, self.credential.header_value())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(HetznerError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HetznerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
