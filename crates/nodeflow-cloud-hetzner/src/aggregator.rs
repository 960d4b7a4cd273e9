//! Hetzner Cloud resource aggregator
//!
//! Walks every page of a collection before transforming it, so callers never
//! see a partial list.

use crate::api::{Endpoint, Image, Location, Named, Network, ServerType};
use crate::error::{HetznerError, Result};
use crate::transform;
use crate::transport::{HttpTransport, Transport};
use async_trait::async_trait;
use nodeflow_cloud::{ResourceAggregator, ResourceKind, SelectableOption};
use serde::de::DeserializeOwned;

/// Upper bound on pages walked for a single collection
pub const MAX_PAGES: u32 = 1000;

/// Hetzner Cloud aggregator
pub struct HetznerAggregator<T: Transport = HttpTransport> {
    transport: T,
}

impl<T: Transport> HetznerAggregator<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch and concatenate every page of a collection
    ///
    /// Stops at the first empty page or once the next page would exceed
    /// `meta.pagination.last_page`. A response without pagination metadata
    /// counts as the only page.
    pub async fn fetch_all<I: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<Vec<I>> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let mut body = self.transport.get_page(endpoint.path, page).await?;

            let batch = body
                .get_mut(endpoint.items_key)
                .map(serde_json::Value::take)
                .ok_or_else(|| HetznerError::MissingItems(endpoint.items_key.to_string()))?;
            let batch: Vec<I> = serde_json::from_value(batch)?;

            if batch.is_empty() {
                break;
            }

            let last_page = body
                .pointer("/meta/pagination/last_page")
                .and_then(serde_json::Value::as_u64)
                .map(|p| u32::try_from(p).unwrap_or(MAX_PAGES))
                .unwrap_or(page);

            tracing::debug!(
                "{}: page {}/{} returned {} items",
                endpoint.path,
                page,
                last_page,
                batch.len()
            );
            items.extend(batch);

            page += 1;
            if page > last_page {
                break;
            }
            if page > MAX_PAGES {
                tracing::warn!("{}: stopping after {} pages", endpoint.path, MAX_PAGES);
                break;
            }
        }

        Ok(items)
    }

    /// Fetch a collection, degrading any failure to an empty list
    async fn fetch_or_empty<I: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        endpoint: Endpoint,
    ) -> Vec<I> {
        match self.fetch_all(endpoint).await {
            Ok(items) => items,
            Err(HetznerError::Unauthorized) => {
                tracing::warn!("Credential rejected while listing {}", kind);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Failed to list {}: {}", kind, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl<T: Transport> ResourceAggregator for HetznerAggregator<T> {
    fn name(&self) -> &str {
        "hetzner"
    }

    async fn locations(&self) -> Vec<SelectableOption> {
        let locations: Vec<Location> = self
            .fetch_or_empty(ResourceKind::Location, Endpoint::LOCATIONS)
            .await;
        transform::location_options(locations)
    }

    async fn instance_types(&self, location: Option<&str>) -> Vec<SelectableOption> {
        let server_types: Vec<ServerType> = self
            .fetch_or_empty(ResourceKind::InstanceType, Endpoint::SERVER_TYPES)
            .await;
        transform::instance_type_options(server_types, location)
    }

    async fn images(&self) -> Vec<SelectableOption> {
        let images: Vec<Image> = self
            .fetch_or_empty(ResourceKind::Image, Endpoint::IMAGES)
            .await;
        transform::image_options(images)
    }

    async fn networks(&self) -> Vec<SelectableOption> {
        let networks: Vec<Network> = self
            .fetch_or_empty(ResourceKind::Network, Endpoint::NETWORKS)
            .await;
        transform::network_options(networks)
    }

    async fn firewalls(&self) -> Vec<SelectableOption> {
        let firewalls: Vec<Named> = self
            .fetch_or_empty(ResourceKind::Firewall, Endpoint::FIREWALLS)
            .await;
        transform::named_options(firewalls)
    }

    async fn placement_groups(&self) -> Vec<SelectableOption> {
        let groups: Vec<Named> = self
            .fetch_or_empty(ResourceKind::PlacementGroup, Endpoint::PLACEMENT_GROUPS)
            .await;
        transform::named_options(groups)
    }

    async fn ssh_keys(&self) -> Vec<SelectableOption> {
        let keys: Vec<Named> = self
            .fetch_or_empty(ResourceKind::SshKey, Endpoint::SSH_KEYS)
            .await;
        transform::named_options(keys)
    }
}
