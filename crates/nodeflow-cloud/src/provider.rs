//! Aggregator and host collaborator traits

use crate::catalog::ResourceKind;
use crate::option::SelectableOption;
use async_trait::async_trait;
use std::time::Duration;

/// Resource aggregator abstraction
///
/// Each provider lists its inventory through this trait. Every method
/// returns the complete, normalized option list for one kind. Implementations
/// never fail: transport and decoding problems yield an empty list.
#[async_trait]
pub trait ResourceAggregator: Send + Sync {
    /// Returns the provider name (e.g., "hetzner")
    fn name(&self) -> &str;

    async fn locations(&self) -> Vec<SelectableOption>;

    /// Instance types, restricted to those priced in `location` when given
    async fn instance_types(&self, location: Option<&str>) -> Vec<SelectableOption>;

    async fn images(&self) -> Vec<SelectableOption>;

    async fn networks(&self) -> Vec<SelectableOption>;

    async fn firewalls(&self) -> Vec<SelectableOption>;

    async fn placement_groups(&self) -> Vec<SelectableOption>;

    async fn ssh_keys(&self) -> Vec<SelectableOption>;

    /// Fetch one kind by name, without a location filter
    async fn fetch(&self, kind: ResourceKind) -> Vec<SelectableOption> {
        match kind {
            ResourceKind::Location => self.locations().await,
            ResourceKind::InstanceType => self.instance_types(None).await,
            ResourceKind::Image => self.images().await,
            ResourceKind::Network => self.networks().await,
            ResourceKind::Firewall => self.firewalls().await,
            ResourceKind::PlacementGroup => self.placement_groups().await,
            ResourceKind::SshKey => self.ssh_keys().await,
        }
    }
}

/// Notification capability supplied by the host
pub trait Notifier: Send + Sync {
    fn error(&self, title: &str, message: &str, timeout: Duration);

    fn success(&self, title: &str, message: &str, timeout: Duration);

    fn warning(&self, title: &str, message: &str, timeout: Duration);
}

/// Notifier that only writes to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, title: &str, message: &str, _timeout: Duration) {
        tracing::error!("{}: {}", title, message);
    }

    fn success(&self, title: &str, message: &str, _timeout: Duration) {
        tracing::info!("{}: {}", title, message);
    }

    fn warning(&self, title: &str, message: &str, _timeout: Duration) {
        tracing::warn!("{}: {}", title, message);
    }
}
