//! Hetzner Cloud API payload types

use serde::Deserialize;

/// Collection path and item-array key of one listable resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub items_key: &'static str,
}

impl Endpoint {
    pub const LOCATIONS: Endpoint = Endpoint::same("locations");
    pub const SERVER_TYPES: Endpoint = Endpoint::same("server_types");
    pub const IMAGES: Endpoint = Endpoint::same("images");
    pub const NETWORKS: Endpoint = Endpoint::same("networks");
    pub const FIREWALLS: Endpoint = Endpoint::same("firewalls");
    pub const PLACEMENT_GROUPS: Endpoint = Endpoint::same("placement_groups");
    pub const SSH_KEYS: Endpoint = Endpoint::same("ssh_keys");

    const fn same(name: &'static str) -> Self {
        Self {
            path: name,
            items_key: name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub country: String,
    pub city: String,
    pub network_zone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuType {
    Shared,
    Dedicated,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerType {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cores: u32,
    /// Memory in GB
    pub memory: f64,
    /// Disk in GB
    pub disk: u64,
    #[serde(default)]
    pub deprecated: Option<bool>,
    #[serde(default)]
    pub deprecation: Option<serde_json::Value>,
    #[serde(default)]
    pub prices: Vec<Price>,
    pub cpu_type: CpuType,
    #[serde(default)]
    pub architecture: String,
}

impl ServerType {
    pub fn is_deprecated(&self) -> bool {
        self.deprecated.unwrap_or(false)
            || self.deprecation.as_ref().is_some_and(|d| !d.is_null())
    }

    pub fn price_in(&self, location: &str) -> Option<&Price> {
        self.prices.iter().find(|p| p.location == location)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    pub location: String,
    pub price_monthly: Amount,
}

/// Prices are transmitted as decimal strings
#[derive(Debug, Clone, Deserialize)]
pub struct Amount {
    pub net: String,
    pub gross: String,
}

impl Amount {
    pub fn gross_value(&self) -> Option<f64> {
        self.gross.trim().parse().ok()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub architecture: String,
}

impl Image {
    /// Name, or the description for images that have none (snapshots)
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.description)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Network {
    pub id: u64,
    pub name: String,
    pub ip_range: String,
}

/// Firewalls, placement groups and SSH keys only need id and name
#[derive(Debug, Clone, Deserialize)]
pub struct Named {
    pub id: u64,
    pub name: String,
}
