//! Resource catalog: every option list offered to the user, keyed by kind

use crate::error::CloudError;
use crate::option::SelectableOption;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Kind of inventory resource the aggregator can list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Location,
    InstanceType,
    Image,
    Network,
    Firewall,
    PlacementGroup,
    SshKey,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Location,
        ResourceKind::InstanceType,
        ResourceKind::Image,
        ResourceKind::Network,
        ResourceKind::Firewall,
        ResourceKind::PlacementGroup,
        ResourceKind::SshKey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Location => "location",
            ResourceKind::InstanceType => "instance-type",
            ResourceKind::Image => "image",
            ResourceKind::Network => "network",
            ResourceKind::Firewall => "firewall",
            ResourceKind::PlacementGroup => "placement-group",
            ResourceKind::SshKey => "ssh-key",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CloudError::UnknownResourceKind(s.to_string()))
    }
}

/// Option lists for every resource kind
///
/// Entries are only ever replaced as a whole list; nothing mutates an
/// individual option in place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceCatalog {
    entries: BTreeMap<ResourceKind, Vec<SelectableOption>>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a kind, empty when the kind was never loaded
    pub fn get(&self, kind: ResourceKind) -> &[SelectableOption] {
        self.entries.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the whole list for a kind
    pub fn replace(&mut self, kind: ResourceKind, options: Vec<SelectableOption>) {
        self.entries.insert(kind, options);
    }

    pub fn with(mut self, kind: ResourceKind, options: Vec<SelectableOption>) -> Self {
        self.replace(kind, options);
        self
    }

    /// Whether every kind came back empty
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Whether a selectable option with the given value string exists for a kind
    pub fn contains(&self, kind: ResourceKind, value: &str) -> bool {
        self.get(kind)
            .iter()
            .any(|o| o.value.is_selectable() && o.value.to_string() == value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKind, &Vec<SelectableOption>)> {
        self.entries.iter()
    }
}
