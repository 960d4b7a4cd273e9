//! Strongly-typed node configuration and its validity rules

use serde::Serialize;
use std::collections::BTreeMap;

/// Internal node configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeConfiguration {
    /// Location name (e.g., "fsn1")
    pub location: Option<String>,

    /// Instance type name (e.g., "cx22")
    pub instance_type: Option<String>,

    pub image: Option<u64>,

    pub placement_group: Option<u64>,

    pub networks: Vec<u64>,

    pub firewalls: Vec<u64>,

    pub ssh_key: Option<u64>,

    pub use_private_network: bool,

    /// Disables public networking entirely, superseding the per-protocol flags
    pub disable_public_network: bool,

    pub disable_ipv4: bool,

    pub disable_ipv6: bool,

    /// Free-form cloud-init user data
    pub user_data: String,

    pub labels: BTreeMap<String, String>,
}

/// A broken validity rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    MissingInstanceType,
    MissingImage,
    MissingLocation,
    /// Public access disabled without a private network to fall back to
    PublicDisabledWithoutPrivateNetwork,
    PrivateNetworkWithoutNetworks,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::MissingInstanceType => write!(f, "no instance type selected"),
            Violation::MissingImage => write!(f, "no image selected"),
            Violation::MissingLocation => write!(f, "no location selected"),
            Violation::PublicDisabledWithoutPrivateNetwork => write!(
                f,
                "public networking can only be disabled when a private network is used"
            ),
            Violation::PrivateNetworkWithoutNetworks => {
                write!(f, "a private network requires at least one network")
            }
        }
    }
}

impl NodeConfiguration {
    pub fn any_public_disabled(&self) -> bool {
        self.disable_public_network || self.disable_ipv4 || self.disable_ipv6
    }

    /// Every rule the configuration currently breaks
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        if is_unset(&self.instance_type) {
            violations.push(Violation::MissingInstanceType);
        }
        if self.image.is_none() {
            violations.push(Violation::MissingImage);
        }
        if is_unset(&self.location) {
            violations.push(Violation::MissingLocation);
        }
        if self.any_public_disabled() && !self.use_private_network {
            violations.push(Violation::PublicDisabledWithoutPrivateNetwork);
        }
        if self.use_private_network && self.networks.is_empty() {
            violations.push(Violation::PrivateNetworkWithoutNetworks);
        }

        violations
    }

    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }
}

/// Blank names never survive a trip through the external record
fn is_unset(name: &Option<String>) -> bool {
    name.as_deref().is_none_or(|n| n.trim().is_empty())
}
