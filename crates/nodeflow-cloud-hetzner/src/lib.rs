//! Hetzner Cloud aggregator for NodeFlow
//!
//! This crate implements the ResourceAggregator trait for Hetzner Cloud,
//! turning the paginated inventory API into selectable option lists.
//!
//! # Features
//!
//! - Locations, server types, images, networks, firewalls, placement groups
//!   and SSH keys
//! - Exhaustive pagination
//! - Server types grouped by CPU class and priced per location
//!
//! # Requirements
//!
//! - A host proxy at `/meta/proxy/api.hetzner.cloud/v1` that resolves the
//!   credential reference into an API token
//!
//! # Example
//!
//! ```ignore
//! use nodeflow_cloud::ResourceAggregator;
//! use nodeflow_cloud_hetzner::{CredentialRef, HetznerAggregator, HttpTransport};
//! use std::time::Duration;
//!
//! let transport = HttpTransport::new(
//!     "https://rancher.example.com",
//!     CredentialRef::new("cattle-global-data:cc-abc12"),
//!     Duration::from_secs(30),
//! )?;
//! let aggregator = HetznerAggregator::new(transport);
//!
//! let locations = aggregator.locations().await;
//! let server_types = aggregator.instance_types(Some("fsn1")).await;
//! ```

pub mod aggregator;
pub mod api;
pub mod country;
pub mod error;
pub mod transform;
pub mod transport;

pub use aggregator::{HetznerAggregator, MAX_PAGES};
pub use api::Endpoint;
pub use error::{HetznerError, Result};
pub use transport::{CredentialRef, HttpTransport, Transport};
