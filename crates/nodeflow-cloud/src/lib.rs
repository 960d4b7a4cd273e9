//! NodeFlow Cloud Model
//!
//! Provider-neutral types for describing a compute node against a cloud
//! provider's live inventory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  NodeFlow CLI                    │
//! │           (nodeflow catalog / check)             │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                nodeflow-node                     │
//! │        ConfigurationReconciler (sync/validate)   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               nodeflow-cloud                     │
//! │  trait ResourceAggregator { ... }                │
//! │  SelectableOption / ResourceCatalog              │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │    hetzner    │
//!           │  aggregator   │
//!           └───────────────┘
//! ```

pub mod catalog;
pub mod error;
pub mod option;
pub mod provider;

// Re-exports
pub use catalog::{ResourceCatalog, ResourceKind};
pub use error::{CloudError, Result};
pub use option::{GROUP_HEADER_PREFIX, OptionValue, SelectableOption};
pub use provider::{Notifier, ResourceAggregator, TracingNotifier};
