//! NodeFlow node configuration
//!
//! Keeps the host's loosely-typed configuration record and the typed
//! [`NodeConfiguration`] in step:
//!
//! - [`ExternalRecord`] is the decode/encode boundary for the host record
//! - [`ConfigurationReconciler`] validates every change, writes valid state
//!   back and refetches instance types when the location changes
//!
//! # Example
//!
//! ```ignore
//! use nodeflow_node::{ConfigurationReconciler, ExternalRecord, FieldEdit};
//!
//! let mut record = ExternalRecord::from_json_str(&host_json)?;
//! let mut reconciler = ConfigurationReconciler::new();
//!
//! reconciler.derive_internal_from_external(&mut record);
//! reconciler.load(&aggregator, &notifier, timeout).await;
//!
//! let outcome = reconciler
//!     .change_location(&aggregator, &mut record, Some("hel1".to_string()))
//!     .await;
//! if outcome.valid {
//!     // record now holds the re-encoded configuration
//! }
//! ```

pub mod config;
pub mod error;
pub mod reconciler;
pub mod record;

pub use config::{NodeConfiguration, Violation};
pub use error::{DecodeError, Result};
pub use reconciler::{
    ConfigurationReconciler, EditOutcome, FieldEdit, InboundOutcome, InstanceTypeRefresh,
    RefreshOutcome, load_catalog,
};
pub use record::ExternalRecord;
