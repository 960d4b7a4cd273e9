//! Two-way reconciliation between the host record and the internal config
//!
//! ```text
//!  ExternalRecord ──derive_internal_from_external──▶ NodeConfiguration
//!        ▲                                              │
//!        └────project_external_from_internal (valid)────┘
//! ```
//!
//! Each direction holds a guard flag while it runs and refuses to start while
//! the other one is set, so a write never echoes back as a re-derivation.

use crate::config::{NodeConfiguration, Violation};
use crate::record::ExternalRecord;
use nodeflow_cloud::{Notifier, ResourceAggregator, ResourceCatalog, ResourceKind, SelectableOption};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::watch;

/// A single user edit to the internal configuration
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Location(Option<String>),
    InstanceType(Option<String>),
    Image(Option<u64>),
    PlacementGroup(Option<u64>),
    Networks(Vec<u64>),
    Firewalls(Vec<u64>),
    SshKey(Option<u64>),
    UsePrivateNetwork(bool),
    DisablePublicNetwork(bool),
    DisableIpv4(bool),
    DisableIpv6(bool),
    UserData(String),
    Labels(BTreeMap<String, String>),
    SetLabel(String, String),
    RemoveLabel(String),
}

/// Pending instance-type refetch for a newly selected location
///
/// A cleared location refetches the unfiltered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceTypeRefresh {
    generation: u64,
    location: Option<String>,
}

impl InstanceTypeRefresh {
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Result of a state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Whether the configuration is valid after the change
    pub valid: bool,
    /// Whether the change was written to the external record
    pub synced: bool,
    /// Set when the location changed and instance types must be refetched
    pub refresh: Option<InstanceTypeRefresh>,
}

/// Result of an inbound sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    Applied(EditOutcome),
    /// The record still holds what this reconciler last wrote
    Echo,
    /// An outbound sync is running
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { cleared_selection: bool },
    /// A later location change superseded this refresh
    Stale,
}

pub struct ConfigurationReconciler {
    config: NodeConfiguration,
    catalog: ResourceCatalog,
    loading: bool,
    syncing_inbound: bool,
    syncing_outbound: bool,
    last_written_revision: Option<u64>,
    /// Record revision as of the last derive or write
    last_seen_revision: Option<u64>,
    location_generation: u64,
    outbound_syncs: u64,
    validity: watch::Sender<bool>,
}

impl Default for ConfigurationReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationReconciler {
    pub fn new() -> Self {
        let (validity, _) = watch::channel(false);
        Self {
            config: NodeConfiguration::default(),
            catalog: ResourceCatalog::new(),
            loading: false,
            syncing_inbound: false,
            syncing_outbound: false,
            last_written_revision: None,
            last_seen_revision: None,
            location_generation: 0,
            outbound_syncs: 0,
            validity,
        }
    }

    pub fn config(&self) -> &NodeConfiguration {
        &self.config
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_valid(&self) -> bool {
        *self.validity.borrow()
    }

    pub fn violations(&self) -> Vec<Violation> {
        self.config.violations()
    }

    /// Number of completed writes to the external record
    pub fn outbound_syncs(&self) -> u64 {
        self.outbound_syncs
    }

    /// Validity signal, published after every state change
    pub fn subscribe_validity(&self) -> watch::Receiver<bool> {
        self.validity.subscribe()
    }

    /// Load every catalog kind at once and replace the catalog
    ///
    /// The loading flag stays set until all kinds have settled. Refreshes
    /// issued before the load are invalidated by it, so the selected instance
    /// type is checked against the loaded list here instead.
    pub async fn load(
        &mut self,
        aggregator: &dyn ResourceAggregator,
        notifier: &dyn Notifier,
        notify_timeout: Duration,
    ) {
        self.loading = true;
        self.location_generation += 1;

        let catalog = load_catalog(aggregator, self.config.location.as_deref()).await;

        if catalog.is_empty() {
            notifier.error(
                "Failed to load resources",
                &format!(
                    "Could not list any {} resources. Check the cloud credential.",
                    aggregator.name()
                ),
                notify_timeout,
            );
        } else if catalog.get(ResourceKind::Location).is_empty() {
            notifier.warning(
                "No locations available",
                &format!("{} returned no locations.", aggregator.name()),
                notify_timeout,
            );
        }

        self.catalog = catalog;
        if self.drop_unoffered_instance_type() {
            self.publish_validity();
        }
        self.loading = false;
    }

    /// Re-derive the internal configuration from a record changed by the host
    pub fn derive_internal_from_external(&mut self, record: &mut ExternalRecord) -> InboundOutcome {
        if self.syncing_outbound {
            tracing::debug!("Inbound sync suppressed during outbound sync");
            return InboundOutcome::Suppressed;
        }
        if self.last_written_revision == Some(record.revision()) {
            tracing::debug!("Record revision {} was written here, skipping", record.revision());
            return InboundOutcome::Echo;
        }

        self.syncing_inbound = true;
        self.last_seen_revision = Some(record.revision());

        let derived = record.decode();
        let location_changed = derived.location != self.config.location;
        self.config = derived;

        let refresh = location_changed.then(|| self.begin_refresh());
        let mut outcome = self.state_changed(record);
        outcome.refresh = refresh;

        self.syncing_inbound = false;
        InboundOutcome::Applied(outcome)
    }

    /// Write the internal configuration into the record when it is valid
    ///
    /// Returns whether the record was written.
    pub fn project_external_from_internal(&mut self, record: &mut ExternalRecord) -> bool {
        if self.syncing_inbound {
            return false;
        }
        if !self.config.is_valid() {
            return false;
        }

        self.syncing_outbound = true;
        record.encode(&self.config);
        self.last_written_revision = Some(record.revision());
        self.last_seen_revision = Some(record.revision());
        self.outbound_syncs += 1;
        self.syncing_outbound = false;

        tracing::debug!("Wrote configuration at record revision {}", record.revision());
        true
    }

    /// Apply a user edit, then validate and sync
    ///
    /// A record changed by the host since the last derive or write is derived
    /// again first, so the write never drops the host's change. Blank
    /// location and instance type names count as unset.
    pub fn apply_edit(&mut self, record: &mut ExternalRecord, edit: FieldEdit) -> EditOutcome {
        let mut refresh = None;

        if self.changed_outside(record) {
            tracing::debug!(
                "Record changed outside (revision {}), deriving before edit",
                record.revision()
            );
            if let InboundOutcome::Applied(outcome) = self.derive_internal_from_external(record) {
                refresh = outcome.refresh;
            }
        }

        match edit {
            FieldEdit::Location(location) => {
                let location = non_blank(location);
                if location != self.config.location {
                    self.config.location = location;
                    refresh = Some(self.begin_refresh());
                }
            }
            FieldEdit::InstanceType(instance_type) => {
                self.config.instance_type = non_blank(instance_type)
            }
            FieldEdit::Image(image) => self.config.image = image,
            FieldEdit::PlacementGroup(group) => self.config.placement_group = group,
            FieldEdit::Networks(networks) => self.config.networks = networks,
            FieldEdit::Firewalls(firewalls) => self.config.firewalls = firewalls,
            FieldEdit::SshKey(key) => self.config.ssh_key = key,
            FieldEdit::UsePrivateNetwork(on) => self.config.use_private_network = on,
            FieldEdit::DisablePublicNetwork(on) => self.config.disable_public_network = on,
            FieldEdit::DisableIpv4(on) => self.config.disable_ipv4 = on,
            FieldEdit::DisableIpv6(on) => self.config.disable_ipv6 = on,
            FieldEdit::UserData(data) => self.config.user_data = data,
            FieldEdit::Labels(labels) => self.config.labels = labels,
            FieldEdit::SetLabel(key, value) => {
                self.config.labels.insert(key, value);
            }
            FieldEdit::RemoveLabel(key) => {
                self.config.labels.remove(&key);
            }
        }

        let mut outcome = self.state_changed(record);
        outcome.refresh = refresh;
        outcome
    }

    /// Install instance types fetched for a refresh ticket
    ///
    /// A ticket from a superseded location change is discarded. The selected
    /// instance type is cleared when the new list no longer offers it.
    pub fn apply_instance_types(
        &mut self,
        refresh: InstanceTypeRefresh,
        options: Vec<SelectableOption>,
    ) -> RefreshOutcome {
        if refresh.generation != self.location_generation {
            tracing::debug!(
                "Discarding instance types for {:?} (generation {} < {})",
                refresh.location,
                refresh.generation,
                self.location_generation
            );
            return RefreshOutcome::Stale;
        }

        self.catalog.replace(ResourceKind::InstanceType, options);

        let cleared = self.drop_unoffered_instance_type();
        if cleared {
            // Without an instance type the config is invalid, so there is
            // nothing to write back.
            self.publish_validity();
        }

        RefreshOutcome::Applied {
            cleared_selection: cleared,
        }
    }

    /// Select a location and refetch its instance types in one step
    pub async fn change_location(
        &mut self,
        aggregator: &dyn ResourceAggregator,
        record: &mut ExternalRecord,
        location: Option<String>,
    ) -> EditOutcome {
        let mut outcome = self.apply_edit(record, FieldEdit::Location(location));

        if let Some(refresh) = outcome.refresh.take() {
            let options = aggregator.instance_types(refresh.location()).await;
            if let RefreshOutcome::Applied {
                cleared_selection: true,
            } = self.apply_instance_types(refresh, options)
            {
                outcome.valid = self.is_valid();
            }
        }

        outcome
    }

    fn begin_refresh(&mut self) -> InstanceTypeRefresh {
        self.location_generation += 1;
        InstanceTypeRefresh {
            generation: self.location_generation,
            location: self.config.location.clone(),
        }
    }

    fn changed_outside(&self, record: &ExternalRecord) -> bool {
        self.last_seen_revision
            .is_some_and(|revision| revision != record.revision())
    }

    /// Clear the selected instance type when the catalog no longer offers it
    fn drop_unoffered_instance_type(&mut self) -> bool {
        let unoffered = self
            .config
            .instance_type
            .as_deref()
            .is_some_and(|t| !self.catalog.contains(ResourceKind::InstanceType, t));
        if unoffered {
            tracing::info!(
                "Instance type {:?} is not offered in {:?}, clearing it",
                self.config.instance_type,
                self.config.location
            );
            self.config.instance_type = None;
        }
        unoffered
    }

    fn state_changed(&mut self, record: &mut ExternalRecord) -> EditOutcome {
        let valid = self.publish_validity();
        let synced = valid && !self.syncing_inbound && self.project_external_from_internal(record);

        EditOutcome {
            valid,
            synced,
            refresh: None,
        }
    }

    fn publish_validity(&mut self) -> bool {
        let valid = self.config.is_valid();
        self.validity.send_replace(valid);
        valid
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Fetch every resource kind concurrently
///
/// Instance types are filtered by `location` when one is selected. A kind
/// that fails comes back empty without affecting the others.
pub async fn load_catalog(
    aggregator: &dyn ResourceAggregator,
    location: Option<&str>,
) -> ResourceCatalog {
    let (locations, instance_types, images, networks, firewalls, placement_groups, ssh_keys) = tokio::join!(
        aggregator.locations(),
        aggregator.instance_types(location),
        aggregator.images(),
        aggregator.networks(),
        aggregator.firewalls(),
        aggregator.placement_groups(),
        aggregator.ssh_keys(),
    );

    let catalog = ResourceCatalog::new()
        .with(ResourceKind::Location, locations)
        .with(ResourceKind::InstanceType, instance_types)
        .with(ResourceKind::Image, images)
        .with(ResourceKind::Network, networks)
        .with(ResourceKind::Firewall, firewalls)
        .with(ResourceKind::PlacementGroup, placement_groups)
        .with(ResourceKind::SshKey, ssh_keys);

    for (kind, options) in catalog.iter() {
        tracing::info!("Loaded {} {} options", options.len(), kind);
    }

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeAggregator {
        locations: Vec<SelectableOption>,
        instance_types: HashMap<String, Vec<SelectableOption>>,
        images: Vec<SelectableOption>,
    }

    #[async_trait]
    impl ResourceAggregator for FakeAggregator {
        fn name(&self) -> &str {
            "fake"
        }

        async fn locations(&self) -> Vec<SelectableOption> {
            self.locations.clone()
        }

        async fn instance_types(&self, location: Option<&str>) -> Vec<SelectableOption> {
            match location {
                Some(l) => self.instance_types.get(l).cloned().unwrap_or_default(),
                None => {
                    let mut all: Vec<SelectableOption> =
                        self.instance_types.values().flatten().cloned().collect();
                    all.sort_by(|a, b| a.label.cmp(&b.label));
                    all
                }
            }
        }

        async fn images(&self) -> Vec<SelectableOption> {
            self.images.clone()
        }

        async fn networks(&self) -> Vec<SelectableOption> {
            Vec::new()
        }

        async fn firewalls(&self) -> Vec<SelectableOption> {
            Vec::new()
        }

        async fn placement_groups(&self) -> Vec<SelectableOption> {
            Vec::new()
        }

        async fn ssh_keys(&self) -> Vec<SelectableOption> {
            Vec::new()
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<(&'static str, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn error(&self, title: &str, _message: &str, _timeout: Duration) {
            self.messages.lock().unwrap().push(("error", title.to_string()));
        }

        fn success(&self, title: &str, _message: &str, _timeout: Duration) {
            self.messages.lock().unwrap().push(("success", title.to_string()));
        }

        fn warning(&self, title: &str, _message: &str, _timeout: Duration) {
            self.messages.lock().unwrap().push(("warning", title.to_string()));
        }
    }

    fn types(names: &[&str]) -> Vec<SelectableOption> {
        names
            .iter()
            .map(|n| SelectableOption::new(*n, n.to_uppercase()))
            .collect()
    }

    fn fake_aggregator() -> FakeAggregator {
        FakeAggregator {
            locations: vec![
                SelectableOption::new("fsn1", "FSN1 - Falkenstein, Germany"),
                SelectableOption::new("ash", "ASH - Ashburn, VA, United States"),
            ],
            instance_types: [
                ("fsn1".to_string(), types(&["cx22", "cx32"])),
                ("ash".to_string(), types(&["cpx11"])),
            ]
            .into_iter()
            .collect(),
            images: vec![SelectableOption::new(1u64, "debian-12 (x86) - Debian 12")],
        }
    }

    fn valid_record() -> ExternalRecord {
        ExternalRecord::from_value(json!({
            "serverType": "cx22",
            "serverLocation": "fsn1",
            "imageId": "1",
            "networks": [],
            "serverLabel": ["env=test"]
        }))
        .unwrap()
    }

    #[test]
    fn test_inbound_sync_never_writes_back() {
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = valid_record();
        let before = record.clone();

        let outcome = reconciler.derive_internal_from_external(&mut record);

        let InboundOutcome::Applied(outcome) = outcome else {
            panic!("inbound sync was not applied");
        };
        assert!(outcome.valid);
        assert!(!outcome.synced);
        assert_eq!(reconciler.outbound_syncs(), 0);
        assert_eq!(record, before);
        assert_eq!(reconciler.config().labels["env"], "test");
        assert_eq!(
            outcome.refresh.as_ref().and_then(InstanceTypeRefresh::location),
            Some("fsn1")
        );
    }

    #[test]
    fn test_outbound_sync_blocked_while_inbound_runs() {
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = valid_record();
        reconciler.derive_internal_from_external(&mut record);

        reconciler.syncing_inbound = true;
        assert!(!reconciler.project_external_from_internal(&mut record));
        reconciler.syncing_inbound = false;
        assert!(reconciler.project_external_from_internal(&mut record));
    }

    #[test]
    fn test_inbound_sync_suppressed_during_outbound() {
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = valid_record();
        reconciler.syncing_outbound = true;
        assert_eq!(
            reconciler.derive_internal_from_external(&mut record),
            InboundOutcome::Suppressed
        );
        assert_eq!(reconciler.config(), &NodeConfiguration::default());
    }

    #[test]
    fn test_valid_edit_syncs_and_echo_is_ignored() {
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = valid_record();
        reconciler.derive_internal_from_external(&mut record);

        let outcome = reconciler.apply_edit(&mut record, FieldEdit::SshKey(Some(77)));
        assert!(outcome.valid && outcome.synced);
        assert_eq!(record.get("existingKeyId"), Some(&json!("77")));
        assert_eq!(record.get("userDataFromFile"), Some(&json!(true)));

        assert_eq!(
            reconciler.derive_internal_from_external(&mut record),
            InboundOutcome::Echo
        );

        // an outside change after our write is derived again
        record.set("imageId", "2");
        assert!(matches!(
            reconciler.derive_internal_from_external(&mut record),
            InboundOutcome::Applied(_)
        ));
        assert_eq!(reconciler.config().image, Some(2));
        assert_eq!(reconciler.config().ssh_key, Some(77));
    }

    #[test]
    fn test_invalid_edit_withholds_sync() {
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = valid_record();
        reconciler.derive_internal_from_external(&mut record);
        let validity = reconciler.subscribe_validity();
        assert!(*validity.borrow());

        let revision = record.revision();
        let outcome = reconciler.apply_edit(&mut record, FieldEdit::DisableIpv4(true));
        assert!(!outcome.valid);
        assert!(!outcome.synced);
        assert_eq!(record.revision(), revision);
        assert!(!*validity.borrow());
        assert_eq!(
            reconciler.violations(),
            vec![Violation::PublicDisabledWithoutPrivateNetwork]
        );

        reconciler.apply_edit(&mut record, FieldEdit::UsePrivateNetwork(true));
        assert!(!reconciler.is_valid());
        let outcome = reconciler.apply_edit(&mut record, FieldEdit::Networks(vec![5]));
        assert!(outcome.valid && outcome.synced);
        assert!(*validity.borrow());
        assert_eq!(record.get("disablePublicIpv4"), Some(&json!(true)));
    }

    #[test]
    fn test_stale_refresh_is_discarded() {
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = ExternalRecord::new();

        let first = reconciler
            .apply_edit(&mut record, FieldEdit::Location(Some("fsn1".to_string())))
            .refresh
            .unwrap();
        let second = reconciler
            .apply_edit(&mut record, FieldEdit::Location(Some("ash".to_string())))
            .refresh
            .unwrap();

        assert_eq!(
            reconciler.apply_instance_types(second, types(&["cpx11"])),
            RefreshOutcome::Applied {
                cleared_selection: false
            }
        );
        assert_eq!(
            reconciler.apply_instance_types(first, types(&["cx22"])),
            RefreshOutcome::Stale
        );
        assert!(reconciler.catalog().contains(ResourceKind::InstanceType, "cpx11"));
        assert!(!reconciler.catalog().contains(ResourceKind::InstanceType, "cx22"));
    }

    #[test]
    fn test_same_location_does_not_refresh() {
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = valid_record();
        reconciler.derive_internal_from_external(&mut record);

        let outcome =
            reconciler.apply_edit(&mut record, FieldEdit::Location(Some("fsn1".to_string())));
        assert!(outcome.refresh.is_none());
    }

    #[tokio::test]
    async fn test_location_change_clears_unavailable_instance_type() {
        let aggregator = fake_aggregator();
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = valid_record();
        reconciler.derive_internal_from_external(&mut record);

        let outcome = reconciler
            .change_location(&aggregator, &mut record, Some("ash".to_string()))
            .await;

        assert!(!outcome.valid);
        assert_eq!(reconciler.config().instance_type, None);
        assert!(!reconciler.is_valid());
        assert!(reconciler.catalog().contains(ResourceKind::InstanceType, "cpx11"));
    }

    #[tokio::test]
    async fn test_location_change_keeps_available_instance_type() {
        let aggregator = fake_aggregator();
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = valid_record();
        reconciler.apply_edit(&mut record, FieldEdit::InstanceType(Some("cx32".to_string())));

        let outcome = reconciler
            .change_location(&aggregator, &mut record, Some("fsn1".to_string()))
            .await;

        assert_eq!(reconciler.config().instance_type.as_deref(), Some("cx32"));
        assert!(!outcome.valid);

        let outcome = reconciler.apply_edit(&mut record, FieldEdit::Image(Some(1)));
        assert!(outcome.valid && outcome.synced);
        assert_eq!(record.get("serverType"), Some(&json!("cx32")));
    }

    #[tokio::test]
    async fn test_load_fills_catalog_and_clears_loading() {
        let aggregator = fake_aggregator();
        let notifier = RecordingNotifier::default();
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = valid_record();
        reconciler.derive_internal_from_external(&mut record);

        reconciler
            .load(&aggregator, &notifier, Duration::from_secs(5))
            .await;

        assert!(!reconciler.is_loading());
        assert_eq!(reconciler.catalog().get(ResourceKind::Location).len(), 2);
        assert!(reconciler.catalog().contains(ResourceKind::InstanceType, "cx32"));
        assert!(reconciler.catalog().contains(ResourceKind::Image, "1"));
        assert!(notifier.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_reports_failures_once() {
        let notifier = RecordingNotifier::default();
        let mut reconciler = ConfigurationReconciler::new();
        reconciler
            .load(&FakeAggregator::default(), &notifier, Duration::from_secs(5))
            .await;
        assert_eq!(
            notifier.messages.lock().unwrap().as_slice(),
            &[("error", "Failed to load resources".to_string())]
        );

        let notifier = RecordingNotifier::default();
        let aggregator = FakeAggregator {
            locations: Vec::new(),
            ..fake_aggregator()
        };
        reconciler
            .load(&aggregator, &notifier, Duration::from_secs(5))
            .await;
        assert_eq!(
            notifier.messages.lock().unwrap().as_slice(),
            &[("warning", "No locations available".to_string())]
        );
    }

    #[tokio::test]
    async fn test_load_clears_instance_type_not_offered_in_location() {
        let aggregator = fake_aggregator();
        let notifier = RecordingNotifier::default();
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = ExternalRecord::from_value(json!({
            "serverType": "cx22",
            "serverLocation": "ash",
            "imageId": "1"
        }))
        .unwrap();
        let validity = reconciler.subscribe_validity();

        let InboundOutcome::Applied(outcome) = reconciler.derive_internal_from_external(&mut record)
        else {
            panic!("inbound sync was not applied");
        };
        assert!(outcome.valid);

        reconciler
            .load(&aggregator, &notifier, Duration::from_secs(5))
            .await;

        assert!(!reconciler.catalog().contains(ResourceKind::InstanceType, "cx22"));
        assert_eq!(reconciler.config().instance_type, None);
        assert!(!reconciler.is_valid());
        assert!(!*validity.borrow());

        // the ticket issued by the derive was superseded by the load
        let refresh = outcome.refresh.unwrap();
        assert_eq!(
            reconciler.apply_instance_types(refresh, types(&["cx22"])),
            RefreshOutcome::Stale
        );
    }

    #[test]
    fn test_edit_after_host_change_keeps_host_value() {
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = valid_record();
        reconciler.derive_internal_from_external(&mut record);

        record.set("imageId", "999");
        let outcome = reconciler.apply_edit(&mut record, FieldEdit::SshKey(Some(5)));

        assert!(outcome.valid && outcome.synced);
        assert_eq!(reconciler.config().image, Some(999));
        assert_eq!(record.get("imageId"), Some(&json!("999")));
        assert_eq!(record.get("existingKeyId"), Some(&json!("5")));
        assert!(outcome.refresh.is_none());
    }

    #[test]
    fn test_edit_after_host_location_change_issues_refresh() {
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = valid_record();
        reconciler.derive_internal_from_external(&mut record);

        record.set("serverLocation", "ash");
        let outcome = reconciler.apply_edit(&mut record, FieldEdit::SshKey(Some(5)));

        assert_eq!(reconciler.config().location.as_deref(), Some("ash"));
        assert_eq!(
            outcome.refresh.as_ref().and_then(InstanceTypeRefresh::location),
            Some("ash")
        );
        assert_eq!(record.get("serverLocation"), Some(&json!("ash")));
    }

    #[tokio::test]
    async fn test_clearing_location_rebuilds_instance_types() {
        let aggregator = FakeAggregator {
            instance_types: [("ash".to_string(), types(&["cpx11"]))]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = ExternalRecord::new();

        reconciler
            .change_location(&aggregator, &mut record, Some("ash".to_string()))
            .await;
        reconciler.apply_edit(&mut record, FieldEdit::InstanceType(Some("cpx11".to_string())));

        // an unfiltered list without cpx11 clears the selection
        let aggregator = FakeAggregator {
            instance_types: [("fsn1".to_string(), types(&["cx22"]))]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let mut outcome = reconciler.apply_edit(&mut record, FieldEdit::Location(None));
        let refresh = outcome.refresh.take().unwrap();
        assert_eq!(refresh.location(), None);

        let options = aggregator.instance_types(refresh.location()).await;
        assert_eq!(
            reconciler.apply_instance_types(refresh, options),
            RefreshOutcome::Applied {
                cleared_selection: true
            }
        );
        assert!(reconciler.catalog().contains(ResourceKind::InstanceType, "cx22"));
        assert!(!reconciler.catalog().contains(ResourceKind::InstanceType, "cpx11"));
        assert_eq!(reconciler.config().instance_type, None);
    }

    #[tokio::test]
    async fn test_clearing_location_keeps_type_offered_everywhere() {
        let aggregator = fake_aggregator();
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = ExternalRecord::new();

        reconciler
            .change_location(&aggregator, &mut record, Some("ash".to_string()))
            .await;
        reconciler.apply_edit(&mut record, FieldEdit::InstanceType(Some("cpx11".to_string())));

        reconciler.change_location(&aggregator, &mut record, None).await;

        assert_eq!(reconciler.config().instance_type.as_deref(), Some("cpx11"));
        assert!(reconciler.catalog().contains(ResourceKind::InstanceType, "cx22"));
        assert!(reconciler.catalog().contains(ResourceKind::InstanceType, "cpx11"));
    }

    #[test]
    fn test_blank_names_count_as_unset() {
        let mut reconciler = ConfigurationReconciler::new();
        let mut record = valid_record();
        reconciler.derive_internal_from_external(&mut record);

        let revision = record.revision();
        let outcome = reconciler.apply_edit(&mut record, FieldEdit::Location(Some(String::new())));
        assert_eq!(reconciler.config().location, None);
        assert!(!outcome.valid && !outcome.synced);
        assert_eq!(record.revision(), revision);

        reconciler.apply_edit(&mut record, FieldEdit::Location(Some("fsn1".to_string())));
        let outcome =
            reconciler.apply_edit(&mut record, FieldEdit::InstanceType(Some("  ".to_string())));
        assert_eq!(reconciler.config().instance_type, None);
        assert!(!outcome.valid);
        assert_eq!(
            reconciler.violations(),
            vec![Violation::MissingInstanceType]
        );
    }
}
