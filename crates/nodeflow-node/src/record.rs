//! External configuration record and its decode/encode rules
//!
//! The host stores node settings as a loosely-typed JSON object: ids as
//! strings, lists as string arrays, labels as `key=value` strings. Decoding is
//! total: anything missing or malformed becomes "unset" rather than an error.

use crate::config::NodeConfiguration;
use crate::error::{DecodeError, Result};
use serde_json::{Map, Value};

pub const SERVER_TYPE: &str = "serverType";
pub const SERVER_LOCATION: &str = "serverLocation";
pub const IMAGE_ID: &str = "imageId";
pub const PLACEMENT_GROUP: &str = "placementGroup";
pub const NETWORKS: &str = "networks";
pub const FIREWALLS: &str = "firewalls";
pub const EXISTING_KEY_ID: &str = "existingKeyId";
pub const USE_PRIVATE_NETWORK: &str = "usePrivateNetwork";
pub const DISABLE_PUBLIC: &str = "disablePublic";
pub const DISABLE_PUBLIC_IPV4: &str = "disablePublicIpv4";
pub const DISABLE_PUBLIC_IPV6: &str = "disablePublicIpv6";
pub const ADDITIONAL_USER_DATA: &str = "additionalUserData";
pub const USER_DATA_FROM_FILE: &str = "userDataFromFile";
pub const SERVER_LABEL: &str = "serverLabel";

/// Host-owned configuration record
///
/// Every write bumps `revision`, which lets the reconciler recognize a
/// record it wrote itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalRecord {
    fields: Map<String, Value>,
    revision: u64,
}

impl ExternalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self {
                fields,
                revision: 0,
            }),
            other => Err(DecodeError::NotAnObject(json_type(&other))),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(s)?)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
        self.revision += 1;
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.fields.remove(key);
        if removed.is_some() {
            self.revision += 1;
        }
        removed
    }

    /// Derive the internal configuration from this record
    pub fn decode(&self) -> NodeConfiguration {
        NodeConfiguration {
            location: self.name(SERVER_LOCATION),
            instance_type: self.name(SERVER_TYPE),
            image: self.id(IMAGE_ID),
            placement_group: self.id(PLACEMENT_GROUP),
            networks: self.id_list(NETWORKS),
            firewalls: self.id_list(FIREWALLS),
            ssh_key: self.id(EXISTING_KEY_ID),
            use_private_network: self.flag(USE_PRIVATE_NETWORK),
            disable_public_network: self.flag(DISABLE_PUBLIC),
            disable_ipv4: self.flag(DISABLE_PUBLIC_IPV4),
            disable_ipv6: self.flag(DISABLE_PUBLIC_IPV6),
            user_data: self.text(ADDITIONAL_USER_DATA).unwrap_or_default(),
            labels: self
                .strings(SERVER_LABEL)
                .into_iter()
                .map(|entry| match entry.split_once('=') {
                    Some((key, value)) => (key.to_string(), value.to_string()),
                    None => (entry, String::new()),
                })
                .collect(),
        }
    }

    /// Write every field of `config` into this record
    ///
    /// `userDataFromFile` is always set. When public networking is disabled
    /// as a whole, the per-protocol flags are written as false.
    pub fn encode(&mut self, config: &NodeConfiguration) {
        self.set_optional(SERVER_TYPE, config.instance_type.clone());
        self.set_optional(SERVER_LOCATION, config.location.clone());
        self.set_optional(IMAGE_ID, config.image.map(|id| id.to_string()));
        self.set_optional(
            PLACEMENT_GROUP,
            config.placement_group.map(|id| id.to_string()),
        );
        self.set(NETWORKS, id_strings(&config.networks));
        self.set(FIREWALLS, id_strings(&config.firewalls));
        self.set_optional(EXISTING_KEY_ID, config.ssh_key.map(|id| id.to_string()));
        self.set(USE_PRIVATE_NETWORK, config.use_private_network);

        let whole = config.disable_public_network;
        self.set(DISABLE_PUBLIC, whole);
        self.set(DISABLE_PUBLIC_IPV4, !whole && config.disable_ipv4);
        self.set(DISABLE_PUBLIC_IPV6, !whole && config.disable_ipv6);

        self.set(ADDITIONAL_USER_DATA, config.user_data.clone());
        self.set(USER_DATA_FROM_FILE, true);
        self.set(
            SERVER_LABEL,
            config
                .labels
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>(),
        );
    }

    fn set_optional(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(value) => self.set(key, value),
            None => {
                self.remove(key);
            }
        }
    }

    fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn name(&self, key: &str) -> Option<String> {
        self.text(key).filter(|s| !s.trim().is_empty())
    }

    fn id(&self, key: &str) -> Option<u64> {
        let value = self.fields.get(key)?;
        let id = parse_id(value);
        if id.is_none() && !is_blank(value) {
            tracing::debug!("Ignoring non-numeric {}: {}", key, value);
        }
        id
    }

    fn id_list(&self, key: &str) -> Vec<u64> {
        match self.fields.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(parse_id).collect(),
            _ => Vec::new(),
        }
    }

    fn strings(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn flag(&self, key: &str) -> bool {
        match self.fields.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

fn parse_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn id_strings(ids: &[u64]) -> Vec<String> {
    ids.iter().map(u64::to_string).collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
