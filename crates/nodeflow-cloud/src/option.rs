//! Selectable option model shared by every resource kind

use serde::Serialize;
use std::fmt;

/// Prefix carried by every group-header sentinel value
pub const GROUP_HEADER_PREFIX: &str = "__group_header:";

/// Underlying value of a selectable option
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Numeric provider id (images, networks, firewalls, ...)
    Id(u64),
    /// Textual provider id (location name, instance type name)
    Name(String),
    /// Sentinel used by group headers, never selectable
    GroupHeader(String),
}

impl OptionValue {
    pub fn group_header(tag: &str) -> Self {
        OptionValue::GroupHeader(format!("{}{}", GROUP_HEADER_PREFIX, tag))
    }

    /// Whether a user may pick this value
    pub fn is_selectable(&self) -> bool {
        !matches!(self, OptionValue::GroupHeader(_))
    }

    pub fn as_id(&self) -> Option<u64> {
        match self {
            OptionValue::Id(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            OptionValue::Name(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Id(id) => write!(f, "{}", id),
            OptionValue::Name(name) => write!(f, "{}", name),
            OptionValue::GroupHeader(sentinel) => write!(f, "{}", sentinel),
        }
    }
}

impl From<u64> for OptionValue {
    fn from(id: u64) -> Self {
        OptionValue::Id(id)
    }
}

impl From<&str> for OptionValue {
    fn from(name: &str) -> Self {
        OptionValue::Name(name.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(name: String) -> Self {
        OptionValue::Name(name)
    }
}

/// One inventory entry offered to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectableOption {
    /// Value stored in the configuration when this option is picked
    pub value: OptionValue,

    /// Display label
    pub label: String,

    /// Disabled options render but cannot be picked
    pub disabled: bool,

    /// Group the option belongs to, if the list is grouped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_tag: Option<String>,
}

impl SelectableOption {
    pub fn new(value: impl Into<OptionValue>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
            group_tag: None,
        }
    }

    /// Build a non-selectable header separating one group from the next
    pub fn group_header(tag: &str, label: impl Into<String>) -> Self {
        Self {
            value: OptionValue::group_header(tag),
            label: label.into(),
            disabled: true,
            group_tag: Some(tag.to_string()),
        }
    }

    pub fn with_group(mut self, tag: impl Into<String>) -> Self {
        self.group_tag = Some(tag.into());
        self
    }

    pub fn is_header(&self) -> bool {
        !self.value.is_selectable()
    }
}
