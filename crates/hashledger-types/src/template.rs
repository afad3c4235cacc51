//! Named template record.

use serde::{Deserialize, Serialize};

/// A named template.
///
/// Also used as the payload of the selected-template slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Template name; the primary identifier.
    #[serde(
        default,
        deserialize_with = "crate::nullable::string",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,

    /// Template body or description.
    #[serde(
        default,
        deserialize_with = "crate::nullable::string",
        skip_serializing_if = "String::is_empty"
    )]
    pub description: String,
}

impl TemplateRecord {
    /// Create a template record.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into() }
    }
}
