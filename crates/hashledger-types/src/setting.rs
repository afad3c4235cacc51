//! User setting record.

use serde::{Deserialize, Serialize};

/// Contact settings for one user.
///
/// Settings are always current: uploading a setting for an existing name
/// replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingRecord {
    /// User name; the primary identifier.
    #[serde(
        default,
        deserialize_with = "crate::nullable::string",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,

    /// Contact email address.
    #[serde(
        default,
        deserialize_with = "crate::nullable::string",
        skip_serializing_if = "String::is_empty"
    )]
    pub email: String,

    /// Contact phone number.
    #[serde(
        default,
        deserialize_with = "crate::nullable::string",
        skip_serializing_if = "String::is_empty"
    )]
    pub phone: String,
}

impl SettingRecord {
    /// Create a setting record.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self { name: name.into(), email: email.into(), phone: phone.into() }
    }
}
