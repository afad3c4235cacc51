//! Content hash record.

use serde::{Deserialize, Serialize};

/// Evidence that a document with the given content hash was registered.
///
/// Hash records are write-once: once stored under a hash, they are never
/// overwritten or deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRecord {
    /// Content hash; the primary identifier.
    #[serde(
        default,
        deserialize_with = "crate::nullable::string",
        skip_serializing_if = "String::is_empty"
    )]
    pub hash: String,

    /// Name of the owner that registered the hash.
    #[serde(
        rename = "name",
        default,
        deserialize_with = "crate::nullable::string",
        skip_serializing_if = "String::is_empty"
    )]
    pub owner_name: String,

    /// Registration date, as supplied by the caller.
    #[serde(
        default,
        deserialize_with = "crate::nullable::string",
        skip_serializing_if = "String::is_empty"
    )]
    pub date: String,

    /// Free-form description of the hashed content.
    #[serde(
        default,
        deserialize_with = "crate::nullable::string",
        skip_serializing_if = "String::is_empty"
    )]
    pub description: String,
}

impl HashRecord {
    /// Create a hash record.
    pub fn new(
        hash: impl Into<String>,
        owner_name: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            owner_name: owner_name.into(),
            date: date.into(),
            description: description.into(),
        }
    }
}
