//! Composite key encoding for hashledger storage.
//!
//! Every record lives under a flat string key built from a fixed namespace
//! literal, a scope marker and the record's identifier(s):
//!
//! - `Hash#0#{hash}` - Hash record by hash
//! - `User#{owner}#0#{hash}` - Hash record by owner index
//! - `setting#0#{name}` - Setting record by name
//! - `temp#0#{name}` - Template record by name
//! - `selectedtemp` - Selected template slot
//!
//! # Range Boundaries
//!
//! The scope segment of every real key is [`SCOPE`] (`0`). A namespace (or one
//! owner's index) is enumerated with the half-open range
//! `[{prefix}#0, {prefix}#F)`: `0` (0x30) sorts before `F` (0x46), so every key
//! whose scope segment is `0` sorts inside the range regardless of the id that
//! follows it.
//!
//! # Delimiter
//!
//! Identifiers must not contain [`DELIMITER`]. An owner named `alice#0` would
//! otherwise produce index keys inside `alice`'s range, and a scan would
//! over-match. Such identifiers are rejected with
//! [`RepositoryError::InvalidIdentifier`] before any key is built; with the
//! delimiter excluded, the ranges of distinct namespaces and of distinct owners
//! are disjoint.

use std::ops::Range;

use crate::error::{RepositoryError, RepositoryResult};

/// Separator between key segments.
pub const DELIMITER: char = '#';

/// Scope marker carried by every stored key. Reserved for future sharding.
pub const SCOPE: &str = "0";

/// Exclusive upper scope marker used as the end of a range scan.
pub const SCOPE_END: &str = "F";

/// Fixed key of the selected-template singleton.
pub const SELECTED_TEMPLATE_KEY: &str = "selectedtemp";

/// Record namespaces and their key prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Hash records keyed by hash: `Hash#0#{hash}`.
    Hash,
    /// Owner index over hash records: `User#{owner}#0#{hash}`.
    Owner,
    /// Setting records: `setting#0#{name}`.
    Setting,
    /// Template records: `temp#0#{name}`.
    Template,
}

impl Namespace {
    /// Every namespace, in declaration order.
    pub const ALL: [Namespace; 4] =
        [Namespace::Hash, Namespace::Owner, Namespace::Setting, Namespace::Template];

    /// The literal key prefix of this namespace.
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Hash => "Hash",
            Namespace::Owner => "User",
            Namespace::Setting => "setting",
            Namespace::Template => "temp",
        }
    }

    /// Looks up a namespace by its key prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.prefix() == prefix)
    }

    /// Field name of the outer segment, for namespaces that carry one.
    pub fn outer_field(self) -> Option<&'static str> {
        match self {
            Namespace::Owner => Some("owner_name"),
            Namespace::Hash | Namespace::Setting | Namespace::Template => None,
        }
    }

    /// Whether keys in this namespace carry an outer (owner) segment.
    pub fn is_scoped(self) -> bool {
        self.outer_field().is_some()
    }
}

/// A half-open key interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    /// Inclusive lower bound.
    pub start: Vec<u8>,
    /// Exclusive upper bound.
    pub end: Vec<u8>,
}

impl KeyRange {
    /// Returns true if `key` falls inside the range.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.start.as_slice() <= key && key < self.end.as_slice()
    }

    /// Returns true if the two ranges share at least one possible key.
    pub fn overlaps(&self, other: &KeyRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl From<KeyRange> for Range<Vec<u8>> {
    fn from(range: KeyRange) -> Self {
        range.start..range.end
    }
}

/// A key decoded back into its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeKey {
    /// Namespace the key belongs to.
    pub namespace: Namespace,
    /// Outer identifier, for scoped namespaces.
    pub outer: Option<String>,
    /// Primary (or inner) identifier.
    pub id: String,
}

/// Rejects identifiers that would break key ordering.
pub fn validate_identifier(field: &'static str, value: &str) -> RepositoryResult<()> {
    if value.contains(DELIMITER) {
        return Err(RepositoryError::InvalidIdentifier { field, value: value.to_string() });
    }
    Ok(())
}

/// Build a primary key.
///
/// Schema: `{prefix}#0#{id}`
pub fn encode_primary(ns: Namespace, field: &'static str, id: &str) -> RepositoryResult<Vec<u8>> {
    validate_identifier(field, id)?;
    Ok(format!("{}{DELIMITER}{SCOPE}{DELIMITER}{}", ns.prefix(), id).into_bytes())
}

/// Build a secondary (outer-scoped) key.
///
/// Schema: `{prefix}#{outer}#0#{inner}`
pub fn encode_secondary(
    ns: Namespace,
    outer_field: &'static str,
    outer: &str,
    inner_field: &'static str,
    inner: &str,
) -> RepositoryResult<Vec<u8>> {
    validate_identifier(outer_field, outer)?;
    validate_identifier(inner_field, inner)?;
    Ok(format!("{}{DELIMITER}{}{DELIMITER}{SCOPE}{DELIMITER}{}", ns.prefix(), outer, inner)
        .into_bytes())
}

/// Range covering every key of a namespace, or of one outer scope.
///
/// Schema: `[{prefix}#0, {prefix}#F)` for unscoped namespaces and
/// `[{prefix}#{outer}#0, {prefix}#{outer}#F)` for scoped ones.
///
/// `outer` is required for scoped namespaces and rejected for the others:
/// a scoped namespace puts the outer id where the scope marker would be, so
/// `[User#0, User#F)` would match owners by their first character.
pub fn range_bounds(ns: Namespace, outer: Option<&str>) -> RepositoryResult<KeyRange> {
    match (ns.outer_field(), outer) {
        (None, None) => Ok(namespace_range(ns)),
        (Some(field), Some(outer)) => {
            validate_identifier(field, outer)?;
            Ok(KeyRange {
                start: format!("{}{DELIMITER}{outer}{DELIMITER}{SCOPE}", ns.prefix()).into_bytes(),
                end: format!("{}{DELIMITER}{outer}{DELIMITER}{SCOPE_END}", ns.prefix())
                    .into_bytes(),
            })
        },
        (Some(_), None) => Err(RepositoryError::InvalidRange {
            namespace: ns.prefix(),
            reason: "an outer identifier is required",
        }),
        (None, Some(_)) => Err(RepositoryError::InvalidRange {
            namespace: ns.prefix(),
            reason: "the namespace has no outer identifier",
        }),
    }
}

// Only sound for unscoped namespaces.
fn namespace_range(ns: Namespace) -> KeyRange {
    KeyRange {
        start: format!("{}{DELIMITER}{SCOPE}", ns.prefix()).into_bytes(),
        end: format!("{}{DELIMITER}{SCOPE_END}", ns.prefix()).into_bytes(),
    }
}

/// Decodes a stored key. Returns `None` for keys outside the schema.
pub fn parse(key: &[u8]) -> Option<CompositeKey> {
    let key = std::str::from_utf8(key).ok()?;
    let segments: Vec<&str> = key.split(DELIMITER).collect();
    let namespace = Namespace::from_prefix(segments.first()?)?;

    match (namespace.is_scoped(), segments.as_slice()) {
        (false, [_, scope, id]) if *scope == SCOPE => {
            Some(CompositeKey { namespace, outer: None, id: (*id).to_string() })
        },
        (true, [_, outer, scope, id]) if *scope == SCOPE => Some(CompositeKey {
            namespace,
            outer: Some((*outer).to_string()),
            id: (*id).to_string(),
        }),
        _ => None,
    }
}

/// Key builders for hash records.
pub mod hash {
    use super::{encode_primary, namespace_range, KeyRange, Namespace};
    use crate::error::RepositoryResult;

    /// Build key for a hash record.
    ///
    /// Schema: `Hash#0#{hash}`
    #[inline]
    pub fn by_hash(hash: &str) -> RepositoryResult<Vec<u8>> {
        encode_primary(Namespace::Hash, "hash", hash)
    }

    /// Range over every hash record.
    #[inline]
    pub fn range() -> KeyRange {
        namespace_range(Namespace::Hash)
    }
}

/// Key builders for the owner index over hash records.
pub mod owner {
    use super::{encode_secondary, range_bounds, KeyRange, Namespace};
    use crate::error::RepositoryResult;

    /// Build the owner index key of a hash record.
    ///
    /// Schema: `User#{owner}#0#{hash}`
    #[inline]
    pub fn entry(owner: &str, hash: &str) -> RepositoryResult<Vec<u8>> {
        encode_secondary(Namespace::Owner, "owner_name", owner, "hash", hash)
    }

    /// Range over one owner's index entries.
    ///
    /// Schema: `[User#{owner}#0, User#{owner}#F)`
    #[inline]
    pub fn range(owner: &str) -> RepositoryResult<KeyRange> {
        range_bounds(Namespace::Owner, Some(owner))
    }
}

/// Key builders for setting records.
pub mod setting {
    use super::{encode_primary, namespace_range, KeyRange, Namespace};
    use crate::error::RepositoryResult;

    /// Build key for a setting record.
    ///
    /// Schema: `setting#0#{name}`
    #[inline]
    pub fn by_name(name: &str) -> RepositoryResult<Vec<u8>> {
        encode_primary(Namespace::Setting, "name", name)
    }

    /// Range over every setting record.
    #[inline]
    pub fn range() -> KeyRange {
        namespace_range(Namespace::Setting)
    }
}

/// Key builders for template records.
pub mod template {
    use super::{encode_primary, namespace_range, KeyRange, Namespace};
    use crate::error::RepositoryResult;

    /// Build key for a template record.
    ///
    /// Schema: `temp#0#{name}`
    #[inline]
    pub fn by_name(name: &str) -> RepositoryResult<Vec<u8>> {
        encode_primary(Namespace::Template, "name", name)
    }

    /// Range over every template record.
    #[inline]
    pub fn range() -> KeyRange {
        namespace_range(Namespace::Template)
    }
}

/// Key of the selected-template slot.
pub mod selected_template {
    use super::SELECTED_TEMPLATE_KEY;

    /// Schema: `selectedtemp`
    #[inline]
    pub fn slot() -> Vec<u8> {
        SELECTED_TEMPLATE_KEY.as_bytes().to_vec()
    }
}
