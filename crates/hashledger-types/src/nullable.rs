//! Serde helper: `null` string fields decode to the empty string.

use serde::{Deserialize, Deserializer};

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
