//! Domain models
//!
//! Enumerations shared between the server and API clients. Values travel as
//! lower-case strings, hyphenated where the word has one (`in-progress`).

pub mod inventory;
pub mod maintenance;
pub mod tenant;

use serde::de::{DeserializeOwned, value};
use serde::{Deserialize, Deserializer};

// Re-exports
pub use inventory::*;
pub use maintenance::*;
pub use tenant::*;

/// Parse a string enum value the same way serde would read it from JSON
///
/// Used for path segments and query values that arrive as raw strings.
pub fn parse_enum<T: DeserializeOwned>(raw: &str) -> Option<T> {
    T::deserialize(value::StrDeserializer::<value::Error>::new(raw)).ok()
}

/// Treat an empty string as an absent optional value
///
/// Browser forms submit `""` for unselected dropdowns.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => T::deserialize(value::StrDeserializer::<value::Error>::new(s))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
