//! Trail enums.
//!
//! Uses `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! matching the string stored by the persistence boundary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of mutation a trail records.
///
/// `None` is the unset state of a freshly constructed record; producers are
/// expected to pick one of the three mutation kinds before persisting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TrailType {
    #[default]
    None,
    Create,
    Update,
    Delete,
}

impl TrailType {
    /// Return the string representation used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for TrailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
