//! Places referenced by an utterance

use serde::{Deserialize, Serialize};
use std::fmt;

/// Place type name (e.g. `State`, `County`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlaceType(pub String);

impl PlaceType {
    /// Create new place type
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved place
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Place {
    /// Place identifier
    pub dcid: String,
    /// Display name
    pub name: String,
    /// Type of this place
    pub place_type: PlaceType,
}

impl Place {
    /// Create new place
    #[inline]
    #[must_use]
    pub fn new(
        dcid: impl Into<String>,
        name: impl Into<String>,
        place_type: impl Into<String>,
    ) -> Self {
        Self {
            dcid: dcid.into(),
            name: name.into(),
            place_type: PlaceType::new(place_type),
        }
    }
}
