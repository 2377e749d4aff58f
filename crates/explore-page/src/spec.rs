//! Display specs for variables and event types

use serde::{Deserialize, Serialize};

/// Per-variable display metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatVarSpec {
    /// Variable identifier
    pub stat_var: String,
    /// Denominator variable, empty for none
    pub denom: String,
    /// Display unit
    pub unit: String,
    /// Scaling factor, 0 for none
    pub scaling: f64,
    /// Plot on a log scale
    pub log: bool,
    /// Display name
    pub name: String,
}

impl StatVarSpec {
    /// Create spec with display name
    #[inline]
    #[must_use]
    pub fn new(stat_var: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            stat_var: stat_var.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// With denominator
    #[inline]
    #[must_use]
    pub fn with_denom(mut self, denom: impl Into<String>) -> Self {
        self.denom = denom.into();
        self
    }

    /// With unit
    #[inline]
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// With scaling factor
    #[inline]
    #[must_use]
    pub fn with_scaling(mut self, scaling: f64) -> Self {
        self.scaling = scaling;
        self
    }

    /// Plot on log scale
    #[inline]
    #[must_use]
    pub fn log_scale(mut self) -> Self {
        self.log = true;
        self
    }
}

/// Event type definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventTypeSpec {
    /// Key used by tiles
    pub id: String,
    /// Display name
    pub name: String,
    /// Event type identifiers
    pub event_type_dcids: Vec<String>,
    /// Display color
    pub color: String,
}

impl EventTypeSpec {
    /// Create event type spec
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, dcids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            event_type_dcids: dcids,
            color: String::new(),
        }
    }
}
