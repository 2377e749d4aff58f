//! Presentation configuration

use explore_page::{EventTypeSpec, StatVarSpec};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Configuration loading errors, shared by every TOML-loaded config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// What is wrong
        message: String,
    },
}

/// Display policy shared by both page builders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Display names for variables and topics
    pub sv_names: HashMap<String, String>,
    /// Display units
    pub sv_units: HashMap<String, String>,
    /// Scaling factors
    pub sv_scaling: HashMap<String, f64>,
    /// Denominators
    pub sv_denominators: HashMap<String, String>,
    /// Variables plotted on a log scale
    pub log_scale_vars: HashSet<String>,
    /// SDG variables measured in percent
    pub sdg_percent_vars: HashSet<String>,
    /// Event type specs by key
    pub event_type_specs: BTreeMap<String, EventTypeSpec>,
    /// Maximum blocks in one category
    pub max_blocks_per_category: usize,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            sv_names: HashMap::new(),
            sv_units: HashMap::new(),
            sv_scaling: HashMap::new(),
            sv_denominators: HashMap::new(),
            log_scale_vars: HashSet::new(),
            sdg_percent_vars: HashSet::new(),
            event_type_specs: BTreeMap::new(),
            max_blocks_per_category: 20,
        }
    }
}

impl PresentationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// - `ConfigError::Parse` for malformed TOML
    /// - `ConfigError::InvalidValue` if `max_blocks_per_category` is zero
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        if config.max_blocks_per_category == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_blocks_per_category",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(config)
    }

    /// With display name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, dcid: impl Into<String>, name: impl Into<String>) -> Self {
        self.sv_names.insert(dcid.into(), name.into());
        self
    }

    /// With max blocks per category
    #[inline]
    #[must_use]
    pub fn with_max_blocks(mut self, max: usize) -> Self {
        self.max_blocks_per_category = max;
        self
    }

    /// Display name, falling back to the identifier
    #[inline]
    #[must_use]
    pub fn name_for<'a>(&'a self, dcid: &'a str) -> &'a str {
        self.sv_names.get(dcid).map_or(dcid, String::as_str)
    }

    /// Display spec for a variable
    #[must_use]
    pub fn stat_var_spec(&self, sv: &str) -> StatVarSpec {
        let mut spec = StatVarSpec::new(sv, self.name_for(sv));
        if let Some(unit) = self.sv_units.get(sv) {
            spec = spec.with_unit(unit.clone());
        }
        if let Some(scaling) = self.sv_scaling.get(sv) {
            spec = spec.with_scaling(*scaling);
        }
        if let Some(denom) = self.sv_denominators.get(sv) {
            spec = spec.with_denom(denom.clone());
        }
        if self.log_scale_vars.contains(sv) {
            spec = spec.log_scale();
        }
        spec
    }
}
