//! Fulfillment configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sufficiency threshold below which extension runs
///
/// Extension runs when fewer than `min_charts` groups or fewer than
/// `min_vars` confirmed variables came out of the primary pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionThreshold {
    /// Minimum chart-variable groups
    pub min_charts: usize,
    /// Minimum confirmed variables
    pub min_vars: usize,
}

impl Default for ExtensionThreshold {
    fn default() -> Self {
        Self {
            min_charts: 3,
            min_vars: 3,
        }
    }
}

/// Fulfillment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FulfillConfig {
    /// Extension sufficiency threshold
    pub extension: ExtensionThreshold,
    /// Topic nesting levels opened (requested topics are level one)
    pub max_topic_depth: usize,
    /// Maximum correlation pairs produced
    pub max_correlation_pairs: usize,
    /// Child places sampled for contained-in queries
    pub child_place_sample_size: usize,
    /// Caller-level timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for FulfillConfig {
    fn default() -> Self {
        Self {
            extension: ExtensionThreshold::default(),
            max_topic_depth: 2,
            max_correlation_pairs: 10,
            child_place_sample_size: 5,
            timeout_secs: None,
        }
    }
}

impl FulfillConfig {
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
    /// - `ConfigError::InvalidValue` for a zero depth or sample size
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns the first out-of-range field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zero = |field: &'static str| ConfigError::InvalidValue {
            field,
            message: "must be at least 1".to_string(),
        };
        if self.max_topic_depth == 0 {
            return Err(zero("max_topic_depth"));
        }
        if self.child_place_sample_size == 0 {
            return Err(zero("child_place_sample_size"));
        }
        Ok(())
    }

    /// With extension threshold
    #[inline]
    #[must_use]
    pub fn with_extension_threshold(mut self, min_charts: usize, min_vars: usize) -> Self {
        self.extension = ExtensionThreshold {
            min_charts,
            min_vars,
        };
        self
    }

    /// With max topic depth
    #[inline]
    #[must_use]
    pub fn with_max_topic_depth(mut self, depth: usize) -> Self {
        self.max_topic_depth = depth;
        self
    }

    /// With max correlation pairs
    #[inline]
    #[must_use]
    pub fn with_max_correlation_pairs(mut self, max: usize) -> Self {
        self.max_correlation_pairs = max;
        self
    }

    /// With timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Timeout as a duration
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FulfillConfig::default();
        assert_eq!(config.extension, ExtensionThreshold { min_charts: 3, min_vars: 3 });
        assert_eq!(config.max_topic_depth, 2);
        assert!(config.timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let config = FulfillConfig::from_toml_str(
            r"
            max_correlation_pairs = 4
            timeout_secs = 30

            [extension]
            min_charts = 5
            ",
        )
        .unwrap();

        assert_eq!(config.max_correlation_pairs, 4);
        assert_eq!(config.extension.min_charts, 5);
        assert_eq!(config.extension.min_vars, 3);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_zero_depth() {
        let err = FulfillConfig::from_toml_str("max_topic_depth = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "max_topic_depth", .. }
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            FulfillConfig::from_toml_str("max_topic_depth = \"deep\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
