//! Error types for the fulfillment pipeline

pub use explore_builder::ConfigError;

/// Fulfillment error
///
/// Only [`FulfillError::NoPlacesToCheck`] and [`FulfillError::Timeout`] end a
/// call early; collaborator failures inside a stage are counted and treated
/// as "nothing found".
#[derive(Debug, thiserror::Error)]
pub enum FulfillError {
    /// No target places resolved for existence checks
    #[error("no places to check")]
    NoPlacesToCheck,

    /// Caller-level deadline elapsed
    #[error("fulfillment timed out after {duration_ms}ms")]
    Timeout {
        /// Deadline in milliseconds
        duration_ms: u64,
    },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl FulfillError {
    /// Counter key recorded for this failure
    #[inline]
    #[must_use]
    pub fn counter_key(&self) -> &'static str {
        match self {
            Self::NoPlacesToCheck => "failed_NoPlacesToCheck",
            Self::Timeout { .. } => "failed_Timeout",
            Self::Config(_) => "failed_Config",
        }
    }
}
