//! Collaborator errors
//!
//! Fulfillment never propagates these: a failed call is logged, counted and
//! treated exactly like an empty answer.

/// Errors from remote collaborators
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// Service unreachable or refused the call
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Call exceeded its deadline
    #[error("call timed out after {duration_ms}ms")]
    Timeout {
        /// Elapsed time in milliseconds
        duration_ms: u64,
    },

    /// Response could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Transport-level failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl OracleError {
    /// Check if a retry could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Timeout { .. } | Self::Transport(_)
        )
    }

    /// Short counter label for this error
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Timeout { .. } => "timeout",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Transport(_) => "transport",
        }
    }
}
