//! Sibling suggestion interface (extension)

use crate::error::OracleError;
use async_trait::async_trait;
use explore_vars::ChartVarsMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What a sibling request is seeded with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiblingSeed {
    /// Topics that produced charts
    Topics(Vec<String>),
    /// Individual variables flagged for explore-more
    Variables(Vec<String>),
}

impl SiblingSeed {
    /// Seed identifiers
    #[inline]
    #[must_use]
    pub fn ids(&self) -> &[String] {
        match self {
            Self::Topics(ids) | Self::Variables(ids) => ids,
        }
    }
}

/// Sibling suggestion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingRequest {
    /// Seed identifiers
    pub seed: SiblingSeed,
    /// Variables that must not be suggested again
    pub exclude: BTreeSet<String>,
    /// Caller-supplied variable groups to force-include
    pub override_groups: Vec<String>,
}

impl SiblingRequest {
    /// Request seeded by topics
    #[inline]
    #[must_use]
    pub fn topics(topics: Vec<String>, exclude: BTreeSet<String>) -> Self {
        Self {
            seed: SiblingSeed::Topics(topics),
            exclude,
            override_groups: Vec::new(),
        }
    }

    /// Request seeded by variables
    #[inline]
    #[must_use]
    pub fn variables(svs: Vec<String>) -> Self {
        Self {
            seed: SiblingSeed::Variables(svs),
            exclude: BTreeSet::new(),
            override_groups: Vec::new(),
        }
    }

    /// With override groups
    #[inline]
    #[must_use]
    pub fn with_override_groups(mut self, groups: Vec<String>) -> Self {
        self.override_groups = groups;
        self
    }
}

/// Suggests sibling/peer variable groups
///
/// The result is keyed by the seed identifier each group was derived from.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait SiblingSuggester: Send + Sync {
    /// Suggest sibling groups for the request
    async fn suggest_siblings(&self, request: &SiblingRequest) -> Result<ChartVarsMap, OracleError>;
}
