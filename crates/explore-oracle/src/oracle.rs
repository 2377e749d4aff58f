//! Existence oracle interface

use crate::error::OracleError;
use async_trait::async_trait;
use explore_vars::PlaceType;
use std::collections::{BTreeMap, BTreeSet};

/// Place → variables with observed data there
pub type ExistenceMap = BTreeMap<String, BTreeSet<String>>;

/// Reports which (place, variable) pairs have observed data
///
/// Implementations must accept large batches; callers issue one call per
/// distinct batch, never one per variable.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ExistenceOracle: Send + Sync {
    /// Existing subset of `svs` for each of `places`
    ///
    /// Places with no existing variable may be omitted from the result.
    async fn check(&self, places: &[String], svs: &[String]) -> Result<ExistenceMap, OracleError>;

    /// Sample of child places of `place_type` within `parent`, at most `limit`
    async fn sample_child_places(
        &self,
        _parent: &str,
        _place_type: &PlaceType,
        _limit: usize,
    ) -> Result<Vec<String>, OracleError> {
        Ok(Vec::new())
    }
}
