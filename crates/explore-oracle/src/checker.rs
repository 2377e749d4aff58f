//! Per-request existence checker using moka
//!
//! Deduplicates (place, variable) lookups across every stage of one
//! fulfillment call. Uncached pairs are resolved with a single batched
//! [`ExistenceOracle::check`] call per request batch.

use crate::error::OracleError;
use crate::oracle::ExistenceOracle;
use moka::future::Cache;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Cache key for a single verdict
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExistenceKey {
    place: String,
    sv: String,
}

impl ExistenceKey {
    /// Create key
    #[inline]
    #[must_use]
    pub fn new(place: impl Into<String>, sv: impl Into<String>) -> Self {
        Self {
            place: place.into(),
            sv: sv.into(),
        }
    }
}

/// Existing subset of a requested variable set for one place
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistenceResult {
    /// Place checked
    pub place: String,
    /// Variables with data, in request order
    pub exist_svs: Vec<String>,
}

/// Key for memoized per-place results: place plus sorted variable set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResultKey {
    place: String,
    svs: Vec<String>,
}

impl ResultKey {
    fn new(place: &str, svs: &[String]) -> Self {
        let mut sorted: Vec<String> = svs.to_vec();
        sorted.sort();
        sorted.dedup();
        Self {
            place: place.to_string(),
            svs: sorted,
        }
    }
}

/// Statistics for a checker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckerStats {
    /// Remote calls issued
    pub oracle_calls: usize,
    /// Remote calls that failed
    pub failures: usize,
}

/// Batched, deduplicating existence checker scoped to one request
pub struct ExistenceChecker {
    oracle: Arc<dyn ExistenceOracle>,
    verdicts: Cache<ExistenceKey, bool>,
    results: Cache<ResultKey, Arc<BTreeSet<String>>>,
    oracle_calls: AtomicUsize,
    failures: AtomicUsize,
}

impl fmt::Debug for ExistenceChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExistenceChecker")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl ExistenceChecker {
    /// Create checker
    ///
    /// Both caches are unbounded: a verdict is never evicted while the
    /// checker is alive, and the checker lives for one call.
    #[inline]
    #[must_use]
    pub fn new(oracle: Arc<dyn ExistenceOracle>) -> Self {
        Self {
            oracle,
            verdicts: Cache::builder().build(),
            results: Cache::builder().build(),
            oracle_calls: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    /// Underlying oracle
    #[inline]
    #[must_use]
    pub fn oracle(&self) -> &Arc<dyn ExistenceOracle> {
        &self.oracle
    }

    /// Resolve every uncached (place, variable) pair in one remote call
    ///
    /// On failure the uncached pairs are recorded as absent, so the call is
    /// not reissued within this request, and the error is returned for the
    /// caller to count.
    ///
    /// # Errors
    /// Returns the oracle's error after caching the pairs as absent
    pub async fn ensure(&self, places: &[String], svs: &[String]) -> Result<(), OracleError> {
        let mut missing_places = BTreeSet::new();
        let mut missing_svs = BTreeSet::new();
        for place in places {
            for sv in svs {
                if self
                    .verdicts
                    .get(&ExistenceKey::new(place.as_str(), sv.as_str()))
                    .await
                    .is_none()
                {
                    missing_places.insert(place.clone());
                    missing_svs.insert(sv.clone());
                }
            }
        }

        if missing_svs.is_empty() {
            return Ok(());
        }

        let places: Vec<String> = missing_places.into_iter().collect();
        let svs: Vec<String> = missing_svs.into_iter().collect();
        self.oracle_calls.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Existence check for {} places x {} vars", places.len(), svs.len());

        let (found, outcome) = match self.oracle.check(&places, &svs).await {
            Ok(found) => (found, Ok(())),
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Existence check failed: {}", e);
                (crate::oracle::ExistenceMap::new(), Err(e))
            }
        };

        for place in &places {
            let present = found.get(place);
            for sv in &svs {
                let key = ExistenceKey::new(place.as_str(), sv.as_str());
                if self.verdicts.get(&key).await.is_none() {
                    let exists = present.is_some_and(|set| set.contains(sv));
                    self.verdicts.insert(key, exists).await;
                }
            }
        }

        outcome
    }

    /// Cached verdict for a pair; unknown pairs report false
    pub async fn exists(&self, place: &str, sv: &str) -> bool {
        self.verdicts
            .get(&ExistenceKey::new(place, sv))
            .await
            .unwrap_or(false)
    }

    /// Variables among `svs` with data in at least one of `places`
    ///
    /// Only consults cached verdicts; call [`Self::ensure`] first.
    pub async fn existing_in_any(&self, places: &[String], svs: &[String]) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for sv in svs {
            for place in places {
                if self.exists(place, sv).await {
                    out.insert(sv.clone());
                    break;
                }
            }
        }
        out
    }

    /// Existing subset of `svs` for one place, memoized per (place, variable set)
    ///
    /// # Errors
    /// Returns the oracle error; the failed pairs are cached as absent
    pub async fn svs_for_place(
        &self,
        place: &str,
        svs: &[String],
    ) -> Result<ExistenceResult, OracleError> {
        let key = ResultKey::new(place, svs);
        let existing = if let Some(cached) = self.results.get(&key).await {
            cached
        } else {
            let places = [place.to_string()];
            let outcome = self.ensure(&places, &key.svs).await;
            let existing = Arc::new(self.existing_in_any(&places, &key.svs).await);
            self.results.insert(key, Arc::clone(&existing)).await;
            outcome?;
            existing
        };

        Ok(ExistenceResult {
            place: place.to_string(),
            exist_svs: svs.iter().filter(|sv| existing.contains(*sv)).cloned().collect(),
        })
    }

    /// Get checker statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CheckerStats {
        CheckerStats {
            oracle_calls: self.oracle_calls.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    /// Number of remote calls issued so far
    #[inline]
    #[must_use]
    pub fn oracle_calls(&self) -> usize {
        self.oracle_calls.load(Ordering::Relaxed)
    }
}
