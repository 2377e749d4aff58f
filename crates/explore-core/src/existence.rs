//! Existence verification of resolved chart variables
//!
//! [`ExistenceTracker`] checks every variable of a [`ChartVarsMap`] against
//! the call's [`ExistenceChecker`] in one batch; [`chart_vars_fetch`] then
//! partitions the groups into what survived.

use crate::config::FulfillConfig;
use explore_oracle::{ExistenceChecker, ExistenceOracle};
use explore_vars::{is_topic, ChartVars, ChartVarsMap, Counters, PopulateState};
use std::collections::BTreeSet;

/// Places whose data is checked
///
/// For contained-in queries this is a sample of child places of the primary
/// place; otherwise the utterance places themselves. An empty result is the
/// fatal "no places to check" condition.
pub async fn get_places_to_check(
    state: &PopulateState<'_>,
    oracle: &dyn ExistenceOracle,
    config: &FulfillConfig,
    counters: &mut Counters,
) -> Vec<String> {
    let uttr = state.uttr;
    match (&state.place_type, uttr.primary_place()) {
        (Some(place_type), Some(parent)) => {
            match oracle
                .sample_child_places(&parent.dcid, place_type, config.child_place_sample_size)
                .await
            {
                Ok(children) => {
                    tracing::debug!(
                        "Sampled {} {} places in {}",
                        children.len(),
                        place_type,
                        parent.dcid
                    );
                    children
                }
                Err(e) => {
                    tracing::warn!("Child place sampling failed for {}: {}", parent.dcid, e);
                    counters.err("sample_child_places_failed", e.label());
                    Vec::new()
                }
            }
        }
        _ => uttr.places.iter().map(|p| p.dcid.clone()).collect(),
    }
}

/// Batched existence check over one chart-variable map
#[derive(Debug)]
pub struct ExistenceTracker<'a> {
    checker: &'a ExistenceChecker,
    places: &'a [String],
    map: &'a ChartVarsMap,
    existing: BTreeSet<String>,
}

impl<'a> ExistenceTracker<'a> {
    /// Create tracker; nothing is checked until [`Self::perform_existence_check`]
    #[must_use]
    pub fn new(checker: &'a ExistenceChecker, places: &'a [String], map: &'a ChartVarsMap) -> Self {
        Self {
            checker,
            places,
            map,
            existing: BTreeSet::new(),
        }
    }

    /// Distinct variables referenced by the map, in first-seen order
    #[must_use]
    pub fn variables(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.map
            .values()
            .flatten()
            .flat_map(|cv| cv.svs.iter())
            .filter(|sv| seen.insert(sv.as_str()))
            .cloned()
            .collect()
    }

    /// Check every referenced variable against the target places
    ///
    /// Pairs already resolved in this call are not looked up again. A failed
    /// lookup is counted and its variables are treated as absent.
    pub async fn perform_existence_check(&mut self, counters: &mut Counters) {
        let svs = self.variables();
        if svs.is_empty() {
            return;
        }
        if let Err(e) = self.checker.ensure(self.places, &svs).await {
            tracing::warn!("Existence check over {} variables failed: {}", svs.len(), e);
            counters.err("existence_check_failed", e.label());
        }
        self.existing = self.checker.existing_in_any(self.places, &svs).await;
        tracing::debug!(
            "{} of {} variables exist in {} places",
            self.existing.len(),
            svs.len(),
            self.places.len()
        );
    }

    /// Variables confirmed by the last check
    #[inline]
    #[must_use]
    pub fn existing(&self) -> &BTreeSet<String> {
        &self.existing
    }

    /// The checked map
    #[inline]
    #[must_use]
    pub fn map(&self) -> &ChartVarsMap {
        self.map
    }
}

/// Surviving groups of one tracker pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    /// Groups with at least one confirmed variable, in map order
    pub chart_vars: Vec<ChartVars>,
    /// Distinct topics touched, whether or not their data exists
    pub topics: Vec<String>,
    /// Confirmed variables left alone in their group
    pub explore_more: BTreeSet<String>,
}

/// Partition a checked map into surviving groups
///
/// Groups are restricted to their confirmed variables and dropped when none
/// survive. A correlation pair with one confirmed variable becomes a plain
/// single-variable group, kept once per variable. Event groups carry no variables and pass through unchanged.
/// Every confirmed variable is added to `existing_svs`.
pub fn chart_vars_fetch(
    tracker: &ExistenceTracker<'_>,
    existing_svs: &mut BTreeSet<String>,
) -> FetchOutcome {
    fn touch(topics: &mut Vec<String>, topic: &str) {
        if !topic.is_empty() && !topics.iter().any(|t| t == topic) {
            topics.push(topic.to_string());
        }
    }

    let mut outcome = FetchOutcome::default();
    let mut demoted = BTreeSet::new();

    for (key, groups) in tracker.map() {
        if is_topic(key) {
            touch(&mut outcome.topics, key);
        }
        for cv in groups {
            touch(&mut outcome.topics, &cv.source_topic);

            if cv.event.is_some() && cv.svs.is_empty() {
                outcome.chart_vars.push(cv.clone());
                continue;
            }
            let mut kept = cv.restricted_to(tracker.existing());
            if kept.svs.is_empty() {
                continue;
            }
            if kept.is_correlation && kept.svs.len() < 2 {
                // Half a pair is charted on its own, once.
                if !demoted.insert(kept.svs[0].clone()) {
                    continue;
                }
                kept.is_correlation = false;
            } else if kept.svs.len() == 1 && !kept.is_correlation {
                outcome.explore_more.insert(kept.svs[0].clone());
            }
            existing_svs.extend(kept.svs.iter().cloned());
            outcome.chart_vars.push(kept);
        }
    }
    outcome
}
