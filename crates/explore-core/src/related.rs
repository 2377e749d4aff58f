//! Related things: auxiliary groupings for "explore further" affordances

use crate::topic::TopicIndex;
use explore_oracle::ExistenceChecker;
use explore_vars::{is_topic, ChartVarsMap, Counters, PopulateState};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Variable → source topic → sorted confirmed peer variables
pub type ExplorePeerGroups = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Topic reference shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedTopic {
    /// Topic identifier
    pub dcid: String,
    /// Display name
    pub name: String,
}

/// Related groupings returned with a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedThings {
    /// Requested and plotted topics
    pub main_topics: Vec<RelatedTopic>,
    /// Subtopics of the main topics
    pub child_topics: Vec<RelatedTopic>,
    /// Peer groups of plotted variables
    pub explore_more: ExplorePeerGroups,
}

impl RelatedThings {
    /// True if there is nothing to show
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.main_topics.is_empty() && self.child_topics.is_empty() && self.explore_more.is_empty()
    }
}

/// Peer groups from explore-more suggestions
///
/// A variable is kept only if it still has data in the primary place, and a
/// peer group only if at least two of its variables do. The first group seen
/// for a (variable, source topic) pair wins.
pub async fn explore_peer_groups(
    state: &PopulateState<'_>,
    checker: &ExistenceChecker,
    more_map: &ChartVarsMap,
    counters: &mut Counters,
) -> ExplorePeerGroups {
    let mut out = ExplorePeerGroups::new();
    let Some(place) = state.primary_place_dcid() else {
        return out;
    };

    for (sv, groups) in more_map {
        match checker.svs_for_place(place, std::slice::from_ref(sv)).await {
            Ok(found) if !found.exist_svs.is_empty() => {}
            Ok(_) => continue,
            Err(e) => {
                counters.err("explore_peer_groups_failed", e.label());
                continue;
            }
        }

        for cv in groups {
            let mut svs = match checker.svs_for_place(place, &cv.svs).await {
                Ok(found) => found.exist_svs,
                Err(e) => {
                    counters.err("explore_peer_groups_failed", e.label());
                    continue;
                }
            };
            svs.sort();
            svs.dedup();
            if svs.len() < 2 {
                continue;
            }
            out.entry(sv.clone())
                .or_default()
                .entry(cv.source_topic.clone())
                .or_insert(svs);
        }
    }
    out
}

/// Related groupings for a built page
#[must_use]
pub fn compute_related_things(
    state: &PopulateState<'_>,
    plotted_vars: &BTreeSet<String>,
    plotted_topics: &[String],
    peer_groups: &ExplorePeerGroups,
    index: &TopicIndex,
) -> RelatedThings {
    let topic_ref = |dcid: &str| RelatedTopic {
        dcid: dcid.to_string(),
        name: index.name_of(dcid).to_string(),
    };

    let mut seen = BTreeSet::new();
    let main_topics: Vec<RelatedTopic> = state
        .uttr
        .topics
        .iter()
        .filter(|t| is_topic(t))
        .chain(plotted_topics)
        .filter(|t| seen.insert(t.as_str()))
        .map(|t| topic_ref(t))
        .collect();

    let child_topics: Vec<RelatedTopic> = main_topics
        .iter()
        .filter_map(|t| index.get(&t.dcid))
        .flat_map(|node| node.subtopics())
        .filter(|sub| seen.insert(sub))
        .map(topic_ref)
        .collect();

    let explore_more = peer_groups
        .iter()
        .filter(|(sv, _)| plotted_vars.contains(*sv))
        .map(|(sv, groups)| (sv.clone(), groups.clone()))
        .collect();

    RelatedThings {
        main_topics,
        child_topics,
        explore_more,
    }
}
