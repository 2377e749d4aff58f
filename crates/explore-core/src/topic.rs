//! Topic resolution: requested keys → chart-variable groups
//!
//! Two modes, chosen by a precondition rather than as a fallback:
//!
//! - **Standard**: each topic opens into one group per member variable and
//!   peer group (recursing into subtopics), each direct variable becomes a
//!   single-variable group.
//! - **Correlation**: used iff the utterance is classified as a correlation
//!   request and carries at least two keys; produces variable pairs.

use crate::config::FulfillConfig;
use explore_oracle::{TopicCatalog, TopicMember, TopicNode};
use explore_vars::{
    is_topic, ChartVars, ChartVarsMap, ClassificationKind, Counters, EventType, PopulateState,
    Utterance,
};
use std::collections::{BTreeSet, HashMap};

/// Resolver mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverMode {
    /// Independent groups per key
    Standard,
    /// Variable pairs across keys
    Correlation,
}

/// Pick the resolver mode for an utterance
#[must_use]
pub fn select_mode(uttr: &Utterance) -> ResolverMode {
    if uttr.has_classification(ClassificationKind::Correlation) && uttr.multi_svs() {
        ResolverMode::Correlation
    } else {
        ResolverMode::Standard
    }
}

/// Topics opened while resolving, by identifier
#[derive(Debug, Clone, Default)]
pub struct TopicIndex {
    nodes: HashMap<String, TopicNode>,
}

impl TopicIndex {
    /// Opened node for a topic
    #[inline]
    #[must_use]
    pub fn get(&self, dcid: &str) -> Option<&TopicNode> {
        self.nodes.get(dcid)
    }

    /// Display name, falling back to the identifier
    #[must_use]
    pub fn name_of<'a>(&'a self, dcid: &'a str) -> &'a str {
        match self.nodes.get(dcid) {
            Some(node) if !node.name.is_empty() => &node.name,
            _ => dcid,
        }
    }

    /// Number of opened topics
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if nothing was opened
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Open `roots` and their subtopics, one catalog call per level
    async fn open(
        catalog: &dyn TopicCatalog,
        roots: Vec<String>,
        max_depth: usize,
        counters: &mut Counters,
    ) -> Self {
        let mut index = Self::default();
        let mut frontier = roots;

        for _ in 0..max_depth {
            frontier.retain(|t| !index.nodes.contains_key(t));
            if frontier.is_empty() {
                break;
            }
            match catalog.open_topics(&frontier).await {
                Ok(opened) => {
                    let mut next = Vec::new();
                    for node in opened.values() {
                        next.extend(node.subtopics().map(str::to_string));
                    }
                    index.nodes.extend(opened);
                    next.sort();
                    next.dedup();
                    frontier = next;
                }
                Err(e) => {
                    tracing::warn!("Opening {} topics failed: {}", frontier.len(), e);
                    counters.err("open_topics_failed", e.label());
                    break;
                }
            }
        }
        index
    }

    /// Groups for a topic in member order
    fn expand(&self, topic: &str, max_depth: usize) -> Vec<ChartVars> {
        let mut out = Vec::new();
        let mut visited = BTreeSet::new();
        self.expand_into(topic, 0, max_depth, &mut visited, &mut out);
        out
    }

    fn expand_into(
        &self,
        topic: &str,
        depth: usize,
        max_depth: usize,
        visited: &mut BTreeSet<String>,
        out: &mut Vec<ChartVars>,
    ) {
        if !visited.insert(topic.to_string()) {
            return;
        }
        let Some(node) = self.nodes.get(topic) else {
            return;
        };

        let first = out.len();
        for member in &node.members {
            match member {
                TopicMember::Variable(sv) => {
                    out.push(ChartVars::new([sv.as_str()]).with_source_topic(topic).with_orig_sv(sv));
                }
                TopicMember::PeerGroup { dcid, name, svs } => {
                    out.push(
                        ChartVars::new(svs.iter().map(String::as_str))
                            .with_source_topic(topic)
                            .with_title(name)
                            .peer_group(dcid),
                    );
                }
                TopicMember::SubTopic(sub) if depth + 1 < max_depth => {
                    self.expand_into(sub, depth + 1, max_depth, visited, out);
                }
                TopicMember::SubTopic(_) => {}
            }
        }
        if !node.description.is_empty() {
            if let Some(cv) = out.get_mut(first) {
                if cv.description.is_empty() {
                    cv.description.clone_from(&node.description);
                }
            }
        }
    }

    /// Variables under a topic, deduplicated in member order
    fn variables(&self, topic: &str, max_depth: usize) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.expand(topic, max_depth)
            .into_iter()
            .flat_map(|cv| cv.svs)
            .filter(|sv| seen.insert(sv.clone()))
            .collect()
    }
}

fn requested_topics(uttr: &Utterance) -> Vec<String> {
    uttr.requested_keys().into_iter().filter(|k| is_topic(k)).collect()
}

/// Standard expansion into `state.chart_vars_map`
///
/// Unknown topics map to an empty list so they still count as touched.
/// Event classifications add one event group per event type.
pub async fn compute_chart_vars(
    state: &mut PopulateState<'_>,
    catalog: &dyn TopicCatalog,
    config: &FulfillConfig,
    counters: &mut Counters,
) -> TopicIndex {
    let uttr = state.uttr;
    let index = TopicIndex::open(catalog, requested_topics(uttr), config.max_topic_depth, counters).await;

    let mut map = ChartVarsMap::new();
    for key in uttr.requested_keys() {
        let groups = if is_topic(&key) {
            let groups = index.expand(&key, config.max_topic_depth);
            if groups.is_empty() {
                tracing::debug!("Topic {} opened to no variables", key);
                counters.info("empty_topic", key.as_str());
            }
            groups
        } else {
            vec![ChartVars::new([key.as_str()]).with_orig_sv(&key)]
        };
        map.insert(key, groups);
    }

    for event_type in uttr.event_types() {
        let group = ChartVars::default().with_event(EventType {
            key: event_type.clone(),
            dcids: vec![event_type.clone()],
        });
        map.entry(format!("event/{event_type}")).or_default().push(group);
    }

    tracing::debug!(
        "Resolved {} keys into {} groups",
        map.len(),
        map.values().map(Vec::len).sum::<usize>()
    );
    state.chart_vars_map = map;
    index
}

/// Correlation expansion into `state.chart_vars_map`
///
/// Variables of the first key are paired with variables of every later key,
/// up to `max_correlation_pairs` pairs, all under the first key.
pub async fn compute_correlation_chart_vars(
    state: &mut PopulateState<'_>,
    catalog: &dyn TopicCatalog,
    config: &FulfillConfig,
    counters: &mut Counters,
) -> TopicIndex {
    let uttr = state.uttr;
    let index = TopicIndex::open(catalog, requested_topics(uttr), config.max_topic_depth, counters).await;

    let keys = uttr.requested_keys();
    let vars_of = |key: &str| {
        if is_topic(key) {
            index.variables(key, config.max_topic_depth)
        } else {
            vec![key.to_string()]
        }
    };

    let mut map = ChartVarsMap::new();
    if let Some((lhs_key, rest)) = keys.split_first() {
        let lhs = vars_of(lhs_key);
        let source = if is_topic(lhs_key) { lhs_key.as_str() } else { "" };
        let mut pairs = Vec::new();

        'outer: for rhs_key in rest {
            for rhs in vars_of(rhs_key) {
                for lhs_sv in &lhs {
                    if pairs.len() >= config.max_correlation_pairs {
                        break 'outer;
                    }
                    if *lhs_sv == rhs {
                        continue;
                    }
                    pairs.push(
                        ChartVars::new([lhs_sv.as_str(), rhs.as_str()])
                            .with_source_topic(source)
                            .with_orig_sv(lhs_sv)
                            .correlation(),
                    );
                }
            }
        }
        if pairs.len() >= config.max_correlation_pairs {
            counters.info("correlation_pairs_capped", config.max_correlation_pairs);
        }
        map.insert(lhs_key.clone(), pairs);
    }

    state.chart_vars_map = map;
    index
}
