//! Recording fakes for the collaborator traits

use async_trait::async_trait;
use explore_oracle::{
    ExistenceMap, ExistenceOracle, OracleError, SiblingRequest, SiblingSuggester, TopicCatalog,
    TopicNode,
};
use explore_vars::{ChartVars, ChartVarsMap, PlaceType};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// One recorded existence check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleCall {
    /// Places asked about
    pub places: Vec<String>,
    /// Variables asked about
    pub svs: Vec<String>,
}

/// Existence oracle over a fixed table
#[derive(Debug, Default)]
pub struct FakeOracle {
    data: ExistenceMap,
    children: HashMap<(String, String), Vec<String>>,
    delay: Option<Duration>,
    failing: bool,
    calls: Mutex<Vec<OracleCall>>,
}

impl FakeOracle {
    /// Create oracle with no data
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With variables that exist at a place
    #[must_use]
    pub fn with_data<I, S>(mut self, place: &str, svs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data
            .entry(place.to_string())
            .or_default()
            .extend(svs.into_iter().map(Into::into));
        self
    }

    /// With child places of a type
    #[must_use]
    pub fn with_children(mut self, parent: &str, place_type: &str, children: &[&str]) -> Self {
        self.children.insert(
            (parent.to_string(), place_type.to_string()),
            children.iter().map(|c| (*c).to_string()).collect(),
        );
        self
    }

    /// Sleep before answering
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every check
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Recorded checks
    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().clone()
    }

    /// Number of recorded checks
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// True if any two checks overlapped on a (place, variable) pair
    pub fn has_repeated_pairs(&self) -> bool {
        let mut seen = BTreeSet::new();
        for call in self.calls.lock().iter() {
            for place in &call.places {
                for sv in &call.svs {
                    if !seen.insert((place.clone(), sv.clone())) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

#[async_trait]
impl ExistenceOracle for FakeOracle {
    async fn check(&self, places: &[String], svs: &[String]) -> Result<ExistenceMap, OracleError> {
        self.calls.lock().push(OracleCall {
            places: places.to_vec(),
            svs: svs.to_vec(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(OracleError::Unavailable("fake oracle is down".to_string()));
        }

        let mut out = ExistenceMap::new();
        for place in places {
            let Some(known) = self.data.get(place) else {
                continue;
            };
            let found: BTreeSet<String> = svs.iter().filter(|sv| known.contains(*sv)).cloned().collect();
            if !found.is_empty() {
                out.insert(place.clone(), found);
            }
        }
        Ok(out)
    }

    async fn sample_child_places(
        &self,
        parent: &str,
        place_type: &PlaceType,
        limit: usize,
    ) -> Result<Vec<String>, OracleError> {
        let key = (parent.to_string(), place_type.as_str().to_string());
        Ok(self
            .children
            .get(&key)
            .map(|c| c.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

/// Sibling suggester with canned responses
///
/// Responses are keyed by seed identifier (a topic or variable) or, when the
/// request carries override groups, by group identifier.
#[derive(Debug, Default)]
pub struct FakeSuggester {
    responses: HashMap<String, ChartVarsMap>,
    requests: Mutex<Vec<SiblingRequest>>,
}

impl FakeSuggester {
    /// Create suggester with no responses
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a group suggested for a seed
    #[must_use]
    pub fn with_response(mut self, seed: &str, key: &str, group: ChartVars) -> Self {
        self.responses
            .entry(seed.to_string())
            .or_default()
            .entry(key.to_string())
            .or_default()
            .push(group);
        self
    }

    /// Recorded requests
    pub fn requests(&self) -> Vec<SiblingRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl SiblingSuggester for FakeSuggester {
    async fn suggest_siblings(&self, request: &SiblingRequest) -> Result<ChartVarsMap, OracleError> {
        self.requests.lock().push(request.clone());

        let seeds = if request.override_groups.is_empty() {
            request.seed.ids()
        } else {
            request.override_groups.as_slice()
        };
        let mut out = ChartVarsMap::new();
        for seed in seeds {
            let Some(map) = self.responses.get(seed) else {
                continue;
            };
            for (key, groups) in map {
                if request.exclude.contains(key) {
                    continue;
                }
                out.entry(key.clone()).or_default().extend(groups.iter().cloned());
            }
        }
        Ok(out)
    }
}

/// Topic catalog over fixed nodes
#[derive(Debug, Default)]
pub struct FakeCatalog {
    nodes: HashMap<String, TopicNode>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeCatalog {
    /// Create empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a topic node
    #[must_use]
    pub fn with_topic(mut self, node: TopicNode) -> Self {
        self.nodes.insert(node.dcid.clone(), node);
        self
    }

    /// Recorded batches of opened topics
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TopicCatalog for FakeCatalog {
    async fn open_topics(
        &self,
        topics: &[String],
    ) -> Result<HashMap<String, TopicNode>, OracleError> {
        self.calls.lock().push(topics.to_vec());
        Ok(topics
            .iter()
            .filter_map(|t| self.nodes.get(t).map(|n| (t.clone(), n.clone())))
            .collect())
    }
}
