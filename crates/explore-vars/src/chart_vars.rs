//! Chart-variable groups

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Topic or variable key → ordered chart-variable groups
pub type ChartVarsMap = IndexMap<String, Vec<ChartVars>>;

/// Event (disaster) type attached to a chart group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventType {
    /// Event type key, also the key of the page's event type spec
    pub key: String,
    /// Event type identifiers covered by this key
    pub dcids: Vec<String>,
}

/// A named group of statistical variables with presentation hints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartVars {
    /// Variables in presentation order
    pub svs: Vec<String>,
    /// Topic this group was opened from (empty for direct variables)
    pub source_topic: String,
    /// Requested key this group originated from
    pub orig_sv: String,
    /// Peer group identifier, if the group came from one
    pub svpg_id: String,
    /// Block title
    pub title: String,
    /// Block description
    pub description: String,
    /// Group is a topic peer group (siblings meant to be compared)
    pub is_topic_peer_group: bool,
    /// Group is a correlation pair
    pub is_correlation: bool,
    /// Event type, for event groups
    pub event: Option<EventType>,
}

impl ChartVars {
    /// Create group over variables
    #[inline]
    #[must_use]
    pub fn new<I, S>(svs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            svs: svs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// With source topic
    #[inline]
    #[must_use]
    pub fn with_source_topic(mut self, topic: impl Into<String>) -> Self {
        self.source_topic = topic.into();
        self
    }

    /// With originating key
    #[inline]
    #[must_use]
    pub fn with_orig_sv(mut self, orig: impl Into<String>) -> Self {
        self.orig_sv = orig.into();
        self
    }

    /// With title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark as topic peer group
    #[inline]
    #[must_use]
    pub fn peer_group(mut self, svpg_id: impl Into<String>) -> Self {
        self.svpg_id = svpg_id.into();
        self.is_topic_peer_group = true;
        self
    }

    /// Mark as correlation pair
    #[inline]
    #[must_use]
    pub fn correlation(mut self) -> Self {
        self.is_correlation = true;
        self
    }

    /// With event type
    #[inline]
    #[must_use]
    pub fn with_event(mut self, event: EventType) -> Self {
        self.event = Some(event);
        self
    }

    /// Copy of this group restricted to the given variables, order preserved
    ///
    /// `orig_sv` is cleared when the originating variable is not kept.
    #[must_use]
    pub fn restricted_to(&self, keep: &std::collections::BTreeSet<String>) -> Self {
        let orig_sv = if keep.contains(&self.orig_sv) {
            self.orig_sv.clone()
        } else {
            String::new()
        };
        Self {
            svs: self.svs.iter().filter(|sv| keep.contains(*sv)).cloned().collect(),
            orig_sv,
            ..self.clone()
        }
    }
}
