//! Utterance: the classified analytical query
//!
//! The utterance is owned by the caller. Fulfillment reads it, sets the query
//! type, and merges its per-call counters into [`Utterance::counters`] once the
//! call completes.

use crate::context::InsightContext;
use crate::counters::Counters;
use crate::place::{Place, PlaceType};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique fulfillment request identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Ulid);

impl RequestId {
    /// Generate new request ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Query type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QueryType {
    /// Not yet determined
    #[default]
    Unknown,
    /// Basic topic/variable exploration
    Basic,
    /// Anything else
    Other,
}

/// Classification attached by the NL detection layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Relationship between two or more variables
    Correlation,
    /// Places of a type within the query place
    ContainedIn {
        /// Child place type
        place_type: PlaceType,
    },
    /// Ranking request
    Ranking,
    /// Comparison across places
    Comparison,
    /// Event (disaster) request
    Event {
        /// Event type identifiers
        event_types: Vec<String>,
    },
    /// Overview request
    Overview,
}

impl Classification {
    /// Kind without payload
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ClassificationKind {
        match self {
            Self::Correlation => ClassificationKind::Correlation,
            Self::ContainedIn { .. } => ClassificationKind::ContainedIn,
            Self::Ranking => ClassificationKind::Ranking,
            Self::Comparison => ClassificationKind::Comparison,
            Self::Event { .. } => ClassificationKind::Event,
            Self::Overview => ClassificationKind::Overview,
        }
    }
}

/// Classification discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationKind {
    /// See [`Classification::Correlation`]
    Correlation,
    /// See [`Classification::ContainedIn`]
    ContainedIn,
    /// See [`Classification::Ranking`]
    Ranking,
    /// See [`Classification::Comparison`]
    Comparison,
    /// See [`Classification::Event`]
    Event,
    /// See [`Classification::Overview`]
    Overview,
}

/// Resolved analytical query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Utterance {
    /// Query type, set during fulfillment
    pub query_type: QueryType,
    /// Ordered places; the first is the primary place
    pub places: Vec<Place>,
    /// Requested topic identifiers
    pub topics: Vec<String>,
    /// Requested statistical variable identifiers
    pub svs: Vec<String>,
    /// Detected classifications
    pub classifications: Vec<Classification>,
    /// Caller flags
    pub insight_ctx: InsightContext,
    /// Telemetry sink
    #[serde(skip)]
    pub counters: Counters,
}

impl Utterance {
    /// Create empty utterance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With place
    #[inline]
    #[must_use]
    pub fn with_place(mut self, place: Place) -> Self {
        self.places.push(place);
        self
    }

    /// With topic
    #[inline]
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topics.push(topic.into());
        self
    }

    /// With variable
    #[inline]
    #[must_use]
    pub fn with_sv(mut self, sv: impl Into<String>) -> Self {
        self.svs.push(sv.into());
        self
    }

    /// With classification
    #[inline]
    #[must_use]
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classifications.push(classification);
        self
    }

    /// With context flag
    #[inline]
    #[must_use]
    pub fn with_context(
        mut self,
        key: impl Into<String>,
        value: impl Into<crate::context::ContextValue>,
    ) -> Self {
        self.insight_ctx.insert(key.into(), value.into());
        self
    }

    /// Topics followed by variables, deduplicated, order preserved
    #[must_use]
    pub fn requested_keys(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.topics
            .iter()
            .chain(self.svs.iter())
            .filter(|k| seen.insert(k.as_str()))
            .cloned()
            .collect()
    }

    /// True if more than one topic or variable was requested
    #[inline]
    #[must_use]
    pub fn multi_svs(&self) -> bool {
        self.requested_keys().len() >= 2
    }

    /// Check for a classification kind
    #[inline]
    #[must_use]
    pub fn has_classification(&self, kind: ClassificationKind) -> bool {
        self.classifications.iter().any(|c| c.kind() == kind)
    }

    /// Place type from the first contained-in classification
    #[must_use]
    pub fn contained_in_type(&self) -> Option<PlaceType> {
        self.classifications.iter().find_map(|c| match c {
            Classification::ContainedIn { place_type } => Some(place_type.clone()),
            _ => None,
        })
    }

    /// Event types from the first event classification
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.classifications
            .iter()
            .find_map(|c| match c {
                Classification::Event { event_types } => Some(event_types.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Primary place, if any
    #[inline]
    #[must_use]
    pub fn primary_place(&self) -> Option<&Place> {
        self.places.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_generation() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn requested_keys_dedup_in_order() {
        let uttr = Utterance::new()
            .with_topic("dc/topic/Health")
            .with_sv("Count_Person")
            .with_sv("dc/topic/Health")
            .with_sv("Median_Age_Person");

        assert_eq!(
            uttr.requested_keys(),
            vec!["dc/topic/Health", "Count_Person", "Median_Age_Person"]
        );
        assert!(uttr.multi_svs());
    }

    #[test]
    fn single_key_is_not_multi() {
        let uttr = Utterance::new().with_sv("Count_Person");
        assert!(!uttr.multi_svs());
    }

    #[test]
    fn contained_in_type_lookup() {
        let uttr = Utterance::new()
            .with_classification(Classification::Ranking)
            .with_classification(Classification::ContainedIn {
                place_type: PlaceType::new("County"),
            });

        assert!(uttr.has_classification(ClassificationKind::Ranking));
        assert!(!uttr.has_classification(ClassificationKind::Correlation));
        assert_eq!(uttr.contained_in_type(), Some(PlaceType::new("County")));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn requested_keys_are_unique(
                topics in proptest::collection::vec("[a-c]", 0..5),
                svs in proptest::collection::vec("[a-e]", 0..8),
            ) {
                let mut uttr = Utterance::new();
                uttr.topics = topics;
                uttr.svs = svs;

                let keys = uttr.requested_keys();
                let unique: std::collections::HashSet<_> = keys.iter().collect();
                prop_assert_eq!(unique.len(), keys.len());
                prop_assert_eq!(uttr.multi_svs(), keys.len() >= 2);
            }
        }
    }
}
