//! Shared fixtures

use explore_oracle::{TopicMember, TopicNode};
use explore_vars::{Place, Utterance};

/// Health topic
pub const HEALTH: &str = "dc/topic/Health";

/// Diseases topic, a sibling of [`HEALTH`]
pub const DISEASES: &str = "dc/topic/Diseases";

/// California
#[must_use]
pub fn california() -> Place {
    Place::new("geoId/06", "California", "State")
}

/// Utterance about California
#[must_use]
pub fn california_utterance() -> Utterance {
    Utterance::new().with_place(california())
}

/// Topic node whose members are plain variables
#[must_use]
pub fn topic_of(dcid: &str, name: &str, svs: &[&str]) -> TopicNode {
    svs.iter().fold(TopicNode::new(dcid, name), |node, sv| {
        node.with_member(TopicMember::Variable((*sv).to_string()))
    })
}

/// Peer group member
#[must_use]
pub fn peer_group(dcid: &str, name: &str, svs: &[&str]) -> TopicMember {
    TopicMember::PeerGroup {
        dcid: dcid.to_string(),
        name: name.to_string(),
        svs: svs.iter().map(|s| (*s).to_string()).collect(),
    }
}
