//! Topic catalog interface

use crate::error::OracleError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Member of a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicMember {
    /// A single statistical variable
    Variable(String),
    /// A peer group of comparable variables
    PeerGroup {
        /// Peer group identifier
        dcid: String,
        /// Display name
        name: String,
        /// Member variables
        svs: Vec<String>,
    },
    /// A nested topic
    SubTopic(String),
}

/// An opened topic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNode {
    /// Topic identifier
    pub dcid: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Members in presentation order
    pub members: Vec<TopicMember>,
}

impl TopicNode {
    /// Create topic node
    #[inline]
    #[must_use]
    pub fn new(dcid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            dcid: dcid.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// With member appended
    #[inline]
    #[must_use]
    pub fn with_member(mut self, member: TopicMember) -> Self {
        self.members.push(member);
        self
    }

    /// Subtopic identifiers
    pub fn subtopics(&self) -> impl Iterator<Item = &str> {
        self.members.iter().filter_map(|m| match m {
            TopicMember::SubTopic(id) => Some(id.as_str()),
            _ => None,
        })
    }
}

/// Topic membership lookups
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TopicCatalog: Send + Sync {
    /// Open each topic; unknown topics are omitted
    async fn open_topics(
        &self,
        topics: &[String],
    ) -> Result<HashMap<String, TopicNode>, OracleError>;
}
