//! Explore Oracle
//!
//! The trusted boundary between fulfillment and its remote collaborators.
//!
//! # Collaborators
//!
//! - [`ExistenceOracle`]: Which (place, variable) pairs have observed data
//! - [`SiblingSuggester`]: Sibling/peer variable groups for extension
//! - [`TopicCatalog`]: Topic membership (variables, peer groups, subtopics)
//!
//! # Architecture
//!
//! ```text
//! Tracker ──ensure(places, svs)──→ ExistenceChecker ──one batched check()──→ ExistenceOracle
//!                                        ↑___________↓
//!                              per-request moka cache of (place, sv) verdicts
//! ```
//!
//! An [`ExistenceChecker`] is created per fulfillment call and dropped with it,
//! so verdicts never leak between requests.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod checker;
pub mod error;
pub mod oracle;
pub mod suggest;

pub use catalog::{TopicCatalog, TopicMember, TopicNode};
pub use checker::{CheckerStats, ExistenceChecker, ExistenceKey, ExistenceResult};
pub use error::OracleError;
pub use oracle::{ExistenceMap, ExistenceOracle};
pub use suggest::{SiblingRequest, SiblingSeed, SiblingSuggester};

#[cfg(any(test, feature = "mock"))]
pub use catalog::MockTopicCatalog;
#[cfg(any(test, feature = "mock"))]
pub use oracle::MockExistenceOracle;
#[cfg(any(test, feature = "mock"))]
pub use suggest::MockSiblingSuggester;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for implementing collaborators
    pub use crate::{
        ExistenceChecker, ExistenceMap, ExistenceOracle, OracleError, SiblingRequest, SiblingSeed,
        SiblingSuggester, TopicCatalog, TopicMember, TopicNode,
    };
    pub use async_trait::async_trait;
}
