//! Explore Fulfillment
//!
//! Turns a classified analytical query into a page of charts backed by data
//! that is known to exist.
//!
//! # Core Concepts
//!
//! - [`Fulfiller`]: The pipeline entry point
//! - [`topic`]: Requested topics and variables → chart-variable groups
//! - [`existence`]: Batched, deduplicated existence checks over those groups
//! - [`extension`]: Sibling and peer suggestions when results are sparse
//! - [`related`]: Peer groups and topics for "explore further" links
//!
//! # Example
//!
//! ```rust,ignore
//! use explore_core::prelude::*;
//!
//! let fulfiller = Fulfiller::new(oracle, suggester, catalog)
//!     .with_config(FulfillConfig::default().with_timeout_secs(10));
//!
//! let mut uttr = Utterance::new()
//!     .with_place(Place::new("geoId/06", "California", "State"))
//!     .with_topic("dc/topic/Health");
//!
//! let resp = fulfiller.fulfill(&mut uttr, &PresentationConfig::default()).await;
//! println!("{}", serde_json::to_string(&uttr.counters.flush())?);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod existence;
pub mod extension;
pub mod fulfiller;
pub mod related;
pub mod topic;

pub use config::{ExtensionThreshold, FulfillConfig};
pub use error::{ConfigError, FulfillError};
pub use fulfiller::{FulfillResp, Fulfiller};
pub use related::{ExplorePeerGroups, RelatedThings, RelatedTopic};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for callers of the pipeline
    pub use crate::{FulfillConfig, FulfillError, FulfillResp, Fulfiller, RelatedThings};
    pub use explore_builder::{PageAssembler, PageDomain, PresentationConfig};
    pub use explore_oracle::{ExistenceOracle, SiblingSuggester, TopicCatalog};
    pub use explore_vars::{Classification, Place, Utterance};
}
