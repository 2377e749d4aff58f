//! Explore Vars
//!
//! Request-side types shared by every stage of explore fulfillment.
//!
//! # Core Concepts
//!
//! - [`Utterance`]: A classified analytical query (places, topics, variables)
//! - [`InsightContext`]: Free-form caller flags, read through [`Params`] keys
//! - [`ChartVars`]: A chartable group of statistical variables
//! - [`PopulateState`]: The per-request working record threaded through the pipeline
//! - [`Counters`]: Write-only telemetry accumulator with an explicit flush point
//!
//! # Example
//!
//! ```rust,ignore
//! use explore_vars::{Place, PopulateState, Utterance};
//!
//! let uttr = Utterance::new()
//!     .with_place(Place::new("geoId/06", "California", "State"))
//!     .with_topic("dc/topic/Health");
//! let state = PopulateState::new(&uttr);
//! assert!(state.place_type.is_none());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod chart_vars;
mod context;
mod counters;
mod place;
mod state;
mod utterance;

pub use chart_vars::{ChartVars, ChartVarsMap, EventType};
pub use context::{get_context_bool, get_context_list, get_context_string, ContextValue, InsightContext, Params};
pub use counters::{CounterReport, Counters};
pub use place::{Place, PlaceType};
pub use state::PopulateState;
pub use utterance::{Classification, ClassificationKind, QueryType, RequestId, Utterance};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns true if the identifier names a topic rather than a variable
#[inline]
#[must_use]
pub fn is_topic(dcid: &str) -> bool {
    dcid.starts_with("dc/topic/") || dcid.starts_with("topic/") || dcid.contains("/topic/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_detection() {
        assert!(is_topic("dc/topic/Health"));
        assert!(is_topic("topic/Health"));
        assert!(is_topic("sdg/topic/Goal1"));
        assert!(!is_topic("Count_Person"));
        assert!(!is_topic("dc/svpg/HealthPeers"));
    }
}
