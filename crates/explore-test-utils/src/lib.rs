//! Explore Test Utilities
//!
//! In-memory collaborators that answer from fixed data and record every call,
//! plus fixtures shared by the fulfillment tests.
//!
//! # Core Concepts
//!
//! - [`FakeOracle`]: Existence oracle over a fixed place → variables table
//! - [`FakeSuggester`]: Sibling suggester with canned responses per seed
//! - [`FakeCatalog`]: Topic catalog over fixed topic nodes
//! - [`init_tracing`]: Test log output controlled by `RUST_LOG`

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod fakes;
pub mod fixtures;

pub use fakes::{FakeCatalog, FakeOracle, FakeSuggester, OracleCall};

use tracing_subscriber::EnvFilter;

/// Install a test subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
