//! Explore Page Builders
//!
//! Pluggable layout policies for turning existence-confirmed chart variables
//! into a [`SubjectPageConfig`](explore_page::SubjectPageConfig).
//!
//! # Core Concepts
//!
//! - [`PageBuilder`]: Core trait for layout policies
//! - [`MainPageBuilder`]: General-purpose layout (with extension results)
//! - [`SdgPageBuilder`]: Sustainable-development-goals layout
//! - [`PageDomain`]: Discriminant read from the insight context
//! - [`PageAssembler`]: Routes a request to the builder for its domain
//!
//! # Example
//!
//! ```rust,ignore
//! use explore_builder::{BuildRequest, PageAssembler, PageDomain, PresentationConfig};
//!
//! let assembler = PageAssembler::new();
//! let domain = PageDomain::from_context(&state.uttr.insight_ctx);
//! let resp = assembler.assemble(domain, &BuildRequest {
//!     chart_vars: &chart_vars,
//!     ext_chart_vars: &[],
//!     state: &state,
//!     existing_svs: &existing,
//!     config: &PresentationConfig::default(),
//! });
//! assert!(resp.config.validate().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod builder;
mod config;
mod layout;
mod main_page;
mod sdg_page;

pub use builder::{BuildRequest, PageAssembler, PageBuilder, PageConfigResponse, PageDomain};
pub use config::{ConfigError, PresentationConfig};
pub use main_page::MainPageBuilder;
pub use sdg_page::SdgPageBuilder;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
