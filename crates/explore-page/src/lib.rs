//! Explore Page Schema
//!
//! The fixed page-description contract consumed by the rendering layer.
//!
//! # Core Concepts
//!
//! - [`SubjectPageConfig`]: Metadata plus ordered categories
//! - [`Category`] → [`Block`] → [`Column`] → [`Tile`]: Nested presentation order
//! - [`StatVarSpec`]: Per-variable display metadata, keyed within a category
//! - [`EventTypeSpec`]: Event type definitions, keyed within page metadata
//!
//! Every variable a tile references must have a [`StatVarSpec`] in the owning
//! category, and every event key a tile references must exist in
//! [`PageMetadata::event_type_spec`]. [`SubjectPageConfig::validate`] checks both.
//!
//! # Example
//!
//! ```rust,ignore
//! use explore_page::{Block, Category, Column, StatVarSpec, SubjectPageConfig, Tile};
//!
//! let mut category = Category::new("Health");
//! category.add_stat_var_spec(StatVarSpec::new("Count_Person", "Population"));
//! category.blocks.push(Block::new("Population").with_column(Column::new(vec![
//!     Tile::line("Population", vec!["Count_Person".to_string()]),
//! ])));
//!
//! let mut page = SubjectPageConfig::default();
//! page.categories.push(category);
//! page.validate()?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod error;
mod spec;
mod tile;

pub use config::{Block, Category, Column, PageMetadata, SubjectPageConfig};
pub use error::PageError;
pub use spec::{EventTypeSpec, StatVarSpec};
pub use tile::{DisasterEventMapTileSpec, RankingTileSpec, Tile, TileType};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
