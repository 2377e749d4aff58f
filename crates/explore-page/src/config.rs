//! Page tree: metadata, categories, blocks and columns

use crate::error::PageError;
use crate::spec::{EventTypeSpec, StatVarSpec};
use crate::tile::Tile;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Page-level metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMetadata {
    /// Topic identifier
    pub topic_id: String,
    /// Topic display name
    pub topic_name: String,
    /// Target places
    pub place_dcid: Vec<String>,
    /// Parent place type → child place type
    pub contained_place_types: BTreeMap<String, String>,
    /// Event type specs by key
    pub event_type_spec: BTreeMap<String, EventTypeSpec>,
}

/// Vertical stack of tiles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Column {
    /// Tiles in presentation order
    pub tiles: Vec<Tile>,
}

impl Column {
    /// Create column from tiles
    #[inline]
    #[must_use]
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }
}

/// Titled row of columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Block {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Columns in presentation order
    pub columns: Vec<Column>,
}

impl Block {
    /// Create empty block
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With column appended
    #[inline]
    #[must_use]
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// All tiles, column by column
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.columns.iter().flat_map(|c| c.tiles.iter())
    }
}

/// Titled section of blocks sharing variable specs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Variable specs by key
    pub stat_var_spec: BTreeMap<String, StatVarSpec>,
    /// Blocks in presentation order
    pub blocks: Vec<Block>,
}

impl Category {
    /// Create empty category
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Add spec keyed by its variable; an existing entry is kept
    pub fn add_stat_var_spec(&mut self, spec: StatVarSpec) {
        self.stat_var_spec.entry(spec.stat_var.clone()).or_insert(spec);
    }

    /// All tiles in this category
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.blocks.iter().flat_map(Block::tiles)
    }

    /// Check every tile variable key resolves to a spec
    ///
    /// # Errors
    /// Returns the first unresolved key
    pub fn validate(&self) -> Result<(), PageError> {
        for tile in self.tiles() {
            if !tile.spec_matches_type() {
                return Err(PageError::MismatchedTileSpec {
                    title: tile.title.clone(),
                    tile_type: tile.tile_type.to_string(),
                });
            }
            if let Some(missing) = tile
                .stat_var_key
                .iter()
                .find(|k| !self.stat_var_spec.contains_key(*k))
            {
                return Err(PageError::MissingStatVarSpec {
                    category: self.title.clone(),
                    stat_var: missing.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Complete page description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectPageConfig {
    /// Page metadata
    pub metadata: PageMetadata,
    /// Categories in presentation order
    pub categories: Vec<Category>,
}

impl SubjectPageConfig {
    /// True if the page has no blocks
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.blocks.is_empty())
    }

    /// Total number of blocks
    #[inline]
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.categories.iter().map(|c| c.blocks.len()).sum()
    }

    /// Every variable key referenced by any tile
    #[must_use]
    pub fn tile_stat_vars(&self) -> BTreeSet<String> {
        self.categories
            .iter()
            .flat_map(Category::tiles)
            .flat_map(|t| t.stat_var_key.iter().cloned())
            .collect()
    }

    /// Check referential integrity of the whole page
    ///
    /// # Errors
    /// - `PageError::MissingStatVarSpec` if a tile variable has no spec in its category
    /// - `PageError::MissingEventTypeSpec` if a tile event key is not in metadata
    /// - `PageError::MismatchedTileSpec` if a tile carries a spec for another kind
    pub fn validate(&self) -> Result<(), PageError> {
        for category in &self.categories {
            category.validate()?;
            for tile in category.tiles() {
                if let Some(key) = tile
                    .event_type_keys()
                    .iter()
                    .find(|k| !self.metadata.event_type_spec.contains_key(*k))
                {
                    return Err(PageError::MissingEventTypeSpec(key.clone()));
                }
            }
        }
        Ok(())
    }

    /// Serialize to the schema's JSON form
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
