//! Page integrity errors

/// Referential integrity violations in a page config
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// Tile references a variable with no spec in its category
    #[error("category '{category}' has no stat var spec for '{stat_var}'")]
    MissingStatVarSpec {
        /// Category title
        category: String,
        /// Unresolved variable key
        stat_var: String,
    },

    /// Tile references an event type missing from page metadata
    #[error("page metadata has no event type spec for '{0}'")]
    MissingEventTypeSpec(String),

    /// Tile carries a kind-specific spec that does not match its type
    #[error("tile '{title}' of type {tile_type} carries a mismatched spec")]
    MismatchedTileSpec {
        /// Tile title
        title: String,
        /// Tile type name
        tile_type: String,
    },
}
