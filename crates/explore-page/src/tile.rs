//! Tiles: the leaves of the page tree

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tile kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    /// Unset
    #[default]
    TypeNone,
    /// Timeline
    Line,
    /// Bar chart
    Bar,
    /// Choropleth map
    Map,
    /// Scatter plot
    Scatter,
    /// Bivariate map
    Bivariate,
    /// Ranking table
    Ranking,
    /// Single highlighted value
    Highlight,
    /// Text description
    Description,
    /// Disaster event map
    DisasterEventMap,
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Ranking tile parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankingTileSpec {
    /// Show highest values
    pub show_highest: bool,
    /// Show lowest values
    pub show_lowest: bool,
    /// Show largest increases
    pub show_increase: bool,
    /// Show largest decreases
    pub show_decrease: bool,
    /// Base date for increase/decrease
    pub diff_base_date: String,
    /// Title over the highest list
    pub highest_title: String,
    /// Title over the lowest list
    pub lowest_title: String,
    /// Title over the increase list
    pub increase_title: String,
    /// Title over the decrease list
    pub decrease_title: String,
}

impl RankingTileSpec {
    /// Show highest and lowest
    #[inline]
    #[must_use]
    pub fn highest_and_lowest() -> Self {
        Self {
            show_highest: true,
            show_lowest: true,
            ..Self::default()
        }
    }
}

/// Disaster event map parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisasterEventMapTileSpec {
    /// Keys into page metadata event type specs
    pub event_type_keys: Vec<String>,
}

/// A single chart or text element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tile {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Kind
    #[serde(rename = "type")]
    pub tile_type: TileType,
    /// Keys into the owning category's stat var specs
    pub stat_var_key: Vec<String>,
    /// Ranking parameters, only on ranking tiles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking_tile_spec: Option<RankingTileSpec>,
    /// Event map parameters, only on disaster event map tiles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disaster_event_map_tile_spec: Option<DisasterEventMapTileSpec>,
}

impl Tile {
    fn of(tile_type: TileType, title: impl Into<String>, stat_var_key: Vec<String>) -> Self {
        Self {
            title: title.into(),
            tile_type,
            stat_var_key,
            ..Self::default()
        }
    }

    /// Timeline tile
    #[must_use]
    pub fn line(title: impl Into<String>, stat_var_key: Vec<String>) -> Self {
        Self::of(TileType::Line, title, stat_var_key)
    }

    /// Bar tile
    #[must_use]
    pub fn bar(title: impl Into<String>, stat_var_key: Vec<String>) -> Self {
        Self::of(TileType::Bar, title, stat_var_key)
    }

    /// Map tile
    #[must_use]
    pub fn map(title: impl Into<String>, stat_var_key: Vec<String>) -> Self {
        Self::of(TileType::Map, title, stat_var_key)
    }

    /// Scatter tile
    #[must_use]
    pub fn scatter(title: impl Into<String>, stat_var_key: Vec<String>) -> Self {
        Self::of(TileType::Scatter, title, stat_var_key)
    }

    /// Bivariate tile
    #[must_use]
    pub fn bivariate(title: impl Into<String>, stat_var_key: Vec<String>) -> Self {
        Self::of(TileType::Bivariate, title, stat_var_key)
    }

    /// Highlight tile
    #[must_use]
    pub fn highlight(title: impl Into<String>, stat_var_key: Vec<String>) -> Self {
        Self::of(TileType::Highlight, title, stat_var_key)
    }

    /// Ranking tile
    #[must_use]
    pub fn ranking(
        title: impl Into<String>,
        stat_var_key: Vec<String>,
        spec: RankingTileSpec,
    ) -> Self {
        Self {
            ranking_tile_spec: Some(spec),
            ..Self::of(TileType::Ranking, title, stat_var_key)
        }
    }

    /// Description tile
    #[must_use]
    pub fn description(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::of(TileType::Description, title, Vec::new())
        }
    }

    /// Disaster event map tile
    #[must_use]
    pub fn disaster_event_map(title: impl Into<String>, event_type_keys: Vec<String>) -> Self {
        Self {
            disaster_event_map_tile_spec: Some(DisasterEventMapTileSpec { event_type_keys }),
            ..Self::of(TileType::DisasterEventMap, title, Vec::new())
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Event type keys this tile references
    #[must_use]
    pub fn event_type_keys(&self) -> &[String] {
        self.disaster_event_map_tile_spec
            .as_ref()
            .map(|s| s.event_type_keys.as_slice())
            .unwrap_or_default()
    }

    /// True if kind-specific specs match the tile type
    #[must_use]
    pub fn spec_matches_type(&self) -> bool {
        let ranking_ok = self.ranking_tile_spec.is_none() || self.tile_type == TileType::Ranking;
        let event_ok = self.disaster_event_map_tile_spec.is_none()
            || self.tile_type == TileType::DisasterEventMap;
        ranking_ok && event_ok
    }
}
