//! Layout helpers shared by the page builders

use crate::config::PresentationConfig;
use explore_page::{Block, Category, PageMetadata};
use explore_vars::{ChartVars, PopulateState};

/// Page metadata for a request
pub(crate) fn page_metadata(state: &PopulateState<'_>, config: &PresentationConfig) -> PageMetadata {
    let uttr = state.uttr;
    let topic_id = uttr.topics.first().cloned().unwrap_or_default();
    let topic_name = config.name_for(&topic_id).to_string();

    let mut metadata = PageMetadata {
        topic_id,
        topic_name,
        place_dcid: uttr.places.iter().map(|p| p.dcid.clone()).collect(),
        ..PageMetadata::default()
    };
    if let (Some(place), Some(child)) = (uttr.primary_place(), &state.place_type) {
        metadata
            .contained_place_types
            .insert(place.place_type.as_str().to_string(), child.as_str().to_string());
    }
    metadata
}

/// Comma-joined place names for messages
pub(crate) fn place_names(state: &PopulateState<'_>) -> String {
    let names: Vec<&str> = state.uttr.places.iter().map(|p| p.name.as_str()).collect();
    if names.is_empty() {
        "the requested places".to_string()
    } else {
        names.join(", ")
    }
}

/// Block title for a group
pub(crate) fn group_title(cv: &ChartVars, config: &PresentationConfig) -> String {
    if !cv.title.is_empty() {
        return cv.title.clone();
    }
    if !cv.svpg_id.is_empty() {
        return config.name_for(&cv.svpg_id).to_string();
    }
    match cv.svs.as_slice() {
        [] => cv.event.as_ref().map(|e| e.key.clone()).unwrap_or_default(),
        [sv] => config.name_for(sv).to_string(),
        [first, ..] => format!("{} and more", config.name_for(first)),
    }
}

/// Push a block, registering specs for every variable its tiles reference
pub(crate) fn push_block(category: &mut Category, block: Block, config: &PresentationConfig) {
    let keys: Vec<String> = block
        .tiles()
        .flat_map(|t| t.stat_var_key.iter().cloned())
        .collect();
    for key in keys {
        if !category.stat_var_spec.contains_key(&key) {
            category.add_stat_var_spec(config.stat_var_spec(&key));
        }
    }
    category.blocks.push(block);
}

/// Index of the category keyed by `key`, created with `title` if missing
pub(crate) fn category_slot(
    keys: &mut Vec<String>,
    categories: &mut Vec<Category>,
    key: &str,
    title: impl Into<String>,
) -> usize {
    if let Some(idx) = keys.iter().position(|k| k == key) {
        return idx;
    }
    keys.push(key.to_string());
    categories.push(Category::new(title));
    categories.len() - 1
}
