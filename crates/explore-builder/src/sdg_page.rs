//! Sustainable-development-goals page layout

use crate::builder::{BuildRequest, PageBuilder, PageConfigResponse};
use crate::config::PresentationConfig;
use crate::layout::{category_slot, group_title, page_metadata, place_names};
use explore_page::{Block, Category, Column, RankingTileSpec, SubjectPageConfig, Tile};
use explore_vars::ChartVars;
use std::collections::BTreeSet;

/// Unit applied to percent-valued goal indicators
const PERCENT_UNIT: &str = "%";

/// SDG page builder
///
/// One category per goal topic; every indicator gets its own column with a
/// highlight and a timeline, or a map and ranking for child places.
/// Extension results are never shown on SDG pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdgPageBuilder;

impl SdgPageBuilder {
    /// Create builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn register(category: &mut Category, sv: &str, config: &PresentationConfig) {
        if category.stat_var_spec.contains_key(sv) {
            return;
        }
        let mut spec = config.stat_var_spec(sv);
        if config.sdg_percent_vars.contains(sv) {
            spec = spec.with_unit(PERCENT_UNIT);
        }
        category.add_stat_var_spec(spec);
    }
}

impl PageBuilder for SdgPageBuilder {
    fn build(&self, request: &BuildRequest<'_>) -> PageConfigResponse {
        let config = request.config;
        let child = request.state.place_type.as_ref();
        let mut keys = Vec::new();
        let mut categories: Vec<Category> = Vec::new();
        let mut plotted = BTreeSet::new();
        let mut topics = Vec::new();

        for cv in request.chart_vars.iter().filter(|cv| !cv.svs.is_empty()) {
            let idx = category_slot(
                &mut keys,
                &mut categories,
                &cv.source_topic,
                config.name_for(&cv.source_topic),
            );
            let category = &mut categories[idx];
            if category.blocks.len() >= config.max_blocks_per_category {
                continue;
            }

            let mut block = Block::new(group_title(cv, config));
            for sv in &cv.svs {
                let name = config.name_for(sv);
                let tiles = match child {
                    Some(child) => vec![
                        Tile::map(format!("{name} by {child}"), vec![sv.clone()]),
                        Tile::ranking(
                            format!("Rankings of {name}"),
                            vec![sv.clone()],
                            RankingTileSpec::highest_and_lowest(),
                        ),
                    ],
                    None => vec![
                        Tile::highlight(name, vec![sv.clone()]),
                        Tile::line(name, vec![sv.clone()]),
                    ],
                };
                block = block.with_column(Column::new(tiles));
                Self::register(category, sv, config);
            }
            category.blocks.push(block);

            plotted.extend(cv.svs.iter().cloned());
            record_topic(&mut topics, cv);
        }

        let user_message = if plotted.is_empty() {
            format!(
                "Sorry, there were no SDG statistics found for {}.",
                place_names(request.state)
            )
        } else {
            String::new()
        };

        PageConfigResponse {
            config: SubjectPageConfig {
                metadata: page_metadata(request.state, config),
                categories,
            },
            plotted_orig_vars: plotted,
            plotted_topics: topics,
            user_message,
        }
    }

    fn name(&self) -> &'static str {
        "sdg"
    }
}

fn record_topic(topics: &mut Vec<String>, cv: &ChartVars) {
    if !cv.source_topic.is_empty() && !topics.contains(&cv.source_topic) {
        topics.push(cv.source_topic.clone());
    }
}
