//! General-purpose page layout
//!
//! One category per source topic (direct variables share one), one block per
//! chart-variable group, and a trailing category for extension results. The
//! tiles in a block follow the shape of the group and of the query:
//!
//! | Group / query            | Tiles                 |
//! |--------------------------|-----------------------|
//! | event                    | disaster event map    |
//! | correlation pair         | scatter (or line)     |
//! | contained-in place type  | map + ranking per var |
//! | several places           | bar                   |
//! | single variable          | highlight + line      |
//! | several variables        | bar + line            |

use crate::builder::{BuildRequest, PageBuilder, PageConfigResponse};
use crate::config::PresentationConfig;
use crate::layout::{category_slot, group_title, page_metadata, place_names, push_block};
use explore_page::{
    Block, Category, Column, EventTypeSpec, PageMetadata, RankingTileSpec, SubjectPageConfig, Tile,
};
use explore_vars::{is_topic, ChartVars, PopulateState};
use std::collections::BTreeSet;

/// Title of the category holding direct variables
const DIRECT_TITLE: &str = "Statistics";

/// Title of the category holding extension results
const RELATED_TITLE: &str = "Related statistics";

/// General page builder
#[derive(Debug, Clone, Copy, Default)]
pub struct MainPageBuilder;

/// Page under construction
struct Draft {
    metadata: PageMetadata,
    plotted: BTreeSet<String>,
    topics: Vec<String>,
}

impl MainPageBuilder {
    /// Create builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Add a group to a category; false if it was dropped
    fn place_group(
        category: &mut Category,
        cv: &ChartVars,
        request: &BuildRequest<'_>,
        draft: &mut Draft,
    ) -> bool {
        let config = request.config;
        if category.blocks.len() >= config.max_blocks_per_category {
            tracing::debug!(
                "Category '{}' is full, dropping group {:?}",
                category.title,
                cv.svs
            );
            return false;
        }
        let Some(block) = Self::block_for(cv, request.state, config, &mut draft.metadata) else {
            return false;
        };

        push_block(category, block, config);
        draft.plotted.extend(cv.svs.iter().cloned());
        if !cv.orig_sv.is_empty() {
            draft.plotted.insert(cv.orig_sv.clone());
        }
        if !cv.source_topic.is_empty() && !draft.topics.contains(&cv.source_topic) {
            draft.topics.push(cv.source_topic.clone());
        }
        true
    }

    fn block_for(
        cv: &ChartVars,
        state: &PopulateState<'_>,
        config: &PresentationConfig,
        metadata: &mut PageMetadata,
    ) -> Option<Block> {
        let title = group_title(cv, config);
        let mut columns = Vec::new();

        if let Some(event) = &cv.event {
            let spec = config
                .event_type_specs
                .get(&event.key)
                .cloned()
                .unwrap_or_else(|| EventTypeSpec::new(&event.key, &event.key, event.dcids.clone()));
            metadata.event_type_spec.entry(event.key.clone()).or_insert(spec);
            columns.push(Column::new(vec![Tile::disaster_event_map(
                &title,
                vec![event.key.clone()],
            )]));
        } else if cv.svs.is_empty() {
            return None;
        } else if cv.is_correlation && cv.svs.len() == 2 {
            let tile_title = format!(
                "{} vs. {}",
                config.name_for(&cv.svs[0]),
                config.name_for(&cv.svs[1])
            );
            let tile = if state.place_type.is_some() {
                Tile::scatter(tile_title, cv.svs.clone())
            } else {
                Tile::line(tile_title, cv.svs.clone())
            };
            columns.push(Column::new(vec![tile]));
        } else if let Some(child) = &state.place_type {
            for sv in &cv.svs {
                let name = config.name_for(sv);
                columns.push(Column::new(vec![
                    Tile::map(format!("{name} by {child}"), vec![sv.clone()]),
                    Tile::ranking(
                        format!("Rankings of {name}"),
                        vec![sv.clone()],
                        RankingTileSpec::highest_and_lowest(),
                    ),
                ]));
            }
        } else if state.uttr.places.len() > 1 {
            columns.push(Column::new(vec![Tile::bar(&title, cv.svs.clone())]));
        } else if let [sv] = cv.svs.as_slice() {
            columns.push(Column::new(vec![
                Tile::highlight(&title, vec![sv.clone()]),
                Tile::line(&title, vec![sv.clone()]),
            ]));
        } else {
            columns.push(Column::new(vec![
                Tile::bar(&title, cv.svs.clone()),
                Tile::line(&title, cv.svs.clone()),
            ]));
        }

        if !cv.description.is_empty() {
            if let Some(first) = columns.first_mut() {
                first.tiles.insert(0, Tile::description(&title, &cv.description));
            }
        }

        Some(
            columns
                .into_iter()
                .fold(Block::new(title), Block::with_column),
        )
    }

    fn advisory(request: &BuildRequest<'_>, primary_plotted: bool, draft: &Draft) -> String {
        let places = place_names(request.state);
        if !primary_plotted {
            return if draft.plotted.is_empty() && draft.metadata.event_type_spec.is_empty() {
                format!("Sorry, there were no statistics found for {places}.")
            } else {
                format!(
                    "Sorry, there were no statistics found for the requested topics in {places}. \
                     Here are some related statistics instead."
                )
            };
        }

        let missing: Vec<&str> = request
            .state
            .uttr
            .svs
            .iter()
            .filter(|sv| !is_topic(sv) && !draft.plotted.contains(*sv))
            .map(|sv| request.config.name_for(sv))
            .collect();
        if missing.is_empty() {
            String::new()
        } else {
            format!(
                "Sorry, there were no statistics found for {} in {places}.",
                missing.join(", ")
            )
        }
    }
}

impl PageBuilder for MainPageBuilder {
    fn build(&self, request: &BuildRequest<'_>) -> PageConfigResponse {
        let config = request.config;
        let mut draft = Draft {
            metadata: page_metadata(request.state, config),
            plotted: BTreeSet::new(),
            topics: Vec::new(),
        };
        let mut keys = Vec::new();
        let mut categories = Vec::new();
        let mut primary_plotted = false;

        for cv in request.chart_vars {
            let title = if cv.source_topic.is_empty() {
                DIRECT_TITLE
            } else {
                config.name_for(&cv.source_topic)
            };
            let idx = category_slot(&mut keys, &mut categories, &cv.source_topic, title);
            primary_plotted |= Self::place_group(&mut categories[idx], cv, request, &mut draft);
        }

        let mut related = Category::new(RELATED_TITLE);
        for cv in request.ext_chart_vars {
            Self::place_group(&mut related, cv, request, &mut draft);
        }
        categories.push(related);
        categories.retain(|c| !c.blocks.is_empty());

        let user_message = Self::advisory(request, primary_plotted, &draft);
        PageConfigResponse {
            config: SubjectPageConfig {
                metadata: draft.metadata,
                categories,
            },
            plotted_orig_vars: draft.plotted,
            plotted_topics: draft.topics,
            user_message,
        }
    }

    fn name(&self) -> &'static str {
        "main"
    }
}
