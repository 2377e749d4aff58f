//! Pipeline-level properties over generated catalogs and oracle data.

use explore_builder::PresentationConfig;
use explore_core::Fulfiller;
use explore_oracle::{OracleError, SiblingRequest, SiblingSuggester};
use explore_test_utils::fixtures::{california_utterance, peer_group, topic_of};
use explore_test_utils::{FakeCatalog, FakeOracle, FakeSuggester};
use explore_vars::{ChartVars, ChartVarsMap, Classification, Params};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

const TOPIC: &str = "dc/topic/Generated";

/// Suggester that always fails
struct DownSuggester;

#[async_trait::async_trait]
impl SiblingSuggester for DownSuggester {
    async fn suggest_siblings(&self, _request: &SiblingRequest) -> Result<ChartVarsMap, OracleError> {
        Err(OracleError::Transport("connection reset".to_string()))
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn var_name() -> impl Strategy<Value = String> {
    "[a-j]".prop_map(|s| format!("Count_{s}"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_tile_variable_is_specified_and_exists(
        singles in prop::collection::vec(var_name(), 0..5),
        groups in prop::collection::vec(prop::collection::vec(var_name(), 1..4), 0..4),
        existing in prop::collection::btree_set(var_name(), 0..10),
        siblings in prop::collection::vec(var_name(), 0..4),
        contained in any::<bool>(),
    ) {
        let singles: Vec<&str> = singles.iter().map(String::as_str).collect();
        let topic = groups.iter().enumerate().fold(topic_of(TOPIC, "Generated", &singles), |node, (i, svs)| {
            let svs: Vec<&str> = svs.iter().map(String::as_str).collect();
            node.with_member(peer_group(&format!("dc/svpg/{i}"), "Group", &svs))
        });

        let mut oracle = FakeOracle::new().with_data("geoId/06", existing.iter().cloned());
        let mut uttr = california_utterance().with_topic(TOPIC);
        if contained {
            oracle = oracle
                .with_children("geoId/06", "County", &["geoId/06001"])
                .with_data("geoId/06001", existing.iter().cloned());
            uttr = uttr.with_classification(Classification::ContainedIn {
                place_type: explore_vars::PlaceType::new("County"),
            });
        }
        let suggester = FakeSuggester::new().with_response(
            TOPIC,
            "siblings",
            ChartVars::new(siblings.clone()).with_source_topic("dc/topic/Siblings"),
        );
        let fulfiller = Fulfiller::new(
            Arc::new(oracle),
            Arc::new(suggester),
            Arc::new(FakeCatalog::new().with_topic(topic)),
        );

        let resp = runtime().block_on(fulfiller.fulfill(&mut uttr, &PresentationConfig::default()));
        let page = resp.chart_pb.expect("places were given");

        prop_assert!(page.validate().is_ok());
        for sv in page.tile_stat_vars() {
            prop_assert!(existing.contains(&sv), "{} is plotted but has no data", sv);
        }
        for by_topic in resp.related_things.explore_more.values() {
            for svs in by_topic.values() {
                prop_assert!(svs.len() >= 2);
                prop_assert!(svs.windows(2).all(|w| w[0] < w[1]));
                prop_assert!(svs.iter().all(|sv| existing.contains(sv)));
            }
        }
    }

    #[test]
    fn suggester_failures_never_abort(
        existing in prop::collection::btree_set(var_name(), 0..3),
        disable_more in any::<bool>(),
    ) {
        let svs: Vec<String> = existing.iter().cloned().chain(["Count_z".to_string()]).collect();
        let svs: Vec<&str> = svs.iter().map(String::as_str).collect();
        let fulfiller = Fulfiller::new(
            Arc::new(FakeOracle::new().with_data("geoId/06", existing.iter().cloned())),
            Arc::new(DownSuggester),
            Arc::new(FakeCatalog::new().with_topic(topic_of(TOPIC, "Generated", &svs))),
        );
        let mut uttr = california_utterance()
            .with_topic(TOPIC)
            .with_context(Params::EXP_MORE_DISABLED, disable_more);

        let resp = runtime().block_on(fulfiller.fulfill(&mut uttr, &PresentationConfig::default()));

        let page = resp.chart_pb.expect("places were given");
        let plotted: BTreeSet<String> = page.tile_stat_vars();
        prop_assert_eq!(plotted, existing);
        prop_assert_eq!(uttr.counters.err_count("extend_topics_failed"), 1);
    }
}
