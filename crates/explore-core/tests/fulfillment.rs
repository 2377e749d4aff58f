//! End-to-end fulfillment tests against in-memory collaborators.

use explore_builder::PresentationConfig;
use explore_core::{FulfillConfig, Fulfiller};
use explore_oracle::{MockSiblingSuggester, TopicNode};
use explore_page::TileType;
use explore_test_utils::fixtures::{california, california_utterance, peer_group, topic_of, DISEASES, HEALTH};
use explore_test_utils::{init_tracing, FakeCatalog, FakeOracle, FakeSuggester};
use explore_vars::{ChartVars, Classification, Params, Place, PlaceType, QueryType, Utterance};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// Health: one variable and two peer groups, five variables in all.
fn health_topic() -> TopicNode {
    topic_of(HEALTH, "Health", &["v1"])
        .with_member(peer_group("dc/svpg/G1", "Group one", &["v2", "v3"]))
        .with_member(peer_group("dc/svpg/G2", "Group two", &["v4", "v5"]))
}

fn fulfiller(oracle: &Arc<FakeOracle>, suggester: &Arc<FakeSuggester>) -> Fulfiller {
    Fulfiller::new(
        oracle.clone(),
        suggester.clone(),
        Arc::new(FakeCatalog::new().with_topic(health_topic())),
    )
}

fn health_utterance() -> Utterance {
    california_utterance().with_topic(HEALTH)
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Scenario: three of five variables exist, all from one topic.
#[tokio::test]
async fn confirmed_topic_variables_fill_one_category() {
    init_tracing();
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", ["v1", "v2", "v3"]));
    let suggester = Arc::new(FakeSuggester::new());
    let mut uttr = health_utterance();

    let resp = fulfiller(&oracle, &suggester)
        .fulfill(&mut uttr, &PresentationConfig::default())
        .await;

    let page = resp.chart_pb.expect("page");
    assert_eq!(page.categories.len(), 1);
    assert_eq!(page.block_count(), 2);
    assert_eq!(page.tile_stat_vars(), set(&["v1", "v2", "v3"]));
    assert_eq!(resp.user_message, "");
    assert!(page.validate().is_ok());
    assert_eq!(uttr.query_type, QueryType::Basic);
    assert!(uttr.counters.has_timing("main_existence_check"));
    assert_eq!(uttr.counters.total_errors(), 0);
}

/// Scenario: nothing exists, extension supplies two confirmed variables.
#[tokio::test]
async fn sparse_topic_is_extended_with_siblings() {
    init_tracing();
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", ["x1", "x2"]));
    let suggester = Arc::new(FakeSuggester::new().with_response(
        HEALTH,
        DISEASES,
        ChartVars::new(["x1", "x2"]).with_source_topic(DISEASES),
    ));
    let mut uttr = health_utterance();

    let resp = fulfiller(&oracle, &suggester)
        .fulfill(&mut uttr, &PresentationConfig::default())
        .await;

    let requests = suggester.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].seed.ids(), [HEALTH.to_string()]);

    let page = resp.chart_pb.expect("page");
    assert_eq!(page.categories.len(), 1);
    assert_eq!(page.tile_stat_vars(), set(&["x1", "x2"]));
    assert!(!resp.user_message.is_empty());
    assert!(page.validate().is_ok());
    assert!(uttr.counters.has_timing("extend_topics"));
    assert!(uttr.counters.has_timing("extension_existence_check"));
}

/// Scenario: extension disabled by the caller.
#[tokio::test]
async fn disabled_extension_makes_no_suggestion_calls() {
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", ["v1"]));
    let suggester = Arc::new(
        FakeSuggester::new().with_response(HEALTH, DISEASES, ChartVars::new(["x1", "x2"])),
    );
    let mut uttr = health_utterance().with_context(Params::EXTENSION_DISABLED, true);

    let resp = fulfiller(&oracle, &suggester)
        .fulfill(&mut uttr, &PresentationConfig::default())
        .await;

    assert!(suggester.requests().is_empty());
    assert!(resp.related_things.explore_more.is_empty());
    let page = resp.chart_pb.expect("page");
    assert_eq!(page.tile_stat_vars(), set(&["v1"]));
    assert!(page.validate().is_ok());
}

#[tokio::test]
async fn disabled_extension_never_reaches_the_suggester() {
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", ["v1"]));
    let mut suggester = MockSiblingSuggester::new();
    suggester.expect_suggest_siblings().never();
    let fulfiller = Fulfiller::new(
        oracle,
        Arc::new(suggester),
        Arc::new(FakeCatalog::new().with_topic(health_topic())),
    );
    let mut uttr = health_utterance().with_context(Params::EXTENSION_DISABLED, true);

    let resp = fulfiller.fulfill(&mut uttr, &PresentationConfig::default()).await;
    assert!(!resp.is_empty());
}

#[tokio::test]
async fn no_places_is_the_single_fatal_condition() {
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", ["v1"]));
    let suggester = Arc::new(FakeSuggester::new());
    let mut uttr = Utterance::new().with_topic(HEALTH);

    let resp = fulfiller(&oracle, &suggester)
        .fulfill(&mut uttr, &PresentationConfig::default())
        .await;

    assert!(resp.is_empty());
    assert_eq!(resp.user_message, "");
    assert_eq!(uttr.counters.err_count("failed_NoPlacesToCheck"), 1);
    assert_eq!(uttr.counters.total_errors(), 1);
    assert_eq!(oracle.call_count(), 0);
    assert!(suggester.requests().is_empty());
}

#[tokio::test]
async fn try_fulfill_surfaces_no_places() {
    let oracle = Arc::new(FakeOracle::new());
    let suggester = Arc::new(FakeSuggester::new());
    let mut uttr = Utterance::new().with_sv("Count_Person");

    let err = fulfiller(&oracle, &suggester)
        .try_fulfill(&mut uttr, &PresentationConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, explore_core::FulfillError::NoPlacesToCheck));
    assert_eq!(uttr.counters.err_count("failed_NoPlacesToCheck"), 1);
}

#[tokio::test]
async fn contained_in_without_children_has_no_places() {
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", ["v1"]));
    let suggester = Arc::new(FakeSuggester::new());
    let mut uttr = health_utterance().with_classification(Classification::ContainedIn {
        place_type: PlaceType::new("County"),
    });

    let resp = fulfiller(&oracle, &suggester)
        .fulfill(&mut uttr, &PresentationConfig::default())
        .await;

    assert!(resp.is_empty());
    assert_eq!(uttr.counters.err_count("failed_NoPlacesToCheck"), 1);
}

#[tokio::test]
async fn contained_in_checks_sampled_children() {
    let oracle = Arc::new(
        FakeOracle::new()
            .with_children("geoId/06", "County", &["geoId/06001", "geoId/06003"])
            .with_data("geoId/06003", ["v1", "v2", "v3", "v4"]),
    );
    let suggester = Arc::new(FakeSuggester::new());
    let mut uttr = health_utterance().with_classification(Classification::ContainedIn {
        place_type: PlaceType::new("County"),
    });

    let resp = fulfiller(&oracle, &suggester)
        .fulfill(&mut uttr, &PresentationConfig::default())
        .await;

    let calls = oracle.calls();
    assert_eq!(calls[0].places, vec!["geoId/06001".to_string(), "geoId/06003".to_string()]);
    let page = resp.chart_pb.expect("page");
    assert!(page.categories[0].tiles().any(|t| t.tile_type == TileType::Ranking));
    assert_eq!(page.metadata.contained_place_types["State"], "County");
}

#[tokio::test]
async fn no_pair_is_checked_twice() {
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", ["v1", "p1", "p2"]));
    let suggester = Arc::new(FakeSuggester::new().with_response(
        "v1",
        "v1",
        ChartVars::new(["v1", "p1", "p2"]).with_source_topic("dc/topic/Peers"),
    ));
    let mut uttr = health_utterance();

    let resp = fulfiller(&oracle, &suggester)
        .fulfill(&mut uttr, &PresentationConfig::default())
        .await;

    assert!(!oracle.has_repeated_pairs());
    assert!(oracle.call_count() <= 3);
    assert_eq!(
        resp.related_things.explore_more["v1"]["dc/topic/Peers"],
        vec!["p1".to_string(), "p2".to_string(), "v1".to_string()]
    );
    assert!(uttr.counters.has_timing("explore_more_existence_check"));
    assert_eq!(resp.related_things.main_topics[0].name, "Health");
}

#[tokio::test]
async fn explore_more_can_be_disabled_alone() {
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", ["v1", "p1", "p2"]));
    let suggester = Arc::new(FakeSuggester::new().with_response(
        "v1",
        "v1",
        ChartVars::new(["p1", "p2"]).with_source_topic("dc/topic/Peers"),
    ));
    let mut uttr = health_utterance().with_context(Params::EXP_MORE_DISABLED, true);

    let resp = fulfiller(&oracle, &suggester)
        .fulfill(&mut uttr, &PresentationConfig::default())
        .await;

    let requests = suggester.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].seed.ids(), [HEALTH.to_string()]);
    assert!(resp.related_things.explore_more.is_empty());
}

#[tokio::test]
async fn override_groups_reach_the_suggester() {
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", ["v1", "v2", "v3", "v4", "v5"]));
    let suggester = Arc::new(FakeSuggester::new().with_response(
        "dc/g/Custom",
        "custom",
        ChartVars::new(["v9"]),
    ));
    let mut uttr = health_utterance()
        .with_context(Params::EXT_SVGS, vec!["dc/g/Custom".to_string()])
        .with_context(Params::EXP_MORE_DISABLED, true);
    let fulfiller = fulfiller(&oracle, &suggester)
        .with_config(FulfillConfig::default().with_extension_threshold(1, 1));

    fulfiller.fulfill(&mut uttr, &PresentationConfig::default()).await;

    let requests = suggester.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].override_groups, vec!["dc/g/Custom".to_string()]);
}

#[tokio::test]
async fn correlation_needs_two_variables() {
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", ["Count_Person", "Median_Income"]));
    let suggester = Arc::new(FakeSuggester::new());
    let config = PresentationConfig::default();

    let mut single = california_utterance()
        .with_sv("Count_Person")
        .with_classification(Classification::Correlation)
        .with_context(Params::EXTENSION_DISABLED, true);
    let resp = fulfiller(&oracle, &suggester).fulfill(&mut single, &config).await;
    let page = resp.chart_pb.expect("page");
    assert!(page.categories.iter().flat_map(|c| c.tiles()).all(|t| t.stat_var_key.len() <= 1));

    let mut pair = single.clone().with_sv("Median_Income");
    let resp = fulfiller(&oracle, &suggester).fulfill(&mut pair, &config).await;
    let page = resp.chart_pb.expect("page");
    let tiles: Vec<_> = page.categories.iter().flat_map(|c| c.tiles()).collect();
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].stat_var_key, vec!["Count_Person".to_string(), "Median_Income".to_string()]);
}

#[tokio::test]
async fn correlation_with_one_missing_variable_is_reported() {
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", ["Median_Income"]));
    let suggester = Arc::new(FakeSuggester::new());
    let mut uttr = california_utterance()
        .with_sv("Count_Person")
        .with_sv("Median_Income")
        .with_classification(Classification::Correlation)
        .with_context(Params::EXTENSION_DISABLED, true);

    let resp = fulfiller(&oracle, &suggester)
        .fulfill(&mut uttr, &PresentationConfig::default())
        .await;

    let page = resp.chart_pb.expect("page");
    assert_eq!(page.tile_stat_vars(), set(&["Median_Income"]));
    assert!(page.validate().is_ok());
    assert!(resp.user_message.contains("Count_Person"));
    assert!(!resp.user_message.contains("Median_Income"));
    assert_eq!(oracle.call_count(), 1);
}

#[tokio::test]
async fn wide_topic_is_checked_in_one_batch() {
    let names: Vec<String> = (0..150).map(|i| format!("Count_Wide_{i}")).collect();
    let svs: Vec<&str> = names.iter().map(String::as_str).collect();
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", svs.iter().copied()));
    let suggester = Arc::new(FakeSuggester::new());
    let catalog = FakeCatalog::new().with_topic(topic_of(HEALTH, "Health", &svs));
    let fulfiller = Fulfiller::new(oracle.clone(), suggester, Arc::new(catalog));
    let mut uttr = health_utterance().with_context(Params::EXP_MORE_DISABLED, true);

    let resp = fulfiller.fulfill(&mut uttr, &PresentationConfig::default()).await;

    let page = resp.chart_pb.expect("page");
    assert_eq!(page.block_count(), 20);
    assert_eq!(resp.user_message, "");
    assert_eq!(oracle.call_count(), 1);
    assert!(!oracle.has_repeated_pairs());
}

#[tokio::test]
async fn sdg_requests_skip_extension() {
    let oracle = Arc::new(FakeOracle::new().with_data("country/KEN", ["sdg/SI_POV_DAY1"]));
    let suggester = Arc::new(FakeSuggester::new().with_response(
        "dc/topic/sdg_1",
        "other",
        ChartVars::new(["sdg/OTHER"]),
    ));
    let catalog = FakeCatalog::new().with_topic(topic_of("dc/topic/sdg_1", "No poverty", &["sdg/SI_POV_DAY1"]));
    let fulfiller = Fulfiller::new(oracle, suggester.clone(), Arc::new(catalog));
    let mut uttr = Utterance::new()
        .with_place(Place::new("country/KEN", "Kenya", "Country"))
        .with_topic("dc/topic/sdg_1")
        .with_context(Params::DC, "sdg");

    let resp = fulfiller.fulfill(&mut uttr, &PresentationConfig::default()).await;

    assert!(suggester.requests().is_empty());
    let page = resp.chart_pb.expect("page");
    assert_eq!(page.tile_stat_vars(), set(&["sdg/SI_POV_DAY1"]));
    assert!(resp.related_things.explore_more.is_empty());
}

#[tokio::test]
async fn oracle_failure_degrades_to_an_empty_page() {
    let oracle = Arc::new(FakeOracle::new().failing());
    let suggester = Arc::new(FakeSuggester::new());
    let mut uttr = health_utterance();

    let resp = fulfiller(&oracle, &suggester)
        .fulfill(&mut uttr, &PresentationConfig::default())
        .await;

    let page = resp.chart_pb.expect("page");
    assert!(page.is_empty());
    assert!(resp.user_message.contains("California"));
    assert!(uttr.counters.err_count("existence_check_failed") >= 1);
    assert_eq!(uttr.counters.err_count("failed_NoPlacesToCheck"), 0);
}

#[tokio::test]
async fn caller_timeout_yields_an_empty_response() {
    let oracle = Arc::new(
        FakeOracle::new()
            .with_data("geoId/06", ["v1"])
            .with_delay(Duration::from_millis(500)),
    );
    let suggester = Arc::new(FakeSuggester::new());
    let mut uttr = health_utterance();

    let resp = fulfiller(&oracle, &suggester)
        .fulfill_with_timeout(&mut uttr, &PresentationConfig::default(), Duration::from_millis(10))
        .await;

    assert!(resp.is_empty());
    assert_eq!(uttr.counters.err_count("failed_Timeout"), 1);
}

#[tokio::test]
async fn concurrent_calls_keep_separate_state() {
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", ["v1", "v2", "v3"]));
    let suggester = Arc::new(FakeSuggester::new());
    let fulfiller = fulfiller(&oracle, &suggester);
    let config = PresentationConfig::default();
    let mut first = health_utterance();
    let mut second = health_utterance();

    let (a, b) = futures::join!(
        fulfiller.fulfill(&mut first, &config),
        fulfiller.fulfill(&mut second, &config)
    );

    assert_eq!(a, b);
    assert_eq!(
        first.counters.info_count("oracle_calls"),
        second.counters.info_count("oracle_calls")
    );
    // Each call has its own cache, so both hit the oracle.
    assert!(oracle.call_count() >= 2);

    let (first, second) = (first.counters.flush(), second.counters.flush());
    assert_eq!(first.info["request_id"].len(), 1);
    assert_ne!(first.info["request_id"], second.info["request_id"]);
}

#[tokio::test]
async fn primary_place_is_used_for_metadata() {
    let oracle = Arc::new(FakeOracle::new().with_data("geoId/06", ["v1", "v2", "v3"]));
    let suggester = Arc::new(FakeSuggester::new());
    let mut uttr = health_utterance();

    let resp = fulfiller(&oracle, &suggester)
        .fulfill(&mut uttr, &PresentationConfig::default())
        .await;

    let page = resp.chart_pb.expect("page");
    assert_eq!(page.metadata.place_dcid, vec![california().dcid]);
    assert_eq!(page.metadata.topic_id, HEALTH);
}
