//! Fulfillment orchestrator
//!
//! Resolver → existence tracker → extension (optional, re-verified) → page
//! assembler → related things. All state lives for one call: each call gets
//! its own [`ExistenceChecker`] and [`Counters`], and the counters are merged
//! into the utterance once the call ends.

use crate::config::FulfillConfig;
use crate::error::FulfillError;
use crate::existence::{chart_vars_fetch, get_places_to_check, ExistenceTracker, FetchOutcome};
use crate::extension::{explore_more, extend_topics, novel_groups, ExtensionPlan};
use crate::related::{compute_related_things, explore_peer_groups, ExplorePeerGroups, RelatedThings};
use crate::topic::{compute_chart_vars, compute_correlation_chart_vars, select_mode, ResolverMode};
use explore_builder::{BuildRequest, PageAssembler, PageDomain, PresentationConfig};
use explore_oracle::{ExistenceChecker, ExistenceOracle, SiblingSuggester, TopicCatalog};
use explore_page::SubjectPageConfig;
use explore_vars::{
    ChartVars, ChartVarsMap, Counters, PopulateState, QueryType, RequestId, Utterance,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Fulfillment result
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillResp {
    /// The page; absent when fulfillment failed
    pub chart_pb: Option<SubjectPageConfig>,
    /// Related groupings
    pub related_things: RelatedThings,
    /// Advisory for the user, empty if none
    pub user_message: String,
}

impl FulfillResp {
    /// Response for a failed call
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// True if no page was produced
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chart_pb.is_none()
    }

    /// Serialize to JSON
    ///
    /// # Errors
    /// Returns the serializer error
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Extension results merged into the page
#[derive(Debug, Default)]
struct Extended {
    chart_vars: Vec<ChartVars>,
    peer_groups: ExplorePeerGroups,
}

/// The fulfillment pipeline
///
/// Holds only shared, read-only collaborators; concurrent calls do not share
/// any mutable state.
#[derive(Clone)]
pub struct Fulfiller {
    oracle: Arc<dyn ExistenceOracle>,
    suggester: Arc<dyn SiblingSuggester>,
    catalog: Arc<dyn TopicCatalog>,
    assembler: Arc<PageAssembler>,
    config: FulfillConfig,
}

impl std::fmt::Debug for Fulfiller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fulfiller")
            .field("assembler", &self.assembler)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Fulfiller {
    /// Create fulfiller with default configuration and builders
    #[must_use]
    pub fn new(
        oracle: Arc<dyn ExistenceOracle>,
        suggester: Arc<dyn SiblingSuggester>,
        catalog: Arc<dyn TopicCatalog>,
    ) -> Self {
        Self {
            oracle,
            suggester,
            catalog,
            assembler: Arc::new(PageAssembler::new()),
            config: FulfillConfig::default(),
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: FulfillConfig) -> Self {
        self.config = config;
        self
    }

    /// With page assembler
    #[inline]
    #[must_use]
    pub fn with_assembler(mut self, assembler: PageAssembler) -> Self {
        self.assembler = Arc::new(assembler);
        self
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &FulfillConfig {
        &self.config
    }

    /// Fulfill an utterance
    ///
    /// Never fails: fatal conditions yield [`FulfillResp::empty`] and an error
    /// counter on the utterance. Applies the configured timeout, if any.
    pub async fn fulfill(&self, uttr: &mut Utterance, presentation: &PresentationConfig) -> FulfillResp {
        if let Some(timeout) = self.config.timeout() {
            return self.fulfill_with_timeout(uttr, presentation, timeout).await;
        }
        self.try_fulfill(uttr, presentation)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Fulfillment failed: {}", e);
                FulfillResp::empty()
            })
    }

    /// Fulfill with a caller-level deadline
    ///
    /// On expiry the call is abandoned, `failed_Timeout` is recorded and an
    /// empty response returned.
    pub async fn fulfill_with_timeout(
        &self,
        uttr: &mut Utterance,
        presentation: &PresentationConfig,
        timeout: Duration,
    ) -> FulfillResp {
        let outcome = tokio::time::timeout(timeout, self.try_fulfill(uttr, presentation)).await;
        match outcome {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                tracing::warn!("Fulfillment failed: {}", e);
                FulfillResp::empty()
            }
            Err(_) => {
                let err = FulfillError::Timeout {
                    duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                };
                tracing::warn!("{}", err);
                uttr.counters.err(err.counter_key(), err.to_string());
                FulfillResp::empty()
            }
        }
    }

    /// Fulfill an utterance, surfacing fatal conditions
    ///
    /// # Errors
    /// - `FulfillError::Config` if the configuration is out of range
    /// - `FulfillError::NoPlacesToCheck` if no target places resolved
    pub async fn try_fulfill(
        &self,
        uttr: &mut Utterance,
        presentation: &PresentationConfig,
    ) -> Result<FulfillResp, FulfillError> {
        self.config.validate()?;
        uttr.query_type = QueryType::Basic;

        let request_id = RequestId::new();
        let mut counters = Counters::new();
        counters.info("request_id", request_id.to_string());
        let result = self.run(request_id, uttr, presentation, &mut counters).await;
        uttr.counters.merge(counters);
        result
    }

    async fn run(
        &self,
        request_id: RequestId,
        uttr: &Utterance,
        presentation: &PresentationConfig,
        counters: &mut Counters,
    ) -> Result<FulfillResp, FulfillError> {
        let mut state = PopulateState::new(uttr);
        let mode = select_mode(uttr);
        tracing::info!(
            "[{}] Fulfilling {} keys over {} places ({:?} mode)",
            request_id,
            uttr.requested_keys().len(),
            uttr.places.len(),
            mode
        );

        let catalog = self.catalog.as_ref();
        let index = match mode {
            ResolverMode::Standard => {
                compute_chart_vars(&mut state, catalog, &self.config, counters).await
            }
            ResolverMode::Correlation => {
                compute_correlation_chart_vars(&mut state, catalog, &self.config, counters).await
            }
        };

        let places = get_places_to_check(&state, self.oracle.as_ref(), &self.config, counters).await;
        if places.is_empty() {
            let err = FulfillError::NoPlacesToCheck;
            counters.err(err.counter_key(), "");
            return Err(err);
        }

        let checker = ExistenceChecker::new(Arc::clone(&self.oracle));
        let mut existing_svs: BTreeSet<String> = uttr.requested_keys().into_iter().collect();

        let start = Instant::now();
        let mut tracker = ExistenceTracker::new(&checker, &places, &state.chart_vars_map);
        tracker.perform_existence_check(counters).await;
        counters.timeit("main_existence_check", start);
        let primary = chart_vars_fetch(&tracker, &mut existing_svs);
        tracing::info!(
            "Primary pass: {} groups, {} topics, {} explore-more candidates",
            primary.chart_vars.len(),
            primary.topics.len(),
            primary.explore_more.len()
        );

        let domain = PageDomain::from_context(&uttr.insight_ctx);
        let extended = if domain.is_sdg() {
            Extended::default()
        } else {
            self.extend(&state, &checker, &places, &primary, &mut existing_svs, counters)
                .await
        };

        let resp = self.assembler.assemble(
            domain,
            &BuildRequest {
                chart_vars: &primary.chart_vars,
                ext_chart_vars: &extended.chart_vars,
                state: &state,
                existing_svs: &existing_svs,
                config: presentation,
            },
        );
        let related_things = compute_related_things(
            &state,
            &resp.plotted_orig_vars,
            &resp.plotted_topics,
            &extended.peer_groups,
            &index,
        );

        let stats = checker.stats();
        counters.info("oracle_calls", stats.oracle_calls);
        tracing::info!(
            "[{}] Fulfilled with {} blocks, {} oracle calls",
            request_id,
            resp.config.block_count(),
            stats.oracle_calls
        );

        Ok(FulfillResp {
            chart_pb: Some(resp.config),
            related_things,
            user_message: resp.user_message,
        })
    }

    /// Run both extension paths and verify what they return
    async fn extend(
        &self,
        state: &PopulateState<'_>,
        checker: &ExistenceChecker,
        places: &[String],
        primary: &FetchOutcome,
        existing_svs: &mut BTreeSet<String>,
        counters: &mut Counters,
    ) -> Extended {
        let plan = ExtensionPlan::for_request(
            state.uttr,
            &primary.topics,
            primary.chart_vars.len(),
            existing_svs.len(),
            &self.config.extension,
        );
        let mut out = Extended::default();
        if !plan.extend_topics && !plan.explore_more {
            return out;
        }

        let suggester = self.suggester.as_ref();
        let start = Instant::now();
        let topic_fut = async {
            if plan.extend_topics {
                extend_topics(suggester, &primary.topics, existing_svs, &plan.override_groups).await
            } else {
                Ok(ChartVarsMap::new())
            }
        };
        let more_fut = async {
            if plan.explore_more {
                explore_more(suggester, &primary.explore_more).await
            } else {
                Ok(ChartVarsMap::new())
            }
        };
        let (topic_map, more_map) = futures::join!(topic_fut, more_fut);
        if plan.extend_topics {
            counters.timeit("extend_topics", start);
        }

        let topic_map = topic_map.unwrap_or_else(|e| {
            tracing::warn!("Topic extension failed: {}", e);
            counters.err("extend_topics_failed", e.label());
            ChartVarsMap::new()
        });
        let more_map = more_map.unwrap_or_else(|e| {
            tracing::warn!("Explore-more failed: {}", e);
            counters.err("explore_more_failed", e.label());
            ChartVarsMap::new()
        });

        let mut shown: BTreeSet<String> = primary
            .chart_vars
            .iter()
            .flat_map(|cv| cv.svs.iter().cloned())
            .collect();

        if !topic_map.is_empty() {
            let start = Instant::now();
            let mut tracker = ExistenceTracker::new(checker, places, &topic_map);
            tracker.perform_existence_check(counters).await;
            counters.timeit("extension_existence_check", start);
            let fetched = chart_vars_fetch(&tracker, existing_svs);
            out.chart_vars.extend(novel_groups(fetched.chart_vars, &mut shown));
        }

        if !more_map.is_empty() {
            let start = Instant::now();
            let mut tracker = ExistenceTracker::new(checker, places, &more_map);
            tracker.perform_existence_check(counters).await;
            counters.timeit("explore_more_existence_check", start);
            let fetched = chart_vars_fetch(&tracker, existing_svs);
            out.chart_vars.extend(novel_groups(fetched.chart_vars, &mut shown));
            out.peer_groups = explore_peer_groups(state, checker, &more_map, counters).await;
        }

        tracing::debug!(
            "Extension added {} groups, {} peer groups",
            out.chart_vars.len(),
            out.peer_groups.len()
        );
        out
    }
}
