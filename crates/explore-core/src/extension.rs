//! Extension: enriching sparse results with sibling variables
//!
//! Topic extension asks for siblings of the touched topics, excluding what was
//! already confirmed. Explore-more asks for peers of variables that ended up
//! alone in their group. Both results go through their own existence pass
//! before they reach the page.

use crate::config::ExtensionThreshold;
use explore_oracle::{OracleError, SiblingRequest, SiblingSuggester};
use explore_vars::{get_context_bool, get_context_list, ChartVars, ChartVarsMap, Params, Utterance};
use std::collections::BTreeSet;

/// True if the primary pass is below the sufficiency threshold
#[inline]
#[must_use]
pub fn needs_extension(num_charts: usize, num_svs: usize, threshold: &ExtensionThreshold) -> bool {
    num_charts < threshold.min_charts || num_svs < threshold.min_vars
}

/// Which extension paths run for a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionPlan {
    /// Run topic extension
    pub extend_topics: bool,
    /// Run explore-more
    pub explore_more: bool,
    /// Caller-supplied groups forcing topic extension
    pub override_groups: Vec<String>,
}

impl ExtensionPlan {
    /// Decide from the context flags and primary-pass size
    ///
    /// `disableExtension` turns off both paths, `disableExploreMore` only the
    /// second. Override groups force topic extension when topics were touched.
    #[must_use]
    pub fn for_request(
        uttr: &Utterance,
        topics: &[String],
        num_charts: usize,
        num_svs: usize,
        threshold: &ExtensionThreshold,
    ) -> Self {
        let ctx = &uttr.insight_ctx;
        if get_context_bool(ctx, Params::EXTENSION_DISABLED) {
            return Self::default();
        }
        let override_groups = get_context_list(ctx, Params::EXT_SVGS);
        let extend_topics = !topics.is_empty()
            && (!override_groups.is_empty() || needs_extension(num_charts, num_svs, threshold));

        Self {
            extend_topics,
            explore_more: !get_context_bool(ctx, Params::EXP_MORE_DISABLED),
            override_groups,
        }
    }
}

/// Sibling groups for touched topics
///
/// # Errors
/// Returns the suggester error unchanged
pub async fn extend_topics(
    suggester: &dyn SiblingSuggester,
    topics: &[String],
    existing_svs: &BTreeSet<String>,
    override_groups: &[String],
) -> Result<ChartVarsMap, OracleError> {
    let request = SiblingRequest::topics(topics.to_vec(), existing_svs.clone())
        .with_override_groups(override_groups.to_vec());
    tracing::debug!(
        "Extending {} topics ({} override groups)",
        topics.len(),
        override_groups.len()
    );
    suggester.suggest_siblings(&request).await
}

/// Peer groups for explore-more candidates; no call when there are none
///
/// # Errors
/// Returns the suggester error unchanged
pub async fn explore_more(
    suggester: &dyn SiblingSuggester,
    candidates: &BTreeSet<String>,
) -> Result<ChartVarsMap, OracleError> {
    if candidates.is_empty() {
        return Ok(ChartVarsMap::new());
    }
    let request = SiblingRequest::variables(candidates.iter().cloned().collect());
    suggester.suggest_siblings(&request).await
}

/// Keep groups that add at least one variable not in `shown`
pub fn novel_groups(groups: Vec<ChartVars>, shown: &mut BTreeSet<String>) -> Vec<ChartVars> {
    groups
        .into_iter()
        .filter(|cv| {
            let novel = cv.svs.iter().any(|sv| !shown.contains(sv));
            if novel {
                shown.extend(cv.svs.iter().cloned());
            }
            novel
        })
        .collect()
}
