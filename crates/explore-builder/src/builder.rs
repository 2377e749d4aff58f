//! Page builder trait and domain routing
//!
//! Provides the [`PageBuilder`] trait for pluggable page layout policies and
//! [`PageAssembler`], which picks one per request.

use crate::config::PresentationConfig;
use crate::main_page::MainPageBuilder;
use crate::sdg_page::SdgPageBuilder;
use explore_page::SubjectPageConfig;
use explore_vars::{get_context_string, ChartVars, InsightContext, Params, PopulateState};
use std::collections::BTreeSet;

/// Inputs to a page build
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a> {
    /// Primary chart-variable groups, existence-confirmed
    pub chart_vars: &'a [ChartVars],
    /// Extension groups, existence-confirmed
    pub ext_chart_vars: &'a [ChartVars],
    /// Per-request state
    pub state: &'a PopulateState<'a>,
    /// Requested keys plus every confirmed variable
    ///
    /// The built-in builders lay out only the groups they are given and do
    /// not read this set. It is passed for custom [`PageBuilder`]s that add
    /// their own tiles and need to know which variables are safe to chart.
    pub existing_svs: &'a BTreeSet<String>,
    /// Display policy
    pub config: &'a PresentationConfig,
}

/// Result of a page build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageConfigResponse {
    /// The page
    pub config: SubjectPageConfig,
    /// Variables that made it onto a tile
    pub plotted_orig_vars: BTreeSet<String>,
    /// Source topics of plotted groups, in page order
    pub plotted_topics: Vec<String>,
    /// Advisory shown to the user, empty if none
    pub user_message: String,
}

/// Layout policy for a page domain
///
/// # Contract
/// Every variable referenced by a produced tile must have a spec in the
/// tile's category, and every event key must be present in page metadata.
pub trait PageBuilder: Send + Sync + std::fmt::Debug {
    /// Build a page from confirmed chart variables
    fn build(&self, request: &BuildRequest<'_>) -> PageConfigResponse;

    /// Builder name (for logging)
    fn name(&self) -> &'static str;
}

/// Page domain selected from the insight context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageDomain {
    /// General statistics
    #[default]
    General,
    /// Sustainable development goals
    Sdg,
}

impl PageDomain {
    /// Read the domain from the `dc` context key
    #[must_use]
    pub fn from_context(ctx: &InsightContext) -> Self {
        match get_context_string(ctx, Params::DC) {
            Some(dc) if Params::SDG_DOMAINS.contains(&dc) => Self::Sdg,
            _ => Self::General,
        }
    }

    /// True for the SDG domain
    #[inline]
    #[must_use]
    pub fn is_sdg(self) -> bool {
        self == Self::Sdg
    }
}

/// Routes build requests to the builder for their domain
#[derive(Debug)]
pub struct PageAssembler {
    main: Box<dyn PageBuilder>,
    sdg: Box<dyn PageBuilder>,
}

impl Default for PageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl PageAssembler {
    /// Create assembler with the built-in builders
    #[must_use]
    pub fn new() -> Self {
        Self {
            main: Box::new(MainPageBuilder::new()),
            sdg: Box::new(SdgPageBuilder::new()),
        }
    }

    /// With builder for a domain
    #[must_use]
    pub fn with_builder(mut self, domain: PageDomain, builder: Box<dyn PageBuilder>) -> Self {
        match domain {
            PageDomain::General => self.main = builder,
            PageDomain::Sdg => self.sdg = builder,
        }
        self
    }

    /// Builder used for a domain
    #[inline]
    #[must_use]
    pub fn builder_for(&self, domain: PageDomain) -> &dyn PageBuilder {
        match domain {
            PageDomain::General => self.main.as_ref(),
            PageDomain::Sdg => self.sdg.as_ref(),
        }
    }

    /// Build the page for a domain
    #[must_use]
    pub fn assemble(&self, domain: PageDomain, request: &BuildRequest<'_>) -> PageConfigResponse {
        let builder = self.builder_for(domain);
        let resp = builder.build(request);

        if let Err(e) = resp.config.validate() {
            tracing::error!("Builder {} produced an invalid page: {}", builder.name(), e);
            debug_assert!(false, "page builder contract violated: {e}");
        }
        tracing::debug!(
            "Builder {} produced {} categories, {} blocks",
            builder.name(),
            resp.config.categories.len(),
            resp.config.block_count()
        );
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explore_vars::{Place, Utterance};

    /// Custom builder that reports the confirmed set
    #[derive(Debug)]
    struct ListExisting;

    impl PageBuilder for ListExisting {
        fn build(&self, request: &BuildRequest<'_>) -> PageConfigResponse {
            let svs: Vec<&str> = request.existing_svs.iter().map(String::as_str).collect();
            PageConfigResponse {
                user_message: svs.join(","),
                ..PageConfigResponse::default()
            }
        }

        fn name(&self) -> &'static str {
            "list"
        }
    }

    #[test]
    fn domain_from_context() {
        let general = Utterance::new();
        assert_eq!(PageDomain::from_context(&general.insight_ctx), PageDomain::General);

        for dc in ["sdg", "sdgmini"] {
            let uttr = Utterance::new().with_context(Params::DC, dc);
            assert!(PageDomain::from_context(&uttr.insight_ctx).is_sdg());
        }

        let other = Utterance::new().with_context(Params::DC, "energy");
        assert_eq!(PageDomain::from_context(&other.insight_ctx), PageDomain::General);
    }

    #[test]
    fn routes_by_domain() {
        let assembler = PageAssembler::new().with_builder(PageDomain::Sdg, Box::new(ListExisting));
        assert_eq!(assembler.builder_for(PageDomain::General).name(), "main");
        assert_eq!(assembler.builder_for(PageDomain::Sdg).name(), "list");

        let uttr = Utterance::new().with_place(Place::new("geoId/06", "California", "State"));
        let state = PopulateState::new(&uttr);
        let existing = BTreeSet::from(["a".to_string(), "b".to_string()]);
        let config = PresentationConfig::default();
        let request = BuildRequest {
            chart_vars: &[],
            ext_chart_vars: &[],
            state: &state,
            existing_svs: &existing,
            config: &config,
        };

        assert_eq!(assembler.assemble(PageDomain::Sdg, &request).user_message, "a,b");
        assert_ne!(assembler.assemble(PageDomain::General, &request).user_message, "a,b");
    }
}
