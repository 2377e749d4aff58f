//! Per-request working record

use crate::chart_vars::ChartVarsMap;
use crate::place::PlaceType;
use crate::utterance::Utterance;

/// Working record for one fulfillment call
///
/// Created once per call and owned by the pipeline; stages that add to it take
/// `&mut PopulateState`, the rest borrow it shared. The utterance itself stays
/// owned by the caller.
#[derive(Debug, Clone)]
pub struct PopulateState<'a> {
    /// The query being fulfilled
    pub uttr: &'a Utterance,
    /// Contained-in place type, if the query asks about child places
    pub place_type: Option<PlaceType>,
    /// Requested key → chart-variable groups
    pub chart_vars_map: ChartVarsMap,
}

impl<'a> PopulateState<'a> {
    /// Create state for an utterance, inferring the contained-in place type
    #[inline]
    #[must_use]
    pub fn new(uttr: &'a Utterance) -> Self {
        Self {
            uttr,
            place_type: uttr.contained_in_type(),
            chart_vars_map: ChartVarsMap::new(),
        }
    }

    /// Identifier of the primary place, if any
    #[inline]
    #[must_use]
    pub fn primary_place_dcid(&self) -> Option<&str> {
        self.uttr.primary_place().map(|p| p.dcid.as_str())
    }
}
