//! Insight context: caller-supplied flags
//!
//! The context is a loosely typed map because it crosses the boundary with the
//! classification layer. Stages read it only through the typed getters below,
//! keyed by [`Params`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Insight context (free-form caller flags)
pub type InsightContext = HashMap<String, ContextValue>;

/// Context value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// String value
    String(String),
    /// List of values
    List(Vec<ContextValue>),
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Vec<String>> for ContextValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values.into_iter().map(ContextValue::String).collect())
    }
}

/// Well-known context keys
pub struct Params;

impl Params {
    /// Analytical domain the query belongs to
    pub const DC: &'static str = "dc";
    /// Variable groups that force topic extension
    pub const EXT_SVGS: &'static str = "extensionGroups";
    /// Disables the explore-more expansion path
    pub const EXP_MORE_DISABLED: &'static str = "disableExploreMore";
    /// Disables both extension paths
    pub const EXTENSION_DISABLED: &'static str = "disableExtension";

    /// Domain names routed to the SDG page builder
    pub const SDG_DOMAINS: [&'static str; 2] = ["sdg", "sdgmini"];
}

/// Get string value from context
#[inline]
#[must_use]
pub fn get_context_string<'a>(ctx: &'a InsightContext, key: &str) -> Option<&'a str> {
    ctx.get(key).and_then(|v| match v {
        ContextValue::String(s) => Some(s.as_str()),
        _ => None,
    })
}

/// Get bool value from context
///
/// Integers are accepted as truthy when non-zero.
#[inline]
#[must_use]
pub fn get_context_bool(ctx: &InsightContext, key: &str) -> bool {
    match ctx.get(key) {
        Some(ContextValue::Bool(b)) => *b,
        Some(ContextValue::Int(i)) => *i != 0,
        _ => false,
    }
}

/// Get list of strings from context
///
/// A single string is treated as a one-element list; non-string entries are skipped.
#[must_use]
pub fn get_context_list(ctx: &InsightContext, key: &str) -> Vec<String> {
    match ctx.get(key) {
        Some(ContextValue::List(items)) => items
            .iter()
            .filter_map(|v| match v {
                ContextValue::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        Some(ContextValue::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}
