//! Telemetry counters
//!
//! Stages only ever write to a [`Counters`]. Each fulfillment call owns a
//! fresh instance, passes it by `&mut` to every stage, and merges it into the
//! caller's sink exactly once when the call ends.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;

/// Write-only telemetry accumulator
#[derive(Debug, Clone, Default)]
pub struct Counters {
    err: BTreeMap<String, Vec<Value>>,
    info: BTreeMap<String, Vec<Value>>,
    timing_ms: BTreeMap<String, u128>,
}

/// Serializable snapshot of counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterReport {
    /// Error entries by key
    pub err: BTreeMap<String, Vec<Value>>,
    /// Informational entries by key
    pub info: BTreeMap<String, Vec<Value>>,
    /// Accumulated stage timings in milliseconds
    pub timing_ms: BTreeMap<String, u128>,
}

impl Counters {
    /// Create empty counters
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error entry
    pub fn err(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.err.entry(key.into()).or_default().push(value.into());
    }

    /// Record an informational entry
    pub fn info(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.info.entry(key.into()).or_default().push(value.into());
    }

    /// Record time elapsed since `start` under `key`
    pub fn timeit(&mut self, key: impl Into<String>, start: Instant) {
        let key = key.into();
        let elapsed = start.elapsed().as_millis();
        tracing::debug!("{} took {}ms", key, elapsed);
        *self.timing_ms.entry(key).or_default() += elapsed;
    }

    /// Number of error entries recorded under `key`
    #[inline]
    #[must_use]
    pub fn err_count(&self, key: &str) -> usize {
        self.err.get(key).map_or(0, Vec::len)
    }

    /// Number of informational entries recorded under `key`
    #[inline]
    #[must_use]
    pub fn info_count(&self, key: &str) -> usize {
        self.info.get(key).map_or(0, Vec::len)
    }

    /// Whether a timing was recorded under `key`
    #[inline]
    #[must_use]
    pub fn has_timing(&self, key: &str) -> bool {
        self.timing_ms.contains_key(key)
    }

    /// Total number of error entries
    #[inline]
    #[must_use]
    pub fn total_errors(&self) -> usize {
        self.err.values().map(Vec::len).sum()
    }

    /// Fold another accumulator into this one
    pub fn merge(&mut self, other: Counters) {
        for (key, values) in other.err {
            self.err.entry(key).or_default().extend(values);
        }
        for (key, values) in other.info {
            self.info.entry(key).or_default().extend(values);
        }
        for (key, ms) in other.timing_ms {
            *self.timing_ms.entry(key).or_default() += ms;
        }
    }

    /// Snapshot for export, logging a one-line summary
    #[must_use]
    pub fn flush(&self) -> CounterReport {
        tracing::info!(
            errors = self.total_errors(),
            info_keys = self.info.len(),
            timings = self.timing_ms.len(),
            "counters flushed"
        );
        CounterReport {
            err: self.err.clone(),
            info: self.info.clone(),
            timing_ms: self.timing_ms.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut c = Counters::new();
        c.err("failed_NoPlacesToCheck", "");
        c.err("failed_NoPlacesToCheck", "again");
        c.info("topics", serde_json::json!(["dc/topic/Health"]));

        assert_eq!(c.err_count("failed_NoPlacesToCheck"), 2);
        assert_eq!(c.info_count("topics"), 1);
        assert_eq!(c.err_count("missing"), 0);
        assert_eq!(c.total_errors(), 2);
    }

    #[test]
    fn merge_combines_entries_and_timings() {
        let mut a = Counters::new();
        a.err("x", 1);
        a.timeit("stage", Instant::now());

        let mut b = Counters::new();
        b.err("x", 2);
        b.info("y", "z");
        b.timeit("stage", Instant::now());

        a.merge(b);
        assert_eq!(a.err_count("x"), 2);
        assert_eq!(a.info_count("y"), 1);
        assert!(a.has_timing("stage"));
    }

    #[test]
    fn flush_snapshot() {
        let mut c = Counters::new();
        c.err("k", true);
        let report = c.flush();
        assert_eq!(report.err.get("k").map(Vec::len), Some(1));
        assert!(report.info.is_empty());
    }
}
