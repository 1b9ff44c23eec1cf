//! Per-feature usage statistics over a deduplicated event stream.

use std::collections::HashMap;

use flexlm_core::models::{Event, FeatureStats, FeatureSummary};

// ── StatsAggregator ───────────────────────────────────────────────────────────

/// Folds events into one [`FeatureStats`] per feature.
///
/// Features are reported in the order they were first seen.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    order: Vec<String>,
    stats: HashMap<String, FeatureStats>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate `events` and summarise every feature.
    ///
    /// `days_seen` is the run-wide day count, echoed into each summary.
    pub fn aggregate(events: &[Event], days_seen: u32) -> Vec<FeatureSummary> {
        let mut aggregator = Self::new();
        for event in events {
            aggregator.record(event);
        }
        aggregator.summaries(days_seen)
    }

    /// Fold one event, creating the feature's accumulator on first sight.
    pub fn record(&mut self, event: &Event) {
        if !self.stats.contains_key(&event.feature) {
            self.order.push(event.feature.clone());
        }
        self.stats
            .entry(event.feature.clone())
            .or_default()
            .record(event);
    }

    /// Accumulator for `feature`, if any event referenced it.
    pub fn feature(&self, feature: &str) -> Option<&FeatureStats> {
        self.stats.get(feature)
    }

    /// Feature names in first-seen order.
    pub fn features(&self) -> &[String] {
        &self.order
    }

    pub fn summaries(&self, days_seen: u32) -> Vec<FeatureSummary> {
        self.order
            .iter()
            .filter_map(|name| self.stats.get(name).map(|s| s.summarize(name, days_seen)))
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
