//! Chronological concurrency samples per feature, for plotting.

use std::collections::HashMap;

use flexlm_core::models::{Event, FeatureSeries};

/// Builds one [`FeatureSeries`] per feature, in first-seen order.
///
/// Samples are appended in input order, so each series is already
/// chronological when the builder finishes.
#[derive(Debug, Default)]
pub struct TimeSeriesBuilder {
    index: HashMap<String, usize>,
    series: Vec<FeatureSeries>,
}

impl TimeSeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(events: &[Event]) -> Vec<FeatureSeries> {
        let mut builder = Self::new();
        for event in events {
            builder.record(event);
        }
        builder.finish()
    }

    pub fn record(&mut self, event: &Event) {
        let slot = match self.index.get(&event.feature) {
            Some(&slot) => slot,
            None => {
                self.series.push(FeatureSeries::new(event.feature.clone()));
                let slot = self.series.len() - 1;
                self.index.insert(event.feature.clone(), slot);
                slot
            }
        };
        self.series[slot].push_event(event);
    }

    pub fn finish(self) -> Vec<FeatureSeries> {
        self.series
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
