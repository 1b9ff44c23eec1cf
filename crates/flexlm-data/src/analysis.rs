//! Main analysis pipeline.
//!
//! Turns raw log lines into the deduplicated event stream and exposes the
//! two aggregation passes (stats and time series) over it.

use std::path::PathBuf;

use flexlm_core::error::Result;
use flexlm_core::models::{Event, FeatureSeries, FeatureSummary};
use tracing::{debug, info, trace};

use crate::aggregator::StatsAggregator;
use crate::date_tracker::DateTracker;
use crate::dedup::{dedup_events, DedupSummary};
use crate::parser::{LineMatch, LineParser};
use crate::reader::{expand_inputs, read_all};
use crate::timeseries::TimeSeriesBuilder;

// ── Public types ──────────────────────────────────────────────────────────────

/// Line-level counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    pub lines_read: usize,
    /// Checkout and checkin lines.
    pub events: usize,
    /// Lines that matched no pattern.
    pub ignored_lines: usize,
    /// Event-shaped lines with a keyword other than `OUT`/`IN`.
    pub other_states: usize,
    /// Events read before any date line.
    pub unresolved_events: usize,
    /// Date lines whose date could not be used; the tracked date is kept.
    pub invalid_dates: usize,
}

/// Everything recovered from the raw logs, before deduplication.
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    /// Events in file order, then line order.
    pub events: Vec<Event>,
    /// Distinct days announced by `TIMESTAMP` lines.
    pub days_seen: u32,
    pub summary: ParseSummary,
}

/// Deduplicated events ready for aggregation.
#[derive(Debug, Clone)]
pub struct Analysis {
    events: Vec<Event>,
    days_seen: u32,
    dedup: DedupSummary,
}

// ── LogParser ─────────────────────────────────────────────────────────────────

/// Streaming combination of the line grammar and the date tracker.
///
/// Feed it every line of every file in order; file boundaries do not reset
/// the tracked date.
#[derive(Default)]
pub struct LogParser {
    lines: LineParser,
    dates: DateTracker,
    events: Vec<Event>,
    summary: ParseSummary,
}

impl LogParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) {
        self.summary.lines_read += 1;

        match self.lines.parse(line, self.dates.needs_bootstrap()) {
            LineMatch::StartDate(date) => self.dates.bootstrap(date),
            LineMatch::Event(event_line) => {
                let date = self.dates.current_date();
                if !date.is_resolved() {
                    self.summary.unresolved_events += 1;
                }
                self.summary.events += 1;
                self.events.push(event_line.into_event(date));
            }
            LineMatch::OtherState(keyword) => {
                trace!(keyword = %keyword, "non checkout state skipped");
                self.summary.other_states += 1;
            }
            LineMatch::Timestamp(date) => {
                self.dates.observe_timestamp(date);
            }
            LineMatch::InvalidDate(text) => {
                debug!(date = %text, current = %self.dates.current_date(), "date line skipped");
                self.summary.invalid_dates += 1;
            }
            LineMatch::Ignored => self.summary.ignored_lines += 1,
        }
    }

    pub fn finish(self) -> ParsedLog {
        debug!(
            lines = self.summary.lines_read,
            events = self.summary.events,
            ignored = self.summary.ignored_lines,
            other_states = self.summary.other_states,
            invalid_dates = self.summary.invalid_dates,
            days_seen = self.dates.days_seen(),
            "log lines parsed"
        );
        ParsedLog {
            events: self.events,
            days_seen: self.dates.days_seen(),
            summary: self.summary,
        }
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Parse line batches (one per file) in the order given.
pub fn parse_logs(batches: &[Vec<String>]) -> ParsedLog {
    let mut parser = LogParser::new();
    for line in batches.iter().flatten() {
        parser.feed(line);
    }
    parser.finish()
}

/// Expand, read and parse the input paths.
///
/// Any unreadable file fails the whole run.
pub fn load_logs(paths: &[PathBuf]) -> Result<ParsedLog> {
    let files = expand_inputs(paths)?;
    info!("Reading {} log file(s)", files.len());
    let batches = read_all(&files)?;
    Ok(parse_logs(&batches))
}

/// Deduplicate the parsed events.
///
/// Returns `None` when at most one event was parsed: there is nothing
/// meaningful to report in that case.
pub fn analyze(parsed: &ParsedLog) -> Option<Analysis> {
    if parsed.events.len() <= 1 {
        info!(
            "Only {} event(s) found; nothing to report",
            parsed.events.len()
        );
        return None;
    }

    let (events, dedup) = dedup_events(&parsed.events);
    Some(Analysis {
        events,
        days_seen: parsed.days_seen,
        dedup,
    })
}

impl Analysis {
    /// Per-feature statistics, in first-seen order.
    pub fn stats(&self) -> Vec<FeatureSummary> {
        StatsAggregator::aggregate(&self.events, self.days_seen)
    }

    /// Per-feature concurrency series, in first-seen order.
    pub fn time_series(&self) -> Vec<FeatureSeries> {
        TimeSeriesBuilder::build(&self.events)
    }

    /// The deduplicated events both passes consume.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn days_seen(&self) -> u32 {
        self.days_seen
    }

    /// Whether any `TIMESTAMP` day was seen; plots need at least one.
    pub fn has_active_days(&self) -> bool {
        self.days_seen > 0
    }

    pub fn dedup_summary(&self) -> DedupSummary {
        self.dedup
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
