//! Current-date bookkeeping across a run.
//!
//! Event lines only carry a time of day. The date they belong to comes from
//! the server start line (once) and from the periodic `TIMESTAMP` lines that
//! lmgrd writes. One tracker spans every file of a run, so a date learnt at
//! the end of one file still applies at the start of the next.

use flexlm_core::models::LogDate;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct DateTracker {
    current: LogDate,
    bootstrapped: bool,
    last_timestamp: Option<LogDate>,
    days_seen: u32,
}

impl DateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Date to stamp on the next event line.
    pub fn current_date(&self) -> LogDate {
        self.current
    }

    /// Distinct days announced by `TIMESTAMP` lines so far.
    pub fn days_seen(&self) -> u32 {
        self.days_seen
    }

    /// Whether the start-date line has not been seen yet.
    pub fn needs_bootstrap(&self) -> bool {
        !self.bootstrapped
    }

    /// Seed the date from the server start line. Only the first call counts.
    pub fn bootstrap(&mut self, date: LogDate) {
        if self.bootstrapped {
            return;
        }
        debug!(date = %date, "start date bootstrapped");
        self.current = date;
        self.bootstrapped = true;
    }

    /// Apply a `TIMESTAMP` line.
    ///
    /// Returns `true` when the date differs from the previous timestamp, in
    /// which case a new day is counted.
    pub fn observe_timestamp(&mut self, date: LogDate) -> bool {
        self.current = date;
        if self.last_timestamp == Some(date) {
            return false;
        }
        debug!(date = %date, "new day");
        self.last_timestamp = Some(date);
        self.days_seen += 1;
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
