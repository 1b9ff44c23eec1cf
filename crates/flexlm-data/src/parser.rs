//! Line grammar for FlexLM (`lmgrd`) debug logs.
//!
//! Three kinds of lines carry information:
//!
//! ```text
//!  8:21:20 (lmgrd) FLEXnet Licensing (v10.8.0 build 18869) started on MACHINE (IBM PC) (7/30/2012)
//! 11:50:22 (orglab) OUT: "Origin7" user@MACHINE-NAME
//! 20:52:29 (lmgrd) TIMESTAMP 1/23/2012
//! ```
//!
//! Everything else is ignored. Matching is line-local; the caller supplies
//! the date context through [`crate::date_tracker::DateTracker`].

use flexlm_core::models::{Event, LicenseState, LogDate};
use regex::{Captures, Regex};
use tracing::debug;

// ── Line matches ──────────────────────────────────────────────────────────────

/// The fields of an event line, before a date is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLine {
    pub time: String,
    pub state: LicenseState,
    pub feature: String,
    pub user: String,
    pub machine: String,
}

impl EventLine {
    /// Stamp the line with the date known at the time it was read.
    pub fn into_event(self, date: LogDate) -> Event {
        Event {
            date,
            time: self.time,
            state: self.state,
            feature: self.feature,
            user: self.user,
            machine: self.machine,
        }
    }
}

/// Outcome of matching one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch {
    /// Server start line carrying the initial date.
    StartDate(LogDate),
    /// A checkout or checkin.
    Event(EventLine),
    /// Event-shaped line whose keyword is not `OUT`/`IN` (`DENIED`, `QUEUED`, …).
    OtherState(String),
    /// Periodic `TIMESTAMP M/D/YYYY` line.
    Timestamp(LogDate),
    /// Start or `TIMESTAMP` line whose date does not fit a calendar day
    /// (for example a five-digit year). Carries the date text as written.
    InvalidDate(String),
    /// Nothing recognisable.
    Ignored,
}

// ── LineParser ────────────────────────────────────────────────────────────────

/// Compiled line patterns. Build once per run and reuse for every line.
pub struct LineParser {
    start_date: Regex,
    event: Regex,
    timestamp: Regex,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    pub fn new() -> Self {
        Self {
            start_date: Regex::new(r"^ ?\d+:\d+:\d+ .+ \((\d+)/(\d+)/(\d+)\)\s*$")
                .expect("regex is valid"),
            event: Regex::new(r#"^ ?(\d+:\d+:\d+) .+ (\w+): "(.+)" (\w+)@(.+)$"#)
                .expect("regex is valid"),
            timestamp: Regex::new(r"^ ?\d+:\d+:\d+ .+ TIMESTAMP (\d+)/(\d+)/(\d+)")
                .expect("regex is valid"),
        }
    }

    /// Match `line` against the grammar.
    ///
    /// The start-date pattern is only tried while `want_start_date` is set,
    /// so that a server restart later in the log does not move the date
    /// backwards. Event lines take precedence over timestamp lines.
    pub fn parse(&self, line: &str, want_start_date: bool) -> LineMatch {
        let line = line.trim_end_matches(['\r', '\n']);

        if want_start_date {
            if let Some(cap) = self.start_date.captures(line) {
                return match date_from(&cap) {
                    Ok(date) => LineMatch::StartDate(date),
                    Err(text) => LineMatch::InvalidDate(text),
                };
            }
        }

        if let Some(cap) = self.event.captures(line) {
            let keyword = &cap[2];
            return match keyword.parse::<LicenseState>() {
                Ok(state) => LineMatch::Event(EventLine {
                    time: cap[1].to_string(),
                    state,
                    feature: cap[3].to_string(),
                    user: cap[4].to_string(),
                    machine: cap[5].trim_end().to_string(),
                }),
                Err(_) => LineMatch::OtherState(keyword.to_string()),
            };
        }

        if let Some(cap) = self.timestamp.captures(line) {
            return match date_from(&cap) {
                Ok(date) => LineMatch::Timestamp(date),
                Err(text) => LineMatch::InvalidDate(text),
            };
        }

        LineMatch::Ignored
    }
}

/// Date from `M`, `D`, `YYYY` capture groups 1 to 3, or the raw text when
/// a component is out of range.
fn date_from(cap: &Captures<'_>) -> Result<LogDate, String> {
    LogDate::from_mdy(&cap[1], &cap[2], &cap[3]).ok_or_else(|| {
        let text = format!("{}/{}/{}", &cap[1], &cap[2], &cap[3]);
        debug!(date = %text, "date out of range");
        text
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
