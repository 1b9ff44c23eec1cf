use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{FlexlmError, Result};

// ── LogDate ───────────────────────────────────────────────────────────────────

/// A calendar day recovered from the log stream.
///
/// Event lines only carry a time of day, so their date is whatever the
/// date tracker knew when the line was read. Before the first start-date or
/// `TIMESTAMP` line that is [`LogDate::Unresolved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogDate {
    /// No date line has been seen yet. Renders as `??/??/????`.
    #[default]
    Unresolved,
    /// A concrete day. Components are kept unpadded, as written by lmgrd.
    Day { year: u16, month: u8, day: u8 },
}

impl LogDate {
    /// Build a date from the `M/D/YYYY` components used in FlexLM logs.
    ///
    /// Returns `None` when a component is not a number that fits its field.
    pub fn from_mdy(month: &str, day: &str, year: &str) -> Option<Self> {
        Some(LogDate::Day {
            year: year.parse().ok()?,
            month: month.parse().ok()?,
            day: day.parse().ok()?,
        })
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, LogDate::Day { .. })
    }
}

impl fmt::Display for LogDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogDate::Unresolved => f.write_str("??/??/????"),
            LogDate::Day { year, month, day } => write!(f, "{}/{}/{}", year, month, day),
        }
    }
}

impl Serialize for LogDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── LicenseState ──────────────────────────────────────────────────────────────

/// Direction of a license event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LicenseState {
    /// `OUT:` – a seat was taken.
    CheckOut,
    /// `IN:` – a seat was released.
    CheckIn,
}

impl FromStr for LicenseState {
    type Err = FlexlmError;

    /// Case-insensitive construction from the keyword preceding the colon.
    ///
    /// Accepts `"out"` and `"in"`; any other keyword (`DENIED`, `QUEUED`, …)
    /// yields [`FlexlmError::UnknownState`].
    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "out" => Ok(LicenseState::CheckOut),
            "in" => Ok(LicenseState::CheckIn),
            _ => Err(FlexlmError::UnknownState(value.to_string())),
        }
    }
}

impl LicenseState {
    /// Concurrency after applying this state to `users`.
    ///
    /// A checkin never takes the count below zero.
    pub fn apply(self, users: u32) -> u32 {
        match self {
            LicenseState::CheckOut => users + 1,
            LicenseState::CheckIn => users.saturating_sub(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseState::CheckOut => "OUT",
            LicenseState::CheckIn => "IN",
        }
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// One checkout or checkin line recovered from a license server log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Day the event happened on, as tracked from surrounding date lines.
    pub date: LogDate,
    /// Time of day exactly as written (`H:MM:SS`).
    pub time: String,
    pub state: LicenseState,
    /// License feature name (the quoted token).
    pub feature: String,
    pub user: String,
    pub machine: String,
}

impl Event {
    /// Seat identity used to collapse duplicate checkouts.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            feature: self.feature.clone(),
            user: self.user.clone(),
            machine: self.machine.clone(),
        }
    }
}

/// Composite `(feature, user, machine)` seat key.
///
/// Kept as separate fields so that names containing `:` or `@` cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub feature: String,
    pub user: String,
    pub machine: String,
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.feature, self.user, self.machine)
    }
}

// ── FeatureStats ──────────────────────────────────────────────────────────────

/// Running usage statistics for a single license feature.
///
/// `current_users` is unsigned and only ever changed through
/// [`LicenseState::apply`], so it cannot go negative. `total_use` only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureStats {
    /// Peak concurrent seats.
    pub max_users: u32,
    /// Lowest concurrency observed; `None` until the first event.
    pub min_users: Option<u32>,
    /// Day on which `max_users` was first reached.
    pub max_day: Option<LogDate>,
    pub current_users: u32,
    /// Accepted checkouts.
    pub total_use: u32,
    /// Distinct days with at least one accepted checkout.
    pub days_used: u32,
    /// Date of the last checkout that counted towards `days_used`.
    pub last_seen_date: Option<LogDate>,
}

impl FeatureStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one deduplicated event into the accumulator.
    pub fn record(&mut self, event: &Event) {
        if event.state == LicenseState::CheckOut && self.last_seen_date != Some(event.date) {
            self.days_used += 1;
            self.last_seen_date = Some(event.date);
        }

        self.current_users = event.state.apply(self.current_users);
        if event.state == LicenseState::CheckOut {
            self.total_use += 1;
        }

        if self.current_users > 0 && self.current_users > self.max_users {
            self.max_users = self.current_users;
            self.max_day = Some(event.date);
        }

        if self.min_users.map_or(true, |min| self.current_users < min) {
            self.min_users = Some(self.current_users);
        }
    }

    /// Minimum as reported: 0 when the feature never had a seat in use.
    pub fn reported_min(&self) -> u32 {
        if self.max_users == 0 {
            0
        } else {
            self.min_users.unwrap_or(0)
        }
    }

    /// Integer average of checkouts per active day.
    pub fn average_use(&self) -> Option<u32> {
        (self.days_used > 0).then(|| self.total_use / self.days_used)
    }

    /// Freeze the accumulator into a reportable record.
    pub fn summarize(&self, feature: &str, days_seen: u32) -> FeatureSummary {
        FeatureSummary {
            feature: feature.to_string(),
            max_users: self.max_users,
            min_users: self.reported_min(),
            max_day: self.max_day,
            total_use: self.total_use,
            days_used: self.days_used,
            days_seen,
            average_use: self.average_use(),
        }
    }
}

/// Final per-feature statistics, ready to print or serialise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSummary {
    pub feature: String,
    pub max_users: u32,
    pub min_users: u32,
    pub max_day: Option<LogDate>,
    pub total_use: u32,
    pub days_used: u32,
    /// Distinct days seen across the whole log set, not just this feature.
    pub days_seen: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_use: Option<u32>,
}

// ── Time series ───────────────────────────────────────────────────────────────

/// Concurrency snapshot taken after one accepted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeriesEntry {
    pub date: LogDate,
    pub time: String,
    pub users: u32,
}

/// Chronological concurrency samples for one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSeries {
    pub feature: String,
    pub entries: Vec<TimeSeriesEntry>,
}

impl FeatureSeries {
    pub fn new(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            entries: Vec::new(),
        }
    }

    /// Append the snapshot following `event`.
    ///
    /// The first sample starts from zero, so a leading checkin yields 0.
    pub fn push_event(&mut self, event: &Event) {
        let previous = self.entries.last().map_or(0, |e| e.users);
        self.entries.push(TimeSeriesEntry {
            date: event.date,
            time: event.time.clone(),
            users: event.state.apply(previous),
        });
    }

    /// Concurrency after the last sample, 0 when empty.
    pub fn final_users(&self) -> u32 {
        self.entries.last().map_or(0, |e| e.users)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
