//! Seat-level deduplication of checkout/checkin events.
//!
//! lmgrd may log a second `OUT` for a seat that is already held by the same
//! user on the same machine, and may log an `IN` for a seat it never reported
//! as checked out (for example when the log starts mid-session). Both are
//! dropped so that concurrency counts stay consistent.

use std::collections::HashSet;

use flexlm_core::models::{DedupKey, Event, LicenseState};
use tracing::{debug, trace};

/// Counters describing what the filter did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupSummary {
    pub accepted: usize,
    /// `OUT` for a seat that was already open.
    pub duplicate_checkouts: usize,
    /// `IN` for a seat that was not open.
    pub orphan_checkins: usize,
}

/// Set of currently open seats.
///
/// Create one per pass; the open set is the only state.
#[derive(Debug, Default)]
pub struct Deduplicator {
    open: HashSet<DedupKey>,
    summary: DedupSummary,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `event` should be kept, updating the open set.
    pub fn accept(&mut self, event: &Event) -> bool {
        let key = event.dedup_key();
        let keep = match event.state {
            LicenseState::CheckOut => {
                if self.open.contains(&key) {
                    trace!(seat = %key, "duplicate checkout dropped");
                    self.summary.duplicate_checkouts += 1;
                    false
                } else {
                    self.open.insert(key);
                    true
                }
            }
            LicenseState::CheckIn => {
                if self.open.remove(&key) {
                    true
                } else {
                    trace!(seat = %key, "orphan checkin dropped");
                    self.summary.orphan_checkins += 1;
                    false
                }
            }
        };
        if keep {
            self.summary.accepted += 1;
        }
        keep
    }

    /// Number of seats still checked out.
    pub fn open_seats(&self) -> usize {
        self.open.len()
    }

    pub fn summary(&self) -> DedupSummary {
        self.summary
    }
}

/// Filter `events` once into the sequence both aggregation passes consume.
pub fn dedup_events(events: &[Event]) -> (Vec<Event>, DedupSummary) {
    let mut dedup = Deduplicator::new();
    let kept: Vec<Event> = events
        .iter()
        .filter(|e| dedup.accept(e))
        .cloned()
        .collect();

    let summary = dedup.summary();
    debug!(
        accepted = summary.accepted,
        duplicate_checkouts = summary.duplicate_checkouts,
        orphan_checkins = summary.orphan_checkins,
        open_seats = dedup.open_seats(),
        "events deduplicated"
    );
    (kept, summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use flexlm_core::models::LogDate;

    fn ev(state: LicenseState, feature: &str, user: &str, machine: &str) -> Event {
        Event {
            date: LogDate::Unresolved,
            time: "10:00:00".to_string(),
            state,
            feature: feature.to_string(),
            user: user.to_string(),
            machine: machine.to_string(),
        }
    }

    use LicenseState::{CheckIn, CheckOut};

    #[test]
    fn test_duplicate_checkout_dropped() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.accept(&ev(CheckOut, "F", "alice", "host1")));
        assert!(!dedup.accept(&ev(CheckOut, "F", "alice", "host1")));
        assert_eq!(dedup.summary().duplicate_checkouts, 1);
        assert_eq!(dedup.open_seats(), 1);
    }

    #[test]
    fn test_matching_checkin_accepted() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.accept(&ev(CheckOut, "F", "alice", "host1")));
        assert!(dedup.accept(&ev(CheckIn, "F", "alice", "host1")));
        assert_eq!(dedup.open_seats(), 0);
    }

    #[test]
    fn test_orphan_checkin_dropped() {
        let mut dedup = Deduplicator::new();
        assert!(!dedup.accept(&ev(CheckIn, "F", "alice", "host1")));
        assert_eq!(dedup.summary().orphan_checkins, 1);
        assert_eq!(dedup.summary().accepted, 0);
    }

    #[test]
    fn test_second_checkin_after_close_dropped() {
        let mut dedup = Deduplicator::new();
        dedup.accept(&ev(CheckOut, "F", "alice", "host1"));
        dedup.accept(&ev(CheckIn, "F", "alice", "host1"));
        assert!(!dedup.accept(&ev(CheckIn, "F", "alice", "host1")));
    }

    #[test]
    fn test_key_distinguishes_feature_user_machine() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.accept(&ev(CheckOut, "F", "alice", "host1")));
        assert!(dedup.accept(&ev(CheckOut, "G", "alice", "host1")));
        assert!(dedup.accept(&ev(CheckOut, "F", "bob", "host1")));
        assert!(dedup.accept(&ev(CheckOut, "F", "alice", "host2")));
        assert_eq!(dedup.open_seats(), 4);
    }

    #[test]
    fn test_checkin_for_other_machine_is_orphan() {
        let mut dedup = Deduplicator::new();
        dedup.accept(&ev(CheckOut, "F", "alice", "host1"));
        assert!(!dedup.accept(&ev(CheckIn, "F", "alice", "host2")));
    }

    #[test]
    fn test_reopen_after_checkin() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.accept(&ev(CheckOut, "F", "alice", "host1")));
        assert!(dedup.accept(&ev(CheckIn, "F", "alice", "host1")));
        assert!(dedup.accept(&ev(CheckOut, "F", "alice", "host1")));
    }

    #[test]
    fn test_dedup_events_is_deterministic() {
        let events = vec![
            ev(CheckOut, "F", "alice", "host1"),
            ev(CheckOut, "F", "alice", "host1"),
            ev(CheckIn, "F", "bob", "host1"),
            ev(CheckIn, "F", "alice", "host1"),
        ];
        let (first, summary) = dedup_events(&events);
        let (second, _) = dedup_events(&events);

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.duplicate_checkouts, 1);
        assert_eq!(summary.orphan_checkins, 1);
    }
}
