use std::fmt::Write as _;

use crate::error::Result;
use crate::models::{FeatureSeries, FeatureSummary, TimeSeriesEntry};

/// Render one feature's statistics block, including the trailing blank line.
///
/// # Examples
///
/// ```
/// use flexlm_core::formatting::format_feature_stats;
/// use flexlm_core::models::{FeatureSummary, LogDate};
///
/// let summary = FeatureSummary {
///     feature: "Origin7".to_string(),
///     max_users: 2,
///     min_users: 0,
///     max_day: LogDate::from_mdy("7", "30", "2012"),
///     total_use: 5,
///     days_used: 2,
///     days_seen: 3,
///     average_use: Some(2),
/// };
/// let text = format_feature_stats(&summary);
/// assert!(text.starts_with("Module Origin7 :\n"));
/// assert!(text.contains("  max : 2 (2012/7/30)\n"));
/// assert!(text.contains(" Number of days used : 2 / 3\n"));
/// ```
pub fn format_feature_stats(summary: &FeatureSummary) -> String {
    let max_day = summary
        .max_day
        .map(|d| d.to_string())
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "Module {} :", summary.feature);
    let _ = writeln!(out, " Number of users per day :");
    let _ = writeln!(out, "  max : {} ({})", summary.max_users, max_day);
    let _ = writeln!(out, "  min : {}", summary.min_users);
    let _ = writeln!(out, " Total number of use : {}", summary.total_use);
    let _ = writeln!(
        out,
        " Number of days used : {} / {}",
        summary.days_used, summary.days_seen
    );
    if let Some(average) = summary.average_use {
        let _ = writeln!(out, " Average use per day : {}", average);
    }
    out.push('\n');
    out
}

/// Render the stats of every feature, in the order given.
pub fn format_stats_report(summaries: &[FeatureSummary]) -> String {
    summaries.iter().map(format_feature_stats).collect()
}

/// Render the stats as a pretty-printed JSON array.
pub fn format_stats_json(summaries: &[FeatureSummary]) -> Result<String> {
    Ok(serde_json::to_string_pretty(summaries)?)
}

/// One row of a gnuplot data table: `<date> <time> <users>`.
///
/// # Examples
///
/// ```
/// use flexlm_core::formatting::format_data_line;
/// use flexlm_core::models::{LogDate, TimeSeriesEntry};
///
/// let entry = TimeSeriesEntry {
///     date: LogDate::from_mdy("1", "23", "2012").unwrap(),
///     time: "20:52:29".to_string(),
///     users: 3,
/// };
/// assert_eq!(format_data_line(&entry), "2012/1/23 20:52:29 3\n");
/// ```
pub fn format_data_line(entry: &TimeSeriesEntry) -> String {
    format!("{} {} {}\n", entry.date, entry.time, entry.users)
}

/// The full data table for one feature, oldest sample first.
pub fn format_data_table(series: &FeatureSeries) -> String {
    series.entries.iter().map(format_data_line).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
