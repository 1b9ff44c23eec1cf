//! End-to-end runs over small lmgrd logs written to disk.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use flexlm_data::analysis::{analyze, load_logs};
use tempfile::TempDir;

const START: &str =
    " 8:21:20 (lmgrd) FLEXnet Licensing (v10.8.0 build 18869) started on MACHINE (IBM PC) (7/30/2012)";

fn write_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

fn write_gz_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::fast());
    for line in lines {
        writeln!(encoder, "{}", line).unwrap();
    }
    encoder.finish().unwrap();
    path
}

// ── Single checkout / checkin ─────────────────────────────────────────────────

#[test]
fn test_checkout_then_checkin() {
    let dir = TempDir::new().unwrap();
    let log = write_log(
        dir.path(),
        "lmgrd.log",
        &[
            START,
            r#"11:50:22 (orglab) OUT: "FeatureA" alice@host1"#,
            r#"12:00:00 (orglab) IN: "FeatureA" alice@host1"#,
        ],
    );

    let parsed = load_logs(&[log]).unwrap();
    let analysis = analyze(&parsed).unwrap();
    let stats = analysis.stats();

    assert_eq!(stats.len(), 1);
    let a = &stats[0];
    assert_eq!(a.feature, "FeatureA");
    assert_eq!(a.max_users, 1);
    assert_eq!(a.min_users, 0);
    assert_eq!(a.total_use, 1);
    assert_eq!(a.days_used, 1);
    assert_eq!(a.max_day.unwrap().to_string(), "2012/7/30");
}

// ── Duplicate checkout ────────────────────────────────────────────────────────

#[test]
fn test_duplicate_checkout_counted_once() {
    let dir = TempDir::new().unwrap();
    let log = write_log(
        dir.path(),
        "lmgrd.log",
        &[
            START,
            r#"11:50:22 (orglab) OUT: "FeatureA" alice@host1"#,
            r#"11:50:23 (orglab) OUT: "FeatureA" alice@host1"#,
        ],
    );

    let analysis = analyze(&load_logs(&[log]).unwrap()).unwrap();
    let stats = analysis.stats();
    assert_eq!(stats[0].total_use, 1);
    assert_eq!(stats[0].max_users, 1);

    let series = analysis.time_series();
    assert_eq!(series[0].entries.len(), 1);
    assert_eq!(series[0].final_users(), 1);
}

// ── Orphan checkin ────────────────────────────────────────────────────────────

#[test]
fn test_orphan_checkin_dropped() {
    let dir = TempDir::new().unwrap();
    let log = write_log(
        dir.path(),
        "lmgrd.log",
        &[
            START,
            r#" 9:00:00 (orglab) IN: "FeatureB" bob@host2"#,
            r#" 9:10:00 (orglab) OUT: "FeatureA" alice@host1"#,
        ],
    );

    let analysis = analyze(&load_logs(&[log]).unwrap()).unwrap();
    assert_eq!(analysis.dedup_summary().orphan_checkins, 1);

    let stats = analysis.stats();
    assert!(stats.iter().all(|s| s.feature != "FeatureB"));
    assert!(analysis
        .time_series()
        .iter()
        .flat_map(|s| s.entries.iter())
        .all(|e| e.users <= 1));
}

// ── Two features over two days, split over plain and gzip files ───────────────

#[test]
fn test_two_features_two_days_across_files() {
    let dir = TempDir::new().unwrap();
    let day1 = write_log(
        dir.path(),
        "day1.log",
        &[
            START,
            "23:59:00 (lmgrd) TIMESTAMP 7/30/2012",
            r#"10:00:00 (v) OUT: "A" alice@h1"#,
            r#"10:05:00 (v) OUT: "B" bob@h2"#,
            r#"11:00:00 (v) IN: "A" alice@h1"#,
        ],
    );
    let day2 = write_gz_log(
        dir.path(),
        "day2.log.gz",
        &[
            "0:00:01 (lmgrd) TIMESTAMP 7/31/2012",
            r#"09:00:00 (v) IN: "B" bob@h2"#,
            r#"09:30:00 (v) OUT: "A" carol@h3"#,
            r#"09:45:00 (v) OUT: "A" alice@h1"#,
        ],
    );

    let parsed = load_logs(&[day1, day2]).unwrap();
    assert_eq!(parsed.days_seen, 2);

    let analysis = analyze(&parsed).unwrap();
    let stats = analysis.stats();
    let names: Vec<&str> = stats.iter().map(|s| s.feature.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);

    let a = &stats[0];
    assert_eq!(a.days_used, 2);
    assert_eq!(a.total_use, 3);
    assert_eq!(a.max_users, 2);
    assert_eq!(a.max_day.unwrap().to_string(), "2012/7/31");
    assert_eq!(a.days_seen, 2);

    let b = &stats[1];
    assert_eq!(b.days_used, 1);
    assert_eq!(b.total_use, 1);

    let series = analysis.time_series();
    let b_rows: Vec<(String, u32)> = series[1]
        .entries
        .iter()
        .map(|e| (e.date.to_string(), e.users))
        .collect();
    assert_eq!(
        b_rows,
        vec![("2012/7/30".to_string(), 1), ("2012/7/31".to_string(), 0)]
    );
}

// ── Degenerate input ──────────────────────────────────────────────────────────

#[test]
fn test_single_event_across_files_produces_nothing() {
    let dir = TempDir::new().unwrap();
    let first = write_log(dir.path(), "a.log", &[START, "noise line"]);
    let second = write_log(
        dir.path(),
        "b.log",
        &[r#"10:00:00 (v) OUT: "A" alice@h1"#],
    );

    let parsed = load_logs(&[first, second]).unwrap();
    assert_eq!(parsed.events.len(), 1);
    assert!(analyze(&parsed).is_none());
}

#[test]
fn test_empty_logs_produce_nothing() {
    let dir = TempDir::new().unwrap();
    let log = write_log(dir.path(), "empty.log", &[]);
    assert!(analyze(&load_logs(&[log]).unwrap()).is_none());
}

// ── Input handling ────────────────────────────────────────────────────────────

#[test]
fn test_directory_input_is_read_in_path_order() {
    let dir = TempDir::new().unwrap();
    write_log(
        dir.path(),
        "1-start.log",
        &[START, "23:00:00 (lmgrd) TIMESTAMP 8/1/2012"],
    );
    write_log(
        dir.path(),
        "2-events.log",
        &[
            r#"10:00:00 (v) OUT: "A" alice@h1"#,
            r#"10:30:00 (v) IN: "A" alice@h1"#,
        ],
    );

    let parsed = load_logs(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(parsed.events.len(), 2);
    assert!(parsed
        .events
        .iter()
        .all(|e| e.date.to_string() == "2012/8/1"));
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    let good = write_log(dir.path(), "a.log", &[START]);
    assert!(load_logs(&[good, dir.path().join("nope.log")]).is_err());
}
