//! Tests for version history numbering and ordering.

use super::*;
use chrono::{Duration, TimeZone};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 13, 10, 0, 0).unwrap()
}

#[test]
fn test_first_append_is_version_one() {
    let mut history = VersionHistory::new();
    let v = history.append("Write a story.", "Initial version", t0());

    assert_eq!(v.version_number, 1);
    assert_eq!(v.id, "v1");
    assert_eq!(v.notes, "Initial version");
    assert_eq!(history.len(), 1);
    assert_eq!(history.head(), Some(&v));
}

#[test]
fn test_list_is_newest_first() {
    let mut history = VersionHistory::new();
    for (i, notes) in ["v1", "v2", "v3"].iter().enumerate() {
        history.append(format!("content {}", i), *notes, t0() + Duration::hours(i as i64));
    }

    let numbers: Vec<u32> = history.list().iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, vec![3, 2, 1]);

    let notes: Vec<String> = history.list().into_iter().map(|v| v.notes).collect();
    assert_eq!(notes, vec!["v3", "v2", "v1"]);
}

#[test]
fn test_numbers_are_contiguous_for_any_append_count() {
    for n in 0..25u32 {
        let mut history = VersionHistory::new();
        for i in 0..n {
            let v = history.append(format!("c{}", i), "", t0());
            assert_eq!(v.version_number, i + 1);
        }

        let listed: Vec<u32> = history.list().iter().map(|v| v.version_number).collect();
        assert_eq!(listed, (1..=n).rev().collect::<Vec<_>>());
    }
}

#[test]
fn test_append_never_mutates_earlier_versions() {
    let mut history = VersionHistory::new();
    let first = history.append("original", "first", t0());
    history.append("changed", "second", t0() + Duration::minutes(5));

    assert_eq!(history.get(1).unwrap(), &first);
    assert_eq!(history.get(2).unwrap().content, "changed");
}

#[test]
fn test_list_returns_copies() {
    let mut history = VersionHistory::new();
    history.append("original", "", t0());

    let mut listed = history.list();
    listed[0].content = "tampered".to_string();

    assert_eq!(history.get(1).unwrap().content, "original");
}

#[test]
fn test_clock_skew_keeps_timestamps_non_decreasing() {
    let mut history = VersionHistory::new();
    history.append("a", "", t0());
    let skewed = history.append("b", "", t0() - Duration::hours(1));

    assert_eq!(skewed.created_at, t0());
    assert!(history.get(2).unwrap().created_at >= history.get(1).unwrap().created_at);
}

#[test]
fn test_get_missing_version() {
    let mut history = VersionHistory::new();
    history.append("a", "", t0());

    assert_eq!(history.get(0), Err(HistoryError::NotFound { version: 0 }));
    assert_eq!(history.get(2), Err(HistoryError::NotFound { version: 2 }));
    assert!(VersionHistory::new().get(1).is_err());
}

#[test]
fn test_get_by_id() {
    let mut history = VersionHistory::new();
    history.append("a", "", t0());
    history.append("b", "", t0());

    assert_eq!(history.get_by_id("v2").unwrap().content, "b");
    assert_eq!(history.get_by_id("V1").unwrap().content, "a");
    assert!(history.get_by_id("v3").is_none());
    assert!(history.get_by_id("two").is_none());
}

#[test]
fn test_parse_version_ref() {
    assert_eq!(parse_version_ref("v12"), Some(12));
    assert_eq!(parse_version_ref("7"), Some(7));
    assert_eq!(parse_version_ref("v0"), None);
    assert_eq!(parse_version_ref("vx"), None);
    assert_eq!(parse_version_ref(""), None);
}

#[test]
fn test_from_versions_accepts_valid_records() {
    let mut source = VersionHistory::new();
    source.append("a", "one", t0());
    source.append("b", "two", t0() + Duration::days(1));

    let records: Vec<PromptVersion> = source.list().into_iter().rev().collect();
    let rebuilt = VersionHistory::from_versions(records).unwrap();
    assert_eq!(rebuilt, source);
}

#[test]
fn test_from_versions_rejects_gaps() {
    let mut source = VersionHistory::new();
    source.append("a", "", t0());
    source.append("b", "", t0());
    source.append("c", "", t0());

    let mut records: Vec<PromptVersion> = source.list().into_iter().rev().collect();
    records.remove(1);

    let err = VersionHistory::from_versions(records).unwrap_err();
    assert!(matches!(err, HistoryError::Corrupt(_)));
}

#[test]
fn test_from_versions_rejects_time_travel() {
    let mut source = VersionHistory::new();
    source.append("a", "", t0());
    source.append("b", "", t0() + Duration::hours(1));

    let mut records: Vec<PromptVersion> = source.list().into_iter().rev().collect();
    records[1].created_at = t0() - Duration::hours(1);

    assert!(VersionHistory::from_versions(records).is_err());
}

#[test]
fn test_from_versions_rejects_mismatched_id() {
    let mut source = VersionHistory::new();
    source.append("a", "", t0());

    let mut records: Vec<PromptVersion> = source.list().into_iter().rev().collect();
    records[0].id = "first".to_string();

    assert!(VersionHistory::from_versions(records).is_err());
}

#[test]
fn test_version_serializes_with_snake_case_fields() {
    let mut history = VersionHistory::new();
    let v = history.append("Hello [name]", "", t0());

    let json = serde_json::to_string(&v).unwrap();
    assert!(json.contains("\"version_number\":1"));
    assert!(json.contains("\"created_at\":\"2026-01-13T10:00:00Z\""));

    let back: PromptVersion = serde_json::from_str(&json).unwrap();
    assert_eq!(back, v);
}
