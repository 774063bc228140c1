//! Integration tests for the SQLite event store and the report queries run
//! against it.

#[path = "../common/mod.rs"]
mod common;

use common::{at, TestStore};
use notification_analytics::event::NotificationType;
use notification_analytics::report;
use notification_analytics::sql::Query;
use notification_analytics::store::{EventStore, SqliteEventStore, StoreError, Value};

fn now() -> chrono::NaiveDateTime {
    at(2026, 10, 19, 12, 0)
}

fn run_spec(store: &TestStore, name: &str) -> notification_analytics::store::AggregateResult {
    let spec = report::find(name).unwrap();
    store.reader().run(&spec.query(store.reader().dialect(), now())).unwrap()
}

// ============================================================================
// Connection Tests
// ============================================================================

#[test]
fn test_ping_initialized_store() {
    let store = TestStore::new();
    store.reader().ping().unwrap();
}

#[test]
fn test_missing_database_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");

    let err = SqliteEventStore::open(&path).ping().unwrap_err();
    assert!(err.is_connection());
    assert!(!path.exists());
}

#[test]
fn test_store_is_read_only() {
    let store = TestStore::new();
    store.seed_week();

    let err = store
        .reader()
        .run(&Query::new("delete", "DELETE FROM notifications"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Query { .. }));

    let count = store
        .reader()
        .run(&Query::new("count", "SELECT COUNT(*) AS n FROM notifications"))
        .unwrap();
    assert_eq!(count.first().unwrap().count("n").unwrap(), 8);
}

#[test]
fn test_missing_table_is_query_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bare.db");
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE other (x INTEGER);")
        .unwrap();

    let spec = report::find("type distribution").unwrap();
    let reader = SqliteEventStore::open(&path);
    let err = reader.run(&spec.query(reader.dialect(), now())).unwrap_err();
    assert!(matches!(err, StoreError::Query { ref query, .. } if query == "type distribution"));
}

// ============================================================================
// Recent Events
// ============================================================================

#[test]
fn test_recent_events() {
    let store = TestStore::new();
    store.seed_week();

    let events = store.reader().recent(3).unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].title, "erin");
    assert_eq!(events[0].kind, NotificationType::Foreground);
    assert_eq!(events[0].source, "Instagram");
    assert_eq!(events[0].received_at, at(2026, 10, 19, 7, 45));
    assert_eq!(events[1].title, "bob");
    assert_eq!(events[2].title, "dave");
}

#[test]
fn test_recent_on_empty_store() {
    let store = TestStore::new();
    assert!(store.reader().recent(5).unwrap().is_empty());
}

// ============================================================================
// Report Queries
// ============================================================================

#[test]
fn test_type_distribution_counts() {
    let store = TestStore::new();
    store.seed_week();

    let result = run_spec(&store, "type distribution");
    let counts: Vec<(String, u64)> = result
        .rows()
        .map(|r| (r.label("type").unwrap(), r.count("count").unwrap()))
        .collect();
    assert!(counts.contains(&("foreground".to_string(), 5)));
    assert!(counts.contains(&("background".to_string(), 3)));
}

#[test]
fn test_top_actions_order_and_ties() {
    let store = TestStore::new();
    store.seed_week();

    let result = run_spec(&store, "top actions");
    let actions: Vec<String> = result.rows().map(|r| r.label("action").unwrap()).collect();
    assert_eq!(
        actions,
        [
            "alice liked your photo",
            "bob commented: nice shot",
            "carol started following you",
            "dave mentioned you 🎉",
            "erin sent you a message",
        ]
    );
}

#[test]
fn test_day_of_week_numbers_monday_first() {
    let store = TestStore::new();
    store.seed_week();

    let result = run_spec(&store, "day-of-week distribution");
    let days: Vec<(String, i64, u64)> = result
        .rows()
        .map(|r| {
            (
                r.label("day_name").unwrap(),
                r.integer("day_num").unwrap(),
                r.count("count").unwrap(),
            )
        })
        .collect();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0], ("Monday".to_string(), 1, 1));
    assert_eq!(days[1], ("Tuesday".to_string(), 2, 2));
    assert_eq!(days[6], ("Sunday".to_string(), 7, 1));
}

#[test]
fn test_time_period_buckets() {
    let store = TestStore::new();
    store.insert("a", "x", "foreground", at(2026, 10, 19, 5, 59));
    store.insert("b", "x", "foreground", at(2026, 10, 19, 6, 0));
    store.insert("c", "x", "foreground", at(2026, 10, 19, 17, 59));
    store.insert("d", "x", "foreground", at(2026, 10, 19, 18, 0));

    let result = run_spec(&store, "day×period heatmap");
    let periods: Vec<(String, u64)> = result
        .rows()
        .map(|r| (r.label("time_period").unwrap(), r.count("count").unwrap()))
        .collect();
    for expected in ["Night", "Morning", "Afternoon", "Evening"] {
        assert!(
            periods.contains(&(expected.to_string(), 1)),
            "missing {} in {:?}",
            expected,
            periods
        );
    }
}

#[test]
fn test_weekly_summary_iso_weeks() {
    let store = TestStore::new();
    store.seed_week();

    let result = run_spec(&store, "weekly summary");
    let weeks: Vec<(String, String, u64)> = result
        .rows()
        .map(|r| {
            (
                r.label("year_week").unwrap(),
                r.label("type").unwrap(),
                r.count("count").unwrap(),
            )
        })
        .collect();
    assert_eq!(
        weeks,
        [
            ("2026-W43".to_string(), "foreground".to_string(), 1),
            ("2026-W42".to_string(), "background".to_string(), 3),
            ("2026-W42".to_string(), "foreground".to_string(), 4),
        ]
    );
}

#[test]
fn test_iso_week_at_year_boundary() {
    let store = TestStore::new();
    // 2027-01-01 is a Friday, so it belongs to the last ISO week of 2026.
    store.insert("a", "x", "foreground", at(2027, 1, 1, 10, 0));
    store.insert("b", "x", "foreground", at(2027, 1, 4, 10, 0));

    let result = run_spec(&store, "weekly summary");
    let weeks: Vec<String> = result.rows().map(|r| r.label("year_week").unwrap()).collect();
    assert_eq!(weeks, ["2027-W01", "2026-W53"]);
}

#[test]
fn test_daily_trend_window() {
    let store = TestStore::new();
    store.insert("old", "x", "foreground", at(2026, 9, 18, 23, 59));
    store.insert("edge", "x", "foreground", at(2026, 9, 19, 0, 0));
    store.insert("new", "x", "background", at(2026, 10, 19, 8, 0));

    let result = run_spec(&store, "daily trend");
    let dates: Vec<String> = result.rows().map(|r| r.label("date").unwrap()).collect();
    assert_eq!(dates, ["2026-09-19", "2026-10-19"]);
}

#[test]
fn test_daily_trend_window_with_iso_layout_timestamps() {
    let store = TestStore::new();
    store.insert_raw("old", "x", "foreground", "2026-09-18T23:59:59");
    store.insert_raw("edge", "x", "foreground", "2026-09-19T00:00:00.500");

    let result = run_spec(&store, "daily trend");
    let dates: Vec<String> = result.rows().map(|r| r.label("date").unwrap()).collect();
    assert_eq!(dates, ["2026-09-19"]);
}

#[test]
fn test_raw_export_newest_first() {
    let store = TestStore::new();
    store.seed_week();

    let result = run_spec(&store, "raw events");
    assert_eq!(
        result.columns(),
        ["id", "title", "body", "type", "source", "received_at"]
    );
    assert_eq!(result.len(), 8);
    let first = result.first().unwrap();
    assert_eq!(first.get("id").unwrap(), &Value::Integer(8));
    assert_eq!(first.text("received_at").unwrap(), "2026-10-19 07:45:00");
}
