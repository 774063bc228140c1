//! Summary counters computed against a real SQLite store.

#[path = "../common/mod.rs"]
mod common;

use common::{at, TestStore};
use notification_analytics::report::{self, ChartData};
use notification_analytics::store::EventStore;
use notification_analytics::summary::{self, SummaryStats};

#[test]
fn test_empty_store() {
    let store = TestStore::new();
    let stats = summary::compute(&store.reader(), at(2026, 10, 19, 12, 0)).unwrap();

    assert_eq!(stats, SummaryStats::default());
    assert!(stats.is_empty());
    assert_eq!(stats.average_per_day(), None);
}

#[test]
fn test_two_active_days() {
    let store = TestStore::new();
    for minute in [0, 10, 20] {
        store.insert("fg", "hello", "foreground", at(2026, 10, 18, 9, minute));
    }
    for minute in [0, 30] {
        store.insert("bg", "sync", "background", at(2026, 10, 19, 10, minute));
    }

    let stats = summary::compute(&store.reader(), at(2026, 10, 19, 12, 0)).unwrap();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.foreground, 3);
    assert_eq!(stats.background, 2);
    assert_eq!(stats.today, 2);
    assert_eq!(stats.last_7_days, 5);
    assert_eq!(stats.active_days, 2);
    assert_eq!(stats.average_per_day(), Some(2.5));
    assert_eq!(stats.last_received, Some(at(2026, 10, 19, 10, 30)));
    assert_eq!(stats.first_received, Some(at(2026, 10, 18, 9, 0)));
}

#[test]
fn test_type_shares_end_to_end() {
    let store = TestStore::new();
    for minute in [0, 10, 20] {
        store.insert("fg", "hello", "foreground", at(2026, 10, 18, 9, minute));
    }
    for minute in [0, 30] {
        store.insert("bg", "sync", "background", at(2026, 10, 19, 10, minute));
    }

    let spec = report::find("type distribution").unwrap();
    let reader = store.reader();
    let rows = reader.run(&spec.query(reader.dialect(), at(2026, 10, 19, 12, 0))).unwrap();
    let chart = report::transform::type_shares(&rows).unwrap();

    let ChartData::Shares { slices } = chart.data else {
        panic!("expected a pie chart");
    };
    let shares: Vec<(&str, u64, f64)> = slices
        .iter()
        .map(|s| (s.label.as_str(), s.count, s.percent))
        .collect();
    assert_eq!(shares, [("Foreground", 3, 60.0), ("Background", 2, 40.0)]);
}

#[test]
fn test_recent_window_is_relative_to_reference_time() {
    let store = TestStore::new();
    store.insert("a", "x", "foreground", at(2026, 10, 12, 11, 59));
    store.insert("b", "x", "foreground", at(2026, 10, 12, 12, 0));
    store.insert("c", "x", "background", at(2026, 10, 19, 0, 0));

    let stats = summary::compute(&store.reader(), at(2026, 10, 19, 12, 0)).unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.last_7_days, 2);
    assert_eq!(stats.today, 1);

    // The same data a year later has nothing recent.
    let later = summary::compute(&store.reader(), at(2027, 10, 19, 12, 0)).unwrap();
    assert_eq!(later.total, 3);
    assert_eq!(later.today, 0);
    assert_eq!(later.last_7_days, 0);
}

#[test]
fn test_recent_window_with_iso_layout_timestamps() {
    let store = TestStore::new();
    store.insert_raw("a", "x", "foreground", "2026-10-12T11:59:00");
    store.insert_raw("b", "x", "foreground", "2026-10-12T12:00:00.250");
    store.insert_raw("c", "x", "background", "2026-10-19 08:00:00");

    let stats = summary::compute(&store.reader(), at(2026, 10, 19, 12, 0)).unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.last_7_days, 2);
    assert_eq!(stats.active_days, 2);
}

#[test]
fn test_summary_display() {
    let store = TestStore::new();
    store.seed_week();

    let stats = summary::compute(&store.reader(), at(2026, 10, 19, 12, 0)).unwrap();
    insta::assert_snapshot!(stats.to_string(), @r"
    Total notifications: 8
      Foreground: 5
      Background: 3
    Today: 1
    Last 7 days: 8
    Active days: 7
    Last notification: 2026-10-19 07:45:00
    First notification: 2026-10-13 08:15:00
    Average per day: 1.14
    ");
}
