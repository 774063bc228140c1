//! End-to-end runs against a SQLite store and a real output directory.

#[path = "../common/mod.rs"]
mod common;

use common::{at, TestStore};
use notification_analytics::pipeline::{Pipeline, RunState};
use notification_analytics::render::{FileRenderer, OutputLocation};
use notification_analytics::report::{exports, reports};
use notification_analytics::store::SqliteEventStore;

fn now() -> chrono::NaiveDateTime {
    at(2026, 10, 19, 12, 0)
}

#[test]
fn test_full_run_writes_every_artifact() {
    let store = TestStore::new();
    store.seed_week();
    let out = store.dir().join("analytics_output");

    let pipeline = Pipeline::new(store.reader(), FileRenderer, OutputLocation::new(&out));
    let report = pipeline.run(now());

    assert_eq!(report.state, RunState::Done, "{}", report);
    assert!(report.is_success());
    assert_eq!(report.attempted, 11);
    assert_eq!(report.produced.len(), 11);
    assert!(report.skipped.is_empty());
    assert_eq!(report.summary.as_ref().unwrap().total, 8);

    for spec in reports() {
        let svg = std::fs::read_to_string(out.join(spec.file_name)).unwrap();
        assert!(svg.starts_with("<svg"), "{} is not an SVG", spec.file_name);
        assert!(svg.trim_end().ends_with("</svg>"));
    }
    for spec in exports() {
        assert!(out.join(spec.file_name).is_file(), "missing {}", spec.file_name);
    }

    let hourly = std::fs::read_to_string(out.join("hourly_summary.csv")).unwrap();
    assert!(hourly.starts_with("hour,type,count\n"));
    assert!(hourly.contains("\n2,background,1\n"));

    let raw = std::fs::read_to_string(out.join("all_notifications.csv")).unwrap();
    assert_eq!(raw.lines().count(), 9);
    assert_eq!(raw.lines().nth(1).unwrap(), "8,erin,erin sent you a message,foreground,Instagram,2026-10-19 07:45:00");
}

#[test]
fn test_artifacts_in_run_order() {
    let store = TestStore::new();
    store.seed_week();

    let pipeline = Pipeline::new(
        store.reader(),
        FileRenderer,
        OutputLocation::new(store.dir().join("out")),
    );
    let report = pipeline.run(now());

    let names: Vec<&str> = report.produced.iter().map(|a| a.spec).collect();
    let expected: Vec<&str> = reports()
        .iter()
        .chain(exports())
        .map(|s| s.name)
        .collect();
    assert_eq!(names, expected);
}

#[test]
fn test_empty_store_produces_nothing() {
    let store = TestStore::new();
    let out = store.dir().join("analytics_output");

    let pipeline = Pipeline::new(store.reader(), FileRenderer, OutputLocation::new(&out));
    let report = pipeline.run(now());

    assert_eq!(report.state, RunState::EmptyExit);
    assert!(report.is_success());
    assert!(report.produced.is_empty());
    assert!(!out.exists());
    assert!(report.to_string().contains("nothing to report"));
}

#[test]
fn test_missing_store_fails_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("analytics_output");

    let pipeline = Pipeline::new(
        SqliteEventStore::open(dir.path().join("absent.db")),
        FileRenderer,
        OutputLocation::new(&out),
    );
    let report = pipeline.run(now());

    assert_eq!(report.state, RunState::ConnectionFailed);
    assert!(!report.is_success());
    assert!(report.summary.is_none());
    assert!(!out.exists());
}

#[test]
fn test_existing_files_are_kept() {
    let store = TestStore::new();
    store.seed_week();
    let out = store.dir().join("out");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("README.txt"), "hands off").unwrap();

    Pipeline::new(store.reader(), FileRenderer, OutputLocation::new(&out)).run(now());
    assert_eq!(std::fs::read_to_string(out.join("README.txt")).unwrap(), "hands off");
}

#[test]
fn test_report_serializes() {
    let store = TestStore::new();
    store.seed_week();

    let pipeline = Pipeline::new(
        store.reader(),
        FileRenderer,
        OutputLocation::new(store.dir().join("out")),
    );
    let json = serde_json::to_value(pipeline.run(now())).unwrap();

    assert_eq!(json["state"], "done");
    assert_eq!(json["attempted"], 11);
    assert_eq!(json["summary"]["total"], 8);
    assert!(json["summary"]["average_per_day"].is_f64());
    assert_eq!(json["produced"].as_array().unwrap().len(), 11);
}
