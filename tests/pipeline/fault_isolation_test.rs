//! A failing spec costs only its own artifact.

#[path = "../common/mod.rs"]
mod common;

use std::io;
use std::path::Path;

use common::{at, TestStore};
use notification_analytics::pipeline::{Pipeline, RunState, Stage};
use notification_analytics::render::{
    ArtifactRenderer, FileRenderer, OutputLocation, RenderError, RenderResult,
};
use notification_analytics::report::Chart;
use notification_analytics::store::{AggregateResult, SqliteEventStore};

/// Delegates to [`FileRenderer`] except for one file name.
struct FailingOn(&'static str);

impl ArtifactRenderer for FailingOn {
    fn write_chart(&self, chart: &Chart, path: &Path) -> RenderResult<()> {
        if path.ends_with(self.0) {
            return Err(RenderError::Io {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            });
        }
        FileRenderer.write_chart(chart, path)
    }

    fn write_table(&self, table: &AggregateResult, path: &Path) -> RenderResult<()> {
        FileRenderer.write_table(table, path)
    }
}

#[test]
fn test_render_failure_skips_one_chart() {
    let store = TestStore::new();
    store.seed_week();
    let out = store.dir().join("out");

    let pipeline = Pipeline::new(
        store.reader(),
        FailingOn("top_actions.svg"),
        OutputLocation::new(&out),
    );
    let report = pipeline.run(at(2026, 10, 19, 12, 0));

    assert_eq!(report.state, RunState::Done);
    assert!(report.is_success());
    assert_eq!(report.attempted, 11);
    assert_eq!(report.produced.len(), 10);
    assert_eq!(report.skipped.len(), 1);

    let skipped = &report.skipped[0];
    assert_eq!(skipped.spec, "top actions");
    assert_eq!(skipped.stage, Stage::Render);
    assert!(skipped.reason.contains("disk full"));

    let svgs = std::fs::read_dir(&out)
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension().unwrap() == "svg")
        .count();
    let csvs = std::fs::read_dir(&out)
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension().unwrap() == "csv")
        .count();
    assert_eq!(svgs, 6);
    assert_eq!(csvs, 4);
    assert!(!out.join("top_actions.svg").exists());
}

#[test]
fn test_unknown_type_fails_only_type_aware_charts() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("legacy.db");
    let conn = rusqlite::Connection::open(&db).unwrap();
    conn.execute_batch(
        "
        CREATE TABLE notifications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            type TEXT NOT NULL,
            source TEXT NOT NULL DEFAULT 'Instagram',
            received_at TEXT NOT NULL
        );
        INSERT INTO notifications (title, body, type, received_at)
            VALUES ('a', 'hello', 'urgent', '2026-10-19 09:00:00');
        INSERT INTO notifications (title, body, type, received_at)
            VALUES ('b', 'world', 'foreground', '2026-10-19 10:00:00');
        ",
    )
    .unwrap();
    drop(conn);

    let out = dir.path().join("out");
    let pipeline = Pipeline::new(SqliteEventStore::open(&db), FileRenderer, OutputLocation::new(&out));
    let report = pipeline.run(at(2026, 10, 19, 12, 0));

    assert_eq!(report.state, RunState::Done);
    let types = report
        .skipped
        .iter()
        .find(|s| s.spec == "type distribution")
        .unwrap();
    assert_eq!(types.stage, Stage::Transform);
    assert!(types.reason.contains("urgent"));

    assert!(out.join("top_actions.svg").is_file());
    assert!(out.join("day_of_week.svg").is_file());
    for csv in ["all_notifications.csv", "hourly_summary.csv", "daily_summary.csv", "weekly_summary.csv"] {
        assert!(out.join(csv).is_file(), "missing {}", csv);
    }
}
