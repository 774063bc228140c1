//! Re-running over unchanged data rewrites the same bytes.

#[path = "../common/mod.rs"]
mod common;

use std::collections::BTreeMap;
use std::path::Path;

use common::{at, TestStore};
use notification_analytics::pipeline::{Pipeline, RunState};
use notification_analytics::render::{FileRenderer, OutputLocation};

fn snapshot_dir(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.file_name().to_string_lossy().into_owned(),
                std::fs::read(entry.path()).unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_rerun_is_byte_identical() {
    let store = TestStore::new();
    store.seed_week();
    let out = store.dir().join("out");
    let pipeline = Pipeline::new(store.reader(), FileRenderer, OutputLocation::new(&out));
    let now = at(2026, 10, 19, 12, 0);

    assert_eq!(pipeline.run(now).state, RunState::Done);
    let first = snapshot_dir(&out);

    assert_eq!(pipeline.run(now).state, RunState::Done);
    let second = snapshot_dir(&out);

    assert_eq!(first.len(), 11);
    assert_eq!(first, second);
}

#[test]
fn test_new_data_replaces_artifacts() {
    let store = TestStore::new();
    store.seed_week();
    let out = store.dir().join("out");
    let pipeline = Pipeline::new(store.reader(), FileRenderer, OutputLocation::new(&out));
    let now = at(2026, 10, 19, 12, 0);

    pipeline.run(now);
    let before = std::fs::read_to_string(out.join("all_notifications.csv")).unwrap();

    store.insert("frank", "frank replied", "background", at(2026, 10, 19, 11, 0));
    pipeline.run(now);
    let after = std::fs::read_to_string(out.join("all_notifications.csv")).unwrap();

    assert_eq!(before.lines().count() + 1, after.lines().count());
    assert!(after.lines().nth(1).unwrap().contains("frank replied"));
    assert_eq!(snapshot_dir(&out).len(), 11);
}
