//! Shared fixtures: a throwaway SQLite store with the event schema.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use notification_analytics::event::format_timestamp;
use notification_analytics::store::{schema, SqliteEventStore};
use rusqlite::{params, Connection};
use tempfile::TempDir;

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

/// A temporary directory holding `notifications.db`.
pub struct TestStore {
    dir: TempDir,
    path: PathBuf,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notifications.db");
        schema::initialize(&path).unwrap();
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn reader(&self) -> SqliteEventStore {
        SqliteEventStore::open(&self.path)
    }

    pub fn insert(&self, title: &str, body: &str, kind: &str, received_at: NaiveDateTime) {
        self.insert_raw(title, body, kind, &format_timestamp(&received_at));
    }

    /// Insert with `received_at` stored exactly as given.
    pub fn insert_raw(&self, title: &str, body: &str, kind: &str, received_at: &str) {
        let conn = Connection::open(&self.path).unwrap();
        conn.execute(
            "INSERT INTO notifications (title, body, type, received_at) VALUES (?1, ?2, ?3, ?4)",
            params![title, body, kind, received_at],
        )
        .unwrap();
    }

    /// A small, varied week of events ending on 2026-10-19.
    pub fn seed_week(&self) {
        let events = [
            ("alice", "alice liked your photo", "foreground", at(2026, 10, 13, 8, 15)),
            ("bob", "bob commented: nice shot", "background", at(2026, 10, 13, 13, 40)),
            ("alice", "alice liked your photo", "foreground", at(2026, 10, 14, 19, 5)),
            ("carol", "carol started following you", "background", at(2026, 10, 15, 23, 30)),
            ("alice", "alice liked your photo", "foreground", at(2026, 10, 16, 9, 0)),
            ("dave", "dave mentioned you 🎉", "foreground", at(2026, 10, 17, 14, 20)),
            ("bob", "bob commented: nice shot", "background", at(2026, 10, 18, 2, 10)),
            ("erin", "erin sent you a message", "foreground", at(2026, 10, 19, 7, 45)),
        ];
        for (title, body, kind, received_at) in events {
            self.insert(title, body, kind, received_at);
        }
    }
}
