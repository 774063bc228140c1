//! Event table schema.
//!
//! The store is owned by the ingestion side; this schema exists so operators
//! and tests can create an empty store the pipeline can read.

use std::path::Path;

use rusqlite::Connection;

use super::{StoreError, StoreResult, NOTIFICATIONS_TABLE};

/// DDL for the event table and its time index.
pub fn create_table_sql() -> String {
    format!(
        "
        CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('foreground', 'background')),
            source TEXT NOT NULL DEFAULT 'Instagram',
            received_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_received_at ON {table} (received_at);
        ",
        table = NOTIFICATIONS_TABLE
    )
}

/// Create the event table in `path` if absent. Existing rows are untouched.
pub fn initialize(path: &Path) -> StoreResult<()> {
    let conn = Connection::open(path).map_err(|e| StoreError::Connection(e.to_string()))?;
    conn.execute_batch(&create_table_sql())
        .map_err(|e| StoreError::Query {
            query: "create schema".to_string(),
            message: e.to_string(),
        })
}
