//! SQLite event store.

use std::path::Path;

use rusqlite::{Connection, ErrorCode, OpenFlags};
use tracing::debug;

use super::{AggregateResult, EventStore, StoreError, StoreResult, Value, NOTIFICATIONS_TABLE};
use crate::config::StoreConfig;
use crate::event::{NotificationEvent, NotificationType};
use crate::sql::{Dialect, Query, Select, SqlDialect};

/// Reader over a SQLite database file.
///
/// Holds configuration only. Every call opens its own read-only connection
/// and drops it before returning, so nothing stays locked between queries.
#[derive(Debug, Clone)]
pub struct SqliteEventStore {
    config: StoreConfig,
}

impl SqliteEventStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::new(StoreConfig::sqlite(path))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn connect(&self) -> StoreResult<Connection> {
        let path = self.config.database_path();
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|e| {
            StoreError::Connection(format!("{}: {}", path.display(), e))
        })?;
        conn.busy_timeout(self.config.query_timeout)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(conn)
    }

    /// Newest events first, at most `limit` of them.
    pub fn recent(&self, limit: u64) -> StoreResult<Vec<NotificationEvent>> {
        let dialect = self.dialect();
        let columns = ["id", "title", "body", "type", "source", "received_at"];
        let select = columns
            .iter()
            .fold(Select::from(NOTIFICATIONS_TABLE), |s, c| {
                s.column(dialect.quote_identifier(c))
            })
            .order_by_desc(dialect.quote_identifier("received_at"))
            .order_by_desc(dialect.quote_identifier("id"))
            .limit(limit);
        let query = Query::new("recent events", select.to_sql(dialect));

        let result = self.run(&query)?;
        let invalid = |message: String| StoreError::Query {
            query: query.label().to_string(),
            message,
        };

        result
            .rows()
            .map(|row| -> StoreResult<NotificationEvent> {
                let kind = row.text("type").map_err(|e| invalid(e.to_string()))?;
                Ok(NotificationEvent {
                    id: row.integer("id").map_err(|e| invalid(e.to_string()))?,
                    title: row.label("title").map_err(|e| invalid(e.to_string()))?,
                    body: row.label("body").map_err(|e| invalid(e.to_string()))?,
                    kind: kind
                        .parse::<NotificationType>()
                        .map_err(|e| invalid(e.to_string()))?,
                    source: row.label("source").map_err(|e| invalid(e.to_string()))?,
                    received_at: row
                        .timestamp("received_at")
                        .map_err(|e| invalid(e.to_string()))?,
                })
            })
            .collect()
    }
}

/// Failures that mean the database itself is unusable rather than the query.
fn is_connection_failure(error: &rusqlite::Error) -> bool {
    matches!(
        error.sqlite_error_code(),
        Some(
            ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::PermissionDenied
                | ErrorCode::SystemIoFailure
        )
    )
}

fn classify(query: &Query, error: rusqlite::Error) -> StoreError {
    if is_connection_failure(&error) {
        StoreError::Connection(error.to_string())
    } else {
        StoreError::Query {
            query: query.label().to_string(),
            message: error.to_string(),
        }
    }
}

impl EventStore for SqliteEventStore {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn ping(&self) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|_| ())
        .map_err(|e| StoreError::Connection(e.to_string()))
    }

    fn run(&self, query: &Query) -> StoreResult<AggregateResult> {
        debug!(query = query.label(), "running query");
        let conn = self.connect()?;
        let mut stmt = conn.prepare(query.sql()).map_err(|e| classify(query, e))?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(Value::from))
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(|e| classify(query, e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| classify(query, e))?;

        debug!(query = query.label(), rows = rows.len(), "query finished");
        Ok(AggregateResult::from_rows(columns, rows))
    }
}
