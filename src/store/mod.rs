//! Read-only access to the notification event store.
//!
//! The pipeline only needs one capability from the store: run a fully-formed
//! aggregation query and hand back ordered rows with named columns. That
//! capability is the [`EventStore`] trait; [`SqliteEventStore`] is the bundled
//! implementation.
//!
//! # Errors
//!
//! Store failures are split in two, because the orchestrator treats them
//! differently:
//!
//! - [`StoreError::Connection`]: the store cannot be reached at all
//! - [`StoreError::Query`]: the store answered, but this query failed
//!
//! A query returning zero rows is not an error; callers decide what an empty
//! [`AggregateResult`] means.

mod result;
pub mod schema;
mod sqlite;

pub use result::{AggregateResult, ColumnError, Row, Value};
pub use sqlite::SqliteEventStore;

use crate::sql::{Dialect, Query};

/// Name of the event table.
pub const NOTIFICATIONS_TABLE: &str = "notifications";

/// Errors returned by an event store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("cannot connect to event store: {0}")]
    Connection(String),

    #[error("query '{query}' failed: {message}")]
    Query { query: String, message: String },
}

impl StoreError {
    pub fn is_connection(&self) -> bool {
        matches!(self, StoreError::Connection(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read interface into the event store.
pub trait EventStore {
    /// Dialect the store's queries must be rendered in.
    fn dialect(&self) -> Dialect;

    /// Establish and release a connection, reporting whether the store is
    /// reachable.
    fn ping(&self) -> StoreResult<()>;

    /// Execute a query as-is and collect its rows.
    fn run(&self, query: &Query) -> StoreResult<AggregateResult>;
}

impl<S: EventStore + ?Sized> EventStore for &S {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn ping(&self) -> StoreResult<()> {
        (**self).ping()
    }

    fn run(&self, query: &Query) -> StoreResult<AggregateResult> {
        (**self).run(query)
    }
}
