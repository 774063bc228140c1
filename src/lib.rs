//! # Notification Analytics
//!
//! A batch reporting pipeline over a notification event log.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Event Store (notifications)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [store + sql]
//! ┌─────────────────────────────────────────────────────────┐
//! │        AggregateResult (named columns, typed rows)       │
//! └─────────────────────────────────────────────────────────┘
//!              │                               │
//!              ▼ [summary]                     ▼ [report::transform]
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │       SummaryStats       │   │   Chart / raw table      │
//! └──────────────────────────┘   └──────────────────────────┘
//!                                              │
//!                                              ▼ [render]
//! ┌─────────────────────────────────────────────────────────┐
//! │          SVG charts + CSV exports (output dir)           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! [`pipeline::Pipeline`] drives one run end to end and returns a
//! [`pipeline::RunReport`].

pub mod calendar;
pub mod config;
pub mod event;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod sql;
pub mod store;
pub mod summary;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{Settings, StoreConfig};
    pub use crate::event::{NotificationEvent, NotificationType};
    pub use crate::pipeline::{Pipeline, RunReport, RunState};
    pub use crate::render::{ArtifactRenderer, FileRenderer, OutputLocation};
    pub use crate::report::{Chart, ChartData, ReportSpec};
    pub use crate::sql::{Dialect, Query};
    pub use crate::store::{AggregateResult, EventStore, SqliteEventStore, StoreError};
    pub use crate::summary::SummaryStats;
}
