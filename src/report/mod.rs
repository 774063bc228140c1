//! Report definitions.
//!
//! A report is one aggregation query plus what to do with its rows: either
//! transform them into a [`Chart`] or write them out as a table. The fixed
//! set lives in [`catalog`]; the orchestrator walks it in order.
//!
//! - [`queries`] - SQL for every report and export
//! - [`transform`] - rows to chart payloads
//! - [`pivot`] - zero-filled count matrices
//! - [`chart`] - renderer-independent chart model

pub mod catalog;
pub mod chart;
pub mod pivot;
pub mod queries;
pub mod transform;

pub use catalog::{exports, find, reports, Materialize, ReportSpec};
pub use chart::{Bar, Chart, ChartData, ScatterPoint, ScatterSeries, Series, Share};
pub use pivot::Pivot;

use crate::event::UnknownNotificationType;
use crate::store::ColumnError;

/// Errors raised while turning query rows into a chart.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error(transparent)]
    Column(#[from] ColumnError),

    #[error("unexpected group key '{0}'")]
    UnexpectedKey(String),

    #[error(transparent)]
    UnknownType(#[from] UnknownNotificationType),

    #[error("no rows to transform")]
    NoData,
}

pub type TransformResult<T> = Result<T, TransformError>;
