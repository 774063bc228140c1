//! The fixed report and export tables.
//!
//! Reports run first, in declaration order, then exports. Each entry is
//! self-contained, so the orchestrator can treat a failure in one as local to
//! that entry.

use std::fmt;

use chrono::NaiveDateTime;

use super::{queries, transform, Chart, TransformResult};
use crate::sql::{Dialect, Query};
use crate::store::AggregateResult;

/// Renders a report's SQL for a dialect and reference time.
pub type QueryBuilder = fn(Dialect, NaiveDateTime) -> String;

/// Turns query rows into a chart.
pub type Transform = fn(&AggregateResult) -> TransformResult<Chart>;

/// What a report produces from its rows.
#[derive(Clone, Copy)]
pub enum Materialize {
    /// Transform into a chart image.
    Chart(Transform),
    /// Write the rows unchanged as a delimited table.
    Table,
}

impl Materialize {
    pub fn is_chart(&self) -> bool {
        matches!(self, Materialize::Chart(_))
    }
}

impl fmt::Debug for Materialize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Materialize::Chart(_) => f.write_str("Chart"),
            Materialize::Table => f.write_str("Table"),
        }
    }
}

/// Immutable descriptor of one report or export.
#[derive(Debug, Clone, Copy)]
pub struct ReportSpec {
    pub name: &'static str,
    pub file_name: &'static str,
    build_query: QueryBuilder,
    pub materialize: Materialize,
}

impl ReportSpec {
    pub const fn new(
        name: &'static str,
        file_name: &'static str,
        build_query: QueryBuilder,
        materialize: Materialize,
    ) -> Self {
        Self {
            name,
            file_name,
            build_query,
            materialize,
        }
    }

    /// The spec's query, labelled with its name.
    pub fn query(&self, dialect: Dialect, now: NaiveDateTime) -> Query {
        Query::new(self.name, (self.build_query)(dialect, now))
    }
}

static REPORTS: [ReportSpec; 7] = [
    ReportSpec::new(
        "type distribution",
        "notification_types.svg",
        queries::type_distribution,
        Materialize::Chart(transform::type_shares),
    ),
    ReportSpec::new(
        "hourly distribution",
        "hourly_distribution.svg",
        queries::hourly,
        Materialize::Chart(transform::hourly_pivot),
    ),
    ReportSpec::new(
        "top actions",
        "top_actions.svg",
        queries::top_actions,
        Materialize::Chart(transform::top_actions),
    ),
    ReportSpec::new(
        "daily trend",
        "daily_trend.svg",
        queries::daily_trend,
        Materialize::Chart(transform::daily_trend),
    ),
    ReportSpec::new(
        "day-of-week distribution",
        "day_of_week.svg",
        queries::day_of_week,
        Materialize::Chart(transform::day_of_week),
    ),
    ReportSpec::new(
        "day×period heatmap",
        "time_period_heatmap.svg",
        queries::time_period_heatmap,
        Materialize::Chart(transform::time_period_heatmap),
    ),
    ReportSpec::new(
        "timeline",
        "notification_timeline.svg",
        queries::timeline,
        Materialize::Chart(transform::timeline),
    ),
];

static EXPORTS: [ReportSpec; 4] = [
    ReportSpec::new(
        "raw events",
        "all_notifications.csv",
        queries::all_notifications,
        Materialize::Table,
    ),
    ReportSpec::new(
        "hourly summary",
        "hourly_summary.csv",
        queries::hourly,
        Materialize::Table,
    ),
    ReportSpec::new(
        "daily summary",
        "daily_summary.csv",
        queries::daily_summary,
        Materialize::Table,
    ),
    ReportSpec::new(
        "weekly summary",
        "weekly_summary.csv",
        queries::weekly_summary,
        Materialize::Table,
    ),
];

/// The seven chart reports, in run order.
pub fn reports() -> &'static [ReportSpec] {
    &REPORTS
}

/// The four table exports, in run order.
pub fn exports() -> &'static [ReportSpec] {
    &EXPORTS
}

/// Look up a report or export by name or file name.
pub fn find(name: &str) -> Option<&'static ReportSpec> {
    reports()
        .iter()
        .chain(exports())
        .find(|spec| spec.name == name || spec.file_name == name)
}
