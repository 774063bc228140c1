//! Scalar summary of the whole event log.
//!
//! Computed by a single multi-aggregate query. A zero total is what the
//! pipeline uses to decide the dataset is empty.

use std::fmt;

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::event::{format_timestamp, NotificationType};
use crate::sql::{Dialect, Query, Select, SqlDialect};
use crate::store::{ColumnError, EventStore, StoreError, StoreResult, NOTIFICATIONS_TABLE};

/// Days covered by the "last 7 days" counter.
pub const RECENT_WINDOW_DAYS: u32 = 7;

/// Summary counters for the event log at a reference time.
///
/// Serializes with the derived `average_per_day` alongside the counters,
/// `null` when there are no active days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryStats {
    pub total: u64,
    pub foreground: u64,
    pub background: u64,
    /// Events on the reference date.
    pub today: u64,
    /// Events in the trailing 7-day window ending at the reference time.
    pub last_7_days: u64,
    /// Distinct dates with at least one event.
    pub active_days: u64,
    pub last_received: Option<NaiveDateTime>,
    pub first_received: Option<NaiveDateTime>,
}

impl SummaryStats {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Mean events per active day; `None` when there are no active days.
    pub fn average_per_day(&self) -> Option<f64> {
        if self.active_days == 0 {
            return None;
        }
        Some(self.total as f64 / self.active_days as f64)
    }

    pub fn count_for(&self, kind: NotificationType) -> u64 {
        match kind {
            NotificationType::Foreground => self.foreground,
            NotificationType::Background => self.background,
        }
    }
}

impl Serialize for SummaryStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SummaryStats", 9)?;
        state.serialize_field("total", &self.total)?;
        state.serialize_field("foreground", &self.foreground)?;
        state.serialize_field("background", &self.background)?;
        state.serialize_field("today", &self.today)?;
        state.serialize_field("last_7_days", &self.last_7_days)?;
        state.serialize_field("active_days", &self.active_days)?;
        state.serialize_field("last_received", &self.last_received)?;
        state.serialize_field("first_received", &self.first_received)?;
        state.serialize_field("average_per_day", &self.average_per_day())?;
        state.end()
    }
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stamp = |ts: &Option<NaiveDateTime>| match ts {
            Some(ts) => format_timestamp(ts),
            None => "-".to_string(),
        };

        writeln!(f, "Total notifications: {}", self.total)?;
        for kind in NotificationType::ALL {
            writeln!(f, "  {}: {}", kind.label(), self.count_for(kind))?;
        }
        writeln!(f, "Today: {}", self.today)?;
        writeln!(f, "Last {} days: {}", RECENT_WINDOW_DAYS, self.last_7_days)?;
        writeln!(f, "Active days: {}", self.active_days)?;
        writeln!(f, "Last notification: {}", stamp(&self.last_received))?;
        writeln!(f, "First notification: {}", stamp(&self.first_received))?;
        match self.average_per_day() {
            Some(avg) => write!(f, "Average per day: {:.2}", avg),
            None => write!(f, "Average per day: undefined"),
        }
    }
}

fn count_where(condition: &str) -> String {
    format!("SUM(CASE WHEN {} THEN 1 ELSE 0 END)", condition)
}

/// Build the summary query for `now`.
pub fn summary_query(dialect: Dialect, now: NaiveDateTime) -> Query {
    let received_at = dialect.quote_identifier("received_at");
    let kind = dialect.quote_identifier("type");
    let now_literal = dialect.format_timestamp(&now);

    let is_type = |t: NotificationType| format!("{} = {}", kind, dialect.quote_string(t.as_str()));
    let today = format!(
        "{} = {}",
        dialect.date_of(&received_at),
        dialect.date_of(&now_literal)
    );
    let recent = format!(
        "{} >= {}",
        dialect.timestamp_of(&received_at),
        dialect.days_before(&now_literal, RECENT_WINDOW_DAYS)
    );

    let sql = Select::from(NOTIFICATIONS_TABLE)
        .column_as("COUNT(*)", "total")
        .column_as(count_where(&is_type(NotificationType::Foreground)), "foreground")
        .column_as(count_where(&is_type(NotificationType::Background)), "background")
        .column_as(count_where(&today), "today")
        .column_as(count_where(&recent), "last_7_days")
        .column_as(
            format!("COUNT(DISTINCT {})", dialect.date_of(&received_at)),
            "active_days",
        )
        .column_as(format!("MAX({})", received_at), "last_received")
        .column_as(format!("MIN({})", received_at), "first_received")
        .to_sql(dialect);

    Query::new("summary", sql)
}

/// Run the summary query against `store`.
pub fn compute<S: EventStore + ?Sized>(store: &S, now: NaiveDateTime) -> StoreResult<SummaryStats> {
    let query = summary_query(store.dialect(), now);
    let result = store.run(&query)?;

    let Some(row) = result.first() else {
        return Ok(SummaryStats::default());
    };

    let read = || -> Result<SummaryStats, ColumnError> {
        Ok(SummaryStats {
            total: row.count("total")?,
            foreground: row.count_or_zero("foreground")?,
            background: row.count_or_zero("background")?,
            today: row.count_or_zero("today")?,
            last_7_days: row.count_or_zero("last_7_days")?,
            active_days: row.count("active_days")?,
            last_received: row.optional_timestamp("last_received")?,
            first_received: row.optional_timestamp("first_received")?,
        })
    };

    read().map_err(|e| StoreError::Query {
        query: query.label().to_string(),
        message: e.to_string(),
    })
}
