//! Aggregation queries behind each report and export.
//!
//! Every builder takes the dialect and the run's reference time. Builders
//! that do not look at the clock ignore `now`, so all of them share one
//! signature and can sit in the catalog table.

use chrono::NaiveDateTime;

use crate::calendar::TimeOfDay;
use crate::sql::{Dialect, Select, SqlDialect};
use crate::store::NOTIFICATIONS_TABLE;

/// Characters of `body` kept for top-action grouping.
pub const ACTION_CHARS: u32 = 50;
/// Characters of `body` kept for timeline labels.
pub const TIMELINE_BODY_CHARS: u32 = 30;
/// Events shown on the timeline.
pub const TIMELINE_EVENTS: u64 = 50;
/// Bars shown in the top-actions chart.
pub const TOP_ACTIONS: u64 = 10;
/// Window of the daily trend.
pub const TREND_DAYS: u32 = 30;

/// Column names shared by several queries.
struct Cols {
    received_at: String,
    kind: String,
    body: String,
    id: String,
    count: String,
}

impl Cols {
    fn new(dialect: Dialect) -> Self {
        Self {
            received_at: dialect.quote_identifier("received_at"),
            kind: dialect.quote_identifier("type"),
            body: dialect.quote_identifier("body"),
            id: dialect.quote_identifier("id"),
            count: dialect.quote_identifier("count"),
        }
    }
}

/// `CASE` expression mapping an hour to its time-of-day label.
pub fn time_of_day_case(dialect: Dialect, hour: &str) -> String {
    let mut case = String::from("CASE");
    let mut complement = None;
    for bucket in TimeOfDay::ALL {
        if bucket.is_complement() {
            complement = Some(bucket);
            continue;
        }
        let hours = bucket.hours();
        case.push_str(&format!(
            " WHEN {} BETWEEN {} AND {} THEN {}",
            hour,
            hours.start(),
            hours.end(),
            dialect.quote_string(bucket.label())
        ));
    }
    if let Some(bucket) = complement {
        case.push_str(&format!(" ELSE {}", dialect.quote_string(bucket.label())));
    }
    case.push_str(" END");
    case
}

pub fn type_distribution(dialect: Dialect, _now: NaiveDateTime) -> String {
    let c = Cols::new(dialect);
    Select::from(NOTIFICATIONS_TABLE)
        .column(&c.kind)
        .column_as("COUNT(*)", "count")
        .group_by(&c.kind)
        .order_by(&c.kind)
        .to_sql(dialect)
}

/// Counts per (hour, type); also the hourly summary export.
pub fn hourly(dialect: Dialect, _now: NaiveDateTime) -> String {
    let c = Cols::new(dialect);
    let hour = dialect.hour_of(&c.received_at);
    Select::from(NOTIFICATIONS_TABLE)
        .column_as(&hour, "hour")
        .column(&c.kind)
        .column_as("COUNT(*)", "count")
        .group_by(&hour)
        .group_by(&c.kind)
        .order_by(dialect.quote_identifier("hour"))
        .order_by(&c.kind)
        .to_sql(dialect)
}

/// Most frequent bodies; ties keep the earliest first occurrence first.
pub fn top_actions(dialect: Dialect, _now: NaiveDateTime) -> String {
    let c = Cols::new(dialect);
    let action = dialect.left_chars(&c.body, ACTION_CHARS);
    Select::from(NOTIFICATIONS_TABLE)
        .column_as(&action, "action")
        .column_as("COUNT(*)", "count")
        .group_by(&action)
        .order_by_desc(&c.count)
        .order_by(format!("MIN({})", c.id))
        .limit(TOP_ACTIONS)
        .to_sql(dialect)
}

/// Counts per (date, type) over the trailing window.
pub fn daily_trend(dialect: Dialect, now: NaiveDateTime) -> String {
    let c = Cols::new(dialect);
    let date = dialect.date_of(&c.received_at);
    let since = dialect.date_days_before(&dialect.format_timestamp(&now), TREND_DAYS);
    Select::from(NOTIFICATIONS_TABLE)
        .column_as(&date, "date")
        .column(&c.kind)
        .column_as("COUNT(*)", "count")
        .filter(format!("{} >= {}", dialect.timestamp_of(&c.received_at), since))
        .group_by(&date)
        .group_by(&c.kind)
        .order_by(dialect.quote_identifier("date"))
        .order_by(&c.kind)
        .to_sql(dialect)
}

pub fn day_of_week(dialect: Dialect, _now: NaiveDateTime) -> String {
    let c = Cols::new(dialect);
    let day_name = dialect.day_name_of(&c.received_at);
    let day_num = dialect.iso_weekday_of(&c.received_at);
    Select::from(NOTIFICATIONS_TABLE)
        .column_as(&day_name, "day_name")
        .column_as(&day_num, "day_num")
        .column_as("COUNT(*)", "count")
        .group_by(&day_name)
        .group_by(&day_num)
        .order_by(dialect.quote_identifier("day_num"))
        .to_sql(dialect)
}

pub fn time_period_heatmap(dialect: Dialect, _now: NaiveDateTime) -> String {
    let c = Cols::new(dialect);
    let day_name = dialect.day_name_of(&c.received_at);
    let day_num = dialect.iso_weekday_of(&c.received_at);
    let period = time_of_day_case(dialect, &dialect.hour_of(&c.received_at));
    Select::from(NOTIFICATIONS_TABLE)
        .column_as(&day_name, "day_name")
        .column_as(&day_num, "day_num")
        .column_as(&period, "time_period")
        .column_as("COUNT(*)", "count")
        .group_by(&day_name)
        .group_by(&day_num)
        .group_by(&period)
        .order_by(dialect.quote_identifier("day_num"))
        .order_by(dialect.quote_identifier("time_period"))
        .to_sql(dialect)
}

/// Latest events, newest first.
pub fn timeline(dialect: Dialect, _now: NaiveDateTime) -> String {
    let c = Cols::new(dialect);
    Select::from(NOTIFICATIONS_TABLE)
        .column(&c.received_at)
        .column(&c.kind)
        .column_as(dialect.left_chars(&c.body, TIMELINE_BODY_CHARS), "short_body")
        .order_by_desc(&c.received_at)
        .order_by_desc(&c.id)
        .limit(TIMELINE_EVENTS)
        .to_sql(dialect)
}

/// Every event, every column, newest first.
pub fn all_notifications(dialect: Dialect, _now: NaiveDateTime) -> String {
    let c = Cols::new(dialect);
    ["id", "title", "body", "type", "source", "received_at"]
        .iter()
        .fold(Select::from(NOTIFICATIONS_TABLE), |s, col| {
            s.column(dialect.quote_identifier(col))
        })
        .order_by_desc(&c.received_at)
        .order_by_desc(&c.id)
        .to_sql(dialect)
}

pub fn daily_summary(dialect: Dialect, _now: NaiveDateTime) -> String {
    let c = Cols::new(dialect);
    let date = dialect.date_of(&c.received_at);
    Select::from(NOTIFICATIONS_TABLE)
        .column_as(&date, "date")
        .column(&c.kind)
        .column_as("COUNT(*)", "count")
        .group_by(&date)
        .group_by(&c.kind)
        .order_by_desc(dialect.quote_identifier("date"))
        .order_by(&c.kind)
        .to_sql(dialect)
}

/// Counts per (ISO year-week, type), newest week first.
pub fn weekly_summary(dialect: Dialect, _now: NaiveDateTime) -> String {
    let c = Cols::new(dialect);
    let week = dialect.iso_year_week_of(&c.received_at);
    Select::from(NOTIFICATIONS_TABLE)
        .column_as(&week, "year_week")
        .column(&c.kind)
        .column_as("COUNT(*)", "count")
        .group_by(&week)
        .group_by(&c.kind)
        .order_by_desc(dialect.quote_identifier("year_week"))
        .order_by(&c.kind)
        .to_sql(dialect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::test_utils::validate_sql;
    use chrono::NaiveDate;
    use insta::assert_snapshot;

    type Builder = fn(Dialect, NaiveDateTime) -> String;

    const BUILDERS: [Builder; 10] = [
        type_distribution,
        hourly,
        top_actions,
        daily_trend,
        day_of_week,
        time_period_heatmap,
        timeline,
        all_notifications,
        daily_summary,
        weekly_summary,
    ];

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_all_queries_parse() {
        for dialect in Dialect::ALL {
            for build in BUILDERS {
                validate_sql(&build(dialect, now()), dialect).unwrap();
            }
        }
    }

    #[test]
    fn test_time_of_day_case() {
        assert_eq!(
            time_of_day_case(Dialect::Sqlite, "h"),
            "CASE WHEN h BETWEEN 6 AND 11 THEN 'Morning' \
             WHEN h BETWEEN 12 AND 17 THEN 'Afternoon' \
             WHEN h BETWEEN 18 AND 23 THEN 'Evening' \
             ELSE 'Night' END"
        );
    }

    #[test]
    fn test_top_actions_sqlite() {
        assert_snapshot!(top_actions(Dialect::Sqlite, now()), @r#"
        SELECT substr("body", 1, 50) AS "action", COUNT(*) AS "count"
        FROM "notifications"
        GROUP BY substr("body", 1, 50)
        ORDER BY "count" DESC, MIN("id")
        LIMIT 10
        "#);
    }

    #[test]
    fn test_daily_trend_mysql() {
        assert_snapshot!(daily_trend(Dialect::MySql, now()), @r"
        SELECT DATE(`received_at`) AS `date`, `type`, COUNT(*) AS `count`
        FROM `notifications`
        WHERE `received_at` >= DATE_SUB(DATE('2026-10-19 12:00:00'), INTERVAL 30 DAY)
        GROUP BY DATE(`received_at`), `type`
        ORDER BY `date`, `type`
        ");
    }
}
