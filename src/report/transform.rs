//! Transforms from aggregate rows to chart payloads.
//!
//! Each function reads the columns its query produces and returns a [`Chart`].
//! None of them re-sort what the query already ordered; the pivots fill every
//! absent combination with 0.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::queries::{TIMELINE_EVENTS, TOP_ACTIONS, TREND_DAYS};
use super::{
    Bar, Chart, ChartData, Pivot, ScatterPoint, ScatterSeries, Series, Share, TransformError,
    TransformResult,
};
use crate::calendar::{day_from_name, day_name, TimeOfDay, ISO_WEEK};
use crate::event::NotificationType;
use crate::store::AggregateResult;

const COUNT_AXIS: &str = "Number of Notifications";

/// Drop every non-ASCII character (emoji included) and trim the result.
pub fn strip_non_ascii(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii)
        .collect::<String>()
        .trim()
        .to_string()
}

fn require_rows(result: &AggregateResult) -> TransformResult<()> {
    if result.is_empty() {
        return Err(TransformError::NoData);
    }
    Ok(())
}

fn type_labels() -> impl Iterator<Item = &'static str> {
    NotificationType::ALL.iter().map(|t| t.label())
}

/// Percentage share per notification type, in canonical type order.
pub fn type_shares(result: &AggregateResult) -> TransformResult<Chart> {
    require_rows(result)?;

    let mut counts: BTreeMap<NotificationType, u64> = BTreeMap::new();
    for row in result.rows() {
        let kind: NotificationType = row.text("type")?.parse()?;
        *counts.entry(kind).or_default() += row.count("count")?;
    }

    let total: u64 = counts.values().sum();
    if total == 0 {
        return Err(TransformError::NoData);
    }

    let slices = counts
        .into_iter()
        .map(|(kind, count)| Share {
            label: kind.label().to_string(),
            count,
            percent: count as f64 * 100.0 / total as f64,
        })
        .collect();

    Ok(Chart::new(
        "Notification Distribution by Type",
        ChartData::Shares { slices },
    ))
}

/// 24 hours × notification types.
pub fn hourly_pivot(result: &AggregateResult) -> TransformResult<Chart> {
    require_rows(result)?;

    let mut pivot = Pivot::zeroed((0..24).map(|h: u32| h.to_string()), type_labels());
    for row in result.rows() {
        let hour = row.integer("hour")?;
        if !(0..24).contains(&hour) {
            return Err(TransformError::UnexpectedKey(hour.to_string()));
        }
        let kind: NotificationType = row.text("type")?.parse()?;
        pivot.add(&hour.to_string(), kind.label(), row.count("count")?)?;
    }

    Ok(
        Chart::new("Notifications by Hour of Day", ChartData::GroupedBars { pivot })
            .with_axes("Hour of Day", COUNT_AXIS),
    )
}

/// First ten actions in query order, labels reduced to ASCII.
pub fn top_actions(result: &AggregateResult) -> TransformResult<Chart> {
    require_rows(result)?;

    let bars = result
        .rows()
        .take(TOP_ACTIONS as usize)
        .map(|row| -> TransformResult<Bar> {
            Ok(Bar {
                label: strip_non_ascii(&row.label("action")?),
                value: row.count("count")?,
            })
        })
        .collect::<TransformResult<Vec<_>>>()?;

    Ok(
        Chart::new(format!("Top {} Notification Actions", TOP_ACTIONS), ChartData::RankedBars { bars })
            .with_axes("Count", "Action"),
    )
}

/// One line per type present, over every date from the first to the last.
pub fn daily_trend(result: &AggregateResult) -> TransformResult<Chart> {
    require_rows(result)?;

    let mut by_type: BTreeMap<NotificationType, BTreeMap<NaiveDate, u64>> = BTreeMap::new();
    for row in result.rows() {
        let raw = row.label("date")?;
        let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| TransformError::UnexpectedKey(raw.clone()))?;
        let kind: NotificationType = row.text("type")?.parse()?;
        *by_type.entry(kind).or_default().entry(date).or_default() += row.count("count")?;
    }

    let dates = by_type.values().flat_map(|counts| counts.keys().copied());
    let (Some(first), Some(last)) = (dates.clone().min(), dates.max()) else {
        return Err(TransformError::NoData);
    };
    let days: Vec<NaiveDate> = first.iter_days().take_while(|d| *d <= last).collect();

    let series = by_type
        .iter()
        .map(|(kind, counts)| Series {
            name: kind.label().to_string(),
            values: days
                .iter()
                .map(|d| counts.get(d).copied().unwrap_or(0))
                .collect(),
        })
        .collect();
    let categories = days.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect();

    Ok(Chart::new(
        format!("Daily Notification Trend (Last {} Days)", TREND_DAYS),
        ChartData::Lines { categories, series },
    )
    .with_axes("Date", COUNT_AXIS))
}

/// Monday through Sunday, missing days 0.
pub fn day_of_week(result: &AggregateResult) -> TransformResult<Chart> {
    require_rows(result)?;

    let mut counts = [0u64; 7];
    for row in result.rows() {
        let name = row.label("day_name")?;
        let day = day_from_name(&name).ok_or(TransformError::UnexpectedKey(name))?;
        counts[day.num_days_from_monday() as usize] += row.count("count")?;
    }

    let bars = ISO_WEEK
        .iter()
        .zip(counts)
        .map(|(day, value)| Bar {
            label: day_name(*day).to_string(),
            value,
        })
        .collect();

    Ok(
        Chart::new("Notifications by Day of Week", ChartData::Bars { bars })
            .with_axes("Day of Week", COUNT_AXIS),
    )
}

/// 7 days × 4 time-of-day buckets.
pub fn time_period_heatmap(result: &AggregateResult) -> TransformResult<Chart> {
    require_rows(result)?;

    let mut pivot = Pivot::zeroed(
        ISO_WEEK.iter().map(|d| day_name(*d)),
        TimeOfDay::ALL.iter().map(|b| b.label()),
    );
    for row in result.rows() {
        let name = row.label("day_name")?;
        let day = day_from_name(&name).ok_or(TransformError::UnexpectedKey(name))?;
        let period = row.label("time_period")?;
        let bucket = TimeOfDay::from_label(&period).ok_or(TransformError::UnexpectedKey(period))?;
        pivot.add(day_name(day), bucket.label(), row.count("count")?)?;
    }

    Ok(Chart::new(
        "Notification Heatmap: Day vs Time Period",
        ChartData::Heatmap { pivot },
    )
    .with_axes("Time Period", "Day of Week"))
}

/// One scatter series per type; y is the event's position in the
/// newest-first listing.
pub fn timeline(result: &AggregateResult) -> TransformResult<Chart> {
    require_rows(result)?;

    let mut by_type: BTreeMap<NotificationType, Vec<ScatterPoint>> = BTreeMap::new();
    for (index, row) in result.rows().take(TIMELINE_EVENTS as usize).enumerate() {
        let kind: NotificationType = row.text("type")?.parse()?;
        by_type.entry(kind).or_default().push(ScatterPoint {
            at: row.timestamp("received_at")?,
            index: index as u64,
            label: strip_non_ascii(&row.label("short_body")?),
        });
    }

    let series = by_type
        .into_iter()
        .map(|(kind, points)| ScatterSeries {
            name: kind.label().to_string(),
            points,
        })
        .collect();

    Ok(Chart::new(
        format!("Notification Timeline (Last {})", TIMELINE_EVENTS),
        ChartData::Scatter { series },
    )
    .with_axes("Time", "Notification Index"))
}
