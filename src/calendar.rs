//! Calendar vocabulary shared by the SQL layer and the report transforms.
//!
//! Day names and time-of-day buckets are defined once here so the SQL that
//! groups by them and the Rust code that pivots the results cannot drift.

use std::ops::RangeInclusive;

use chrono::Weekday;

/// ISO week order, Monday first.
pub const ISO_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// English day name as produced by the store's day-name function.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Inverse of [`day_name`], case-insensitive.
pub fn day_from_name(name: &str) -> Option<Weekday> {
    let name = name.trim();
    ISO_WEEK
        .into_iter()
        .find(|day| day_name(*day).eq_ignore_ascii_case(name))
}

/// Fixed time-of-day bucket used by the day×period heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Heatmap column order.
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    /// Inclusive hour range covered by the bucket.
    ///
    /// Night is the complement of the other three.
    pub fn hours(self) -> RangeInclusive<u32> {
        match self {
            TimeOfDay::Morning => 6..=11,
            TimeOfDay::Afternoon => 12..=17,
            TimeOfDay::Evening => 18..=23,
            TimeOfDay::Night => 0..=5,
        }
    }

    /// Bucket for an hour of day, `None` outside 0..=23.
    pub fn from_hour(hour: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.hours().contains(&hour))
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.label().eq_ignore_ascii_case(label))
    }

    /// Whether SQL should emit this bucket as the `ELSE` branch.
    pub fn is_complement(self) -> bool {
        self == TimeOfDay::Night
    }
}
