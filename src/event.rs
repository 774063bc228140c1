//! Notification event model.
//!
//! Events are owned by the external event store; the pipeline only reads
//! them. Timestamps are timezone-naive with second precision.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Text layout of `received_at` in the store.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source label applied when the sender does not name one.
pub const DEFAULT_SOURCE: &str = "Instagram";

/// Accepted layouts when reading timestamps back from the store.
const TIMESTAMP_LAYOUTS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Error returned when a `type` value is not a known notification type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification type: {0}")]
pub struct UnknownNotificationType(pub String);

/// Delivery type of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// Delivered while the app was in the foreground.
    Foreground,
    /// Delivered by the service worker while the app was in the background.
    Background,
}

impl NotificationType {
    /// All types, in the order used for chart series and pivot columns.
    pub const ALL: [NotificationType; 2] = [NotificationType::Foreground, NotificationType::Background];

    /// Value stored in the `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Foreground => "foreground",
            NotificationType::Background => "background",
        }
    }

    /// Capitalized label for legends and chart slices.
    pub fn label(&self) -> &'static str {
        match self {
            NotificationType::Foreground => "Foreground",
            NotificationType::Background => "Background",
        }
    }
}

impl FromStr for NotificationType {
    type Err = UnknownNotificationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "foreground" => Ok(NotificationType::Foreground),
            "background" => Ok(NotificationType::Background),
            other => Err(UnknownNotificationType(other.to_string())),
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single notification-delivery record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationEvent {
    pub id: i64,
    pub title: String,
    pub body: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub source: String,
    pub received_at: NaiveDateTime,
}

/// Parse a store timestamp.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
}

/// Format a timestamp the way the store writes it.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
