//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for the dialect differences
//! the report queries run into. Each dialect implements `SqlDialect`:
//!
//! - Identifier quoting: `"` (SQLite), `` ` `` (MySQL)
//! - Hour, date, day name and ISO weekday extraction
//! - ISO year-week labels
//! - Relative date arithmetic ("N days before")
//! - Substring and concatenation
//!
//! # Usage
//!
//! ```
//! use notification_analytics::sql::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::MySql;
//! assert_eq!(dialect.hour_of("received_at"), "HOUR(received_at)");
//! ```
//!
//! Only the SQLite dialect is executed by the bundled event store. The MySQL
//! dialect renders the same queries for stores that still live in MySQL.

pub mod helpers;
mod mysql;
mod sqlite;

pub use mysql::MySql;
pub use sqlite::Sqlite;

use chrono::NaiveDateTime;

use crate::event::TIMESTAMP_FORMAT;

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Expression arguments are already-rendered SQL fragments; the dialect never
/// inspects them.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (table, column, alias).
    ///
    /// - SQLite: `"identifier"`
    /// - MySQL: `` `identifier` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a timestamp literal.
    ///
    /// Both supported dialects accept `'YYYY-MM-DD HH:MM:SS'` wherever a
    /// datetime is expected.
    fn format_timestamp(&self, ts: &NaiveDateTime) -> String {
        self.quote_string(&ts.format(TIMESTAMP_FORMAT).to_string())
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Emit a LIMIT clause.
    fn emit_limit(&self, limit: u64) -> String {
        format!("LIMIT {}", limit)
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// First `len` characters of a text expression.
    fn left_chars(&self, expr: &str, len: u32) -> String;

    /// String concatenation.
    ///
    /// - SQLite: `a || b`
    /// - MySQL: `CONCAT(a, b)` (`||` is logical OR by default)
    fn concat(&self, parts: &[&str]) -> String {
        parts.join(" || ")
    }

    // =========================================================================
    // Date/Time
    // =========================================================================

    /// A stored timestamp in comparable `YYYY-MM-DD HH:MM:SS` form.
    ///
    /// - SQLite: `datetime(expr)`, since text timestamps may use a `T`
    ///   separator or fractional seconds
    /// - MySQL: unchanged (native `DATETIME`)
    fn timestamp_of(&self, expr: &str) -> String {
        expr.to_string()
    }

    /// Hour of day, 0-23, as an integer.
    fn hour_of(&self, expr: &str) -> String;

    /// Calendar date (`YYYY-MM-DD`) of a timestamp.
    fn date_of(&self, expr: &str) -> String;

    /// English day name (`Monday` .. `Sunday`).
    fn day_name_of(&self, expr: &str) -> String;

    /// ISO day number, Monday = 1 .. Sunday = 7.
    fn iso_weekday_of(&self, expr: &str) -> String;

    /// ISO year-week label, `YYYY-Www`.
    fn iso_year_week_of(&self, expr: &str) -> String;

    /// Timestamp `days` days before `expr`.
    fn days_before(&self, expr: &str, days: u32) -> String;

    /// Midnight of the date `days` days before the date of `expr`.
    fn date_days_before(&self, expr: &str, days: u32) -> String;
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Sqlite,
    MySql,
}

impl Dialect {
    /// All dialects, for listing and tests.
    pub const ALL: [Dialect; 2] = [Dialect::Sqlite, Dialect::MySql];

    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Sqlite => &Sqlite,
            Dialect::MySql => &MySql,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_timestamp(&self, ts: &NaiveDateTime) -> String {
        self.dialect().format_timestamp(ts)
    }

    fn emit_limit(&self, limit: u64) -> String {
        self.dialect().emit_limit(limit)
    }

    fn left_chars(&self, expr: &str, len: u32) -> String {
        self.dialect().left_chars(expr, len)
    }

    fn concat(&self, parts: &[&str]) -> String {
        self.dialect().concat(parts)
    }

    fn timestamp_of(&self, expr: &str) -> String {
        self.dialect().timestamp_of(expr)
    }

    fn hour_of(&self, expr: &str) -> String {
        self.dialect().hour_of(expr)
    }

    fn date_of(&self, expr: &str) -> String {
        self.dialect().date_of(expr)
    }

    fn day_name_of(&self, expr: &str) -> String {
        self.dialect().day_name_of(expr)
    }

    fn iso_weekday_of(&self, expr: &str) -> String {
        self.dialect().iso_weekday_of(expr)
    }

    fn iso_year_week_of(&self, expr: &str) -> String {
        self.dialect().iso_year_week_of(expr)
    }

    fn days_before(&self, expr: &str, days: u32) -> String {
        self.dialect().days_before(expr, days)
    }

    fn date_days_before(&self, expr: &str, days: u32) -> String {
        self.dialect().date_days_before(expr, days)
    }
}
