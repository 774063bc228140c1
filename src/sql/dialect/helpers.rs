//! Shared helper functions for SQL dialect implementations.
//!
//! Reusable building blocks that dialects compose to implement the
//! `SqlDialect` trait with minimal duplication.

use chrono::Weekday;

use crate::calendar;

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: SQLite
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
/// Used by: All dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Date/Time
// =============================================================================

/// Day order of SQLite's `strftime('%w')`, Sunday = 0.
pub const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// `CASE <number> WHEN 0 THEN 'Sunday' ... END` mapping a Sunday-first day
/// number to its English name.
pub fn day_name_case(day_number: &str) -> String {
    let arms: Vec<String> = SUNDAY_FIRST
        .iter()
        .enumerate()
        .map(|(n, day)| format!("WHEN {} THEN {}", n, quote_string_single(calendar::day_name(*day))))
        .collect();
    format!("CASE {} {} END", day_number, arms.join(" "))
}
