//! SQLite SQL dialect.
//!
//! SQLite has no dedicated date types; timestamps are `YYYY-MM-DD HH:MM:SS`
//! text and every extraction goes through `strftime`/`date`/`datetime`:
//! - Double-quote identifier quoting
//! - `strftime('%w')` numbers days Sunday = 0
//! - No ISO week directive on older builds, so the ISO week is derived from
//!   the Thursday of the same Monday-based week

use super::helpers;
use super::SqlDialect;

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl Sqlite {
    fn sunday_first_day(expr: &str) -> String {
        format!("CAST(strftime('%w', {}) AS INTEGER)", expr)
    }

    /// Thursday of the ISO week containing `expr`; fixes both ISO year and week.
    fn week_thursday_args(expr: &str) -> String {
        format!("{}, '-3 days', 'weekday 4'", expr)
    }
}

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn left_chars(&self, expr: &str, len: u32) -> String {
        format!("substr({}, 1, {})", expr, len)
    }

    fn timestamp_of(&self, expr: &str) -> String {
        format!("datetime({})", expr)
    }

    fn hour_of(&self, expr: &str) -> String {
        format!("CAST(strftime('%H', {}) AS INTEGER)", expr)
    }

    fn date_of(&self, expr: &str) -> String {
        format!("date({})", expr)
    }

    fn day_name_of(&self, expr: &str) -> String {
        helpers::day_name_case(&Self::sunday_first_day(expr))
    }

    fn iso_weekday_of(&self, expr: &str) -> String {
        format!("(({} + 6) % 7 + 1)", Self::sunday_first_day(expr))
    }

    fn iso_year_week_of(&self, expr: &str) -> String {
        let thursday = Self::week_thursday_args(expr);
        let year = format!("strftime('%Y', {})", thursday);
        let week = format!(
            "printf('%02d', (CAST(strftime('%j', {}) AS INTEGER) - 1) / 7 + 1)",
            thursday
        );
        self.concat(&[&year, "'-W'", &week])
    }

    fn days_before(&self, expr: &str, days: u32) -> String {
        format!("datetime({}, '-{} days')", expr, days)
    }

    fn date_days_before(&self, expr: &str, days: u32) -> String {
        format!("date({}, '-{} days')", expr, days)
    }
}
