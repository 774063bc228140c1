//! MySQL SQL dialect.
//!
//! MySQL differences from SQLite:
//! - Backtick identifier quoting (`` `name` ``)
//! - Native `HOUR()`, `DATE()`, `DAYNAME()`, `WEEKDAY()` (Monday = 0)
//! - `YEARWEEK(x, 3)` yields ISO year and week as one number
//! - `||` is logical OR by default (use CONCAT())
//! - Interval arithmetic through `DATE_SUB`

use super::helpers;
use super::SqlDialect;

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn left_chars(&self, expr: &str, len: u32) -> String {
        format!("SUBSTRING({}, 1, {})", expr, len)
    }

    fn concat(&self, parts: &[&str]) -> String {
        format!("CONCAT({})", parts.join(", "))
    }

    fn hour_of(&self, expr: &str) -> String {
        format!("HOUR({})", expr)
    }

    fn date_of(&self, expr: &str) -> String {
        format!("DATE({})", expr)
    }

    fn day_name_of(&self, expr: &str) -> String {
        format!("DAYNAME({})", expr)
    }

    fn iso_weekday_of(&self, expr: &str) -> String {
        format!("(WEEKDAY({}) + 1)", expr)
    }

    fn iso_year_week_of(&self, expr: &str) -> String {
        let year_week = format!("YEARWEEK({}, 3)", expr);
        let year = format!("LEFT({}, 4)", year_week);
        let week = format!("RIGHT({}, 2)", year_week);
        self.concat(&[&year, "'-W'", &week])
    }

    fn days_before(&self, expr: &str, days: u32) -> String {
        format!("DATE_SUB({}, INTERVAL {} DAY)", expr, days)
    }

    fn date_days_before(&self, expr: &str, days: u32) -> String {
        format!("DATE_SUB(DATE({}), INTERVAL {} DAY)", expr, days)
    }
}
