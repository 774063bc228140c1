//! SQL generation module.
//!
//! - [`dialect`] - SQL dialect implementations (SQLite, MySQL)
//! - [`query`] - SELECT builder and the executable [`Query`] value

pub mod dialect;
pub mod query;

#[cfg(test)]
pub mod test_utils;

pub use dialect::{Dialect, SqlDialect};
pub use query::{OrderByExpr, Query, Select, SelectExpr};
