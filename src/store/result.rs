//! Tabular query results.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::event::parse_timestamp;

/// Error raised when a row does not hold what a reader expects.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColumnError {
    #[error("result has no column '{0}'")]
    Missing(String),

    #[error("column '{column}' holds {found}, expected {expected}")]
    Type {
        column: String,
        expected: &'static str,
        found: String,
    },
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn describe(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => format!("integer {}", i),
            Value::Real(f) => format!("real {}", f),
            Value::Text(s) => format!("text '{}'", s),
        }
    }
}

impl fmt::Display for Value {
    /// Plain rendering used for CSV cells and labels; NULL renders empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<rusqlite::types::ValueRef<'_>> for Value {
    fn from(value: rusqlite::types::ValueRef<'_>) -> Self {
        use rusqlite::types::ValueRef;

        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Value::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

/// Ordered rows with named columns, as returned by an event store.
///
/// Built once per query and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AggregateResult {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl AggregateResult {
    /// Build a result; every row must have one value per column.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Rows in query order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub fn first(&self) -> Option<Row<'_>> {
        self.rows().next()
    }
}

/// Borrowed view of one result row with typed accessors.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    pub fn get(&self, column: &str) -> Result<&'a Value, ColumnError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
            .ok_or_else(|| ColumnError::Missing(column.to_string()))
    }

    fn mismatch(column: &str, expected: &'static str, found: &Value) -> ColumnError {
        ColumnError::Type {
            column: column.to_string(),
            expected,
            found: found.describe(),
        }
    }

    /// Integer value; integral reals and numeric text are accepted.
    pub fn integer(&self, column: &str) -> Result<i64, ColumnError> {
        let value = self.get(column)?;
        match value {
            Value::Integer(i) => Ok(*i),
            Value::Real(f) if f.fract() == 0.0 => Ok(*f as i64),
            Value::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| Self::mismatch(column, "integer", value)),
            _ => Err(Self::mismatch(column, "integer", value)),
        }
    }

    /// Non-negative integer, as produced by COUNT/SUM aggregates.
    pub fn count(&self, column: &str) -> Result<u64, ColumnError> {
        let n = self.integer(column)?;
        u64::try_from(n).map_err(|_| Self::mismatch(column, "non-negative count", &Value::Integer(n)))
    }

    /// Like [`Row::count`], but NULL (an aggregate over zero rows) reads as 0.
    pub fn count_or_zero(&self, column: &str) -> Result<u64, ColumnError> {
        if self.get(column)?.is_null() {
            return Ok(0);
        }
        self.count(column)
    }

    pub fn text(&self, column: &str) -> Result<&'a str, ColumnError> {
        let value = self.get(column)?;
        match value {
            Value::Text(s) => Ok(s.as_str()),
            _ => Err(Self::mismatch(column, "text", value)),
        }
    }

    /// Any non-NULL value rendered as a label.
    pub fn label(&self, column: &str) -> Result<String, ColumnError> {
        let value = self.get(column)?;
        if value.is_null() {
            return Err(Self::mismatch(column, "non-null value", value));
        }
        Ok(value.to_string())
    }

    pub fn timestamp(&self, column: &str) -> Result<NaiveDateTime, ColumnError> {
        let value = self.get(column)?;
        match value {
            Value::Text(s) => parse_timestamp(s).ok_or_else(|| Self::mismatch(column, "timestamp", value)),
            _ => Err(Self::mismatch(column, "timestamp", value)),
        }
    }

    pub fn optional_timestamp(&self, column: &str) -> Result<Option<NaiveDateTime>, ColumnError> {
        if self.get(column)?.is_null() {
            return Ok(None);
        }
        self.timestamp(column).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AggregateResult {
        AggregateResult::from_rows(
            vec!["hour".into(), "type".into(), "count".into(), "at".into()],
            vec![
                vec![
                    Value::Integer(9),
                    Value::Text("foreground".into()),
                    Value::Integer(3),
                    Value::Text("2026-10-19 09:15:00".into()),
                ],
                vec![
                    Value::Integer(23),
                    Value::Text("background".into()),
                    Value::Real(2.0),
                    Value::Null,
                ],
            ],
        )
    }

    #[test]
    fn test_shape() {
        let result = sample();
        assert_eq!(result.len(), 2);
        assert!(!result.is_empty());
        assert_eq!(result.column_index("count"), Some(2));
        assert_eq!(result.column_index("missing"), None);
        assert!(AggregateResult::default().is_empty());
    }

    #[test]
    fn test_typed_accessors() {
        let result = sample();
        let rows: Vec<_> = result.rows().collect();

        assert_eq!(rows[0].integer("hour").unwrap(), 9);
        assert_eq!(rows[0].text("type").unwrap(), "foreground");
        assert_eq!(rows[0].count("count").unwrap(), 3);
        assert_eq!(rows[1].count("count").unwrap(), 2);
        assert_eq!(
            rows[0].timestamp("at").unwrap().to_string(),
            "2026-10-19 09:15:00"
        );
        assert_eq!(rows[1].optional_timestamp("at").unwrap(), None);
    }

    #[test]
    fn test_accessor_errors() {
        let result = sample();
        let row = result.first().unwrap();

        assert_eq!(row.get("nope"), Err(ColumnError::Missing("nope".into())));
        assert!(matches!(row.text("hour"), Err(ColumnError::Type { .. })));
        assert!(matches!(row.timestamp("type"), Err(ColumnError::Type { .. })));
    }

    #[test]
    fn test_negative_count_rejected() {
        let result = AggregateResult::from_rows(vec!["count".into()], vec![vec![Value::Integer(-1)]]);
        let row = result.first().unwrap();
        assert!(row.count("count").is_err());
    }

    #[test]
    fn test_count_or_zero_reads_null() {
        let result = AggregateResult::from_rows(vec!["n".into()], vec![vec![Value::Null]]);
        assert_eq!(result.first().unwrap().count_or_zero("n").unwrap(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Real(2.5).to_string(), "2.5");
        assert_eq!(Value::Text("a,b".into()).to_string(), "a,b");
    }
}
