//! Query builder - construct aggregation queries with a fluent API.
//!
//! Expressions are SQL fragments produced by a [`SqlDialect`]; the builder
//! only arranges them into clauses and quotes the table name and aliases.

use std::fmt;

use super::dialect::{Dialect, SqlDialect};

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectExpr {
    pub expr: String,
    pub alias: Option<String>,
}

/// An ORDER BY item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: String,
    pub descending: bool,
}

/// A single-table aggregation SELECT.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct Select {
    table: String,
    columns: Vec<SelectExpr>,
    filter: Option<String>,
    group_by: Vec<String>,
    order_by: Vec<OrderByExpr>,
    limit: Option<u64>,
}

impl Select {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            filter: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn column(mut self, expr: impl Into<String>) -> Self {
        self.columns.push(SelectExpr {
            expr: expr.into(),
            alias: None,
        });
        self
    }

    pub fn column_as(mut self, expr: impl Into<String>, alias: &str) -> Self {
        self.columns.push(SelectExpr {
            expr: expr.into(),
            alias: Some(alias.into()),
        });
        self
    }

    /// WHERE clause. Calling it twice ANDs the conditions.
    pub fn filter(mut self, condition: impl Into<String>) -> Self {
        let condition = condition.into();
        self.filter = Some(match self.filter.take() {
            Some(existing) => format!("{} AND {}", existing, condition),
            None => condition,
        });
        self
    }

    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.group_by.push(expr.into());
        self
    }

    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.order_by.push(OrderByExpr {
            expr: expr.into(),
            descending: false,
        });
        self
    }

    pub fn order_by_desc(mut self, expr: impl Into<String>) -> Self {
        self.order_by.push(OrderByExpr {
            expr: expr.into(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the statement, one clause per line.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| match &c.alias {
                Some(alias) => format!("{} AS {}", c.expr, dialect.quote_identifier(alias)),
                None => c.expr.clone(),
            })
            .collect();

        let mut lines = vec![
            format!("SELECT {}", columns.join(", ")),
            format!("FROM {}", dialect.quote_identifier(&self.table)),
        ];

        if let Some(filter) = &self.filter {
            lines.push(format!("WHERE {}", filter));
        }

        if !self.group_by.is_empty() {
            lines.push(format!("GROUP BY {}", self.group_by.join(", ")));
        }

        if !self.order_by.is_empty() {
            let items: Vec<String> = self
                .order_by
                .iter()
                .map(|o| {
                    if o.descending {
                        format!("{} DESC", o.expr)
                    } else {
                        o.expr.clone()
                    }
                })
                .collect();
            lines.push(format!("ORDER BY {}", items.join(", ")));
        }

        if let Some(limit) = self.limit {
            lines.push(dialect.emit_limit(limit));
        }

        lines.join("\n")
    }
}

/// A fully-formed query ready for an event store.
///
/// The store executes `sql` as-is; `label` names the query in errors and logs.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    label: String,
    sql: String,
}

impl Query {
    pub fn new(label: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sql: sql.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-- {}\n{};", self.label, self.sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_select_all_clauses() {
        let sql = Select::from("notifications")
            .column("\"type\"")
            .column_as("COUNT(*)", "count")
            .filter("\"received_at\" >= '2026-10-01'")
            .filter("\"source\" = 'Instagram'")
            .group_by("\"type\"")
            .order_by_desc("\"count\"")
            .order_by("\"type\"")
            .limit(10)
            .to_sql(Dialect::Sqlite);

        assert_snapshot!(sql, @r#"
        SELECT "type", COUNT(*) AS "count"
        FROM "notifications"
        WHERE "received_at" >= '2026-10-01' AND "source" = 'Instagram'
        GROUP BY "type"
        ORDER BY "count" DESC, "type"
        LIMIT 10
        "#);
    }

    #[test]
    fn test_select_quotes_per_dialect() {
        let sql = Select::from("notifications")
            .column_as("COUNT(*)", "total")
            .to_sql(Dialect::MySql);
        assert_eq!(sql, "SELECT COUNT(*) AS `total`\nFROM `notifications`");
    }

    #[test]
    fn test_query_display() {
        let query = Query::new("totals", "SELECT 1");
        assert_eq!(query.to_string(), "-- totals\nSELECT 1;");
        assert_eq!(query.label(), "totals");
        assert_eq!(query.sql(), "SELECT 1");
    }
}
