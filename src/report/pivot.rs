//! Fixed-shape count matrices.

use serde::Serialize;

use super::{TransformError, TransformResult};

/// Counts laid out over fixed, ordered row and column labels.
///
/// Every (row, column) cell exists from construction; cells never seen in the
/// source rows stay 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pivot {
    rows: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Vec<u64>>,
}

impl Pivot {
    pub fn zeroed<R, C>(rows: R, columns: C) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows: Vec<String> = rows.into_iter().map(Into::into).collect();
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let cells = vec![vec![0; columns.len()]; rows.len()];
        Self {
            rows,
            columns,
            cells,
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Add `count` to a cell. Labels outside the fixed axes are rejected.
    pub fn add(&mut self, row: &str, column: &str, count: u64) -> TransformResult<()> {
        let r = self
            .rows
            .iter()
            .position(|l| l == row)
            .ok_or_else(|| TransformError::UnexpectedKey(row.to_string()))?;
        let c = self
            .columns
            .iter()
            .position(|l| l == column)
            .ok_or_else(|| TransformError::UnexpectedKey(column.to_string()))?;
        self.cells[r][c] += count;
        Ok(())
    }

    pub fn get(&self, row: &str, column: &str) -> Option<u64> {
        let r = self.rows.iter().position(|l| l == row)?;
        let c = self.columns.iter().position(|l| l == column)?;
        Some(self.cells[r][c])
    }

    /// Row-major cell values.
    pub fn cells(&self) -> &[Vec<u64>] {
        &self.cells
    }

    pub fn max(&self) -> u64 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }
}
