//! Delimited exports.

use std::io::Write;
use std::path::Path;

use super::{RenderError, RenderResult};
use crate::store::AggregateResult;

/// Write `result` as CSV: a header row, then one record per row in query
/// order. NULL cells are written empty; lines end with `\n`.
pub fn write_csv<W: Write>(result: &AggregateResult, writer: W) -> RenderResult<()> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(result.columns())?;
    for row in result.rows() {
        csv.write_record(row.values().iter().map(|v| v.to_string()))?;
    }
    csv.flush().map_err(|e| RenderError::Csv(e.into()))?;
    Ok(())
}

/// Write `result` to `path`, replacing any existing file.
pub fn write_csv_file(result: &AggregateResult, path: &Path) -> RenderResult<()> {
    let file = std::fs::File::create(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(result, std::io::BufWriter::new(file))
}
