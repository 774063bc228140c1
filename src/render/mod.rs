//! Artifact rendering.
//!
//! Turns a [`Chart`] or an [`AggregateResult`] into a file under the output
//! directory. Writes always replace the target file; a failed write is
//! returned to the caller and never retried.
//!
//! - [`chart`] - SVG chart drawing
//! - [`svg`] - SVG element writer
//! - [`table`] - CSV exports
//! - [`output`] - output directory handling

pub mod chart;
pub mod output;
pub mod svg;
pub mod table;

pub use output::OutputLocation;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::report::Chart;
use crate::store::AggregateResult;

/// Errors raised while writing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("chart '{0}' has nothing to draw")]
    EmptyChart(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Writes artifacts to the filesystem.
pub trait ArtifactRenderer {
    fn write_chart(&self, chart: &Chart, path: &Path) -> RenderResult<()>;

    fn write_table(&self, table: &AggregateResult, path: &Path) -> RenderResult<()>;
}

/// Renders charts as SVG and tables as CSV.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRenderer;

impl ArtifactRenderer for FileRenderer {
    fn write_chart(&self, chart: &Chart, path: &Path) -> RenderResult<()> {
        let svg = chart::render_chart(chart)?;
        fs::write(path, svg).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_table(&self, table: &AggregateResult, path: &Path) -> RenderResult<()> {
        table::write_csv_file(table, path)
    }
}

impl<R: ArtifactRenderer + ?Sized> ArtifactRenderer for &R {
    fn write_chart(&self, chart: &Chart, path: &Path) -> RenderResult<()> {
        (**self).write_chart(chart, path)
    }

    fn write_table(&self, table: &AggregateResult, path: &Path) -> RenderResult<()> {
        (**self).write_table(table, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Bar, ChartData};

    #[test]
    fn test_write_chart_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        std::fs::write(&path, "old").unwrap();

        let chart = Chart::new(
            "Days",
            ChartData::Bars {
                bars: vec![Bar {
                    label: "Monday".into(),
                    value: 3,
                }],
            },
        );
        FileRenderer.write_chart(&chart, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<svg"));
        assert!(written.contains(">Monday</text>"));
    }

    #[test]
    fn test_io_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("chart.svg");
        let chart = Chart::new(
            "Days",
            ChartData::Bars {
                bars: vec![Bar {
                    label: "Monday".into(),
                    value: 3,
                }],
            },
        );

        let err = FileRenderer.write_chart(&chart, &path).unwrap_err();
        assert!(err.to_string().contains("chart.svg"));
    }
}
