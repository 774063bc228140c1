//! Renderer-independent chart descriptions.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::Pivot;

/// One slice of a proportional chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: u64,
    /// Share of the total, 0-100.
    pub percent: f64,
}

/// One labelled bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: u64,
}

/// A named series of values aligned with the chart's categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScatterPoint {
    pub at: NaiveDateTime,
    /// Recency index, 0 for the newest event.
    pub index: u64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScatterSeries {
    pub name: String,
    pub points: Vec<ScatterPoint>,
}

/// Chart payload, one variant per chart kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    /// Pie chart.
    Shares { slices: Vec<Share> },
    /// Grouped vertical bars: pivot rows are x categories, columns are series.
    GroupedBars { pivot: Pivot },
    /// Horizontal bars, first bar at the top, with value labels.
    RankedBars { bars: Vec<Bar> },
    /// Multi-series line chart.
    Lines {
        categories: Vec<String>,
        series: Vec<Series>,
    },
    /// Vertical bars with value labels.
    Bars { bars: Vec<Bar> },
    /// Annotated heatmap.
    Heatmap { pivot: Pivot },
    /// Time on x, recency index on y.
    Scatter { series: Vec<ScatterSeries> },
}

impl ChartData {
    pub fn kind(&self) -> &'static str {
        match self {
            ChartData::Shares { .. } => "pie",
            ChartData::GroupedBars { .. } => "grouped bars",
            ChartData::RankedBars { .. } => "horizontal bars",
            ChartData::Lines { .. } => "lines",
            ChartData::Bars { .. } => "bars",
            ChartData::Heatmap { .. } => "heatmap",
            ChartData::Scatter { .. } => "scatter",
        }
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Shares { slices } => slices.is_empty(),
            ChartData::GroupedBars { pivot } | ChartData::Heatmap { pivot } => {
                pivot.rows().is_empty() || pivot.columns().is_empty()
            }
            ChartData::RankedBars { bars } | ChartData::Bars { bars } => bars.is_empty(),
            ChartData::Lines { categories, series } => categories.is_empty() || series.is_empty(),
            ChartData::Scatter { series } => series.iter().all(|s| s.points.is_empty()),
        }
    }
}

/// A chart ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
}

impl Chart {
    pub fn new(title: impl Into<String>, data: ChartData) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            data,
        }
    }

    pub fn with_axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }
}
