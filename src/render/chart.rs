//! Chart drawing.
//!
//! Every chart kind is laid out on a fixed canvas with a title, a plot frame
//! and axis labels. Output depends only on the chart value.

use chrono::NaiveDateTime;

use super::svg::{num, Anchor, Paint, SvgDocument, TextStyle};
use super::{RenderError, RenderResult};
use crate::event::NotificationType;
use crate::report::{Bar, Chart, ChartData, Pivot, ScatterSeries, Series, Share};

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 600.0;

pub const PRIMARY: &str = "#667eea";
pub const SECONDARY: &str = "#764ba2";
const EXTRA_SERIES: [&str; 4] = ["#f5a623", "#2bb673", "#e94e77", "#4a90d9"];
const GRID: &str = "#e0e0e0";
const AXIS: &str = "#555555";

const VIRIDIS: [&str; 5] = ["#440154", "#3b528b", "#21918c", "#5ec962", "#fde725"];
const YL_OR_RD: [&str; 9] = [
    "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#bd0026",
    "#800026",
];

/// Render a chart to SVG text.
pub fn render_chart(chart: &Chart) -> RenderResult<String> {
    if chart.data.is_empty() {
        return Err(RenderError::EmptyChart(chart.title.clone()));
    }

    let mut doc = SvgDocument::new(WIDTH, HEIGHT);
    doc.text(
        WIDTH / 2.0,
        36.0,
        &chart.title,
        TextStyle::sized(20.0).anchor(Anchor::Middle).bold(),
    );

    match &chart.data {
        ChartData::Shares { slices } => draw_pie(&mut doc, slices),
        ChartData::GroupedBars { pivot } => draw_grouped_bars(&mut doc, chart, pivot),
        ChartData::RankedBars { bars } => draw_ranked_bars(&mut doc, chart, bars),
        ChartData::Lines { categories, series } => draw_lines(&mut doc, chart, categories, series),
        ChartData::Bars { bars } => draw_bars(&mut doc, chart, bars),
        ChartData::Heatmap { pivot } => draw_heatmap(&mut doc, chart, pivot),
        ChartData::Scatter { series } => draw_scatter(&mut doc, chart, series),
    }

    Ok(doc.finish())
}

// ============================================================================
// Layout
// ============================================================================

/// Plot area inside the canvas.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn with_left_margin(left: f64) -> Self {
        let (top, right, bottom) = (70.0, 160.0, 100.0);
        Self {
            left,
            top,
            width: WIDTH - left - right,
            height: HEIGHT - top - bottom,
        }
    }

    fn standard() -> Self {
        Self::with_left_margin(90.0)
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Smallest 1/2/5 × 10^k at or above `max`.
fn nice_max(max: u64) -> f64 {
    if max == 0 {
        return 1.0;
    }
    let max = max as f64;
    let magnitude = 10f64.powf(max.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|candidate| *candidate >= max)
        .unwrap_or(10.0 * magnitude)
}

fn axis_labels(doc: &mut SvgDocument, frame: Frame, chart: &Chart) {
    let style = TextStyle::sized(13.0).anchor(Anchor::Middle);
    if !chart.x_label.is_empty() {
        doc.text(
            frame.left + frame.width / 2.0,
            HEIGHT - 18.0,
            &chart.x_label,
            style,
        );
    }
    if !chart.y_label.is_empty() {
        let x = 22.0;
        let y = frame.top + frame.height / 2.0;
        doc.text(x, y, &chart.y_label, style.rotate(-90.0));
    }
}

/// Horizontal grid with value ticks; returns the axis maximum.
fn value_axis_y(doc: &mut SvgDocument, frame: Frame, max: u64) -> f64 {
    let top = nice_max(max);
    for i in 0..=5 {
        let value = top * i as f64 / 5.0;
        let y = frame.bottom() - frame.height * i as f64 / 5.0;
        doc.line(frame.left, y, frame.right(), y, GRID, 1.0);
        doc.text(
            frame.left - 8.0,
            y + 4.0,
            &num(value),
            TextStyle::sized(11.0).anchor(Anchor::End),
        );
    }
    doc.line(frame.left, frame.top, frame.left, frame.bottom(), AXIS, 1.0);
    top
}

/// Vertical grid with value ticks along the bottom; returns the axis maximum.
fn value_axis_x(doc: &mut SvgDocument, frame: Frame, max: u64) -> f64 {
    let top = nice_max(max);
    for i in 0..=5 {
        let value = top * i as f64 / 5.0;
        let x = frame.left + frame.width * i as f64 / 5.0;
        doc.line(x, frame.top, x, frame.bottom(), GRID, 1.0);
        doc.text(
            x,
            frame.bottom() + 18.0,
            &num(value),
            TextStyle::sized(11.0).anchor(Anchor::Middle),
        );
    }
    doc.line(frame.left, frame.bottom(), frame.right(), frame.bottom(), AXIS, 1.0);
    top
}

fn legend(doc: &mut SvgDocument, frame: Frame, title: &str, entries: &[(String, String)]) {
    let x = frame.right() + 20.0;
    let mut y = frame.top + 10.0;
    doc.text(x, y, title, TextStyle::sized(12.0).bold());
    for (label, color) in entries {
        y += 22.0;
        doc.rect(x, y - 11.0, 14.0, 14.0, &Paint::fill(color.as_str()));
        doc.text(x + 20.0, y, label, TextStyle::sized(12.0));
    }
}

// ============================================================================
// Colors
// ============================================================================

fn series_color(name: &str, index: usize) -> String {
    match name.parse::<NotificationType>() {
        Ok(NotificationType::Foreground) => PRIMARY.to_string(),
        Ok(NotificationType::Background) => SECONDARY.to_string(),
        Err(_) => EXTRA_SERIES[index % EXTRA_SERIES.len()].to_string(),
    }
}

fn parse_hex(color: &str) -> (f64, f64, f64) {
    let channel = |i: usize| {
        color
            .get(i..i + 2)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .unwrap_or(0) as f64
    };
    (channel(1), channel(3), channel(5))
}

/// Linear interpolation along a list of color stops, `t` in 0..=1.
fn color_ramp(stops: &[&str], t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (stops.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(stops.len() - 1);
    let upper = (lower + 1).min(stops.len() - 1);
    let frac = scaled - lower as f64;

    let (r1, g1, b1) = parse_hex(stops[lower]);
    let (r2, g2, b2) = parse_hex(stops[upper]);
    let mix = |a: f64, b: f64| (a + (b - a) * frac).round() as u8;
    format!("#{:02x}{:02x}{:02x}", mix(r1, r2), mix(g1, g2), mix(b1, b2))
}

pub fn viridis(t: f64) -> String {
    color_ramp(&VIRIDIS, t)
}

pub fn yl_or_rd(t: f64) -> String {
    color_ramp(&YL_OR_RD, t)
}

// ============================================================================
// Chart kinds
// ============================================================================

fn draw_pie(doc: &mut SvgDocument, slices: &[Share]) {
    let (cx, cy, r) = (WIDTH / 2.0, HEIGHT / 2.0 + 20.0, 200.0);
    let total: u64 = slices.iter().map(|s| s.count).sum();
    let point = |angle: f64, radius: f64| (cx + radius * angle.sin(), cy - radius * angle.cos());

    let mut start = 0.0f64;
    for (i, slice) in slices.iter().enumerate() {
        let color = series_color(&slice.label, i);
        let sweep = std::f64::consts::TAU * slice.count as f64 / total.max(1) as f64;
        let end = start + sweep;

        if slices.len() == 1 || sweep >= std::f64::consts::TAU {
            doc.circle(cx, cy, r, &Paint::fill(color).stroke("#ffffff", 2.0));
        } else if sweep > 0.0 {
            let (x1, y1) = point(start, r);
            let (x2, y2) = point(end, r);
            let large_arc = if sweep > std::f64::consts::PI { 1 } else { 0 };
            let d = format!(
                "M {} {} L {} {} A {} {} 0 {} 1 {} {} Z",
                num(cx),
                num(cy),
                num(x1),
                num(y1),
                num(r),
                num(r),
                large_arc,
                num(x2),
                num(y2)
            );
            doc.path(&d, &Paint::fill(color).stroke("#ffffff", 2.0));
        }

        let middle = start + sweep / 2.0;
        let (lx, ly) = point(middle, r + 30.0);
        let anchor = if middle.sin() >= 0.0 { Anchor::Start } else { Anchor::End };
        doc.text(lx, ly, &slice.label, TextStyle::sized(14.0).anchor(anchor).bold());
        let (px, py) = point(middle, r * 0.6);
        doc.text(
            px,
            py,
            &format!("{:.1}%", slice.percent),
            TextStyle::sized(14.0).anchor(Anchor::Middle).fill("#ffffff").bold(),
        );

        start = end;
    }
}

fn draw_grouped_bars(doc: &mut SvgDocument, chart: &Chart, pivot: &Pivot) {
    let frame = Frame::standard();
    let top = value_axis_y(doc, frame, pivot.max());
    axis_labels(doc, frame, chart);

    let groups = pivot.rows().len() as f64;
    let group_width = frame.width / groups;
    let bar_width = group_width * 0.8 / pivot.columns().len() as f64;
    let colors: Vec<String> = pivot
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| series_color(c, i))
        .collect();

    for (row, (label, values)) in pivot.rows().iter().zip(pivot.cells()).enumerate() {
        let group_left = frame.left + group_width * row as f64 + group_width * 0.1;
        for (col, value) in values.iter().enumerate() {
            let height = frame.height * *value as f64 / top;
            doc.rect(
                group_left + bar_width * col as f64,
                frame.bottom() - height,
                bar_width,
                height,
                &Paint::fill(colors[col].as_str()),
            );
        }
        doc.text(
            frame.left + group_width * (row as f64 + 0.5),
            frame.bottom() + 18.0,
            label,
            TextStyle::sized(11.0).anchor(Anchor::Middle),
        );
    }

    let entries: Vec<(String, String)> = pivot.columns().iter().cloned().zip(colors).collect();
    legend(doc, frame, "Type", &entries);
}

fn draw_ranked_bars(doc: &mut SvgDocument, chart: &Chart, bars: &[Bar]) {
    let frame = Frame::with_left_margin(330.0);
    let max = bars.iter().map(|b| b.value).max().unwrap_or(0);
    let top = value_axis_x(doc, frame, max);
    axis_labels(doc, frame, chart);

    let band = frame.height / bars.len() as f64;
    let last = (bars.len().max(2) - 1) as f64;
    for (i, bar) in bars.iter().enumerate() {
        let y = frame.top + band * i as f64 + band * 0.15;
        let width = frame.width * bar.value as f64 / top;
        doc.rect(
            frame.left,
            y,
            width,
            band * 0.7,
            &Paint::fill(viridis(i as f64 / last)),
        );
        let middle = y + band * 0.35 + 4.0;
        doc.text(
            frame.left - 8.0,
            middle,
            &bar.label,
            TextStyle::sized(11.0).anchor(Anchor::End),
        );
        doc.text(
            frame.left + width + 6.0,
            middle,
            &bar.value.to_string(),
            TextStyle::sized(11.0).bold(),
        );
    }
}

fn draw_lines(doc: &mut SvgDocument, chart: &Chart, categories: &[String], series: &[Series]) {
    let frame = Frame::standard();
    let max = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .max()
        .unwrap_or(0);
    let top = value_axis_y(doc, frame, max);
    axis_labels(doc, frame, chart);

    let step = frame.width / categories.len() as f64;
    let x_at = |i: usize| frame.left + step * (i as f64 + 0.5);
    let every = categories.len().div_ceil(15).max(1);
    for (i, label) in categories.iter().enumerate() {
        if i % every == 0 {
            doc.text(
                x_at(i),
                frame.bottom() + 16.0,
                label,
                TextStyle::sized(10.0).anchor(Anchor::End).rotate(-45.0),
            );
        }
    }

    let mut entries = Vec::new();
    for (i, line) in series.iter().enumerate() {
        let color = series_color(&line.name, i);
        let points: Vec<(f64, f64)> = line
            .values
            .iter()
            .enumerate()
            .map(|(j, v)| (x_at(j), frame.bottom() - frame.height * *v as f64 / top))
            .collect();
        doc.polyline(&points, &color, 2.0);
        for (x, y) in &points {
            doc.circle(*x, *y, 4.0, &Paint::fill(color.as_str()));
        }
        entries.push((line.name.clone(), color));
    }
    legend(doc, frame, "Type", &entries);
}

fn draw_bars(doc: &mut SvgDocument, chart: &Chart, bars: &[Bar]) {
    let frame = Frame::standard();
    let max = bars.iter().map(|b| b.value).max().unwrap_or(0);
    let top = value_axis_y(doc, frame, max);
    axis_labels(doc, frame, chart);

    let slot = frame.width / bars.len() as f64;
    for (i, bar) in bars.iter().enumerate() {
        let color = if i % 2 == 0 { PRIMARY } else { SECONDARY };
        let height = frame.height * bar.value as f64 / top;
        let x = frame.left + slot * i as f64 + slot * 0.15;
        doc.rect(
            x,
            frame.bottom() - height,
            slot * 0.7,
            height,
            &Paint::fill(color).stroke("#000000", 1.5),
        );
        let center = frame.left + slot * (i as f64 + 0.5);
        doc.text(
            center,
            frame.bottom() - height - 6.0,
            &bar.value.to_string(),
            TextStyle::sized(12.0).anchor(Anchor::Middle).bold(),
        );
        doc.text(
            center,
            frame.bottom() + 18.0,
            &bar.label,
            TextStyle::sized(11.0).anchor(Anchor::Middle),
        );
    }
}

fn draw_heatmap(doc: &mut SvgDocument, chart: &Chart, pivot: &Pivot) {
    let frame = Frame::with_left_margin(120.0);
    axis_labels(doc, frame, chart);

    let max = pivot.max();
    let cell_w = frame.width / pivot.columns().len() as f64;
    let cell_h = frame.height / pivot.rows().len() as f64;

    for (r, (label, values)) in pivot.rows().iter().zip(pivot.cells()).enumerate() {
        let y = frame.top + cell_h * r as f64;
        doc.text(
            frame.left - 8.0,
            y + cell_h / 2.0 + 4.0,
            label,
            TextStyle::sized(12.0).anchor(Anchor::End),
        );
        for (c, value) in values.iter().enumerate() {
            let t = if max == 0 { 0.0 } else { *value as f64 / max as f64 };
            let x = frame.left + cell_w * c as f64;
            doc.rect(x, y, cell_w, cell_h, &Paint::fill(yl_or_rd(t)).stroke("#ffffff", 1.0));
            let ink = if t > 0.6 { "#ffffff" } else { "#333333" };
            doc.text(
                x + cell_w / 2.0,
                y + cell_h / 2.0 + 5.0,
                &value.to_string(),
                TextStyle::sized(14.0).anchor(Anchor::Middle).fill(ink),
            );
        }
    }

    for (c, label) in pivot.columns().iter().enumerate() {
        doc.text(
            frame.left + cell_w * (c as f64 + 0.5),
            frame.bottom() + 20.0,
            label,
            TextStyle::sized(12.0).anchor(Anchor::Middle),
        );
    }

    // color bar
    let x = frame.right() + 30.0;
    let steps = 10;
    let step_h = frame.height / steps as f64;
    for i in 0..steps {
        let t = 1.0 - i as f64 / (steps - 1) as f64;
        doc.rect(x, frame.top + step_h * i as f64, 20.0, step_h, &Paint::fill(yl_or_rd(t)));
    }
    doc.text(x + 26.0, frame.top + 10.0, &max.to_string(), TextStyle::sized(11.0));
    doc.text(x + 26.0, frame.bottom(), "0", TextStyle::sized(11.0));
    doc.text(
        x + 70.0,
        frame.top + frame.height / 2.0,
        "Notification Count",
        TextStyle::sized(12.0).anchor(Anchor::Middle).rotate(90.0),
    );
}

fn draw_scatter(doc: &mut SvgDocument, chart: &Chart, series: &[ScatterSeries]) {
    let frame = Frame::standard();
    axis_labels(doc, frame, chart);

    let points = || series.iter().flat_map(|s| s.points.iter());
    let max_index = points().map(|p| p.index).max().unwrap_or(0);
    let (Some(first), Some(last)) = (points().map(|p| p.at).min(), points().map(|p| p.at).max())
    else {
        return;
    };

    let span = (last - first).num_seconds() as f64;
    let x_at = |at: NaiveDateTime| {
        if span <= 0.0 {
            frame.left + frame.width / 2.0
        } else {
            frame.left + frame.width * (at - first).num_seconds() as f64 / span
        }
    };
    let top = value_axis_y(doc, frame, max_index);
    let y_at = |index: u64| frame.bottom() - frame.height * index as f64 / top;
    doc.line(frame.left, frame.bottom(), frame.right(), frame.bottom(), AXIS, 1.0);
    for i in 0..=4 {
        let seconds = (span * i as f64 / 4.0).round() as i64;
        let at = first + chrono::Duration::seconds(seconds);
        doc.text(
            x_at(at),
            frame.bottom() + 16.0,
            &at.format("%m-%d %H:%M").to_string(),
            TextStyle::sized(10.0).anchor(Anchor::End).rotate(-45.0),
        );
        if span <= 0.0 {
            break;
        }
    }

    let mut entries = Vec::new();
    for (i, s) in series.iter().enumerate() {
        let color = series_color(&s.name, i);
        let paint = Paint::fill(color.as_str())
            .stroke("#000000", 0.5)
            .opacity(0.6);
        for point in &s.points {
            doc.circle(x_at(point.at), y_at(point.index), 6.0, &paint);
        }
        entries.push((s.name.clone(), color));
    }
    legend(doc, frame, "Type", &entries);
}
