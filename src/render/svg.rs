//! Minimal SVG writer.
//!
//! Provides text escaping and an element writer with deterministic number
//! formatting, so the same chart always produces the same bytes.

use std::fmt::Write as _;

/// Escape text for use in SVG character data and attribute values.
#[must_use]
pub fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            c if c.is_control() => {}
            c => result.push(c),
        }
    }
    result
}

/// Format a coordinate with two decimals, dropping a trailing `.00`.
#[must_use]
pub fn num(v: f64) -> String {
    let v = if v.abs() < 0.005 { 0.0 } else { v };
    let s = format!("{:.2}", v);
    match s.strip_suffix(".00") {
        Some(whole) => whole.to_string(),
        None => s,
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Text styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub anchor: Anchor,
    pub bold: bool,
    /// Rotation in degrees around the text origin.
    pub rotate: Option<f64>,
    pub fill: &'static str,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 12.0,
            anchor: Anchor::Start,
            bold: false,
            rotate: None,
            fill: "#333333",
        }
    }
}

impl TextStyle {
    pub fn sized(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }

    pub fn fill(mut self, fill: &'static str) -> Self {
        self.fill = fill;
        self
    }
}

/// Fill and outline of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub fill: String,
    pub stroke: Option<(String, f64)>,
    pub opacity: Option<f64>,
}

impl Paint {
    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            fill: color.into(),
            stroke: None,
            opacity: None,
        }
    }

    pub fn stroke(mut self, color: impl Into<String>, width: f64) -> Self {
        self.stroke = Some((color.into(), width));
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    fn attrs(&self) -> String {
        let mut attrs = format!("fill=\"{}\"", escape_xml(&self.fill));
        if let Some((color, width)) = &self.stroke {
            let _ = write!(
                attrs,
                " stroke=\"{}\" stroke-width=\"{}\"",
                escape_xml(color),
                num(*width)
            );
        }
        if let Some(opacity) = self.opacity {
            let _ = write!(attrs, " fill-opacity=\"{}\"", num(opacity));
        }
        attrs
    }
}

/// An SVG document under construction, one element per line.
pub struct SvgDocument {
    width: f64,
    height: f64,
    buffer: String,
}

impl SvgDocument {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let mut doc = Self {
            width,
            height,
            buffer: String::new(),
        };
        doc.rect(0.0, 0.0, width, height, &Paint::fill("#ffffff"));
        doc
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    fn push(&mut self, element: String) {
        self.buffer.push_str("  ");
        self.buffer.push_str(&element);
        self.buffer.push('\n');
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        self.push(format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {}/>",
            num(x),
            num(y),
            num(w.max(0.0)),
            num(h.max(0.0)),
            paint.attrs()
        ));
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        self.push(format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            num(x1),
            num(y1),
            num(x2),
            num(y2),
            escape_xml(stroke),
            num(width)
        ));
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: &str, width: f64) {
        let points: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{},{}", num(*x), num(*y)))
            .collect();
        self.push(format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            points.join(" "),
            escape_xml(stroke),
            num(width)
        ));
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, paint: &Paint) {
        self.push(format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {}/>",
            num(cx),
            num(cy),
            num(r),
            paint.attrs()
        ));
    }

    pub fn path(&mut self, d: &str, paint: &Paint) {
        self.push(format!("<path d=\"{}\" {}/>", d, paint.attrs()));
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: TextStyle) {
        let mut attrs = format!(
            "x=\"{}\" y=\"{}\" font-size=\"{}\" text-anchor=\"{}\" fill=\"{}\"",
            num(x),
            num(y),
            num(style.size),
            style.anchor.as_str(),
            style.fill
        );
        if style.bold {
            attrs.push_str(" font-weight=\"bold\"");
        }
        if let Some(degrees) = style.rotate {
            let _ = write!(
                attrs,
                " transform=\"rotate({} {} {})\"",
                num(degrees),
                num(x),
                num(y)
            );
        }
        self.push(format!("<text {}>{}</text>", attrs, escape_xml(content)));
    }

    /// Consume the document and return the SVG text.
    #[must_use]
    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\" font-family=\"Helvetica, Arial, sans-serif\">\n{body}</svg>\n",
            w = num(self.width),
            h = num(self.height),
            body = self.buffer
        )
    }
}
