use super::point::Point;
use super::segment::{Segment, SegmentKind};
use kurbo::{BezPath, Rect};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// An ordered chain of segments sharing endpoints, optionally closed.
///
/// Paths are built by the path-data parser, which guarantees a non-empty segment
/// list and, for closed paths, that the last segment ends on the first start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    segments: Vec<Segment>,
    closed: bool,
}

impl Path {
    pub(crate) fn new() -> Self {
        Self {
            segments: Vec::new(),
            closed: false,
        }
    }

    /// Build a path from already-chained segments.
    pub fn from_segments(segments: Vec<Segment>, closed: bool) -> Self {
        Self { segments, closed }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Logical origin of the path (start of the first segment).
    pub fn start(&self) -> Option<Point> {
        self.segments.first().map(Segment::start)
    }

    /// Total length along all segment approximations.
    pub fn length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    /// Union of all segment bounding boxes; a zero rect for an empty path.
    pub fn bounding_box(&self) -> Rect {
        self.segments
            .iter()
            .map(Segment::bounding_box)
            .reduce(|acc, rect| acc.union(rect))
            .unwrap_or(Rect::ZERO)
    }

    /// Closed polyline through every segment approximation, without repeating
    /// shared endpoints. The first vertex is the end of the first sample step; the
    /// ring closes back onto the path start implicitly.
    pub fn polyline(&self) -> Vec<Point> {
        let mut points = Vec::new();
        for segment in &self.segments {
            points.extend_from_slice(&segment.polyline()[1..]);
        }
        points
    }

    /// Unsigned shoelace area of the closed polyline; open paths enclose nothing.
    pub fn area(&self) -> f64 {
        if !self.closed {
            return 0.0;
        }
        let points = self.polyline();
        let n = points.len();
        let mut area = 0.0;
        for i in 0..n {
            let a = points[i];
            let b = points[(i + 1) % n];
            area += (a.y + b.y) * (a.x - b.x) * 0.5;
        }
        area.abs()
    }

    pub fn scale(&mut self, factor: f64) {
        for segment in &mut self.segments {
            segment.scale(factor);
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for segment in &mut self.segments {
            segment.translate(dx, dy);
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            segments: self.segments.iter().map(|s| s.scaled(factor)).collect(),
            closed: self.closed,
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .map(|s| s.translated(dx, dy))
                .collect(),
            closed: self.closed,
        }
    }

    /// Move the path so its bounding box minimum sits at the origin.
    pub fn normalize_to_origin(&mut self) {
        let bbox = self.bounding_box();
        self.translate(-bbox.x0, -bbox.y0);
    }

    /// Serialize back to absolute path data (`M`, `L`, `Q`, `C`, `Z`) with three decimals.
    pub fn to_path_data(&self) -> String {
        let mut out = String::new();
        let Some(start) = self.start() else {
            return out;
        };
        let _ = write!(out, "M {} {}", fmt3(start.x), fmt3(start.y));
        for segment in &self.segments {
            let _ = match *segment.kind() {
                SegmentKind::Line { end, .. } => {
                    write!(out, " L {} {}", fmt3(end.x), fmt3(end.y))
                }
                SegmentKind::Quadratic { control, end, .. } => write!(
                    out,
                    " Q {} {} {} {}",
                    fmt3(control.x),
                    fmt3(control.y),
                    fmt3(end.x),
                    fmt3(end.y)
                ),
                SegmentKind::Cubic {
                    control1,
                    control2,
                    end,
                    ..
                } => write!(
                    out,
                    " C {} {} {} {} {} {}",
                    fmt3(control1.x),
                    fmt3(control1.y),
                    fmt3(control2.x),
                    fmt3(control2.y),
                    fmt3(end.x),
                    fmt3(end.y)
                ),
            };
        }
        if self.closed {
            out.push_str(" Z");
        }
        out
    }

    /// Convert to a kurbo path for renderers that speak kurbo.
    pub fn to_bezpath(&self) -> BezPath {
        let mut bezpath = BezPath::new();
        if let Some(start) = self.start() {
            bezpath.move_to(start);
        }
        for segment in &self.segments {
            match *segment.kind() {
                SegmentKind::Line { end, .. } => bezpath.line_to(end),
                SegmentKind::Quadratic { control, end, .. } => bezpath.quad_to(control, end),
                SegmentKind::Cubic {
                    control1,
                    control2,
                    end,
                    ..
                } => bezpath.curve_to(control1, control2, end),
            }
        }
        if self.closed {
            bezpath.close_path();
        }
        bezpath
    }
}

/// Format with exactly three decimals and a period separator, never printing `-0.000`.
pub fn fmt3(value: f64) -> String {
    let text = format!("{:.3}", value);
    if text == "-0.000" {
        "0.000".to_string()
    } else {
        text
    }
}
