use super::point::Point;
use kurbo::{CubicBez, Line, PathSeg, QuadBez, Rect};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

/// Number of parameter steps used when sampling a Bézier curve.
pub const CURVE_SAMPLES: usize = 1000;

/// The geometric primitive a segment describes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SegmentKind {
    /// A straight line.
    Line { start: Point, end: Point },
    /// A quadratic Bézier with one control point.
    Quadratic {
        start: Point,
        control: Point,
        end: Point,
    },
    /// A cubic Bézier with two control points.
    Cubic {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
}

/// One drawing primitive of a path together with its cached polyline approximation.
///
/// The approximation is computed on first use and dropped whenever a point moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    kind: SegmentKind,
    #[serde(skip)]
    polyline: OnceCell<Vec<Point>>,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<SegmentKind> for Segment {
    fn from(kind: SegmentKind) -> Self {
        Self {
            kind,
            polyline: OnceCell::new(),
        }
    }
}

impl Segment {
    pub fn line(start: Point, end: Point) -> Self {
        SegmentKind::Line { start, end }.into()
    }

    pub fn quadratic(start: Point, control: Point, end: Point) -> Self {
        SegmentKind::Quadratic {
            start,
            control,
            end,
        }
        .into()
    }

    pub fn cubic(start: Point, control1: Point, control2: Point, end: Point) -> Self {
        SegmentKind::Cubic {
            start,
            control1,
            control2,
            end,
        }
        .into()
    }

    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    pub fn start(&self) -> Point {
        match self.kind {
            SegmentKind::Line { start, .. }
            | SegmentKind::Quadratic { start, .. }
            | SegmentKind::Cubic { start, .. } => start,
        }
    }

    pub fn end(&self) -> Point {
        match self.kind {
            SegmentKind::Line { end, .. }
            | SegmentKind::Quadratic { end, .. }
            | SegmentKind::Cubic { end, .. } => end,
        }
    }

    /// Move the end point, e.g. to snap a closing segment onto its path start.
    pub fn set_end(&mut self, point: Point) {
        match &mut self.kind {
            SegmentKind::Line { end, .. }
            | SegmentKind::Quadratic { end, .. }
            | SegmentKind::Cubic { end, .. } => *end = point,
        }
        self.invalidate();
    }

    /// Evaluate the segment at parameter `t` in `[0, 1]` by repeated linear interpolation.
    pub fn point_at(&self, t: f64) -> Point {
        match self.kind {
            SegmentKind::Line { start, end } => start.lerp(end, t),
            SegmentKind::Quadratic {
                start,
                control,
                end,
            } => {
                let a = start.lerp(control, t);
                let b = control.lerp(end, t);
                a.lerp(b, t)
            }
            SegmentKind::Cubic {
                start,
                control1,
                control2,
                end,
            } => {
                let l1 = start.lerp(control1, t);
                let l2 = control1.lerp(control2, t);
                let l3 = control2.lerp(end, t);
                let a = l1.lerp(l2, t);
                let b = l2.lerp(l3, t);
                a.lerp(b, t)
            }
        }
    }

    /// Polyline approximation of the segment.
    ///
    /// Lines yield exactly `[start, end]`. Curves are sampled at `t = i / 1000` for
    /// `i` in `0..1000`, followed by the exact end point. The returned vector is a copy
    /// and stays valid across later mutation of the segment.
    pub fn approximate(&self) -> Vec<Point> {
        self.polyline().to_vec()
    }

    /// Borrow the cached approximation, computing it if needed.
    pub fn polyline(&self) -> &[Point] {
        self.polyline.get_or_init(|| match self.kind {
            SegmentKind::Line { start, end } => vec![start, end],
            _ => {
                let mut points = Vec::with_capacity(CURVE_SAMPLES + 1);
                for i in 0..CURVE_SAMPLES {
                    points.push(self.point_at(i as f64 / CURVE_SAMPLES as f64));
                }
                points.push(self.end());
                points
            }
        })
    }

    /// Whether an approximation is currently cached.
    pub fn is_approximated(&self) -> bool {
        self.polyline.get().is_some()
    }

    /// Length of the segment measured along its approximation.
    pub fn length(&self) -> f64 {
        match self.kind {
            SegmentKind::Line { start, end } => start.distance(end),
            _ => self
                .polyline()
                .windows(2)
                .map(|pair| pair[0].distance(pair[1]))
                .sum(),
        }
    }

    /// Axis-aligned bounds of the approximation (exact for lines).
    pub fn bounding_box(&self) -> Rect {
        let points = self.polyline();
        let first = points[0];
        points.iter().skip(1).fold(
            Rect::new(first.x, first.y, first.x, first.y),
            |rect, p| {
                Rect::new(
                    rect.x0.min(p.x),
                    rect.y0.min(p.y),
                    rect.x1.max(p.x),
                    rect.y1.max(p.y),
                )
            },
        )
    }

    /// Multiply every point by `factor` in place.
    pub fn scale(&mut self, factor: f64) {
        self.map_points(|p| p * factor);
    }

    /// Offset every point by `(dx, dy)` in place.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let offset = Point::new(dx, dy);
        self.map_points(|p| p + offset);
    }

    /// A scaled copy, leaving `self` untouched.
    pub fn scaled(&self, factor: f64) -> Self {
        let mut copy = Segment::from(self.kind);
        copy.scale(factor);
        copy
    }

    /// A translated copy, leaving `self` untouched.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let mut copy = Segment::from(self.kind);
        copy.translate(dx, dy);
        copy
    }

    fn map_points(&mut self, f: impl Fn(Point) -> Point) {
        match &mut self.kind {
            SegmentKind::Line { start, end } => {
                *start = f(*start);
                *end = f(*end);
            }
            SegmentKind::Quadratic {
                start,
                control,
                end,
            } => {
                *start = f(*start);
                *control = f(*control);
                *end = f(*end);
            }
            SegmentKind::Cubic {
                start,
                control1,
                control2,
                end,
            } => {
                *start = f(*start);
                *control1 = f(*control1);
                *control2 = f(*control2);
                *end = f(*end);
            }
        }
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.polyline = OnceCell::new();
    }
}

impl From<&Segment> for PathSeg {
    fn from(segment: &Segment) -> Self {
        match segment.kind {
            SegmentKind::Line { start, end } => PathSeg::Line(Line::new(start, end)),
            SegmentKind::Quadratic {
                start,
                control,
                end,
            } => PathSeg::Quad(QuadBez::new(start, control, end)),
            SegmentKind::Cubic {
                start,
                control1,
                control2,
                end,
            } => PathSeg::Cubic(CubicBez::new(start, control1, control2, end)),
        }
    }
}
