//! Preview geometry for a rendering front end.
//!
//! A [`PreviewRegistry`] is owned by whoever draws the preview. It fits the
//! active path into a fixed-size canvas and produces square vertex markers in
//! the same canvas coordinates.

use crate::geometry::{fmt3, Path};
use crate::types::ToolpathVertex;
use serde::{Deserialize, Serialize};

/// Longest side of the preview canvas, in canvas units.
pub const PREVIEW_EXTENT: f64 = 200.0;
/// Canvas margin added to every coordinate.
pub const PREVIEW_MARGIN: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewRegistry {
    point_size: f64,
    visualization_scale: f64,
}

impl Default for PreviewRegistry {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl PreviewRegistry {
    pub fn new(point_size: f64) -> Self {
        Self {
            point_size,
            visualization_scale: 1.0,
        }
    }

    pub fn point_size(&self) -> f64 {
        self.point_size
    }

    pub fn set_point_size(&mut self, point_size: f64) {
        self.point_size = point_size;
    }

    /// Stroke width for vertex markers.
    pub fn marker_thickness(&self) -> f64 {
        self.point_size * 0.1
    }

    pub fn visualization_scale(&self) -> f64 {
        self.visualization_scale
    }

    /// Fit `path` into the canvas: `200 / max(width, height)` of its bounding box.
    ///
    /// A degenerate (zero-size) path resets the scale to 1.
    pub fn fit_to(&mut self, path: &Path) -> f64 {
        let bbox = path.bounding_box();
        let extent = bbox.width().max(bbox.height());
        self.visualization_scale = if extent > 0.0 {
            PREVIEW_EXTENT / extent
        } else {
            1.0
        };
        self.visualization_scale
    }

    /// A scaled and offset copy of `path`; the input is left untouched.
    pub fn preview_path(&self, path: &Path) -> Path {
        path.scaled(self.visualization_scale)
            .translated(PREVIEW_MARGIN, PREVIEW_MARGIN)
    }

    /// Square marker around a vertex as path data. End markers are drawn at half size.
    pub fn marker_path_data(&self, vertex: &ToolpathVertex) -> String {
        let half = if vertex.is_path_end {
            self.point_size * 0.5
        } else {
            self.point_size
        };
        let side = half * 2.0;
        let x = vertex.position.x * self.visualization_scale - half + PREVIEW_MARGIN;
        let y = vertex.position.y * self.visualization_scale - half + PREVIEW_MARGIN;
        format!(
            "M {} {} h {} v {} h {} z",
            fmt3(x),
            fmt3(y),
            fmt3(side),
            fmt3(side),
            fmt3(-side)
        )
    }
}
