use crate::error::LoadError;
use crate::geometry::{compose_area, fmt3, AreaPolicy, Path};
use crate::path_data::parse_path_data;
use crate::types::{Units, VolumeUnits};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path as StdPath;
use std::sync::OnceLock;
use tracing::{debug, info};

/// A parsed `viewBox="minX minY width height"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Parse four whitespace- or comma-separated numbers.
    pub fn parse(value: &str) -> Result<Self, LoadError> {
        let invalid = || LoadError::ViewBox {
            value: value.to_string(),
        };
        let numbers = value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| chunk.parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<f64>, LoadError>>()?;
        match numbers[..] {
            [min_x, min_y, width, height] => Ok(Self {
                min_x,
                min_y,
                width,
                height,
            }),
            _ => Err(invalid()),
        }
    }
}

/// A drawing loaded from SVG: its paths in physical units, each moved so its
/// bounding box starts at the origin, plus the composed enclosed area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    paths: Vec<Path>,
    units: Units,
    width: f64,
    height: f64,
    scale: f64,
    area: f64,
}

impl Document {
    /// An empty document; populate it with [`Document::load`].
    pub fn new() -> Self {
        Self {
            paths: Vec::new(),
            units: Units::Undefined,
            width: 0.0,
            height: 0.0,
            scale: 1.0,
            area: 0.0,
        }
    }

    /// Load a document from SVG bytes using the default area policy.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let mut document = Self::new();
        document.load(bytes)?;
        Ok(document)
    }

    /// Read and load an SVG file.
    pub fn load_from_path<P: AsRef<StdPath>>(path: P) -> Result<Self, LoadError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Replace the document's contents with the drawing in `bytes`.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        self.load_with_policy(bytes, AreaPolicy::default())
    }

    /// Replace the document's contents, composing multi-path area with `policy`.
    ///
    /// On error the previous contents are left untouched.
    pub fn load_with_policy(&mut self, bytes: &[u8], policy: AreaPolicy) -> Result<(), LoadError> {
        let scan = scan_drawing(bytes)?;

        let mut units = Units::Undefined;
        let mut width = 0.0;
        let mut height = 0.0;
        let mut scale = 1.0;

        if let Some(value) = &scan.width {
            let (declared, suffix) = parse_dimension("width", value)?;
            width = declared;
            units = Units::from_suffix(suffix.as_deref());
        }
        if let Some(value) = &scan.height {
            height = parse_dimension("height", value)?.0;
        }
        if let Some(value) = &scan.view_box {
            let view_box = ViewBox::parse(value)?;
            if units == Units::Undefined {
                width = view_box.width;
                height = view_box.height;
            } else if view_box.width == 0.0 {
                return Err(LoadError::ViewBox {
                    value: value.clone(),
                });
            } else {
                scale = width / view_box.width;
            }
        }

        let mut paths = Vec::new();
        for data in &scan.path_data {
            let parsed = parse_path_data(data)?;
            debug!(subpaths = parsed.len(), "read path element");
            paths.extend(parsed);
        }

        let area = compose_area(&paths, policy) * scale * scale;

        for path in &mut paths {
            path.scale(scale);
        }
        for path in &mut paths {
            path.normalize_to_origin();
        }

        info!(
            paths = paths.len(),
            ?units,
            scale,
            area,
            ?policy,
            "loaded drawing"
        );

        *self = Self {
            paths,
            units,
            width,
            height,
            scale,
            area,
        };
        Ok(())
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn path(&self, index: usize) -> Option<&Path> {
        self.paths.get(index)
    }

    /// True when the drawing held no usable paths. Callers decide how to report it.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Factor from user space to the declared physical unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Enclosed area in squared document units.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Area formatted for display, e.g. `5000.000 mm²`.
    pub fn area_label(&self) -> String {
        label(self.area, self.units.area_suffix())
    }

    pub fn path_length(&self, index: usize) -> Option<f64> {
        self.paths.get(index).map(Path::length)
    }

    /// Path length formatted for display, e.g. `40.000 mm`.
    pub fn path_length_label(&self, index: usize) -> Option<String> {
        self.path_length(index)
            .map(|length| label(length, self.units.length_suffix()))
    }

    /// Volume of the enclosed area extruded by `floor_height` millimetres.
    ///
    /// Returns `None` for drawings without physical units.
    pub fn volume(&self, floor_height: f64, units: VolumeUnits) -> Option<f64> {
        self.units
            .square_mm_factor()
            .map(|to_mm2| self.area * to_mm2 * floor_height * units.from_cubic_mm())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn label(value: f64, suffix: &str) -> String {
    if suffix.is_empty() {
        fmt3(value)
    } else {
        format!("{} {}", fmt3(value), suffix)
    }
}

/// Raw attribute text collected in one pass over the document tree.
#[derive(Debug, Default)]
struct DrawingScan {
    width: Option<String>,
    height: Option<String>,
    view_box: Option<String>,
    path_data: Vec<String>,
}

fn scan_drawing(bytes: &[u8]) -> Result<DrawingScan, LoadError> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut scan = DrawingScan::default();
    let mut seen_root = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) | Event::Empty(element) => {
                match element.local_name().as_ref() {
                    b"path" => {
                        if let Some(data) = attribute(&element, "d")? {
                            scan.path_data.push(data);
                        }
                    }
                    b"svg" if !seen_root => {
                        seen_root = true;
                        scan.width = attribute(&element, "width")?;
                        scan.height = attribute(&element, "height")?;
                        scan.view_box = attribute(&element, "viewBox")?;
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(scan)
}

fn attribute(element: &BytesStart, name: &str) -> Result<Option<String>, LoadError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|err| LoadError::Xml(err.to_string()))?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn dimension_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?P<value>[+-]?(?:[0-9]+(?:[.,][0-9]*)?|\.[0-9]+))\s*(?P<unit>mm|px|in|i|cm)?")
            .expect("invalid dimension regex")
    })
}

/// Split a `<number><unit>?` dimension into its value and unit suffix.
fn parse_dimension(attribute: &str, value: &str) -> Result<(f64, Option<String>), LoadError> {
    let invalid = || LoadError::Dimension {
        attribute: attribute.to_string(),
        value: value.to_string(),
    };
    let lowered = value.to_lowercase();
    let captures = dimension_regex().captures(&lowered).ok_or_else(invalid)?;
    let number = captures
        .name("value")
        .map(|m| m.as_str().replace(',', "."))
        .ok_or_else(invalid)?;
    let number = number.parse::<f64>().map_err(|_| invalid())?;
    let unit = captures.name("unit").map(|m| m.as_str().to_string());
    Ok((number, unit))
}
