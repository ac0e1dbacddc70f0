use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Physical unit declared on the drawing's root `width` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Units {
    /// No width declared; sizes come from the viewBox and carry no physical meaning.
    #[default]
    Undefined,
    Pixels,
    Millimeters,
    Centimeters,
    Inches,
}

impl Units {
    /// Parse a dimension suffix (`mm`, `cm`, `in`, `i`, `px`); no suffix means pixels.
    pub fn from_suffix(suffix: Option<&str>) -> Self {
        match suffix {
            Some("mm") => Units::Millimeters,
            Some("cm") => Units::Centimeters,
            Some("in") | Some("i") => Units::Inches,
            _ => Units::Pixels,
        }
    }

    /// Whether areas in these units can be converted to a real volume.
    pub fn is_physical(&self) -> bool {
        matches!(
            self,
            Units::Millimeters | Units::Centimeters | Units::Inches
        )
    }

    /// Factor converting a squared length in these units to mm².
    pub fn square_mm_factor(&self) -> Option<f64> {
        match self {
            Units::Millimeters => Some(1.0),
            Units::Centimeters => Some(100.0),
            Units::Inches => Some(645.16),
            Units::Undefined | Units::Pixels => None,
        }
    }

    pub fn length_suffix(&self) -> &'static str {
        match self {
            Units::Undefined => "",
            Units::Pixels => "px",
            Units::Millimeters => "mm",
            Units::Centimeters => "cm",
            Units::Inches => "in",
        }
    }

    pub fn area_suffix(&self) -> &'static str {
        match self {
            Units::Undefined => "",
            Units::Pixels => "px²",
            Units::Millimeters => "mm²",
            Units::Centimeters => "cm²",
            Units::Inches => "in²",
        }
    }
}

/// Unit for reporting a volume computed from area × floor height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VolumeUnits {
    #[default]
    Milliliters,
    Liters,
}

impl VolumeUnits {
    /// Factor converting mm³ to this unit.
    pub fn from_cubic_mm(&self) -> f64 {
        match self {
            VolumeUnits::Milliliters => 0.001,
            VolumeUnits::Liters => 0.000_001,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            VolumeUnits::Milliliters => "ml",
            VolumeUnits::Liters => "l",
        }
    }
}

/// One selectable vertex of a path, as handed to the toolpath codec.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolpathVertex {
    pub position: Point,
    /// Length of the segment that ends at this vertex (zero for the path start).
    pub arc_length_from_previous: f64,
    pub is_path_start: bool,
    pub is_path_end: bool,
    pub selected: bool,
}

impl ToolpathVertex {
    /// Path start and end vertices always count as selected.
    pub fn is_selected(&self) -> bool {
        self.selected || self.is_path_start || self.is_path_end
    }

    /// Toggle selection; ignored for the path start and end.
    pub fn set_selected(&mut self, selected: bool) {
        if !self.is_path_start && !self.is_path_end {
            self.selected = selected;
        }
    }
}

/// Z-depth profile for the reaming pass, matching how the workpiece is fixtured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CutBehavior {
    /// Z0 on the top of the line: bottom at `-cut_height`, end cut at `-line_height`.
    #[default]
    Line,
    /// Z0 on the table: bottom at `line_height - cut_height`, end cut at zero.
    Table,
}

/// Machine parameters for the two-rail reaming toolpath.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReamingConfig {
    /// Retract height between and after passes.
    pub safe_z: f64,
    /// Thickness of the line (material strip) being reamed.
    pub line_height: f64,
    /// Width of the line; sets the distance between the rails.
    pub line_width: f64,
    /// Depth of the reaming cut.
    pub cut_height: f64,
    /// Extra travel beyond each side of the line.
    pub width_offset: f64,
    pub cut_behavior: CutBehavior,
    /// Cut through at the path's end vertex.
    pub cut_at_end: bool,
    /// Emitted verbatim before the generated moves.
    #[serde(default)]
    pub prologue: String,
    /// Emitted verbatim after the generated moves.
    #[serde(default)]
    pub epilogue: String,
}

impl Default for ReamingConfig {
    fn default() -> Self {
        Self {
            safe_z: 5.0,
            line_height: 2.0,
            line_width: 10.0,
            cut_height: 1.0,
            width_offset: 2.0,
            cut_behavior: CutBehavior::Line,
            cut_at_end: true,
            prologue: "G90\nG21".to_string(),
            epilogue: "M30".to_string(),
        }
    }
}

impl ReamingConfig {
    /// X coordinate of the left rail.
    pub fn left_rail(&self) -> f64 {
        -self.width_offset
    }

    /// X coordinate of the right rail.
    pub fn right_rail(&self) -> f64 {
        self.line_width + self.width_offset
    }

    /// Z of the reaming pass.
    pub fn bottom_z(&self) -> f64 {
        match self.cut_behavior {
            CutBehavior::Line => -self.cut_height,
            CutBehavior::Table => self.line_height - self.cut_height,
        }
    }

    /// Z used when cutting through at the path end.
    pub fn end_cut_z(&self) -> f64 {
        match self.cut_behavior {
            CutBehavior::Line => -self.line_height,
            CutBehavior::Table => 0.0,
        }
    }
}

/// Represents the final, machine-specific G-code output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GCode {
    /// A list of G-code command strings.
    pub lines: Vec<String>,
}

impl GCode {
    /// Newline-terminated program text.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_from_suffix() {
        assert_eq!(Units::from_suffix(Some("mm")), Units::Millimeters);
        assert_eq!(Units::from_suffix(Some("i")), Units::Inches);
        assert_eq!(Units::from_suffix(Some("in")), Units::Inches);
        assert_eq!(Units::from_suffix(Some("cm")), Units::Centimeters);
        assert_eq!(Units::from_suffix(Some("px")), Units::Pixels);
        assert_eq!(Units::from_suffix(None), Units::Pixels);
    }

    #[test]
    fn test_endpoints_always_selected() {
        let mut vertex = ToolpathVertex {
            position: Point::new(0.0, 0.0),
            arc_length_from_previous: 0.0,
            is_path_start: true,
            is_path_end: false,
            selected: true,
        };
        vertex.set_selected(false);
        assert!(vertex.is_selected());

        vertex.is_path_start = false;
        vertex.set_selected(false);
        assert!(!vertex.is_selected());
    }

    #[test]
    fn test_cut_behavior_heights() {
        let mut config = ReamingConfig {
            line_height: 3.0,
            cut_height: 1.0,
            ..ReamingConfig::default()
        };
        assert_eq!(config.bottom_z(), -1.0);
        assert_eq!(config.end_cut_z(), -3.0);

        config.cut_behavior = CutBehavior::Table;
        assert_eq!(config.bottom_z(), 2.0);
        assert_eq!(config.end_cut_z(), 0.0);
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = ReamingConfig::default();
        let serialized = serde_json::to_string(&config).expect("serialize");
        let deserialized: ReamingConfig = serde_json::from_str(&serialized).expect("deserialize");
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_gcode_to_text() {
        let gcode = GCode {
            lines: vec!["G90".to_string(), "G21".to_string()],
        };
        assert_eq!(gcode.to_text(), "G90\nG21\n");
    }
}
