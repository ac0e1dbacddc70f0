use crate::geometry::fmt3;
use crate::types::{GCode, ReamingConfig, ToolpathVertex};
use tracing::debug;

/// Emit the two-rail zig-zag reaming program for an ordered vertex list.
///
/// Each vertex's arc length is accumulated into Y. The first selected vertex
/// (other than the path start) positions the tool on the left rail and plunges;
/// every later selected vertex advances Y and crosses to the opposite rail.
/// The configuration is trusted as given.
pub fn generate_reaming_gcode(vertices: &[ToolpathVertex], config: &ReamingConfig) -> GCode {
    let left = fmt3(config.left_rail());
    let right = fmt3(config.right_rail());
    let safe = fmt3(config.safe_z);
    let bottom = fmt3(config.bottom_z());
    let end_cut = fmt3(config.end_cut_z());

    let mut program = Vec::new();
    program.extend(config.prologue.split('\n').map(str::to_string));
    program.push(format!("G0 Z{safe}"));

    let mut is_right_side = false;
    let mut first_point = true;
    let mut y = 0.0;

    for vertex in vertices {
        y += vertex.arc_length_from_previous;
        if !vertex.is_selected() || vertex.is_path_start {
            continue;
        }

        if first_point {
            program.push(format!("G0 X{left} Y{}", fmt3(y)));
            program.push(format!("G1 Z{bottom}"));
            first_point = false;
            continue;
        }

        if vertex.is_path_end && config.cut_at_end {
            program.push(format!("G1 Y{} Z{end_cut}", fmt3(y)));
        } else {
            program.push(format!("G1 Y{}", fmt3(y)));
        }
        let rail = if is_right_side { &left } else { &right };
        program.push(format!("G1 X{rail}"));
        is_right_side = !is_right_side;
    }

    program.push(format!("G1 Z{safe}"));
    program.push(format!("G0 X{} Y{}", fmt3(0.0), fmt3(0.0)));
    program.extend(config.epilogue.split('\n').map(str::to_string));

    let lines: Vec<String> = program
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect();
    debug!(lines = lines.len(), "generated reaming program");

    GCode { lines }
}
