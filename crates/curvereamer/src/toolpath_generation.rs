use crate::geometry::Path;
use crate::types::ToolpathVertex;
use anyhow::{anyhow, Result};

/// Derive the selectable vertex list for `path`.
///
/// The first vertex is the path start; each segment then contributes its end
/// point together with its length. Every vertex starts selected.
pub fn vertices_for_path(path: &Path) -> Vec<ToolpathVertex> {
    let Some(start) = path.start() else {
        return Vec::new();
    };

    let mut vertices = Vec::with_capacity(path.segments().len() + 1);
    vertices.push(ToolpathVertex {
        position: start,
        arc_length_from_previous: 0.0,
        is_path_start: true,
        is_path_end: false,
        selected: true,
    });

    let last = path.segments().len() - 1;
    for (index, segment) in path.segments().iter().enumerate() {
        vertices.push(ToolpathVertex {
            position: segment.end(),
            arc_length_from_previous: segment.length(),
            is_path_start: false,
            is_path_end: index == last,
            selected: true,
        });
    }
    vertices
}

/// Make the vertex at `index` the start of a closed path's vertex ring.
///
/// The vertices after `index` come first, followed by those up to and
/// including `index`; the start vertex moves to the chosen position and the
/// last vertex becomes the new end.
pub fn set_starting_vertex(
    vertices: &mut Vec<ToolpathVertex>,
    index: usize,
    closed: bool,
) -> Result<()> {
    if !closed {
        return Err(anyhow!("starting vertex can only be moved on a closed path"));
    }
    let chosen = vertices
        .get(index)
        .copied()
        .ok_or_else(|| anyhow!("invalid vertex index {index}"))?;
    if chosen.is_path_start || chosen.is_path_end {
        return Err(anyhow!("vertex {index} already bounds the path"));
    }

    let mut start = vertices[0];
    start.position = chosen.position;

    let mut reordered = Vec::with_capacity(vertices.len());
    reordered.push(start);
    reordered.extend_from_slice(&vertices[index + 1..]);
    reordered.extend_from_slice(&vertices[1..=index]);

    for vertex in reordered.iter_mut().skip(1) {
        vertex.is_path_end = false;
    }
    if let Some(last) = reordered.last_mut() {
        last.is_path_end = true;
    }

    *vertices = reordered;
    Ok(())
}
