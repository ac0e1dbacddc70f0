//! Area composition for documents holding several paths (letters with holes,
//! overlapping outlines, nested islands).

use super::path::Path;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// How the areas of several paths combine into one document area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AreaPolicy {
    /// Take the closed path with the largest bounding box as the main outline and
    /// recursively subtract every other closed path, whether or not it lies inside.
    LargestMinusOthers,
    /// Nest paths by bounding-box enclosure and alternate the sign by depth:
    /// outlines add, their holes subtract, islands inside holes add again.
    #[default]
    ContainmentForest,
}

/// A filled area: an outer path with the paths directly nested in it as holes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Index of the outer boundary path.
    pub outer: usize,
    /// Indices of the paths cut out of the outer boundary.
    pub holes: Vec<usize>,
}

impl Region {
    pub fn new(outer: usize) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    pub fn add_hole(&mut self, hole: usize) {
        self.holes.push(hole);
    }

    /// Outer area minus the area of each hole.
    pub fn area(&self, paths: &[Path]) -> f64 {
        let holes: f64 = self.holes.iter().map(|&i| paths[i].area()).sum();
        paths[self.outer].area() - holes
    }
}

/// Parent links between closed paths, derived from bounding-box enclosure.
///
/// Each closed path's parent is the smallest enclosing closed path. Paths with
/// identical bounding boxes nest in drawing order (earlier encloses later); among
/// equally sized candidates the later one wins. Open paths take no part.
#[derive(Debug, Clone)]
pub struct ContainmentForest {
    parents: Vec<Option<usize>>,
    closed: Vec<bool>,
}

impl ContainmentForest {
    pub fn build(paths: &[Path]) -> Self {
        let boxes: Vec<Rect> = paths.iter().map(Path::bounding_box).collect();
        let closed: Vec<bool> = paths.iter().map(Path::is_closed).collect();

        let parents = (0..paths.len())
            .map(|i| {
                if !closed[i] {
                    return None;
                }
                let mut best: Option<usize> = None;
                for j in 0..paths.len() {
                    if j == i || !closed[j] || !encloses(boxes[j], boxes[i]) {
                        continue;
                    }
                    if boxes[j] == boxes[i] && j > i {
                        continue;
                    }
                    best = match best {
                        Some(b) if boxes[b].area() < boxes[j].area() => Some(b),
                        _ => Some(j),
                    };
                }
                best
            })
            .collect();

        Self { parents, closed }
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    /// Number of enclosing ancestors.
    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = index;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Closed paths with no enclosing path.
    pub fn roots(&self) -> Vec<usize> {
        (0..self.parents.len())
            .filter(|&i| self.closed[i] && self.parents[i].is_none())
            .collect()
    }

    pub fn children(&self, index: usize) -> Vec<usize> {
        (0..self.parents.len())
            .filter(|&i| self.parents[i] == Some(index))
            .collect()
    }

    /// One region per even-depth path, holding its direct children as holes.
    pub fn regions(&self) -> Vec<Region> {
        (0..self.parents.len())
            .filter(|&i| self.closed[i] && self.depth(i) % 2 == 0)
            .map(|outer| {
                let mut region = Region::new(outer);
                for hole in self.children(outer) {
                    region.add_hole(hole);
                }
                region
            })
            .collect()
    }
}

/// Compose the area of all `paths` (in drawing units) under `policy`.
pub fn compose_area(paths: &[Path], policy: AreaPolicy) -> f64 {
    match policy {
        AreaPolicy::LargestMinusOthers => largest_minus_others(paths),
        AreaPolicy::ContainmentForest => ContainmentForest::build(paths)
            .regions()
            .iter()
            .map(|region| region.area(paths))
            .sum(),
    }
}

fn largest_minus_others(paths: &[Path]) -> f64 {
    let boxes: Vec<Rect> = paths.iter().map(Path::bounding_box).collect();

    let mut main: Option<usize> = None;
    for (i, path) in paths.iter().enumerate() {
        if !path.is_closed() {
            continue;
        }
        // Strict comparison keeps the earliest path on ties.
        if main.map_or(true, |m| boxes[m].area() < boxes[i].area()) {
            main = Some(i);
        }
    }

    let Some(main) = main else {
        return 0.0;
    };
    let figures: Vec<usize> = (0..paths.len()).collect();
    net_area(paths, &boxes, main, &figures)
}

/// `this` area minus the net area of every other closed figure. Figures inside
/// `this` accumulate into the candidate list handed to each recursive call, which
/// is always shorter than `figures` so the recursion terminates.
fn net_area(paths: &[Path], boxes: &[Rect], this: usize, figures: &[usize]) -> f64 {
    let mut area = paths[this].area();
    let mut inner = Vec::new();
    for &figure in figures {
        if figure == this || !paths[figure].is_closed() {
            continue;
        }
        if encloses(boxes[this], boxes[figure]) {
            inner.push(figure);
        }
        area -= net_area(paths, boxes, figure, &inner);
    }
    area
}

/// Inclusive bounding-box enclosure.
fn encloses(outer: Rect, inner: Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && outer.x1 >= inner.x1 && outer.y1 >= inner.y1
}
