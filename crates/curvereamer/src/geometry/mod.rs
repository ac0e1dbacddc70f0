pub mod path;
pub mod point;
pub mod region;
pub mod segment;

pub use path::{fmt3, Path};
pub use point::Point;
pub use region::{compose_area, AreaPolicy, ContainmentForest, Region};
pub use segment::{Segment, SegmentKind, CURVE_SAMPLES};
