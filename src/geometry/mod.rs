//! Vector geometry for the footprint outlines.
//!
//! All coordinates are millimetres in drawing space: origin at the top-left
//! corner of the footprint, y growing downward.
//!
//! - [`Point`] and vector arithmetic
//! - [`Segment`]: lines, cubic Béziers and circular arcs
//! - [`Path`]: open or closed chains of segments with ray intersection and
//!   SVG serialisation
//! - [`shapes`]: rectangles, bevelled and rounded rings, circles, polygons

mod path;
mod point;
pub mod roots;
mod segment;
pub mod shapes;

pub use path::{Intersection, Path};
pub use point::Point;
pub use segment::{fmt_coord, Segment, SegmentHit};
pub use shapes::Bevel;
