//! SVG output for the manufacturing layers.
//!
//! Each [`Layer`] becomes one document sized to the footprint in millimetres,
//! with a `viewBox` in the same units as the layout.

mod layers;
mod svg;

pub use layers::{write_layers, Layer};
pub use svg::{Style, SvgDocument};
