//! Footprint layout generation.
//!
//! The pipeline runs once over a validated [`Design`]:
//!
//! 1. [`RingSet`]: nested outlines at increasing offsets from the die
//! 2. [`AngularSampler`]: rays from the footprint centre cut rings into sectors
//! 3. [`FingerPattern`]: finger quadrilaterals, landing pads and caps
//! 4. [`Routing`]: bond wires and traces following the [`BondMap`]
//!
//! The result is a [`BondLayout`] holding every shape the renderer needs.

mod design;
mod error;
mod fingers;
mod mapping;
mod rings;
mod routing;
mod sampler;

pub use design::{BondLayout, Design, LayoutSummary};
pub use error::{LayoutError, LayoutResult};
pub use fingers::FingerPattern;
pub use mapping::{Bond, BondMap, EdgePadIndex, FingerIndex};
pub use rings::{Ring, RingSet};
pub use routing::{edge_pad_positions, trace_width, BondWire, Routing, Trace};
pub use sampler::AngularSampler;
