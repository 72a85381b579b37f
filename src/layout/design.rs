//! Validated inputs and the assembled layout.

use serde::Serialize;

use super::error::LayoutResult;
use super::fingers::FingerPattern;
use super::mapping::BondMap;
use super::rings::RingSet;
use super::routing::Routing;
use super::sampler::AngularSampler;
use crate::config::Config;
use crate::error::ConfigError;
use crate::geometry::Point;

/// A validated configuration together with its bond map.
#[derive(Debug, Clone)]
pub struct Design {
    config: Config,
    bonds: BondMap,
}

impl Design {
    /// Validates `config` and resolves its mapping tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let bonds = BondMap::from_config(&config)?;
        Ok(Self { config, bonds })
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The resolved bond map.
    #[must_use]
    pub const fn bonds(&self) -> &BondMap {
        &self.bonds
    }
}

/// The complete footprint geometry, ready to render.
#[derive(Debug, Clone)]
pub struct BondLayout {
    /// Footprint width (mm).
    pub width: f64,
    /// Footprint height (mm).
    pub height: f64,
    /// Footprint centre in drawing space.
    pub center: Point,
    /// Diameter of die pad and landing dots (mm).
    pub pad_size: f64,
    /// Ring family.
    pub rings: RingSet,
    /// Finger shapes and anchors.
    pub fingers: FingerPattern,
    /// Bond wires and traces.
    pub routing: Routing,
}

impl BondLayout {
    /// Computes all geometry for `design`: rings, then fingers, then routing.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::RayIntersection`](super::LayoutError::RayIntersection)
    /// if a sampling ray does not cross its ring exactly once.
    pub fn build(design: &Design) -> LayoutResult<Self> {
        let config = design.config();
        let center = config.footprint.center();

        let rings = RingSet::build(config);
        let sampler = AngularSampler::new(
            center,
            config.routing.ray_length,
            config.pattern.landing_pads,
        );
        let fingers = FingerPattern::build(
            &rings,
            &sampler,
            design.bonds(),
            config.routing.finger_circle_radius,
        )?;
        let routing = Routing::build(config, design.bonds(), &fingers)?;

        let layout = Self {
            width: config.footprint.width,
            height: config.footprint.height,
            center,
            pad_size: config.die.pad_size,
            rings,
            fingers,
            routing,
        };
        tracing::info!(
            fingers = layout.fingers.len(),
            bonds = layout.routing.bond_wires.len(),
            "Layout computed"
        );
        Ok(layout)
    }

    /// Headline numbers describing the layout.
    #[must_use]
    pub fn summary(&self) -> LayoutSummary {
        LayoutSummary {
            width: self.width,
            height: self.height,
            die_pads: self.routing.pad_centers.len(),
            fingers: self.fingers.len(),
            ground_fingers: self.fingers.ground_count(),
            edge_pads: self.routing.edge_pads.len(),
            bond_wires: self.routing.bond_wires.len(),
            traces: self.routing.traces.len(),
            trace_width: self.routing.trace_width,
        }
    }
}

/// Serializable overview of a layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSummary {
    /// Footprint width (mm).
    pub width: f64,
    /// Footprint height (mm).
    pub height: f64,
    /// Die pads in the pad table.
    pub die_pads: usize,
    /// Landing fingers.
    pub fingers: usize,
    /// Fingers tied to ground.
    pub ground_fingers: usize,
    /// Edge pads on the footprint boundary.
    pub edge_pads: usize,
    /// Bond wires drawn.
    pub bond_wires: usize,
    /// Traces drawn.
    pub traces: usize,
    /// Trace stroke width (mm).
    pub trace_width: f64,
}
