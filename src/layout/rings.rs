//! The nested ring family around the die.
//!
//! Rings are closed outlines at increasing offsets from the die edge. They
//! are drawn directly on the output layers and double as the sampling
//! surfaces that bound the fingers.

use crate::config::Config;
use crate::geometry::shapes::{bevel_rectangle, circle, rectangle, rounded_rectangle};
use crate::geometry::Path;

/// A closed ring outline with its nominal offset from the die edge.
#[derive(Debug, Clone)]
pub struct Ring {
    name: &'static str,
    offset: f64,
    path: Path,
}

impl Ring {
    /// Creates a named ring.
    #[must_use]
    pub const fn new(name: &'static str, offset: f64, path: Path) -> Self {
        Self { name, offset, path }
    }

    /// Name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Offset from the die edge (mm).
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// The ring outline.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }
}

/// Every outline derived from the die and footprint geometry.
#[derive(Debug, Clone)]
pub struct RingSet {
    /// Die outline.
    pub die: Path,
    /// Exposed ground pad under the die.
    pub ground_pad: Ring,
    /// Thermal relief bridges reaching under the mask.
    pub bridges_masked: [Path; 2],
    /// Exposed thermal relief bridges.
    pub bridges: [Path; 2],
    /// Inner edge of the mask opening.
    pub mask_inner: Ring,
    /// Inner edge of the ground ring.
    pub ground_inner: Ring,
    /// Inner edge of the ground fingers.
    pub ground_mid: Ring,
    /// Outer edge of the ground ring.
    pub ground_outer: Ring,
    /// Inner edge of the masked signal fingers.
    pub finger_inner: Ring,
    /// Outer edge of the mask ring.
    pub mask_outer: Ring,
    /// Landing-pad anchor ring.
    pub finger_bond: Ring,
    /// Outer edge of the exposed fingers.
    pub finger_outer: Ring,
    /// Circle bounding the masked fingers.
    pub finger_circle: Ring,
    /// Footprint outline.
    pub footprint: Path,
}

impl RingSet {
    /// Builds all rings for a validated configuration.
    #[must_use]
    pub fn build(config: &Config) -> Self {
        let center = config.footprint.center();
        let (w, h) = (config.die.width, config.die.height);
        let rings = &config.pattern.rings;
        let bevel = config.pattern.bevel();

        let bevelled = |name, offset| {
            Ring::new(name, offset, bevel_rectangle(center, w, h, offset, bevel))
        };
        let rounded = |name, offset| Ring::new(name, offset, rounded_rectangle(center, w, h, offset));
        let bridge_pair = |extension: f64| {
            [
                rectangle(center, w + extension, rings.bridge_width),
                rectangle(center, rings.bridge_width, h + extension),
            ]
        };

        let radius = config.routing.finger_circle_radius;
        let set = Self {
            die: rectangle(center, w, h),
            ground_pad: rounded("ground_pad", rings.ground_pad),
            bridges_masked: bridge_pair(rings.bridge_masked_extension),
            bridges: bridge_pair(rings.bridge_extension),
            mask_inner: rounded("mask_inner", rings.mask_inner),
            ground_inner: bevelled("ground_inner", rings.ground_inner),
            ground_mid: bevelled("ground_mid", rings.ground_mid),
            ground_outer: bevelled("ground_outer", rings.ground_outer),
            finger_inner: bevelled("finger_inner", rings.finger_inner),
            mask_outer: bevelled("mask_outer", rings.mask_outer),
            finger_bond: bevelled("finger_bond", rings.finger_bond),
            finger_outer: bevelled("finger_outer", rings.finger_outer),
            finger_circle: Ring::new(
                "finger_circle",
                radius - (w / 2.0).hypot(h / 2.0),
                circle(center, radius),
            ),
            footprint: rectangle(center, config.footprint.width, config.footprint.height),
        };
        tracing::debug!(
            rings = set.ordered().len(),
            bevel_phi1 = bevel.phi1,
            bevel_phi2 = bevel.phi2,
            "Built ring family"
        );
        set
    }

    /// The offset rings, innermost first.
    #[must_use]
    pub fn ordered(&self) -> [&Ring; 10] {
        [
            &self.ground_pad,
            &self.mask_inner,
            &self.ground_inner,
            &self.ground_mid,
            &self.ground_outer,
            &self.finger_inner,
            &self.mask_outer,
            &self.finger_bond,
            &self.finger_outer,
            &self.finger_circle,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn reference_rings_are_ordered_by_offset() {
        let set = RingSet::build(&Config::default());
        for pair in set.ordered().windows(2) {
            assert!(
                pair[0].offset() < pair[1].offset(),
                "{} !< {}",
                pair[0].name(),
                pair[1].name()
            );
        }
    }

    #[test]
    fn outlines_are_closed() {
        let set = RingSet::build(&Config::default());
        for ring in set.ordered() {
            let path = ring.path();
            assert!(path.is_closed());
            assert!(path
                .start()
                .unwrap()
                .approx_eq(path.end().unwrap(), 1e-9));
        }
        assert_eq!(set.die.segments().len(), 4);
        assert_eq!(set.finger_bond.path().segments().len(), 8);
        assert_eq!(set.finger_circle.path().segments().len(), 4);
    }

    #[test]
    fn bridges_span_the_die() {
        let set = RingSet::build(&Config::default());
        let nodes = set.bridges_masked[0].nodes();
        // Top-right corner of the (3.6 + 1.7) × 0.3 bar around (7.5, 8.5).
        assert!(nodes[0].approx_eq(Point::new(10.15, 8.35), 1e-12));
        let nodes = set.bridges[1].nodes();
        assert!(nodes[0].approx_eq(Point::new(7.65, 5.6), 1e-12));
    }

    #[test]
    fn footprint_covers_the_board() {
        let set = RingSet::build(&Config::default());
        let nodes = set.footprint.nodes();
        assert!(nodes[0].approx_eq(Point::new(15.0, 0.0), 1e-12));
        assert!(nodes[2].approx_eq(Point::new(0.0, 17.0), 1e-12));
    }
}
