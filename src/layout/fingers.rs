//! Landing fingers, landing-pad anchors and finger caps.

use std::f64::consts::TAU;

use super::error::LayoutResult;
use super::mapping::{BondMap, FingerIndex};
use super::rings::{Ring, RingSet};
use super::sampler::AngularSampler;
use crate::geometry::shapes::polygon;
use crate::geometry::{Path, Point};

/// All finger shapes for one layout.
///
/// Each set holds one quadrilateral per finger index, bounded by the rays at
/// `4i − 1` and `4i + 1` and by an (inner, outer) ring pair. Renderers pick
/// the ground or signal variants per finger.
#[derive(Debug, Clone)]
pub struct FingerPattern {
    /// Exposed part of signal fingers: mask ring outer → finger ring outer.
    pub signal_unmasked: Vec<Path>,
    /// Exposed part of ground fingers: ground ring mid → finger ring outer.
    pub ground_unmasked: Vec<Path>,
    /// Full signal finger copper: finger ring inner → finger circle.
    pub signal_masked: Vec<Path>,
    /// Full ground finger copper: ground ring mid → finger circle.
    pub ground_masked: Vec<Path>,
    /// Ground finger part under the mask ring: ground ring mid → mask ring outer.
    pub ground_masked_inner: Vec<Path>,
    /// Bond wire landing points on the finger bond ring.
    pub landing_pads: Vec<Point>,
    /// Trace start points on the finger circle.
    pub caps: Vec<Point>,
    ground: Vec<bool>,
}

impl FingerPattern {
    /// Samples every finger set against the ring family.
    ///
    /// # Errors
    ///
    /// Returns an error if any sampling ray fails to cross its ring exactly
    /// once.
    pub fn build(
        rings: &RingSet,
        sampler: &AngularSampler,
        bonds: &BondMap,
        finger_circle_radius: f64,
    ) -> LayoutResult<Self> {
        let count = bonds.finger_count();
        let set = |inner: &Ring, outer: &Ring| finger_set(sampler, inner, outer, count);

        let pattern = Self {
            signal_unmasked: set(&rings.mask_outer, &rings.finger_outer)?,
            ground_unmasked: set(&rings.ground_mid, &rings.finger_outer)?,
            signal_masked: set(&rings.finger_inner, &rings.finger_circle)?,
            ground_masked: set(&rings.ground_mid, &rings.finger_circle)?,
            ground_masked_inner: set(&rings.ground_mid, &rings.mask_outer)?,
            landing_pads: (0..count)
                .map(|i| sampler.sample(&rings.finger_bond, ray_index(i, 0)))
                .collect::<LayoutResult<_>>()?,
            caps: finger_caps(sampler.center(), finger_circle_radius, count),
            ground: (0..count)
                .map(|i| bonds.is_ground_finger(FingerIndex(i)))
                .collect(),
        };

        tracing::debug!(
            fingers = count,
            ground = pattern.ground_count(),
            "Synthesised finger pattern"
        );
        Ok(pattern)
    }

    /// Number of fingers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ground.len()
    }

    /// True if the pattern has no fingers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ground.is_empty()
    }

    /// True if `finger` is drawn as a ground finger.
    #[must_use]
    pub fn is_ground(&self, finger: FingerIndex) -> bool {
        self.ground.get(finger.0).copied().unwrap_or(false)
    }

    /// Number of ground fingers.
    #[must_use]
    pub fn ground_count(&self) -> usize {
        self.ground.iter().filter(|&&g| g).count()
    }

    /// Landing point of `finger`.
    #[must_use]
    pub fn landing_pad(&self, finger: FingerIndex) -> Option<Point> {
        self.landing_pads.get(finger.0).copied()
    }

    /// Cap point of `finger`.
    #[must_use]
    pub fn cap(&self, finger: FingerIndex) -> Option<Point> {
        self.caps.get(finger.0).copied()
    }
}

/// Ray index `offset` steps away from finger `finger`'s centre ray.
fn ray_index(finger: usize, offset: i64) -> i64 {
    #[allow(clippy::cast_possible_wrap)]
    let finger = finger as i64;
    4 * finger + offset
}

/// One quadrilateral per finger between `inner` and `outer`.
fn finger_set(
    sampler: &AngularSampler,
    inner: &Ring,
    outer: &Ring,
    count: usize,
) -> LayoutResult<Vec<Path>> {
    (0..count)
        .map(|i| {
            let (before, after) = (ray_index(i, -1), ray_index(i, 1));
            Ok(polygon(&[
                sampler.sample(inner, before)?,
                sampler.sample(outer, before)?,
                sampler.sample(outer, after)?,
                sampler.sample(inner, after)?,
            ]))
        })
        .collect()
}

/// Points on the circle of `radius` at each finger's centre angle.
fn finger_caps(center: Point, radius: f64, count: usize) -> Vec<Point> {
    #[allow(clippy::cast_precision_loss)]
    let step = TAU / count as f64;
    (0..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let (sin, cos) = (i as f64 * step).sin_cos();
            center + Point::new(cos, -sin) * radius
        })
        .collect()
}
