//! Angular sampling of rings by rays cast from the footprint centre.

use std::f64::consts::TAU;

use super::error::{LayoutError, LayoutResult};
use super::rings::Ring;
use crate::geometry::Point;

/// Crossings closer than this along the ray (mm) are the same crossing.
const MERGE_DISTANCE: f64 = 1e-9;

/// Casts rays at `divisions` equally spaced angles from a fixed centre.
///
/// Ray `index` leaves the centre at angle `index / divisions · 2π`, turning
/// anticlockwise on the board (clockwise on screen, where y points down).
#[derive(Debug, Clone, Copy)]
pub struct AngularSampler {
    center: Point,
    ray_length: f64,
    divisions: i64,
}

impl AngularSampler {
    /// Creates a sampler with four rays per landing finger.
    #[must_use]
    pub fn new(center: Point, ray_length: f64, landing_pads: usize) -> Self {
        let divisions = i64::try_from(landing_pads.saturating_mul(4)).unwrap_or(i64::MAX);
        Self {
            center,
            ray_length,
            divisions: divisions.max(1),
        }
    }

    /// The ray origin.
    #[must_use]
    pub const fn center(&self) -> Point {
        self.center
    }

    /// Number of rays in a full turn.
    #[must_use]
    pub const fn divisions(&self) -> i64 {
        self.divisions
    }

    /// Angle of ray `index` in radians, reduced to one turn.
    #[must_use]
    pub fn angle(&self, index: i64) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let fraction = index.rem_euclid(self.divisions) as f64 / self.divisions as f64;
        fraction * TAU
    }

    /// End point of ray `index`.
    #[must_use]
    pub fn ray_end(&self, index: i64) -> Point {
        let (sin, cos) = self.angle(index).sin_cos();
        self.center + Point::new(cos, -sin) * self.ray_length
    }

    /// The single point where ray `index` crosses `ring`.
    ///
    /// A crossing exactly on a joint between two segments counts once.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::RayIntersection`] unless the ray crosses the
    /// ring exactly once.
    pub fn sample(&self, ring: &Ring, index: i64) -> LayoutResult<Point> {
        let end = self.ray_end(index);
        let mut along: Vec<f64> = ring
            .path()
            .intersect_line(self.center, end)
            .iter()
            .map(|hit| hit.t_other)
            .collect();
        along.sort_by(f64::total_cmp);
        along.dedup_by(|a, b| (*a - *b).abs() * self.ray_length <= MERGE_DISTANCE);

        match along.as_slice() {
            [t] => Ok(self.center.lerp(end, *t)),
            hits => {
                tracing::debug!(
                    ring = ring.name(),
                    index,
                    hits = hits.len(),
                    "Ray does not cross ring exactly once"
                );
                Err(LayoutError::ray_intersection(ring.name(), index, hits.len()))
            }
        }
    }
}
