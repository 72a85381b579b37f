//! Builders for the closed outlines used by the footprint.

use std::f64::consts::FRAC_PI_2;

use super::path::Path;
use super::point::Point;
use super::segment::Segment;

/// Bevel angle pair shaping the corners and sides of a ring.
///
/// `phi1` bows the vertical sides, `phi2` the horizontal ones. The remaining
/// turn at each corner is shared by the corner arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bevel {
    /// Tangent deviation of the vertical sides (radians).
    pub phi1: f64,
    /// Tangent deviation of the horizontal sides (radians).
    pub phi2: f64,
}

impl Bevel {
    /// Straight sides with quarter-circle corners.
    pub const NONE: Self = Self::new(0.0, 0.0);

    /// Creates a bevel angle pair.
    #[must_use]
    pub const fn new(phi1: f64, phi2: f64) -> Self {
        Self { phi1, phi2 }
    }

    /// Tangent deviation of the four corner arcs.
    #[must_use]
    pub fn corner_deviation(&self) -> f64 {
        (FRAC_PI_2 - self.phi1 - self.phi2) / 2.0
    }

    /// True if the pair describes a convex ring (`φ1, φ2 ≥ 0`, `φ1 + φ2 < π/2`).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.phi1 >= 0.0 && self.phi2 >= 0.0 && self.phi1 + self.phi2 < FRAC_PI_2
    }
}

/// Cubic Bézier approximating a circular arc along `chord` from `start`.
///
/// `deviation` is the angle between the chord and the tangent at either end,
/// so the arc turns by twice that. A zero deviation yields a straight line
/// with its controls at the chord thirds.
#[must_use]
pub fn arc_bezier(start: Point, chord: Point, deviation: f64) -> Segment {
    let end = start + chord;
    let length = chord.length();
    let Some(dir) = chord.normalized() else {
        return Segment::cubic(start, start, start, start);
    };
    let handle = if deviation.abs() < f64::EPSILON {
        length / 3.0
    } else {
        let radius = length / (2.0 * deviation.sin());
        4.0 / 3.0 * (deviation / 2.0).tan() * radius
    };
    Segment::cubic(
        start,
        start + dir.rotated(deviation) * handle,
        end - dir.rotated(-deviation) * handle,
        end,
    )
}

/// Joins segments built from relative chords head to tail, starting at `origin`.
fn chain(origin: Point, chords: &[(Point, f64)]) -> Path {
    let mut cursor = origin;
    let segments = chords
        .iter()
        .map(|&(chord, deviation)| {
            let seg = arc_bezier(cursor, chord, deviation);
            cursor = seg.end();
            seg
        })
        .collect();
    Path::closed(segments)
}

/// Axis-aligned `w × h` rectangle centred on `center`.
///
/// Starts at the top-right corner and runs left, down, right, up.
#[must_use]
pub fn rectangle(center: Point, w: f64, h: f64) -> Path {
    let top_right = center + Point::new(w / 2.0, -h / 2.0);
    let top_left = top_right + Point::new(-w, 0.0);
    let bottom_left = top_left + Point::new(0.0, h);
    let bottom_right = bottom_left + Point::new(w, 0.0);
    Path::closed(vec![
        Segment::line(top_right, top_left),
        Segment::line(top_left, bottom_left),
        Segment::line(bottom_left, bottom_right),
        Segment::line(bottom_right, top_right),
    ])
}

/// The `w × h` rectangle centred on `center`, grown by `r` with bevelled sides.
///
/// Eight arc-approximating cubics: a corner, the top side, a corner, the left
/// side, and so on counter-clockwise on screen.
#[must_use]
pub fn bevel_rectangle(center: Point, w: f64, h: f64, r: f64, bevel: Bevel) -> Path {
    let (sin1, cos1) = bevel.phi1.sin_cos();
    let (sin2, cos2) = bevel.phi2.sin_cos();
    let corner = bevel.corner_deviation();
    let origin = center + Point::new(w / 2.0 + r * cos1, -h / 2.0 - r * sin1);
    chain(
        origin,
        &[
            (Point::new(r * (sin2 - cos1), r * (sin1 - cos2)), corner),
            (Point::new(-w - 2.0 * r * sin2, 0.0), bevel.phi2),
            (Point::new(r * (sin2 - cos1), r * (cos2 - sin1)), corner),
            (Point::new(0.0, h + 2.0 * r * sin1), bevel.phi1),
            (Point::new(r * (cos1 - sin2), r * (cos2 - sin1)), corner),
            (Point::new(w + 2.0 * r * sin2, 0.0), bevel.phi2),
            (Point::new(r * (cos1 - sin2), r * (sin1 - cos2)), corner),
            (Point::new(0.0, -h - 2.0 * r * sin1), bevel.phi1),
        ],
    )
}

/// The `w × h` rectangle grown by `r` with quarter-circle corners.
#[must_use]
pub fn rounded_rectangle(center: Point, w: f64, h: f64, r: f64) -> Path {
    bevel_rectangle(center, w, h, r, Bevel::NONE)
}

/// Closed polygon through `points`.
#[must_use]
pub fn polygon(points: &[Point]) -> Path {
    let n = points.len();
    if n < 2 {
        return Path::closed(Vec::new());
    }
    Path::closed(
        (0..n)
            .map(|i| Segment::line(points[i], points[(i + 1) % n]))
            .collect(),
    )
}

/// Circle of radius `r` as four quarter arcs, starting at `(cx + r, cy)` and
/// heading up the screen first.
#[must_use]
pub fn circle(center: Point, r: f64) -> Path {
    Path::closed(
        (0..4u8)
            .map(|k| Segment::arc(center, r, -f64::from(k) * FRAC_PI_2, -FRAC_PI_2))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    const CENTER: Point = Point::new(7.5, 8.5);

    #[test]
    fn rectangle_corners_in_order() {
        let nodes = rectangle(CENTER, 3.6, 5.2).nodes();
        let expected = [
            Point::new(9.3, 5.9),
            Point::new(5.7, 5.9),
            Point::new(5.7, 11.1),
            Point::new(9.3, 11.1),
            Point::new(9.3, 5.9),
        ];
        assert_eq!(nodes.len(), expected.len());
        for (node, want) in nodes.iter().zip(expected) {
            assert!(node.approx_eq(want, 1e-12), "{node:?} vs {want:?}");
        }
    }

    #[test]
    fn straight_bezier_controls_at_thirds() {
        let seg = arc_bezier(Point::ORIGIN, Point::new(3.0, 0.0), 0.0);
        let Segment::Cubic {
            control1, control2, ..
        } = seg
        else {
            panic!("expected cubic");
        };
        assert!(control1.approx_eq(Point::new(1.0, 0.0), 1e-12));
        assert!(control2.approx_eq(Point::new(2.0, 0.0), 1e-12));
    }

    #[test]
    fn quarter_arc_midpoint_on_circle() {
        // Quarter turn around the origin from (1, 0) to (0, -1).
        let seg = arc_bezier(Point::new(1.0, 0.0), Point::new(-1.0, -1.0), PI / 4.0);
        let mid = seg.point(0.5);
        assert!(approx_eq(mid.length(), 1.0, 1e-12));
    }

    #[test]
    fn rounded_corners_are_quarter_circles() {
        let r = 0.3;
        let ring = rounded_rectangle(CENTER, 3.6, 5.2, r);
        let corner_center = CENTER + Point::new(1.8, -2.6);
        let corner = ring.segments()[0];
        assert!(approx_eq(corner.start().distance(corner_center), r, 1e-12));
        assert!(approx_eq(corner.end().distance(corner_center), r, 1e-12));
        // The standard cubic approximation hits the circle at its midpoint.
        assert!(approx_eq(corner.point(0.5).distance(corner_center), r, 1e-12));
    }

    #[test]
    fn zero_radius_rounded_matches_rectangle() {
        let rounded = rounded_rectangle(CENTER, 3.6, 5.2, 0.0);
        let plain = rectangle(CENTER, 3.6, 5.2);
        let corners: Vec<Point> = plain.nodes();
        // Every other node of the rounded ring is a (zero-length) corner.
        let rounded_nodes = rounded.nodes();
        for (k, corner) in corners.iter().take(4).enumerate() {
            assert!(rounded_nodes[2 * k].approx_eq(*corner, 1e-12));
            assert!(rounded_nodes[2 * k + 1].approx_eq(*corner, 1e-12));
        }
    }

    #[test]
    fn bevel_ring_closes() {
        let ring = bevel_rectangle(CENTER, 3.6, 5.2, 1.4, Bevel::new(0.07 * PI, 0.09 * PI));
        assert_eq!(ring.segments().len(), 8);
        let (start, end) = (ring.start().unwrap(), ring.end().unwrap());
        assert!(start.approx_eq(end, 1e-12));
        for pair in ring.segments().windows(2) {
            assert!(pair[0].end().approx_eq(pair[1].start(), 1e-12));
        }
    }

    #[test]
    fn bevel_validity() {
        assert!(Bevel::new(0.07 * PI, 0.09 * PI).is_valid());
        assert!(Bevel::NONE.is_valid());
        assert!(!Bevel::new(0.3 * PI, 0.2 * PI).is_valid());
        assert!(!Bevel::new(-0.1, 0.0).is_valid());
    }

    #[test]
    fn circle_starts_right_and_heads_up() {
        let c = circle(CENTER, 5.4);
        assert!(c.start().unwrap().approx_eq(Point::new(12.9, 8.5), 1e-12));
        assert!(c.segments()[0]
            .end()
            .approx_eq(Point::new(7.5, 3.1), 1e-12));
        assert!(c.end().unwrap().approx_eq(c.start().unwrap(), 1e-12));
    }

    #[test]
    fn polygon_closes() {
        let tri = polygon(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        assert_eq!(tri.segments().len(), 3);
        assert_eq!(tri.start(), tri.end());
    }
}
