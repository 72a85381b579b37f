//! Path segments: straight lines, cubic Béziers and circular arcs.

use std::f64::consts::TAU;
use std::fmt::Write;

use super::point::Point;
use super::roots::{self, PARAMETER_TOLERANCE};

/// One segment of a [`Path`](super::Path).
///
/// Arc angles are measured in drawing space: `point(t) = center + radius·(cos θ, sin θ)`
/// with `θ = start_angle + t·sweep`. Because y points down, a positive sweep
/// turns clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Straight line.
    Line {
        /// Start point.
        start: Point,
        /// End point.
        end: Point,
    },
    /// Cubic Bézier curve.
    Cubic {
        /// Start point.
        start: Point,
        /// First control point.
        control1: Point,
        /// Second control point.
        control2: Point,
        /// End point.
        end: Point,
    },
    /// Circular arc.
    Arc {
        /// Arc centre.
        center: Point,
        /// Arc radius (mm).
        radius: f64,
        /// Angle of the start point (radians).
        start_angle: f64,
        /// Signed angular extent (radians).
        sweep: f64,
    },
}

/// An intersection between a segment and a straight line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Parameter along this segment.
    pub t_self: f64,
    /// Parameter along the other (line) segment.
    pub t_other: f64,
}

impl Segment {
    /// Creates a straight line.
    #[must_use]
    pub const fn line(start: Point, end: Point) -> Self {
        Self::Line { start, end }
    }

    /// Creates a cubic Bézier.
    #[must_use]
    pub const fn cubic(start: Point, control1: Point, control2: Point, end: Point) -> Self {
        Self::Cubic {
            start,
            control1,
            control2,
            end,
        }
    }

    /// Creates a circular arc.
    #[must_use]
    pub const fn arc(center: Point, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Self::Arc {
            center,
            radius,
            start_angle,
            sweep,
        }
    }

    /// Start point.
    #[must_use]
    pub fn start(&self) -> Point {
        match *self {
            Self::Line { start, .. } | Self::Cubic { start, .. } => start,
            Self::Arc { .. } => self.point(0.0),
        }
    }

    /// End point.
    #[must_use]
    pub fn end(&self) -> Point {
        match *self {
            Self::Line { end, .. } | Self::Cubic { end, .. } => end,
            Self::Arc { .. } => self.point(1.0),
        }
    }

    /// Evaluates the segment at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point(&self, t: f64) -> Point {
        match *self {
            Self::Line { start, end } => start.lerp(end, t),
            Self::Cubic {
                start,
                control1,
                control2,
                end,
            } => {
                let m = 1.0 - t;
                start * (m * m * m)
                    + control1 * (3.0 * m * m * t)
                    + control2 * (3.0 * m * t * t)
                    + end * (t * t * t)
            }
            Self::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => center + Point::from_angle(t.mul_add(sweep, start_angle)) * radius,
        }
    }

    /// Returns the segment moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Point) -> Self {
        match *self {
            Self::Line { start, end } => Self::line(start + offset, end + offset),
            Self::Cubic {
                start,
                control1,
                control2,
                end,
            } => Self::cubic(
                start + offset,
                control1 + offset,
                control2 + offset,
                end + offset,
            ),
            Self::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => Self::arc(center + offset, radius, start_angle, sweep),
        }
    }

    /// True if the segment collapses to a single point.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match *self {
            Self::Line { start, end } => start == end,
            Self::Cubic {
                start,
                control1,
                control2,
                end,
            } => start == control1 && start == control2 && start == end,
            Self::Arc { radius, sweep, .. } => radius == 0.0 || sweep == 0.0,
        }
    }

    /// Intersects this segment with the straight segment `from → to`.
    ///
    /// Degenerate segments and collinear overlaps produce no hits.
    #[must_use]
    pub fn intersect_line(&self, from: Point, to: Point) -> Vec<SegmentHit> {
        let dir = to - from;
        let len_sq = dir.dot(dir);
        if len_sq == 0.0 || self.is_degenerate() {
            return Vec::new();
        }
        let on_line = |t: f64| (-PARAMETER_TOLERANCE..=1.0 + PARAMETER_TOLERANCE).contains(&t);

        match *self {
            Self::Line { start, end } => {
                let own = end - start;
                let denom = own.cross(dir);
                if denom.abs() <= f64::EPSILON * own.length() * dir.length() {
                    return Vec::new();
                }
                let rel = from - start;
                let t_self = rel.cross(dir) / denom;
                let t_other = rel.cross(own) / denom;
                if on_line(t_self) && on_line(t_other) {
                    vec![SegmentHit {
                        t_self: t_self.clamp(0.0, 1.0),
                        t_other: t_other.clamp(0.0, 1.0),
                    }]
                } else {
                    Vec::new()
                }
            }
            Self::Cubic {
                start,
                control1,
                control2,
                end,
            } => {
                // Project the power-basis coefficients onto the line normal.
                let Some(normal) = dir.perpendicular().normalized() else {
                    return Vec::new();
                };
                let a = -start + control1 * 3.0 - control2 * 3.0 + end;
                let b = start * 3.0 - control1 * 6.0 + control2 * 3.0;
                let c = (control1 - start) * 3.0;
                let d = start - from;
                let candidates = roots::solve_cubic(
                    normal.dot(a),
                    normal.dot(b),
                    normal.dot(c),
                    normal.dot(d),
                );
                roots::unit_interval(candidates)
                    .into_iter()
                    .filter_map(|t_self| {
                        let t_other = (self.point(t_self) - from).dot(dir) / len_sq;
                        on_line(t_other).then(|| SegmentHit {
                            t_self,
                            t_other: t_other.clamp(0.0, 1.0),
                        })
                    })
                    .collect()
            }
            Self::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let rel = from - center;
                let candidates = roots::solve_quadratic(
                    len_sq,
                    2.0 * dir.dot(rel),
                    rel.dot(rel) - radius * radius,
                );
                roots::unit_interval(candidates)
                    .into_iter()
                    .filter_map(|t_other| {
                        let p = from + dir * t_other;
                        let angle = (p.y - center.y).atan2(p.x - center.x);
                        arc_parameter(start_angle, sweep, angle)
                            .map(|t_self| SegmentHit { t_self, t_other })
                    })
                    .collect()
            }
        }
    }

    /// Appends the SVG path command drawing this segment from its start point.
    pub(crate) fn write_svg_command(&self, out: &mut String) {
        match *self {
            Self::Line { end, .. } => {
                let _ = write!(out, " L {} {}", fmt_coord(end.x), fmt_coord(end.y));
            }
            Self::Cubic {
                control1,
                control2,
                end,
                ..
            } => {
                let _ = write!(
                    out,
                    " C {} {} {} {} {} {}",
                    fmt_coord(control1.x),
                    fmt_coord(control1.y),
                    fmt_coord(control2.x),
                    fmt_coord(control2.y),
                    fmt_coord(end.x),
                    fmt_coord(end.y)
                );
            }
            Self::Arc { radius, sweep, .. } => {
                let end = self.end();
                let large_arc = u8::from(sweep.abs() > std::f64::consts::PI);
                let sweep_flag = u8::from(sweep > 0.0);
                let _ = write!(
                    out,
                    " A {r} {r} 0 {large_arc} {sweep_flag} {} {}",
                    fmt_coord(end.x),
                    fmt_coord(end.y),
                    r = fmt_coord(radius),
                );
            }
        }
    }
}

/// Maps an absolute angle onto an arc's `[0, 1]` parameter range.
fn arc_parameter(start_angle: f64, sweep: f64, angle: f64) -> Option<f64> {
    let delta = if sweep >= 0.0 {
        (angle - start_angle).rem_euclid(TAU)
    } else {
        (start_angle - angle).rem_euclid(TAU)
    };
    let extent = sweep.abs();
    let tolerance = PARAMETER_TOLERANCE * extent.max(1.0);
    if delta <= extent + tolerance {
        Some((delta / extent).clamp(0.0, 1.0))
    } else if TAU - delta <= tolerance {
        // Just short of a full turn: the start point itself.
        Some(0.0)
    } else {
        None
    }
}

/// Formats a coordinate with nanometre resolution and no trailing zeros.
#[must_use]
pub fn fmt_coord(value: f64) -> String {
    let mut s = format!("{value:.6}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
