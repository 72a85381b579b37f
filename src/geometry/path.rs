//! Ordered segment sequences forming open or closed outlines.

use std::fmt::Write;

use super::point::Point;
use super::segment::{fmt_coord, Segment};

/// An intersection between a path and a straight line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Index of the segment that was hit.
    pub segment: usize,
    /// Parameter along the hit segment.
    pub t_self: f64,
    /// Parameter along the line.
    pub t_other: f64,
    /// Intersection point.
    pub point: Point,
}

/// A sequence of connected segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    segments: Vec<Segment>,
    closed: bool,
}

impl Path {
    /// Creates a path from its segments.
    #[must_use]
    pub const fn new(segments: Vec<Segment>, closed: bool) -> Self {
        Self { segments, closed }
    }

    /// Creates an open path.
    #[must_use]
    pub const fn open(segments: Vec<Segment>) -> Self {
        Self::new(segments, false)
    }

    /// Creates a closed path.
    #[must_use]
    pub const fn closed(segments: Vec<Segment>) -> Self {
        Self::new(segments, true)
    }

    /// The path's segments in drawing order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True if the path ends where it starts.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// True if the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Start point of the first segment.
    #[must_use]
    pub fn start(&self) -> Option<Point> {
        self.segments.first().map(Segment::start)
    }

    /// End point of the last segment.
    #[must_use]
    pub fn end(&self) -> Option<Point> {
        self.segments.last().map(Segment::end)
    }

    /// Returns the path moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Point) -> Self {
        Self::new(
            self.segments.iter().map(|s| s.translated(offset)).collect(),
            self.closed,
        )
    }

    /// Evaluates the path at `t` in `[0, 1]`, with each segment taking an
    /// equal share of the parameter range.
    #[must_use]
    pub fn point(&self, t: f64) -> Option<Point> {
        let n = self.segments.len();
        if n == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let scaled = t.clamp(0.0, 1.0) * n as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = (scaled.floor() as usize).min(n - 1);
        #[allow(clippy::cast_precision_loss)]
        let local = scaled - index as f64;
        Some(self.segments[index].point(local))
    }

    /// Start points of every segment followed by the final end point.
    #[must_use]
    pub fn nodes(&self) -> Vec<Point> {
        let mut nodes: Vec<Point> = self.segments.iter().map(Segment::start).collect();
        if let Some(end) = self.end() {
            nodes.push(end);
        }
        nodes
    }

    /// Intersects every segment with the straight segment `from → to`.
    ///
    /// Results are ordered by segment index and then by position along the
    /// segment. A hit exactly on a shared node appears once per segment.
    #[must_use]
    pub fn intersect_line(&self, from: Point, to: Point) -> Vec<Intersection> {
        self.segments
            .iter()
            .enumerate()
            .flat_map(|(segment, seg)| {
                seg.intersect_line(from, to)
                    .into_iter()
                    .map(move |hit| Intersection {
                        segment,
                        t_self: hit.t_self,
                        t_other: hit.t_other,
                        point: seg.point(hit.t_self),
                    })
            })
            .collect()
    }

    /// Signed area enclosed by the polygon through the path's nodes.
    ///
    /// Positive when the nodes run clockwise on screen (y down).
    #[must_use]
    pub fn polygon_area(&self) -> f64 {
        let nodes = self.nodes();
        if nodes.len() < 3 {
            return 0.0;
        }
        let twice: f64 = nodes
            .iter()
            .zip(nodes.iter().cycle().skip(1))
            .map(|(a, b)| a.cross(*b))
            .sum();
        twice / 2.0
    }

    /// SVG `d` attribute for this path.
    #[must_use]
    pub fn to_svg_data(&self) -> String {
        let Some(start) = self.start() else {
            return String::new();
        };
        let mut out = format!("M {} {}", fmt_coord(start.x), fmt_coord(start.y));
        let mut cursor = start;
        for seg in &self.segments {
            let seg_start = seg.start();
            if !seg_start.approx_eq(cursor, 1e-9) {
                let _ = write!(
                    out,
                    " M {} {}",
                    fmt_coord(seg_start.x),
                    fmt_coord(seg_start.y)
                );
            }
            seg.write_svg_command(&mut out);
            cursor = seg.end();
        }
        if self.closed {
            out.push_str(" Z");
        }
        out
    }
}
