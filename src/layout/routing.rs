//! Bond wires from die pads to fingers and traces from fingers to edge pads.

use std::f64::consts::PI;

use serde::Serialize;

use super::error::{LayoutError, LayoutResult};
use super::fingers::FingerPattern;
use super::mapping::{BondMap, EdgePadIndex, FingerIndex};
use crate::config::{Config, FootprintConfig};
use crate::geometry::{Path, Point, Segment};

/// Straight wire from a die pad to its landing pad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BondWire {
    /// Die pad index.
    pub pad: usize,
    /// Receiving finger.
    pub finger: FingerIndex,
    /// Die pad centre.
    pub start: Point,
    /// Landing pad on the finger.
    pub end: Point,
}

/// Cubic trace from a finger cap to an edge pad.
#[derive(Debug, Clone)]
pub struct Trace {
    /// Die pad index.
    pub pad: usize,
    /// Target edge pad.
    pub edge: EdgePadIndex,
    /// The trace centreline.
    pub path: Path,
}

/// Everything connecting die pads to the board edge.
#[derive(Debug, Clone)]
pub struct Routing {
    /// Die pad centres in drawing space.
    pub pad_centers: Vec<Point>,
    /// Edge pad centres in drawing space.
    pub edge_pads: Vec<Point>,
    /// One wire per bonded die pad.
    pub bond_wires: Vec<BondWire>,
    /// One trace per bonded die pad.
    pub traces: Vec<Trace>,
    /// Stroke width of traces, caps and edge pads (mm).
    pub trace_width: f64,
}

impl Routing {
    /// Routes every bonded die pad.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnresolvedBond`] if a bond names a die pad,
    /// finger or edge pad that `config` and `fingers` do not provide.
    pub fn build(
        config: &Config,
        bonds: &BondMap,
        fingers: &FingerPattern,
    ) -> LayoutResult<Self> {
        let center = config.footprint.center();
        let pad_centers: Vec<Point> = config.die.pads.iter().map(|&p| center + p).collect();
        let edge_pads = edge_pad_positions(&config.footprint);
        let routing = &config.routing;

        let mut bond_wires = Vec::with_capacity(bonds.bonded_count());
        let mut traces = Vec::with_capacity(bonds.bonded_count());
        for (pad, bond) in bonds.bonded() {
            let (Some(&start), Some(landing), Some(cap), Some(&edge)) = (
                pad_centers.get(pad),
                fingers.landing_pad(bond.finger),
                fingers.cap(bond.finger),
                edge_pads.get(bond.edge.0),
            ) else {
                return Err(LayoutError::UnresolvedBond {
                    pad,
                    finger: bond.finger.0,
                    edge: bond.edge.0,
                });
            };

            bond_wires.push(BondWire {
                pad,
                finger: bond.finger,
                start,
                end: landing,
            });
            traces.push(Trace {
                pad,
                edge: bond.edge,
                path: Path::open(vec![Segment::cubic(
                    cap,
                    cap.scaled_from(center, routing.cap_pull),
                    edge.scaled_from(center, routing.edge_pull),
                    edge,
                )]),
            });
        }

        let trace_width = trace_width(routing.finger_circle_radius, fingers.len());
        tracing::debug!(
            wires = bond_wires.len(),
            edge_pads = edge_pads.len(),
            trace_width,
            "Routed bond wires and traces"
        );

        Ok(Self {
            pad_centers,
            edge_pads,
            bond_wires,
            traces,
            trace_width,
        })
    }
}

/// Half the finger pitch along the finger circle.
#[must_use]
pub fn trace_width(finger_circle_radius: f64, fingers: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let count = fingers.max(1) as f64;
    2.0 * PI * finger_circle_radius / (2.0 * count)
}

/// Edge pad centres in drawing space.
///
/// Pads run down the left side, along the bottom to the right, up the right
/// side and back along the top, each row centred on its side.
#[must_use]
pub fn edge_pad_positions(footprint: &FootprintConfig) -> Vec<Point> {
    let center = footprint.center();
    let (half_w, half_h) = (footprint.width / 2.0, footprint.height / 2.0);
    let raster = footprint.edge_raster;

    #[allow(clippy::cast_precision_loss)]
    let row = |count: usize| -> Vec<f64> {
        let mid = (count as f64 - 1.0) / 2.0;
        (0..count).map(|i| (i as f64 - mid) * raster).collect()
    };

    // Board coordinates, y up.
    let board = row(footprint.left_pads)
        .into_iter()
        .map(|v| Point::new(-half_w, -v))
        .chain(
            row(footprint.bottom_pads)
                .into_iter()
                .map(|v| Point::new(v, -half_h)),
        )
        .chain(
            row(footprint.right_pads)
                .into_iter()
                .map(|v| Point::new(half_w, v)),
        )
        .chain(
            row(footprint.top_pads)
                .into_iter()
                .map(|v| Point::new(-v, half_h)),
        );

    board
        .map(|p| center + Point::new(p.x, -p.y))
        .collect()
}
