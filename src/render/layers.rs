//! Per-layer drawings of a [`BondLayout`].
//!
//! Elements are emitted in painter's order: later elements cover earlier
//! ones, so the order inside each layer carries meaning.

use std::path::{Path as FsPath, PathBuf};

use super::svg::{Style, SvgDocument};
use crate::geometry::Path;
use crate::layout::{BondLayout, FingerIndex, LayoutResult};

const BOARD: &str = "#008000";
const COPPER_EXPOSED: &str = "#ffff00";
const COPPER_MASKED: &str = "#55d400";
const GOLD: &str = "#aa8800";
const DIE: &str = "#999999";
const WIRE: &str = "#333333";
const BACKGROUND: &str = "#e0e0ff";
const INK: &str = "#000000";
const CLEAR: &str = "#ffc0c0";
const WHITE: &str = "#ffffff";

/// Outline stroke width (mm).
const OUTLINE_WIDTH: f64 = 0.05;
/// Bond wire stroke width (mm).
const WIRE_WIDTH: f64 = 0.02;

/// Output layers, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Colour preview of the assembled bonding.
    Preview,
    /// Copper artwork.
    Copper,
    /// Solder mask openings.
    Mask,
    /// Silkscreen.
    Silkscreen,
    /// Assembly drawing with bond wires.
    User,
}

impl Layer {
    /// Every layer.
    pub const ALL: [Self; 5] = [
        Self::Preview,
        Self::Copper,
        Self::Mask,
        Self::Silkscreen,
        Self::User,
    ];

    /// Output file name.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Preview => "preview.svg",
            Self::Copper => "copper.svg",
            Self::Mask => "mask.svg",
            Self::Silkscreen => "silkscreen.svg",
            Self::User => "user.svg",
        }
    }

    /// Draws this layer.
    #[must_use]
    pub fn render(self, layout: &BondLayout) -> SvgDocument {
        let mut doc = SvgDocument::new(layout.width, layout.height);
        match self {
            Self::Preview => preview(&mut doc, layout),
            Self::Copper => copper(&mut doc, layout),
            Self::Mask => mask(&mut doc, layout),
            Self::Silkscreen => silkscreen(&mut doc, layout),
            Self::User => user(&mut doc, layout),
        }
        doc
    }
}

/// Renders and writes every layer into `out_dir`.
///
/// All documents are rendered before the first file is created.
///
/// # Errors
///
/// Returns [`LayoutError::Io`](crate::layout::LayoutError::Io) naming the
/// first file that could not be written.
pub fn write_layers(layout: &BondLayout, out_dir: &FsPath) -> LayoutResult<Vec<PathBuf>> {
    let documents: Vec<(Layer, SvgDocument)> = Layer::ALL
        .iter()
        .map(|&layer| (layer, layer.render(layout)))
        .collect();

    let mut written = Vec::with_capacity(documents.len());
    for (layer, doc) in documents {
        let path = out_dir.join(layer.file_name());
        doc.write_to(&path)?;
        tracing::info!(
            path = %path.display(),
            elements = doc.element_count(),
            "Wrote layer"
        );
        written.push(path);
    }
    Ok(written)
}

/// Draws each finger from the ground or signal variants, picked by its
/// ground flag.
fn fingers(
    doc: &mut SvgDocument,
    layout: &BondLayout,
    ground: &[(&[Path], &'static str)],
    signal: &[(&[Path], &'static str)],
) {
    for i in 0..layout.fingers.len() {
        let variants = if layout.fingers.is_ground(FingerIndex(i)) {
            ground
        } else {
            signal
        };
        for &(set, color) in variants {
            if let Some(finger) = set.get(i) {
                doc.path(finger, &Style::fill(color));
            }
        }
    }
}

fn bond_wires(doc: &mut SvgDocument, layout: &BondLayout, color: &'static str) {
    let dot = Style::fill(color);
    let wire = Style::stroke(color, WIRE_WIDTH);
    let radius = layout.pad_size / 2.0;
    for bond in &layout.routing.bond_wires {
        doc.circle(bond.start, radius, &dot)
            .circle(bond.end, radius, &dot)
            .line(bond.start, bond.end, &wire);
    }
}

fn dots_and_traces(doc: &mut SvgDocument, layout: &BondLayout, color: &'static str) {
    let dot = Style::fill(color);
    let radius = layout.routing.trace_width / 2.0;
    for &cap in &layout.fingers.caps {
        doc.circle(cap, radius, &dot);
    }
    for &pad in &layout.routing.edge_pads {
        doc.circle(pad, radius, &dot);
    }
    let trace = Style::stroke(color, layout.routing.trace_width);
    doc.paths(layout.routing.traces.iter().map(|t| &t.path), &trace);
}

fn preview(doc: &mut SvgDocument, layout: &BondLayout) {
    let rings = &layout.rings;
    doc.path(&rings.footprint, &Style::fill(BOARD))
        .path(rings.finger_outer.path(), &Style::fill(GOLD))
        .path(rings.mask_outer.path(), &Style::fill(BOARD));

    fingers(
        doc,
        layout,
        &[
            (layout.fingers.ground_masked.as_slice(), COPPER_MASKED),
            (layout.fingers.ground_unmasked.as_slice(), COPPER_EXPOSED),
            (layout.fingers.ground_masked_inner.as_slice(), COPPER_MASKED),
        ],
        &[
            (layout.fingers.signal_masked.as_slice(), COPPER_MASKED),
            (layout.fingers.signal_unmasked.as_slice(), COPPER_EXPOSED),
        ],
    );

    doc.path(rings.ground_outer.path(), &Style::fill(COPPER_MASKED))
        .path(rings.ground_inner.path(), &Style::fill(BOARD))
        .path(rings.mask_inner.path(), &Style::fill(GOLD))
        .paths(&rings.bridges_masked, &Style::fill(COPPER_MASKED))
        .paths(&rings.bridges, &Style::fill(COPPER_EXPOSED))
        .path(rings.ground_pad.path(), &Style::fill(COPPER_EXPOSED))
        .path(&rings.die, &Style::fill(DIE));

    bond_wires(doc, layout, WIRE);
    dots_and_traces(doc, layout, COPPER_MASKED);
    doc.path(
        rings.finger_circle.path(),
        &Style::stroke(WHITE, OUTLINE_WIDTH),
    );
}

fn copper(doc: &mut SvgDocument, layout: &BondLayout) {
    let rings = &layout.rings;
    let ink = Style::fill(INK);
    doc.path(&rings.footprint, &Style::fill(BACKGROUND));

    fingers(
        doc,
        layout,
        &[
            (layout.fingers.ground_masked.as_slice(), INK),
            (layout.fingers.ground_masked_inner.as_slice(), INK),
        ],
        &[(layout.fingers.signal_masked.as_slice(), INK)],
    );

    doc.path(rings.ground_outer.path(), &ink)
        .path(rings.ground_inner.path(), &Style::fill(CLEAR))
        .path(rings.ground_pad.path(), &ink)
        .paths(&rings.bridges_masked, &ink)
        .paths(&rings.bridges, &ink);
    dots_and_traces(doc, layout, INK);
}

fn mask(doc: &mut SvgDocument, layout: &BondLayout) {
    let rings = &layout.rings;
    doc.path(&rings.footprint, &Style::fill(BACKGROUND))
        .path(rings.finger_outer.path(), &Style::fill(INK))
        .path(rings.mask_outer.path(), &Style::fill(CLEAR))
        .path(rings.mask_inner.path(), &Style::fill(INK));
}

fn silkscreen(doc: &mut SvgDocument, layout: &BondLayout) {
    let rings = &layout.rings;
    doc.path(&rings.footprint, &Style::fill(BACKGROUND)).path(
        rings.finger_circle.path(),
        &Style::stroke(INK, OUTLINE_WIDTH),
    );
}

fn user(doc: &mut SvgDocument, layout: &BondLayout) {
    let rings = &layout.rings;
    doc.path(&rings.footprint, &Style::fill(BACKGROUND)).path(
        &rings.die,
        &Style::stroke(INK, WIRE_WIDTH).rounded(),
    );
    bond_wires(doc, layout, INK);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::layout::Design;

    fn reference_layout() -> BondLayout {
        let design = Design::from_config(Config::default()).unwrap();
        BondLayout::build(&design).unwrap()
    }

    #[test]
    fn file_names_are_fixed() {
        let names: Vec<&str> = Layer::ALL.iter().map(|l| l.file_name()).collect();
        assert_eq!(
            names,
            ["preview.svg", "copper.svg", "mask.svg", "silkscreen.svg", "user.svg"]
        );
    }

    #[test]
    fn element_counts_match_layer_contents() {
        let layout = reference_layout();
        // 18 ground fingers draw 3 shapes, 54 signal fingers draw 2.
        let preview_fingers = 18 * 3 + 54 * 2;
        let preview = 3 + preview_fingers + 3 + 2 + 2 + 2 + 63 * 3 + 72 + 64 + 63 + 1;
        assert_eq!(Layer::Preview.render(&layout).element_count(), preview);

        let copper_fingers = 18 * 2 + 54;
        let copper = 1 + copper_fingers + 3 + 2 + 2 + 72 + 64 + 63;
        assert_eq!(Layer::Copper.render(&layout).element_count(), copper);

        assert_eq!(Layer::Mask.render(&layout).element_count(), 4);
        assert_eq!(Layer::Silkscreen.render(&layout).element_count(), 2);
        assert_eq!(Layer::User.render(&layout).element_count(), 2 + 63 * 3);
    }

    #[test]
    fn mask_layer_order() {
        let text = Layer::Mask.render(&reference_layout()).to_svg_string();
        let fills: Vec<&str> = text
            .lines()
            .filter_map(|l| l.split("fill=\"").nth(1))
            .map(|rest| &rest[..7])
            .collect();
        assert_eq!(fills, ["#e0e0ff", "#000000", "#ffc0c0", "#000000"]);
    }
}
