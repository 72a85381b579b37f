//! Layout generation tests against the reference design.
//!
//! Tests cover finger synthesis, ground classification, bond wire and trace
//! endpoints, and rejection of inconsistent mapping tables.

use bondfan::config::Config;
use bondfan::error::ConfigError;
use bondfan::geometry::{Point, Segment};
use bondfan::layout::{BondLayout, Design, FingerIndex};

const GROUND_FINGERS: [usize; 18] = [
    11, 12, 14, 18, 24, 25, 29, 38, 47, 48, 49, 52, 58, 60, 61, 62, 70, 71,
];

fn reference_design() -> Design {
    Design::from_config(Config::default()).expect("Reference design must validate")
}

fn reference_layout() -> BondLayout {
    BondLayout::build(&reference_design()).expect("Reference layout must build")
}

// =============================================================================
// Counts
// =============================================================================

#[test]
fn every_finger_set_has_one_shape_per_finger() {
    let layout = reference_layout();
    let fingers = &layout.fingers;
    assert_eq!(fingers.len(), 72);
    for set in [
        &fingers.signal_unmasked,
        &fingers.ground_unmasked,
        &fingers.signal_masked,
        &fingers.ground_masked,
        &fingers.ground_masked_inner,
    ] {
        assert_eq!(set.len(), 72);
    }
    assert_eq!(fingers.landing_pads.len(), 72);
    assert_eq!(fingers.caps.len(), 72);
}

#[test]
fn one_wire_and_trace_per_bonded_pad() {
    let design = reference_design();
    let layout = BondLayout::build(&design).expect("Reference layout must build");
    assert_eq!(design.bonds().bonded_count(), 63);
    assert_eq!(layout.routing.bond_wires.len(), 63);
    assert_eq!(layout.routing.traces.len(), 63);
    assert_eq!(layout.routing.edge_pads.len(), 64);
}

// =============================================================================
// Ground classification
// =============================================================================

#[test]
fn ground_fingers_match_reference_tables() {
    let layout = reference_layout();
    let ground: Vec<usize> = (0..layout.fingers.len())
        .filter(|&i| layout.fingers.is_ground(FingerIndex(i)))
        .collect();
    assert_eq!(ground, GROUND_FINGERS);
}

#[test]
fn finger_of_die_pad_3_is_ground() {
    let design = reference_design();
    let bond = design.bonds().bond(3).expect("Die pad 3 is bonded");
    assert_eq!(bond.finger, FingerIndex(29));
    assert!(design.bonds().is_ground_finger(bond.finger));
}

#[test]
fn ground_iff_unmapped_or_ground_pad() {
    let design = reference_design();
    let bonds = design.bonds();
    for i in 0..bonds.finger_count() {
        let finger = FingerIndex(i);
        let expected = bonds
            .pad_for_finger(finger)
            .map_or(true, |pad| bonds.is_ground_pad(pad));
        assert_eq!(bonds.is_ground_finger(finger), expected, "finger {i}");
    }
}

// =============================================================================
// Routing endpoints
// =============================================================================

#[test]
fn bond_wires_join_pad_centres_to_landing_pads() {
    let design = reference_design();
    let layout = BondLayout::build(&design).expect("Reference layout must build");
    let center = design.config().footprint.center();
    for wire in &layout.routing.bond_wires {
        let pad = design.config().die.pads[wire.pad];
        assert!(wire.start.approx_eq(center + pad, 1e-12));
        let bond = design.bonds().bond(wire.pad).expect("Wire implies bond");
        assert_eq!(wire.finger, bond.finger);
        assert_eq!(Some(wire.end), layout.fingers.landing_pad(bond.finger));
    }
}

#[test]
fn traces_run_from_caps_to_edge_pads() {
    let design = reference_design();
    let layout = BondLayout::build(&design).expect("Reference layout must build");
    for trace in &layout.routing.traces {
        let bond = design.bonds().bond(trace.pad).expect("Trace implies bond");
        assert_eq!(trace.path.start(), layout.fingers.cap(bond.finger));
        assert_eq!(
            trace.path.end(),
            layout.routing.edge_pads.get(bond.edge.0).copied()
        );
        assert!(matches!(trace.path.segments(), [Segment::Cubic { .. }]));
    }
}

#[test]
fn caps_lie_on_finger_circle() {
    let layout = reference_layout();
    for cap in &layout.fingers.caps {
        assert!((cap.distance(layout.center) - 5.4).abs() < 1e-9);
    }
}

#[test]
fn landing_pads_are_inside_finger_circle() {
    let layout = reference_layout();
    for pad in &layout.fingers.landing_pads {
        let r = pad.distance(layout.center);
        assert!(r > 1.8 && r < 5.4, "landing pad at radius {r}");
    }
}

// =============================================================================
// Summary
// =============================================================================

#[test]
fn summary_serialises() {
    let summary = reference_layout().summary();
    let json = serde_json::to_value(&summary).expect("Summary serialises");
    assert_eq!(json["fingers"], 72);
    assert_eq!(json["ground_fingers"], 18);
    assert_eq!(json["bond_wires"], 63);
    let width = json["trace_width"].as_f64().expect("Numeric trace width");
    assert!((width - 0.235_619_449_019_234_5).abs() < 1e-12);
}

// =============================================================================
// Rejected designs
// =============================================================================

#[test]
fn reused_finger_is_rejected() {
    let mut config = Config::default();
    config.mapping.die_to_finger[1] = config.mapping.die_to_finger[0];
    let err = Design::from_config(config).expect_err("Duplicate finger must fail");
    assert!(matches!(err, ConfigError::MappingIntegrity { pad: 1, .. }));
}

#[test]
fn half_mapped_pad_is_rejected() {
    let mut config = Config::default();
    config.mapping.die_to_edge[5] = None;
    let err = Design::from_config(config).expect_err("Half mapping must fail");
    assert!(matches!(err, ConfigError::MappingIntegrity { pad: 5, .. }));
}

#[test]
fn custom_pad_table_lays_out() {
    let mut config = Config::default();
    config.die.pads = vec![
        Point::new(-1.0, -2.0),
        Point::new(1.0, -2.0),
        Point::new(1.0, 2.0),
        Point::new(-1.0, 2.0),
    ];
    config.die.ground_pads = vec![0];
    config.mapping.die_to_finger = vec![Some(27), Some(9), Some(63), Some(45)];
    config.mapping.die_to_edge = vec![Some(60), Some(50), Some(30), Some(10)];

    let design = Design::from_config(config).expect("Small design validates");
    let layout = BondLayout::build(&design).expect("Small design lays out");
    let summary = layout.summary();
    assert_eq!(summary.die_pads, 4);
    assert_eq!(summary.bond_wires, 4);
    // 68 unbonded fingers plus finger 27 on the ground pad.
    assert_eq!(summary.ground_fingers, 69);
}
