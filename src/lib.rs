//! bondfan: bond-wire fan-out footprints for bare dies on carrier boards
//!
//! This library computes the copper, solder mask, silkscreen and assembly
//! artwork for a radial fan-out from a rectangular die to a ring of landing
//! fingers and on to pads along the board edge.
//!
//! # Architecture
//!
//! Everything is derived once from an immutable, validated configuration:
//!
//! - **Rings**: nested outlines at increasing offsets from the die edge
//! - **Fingers**: sectors cut from ring pairs by rays from the footprint centre
//! - **Routing**: straight bond wires to the fingers, cubic traces to the edge
//! - **Layers**: one SVG document per manufacturing layer
//!
//! The die pad table itself comes from the chip layout through the
//! [`extract`] module.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Configuration error types
//! - [`geometry`]: Points, segments, paths and shape builders
//! - [`layout`]: Ring, finger and routing synthesis
//! - [`render`]: SVG layer output
//! - [`extract`]: Die pad coordinates from GDSII layouts
//! - [`logging`]: Log level selection and subscriber setup

pub mod config;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod render;
