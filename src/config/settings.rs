//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format. Every
//! section is optional; missing sections and fields fall back to the built-in
//! reference design.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::reference;
use crate::error::ConfigError;
use crate::geometry::{Bevel, Point};
use crate::layout::BondMap;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default, skip_serializing_if = "Option::is_none")]
    _comment: Option<String>,

    /// Die geometry and pad table.
    #[serde(default)]
    pub die: DieConfig,

    /// Carrier footprint geometry.
    #[serde(default)]
    pub footprint: FootprintConfig,

    /// Finger pattern constants.
    #[serde(default)]
    pub pattern: PatternConfig,

    /// Bond wire and trace routing constants.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Die pad → finger and die pad → edge pad tables.
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// Runs every geometric sanity check and the mapping integrity checks, so
    /// a validated configuration can be laid out without further checks.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.die.validate()?;
        self.footprint.validate()?;
        self.pattern.validate()?;
        self.routing.validate()?;
        self.logging.validate()?;
        BondMap::from_config(self)?;
        Ok(())
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::validation(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

/// Die geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DieConfig {
    /// Die width in mm.
    #[serde(default = "default_die_width")]
    pub width: f64,

    /// Die height in mm.
    #[serde(default = "default_die_height")]
    pub height: f64,

    /// Pad centres relative to the die centre, in drawing orientation (mm).
    #[serde(default = "default_pads")]
    pub pads: Vec<Point>,

    /// Diameter of the pad and landing dots in mm.
    #[serde(default = "default_pad_size")]
    pub pad_size: f64,

    /// Indices of die pads tied to ground.
    #[serde(default = "default_ground_pads")]
    pub ground_pads: Vec<usize>,
}

impl Default for DieConfig {
    fn default() -> Self {
        Self {
            width: default_die_width(),
            height: default_die_height(),
            pads: default_pads(),
            pad_size: default_pad_size(),
            ground_pads: default_ground_pads(),
        }
    }
}

impl DieConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("die.width", self.width)?;
        require_positive("die.height", self.height)?;
        require_positive("die.pad_size", self.pad_size)?;
        if self.pads.is_empty() {
            return Err(ConfigError::validation("die.pads must not be empty"));
        }
        if let Some(i) = self
            .pads
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(ConfigError::validation(format!(
                "die.pads[{i}] is not a finite coordinate"
            )));
        }
        Ok(())
    }
}

fn default_die_width() -> f64 {
    3.6
}

fn default_die_height() -> f64 {
    5.2
}

fn default_pads() -> Vec<Point> {
    reference::PAD_CENTERS.iter().copied().map(Point::from).collect()
}

fn default_pad_size() -> f64 {
    0.06
}

fn default_ground_pads() -> Vec<usize> {
    reference::GROUND_PADS.to_vec()
}

/// Carrier footprint geometry and edge pad rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FootprintConfig {
    /// Footprint width in mm.
    #[serde(default = "default_footprint_width")]
    pub width: f64,

    /// Footprint height in mm.
    #[serde(default = "default_footprint_height")]
    pub height: f64,

    /// Spacing between neighbouring edge pads in mm.
    #[serde(default = "default_edge_raster")]
    pub edge_raster: f64,

    /// Edge pads on the left side.
    #[serde(default = "default_side_pads")]
    pub left_pads: usize,

    /// Edge pads on the bottom side.
    #[serde(default = "default_side_pads")]
    pub bottom_pads: usize,

    /// Edge pads on the right side.
    #[serde(default = "default_side_pads")]
    pub right_pads: usize,

    /// Edge pads on the top side.
    #[serde(default = "default_side_pads")]
    pub top_pads: usize,
}

impl Default for FootprintConfig {
    fn default() -> Self {
        Self {
            width: default_footprint_width(),
            height: default_footprint_height(),
            edge_raster: default_edge_raster(),
            left_pads: default_side_pads(),
            bottom_pads: default_side_pads(),
            right_pads: default_side_pads(),
            top_pads: default_side_pads(),
        }
    }
}

impl FootprintConfig {
    /// The footprint centre in drawing space.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Total number of edge pads over all four sides.
    #[must_use]
    pub const fn edge_pad_count(&self) -> usize {
        self.left_pads + self.bottom_pads + self.right_pads + self.top_pads
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("footprint.width", self.width)?;
        require_positive("footprint.height", self.height)?;
        require_positive("footprint.edge_raster", self.edge_raster)?;
        if self.edge_pad_count() == 0 {
            return Err(ConfigError::validation(
                "footprint must have at least one edge pad",
            ));
        }
        Ok(())
    }
}

fn default_footprint_width() -> f64 {
    15.0
}

fn default_footprint_height() -> f64 {
    17.0
}

fn default_edge_raster() -> f64 {
    1.0
}

const fn default_side_pads() -> usize {
    16
}

/// Finger pattern constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternConfig {
    /// Number of landing fingers around the die.
    #[serde(default = "default_landing_pads")]
    pub landing_pads: usize,

    /// Bevel angle of the vertical ring sides (radians).
    #[serde(default = "default_phi1")]
    pub phi1: f64,

    /// Bevel angle of the horizontal ring sides (radians).
    #[serde(default = "default_phi2")]
    pub phi2: f64,

    /// Ring offsets from the die outline.
    #[serde(default)]
    pub rings: RingConfig,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            landing_pads: default_landing_pads(),
            phi1: default_phi1(),
            phi2: default_phi2(),
            rings: RingConfig::default(),
        }
    }
}

impl PatternConfig {
    /// The bevel angle pair shared by all bevelled rings.
    #[must_use]
    pub const fn bevel(&self) -> Bevel {
        Bevel::new(self.phi1, self.phi2)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.landing_pads == 0 {
            return Err(ConfigError::validation(
                "pattern.landing_pads must be positive",
            ));
        }
        if !self.bevel().is_valid() {
            return Err(ConfigError::validation(format!(
                "pattern bevel angles must satisfy phi1 >= 0, phi2 >= 0 and phi1 + phi2 < pi/2 \
                 (got phi1 = {}, phi2 = {})",
                self.phi1, self.phi2
            )));
        }
        self.rings.validate()
    }
}

const fn default_landing_pads() -> usize {
    72
}

fn default_phi1() -> f64 {
    0.07 * PI
}

fn default_phi2() -> f64 {
    0.09 * PI
}

/// Ring offsets from the die outline, innermost first (mm).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RingConfig {
    /// Exposed ground pad under the die (rounded).
    #[serde(default = "default_ground_pad")]
    pub ground_pad: f64,

    /// Inner edge of the solder mask opening (rounded).
    #[serde(default = "default_mask_inner")]
    pub mask_inner: f64,

    /// Inner edge of the ground ring.
    #[serde(default = "default_ground_inner")]
    pub ground_inner: f64,

    /// Inner edge of the ground fingers.
    #[serde(default = "default_ground_mid")]
    pub ground_mid: f64,

    /// Outer edge of the ground ring.
    #[serde(default = "default_ground_outer")]
    pub ground_outer: f64,

    /// Inner edge of the masked signal fingers.
    #[serde(default = "default_finger_inner")]
    pub finger_inner: f64,

    /// Outer edge of the solder mask ring.
    #[serde(default = "default_mask_outer")]
    pub mask_outer: f64,

    /// Ring carrying the landing-pad anchors.
    #[serde(default = "default_finger_bond")]
    pub finger_bond: f64,

    /// Outer edge of the exposed fingers.
    #[serde(default = "default_finger_outer")]
    pub finger_outer: f64,

    /// Width of the thermal relief bridges.
    #[serde(default = "default_bridge_width")]
    pub bridge_width: f64,

    /// Length added to the die size for the exposed bridges.
    #[serde(default = "default_bridge_extension")]
    pub bridge_extension: f64,

    /// Length added to the die size for the masked bridges.
    #[serde(default = "default_bridge_masked_extension")]
    pub bridge_masked_extension: f64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            ground_pad: default_ground_pad(),
            mask_inner: default_mask_inner(),
            ground_inner: default_ground_inner(),
            ground_mid: default_ground_mid(),
            ground_outer: default_ground_outer(),
            finger_inner: default_finger_inner(),
            mask_outer: default_mask_outer(),
            finger_bond: default_finger_bond(),
            finger_outer: default_finger_outer(),
            bridge_width: default_bridge_width(),
            bridge_extension: default_bridge_extension(),
            bridge_masked_extension: default_bridge_masked_extension(),
        }
    }
}

impl RingConfig {
    /// Ring offsets with their names, innermost first.
    #[must_use]
    pub fn ordered(&self) -> [(&'static str, f64); 9] {
        [
            ("ground_pad", self.ground_pad),
            ("mask_inner", self.mask_inner),
            ("ground_inner", self.ground_inner),
            ("ground_mid", self.ground_mid),
            ("ground_outer", self.ground_outer),
            ("finger_inner", self.finger_inner),
            ("mask_outer", self.mask_outer),
            ("finger_bond", self.finger_bond),
            ("finger_outer", self.finger_outer),
        ]
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ground_pad.is_finite() && self.ground_pad >= 0.0) {
            return Err(ConfigError::validation(
                "pattern.rings.ground_pad must be non-negative",
            ));
        }
        for pair in self.ordered().windows(2) {
            let ((inner_name, inner), (outer_name, outer)) = (pair[0], pair[1]);
            if !(outer.is_finite() && outer > inner) {
                return Err(ConfigError::validation(format!(
                    "pattern.rings.{outer_name} ({outer}) must be larger than {inner_name} ({inner})"
                )));
            }
        }
        require_positive("pattern.rings.bridge_width", self.bridge_width)?;
        require_positive("pattern.rings.bridge_extension", self.bridge_extension)?;
        require_positive(
            "pattern.rings.bridge_masked_extension",
            self.bridge_masked_extension,
        )
    }
}

fn default_ground_pad() -> f64 {
    0.15
}

fn default_mask_inner() -> f64 {
    0.3
}

fn default_ground_inner() -> f64 {
    0.5
}

fn default_ground_mid() -> f64 {
    0.65
}

fn default_ground_outer() -> f64 {
    0.8
}

fn default_finger_inner() -> f64 {
    1.0
}

fn default_mask_outer() -> f64 {
    1.1
}

fn default_finger_bond() -> f64 {
    1.4
}

fn default_finger_outer() -> f64 {
    1.7
}

fn default_bridge_width() -> f64 {
    0.3
}

fn default_bridge_extension() -> f64 {
    0.6
}

fn default_bridge_masked_extension() -> f64 {
    1.7
}

/// Bond wire and trace routing constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Pull of the trace's first control point away from the centre.
    #[serde(default = "default_cap_pull")]
    pub cap_pull: f64,

    /// Pull of the trace's second control point away from the centre.
    #[serde(default = "default_edge_pull")]
    pub edge_pull: f64,

    /// Length of the sampling rays cast from the centre (mm).
    #[serde(default = "default_ray_length")]
    pub ray_length: f64,

    /// Radius of the circle bounding the masked fingers (mm).
    #[serde(default = "default_finger_circle_radius")]
    pub finger_circle_radius: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            cap_pull: default_cap_pull(),
            edge_pull: default_edge_pull(),
            ray_length: default_ray_length(),
            finger_circle_radius: default_finger_circle_radius(),
        }
    }
}

impl RoutingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("routing.cap_pull", self.cap_pull)?;
        require_positive("routing.edge_pull", self.edge_pull)?;
        require_positive("routing.finger_circle_radius", self.finger_circle_radius)?;
        require_positive("routing.ray_length", self.ray_length)?;
        if self.ray_length <= self.finger_circle_radius {
            return Err(ConfigError::validation(format!(
                "routing.ray_length ({}) must exceed routing.finger_circle_radius ({})",
                self.ray_length, self.finger_circle_radius
            )));
        }
        Ok(())
    }
}

fn default_cap_pull() -> f64 {
    1.2
}

fn default_edge_pull() -> f64 {
    1.0
}

fn default_ray_length() -> f64 {
    10.0
}

fn default_finger_circle_radius() -> f64 {
    5.4
}

/// Die pad mapping tables, indexed by die pad. `null` leaves a pad unbonded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingConfig {
    /// Landing finger of each die pad.
    #[serde(default = "reference::die_to_finger")]
    pub die_to_finger: Vec<Option<usize>>,

    /// Edge pad of each die pad.
    #[serde(default = "reference::die_to_edge")]
    pub die_to_edge: Vec<Option<usize>>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            die_to_finger: reference::die_to_finger(),
            die_to_edge: reference::die_to_edge(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if valid_levels.contains(&self.level.to_lowercase().as_str()) {
            Ok(())
        } else {
            Err(ConfigError::validation(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            )))
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
