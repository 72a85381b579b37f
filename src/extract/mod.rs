//! Die pad coordinates from a chip layout.
//!
//! Reads a GDSII stream, finds the pad frame below the top cell and turns its
//! pad openings into the `die` section of the layout configuration:
//!
//! 1. The first boundary polygon placed directly in the pad frame cell fixes
//!    the die centre and size.
//! 2. The pad frame is flattened and every polygon on the pad layer
//!    contributes its bounding-box centre.
//! 3. Centres are moved to the die centre, flipped to drawing orientation
//!    (y down), rounded and deduplicated.
//! 4. Pads are ordered by angle and the list starts at the top-left pad.

mod error;
mod gds;
#[cfg(test)]
mod testing;

pub use error::{ExtractError, ExtractResult};
pub use gds::{polygons, Library};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use regex::Regex;
use serde::Serialize;

use crate::geometry::Point;

/// A GDSII layer and datatype pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerSpec {
    /// Layer number.
    pub layer: i16,
    /// Datatype.
    pub datatype: i16,
}

impl LayerSpec {
    /// Creates a layer spec.
    #[must_use]
    pub const fn new(layer: i16, datatype: i16) -> Self {
        Self { layer, datatype }
    }
}

impl fmt::Display for LayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.layer, self.datatype)
    }
}

impl FromStr for LayerSpec {
    type Err = String;

    /// Parses `LAYER/DATATYPE`, e.g. `76/20`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("expected LAYER/DATATYPE, got '{s}'");
        let (layer, datatype) = s.split_once('/').ok_or_else(invalid)?;
        Ok(Self {
            layer: layer.trim().parse().map_err(|_| invalid())?,
            datatype: datatype.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// Where to look for the die outline and pads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Name of the top cell.
    pub top_cell: String,
    /// Regular expression matched against the names of cells below the top
    /// cell to find the pad frame.
    pub region: String,
    /// Layer of the die boundary polygon.
    pub boundary: LayerSpec,
    /// Layer of the pad openings.
    pub pads: LayerSpec,
    /// Decimal places kept in millimetre coordinates, at most
    /// [`MAX_PRECISION`].
    pub precision: u32,
}

/// Largest supported number of decimal places.
pub const MAX_PRECISION: u32 = 15;

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            top_cell: "caravel_openframe".to_string(),
            region: "chip_io_openframe".to_string(),
            boundary: LayerSpec::new(235, 4),
            pads: LayerSpec::new(76, 20),
            precision: 9,
        }
    }
}

/// Die size and pad centres, serialised as a `die` configuration section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PadTable {
    /// Die width (mm).
    pub width: f64,
    /// Die height (mm).
    pub height: f64,
    /// Pad centres relative to the die centre, y down (mm).
    pub pads: Vec<Point>,
}

/// Reads `path` and extracts its pad table.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if
/// [`extract_pads`] fails.
pub fn extract_pads_from_file(path: &Path, options: &ExtractOptions) -> ExtractResult<PadTable> {
    let library = Library::read(path)?;
    extract_pads(&library, options)
}

/// Extracts the die size and ordered pad centres from `library`.
///
/// # Errors
///
/// Returns an error if:
/// - The precision exceeds [`MAX_PRECISION`]
/// - The region pattern is not a valid regular expression
/// - The top cell does not exist
/// - No cell below the top cell matches the region pattern
/// - The region cell has no boundary polygon
/// - The region cell cannot be flattened (see [`Library::flatten`])
/// - The flattened region cell has no pad polygons
pub fn extract_pads(library: &Library, options: &ExtractOptions) -> ExtractResult<PadTable> {
    if options.precision > MAX_PRECISION {
        return Err(ExtractError::InvalidPrecision {
            precision: options.precision,
            max: MAX_PRECISION,
        });
    }
    let pattern = Regex::new(&options.region).map_err(|source| ExtractError::InvalidPattern {
        pattern: options.region.clone(),
        source,
    })?;

    let top = library
        .cell(&options.top_cell)
        .ok_or_else(|| ExtractError::CellNotFound {
            name: options.top_cell.clone(),
        })?;
    let region = library
        .dependencies(top)
        .into_iter()
        .find(|cell| pattern.is_match(&cell.name))
        .ok_or_else(|| ExtractError::RegionNotFound {
            pattern: options.region.clone(),
        })?;
    tracing::info!(top = %top.name, region = %region.name, "Found pad frame");

    let scale = library.mm_per_db_unit();
    let round = |value: f64| round_to(value, options.precision);

    let no_boundary = || ExtractError::NoBoundary {
        cell: region.name.clone(),
        layer: options.boundary.layer,
        datatype: options.boundary.datatype,
    };
    let boundary = polygons(region, options.boundary)
        .next()
        .ok_or_else(no_boundary)?;
    let (lo, hi) = bounds(
        boundary
            .iter()
            .map(|p| Point::new(f64::from(p.x), f64::from(p.y))),
    )
    .ok_or_else(no_boundary)?;
    let center = Point::new(
        round((lo.x + hi.x) / 2.0 * scale),
        round((lo.y + hi.y) / 2.0 * scale),
    );
    let half_width = round((hi.x - lo.x) / 2.0 * scale);
    let half_height = round((hi.y - lo.y) / 2.0 * scale);

    let pad_polygons = library.flatten(region, options.pads)?;
    if pad_polygons.is_empty() {
        return Err(ExtractError::NoPads {
            cell: region.name.clone(),
            layer: options.pads.layer,
            datatype: options.pads.datatype,
        });
    }

    let mut pads: Vec<Point> = pad_polygons
        .iter()
        .filter_map(|polygon| bounds(polygon.iter().copied()))
        .map(|(lo, hi)| {
            let mid = lo.lerp(hi, 0.5) * scale;
            Point::new(round(mid.x - center.x), round(center.y - mid.y))
        })
        .collect();
    let found = pads.len();
    order_pads(&mut pads);

    tracing::info!(
        polygons = found,
        pads = pads.len(),
        width = half_width * 2.0,
        height = half_height * 2.0,
        "Extracted pad centres"
    );
    Ok(PadTable {
        width: half_width * 2.0,
        height: half_height * 2.0,
        pads,
    })
}

/// Sorts by `atan2(x, y)`, drops duplicates and starts the list at the pad
/// minimising `10·x + y`.
fn order_pads(pads: &mut Vec<Point>) {
    let key = |p: &Point| p.x.atan2(p.y);
    pads.sort_by(|a, b| {
        key(a)
            .total_cmp(&key(b))
            .then(a.x.total_cmp(&b.x))
            .then(a.y.total_cmp(&b.y))
    });
    pads.dedup();

    let first = pads
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (10.0 * a.x + a.y).total_cmp(&(10.0 * b.x + b.y)))
        .map_or(0, |(i, _)| i);
    pads.rotate_left(first);
}

/// Rounds to `digits` decimal places, at most [`MAX_PRECISION`]. Negative
/// zero becomes zero.
fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(i32::try_from(digits.min(MAX_PRECISION)).unwrap_or(15));
    (value * factor).round() / factor + 0.0
}

/// Lower-left and upper-right corners of `points`.
fn bounds(points: impl IntoIterator<Item = Point>) -> Option<(Point, Point)> {
    points.into_iter().fold(None, |acc, p| {
        Some(match acc {
            None => (p, p),
            Some((lo, hi)) => (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            ),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::testing::{cell, library, rect, reload, sref, sref_with};
    use super::*;
    use crate::config::DieConfig;

    const PAD: i32 = 30_000;
    const PAD_LAYER: LayerSpec = LayerSpec::new(76, 20);
    const BOUNDARY: LayerSpec = LayerSpec::new(235, 4);

    /// Expected pads in output order, with their layout positions in nm.
    const PADS: [((f64, f64), (i32, i32)); 6] = [
        ((-1.7, -2.0), (100_000, 4_600_000)),
        ((-1.7, 0.0), (100_000, 2_600_000)),
        ((0.0, 2.5), (1_800_000, 100_000)),
        ((1.7, 0.0), (3_500_000, 2_600_000)),
        ((0.0, -2.5), (1_800_000, 5_100_000)),
        ((-0.5, -2.5), (1_300_000, 5_100_000)),
    ];

    /// A 3.6 × 5.2 mm die with its lower-left corner at the origin.
    fn frame_elements() -> Vec<gds21::GdsElement> {
        let mut elems = vec![rect(BOUNDARY, (0, 0), (3_600_000, 5_200_000))];
        for (i, &(_, origin)) in PADS.iter().enumerate() {
            let angle = if i % 2 == 0 { None } else { Some(90.0) };
            elems.push(sref_with("pad", origin, i == 3, None, angle));
        }
        // Duplicate of the top pad.
        elems.push(sref("pad", (1_800_000, 5_100_000)));
        elems
    }

    fn chip_with_frame(frame: Vec<gds21::GdsElement>) -> Library {
        let lib = library(
            "caravel",
            vec![
                cell(
                    "pad",
                    vec![
                        rect(PAD_LAYER, (-PAD, -PAD), (PAD, PAD)),
                        rect(LayerSpec::new(76, 44), (-2 * PAD, -2 * PAD), (2 * PAD, 2 * PAD)),
                    ],
                ),
                cell("chip_io_openframe_v2", frame),
                cell(
                    "caravel_openframe",
                    vec![
                        rect(BOUNDARY, (-10, -10), (10, 10)),
                        sref("chip_io_openframe_v2", (0, 0)),
                    ],
                ),
            ],
        );
        reload(&lib)
    }

    fn reference_chip() -> Library {
        chip_with_frame(frame_elements())
    }

    #[test]
    fn layer_spec_parsing() {
        assert_eq!("76/20".parse::<LayerSpec>().unwrap(), LayerSpec::new(76, 20));
        assert_eq!(" 235 / 4 ".parse::<LayerSpec>().unwrap(), LayerSpec::new(235, 4));
        assert!("76".parse::<LayerSpec>().is_err());
        assert!("76/x".parse::<LayerSpec>().is_err());
        assert_eq!(LayerSpec::new(76, 20).to_string(), "76/20");
    }

    #[test]
    fn round_to_precision() {
        assert_eq!(round_to(1.234_567_890_4, 9), 1.234_567_89);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert!(round_to(-1e-12, 9).is_sign_positive());
    }

    #[test]
    fn extracts_die_size() {
        let table = extract_pads(&reference_chip(), &ExtractOptions::default()).unwrap();
        assert!((table.width - 3.6).abs() < 1e-12);
        assert!((table.height - 5.2).abs() < 1e-12);
    }

    #[test]
    fn pads_are_deduplicated_and_ordered() {
        let table = extract_pads(&reference_chip(), &ExtractOptions::default()).unwrap();
        let expected: Vec<Point> = PADS
            .iter()
            .map(|&((x, y), _)| Point::new(x, y))
            .collect();
        assert_eq!(table.pads.len(), expected.len());
        for (got, want) in table.pads.iter().zip(&expected) {
            assert!(got.approx_eq(*want, 1e-9), "{got:?} != {want:?}");
        }
    }

    #[test]
    fn ordering_starts_at_top_left() {
        let mut pads = vec![
            Point::new(0.0, 1.0),
            Point::new(-1.0, -1.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ];
        order_pads(&mut pads);
        assert_eq!(
            pads,
            [Point::new(-1.0, -1.0), Point::new(0.0, 1.0), Point::new(1.0, 0.0)]
        );
    }

    #[test]
    fn output_is_a_die_section() {
        let table = extract_pads(&reference_chip(), &ExtractOptions::default()).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        let die: DieConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(die.pads, table.pads);
        assert_eq!(die.width, table.width);
    }

    #[test]
    fn missing_top_cell() {
        let options = ExtractOptions {
            top_cell: "nope".to_string(),
            ..ExtractOptions::default()
        };
        let err = extract_pads(&reference_chip(), &options).unwrap_err();
        assert!(matches!(err, ExtractError::CellNotFound { name } if name == "nope"));
    }

    #[test]
    fn missing_region() {
        let options = ExtractOptions {
            region: "^padframe$".to_string(),
            ..ExtractOptions::default()
        };
        let err = extract_pads(&reference_chip(), &options).unwrap_err();
        assert!(matches!(err, ExtractError::RegionNotFound { .. }));
    }

    #[test]
    fn invalid_region_pattern() {
        let options = ExtractOptions {
            region: "chip_io(".to_string(),
            ..ExtractOptions::default()
        };
        let err = extract_pads(&reference_chip(), &options).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidPattern { .. }));
    }

    #[test]
    fn missing_boundary() {
        let options = ExtractOptions {
            boundary: LayerSpec::new(235, 5),
            ..ExtractOptions::default()
        };
        let err = extract_pads(&reference_chip(), &options).unwrap_err();
        assert!(matches!(err, ExtractError::NoBoundary { .. }));
    }

    #[test]
    fn self_placing_frame_is_rejected() {
        let mut frame = frame_elements();
        frame.push(sref("chip_io_openframe_v2", (10_000, 0)));
        let err = extract_pads(&chip_with_frame(frame), &ExtractOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::ReferenceCycle { cell } if cell == "chip_io_openframe_v2"
        ));
    }

    #[test]
    fn precision_above_limit_is_rejected() {
        let options = ExtractOptions {
            precision: MAX_PRECISION + 1,
            ..ExtractOptions::default()
        };
        let err = extract_pads(&reference_chip(), &options).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidPrecision { precision: 16, .. }));
    }

    #[test]
    fn missing_pads() {
        let options = ExtractOptions {
            pads: LayerSpec::new(76, 21),
            ..ExtractOptions::default()
        };
        let err = extract_pads(&reference_chip(), &options).unwrap_err();
        assert!(matches!(err, ExtractError::NoPads { .. }));
    }
}
