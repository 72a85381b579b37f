//! GDSII library access for pad extraction.
//!
//! Streams are decoded by `gds21`. This module indexes cells by name, walks
//! the placement hierarchy below a cell and flattens polygons (`BOUNDARY` and
//! `BOX`) into that cell's coordinates.

use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::Path as FsPath;

use gds21::{GdsArrayRef, GdsElement, GdsLibrary, GdsPoint, GdsStrans, GdsStruct};

use super::error::{ExtractError, ExtractResult};
use super::LayerSpec;
use crate::geometry::Point;

/// A parsed GDSII library with its cells indexed by name.
#[derive(Debug, Clone)]
pub struct Library {
    gds: GdsLibrary,
    index: HashMap<String, usize>,
}

impl Library {
    /// Reads and parses a GDSII file.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::FileRead`] if the file cannot be opened and
    /// [`ExtractError::Parse`] if it is not a valid stream.
    pub fn read(path: &FsPath) -> ExtractResult<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| ExtractError::file_read(path, e))?;
        let name = path.to_str().ok_or_else(|| {
            ExtractError::file_read(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "path is not valid UTF-8"),
            )
        })?;
        tracing::debug!(path = name, bytes = metadata.len(), "Reading GDSII stream");
        let gds = GdsLibrary::load(name).map_err(ExtractError::parse)?;
        Ok(Self::new(gds))
    }

    /// Wraps an already decoded library.
    #[must_use]
    pub fn new(gds: GdsLibrary) -> Self {
        let mut index = HashMap::with_capacity(gds.structs.len());
        for (i, cell) in gds.structs.iter().enumerate() {
            index.entry(cell.name.clone()).or_insert(i);
        }
        tracing::debug!(
            library = %gds.name,
            cells = gds.structs.len(),
            meters_per_db_unit = gds.units.db_unit(),
            "Parsed GDSII library"
        );
        Self { gds, index }
    }

    /// Library name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.gds.name
    }

    /// Size of a database unit in metres.
    #[must_use]
    pub fn meters_per_db_unit(&self) -> f64 {
        self.gds.units.db_unit()
    }

    /// Size of a database unit in millimetres.
    #[must_use]
    pub fn mm_per_db_unit(&self) -> f64 {
        self.meters_per_db_unit() * 1000.0
    }

    /// All cells in stream order.
    #[must_use]
    pub fn cells(&self) -> &[GdsStruct] {
        &self.gds.structs
    }

    /// Looks up a cell by name. The first definition wins.
    #[must_use]
    pub fn cell(&self, name: &str) -> Option<&GdsStruct> {
        self.index.get(name).and_then(|&i| self.gds.structs.get(i))
    }

    /// Every cell placed below `cell`, nearest first.
    ///
    /// Each cell appears once; placements of undefined cells are ignored.
    #[must_use]
    pub fn dependencies<'a>(&'a self, cell: &'a GdsStruct) -> Vec<&'a GdsStruct> {
        let mut seen = HashSet::from([cell.name.as_str()]);
        let mut queue = VecDeque::from([cell]);
        let mut found = Vec::new();
        while let Some(current) = queue.pop_front() {
            for name in current.elems.iter().filter_map(placed_cell) {
                if !seen.insert(name) {
                    continue;
                }
                if let Some(child) = self.cell(name) {
                    found.push(child);
                    queue.push_back(child);
                }
            }
        }
        found
    }

    /// Polygons on `layer` in `cell` and everything placed below it, in the
    /// coordinates of `cell` (database units).
    ///
    /// # Errors
    ///
    /// Returns an error if a cell places one of its own ancestors, places an
    /// undefined cell, or uses absolute magnification or rotation.
    pub fn flatten<'a>(
        &'a self,
        cell: &'a GdsStruct,
        layer: LayerSpec,
    ) -> ExtractResult<Vec<Vec<Point>>> {
        let mut out = Vec::new();
        let mut chain = Vec::new();
        self.collect(cell, Affine::IDENTITY, layer, &mut chain, &mut out)?;
        Ok(out)
    }

    fn collect<'a>(
        &'a self,
        cell: &'a GdsStruct,
        transform: Affine,
        layer: LayerSpec,
        chain: &mut Vec<&'a str>,
        out: &mut Vec<Vec<Point>>,
    ) -> ExtractResult<()> {
        out.extend(polygons(cell, layer).map(|points| {
            points
                .iter()
                .map(|p| transform.apply(db_point(p)))
                .collect()
        }));

        chain.push(&cell.name);
        for element in &cell.elems {
            match element {
                GdsElement::GdsStructRef(sref) => {
                    let child = self.placed(cell, &sref.name, chain)?;
                    let placement = Affine::placement(
                        db_point(&sref.xy),
                        strans(cell, sref.strans.as_ref())?,
                    );
                    self.collect(child, transform.compose(placement), layer, chain, out)?;
                }
                GdsElement::GdsArrayRef(aref) => {
                    let child = self.placed(cell, &aref.name, chain)?;
                    let transformation = strans(cell, aref.strans.as_ref())?;
                    for origin in lattice(cell, aref)? {
                        let placement = Affine::placement(origin, transformation);
                        self.collect(child, transform.compose(placement), layer, chain, out)?;
                    }
                }
                _ => {}
            }
        }
        chain.pop();
        Ok(())
    }

    /// Resolves a placement of `name` inside `parent`.
    fn placed(&self, parent: &GdsStruct, name: &str, chain: &[&str]) -> ExtractResult<&GdsStruct> {
        if chain.contains(&name) {
            return Err(ExtractError::ReferenceCycle {
                cell: name.to_string(),
            });
        }
        self.cell(name).ok_or_else(|| ExtractError::UndefinedCell {
            name: name.to_string(),
            parent: parent.name.clone(),
        })
    }
}

/// Polygons (`BOUNDARY`, and `BOX` with its box type as datatype) placed
/// directly in `cell` on `layer`.
pub fn polygons(cell: &GdsStruct, layer: LayerSpec) -> impl Iterator<Item = &[GdsPoint]> {
    cell.elems.iter().filter_map(move |element| match element {
        GdsElement::GdsBoundary(b) if b.layer == layer.layer && b.datatype == layer.datatype => {
            Some(b.xy.as_slice())
        }
        GdsElement::GdsBox(b) if b.layer == layer.layer && b.boxtype == layer.datatype => {
            Some(b.xy.as_slice())
        }
        _ => None,
    })
}

fn placed_cell(element: &GdsElement) -> Option<&str> {
    match element {
        GdsElement::GdsStructRef(sref) => Some(&sref.name),
        GdsElement::GdsArrayRef(aref) => Some(&aref.name),
        _ => None,
    }
}

fn db_point(p: &GdsPoint) -> Point {
    Point::new(f64::from(p.x), f64::from(p.y))
}

/// Reflection, magnification and rotation of a placed cell.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transformation {
    reflect: bool,
    magnification: f64,
    /// Anticlockwise, degrees.
    angle: f64,
}

fn strans(parent: &GdsStruct, strans: Option<&GdsStrans>) -> ExtractResult<Transformation> {
    let Some(strans) = strans else {
        return Ok(Transformation {
            reflect: false,
            magnification: 1.0,
            angle: 0.0,
        });
    };
    if strans.abs_mag || strans.abs_angle {
        return Err(ExtractError::Unsupported {
            cell: parent.name.clone(),
            feature: "absolute magnification or rotation",
        });
    }
    Ok(Transformation {
        reflect: strans.reflected,
        magnification: strans.mag.unwrap_or(1.0),
        angle: strans.angle.unwrap_or(0.0),
    })
}

/// Instance origins of an array, row by row.
///
/// The three `XY` points are the origin and the displacements spanning all
/// columns and all rows.
fn lattice(parent: &GdsStruct, aref: &GdsArrayRef) -> ExtractResult<Vec<Point>> {
    let corners: Vec<Point> = aref.xy.iter().map(db_point).collect();
    let &[origin, column_end, row_end] = corners.as_slice() else {
        return Err(ExtractError::Unsupported {
            cell: parent.name.clone(),
            feature: "array without three corner points",
        });
    };
    let (Ok(columns), Ok(rows)) = (u16::try_from(aref.cols), u16::try_from(aref.rows)) else {
        return Err(ExtractError::Unsupported {
            cell: parent.name.clone(),
            feature: "array with negative dimensions",
        });
    };
    let column_step = (column_end - origin) * (1.0 / f64::from(columns.max(1)));
    let row_step = (row_end - origin) * (1.0 / f64::from(rows.max(1)));
    Ok((0..rows)
        .flat_map(|row| {
            (0..columns).map(move |column| {
                origin + column_step * f64::from(column) + row_step * f64::from(row)
            })
        })
        .collect())
}

/// 2×3 affine transform: `(x, y) ↦ (a·x + b·y + tx, c·x + d·y + ty)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    tx: f64,
    ty: f64,
}

impl Affine {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Reflect about the x axis, then magnify, then rotate, then move to
    /// `origin`.
    fn placement(origin: Point, t: Transformation) -> Self {
        let (sin, cos) = t.angle.to_radians().sin_cos();
        let m = t.magnification;
        let f = if t.reflect { -1.0 } else { 1.0 };
        Self {
            a: m * cos,
            b: -m * sin * f,
            c: m * sin,
            d: m * cos * f,
            tx: origin.x,
            ty: origin.y,
        }
    }

    /// `self ∘ inner`: applies `inner` first.
    fn compose(self, inner: Self) -> Self {
        Self {
            a: self.a * inner.a + self.b * inner.c,
            b: self.a * inner.b + self.b * inner.d,
            c: self.c * inner.a + self.d * inner.c,
            d: self.c * inner.b + self.d * inner.d,
            tx: self.a * inner.tx + self.b * inner.ty + self.tx,
            ty: self.c * inner.tx + self.d * inner.ty + self.ty,
        }
    }

    fn apply(self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.tx,
            self.c * p.x + self.d * p.y + self.ty,
        )
    }
}
