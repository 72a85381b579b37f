//! GDSII fixtures for unit tests, written with `gds21`.

use gds21::{
    GdsArrayRef, GdsBoundary, GdsBox, GdsElement, GdsLibrary, GdsPoint, GdsStrans, GdsStruct,
    GdsStructRef, GdsTextElem,
};

use super::{LayerSpec, Library};

/// Library with 1 µm user units and 1 nm database units.
pub fn library(name: &str, structs: Vec<GdsStruct>) -> GdsLibrary {
    let mut lib = GdsLibrary::new(name);
    lib.units = gds21::GdsUnits(1e-3, 1e-9);
    lib.structs = structs;
    lib
}

pub fn cell(name: &str, elems: Vec<GdsElement>) -> GdsStruct {
    let mut cell = GdsStruct::new(name);
    cell.elems = elems;
    cell
}

/// Closed axis-aligned rectangle from `(x1, y1)` to `(x2, y2)`.
pub fn rect(layer: LayerSpec, (x1, y1): (i32, i32), (x2, y2): (i32, i32)) -> GdsElement {
    GdsElement::GdsBoundary(GdsBoundary {
        layer: layer.layer,
        datatype: layer.datatype,
        xy: GdsPoint::vec(&[(x1, y1), (x2, y1), (x2, y2), (x1, y2), (x1, y1)]),
        ..Default::default()
    })
}

pub fn gds_box(layer: LayerSpec, (x1, y1): (i32, i32), (x2, y2): (i32, i32)) -> GdsElement {
    GdsElement::GdsBox(GdsBox {
        layer: layer.layer,
        boxtype: layer.datatype,
        xy: [
            GdsPoint::new(x1, y1),
            GdsPoint::new(x2, y1),
            GdsPoint::new(x2, y2),
            GdsPoint::new(x1, y2),
            GdsPoint::new(x1, y1),
        ],
        ..Default::default()
    })
}

pub fn text(layer: i16, (x, y): (i32, i32)) -> GdsElement {
    GdsElement::GdsTextElem(GdsTextElem {
        string: "label".to_string(),
        layer,
        texttype: 0,
        xy: GdsPoint::new(x, y),
        ..Default::default()
    })
}

pub fn sref(name: &str, origin: (i32, i32)) -> GdsElement {
    sref_with(name, origin, false, None, None)
}

/// Places `name` at `origin`; `angle` in degrees.
pub fn sref_with(
    name: &str,
    (x, y): (i32, i32),
    reflected: bool,
    mag: Option<f64>,
    angle: Option<f64>,
) -> GdsElement {
    let strans = (reflected || mag.is_some() || angle.is_some()).then(|| GdsStrans {
        reflected,
        mag,
        angle,
        ..Default::default()
    });
    GdsElement::GdsStructRef(GdsStructRef {
        name: name.to_string(),
        xy: GdsPoint::new(x, y),
        strans,
        ..Default::default()
    })
}

/// A `columns` × `rows` array of `name`.
pub fn aref(name: &str, (cols, rows): (i16, i16), corners: [(i32, i32); 3]) -> GdsElement {
    GdsElement::GdsArrayRef(GdsArrayRef {
        name: name.to_string(),
        xy: corners.map(|(x, y)| GdsPoint::new(x, y)),
        cols,
        rows,
        ..Default::default()
    })
}

/// Writes `lib` to a temporary file and reads it back.
pub fn reload(lib: &GdsLibrary) -> Library {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.gds");
    lib.save(path.to_str().unwrap()).unwrap();
    Library::read(&path).unwrap()
}
