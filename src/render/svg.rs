//! Minimal SVG document writer.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path as FsPath;

use crate::geometry::{fmt_coord, Path, Point};
use crate::layout::{LayoutError, LayoutResult};

/// Fill and stroke attributes of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    fill: Option<&'static str>,
    stroke: Option<(&'static str, f64)>,
    round: bool,
}

impl Style {
    /// Solid fill, no stroke.
    #[must_use]
    pub const fn fill(color: &'static str) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            round: false,
        }
    }

    /// Stroke only, no fill.
    #[must_use]
    pub const fn stroke(color: &'static str, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some((color, width)),
            round: false,
        }
    }

    /// Adds round line caps and joins.
    #[must_use]
    pub const fn rounded(mut self) -> Self {
        self.round = true;
        self
    }

    fn attributes(&self) -> String {
        let mut out = String::new();
        match (self.stroke, self.fill) {
            (Some((color, width)), fill) => {
                let _ = write!(
                    out,
                    r#" stroke="{color}" fill="{}" stroke-width="{}""#,
                    fill.unwrap_or("none"),
                    fmt_coord(width)
                );
            }
            (None, Some(fill)) => {
                let _ = write!(out, r#" fill="{fill}""#);
            }
            (None, None) => out.push_str(r#" fill="none""#),
        }
        if self.round {
            out.push_str(r#" stroke-linecap="round" stroke-linejoin="round""#);
        }
        out
    }
}

/// An SVG document sized in millimetres with a matching `viewBox`.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: f64,
    height: f64,
    body: String,
}

impl SvgDocument {
    /// Creates an empty `width × height` mm document.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    /// Appends a path element.
    pub fn path(&mut self, path: &Path, style: &Style) -> &mut Self {
        let _ = writeln!(
            self.body,
            r#"<path d="{}"{} />"#,
            path.to_svg_data(),
            style.attributes()
        );
        self
    }

    /// Appends a path element for each of `paths`.
    pub fn paths<'a>(
        &mut self,
        paths: impl IntoIterator<Item = &'a Path>,
        style: &Style,
    ) -> &mut Self {
        for path in paths {
            self.path(path, style);
        }
        self
    }

    /// Appends a circle element.
    pub fn circle(&mut self, center: Point, radius: f64, style: &Style) -> &mut Self {
        let _ = writeln!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}"{} />"#,
            fmt_coord(center.x),
            fmt_coord(center.y),
            fmt_coord(radius),
            style.attributes()
        );
        self
    }

    /// Appends a straight line element.
    pub fn line(&mut self, from: Point, to: Point, style: &Style) -> &mut Self {
        let _ = writeln!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{} />"#,
            fmt_coord(from.x),
            fmt_coord(from.y),
            fmt_coord(to.x),
            fmt_coord(to.y),
            style.attributes()
        );
        self
    }

    /// Number of elements appended so far.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.body.lines().count()
    }

    /// The complete document text.
    #[must_use]
    pub fn to_svg_string(&self) -> String {
        let (w, h) = (fmt_coord(self.width), fmt_coord(self.height));
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {w} {h}\" \
             width=\"{w}mm\" height=\"{h}mm\">\n{}</svg>\n",
            self.body
        )
    }

    /// Writes the document to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Io`] naming `path` if the file cannot be
    /// created, written or flushed.
    pub fn write_to(&self, path: &FsPath) -> LayoutResult<()> {
        let file = File::create(path).map_err(|e| LayoutError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(self.to_svg_string().as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| LayoutError::io(path, e))
    }
}
