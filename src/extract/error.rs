//! Error types for the pad-coordinate extractor.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors that can occur while reading a chip layout or locating its pads.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Failed to read the layout file.
    #[error("Failed to read file: {path}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The GDSII stream is malformed or truncated.
    #[error("Invalid GDSII stream: {source}")]
    Parse {
        /// Decoder error.
        #[source]
        source: gds21::GdsError,
    },

    /// The top cell is not in the library.
    #[error("Cell not found: {name}")]
    CellNotFound {
        /// Requested cell name.
        name: String,
    },

    /// No dependency of the top cell matches the region pattern.
    #[error("No cell below the top cell matches region pattern '{pattern}'")]
    RegionNotFound {
        /// The region pattern.
        pattern: String,
    },

    /// The region cell has no polygon on the boundary layer.
    #[error("Cell '{cell}' has no boundary polygon on layer {layer}/{datatype}")]
    NoBoundary {
        /// Region cell name.
        cell: String,
        /// Boundary layer number.
        layer: i16,
        /// Boundary datatype.
        datatype: i16,
    },

    /// The flattened region cell has no polygon on the pad layer.
    #[error("Cell '{cell}' has no pad polygons on layer {layer}/{datatype}")]
    NoPads {
        /// Region cell name.
        cell: String,
        /// Pad layer number.
        layer: i16,
        /// Pad datatype.
        datatype: i16,
    },

    /// The region pattern is not a valid regular expression.
    #[error("Invalid region pattern '{pattern}'")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// More decimal places were requested than `f64` can hold.
    #[error("Precision {precision} exceeds the maximum of {max} decimal places")]
    InvalidPrecision {
        /// Requested decimal places.
        precision: u32,
        /// Largest supported value.
        max: u32,
    },

    /// A cell places itself, directly or through other cells.
    #[error("Cell '{cell}' is placed inside itself")]
    ReferenceCycle {
        /// The cell that closes the cycle.
        cell: String,
    },

    /// A cell places a cell the library does not define.
    #[error("Cell '{parent}' places undefined cell '{name}'")]
    UndefinedCell {
        /// Placed cell name.
        name: String,
        /// Cell containing the placement.
        parent: String,
    },

    /// The layout uses a construct the extractor cannot interpret.
    #[error("Cell '{cell}' uses unsupported {feature}")]
    Unsupported {
        /// Cell containing the construct.
        cell: String,
        /// What is unsupported.
        feature: &'static str,
    },
}

impl ExtractError {
    /// Creates a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error from a decoder error.
    #[must_use]
    pub fn parse(source: gds21::GdsError) -> Self {
        Self::Parse { source }
    }
}
