//! Error types for layout generation and output.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors that can occur while building or writing a layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A sampling ray did not cross a ring exactly once.
    #[error("Ray {index} crosses ring '{ring}' {hits} times, expected exactly once")]
    RayIntersection {
        /// Name of the sampled ring.
        ring: String,
        /// Angular sample index.
        index: i64,
        /// Number of distinct crossings found.
        hits: usize,
    },

    /// A bond refers to a die pad, finger or edge pad the layout lacks.
    #[error("Die pad {pad} bond to finger {finger} and edge pad {edge} cannot be routed")]
    UnresolvedBond {
        /// Die pad index.
        pad: usize,
        /// Finger index.
        finger: usize,
        /// Edge pad index.
        edge: usize,
    },

    /// Failed to write an output document.
    #[error("Failed to write file: {path}")]
    Io {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl LayoutError {
    /// Creates a ray intersection error.
    pub fn ray_intersection(ring: impl Into<String>, index: i64, hits: usize) -> Self {
        Self::RayIntersection {
            ring: ring.into(),
            index,
            hits,
        }
    }

    /// Creates a file write error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
