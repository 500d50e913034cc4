//! Shape load failures (§4.2, §7 "Referential"/"Structural").

use thiserror::Error;

/// Why a single shape declaration failed to load. Every variant is
/// non-fatal to the overall load (§7): the caller marks the context errored
/// and moves on to the next shape.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    /// The plugin type string did not match any registered provider.
    #[error("unknown shape plugin type {0:?}")]
    UnknownPluginType(String),
    /// A mesh-based shape had zero vertices.
    #[error("shape {0:?} has zero vertices")]
    ZeroVertices(String),
    /// A mesh-based shape had zero faces.
    #[error("shape {0:?} has zero faces")]
    ZeroFaces(String),
    /// A referenced file could not be opened.
    #[error("shape {0:?} could not read file {1:?}")]
    FileNotFound(String, String),
    /// A non-triangular face was supplied where triangulation is required.
    #[error("shape {0:?} has a non-triangular face")]
    NonTriangular(String),
}
