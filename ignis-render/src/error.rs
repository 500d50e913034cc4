//! Errors surfaced while assembling a variant's shader set.

use thiserror::Error;

/// An error composing a variant's shaders.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The technique named in the scene's `technique` object is not
    /// registered.
    #[error(transparent)]
    Technique(#[from] ignis_technique::TechniqueError),
}
