//! Fatal, boundary-crossing loader errors (§7 "Compilation", top-level
//! "Resource"). Non-fatal conditions (a missing texture, an unreadable
//! mesh file, an unknown BSDF reference) never reach this type — they are
//! tracked through [`crate::context::LoaderContext::has_error`] instead,
//! the same split [`ignis_device::DeviceError`] documents for the device
//! boundary and [`ignis_shading::ShadingTree`] already implements for
//! material acquisition.

use thiserror::Error;

/// A fatal error aborting the load or the render loop outright.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The scene declared no camera object, and none was supplied to
    /// override it; there is no ray-generation source to fall back to.
    #[error("scene declares no camera object")]
    NoCamera,

    /// The scene declared no technique object, and none was supplied to
    /// override it.
    #[error("scene declares no technique object")]
    NoTechnique,

    /// Resolving a variant's shader set failed.
    #[error(transparent)]
    Render(#[from] ignis_render::RenderError),

    /// The device rejected a compiled shader, or another device-boundary
    /// operation failed (`DeviceError::ShaderRejected` already carries the
    /// entry name and compiler message for a failed compile).
    #[error(transparent)]
    Device(#[from] ignis_device::DeviceError),
}
