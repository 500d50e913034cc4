//! Errors the device handle interface reports back to the loader.

use thiserror::Error;

/// An error from the device back-end or the shader compiler collaborator
/// (§6.2, §6.3). These are the genuinely fatal, boundary-crossing
/// failures (§7 "Compilation", top-level "Resource") — non-fatal loader
/// conditions are tracked through `has_error` flags instead, never
/// through this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// A named buffer lookup found nothing registered under that name.
    #[error("no buffer named `{0}`")]
    UnknownBuffer(String),
    /// Buffer allocation failed (device out of memory, invalid size).
    #[error("failed to allocate a {0}-byte buffer")]
    AllocationFailed(usize),
    /// An image load failed (missing file, unsupported format).
    #[error("failed to load image `{0}`")]
    ImageLoadFailed(String),
    /// A BVH lookup by provider tag found nothing registered under that
    /// tag.
    #[error("no BVH registered under tag `{0}`")]
    UnknownBvh(String),
    /// The device has no active ray table (tracer mode is not engaged).
    #[error("no active ray table")]
    NoRayTable,
    /// An AOV image lookup found nothing registered under that name.
    #[error("no AOV image named `{0}`")]
    UnknownAov(String),
    /// The shader compiler rejected generated source for the given role.
    #[error("shader compiler rejected `{entry_name}`: {message}")]
    ShaderRejected {
        /// The entry point name that was rejected.
        entry_name: String,
        /// The compiler's diagnostic message.
        message: String,
    },
    /// A shader launch referenced a handle the device did not compile.
    #[error("shader handle {0:?} was not produced by this device")]
    UnknownShader(super::handle::ShaderHandle),
}
