//! The stable device handle interface (§6.2) the loader generates shader
//! source against: opaque buffer/image/BVH handles ([`handle`]), typed
//! parameter registries ([`parameter`]), the [`DeviceHandle`] trait
//! itself ([`device`]), and an in-process test double ([`null`]).
//!
//! `DeviceHandle` wraps a real GPU/CPU device behind a typed handle the
//! rest of the rendering pipeline never has to downcast — it is the seam
//! a real back-end or a test double fills in, and this crate has no GPU
//! backend of its own.

#![cfg_attr(not(debug_assertions), deny(warnings))]
#![warn(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]

pub mod device;
pub mod error;
pub mod handle;
pub mod null;
pub mod parameter;

pub use device::{DeviceHandle, ServiceShader};
pub use error::DeviceError;
pub use handle::{BufferHandle, BvhHandle, ImageHandle, RayTableHandle, ShaderHandle};
pub use null::NullDevice;
pub use parameter::{ParameterScope, ParameterValue};
