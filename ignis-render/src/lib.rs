//! The shader-string generation layer (§4.8): composes the generated DSL
//! source for device, ray-generation, miss, hit (per material),
//! advanced-shadow, tonemap, and image-info shaders. A shader is
//! assembled from a [`target::Target`], an optional
//! [`payload::PayloadInfo`], component fragments, and a technique body,
//! yielding one self-contained DSL string per [`role::ShaderRole`] per
//! variant.

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

pub mod assembly;
pub mod compose;
pub mod error;
pub mod material;
pub mod payload;
pub mod raygen;
pub mod role;
pub mod service;
pub mod shadow;
pub mod signature;
pub mod target;

pub use assembly::{assemble_variant, EmittedShader, VariantInputs};
pub use compose::{compose, ShaderEmission};
pub use error::RenderError;
pub use material::{emit_material_fragment, MaterialSpec};
pub use payload::PayloadInfo;
pub use raygen::{emit_raygen_body, PixelSampler, RayGenerationSource};
pub use role::ShaderRole;
pub use service::compose_service_shader;
pub use shadow::{emit_advanced_shadow, AdvancedShadowBody};
pub use target::Target;
