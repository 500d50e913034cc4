//! The technique registry and variant model (§4.7): per-technique-name
//! info derivation ([`registry`]), body emission ([`body`]), the variant
//! data model ([`info`]), and the denoiser auxiliary pass composition
//! ([`denoiser`]).

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

pub mod body;
pub mod denoiser;
pub mod info;
pub mod registry;

pub use body::emit_body;
pub use denoiser::enable_ib;
pub use info::{
    CallbackType, ShadowHandlingMode, TechniqueInfo, TechniqueVariantInfo, VariantSelector,
    DEFAULT_EMITTER_PAYLOAD_INITIALIZER,
};
pub use registry::{canonical_name, get_info, TechniqueError};
