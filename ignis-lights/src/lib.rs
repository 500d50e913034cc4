//! The light loader (§4.4): typed light objects, embed-class partitioning,
//! and CDF/hierarchy selectors.

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

pub mod cdf;
pub mod embed;
pub mod hierarchy;
pub mod light;
pub mod loader;

pub use cdf::Cdf;
pub use embed::EmbedClassCounter;
pub use hierarchy::{build as build_hierarchy, HierarchyNode, LightHierarchy};
pub use light::{AreaRepresentation, Light, LightKind};
pub use loader::{load, prepare, LoadedLights, LightSelector, SelectorRequest, EMBED_THRESHOLD};
