//! The N-wide scene BVH (§3, §4.6): one tree per shape provider, built
//! top-down over that provider's `EntityObject`s and flattened into the
//! byte layout the scene database's dynamic tables store.

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

pub mod build;
pub mod entity_object;
pub mod leaf;
pub mod serialize;

pub use build::{Bvh, BvhBuilder, ChildRef};
pub use entity_object::{visibility, EntityObject};
pub use leaf::EntityLeaf1;
pub use serialize::{write_leaves, write_nodes};
