//! Shape providers (§4.2): synthesizing or loading triangle meshes and
//! analytic spheres, the mesh-processing pipeline that prepares them for
//! the scene database, and their blob serialization.

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

pub mod blob;
pub mod errors;
pub mod primitives;
pub mod provider;
pub mod trimesh;

pub use errors::ShapeError;
pub use provider::{provider_for, ShapeKind, ShapeProvider, ShapeRecord, SphereProvider, TriMeshProvider};
pub use trimesh::{Face, PlaneShape, SphereShape, TriMesh};
