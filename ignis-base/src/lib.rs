//! Basic structs and traits shared by the loader crates: cgmath re-exports at
//! `f64` precision, bounding boxes, affine transforms, tolerance and
//! pointer-identity ids.

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

/// Defines bounding box
pub mod bounding_box;
/// Redefines vectors, matrices or points with scalar = f64.
pub mod cgmath64;
/// Affine transform and the derived normal matrix / scale factor
pub mod transform;
/// A utility structure for chaining entry and or_insert_with by a fixed closure.
pub mod entry_map;
/// ID structure with `Copy`, `Hash` and `Eq` using raw pointers
pub mod id;
/// Setting Tolerance
pub mod tolerance;

/// The minimum bounding-box inflation applied to freshly loaded shapes (§3).
pub const MIN_BBOX_INFLATE: f64 = 1.0e-5;
