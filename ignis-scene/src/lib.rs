//! The scene description data model (§3) and its parser (§6.1): a bag of
//! named, typed objects grouped by kind, each carrying a string-keyed
//! property map that downstream loader stages (shapes, entities, lights,
//! shading tree) read from.

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

pub mod error;
pub mod object;
pub mod parser;
pub mod property;
pub mod scene;

pub use error::ParseError;
pub use object::{Object, ObjectTable};
pub use parser::parse_scene;
pub use property::{Property, PropertyMap};
pub use scene::Scene;
