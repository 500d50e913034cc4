//! The pattern (texture) DAG (§2): a generic arena-backed directed acyclic
//! graph ([`dag`]) plus the texture-specific dependency model built on top
//! of it ([`pattern`]).

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

pub mod dag;
pub mod pattern;

pub use dag::{Dag, Node, Path};
pub use pattern::{evaluation_order, populate, Pattern, PatternError, PatternKind};
