//! The shading pipeline (§4.5): a minimal PExpr AST ([`expr`]), the
//! fixed internal variable/function tables the transpiler resolves
//! against ([`context`]), parameter-acquisition options ([`options`]),
//! the transpiler itself ([`transpiler`]), the per-material shading
//! tree that drives it ([`tree`]), and texture baking ([`bake`]).

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

pub mod bake;
pub mod context;
pub mod error;
pub mod expr;
pub mod options;
pub mod transpiler;
pub mod tree;

pub use bake::{bake as bake_texture, BakedTexture, TextureBakeOptions};
pub use error::{ShadingError, TranspileError};
pub use expr::{BinOp, PExprNode, PExprType, UnOp};
pub use options::{ColorOptions, EmbedType, NumberOptions, TextureOptions, VectorOptions};
pub use transpiler::{EmptyResolver, ExternalResolver, Transpiler};
pub use tree::{Parameter, ShadingTree};
