//! Error types for transpilation and shading-tree assembly.

use thiserror::Error;

use crate::expr::PExprType;

/// An error raised while transpiling a [`crate::expr::PExprNode`] tree.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TranspileError {
    /// An identifier that is neither an internal variable nor a
    /// registered custom variable.
    #[error("unbound identifier `{0}`")]
    UnboundIdentifier(String),
    /// A function name with no internal-function overload for the given
    /// argument count.
    #[error("no overload of `{name}` takes {arity} argument(s)")]
    NoSuchOverload {
        /// The called function's name.
        name: String,
        /// The number of arguments it was called with.
        arity: usize,
    },
    /// A swizzle string containing a character that is not `x`, `y`, `z`,
    /// or `w`.
    #[error("invalid swizzle component `{0}`")]
    InvalidSwizzle(char),
    /// A swizzle applied to a non-vector base expression.
    #[error("cannot swizzle a value of type {0:?}")]
    SwizzleOfNonVector(PExprType),
    /// A binary or unary operator applied to operand types it does not
    /// support.
    #[error("operator `{op}` does not support operand type(s) {lhs:?}, {rhs:?}")]
    OperatorTypeMismatch {
        /// The operator's display form, e.g. `"+"`.
        op: &'static str,
        /// The left (or sole, for unary) operand's type.
        lhs: PExprType,
        /// The right operand's type, absent for unary operators.
        rhs: Option<PExprType>,
    },
    /// A `tex("name")` reference to a texture not declared in the scene.
    #[error("reference to undeclared texture `{0}`")]
    UndeclaredTexture(String),
}

/// An error raised while assembling a [`crate::tree::ShadingTree`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShadingError {
    /// Wraps a transpile failure encountered while acquiring a parameter.
    #[error(transparent)]
    Transpile(#[from] TranspileError),
    /// A parameter acquisition referenced a scene object that does not
    /// exist.
    #[error("no such object `{0}` in the scene")]
    UnknownObject(String),
}
