//! The PExpr AST the transpiler walks (§4.5, Non-goals: "a minimal internal
//! PExpr-subset AST is modeled only insofar as the Transpiler needs
//! something to walk — full parsing grammar is out of scope").
//!
//! `ignis-shading` never parses PExpr source itself; scene string
//! properties are handed to this crate already parsed into a
//! [`PExprNode`] tree by an external parser.

/// The type a PExpr sub-expression evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PExprType {
    /// A boolean value.
    Bool,
    /// An integer value.
    Integer,
    /// A floating-point scalar.
    Number,
    /// A 2-component vector.
    Vec2,
    /// A 3-component vector.
    Vec3,
    /// A 4-component vector.
    Vec4,
    /// An RGB color.
    Color,
    /// A string literal (used for texture names and string-literal
    /// arguments like `"object"`/`"global"`).
    String,
}

impl PExprType {
    /// Whether values of this type are represented as a DSL `vecN`.
    pub fn is_vector(self) -> bool { matches!(self, PExprType::Vec2 | PExprType::Vec3 | PExprType::Vec4) }

    /// The number of components, for vector/color types.
    pub fn component_count(self) -> Option<usize> {
        match self {
            PExprType::Vec2 => Some(2),
            PExprType::Vec3 | PExprType::Color => Some(3),
            PExprType::Vec4 => Some(4),
            _ => None,
        }
    }
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `&&`
    And,
    /// `||`
    Or,
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    /// Arithmetic negation.
    Neg,
    /// Logical negation.
    Not,
}

/// One node of a parsed PExpr tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PExprNode {
    /// A numeric literal.
    Number(f64),
    /// A boolean literal.
    Bool(bool),
    /// A string literal, e.g. a texture name or a `"global"`/`"object"`
    /// space tag.
    StringLit(String),
    /// A bare identifier: an internal context variable (§4.5 "internal
    /// variable table"), a user-registered custom variable, or an unbound
    /// name (a transpile error).
    Ident(String),
    /// A function call: an internal function (§4.5 "internal function
    /// multimap"), or `tex("name")` referencing a declared texture.
    Call {
        /// The called function's name.
        name: String,
        /// Argument expressions.
        args: Vec<PExprNode>,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinOp,
        /// Left operand.
        lhs: Box<PExprNode>,
        /// Right operand.
        rhs: Box<PExprNode>,
    },
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnOp,
        /// The operand.
        expr: Box<PExprNode>,
    },
    /// A swizzle access, e.g. `uvw.xy`.
    Swizzle {
        /// The vector-valued base expression.
        base: Box<PExprNode>,
        /// The swizzle component string, e.g. `"xy"` or `"xyz"`.
        components: String,
    },
}

impl PExprNode {
    /// A `tex("name")` call, the shorthand the spec's Transpiler section
    /// and §8 S4 both use for texture references.
    pub fn texture_ref(name: impl Into<String>) -> Self {
        PExprNode::Call { name: "tex".to_owned(), args: vec![PExprNode::StringLit(name.into())] }
    }
}
