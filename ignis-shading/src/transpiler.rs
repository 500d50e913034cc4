//! Transpilation of a [`PExprNode`] tree to DSL source (§4.5).
//!
//! The transpiler assigns fresh, monotonically-counted binding names,
//! folds a handful of trivial literal identities, and collapses a call
//! whose argument text repeats within itself into an inline closure that
//! binds each distinct repeated argument once instead of re-emitting its
//! source over and over.

use crate::error::TranspileError;
use crate::expr::{BinOp, PExprNode, PExprType, UnOp};
use crate::{context, options::EmbedType};

/// How the transpiler resolves names and texture references it does not
/// itself own. [`crate::tree::ShadingTree`] implements this to wire in
/// custom scene variables and declared textures.
pub trait ExternalResolver {
    /// Resolve a bare identifier that is not one of the fixed internal
    /// variables.
    fn resolve_variable(&self, name: &str) -> Option<(PExprType, String)>;

    /// Resolve a `tex("name")` reference to its DSL evaluation source.
    fn resolve_texture(&self, name: &str) -> Option<(PExprType, String)>;
}

/// A resolver with nothing registered, for transpiling expressions that
/// only use internal variables and functions.
#[derive(Debug, Default)]
pub struct EmptyResolver;

impl ExternalResolver for EmptyResolver {
    fn resolve_variable(&self, _name: &str) -> Option<(PExprType, String)> { None }
    fn resolve_texture(&self, _name: &str) -> Option<(PExprType, String)> { None }
}

/// A single transpiled value: its type and its DSL source expression.
pub type Emitted = (PExprType, String);

/// The shortest longest-argument length a call needs before its repeated
/// arguments are worth collapsing into a shared binding at all.
const MIN_COLLAPSE_LENGTH: usize = 16;

/// Transpiles [`PExprNode`] trees into DSL source, one expression at a
/// time, assigning collapsed-call bindings a fresh, monotonically
/// increasing name.
#[derive(Debug, Default)]
pub struct Transpiler {
    next_id: usize,
}

impl Transpiler {
    /// Create a fresh transpiler.
    pub fn new() -> Self { Self::default() }

    /// Transpile a single expression tree to DSL source.
    pub fn emit(&mut self, node: &PExprNode, resolver: &dyn ExternalResolver) -> Result<Emitted, TranspileError> {
        match node {
            PExprNode::Number(n) => Ok((PExprType::Number, format_number(*n))),
            PExprNode::Bool(b) => Ok((PExprType::Bool, b.to_string())),
            PExprNode::StringLit(s) => Ok((PExprType::String, format!("{s:?}"))),
            PExprNode::Ident(name) => self.emit_ident(name, resolver),
            PExprNode::Call { name, args } => self.emit_call(name, args, resolver),
            PExprNode::Binary { op, lhs, rhs } => self.emit_binary(*op, lhs, rhs, resolver),
            PExprNode::Unary { op, expr } => self.emit_unary(*op, expr, resolver),
            PExprNode::Swizzle { base, components } => self.emit_swizzle(base, components, resolver),
        }
    }

    fn emit_ident(&mut self, name: &str, resolver: &dyn ExternalResolver) -> Result<Emitted, TranspileError> {
        if let Some(var) = context::lookup_variable(name) {
            return Ok((var.ty, var.dsl.to_owned()));
        }
        resolver.resolve_variable(name).ok_or_else(|| TranspileError::UnboundIdentifier(name.to_owned()))
    }

    fn emit_call(&mut self, name: &str, args: &[PExprNode], resolver: &dyn ExternalResolver) -> Result<Emitted, TranspileError> {
        if name == "tex" {
            if let [PExprNode::StringLit(tex_name)] = args {
                return resolver
                    .resolve_texture(tex_name)
                    .ok_or_else(|| TranspileError::UndeclaredTexture(tex_name.clone()));
            }
        }

        let overloads = context::lookup_function(name);
        if overloads.is_empty() {
            return Err(TranspileError::UnboundIdentifier(name.to_owned()));
        }
        let overload = context::lookup_function_arity(name, args.len())
            .ok_or_else(|| TranspileError::NoSuchOverload { name: name.to_owned(), arity: args.len() })?;

        let mut emitted = Vec::with_capacity(args.len());
        for arg in args {
            emitted.push(self.emit(arg, resolver)?);
        }
        let first_arg_ty = emitted.first().map(|(ty, _)| *ty).unwrap_or(PExprType::Number);
        let ret_ty = call_return_type(name, first_arg_ty);
        let arg_srcs: Vec<_> = emitted.into_iter().map(|(_, src)| src).collect();
        let dsl = overload.dsl;
        let call_src = self.collapse_call(&arg_srcs, |args| format!("{dsl}({})", args.join(", ")));
        Ok((ret_ty, call_src))
    }

    /// Collapses a repeated identical argument string within one call's
    /// own argument list into a shared binding, wrapping the call in an
    /// inline closure that declares one `let` per distinct repeated
    /// argument (§4.5 "Collapse"). We assume a call's result depends only
    /// on its arguments, so sharing a binding across occurrences of the
    /// same argument text is safe.
    ///
    /// Collapsing only triggers when the call's longest argument is at
    /// least [`MIN_COLLAPSE_LENGTH`] characters *and* at least one
    /// argument's text is duplicated elsewhere in the same call; a call
    /// with fewer than two arguments, or whose arguments are all distinct
    /// or all short, is emitted as-is. The binding-name counter only
    /// advances when collapsing actually triggers.
    fn collapse_call(&mut self, args: &[String], build: impl Fn(&[String]) -> String) -> String {
        if args.len() <= 1 {
            return build(args);
        }

        let mut trial_id = self.next_id;
        let mut max_length = 0;
        let mut bindings: Vec<(String, String)> = Vec::new();
        for arg in args {
            max_length = max_length.max(arg.len());
            if !bindings.iter().any(|(text, _)| text == arg) {
                bindings.push((arg.clone(), format!("a{trial_id}")));
                trial_id += 1;
            }
        }

        if max_length < MIN_COLLAPSE_LENGTH || bindings.len() == args.len() {
            return build(args);
        }

        self.next_id = trial_id;
        let new_args: Vec<String> =
            args.iter().map(|arg| bindings.iter().find(|(text, _)| text == arg).unwrap().1.clone()).collect();

        let mut source = String::from("(@|| { ");
        for (text, binding_name) in &bindings {
            source.push_str(&format!("let {binding_name} = {text};"));
        }
        source.push_str(&build(&new_args));
        source.push_str("})()");
        source
    }

    fn emit_binary(&mut self, op: BinOp, lhs: &PExprNode, rhs: &PExprNode, resolver: &dyn ExternalResolver) -> Result<Emitted, TranspileError> {
        let (lty, lsrc) = self.emit(lhs, resolver)?;
        let (rty, rsrc) = self.emit(rhs, resolver)?;

        if lhs == rhs {
            match op {
                BinOp::Sub if lty == PExprType::Number => return Ok((PExprType::Number, "0".to_owned())),
                BinOp::Mul if lty == PExprType::Number => {
                    return Ok((PExprType::Number, format!("math_builtins::pow({lsrc}, 2)")));
                }
                _ => {}
            }
        }

        match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
                self.emit_arithmetic(op, (lty, lsrc), (rty, rsrc))
            }
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge | BinOp::Eq | BinOp::Ne => {
                if lty != PExprType::Number && lty != PExprType::Integer {
                    return Err(TranspileError::OperatorTypeMismatch { op: op_symbol(op), lhs: lty, rhs: Some(rty) });
                }
                Ok((PExprType::Bool, format!("({lsrc} {} {rsrc})", op_symbol(op))))
            }
            BinOp::And | BinOp::Or => {
                if lty != PExprType::Bool || rty != PExprType::Bool {
                    return Err(TranspileError::OperatorTypeMismatch { op: op_symbol(op), lhs: lty, rhs: Some(rty) });
                }
                Ok((PExprType::Bool, format!("({lsrc} {} {rsrc})", op_symbol(op))))
            }
        }
    }

    fn emit_arithmetic(&mut self, op: BinOp, lhs: Emitted, rhs: Emitted) -> Result<Emitted, TranspileError> {
        let (lty, lsrc) = lhs;
        let (rty, rsrc) = rhs;
        let sym = op_symbol(op);

        if lty == rty {
            return Ok((lty, format!("({lsrc} {sym} {rsrc})")));
        }

        // scalar<->color mixes: the scalar side is broadcast into a gray color.
        if lty == PExprType::Number && rty == PExprType::Color {
            return Ok((PExprType::Color, format!("(make_gray_color({lsrc}) {sym} {rsrc})")));
        }
        if lty == PExprType::Color && rty == PExprType::Number {
            return Ok((PExprType::Color, format!("({lsrc} {sym} make_gray_color({rsrc}))")));
        }

        Err(TranspileError::OperatorTypeMismatch { op: sym, lhs: lty, rhs: Some(rty) })
    }

    fn emit_unary(&mut self, op: UnOp, expr: &PExprNode, resolver: &dyn ExternalResolver) -> Result<Emitted, TranspileError> {
        let (ty, src) = self.emit(expr, resolver)?;
        match op {
            UnOp::Neg if ty == PExprType::Bool => {
                Err(TranspileError::OperatorTypeMismatch { op: "-", lhs: ty, rhs: None })
            }
            UnOp::Neg => Ok((ty, format!("(-{src})"))),
            UnOp::Not if ty == PExprType::Bool => Ok((PExprType::Bool, format!("(!{src})"))),
            UnOp::Not => Err(TranspileError::OperatorTypeMismatch { op: "!", lhs: ty, rhs: None }),
        }
    }

    fn emit_swizzle(&mut self, base: &PExprNode, components: &str, resolver: &dyn ExternalResolver) -> Result<Emitted, TranspileError> {
        let (ty, src) = self.emit(base, resolver)?;
        let count = ty.component_count().ok_or(TranspileError::SwizzleOfNonVector(ty))?;

        let mut indices = Vec::with_capacity(components.len());
        for c in components.chars() {
            let idx = match c {
                'x' => 0,
                'y' => 1,
                'z' if count >= 3 => 2,
                'w' if count >= 4 => 3,
                other => return Err(TranspileError::InvalidSwizzle(other)),
            };
            indices.push(idx);
        }

        let result_ty = match indices.len() {
            1 => PExprType::Number,
            2 => PExprType::Vec2,
            3 => PExprType::Vec3,
            4 => PExprType::Vec4,
            _ => return Err(TranspileError::InvalidSwizzle(components.chars().next().unwrap_or('?'))),
        };

        Ok((result_ty, format!("{src}.{components}")))
    }
}

fn call_return_type(name: &str, arg_ty: PExprType) -> PExprType {
    match name {
        "color_average" | "color_to_xyz" => PExprType::Number,
        "make_gray_color" | "xyz_to_color" => PExprType::Color,
        "is_camera_ray" | "is_light_ray" | "is_bounce_ray" | "is_shadow_ray" => PExprType::Bool,
        "vec2" => PExprType::Vec2,
        "vec3" | "transform_point" | "transform_vector" | "transform_normal" | "bump" => PExprType::Vec3,
        "vec4" => PExprType::Vec4,
        "color" => PExprType::Color,
        _ => arg_ty,
    }
}

fn op_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
        BinOp::Lt => "<",
        BinOp::Le => "<=",
        BinOp::Gt => ">",
        BinOp::Ge => ">=",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::And => "&&",
        BinOp::Or => "||",
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{n:.1}")
    } else {
        format!("{n}")
    }
}

/// Coerce an emitted value to [`PExprType::Color`], wrapping a scalar in
/// `make_gray_color` (§4.5 "scalar→color wraps").
pub fn coerce_to_color(value: Emitted) -> Emitted {
    match value {
        (PExprType::Color, src) => (PExprType::Color, src),
        (_, src) => (PExprType::Color, format!("make_gray_color({src})")),
    }
}

/// Coerce an emitted value to [`PExprType::Number`], wrapping a color in
/// `color_average` and logging a warning (§4.5 "color→scalar wraps ...
/// and warns").
pub fn coerce_to_number(value: Emitted) -> Emitted {
    match value {
        (PExprType::Number, src) => (PExprType::Number, src),
        (PExprType::Color, src) => {
            log::warn!("implicitly averaging a color to a scalar: {src}");
            (PExprType::Number, format!("color_average({src})"))
        }
        (_, src) => (PExprType::Number, src),
    }
}

/// Whether `embed` asks for the value to be baked into the generated
/// source as a literal rather than registered as a runtime parameter,
/// given the ambient default for this kind of acquisition.
pub fn should_embed(embed: EmbedType, default_for_kind: bool) -> bool {
    match embed {
        EmbedType::Structural => true,
        EmbedType::Dynamic => false,
        EmbedType::Default => default_for_kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_variable_resolves_without_a_custom_resolver() {
        let mut t = Transpiler::new();
        let (ty, src) = t.emit(&PExprNode::Ident("uvw".to_owned()), &EmptyResolver).unwrap();
        assert_eq!(ty, PExprType::Vec3);
        assert_eq!(src, "ctx.uvw");
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        let mut t = Transpiler::new();
        let err = t.emit(&PExprNode::Ident("not_a_thing".to_owned()), &EmptyResolver).unwrap_err();
        assert_eq!(err, TranspileError::UnboundIdentifier("not_a_thing".to_owned()));
    }

    #[test]
    fn a_minus_a_folds_to_zero() {
        let mut t = Transpiler::new();
        let node = PExprNode::Binary {
            op: BinOp::Sub,
            lhs: Box::new(PExprNode::Ident("t".to_owned())),
            rhs: Box::new(PExprNode::Ident("t".to_owned())),
        };
        let (ty, src) = t.emit(&node, &EmptyResolver).unwrap();
        assert_eq!(ty, PExprType::Number);
        assert_eq!(src, "0");
    }

    #[test]
    fn a_times_a_folds_to_pow() {
        let mut t = Transpiler::new();
        let node = PExprNode::Binary {
            op: BinOp::Mul,
            lhs: Box::new(PExprNode::Ident("t".to_owned())),
            rhs: Box::new(PExprNode::Ident("t".to_owned())),
        };
        let (_, src) = t.emit(&node, &EmptyResolver).unwrap();
        assert_eq!(src, "math_builtins::pow(ctx.ray.tmax, 2)");
    }

    #[test]
    fn scalar_and_color_mix_broadcasts_the_scalar() {
        let mut t = Transpiler::new();
        let node = PExprNode::Binary {
            op: BinOp::Add,
            lhs: Box::new(PExprNode::Number(1.0)),
            rhs: Box::new(PExprNode::Call { name: "color".to_owned(), args: vec![PExprNode::Number(0.0); 3] }),
        };
        let (ty, src) = t.emit(&node, &EmptyResolver).unwrap();
        assert_eq!(ty, PExprType::Color);
        assert!(src.contains("make_gray_color(1.0)"));
    }

    #[test]
    fn call_with_a_repeated_long_argument_collapses_into_an_inline_closure() {
        let mut t = Transpiler::new();
        let long_arg = PExprNode::Call { name: "pow".to_owned(), args: vec![PExprNode::Ident("t".to_owned()), PExprNode::Number(2.0)] };
        let call = PExprNode::Call { name: "select".to_owned(), args: vec![PExprNode::Bool(true), long_arg.clone(), long_arg] };
        let (_, src) = t.emit(&call, &EmptyResolver).unwrap();
        assert_eq!(src, "(@|| { let a0 = true;let a1 = math_builtins::pow(ctx.ray.tmax, 2.0);select(a0, a1, a1)})()");
    }

    #[test]
    fn call_with_short_arguments_never_collapses() {
        let mut t = Transpiler::new();
        let call = PExprNode::Call {
            name: "clamp".to_owned(),
            args: vec![PExprNode::Ident("t".to_owned()), PExprNode::Number(0.0), PExprNode::Number(1.0)],
        };
        let (_, src) = t.emit(&call, &EmptyResolver).unwrap();
        assert_eq!(src, "clampf(ctx.ray.tmax, 0.0, 1.0)");
    }

    #[test]
    fn call_with_distinct_long_arguments_never_collapses() {
        let mut t = Transpiler::new();
        let a = PExprNode::Call { name: "pow".to_owned(), args: vec![PExprNode::Ident("t".to_owned()), PExprNode::Number(2.0)] };
        let b = PExprNode::Call { name: "pow".to_owned(), args: vec![PExprNode::Ident("t".to_owned()), PExprNode::Number(3.0)] };
        let call = PExprNode::Call { name: "select".to_owned(), args: vec![PExprNode::Bool(true), a, b] };
        let (_, src) = t.emit(&call, &EmptyResolver).unwrap();
        assert!(!src.contains("(@||"));
    }

    #[test]
    fn swizzle_of_a_scalar_is_an_error() {
        let mut t = Transpiler::new();
        let node = PExprNode::Swizzle { base: Box::new(PExprNode::Number(1.0)), components: "x".to_owned() };
        let err = t.emit(&node, &EmptyResolver).unwrap_err();
        assert_eq!(err, TranspileError::SwizzleOfNonVector(PExprType::Number));
    }

    #[test]
    fn swizzle_xy_of_uvw_yields_a_vec2() {
        let mut t = Transpiler::new();
        let node = PExprNode::Swizzle { base: Box::new(PExprNode::Ident("uvw".to_owned())), components: "xy".to_owned() };
        let (ty, src) = t.emit(&node, &EmptyResolver).unwrap();
        assert_eq!(ty, PExprType::Vec2);
        assert_eq!(src, "ctx.uvw.xy");
    }
}
