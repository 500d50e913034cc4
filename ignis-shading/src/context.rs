//! The fixed internal-variable and internal-function tables (§4.5): names
//! a PExpr may reference without the scene declaring them, and the DSL
//! source/type each resolves to.

use crate::expr::PExprType;

/// One entry of the internal-variable table: a name the Transpiler
/// recognizes without it being registered as a shading-tree parameter.
#[derive(Debug, Clone, Copy)]
pub struct InternalVariable {
    /// The PExpr-visible name, e.g. `"uvw"`.
    pub name: &'static str,
    /// The DSL source the name transpiles to, e.g. `"ctx.uvw"`.
    pub dsl: &'static str,
    /// The variable's type.
    pub ty: PExprType,
}

/// The fixed internal-variable table (§4.5).
///
/// `uv`/`uvw` are the surface parameterization, `P`/`V`/`N`/`Ng` the
/// shading point/view/shading-normal/geometric-normal, `Nx`/`Ny` the
/// shading tangent frame, `frontside` whether the hit is front-facing,
/// `entity_id` the hit entity's id, `Ix`/`Iy` the pixel coordinates,
/// `t` the hit distance, `frame` the current frame/sample index,
/// `Pi`/`E`/`Eps`/`Inf` the usual mathematical constants.
pub const INTERNAL_VARIABLES: &[InternalVariable] = &[
    InternalVariable { name: "uv", dsl: "ctx.uv", ty: PExprType::Vec2 },
    InternalVariable { name: "uvw", dsl: "ctx.uvw", ty: PExprType::Vec3 },
    InternalVariable { name: "P", dsl: "ctx.surf.point", ty: PExprType::Vec3 },
    InternalVariable { name: "V", dsl: "vec3_neg(ctx.ray.dir)", ty: PExprType::Vec3 },
    InternalVariable { name: "N", dsl: "ctx.surf.local.normal", ty: PExprType::Vec3 },
    InternalVariable { name: "Ng", dsl: "ctx.surf.gnormal", ty: PExprType::Vec3 },
    InternalVariable { name: "Nx", dsl: "ctx.surf.local.tangent", ty: PExprType::Vec3 },
    InternalVariable { name: "Ny", dsl: "ctx.surf.local.bitangent", ty: PExprType::Vec3 },
    InternalVariable { name: "frontside", dsl: "ctx.surf.is_entering", ty: PExprType::Bool },
    InternalVariable { name: "entity_id", dsl: "ctx.surf.entity_id", ty: PExprType::Integer },
    InternalVariable { name: "Ix", dsl: "ctx.pixel.x", ty: PExprType::Integer },
    InternalVariable { name: "Iy", dsl: "ctx.pixel.y", ty: PExprType::Integer },
    InternalVariable { name: "t", dsl: "ctx.ray.tmax", ty: PExprType::Number },
    InternalVariable { name: "frame", dsl: "ctx.frame", ty: PExprType::Integer },
    InternalVariable { name: "Pi", dsl: "flt_pi", ty: PExprType::Number },
    InternalVariable { name: "E", dsl: "flt_e", ty: PExprType::Number },
    InternalVariable { name: "Eps", dsl: "flt_eps", ty: PExprType::Number },
    InternalVariable { name: "Inf", dsl: "flt_inf", ty: PExprType::Number },
];

/// Look up an internal variable by its PExpr name.
pub fn lookup_variable(name: &str) -> Option<&'static InternalVariable> {
    INTERNAL_VARIABLES.iter().find(|v| v.name == name)
}

/// One overload of an internal function: its arity and the DSL function
/// name to call.
#[derive(Debug, Clone, Copy)]
pub struct InternalFunction {
    /// The PExpr-visible name, e.g. `"mix"`.
    pub name: &'static str,
    /// The number of arguments this overload takes.
    pub arity: usize,
    /// The DSL function called for this overload.
    pub dsl: &'static str,
}

/// The fixed internal-function multimap (§4.5): arithmetic and
/// transcendental functions, color-space conversions, noise families,
/// transform helpers, ray-flag checks, `select`, `lookup`, vector/color
/// constructors, and `bump`/`ensure_valid_reflection`.
///
/// Several names appear more than once with different arities — e.g.
/// `select` is ternary, `mix` is ternary — [`lookup_function`] returns
/// every overload for a name so the Transpiler can pick by arg count.
pub const INTERNAL_FUNCTIONS: &[InternalFunction] = &[
    InternalFunction { name: "sin", arity: 1, dsl: "math_builtins::sin" },
    InternalFunction { name: "cos", arity: 1, dsl: "math_builtins::cos" },
    InternalFunction { name: "tan", arity: 1, dsl: "math_builtins::tan" },
    InternalFunction { name: "sqrt", arity: 1, dsl: "math_builtins::sqrt" },
    InternalFunction { name: "pow", arity: 2, dsl: "math_builtins::pow" },
    InternalFunction { name: "abs", arity: 1, dsl: "math_builtins::fabs" },
    InternalFunction { name: "min", arity: 2, dsl: "math_builtins::fmin" },
    InternalFunction { name: "max", arity: 2, dsl: "math_builtins::fmax" },
    InternalFunction { name: "floor", arity: 1, dsl: "math_builtins::floor" },
    InternalFunction { name: "ceil", arity: 1, dsl: "math_builtins::ceil" },
    InternalFunction { name: "exp", arity: 1, dsl: "math_builtins::exp" },
    InternalFunction { name: "log", arity: 1, dsl: "math_builtins::log" },
    InternalFunction { name: "clamp", arity: 3, dsl: "clampf" },
    InternalFunction { name: "lerp", arity: 3, dsl: "lerp" },
    InternalFunction { name: "mix", arity: 3, dsl: "lerp" },
    InternalFunction { name: "select", arity: 3, dsl: "select" },
    InternalFunction { name: "lookup", arity: 2, dsl: "lookup_buffer" },
    InternalFunction { name: "make_gray_color", arity: 1, dsl: "make_gray_color" },
    InternalFunction { name: "color_average", arity: 1, dsl: "color_average" },
    InternalFunction { name: "color_to_xyz", arity: 1, dsl: "srgb_to_xyz" },
    InternalFunction { name: "xyz_to_color", arity: 1, dsl: "xyz_to_srgb" },
    InternalFunction { name: "perlin", arity: 3, dsl: "perlin_noise" },
    InternalFunction { name: "perlin", arity: 4, dsl: "perlin_noise_seeded" },
    InternalFunction { name: "cellnoise", arity: 3, dsl: "cell_noise" },
    InternalFunction { name: "voronoi", arity: 3, dsl: "voronoi_noise" },
    InternalFunction { name: "fbm", arity: 4, dsl: "fbm_noise" },
    InternalFunction { name: "transform_point", arity: 2, dsl: "mat3x4_transform_point" },
    InternalFunction { name: "transform_vector", arity: 2, dsl: "mat3x4_transform_direction" },
    InternalFunction { name: "transform_normal", arity: 2, dsl: "mat3x4_transform_normal" },
    InternalFunction { name: "is_camera_ray", arity: 0, dsl: "is_camera_ray_flag" },
    InternalFunction { name: "is_light_ray", arity: 0, dsl: "is_light_ray_flag" },
    InternalFunction { name: "is_bounce_ray", arity: 0, dsl: "is_bounce_ray_flag" },
    InternalFunction { name: "is_shadow_ray", arity: 0, dsl: "is_shadow_ray_flag" },
    InternalFunction { name: "vec2", arity: 2, dsl: "make_vec2" },
    InternalFunction { name: "vec3", arity: 3, dsl: "make_vec3" },
    InternalFunction { name: "vec4", arity: 4, dsl: "make_vec4" },
    InternalFunction { name: "color", arity: 3, dsl: "make_color" },
    InternalFunction { name: "bump", arity: 2, dsl: "bump_shading_normal" },
    InternalFunction { name: "ensure_valid_reflection", arity: 3, dsl: "ensure_valid_reflection" },
];

/// Look up every internal-function overload registered for `name`.
pub fn lookup_function(name: &str) -> Vec<&'static InternalFunction> {
    INTERNAL_FUNCTIONS.iter().filter(|f| f.name == name).collect()
}

/// Look up the internal-function overload registered for `name` with
/// exactly `arity` arguments.
pub fn lookup_function_arity(name: &str, arity: usize) -> Option<&'static InternalFunction> {
    INTERNAL_FUNCTIONS.iter().find(|f| f.name == name && f.arity == arity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uvw_resolves_to_a_vec3() {
        let v = lookup_variable("uvw").unwrap();
        assert_eq!(v.ty, PExprType::Vec3);
    }

    #[test]
    fn unknown_variable_is_absent() {
        assert!(lookup_variable("not_a_real_variable").is_none());
    }

    #[test]
    fn select_and_mix_are_both_ternary() {
        assert!(lookup_function_arity("select", 3).is_some());
        assert!(lookup_function_arity("mix", 3).is_some());
    }

    #[test]
    fn perlin_has_two_overloads() {
        assert_eq!(lookup_function("perlin").len(), 2);
    }
}
