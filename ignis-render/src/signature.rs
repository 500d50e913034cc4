//! The shader signature line (§4.8 step 1): `#[export] fn
//! ig_<role>_shader(settings: &Settings, …) -> … { … }`.

use crate::role::ShaderRole;

/// The extra parameters a shader role's signature carries beyond the
/// common `settings: &Settings`.
fn extra_params(role: ShaderRole) -> &'static str {
    match role {
        ShaderRole::RayGeneration => ", id: i32, size: i32, xmin: i32, ymin: i32, xmax: i32, ymax: i32",
        ShaderRole::Miss | ShaderRole::Hit { .. } | ShaderRole::AdvancedShadow { .. } => ", ctx: ShadingContext",
        ShaderRole::TraversalPrimary | ShaderRole::TraversalSecondary => ", ray: Ray",
    }
}

fn return_type(role: ShaderRole) -> &'static str {
    match role {
        ShaderRole::RayGeneration => "i32",
        ShaderRole::TraversalPrimary | ShaderRole::TraversalSecondary => "Hit",
        _ => "()",
    }
}

/// Renders the opening signature line for `role`, opening the function
/// body's brace (closed by [`crate::compose::close_shader`]).
pub fn emit(role: ShaderRole) -> String {
    format!("#[export] fn {}(settings: &Settings{}) -> {} {{", role.export_name(), extra_params(role), return_type(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raygen_signature_carries_the_tile_bounds() {
        let line = emit(ShaderRole::RayGeneration);
        assert!(line.starts_with("#[export] fn ig_raygen_shader(settings: &Settings, id: i32"));
        assert!(line.ends_with("-> i32 {"));
    }

    #[test]
    fn hit_signature_is_specialized_per_material() {
        let line = emit(ShaderRole::Hit { material_id: 2 });
        assert!(line.contains("ig_hit_shader_2"));
    }
}
