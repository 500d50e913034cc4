//! The shader roles a generated string can be emitted for (§4.8, §6.2).

/// A shader role with a fixed exported name and a dispatcher call on the
/// device handle. Distinct from [`ignis_device::ServiceShader`], which
/// covers the render-wide post-process shaders rather than per-variant
/// tracing shaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderRole {
    /// Produces the primary ray batch.
    RayGeneration,
    /// Handles rays that escape the scene.
    Miss,
    /// Handles a surface hit, specialized per material id.
    Hit {
        /// The material id this shader is specialized for.
        material_id: usize,
    },
    /// Handles an occlusion test, in one of two flavors depending on
    /// [`ignis_technique::ShadowHandlingMode`].
    AdvancedShadow {
        /// The material id this shader is specialized for, when the
        /// owning variant's shadow mode is `AdvancedWithMaterials`.
        material_id: Option<usize>,
    },
    /// Primary-ray BVH traversal.
    TraversalPrimary,
    /// Secondary-ray BVH traversal.
    TraversalSecondary,
}

impl ShaderRole {
    /// The role tag used in the exported function name
    /// (`ig_<role>_shader`).
    pub fn tag(self) -> &'static str {
        match self {
            ShaderRole::RayGeneration => "raygen",
            ShaderRole::Miss => "miss",
            ShaderRole::Hit { .. } => "hit",
            ShaderRole::AdvancedShadow { .. } => "advanced_shadow",
            ShaderRole::TraversalPrimary => "traversal_primary",
            ShaderRole::TraversalSecondary => "traversal_secondary",
        }
    }

    /// The exported function name for this role, disambiguated by
    /// material id where the role is per-material.
    pub fn export_name(self) -> String {
        match self {
            ShaderRole::Hit { material_id } => format!("ig_{}_shader_{material_id}", self.tag()),
            ShaderRole::AdvancedShadow { material_id: Some(id) } => format!("ig_{}_shader_{id}", self.tag()),
            _ => format!("ig_{}_shader", self.tag()),
        }
    }

    /// The `device.handle_<role>_shader(…)` dispatcher call emitted at
    /// the end of the shader body (§4.8 step 6). `RayGeneration` instead
    /// dispatches through `device.generate_rays()` (§6.2).
    pub fn dispatcher_call(self, shader_expr: &str) -> String {
        match self {
            ShaderRole::RayGeneration => "device.generate_rays();".to_owned(),
            ShaderRole::Miss => format!("device.handle_miss_shader({shader_expr});"),
            ShaderRole::Hit { .. } => format!("device.handle_hit_shader({shader_expr});"),
            ShaderRole::AdvancedShadow { .. } => format!("device.handle_advanced_shadow_shader({shader_expr});"),
            ShaderRole::TraversalPrimary => format!("device.handle_traversal_primary_shader({shader_expr});"),
            ShaderRole::TraversalSecondary => format!("device.handle_traversal_secondary_shader({shader_expr});"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_shaders_are_named_per_material() {
        assert_eq!(ShaderRole::Hit { material_id: 3 }.export_name(), "ig_hit_shader_3");
    }

    #[test]
    fn miss_shader_has_a_fixed_name() {
        assert_eq!(ShaderRole::Miss.export_name(), "ig_miss_shader");
    }

    #[test]
    fn raygen_dispatches_through_generate_rays() {
        assert_eq!(ShaderRole::RayGeneration.dispatcher_call("shader"), "device.generate_rays();");
    }

    #[test]
    fn advanced_shadow_without_material_uses_the_plain_name() {
        assert_eq!(ShaderRole::AdvancedShadow { material_id: None }.export_name(), "ig_advanced_shadow_shader");
    }
}
