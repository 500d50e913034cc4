//! Per-material shader body (§4.8: "Material shaders are emitted per
//! material id: the shader defines a local `shader: MaterialShader` that
//! wraps the material's BSDF expression and either `make_material` or
//! `make_emissive_material`").

/// A material ready to be wrapped into a `MaterialShader` DSL fragment.
#[derive(Debug, Clone)]
pub struct MaterialSpec {
    /// Dense id assigned during entity/material dedup (§4.3).
    pub material_id: usize,
    /// The transpiled BSDF expression this material's shading tree
    /// produced, e.g. `make_diffuse_bsdf(albedo)`.
    pub bsdf_expr: String,
    /// Whether this material's entity is registered as an area light
    /// under the variant currently being emitted (§4.3: "the emitter-entity
    /// field makes emissive entities unique").
    pub is_emissive: bool,
}

/// Emits the `let shader: MaterialShader = …;` fragment wrapping
/// `material`'s BSDF, choosing `make_material` or `make_emissive_material`
/// per its emissive status.
pub fn emit_material_fragment(material: &MaterialSpec) -> String {
    let constructor = if material.is_emissive { "make_emissive_material" } else { "make_material" };
    format!(
        "let bsdf = {bsdf};\nlet shader: MaterialShader = {constructor}(ctx, bsdf);",
        bsdf = material.bsdf_expr
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_emissive_material_uses_make_material() {
        let material = MaterialSpec { material_id: 0, bsdf_expr: "make_diffuse_bsdf(albedo)".to_owned(), is_emissive: false };
        let fragment = emit_material_fragment(&material);
        assert!(fragment.contains("make_material(ctx, bsdf)"));
    }

    #[test]
    fn emissive_material_uses_make_emissive_material() {
        let material = MaterialSpec { material_id: 1, bsdf_expr: "make_diffuse_bsdf(albedo)".to_owned(), is_emissive: true };
        let fragment = emit_material_fragment(&material);
        assert!(fragment.contains("make_emissive_material(ctx, bsdf)"));
    }
}
