//! Advanced-shadow shader emission (§4.8: "Advanced-shadow shaders come
//! in two flavors controlled by `ShadowHandlingMode`: *Advanced* emits
//! one shader with a black BSDF placeholder; *AdvancedWithMaterials*
//! emits per-material specialization identical in shape to hit
//! shaders").

use ignis_technique::ShadowHandlingMode;

use crate::material::MaterialSpec;

/// The body fragment(s) for a variant's advanced-shadow shader(s), one
/// per flavor of [`ShadowHandlingMode`]. `Simple` variants never reach
/// this emitter — they use the device's built-in occlusion test instead.
pub enum AdvancedShadowBody {
    /// A single shader using a black BSDF placeholder in place of any
    /// real material.
    Single(String),
    /// One specialized fragment per material, shaped like a hit shader.
    PerMaterial(Vec<(usize, String)>),
}

/// Emits the advanced-shadow body for `mode`, given the scene's
/// materials (used only by `AdvancedWithMaterials`).
pub fn emit_advanced_shadow(mode: ShadowHandlingMode, materials: &[MaterialSpec]) -> Option<AdvancedShadowBody> {
    match mode {
        ShadowHandlingMode::Simple => None,
        ShadowHandlingMode::Advanced => {
            Some(AdvancedShadowBody::Single("let bsdf = black_bsdf();\nlet shader: MaterialShader = make_material(ctx, bsdf);".to_owned()))
        }
        ShadowHandlingMode::AdvancedWithMaterials => {
            let fragments = materials
                .iter()
                .map(|material| (material.material_id, crate::material::emit_material_fragment(material)))
                .collect();
            Some(AdvancedShadowBody::PerMaterial(fragments))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_mode_needs_no_advanced_shadow_shader() {
        assert!(emit_advanced_shadow(ShadowHandlingMode::Simple, &[]).is_none());
    }

    #[test]
    fn advanced_mode_uses_a_black_bsdf_placeholder() {
        let body = emit_advanced_shadow(ShadowHandlingMode::Advanced, &[]).unwrap();
        match body {
            AdvancedShadowBody::Single(src) => assert!(src.contains("black_bsdf")),
            AdvancedShadowBody::PerMaterial(_) => panic!("expected a single shader"),
        }
    }

    #[test]
    fn advanced_with_materials_specializes_per_material() {
        let materials = vec![
            MaterialSpec { material_id: 0, bsdf_expr: "make_diffuse_bsdf(a)".to_owned(), is_emissive: false },
            MaterialSpec { material_id: 1, bsdf_expr: "make_diffuse_bsdf(b)".to_owned(), is_emissive: true },
        ];
        let body = emit_advanced_shadow(ShadowHandlingMode::AdvancedWithMaterials, &materials).unwrap();
        match body {
            AdvancedShadowBody::PerMaterial(fragments) => assert_eq!(fragments.len(), 2),
            AdvancedShadowBody::Single(_) => panic!("expected per-material fragments"),
        }
    }
}
