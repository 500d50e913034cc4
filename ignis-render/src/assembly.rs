//! Per-variant shader-set assembly: ties the technique registry
//! ([`ignis_technique::get_info`]/[`ignis_technique::emit_body`])
//! together with [`compose`] to produce every shader string one variant
//! needs (§4.9 step 2: "bind local parameter registry... launch
//! ray-generation... device executes the traversal+miss+hit+shadow
//! pipeline").

use ignis_scene::Object;
use ignis_technique::{ShadowHandlingMode, TechniqueVariantInfo};
use rustc_hash::FxHashMap;

use crate::compose::{compose, ShaderEmission};
use crate::error::RenderError;
use crate::material::MaterialSpec;
use crate::payload::PayloadInfo;
use crate::raygen::{emit_raygen_body, PixelSampler, RayGenerationSource};
use crate::role::ShaderRole;
use crate::shadow::{emit_advanced_shadow, AdvancedShadowBody};
use crate::target::Target;

/// Everything [`assemble_variant`] needs beyond the technique's own
/// `props`: the target to compile for, the materials it must specialize
/// hit/advanced-shadow shaders for, and the component fragments common
/// to every shader in this variant (lights, media, camera setup).
pub struct VariantInputs<'a> {
    /// The compile target.
    pub target: Target,
    /// Materials referenced by entities visible under this variant.
    pub materials: &'a [MaterialSpec],
    /// Component-specific fragments shared by every shader role
    /// (§4.8 step 4): light tables, medium setup, camera binding.
    pub shared_fragments: Vec<String>,
    /// The pixel sampler to use when the variant has no
    /// `override_camera_generator` (camera-driven ray generation).
    pub pixel_sampler: PixelSampler,
}

/// One generated shader, keyed by its exported role.
pub struct EmittedShader {
    /// The role this source was generated for.
    pub role: ShaderRole,
    /// The complete, self-contained DSL source string.
    pub source: String,
}

/// Assembles every shader `variant` (the `variant_index`-th variant of
/// the technique named by `technique_name`/`props`) needs: ray
/// generation, miss, one hit shader per material, and an advanced-shadow
/// shader (or one per material) when the variant's `shadow_handling_mode`
/// calls for it.
///
/// Identical hit-shader source strings (materials sharing a BSDF
/// expression) are deduplicated by source text, mirroring the
/// transpiler's call-collapse cache (§4.5) rather than recompiling the
/// same string once per material id.
pub fn assemble_variant(
    technique_name: &str,
    props: &Object,
    variant_index: usize,
    variant: &TechniqueVariantInfo,
    inputs: &VariantInputs<'_>,
) -> Result<Vec<EmittedShader>, RenderError> {
    let technique_body = ignis_technique::emit_body(technique_name, props, variant_index)?;
    let payload = PayloadInfo::from_variant(variant);
    let mut shaders = Vec::new();
    let mut seen_sources: FxHashMap<String, ()> = FxHashMap::default();

    let raygen_source = match &variant.override_camera_generator {
        Some(generator) => RayGenerationSource::ListOfRays { generator: generator.clone() },
        None => RayGenerationSource::Camera { sampler: inputs.pixel_sampler },
    };
    let mut raygen_fragments = inputs.shared_fragments.clone();
    raygen_fragments.push(emit_raygen_body(&raygen_source));
    shaders.push(EmittedShader {
        role: ShaderRole::RayGeneration,
        source: compose(&ShaderEmission {
            role: ShaderRole::RayGeneration,
            target: inputs.target,
            payload,
            fragments: &raygen_fragments,
            technique_body: &technique_body,
            header: "",
            dispatch_expr: "",
        }),
    });

    if variant.uses_lights {
        shaders.push(EmittedShader {
            role: ShaderRole::Miss,
            source: compose(&ShaderEmission {
                role: ShaderRole::Miss,
                target: inputs.target,
                payload,
                fragments: &inputs.shared_fragments,
                technique_body: &technique_body,
                header: "",
                dispatch_expr: "technique",
            }),
        });
    }

    for material in inputs.materials {
        let fragment = crate::material::emit_material_fragment(material);
        let mut fragments = inputs.shared_fragments.clone();
        fragments.push(fragment);
        let role = ShaderRole::Hit { material_id: material.material_id };
        let source = compose(&ShaderEmission {
            role,
            target: inputs.target,
            payload,
            fragments: &fragments,
            technique_body: &technique_body,
            header: "",
            dispatch_expr: "shader",
        });
        if seen_sources.insert(source.clone(), ()).is_none() {
            shaders.push(EmittedShader { role, source });
        }
    }

    if let Some(body) = emit_advanced_shadow(variant.shadow_handling_mode, inputs.materials) {
        match body {
            AdvancedShadowBody::Single(fragment) => {
                let role = ShaderRole::AdvancedShadow { material_id: None };
                shaders.push(EmittedShader {
                    role,
                    source: compose(&ShaderEmission {
                        role,
                        target: inputs.target,
                        payload,
                        fragments: &[fragment],
                        technique_body: &technique_body,
                        header: "",
                        dispatch_expr: "shader",
                    }),
                });
            }
            AdvancedShadowBody::PerMaterial(fragments) => {
                for (material_id, fragment) in fragments {
                    let role = ShaderRole::AdvancedShadow { material_id: Some(material_id) };
                    shaders.push(EmittedShader {
                        role,
                        source: compose(&ShaderEmission {
                            role,
                            target: inputs.target,
                            payload,
                            fragments: &[fragment],
                            technique_body: &technique_body,
                            header: "",
                            dispatch_expr: "shader",
                        }),
                    });
                }
            }
        }
    }

    Ok(shaders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignis_technique::get_info;

    fn path_props(enable_mis: bool) -> Object {
        let mut props = Object::new("technique", "path");
        if enable_mis {
            props.properties.set("enable_mis", ignis_scene::Property::Number(1.0));
        }
        props
    }

    #[test]
    fn path_without_mis_emits_raygen_miss_and_one_hit_per_material_but_no_advanced_shadow() {
        let props = path_props(false);
        let info = get_info("path", &props).unwrap();
        let variant = &info.variants[0];
        let materials =
            vec![MaterialSpec { material_id: 0, bsdf_expr: "make_diffuse_bsdf(a)".to_owned(), is_emissive: false }];
        let inputs = VariantInputs { target: Target::Cpu { vector_width: 8 }, materials: &materials, shared_fragments: Vec::new(), pixel_sampler: PixelSampler::Halton };
        let shaders = assemble_variant("path", &props, 0, variant, &inputs).unwrap();
        assert!(shaders.iter().any(|s| s.role == ShaderRole::RayGeneration));
        assert!(shaders.iter().any(|s| s.role == ShaderRole::Miss));
        assert!(shaders.iter().any(|s| s.role == ShaderRole::Hit { material_id: 0 }));
        assert!(!shaders.iter().any(|s| matches!(s.role, ShaderRole::AdvancedShadow { .. })));
    }

    #[test]
    fn path_with_mis_also_emits_per_material_advanced_shadow() {
        let props = path_props(true);
        let info = get_info("path", &props).unwrap();
        let variant = &info.variants[0];
        assert_eq!(variant.shadow_handling_mode, ShadowHandlingMode::AdvancedWithMaterials);
        let materials =
            vec![MaterialSpec { material_id: 0, bsdf_expr: "make_diffuse_bsdf(a)".to_owned(), is_emissive: false }];
        let inputs = VariantInputs { target: Target::Cpu { vector_width: 4 }, materials: &materials, shared_fragments: Vec::new(), pixel_sampler: PixelSampler::Uniform };
        let shaders = assemble_variant("path", &props, 0, variant, &inputs).unwrap();
        assert!(shaders.iter().any(|s| s.role == ShaderRole::AdvancedShadow { material_id: Some(0) }));
    }

    #[test]
    fn ppm_variant_zero_uses_list_of_rays_generation() {
        let props = Object::new("technique", "ppm");
        let info = get_info("ppm", &props).unwrap();
        let variant = &info.variants[0];
        let inputs = VariantInputs { target: Target::NvidiaGpu, materials: &[], shared_fragments: Vec::new(), pixel_sampler: PixelSampler::Uniform };
        let shaders = assemble_variant("ppm", &props, 0, variant, &inputs).unwrap();
        let raygen = shaders.iter().find(|s| s.role == ShaderRole::RayGeneration).unwrap();
        assert!(raygen.source.contains("light_ray_generator"));
    }

    #[test]
    fn identical_material_sources_are_emitted_once() {
        let props = path_props(false);
        let info = get_info("path", &props).unwrap();
        let variant = &info.variants[0];
        let materials = vec![
            MaterialSpec { material_id: 0, bsdf_expr: "make_diffuse_bsdf(a)".to_owned(), is_emissive: false },
            MaterialSpec { material_id: 1, bsdf_expr: "make_diffuse_bsdf(a)".to_owned(), is_emissive: false },
        ];
        let inputs = VariantInputs { target: Target::Cpu { vector_width: 4 }, materials: &materials, shared_fragments: Vec::new(), pixel_sampler: PixelSampler::Uniform };
        let shaders = assemble_variant("path", &props, 0, variant, &inputs).unwrap();
        let hit_count = shaders.iter().filter(|s| matches!(s.role, ShaderRole::Hit { .. })).count();
        assert_eq!(hit_count, 1);
    }

    #[test]
    fn unknown_technique_name_is_an_error() {
        let props = Object::new("technique", "nope");
        let variant = TechniqueVariantInfo::default();
        let inputs = VariantInputs { target: Target::NvidiaGpu, materials: &[], shared_fragments: Vec::new(), pixel_sampler: PixelSampler::Uniform };
        assert!(assemble_variant("nope", &props, 0, &variant, &inputs).is_err());
    }
}
