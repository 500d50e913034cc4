//! Variant shader assembly and device registration (§4.7/§4.8): resolves
//! the scene's technique to a [`TechniqueInfo`], assembles every variant's
//! shader set via [`ignis_render::assemble_variant`], compiles each source
//! string, and registers it with the device under its role (§4.8 step 6:
//! "the shader's dispatcher call... `device.handle_<role>_shader(...)`").

use ignis_device::DeviceHandle;
use ignis_render::{assemble_variant, EmittedShader, MaterialSpec, PixelSampler, RenderError, ShaderRole, Target, VariantInputs};
use ignis_scene::Object;
use ignis_technique::{get_info, TechniqueInfo, TechniqueVariantInfo};

use crate::error::LoaderError;

/// One technique variant, compiled and registered with the device.
pub struct CompiledVariant {
    /// The variant's own info (framebuffer overrides, SPI, lock flag, ...).
    pub info: TechniqueVariantInfo,
    /// Every shader this variant compiled, keyed by role.
    pub shaders: Vec<(ShaderRole, ignis_device::ShaderHandle)>,
}

/// Resolves `technique_name` to its [`TechniqueInfo`], then assembles,
/// compiles, and registers every one of its variants' shaders (§4.9 step
/// 2: "bind local parameter registry... device executes the
/// traversal+miss+hit+shadow pipeline").
pub fn compile_technique(
    device: &dyn DeviceHandle,
    technique_name: &str,
    props: &Object,
    target: Target,
    materials: &[MaterialSpec],
    shared_fragments: &[String],
    pixel_sampler: PixelSampler,
) -> Result<(TechniqueInfo, Vec<CompiledVariant>), LoaderError> {
    let info = get_info(technique_name, props).map_err(RenderError::Technique)?;

    let mut compiled = Vec::with_capacity(info.variants.len());
    for (index, variant) in info.variants.iter().enumerate() {
        let inputs = VariantInputs {
            target,
            materials,
            shared_fragments: shared_fragments.to_vec(),
            pixel_sampler,
        };
        let emitted = assemble_variant(technique_name, props, index, variant, &inputs)?;
        let mut shaders = Vec::with_capacity(emitted.len());
        for EmittedShader { role, source } in emitted {
            let handle = device.compile_shader(&source, &role.export_name())?;
            register(device, role, handle)?;
            shaders.push((role, handle));
        }
        compiled.push(CompiledVariant { info: variant.clone(), shaders });
    }
    Ok((info, compiled))
}

/// Dispatches a freshly compiled shader to the device slot matching its
/// role. Ray generation is never pre-registered: it is launched on demand
/// through `device.generate_rays()` (§4.8 role table), so compiling it is
/// sufficient.
fn register(device: &dyn DeviceHandle, role: ShaderRole, handle: ignis_device::ShaderHandle) -> Result<(), LoaderError> {
    match role {
        ShaderRole::RayGeneration => Ok(()),
        ShaderRole::Miss => device.handle_miss_shader(handle).map_err(LoaderError::from),
        ShaderRole::Hit { .. } => device.handle_hit_shader(handle).map_err(LoaderError::from),
        ShaderRole::AdvancedShadow { .. } => device.handle_advanced_shadow_shader(handle).map_err(LoaderError::from),
        ShaderRole::TraversalPrimary => device.handle_traversal_primary_shader(handle).map_err(LoaderError::from),
        ShaderRole::TraversalSecondary => device.handle_traversal_secondary_shader(handle).map_err(LoaderError::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignis_device::NullDevice;

    fn technique_object(plugin_type: &str) -> Object { Object::new("technique", plugin_type) }

    #[test]
    fn path_technique_compiles_raygen_miss_and_hit_shaders() {
        let device = NullDevice::new();
        let props = technique_object("path");
        let materials = vec![MaterialSpec { material_id: 0, bsdf_expr: "make_diffuse_bsdf(a)".to_owned(), is_emissive: false }];
        let (info, compiled) = compile_technique(
            &device,
            "path",
            &props,
            Target::Cpu { vector_width: 8 },
            &materials,
            &[],
            PixelSampler::Halton,
        )
        .unwrap();
        assert_eq!(info.variants.len(), 1);
        assert_eq!(compiled[0].shaders.len(), 3);
        assert!(device.calls().iter().any(|c| c.starts_with("compile_shader(ig_raygen_shader)")));
        assert!(device.calls().iter().any(|c| c.starts_with("handle_hit_shader")));
    }

    /// S5 (§8): the denoiser-wrapped technique produces two variants.
    #[test]
    fn ppm_technique_compiles_two_variants() {
        let device = NullDevice::new();
        let props = technique_object("ppm");
        let (info, compiled) = compile_technique(
            &device,
            "ppm",
            &props,
            Target::NvidiaGpu,
            &[],
            &[],
            PixelSampler::Uniform,
        )
        .unwrap();
        assert_eq!(info.variants.len(), 2);
        assert_eq!(compiled.len(), 2);
    }

    #[test]
    fn unknown_technique_is_rejected() {
        let device = NullDevice::new();
        let props = technique_object("nope");
        let err = compile_technique(&device, "nope", &props, Target::Cpu { vector_width: 4 }, &[], &[], PixelSampler::Uniform).unwrap_err();
        assert!(matches!(err, LoaderError::Render(_)));
    }
}
