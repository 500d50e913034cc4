//! The per-iteration runtime loop (§4.9): for each active variant, launch
//! ray generation and update the framebuffer unless it's locked; advance
//! the sample count by ΣSPI over the non-locked variants that ran.

use ignis_device::DeviceHandle;
use ignis_stats::{SectionType, ShaderType, Statistics};
use ignis_technique::TechniqueInfo;

use crate::error::LoaderError;
use crate::variants::CompiledVariant;

/// Runs every variant active at `iteration`, in declared/selector order
/// (§4.9 step 1-2): launches ray generation (the device then executes its
/// whole traversal+miss+hit+shadow pipeline internally, already wired up
/// by [`crate::variants::compile_technique`]), then commits `
/// collect_pixels()`'s result to the framebuffer unless the variant locks
/// it (an info-buffer or photon pass writing only to its own AOVs, §4.7).
/// Timings are recorded into `stats` (§5 "thread-local, merged serially at
/// iteration boundaries"). Returns ΣSPI over the non-locked active variants
/// (§4.9 step 3).
pub fn run_iteration(
    device: &dyn DeviceHandle,
    info: &TechniqueInfo,
    variants: &[CompiledVariant],
    iteration: usize,
    hint_spi: usize,
    stats: &mut Statistics,
    mut collect_pixels: impl FnMut() -> Vec<f32>,
) -> Result<usize, LoaderError> {
    for index in info.active_variants(iteration) {
        let variant = &variants[index];
        let launch = stats.begin_shader_launch(ShaderType::RayGeneration, 1, 0);
        device.generate_rays()?;
        launch.end();
        if !variant.info.lock_framebuffer {
            let section = stats.begin_section(SectionType::FramebufferUpdate);
            device.update_framebuffer(&collect_pixels())?;
            drop(section);
        }
    }
    Ok(info.compute_spi(iteration, hint_spi))
}

/// Drives [`run_iteration`] until at least `desired_spp` samples have
/// accumulated (§4.9 "SPP/iteration invariants": `iterations =
/// ⌈desiredSPP / SPI⌉`). When `desired_spp` isn't an exact multiple of the
/// per-iteration SPI the actual count reached (`iterations * SPI`)
/// overshoots it, and that mismatch is logged as a warning rather than
/// treated as an error.
pub fn run_to_sample_count(
    device: &dyn DeviceHandle,
    info: &TechniqueInfo,
    variants: &[CompiledVariant],
    desired_spp: usize,
    hint_spi: usize,
    stats: &mut Statistics,
    mut collect_pixels: impl FnMut() -> Vec<f32>,
) -> Result<usize, LoaderError> {
    let mut samples = 0;
    let mut iteration = 0;
    while samples < desired_spp {
        samples += run_iteration(device, info, variants, iteration, hint_spi, stats, &mut collect_pixels)?;
        iteration += 1;
    }
    if samples != desired_spp {
        log::warn!(
            "requested {desired_spp} spp is not a multiple of this technique's samples-per-iteration; reached {samples} spp over {iteration} iterations instead"
        );
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignis_device::NullDevice;
    use ignis_technique::TechniqueVariantInfo;
    use ignis_render::ShaderRole;

    fn variant(lock_framebuffer: bool, spi: Option<usize>) -> CompiledVariant {
        CompiledVariant {
            info: TechniqueVariantInfo { lock_framebuffer, override_spi: spi, ..Default::default() },
            shaders: vec![(ShaderRole::RayGeneration, ignis_device::ShaderHandle::from_raw(0))],
        }
    }

    #[test]
    fn locked_variant_skips_framebuffer_update() {
        let device = NullDevice::new();
        let mut stats = Statistics::new();
        let info = TechniqueInfo::single_variant(TechniqueVariantInfo { lock_framebuffer: true, ..Default::default() });
        let variants = vec![variant(true, Some(1))];
        run_iteration(&device, &info, &variants, 0, 8, &mut stats, || vec![1.0]).unwrap();
        assert!(!device.calls().iter().any(|c| c.starts_with("update_framebuffer")));
        assert!(device.calls().iter().any(|c| c == "generate_rays()"));
        assert_eq!(stats.shader_stats(ShaderType::RayGeneration).unwrap().count, 1);
    }

    #[test]
    fn unlocked_variant_updates_the_framebuffer() {
        let device = NullDevice::new();
        let mut stats = Statistics::new();
        let info = TechniqueInfo::single_variant(TechniqueVariantInfo::default());
        let variants = vec![variant(false, None)];
        run_iteration(&device, &info, &variants, 0, 8, &mut stats, || vec![1.0, 2.0]).unwrap();
        assert!(device.calls().iter().any(|c| c == "update_framebuffer(len=2)"));
    }

    #[test]
    fn eight_spp_at_eight_spi_runs_one_iteration() {
        let device = NullDevice::new();
        let mut stats = Statistics::new();
        let info = TechniqueInfo::single_variant(TechniqueVariantInfo::default());
        let variants = vec![variant(false, None)];
        let reached = run_to_sample_count(&device, &info, &variants, 8, 8, &mut stats, || vec![]).unwrap();
        assert_eq!(reached, 8);
    }

    #[test]
    fn non_multiple_spp_overshoots_to_the_next_iteration_boundary() {
        let device = NullDevice::new();
        let mut stats = Statistics::new();
        let info = TechniqueInfo::single_variant(TechniqueVariantInfo::default());
        let variants = vec![variant(false, None)];
        // SPI = 8 (hint), desired 10 -> needs 2 iterations -> 16 reached.
        let reached = run_to_sample_count(&device, &info, &variants, 10, 8, &mut stats, || vec![]).unwrap();
        assert_eq!(reached, 16);
    }
}
