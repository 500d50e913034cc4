//! Ray-generation shader emission (§4.8: "Ray-generation uses either a
//! list-of-rays emitter (when operating as a tracer) or a camera emitter
//! using a pixel sampler — uniform, multi-jittered 4×4, or Halton
//! depending on configuration").

/// Pixel-sampling strategy for a camera ray-generation emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelSampler {
    /// One sample at the pixel center / a fixed stratified offset.
    Uniform,
    /// 4×4 multi-jittered stratification.
    MultiJittered4x4,
    /// Halton low-discrepancy sequence.
    Halton,
}

impl PixelSampler {
    fn constructor(self) -> &'static str {
        match self {
            PixelSampler::Uniform => "make_uniform_pixel_sampler()",
            PixelSampler::MultiJittered4x4 => "make_multi_jittered_pixel_sampler(4, 4)",
            PixelSampler::Halton => "make_halton_pixel_sampler()",
        }
    }
}

/// Which kind of ray-generation source a variant emits, per §4.7/§4.9:
/// a `TechniqueVariantInfo.override_camera_generator` selects the
/// list-of-rays emitter (tracer mode); otherwise the camera emitter is
/// used.
pub enum RayGenerationSource {
    /// A named generator producing rays from a non-camera source (e.g.
    /// `light_ray_generator` for light-tracer/PPM variants).
    ListOfRays {
        /// The DSL generator function name (e.g. `"light_ray_generator"`).
        generator: String,
    },
    /// The ordinary camera emitter, sampling one or more rays per pixel
    /// through `sampler`.
    Camera {
        /// The pixel sampler strategy to use.
        sampler: PixelSampler,
    },
}

/// Emits the ray-generation body fragment for `source`.
pub fn emit_raygen_body(source: &RayGenerationSource) -> String {
    match source {
        RayGenerationSource::ListOfRays { generator } => {
            format!("let emitter = {generator}(settings);\nlet id = emitter.generate(id, size, xmin, ymin, xmax, ymax);")
        }
        RayGenerationSource::Camera { sampler } => {
            format!(
                "let sampler = {};\nlet emitter = make_camera_ray_generator(settings.camera, sampler);\nlet id = emitter.generate(id, size, xmin, ymin, xmax, ymax);",
                sampler.constructor()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_of_rays_calls_the_named_generator() {
        let source = RayGenerationSource::ListOfRays { generator: "light_ray_generator".to_owned() };
        assert!(emit_raygen_body(&source).contains("light_ray_generator(settings)"));
    }

    #[test]
    fn camera_source_selects_the_configured_sampler() {
        let source = RayGenerationSource::Camera { sampler: PixelSampler::Halton };
        assert!(emit_raygen_body(&source).contains("make_halton_pixel_sampler()"));
    }

    #[test]
    fn multi_jittered_sampler_is_four_by_four() {
        assert_eq!(PixelSampler::MultiJittered4x4.constructor(), "make_multi_jittered_pixel_sampler(4, 4)");
    }
}
