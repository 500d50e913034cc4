//! Render options (§6.5 supplement): the in-process equivalent of the
//! out-of-scope command surface. `spec.md` §6.5 marks command-line parsing
//! itself out of scope and normative only in the parameter semantics it
//! hands to the loader — this struct is exactly those semantics as plain
//! data, populated by whatever external front-end owns argument parsing.
//! No `clap` dependency is pulled in here (§2 ambient-stack note).

use ignis_render::Target;

/// The target platform tag read from the command surface
/// (`generic|sse42|avx|avx2|avx512|asimd|nvvm|amdgpu`, §6.5), resolved to
/// an [`ignis_render::Target`] by [`RenderOptions::target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Scalar / unspecialized CPU fallback (width 4).
    Generic,
    /// SSE4.2 (width 4).
    Sse42,
    /// AVX (width 8).
    Avx,
    /// AVX2 (width 8).
    Avx2,
    /// AVX-512 (width 8).
    Avx512,
    /// ARM NEON/ASIMD (width 4).
    Asimd,
    /// NVIDIA GPU back-end.
    NvidiaGpu,
    /// AMD GPU back-end.
    AmdGpu,
}

impl Platform {
    /// Resolves this platform tag to the [`Target`] generated shader
    /// source is composed against (§4.8 step 2).
    pub fn target(self) -> Target {
        match self {
            Platform::Generic | Platform::Sse42 | Platform::Asimd => Target::Cpu { vector_width: 4 },
            Platform::Avx | Platform::Avx2 | Platform::Avx512 => Target::Cpu { vector_width: 8 },
            Platform::NvidiaGpu => Target::NvidiaGpu,
            Platform::AmdGpu => Target::AmdGpu,
        }
    }
}

/// Denoiser auxiliary-pass toggles (§4.7 "denoiser auxiliary pass",
/// §6.5 "denoiser toggles").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DenoiserOptions {
    /// Whether the info-buffer auxiliary variant is appended at all.
    pub enabled: bool,
    /// Whether the denoiser follows specular paths (passed through to the
    /// device-side denoising kernel; this crate only threads the flag).
    pub follow_specular: bool,
    /// Whether the info-buffer variant runs only on the first iteration,
    /// or every iteration (§9 design note, `enable_ib`'s second argument).
    pub only_first_iteration: bool,
}

/// Film (framebuffer) dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilmSize {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

/// Everything the loader/runtime reads from the external command surface
/// (§6.5): target platform, device index, samples-per-iteration, override
/// camera/technique type, explicit film size, and denoiser toggles.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// The compile/execution target platform.
    pub platform: Platform,
    /// Which device instance to use when more than one is available.
    pub device_index: usize,
    /// The number of samples requested per pixel, overall.
    pub desired_spp: usize,
    /// Explicit output film size; falls back to the scene's own film
    /// declaration when `None`.
    pub film_size: Option<FilmSize>,
    /// Overrides the scene's declared camera plugin-type, if set.
    pub override_camera_type: Option<String>,
    /// Overrides the scene's declared technique plugin-type, if set.
    pub override_technique_type: Option<String>,
    /// Denoiser auxiliary-pass configuration.
    pub denoiser: DenoiserOptions,
}

impl RenderOptions {
    /// The [`Target`] generated shader source is composed against.
    pub fn target(&self) -> Target { self.platform.target() }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            platform: Platform::Generic,
            device_index: 0,
            desired_spp: 1,
            film_size: None,
            override_camera_type: None,
            override_technique_type: None,
            denoiser: DenoiserOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avx_platform_resolves_to_width_eight_cpu_target() {
        assert_eq!(Platform::Avx.target(), Target::Cpu { vector_width: 8 });
    }

    #[test]
    fn gpu_platforms_resolve_directly() {
        assert_eq!(Platform::NvidiaGpu.target(), Target::NvidiaGpu);
        assert_eq!(Platform::AmdGpu.target(), Target::AmdGpu);
    }

    #[test]
    fn default_options_request_one_sample_with_no_overrides() {
        let options = RenderOptions::default();
        assert_eq!(options.desired_spp, 1);
        assert!(options.override_camera_type.is_none());
        assert!(!options.denoiser.enabled);
    }
}
