//! Device target selection (§4.8 step 2): `let device = make_<target>_device(…);`.

/// A compile target for generated shader source, mirroring the upstream
/// `Target.isCPU()/gpuVendor()/vectorWidth()` query surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Vectorized CPU execution at the given SIMD width (4 or 8).
    Cpu {
        /// SIMD vector width in lanes.
        vector_width: u32,
    },
    /// An NVIDIA GPU back-end.
    NvidiaGpu,
    /// An AMD GPU back-end.
    AmdGpu,
}

impl Target {
    /// Whether this target runs on the host CPU rather than a GPU.
    pub fn is_cpu(self) -> bool { matches!(self, Target::Cpu { .. }) }

    /// The DSL call that constructs this target's device, e.g.
    /// `make_cpu_default_device()` or `make_nvidia_device()`.
    pub fn device_constructor(self) -> String {
        match self {
            Target::Cpu { vector_width: 8 } => "make_cpu_avx_device()".to_owned(),
            Target::Cpu { vector_width: 4 } => "make_cpu_default_device()".to_owned(),
            Target::Cpu { vector_width } => format!("make_cpu_vectorized_device({vector_width})"),
            Target::NvidiaGpu => "make_nvidia_device()".to_owned(),
            Target::AmdGpu => "make_amd_device()".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_width_eight_selects_the_avx_device() {
        assert_eq!(Target::Cpu { vector_width: 8 }.device_constructor(), "make_cpu_avx_device()");
    }

    #[test]
    fn gpu_targets_are_not_cpu() {
        assert!(!Target::NvidiaGpu.is_cpu());
        assert!(!Target::AmdGpu.is_cpu());
    }

    #[test]
    fn nvidia_constructor() {
        assert_eq!(Target::NvidiaGpu.device_constructor(), "make_nvidia_device()");
    }
}
