//! The stable device handle interface (§6.2): the C-like surface the
//! loader generates shader source against, never introspecting the
//! handles it gets back. `DeviceHandle` plays both the raw-device and
//! stateful-registry roles behind one trait, since this crate has no GPU
//! backend of its own to keep them separate.

use crate::error::DeviceError;
use crate::handle::{BufferHandle, BvhHandle, ImageHandle, RayTableHandle, ShaderHandle};
use crate::parameter::{ParameterScope, ParameterValue};

/// A rendering technique service shader (§6.2 "service shaders").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceShader {
    /// Tone-maps the accumulated framebuffer to display-referred color.
    Tonemap,
    /// Applies a glare/bloom post-process.
    Glare,
    /// Produces the `--info` diagnostic image dump.
    ImageInfo,
}

/// The stable device handle interface consumed by the loader (§6.2).
///
/// The loader treats every implementor as an opaque handle: it only ever
/// generates source strings that call into it, and passes back handles
/// this trait itself issued. Implementors back this with whatever they
/// like — a real device back-end, or (for tests) an in-process double
/// like [`crate::NullDevice`].
pub trait DeviceHandle {
    /// Allocates a named buffer of `byte_len` bytes.
    fn allocate_buffer(&self, name: &str, byte_len: usize) -> Result<BufferHandle, DeviceError>;

    /// Looks up a previously-allocated buffer by name.
    fn lookup_buffer(&self, name: &str) -> Result<BufferHandle, DeviceError>;

    /// Loads an image, hinting the number of channels the loader expects
    /// to sample (1 for scalar textures, 3/4 for color).
    fn load_image(&self, name: &str, channel_hint: usize) -> Result<ImageHandle, DeviceError>;

    /// Loads a scene BVH previously registered under a shape-provider
    /// tag (§4.2 supplement: `"trimesh"`, `"sphere"`).
    fn load_bvh(&self, provider_tag: &str) -> Result<BvhHandle, DeviceError>;

    /// The device's active ray table, when running in tracer mode.
    fn ray_table(&self) -> Result<RayTableHandle, DeviceError>;

    /// Looks up an AOV image by name.
    fn aov_image(&self, name: &str) -> Result<ImageHandle, DeviceError>;

    /// Writes accumulated pixel data into the framebuffer.
    fn update_framebuffer(&self, pixels: &[f32]) -> Result<(), DeviceError>;

    /// Binds a typed parameter into the local or global registry.
    fn set_parameter(&self, scope: ParameterScope, name: &str, value: ParameterValue) -> Result<(), DeviceError>;

    /// Compiles the given DSL source to an opaque shader handle,
    /// delegating to the external shader compiler's `prepare`/`compile`
    /// pair (§6.3).
    fn compile_shader(&self, source: &str, entry_name: &str) -> Result<ShaderHandle, DeviceError>;

    /// Launches a compiled miss shader.
    fn handle_miss_shader(&self, shader: ShaderHandle) -> Result<(), DeviceError>;

    /// Launches a compiled hit shader.
    fn handle_hit_shader(&self, shader: ShaderHandle) -> Result<(), DeviceError>;

    /// Launches a compiled advanced-shadow shader.
    fn handle_advanced_shadow_shader(&self, shader: ShaderHandle) -> Result<(), DeviceError>;

    /// Launches a compiled primary-ray traversal shader.
    fn handle_traversal_primary_shader(&self, shader: ShaderHandle) -> Result<(), DeviceError>;

    /// Launches a compiled secondary-ray traversal shader.
    fn handle_traversal_secondary_shader(&self, shader: ShaderHandle) -> Result<(), DeviceError>;

    /// Generates the current iteration's primary ray batch.
    fn generate_rays(&self) -> Result<(), DeviceError>;

    /// Launches a service shader.
    fn launch_service_shader(&self, service: ServiceShader) -> Result<(), DeviceError>;
}
