//! An in-process [`DeviceHandle`] double that records every call instead
//! of touching real hardware, for exercising the loader and runtime
//! without a GPU.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use rustc_hash::FxHashMap;

use crate::device::{DeviceHandle, ServiceShader};
use crate::error::DeviceError;
use crate::handle::{BufferHandle, BvhHandle, ImageHandle, RayTableHandle, ShaderHandle};
use crate::parameter::{ParameterScope, ParameterValue};

/// A `DeviceHandle` that always succeeds, handing out dense incrementing
/// handles and recording every call it received (in order) for
/// assertions in loader tests.
#[derive(Debug, Default)]
pub struct NullDevice {
    next_id: AtomicU32,
    buffers: Mutex<FxHashMap<String, BufferHandle>>,
    calls: Mutex<Vec<String>>,
}

impl NullDevice {
    /// A fresh double with nothing registered.
    pub fn new() -> Self { Self::default() }

    /// The calls recorded so far, in order.
    pub fn calls(&self) -> Vec<String> { self.calls.lock().unwrap().clone() }

    fn record(&self, call: impl Into<String>) { self.calls.lock().unwrap().push(call.into()); }

    fn next_handle<H>(&self, wrap: impl Fn(u32) -> H) -> H {
        wrap(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl DeviceHandle for NullDevice {
    fn allocate_buffer(&self, name: &str, byte_len: usize) -> Result<BufferHandle, DeviceError> {
        self.record(format!("allocate_buffer({name}, {byte_len})"));
        let handle = self.next_handle(BufferHandle::from_raw);
        self.buffers.lock().unwrap().insert(name.to_owned(), handle);
        Ok(handle)
    }

    fn lookup_buffer(&self, name: &str) -> Result<BufferHandle, DeviceError> {
        self.record(format!("lookup_buffer({name})"));
        self.buffers.lock().unwrap().get(name).copied().ok_or_else(|| DeviceError::UnknownBuffer(name.to_owned()))
    }

    fn load_image(&self, name: &str, channel_hint: usize) -> Result<ImageHandle, DeviceError> {
        self.record(format!("load_image({name}, {channel_hint})"));
        Ok(self.next_handle(ImageHandle::from_raw))
    }

    fn load_bvh(&self, provider_tag: &str) -> Result<BvhHandle, DeviceError> {
        self.record(format!("load_bvh({provider_tag})"));
        Ok(self.next_handle(BvhHandle::from_raw))
    }

    fn ray_table(&self) -> Result<RayTableHandle, DeviceError> {
        self.record("ray_table()");
        Ok(self.next_handle(RayTableHandle::from_raw))
    }

    fn aov_image(&self, name: &str) -> Result<ImageHandle, DeviceError> {
        self.record(format!("aov_image({name})"));
        Ok(self.next_handle(ImageHandle::from_raw))
    }

    fn update_framebuffer(&self, pixels: &[f32]) -> Result<(), DeviceError> {
        self.record(format!("update_framebuffer(len={})", pixels.len()));
        Ok(())
    }

    fn set_parameter(&self, scope: ParameterScope, name: &str, _value: ParameterValue) -> Result<(), DeviceError> {
        self.record(format!("set_parameter({scope:?}, {name})"));
        Ok(())
    }

    fn compile_shader(&self, _source: &str, entry_name: &str) -> Result<ShaderHandle, DeviceError> {
        self.record(format!("compile_shader({entry_name})"));
        Ok(self.next_handle(ShaderHandle::from_raw))
    }

    fn handle_miss_shader(&self, shader: ShaderHandle) -> Result<(), DeviceError> {
        self.record(format!("handle_miss_shader({shader:?})"));
        Ok(())
    }

    fn handle_hit_shader(&self, shader: ShaderHandle) -> Result<(), DeviceError> {
        self.record(format!("handle_hit_shader({shader:?})"));
        Ok(())
    }

    fn handle_advanced_shadow_shader(&self, shader: ShaderHandle) -> Result<(), DeviceError> {
        self.record(format!("handle_advanced_shadow_shader({shader:?})"));
        Ok(())
    }

    fn handle_traversal_primary_shader(&self, shader: ShaderHandle) -> Result<(), DeviceError> {
        self.record(format!("handle_traversal_primary_shader({shader:?})"));
        Ok(())
    }

    fn handle_traversal_secondary_shader(&self, shader: ShaderHandle) -> Result<(), DeviceError> {
        self.record(format!("handle_traversal_secondary_shader({shader:?})"));
        Ok(())
    }

    fn generate_rays(&self) -> Result<(), DeviceError> {
        self.record("generate_rays()");
        Ok(())
    }

    fn launch_service_shader(&self, service: ServiceShader) -> Result<(), DeviceError> {
        self.record(format!("launch_service_shader({service:?})"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_then_lookup_returns_the_same_handle() {
        let device = NullDevice::new();
        let allocated = device.allocate_buffer("entities", 256).unwrap();
        let looked_up = device.lookup_buffer("entities").unwrap();
        assert_eq!(allocated, looked_up);
    }

    #[test]
    fn lookup_of_unregistered_buffer_is_an_error() {
        let device = NullDevice::new();
        assert!(device.lookup_buffer("nope").is_err());
    }

    #[test]
    fn calls_are_recorded_in_order() {
        let device = NullDevice::new();
        device.ray_table().unwrap();
        device.generate_rays().unwrap();
        assert_eq!(device.calls(), vec!["ray_table()".to_owned(), "generate_rays()".to_owned()]);
    }

    #[test]
    fn handles_are_dense_and_increasing() {
        let device = NullDevice::new();
        let a = device.load_image("a", 3).unwrap();
        let b = device.load_image("b", 3).unwrap();
        assert!(b.raw() > a.raw());
    }
}
