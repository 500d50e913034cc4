//! Opaque handles the device hands back to the loader. The loader never
//! introspects these — it only ever passes them back into the same
//! [`crate::DeviceHandle`] that issued them (§6.3 "Handles are opaque;
//! the loader does not introspect them").

/// Macro-free boilerplate for a `Copy` newtype opaque handle wrapping a
/// dense `u32` id: a small `Copy + Hash + Eq` token identifying a
/// registered resource.
macro_rules! opaque_handle {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a raw id. Only a [`crate::DeviceHandle`] implementation
            /// should construct these — constructible here so test doubles
            /// outside this crate's fixed set can hand out handles too.
            pub fn from_raw(id: u32) -> Self { Self(id) }

            /// The wrapped raw id.
            pub fn raw(self) -> u32 { self.0 }
        }
    };
}

opaque_handle!(BufferHandle, "A registered device buffer.");
opaque_handle!(ImageHandle, "A loaded image or AOV image.");
opaque_handle!(BvhHandle, "A BVH loaded under a provider tag.");
opaque_handle!(RayTableHandle, "The device's active ray table, in tracer mode.");
opaque_handle!(ShaderHandle, "A compiled shader, returned by the shader compiler.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_compare_by_their_raw_id() {
        assert_eq!(BufferHandle::from_raw(3), BufferHandle::from_raw(3));
        assert_ne!(BufferHandle::from_raw(3), BufferHandle::from_raw(4));
    }
}
