//! The builder's input record: one per entity assigned to a given shape
//! provider (§4.2: "pack entity objects into `EntityObject` arrays (one per
//! provider)").

use ignis_base::bounding_box::BoundingBox;
use ignis_base::cgmath64::{Matrix4, Point3};

/// Visibility bit flags, exact layout from the entity blob (§4.3 supplement).
pub mod visibility {
    /// Entity is hit by camera rays.
    pub const CAMERA_VISIBLE: u32 = 0x1;
    /// Entity is hit by light-sampling rays.
    pub const LIGHT_VISIBLE: u32 = 0x2;
    /// Entity is hit by indirect bounce rays.
    pub const BOUNCE_VISIBLE: u32 = 0x4;
    /// Entity is hit by shadow rays.
    pub const SHADOW_VISIBLE: u32 = 0x8;
    /// All visibility bits set — the default for a freshly declared entity.
    pub const ALL: u32 = CAMERA_VISIBLE | LIGHT_VISIBLE | BOUNCE_VISIBLE | SHADOW_VISIBLE;
}

/// One entity, as seen by its shape provider's BVH builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityObject {
    /// World-space bounding box (already inflated, §3).
    pub bbox: BoundingBox<Point3>,
    /// World-to-local transform, so a hit entity leaf can move a ray into
    /// its shape's local space without a secondary lookup (§3).
    pub inv_transform: Matrix4,
    /// The entity's index in the `entities` fixed table.
    pub entity_id: u32,
    /// The shape this entity instances.
    pub shape_id: u32,
    /// Visibility bit flags, see [`visibility`].
    pub visibility_flags: u32,
    /// Three provider-specific scalars copied verbatim into the leaf (e.g.
    /// per-instance scale factor, material slot hints).
    pub user_scalars: [f32; 3],
}
