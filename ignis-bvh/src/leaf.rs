//! The flat, GPU-facing leaf record (§3: "leaf array of `EntityLeaf1`
//! records").

use bytemuck::{Pod, Zeroable};

/// One BVH leaf: enough data to compute a per-ray instance transform
/// without a secondary lookup into the entities table.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct EntityLeaf1 {
    /// Bounding box minimum, world space.
    pub bbox_min: [f32; 3],
    /// Bounding box maximum, world space.
    pub bbox_max: [f32; 3],
    /// World-to-local transform, row-major 3x4 (matches the entity table's
    /// own 3x4 matrix convention, §4.3 supplement).
    pub inv_transform: [f32; 12],
    /// Index into the `entities` fixed table.
    pub entity_id: u32,
    /// Index into the `shapes` dynamic table.
    pub shape_id: u32,
    /// Visibility bit flags, see [`crate::entity_object::visibility`].
    pub visibility_flags: u32,
    /// Three provider-specific scalars.
    pub user_scalars: [f32; 3],
}

impl EntityLeaf1 {
    /// Builds a leaf from an [`crate::entity_object::EntityObject`].
    pub fn from_entity_object(entity: &crate::entity_object::EntityObject) -> Self {
        let m = entity.inv_transform;
        let inv_transform = [
            m.x.x as f32, m.y.x as f32, m.z.x as f32, m.w.x as f32,
            m.x.y as f32, m.y.y as f32, m.z.y as f32, m.w.y as f32,
            m.x.z as f32, m.y.z as f32, m.z.z as f32, m.w.z as f32,
        ];
        let min = entity.bbox.min();
        let max = entity.bbox.max();
        Self {
            bbox_min: [min.x as f32, min.y as f32, min.z as f32],
            bbox_max: [max.x as f32, max.y as f32, max.z as f32],
            inv_transform,
            entity_id: entity.entity_id,
            shape_id: entity.shape_id,
            visibility_flags: entity.visibility_flags,
            user_scalars: entity.user_scalars,
        }
    }
}
