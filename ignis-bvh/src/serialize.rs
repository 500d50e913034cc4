//! Flattening a built [`crate::build::Bvh`] into the byte layout the device
//! traversal shaders read directly (§4.6, §5: scene database dynamic
//! tables).
//!
//! Each node is `width` fixed-size slots: `bbox_min`, `bbox_max`,
//! `child_offset` (index into the node array or the leaf array) and a
//! `is_leaf` flag. Unused slots in a node with fewer than `width` children
//! are padded with an empty (inverted) bbox and `child_offset = u32::MAX`,
//! which traversal treats as "never hit".

use crate::build::{Bvh, ChildRef};
use ignis_serialize::Serializer;

const EMPTY_SLOT: u32 = u32::MAX;

/// Serializes the node array (`width` slots per node) into `serializer`.
/// Leaves themselves are written separately via [`write_leaves`].
pub fn write_nodes(serializer: &mut Serializer, bvh: &Bvh) {
    serializer.write(bvh.node_count() as u32);
    serializer.write(bvh.width as u32);

    let flat = flatten_rows(bvh);
    for row in &flat {
        for slot in row {
            serializer.write_slice(&slot.bbox_min, false);
            serializer.write_slice(&slot.bbox_max, false);
            serializer.write(slot.child_offset);
            serializer.write(slot.is_leaf);
        }
    }
}

/// Serializes the leaf array, 16-byte aligned as every scene database table
/// entry must be (§3).
pub fn write_leaves(serializer: &mut Serializer, bvh: &Bvh) {
    serializer.write(bvh.leaves.len() as u32);
    serializer.write_aligned(&bvh.leaves, ignis_serialize::DEFAULT_ALIGNMENT, false);
}

struct Slot {
    bbox_min: [f32; 3],
    bbox_max: [f32; 3],
    child_offset: u32,
    is_leaf: u32,
}

fn empty_slot() -> Slot {
    Slot { bbox_min: [f32::INFINITY; 3], bbox_max: [f32::NEG_INFINITY; 3], child_offset: EMPTY_SLOT, is_leaf: 0 }
}

/// Walks the tree breadth-first and produces one row of `width` slots per
/// internal node, in the same order `Bvh`'s internal node vector was built
/// (node indices in a [`ChildRef::Internal`] are stable array offsets, so
/// this reproduces that order without needing direct field access).
fn flatten_rows(bvh: &Bvh) -> Vec<Vec<Slot>> {
    let mut rows: Vec<Vec<Slot>> = Vec::new();
    let mut queue: std::collections::VecDeque<(u32, Vec<(ignis_base::bounding_box::BoundingBox<ignis_base::cgmath64::Point3>, ChildRef)>)> =
        std::collections::VecDeque::new();

    if let Some(ChildRef::Internal(root_idx)) = bvh.root {
        queue.push_back((root_idx, bvh.children_of(root_idx).to_vec()));
    }

    while let Some((idx, children)) = queue.pop_front() {
        if rows.len() <= idx as usize {
            rows.resize_with(idx as usize + 1, Vec::new);
        }
        let mut row = Vec::with_capacity(bvh.width);
        for (bbox, child) in &children {
            let min = bbox.min();
            let max = bbox.max();
            let (child_offset, is_leaf) = match child {
                ChildRef::Leaf(i) => (*i, 1),
                ChildRef::Internal(i) => {
                    queue.push_back((*i, bvh.children_of(*i).to_vec()));
                    (*i, 0)
                }
            };
            row.push(Slot {
                bbox_min: [min.x as f32, min.y as f32, min.z as f32],
                bbox_max: [max.x as f32, max.y as f32, max.z as f32],
                child_offset,
                is_leaf,
            });
        }
        while row.len() < bvh.width {
            row.push(empty_slot());
        }
        rows[idx as usize] = row;
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BvhBuilder;
    use crate::entity_object::{visibility, EntityObject};
    use ignis_base::bounding_box::BoundingBox;
    use ignis_base::cgmath64::{Matrix4, Point3, SquareMatrix};

    fn entity_at(x: f64, id: u32) -> EntityObject {
        let bbox: BoundingBox<Point3> = [Point3::new(x, 0.0, 0.0), Point3::new(x + 1.0, 1.0, 1.0)].into_iter().collect();
        EntityObject { bbox, inv_transform: Matrix4::identity(), entity_id: id, shape_id: 0, visibility_flags: visibility::ALL, user_scalars: [0.0; 3] }
    }

    #[test]
    fn node_rows_are_width_wide() {
        let entities: Vec<_> = (0..10).map(|i| entity_at(i as f64, i)).collect();
        let bvh = BvhBuilder::new(4).build(&entities);
        let rows = flatten_rows(&bvh);
        for row in &rows {
            assert_eq!(row.len(), 4);
        }
    }

    #[test]
    fn serialized_buffer_is_16_byte_aligned() {
        let entities: Vec<_> = (0..5).map(|i| entity_at(i as f64, i)).collect();
        let bvh = BvhBuilder::new(2).build(&entities);
        let mut bytes = Vec::new();
        let mut serializer = Serializer::writer(&mut bytes);
        write_leaves(&mut serializer, &bvh);
        assert_eq!(bytes.len() % 16, 0);
    }
}
