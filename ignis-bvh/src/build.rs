//! Top-down SAH-flavored N-wide BVH builder (§4.6).
//!
//! Splitting is a deterministic median partition rather than a full SAH
//! cost search: entities are sorted along the axis of greatest centroid
//! extent, ties broken by the next two axes and finally by original index,
//! then divided into up to `width` equal-size contiguous groups. This keeps
//! child order reproducible ("deterministic; median-split with stable
//! tie-break on lower axis index", §4.6) without needing a full SAH cost
//! evaluation pass.

use crate::entity_object::EntityObject;
use crate::leaf::EntityLeaf1;
use ignis_base::bounding_box::BoundingBox;
use ignis_base::cgmath64::Point3;

/// A reference to either an internal node or a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRef {
    /// Index into [`Bvh::leaves`].
    Leaf(u32),
    /// Index into [`Bvh::nodes`].
    Internal(u32),
}

#[derive(Debug, Clone)]
struct BuiltNode {
    children: Vec<(BoundingBox<Point3>, ChildRef)>,
}

/// The built tree: a flat node array plus a flat leaf array, both indexed
/// by the `ChildRef`s stored in sibling nodes' parents.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BuiltNode>,
    /// The leaf records, one per entity.
    pub leaves: Vec<EntityLeaf1>,
    /// Branching factor this tree was built with.
    pub width: usize,
    /// Reference to the tree root; `None` for an empty scene.
    pub root: Option<ChildRef>,
}

impl Bvh {
    /// Number of internal nodes.
    pub fn node_count(&self) -> usize { self.nodes.len() }

    fn node(&self, i: u32) -> &[(BoundingBox<Point3>, ChildRef)] { &self.nodes[i as usize].children }

    /// The children of internal node `i`, as stored during the build.
    /// Exposed read-only so the serializer can flatten nodes without this
    /// module needing to know the wire layout.
    pub fn children_of(&self, i: u32) -> &[(BoundingBox<Point3>, ChildRef)] { self.node(i) }

    /// Checks the structural invariants of §4.6 and §8 property 7: every
    /// leaf's bbox matches its entity, and every internal node's bbox
    /// encloses the union of its children's bboxes.
    pub fn check_invariants(&self) -> bool {
        fn visit(bvh: &Bvh, r: ChildRef, parent_bbox: &BoundingBox<Point3>) -> bool {
            match r {
                ChildRef::Leaf(i) => {
                    let leaf = &bvh.leaves[i as usize];
                    let min = Point3::new(leaf.bbox_min[0] as f64, leaf.bbox_min[1] as f64, leaf.bbox_min[2] as f64);
                    let max = Point3::new(leaf.bbox_max[0] as f64, leaf.bbox_max[1] as f64, leaf.bbox_max[2] as f64);
                    parent_bbox.min().x <= min.x + 1e-4
                        && parent_bbox.min().y <= min.y + 1e-4
                        && parent_bbox.min().z <= min.z + 1e-4
                        && parent_bbox.max().x >= max.x - 1e-4
                        && parent_bbox.max().y >= max.y - 1e-4
                        && parent_bbox.max().z >= max.z - 1e-4
                }
                ChildRef::Internal(i) => bvh.node(i).iter().all(|(bbox, child)| visit(bvh, *child, bbox)),
            }
        }
        match self.root {
            None => true,
            Some(r) => {
                let bbox: BoundingBox<Point3> = match r {
                    ChildRef::Leaf(i) => {
                        let leaf = &self.leaves[i as usize];
                        let min = Point3::new(leaf.bbox_min[0] as f64, leaf.bbox_min[1] as f64, leaf.bbox_min[2] as f64);
                        let max = Point3::new(leaf.bbox_max[0] as f64, leaf.bbox_max[1] as f64, leaf.bbox_max[2] as f64);
                        [min, max].into_iter().collect()
                    }
                    ChildRef::Internal(i) => self.node(i).iter().fold(BoundingBox::new(), |mut acc, (b, _)| {
                        acc += b;
                        acc
                    }),
                };
                visit(self, r, &bbox)
            }
        }
    }
}

/// Builds an N-wide scene BVH (N ∈ {2, 4, 8}) over one shape provider's
/// entities.
pub struct BvhBuilder {
    width: usize,
}

impl BvhBuilder {
    /// Creates a builder with the given branching factor.
    ///
    /// # Panics
    /// Panics if `width` is not 2, 4, or 8 (§3: "Branching factor N ∈ {2
    /// (GPU), 4 (CPU width < 8), 8 (CPU width ≥ 8)}").
    pub fn new(width: usize) -> Self {
        assert!(matches!(width, 2 | 4 | 8), "BVH branching factor must be 2, 4, or 8");
        Self { width }
    }

    /// Builds the tree. Every entity appears in exactly one leaf (§4.6).
    pub fn build(&self, entities: &[EntityObject]) -> Bvh {
        let mut nodes = Vec::new();
        let mut leaves = Vec::with_capacity(entities.len());
        if entities.is_empty() {
            return Bvh { nodes, leaves, width: self.width, root: None };
        }
        let indices: Vec<usize> = (0..entities.len()).collect();
        let (_, root) = self.build_recursive(entities, indices, &mut nodes, &mut leaves);
        Bvh { nodes, leaves, width: self.width, root: Some(root) }
    }

    fn build_recursive(
        &self,
        entities: &[EntityObject],
        indices: Vec<usize>,
        nodes: &mut Vec<BuiltNode>,
        leaves: &mut Vec<EntityLeaf1>,
    ) -> (BoundingBox<Point3>, ChildRef) {
        if indices.len() == 1 {
            let entity = &entities[indices[0]];
            let leaf_idx = leaves.len() as u32;
            leaves.push(EntityLeaf1::from_entity_object(entity));
            return (entity.bbox.clone(), ChildRef::Leaf(leaf_idx));
        }

        let mut centroid_bbox: BoundingBox<Point3> = BoundingBox::new();
        for &i in &indices {
            centroid_bbox.push(&entities[i].bbox.center());
        }
        let extent = centroid_bbox.diagonal();
        let axis = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };

        let mut sorted = indices;
        sorted.sort_by(|&a, &b| centroid_key(entities, a, axis).partial_cmp(&centroid_key(entities, b, axis)).unwrap().then(a.cmp(&b)));

        let groups = split_into_groups(&sorted, self.width);
        let mut children = Vec::with_capacity(groups.len());
        for group in groups {
            if group.is_empty() {
                continue;
            }
            let (bbox, child_ref) = self.build_recursive(entities, group, nodes, leaves);
            children.push((bbox, child_ref));
        }

        let mut node_bbox = BoundingBox::new();
        for (bbox, _) in &children {
            node_bbox += bbox;
        }
        let node_idx = nodes.len() as u32;
        nodes.push(BuiltNode { children });
        (node_bbox, ChildRef::Internal(node_idx))
    }
}

/// Builds one BVH per shape provider concurrently on the rayon pool (§3:
/// "one tree per shape provider"). Node indices within each tree stay
/// deterministic since each provider's build runs single-threaded; only the
/// across-provider work is parallelized.
pub fn build_many(width: usize, providers: &[Vec<EntityObject>]) -> Vec<Bvh> {
    use rayon::prelude::*;
    let builder = BvhBuilder::new(width);
    providers.par_iter().map(|entities| builder.build(entities)).collect()
}

fn centroid_key(entities: &[EntityObject], i: usize, axis: usize) -> (f64, f64, f64) {
    let c = entities[i].bbox.center();
    match axis {
        0 => (c.x, c.y, c.z),
        1 => (c.y, c.z, c.x),
        _ => (c.z, c.x, c.y),
    }
}

fn split_into_groups(indices: &[usize], width: usize) -> Vec<Vec<usize>> {
    let n = indices.len();
    let chunk = n.div_ceil(width);
    indices.chunks(chunk.max(1)).map(|c| c.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity_object::visibility;
    use ignis_base::cgmath64::{Matrix4, SquareMatrix};

    fn entity_at(x: f64, id: u32) -> EntityObject {
        let bbox: BoundingBox<Point3> = [Point3::new(x, 0.0, 0.0), Point3::new(x + 1.0, 1.0, 1.0)].into_iter().collect();
        EntityObject {
            bbox,
            inv_transform: Matrix4::identity(),
            entity_id: id,
            shape_id: 0,
            visibility_flags: visibility::ALL,
            user_scalars: [0.0; 3],
        }
    }

    #[test]
    fn every_entity_lands_in_exactly_one_leaf() {
        let entities: Vec<_> = (0..9).map(|i| entity_at(i as f64 * 2.0, i)).collect();
        let bvh = BvhBuilder::new(4).build(&entities);
        assert_eq!(bvh.leaves.len(), 9);
    }

    #[test]
    fn single_entity_is_its_own_root_leaf() {
        let entities = vec![entity_at(0.0, 0)];
        let bvh = BvhBuilder::new(2).build(&entities);
        assert!(matches!(bvh.root, Some(ChildRef::Leaf(0))));
    }

    #[test]
    fn nodes_enclose_their_children() {
        let entities: Vec<_> = (0..17).map(|i| entity_at(i as f64 * 3.0, i)).collect();
        let bvh = BvhBuilder::new(8).build(&entities);
        assert!(bvh.check_invariants());
    }

    #[test]
    fn build_many_builds_one_tree_per_provider() {
        let providers: Vec<Vec<EntityObject>> = vec![
            (0..4).map(|i| entity_at(i as f64, i)).collect(),
            (0..6).map(|i| entity_at(i as f64 * 2.0, i)).collect(),
        ];
        let trees = build_many(4, &providers);
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].leaves.len(), 4);
        assert_eq!(trees[1].leaves.len(), 6);
    }

    #[test]
    #[should_panic]
    fn rejects_non_power_branching_factor() {
        BvhBuilder::new(3);
    }
}
