//! Light hierarchy: a binary tree over finite lights' flux and position,
//! serialized as a flat node array (GLOSSARY: "Light hierarchy: binary tree
//! serialization (flat node array)").
//!
//! Construction mirrors [`crate::cdf`]'s top-down-by-extent pattern rather
//! than a full bounding-cone hierarchy build: lights are recursively split
//! on the position axis of greatest spread, weighted leaves carry flux, and
//! internal nodes carry the flux sum of their subtree — enough for
//! importance-sampling descent without needing the full light-hierarchy
//! cone-bound machinery this crate's scope leaves out.

use ignis_base::cgmath64::Point3;

/// One node in the flattened hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HierarchyNode {
    /// Centroid of this node's subtree, flux-weighted.
    pub centroid: Point3,
    /// Total flux under this node.
    pub flux: f32,
    /// `None` for a leaf; otherwise the index of the left child (the right
    /// child always immediately follows it in the flat array).
    pub left: Option<u32>,
    /// Index into the caller's light array, valid only for leaves.
    pub light_index: Option<u32>,
}

/// The flattened light hierarchy.
#[derive(Debug, Clone, Default)]
pub struct LightHierarchy {
    /// Flat node array; index 0 is the root (empty if no lights).
    pub nodes: Vec<HierarchyNode>,
}

/// Builds a light hierarchy over `positions`/`flux`, both indexed the same
/// way as the caller's finite-light array.
pub fn build(positions: &[Point3], flux: &[f32]) -> LightHierarchy {
    assert_eq!(positions.len(), flux.len());
    let mut nodes = Vec::new();
    if positions.is_empty() {
        return LightHierarchy { nodes };
    }
    let indices: Vec<usize> = (0..positions.len()).collect();
    build_recursive(positions, flux, indices, &mut nodes);
    LightHierarchy { nodes }
}

fn build_recursive(positions: &[Point3], flux: &[f32], indices: Vec<usize>, nodes: &mut Vec<HierarchyNode>) -> u32 {
    if indices.len() == 1 {
        let i = indices[0];
        let idx = nodes.len() as u32;
        nodes.push(HierarchyNode { centroid: positions[i], flux: flux[i], left: None, light_index: Some(i as u32) });
        return idx;
    }

    let mut min = positions[indices[0]];
    let mut max = positions[indices[0]];
    for &i in &indices {
        let p = positions[i];
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }
    let extent = (max.x - min.x, max.y - min.y, max.z - min.z);
    let axis = if extent.0 >= extent.1 && extent.0 >= extent.2 {
        0
    } else if extent.1 >= extent.2 {
        1
    } else {
        2
    };

    let mut sorted = indices;
    sorted.sort_by(|&a, &b| {
        let ka = axis_value(positions[a], axis);
        let kb = axis_value(positions[b], axis);
        ka.partial_cmp(&kb).unwrap().then(a.cmp(&b))
    });
    let mid = sorted.len() / 2;
    let (left_idx, right_idx) = sorted.split_at(mid);

    // reserve this node's slot before recursing so children get higher indices
    let node_slot = nodes.len();
    nodes.push(HierarchyNode { centroid: Point3::new(0.0, 0.0, 0.0), flux: 0.0, left: Some(0), light_index: None });

    let left = build_recursive(positions, flux, left_idx.to_vec(), nodes);
    let right = build_recursive(positions, flux, right_idx.to_vec(), nodes);

    let total_flux = nodes[left as usize].flux + nodes[right as usize].flux;
    let lc = nodes[left as usize].centroid;
    let rc = nodes[right as usize].centroid;
    let lw = nodes[left as usize].flux.max(1e-12);
    let rw = nodes[right as usize].flux.max(1e-12);
    let w = lw + rw;
    let centroid = Point3::new(
        (lc.x * lw as f64 + rc.x * rw as f64) / w as f64,
        (lc.y * lw as f64 + rc.y * rw as f64) / w as f64,
        (lc.z * lw as f64 + rc.z * rw as f64) / w as f64,
    );

    nodes[node_slot] = HierarchyNode { centroid, flux: total_flux, left: Some(left), light_index: None };
    node_slot as u32
}

fn axis_value(p: Point3, axis: usize) -> f64 {
    match axis {
        0 => p.x,
        1 => p.y,
        _ => p.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_builds_empty_hierarchy() {
        let h = build(&[], &[]);
        assert!(h.nodes.is_empty());
    }

    #[test]
    fn single_light_is_a_leaf_root() {
        let h = build(&[Point3::new(0.0, 0.0, 0.0)], &[1.0]);
        assert_eq!(h.nodes.len(), 1);
        assert_eq!(h.nodes[0].light_index, Some(0));
    }

    #[test]
    fn root_flux_sums_all_leaves() {
        let positions = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)];
        let flux = [1.0, 2.0, 3.0];
        let h = build(&positions, &flux);
        assert!((h.nodes[0].flux - 6.0).abs() < 1e-6);
    }
}
