//! Triangle mesh storage and the per-mesh processing pipeline of §4.2 step 2:
//! normal flip, vertex-normal recompute, transform application, degeneracy
//! and plane detection.

use ignis_base::bounding_box::BoundingBox;
use ignis_base::cgmath64::{InnerSpace, Point3, Vector3};
use ignis_base::transform::Transform;
use ignis_base::MIN_BBOX_INFLATE;

/// One triangle, as indices into a [`TriMesh`]'s parallel position/normal/
/// texcoord arrays, plus a material slot — "4-wide per face including
/// material slot" (§4.2 item 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Vertex position indices, one per corner.
    pub positions: [u32; 3],
    /// Vertex normal indices, one per corner.
    pub normals: [u32; 3],
    /// Vertex texcoord indices, one per corner.
    pub texcoords: [u32; 3],
    /// Material slot this face is assigned to within its entity.
    pub material_slot: u32,
}

/// A loaded, ready-to-serialize triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    /// Vertex positions.
    pub positions: Vec<Point3>,
    /// Per-vertex normals (recomputed from face normals unless supplied).
    pub normals: Vec<Vector3>,
    /// Per-vertex texture coordinates.
    pub texcoords: Vec<[f32; 2]>,
    /// Triangular faces.
    pub faces: Vec<Face>,
}

impl TriMesh {
    /// The mesh's bounding box, inflated by the minimum volume (§3: "any
    /// shape referenced by an entity has a fully populated bounding box
    /// with non-zero volume (inflated by 10⁻⁵ minimum)").
    pub fn bounding_box(&self) -> BoundingBox<Point3> {
        let mut bbox: BoundingBox<Point3> = self.positions.iter().collect();
        inflate(&mut bbox);
        bbox
    }

    /// Per-face normal, computed from the triangle's winding.
    pub fn face_normal(&self, face: &Face) -> Vector3 {
        let [a, b, c] = face.positions;
        let p0 = self.positions[a as usize];
        let p1 = self.positions[b as usize];
        let p2 = self.positions[c as usize];
        (p1 - p0).cross(p2 - p0)
    }

    /// Per-face inverse area — `1/area`, used by area lights/samplers; a
    /// degenerate (zero-area) face yields `0.0` rather than `inf` so
    /// downstream accumulation stays finite.
    pub fn face_inv_area(&self, face: &Face) -> f32 {
        let n = self.face_normal(face);
        let area = n.dot(n).sqrt() * 0.5;
        if area > 0.0 { (1.0 / area) as f32 } else { 0.0 }
    }

    /// Recomputes per-vertex normals as the area-weighted average of
    /// adjacent face normals (§4.2 item 2: "recompute face-normals-as-
    /// vertex-normals"). Vertices with no incident face keep a zero normal.
    pub fn recompute_vertex_normals(&mut self) {
        let mut acc = vec![Vector3::new(0.0, 0.0, 0.0); self.positions.len()];
        for face in &self.faces {
            let n = self.face_normal(face);
            for &idx in &face.positions {
                acc[idx as usize] += n;
            }
        }
        self.normals = acc
            .into_iter()
            .map(|n| if n.dot(n) > 0.0 { n.normalize() } else { n })
            .collect();
    }

    /// Flips every normal (§4.2 item 2: "optionally flip normals"), and
    /// reverses face winding so the geometric normal stays consistent.
    pub fn flip_normals(&mut self) {
        for n in &mut self.normals {
            *n = -*n;
        }
        for face in &mut self.faces {
            face.positions.swap(1, 2);
            face.normals.swap(1, 2);
            face.texcoords.swap(1, 2);
        }
    }

    /// Applies an affine transform to positions and normals in place
    /// (normals transform by the inverse-transpose, per
    /// [`Transform::normal_matrix`]).
    pub fn apply_transform(&mut self, transform: &Transform) {
        for p in &mut self.positions {
            *p = transform.transform_point(*p);
        }
        let normal_matrix = transform.normal_matrix();
        for n in &mut self.normals {
            *n = normal_matrix * *n;
        }
    }

    /// True if any face has a non-triangular degenerate geometry: all three
    /// position indices the same, or a face with zero area (§4.2 item 2
    /// "detect degeneracy").
    pub fn has_degenerate_faces(&self) -> bool {
        self.faces.iter().any(|f| {
            let [a, b, c] = f.positions;
            let n = self.face_normal(f);
            a == b || b == c || a == c || n.dot(n) == 0.0
        })
    }

    /// Detects whether this mesh is exactly a planar quad in canonical
    /// order — "four coplanar vertices in canonical order" (§4.2 item 2) —
    /// and if so, returns the plane-shape optimization record.
    pub fn detect_plane(&self) -> Option<PlaneShape> {
        if self.positions.len() != 4 || self.faces.len() != 2 {
            return None;
        }
        let p0 = self.positions[0];
        let origin = p0;
        let axis_x = self.positions[1] - p0;
        let axis_y = self.positions[3] - p0;
        let expected_p2 = p0 + axis_x + axis_y;
        let p2 = self.positions[2];
        if (p2 - expected_p2).dot(p2 - expected_p2) > 1e-10 {
            return None;
        }
        let normal = axis_x.cross(axis_y);
        if normal.dot(normal) <= 0.0 {
            return None;
        }
        let uvs = self
            .texcoords
            .get(..4)
            .map(|t| [t[0], t[1], t[2], t[3]])
            .unwrap_or([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        Some(PlaneShape { origin, axis_x, axis_y, uvs })
    }
}

fn inflate(bbox: &mut BoundingBox<Point3>) {
    let diag = bbox.diagonal();
    if diag.x.abs() < MIN_BBOX_INFLATE || diag.y.abs() < MIN_BBOX_INFLATE || diag.z.abs() < MIN_BBOX_INFLATE {
        let pad = Vector3::new(MIN_BBOX_INFLATE, MIN_BBOX_INFLATE, MIN_BBOX_INFLATE);
        let min = *bbox.min() - pad;
        let max = *bbox.max() + pad;
        *bbox = [min, max].into_iter().collect();
    }
}

/// The plane-shape optimization record (§4.2 item 2, §3 "plane-shape:
/// origin, two axes, four UVs").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneShape {
    /// The quad's origin corner.
    pub origin: Point3,
    /// The first in-plane axis (origin → corner 1).
    pub axis_x: Vector3,
    /// The second in-plane axis (origin → corner 3).
    pub axis_y: Vector3,
    /// Per-corner texture coordinates, in winding order.
    pub uvs: [[f32; 2]; 4],
}

/// Builds a unit-radius UV sphere shape's auxiliary data (§3 "sphere-shape:
/// origin, radius").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereShape {
    /// World-space center.
    pub origin: Point3,
    /// Radius.
    pub radius: f64,
}

impl SphereShape {
    /// The sphere's bounding box, inflated per §3.
    pub fn bounding_box(&self) -> BoundingBox<Point3> {
        let r = Vector3::new(self.radius, self.radius, self.radius);
        let mut bbox: BoundingBox<Point3> = [self.origin - r, self.origin + r].into_iter().collect();
        inflate(&mut bbox);
        bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> TriMesh {
        TriMesh {
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            normals: vec![Vector3::new(0.0, 0.0, 1.0); 4],
            texcoords: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            faces: vec![
                Face { positions: [0, 1, 2], normals: [0, 1, 2], texcoords: [0, 1, 2], material_slot: 0 },
                Face { positions: [0, 2, 3], normals: [0, 2, 3], texcoords: [0, 2, 3], material_slot: 0 },
            ],
        }
    }

    #[test]
    fn detects_canonical_plane() {
        let mesh = quad();
        let plane = mesh.detect_plane().unwrap();
        assert_eq!(plane.origin, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn bounding_box_is_inflated_for_flat_mesh() {
        let mesh = quad();
        let bbox = mesh.bounding_box();
        assert!(bbox.diagonal().z >= MIN_BBOX_INFLATE);
    }

    #[test]
    fn flip_normals_reverses_winding() {
        let mut mesh = quad();
        let before = mesh.faces[0].positions;
        mesh.flip_normals();
        assert_eq!(mesh.faces[0].positions, [before[0], before[2], before[1]]);
        assert_eq!(mesh.normals[0], Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn recompute_vertex_normals_points_outward() {
        let mut mesh = quad();
        mesh.recompute_vertex_normals();
        assert!(mesh.normals[0].z > 0.0);
    }
}
