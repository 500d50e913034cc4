//! Analytic primitive synthesis: turns a plugin type + properties into a
//! concrete [`TriMesh`] (§4.2: "synthesize geometry").

use crate::trimesh::{Face, TriMesh};
use ignis_base::cgmath64::{EuclideanSpace, Point3, Vector3};
use std::f64::consts::PI;

fn push_quad(mesh: &mut TriMesh, corners: [Point3; 4], uvs: [[f32; 2]; 4]) {
    let base = mesh.positions.len() as u32;
    mesh.positions.extend(corners);
    mesh.texcoords.extend(uvs);
    mesh.normals.extend([Vector3::new(0.0, 0.0, 0.0); 4]);
    mesh.faces.push(Face {
        positions: [base, base + 1, base + 2],
        normals: [base, base + 1, base + 2],
        texcoords: [base, base + 1, base + 2],
        material_slot: 0,
    });
    mesh.faces.push(Face {
        positions: [base, base + 2, base + 3],
        normals: [base, base + 2, base + 3],
        texcoords: [base, base + 2, base + 3],
        material_slot: 0,
    });
}

/// A single axis-aligned rectangle spanning `[-1, 1]²` in the XY plane.
pub fn rectangle() -> TriMesh {
    let mut mesh = TriMesh::default();
    push_quad(
        &mut mesh,
        [
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 1.0, 0.0),
        ],
        [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
    );
    mesh.recompute_vertex_normals();
    mesh
}

/// A unit cube centered at the origin, six quads triangulated as 12 faces.
pub fn cube() -> TriMesh {
    let mut mesh = TriMesh::default();
    let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
    let uv = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    let faces = [
        [p(-1., -1., 1.), p(1., -1., 1.), p(1., 1., 1.), p(-1., 1., 1.)], // +Z
        [p(1., -1., -1.), p(-1., -1., -1.), p(-1., 1., -1.), p(1., 1., -1.)], // -Z
        [p(1., -1., 1.), p(1., -1., -1.), p(1., 1., -1.), p(1., 1., 1.)], // +X
        [p(-1., -1., -1.), p(-1., -1., 1.), p(-1., 1., 1.), p(-1., 1., -1.)], // -X
        [p(-1., 1., 1.), p(1., 1., 1.), p(1., 1., -1.), p(-1., 1., -1.)], // +Y
        [p(-1., -1., -1.), p(1., -1., -1.), p(1., -1., 1.), p(-1., -1., 1.)], // -Y
    ];
    for corners in faces {
        push_quad(&mut mesh, corners, uv);
    }
    mesh.recompute_vertex_normals();
    mesh
}

/// A UV-parameterized sphere of unit radius, `lat_segments x lon_segments`.
pub fn uvsphere(lat_segments: u32, lon_segments: u32) -> TriMesh {
    let lat_segments = lat_segments.max(2);
    let lon_segments = lon_segments.max(3);
    let mut mesh = TriMesh::default();
    for i in 0..=lat_segments {
        let v = i as f64 / lat_segments as f64;
        let theta = v * PI;
        for j in 0..=lon_segments {
            let u = j as f64 / lon_segments as f64;
            let phi = u * 2.0 * PI;
            let (st, ct) = theta.sin_cos();
            let (sp, cp) = phi.sin_cos();
            mesh.positions.push(Point3::new(st * cp, ct, st * sp));
            mesh.normals.push(Point3::new(st * cp, ct, st * sp).to_vec());
            mesh.texcoords.push([u as f32, v as f32]);
        }
    }
    let stride = lon_segments + 1;
    for i in 0..lat_segments {
        for j in 0..lon_segments {
            let a = i * stride + j;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            mesh.faces.push(Face { positions: [a, b, d], normals: [a, b, d], texcoords: [a, b, d], material_slot: 0 });
            mesh.faces.push(Face { positions: [a, d, c], normals: [a, d, c], texcoords: [a, d, c], material_slot: 0 });
        }
    }
    mesh
}

/// An icosphere of unit radius built by subdividing a regular icosahedron
/// `subdivisions` times.
pub fn icosphere(subdivisions: u32) -> TriMesh {
    let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let raw = [
        (-1.0, t, 0.0), (1.0, t, 0.0), (-1.0, -t, 0.0), (1.0, -t, 0.0),
        (0.0, -1.0, t), (0.0, 1.0, t), (0.0, -1.0, -t), (0.0, 1.0, -t),
        (t, 0.0, -1.0), (t, 0.0, 1.0), (-t, 0.0, -1.0), (-t, 0.0, 1.0),
    ];
    let mut positions: Vec<Point3> = raw
        .iter()
        .map(|&(x, y, z)| {
            let len = (x * x + y * y + z * z).sqrt();
            Point3::new(x / len, y / len, z / len)
        })
        .collect();
    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];
    for _ in 0..subdivisions {
        let mut midpoint_cache = std::collections::HashMap::new();
        let mut next_faces = Vec::with_capacity(faces.len() * 4);
        let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Point3>| -> u32 {
            let key = if a < b { (a, b) } else { (b, a) };
            if let Some(&idx) = midpoint_cache.get(&key) {
                return idx;
            }
            let pa = positions[a as usize];
            let pb = positions[b as usize];
            let mid = Point3::new((pa.x + pb.x) / 2.0, (pa.y + pb.y) / 2.0, (pa.z + pb.z) / 2.0);
            let len = (mid.x * mid.x + mid.y * mid.y + mid.z * mid.z).sqrt();
            let idx = positions.len() as u32;
            positions.push(Point3::new(mid.x / len, mid.y / len, mid.z / len));
            midpoint_cache.insert(key, idx);
            idx
        };
        for f in &faces {
            let [a, b, c] = *f;
            let ab = midpoint(a, b, &mut positions);
            let bc = midpoint(b, c, &mut positions);
            let ca = midpoint(c, a, &mut positions);
            next_faces.push([a, ab, ca]);
            next_faces.push([b, bc, ab]);
            next_faces.push([c, ca, bc]);
            next_faces.push([ab, bc, ca]);
        }
        faces = next_faces;
    }
    let mut mesh = TriMesh::default();
    mesh.normals = positions.iter().map(|p| p.to_vec()).collect();
    mesh.texcoords = positions.iter().map(|_| [0.0, 0.0]).collect();
    mesh.positions = positions;
    mesh.faces = faces
        .into_iter()
        .map(|idx| Face { positions: idx, normals: idx, texcoords: idx, material_slot: 0 })
        .collect();
    mesh
}

/// A unit-radius, unit-height cylinder centered at the origin, capped on
/// both ends.
pub fn cylinder(segments: u32) -> TriMesh {
    let segments = segments.max(3);
    let mut mesh = TriMesh::default();
    for i in 0..segments {
        let a = (i as f64 / segments as f64) * 2.0 * PI;
        let (s, c) = a.sin_cos();
        mesh.positions.push(Point3::new(c, -1.0, s));
        mesh.positions.push(Point3::new(c, 1.0, s));
        mesh.normals.push(Point3::new(c, 0.0, s).to_vec());
        mesh.normals.push(Point3::new(c, 0.0, s).to_vec());
        mesh.texcoords.push([i as f32 / segments as f32, 0.0]);
        mesh.texcoords.push([i as f32 / segments as f32, 1.0]);
    }
    for i in 0..segments {
        let j = (i + 1) % segments;
        let a = i * 2;
        let b = a + 1;
        let c = j * 2;
        let d = c + 1;
        mesh.faces.push(Face { positions: [a, c, d], normals: [a, c, d], texcoords: [a, c, d], material_slot: 0 });
        mesh.faces.push(Face { positions: [a, d, b], normals: [a, d, b], texcoords: [a, d, b], material_slot: 0 });
    }
    mesh
}

/// A unit-radius disk in the XZ plane, fan-triangulated from its center.
pub fn disk(segments: u32) -> TriMesh {
    let segments = segments.max(3);
    let mut mesh = TriMesh::default();
    mesh.positions.push(Point3::new(0.0, 0.0, 0.0));
    mesh.normals.push(Point3::new(0.0, 1.0, 0.0).to_vec());
    mesh.texcoords.push([0.5, 0.5]);
    for i in 0..segments {
        let a = (i as f64 / segments as f64) * 2.0 * PI;
        let (s, c) = a.sin_cos();
        mesh.positions.push(Point3::new(c, 0.0, s));
        mesh.normals.push(Point3::new(0.0, 1.0, 0.0).to_vec());
        mesh.texcoords.push([(c as f32 + 1.0) / 2.0, (s as f32 + 1.0) / 2.0]);
    }
    for i in 0..segments {
        let a = 1 + i;
        let b = 1 + (i + 1) % segments;
        mesh.faces.push(Face { positions: [0, a, b], normals: [0, a, b], texcoords: [0, a, b], material_slot: 0 });
    }
    mesh
}

/// A unit-radius, unit-height cone, apex at `y = 1`, capped at its base.
pub fn cone(segments: u32) -> TriMesh {
    let segments = segments.max(3);
    let mut mesh = TriMesh::default();
    let apex = mesh.positions.len() as u32;
    mesh.positions.push(Point3::new(0.0, 1.0, 0.0));
    mesh.normals.push(Point3::new(0.0, 1.0, 0.0).to_vec());
    mesh.texcoords.push([0.5, 1.0]);
    for i in 0..segments {
        let a = (i as f64 / segments as f64) * 2.0 * PI;
        let (s, c) = a.sin_cos();
        mesh.positions.push(Point3::new(c, -1.0, s));
        mesh.normals.push(Point3::new(c, 0.5, s).to_vec());
        mesh.texcoords.push([i as f32 / segments as f32, 0.0]);
    }
    for i in 0..segments {
        let a = apex + 1 + i;
        let b = apex + 1 + (i + 1) % segments;
        mesh.faces.push(Face { positions: [apex, a, b], normals: [apex, a, b], texcoords: [apex, a, b], material_slot: 0 });
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_twelve_faces() {
        assert_eq!(cube().faces.len(), 12);
    }

    #[test]
    fn icosphere_subdivision_grows_face_count() {
        assert_eq!(icosphere(0).faces.len(), 20);
        assert_eq!(icosphere(1).faces.len(), 80);
    }

    #[test]
    fn uvsphere_face_count_matches_grid() {
        let mesh = uvsphere(4, 6);
        assert_eq!(mesh.faces.len(), 4 * 6 * 2);
    }
}
