//! Writes shape geometry into the `shapes` dynamic table (§3, §4.2 item 3).

use crate::trimesh::{SphereShape, TriMesh};
use ignis_serialize::Serializer;

/// Appends a triangle mesh's blob: face/vertex/normal/tex counts, then each
/// 16-byte-aligned array in the order named by §4.2 item 3.
pub fn write_trimesh_blob(serializer: &mut Serializer<'_>, mesh: &TriMesh) {
    serializer.write(mesh.faces.len() as u32);
    serializer.write(mesh.positions.len() as u32);
    serializer.write(mesh.normals.len() as u32);
    serializer.write(mesh.texcoords.len() as u32);

    let positions: Vec<[f32; 3]> = mesh.positions.iter().map(|p| [p.x as f32, p.y as f32, p.z as f32]).collect();
    serializer.write_slice(&positions, true);

    let normals: Vec<[f32; 3]> = mesh.normals.iter().map(|n| [n.x as f32, n.y as f32, n.z as f32]).collect();
    serializer.write_slice(&normals, true);

    let face_normals: Vec<[f32; 3]> = mesh
        .faces
        .iter()
        .map(|f| {
            let n = mesh.face_normal(f);
            [n.x as f32, n.y as f32, n.z as f32]
        })
        .collect();
    serializer.write_slice(&face_normals, true);

    let indices: Vec<[u32; 4]> = mesh
        .faces
        .iter()
        .map(|f| [f.positions[0], f.positions[1], f.positions[2], f.material_slot])
        .collect();
    serializer.write_slice(&indices, true);

    serializer.write_slice(&mesh.texcoords, true);

    let inv_areas: Vec<f32> = mesh.faces.iter().map(|f| mesh.face_inv_area(f)).collect();
    serializer.write_slice(&inv_areas, true);
}

/// Appends a sphere's blob: origin (3 f32) and radius (f32), 16-byte
/// aligned as a single entry.
pub fn write_sphere_blob(serializer: &mut Serializer<'_>, sphere: &SphereShape) {
    #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
    #[repr(C)]
    struct SphereEntry {
        origin: [f32; 3],
        radius: f32,
    }
    let entry = SphereEntry {
        origin: [sphere.origin.x as f32, sphere.origin.y as f32, sphere.origin.z as f32],
        radius: sphere.radius as f32,
    };
    serializer.write_slice(&[entry], true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::cube;
    use ignis_base::cgmath64::Point3;

    #[test]
    fn trimesh_blob_is_16_byte_aligned() {
        let mesh = cube();
        let mut buf = Vec::new();
        write_trimesh_blob(&mut Serializer::writer(&mut buf), &mesh);
        assert_eq!(buf.len() % ignis_serialize::DEFAULT_ALIGNMENT, 0);
    }

    #[test]
    fn sphere_blob_is_16_byte_aligned() {
        let sphere = SphereShape { origin: Point3::new(0.0, 0.0, 0.0), radius: 1.0 };
        let mut buf = Vec::new();
        write_sphere_blob(&mut Serializer::writer(&mut buf), &sphere);
        assert_eq!(buf.len() % ignis_serialize::DEFAULT_ALIGNMENT, 0);
    }
}
