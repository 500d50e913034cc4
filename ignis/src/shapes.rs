//! Parallel shape loading (§4.2 "Load phase iterates shapes in parallel").
//!
//! Each needed shape name is dispatched to its provider's `handle`, which
//! runs in a `rayon` work-stealing pool — the genuinely parallel,
//! independent I/O/parsing work (§5: "Each task runs independent
//! I/O/parsing, synchronizes only on ... the shape-table append"). Id
//! assignment and the table append itself are finalized in one sequential
//! pass afterwards, over shape names sorted alphabetically, so repeated
//! loads of the same scene produce identical id assignments regardless of
//! the order worker threads happened to finish in (§8 "Round-trip /
//! idempotence": "made deterministic by sorting on input name").

use ignis_base::cgmath64::{EuclideanSpace, Vector3};
use ignis_scene::Scene;
use ignis_shapes::provider::{provider_for, ShapeKind, ShapeRecord};
use ignis_shapes::{Face, ShapeError, TriMesh};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::context::LoaderContext;

/// Loads every shape named in `needed` (the prepare phase's required-shape
/// set, §4.2 "the prepare phase ... registers exactly the providers
/// actually needed"), returning the dense shape id assigned to each name.
/// Names absent from `needed` are simply never loaded.
pub fn load_shapes(ctx: &LoaderContext, scene: &Scene, needed: &rustc_hash::FxHashSet<String>) -> FxHashMap<String, usize> {
    let mut names: Vec<&str> = needed.iter().map(String::as_str).collect();
    names.sort_unstable();

    let results: Vec<(&str, Result<ShapeRecord, ShapeError>)> = names
        .par_iter()
        .map(|&name| {
            let result = match scene.shapes.get(name) {
                Some(object) => match provider_for(&object.plugin_type) {
                    Some(provider) => provider.handle(object),
                    None => Err(ShapeError::UnknownPluginType(object.plugin_type.clone())),
                },
                None => Err(ShapeError::UnknownPluginType(format!("<undeclared shape `{name}`>"))),
            };
            (name, result)
        })
        .collect();

    let mut ids = FxHashMap::default();
    for (name, result) in results {
        match result {
            Ok(record) => {
                let id = append_shape(ctx, &record);
                ids.insert(name.to_owned(), id);
            }
            Err(err) => ctx.signal_error(format!("shape `{name}` failed to load: {err}")),
        }
    }
    ids
}

/// Writes one shape's blob to the shared `shapes` dynamic table and
/// returns its newly assigned id (§4.2 item 1: "writes the blob to the
/// shared shapes dynamic table, under a mutex held only for the single
/// append + id allocation").
fn append_shape(ctx: &LoaderContext, record: &ShapeRecord) -> usize {
    let provider_tag = match &record.kind {
        ShapeKind::TriMesh(_) => "trimesh",
        ShapeKind::Sphere(_) => "sphere",
    };

    LoaderContext::append(&ctx.shapes_table, |serializer| match &record.kind {
        ShapeKind::TriMesh(mesh) => write_trimesh_blob(serializer, mesh),
        ShapeKind::Sphere(shape) => {
            let origin: [f32; 3] = to_f32_array(shape.origin.to_vec());
            serializer.write(origin);
            serializer.write(shape.radius as f32);
            serializer.ensure_alignment(ignis_serialize::DEFAULT_ALIGNMENT);
        }
    });

    let mut records = ctx.shape_records.lock().expect("shape_records mutex poisoned");
    let mut tags = ctx.shape_provider_tags.lock().expect("shape_provider_tags mutex poisoned");
    records.push(record.clone());
    tags.push(provider_tag);
    records.len() - 1
}

/// Writes a triangle mesh's blob (§4.2 item 3): face count, vertex count,
/// normal count, tex count (each `u32`), then 16-byte-aligned positions,
/// normals, face-normals, per-face indices (4-wide, including material
/// slot), texcoords, and per-face inverse area.
fn write_trimesh_blob(serializer: &mut ignis_serialize::Serializer<'_>, mesh: &TriMesh) {
    serializer.write(mesh.faces.len() as u32);
    serializer.write(mesh.positions.len() as u32);
    serializer.write(mesh.normals.len() as u32);
    serializer.write(mesh.texcoords.len() as u32);

    let positions: Vec<[f32; 3]> = mesh.positions.iter().map(|p| to_f32_array(p.to_vec())).collect();
    serializer.write_slice(&positions, true);

    let normals: Vec<[f32; 3]> = mesh.normals.iter().map(|n| to_f32_array(*n)).collect();
    serializer.write_slice(&normals, true);

    let face_normals: Vec<[f32; 3]> = mesh.faces.iter().map(|f| to_f32_array(mesh.face_normal(f))).collect();
    serializer.write_slice(&face_normals, true);

    let indices: Vec<[u32; 4]> = mesh.faces.iter().map(face_indices).collect();
    serializer.write_slice(&indices, true);

    serializer.write_slice(&mesh.texcoords, true);

    let inv_areas: Vec<f32> = mesh.faces.iter().map(|f| mesh.face_inv_area(f)).collect();
    serializer.write_slice(&inv_areas, true);
}

fn face_indices(face: &Face) -> [u32; 4] {
    [face.positions[0], face.positions[1], face.positions[2], face.material_slot]
}

fn to_f32_array(v: Vector3) -> [f32; 3] { [v.x as f32, v.y as f32, v.z as f32] }

#[cfg(test)]
mod tests {
    use super::*;
    use ignis_scene::Object;

    #[test]
    fn known_shape_names_get_dense_ids_in_sorted_order() {
        let mut scene = Scene::new();
        scene.shapes.insert(Object::new("zeta", "cube"));
        scene.shapes.insert(Object::new("alpha", "cube"));
        let ctx = LoaderContext::new();
        let needed: rustc_hash::FxHashSet<String> = ["zeta".to_owned(), "alpha".to_owned()].into_iter().collect();
        let ids = load_shapes(&ctx, &scene, &needed);
        assert_eq!(ids["alpha"], 0);
        assert_eq!(ids["zeta"], 1);
        assert!(!ctx.has_error());
    }

    #[test]
    fn unknown_plugin_type_marks_context_errored_but_does_not_panic() {
        let mut scene = Scene::new();
        scene.shapes.insert(Object::new("weird", "not_a_shape"));
        let ctx = LoaderContext::new();
        let needed: rustc_hash::FxHashSet<String> = ["weird".to_owned()].into_iter().collect();
        let ids = load_shapes(&ctx, &scene, &needed);
        assert!(ids.is_empty());
        assert!(ctx.has_error());
    }

    #[test]
    fn missing_file_backed_shape_is_non_fatal() {
        let mut scene = Scene::new();
        scene.shapes.insert(Object::new("mesh", "obj"));
        let ctx = LoaderContext::new();
        let needed: rustc_hash::FxHashSet<String> = ["mesh".to_owned()].into_iter().collect();
        let ids = load_shapes(&ctx, &scene, &needed);
        assert!(ids.is_empty());
        assert!(ctx.has_error());
    }
}
