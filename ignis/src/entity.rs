//! Entity/material deduplication (§4.3): resolves each scene entity's
//! shape/bsdf/medium references, derives its visibility flags and
//! transform, deduplicates the `(bsdf, medium-in, medium-out, emitter)`
//! material tuple, and writes the 48-byte fixed-table entity blob.

use ignis_base::cgmath64::{Matrix3, Matrix4};
use ignis_base::transform::Transform;
use ignis_bvh::entity_object::{visibility, EntityObject};
use ignis_scene::{Property, Scene};
use rustc_hash::FxHashMap;

use crate::context::LoaderContext;

/// The deduplication key for one material (§3 "Material"): dedup is by the
/// full tuple, with the emitter-entity field making emissive entities
/// unique (§4.3 step 6, invariant in §4.3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaterialKey {
    /// The referenced BSDF's declared name.
    pub bsdf: String,
    /// Index into `scene.media`, or `-1` if this entity has no inner
    /// medium.
    pub inner_medium: i32,
    /// Index into `scene.media`, or `-1` if this entity has no outer
    /// medium.
    pub outer_medium: i32,
    /// The target entity name an area light registered this material
    /// under, or empty for a non-emissive material.
    pub emitter_entity: String,
}

fn derive_visibility(object: &ignis_scene::Object) -> u32 {
    let props = &object.properties;
    let mut flags = 0;
    if props.boolean("camera_visible", true) {
        flags |= visibility::CAMERA_VISIBLE;
    }
    if props.boolean("light_visible", true) {
        flags |= visibility::LIGHT_VISIBLE;
    }
    if props.boolean("bounce_visible", true) {
        flags |= visibility::BOUNCE_VISIBLE;
    }
    if props.boolean("shadow_visible", true) {
        flags |= visibility::SHADOW_VISIBLE;
    }
    flags
}

fn resolve_medium(scene: &Scene, name: Option<&str>, ctx: &LoaderContext) -> i32 {
    match name {
        None => -1,
        Some(name) => match scene.media.index_of(name) {
            Some(index) => index as i32,
            None => {
                ctx.signal_error(format!("unknown medium `{name}`"));
                -1
            }
        },
    }
}

/// Finds `key` in `materials` (ignoring nothing but the key itself — the
/// dedup key *is* the whole tuple, §4.3 step 6), or appends it, returning
/// its material id either way.
fn intern_material(materials: &mut Vec<MaterialKey>, key: MaterialKey) -> usize {
    match materials.iter().position(|existing| existing == &key) {
        Some(id) => id,
        None => {
            materials.push(key);
            materials.len() - 1
        }
    }
}

/// Flattens a 4x4 affine matrix into its row-major 3x4 submatrix (drops
/// the trailing `[0, 0, 0, 1]` row), matching `EntityLeaf1::from_entity_object`'s
/// convention in `ignis-bvh`.
fn mat4_to_3x4(m: Matrix4) -> [f32; 12] {
    [
        m.x.x as f32, m.y.x as f32, m.z.x as f32, m.w.x as f32,
        m.x.y as f32, m.y.y as f32, m.z.y as f32, m.w.y as f32,
        m.x.z as f32, m.y.z as f32, m.z.z as f32, m.w.z as f32,
    ]
}

fn mat3_to_array(m: Matrix3) -> [f32; 9] {
    [
        m.x.x as f32, m.y.x as f32, m.z.x as f32,
        m.x.y as f32, m.y.y as f32, m.z.y as f32,
        m.x.z as f32, m.y.z as f32, m.z.z as f32,
    ]
}

/// Loads every declared entity (§4.3), writing the `entities` fixed table
/// and populating `ctx.materials`/`ctx.entity_to_material`/
/// `ctx.entity_objects_by_provider`/`ctx.scene_bbox`. Returns
/// `EntityToMaterial`, indexed by entity declaration order, for callers
/// that need it without re-locking the context.
pub fn load_entities(
    ctx: &LoaderContext,
    scene: &Scene,
    shape_ids: &FxHashMap<String, usize>,
    shape_provider_tags: &[&'static str],
) -> Vec<usize> {
    let mut entity_to_material = Vec::with_capacity(scene.entities.len());

    for entity in scene.entities.iter() {
        let Some(shape_name) = entity.properties.string("shape") else {
            ctx.signal_error(format!("entity `{}` has no `shape` property", entity.name));
            continue;
        };
        let Some(&shape_id) = shape_ids.get(shape_name) else {
            ctx.signal_error(format!("entity `{}` references unknown shape `{shape_name}`", entity.name));
            continue;
        };
        let Some(bsdf_name) = entity.properties.string("bsdf") else {
            ctx.signal_error(format!("entity `{}` has no `bsdf` property", entity.name));
            continue;
        };
        if scene.bsdfs.get(bsdf_name).is_none() {
            ctx.signal_error(format!("entity `{}` references unknown bsdf `{bsdf_name}`", entity.name));
            continue;
        }

        let inner_medium = resolve_medium(scene, entity.properties.string("inner_medium"), ctx);
        let outer_medium = resolve_medium(scene, entity.properties.string("outer_medium"), ctx);
        let visibility_flags = derive_visibility(entity);

        let matrix = match entity.properties.get("transform") {
            Some(Property::Transform(m)) => *m,
            _ => Matrix4::from_value(1.0),
        };
        let transform = Transform::new(matrix);

        let shape_bbox = {
            let records = ctx.shape_records.lock().expect("shape_records mutex poisoned");
            records[shape_id].bbox
        };
        let world_bbox = transform.transform_bbox(&shape_bbox);
        {
            let mut scene_bbox = ctx.scene_bbox.lock().expect("scene_bbox mutex poisoned");
            scene_bbox.push(world_bbox.min());
            scene_bbox.push(world_bbox.max());
        }

        let emitter_entity = {
            let emissive = ctx.emissive_entities.lock().expect("emissive_entities mutex poisoned");
            if emissive.contains(&entity.name) { entity.name.clone() } else { String::new() }
        };
        let material_id = {
            let mut materials = ctx.materials.lock().expect("materials mutex poisoned");
            intern_material(
                &mut materials,
                MaterialKey { bsdf: bsdf_name.to_owned(), inner_medium, outer_medium, emitter_entity },
            )
        };

        LoaderContext::append(&ctx.entities_table, |serializer| {
            serializer.write(mat4_to_3x4(transform.to_local()));
            serializer.write(mat4_to_3x4(transform.to_global()));
            serializer.write(mat3_to_array(transform.normal_matrix()));
            serializer.write(shape_id as u32);
            serializer.write(transform.scale_factor() as f32);
        });

        let entity_index = entity_to_material.len();
        entity_to_material.push(material_id);

        let provider_tag = shape_provider_tags[shape_id];
        let object = EntityObject {
            bbox: world_bbox,
            inv_transform: transform.to_local(),
            entity_id: entity_index as u32,
            shape_id: shape_id as u32,
            visibility_flags,
            user_scalars: [0.0, 0.0, 0.0],
        };
        ctx.entity_objects_by_provider
            .lock()
            .expect("entity_objects_by_provider mutex poisoned")
            .entry(provider_tag)
            .or_default()
            .push(object);
    }

    {
        let mut recorded = ctx.entity_to_material.lock().expect("entity_to_material mutex poisoned");
        *recorded = entity_to_material.clone();
    }
    entity_to_material
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignis_scene::Object;

    fn scene_with_two_shapes_one_bsdf() -> (Scene, FxHashMap<String, usize>, Vec<&'static str>) {
        let mut scene = Scene::new();
        scene.bsdfs.insert(Object::new("b1", "diffuse"));
        let mut shape_ids = FxHashMap::default();
        shape_ids.insert("cube".to_owned(), 0);
        shape_ids.insert("sphere".to_owned(), 1);
        (scene, shape_ids, vec!["trimesh", "sphere"])
    }

    fn entity(name: &str, shape: &str, bsdf: &str) -> Object {
        let mut e = Object::new(name, "entity");
        e.properties.set("shape", Property::String(shape.to_owned()));
        e.properties.set("bsdf", Property::String(bsdf.to_owned()));
        e
    }

    /// S1 (§8): `e1{cube,b1}`, `e2{cube,b1}`, `e3{sphere,b1}` dedup to two
    /// materials with `EntityToMaterial = [0, 0, 1]`.
    #[test]
    fn s1_dedup_scenario() {
        let (mut scene, shape_ids, tags) = scene_with_two_shapes_one_bsdf();
        scene.entities.insert(entity("e1", "cube", "b1"));
        scene.entities.insert(entity("e2", "cube", "b1"));
        scene.entities.insert(entity("e3", "sphere", "b1"));

        let ctx = LoaderContext::new();
        ctx.shape_records.lock().unwrap().extend([dummy_shape_record(), dummy_shape_record()]);

        let mapping = load_entities(&ctx, &scene, &shape_ids, &tags);
        assert_eq!(mapping, vec![0, 0, 1]);
        assert_eq!(ctx.materials.lock().unwrap().len(), 2);
        assert!(!ctx.has_error());
    }

    #[test]
    fn missing_shape_reference_is_non_fatal_and_skips_the_entity() {
        let (mut scene, shape_ids, tags) = scene_with_two_shapes_one_bsdf();
        scene.entities.insert(entity("e1", "nonexistent", "b1"));
        let ctx = LoaderContext::new();
        let mapping = load_entities(&ctx, &scene, &shape_ids, &tags);
        assert!(mapping.is_empty());
        assert!(ctx.has_error());
    }

    #[test]
    fn emissive_entity_gets_its_own_material() {
        let (mut scene, shape_ids, tags) = scene_with_two_shapes_one_bsdf();
        scene.entities.insert(entity("e1", "cube", "b1"));
        scene.entities.insert(entity("e_light", "cube", "b1"));
        let ctx = LoaderContext::new();
        ctx.shape_records.lock().unwrap().extend([dummy_shape_record(), dummy_shape_record()]);
        ctx.emissive_entities.lock().unwrap().insert("e_light".to_owned());

        let mapping = load_entities(&ctx, &scene, &shape_ids, &tags);
        assert_eq!(mapping[0], 0);
        assert_eq!(mapping[1], 1);
        assert_eq!(ctx.materials.lock().unwrap()[1].emitter_entity, "e_light");
    }

    fn dummy_shape_record() -> ignis_shapes::provider::ShapeRecord {
        use ignis_base::bounding_box::BoundingBox;
        use ignis_base::cgmath64::Point3;
        let bbox: BoundingBox<Point3> = [Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)].into_iter().collect();
        ignis_shapes::provider::ShapeRecord {
            kind: ignis_shapes::provider::ShapeKind::Sphere(ignis_shapes::SphereShape { origin: Point3::new(0.0, 0.0, 0.0), radius: 1.0 }),
            bbox,
            plane: None,
        }
    }
}
