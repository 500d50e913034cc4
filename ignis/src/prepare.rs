//! The prepare phase (§4.2 "the prepare phase scans `entities` once, before
//! any shape is loaded, and registers exactly the providers actually
//! needed" + §4.4 "Prepare"): a single read-only scan over the scene that
//! decides which shapes must be loaded and which entities are emissive,
//! before any of the expensive per-shape work in [`crate::shapes`] starts.

use ignis_scene::Scene;
use rustc_hash::FxHashSet;

use crate::context::LoaderContext;

/// The result of scanning a scene, before any shape or entity is loaded.
#[derive(Debug, Clone, Default)]
pub struct PreparedScene {
    /// Every shape name referenced by at least one entity.
    pub needed_shapes: FxHashSet<String>,
}

/// Scans `scene.entities` for referenced shape names and `scene.lights` for
/// area-light entity references, writing the latter into `ctx` so
/// [`crate::entity::load_entities`] can consult it during material dedup.
pub fn prepare(ctx: &LoaderContext, scene: &Scene) -> PreparedScene {
    let mut needed_shapes = FxHashSet::default();
    for entity in scene.entities.iter() {
        if let Some(shape_name) = entity.properties.string("shape") {
            needed_shapes.insert(shape_name.to_owned());
        }
    }

    let emissive = ignis_lights::prepare(scene);
    *ctx.emissive_entities.lock().expect("emissive_entities mutex poisoned") = emissive;

    PreparedScene { needed_shapes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignis_scene::{Object, Property};

    #[test]
    fn collects_every_referenced_shape_name() {
        let mut scene = Scene::new();
        let mut e1 = Object::new("e1", "entity");
        e1.properties.set("shape", Property::String("cube".into()));
        let mut e2 = Object::new("e2", "entity");
        e2.properties.set("shape", Property::String("sphere".into()));
        scene.entities.insert(e1);
        scene.entities.insert(e2);

        let ctx = LoaderContext::new();
        let prepared = prepare(&ctx, &scene);
        assert_eq!(prepared.needed_shapes.len(), 2);
        assert!(prepared.needed_shapes.contains("cube"));
    }

    #[test]
    fn area_light_entity_is_recorded_as_emissive() {
        let mut scene = Scene::new();
        let mut light = Object::new("l1", "area");
        light.properties.set("entity", Property::String("e1".into()));
        scene.lights.insert(light);

        let ctx = LoaderContext::new();
        prepare(&ctx, &scene);
        assert!(ctx.emissive_entities.lock().unwrap().contains("e1"));
    }

    #[test]
    fn entity_without_shape_property_is_simply_not_counted() {
        let mut scene = Scene::new();
        scene.entities.insert(Object::new("e1", "entity"));
        let ctx = LoaderContext::new();
        let prepared = prepare(&ctx, &scene);
        assert!(prepared.needed_shapes.is_empty());
        assert!(!ctx.has_error());
    }
}
