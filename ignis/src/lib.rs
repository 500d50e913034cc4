//! Scene loader and rendering-loop orchestration (§4.2-§4.4, §4.9): ties
//! the shape, light, pattern, shading, technique, device and render crates
//! into one pipeline — prepare, load shapes, dedup entities/materials,
//! build per-provider BVHs, load lights, resolve materials, compile
//! technique variants, then drive the runtime loop.
//!
//! This crate is a library only: the command surface (§6.5) is explicitly
//! out of scope, and [`config::RenderOptions`] is its in-process stand-in.

#![cfg_attr(not(debug_assertions), deny(warnings))]
#![warn(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]

pub mod camera;
pub mod config;
pub mod context;
pub mod entity;
pub mod error;
pub mod materials;
pub mod prepare;
pub mod runtime;
pub mod shapes;
pub mod textures;
pub mod variants;

pub use camera::CameraOrientation;
pub use config::{DenoiserOptions, FilmSize, Platform, RenderOptions};
pub use context::LoaderContext;
pub use error::LoaderError;
pub use prepare::PreparedScene;
pub use variants::CompiledVariant;

use ignis_bvh::build::build_many;
use ignis_bvh::Bvh;
use ignis_device::DeviceHandle;
use ignis_lights::{LoadedLights, SelectorRequest};
use ignis_render::PixelSampler;
use ignis_scene::Scene;
use ignis_technique::TechniqueInfo;
use rustc_hash::FxHashMap;

/// Everything the loader produces, ready for [`runtime::run_iteration`]
/// (§3 "Ownership summary"): the loader context, the per-provider BVHs,
/// the camera orientation, the loaded lights, and the compiled technique.
pub struct LoadedScene {
    /// The loader's shared state: tables, dedup maps, the `HasError` flag.
    pub ctx: LoaderContext,
    /// One BVH per shape-provider tag (§4.6), keyed the same way
    /// `ctx.entity_objects_by_provider` is.
    pub bvhs: FxHashMap<&'static str, Bvh>,
    /// The eye/forward/up basis read from the scene's `camera` object,
    /// unless overridden (§6.5 "override camera/technique type").
    pub camera: Option<CameraOrientation>,
    /// The instantiated, partitioned light set and its selector (§4.4).
    pub lights: LoadedLights,
    /// The resolved technique and its compiled variants.
    pub technique: (TechniqueInfo, Vec<CompiledVariant>),
}

/// Reads the scene's requested light-selector type off the technique
/// object (§4.4 "given a selector-type string"); defaults to the
/// flux-weighted CDF selector when the technique doesn't declare one.
fn light_selector_request(technique_object: &ignis_scene::Object) -> SelectorRequest {
    match technique_object.properties.string("light_selector") {
        Some("uniform") => SelectorRequest::Uniform,
        Some("hierarchy") => SelectorRequest::Hierarchy,
        _ => SelectorRequest::Simple,
    }
}

/// Runs the full load pipeline (§4.2): prepare → load shapes → dedup
/// entities/materials → build BVHs → resolve materials → compile the
/// technique's variants. Returns [`LoaderError`] only for the fatal,
/// boundary-crossing failures (§7); anything recoverable is instead
/// recorded on `ctx.has_error` and the load continues past it.
pub fn load(device: &dyn DeviceHandle, scene: &Scene, options: &RenderOptions) -> Result<LoadedScene, LoaderError> {
    let ctx = LoaderContext::new();

    let prepared = prepare::prepare(&ctx, scene);
    let shape_ids = shapes::load_shapes(&ctx, scene, &prepared.needed_shapes);
    let shape_provider_tags = ctx.shape_provider_tags.lock().expect("shape_provider_tags mutex poisoned").clone();
    entity::load_entities(&ctx, scene, &shape_ids, &shape_provider_tags);
    let _texture_order = textures::load_texture_order(&ctx, scene);

    let bvhs = {
        let mut by_provider = ctx.entity_objects_by_provider.lock().expect("entity_objects_by_provider mutex poisoned");
        let mut providers: Vec<&'static str> = by_provider.keys().copied().collect();
        providers.sort_unstable();
        let entity_lists: Vec<Vec<ignis_bvh::EntityObject>> =
            providers.iter().map(|tag| std::mem::take(by_provider.get_mut(tag).expect("tag taken from this map's own keys"))).collect();
        let trees = build_many(4, &entity_lists);
        providers.into_iter().zip(trees).collect::<FxHashMap<_, _>>()
    };

    let camera = match scene.camera {
        Some(ref object) => Some(CameraOrientation::from_object(object)),
        None => {
            ctx.signal_error("scene declares no camera object");
            None
        }
    };

    let technique_object = scene.technique.as_ref().ok_or(LoaderError::NoTechnique)?;
    let technique_name = options.override_technique_type.as_deref().unwrap_or(&technique_object.plugin_type);
    let lights = ignis_lights::load(scene, light_selector_request(technique_object));
    let materials = materials::load_materials(&ctx, scene);
    let technique = variants::compile_technique(
        device,
        technique_name,
        technique_object,
        options.target(),
        &materials,
        &[],
        PixelSampler::Halton,
    )?;

    Ok(LoadedScene { ctx, bvhs, camera, lights, technique })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignis_device::NullDevice;
    use ignis_scene::{Object, Property};

    fn minimal_scene() -> Scene {
        let mut scene = Scene::new();
        scene.bsdfs.insert(Object::new("b1", "diffuse"));
        scene.shapes.insert(Object::new("s1", "cube"));
        let mut entity = Object::new("e1", "entity");
        entity.properties.set("shape", Property::String("s1".to_owned()));
        entity.properties.set("bsdf", Property::String("b1".to_owned()));
        scene.entities.insert(entity);
        scene.camera = Some(Object::new("cam", "perspective"));
        scene.technique = Some(Object::new("tech", "ao"));
        scene
    }

    #[test]
    fn loads_a_minimal_scene_without_a_fatal_error() {
        let scene = minimal_scene();
        let device = NullDevice::new();
        let loaded = load(&device, &scene, &RenderOptions::default()).unwrap();
        assert!(loaded.camera.is_some());
        assert_eq!(loaded.technique.0.variants.len(), 1);
        assert!(!loaded.ctx.has_error());
        assert!(loaded.lights.infinite.is_empty() && loaded.lights.finite.is_empty());
    }

    #[test]
    fn technique_requested_uniform_selector_is_honored() {
        let mut scene = minimal_scene();
        for i in 0..3 {
            let mut light = Object::new(format!("l{i}"), "point");
            light.properties.set("intensity", Property::Number(1.0));
            scene.lights.insert(light);
        }
        scene.technique.as_mut().unwrap().properties.set("light_selector", Property::String("uniform".to_owned()));
        let device = NullDevice::new();
        let loaded = load(&device, &scene, &RenderOptions::default()).unwrap();
        assert_eq!(loaded.lights.selector, ignis_lights::LightSelector::Uniform);
    }

    #[test]
    fn scene_without_a_technique_is_a_fatal_error() {
        let mut scene = minimal_scene();
        scene.technique = None;
        let device = NullDevice::new();
        let err = load(&device, &scene, &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, LoaderError::NoTechnique));
    }

    #[test]
    fn missing_camera_is_non_fatal_but_flagged() {
        let mut scene = minimal_scene();
        scene.camera = None;
        let device = NullDevice::new();
        let loaded = load(&device, &scene, &RenderOptions::default()).unwrap();
        assert!(loaded.camera.is_none());
        assert!(loaded.ctx.has_error());
    }
}
