//! The light loader pipeline (§4.4): prepare → setup → embedding decision →
//! selector construction.

use crate::cdf::Cdf;
use crate::embed::EmbedClassCounter;
use crate::light::Light;
use ignis_scene::Scene;
use rustc_hash::FxHashSet;

/// The minimum total embeddable finite-light count for embedding to switch
/// on (§4.4 supplement: "total_embed_count >= 10").
pub const EMBED_THRESHOLD: usize = 10;

/// Which light selector a scene ends up with (§4.4 "Light selector").
#[derive(Debug, Clone, PartialEq)]
pub enum LightSelector {
    /// Every light is equally likely; used whenever there are ≤ 1 lights
    /// total, or the scene requested `"uniform"` explicitly.
    Uniform,
    /// A flux-weighted CDF over finite lights.
    Simple(Cdf),
    /// Delegates to a light-hierarchy (not modeled further here; §4.4
    /// documents it as `make_hierarchy_light_selector(...)` and the binary
    /// tree serialization lives in [`crate::hierarchy`]).
    Hierarchy,
}

/// The fully loaded, partitioned set of lights for one scene (§4.4
/// "Setup").
#[derive(Debug, Clone)]
pub struct LoadedLights {
    /// Lights with infinite extent, in dense-id order.
    pub infinite: Vec<Light>,
    /// Finite lights, stable-partitioned by embed class (embedded classes
    /// first in class first-seen order, non-embedded tail last), in
    /// dense-id order.
    pub finite: Vec<Light>,
    /// Whether embedding is active for this scene (§4.4 "Embedding
    /// decision").
    pub embedding_enabled: bool,
    /// Per-class counts among the embedded prefix of `finite`, in
    /// first-seen order — drives the `load_simple_<class>_lights(count,
    /// offset, ...)` emission (§4.4).
    pub embed_counter: EmbedClassCounter,
    /// Every entity name referenced by an area light (§4.4 "Prepare").
    pub emissive_entities: FxHashSet<String>,
    /// The selector chosen for this light set.
    pub selector: LightSelector,
}

/// Requested selector type, from the scene's technique/renderer options
/// (§4.4 "given a selector-type string").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorRequest {
    /// Every light equally likely.
    Uniform,
    /// Flux-weighted CDF over finite lights.
    Simple,
    /// Delegate to the light hierarchy.
    Hierarchy,
}

/// Scans a scene's declared lights for area-light entity references,
/// without instantiating anything yet (§4.4 "Prepare").
pub fn prepare(scene: &Scene) -> FxHashSet<String> {
    let mut emissive = FxHashSet::default();
    for light in scene.lights.iter() {
        if light.plugin_type == "area" {
            if let Some(entity) = light.properties.string("entity") {
                emissive.insert(entity.to_owned());
            }
        }
    }
    emissive
}

/// Instantiates, partitions, and numbers every light in `scene` (§4.4
/// "Setup" and "Embedding decision").
pub fn load(scene: &Scene, selector_request: SelectorRequest) -> LoadedLights {
    let emissive_entities = prepare(scene);

    let mut infinite = Vec::new();
    let mut finite = Vec::new();
    for object in scene.lights.iter() {
        let Some(light) = Light::from_object(object) else { continue };
        if light.kind.is_finite() {
            finite.push(light);
        } else {
            infinite.push(light);
        }
    }

    let mut embed_counter = EmbedClassCounter::new();
    for light in &finite {
        if let Some(class) = light.embed_class(scene) {
            embed_counter.record(class);
        }
    }

    let embeddable_total = embed_counter.total();
    let embedding_enabled = embeddable_total >= EMBED_THRESHOLD;

    // Stable partition: embed-class rank (insertion order) first, `None`
    // (non-embeddable, or embedding disabled) sorts last. `sort_by_key` is
    // stable, so relative order within a rank — and within the tail — is
    // preserved exactly as `std::stable_partition` would leave it.
    finite.sort_by_key(|light| match (embedding_enabled, light.embed_class(scene)) {
        (true, Some(class)) => embed_counter.rank_of(class).unwrap(),
        _ => usize::MAX,
    });

    for (i, light) in infinite.iter_mut().enumerate() {
        light.id = i as u32;
    }
    for (i, light) in finite.iter_mut().enumerate() {
        light.id = i as u32;
    }

    let total_lights = infinite.len() + finite.len();
    let selector = match selector_request {
        _ if total_lights <= 1 => LightSelector::Uniform,
        SelectorRequest::Uniform => LightSelector::Uniform,
        SelectorRequest::Simple => {
            let weights: Vec<f32> = finite.iter().map(|l| l.flux).collect();
            LightSelector::Simple(Cdf::build(&weights))
        }
        SelectorRequest::Hierarchy => LightSelector::Hierarchy,
    };

    LoadedLights { infinite, finite, embedding_enabled, embed_counter, emissive_entities, selector }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignis_scene::{Object, Property};

    fn scene_with_point_lights(n: usize) -> Scene {
        let mut scene = Scene::new();
        for i in 0..n {
            let mut object = Object::new(format!("l{i}"), "point");
            object.properties.set("intensity", Property::Number(1.0));
            scene.lights.insert(object);
        }
        scene
    }

    #[test]
    fn nine_point_lights_do_not_trigger_embedding() {
        let scene = scene_with_point_lights(9);
        let loaded = load(&scene, SelectorRequest::Uniform);
        assert!(!loaded.embedding_enabled);
    }

    #[test]
    fn ten_point_lights_trigger_embedding() {
        let scene = scene_with_point_lights(10);
        let loaded = load(&scene, SelectorRequest::Uniform);
        assert!(loaded.embedding_enabled);
        assert_eq!(loaded.embed_counter.count_of("SimplePointLight"), 10);
    }

    #[test]
    fn area_light_entity_is_marked_emissive() {
        let mut scene = Scene::new();
        let mut light = Object::new("l1", "area");
        light.properties.set("entity", Property::String("e1".into()));
        scene.lights.insert(light);
        let loaded = load(&scene, SelectorRequest::Uniform);
        assert!(loaded.emissive_entities.contains("e1"));
    }

    #[test]
    fn single_light_always_collapses_to_uniform() {
        let scene = scene_with_point_lights(1);
        let loaded = load(&scene, SelectorRequest::Simple);
        assert_eq!(loaded.selector, LightSelector::Uniform);
    }

    #[test]
    fn many_lights_with_simple_request_build_a_cdf() {
        let scene = scene_with_point_lights(3);
        let loaded = load(&scene, SelectorRequest::Simple);
        assert!(matches!(loaded.selector, LightSelector::Simple(_)));
    }
}
