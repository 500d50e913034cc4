//! Texture/pattern dependency resolution (§2 "Pattern (texture) loader:
//! Build pattern DAG"): orders every declared texture so each pattern's
//! dependencies (its `checker`/`brick`/`transform` sub-textures) are always
//! resolved before the pattern that references them.

use ignis_patterns::{evaluation_order, populate, Dag};
use ignis_scene::Scene;

use crate::context::LoaderContext;

/// The scene's textures in dependency order, leaves first. A dangling or
/// circular reference is non-fatal (§7): it's flagged on `ctx` and an empty
/// order is returned rather than a partial, unusable one.
pub fn load_texture_order(ctx: &LoaderContext, scene: &Scene) -> Vec<String> {
    let dag = Dag::new();
    let nodes = match populate(&dag, scene) {
        Ok(nodes) => nodes,
        Err(err) => {
            ctx.signal_error(format!("texture pattern DAG: {err}"));
            return Vec::new();
        }
    };
    let roots: Vec<_> = nodes.values().copied().collect();
    evaluation_order(&roots).into_iter().map(|node| node.entity().borrow().name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignis_scene::{Object, Property};

    #[test]
    fn checker_texture_is_ordered_after_its_dependencies() {
        let mut scene = Scene::new();
        scene.textures.insert(Object::new("a", "image"));
        scene.textures.insert(Object::new("b", "image"));
        let mut checker = Object::new("c", "checker");
        checker.properties.set("texture1", Property::String("a".into()));
        checker.properties.set("texture2", Property::String("b".into()));
        scene.textures.insert(checker);

        let ctx = LoaderContext::new();
        let order = load_texture_order(&ctx, &scene);
        let c_pos = order.iter().position(|n| n == "c").unwrap();
        let a_pos = order.iter().position(|n| n == "a").unwrap();
        assert!(a_pos < c_pos);
        assert!(!ctx.has_error());
    }

    #[test]
    fn circular_reference_is_non_fatal() {
        let mut scene = Scene::new();
        let mut transform = Object::new("t", "transform");
        transform.properties.set("base", Property::String("t".into()));
        scene.textures.insert(transform);

        let ctx = LoaderContext::new();
        let order = load_texture_order(&ctx, &scene);
        assert!(order.is_empty());
        assert!(ctx.has_error());
    }
}
