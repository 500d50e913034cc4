//! BSDF resolution (§4.5 supplement): turns each deduplicated material's
//! declared `bsdf` scene object into a transpiled BSDF expression through
//! [`ShadingTree`], producing the [`MaterialSpec`] list [`crate::variants`]
//! hands to [`ignis_render::assemble_variant`].

use ignis_render::MaterialSpec;
use ignis_scene::{Object, Scene};
use ignis_shading::{ColorOptions, NumberOptions, ShadingTree};

use crate::context::LoaderContext;

/// Canonicalizes a BSDF plugin type, resolving the rough/smooth aliases
/// the scene format accepts to one constructor each.
fn canonical_bsdf(plugin_type: &str) -> Option<&'static str> {
    match plugin_type {
        "diffuse" => Some("diffuse"),
        "conductor" | "roughconductor" => Some("conductor"),
        "dielectric" | "roughdielectric" => Some("dielectric"),
        "plastic" | "roughplastic" => Some("plastic"),
        _ => None,
    }
}

/// Acquires `bsdf`'s parameters through `tree` and emits its DSL
/// constructor call, or `None` if its plugin type isn't registered.
fn emit_bsdf_expr(tree: &mut ShadingTree<'_>, bsdf: &Object) -> Option<String> {
    let expr = match canonical_bsdf(&bsdf.plugin_type)? {
        "diffuse" => {
            let (_, reflectance) = tree.add_color(bsdf, "reflectance", ColorOptions::white());
            format!("make_diffuse_bsdf({reflectance})")
        }
        "conductor" => {
            let (_, reflectance) = tree.add_color(bsdf, "reflectance", ColorOptions::white());
            let (_, roughness) = tree.add_number(bsdf, "roughness", NumberOptions::zero());
            format!("make_conductor_bsdf({reflectance}, {roughness})")
        }
        "dielectric" => {
            let (_, ior) = tree.add_number(bsdf, "ior", NumberOptions::structural(1.5));
            format!("make_dielectric_bsdf({ior})")
        }
        "plastic" => {
            let (_, reflectance) = tree.add_color(bsdf, "reflectance", ColorOptions::white());
            let (_, roughness) = tree.add_number(bsdf, "roughness", NumberOptions::zero());
            format!("make_plastic_bsdf({reflectance}, {roughness})")
        }
        other => unreachable!("canonical_bsdf produced an unregistered tag `{other}`"),
    };
    Some(expr)
}

/// Builds one [`MaterialSpec`] per entry in `ctx.materials` (§4.3's
/// deduplicated material table), in material-id order. `load_entities`
/// already rejects any entity whose `bsdf` name doesn't resolve, so every
/// key here is guaranteed to name a declared BSDF object; an unregistered
/// *plugin type* is still possible and falls back to a black diffuse BSDF,
/// flagged through `ctx.signal_error` (§7 "non-fatal").
pub fn load_materials(ctx: &LoaderContext, scene: &Scene) -> Vec<MaterialSpec> {
    let materials = ctx.materials.lock().expect("materials mutex poisoned").clone();
    materials
        .iter()
        .enumerate()
        .map(|(material_id, key)| {
            let bsdf = scene
                .bsdfs
                .get(&key.bsdf)
                .expect("entity dedup only records materials whose bsdf name resolved");
            let mut tree = ShadingTree::new(scene, ctx.has_error.clone());
            let bsdf_expr = emit_bsdf_expr(&mut tree, bsdf).unwrap_or_else(|| {
                ctx.signal_error(format!("bsdf `{}` has unknown plugin type `{}`", key.bsdf, bsdf.plugin_type));
                "make_diffuse_bsdf(black_color)".to_owned()
            });
            MaterialSpec { material_id, bsdf_expr, is_emissive: !key.emitter_entity.is_empty() }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::MaterialKey;

    fn scene_with_bsdf(name: &str, plugin_type: &str) -> Scene {
        let mut scene = Scene::new();
        scene.bsdfs.insert(Object::new(name, plugin_type));
        scene
    }

    fn material_key(bsdf: &str, emitter: &str) -> MaterialKey {
        MaterialKey { bsdf: bsdf.to_owned(), inner_medium: -1, outer_medium: -1, emitter_entity: emitter.to_owned() }
    }

    #[test]
    fn diffuse_bsdf_emits_a_make_diffuse_bsdf_call() {
        let scene = scene_with_bsdf("b1", "diffuse");
        let ctx = LoaderContext::new();
        ctx.materials.lock().unwrap().push(material_key("b1", ""));
        let specs = load_materials(&ctx, &scene);
        assert_eq!(specs.len(), 1);
        assert!(specs[0].bsdf_expr.starts_with("make_diffuse_bsdf("));
        assert!(!specs[0].is_emissive);
        assert!(!ctx.has_error());
    }

    #[test]
    fn emitter_entity_flags_the_material_as_emissive() {
        let scene = scene_with_bsdf("b1", "diffuse");
        let ctx = LoaderContext::new();
        ctx.materials.lock().unwrap().push(material_key("b1", "light_entity"));
        let specs = load_materials(&ctx, &scene);
        assert!(specs[0].is_emissive);
    }

    #[test]
    fn unknown_plugin_type_falls_back_to_black_diffuse_and_signals_error() {
        let scene = scene_with_bsdf("b1", "not_a_bsdf");
        let ctx = LoaderContext::new();
        ctx.materials.lock().unwrap().push(material_key("b1", ""));
        let specs = load_materials(&ctx, &scene);
        assert_eq!(specs[0].bsdf_expr, "make_diffuse_bsdf(black_color)");
        assert!(ctx.has_error());
    }

    #[test]
    fn rough_alias_resolves_to_the_same_constructor_as_its_smooth_form() {
        let scene = scene_with_bsdf("b1", "roughconductor");
        let ctx = LoaderContext::new();
        ctx.materials.lock().unwrap().push(material_key("b1", ""));
        let specs = load_materials(&ctx, &scene);
        assert!(specs[0].bsdf_expr.starts_with("make_conductor_bsdf("));
    }
}
