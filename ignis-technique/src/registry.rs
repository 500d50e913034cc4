//! Per-technique-name info derivation (§4.7): resolving a technique's
//! declared `plugin_type` (with its aliases) to a [`TechniqueInfo`].

use ignis_scene::Object;
use thiserror::Error;

use crate::info::{CallbackType, ShadowHandlingMode, TechniqueInfo, TechniqueVariantInfo};

/// An error resolving or building a technique's info.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TechniqueError {
    /// No technique is registered under this name or any of its aliases.
    #[error("unknown technique `{0}`")]
    UnknownTechnique(String),
}

/// Canonicalizes a technique name, resolving aliases (`photonmapper` →
/// `ppm`, `lighttracer` → `lt`) to the registry's canonical tag.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    match name {
        "ao" => Some("ao"),
        "path" => Some("path"),
        "volpath" => Some("volpath"),
        "debug" => Some("debug"),
        "ppm" | "photonmapper" => Some("ppm"),
        "lt" | "lighttracer" => Some("lt"),
        "wireframe" => Some("wireframe"),
        "infobuffer" => Some("infobuffer"),
        "lightvisibility" => Some("lightvisibility"),
        "camera_check" => Some("camera_check"),
        _ => None,
    }
}

/// Derive a [`TechniqueInfo`] for the technique named `name` (or one of
/// its aliases), reading any per-technique options from `props`.
pub fn get_info(name: &str, props: &Object) -> Result<TechniqueInfo, TechniqueError> {
    match canonical_name(name).ok_or_else(|| TechniqueError::UnknownTechnique(name.to_owned()))? {
        "ao" => Ok(ao_info()),
        "path" => Ok(path_info(props)),
        "volpath" => Ok(volpath_info(props)),
        "debug" => Ok(minimal_info()),
        "ppm" => Ok(ppm_info(props)),
        "lt" => Ok(lt_info()),
        "wireframe" => Ok(minimal_info()),
        "infobuffer" => Ok(infobuffer_info()),
        "lightvisibility" => Ok(minimal_info()),
        "camera_check" => Ok(minimal_info()),
        other => unreachable!("canonical_name produced an unregistered tag `{other}`"),
    }
}

fn minimal_info() -> TechniqueInfo { TechniqueInfo::single_variant(TechniqueVariantInfo::default()) }

fn ao_info() -> TechniqueInfo {
    TechniqueInfo::single_variant(TechniqueVariantInfo { primary_payload_count: 1, uses_lights: false, ..Default::default() })
}

/// **path**: single variant; uses lights; 6-entry primary payload;
/// optional MIS AOV outputs ("Direct Weights", "NEE Weights") toggled by
/// a property; advanced shadow mode when MIS AOVs are enabled (§4.7
/// "Variant examples").
fn path_info(props: &Object) -> TechniqueInfo {
    let enable_mis = props.properties.boolean("enable_mis", false);
    let variant = TechniqueVariantInfo {
        uses_lights: true,
        primary_payload_count: 6,
        secondary_payload_count: 1,
        shadow_handling_mode: if enable_mis { ShadowHandlingMode::AdvancedWithMaterials } else { ShadowHandlingMode::Simple },
        ..Default::default()
    };
    let aov_names = if enable_mis { vec!["Direct Weights".to_owned(), "NEE Weights".to_owned()] } else { Vec::new() };
    TechniqueInfo { aov_names, variants: vec![variant], selector: None }
}

fn volpath_info(props: &Object) -> TechniqueInfo {
    let mut info = path_info(props);
    for variant in &mut info.variants {
        variant.uses_media = true;
    }
    info
}

/// **ppm**: two variants (§4.7 "Variant examples"): (0) a light-tracer
/// pass with `override_camera_generator` producing rays from lights,
/// `override_width = photons`, `override_height = 1`, `override_spi = 1`,
/// `lock_framebuffer = true`; (1) an eye-tracer with merging. Both carry
/// a `BeforeIteration` callback rebuilding the photon query structure.
fn ppm_info(props: &Object) -> TechniqueInfo {
    let photons = props.properties.integer("photons", 1_000_000).max(0) as usize;

    let mut photon_pass = TechniqueVariantInfo {
        override_camera_generator: Some("light_ray_generator".to_owned()),
        requires_explicit_camera: false,
        override_width: Some(photons),
        override_height: Some(1),
        override_spi: Some(1),
        lock_framebuffer: true,
        uses_lights: true,
        ..Default::default()
    };
    photon_pass.callback_generators.insert(CallbackType::BeforeIteration, "rebuild_photon_query_structure".to_owned());

    let mut eye_pass = TechniqueVariantInfo { uses_lights: true, primary_payload_count: 4, ..Default::default() };
    eye_pass.callback_generators.insert(CallbackType::BeforeIteration, "rebuild_photon_query_structure".to_owned());

    TechniqueInfo { aov_names: Vec::new(), variants: vec![photon_pass, eye_pass], selector: None }
}

fn lt_info() -> TechniqueInfo {
    TechniqueInfo::single_variant(TechniqueVariantInfo {
        override_camera_generator: Some("light_ray_generator".to_owned()),
        requires_explicit_camera: false,
        uses_lights: true,
        ..Default::default()
    })
}

/// **infobuffer**: last variant; produces "Normals", "Albedo", "Depth"
/// AOVs (§4.7 "Variant examples"). Standing alone (not composed via
/// [`crate::denoiser::enable_ib`]) it is the technique's only variant.
fn infobuffer_info() -> TechniqueInfo {
    TechniqueInfo {
        aov_names: vec!["Normals".to_owned(), "Albedo".to_owned(), "Depth".to_owned()],
        variants: vec![TechniqueVariantInfo::default()],
        selector: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn technique_object(plugin_type: &str) -> Object { Object::new("technique", plugin_type) }

    #[test]
    fn aliases_resolve_to_canonical_names() {
        assert_eq!(canonical_name("photonmapper"), Some("ppm"));
        assert_eq!(canonical_name("lighttracer"), Some("lt"));
        assert_eq!(canonical_name("not_a_technique"), None);
    }

    #[test]
    fn unknown_technique_is_an_error() {
        let props = technique_object("not_a_technique");
        assert!(get_info("not_a_technique", &props).is_err());
    }

    #[test]
    fn path_without_mis_has_no_aovs_and_simple_shadows() {
        let props = technique_object("path");
        let info = get_info("path", &props).unwrap();
        assert!(info.aov_names.is_empty());
        assert_eq!(info.variants[0].shadow_handling_mode, ShadowHandlingMode::Simple);
        assert_eq!(info.variants[0].primary_payload_count, 6);
    }

    #[test]
    fn path_with_mis_adds_aovs_and_advanced_shadows() {
        let mut props = technique_object("path");
        props.properties.set("enable_mis", ignis_scene::Property::Number(1.0));
        let info = get_info("path", &props).unwrap();
        assert_eq!(info.aov_names, vec!["Direct Weights".to_owned(), "NEE Weights".to_owned()]);
        assert_eq!(info.variants[0].shadow_handling_mode, ShadowHandlingMode::AdvancedWithMaterials);
    }

    #[test]
    fn ppm_variant_zero_matches_s6() {
        let mut props = technique_object("ppm");
        props.properties.set("photons", ignis_scene::Property::Integer(1_000_000));
        let info = get_info("ppm", &props).unwrap();
        assert_eq!(info.variants.len(), 2);
        let v0 = &info.variants[0];
        assert_eq!(v0.override_width, Some(1_000_000));
        assert_eq!(v0.override_height, Some(1));
        assert_eq!(v0.override_spi, Some(1));
        assert!(v0.lock_framebuffer);
    }

    #[test]
    fn volpath_sets_uses_media() {
        let props = technique_object("volpath");
        let info = get_info("volpath", &props).unwrap();
        assert!(info.variants[0].uses_media);
    }
}
