//! Per-technique DSL body emission (§4.7: "`body_loader(stream, props,
//! ctx)` that emits the DSL body defining a local `technique` value given
//! the ambient shader context"). Paired with [`crate::registry::get_info`]
//! — same canonical dispatch, different callback.

use ignis_scene::Object;

use crate::registry::{canonical_name, TechniqueError};

/// Emits the DSL fragment that defines a local `technique` binding for
/// the technique named `name` (or one of its aliases), for `variant`
/// within that technique's variant vector.
pub fn emit_body(name: &str, props: &Object, variant: usize) -> Result<String, TechniqueError> {
    let canonical = canonical_name(name).ok_or_else(|| TechniqueError::UnknownTechnique(name.to_owned()))?;
    let body = match canonical {
        "ao" => "let technique = make_ao_technique();".to_owned(),
        "path" => {
            let enable_mis = props.properties.boolean("enable_mis", false);
            format!("let technique = make_path_tracing_technique(settings, {enable_mis});")
        }
        "volpath" => {
            let enable_mis = props.properties.boolean("enable_mis", false);
            format!("let technique = make_volume_path_tracing_technique(settings, {enable_mis});")
        }
        "debug" => "let technique = make_debug_technique();".to_owned(),
        "ppm" => {
            let photons = props.properties.integer("photons", 1_000_000).max(0);
            match variant {
                0 => format!("let technique = make_light_tracer_technique(settings, {photons});"),
                _ => format!("let technique = make_ppm_eye_technique(settings, {photons});"),
            }
        }
        "lt" => "let technique = make_light_tracer_technique(settings, 0);".to_owned(),
        "wireframe" => "let technique = make_wireframe_technique();".to_owned(),
        "infobuffer" => "let technique = make_info_buffer_technique();".to_owned(),
        "lightvisibility" => "let technique = make_light_visibility_technique();".to_owned(),
        "camera_check" => "let technique = make_camera_check_technique();".to_owned(),
        other => unreachable!("canonical_name produced an unregistered tag `{other}`"),
    };
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn technique_object(plugin_type: &str) -> Object { Object::new("technique", plugin_type) }

    #[test]
    fn ppm_variant_zero_is_the_light_tracer_pass() {
        let props = technique_object("ppm");
        let body = emit_body("ppm", &props, 0).unwrap();
        assert!(body.contains("make_light_tracer_technique"));
    }

    #[test]
    fn ppm_variant_one_is_the_eye_pass() {
        let props = technique_object("ppm");
        let body = emit_body("ppm", &props, 1).unwrap();
        assert!(body.contains("make_ppm_eye_technique"));
    }

    #[test]
    fn unknown_technique_is_an_error() {
        let props = technique_object("not_a_technique");
        assert!(emit_body("not_a_technique", &props, 0).is_err());
    }

    #[test]
    fn path_mis_flag_is_threaded_through() {
        let mut props = technique_object("path");
        props.properties.set("enable_mis", ignis_scene::Property::Number(1.0));
        let body = emit_body("path", &props, 0).unwrap();
        assert!(body.contains("true"));
    }
}
