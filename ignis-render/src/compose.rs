//! Top-level shader string composition (§4.8): assembles the six emission
//! steps into one self-contained DSL function string.

use crate::payload::PayloadInfo;
use crate::role::ShaderRole;
use crate::signature;
use crate::target::Target;

/// Everything needed to compose one shader's source string.
pub struct ShaderEmission<'a> {
    /// The role this string is being emitted for.
    pub role: ShaderRole,
    /// The compile target selecting `make_<target>_device(…)`.
    pub target: Target,
    /// The variant's payload sizes, if non-zero (§4.8 step 3).
    pub payload: Option<PayloadInfo>,
    /// Component-specific fragments (lights, media, camera, material
    /// BSDF, …), emitted in order (§4.8 step 4).
    pub fragments: &'a [String],
    /// The technique body defining a local `technique`
    /// ([`ignis_technique::emit_body`], §4.8 step 5).
    pub technique_body: &'a str,
    /// Extra `let` bindings prepended before the component fragments.
    pub header: &'a str,
    /// The expression passed to the final dispatcher call — the local
    /// `shader`/`technique`/`ray` binding the role's `handle_*` entry
    /// point expects.
    pub dispatch_expr: &'a str,
}

/// Composes `emission` into one complete shader source string, following
/// §4.8's fixed six-step order.
pub fn compose(emission: &ShaderEmission<'_>) -> String {
    let mut body = String::new();

    body.push_str(&signature::emit(emission.role));
    body.push('\n');

    body.push_str("let device = ");
    body.push_str(&emission.target.device_constructor());
    body.push_str(";\n");

    if let Some(payload) = emission.payload {
        body.push_str(&payload.to_dsl());
        body.push('\n');
    }

    if !emission.header.is_empty() {
        body.push_str(emission.header);
        body.push('\n');
    }

    for fragment in emission.fragments {
        body.push_str(fragment);
        body.push('\n');
    }

    body.push_str(emission.technique_body);
    body.push('\n');

    body.push_str(&emission.role.dispatcher_call(emission.dispatch_expr));
    body.push('\n');
    body.push('}');
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composed_shader_contains_all_six_steps_in_order() {
        let fragments = vec!["let light_table = make_light_table();".to_owned()];
        let emission = ShaderEmission {
            role: ShaderRole::Miss,
            target: Target::Cpu { vector_width: 8 },
            payload: None,
            fragments: &fragments,
            technique_body: "let technique = make_path_tracing_technique(settings, false);",
            header: "let tex_checker = make_checker_texture();",
            dispatch_expr: "technique",
        };
        let source = compose(&emission);
        let sig_pos = source.find("#[export] fn ig_miss_shader").unwrap();
        let device_pos = source.find("make_cpu_avx_device()").unwrap();
        let header_pos = source.find("tex_checker").unwrap();
        let fragment_pos = source.find("make_light_table").unwrap();
        let technique_pos = source.find("make_path_tracing_technique").unwrap();
        let dispatch_pos = source.find("device.handle_miss_shader(technique)").unwrap();
        assert!(sig_pos < device_pos);
        assert!(device_pos < header_pos);
        assert!(header_pos < fragment_pos);
        assert!(fragment_pos < technique_pos);
        assert!(technique_pos < dispatch_pos);
        assert!(source.trim_end().ends_with('}'));
    }

    #[test]
    fn payload_literal_appears_before_fragments_when_present() {
        let emission = ShaderEmission {
            role: ShaderRole::Hit { material_id: 0 },
            target: Target::NvidiaGpu,
            payload: Some(PayloadInfo { primary_count: 6, secondary_count: 1 }),
            fragments: &[],
            technique_body: "let technique = make_path_tracing_technique(settings, false);",
            header: "",
            dispatch_expr: "shader",
        };
        let source = compose(&emission);
        assert!(source.contains("PayloadInfo { primary_count = 6, secondary_count = 1 }"));
    }
}
