//! Tonemap and image-info service shaders (§3: "shader-string generation
//! layer for device... tonemap, and image-info shaders"; §6.2 "service
//! shaders `tonemap`, `glare`, `imageinfo`").

use ignis_device::ServiceShader;

use crate::target::Target;

/// Composes a service shader's source string. Service shaders have no
/// per-variant technique body or payload — they run once per iteration
/// over the accumulated framebuffer/AOVs.
pub fn compose_service_shader(service: ServiceShader, target: Target) -> String {
    let (export_name, launch_args) = match service {
        ServiceShader::Tonemap => ("ig_tonemap_shader", "settings.tonemap"),
        ServiceShader::Glare => ("ig_glare_shader", "settings.glare"),
        ServiceShader::ImageInfo => ("ig_imageinfo_shader", "settings.imageinfo"),
    };
    format!(
        "#[export] fn {export_name}(settings: &Settings) -> () {{\nlet device = {};\ndevice.launch_service_shader({launch_args});\n}}",
        target.device_constructor()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tonemap_shader_has_the_fixed_export_name() {
        let source = compose_service_shader(ServiceShader::Tonemap, Target::Cpu { vector_width: 4 });
        assert!(source.starts_with("#[export] fn ig_tonemap_shader"));
    }

    #[test]
    fn imageinfo_shader_launches_the_right_service() {
        let source = compose_service_shader(ServiceShader::ImageInfo, Target::NvidiaGpu);
        assert!(source.contains("settings.imageinfo"));
    }
}
