use crate::errors::*;
use crate::shaders::resources::SourceProvider;
use crate::video::backends::ShaderStage;
use crate::video::capabilities::{Extension, Probe, Version};
use crate::video::shader::Shader;
use crate::video::Context;

/// Extensions the stock shaders use when the compiler advertises them, paired with the
/// marker that turns them off.
const MARKERS: [(Extension, &str); 3] = [
    (
        Extension::ArbExplicitAttribLocation,
        "#define DISABLE_GL_ARB_explicit_attrib_location\n",
    ),
    (
        Extension::ArbShadingLanguage420pack,
        "#define DISABLE_GL_ARB_shading_language_420pack\n",
    ),
    (
        Extension::ArbExplicitUniformLocation,
        "#define DISABLE_GL_ARB_explicit_uniform_location\n",
    ),
];

/// The markers for every extension `probe` can not provide to shaders written against
/// `version`. A GLSL compiler may advertise an extension that the context as a whole
/// does not support, so the shaders must not rely on the `GL_ARB_*` macros alone.
pub fn disabled_extensions(probe: &dyn Probe, version: Version) -> Vec<&'static str> {
    if version.is_es() {
        return Vec::new();
    }

    MARKERS
        .iter()
        .filter(|(ext, _)| !probe.is_extension_supported(*ext, version))
        .map(|(_, marker)| *marker)
        .collect()
}

/// Creates a shader of `stage` that starts with the version directive, the extension
/// markers and `compatibility.glsl`. Stage specific sources are appended by the caller.
pub fn create_compatibility_shader(
    ctx: &Context,
    sources: &dyn SourceProvider,
    version: Version,
    stage: ShaderStage,
) -> Result<Shader> {
    let compatibility = sources.source("compatibility.glsl")?;

    let mut shader = Shader::new(ctx, version, stage)?;
    for marker in disabled_extensions(ctx.probe(), version) {
        shader.add_source(marker);
    }

    shader.add_source(compatibility);
    Ok(shader)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::video::capabilities::Capabilities;

    #[test]
    fn markers() {
        let caps = Capabilities::new(Version::GL(2, 1), &[]);
        assert_eq!(disabled_extensions(&caps, Version::GL(2, 1)).len(), 3);

        let caps = Capabilities::new(
            Version::GL(4, 1),
            &[
                Extension::ArbExplicitAttribLocation,
                Extension::ArbShadingLanguage420pack,
            ],
        );

        let markers = disabled_extensions(&caps, Version::GL(3, 2));
        assert_eq!(
            markers,
            vec!["#define DISABLE_GL_ARB_explicit_uniform_location\n"]
        );

        // Promoted to core on the context, usable by any version that meets the minimum.
        let caps = Capabilities::new(Version::GL(4, 6), &[]);
        assert!(disabled_extensions(&caps, Version::GL(3, 2)).is_empty());
    }

    #[test]
    fn es() {
        let caps = Capabilities::new(Version::ES(2, 0), &[]);
        assert!(disabled_extensions(&caps, Version::ES(2, 0)).is_empty());
    }
}
