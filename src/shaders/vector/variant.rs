use super::configuration::{Configuration, Flags};
use super::{MATERIAL_BUFFER_BINDING, VECTOR_TEXTURE_UNIT};
use crate::errors::*;
use crate::video::capabilities::{Extension, Probe};

/// A validated configuration, resolved to the preprocessor defines each stage is
/// compiled with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub dimensions: u32,
    pub flags: Flags,
    pub material_count: u32,
    pub draw_count: u32,
}

impl Variant {
    /// Checks `configuration` against the capabilities of the current context. Nothing
    /// is created on the device, so a rejected configuration leaves no objects behind.
    pub fn select(
        probe: &dyn Probe,
        dimensions: u32,
        configuration: &Configuration,
    ) -> Result<Variant> {
        let flags = configuration.flags();

        contract!(
            VECTOR_TEXTURE_UNIT < probe.max_combined_texture_image_units(),
            Error::Requirement(format!("{} texture units", VECTOR_TEXTURE_UNIT + 1))
        );

        if flags.contains(Flags::UNIFORM_BUFFERS) {
            contract!(
                configuration.material_count() != 0,
                Error::InvalidConfiguration("material count can't be zero".into())
            );

            contract!(
                configuration.draw_count() != 0,
                Error::InvalidConfiguration("draw count can't be zero".into())
            );

            let requirement = if probe.version().is_es() {
                "OpenGL ES 3.0"
            } else {
                Extension::ArbUniformBufferObject.name()
            };

            contract!(
                probe.has_uniform_buffers(),
                Error::Requirement(requirement.into())
            );

            contract!(
                MATERIAL_BUFFER_BINDING < probe.max_uniform_buffer_bindings(),
                Error::Requirement(format!(
                    "{} uniform buffer bindings",
                    MATERIAL_BUFFER_BINDING + 1
                ))
            );
        }

        if flags.contains(Flags::MULTI_DRAW) {
            let requirement = if probe.version().is_es() {
                Extension::AngleMultiDraw
            } else {
                Extension::ArbShaderDrawParameters
            };

            contract!(
                probe.has_multi_draw(),
                Error::Requirement(requirement.name().into())
            );
        }

        let variant = Variant {
            dimensions,
            flags,
            material_count: configuration.material_count(),
            draw_count: configuration.draw_count(),
        };

        debug!("Selected vector shader variant {:?}.", variant);
        Ok(variant)
    }

    #[inline]
    pub fn is_buffered(&self) -> bool {
        self.flags.contains(Flags::UNIFORM_BUFFERS)
    }

    pub fn vertex_defines(&self) -> Vec<String> {
        let mut defines = Vec::new();

        if self.flags.contains(Flags::TEXTURE_TRANSFORMATION) {
            defines.push("#define TEXTURE_TRANSFORMATION\n".to_owned());
        }

        if self.dimensions == 2 {
            defines.push("#define TWO_DIMENSIONS\n".to_owned());
        } else {
            defines.push("#define THREE_DIMENSIONS\n".to_owned());
        }

        if self.is_buffered() {
            defines.push(format!(
                "#define UNIFORM_BUFFERS\n#define DRAW_COUNT {}\n",
                self.draw_count
            ));

            if self.flags.contains(Flags::MULTI_DRAW) {
                defines.push("#define MULTI_DRAW\n".to_owned());
            }
        }

        defines
    }

    pub fn fragment_defines(&self) -> Vec<String> {
        let mut defines = Vec::new();

        if self.is_buffered() {
            defines.push(format!(
                "#define UNIFORM_BUFFERS\n#define DRAW_COUNT {}\n#define MATERIAL_COUNT {}\n",
                self.draw_count, self.material_count
            ));

            if self.flags.contains(Flags::MULTI_DRAW) {
                defines.push("#define MULTI_DRAW\n".to_owned());
            }
        }

        defines
    }
}
