use std::fmt;
use std::marker::PhantomData;

use super::configuration::{Configuration, Flags};
use super::variant::Variant;
use super::*;
use crate::errors::*;
use crate::math::prelude::{Color, Matrix3, SquareMatrix};
use crate::shaders::compatibility::create_compatibility_shader;
use crate::shaders::resources::{Resources, SourceProvider};
use crate::video::backends::{BufferTarget, ShaderStage, INVALID_INDEX};
use crate::video::buffer::{Buffer, Texture2D};
use crate::video::capabilities::Version;
use crate::video::shader::{Program, Shader};
use crate::video::uniform::UniformLocation;
use crate::video::Context;

/// A vector shader whose stages have been submitted for compilation and whose program
/// has been submitted for linking, but which has not been checked yet.
///
/// Consumed by `VectorShader::from_compile_state`. Dropping it releases the shader and
/// program objects.
pub struct CompileState<D: Dimensions> {
    program: Program,
    vert: Shader,
    frag: Shader,
    version: Version,
    variant: Variant,
    configuration: Configuration,
    explicit_uniform_location: bool,
    explicit_binding: bool,
    _dimensions: PhantomData<D>,
}

impl<D: Dimensions> CompileState<D> {
    /// The version the sources were written against.
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    #[inline]
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    #[inline]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }
}

impl<D: Dimensions> fmt::Debug for CompileState<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CompileState")
            .field("program", &self.program.id())
            .field("version", &self.version)
            .field("variant", &self.variant)
            .finish()
    }
}

/// Locations of the individual uniforms.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DirectLocations {
    pub transformation_projection_matrix: UniformLocation,
    /// `UniformLocation::INVALID` without `Flags::TEXTURE_TRANSFORMATION`.
    pub texture_matrix: UniformLocation,
    pub background_color: UniformLocation,
    pub color: UniformLocation,
}

impl DirectLocations {
    fn explicit(flags: Flags) -> Self {
        DirectLocations {
            transformation_projection_matrix: TRANSFORMATION_PROJECTION_MATRIX_LOCATION,
            texture_matrix: if flags.contains(Flags::TEXTURE_TRANSFORMATION) {
                TEXTURE_MATRIX_LOCATION
            } else {
                UniformLocation::INVALID
            },
            background_color: BACKGROUND_COLOR_LOCATION,
            color: COLOR_LOCATION,
        }
    }

    fn query(program: &Program, flags: Flags) -> Result<Self> {
        let texture_matrix = if flags.contains(Flags::TEXTURE_TRANSFORMATION) {
            program.uniform_location("textureMatrix")?
        } else {
            UniformLocation::INVALID
        };

        Ok(DirectLocations {
            transformation_projection_matrix: program
                .uniform_location("transformationProjectionMatrix")?,
            texture_matrix,
            background_color: program.uniform_location("backgroundColor")?,
            color: program.uniform_location("color")?,
        })
    }
}

/// The values last written to the individual uniforms.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectUniforms<M> {
    pub transformation_projection_matrix: M,
    pub texture_matrix: Matrix3<f32>,
    pub background_color: Color<f32>,
    pub color: Color<f32>,
}

/// How a linked program receives its parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Layout<M> {
    /// Individual uniforms.
    Direct {
        locations: DirectLocations,
        values: DirectUniforms<M>,
    },
    /// Uniform buffers at the fixed binding points. The draw offset location is
    /// `UniformLocation::INVALID` unless there is more than one draw.
    Buffered { draw_offset: UniformLocation },
}

/// A linked vector shader.
pub struct VectorShader<D: Dimensions> {
    program: Program,
    configuration: Configuration,
    layout: Layout<D::Matrix>,
}

impl<D: Dimensions> fmt::Debug for VectorShader<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("VectorShader")
            .field("dimensions", &D::DIMENSIONS)
            .field("program", &self.program.id())
            .field("configuration", &self.configuration)
            .field("layout", &self.layout)
            .finish()
    }
}

impl<D: Dimensions> VectorShader<D> {
    /// Selects the variant, assembles the sources and submits the compilation and the
    /// link to the driver without waiting for either.
    pub fn compile(ctx: &Context, configuration: &Configuration) -> Result<CompileState<D>> {
        let probe = ctx.probe();
        let variant = Variant::select(probe, D::DIMENSIONS, configuration)?;

        let builtin;
        let sources: &dyn SourceProvider = match ctx.sources() {
            Some(v) => v.as_ref(),
            None => {
                builtin = Resources::builtin();
                &builtin
            }
        };

        let generic = sources.source("generic.glsl")?;
        let vert_source = sources.source("Vector.vert")?;
        let frag_source = sources.source("Vector.frag")?;

        let version = probe.supported_version(probe.version().preferences());

        let mut vert = create_compatibility_shader(ctx, sources, version, ShaderStage::Vertex)?;
        for define in variant.vertex_defines() {
            vert.add_source(define);
        }
        vert.add_source(generic.clone()).add_source(vert_source);

        let mut frag = create_compatibility_shader(ctx, sources, version, ShaderStage::Fragment)?;
        for define in variant.fragment_defines() {
            frag.add_source(define);
        }
        frag.add_source(generic).add_source(frag_source);

        vert.submit_compile()?;
        frag.submit_compile()?;

        let mut program = Program::new(ctx)?;
        program.attach_shaders(&[&vert, &frag])?;

        if !probe.has_explicit_attrib_location(version) {
            program.bind_attribute_location(POSITION_ATTRIBUTE_LOCATION, "position")?;
            program.bind_attribute_location(
                TEXTURE_COORDINATES_ATTRIBUTE_LOCATION,
                "textureCoordinates",
            )?;
        }

        program.submit_link()?;

        Ok(CompileState {
            program,
            vert,
            frag,
            version,
            variant,
            configuration: *configuration,
            explicit_uniform_location: probe.has_explicit_uniform_location(version),
            explicit_binding: probe.has_explicit_binding(version),
            _dimensions: PhantomData,
        })
    }

    /// `compile` with the default configuration.
    pub fn compile_default(ctx: &Context) -> Result<CompileState<D>> {
        Self::compile(ctx, &Configuration::default())
    }

    /// Waits for the compilation and the link of `state`, then resolves the uniform
    /// locations and binding points the sources could not fix themselves.
    pub fn from_compile_state(state: CompileState<D>) -> Result<Self> {
        let CompileState {
            mut program,
            vert,
            frag,
            version,
            variant,
            configuration,
            explicit_uniform_location,
            explicit_binding,
            ..
        } = state;

        program.check_link(&[&vert, &frag])?;
        drop(vert);
        drop(frag);

        let flags = configuration.flags();
        let layout = if variant.is_buffered() {
            let draw_offset = if configuration.draw_count() <= 1 {
                UniformLocation::INVALID
            } else if explicit_uniform_location {
                DRAW_OFFSET_LOCATION
            } else {
                program.uniform_location("drawOffset")?
            };

            Layout::Buffered { draw_offset }
        } else {
            let locations = if explicit_uniform_location {
                DirectLocations::explicit(flags)
            } else {
                DirectLocations::query(&program, flags)?
            };

            Layout::Direct {
                locations,
                values: DirectUniforms {
                    transformation_projection_matrix: D::identity(),
                    texture_matrix: Matrix3::identity(),
                    background_color: Color::transparent(),
                    color: Color::white(),
                },
            }
        };

        if !explicit_binding {
            let sampler = program.uniform_location("vectorTexture")?;
            program.set_uniform(sampler, VECTOR_TEXTURE_UNIT as i32)?;

            if variant.is_buffered() {
                let mut blocks = vec![
                    (
                        "TransformationProjection",
                        TRANSFORMATION_PROJECTION_BUFFER_BINDING,
                    ),
                    ("Draw", DRAW_BUFFER_BINDING),
                ];

                if flags.contains(Flags::TEXTURE_TRANSFORMATION) {
                    blocks.push((
                        "TextureTransformation",
                        TEXTURE_TRANSFORMATION_BUFFER_BINDING,
                    ));
                }

                blocks.push(("Material", MATERIAL_BUFFER_BINDING));

                for (name, binding) in blocks {
                    let index = program.uniform_block_index(name)?;
                    if index != INVALID_INDEX {
                        program.set_uniform_block_binding(index, binding)?;
                    }
                }
            }
        }

        let mut shader = VectorShader {
            program,
            configuration,
            layout,
        };

        // OpenGL ES has no uniform initializers, so the defaults are written by hand.
        if version.is_es() && !variant.is_buffered() {
            shader.set_transformation_projection_matrix(D::identity())?;
            if flags.contains(Flags::TEXTURE_TRANSFORMATION) {
                shader.set_texture_matrix(Matrix3::identity())?;
            }
            shader.set_color(Color::white())?;
        }

        info!(
            "Created {}D vector shader {} ({}, {} materials, {} draws) against {}.",
            D::DIMENSIONS,
            shader.program.id(),
            flags,
            configuration.material_count(),
            configuration.draw_count(),
            version
        );

        Ok(shader)
    }

    /// Compiles and links a shader with the default configuration.
    pub fn new(ctx: &Context) -> Result<Self> {
        Self::with_configuration(ctx, &Configuration::default())
    }

    /// Compiles and links a shader right away. Use `compile` and `from_compile_state`
    /// to overlap the compilation of several shaders.
    pub fn with_configuration(ctx: &Context, configuration: &Configuration) -> Result<Self> {
        Self::from_compile_state(Self::compile(ctx, configuration)?)
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        self.configuration.flags()
    }

    #[inline]
    pub fn material_count(&self) -> u32 {
        self.configuration.material_count()
    }

    #[inline]
    pub fn draw_count(&self) -> u32 {
        self.configuration.draw_count()
    }

    #[inline]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    #[inline]
    pub fn layout(&self) -> &Layout<D::Matrix> {
        &self.layout
    }

    /// The values last written to the individual uniforms, `None` with uniform buffers.
    pub fn uniforms(&self) -> Option<&DirectUniforms<D::Matrix>> {
        match self.layout {
            Layout::Direct { ref values, .. } => Some(values),
            Layout::Buffered { .. } => None,
        }
    }

    #[inline]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Sets the transformation/projection matrix. Identity by default.
    pub fn set_transformation_projection_matrix(
        &mut self,
        matrix: D::Matrix,
    ) -> Result<&mut Self> {
        let (program, locations, values) =
            self.direct("VectorShader::set_transformation_projection_matrix()")?;

        program.set_uniform(locations.transformation_projection_matrix, matrix)?;
        values.transformation_projection_matrix = matrix;
        Ok(self)
    }

    /// Sets the texture coordinate transformation matrix. Identity by default.
    pub fn set_texture_matrix(&mut self, matrix: Matrix3<f32>) -> Result<&mut Self> {
        let operation = "VectorShader::set_texture_matrix()";
        let flags = self.flags();
        let (program, locations, values) = self.direct(operation)?;

        contract!(
            flags.contains(Flags::TEXTURE_TRANSFORMATION),
            Error::TextureTransformationDisabled(operation)
        );

        program.set_uniform(locations.texture_matrix, matrix)?;
        values.texture_matrix = matrix;
        Ok(self)
    }

    /// Sets the color where the vector texture is zero. Transparent by default.
    pub fn set_background_color(&mut self, color: Color<f32>) -> Result<&mut Self> {
        let (program, locations, values) = self.direct("VectorShader::set_background_color()")?;

        program.set_uniform(locations.background_color, color)?;
        values.background_color = color;
        Ok(self)
    }

    /// Sets the color where the vector texture is one. Opaque white by default.
    pub fn set_color(&mut self, color: Color<f32>) -> Result<&mut Self> {
        let (program, locations, values) = self.direct("VectorShader::set_color()")?;

        program.set_uniform(locations.color, color)?;
        values.color = color;
        Ok(self)
    }

    /// Selects which draw of the bound uniform buffers the next draw call reads. With
    /// `Flags::MULTI_DRAW` the offset is added to the draw ID. Zero by default.
    pub fn set_draw_offset(&mut self, offset: u32) -> Result<&mut Self> {
        let location = match self.layout {
            Layout::Buffered { draw_offset } => draw_offset,
            Layout::Direct { .. } => {
                return violation(Error::UniformBuffersDisabled(
                    "VectorShader::set_draw_offset()",
                ));
            }
        };

        let draw_count = self.draw_count();
        contract!(
            offset < draw_count,
            Error::DrawOffsetOutOfBounds { offset, draw_count }
        );

        // With a single draw the uniform is compiled out.
        if draw_count > 1 {
            self.program.set_uniform(location, offset)?;
        }

        Ok(self)
    }

    /// Binds an array of `draw_count` transformation/projection matrices.
    pub fn bind_transformation_projection_buffer(&mut self, buffer: &Buffer) -> Result<&mut Self> {
        self.bind_buffer(
            "VectorShader::bind_transformation_projection_buffer()",
            TRANSFORMATION_PROJECTION_BUFFER_BINDING,
            buffer,
            None,
        )
    }

    pub fn bind_transformation_projection_buffer_range(
        &mut self,
        buffer: &Buffer,
        offset: usize,
        size: usize,
    ) -> Result<&mut Self> {
        self.bind_buffer(
            "VectorShader::bind_transformation_projection_buffer_range()",
            TRANSFORMATION_PROJECTION_BUFFER_BINDING,
            buffer,
            Some((offset, size)),
        )
    }

    /// Binds an array of `draw_count` per-draw records.
    pub fn bind_draw_buffer(&mut self, buffer: &Buffer) -> Result<&mut Self> {
        self.bind_buffer(
            "VectorShader::bind_draw_buffer()",
            DRAW_BUFFER_BINDING,
            buffer,
            None,
        )
    }

    pub fn bind_draw_buffer_range(
        &mut self,
        buffer: &Buffer,
        offset: usize,
        size: usize,
    ) -> Result<&mut Self> {
        self.bind_buffer(
            "VectorShader::bind_draw_buffer_range()",
            DRAW_BUFFER_BINDING,
            buffer,
            Some((offset, size)),
        )
    }

    /// Binds an array of `draw_count` texture matrices.
    pub fn bind_texture_transformation_buffer(&mut self, buffer: &Buffer) -> Result<&mut Self> {
        let operation = "VectorShader::bind_texture_transformation_buffer()";
        self.check_texture_transformation(operation)?;
        self.bind_buffer(
            operation,
            TEXTURE_TRANSFORMATION_BUFFER_BINDING,
            buffer,
            None,
        )
    }

    pub fn bind_texture_transformation_buffer_range(
        &mut self,
        buffer: &Buffer,
        offset: usize,
        size: usize,
    ) -> Result<&mut Self> {
        let operation = "VectorShader::bind_texture_transformation_buffer_range()";
        self.check_texture_transformation(operation)?;
        self.bind_buffer(
            operation,
            TEXTURE_TRANSFORMATION_BUFFER_BINDING,
            buffer,
            Some((offset, size)),
        )
    }

    /// Binds an array of `material_count` material records.
    pub fn bind_material_buffer(&mut self, buffer: &Buffer) -> Result<&mut Self> {
        self.bind_buffer(
            "VectorShader::bind_material_buffer()",
            MATERIAL_BUFFER_BINDING,
            buffer,
            None,
        )
    }

    pub fn bind_material_buffer_range(
        &mut self,
        buffer: &Buffer,
        offset: usize,
        size: usize,
    ) -> Result<&mut Self> {
        self.bind_buffer(
            "VectorShader::bind_material_buffer_range()",
            MATERIAL_BUFFER_BINDING,
            buffer,
            Some((offset, size)),
        )
    }

    /// Binds the vector texture to `VECTOR_TEXTURE_UNIT`.
    pub fn bind_vector_texture(&mut self, texture: &Texture2D) -> Result<&mut Self> {
        texture.bind(self.program.visitor(), VECTOR_TEXTURE_UNIT)?;
        Ok(self)
    }

    fn direct(
        &mut self,
        operation: &'static str,
    ) -> Result<(
        &mut Program,
        &DirectLocations,
        &mut DirectUniforms<D::Matrix>,
    )> {
        match self.layout {
            Layout::Direct {
                ref locations,
                ref mut values,
            } => Ok((&mut self.program, locations, values)),
            Layout::Buffered { .. } => violation(Error::UniformBuffersEnabled(operation)),
        }
    }

    fn check_uniform_buffers(&self, operation: &'static str) -> Result<()> {
        contract!(
            self.flags().contains(Flags::UNIFORM_BUFFERS),
            Error::UniformBuffersDisabled(operation)
        );

        Ok(())
    }

    fn check_texture_transformation(&self, operation: &'static str) -> Result<()> {
        self.check_uniform_buffers(operation)?;
        contract!(
            self.flags().contains(Flags::TEXTURE_TRANSFORMATION),
            Error::TextureTransformationDisabled(operation)
        );

        Ok(())
    }

    fn bind_buffer(
        &mut self,
        operation: &'static str,
        binding: u32,
        buffer: &Buffer,
        range: Option<(usize, usize)>,
    ) -> Result<&mut Self> {
        self.check_uniform_buffers(operation)?;

        let visitor = self.program.visitor();
        match range {
            None => buffer.bind(visitor, BufferTarget::Uniform, binding)?,
            Some((offset, size)) => {
                buffer.bind_range(visitor, BufferTarget::Uniform, binding, offset, size)?
            }
        }

        Ok(self)
    }
}
