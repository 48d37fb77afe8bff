//! Shader and program objects.
//!
//! Both own their OpenGL object and release it when dropped. Compilation and linking are
//! submitted without querying any status; `Program::check_link` is the only blocking call.

use std::borrow::Cow;
use std::rc::Rc;

use smallvec::SmallVec;

use super::backends::{ObjectId, ShaderStage, Visitor, INVALID_INDEX};
use super::capabilities::Version;
use super::uniform::{UniformLocation, UniformVariable};
use super::Context;
use crate::errors::*;

pub struct Shader {
    visitor: Rc<dyn Visitor>,
    id: ObjectId,
    stage: ShaderStage,
    sources: SmallVec<[Cow<'static, str>; 8]>,
}

impl Shader {
    /// Creates a shader object whose first source is the `#version` directive of
    /// `version`.
    pub fn new(ctx: &Context, version: Version, stage: ShaderStage) -> Result<Self> {
        let visitor = ctx.visitor().clone();
        let id = unsafe { visitor.create_shader(stage)? };

        let mut shader = Shader {
            visitor,
            id,
            stage,
            sources: SmallVec::new(),
        };

        shader.add_source(version.glsl_directive());
        Ok(shader)
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|v| v.as_ref())
    }

    /// Appends a source. Empty sources are skipped.
    pub fn add_source<T>(&mut self, source: T) -> &mut Self
    where
        T: Into<Cow<'static, str>>,
    {
        let source = source.into();
        if !source.is_empty() {
            self.sources.push(source);
        }

        self
    }

    /// Uploads the accumulated sources and submits them for compilation. The driver is
    /// free to compile asynchronously until `check_compile` or `Program::check_link`.
    pub fn submit_compile(&mut self) -> Result<()> {
        let sources: SmallVec<[&str; 8]> = self.sources.iter().map(|v| v.as_ref()).collect();

        unsafe {
            self.visitor.shader_source(self.id, &sources)?;
            self.visitor.compile_shader(self.id)?;
        }

        debug!(
            "Submitted {:?} shader {} ({} sources).",
            self.stage,
            self.id,
            sources.len()
        );

        Ok(())
    }

    /// Blocks until the compilation finishes.
    pub fn check_compile(&self) -> Result<()> {
        let status = unsafe { self.visitor.compile_status(self.id)? };
        if !status.success {
            return Err(Error::ShaderCreationFailure(format!(
                "{:?} shader failed to compile with the following message:\n{}",
                self.stage, status.log
            )));
        }

        if !status.log.is_empty() {
            warn!(
                "{:?} shader compiled with the following message:\n{}",
                self.stage, status.log
            );
        }

        Ok(())
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            if let Err(err) = self.visitor.delete_shader(self.id) {
                warn!("Failed to delete shader {}, {}", self.id, err);
            }
        }
    }
}

pub struct Program {
    visitor: Rc<dyn Visitor>,
    id: ObjectId,
}

impl Program {
    pub fn new(ctx: &Context) -> Result<Self> {
        let visitor = ctx.visitor().clone();
        let id = unsafe { visitor.create_program()? };
        Ok(Program { visitor, id })
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[inline]
    pub fn visitor(&self) -> &dyn Visitor {
        self.visitor.as_ref()
    }

    pub fn attach_shaders(&mut self, shaders: &[&Shader]) -> Result<()> {
        for shader in shaders {
            unsafe { self.visitor.attach_shader(self.id, shader.id)? };
        }

        Ok(())
    }

    /// Must be called before linking.
    pub fn bind_attribute_location(&mut self, location: u32, name: &str) -> Result<()> {
        unsafe { self.visitor.bind_attribute_location(self.id, location, name)? };
        Ok(())
    }

    /// Submits the program for linking without waiting for the result.
    pub fn submit_link(&mut self) -> Result<()> {
        unsafe { self.visitor.link_program(self.id)? };
        Ok(())
    }

    /// Blocks until `shaders` are compiled and the program is linked. The messages of
    /// every failed stage are concatenated into the returned error.
    pub fn check_link(&self, shaders: &[&Shader]) -> Result<()> {
        let mut errors = Vec::new();
        for shader in shaders {
            if let Err(err) = shader.check_compile() {
                errors.push(match err {
                    Error::ShaderCreationFailure(v) => v,
                    v => format!("{}", v),
                });
            }
        }

        let status = unsafe { self.visitor.link_status(self.id)? };
        if !status.success {
            errors.push(format!(
                "Program failed to link with the following message:\n{}",
                status.log
            ));
        } else if !status.log.is_empty() {
            warn!(
                "Program {} linked with the following message:\n{}",
                self.id, status.log
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            let message = errors.join("\n");
            error!("{}", message);
            Err(Error::ShaderCreationFailure(message))
        }
    }

    /// Returns `UniformLocation::INVALID` if the uniform is not active in the program.
    pub fn uniform_location(&self, name: &str) -> Result<UniformLocation> {
        let location = unsafe { self.visitor.uniform_location(self.id, name)? };
        if location < 0 {
            warn!("Location of uniform '{}' cannot be retrieved.", name);
        }

        Ok(UniformLocation(location))
    }

    /// Returns `INVALID_INDEX` if the uniform block is not active in the program.
    pub fn uniform_block_index(&self, name: &str) -> Result<u32> {
        let index = unsafe { self.visitor.uniform_block_index(self.id, name)? };
        if index == INVALID_INDEX {
            warn!("Index of uniform block '{}' cannot be retrieved.", name);
        }

        Ok(index)
    }

    pub fn set_uniform_block_binding(&mut self, index: u32, binding: u32) -> Result<()> {
        unsafe { self.visitor.uniform_block_binding(self.id, index, binding)? };
        Ok(())
    }

    pub fn set_uniform<T>(&mut self, location: UniformLocation, value: T) -> Result<()>
    where
        T: Into<UniformVariable>,
    {
        unsafe { self.visitor.set_uniform(self.id, location.0, value.into())? };
        Ok(())
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe {
            if let Err(err) = self.visitor.delete_program(self.id) {
                warn!("Failed to delete program {}, {}", self.id, err);
            }
        }
    }
}
