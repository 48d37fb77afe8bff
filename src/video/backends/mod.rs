//! The backend of the shader layer, which should be responsible for only one thing:
//! forwarding shader, program and binding calls to the low-level video APIs.
//!
//! Every method maps onto one or two OpenGL entry points and none of them checks
//! compile or link status unless its name says so, which keeps submission non-blocking.

pub mod headless;

#[cfg(not(target_arch = "wasm32"))]
pub mod gl;

use super::uniform::UniformVariable;

pub type Result<T> = ::std::result::Result<T, failure::Error>;

/// The name of a shader, program, buffer or texture object.
pub type ObjectId = u32;

/// The value `glGetUniformBlockIndex` returns for an unknown block.
pub const INVALID_INDEX: u32 = 0xFFFF_FFFF;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Indexed buffer binding targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Uniform,
}

/// The result of a blocking status query of a shader or program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub success: bool,
    pub log: String,
}

pub trait Visitor {
    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<ObjectId>;

    /// Replaces the source of `shader` with the concatenation of `sources`.
    unsafe fn shader_source(&self, shader: ObjectId, sources: &[&str]) -> Result<()>;

    /// Submits the shader for compilation, without waiting for the result.
    unsafe fn compile_shader(&self, shader: ObjectId) -> Result<()>;

    /// Blocks until the compilation is done.
    unsafe fn compile_status(&self, shader: ObjectId) -> Result<Status>;

    unsafe fn delete_shader(&self, shader: ObjectId) -> Result<()>;

    unsafe fn create_program(&self) -> Result<ObjectId>;

    unsafe fn attach_shader(&self, program: ObjectId, shader: ObjectId) -> Result<()>;

    unsafe fn bind_attribute_location(
        &self,
        program: ObjectId,
        location: u32,
        name: &str,
    ) -> Result<()>;

    /// Submits the program for linking, without waiting for the result.
    unsafe fn link_program(&self, program: ObjectId) -> Result<()>;

    /// Blocks until the link is done.
    unsafe fn link_status(&self, program: ObjectId) -> Result<Status>;

    unsafe fn delete_program(&self, program: ObjectId) -> Result<()>;

    /// Returns `-1` if there is no active uniform named `name`.
    unsafe fn uniform_location(&self, program: ObjectId, name: &str) -> Result<i32>;

    /// Returns `INVALID_INDEX` if there is no active uniform block named `name`.
    unsafe fn uniform_block_index(&self, program: ObjectId, name: &str) -> Result<u32>;

    unsafe fn uniform_block_binding(&self, program: ObjectId, index: u32, binding: u32)
        -> Result<()>;

    unsafe fn set_uniform(
        &self,
        program: ObjectId,
        location: i32,
        variable: UniformVariable,
    ) -> Result<()>;

    /// Binds `buffer` to the indexed `target`, optionally restricted to the byte range
    /// `(offset, size)`.
    unsafe fn bind_buffer(
        &self,
        target: BufferTarget,
        index: u32,
        buffer: ObjectId,
        range: Option<(usize, usize)>,
    ) -> Result<()>;

    /// Binds a 2D texture to texture unit `unit`.
    unsafe fn bind_texture(&self, unit: u32, texture: ObjectId) -> Result<()>;
}
