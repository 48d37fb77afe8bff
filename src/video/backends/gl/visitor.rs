use std::cell::Cell;
use std::ffi::CString;
use std::os::raw::c_void;
use std::ptr;

use gl;
use gl::types::*;

use super::super::{BufferTarget, ObjectId, Result, ShaderStage, Status, Visitor};
use crate::video::uniform::UniformVariable;

impl From<ShaderStage> for GLenum {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl From<BufferTarget> for GLenum {
    fn from(target: BufferTarget) -> Self {
        match target {
            BufferTarget::Uniform => gl::UNIFORM_BUFFER,
        }
    }
}

/// Forwards calls to the OpenGL context that is current on this thread.
pub struct GLVisitor {
    binded_program: Cell<Option<GLuint>>,
    binded_texture_unit: Cell<Option<GLuint>>,
}

impl GLVisitor {
    /// Loads the OpenGL function pointers with `loader`.
    ///
    /// *Safety*: the loader must resolve symbols of the context that is current in the thread.
    pub unsafe fn load_with<F>(loader: F)
    where
        F: FnMut(&str) -> *const c_void,
    {
        gl::load_with(loader);
    }

    /// *Safety*: the OpenGL functions must have been loaded for the context that is
    /// current in the thread.
    pub unsafe fn new() -> Result<Self> {
        if !gl::CreateShader::is_loaded() || !gl::CreateProgram::is_loaded() {
            bail!("[GL] Shader object functions are not loaded.");
        }

        Ok(GLVisitor {
            binded_program: Cell::new(None),
            binded_texture_unit: Cell::new(None),
        })
    }

    unsafe fn bind_program(&self, id: GLuint) -> Result<()> {
        if self.binded_program.get() == Some(id) {
            return Ok(());
        }

        gl::UseProgram(id);
        check()?;

        self.binded_program.set(Some(id));
        Ok(())
    }
}

impl Visitor for GLVisitor {
    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<ObjectId> {
        let id = gl::CreateShader(stage.into());
        check()?;

        if id == 0 {
            bail!("[GL] Failed to create {:?} shader object.", stage);
        }

        Ok(id)
    }

    unsafe fn shader_source(&self, shader: ObjectId, sources: &[&str]) -> Result<()> {
        let sources = sources
            .iter()
            .map(|v| CString::new(v.as_bytes()))
            .collect::<::std::result::Result<Vec<_>, _>>()
            .map_err(|_| format_err!("[GL] Shader source contains a nul character."))?;

        let ptrs: Vec<*const GLchar> = sources.iter().map(|v| v.as_ptr()).collect();
        gl::ShaderSource(shader, ptrs.len() as GLsizei, ptrs.as_ptr(), ptr::null());
        check()
    }

    unsafe fn compile_shader(&self, shader: ObjectId) -> Result<()> {
        gl::CompileShader(shader);
        check()
    }

    unsafe fn compile_status(&self, shader: ObjectId) -> Result<Status> {
        let mut status = GLint::from(gl::FALSE);
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);

        let mut len = 0;
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        let log = info_log(len, |len, buf| {
            gl::GetShaderInfoLog(shader, len, ptr::null_mut(), buf)
        });

        check()?;
        Ok(Status {
            success: status == GLint::from(gl::TRUE),
            log,
        })
    }

    unsafe fn delete_shader(&self, shader: ObjectId) -> Result<()> {
        gl::DeleteShader(shader);
        check()
    }

    unsafe fn create_program(&self) -> Result<ObjectId> {
        let id = gl::CreateProgram();
        check()?;

        if id == 0 {
            bail!("[GL] Failed to create program object.");
        }

        Ok(id)
    }

    unsafe fn attach_shader(&self, program: ObjectId, shader: ObjectId) -> Result<()> {
        gl::AttachShader(program, shader);
        check()
    }

    unsafe fn bind_attribute_location(
        &self,
        program: ObjectId,
        location: u32,
        name: &str,
    ) -> Result<()> {
        let c_name = CString::new(name.as_bytes())?;
        gl::BindAttribLocation(program, location, c_name.as_ptr());
        check()
    }

    unsafe fn link_program(&self, program: ObjectId) -> Result<()> {
        gl::LinkProgram(program);
        check()
    }

    unsafe fn link_status(&self, program: ObjectId) -> Result<Status> {
        let mut status = GLint::from(gl::FALSE);
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);

        let mut len = 0;
        gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        let log = info_log(len, |len, buf| {
            gl::GetProgramInfoLog(program, len, ptr::null_mut(), buf)
        });

        check()?;
        Ok(Status {
            success: status == GLint::from(gl::TRUE),
            log,
        })
    }

    unsafe fn delete_program(&self, program: ObjectId) -> Result<()> {
        if self.binded_program.get() == Some(program) {
            self.binded_program.set(None);
        }

        gl::DeleteProgram(program);
        check()
    }

    unsafe fn uniform_location(&self, program: ObjectId, name: &str) -> Result<i32> {
        let c_name = CString::new(name.as_bytes())?;
        let location = gl::GetUniformLocation(program, c_name.as_ptr());
        check()?;
        Ok(location)
    }

    unsafe fn uniform_block_index(&self, program: ObjectId, name: &str) -> Result<u32> {
        let c_name = CString::new(name.as_bytes())?;
        let index = gl::GetUniformBlockIndex(program, c_name.as_ptr());
        check()?;
        Ok(index)
    }

    unsafe fn uniform_block_binding(
        &self,
        program: ObjectId,
        index: u32,
        binding: u32,
    ) -> Result<()> {
        gl::UniformBlockBinding(program, index, binding);
        check()
    }

    unsafe fn set_uniform(
        &self,
        program: ObjectId,
        location: i32,
        variable: UniformVariable,
    ) -> Result<()> {
        self.bind_program(program)?;

        match variable {
            UniformVariable::I32(v) => gl::Uniform1i(location, v),
            UniformVariable::U32(v) => gl::Uniform1ui(location, v),
            UniformVariable::Vector4f(v) => gl::Uniform4f(location, v[0], v[1], v[2], v[3]),
            UniformVariable::Matrix3f(v) => {
                gl::UniformMatrix3fv(location, 1, gl::FALSE, v[0].as_ptr())
            }
            UniformVariable::Matrix4f(v) => {
                gl::UniformMatrix4fv(location, 1, gl::FALSE, v[0].as_ptr())
            }
        }

        check()
    }

    unsafe fn bind_buffer(
        &self,
        target: BufferTarget,
        index: u32,
        buffer: ObjectId,
        range: Option<(usize, usize)>,
    ) -> Result<()> {
        match range {
            None => gl::BindBufferBase(target.into(), index, buffer),
            Some((offset, size)) => gl::BindBufferRange(
                target.into(),
                index,
                buffer,
                offset as GLintptr,
                size as GLsizeiptr,
            ),
        }

        check()
    }

    unsafe fn bind_texture(&self, unit: u32, texture: ObjectId) -> Result<()> {
        if self.binded_texture_unit.get() != Some(unit) {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            self.binded_texture_unit.set(Some(unit));
        }

        gl::BindTexture(gl::TEXTURE_2D, texture);
        check()
    }
}

unsafe fn info_log<F>(len: GLint, read: F) -> String
where
    F: FnOnce(GLsizei, *mut GLchar),
{
    // The reported length includes the trailing null character.
    if len <= 1 {
        return String::new();
    }

    let mut buf = vec![0u8; len as usize];
    read(len, buf.as_mut_ptr() as *mut GLchar);
    buf.truncate(len as usize - 1);
    String::from_utf8_lossy(&buf).trim_end().to_owned()
}

unsafe fn check() -> Result<()> {
    match gl::GetError() {
        gl::NO_ERROR => Ok(()),

        gl::INVALID_ENUM => {
            bail!("[GL] An unacceptable value is specified for an enumerated argument.")
        }

        gl::INVALID_VALUE => bail!("[GL] A numeric argument is out of range."),

        gl::INVALID_OPERATION => {
            bail!("[GL] The specified operation is not allowed in the current state.")
        }

        gl::OUT_OF_MEMORY => bail!("[GL] There is not enough memory left to execute the command."),
        _ => bail!("[GL] Oops, Unknown OpenGL error."),
    }
}
