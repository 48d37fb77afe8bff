//! An in-memory device that never touches a driver.
//!
//! It hands out object names, keeps shader sources around and records every call, so
//! the shader layer can be exercised and inspected without an OpenGL context. Uniforms
//! and uniform blocks are reported as active if any attached shader source mentions
//! them, which is close enough to what a real linker does with the stock shaders.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{BufferTarget, ObjectId, Result, ShaderStage, Status, Visitor, INVALID_INDEX};
use crate::video::uniform::UniformVariable;

/// A single call issued to the `HeadlessVisitor`.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, ObjectId),
    ShaderSource(ObjectId),
    CompileShader(ObjectId),
    CompileStatus(ObjectId),
    DeleteShader(ObjectId),
    CreateProgram(ObjectId),
    AttachShader(ObjectId, ObjectId),
    BindAttributeLocation(ObjectId, u32, String),
    LinkProgram(ObjectId),
    LinkStatus(ObjectId),
    DeleteProgram(ObjectId),
    UniformLocation(ObjectId, String),
    UniformBlockIndex(ObjectId, String),
    UniformBlockBinding(ObjectId, u32, u32),
    SetUniform(ObjectId, i32, UniformVariable),
    BindBuffer(BufferTarget, u32, ObjectId, Option<(usize, usize)>),
    BindTexture(u32, ObjectId),
}

#[derive(Debug, Default)]
struct HeadlessProgram {
    shaders: Vec<ObjectId>,
    // Sources of the attached shaders, captured at link time.
    linked: String,
    uniforms: HashMap<String, i32>,
    blocks: HashMap<String, u32>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    next_id: ObjectId,
    calls: Vec<Call>,
    shaders: HashMap<ObjectId, String>,
    programs: HashMap<ObjectId, HeadlessProgram>,
    compile_error: Option<String>,
    link_error: Option<String>,
}

impl HeadlessState {
    fn allocate(&mut self) -> ObjectId {
        self.next_id += 1;
        self.next_id
    }

    fn mentions(&self, program: ObjectId, name: &str) -> bool {
        self.programs
            .get(&program)
            .map_or(false, |p| contains_identifier(&p.linked, name))
    }
}

#[derive(Debug, Default)]
pub struct HeadlessVisitor {
    state: RefCell<HeadlessState>,
}

impl HeadlessVisitor {
    pub fn new() -> Self {
        Default::default()
    }

    /// Makes every following compile status query fail with `log`.
    pub fn fail_compilation<T: Into<String>>(&self, log: T) {
        self.state.borrow_mut().compile_error = Some(log.into());
    }

    /// Makes every following link status query fail with `log`.
    pub fn fail_link<T: Into<String>>(&self, log: T) {
        self.state.borrow_mut().link_error = Some(log.into());
    }

    /// All the calls issued so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Counts the calls matching `filter`.
    pub fn count<F>(&self, filter: F) -> usize
    where
        F: Fn(&Call) -> bool,
    {
        self.state.borrow().calls.iter().filter(|v| filter(v)).count()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// The concatenated source of a live shader object.
    pub fn recorded_source(&self, shader: ObjectId) -> Option<String> {
        self.state.borrow().shaders.get(&shader).cloned()
    }

    /// The number of shader and program objects that have not been deleted yet.
    pub fn alive(&self) -> (usize, usize) {
        let state = self.state.borrow();
        (state.shaders.len(), state.programs.len())
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Visitor for HeadlessVisitor {
    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<ObjectId> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.shaders.insert(id, String::new());
        state.calls.push(Call::CreateShader(stage, id));
        Ok(id)
    }

    unsafe fn shader_source(&self, shader: ObjectId, sources: &[&str]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        match state.shaders.get_mut(&shader) {
            Some(v) => *v = sources.concat(),
            None => bail!("[GL] A numeric argument is out of range."),
        }

        state.calls.push(Call::ShaderSource(shader));
        Ok(())
    }

    unsafe fn compile_shader(&self, shader: ObjectId) -> Result<()> {
        self.record(Call::CompileShader(shader));
        Ok(())
    }

    unsafe fn compile_status(&self, shader: ObjectId) -> Result<Status> {
        self.record(Call::CompileStatus(shader));
        let state = self.state.borrow();
        Ok(match state.compile_error {
            Some(ref log) => Status {
                success: false,
                log: log.clone(),
            },
            None => Status {
                success: true,
                log: String::new(),
            },
        })
    }

    unsafe fn delete_shader(&self, shader: ObjectId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.shaders.remove(&shader);
        state.calls.push(Call::DeleteShader(shader));
        Ok(())
    }

    unsafe fn create_program(&self) -> Result<ObjectId> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.programs.insert(id, HeadlessProgram::default());
        state.calls.push(Call::CreateProgram(id));
        Ok(id)
    }

    unsafe fn attach_shader(&self, program: ObjectId, shader: ObjectId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        match state.programs.get_mut(&program) {
            Some(v) => v.shaders.push(shader),
            None => bail!("[GL] A numeric argument is out of range."),
        }

        state.calls.push(Call::AttachShader(program, shader));
        Ok(())
    }

    unsafe fn bind_attribute_location(
        &self,
        program: ObjectId,
        location: u32,
        name: &str,
    ) -> Result<()> {
        self.record(Call::BindAttributeLocation(program, location, name.into()));
        Ok(())
    }

    unsafe fn link_program(&self, program: ObjectId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let linked = match state.programs.get(&program) {
            Some(v) => v
                .shaders
                .iter()
                .filter_map(|s| state.shaders.get(s))
                .fold(String::new(), |acc, v| acc + v.as_str()),
            None => bail!("[GL] A numeric argument is out of range."),
        };

        if let Some(v) = state.programs.get_mut(&program) {
            v.linked = linked;
        }

        state.calls.push(Call::LinkProgram(program));
        Ok(())
    }

    unsafe fn link_status(&self, program: ObjectId) -> Result<Status> {
        self.record(Call::LinkStatus(program));
        let state = self.state.borrow();
        Ok(match state.link_error {
            Some(ref log) => Status {
                success: false,
                log: log.clone(),
            },
            None => Status {
                success: true,
                log: String::new(),
            },
        })
    }

    unsafe fn delete_program(&self, program: ObjectId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        state.calls.push(Call::DeleteProgram(program));
        Ok(())
    }

    unsafe fn uniform_location(&self, program: ObjectId, name: &str) -> Result<i32> {
        let mut state = self.state.borrow_mut();
        state
            .calls
            .push(Call::UniformLocation(program, name.to_owned()));

        if !state.mentions(program, name) {
            return Ok(-1);
        }

        let uniforms = &mut state
            .programs
            .get_mut(&program)
            .ok_or_else(|| format_err!("[GL] A numeric argument is out of range."))?
            .uniforms;

        let next = uniforms.len() as i32;
        Ok(*uniforms.entry(name.to_owned()).or_insert(next))
    }

    unsafe fn uniform_block_index(&self, program: ObjectId, name: &str) -> Result<u32> {
        let mut state = self.state.borrow_mut();
        state
            .calls
            .push(Call::UniformBlockIndex(program, name.to_owned()));

        if !state.mentions(program, name) {
            return Ok(INVALID_INDEX);
        }

        let blocks = &mut state
            .programs
            .get_mut(&program)
            .ok_or_else(|| format_err!("[GL] A numeric argument is out of range."))?
            .blocks;

        let next = blocks.len() as u32;
        Ok(*blocks.entry(name.to_owned()).or_insert(next))
    }

    unsafe fn uniform_block_binding(
        &self,
        program: ObjectId,
        index: u32,
        binding: u32,
    ) -> Result<()> {
        self.record(Call::UniformBlockBinding(program, index, binding));
        Ok(())
    }

    unsafe fn set_uniform(
        &self,
        program: ObjectId,
        location: i32,
        variable: UniformVariable,
    ) -> Result<()> {
        self.record(Call::SetUniform(program, location, variable));
        Ok(())
    }

    unsafe fn bind_buffer(
        &self,
        target: BufferTarget,
        index: u32,
        buffer: ObjectId,
        range: Option<(usize, usize)>,
    ) -> Result<()> {
        self.record(Call::BindBuffer(target, index, buffer, range));
        Ok(())
    }

    unsafe fn bind_texture(&self, unit: u32, texture: ObjectId) -> Result<()> {
        self.record(Call::BindTexture(unit, texture));
        Ok(())
    }
}

fn contains_identifier(source: &str, name: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    source.match_indices(name).any(|(i, _)| {
        let before = source[..i].chars().next_back();
        let after = source[i + name.len()..].chars().next();
        !before.map_or(false, is_ident) && !after.map_or(false, is_ident)
    })
}
