//! Handles of buffer and texture objects that are created and filled elsewhere.
//!
//! Neither handle owns its object, only the name is kept so it can be attached to the
//! binding points the shaders expect.

use super::backends::{BufferTarget, ObjectId, Visitor};
use crate::errors::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Buffer {
    id: ObjectId,
}

impl Buffer {
    #[inline]
    pub fn from_raw(id: ObjectId) -> Self {
        Buffer { id }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Binds the whole buffer to the indexed binding point `index` of `target`.
    pub fn bind(&self, visitor: &dyn Visitor, target: BufferTarget, index: u32) -> Result<()> {
        unsafe { visitor.bind_buffer(target, index, self.id, None)? };
        Ok(())
    }

    /// Binds `size` bytes starting at `offset` to the indexed binding point `index`
    /// of `target`.
    pub fn bind_range(
        &self,
        visitor: &dyn Visitor,
        target: BufferTarget,
        index: u32,
        offset: usize,
        size: usize,
    ) -> Result<()> {
        unsafe { visitor.bind_buffer(target, index, self.id, Some((offset, size)))? };
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Texture2D {
    id: ObjectId,
}

impl Texture2D {
    #[inline]
    pub fn from_raw(id: ObjectId) -> Self {
        Texture2D { id }
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn bind(&self, visitor: &dyn Visitor, unit: u32) -> Result<()> {
        unsafe { visitor.bind_texture(unit, self.id)? };
        Ok(())
    }
}
