use crate::math::prelude::{Color, Matrix3, Matrix4};

/// Uniform variable for video program object. Each matrix based `UniformVariable`
/// is assumed to be supplied in column major order, the way `cgmath` stores them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformVariable {
    I32(i32),
    U32(u32),
    Vector4f([f32; 4]),
    Matrix3f([[f32; 3]; 3]),
    Matrix4f([[f32; 4]; 4]),
}

impl Into<UniformVariable> for i32 {
    fn into(self) -> UniformVariable {
        UniformVariable::I32(self)
    }
}

impl Into<UniformVariable> for u32 {
    fn into(self) -> UniformVariable {
        UniformVariable::U32(self)
    }
}

impl Into<UniformVariable> for [f32; 4] {
    fn into(self) -> UniformVariable {
        UniformVariable::Vector4f(self)
    }
}

impl Into<UniformVariable> for Color<f32> {
    fn into(self) -> UniformVariable {
        UniformVariable::Vector4f(self.rgba())
    }
}

impl Into<UniformVariable> for Matrix3<f32> {
    fn into(self) -> UniformVariable {
        UniformVariable::Matrix3f(*self.as_ref())
    }
}

impl Into<UniformVariable> for Matrix4<f32> {
    fn into(self) -> UniformVariable {
        UniformVariable::Matrix4f(*self.as_ref())
    }
}

/// The location of a uniform variable inside a linked program. Writes to the
/// invalid location `-1` are silently ignored by OpenGL.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

impl UniformLocation {
    pub const INVALID: UniformLocation = UniformLocation(-1);

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}
