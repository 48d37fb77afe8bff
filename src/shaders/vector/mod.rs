//! The vector shader.
//!
//! Renders a single-channel vector texture, such as a glyph atlas or a signed distance
//! field, mixing a background and a foreground color by the sampled intensity. Both 2D
//! and 3D variants exist; the dimension count is a type parameter.
//!
//! Parameters are either written as individual uniforms, or read from uniform buffers
//! bound to fixed binding points when `Flags::UNIFORM_BUFFERS` is set. The binding points
//! start at 1, so a transformation/projection buffer shared with other shaders can stay
//! bound at 0.

pub mod configuration;
pub mod shader;
pub mod variant;

pub use self::configuration::{Configuration, Flags};
pub use self::shader::{CompileState, DirectLocations, DirectUniforms, Layout, VectorShader};
pub use self::variant::Variant;

use std::fmt::Debug;

use crate::errors::*;
use crate::math::prelude::{Matrix3, Matrix4, SquareMatrix};
use crate::video::uniform::{UniformLocation, UniformVariable};
use crate::video::Context;

pub const TRANSFORMATION_PROJECTION_BUFFER_BINDING: u32 = 1;
pub const DRAW_BUFFER_BINDING: u32 = 2;
pub const TEXTURE_TRANSFORMATION_BUFFER_BINDING: u32 = 3;
pub const MATERIAL_BUFFER_BINDING: u32 = 4;

/// The texture unit the vector texture is sampled from.
pub const VECTOR_TEXTURE_UNIT: u32 = 6;

pub const POSITION_ATTRIBUTE_LOCATION: u32 = 0;
pub const TEXTURE_COORDINATES_ATTRIBUTE_LOCATION: u32 = 1;

// Uniform locations of the variants compiled with explicit uniform locations.
pub const TRANSFORMATION_PROJECTION_MATRIX_LOCATION: UniformLocation = UniformLocation(0);
pub const TEXTURE_MATRIX_LOCATION: UniformLocation = UniformLocation(1);
pub const BACKGROUND_COLOR_LOCATION: UniformLocation = UniformLocation(2);
pub const COLOR_LOCATION: UniformLocation = UniformLocation(3);
pub const DRAW_OFFSET_LOCATION: UniformLocation = UniformLocation(0);

/// The dimension count of a vector shader.
pub trait Dimensions: 'static {
    const DIMENSIONS: u32;

    /// The transformation/projection matrix type.
    type Matrix: Copy + Debug + PartialEq + Into<UniformVariable>;

    fn identity() -> Self::Matrix;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TwoDimensions;

impl Dimensions for TwoDimensions {
    const DIMENSIONS: u32 = 2;
    type Matrix = Matrix3<f32>;

    fn identity() -> Self::Matrix {
        Matrix3::identity()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ThreeDimensions;

impl Dimensions for ThreeDimensions {
    const DIMENSIONS: u32 = 3;
    type Matrix = Matrix4<f32>;

    fn identity() -> Self::Matrix {
        Matrix4::identity()
    }
}

pub type VectorShader2D = VectorShader<TwoDimensions>;
pub type VectorShader3D = VectorShader<ThreeDimensions>;

/// Compiles a shader for each of `configurations`.
///
/// Every variant is submitted to the driver before the first one is linked, so the
/// driver can compile them in parallel. Fails on the first variant that can not be
/// created; the remaining objects are released.
pub fn compile_all<D: Dimensions>(
    ctx: &Context,
    configurations: &[Configuration],
) -> Result<Vec<VectorShader<D>>> {
    let states = configurations
        .iter()
        .map(|cfg| VectorShader::<D>::compile(ctx, cfg))
        .collect::<Result<Vec<_>>>()?;

    info!("Submitted {} vector shader variants.", states.len());

    states
        .into_iter()
        .map(VectorShader::from_compile_state)
        .collect()
}
