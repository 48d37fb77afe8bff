//! Math types of the shader parameters. Matrices come from `cgmath`.

pub mod color;
pub use self::color::Color;

pub mod prelude {
    pub use super::color::Color;
    pub use cgmath::{Matrix3, Matrix4, SquareMatrix};
}
