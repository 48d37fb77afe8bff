//! Stock shaders and the machinery to assemble their sources.

pub mod compatibility;
pub mod resources;
pub mod vector;

pub use self::resources::{import_shader_resources, Resources, SourceProvider};
