//! # Crayon Vector
//!
//! A shader-variant compiler and uniform binder for the `vector` shader, a 2D/3D program
//! that renders a single-channel vector texture with a foreground and a background color.
//!
//! A `Configuration` picks one of several source variants. Depending on the flags, the
//! program is fed either with individual uniform writes (the direct path) or through
//! uniform buffer blocks (the buffered path), which also enables multi-draw batching.
//!
//! Compilation is split into two stages so that many variants can be submitted to the
//! driver back-to-back before any of them blocks on link status:
//!
//! ```rust,ignore
//! let ctx = unsafe { Context::gl(|s| window.get_proc_address(s) as *const _)? };
//!
//! let flat = VectorShader2D::compile(&ctx, &Configuration::default())?;
//! let batched = VectorShader2D::compile(
//!     &ctx,
//!     &Configuration::default()
//!         .with_flags(Flags::UNIFORM_BUFFERS)
//!         .with_draw_count(16),
//! )?;
//!
//! let mut flat = VectorShader2D::from_compile_state(flat)?;
//! let mut batched = VectorShader2D::from_compile_state(batched)?;
//! flat.set_color(Color::red())?;
//! batched.set_draw_offset(3)?;
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate bitflags;

pub extern crate cgmath;

#[macro_use]
pub mod errors;
pub mod math;
pub mod shaders;
pub mod video;

pub mod prelude {
    pub use crate::errors::{Error, Result};
    pub use crate::math::prelude::*;
    pub use crate::shaders::vector::{
        compile_all, CompileState, Configuration, Dimensions, Flags, ThreeDimensions,
        TwoDimensions, VectorShader, VectorShader2D, VectorShader3D,
    };
    pub use crate::video::prelude::*;
}
