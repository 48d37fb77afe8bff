//! The video layer: capability probing, the device abstraction and thin owning
//! wrappers around shader and program objects.
//!
//! Everything that talks to the driver goes through a `Context`, which bundles the
//! device, the capability probe and the source provider the shaders are assembled from.

pub mod backends;
pub mod buffer;
pub mod capabilities;
pub mod shader;
pub mod uniform;

pub mod prelude {
    pub use super::backends::headless::HeadlessVisitor;
    pub use super::backends::{BufferTarget, ShaderStage, Visitor};
    pub use super::buffer::{Buffer, Texture2D};
    pub use super::capabilities::{Capabilities, Extension, Probe, Version};
    pub use super::shader::{Program, Shader};
    pub use super::uniform::{UniformLocation, UniformVariable};
    pub use super::Context;
}

use std::fmt;
use std::rc::Rc;

use self::backends::headless::HeadlessVisitor;
use self::backends::Visitor;
use self::capabilities::{Capabilities, Probe};
use crate::errors::*;
use crate::shaders::resources::SourceProvider;

/// The handles shared by every object created on one OpenGL context.
///
/// Cloning is cheap. A `Context` is bound to the thread its OpenGL context is current on.
#[derive(Clone)]
pub struct Context {
    visitor: Rc<dyn Visitor>,
    probe: Rc<dyn Probe>,
    sources: Option<Rc<dyn SourceProvider>>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("version", &self.probe.version())
            .field("sources", &self.sources.is_some())
            .finish()
    }
}

impl Context {
    /// Creates a context which assembles shaders from the built-in sources.
    pub fn new(visitor: Rc<dyn Visitor>, probe: Rc<dyn Probe>) -> Self {
        Context {
            visitor,
            probe,
            sources: None,
        }
    }

    /// Creates a context on the OpenGL context that is current in this thread.
    ///
    /// *Safety*: `loader` must resolve the symbols of the context that is current in the
    /// thread, and that context must stay current while any object created from the
    /// returned `Context` is alive.
    #[cfg(not(target_arch = "wasm32"))]
    pub unsafe fn gl<F>(loader: F) -> Result<Self>
    where
        F: FnMut(&str) -> *const ::std::os::raw::c_void,
    {
        use self::backends::gl::GLVisitor;

        GLVisitor::load_with(loader);

        let capabilities = Capabilities::parse()?;
        info!("Detected capabilities:\n{:#?}", capabilities);
        capabilities.validate()?;

        let visitor = GLVisitor::new()?;
        Ok(Context::new(Rc::new(visitor), Rc::new(capabilities)))
    }

    /// Creates a context on a `HeadlessVisitor` which pretends to have `capabilities`.
    /// The device is returned as well so its calls can be inspected.
    pub fn headless(capabilities: Capabilities) -> (Self, Rc<HeadlessVisitor>) {
        let visitor = Rc::new(HeadlessVisitor::new());
        let ctx = Context::new(visitor.clone(), Rc::new(capabilities));
        (ctx, visitor)
    }

    /// Replaces the provider shader sources are read from.
    pub fn with_sources(mut self, sources: Rc<dyn SourceProvider>) -> Self {
        self.sources = Some(sources);
        self
    }

    #[inline]
    pub fn visitor(&self) -> &Rc<dyn Visitor> {
        &self.visitor
    }

    #[inline]
    pub fn probe(&self) -> &dyn Probe {
        self.probe.as_ref()
    }

    /// The custom source provider, `None` if the built-in sources are used.
    #[inline]
    pub fn sources(&self) -> Option<&Rc<dyn SourceProvider>> {
        self.sources.as_ref()
    }
}
