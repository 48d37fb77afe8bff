pub mod visitor;

pub use self::visitor::GLVisitor;
