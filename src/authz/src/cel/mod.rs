//! CEL (Common Expression Language) conditions
//!
//! Expressions are compiled once and evaluated against the request's
//! attribute bag, exposed to the expression as `attributes` (alias `A`).

mod compiler;
mod condition;
mod convert;

pub use compiler::CelCompiler;
pub use condition::CelCondition;
