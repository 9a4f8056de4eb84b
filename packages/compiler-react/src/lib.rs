//! React source generation for widget lists.
//!
//! The output is the fixed module layout the parser reads back: imports, one
//! component returning a container `div`, and a default export.

mod compiler;
mod context;

pub use compiler::{compile_to_react, generate};
pub use context::{CompileOptions, CompilerContext};
