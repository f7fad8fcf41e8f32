//! alder_compiler: Per-program orchestration.
//!
//! A [`Program`] carries the options for one compilation unit and hands out
//! the analyzer and code generation session that the front end drives.
//! Every structure is created for one program and dropped with it.

mod error;
mod program;
mod session;

pub use error::CompileError;
pub use program::{codegen_diagnostic, CompilationResult, Program};
pub use session::{CodegenSession, CompiledImage};
