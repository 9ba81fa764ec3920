#![doc = include_str!("../README.md")]

use tracing::instrument;

mod compiler;
mod result;

pub use compiler::*;
pub use result::*;

/// Compiles a single source with the default [BuildOptions].
///
/// Never fails, fatal errors end up in [CompileResult::errors].
#[instrument(skip_all, fields(len = source.len()))]
pub fn compile(source: &str) -> CompileResult {
    compiler::compile_with(source, BuildOptions::default())
}
