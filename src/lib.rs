//! **shader-layout-prepper** reads GLSL shaders the way an offline shader packager needs them:
//! includes inlined, a practical subset of the C preprocessor applied, and Vulkan-style
//! `layout(...)` qualifiers reflected into binding metadata.
//!
//! Only object-like macros are supported. Conditionals understand `#ifdef`, `#ifndef`,
//! `#if`/`#elif` with `[!]defined(NAME)` or plain `+ - * /` arithmetic, `#else` and `#endif`.
//! Other directives (`#version`, `#extension`, `#pragma`) are copied into the output,
//! so they can be subsequently handled by the shader compiler.
//!
//! The API supports user-driven include file providers, which enable custom
//! virtual file systems and allow build systems to track dependencies.
//!
//! # Example
//!
//! ```no_run
//! let shader = shader_layout_prepper::ShaderSource::parse("shaders/mesh.vert", "-DSKINNED")?;
//!
//! for layout in shader.layouts() {
//!     println!("{} at location {}", layout.full_name(), layout.location);
//! }
//! # Ok::<(), shader_layout_prepper::PrepperError>(())
//! ```

mod defines;
mod error;
pub mod expression;
mod include_provider;
mod layout;
mod preprocessor;
pub mod reflect;
mod scanner;
mod shader;
mod source_chunk;

#[cfg(test)]
mod tests;

use std::collections::HashSet;

pub use defines::*;
pub use error::*;
pub use expression::ExpressionError;
pub use include_provider::*;
pub use layout::*;
pub use preprocessor::Preprocessor;
pub use shader::*;
pub use source_chunk::*;

use scanner::Scanner;

/// Process a single file, and then any code recursively referenced.
///
/// `include_provider` is used to read all of the files, including the one at `file_path`.
/// Only include resolution happens here; see `ShaderSource::parse` for the full pipeline.
pub fn process_file(
    file_path: &str,
    include_provider: &mut dyn IncludeProvider,
) -> Result<Vec<SourceChunk>, PrepperError> {
    let mut prior_includes = HashSet::new();
    let mut scanner = Scanner::new(
        "",
        ResolvedIncludePath(String::new()),
        &mut prior_includes,
        include_provider,
    );
    scanner.include_child(&ResolvedIncludePath(file_path.to_string()), 0)?;
    Ok(scanner.into_chunks())
}
