//! Web UI template compiler (wuic)
//!
//! Translates tag-structured page templates (`.wui` documents) into the Java
//! source of a servlet.
//!
//! ## Architecture
//!
//! - **types**: type descriptors, generic arguments and well-known native types
//! - **parser**: the streaming template driver plus the type-spec and binding
//!   mini-languages found in attribute values
//! - **taglib**: tag handlers, libraries and the registry resolving them
//! - **ast**: arena AST of the generated class with visitors
//! - **codegen**: translation context, imports, variable allocation and emission
//! - **compiler** / **resource**: file-level compilation and staleness
//! - **bin**: command-line interface
//!
//! ## Compilation Flow
//!
//! ```text
//! .wui template → TemplateParser → tag handlers → TranslationContext (AST) → emitter → .java
//! ```

pub mod ast;
pub mod codegen;
pub mod compiler;
pub mod config;
pub mod consts;
pub mod error;
pub mod parser;
pub mod resource;
pub mod taglib;
pub mod types;

pub use compiler::Compiler;
pub use config::{Config, Mode};
pub use error::{Error, Result};
pub use resource::Resource;
pub use taglib::{standard_registry, TagRegistry};

use std::path::PathBuf;

/// Registry used for `config`: the standard libraries plus every descriptor found
/// in `config.taglib_dirs`
pub fn registry_for(config: &Config) -> Result<TagRegistry> {
    let mut registry = standard_registry().clone();
    for dir in &config.taglib_dirs {
        let count = registry.discover(dir)?;
        log::info!("loaded {} tag(s) from {}", count, dir.display());
    }
    Ok(registry)
}

/// Compile one template and publish the generated source.
///
/// `resource_id` is the template path relative to `config.source_root`; the
/// returned path points at the written file below `config.destination_root`.
pub fn compile(resource_id: &str, config: &Config) -> Result<PathBuf> {
    config.validate()?;
    if config.taglib_dirs.is_empty() {
        return Compiler::new(standard_registry(), config).compile(resource_id);
    }
    let registry = registry_for(config)?;
    Compiler::new(&registry, config).compile(resource_id)
}
