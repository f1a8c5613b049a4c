//! Compiler driver
//!
//! Reads a template, runs it through the tag handlers and publishes the rendered
//! source. The output file is written next to its final location and moved into
//! place only once rendering succeeded.

use crate::codegen::TranslationContext;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::parser::TemplateParser;
use crate::resource::{destination_path, relative_path, Resource};
use crate::taglib::TagRegistry;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

pub struct Compiler<'a> {
    registry: &'a TagRegistry,
    config: &'a Config,
}

impl<'a> Compiler<'a> {
    pub fn new(registry: &'a TagRegistry, config: &'a Config) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// Build the translation unit of a template held in memory
    pub fn translate(&self, resource_id: &str, source: &str) -> Result<TranslationContext> {
        let mut tc = TranslationContext::new(resource_id, self.config)?;
        TemplateParser::new(self.registry).parse(source, &mut tc)?;
        Ok(tc)
    }

    /// Render the generated source of a template held in memory
    pub fn compile_source(&self, resource_id: &str, source: &str) -> Result<String> {
        Ok(self.translate(resource_id, source)?.render())
    }

    /// Compile `source_root/resource_id` and publish the result under the
    /// destination root. Returns the path of the written file.
    pub fn compile(&self, resource_id: &str) -> Result<PathBuf> {
        let source_path = self.config.source_root.join(relative_path(resource_id));
        log::info!("compiling {}", source_path.display());
        let source = fs::read_to_string(&source_path).map_err(|e| Error::io(&source_path, e))?;
        let output = self.compile_source(resource_id, &source)?;

        let destination = destination_path(resource_id, self.config)?;
        let directory = destination
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.destination_root.clone());
        fs::create_dir_all(&directory).map_err(|e| Error::io(&directory, e))?;

        let mut file = NamedTempFile::new_in(&directory).map_err(|e| Error::io(&directory, e))?;
        file.write_all(output.as_bytes())
            .map_err(|e| Error::io(file.path(), e))?;
        file.persist(&destination)
            .map_err(|e| Error::io(&destination, e.error))?;
        log::info!("wrote {}", destination.display());
        Ok(destination)
    }

    /// Compile `resource` if its artifact is stale
    pub fn refresh(&self, resource: &mut Resource) -> Result<Option<PathBuf>> {
        if !resource.is_stale()? {
            log::debug!("{} is up to date", resource);
            return Ok(None);
        }
        let path = self.compile(resource.id())?;
        resource.mark_fresh();
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taglib::core_registry;

    #[test]
    fn test_compile_source_is_deterministic() {
        let registry = core_registry();
        let config = Config::new("/src", "/dst");
        let compiler = Compiler::new(&registry, &config);
        let template = "<page><field name=\"n\" type=\"int\" value=\"1\"/></page>";
        let first = compiler.compile_source("x/y.wui", template).unwrap();
        let second = compiler.compile_source("x/y.wui", template).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("package wui.x;"));
        assert!(first.contains("public final class y extends HttpServlet {"));
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let registry = core_registry();
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(dir.path(), dir.path().join("out"));
        let compiler = Compiler::new(&registry, &config);
        assert!(matches!(compiler.compile("nope.wui"), Err(Error::Io { .. })));
    }
}
