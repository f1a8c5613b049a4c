use super::handler::TagHandler;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Handlers of one namespace, keyed by tag name
#[derive(Clone, Default)]
pub struct TagLibrary {
    namespace: String,
    handlers: HashMap<String, Arc<dyn TagHandler>>,
}

impl TagLibrary {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            handlers: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn register<H>(&mut self, name: impl Into<String>, handler: H) -> &mut Self
    where
        H: TagHandler + 'static,
    {
        self.register_shared(name, Arc::new(handler))
    }

    /// Register a handler instance that may also serve other names or libraries
    pub fn register_shared(&mut self, name: impl Into<String>, handler: Arc<dyn TagHandler>) -> &mut Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// `None` when the tag is not part of this library
    pub fn handler(&self, name: &str) -> Option<Arc<dyn TagHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Registered tag names, sorted
    pub fn tag_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for TagLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagLibrary")
            .field("namespace", &self.namespace)
            .field("tags", &self.tag_names())
            .finish()
    }
}

/// Two-level lookup table: namespace -> library -> tag name -> handler
///
/// Built once and then shared read-only between compilations.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    libraries: HashMap<String, TagLibrary>,
    default_library: Option<String>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library for `namespace`, created empty on first use
    pub fn ensure_library(&mut self, namespace: &str) -> &mut TagLibrary {
        self.libraries
            .entry(namespace.to_string())
            .or_insert_with(|| TagLibrary::new(namespace))
    }

    pub fn library(&self, namespace: &str) -> Option<&TagLibrary> {
        self.libraries.get(namespace)
    }

    /// Namespaces with a library, sorted
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self.libraries.keys().map(String::as_str).collect();
        namespaces.sort_unstable();
        namespaces
    }

    /// Library consulted for elements without a namespace
    pub fn set_default_library(&mut self, namespace: &str) {
        self.ensure_library(namespace);
        self.default_library = Some(namespace.to_string());
    }

    pub fn default_library(&self) -> Option<&TagLibrary> {
        self.default_library
            .as_deref()
            .and_then(|ns| self.libraries.get(ns))
    }

    /// Find the handler for a tag; `line` is only used for the error.
    ///
    /// An explicit namespace must have a library of its own.
    pub fn resolve(&self, namespace: &str, name: &str, line: usize) -> Result<Arc<dyn TagHandler>> {
        let library = if namespace.is_empty() {
            self.libraries.get(namespace).or_else(|| self.default_library())
        } else {
            self.libraries.get(namespace)
        };
        library
            .and_then(|lib| lib.handler(name))
            .ok_or_else(|| Error::UnresolvedTag {
                namespace: namespace.to_string(),
                name: name.to_string(),
                line,
            })
    }
}
