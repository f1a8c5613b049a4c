//! Tag libraries
//!
//! Maps (namespace, tag name) pairs to [`TagHandler`]s. The process-wide
//! [`standard_registry`] carries the `core` library; descriptors can publish its
//! handlers under further namespaces.

pub mod core_tags;
pub mod descriptor;
pub mod handler;
pub mod registry;

pub use core_tags::core_registry;
pub use descriptor::{parse_descriptor, Descriptor, DescriptorEntry};
pub use handler::{Attributes, Tag, TagHandler};
pub use registry::{TagLibrary, TagRegistry};

use once_cell::sync::Lazy;

static STANDARD_REGISTRY: Lazy<TagRegistry> = Lazy::new(|| {
    let registry = core_registry();
    log::debug!("standard tag registry ready: {:?}", registry.namespaces());
    registry
});

/// Shared registry with the built-in libraries, built on first use
pub fn standard_registry() -> &'static TagRegistry {
    &STANDARD_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CORE_NAMESPACE;

    #[test]
    fn test_standard_registry_is_shared() {
        let a = standard_registry();
        let b = standard_registry();
        assert!(std::ptr::eq(a, b));
        assert!(a.resolve(CORE_NAMESPACE, "page", 1).is_ok());
    }
}
