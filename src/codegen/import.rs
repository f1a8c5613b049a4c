//! Import resolution for generated sources
//!
//! Every type that generated code references goes through [`ImportSet::ensure_imported`].
//! A simple name can stand for only one type per compilation unit: the first type to
//! claim it wins, any other type sharing that simple name is flagged and always
//! rendered fully qualified.

use crate::consts::IMPLICIT_PACKAGE;
use crate::types::{TypeArgument, TypeDescriptor};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    /// Package of the generated class; its types need no import
    package: String,
    /// Normalized imports in insertion order
    imports: Vec<TypeDescriptor>,
    /// simple name -> qualified name currently bound to it
    simple_names: HashMap<String, String>,
    /// Qualified names that must always be written in full
    qualified: HashSet<String>,
}

impl ImportSet {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }

    /// Bind a simple name to a type declared by the unit itself (the generated
    /// class), so that no import may take it
    pub fn reserve(&mut self, simple_name: &str, qualified_name: &str) {
        self.simple_names
            .entry(simple_name.to_string())
            .or_insert_with(|| qualified_name.to_string());
    }

    /// Make `ty` referable by its simple name if possible.
    ///
    /// Returns true only when a new import was recorded. Types that are already
    /// resolvable (imported, package-less, primitive, from `java.lang` or the
    /// unit's own package) and types whose simple name is taken by another type
    /// return false; the latter are flagged as requiring qualification.
    pub fn ensure_imported(&mut self, ty: &TypeDescriptor) -> bool {
        let ty = ty.component();
        let qualified_name = ty.qualified_name();
        if ty.is_primitive() || !ty.has_package() || self.qualified.contains(qualified_name) {
            return false;
        }

        match self.simple_names.get(ty.simple_name()) {
            Some(bound) if bound == qualified_name => false,
            Some(bound) => {
                log::debug!(
                    "simple name '{}' is bound to {}; {} will be written qualified",
                    ty.simple_name(),
                    bound,
                    qualified_name
                );
                self.qualified.insert(qualified_name.to_string());
                false
            }
            None => {
                self.simple_names
                    .insert(ty.simple_name().to_string(), qualified_name.to_string());
                if self.is_implicitly_visible(&ty) {
                    return false;
                }
                self.imports.push(ty);
                true
            }
        }
    }

    /// [`ImportSet::ensure_imported`] for `ty` and, recursively, every type used
    /// in its generic arguments. The result refers to `ty` alone.
    pub fn ensure_imported_all(&mut self, ty: &TypeDescriptor) -> bool {
        let imported = self.ensure_imported(ty);
        for argument in ty.arguments() {
            match argument {
                TypeArgument::Simple(t) => {
                    self.ensure_imported_all(t);
                }
                TypeArgument::Wildcard(w) => {
                    if let Some(bound) = w.upper_bound().or(w.lower_bound()) {
                        self.ensure_imported_all(bound);
                    }
                }
            }
        }
        imported
    }

    fn is_implicitly_visible(&self, ty: &TypeDescriptor) -> bool {
        let package = ty.package();
        package == IMPLICIT_PACKAGE || (!self.package.is_empty() && package == self.package)
    }

    pub fn requires_qualification(&self, ty: &TypeDescriptor) -> bool {
        self.qualified.contains(ty.qualified_name())
    }

    pub fn is_imported(&self, ty: &TypeDescriptor) -> bool {
        let component = ty.component();
        self.imports.iter().any(|i| *i == component)
    }

    /// Imports in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.imports.iter()
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Source form of a type: simple name when it is bound to this type,
    /// qualified otherwise, followed by generic arguments and array brackets
    pub fn render(&self, ty: &TypeDescriptor) -> String {
        let mut out = String::new();
        self.render_into(ty, &mut out);
        out
    }

    fn render_into(&self, ty: &TypeDescriptor, out: &mut String) {
        let simple = !ty.has_package()
            || self
                .simple_names
                .get(ty.simple_name())
                .map_or(false, |bound| bound == ty.qualified_name());
        if simple {
            out.push_str(ty.simple_name());
        } else {
            out.push_str(ty.qualified_name());
        }
        if ty.has_arguments() {
            out.push('<');
            for (i, argument) in ty.arguments().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match argument {
                    TypeArgument::Simple(t) => self.render_into(t, out),
                    TypeArgument::Wildcard(w) => {
                        out.push('?');
                        if let Some(upper) = w.upper_bound() {
                            out.push_str(" extends ");
                            self.render_into(upper, out);
                        } else if let Some(lower) = w.lower_bound() {
                            out.push_str(" super ");
                            self.render_into(lower, out);
                        }
                    }
                }
            }
            out.push('>');
        }
        for _ in 0..ty.array_dimension() {
            out.push_str("[]");
        }
    }
}
