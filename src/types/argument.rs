use super::TypeDescriptor;
use std::fmt;

/// Generic argument of a [`TypeDescriptor`]
#[derive(Debug, Clone, PartialEq)]
pub enum TypeArgument {
    Simple(TypeDescriptor),
    Wildcard(Wildcard),
}

impl TypeArgument {
    /// Structural equality: unlike descriptor identity, this compares nested arguments too
    pub fn same_shape(&self, other: &TypeArgument) -> bool {
        match (self, other) {
            (TypeArgument::Simple(a), TypeArgument::Simple(b)) => same_descriptor(a, b),
            (TypeArgument::Wildcard(a), TypeArgument::Wildcard(b)) => {
                let upper = match (a.upper_bound(), b.upper_bound()) {
                    (Some(x), Some(y)) => same_descriptor(x, y),
                    (None, None) => true,
                    _ => false,
                };
                let lower = match (a.lower_bound(), b.lower_bound()) {
                    (Some(x), Some(y)) => same_descriptor(x, y),
                    (None, None) => true,
                    _ => false,
                };
                upper && lower
            }
            _ => false,
        }
    }
}

/// Descriptor equality including generic arguments, recursively
pub fn same_descriptor(a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
    a == b
        && a.arguments().len() == b.arguments().len()
        && a
            .arguments()
            .iter()
            .zip(b.arguments())
            .all(|(x, y)| x.same_shape(y))
}

impl From<TypeDescriptor> for TypeArgument {
    fn from(descriptor: TypeDescriptor) -> Self {
        TypeArgument::Simple(descriptor)
    }
}

impl From<Wildcard> for TypeArgument {
    fn from(wildcard: Wildcard) -> Self {
        TypeArgument::Wildcard(wildcard)
    }
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArgument::Simple(t) => write!(f, "{}", t),
            TypeArgument::Wildcard(w) => write!(f, "{}", w),
        }
    }
}

/// Wildcard argument (`?`, `? extends T`, `? super T`)
///
/// At most one bound is ever set; assigning one clears the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wildcard {
    upper: Option<Box<TypeDescriptor>>,
    lower: Option<Box<TypeDescriptor>>,
}

impl Wildcard {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn extends(bound: TypeDescriptor) -> Self {
        let mut w = Self::default();
        w.set_upper_bound(bound);
        w
    }

    pub fn super_of(bound: TypeDescriptor) -> Self {
        let mut w = Self::default();
        w.set_lower_bound(bound);
        w
    }

    pub fn upper_bound(&self) -> Option<&TypeDescriptor> {
        self.upper.as_deref()
    }

    pub fn lower_bound(&self) -> Option<&TypeDescriptor> {
        self.lower.as_deref()
    }

    pub fn set_upper_bound(&mut self, bound: TypeDescriptor) {
        self.upper = Some(Box::new(bound));
        self.lower = None;
    }

    pub fn set_lower_bound(&mut self, bound: TypeDescriptor) {
        self.lower = Some(Box::new(bound));
        self.upper = None;
    }
}

impl fmt::Display for Wildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.upper, &self.lower) {
            (Some(upper), _) => write!(f, "? extends {}", upper),
            (_, Some(lower)) => write!(f, "? super {}", lower),
            _ => write!(f, "?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(name: &str) -> TypeDescriptor {
        TypeDescriptor::new(name).unwrap()
    }

    #[test]
    fn test_bounds_are_exclusive() {
        let mut w = Wildcard::unbounded();
        assert_eq!(w.to_string(), "?");

        w.set_lower_bound(t("java.lang.Integer"));
        w.set_upper_bound(t("java.lang.Number"));
        assert!(w.lower_bound().is_none());
        assert_eq!(w.upper_bound().unwrap().qualified_name(), "java.lang.Number");

        w.set_lower_bound(t("java.lang.Integer"));
        assert!(w.upper_bound().is_none());
        assert_eq!(w.to_string(), "? super java.lang.Integer");
    }

    #[test]
    fn test_same_shape_compares_nested_arguments() {
        let a = t("java.util.List").with_argument(t("java.lang.String"));
        let b = t("java.util.List").with_argument(t("java.lang.Integer"));
        assert_eq!(a, b);
        assert!(!same_descriptor(&a, &b));
        assert!(same_descriptor(&a, &a.clone()));
    }
}
