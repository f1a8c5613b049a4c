use super::{NativeType, TypeArgument};
use crate::consts::{self, QUALIFIER_SEPARATOR};
use crate::error::{Error, Result};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Reference to a (possibly generic, possibly array) type
///
/// Identity is the qualified name plus array dimension; generic arguments
/// never take part in equality or hashing.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    qualified_name: String,
    simple_name: String,
    array_dimension: usize,
    has_package: bool,
    arguments: Vec<TypeArgument>,
}

impl TypeDescriptor {
    /// Build a descriptor for a bare qualified name (no brackets, no arguments)
    pub fn new(qualified_name: &str) -> Result<Self> {
        Self::with_dimension(qualified_name, 0)
    }

    pub fn with_dimension(qualified_name: &str, array_dimension: usize) -> Result<Self> {
        let qualified_name = qualified_name.trim();
        if qualified_name.is_empty() {
            return Err(Error::invalid_type(qualified_name, "no type specified"));
        }
        let (has_package, simple_name) = match qualified_name.rfind(QUALIFIER_SEPARATOR) {
            Some(p) if p > 0 => (true, &qualified_name[p + 1..]),
            Some(_) => (false, &qualified_name[1..]),
            None => (false, qualified_name),
        };
        if simple_name.is_empty() {
            return Err(Error::invalid_type(qualified_name, "empty simple name"));
        }
        Ok(Self {
            qualified_name: qualified_name.to_string(),
            simple_name: simple_name.to_string(),
            array_dimension,
            has_package,
            arguments: Vec::new(),
        })
    }

    /// Parse a textual type spec such as `a.b.List[][]` or
    /// `java.util.Map<java.lang.String,? extends java.lang.Number>`
    pub fn parse(spec: &str) -> Result<Self> {
        crate::parser::parse_type_spec(spec)
    }

    /// Equivalent of [`TypeDescriptor::parse`] for a statically declared type
    pub fn from_native(native: &NativeType) -> Self {
        let mut current = native;
        let mut dimension = 0;
        while let NativeType::Array(component) = current {
            current = component;
            dimension += 1;
        }
        let (qualified_name, simple_name, has_package) = match current {
            NativeType::Primitive(name) => (name.to_string(), name.to_string(), false),
            NativeType::Named { package, name } if package.is_empty() => {
                (name.to_string(), simple_of(name).to_string(), false)
            }
            NativeType::Named { package, name } => (
                format!("{}{}{}", package, QUALIFIER_SEPARATOR, name),
                simple_of(name).to_string(),
                true,
            ),
            NativeType::Array(_) => unreachable!("array components are unwrapped above"),
        };
        Self {
            qualified_name,
            simple_name,
            array_dimension: dimension,
            has_package,
            arguments: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    /// Package part of the qualified name, empty for package-less types
    pub fn package(&self) -> &str {
        if !self.has_package {
            return "";
        }
        let end = self.qualified_name.len() - self.simple_name.len() - 1;
        &self.qualified_name[..end]
    }

    pub fn array_dimension(&self) -> usize {
        self.array_dimension
    }

    pub fn is_array(&self) -> bool {
        self.array_dimension > 0
    }

    pub fn has_package(&self) -> bool {
        self.has_package
    }

    pub fn is_primitive(&self) -> bool {
        !self.has_package && consts::is_primitive(&self.qualified_name)
    }

    pub fn set_array_dimension(&mut self, array_dimension: usize) {
        self.array_dimension = array_dimension;
    }

    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }

    pub fn arguments(&self) -> &[TypeArgument] {
        &self.arguments
    }

    /// Attach a generic argument; the descriptor takes ownership of it
    pub fn add_argument(&mut self, argument: impl Into<TypeArgument>) -> &mut TypeArgument {
        self.arguments.push(argument.into());
        let last = self.arguments.len() - 1;
        &mut self.arguments[last]
    }

    /// Builder-style variant of [`TypeDescriptor::add_argument`]
    pub fn with_argument(mut self, argument: impl Into<TypeArgument>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// The same type without array dimension and generic arguments.
    /// This is the form that appears in import declarations.
    pub fn component(&self) -> TypeDescriptor {
        Self {
            qualified_name: self.qualified_name.clone(),
            simple_name: self.simple_name.clone(),
            array_dimension: 0,
            has_package: self.has_package,
            arguments: Vec::new(),
        }
    }
}

fn simple_of(name: &str) -> &str {
    match name.rfind(QUALIFIER_SEPARATOR) {
        Some(p) => &name[p + 1..],
        None => name,
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name == other.qualified_name && self.array_dimension == other.array_dimension
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.qualified_name.hash(state);
        self.array_dimension.hash(state);
    }
}

impl From<&NativeType> for TypeDescriptor {
    fn from(native: &NativeType) -> Self {
        Self::from_native(native)
    }
}

/// Canonical form: qualified name, one `[]` per dimension, then `<args>`
impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name)?;
        for _ in 0..self.array_dimension {
            write!(f, "[]")?;
        }
        if self.has_arguments() {
            write!(f, "<")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// Generic type parameter declaration, e.g. `T extends java.lang.Number`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameterDecl {
    pub name: String,
    pub bounds: Vec<TypeDescriptor>,
}

impl TypeParameterDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn add_bound(&mut self, bound: TypeDescriptor) -> &mut Self {
        self.bounds.push(bound);
        self
    }
}

impl fmt::Display for TypeParameterDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (i, bound) in self.bounds.iter().enumerate() {
            if i == 0 {
                write!(f, " extends {}", bound)?;
            } else {
                write!(f, " & {}", bound)?;
            }
        }
        Ok(())
    }
}
