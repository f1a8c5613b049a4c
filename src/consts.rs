//! Constants shared by the compiler pipeline

/// Separator between package segments and type names
pub const QUALIFIER_SEPARATOR: char = '.';

/// Namespace of the standard tag library
pub const CORE_NAMESPACE: &str = "urn:wuic:core";

/// Default prefix prepended to derived package names
pub const DEFAULT_PACKAGE_PREFIX: &str = "wui";

/// Extension of template sources
pub const TEMPLATE_EXTENSION: &str = "wui";

/// Suffix of tag library descriptor files
pub const TAGLIB_DESCRIPTOR_SUFFIX: &str = ".taglib.xml";

/// Extension of generated sources
pub const GENERATED_EXTENSION: &str = "java";

/// Spaces per nesting level in generated source
pub const INDENT_WIDTH: usize = 4;

/// Fallback name for variables whose desired name has no usable characters
pub const FALLBACK_VARIABLE_NAME: &str = "cmp";

/// Name of the request entry point method
pub const SERVICE_METHOD: &str = "service";

/// Lifecycle hook names, never handed out to generated methods
pub const RESERVED_METHOD_NAMES: &[&str] = &["init", "destroy", SERVICE_METHOD];

/// Parameter names of every per-request method
pub const REQUEST_PARAM: &str = "request";
pub const RESPONSE_PARAM: &str = "response";

/// Package whose types are visible without an import
pub const IMPLICIT_PACKAGE: &str = "java.lang";

pub const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

pub const KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null",
];

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}
