/// Statically declared type reference
///
/// Tag handlers describe the types they reference with these constants instead of
/// spelling them as strings; [`TypeDescriptor::from_native`](super::TypeDescriptor::from_native)
/// turns them into descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeType {
    Primitive(&'static str),
    /// `name` may contain `.` for nested types (`Map.Entry`)
    Named {
        package: &'static str,
        name: &'static str,
    },
    Array(&'static NativeType),
}

impl NativeType {
    pub const fn named(package: &'static str, name: &'static str) -> Self {
        NativeType::Named { package, name }
    }
}

/// Types referenced by the generated servlet and the core tag library
pub mod natives {
    use super::NativeType;

    pub const BOOLEAN: NativeType = NativeType::Primitive("boolean");
    pub const INT: NativeType = NativeType::Primitive("int");

    pub const STRING: NativeType = NativeType::named("java.lang", "String");
    pub const STRING_ARRAY: NativeType = NativeType::Array(&STRING);

    pub const IO_EXCEPTION: NativeType = NativeType::named("java.io", "IOException");

    pub const HTTP_SERVLET: NativeType = NativeType::named("javax.servlet.http", "HttpServlet");
    pub const HTTP_REQUEST: NativeType =
        NativeType::named("javax.servlet.http", "HttpServletRequest");
    pub const HTTP_RESPONSE: NativeType =
        NativeType::named("javax.servlet.http", "HttpServletResponse");
    pub const SERVLET_EXCEPTION: NativeType =
        NativeType::named("javax.servlet", "ServletException");
}
