//! Compilation state of one template
//!
//! A [`TranslationContext`] owns everything produced while a template is parsed:
//! the derived package and class identity, the import set, the AST arena with the
//! generated class, and the methods registered in it.

use super::import::ImportSet;
use super::method_context::MethodContext;
use super::names::{to_identifier, unique_name};
use super::variable::{MethodId, VarId, Variable};
use crate::ast::*;
use crate::config::Config;
use crate::consts::{
    QUALIFIER_SEPARATOR, REQUEST_PARAM, RESERVED_METHOD_NAMES, RESPONSE_PARAM, SERVICE_METHOD,
};
use crate::error::{Error, Result};
use crate::types::{natives, TypeDescriptor};

/// Package and class name derived from a resource path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub package: String,
    pub class_name: String,
}

/// Derive the package and class name of a resource.
///
/// `a/b/c.ext` gives package `a.b` and class `c`; both `/` and `\` separate
/// segments and empty segments are skipped.
pub fn derive_identity(resource_path: &str) -> Identity {
    let segments: Vec<&str> = resource_path
        .split(|c| c == '/' || c == '\\')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let Some((file, dirs)) = segments.split_last() else {
        return Identity {
            package: String::new(),
            class_name: String::new(),
        };
    };
    let class_name = match file.rfind('.') {
        Some(p) if p > 0 => &file[..p],
        _ => file,
    };
    Identity {
        package: dirs.join("."),
        class_name: class_name.to_string(),
    }
}

/// Package and class of the unit generated for `resource_id`: the derived
/// identity made of valid identifiers, with the configured prefix applied
pub fn generated_identity(resource_id: &str, config: &Config) -> Result<Identity> {
    let identity = derive_identity(resource_id);
    if identity.class_name.is_empty() {
        return Err(Error::config(format!(
            "resource '{}' does not name a template",
            resource_id
        )));
    }
    let derived: Vec<String> = identity
        .package
        .split(QUALIFIER_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(to_identifier)
        .collect();
    let package = match (config.package_prefix.is_empty(), derived.is_empty()) {
        (true, _) => derived.join("."),
        (false, true) => config.package_prefix.clone(),
        (false, false) => format!("{}.{}", config.package_prefix, derived.join(".")),
    };
    Ok(Identity {
        package,
        class_name: to_identifier(&identity.class_name),
    })
}

#[derive(Debug, Clone)]
pub struct TranslationContext {
    resource_id: String,
    package: String,
    class_name: String,
    charset: Option<String>,
    imports: ImportSet,
    ast: Ast,
    class: NodeId,
    methods: Vec<MethodContext>,
}

impl TranslationContext {
    /// Set up the generated class for `resource_id`: identity, servlet boilerplate
    /// types, and the `service` entry point
    pub fn new(resource_id: &str, config: &Config) -> Result<Self> {
        let Identity {
            package,
            class_name,
        } = generated_identity(resource_id, config)?;

        let mut imports = ImportSet::new(package.clone());
        let qualified_class = if package.is_empty() {
            class_name.clone()
        } else {
            format!("{}.{}", package, class_name)
        };
        imports.reserve(&class_name, &qualified_class);

        let servlet = TypeDescriptor::from_native(&natives::HTTP_SERVLET);
        for native in [
            &natives::HTTP_SERVLET,
            &natives::HTTP_REQUEST,
            &natives::HTTP_RESPONSE,
            &natives::SERVLET_EXCEPTION,
            &natives::IO_EXCEPTION,
        ] {
            imports.ensure_imported(&TypeDescriptor::from_native(native));
        }

        let mut ast = Ast::new();
        let mut class_decl = ClassDecl::new(class_name.clone());
        class_decl.modifiers = vec![Modifier::Public, Modifier::Final];
        class_decl.extends = Some(servlet);
        let class = ast.add(NodeKind::Class(class_decl))?;

        let mut context = Self {
            resource_id: resource_id.to_string(),
            package,
            class_name,
            charset: config.charset.clone(),
            imports,
            ast,
            class,
            methods: Vec::new(),
        };
        context.create_method(
            SERVICE_METHOD.to_string(),
            None,
            vec![Modifier::Public],
            vec!["Override".to_string()],
        )?;
        log::debug!(
            "translation context for '{}': class {}",
            resource_id,
            context.qualified_class_name()
        );
        Ok(context)
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn qualified_class_name(&self) -> String {
        if self.package.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.package, self.class_name)
        }
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    pub fn imports(&self) -> &ImportSet {
        &self.imports
    }

    /// Register `ty` (and its generic arguments) with the import set
    pub fn ensure_imported(&mut self, ty: &TypeDescriptor) -> bool {
        self.imports.ensure_imported_all(ty)
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    pub fn class_node(&self) -> NodeId {
        self.class
    }

    /// Registered methods in registration order; the first is `service`
    pub fn methods(&self) -> &[MethodContext] {
        &self.methods
    }

    pub fn service_method(&self) -> MethodId {
        MethodId(0)
    }

    pub fn method(&self, id: MethodId) -> Result<&MethodContext> {
        self.methods
            .get(id.0)
            .ok_or_else(|| Error::invalid_state(format!("unknown method #{}", id.0)))
    }

    pub fn method_mut(&mut self, id: MethodId) -> Result<&mut MethodContext> {
        self.methods
            .get_mut(id.0)
            .ok_or_else(|| Error::invalid_state(format!("unknown method #{}", id.0)))
    }

    /// Body block of a method
    pub fn body(&self, id: MethodId) -> Result<NodeId> {
        Ok(self.method(id)?.body())
    }

    /// Register a new per-request method. The name is derived from `name` and made
    /// unique within the class; lifecycle hook names are never handed out.
    pub fn allocate_method(&mut self, name: &str, enclosing: Option<MethodId>) -> Result<MethodId> {
        let base = to_identifier(name);
        let unique = unique_name(&base, |candidate| {
            RESERVED_METHOD_NAMES.contains(&candidate)
                || self.methods.iter().any(|m| m.name() == candidate)
        });
        self.create_method(unique, enclosing, vec![Modifier::Private], Vec::new())
    }

    fn create_method(
        &mut self,
        name: String,
        enclosing: Option<MethodId>,
        modifiers: Vec<Modifier>,
        annotations: Vec<String>,
    ) -> Result<MethodId> {
        let body = self.ast.add_block();
        let mut decl = MethodDecl::new(name.clone());
        decl.modifiers = modifiers;
        decl.annotations = annotations;
        decl.parameters = vec![
            Parameter::final_param(TypeDescriptor::from_native(&natives::HTTP_REQUEST), REQUEST_PARAM),
            Parameter::final_param(TypeDescriptor::from_native(&natives::HTTP_RESPONSE), RESPONSE_PARAM),
        ];
        decl.throws = vec![
            TypeDescriptor::from_native(&natives::SERVLET_EXCEPTION),
            TypeDescriptor::from_native(&natives::IO_EXCEPTION),
        ];
        decl.body = Some(body);
        let declaration = self.ast.add(NodeKind::Method(decl))?;
        self.ast.append(self.class, declaration)?;

        let id = MethodId(self.methods.len());
        self.methods
            .push(MethodContext::new(id, name, enclosing, declaration, body));
        log::debug!("registered method '{}'", self.methods[id.0].name());
        Ok(id)
    }

    /// Allocate a variable slot in `method`; see [`MethodContext::allocate`]
    pub fn allocate(
        &mut self,
        method: MethodId,
        ty: &TypeDescriptor,
        base: &str,
        reusable: bool,
    ) -> Result<VarId> {
        let context = self
            .methods
            .get_mut(method.0)
            .ok_or_else(|| Error::invalid_state(format!("unknown method #{}", method.0)))?;
        Ok(context.allocate(&mut self.imports, ty, base, reusable))
    }

    pub fn variable(&self, var: VarId) -> Result<&Variable> {
        self.method(var.method)?.variable(var)
    }

    pub fn release(&mut self, var: VarId) -> Result<()> {
        self.method_mut(var.method)?.release(var)
    }

    /// Variable reference expression: a declaration the first time, the name afterwards
    pub fn reference(&mut self, var: VarId) -> Result<NodeId> {
        let reference = self.method_mut(var.method)?.reference(var)?;
        self.ast.add(NodeKind::Var(VarExpr {
            reference,
            initializer: None,
        }))
    }

    /// Variable reference with an initializer: `final T x = init` or `x = init`
    pub fn bind(&mut self, var: VarId, init: NodeId) -> Result<NodeId> {
        let reference = self.method_mut(var.method)?.reference(var)?;
        self.ast.add(NodeKind::Var(VarExpr {
            reference,
            initializer: Some(init),
        }))
    }

    pub fn enter_block(&mut self, method: MethodId) -> Result<()> {
        self.method_mut(method)?.enter_block();
        Ok(())
    }

    pub fn leave_block(&mut self, method: MethodId) -> Result<()> {
        self.method_mut(method)?.leave_block()
    }

    pub fn name_expr(&mut self, name: &str) -> Result<NodeId> {
        self.ast.add(NodeKind::Name(name.to_string()))
    }

    pub fn call(&mut self, scope: CallScope, name: &str, arguments: Vec<NodeId>) -> Result<NodeId> {
        if let CallScope::Type(ty) = &scope {
            self.imports.ensure_imported_all(ty);
        }
        self.ast.add(NodeKind::MethodCall(MethodCallExpr {
            scope,
            name: name.to_string(),
            arguments,
        }))
    }

    /// Call on the named local (`request.getWriter()`)
    pub fn call_on(&mut self, receiver: &str, name: &str, arguments: Vec<NodeId>) -> Result<NodeId> {
        let scope = self.name_expr(receiver)?;
        self.call(CallScope::Expr(scope), name, arguments)
    }

    pub fn new_object(&mut self, ty: &TypeDescriptor, arguments: Vec<NodeId>) -> Result<NodeId> {
        self.imports.ensure_imported_all(ty);
        self.ast.add(NodeKind::ObjectCreation(ObjectCreationExpr {
            ty: ty.clone(),
            arguments,
        }))
    }

    /// Wrap `expression` in a statement appended to `container`
    pub fn push_statement(&mut self, container: NodeId, expression: NodeId) -> Result<NodeId> {
        let statement = self.ast.add(NodeKind::ExprStmt(ExprStmt {
            expression: Some(expression),
        }))?;
        self.ast.append(container, statement)?;
        Ok(statement)
    }

    pub fn push_comment(&mut self, container: NodeId, comment: Comment) -> Result<NodeId> {
        let node = self.ast.add(NodeKind::Comment(comment))?;
        self.ast.append(container, node)?;
        Ok(node)
    }

    /// Render the complete generated source
    pub fn render(&self) -> String {
        super::emitter::emit(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new("/src", "/dst")
    }

    #[test]
    fn test_derive_identity() {
        let id = derive_identity("a/b/c.ext");
        assert_eq!((id.package.as_str(), id.class_name.as_str()), ("a.b", "c"));
        let id = derive_identity("c.ext");
        assert_eq!((id.package.as_str(), id.class_name.as_str()), ("", "c"));
        let id = derive_identity("/a.ext");
        assert_eq!((id.package.as_str(), id.class_name.as_str()), ("", "a"));
        let id = derive_identity("a\\b//c.d.ext");
        assert_eq!((id.package.as_str(), id.class_name.as_str()), ("a.b", "c.d"));
    }

    #[test]
    fn test_package_prefix_and_service_method() {
        let tc = TranslationContext::new("pages/index.wui", &config()).unwrap();
        assert_eq!(tc.package(), "wui.pages");
        assert_eq!(tc.class_name(), "index");
        assert_eq!(tc.qualified_class_name(), "wui.pages.index");
        assert_eq!(tc.methods().len(), 1);
        assert_eq!(tc.methods()[0].name(), "service");

        let tc = TranslationContext::new("index.wui", &config().with_package_prefix("")).unwrap();
        assert_eq!(tc.package(), "");
    }

    #[test]
    fn test_invalid_path_segments_become_identifiers() {
        let tc = TranslationContext::new("my-app/main-page.wui", &config()).unwrap();
        assert_eq!(tc.package(), "wui.my_app");
        assert_eq!(tc.class_name(), "main_page");
        assert!(TranslationContext::new("//", &config()).is_err());
    }

    #[test]
    fn test_allocate_method_names_are_unique() {
        let mut tc = TranslationContext::new("index.wui", &config()).unwrap();
        let a = tc.allocate_method("header", None).unwrap();
        let b = tc.allocate_method("header", Some(a)).unwrap();
        let c = tc.allocate_method("service", None).unwrap();
        let d = tc.allocate_method("init", None).unwrap();
        let names: Vec<&str> = tc.methods().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["service", "header", "header2", "service2", "init2"]);
        assert_eq!(tc.method(b).unwrap().enclosing(), Some(a));
        assert_eq!(tc.method(c).unwrap().id(), c);
        assert_eq!(tc.ast().parent(tc.method(d).unwrap().declaration()), Some(tc.class_node()));
    }

    #[test]
    fn test_class_name_blocks_colliding_import() {
        let mut tc = TranslationContext::new("Date.wui", &config()).unwrap();
        let date = TypeDescriptor::new("java.util.Date").unwrap();
        assert!(!tc.ensure_imported(&date));
        assert!(tc.imports().requires_qualification(&date));
    }

    #[test]
    fn test_bind_declares_once() {
        let mut tc = TranslationContext::new("index.wui", &config()).unwrap();
        let service = tc.service_method();
        let ty = TypeDescriptor::new("java.lang.String").unwrap();
        let var = tc.allocate(service, &ty, "title", true).unwrap();
        let init = tc.name_expr("a").unwrap();
        let first = tc.bind(var, init).unwrap();
        let second = tc.reference(var).unwrap();
        match (tc.ast().kind(first), tc.ast().kind(second)) {
            (NodeKind::Var(a), NodeKind::Var(b)) => {
                assert!(matches!(a.reference, VarReference::Declare { is_final: false, .. }));
                assert!(matches!(&b.reference, VarReference::Name(n) if n == "title"));
            }
            other => panic!("unexpected nodes {:?}", other),
        }
    }
}
