//! The `core` tag library
//!
//! Handlers for the built-in vocabulary: page structure, variables, control
//! flow, output and fragments.

use super::handler::{Tag, TagHandler};
use super::registry::TagRegistry;
use crate::ast::{java_lines, CallScope, Comment, Literal, NodeKind};
use crate::codegen::TranslationContext;
use crate::consts::{CORE_NAMESPACE, REQUEST_PARAM, RESPONSE_PARAM};
use crate::error::Result;
use crate::parser::{parse_binding, Segment};
use crate::types::{natives, TypeDescriptor};

/// Registry holding only the core library, which is also the default library
pub fn core_registry() -> TagRegistry {
    let mut registry = TagRegistry::new();
    registry
        .ensure_library(CORE_NAMESPACE)
        .register("page", PageHandler)
        .register("field", VariableHandler { reusable: false })
        .register("var", VariableHandler { reusable: true })
        .register("bean", BeanHandler)
        .register("if", IfHandler)
        .register("else", ElseHandler)
        .register("invoke", InvokeHandler)
        .register("text", TextHandler)
        .register("comment", CommentHandler)
        .register("fragment", FragmentHandler);
    registry.set_default_library(CORE_NAMESPACE);
    registry
}

fn string_literal(tc: &mut TranslationContext, text: &str) -> Result<crate::ast::NodeId> {
    tc.ast_mut().add(NodeKind::Literal(Literal::String(text.to_string())))
}

/// Parse the `type` attribute of a tag
fn declared_type(tag: &Tag) -> Result<TypeDescriptor> {
    TypeDescriptor::parse(tag.required("type")?)
}

/// Document root: content type and charset directives up front, flush at the end
pub struct PageHandler;

impl TagHandler for PageHandler {
    fn start(&self, tag: &mut Tag, ancestors: &[Tag], tc: &mut TranslationContext) -> Result<()> {
        if !ancestors.is_empty() {
            return Err(tag.error("page must be the document root"));
        }
        let charset = tag
            .attribute("charset")
            .map(str::to_string)
            .or_else(|| tc.charset().map(str::to_string));
        if let Some(charset) = charset {
            let value = string_literal(tc, &charset)?;
            let call = tc.call_on(REQUEST_PARAM, "setCharacterEncoding", vec![value])?;
            tc.push_statement(tag.container, call)?;
        }
        if let Some(content_type) = tag.attribute("contentType") {
            let value = string_literal(tc, content_type)?;
            let call = tc.call_on(RESPONSE_PARAM, "setContentType", vec![value])?;
            tc.push_statement(tag.container, call)?;
        }
        Ok(())
    }

    fn end(&self, tag: &mut Tag, _ancestors: &[Tag], tc: &mut TranslationContext) -> Result<()> {
        let flush = tc.call_on(RESPONSE_PARAM, "flushBuffer", Vec::new())?;
        tc.push_statement(tag.container, flush)?;
        Ok(())
    }

    fn is_root(&self) -> bool {
        true
    }
}

/// `field` (final, declared once) and `var` (reusable, released when the tag closes)
pub struct VariableHandler {
    reusable: bool,
}

impl TagHandler for VariableHandler {
    fn start(&self, tag: &mut Tag, _ancestors: &[Tag], tc: &mut TranslationContext) -> Result<()> {
        let name = tag.required("name")?.to_string();
        let ty = declared_type(tag)?;
        let value = parse_binding(tag.required("value")?)?;

        let var = tc.allocate(tag.method, &ty, &name, self.reusable)?;
        let init = value.to_expression(tc, &ty)?;
        let bound = tc.bind(var, init)?;
        tc.push_statement(tag.container, bound)?;
        tag.bean = Some(var);
        Ok(())
    }

    fn end(&self, tag: &mut Tag, _ancestors: &[Tag], tc: &mut TranslationContext) -> Result<()> {
        if let (true, Some(var)) = (self.reusable, tag.bean) {
            tc.release(var)?;
        }
        Ok(())
    }
}

/// `final T name = new T()`
pub struct BeanHandler;

impl TagHandler for BeanHandler {
    fn start(&self, tag: &mut Tag, _ancestors: &[Tag], tc: &mut TranslationContext) -> Result<()> {
        let ty = declared_type(tag)?;
        if ty.is_primitive() || ty.is_array() {
            return Err(tag.error(format!("cannot instantiate '{}'", ty)));
        }
        let name = match tag.attribute("name") {
            Some(name) => name.to_string(),
            None => decapitalize(ty.simple_name()),
        };

        let var = tc.allocate(tag.method, &ty, &name, false)?;
        let init = tc.new_object(&ty, Vec::new())?;
        let bound = tc.bind(var, init)?;
        tc.push_statement(tag.container, bound)?;
        tag.bean = Some(var);
        Ok(())
    }
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Conditional block; nested content goes to the then-branch
pub struct IfHandler;

impl TagHandler for IfHandler {
    fn start(&self, tag: &mut Tag, _ancestors: &[Tag], tc: &mut TranslationContext) -> Result<()> {
        let test = parse_binding(tag.required("test")?)?;
        let boolean = TypeDescriptor::from_native(&natives::BOOLEAN);
        let condition = test.to_expression(tc, &boolean)?;

        let if_stmt = tc.ast_mut().add_if(Some(condition))?;
        tc.ast_mut().append(tag.container, if_stmt)?;
        let then_block = tc.ast().then_block(if_stmt)?;
        tc.enter_block(tag.method)?;
        tag.redirect(tag.method, then_block);
        tag.node = Some(if_stmt);
        Ok(())
    }

    fn end(&self, tag: &mut Tag, _ancestors: &[Tag], tc: &mut TranslationContext) -> Result<()> {
        tc.leave_block(tag.method)
    }
}

/// Else-branch of the directly enclosing `if`
pub struct ElseHandler;

impl TagHandler for ElseHandler {
    fn start(&self, tag: &mut Tag, ancestors: &[Tag], tc: &mut TranslationContext) -> Result<()> {
        let if_stmt = ancestors
            .last()
            .and_then(|parent| parent.node)
            .filter(|&node| matches!(tc.ast().kind(node), NodeKind::If(_)))
            .ok_or_else(|| tag.error("else must be placed directly inside an if"))?;
        if let NodeKind::If(stmt) = tc.ast().kind(if_stmt) {
            if stmt.else_block.is_some() {
                return Err(tag.error("if already has an else branch"));
            }
        }

        let block = tc.ast_mut().add_block();
        tc.ast_mut().set_else(if_stmt, block)?;
        // the then-branch scope ends here; the enclosing if closes this one
        tc.leave_block(tag.method)?;
        tc.enter_block(tag.method)?;
        tag.redirect(tag.method, block);
        tag.node = Some(block);
        Ok(())
    }
}

/// Method call statement: `target.method(args)`, `Type.method(args)` or `method(args)`
pub struct InvokeHandler;

impl TagHandler for InvokeHandler {
    fn start(&self, tag: &mut Tag, _ancestors: &[Tag], tc: &mut TranslationContext) -> Result<()> {
        let method = tag.required("method")?.to_string();

        let scope = match (tag.attribute("target"), tag.attribute("type")) {
            (Some(_), Some(_)) => {
                return Err(tag.error("'target' and 'type' are mutually exclusive"));
            }
            (Some(target), None) => {
                let binding = parse_binding(target)?;
                let receiver = match (binding.single_expression(), binding.static_text()) {
                    (Some(expression), _) => tc.ast_mut().add(NodeKind::RawExpr(expression.to_string()))?,
                    (None, Some(name)) => tc.name_expr(name.trim())?,
                    (None, None) => return Err(tag.error("'target' must be a name or one expression")),
                };
                CallScope::Expr(receiver)
            }
            (None, Some(ty)) => CallScope::Type(TypeDescriptor::parse(ty)?),
            (None, None) => CallScope::None,
        };

        let mut arguments = Vec::new();
        if let Some(args) = tag.attribute("args") {
            for segment in parse_binding(args)?.segments() {
                match segment {
                    Segment::Dynamic(expression) => {
                        arguments.push(tc.ast_mut().add(NodeKind::RawExpr(expression.clone()))?);
                    }
                    Segment::Static(text) => {
                        for piece in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                            arguments.push(string_literal(tc, piece)?);
                        }
                    }
                }
            }
        }

        let call = tc.call(scope, &method, arguments)?;
        let statement = tc.push_statement(tag.container, call)?;
        tag.node = Some(statement);
        Ok(())
    }
}

/// Writes its body (or `value`) to the response
pub struct TextHandler;

impl TagHandler for TextHandler {
    fn start(&self, tag: &mut Tag, _ancestors: &[Tag], _tc: &mut TranslationContext) -> Result<()> {
        if let Some(value) = tag.attribute("value") {
            tag.text = value.to_string();
        }
        Ok(())
    }

    fn text(&self, tag: &mut Tag, text: &str, _tc: &mut TranslationContext) -> Result<()> {
        tag.text.push_str(text);
        Ok(())
    }

    fn end(&self, tag: &mut Tag, _ancestors: &[Tag], tc: &mut TranslationContext) -> Result<()> {
        let content = tag.text.trim();
        if content.is_empty() {
            return Ok(());
        }
        let binding = parse_binding(content)?;
        let value = match binding.single_expression() {
            // Writer.write(int) would emit a character
            Some(expression) => tc
                .ast_mut()
                .add(NodeKind::RawExpr(format!("String.valueOf({})", expression)))?,
            None => binding.to_expression(tc, &TypeDescriptor::from_native(&natives::STRING))?,
        };
        let writer = tc.call_on(RESPONSE_PARAM, "getWriter", Vec::new())?;
        let write = tc.call(CallScope::Expr(writer), "write", vec![value])?;
        tc.push_statement(tag.container, write)?;
        Ok(())
    }
}

/// Line comment carrying the tag body
pub struct CommentHandler;

impl TagHandler for CommentHandler {
    fn start(&self, _tag: &mut Tag, _ancestors: &[Tag], _tc: &mut TranslationContext) -> Result<()> {
        Ok(())
    }

    fn text(&self, tag: &mut Tag, text: &str, _tc: &mut TranslationContext) -> Result<()> {
        tag.text.push_str(text);
        Ok(())
    }

    fn end(&self, tag: &mut Tag, _ancestors: &[Tag], tc: &mut TranslationContext) -> Result<()> {
        for line in java_lines(&tag.text).map(str::trim).filter(|l| !l.is_empty()) {
            tc.push_comment(tag.container, Comment::line(line))?;
        }
        Ok(())
    }
}

/// Moves its content into a new method called from the current position
pub struct FragmentHandler;

impl TagHandler for FragmentHandler {
    fn start(&self, tag: &mut Tag, _ancestors: &[Tag], tc: &mut TranslationContext) -> Result<()> {
        let requested = tag.required("name")?.to_string();
        let method = tc.allocate_method(&requested, Some(tag.method))?;
        let name = tc.method(method)?.name().to_string();

        let request = tc.name_expr(REQUEST_PARAM)?;
        let response = tc.name_expr(RESPONSE_PARAM)?;
        let call = tc.call(CallScope::None, &name, vec![request, response])?;
        tc.push_statement(tag.container, call)?;

        let body = tc.body(method)?;
        tag.redirect(method, body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::taglib::Attributes;

    fn context() -> TranslationContext {
        TranslationContext::new("index.wui", &Config::new("/src", "/dst")).unwrap()
    }

    fn open(tc: &TranslationContext, name: &str, attrs: &[(&str, &str)]) -> Tag {
        let method = tc.service_method();
        let body = tc.body(method).unwrap();
        Tag::new(
            CORE_NAMESPACE,
            name,
            1,
            attrs.iter().copied().collect::<Attributes>(),
            method,
            body,
        )
    }

    fn run(handler: &dyn TagHandler, tag: &mut Tag, ancestors: &[Tag], tc: &mut TranslationContext) {
        handler.start(tag, ancestors, tc).unwrap();
        handler.end(tag, ancestors, tc).unwrap();
    }

    #[test]
    fn test_core_library_is_default() {
        let registry = core_registry();
        let library = registry.library(CORE_NAMESPACE).unwrap();
        assert_eq!(
            library.tag_names(),
            vec!["bean", "comment", "else", "field", "fragment", "if", "invoke", "page", "text", "var"]
        );
        assert!(registry.resolve("", "page", 1).unwrap().is_root());
        assert!(!registry.resolve("", "field", 1).unwrap().is_root());
    }

    #[test]
    fn test_field_declares_final_variable() {
        let mut tc = context();
        let mut tag = open(&tc, "field", &[("name", "count"), ("type", "int"), ("value", "3")]);
        run(&VariableHandler { reusable: false }, &mut tag, &[], &mut tc);
        assert!(tc.render().contains("final int count = 3;"));

        let mut missing = open(&tc, "field", &[("name", "x"), ("type", "int")]);
        assert!(VariableHandler { reusable: false }
            .start(&mut missing, &[], &mut tc)
            .is_err());
    }

    #[test]
    fn test_var_slots_are_reused_after_close() {
        let mut tc = context();
        let handler = VariableHandler { reusable: true };
        let attrs = [("name", "label"), ("type", "java.lang.String"), ("value", "a")];
        let mut first = open(&tc, "var", &attrs);
        run(&handler, &mut first, &[], &mut tc);
        let mut second = open(&tc, "var", &attrs);
        run(&handler, &mut second, &[], &mut tc);

        assert_eq!(first.bean, second.bean);
        let source = tc.render();
        assert!(source.contains("String label = \"a\";"));
        assert!(source.contains("label = \"a\";"));
        assert!(!source.contains("label2"));
    }

    #[test]
    fn test_bean_and_if_else() {
        let mut tc = context();
        let mut bean = open(&tc, "bean", &[("type", "java.util.ArrayList<String>")]);
        run(&BeanHandler, &mut bean, &[], &mut tc);

        let mut if_tag = open(&tc, "if", &[("test", "@{arrayList.isEmpty()}")]);
        IfHandler.start(&mut if_tag, &[], &mut tc).unwrap();
        let mut else_tag = Tag::new(
            CORE_NAMESPACE,
            "else",
            2,
            Attributes::new(),
            if_tag.inner_method,
            if_tag.inner_container,
        );
        ElseHandler
            .start(&mut else_tag, std::slice::from_ref(&if_tag), &mut tc)
            .unwrap();
        let mut comment = Tag::new(
            CORE_NAMESPACE,
            "comment",
            3,
            Attributes::new(),
            else_tag.inner_method,
            else_tag.inner_container,
        );
        CommentHandler.text(&mut comment, "nothing", &mut tc).unwrap();
        CommentHandler.end(&mut comment, &[], &mut tc).unwrap();
        IfHandler.end(&mut if_tag, &[], &mut tc).unwrap();

        let source = tc.render();
        assert!(source.contains("import java.util.ArrayList;"));
        assert!(source.contains("final ArrayList<String> arrayList = new ArrayList<String>();"));
        assert!(source.contains("if (arrayList.isEmpty()) {"));
        assert!(source.contains("} else {"));
        assert!(source.contains("// nothing"));
        assert_eq!(tc.method(tc.service_method()).unwrap().level(), 0);

        // a second else on the same if is rejected
        let mut again = open(&tc, "else", &[]);
        assert!(ElseHandler.start(&mut again, std::slice::from_ref(&if_tag), &mut tc).is_err());
        // and an else without an if
        let mut orphan = open(&tc, "else", &[]);
        assert!(ElseHandler.start(&mut orphan, &[], &mut tc).is_err());
    }

    #[test]
    fn test_invoke_and_text() {
        let mut tc = context();
        let mut invoke = open(
            &tc,
            "invoke",
            &[("type", "java.util.Collections"), ("method", "sort"), ("args", "@{items}")],
        );
        run(&InvokeHandler, &mut invoke, &[], &mut tc);

        let mut text = open(&tc, "text", &[]);
        TextHandler.start(&mut text, &[], &mut tc).unwrap();
        TextHandler.text(&mut text, "  Hello @{name}  ", &mut tc).unwrap();
        TextHandler.end(&mut text, &[], &mut tc).unwrap();

        let source = tc.render();
        assert!(source.contains("Collections.sort(items);"));
        assert!(source.contains("response.getWriter().write(\"Hello \" + (name));"));
    }

    #[test]
    fn test_text_converts_lone_expression_to_string() {
        let mut tc = context();
        let mut count = open(&tc, "var", &[("name", "count"), ("type", "int"), ("value", "65")]);
        VariableHandler { reusable: true }.start(&mut count, &[], &mut tc).unwrap();
        let mut text = open(&tc, "text", &[]);
        TextHandler.text(&mut text, "@{count}", &mut tc).unwrap();
        TextHandler.end(&mut text, &[], &mut tc).unwrap();

        let source = tc.render();
        assert!(source.contains("response.getWriter().write(String.valueOf(count));"));
    }

    #[test]
    fn test_comment_splits_at_carriage_return() {
        let mut tc = context();
        let mut comment = open(&tc, "comment", &[]);
        CommentHandler.text(&mut comment, "a\rSystem.exit(1);", &mut tc).unwrap();
        CommentHandler.end(&mut comment, &[], &mut tc).unwrap();

        let source = tc.render();
        assert!(source.contains("// a\n"));
        assert!(source.contains("// System.exit(1);\n"));
        assert!(!source.contains('\r'));
    }

    #[test]
    fn test_fragment_gets_unique_method() {
        let mut tc = context();
        let mut first = open(&tc, "fragment", &[("name", "header")]);
        FragmentHandler.start(&mut first, &[], &mut tc).unwrap();
        let mut second = open(&tc, "fragment", &[("name", "header")]);
        FragmentHandler.start(&mut second, &[], &mut tc).unwrap();

        assert_ne!(first.inner_method, second.inner_method);
        let source = tc.render();
        assert!(source.contains("header(request, response);"));
        assert!(source.contains("header2(request, response);"));
        assert!(source.contains("private void header2(final HttpServletRequest request"));
    }

    #[test]
    fn test_page_directives() {
        let config = Config::new("/src", "/dst").with_charset("UTF-8");
        let mut tc = TranslationContext::new("index.wui", &config).unwrap();
        let mut page = open(&tc, "page", &[("contentType", "text/html")]);
        run(&PageHandler, &mut page, &[], &mut tc);
        let source = tc.render();
        let charset = source.find("request.setCharacterEncoding(\"UTF-8\");").unwrap();
        let content = source.find("response.setContentType(\"text/html\");").unwrap();
        let flush = source.find("response.flushBuffer();").unwrap();
        assert!(charset < content && content < flush);
    }
}
