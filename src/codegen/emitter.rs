//! Source emitter
//!
//! Renders a finished [`TranslationContext`] into Java source. Rendering reads the
//! AST and the import set only; calling [`emit`] twice on the same context yields
//! identical text.

use super::import::ImportSet;
use super::translation_context::TranslationContext;
use crate::ast::*;
use crate::types::{natives, TypeDescriptor};

/// Render the complete source of `tc`
pub fn emit(tc: &TranslationContext) -> String {
    let mut printer = SourcePrinter::new();
    printer.println(&format!(
        "// Generated by wuic from {}. Do not edit.",
        tc.resource_id()
    ));
    if !tc.package().is_empty() {
        printer.println(&format!("package {};", tc.package()));
    }
    printer.newline();
    if !tc.imports().is_empty() {
        for import in tc.imports().iter() {
            printer.println(&format!("import {};", import.qualified_name()));
        }
        printer.newline();
    }

    let mut emitter = SourceEmitter::new(tc.imports());
    tc.ast().accept_void(tc.class_node(), &mut emitter, &mut printer);
    printer.into_output()
}

/// [`VoidVisitor`] printing nodes as Java source
pub struct SourceEmitter<'a> {
    imports: &'a ImportSet,
}

impl<'a> SourceEmitter<'a> {
    pub fn new(imports: &'a ImportSet) -> Self {
        Self { imports }
    }

    fn type_name(&self, ty: &TypeDescriptor) -> String {
        self.imports.render(ty)
    }

    fn print_modifiers(&self, modifiers: &[Modifier], out: &mut SourcePrinter) {
        for modifier in modifiers {
            out.print(&format!("{} ", modifier));
        }
    }

    fn print_list(&mut self, ast: &Ast, items: &[NodeId], out: &mut SourcePrinter) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.print(", ");
            }
            ast.accept_void(*item, self, out);
        }
    }

    /// Statements of a block without the surrounding braces
    fn print_statements(&mut self, ast: &Ast, block: NodeId, out: &mut SourcePrinter) {
        for statement in ast.children(block) {
            ast.accept_void(statement, self, out);
        }
    }

    /// Fixed `init` / `destroy` hooks every generated servlet carries
    fn print_lifecycle_hooks(&self, out: &mut SourcePrinter) {
        let servlet_exception = self.type_name(&TypeDescriptor::from_native(&natives::SERVLET_EXCEPTION));
        out.println("@Override");
        out.println(&format!("public void init() throws {} {{", servlet_exception));
        out.indent();
        out.println("super.init();");
        out.dedent();
        out.println("}");
        out.newline();
        out.println("@Override");
        out.println("public void destroy() {");
        out.indent();
        out.println("super.destroy();");
        out.dedent();
        out.println("}");
    }
}

impl<'a> VoidVisitor<SourcePrinter> for SourceEmitter<'a> {
    fn visit_class(&mut self, ast: &Ast, _id: NodeId, class: &ClassDecl, out: &mut SourcePrinter) {
        self.print_modifiers(&class.modifiers, out);
        out.print(&format!("class {}", class.name));
        if let Some(extends) = &class.extends {
            out.print(&format!(" extends {}", self.type_name(extends)));
        }
        if !class.implements.is_empty() {
            let names: Vec<String> = class.implements.iter().map(|t| self.type_name(t)).collect();
            out.print(&format!(" implements {}", names.join(", ")));
        }
        out.println(" {");
        out.indent();
        out.newline();
        self.print_lifecycle_hooks(out);
        for member in &class.members {
            out.newline();
            ast.accept_void(*member, self, out);
        }
        out.dedent();
        out.println("}");
    }

    fn visit_method(&mut self, ast: &Ast, _id: NodeId, method: &MethodDecl, out: &mut SourcePrinter) {
        for annotation in &method.annotations {
            out.println(&format!("@{}", annotation));
        }
        self.print_modifiers(&method.modifiers, out);
        if !method.type_params.is_empty() {
            let params: Vec<String> = method
                .type_params
                .iter()
                .map(|p| {
                    let bounds: Vec<String> = p.bounds.iter().map(|b| self.type_name(b)).collect();
                    if bounds.is_empty() {
                        p.name.clone()
                    } else {
                        format!("{} extends {}", p.name, bounds.join(" & "))
                    }
                })
                .collect();
            out.print(&format!("<{}> ", params.join(", ")));
        }
        let return_type = match &method.return_type {
            Some(ty) => self.type_name(ty),
            None => "void".to_string(),
        };
        let params: Vec<String> = method
            .parameters
            .iter()
            .map(|p| {
                let modifiers: String = p.modifiers.iter().map(|m| format!("{} ", m)).collect();
                format!("{}{} {}", modifiers, self.type_name(&p.ty), p.name)
            })
            .collect();
        out.print(&format!("{} {}({})", return_type, method.name, params.join(", ")));
        if !method.throws.is_empty() {
            let throws: Vec<String> = method.throws.iter().map(|t| self.type_name(t)).collect();
            out.print(&format!(" throws {}", throws.join(", ")));
        }
        match method.body {
            Some(body) => {
                out.println(" {");
                out.indent();
                self.print_statements(ast, body, out);
                out.dedent();
                out.println("}");
            }
            None => out.println(";"),
        }
    }

    fn visit_field(&mut self, ast: &Ast, _id: NodeId, field: &FieldDecl, out: &mut SourcePrinter) {
        self.print_modifiers(&field.modifiers, out);
        out.print(&format!("{} {}", self.type_name(&field.ty), field.name));
        if let Some(init) = field.initializer {
            out.print(" = ");
            ast.accept_void(init, self, out);
        }
        out.println(";");
    }

    fn visit_block(&mut self, ast: &Ast, id: NodeId, _block: &Block, out: &mut SourcePrinter) {
        out.println("{");
        out.indent();
        self.print_statements(ast, id, out);
        out.dedent();
        out.println("}");
    }

    fn visit_if(&mut self, ast: &Ast, _id: NodeId, stmt: &IfStmt, out: &mut SourcePrinter) {
        out.print("if (");
        match stmt.condition {
            Some(condition) => ast.accept_void(condition, self, out),
            None => out.print("true"),
        }
        out.println(") {");
        out.indent();
        self.print_statements(ast, stmt.then_block, out);
        out.dedent();
        if let Some(else_block) = stmt.else_block {
            out.println("} else {");
            out.indent();
            self.print_statements(ast, else_block, out);
            out.dedent();
        }
        out.println("}");
    }

    fn visit_expr_stmt(&mut self, ast: &Ast, _id: NodeId, stmt: &ExprStmt, out: &mut SourcePrinter) {
        if let Some(expression) = stmt.expression {
            ast.accept_void(expression, self, out);
        }
        out.println(";");
    }

    fn visit_raw_stmt(&mut self, _ast: &Ast, _id: NodeId, text: &str, out: &mut SourcePrinter) {
        let text = text.trim().trim_end_matches(';');
        out.println(&format!("{};", text));
    }

    fn visit_name(&mut self, _ast: &Ast, _id: NodeId, name: &str, out: &mut SourcePrinter) {
        out.print(name);
    }

    fn visit_literal(&mut self, _ast: &Ast, _id: NodeId, literal: &Literal, out: &mut SourcePrinter) {
        out.print(&literal.to_string());
    }

    fn visit_method_call(&mut self, ast: &Ast, _id: NodeId, call: &MethodCallExpr, out: &mut SourcePrinter) {
        match &call.scope {
            CallScope::None => {}
            CallScope::Expr(scope) => {
                ast.accept_void(*scope, self, out);
                out.print(".");
            }
            CallScope::Type(ty) => {
                out.print(&self.type_name(ty));
                out.print(".");
            }
        }
        out.print(&call.name);
        out.print("(");
        self.print_list(ast, &call.arguments, out);
        out.print(")");
    }

    fn visit_object_creation(&mut self, ast: &Ast, _id: NodeId, expr: &ObjectCreationExpr, out: &mut SourcePrinter) {
        out.print(&format!("new {}(", self.type_name(&expr.ty)));
        self.print_list(ast, &expr.arguments, out);
        out.print(")");
    }

    fn visit_var(&mut self, ast: &Ast, _id: NodeId, var: &VarExpr, out: &mut SourcePrinter) {
        match &var.reference {
            VarReference::Declare { ty, name, is_final } => {
                if *is_final {
                    out.print("final ");
                }
                out.print(&format!("{} {}", self.type_name(ty), name));
            }
            VarReference::Name(name) => out.print(name),
        }
        if let Some(init) = var.initializer {
            out.print(" = ");
            ast.accept_void(init, self, out);
        }
    }

    fn visit_raw_expr(&mut self, _ast: &Ast, _id: NodeId, text: &str, out: &mut SourcePrinter) {
        out.print(text.trim());
    }

    fn visit_comment(&mut self, _ast: &Ast, _id: NodeId, comment: &Comment, out: &mut SourcePrinter) {
        match comment.kind {
            CommentKind::Line => {
                for line in comment.lines() {
                    out.println(&format!("// {}", line.trim_end()));
                }
            }
            CommentKind::Block => {
                out.println(&format!("/* {} */", comment.text.replace("*/", "* /")));
            }
            CommentKind::Doc => {
                out.println("/**");
                for line in comment.lines() {
                    out.println(&format!(" * {}", line.replace("*/", "* /").trim_end()));
                }
                out.println(" */");
            }
        }
    }
}
