use super::*;

/// Indented tree dump of an AST, one node per line
///
/// The visitor argument is the current depth.
#[derive(Debug, Default)]
pub struct Outline;

impl Outline {
    pub fn render(ast: &Ast, root: NodeId) -> String {
        ast.accept(root, &mut Outline, &mut 0)
    }

    fn line(&mut self, ast: &Ast, id: NodeId, depth: &mut usize, text: String) -> String {
        let mut out = format!("{}{}\n", "  ".repeat(*depth), text);
        *depth += 1;
        for child in ast.children(id) {
            out.push_str(&ast.accept(child, self, depth));
        }
        *depth -= 1;
        out
    }
}

impl GenericVisitor<usize> for Outline {
    type Output = String;

    fn visit_class(&mut self, ast: &Ast, id: NodeId, class: &ClassDecl, depth: &mut usize) -> String {
        let mut text = format!("Class {}", class.name);
        if let Some(extends) = &class.extends {
            text.push_str(&format!(" extends {}", extends));
        }
        self.line(ast, id, depth, text)
    }

    fn visit_method(&mut self, ast: &Ast, id: NodeId, method: &MethodDecl, depth: &mut usize) -> String {
        let params: Vec<String> = method
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect();
        let text = format!("Method {}({})", method.name, params.join(", "));
        self.line(ast, id, depth, text)
    }

    fn visit_field(&mut self, ast: &Ast, id: NodeId, field: &FieldDecl, depth: &mut usize) -> String {
        self.line(ast, id, depth, format!("Field {} {}", field.ty, field.name))
    }

    fn visit_block(&mut self, ast: &Ast, id: NodeId, _block: &Block, depth: &mut usize) -> String {
        self.line(ast, id, depth, "Block".to_string())
    }

    fn visit_if(&mut self, ast: &Ast, id: NodeId, stmt: &IfStmt, depth: &mut usize) -> String {
        let text = if stmt.else_block.is_some() { "If/Else" } else { "If" };
        self.line(ast, id, depth, text.to_string())
    }

    fn visit_expr_stmt(&mut self, ast: &Ast, id: NodeId, _stmt: &ExprStmt, depth: &mut usize) -> String {
        self.line(ast, id, depth, "ExprStmt".to_string())
    }

    fn visit_raw_stmt(&mut self, ast: &Ast, id: NodeId, text: &str, depth: &mut usize) -> String {
        self.line(ast, id, depth, format!("RawStmt `{}`", text))
    }

    fn visit_name(&mut self, ast: &Ast, id: NodeId, name: &str, depth: &mut usize) -> String {
        self.line(ast, id, depth, format!("Name {}", name))
    }

    fn visit_literal(&mut self, ast: &Ast, id: NodeId, literal: &Literal, depth: &mut usize) -> String {
        self.line(ast, id, depth, format!("Literal {}", literal))
    }

    fn visit_method_call(&mut self, ast: &Ast, id: NodeId, call: &MethodCallExpr, depth: &mut usize) -> String {
        let text = match &call.scope {
            CallScope::Type(ty) => format!("MethodCall {}.{}", ty, call.name),
            _ => format!("MethodCall {}", call.name),
        };
        self.line(ast, id, depth, text)
    }

    fn visit_object_creation(&mut self, ast: &Ast, id: NodeId, expr: &ObjectCreationExpr, depth: &mut usize) -> String {
        self.line(ast, id, depth, format!("New {}", expr.ty))
    }

    fn visit_var(&mut self, ast: &Ast, id: NodeId, var: &VarExpr, depth: &mut usize) -> String {
        let text = match &var.reference {
            VarReference::Declare { ty, name, is_final } => {
                format!("Var {}{} {}", if *is_final { "final " } else { "" }, ty, name)
            }
            VarReference::Name(name) => format!("Var {}", name),
        };
        self.line(ast, id, depth, text)
    }

    fn visit_raw_expr(&mut self, ast: &Ast, id: NodeId, text: &str, depth: &mut usize) -> String {
        self.line(ast, id, depth, format!("RawExpr `{}`", text))
    }

    fn visit_comment(&mut self, ast: &Ast, id: NodeId, comment: &Comment, depth: &mut usize) -> String {
        self.line(ast, id, depth, format!("Comment {:?} {}", comment.kind, comment.text))
    }
}
