use super::*;

/// Value-producing visitor. `A` is a caller-supplied argument threaded through
/// the traversal; each method decides itself whether to descend.
pub trait GenericVisitor<A> {
    type Output;

    // Declarations
    fn visit_class(&mut self, ast: &Ast, id: NodeId, class: &ClassDecl, arg: &mut A) -> Self::Output;
    fn visit_method(&mut self, ast: &Ast, id: NodeId, method: &MethodDecl, arg: &mut A) -> Self::Output;
    fn visit_field(&mut self, ast: &Ast, id: NodeId, field: &FieldDecl, arg: &mut A) -> Self::Output;

    // Statements
    fn visit_block(&mut self, ast: &Ast, id: NodeId, block: &Block, arg: &mut A) -> Self::Output;
    fn visit_if(&mut self, ast: &Ast, id: NodeId, stmt: &IfStmt, arg: &mut A) -> Self::Output;
    fn visit_expr_stmt(&mut self, ast: &Ast, id: NodeId, stmt: &ExprStmt, arg: &mut A) -> Self::Output;
    fn visit_raw_stmt(&mut self, ast: &Ast, id: NodeId, text: &str, arg: &mut A) -> Self::Output;

    // Expressions
    fn visit_name(&mut self, ast: &Ast, id: NodeId, name: &str, arg: &mut A) -> Self::Output;
    fn visit_literal(&mut self, ast: &Ast, id: NodeId, literal: &Literal, arg: &mut A) -> Self::Output;
    fn visit_method_call(&mut self, ast: &Ast, id: NodeId, call: &MethodCallExpr, arg: &mut A) -> Self::Output;
    fn visit_object_creation(&mut self, ast: &Ast, id: NodeId, expr: &ObjectCreationExpr, arg: &mut A) -> Self::Output;
    fn visit_var(&mut self, ast: &Ast, id: NodeId, var: &VarExpr, arg: &mut A) -> Self::Output;
    fn visit_raw_expr(&mut self, ast: &Ast, id: NodeId, text: &str, arg: &mut A) -> Self::Output;

    fn visit_comment(&mut self, ast: &Ast, id: NodeId, comment: &Comment, arg: &mut A) -> Self::Output;
}

/// Side-effecting visitor. Every method defaults to visiting the node's
/// children in rendering order, so implementors override only what they need.
pub trait VoidVisitor<A> {
    fn visit_class(&mut self, ast: &Ast, id: NodeId, _class: &ClassDecl, arg: &mut A) {
        walk_children(self, ast, id, arg);
    }

    fn visit_method(&mut self, ast: &Ast, id: NodeId, _method: &MethodDecl, arg: &mut A) {
        walk_children(self, ast, id, arg);
    }

    fn visit_field(&mut self, ast: &Ast, id: NodeId, _field: &FieldDecl, arg: &mut A) {
        walk_children(self, ast, id, arg);
    }

    fn visit_block(&mut self, ast: &Ast, id: NodeId, _block: &Block, arg: &mut A) {
        walk_children(self, ast, id, arg);
    }

    fn visit_if(&mut self, ast: &Ast, id: NodeId, _stmt: &IfStmt, arg: &mut A) {
        walk_children(self, ast, id, arg);
    }

    fn visit_expr_stmt(&mut self, ast: &Ast, id: NodeId, _stmt: &ExprStmt, arg: &mut A) {
        walk_children(self, ast, id, arg);
    }

    fn visit_raw_stmt(&mut self, _ast: &Ast, _id: NodeId, _text: &str, _arg: &mut A) {}

    fn visit_name(&mut self, _ast: &Ast, _id: NodeId, _name: &str, _arg: &mut A) {}

    fn visit_literal(&mut self, _ast: &Ast, _id: NodeId, _literal: &Literal, _arg: &mut A) {}

    fn visit_method_call(&mut self, ast: &Ast, id: NodeId, _call: &MethodCallExpr, arg: &mut A) {
        walk_children(self, ast, id, arg);
    }

    fn visit_object_creation(&mut self, ast: &Ast, id: NodeId, _expr: &ObjectCreationExpr, arg: &mut A) {
        walk_children(self, ast, id, arg);
    }

    fn visit_var(&mut self, ast: &Ast, id: NodeId, _var: &VarExpr, arg: &mut A) {
        walk_children(self, ast, id, arg);
    }

    fn visit_raw_expr(&mut self, _ast: &Ast, _id: NodeId, _text: &str, _arg: &mut A) {}

    fn visit_comment(&mut self, _ast: &Ast, _id: NodeId, _comment: &Comment, _arg: &mut A) {}
}

/// Visit every child of `id` in rendering order
pub fn walk_children<V, A>(visitor: &mut V, ast: &Ast, id: NodeId, arg: &mut A)
where
    V: VoidVisitor<A> + ?Sized,
{
    for child in ast.children(id) {
        ast.accept_void(child, visitor, arg);
    }
}

impl Ast {
    /// Dispatch `id` to the matching [`GenericVisitor`] method
    pub fn accept<V, A>(&self, id: NodeId, visitor: &mut V, arg: &mut A) -> V::Output
    where
        V: GenericVisitor<A> + ?Sized,
    {
        match self.kind(id) {
            NodeKind::Class(c) => visitor.visit_class(self, id, c, arg),
            NodeKind::Method(m) => visitor.visit_method(self, id, m, arg),
            NodeKind::Field(f) => visitor.visit_field(self, id, f, arg),
            NodeKind::Block(b) => visitor.visit_block(self, id, b, arg),
            NodeKind::If(s) => visitor.visit_if(self, id, s, arg),
            NodeKind::ExprStmt(s) => visitor.visit_expr_stmt(self, id, s, arg),
            NodeKind::RawStmt(t) => visitor.visit_raw_stmt(self, id, t, arg),
            NodeKind::Name(n) => visitor.visit_name(self, id, n, arg),
            NodeKind::Literal(l) => visitor.visit_literal(self, id, l, arg),
            NodeKind::MethodCall(c) => visitor.visit_method_call(self, id, c, arg),
            NodeKind::ObjectCreation(o) => visitor.visit_object_creation(self, id, o, arg),
            NodeKind::Var(v) => visitor.visit_var(self, id, v, arg),
            NodeKind::RawExpr(t) => visitor.visit_raw_expr(self, id, t, arg),
            NodeKind::Comment(c) => visitor.visit_comment(self, id, c, arg),
        }
    }

    /// Dispatch `id` to the matching [`VoidVisitor`] method
    pub fn accept_void<V, A>(&self, id: NodeId, visitor: &mut V, arg: &mut A)
    where
        V: VoidVisitor<A> + ?Sized,
    {
        match self.kind(id) {
            NodeKind::Class(c) => visitor.visit_class(self, id, c, arg),
            NodeKind::Method(m) => visitor.visit_method(self, id, m, arg),
            NodeKind::Field(f) => visitor.visit_field(self, id, f, arg),
            NodeKind::Block(b) => visitor.visit_block(self, id, b, arg),
            NodeKind::If(s) => visitor.visit_if(self, id, s, arg),
            NodeKind::ExprStmt(s) => visitor.visit_expr_stmt(self, id, s, arg),
            NodeKind::RawStmt(t) => visitor.visit_raw_stmt(self, id, t, arg),
            NodeKind::Name(n) => visitor.visit_name(self, id, n, arg),
            NodeKind::Literal(l) => visitor.visit_literal(self, id, l, arg),
            NodeKind::MethodCall(c) => visitor.visit_method_call(self, id, c, arg),
            NodeKind::ObjectCreation(o) => visitor.visit_object_creation(self, id, o, arg),
            NodeKind::Var(v) => visitor.visit_var(self, id, v, arg),
            NodeKind::RawExpr(t) => visitor.visit_raw_expr(self, id, t, arg),
            NodeKind::Comment(c) => visitor.visit_comment(self, id, c, arg),
        }
    }
}
