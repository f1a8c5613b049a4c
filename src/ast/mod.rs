//! Abstract Syntax Tree for generated source
//!
//! Nodes live in an [`Ast`] arena and are addressed by [`NodeId`]. Every node has at
//! most one parent, stored as an index; attaching a node to a new parent detaches it
//! from the old one, and attaching a node below itself is rejected.

mod nodes;
mod outline;
mod printer;
mod visitor;

pub use nodes::*;
pub use outline::*;
pub use printer::*;
pub use visitor::*;

use crate::error::{Error, Result};
use std::fmt;

/// Index of a node inside its [`Ast`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

/// What a child slot accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Member,
    Statement,
    Expression,
    Block,
}

impl Slot {
    fn accepts(self, kind: &NodeKind) -> bool {
        match self {
            Slot::Member => matches!(kind.category(), Category::Declaration | Category::Comment),
            Slot::Statement => matches!(kind.category(), Category::Statement | Category::Comment),
            Slot::Expression => kind.category() == Category::Expression,
            Slot::Block => matches!(kind, NodeKind::Block(_)),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Member => write!(f, "class member"),
            Slot::Statement => write!(f, "statement"),
            Slot::Expression => write!(f, "expression"),
            Slot::Block => write!(f, "block"),
        }
    }
}

/// Arena owning every node of one translation unit
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node. Children referenced by `kind` are adopted (and detached from
    /// their previous parents); each must fit the slot it is placed in.
    pub fn add(&mut self, kind: NodeKind) -> Result<NodeId> {
        let slots = slots_of(&kind);
        for (i, (child, slot)) in slots.iter().enumerate() {
            self.check_child(*child, *slot, kind.label())?;
            self.check_detachable(*child)?;
            if slots[..i].iter().any(|(other, _)| other == child) {
                return Err(Error::invalid_node(format!(
                    "node {} appears twice in the same {}",
                    child,
                    kind.label()
                )));
            }
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent: None, kind });
        for (child, _) in slots {
            self.detach(child)?;
            self.nodes[child.0].parent = Some(id);
        }
        Ok(id)
    }

    /// Add an empty block
    pub fn add_block(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            kind: NodeKind::Block(Block::default()),
        });
        id
    }

    /// Add an if statement together with its (empty) then-block
    pub fn add_if(&mut self, condition: Option<NodeId>) -> Result<NodeId> {
        let then_block = self.add_block();
        self.add(NodeKind::If(IfStmt {
            condition,
            then_block,
            else_block: None,
        }))
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// Iterate over the ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    pub fn find_enclosing<P>(&self, id: NodeId, predicate: P) -> Option<NodeId>
    where
        P: Fn(&NodeKind) -> bool,
    {
        self.ancestors(id).find(|ancestor| predicate(self.kind(*ancestor)))
    }

    pub fn enclosing_method(&self, id: NodeId) -> Option<NodeId> {
        self.find_enclosing(id, |kind| matches!(kind, NodeKind::Method(_)))
    }

    pub fn enclosing_class(&self, id: NodeId) -> Option<NodeId> {
        self.find_enclosing(id, |kind| matches!(kind, NodeKind::Class(_)))
    }

    /// Append `child` to a block, class body, or argument list
    pub fn append(&mut self, container: NodeId, child: NodeId) -> Result<()> {
        let slot = match self.kind(container) {
            NodeKind::Block(_) => Slot::Statement,
            NodeKind::Class(_) => Slot::Member,
            NodeKind::MethodCall(_) | NodeKind::ObjectCreation(_) => Slot::Expression,
            other => {
                return Err(Error::invalid_node(format!(
                    "{} {} cannot hold appended children",
                    other.label(),
                    container
                )))
            }
        };
        self.adopt(container, child, slot)?;
        match &mut self.nodes[container.0].kind {
            NodeKind::Block(b) => b.statements.push(child),
            NodeKind::Class(c) => c.members.push(child),
            NodeKind::MethodCall(call) => call.arguments.push(child),
            NodeKind::ObjectCreation(o) => o.arguments.push(child),
            _ => unreachable!("container kind checked above"),
        }
        Ok(())
    }

    pub fn set_condition(&mut self, if_stmt: NodeId, condition: NodeId) -> Result<()> {
        self.expect_kind(if_stmt, "If", |k| matches!(k, NodeKind::If(_)))?;
        self.adopt(if_stmt, condition, Slot::Expression)?;
        let previous = match &mut self.nodes[if_stmt.0].kind {
            NodeKind::If(s) => s.condition.replace(condition),
            _ => None,
        };
        self.orphan(previous);
        Ok(())
    }

    pub fn set_else(&mut self, if_stmt: NodeId, block: NodeId) -> Result<()> {
        self.expect_kind(if_stmt, "If", |k| matches!(k, NodeKind::If(_)))?;
        self.adopt(if_stmt, block, Slot::Block)?;
        let previous = match &mut self.nodes[if_stmt.0].kind {
            NodeKind::If(s) => s.else_block.replace(block),
            _ => None,
        };
        self.orphan(previous);
        Ok(())
    }

    /// Initializer of a variable reference or field declaration
    pub fn set_initializer(&mut self, target: NodeId, initializer: NodeId) -> Result<()> {
        self.expect_kind(target, "Var or Field", |k| {
            matches!(k, NodeKind::Var(_) | NodeKind::Field(_))
        })?;
        self.adopt(target, initializer, Slot::Expression)?;
        let previous = match &mut self.nodes[target.0].kind {
            NodeKind::Var(v) => v.initializer.replace(initializer),
            NodeKind::Field(f) => f.initializer.replace(initializer),
            _ => None,
        };
        self.orphan(previous);
        Ok(())
    }

    pub fn set_scope(&mut self, call: NodeId, scope: NodeId) -> Result<()> {
        self.expect_kind(call, "MethodCall", |k| matches!(k, NodeKind::MethodCall(_)))?;
        self.adopt(call, scope, Slot::Expression)?;
        let previous = match &mut self.nodes[call.0].kind {
            NodeKind::MethodCall(c) => match std::mem::replace(&mut c.scope, CallScope::Expr(scope)) {
                CallScope::Expr(old) => Some(old),
                _ => None,
            },
            _ => None,
        };
        self.orphan(previous);
        Ok(())
    }

    pub fn set_body(&mut self, method: NodeId, body: NodeId) -> Result<()> {
        self.expect_kind(method, "Method", |k| matches!(k, NodeKind::Method(_)))?;
        self.adopt(method, body, Slot::Block)?;
        let previous = match &mut self.nodes[method.0].kind {
            NodeKind::Method(m) => m.body.replace(body),
            _ => None,
        };
        self.orphan(previous);
        Ok(())
    }

    pub fn set_expression(&mut self, statement: NodeId, expression: NodeId) -> Result<()> {
        self.expect_kind(statement, "ExprStmt", |k| matches!(k, NodeKind::ExprStmt(_)))?;
        self.adopt(statement, expression, Slot::Expression)?;
        let previous = match &mut self.nodes[statement.0].kind {
            NodeKind::ExprStmt(s) => s.expression.replace(expression),
            _ => None,
        };
        self.orphan(previous);
        Ok(())
    }

    /// Remove `child` from its parent's slot. Detached nodes stay in the arena
    /// but are no longer reachable from the tree.
    pub fn detach(&mut self, child: NodeId) -> Result<()> {
        self.check_detachable(child)?;
        let Some(parent) = self.nodes[child.0].parent else {
            return Ok(());
        };
        match &mut self.nodes[parent.0].kind {
            NodeKind::Class(c) => c.members.retain(|m| *m != child),
            NodeKind::Block(b) => b.statements.retain(|s| *s != child),
            NodeKind::MethodCall(call) => {
                call.arguments.retain(|a| *a != child);
                if matches!(call.scope, CallScope::Expr(s) if s == child) {
                    call.scope = CallScope::None;
                }
            }
            NodeKind::ObjectCreation(o) => o.arguments.retain(|a| *a != child),
            NodeKind::Method(m) if m.body == Some(child) => m.body = None,
            NodeKind::Field(f) if f.initializer == Some(child) => f.initializer = None,
            NodeKind::Var(v) if v.initializer == Some(child) => v.initializer = None,
            NodeKind::ExprStmt(s) if s.expression == Some(child) => s.expression = None,
            NodeKind::If(s) => {
                if s.condition == Some(child) {
                    s.condition = None;
                }
                if s.else_block == Some(child) {
                    s.else_block = None;
                }
            }
            _ => {}
        }
        self.nodes[child.0].parent = None;
        Ok(())
    }

    /// Mutable access to a method declaration; the body slot must be changed
    /// through [`Ast::set_body`]
    pub fn method_mut(&mut self, id: NodeId) -> Result<&mut MethodDecl> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Method(m) => Ok(m),
            other => Err(Error::invalid_node(format!("{} {} is not a method", other.label(), id))),
        }
    }

    pub fn class_mut(&mut self, id: NodeId) -> Result<&mut ClassDecl> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Class(c) => Ok(c),
            other => Err(Error::invalid_node(format!("{} {} is not a class", other.label(), id))),
        }
    }

    /// Then-block of an if statement
    pub fn then_block(&self, if_stmt: NodeId) -> Result<NodeId> {
        match self.kind(if_stmt) {
            NodeKind::If(s) => Ok(s.then_block),
            other => Err(Error::invalid_node(format!(
                "{} {} is not an if statement",
                other.label(),
                if_stmt
            ))),
        }
    }

    fn expect_kind<P>(&self, id: NodeId, expected: &str, predicate: P) -> Result<()>
    where
        P: Fn(&NodeKind) -> bool,
    {
        let kind = self.kind(id);
        if predicate(kind) {
            Ok(())
        } else {
            Err(Error::invalid_node(format!(
                "expected {} at {}, found {}",
                expected,
                id,
                kind.label()
            )))
        }
    }

    /// A then-block stays with its if statement
    fn check_detachable(&self, child: NodeId) -> Result<()> {
        let Some(parent) = self.nodes[child.0].parent else {
            return Ok(());
        };
        match &self.nodes[parent.0].kind {
            NodeKind::If(s) if s.then_block == child => Err(Error::invalid_node(format!(
                "then-block {} cannot be detached from {}",
                child, parent
            ))),
            _ => Ok(()),
        }
    }

    fn check_child(&self, child: NodeId, slot: Slot, parent_label: &str) -> Result<()> {
        let kind = self.kind(child);
        if slot.accepts(kind) {
            Ok(())
        } else {
            Err(Error::invalid_node(format!(
                "{} {} cannot be used as a {} of {}",
                kind.label(),
                child,
                slot,
                parent_label
            )))
        }
    }

    fn adopt(&mut self, parent: NodeId, child: NodeId, slot: Slot) -> Result<()> {
        self.check_child(child, slot, self.kind(parent).label())?;
        if child == parent || self.ancestors(parent).any(|a| a == child) {
            return Err(Error::invalid_node(format!(
                "attaching {} under {} would create a cycle",
                child, parent
            )));
        }
        self.detach(child)?;
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    fn orphan(&mut self, previous: Option<NodeId>) {
        if let Some(old) = previous {
            self.nodes[old.0].parent = None;
        }
    }
}

fn slots_of(kind: &NodeKind) -> Vec<(NodeId, Slot)> {
    let mut slots = Vec::new();
    match kind {
        NodeKind::Class(c) => slots.extend(c.members.iter().map(|m| (*m, Slot::Member))),
        NodeKind::Method(m) => slots.extend(m.body.map(|b| (b, Slot::Block))),
        NodeKind::Field(f) => slots.extend(f.initializer.map(|i| (i, Slot::Expression))),
        NodeKind::Block(b) => slots.extend(b.statements.iter().map(|s| (*s, Slot::Statement))),
        NodeKind::If(s) => {
            slots.extend(s.condition.map(|c| (c, Slot::Expression)));
            slots.push((s.then_block, Slot::Block));
            slots.extend(s.else_block.map(|e| (e, Slot::Block)));
        }
        NodeKind::ExprStmt(s) => slots.extend(s.expression.map(|e| (e, Slot::Expression))),
        NodeKind::MethodCall(call) => {
            if let CallScope::Expr(scope) = &call.scope {
                slots.push((*scope, Slot::Expression));
            }
            slots.extend(call.arguments.iter().map(|a| (*a, Slot::Expression)));
        }
        NodeKind::ObjectCreation(o) => {
            slots.extend(o.arguments.iter().map(|a| (*a, Slot::Expression)))
        }
        NodeKind::Var(v) => slots.extend(v.initializer.map(|i| (i, Slot::Expression))),
        NodeKind::RawStmt(_)
        | NodeKind::Name(_)
        | NodeKind::Literal(_)
        | NodeKind::RawExpr(_)
        | NodeKind::Comment(_) => {}
    }
    slots
}
