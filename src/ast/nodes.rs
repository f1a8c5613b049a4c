use super::NodeId;
use crate::types::{TypeDescriptor, TypeParameterDecl};
use std::fmt;

/// Closed set of node kinds stored in the [`Ast`](super::Ast) arena
#[derive(Debug, Clone)]
pub enum NodeKind {
    // Declarations
    Class(ClassDecl),
    Method(MethodDecl),
    Field(FieldDecl),

    // Statements
    Block(Block),
    If(IfStmt),
    ExprStmt(ExprStmt),
    /// Verbatim statement text, rendered with a trailing `;`
    RawStmt(String),

    // Expressions
    Name(String),
    Literal(Literal),
    MethodCall(MethodCallExpr),
    ObjectCreation(ObjectCreationExpr),
    Var(VarExpr),
    /// Verbatim expression text
    RawExpr(String),

    Comment(Comment),
}

/// Coarse node category used to validate attachments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Declaration,
    Statement,
    Expression,
    Comment,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Declaration => write!(f, "declaration"),
            Category::Statement => write!(f, "statement"),
            Category::Expression => write!(f, "expression"),
            Category::Comment => write!(f, "comment"),
        }
    }
}

impl NodeKind {
    pub fn category(&self) -> Category {
        match self {
            NodeKind::Class(_) | NodeKind::Method(_) | NodeKind::Field(_) => Category::Declaration,
            NodeKind::Block(_) | NodeKind::If(_) | NodeKind::ExprStmt(_) | NodeKind::RawStmt(_) => {
                Category::Statement
            }
            NodeKind::Name(_)
            | NodeKind::Literal(_)
            | NodeKind::MethodCall(_)
            | NodeKind::ObjectCreation(_)
            | NodeKind::Var(_)
            | NodeKind::RawExpr(_) => Category::Expression,
            NodeKind::Comment(_) => Category::Comment,
        }
    }

    /// Short label used in diagnostics and tree dumps
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Class(_) => "Class",
            NodeKind::Method(_) => "Method",
            NodeKind::Field(_) => "Field",
            NodeKind::Block(_) => "Block",
            NodeKind::If(_) => "If",
            NodeKind::ExprStmt(_) => "ExprStmt",
            NodeKind::RawStmt(_) => "RawStmt",
            NodeKind::Name(_) => "Name",
            NodeKind::Literal(_) => "Literal",
            NodeKind::MethodCall(_) => "MethodCall",
            NodeKind::ObjectCreation(_) => "ObjectCreation",
            NodeKind::Var(_) => "Var",
            NodeKind::RawExpr(_) => "RawExpr",
            NodeKind::Comment(_) => "Comment",
        }
    }

    /// Child node ids in rendering order
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Class(c) => c.members.clone(),
            NodeKind::Method(m) => m.body.into_iter().collect(),
            NodeKind::Field(f) => f.initializer.into_iter().collect(),
            NodeKind::Block(b) => b.statements.clone(),
            NodeKind::If(s) => s
                .condition
                .into_iter()
                .chain(std::iter::once(s.then_block))
                .chain(s.else_block)
                .collect(),
            NodeKind::ExprStmt(s) => s.expression.into_iter().collect(),
            NodeKind::MethodCall(call) => {
                let mut children = Vec::with_capacity(call.arguments.len() + 1);
                if let CallScope::Expr(scope) = &call.scope {
                    children.push(*scope);
                }
                children.extend(call.arguments.iter().copied());
                children
            }
            NodeKind::ObjectCreation(o) => o.arguments.clone(),
            NodeKind::Var(v) => v.initializer.into_iter().collect(),
            NodeKind::RawStmt(_)
            | NodeKind::Name(_)
            | NodeKind::Literal(_)
            | NodeKind::RawExpr(_)
            | NodeKind::Comment(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Synchronized,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Synchronized => "synchronized",
        };
        write!(f, "{}", keyword)
    }
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub extends: Option<TypeDescriptor>,
    pub implements: Vec<TypeDescriptor>,
    pub members: Vec<NodeId>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            modifiers: Vec::new(),
            name: name.into(),
            extends: None,
            implements: Vec::new(),
            members: Vec::new(),
        }
    }
}

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub modifiers: Vec<Modifier>,
    pub ty: TypeDescriptor,
    pub name: String,
}

impl Parameter {
    pub fn new(ty: TypeDescriptor, name: impl Into<String>) -> Self {
        Self {
            modifiers: Vec::new(),
            ty,
            name: name.into(),
        }
    }

    pub fn final_param(ty: TypeDescriptor, name: impl Into<String>) -> Self {
        Self {
            modifiers: vec![Modifier::Final],
            ty,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub modifiers: Vec<Modifier>,
    /// Marker annotations rendered above the declaration, without `@`
    pub annotations: Vec<String>,
    pub type_params: Vec<TypeParameterDecl>,
    /// `None` renders as `void`
    pub return_type: Option<TypeDescriptor>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<TypeDescriptor>,
    pub body: Option<NodeId>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            modifiers: Vec::new(),
            annotations: Vec::new(),
            type_params: Vec::new(),
            return_type: None,
            name: name.into(),
            parameters: Vec::new(),
            throws: Vec::new(),
            body: None,
        }
    }
}

impl fmt::Display for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "method {}(", self.name)?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p.name)?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub modifiers: Vec<Modifier>,
    pub ty: TypeDescriptor,
    pub name: String,
    pub initializer: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct Block {
    pub statements: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Option<NodeId>,
    pub then_block: NodeId,
    pub else_block: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct ExprStmt {
    pub expression: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Char(char),
    Integer(i64),
    Boolean(bool),
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "\"{}\"", escape_java(s)),
            Literal::Char(c) => match c {
                '\'' => write!(f, "'\\''"),
                '"' => write!(f, "'\"'"),
                c => write!(f, "'{}'", escape_java(&c.to_string())),
            },
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "null"),
        }
    }
}

/// Escape text for inclusion in a double-quoted literal
pub fn escape_java(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if (c as u32) < 0x20 => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Receiver of a method call
#[derive(Debug, Clone)]
pub enum CallScope {
    None,
    Expr(NodeId),
    /// Static call through a type name
    Type(TypeDescriptor),
}

#[derive(Debug, Clone)]
pub struct MethodCallExpr {
    pub scope: CallScope,
    pub name: String,
    pub arguments: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ObjectCreationExpr {
    pub ty: TypeDescriptor,
    pub arguments: Vec<NodeId>,
}

/// How a variable reference renders, decided when the node is built
#[derive(Debug, Clone)]
pub enum VarReference {
    /// First textual reference: `[final] Type name`
    Declare {
        ty: TypeDescriptor,
        name: String,
        is_final: bool,
    },
    Name(String),
}

impl VarReference {
    pub fn name(&self) -> &str {
        match self {
            VarReference::Declare { name, .. } => name,
            VarReference::Name(name) => name,
        }
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self, VarReference::Declare { .. })
    }
}

#[derive(Debug, Clone)]
pub struct VarExpr {
    pub reference: VarReference,
    pub initializer: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
    Doc,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
}

impl Comment {
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Line,
            text: text.into(),
        }
    }

    /// Lines of the text, split at every Java line terminator
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        java_lines(&self.text)
    }
}

/// Split at `\n`, `\r\n` and a lone `\r`; javac ends a line at each of them
pub fn java_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().flat_map(|line| line.split('\r'))
}
