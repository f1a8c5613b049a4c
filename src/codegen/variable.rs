use crate::ast::VarReference;
use crate::types::TypeDescriptor;
use std::fmt;

/// Index of a method inside its translation context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub(crate) usize);

impl MethodId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a variable slot: owning method plus slot index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId {
    pub method: MethodId,
    pub(crate) index: usize,
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var#{}.{}", self.method.0, self.index)
    }
}

/// Identifies one opened block within a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ScopeId(pub(crate) usize);

/// Named, typed local variable slot
#[derive(Debug, Clone)]
pub struct Variable {
    ty: TypeDescriptor,
    name: String,
    /// Identifier the name was derived from; slots are only reused for the same base
    pub(crate) base: String,
    requires_qualified_name: bool,
    declare_level: usize,
    pub(crate) scope: ScopeId,
    reusable: bool,
    use_level: Option<usize>,
    already_declared: bool,
}

impl Variable {
    pub(crate) fn new(
        ty: TypeDescriptor,
        name: String,
        base: String,
        requires_qualified_name: bool,
        level: usize,
        scope: ScopeId,
        reusable: bool,
    ) -> Self {
        Self {
            ty,
            name,
            base,
            requires_qualified_name,
            declare_level: level,
            scope,
            reusable,
            use_level: Some(level),
            already_declared: false,
        }
    }

    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requires_qualified_name(&self) -> bool {
        self.requires_qualified_name
    }

    pub fn declare_level(&self) -> usize {
        self.declare_level
    }

    pub fn use_level(&self) -> Option<usize> {
        self.use_level
    }

    pub fn is_reusable(&self) -> bool {
        self.reusable
    }

    pub fn is_used(&self) -> bool {
        self.use_level.is_some()
    }

    pub fn is_already_declared(&self) -> bool {
        self.already_declared
    }

    pub(crate) fn acquire(&mut self, level: usize) {
        self.use_level = Some(level);
    }

    pub(crate) fn release(&mut self) {
        self.use_level = None;
    }

    /// Reference to emit at the next textual use: the declaration the first time,
    /// the bare name afterwards
    pub(crate) fn next_reference(&mut self) -> VarReference {
        if self.already_declared {
            return VarReference::Name(self.name.clone());
        }
        self.already_declared = true;
        VarReference::Declare {
            ty: self.ty.clone(),
            name: self.name.clone(),
            is_final: !self.reusable,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}
