//! Per-method generation state
//!
//! Tracks the nesting level of the block currently being filled, the stack of
//! open scopes, and every variable slot allocated in the method.

use super::import::ImportSet;
use super::names::{to_identifier, unique_name};
use super::variable::{MethodId, ScopeId, VarId, Variable};
use crate::ast::{NodeId, VarReference};
use crate::consts::{REQUEST_PARAM, RESPONSE_PARAM};
use crate::error::{Error, Result};
use crate::types::{same_descriptor, TypeDescriptor};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct MethodContext {
    id: MethodId,
    name: String,
    enclosing: Option<MethodId>,
    /// Method declaration node
    declaration: NodeId,
    /// Top-level block of the method; everything the method emits lives below it
    body: NodeId,
    level: usize,
    scopes: Vec<ScopeId>,
    next_scope: usize,
    variables: Vec<Variable>,
    /// Identifiers variables may not take (parameters)
    reserved: HashSet<String>,
}

impl MethodContext {
    pub(crate) fn new(
        id: MethodId,
        name: impl Into<String>,
        enclosing: Option<MethodId>,
        declaration: NodeId,
        body: NodeId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            enclosing,
            declaration,
            body,
            level: 0,
            scopes: vec![ScopeId(0)],
            next_scope: 1,
            variables: Vec::new(),
            reserved: [REQUEST_PARAM, RESPONSE_PARAM]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn id(&self) -> MethodId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enclosing(&self) -> Option<MethodId> {
        self.enclosing
    }

    pub fn declaration(&self) -> NodeId {
        self.declaration
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn reserve_name(&mut self, name: impl Into<String>) {
        self.reserved.insert(name.into());
    }

    pub fn enter_block(&mut self) {
        self.level += 1;
        self.scopes.push(ScopeId(self.next_scope));
        self.next_scope += 1;
    }

    /// Close the innermost block. Slots declared in it are released and can
    /// never be reused again.
    pub fn leave_block(&mut self) -> Result<()> {
        if self.level == 0 {
            return Err(Error::invalid_state(format!(
                "block nesting underflow in method '{}'",
                self.name
            )));
        }
        self.scopes.pop();
        self.level -= 1;
        let level = self.level;
        for v in &mut self.variables {
            if v.declare_level() > level || v.use_level().map_or(false, |used| used > level) {
                v.release();
            }
        }
        Ok(())
    }

    /// Allocate a slot of type `ty` named after `base`.
    ///
    /// A reusable request may get back a released reusable slot of the same type and
    /// base name whose declaring block is still open. Otherwise a fresh slot with a
    /// method-unique name is created.
    pub fn allocate(
        &mut self,
        imports: &mut ImportSet,
        ty: &TypeDescriptor,
        base: &str,
        reusable: bool,
    ) -> VarId {
        let base = to_identifier(base);
        let level = self.level;

        if reusable {
            let open: &[ScopeId] = &self.scopes;
            let candidate = self.variables.iter().position(|v| {
                v.is_reusable()
                    && !v.is_used()
                    && v.base == base
                    && same_descriptor(v.ty(), ty)
                    && v.declare_level() <= level
                    && open.contains(&v.scope)
            });
            if let Some(index) = candidate {
                self.variables[index].acquire(level);
                log::debug!(
                    "reusing slot '{}' in method '{}'",
                    self.variables[index].name(),
                    self.name
                );
                return VarId {
                    method: self.id,
                    index,
                };
            }
        }

        let name = unique_name(&base, |candidate| {
            self.reserved.contains(candidate) || self.variables.iter().any(|v| v.name() == candidate)
        });
        imports.ensure_imported_all(ty);
        let requires_qualified_name = imports.requires_qualification(ty);
        let scope = *self.scopes.last().unwrap_or(&ScopeId(0));
        log::debug!(
            "allocated {} {} at level {} in method '{}'",
            ty,
            name,
            level,
            self.name
        );
        self.variables.push(Variable::new(
            ty.clone(),
            name,
            base,
            requires_qualified_name,
            level,
            scope,
            reusable,
        ));
        VarId {
            method: self.id,
            index: self.variables.len() - 1,
        }
    }

    pub fn variable(&self, var: VarId) -> Result<&Variable> {
        self.check_owner(var)?;
        self.variables
            .get(var.index)
            .ok_or_else(|| Error::invalid_state(format!("unknown variable {}", var)))
    }

    fn variable_mut(&mut self, var: VarId) -> Result<&mut Variable> {
        self.check_owner(var)?;
        let name = &self.name;
        self.variables
            .get_mut(var.index)
            .ok_or_else(|| Error::invalid_state(format!("unknown variable {} in '{}'", var, name)))
    }

    fn check_owner(&self, var: VarId) -> Result<()> {
        if var.method != self.id {
            return Err(Error::invalid_state(format!(
                "variable {} does not belong to method '{}'",
                var, self.name
            )));
        }
        Ok(())
    }

    /// Clear the slot's use level so it may be handed out again
    pub fn release(&mut self, var: VarId) -> Result<()> {
        self.variable_mut(var)?.release();
        Ok(())
    }

    /// Reference to emit at the next textual use of the slot
    pub fn reference(&mut self, var: VarId) -> Result<VarReference> {
        Ok(self.variable_mut(var)?.next_reference())
    }
}
