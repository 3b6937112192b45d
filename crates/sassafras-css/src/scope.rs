//! Lexical scope chain for SCSS variables, mixins, and functions.
//!
//! Scopes hold three disjoint name maps and an optional parent; lookups walk
//! the chain, sets are local. The compiler pushes a scope when it enters a
//! rule-set body, and mixin/function definitions capture their defining
//! scope, so handles are reference-counted and shared rather than copied.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::CompileError;
use crate::function::{Callable, FunctionDef};
use crate::value::Value;

/// A shared handle to one level of the scope chain.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    inner: Rc<RefCell<ScopeInner>>,
}

#[derive(Debug, Default)]
struct ScopeInner {
    parent: Option<Scope>,
    variables: HashMap<String, Value>,
    mixins: HashMap<String, Rc<Callable>>,
    functions: HashMap<String, Rc<FunctionDef>>,
}

impl Scope {
    /// A fresh scope with no parent.
    #[must_use]
    pub fn new() -> Self {
        Scope::default()
    }

    /// A fresh scope whose lookups fall through to `parent`.
    #[must_use]
    pub fn child_of(parent: &Scope) -> Self {
        let scope = Scope::new();
        scope.inner.borrow_mut().parent = Some(parent.clone());
        scope
    }

    /// Bind a variable locally.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        let _ = self
            .inner
            .borrow_mut()
            .variables
            .insert(name.into(), value);
    }

    /// Whether `name` is bound here or in any ancestor.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        let inner = self.inner.borrow();
        inner.variables.contains_key(name)
            || inner.parent.as_ref().is_some_and(|p| p.has(name))
    }

    /// Whether `name` is bound in this scope itself.
    #[must_use]
    pub fn has_local(&self, name: &str) -> bool {
        self.inner.borrow().variables.contains_key(name)
    }

    /// Resolve a variable through the chain.
    ///
    /// # Errors
    /// Fails when no scope binds `name`.
    pub fn get(&self, name: &str) -> Result<Value, CompileError> {
        let inner = self.inner.borrow();
        if let Some(value) = inner.variables.get(name) {
            return Ok(value.clone());
        }
        match &inner.parent {
            Some(parent) => parent.get(name),
            None => Err(CompileError::new(format!("No variable named ${name} found"))),
        }
    }

    /// Bind a mixin locally.
    pub fn set_mixin(&self, name: impl Into<String>, mixin: Rc<Callable>) {
        let _ = self.inner.borrow_mut().mixins.insert(name.into(), mixin);
    }

    /// Whether a mixin named `name` is visible from here.
    #[must_use]
    pub fn has_mixin(&self, name: &str) -> bool {
        let inner = self.inner.borrow();
        inner.mixins.contains_key(name)
            || inner.parent.as_ref().is_some_and(|p| p.has_mixin(name))
    }

    /// Resolve a mixin through the chain.
    ///
    /// # Errors
    /// Fails when no scope defines the mixin.
    pub fn get_mixin(&self, name: &str) -> Result<Rc<Callable>, CompileError> {
        let inner = self.inner.borrow();
        if let Some(mixin) = inner.mixins.get(name) {
            return Ok(Rc::clone(mixin));
        }
        match &inner.parent {
            Some(parent) => parent.get_mixin(name),
            None => Err(CompileError::new(format!("No mixin named {name} found"))),
        }
    }

    /// Bind a function locally.
    pub fn set_function(&self, name: impl Into<String>, function: Rc<FunctionDef>) {
        let _ = self
            .inner
            .borrow_mut()
            .functions
            .insert(name.into(), function);
    }

    /// Whether a function named `name` is visible from here.
    #[must_use]
    pub fn has_function(&self, name: &str) -> bool {
        let inner = self.inner.borrow();
        inner.functions.contains_key(name)
            || inner.parent.as_ref().is_some_and(|p| p.has_function(name))
    }

    /// Resolve a function through the chain.
    ///
    /// # Errors
    /// Fails when no scope defines the function.
    pub fn get_function(&self, name: &str) -> Result<Rc<FunctionDef>, CompileError> {
        let inner = self.inner.borrow();
        if let Some(function) = inner.functions.get(name) {
            return Ok(Rc::clone(function));
        }
        match &inner.parent {
            Some(parent) => parent.get_function(name),
            None => Err(CompileError::new(format!("No function named {name} found"))),
        }
    }

    /// Copy of this scope with its own maps but the same parent pointer.
    ///
    /// Argument binding for a call works on such a copy so the definition
    /// scope itself stays untouched.
    #[must_use]
    pub fn deep_clone(&self) -> Scope {
        let inner = self.inner.borrow();
        let clone = Scope::new();
        {
            let mut clone_inner = clone.inner.borrow_mut();
            clone_inner.parent = inner.parent.clone();
            clone_inner.variables = inner.variables.clone();
            clone_inner.mixins = inner.mixins.clone();
            clone_inner.functions = inner.functions.clone();
        }
        clone
    }

    /// Copy another scope's bindings into this one (imports surface their
    /// variables this way).
    pub fn merge(&self, other: &Scope) {
        let other_inner = other.inner.borrow();
        let mut inner = self.inner.borrow_mut();
        for (name, value) in &other_inner.variables {
            let _ = inner.variables.insert(name.clone(), value.clone());
        }
        for (name, mixin) in &other_inner.mixins {
            let _ = inner.mixins.insert(name.clone(), Rc::clone(mixin));
        }
        for (name, function) in &other_inner.functions {
            let _ = inner.functions.insert(name.clone(), Rc::clone(function));
        }
    }
}
