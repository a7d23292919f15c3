//! Lexical scopes. Each `Environment` holds its own bindings plus a link to
//! the enclosing scope; the global scope is the one without a parent.
//!
//! Scopes are reference-counted so a closure can keep its defining scope
//! alive after the call that created it returns. A function defined in a
//! scope is bound into that same scope, so the pair forms an `Rc` cycle;
//! `release` breaks it when the scope is left and nothing else holds it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::runtime::value::Value;

pub type Env<'a> = Rc<RefCell<Environment<'a>>>;

/// Result of resolving a name through the scope chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    Assigned(Value<'a>),
    /// Defined by `var` but never assigned.
    Unassigned,
    Undefined,
}

#[derive(Default)]
pub struct Environment<'a> {
    /// Presence of a key means "defined"; `Some` means "assigned".
    bindings: HashMap<String, Option<Value<'a>>>,
    parent: Option<Env<'a>>,
}

impl<'a> Environment<'a> {
    pub fn global() -> Env<'a> {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn child(parent: &Env<'a>) -> Env<'a> {
        Rc::new(RefCell::new(Self { bindings: HashMap::new(), parent: Some(Rc::clone(parent)) }))
    }

    /// Create (or reset) a binding in this scope, initially unassigned.
    pub fn define(&mut self, name: &str) {
        self.bindings.insert(name.to_string(), None);
    }

    /// Define and assign in one step.
    pub fn bind(&mut self, name: &str, value: Value<'a>) {
        self.bindings.insert(name.to_string(), Some(value));
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn is_assigned(&self, name: &str) -> bool {
        matches!(self.bindings.get(name), Some(Some(_)))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Drop every binding. Breaks closure reference cycles at teardown.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Empty `scope` if the only references left are the caller's handle and
    /// closures bound in `scope` itself that nobody else holds. Returns
    /// whether the bindings were dropped.
    pub fn release(scope: &Env<'a>) -> bool {
        let self_refs = {
            let inner = scope.borrow();
            let mut n = 0;
            for value in inner.bindings.values().flatten() {
                if let Value::Function(f) = value {
                    if Rc::ptr_eq(&f.env, scope) {
                        if Rc::strong_count(f) > 1 {
                            return false;
                        }
                        n += 1;
                    }
                }
            }
            n
        };
        if Rc::strong_count(scope) != 1 + self_refs {
            return false;
        }
        // Drop outside the borrow: a closure's destructor releases its `env`.
        let bindings = std::mem::take(&mut scope.borrow_mut().bindings);
        drop(bindings);
        true
    }

    // ─── Chain operations ─────────────────────────────────────────────────────

    /// The scope that owns `name`: the innermost one with a binding for it,
    /// or the global scope when no scope defines it.
    pub fn owner(env: &Env<'a>, name: &str) -> Env<'a> {
        let mut current = Rc::clone(env);
        loop {
            let next = {
                let scope = current.borrow();
                if scope.has_local(name) {
                    None
                } else {
                    scope.parent.clone()
                }
            };
            match next {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    pub fn lookup(env: &Env<'a>, name: &str) -> Lookup<'a> {
        let owner = Self::owner(env, name);
        let scope = owner.borrow();
        match scope.bindings.get(name) {
            Some(Some(v)) => Lookup::Assigned(v.clone()),
            Some(None)    => Lookup::Unassigned,
            None          => Lookup::Undefined,
        }
    }

    /// Store into the owning scope, which may be an outer one.
    pub fn assign(env: &Env<'a>, name: &str, value: Value<'a>) {
        Self::owner(env, name).borrow_mut().bind(name, value);
    }

    pub fn depth(env: &Env<'a>) -> usize {
        let mut depth = 0;
        let mut current = env.borrow().parent.clone();
        while let Some(scope) = current {
            depth += 1;
            current = scope.borrow().parent.clone();
        }
        depth
    }
}

impl fmt::Debug for Environment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
