use std::collections::HashMap;
use std::fmt;

use crate::syntax::ast::Span;

// ─── Symbol ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Param,
    Intrinsic,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Variable  => "variable",
            Self::Function  => "function",
            Self::Param     => "parameter",
            Self::Intrinsic => "intrinsic",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Where the name was introduced. Intrinsics carry the default span.
    pub span: Span,
    /// Position among global declarations; 0 for non-global symbols.
    pub declaration_order: usize,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, span: Span) -> Self {
        Self { name: name.into(), kind, span, declaration_order: 0 }
    }
}

// ─── Scope ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    symbols: HashMap<String, Symbol>,
}

impl Scope {
    pub fn new(kind: ScopeKind) -> Self {
        Self { kind, symbols: HashMap::new() }
    }

    /// Insert or replace. Returns `true` if the name was already declared in
    /// this scope; redeclaration is legal.
    pub fn declare(&mut self, sym: Symbol) -> bool {
        self.symbols.insert(sym.name.clone(), sym).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

// ─── SymbolTable ──────────────────────────────────────────────────────────────

/// Stack of scopes mirroring the runtime environment chain. The bottom entry
/// is the global scope and is never popped.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    top_level_counter: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self { scopes: vec![Scope::new(ScopeKind::Global)], top_level_counter: 0 }
    }

    pub fn push_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope::new(kind));
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn current_scope_kind(&self) -> ScopeKind {
        self.current().kind
    }

    fn current(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    /// Declare in the innermost scope. Global declarations are numbered in
    /// the order they are met.
    pub fn declare(&mut self, mut sym: Symbol) -> bool {
        let top = self.scopes.len() - 1;
        if top == 0 {
            sym.declaration_order = self.top_level_counter;
            self.top_level_counter += 1;
        }
        self.scopes[top].declare(sym)
    }

    /// Innermost scope to outermost.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// All symbols in the global scope, sorted by declaration order.
    pub fn global_symbols(&self) -> Vec<&Symbol> {
        let mut syms: Vec<&Symbol> = self.scopes[0].symbols.values().collect();
        syms.sort_by_key(|s| s.declaration_order);
        syms
    }
}

impl Default for SymbolTable {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Symbol {
        Symbol::new(name, SymbolKind::Variable, Span::new(1, 1))
    }

    #[test]
    fn inner_scope_shadows_and_unwinds() {
        let mut table = SymbolTable::new();
        table.declare(var("x"));
        table.push_scope(ScopeKind::Block);
        table.declare(Symbol::new("x", SymbolKind::Param, Span::new(2, 1)));
        assert_eq!(table.lookup("x").map(|s| s.kind), Some(SymbolKind::Param));
        table.pop_scope();
        assert_eq!(table.lookup("x").map(|s| s.kind), Some(SymbolKind::Variable));
    }

    #[test]
    fn global_scope_survives_extra_pops() {
        let mut table = SymbolTable::new();
        table.pop_scope();
        table.pop_scope();
        assert_eq!(table.depth(), 0);
        assert_eq!(table.current_scope_kind(), ScopeKind::Global);
    }

    #[test]
    fn redeclaration_is_reported_not_rejected() {
        let mut table = SymbolTable::new();
        assert!(!table.declare(var("x")));
        assert!(table.declare(var("x")));
    }

    #[test]
    fn global_symbols_in_order() {
        let mut table = SymbolTable::new();
        table.declare(var("b"));
        table.declare(var("a"));
        table.push_scope(ScopeKind::Function);
        table.declare(var("local"));
        table.pop_scope();
        let names: Vec<&str> = table.global_symbols().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }
}
