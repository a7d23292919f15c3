//! Name resolution. Walks the tree once, keeping a scope stack shaped like
//! the runtime environment chain, and rejects any read or call of a name that
//! no enclosing scope defines.

use crate::error::{Error, ErrorCode};
use crate::runtime::intrinsics::Intrinsic;
use crate::syntax::ast::{Node, NodeKind, Span};
use super::symbols::{ScopeKind, Symbol, SymbolKind, SymbolTable};

pub struct Resolver {
    table: SymbolTable,
}

impl Resolver {
    /// Starts with the intrinsics visible in the global scope.
    pub fn new() -> Self {
        let mut table = SymbolTable::new();
        for i in Intrinsic::ALL {
            table.declare(Symbol::new(i.name(), SymbolKind::Intrinsic, Span::default()));
        }
        Self { table }
    }

    pub fn run(mut self, root: &Node) -> Result<SymbolTable, Error> {
        self.walk(root)?;
        Ok(self.table)
    }

    fn walk(&mut self, node: &Node) -> Result<(), Error> {
        match node.kind {
            NodeKind::VarRef => self.resolve(&node.text, &node.span),

            NodeKind::FnCall => {
                self.resolve(&node.text, &node.span)?;
                self.walk_children(node)
            }

            NodeKind::Definition => {
                let target = node.kid(0)?;
                self.table.declare(Symbol::new(&target.text, SymbolKind::Variable, target.span));
                Ok(())
            }

            NodeKind::If => {
                self.walk(node.kid(0)?)?;
                self.walk_scoped(node.kid(1)?, ScopeKind::Block)?;
                match node.child(2) {
                    Some(else_node) => self.walk(else_node),
                    None => Ok(()),
                }
            }
            NodeKind::Else => self.walk_scoped(node.kid(0)?, ScopeKind::Block),
            NodeKind::While => {
                self.walk(node.kid(0)?)?;
                self.walk_scoped(node.kid(1)?, ScopeKind::Block)
            }

            NodeKind::Function => {
                // Declared before the body so the body can recurse.
                self.table.declare(Symbol::new(&node.text, SymbolKind::Function, node.span));
                self.table.push_scope(ScopeKind::Function);
                let result = self.walk_function(node);
                self.table.pop_scope();
                result
            }
            NodeKind::ParameterList => {
                for param in &node.children {
                    self.table.declare(Symbol::new(&param.text, SymbolKind::Param, param.span));
                }
                Ok(())
            }

            _ => self.walk_children(node),
        }
    }

    fn walk_children(&mut self, node: &Node) -> Result<(), Error> {
        for child in &node.children {
            self.walk(child)?;
        }
        Ok(())
    }

    fn walk_scoped(&mut self, block: &Node, kind: ScopeKind) -> Result<(), Error> {
        self.table.push_scope(kind);
        let result = self.walk(block);
        self.table.pop_scope();
        result
    }

    fn walk_function(&mut self, node: &Node) -> Result<(), Error> {
        self.walk(node.kid(0)?)?;
        self.walk(node.kid(1)?)
    }

    fn resolve(&self, name: &str, span: &Span) -> Result<(), Error> {
        match self.table.lookup(name) {
            Some(sym) => {
                tracing::trace!(name, kind = %sym.kind, line = span.line, "resolved");
                Ok(())
            }
            None => Err(Error::at(
                ErrorCode::S001,
                span,
                format!("undefined reference to name '{name}'"),
            )),
        }
    }
}

impl Default for Resolver {
    fn default() -> Self { Self::new() }
}
