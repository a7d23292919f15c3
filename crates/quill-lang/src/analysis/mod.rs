pub mod symbols;
pub mod resolver;

#[cfg(test)]
mod tests;

use crate::error::Error;
use crate::syntax::ast::Node;
use resolver::Resolver;
pub use symbols::{Symbol, SymbolKind, SymbolTable};

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Static pass run before execution. Verifies that every variable read,
/// assignment target and call resolves through the lexical scope chain.
///
/// Returns the global symbols on success, or the first undefined reference
/// found (`S001`).
#[tracing::instrument(level = "debug", skip_all)]
pub fn analyze(root: &Node) -> Result<SymbolTable, Error> {
    let table = Resolver::new().run(root)?;
    tracing::debug!(globals = table.global_symbols().len(), "analysis passed");
    Ok(table)
}
