pub mod syntax;
pub mod analysis;
pub mod runtime;
pub mod error;

pub use error::{Error, ErrorCode, FaultKind};
pub use syntax::{Node, NodeKind, Shape, Span, TreePrinter, to_source};
pub use syntax::token::{Token, TokenKind};
pub use analysis::{Symbol, SymbolKind, SymbolTable};
pub use runtime::{Interpreter, Value};

use std::io::{BufRead, Write};

// ─── Public API ───────────────────────────────────────────────────────────────

/// A parsed and analyzed unit, ready to execute.
#[derive(Debug)]
pub struct Program {
    root: Node,
    symbols: SymbolTable,
}

impl Program {
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Global names visible after analysis, intrinsics included.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// An interpreter over this program, wired to stdin/stdout.
    pub fn interpreter(&self) -> Interpreter<'_> {
        Interpreter::new(&self.root)
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    syntax::lexer::Lexer::new(source).tokenize()
}

/// Lex and parse. The returned root is a `Unit` node.
pub fn parse(source: &str) -> Result<Node, Error> {
    syntax::parser::Parser::new(tokenize(source)?).parse()
}

/// Parse and analyze. Any undefined name is reported here, before a single
/// statement runs.
pub fn compile(source: &str) -> Result<Program, Error> {
    let root = parse(source)?;
    let symbols = analysis::analyze(&root)?;
    Ok(Program { root, symbols })
}

/// Compile and execute against the given I/O, returning the display form of
/// the final value.
pub fn run(source: &str, input: impl BufRead, output: impl Write) -> Result<String, Error> {
    let program = compile(source)?;
    let mut interp = program.interpreter().with_input(input).with_output(output);
    let value = interp.execute()?;
    Ok(value.to_string())
}
