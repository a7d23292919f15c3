pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod print;

pub use ast::{Node, NodeKind, Shape, Span};
pub use print::{TreePrinter, to_source};
