use std::fmt;

use crate::syntax::ast::Span;

/// Error codes prefixed by phase: L = lexer, P = parser, S = semantic,
/// E = evaluation, R = interpreter-internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Lexer
    L001, // unexpected character
    L002, // unterminated string literal
    L003, // invalid escape sequence

    // Parser
    P001, // unexpected token
    P002, // premature end of input

    // Semantic
    S001, // undefined reference

    // Evaluation
    E001, // division by zero
    E002, // non-numeric operand
    E003, // wrong argument count
    E004, // not callable
    E005, // input / output failure
    E006, // read before assignment
    E007, // integer overflow or literal out of range

    // Internal
    R001, // malformed node shape
}

/// Which stage of the pipeline raised a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Lexical,
    Syntax,
    Semantic,
    Evaluation,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L001 => "L001",
            Self::L002 => "L002",
            Self::L003 => "L003",
            Self::P001 => "P001",
            Self::P002 => "P002",
            Self::S001 => "S001",
            Self::E001 => "E001",
            Self::E002 => "E002",
            Self::E003 => "E003",
            Self::E004 => "E004",
            Self::E005 => "E005",
            Self::E006 => "E006",
            Self::E007 => "E007",
            Self::R001 => "R001",
        }
    }

    pub fn kind(&self) -> FaultKind {
        match self {
            Self::L001 | Self::L002 | Self::L003 => FaultKind::Lexical,
            Self::P001 | Self::P002 => FaultKind::Syntax,
            Self::S001 => FaultKind::Semantic,
            Self::E001 | Self::E002 | Self::E003 | Self::E004
            | Self::E005 | Self::E006 | Self::E007 => FaultKind::Evaluation,
            Self::R001 => FaultKind::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lexical    => "Lexical error",
            Self::Syntax     => "Syntax error",
            Self::Semantic   => "Semantic error",
            Self::Evaluation => "Evaluation error",
            Self::Internal   => "Runtime error",
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────

/// A fault raised anywhere in the pipeline. None of them are recoverable from
/// inside the language; each one aborts the parse, analysis or execution that
/// raised it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{line}:{column}: {kind} [{code}]: {message}", kind = .code.kind())]
pub struct Error {
    pub code: ErrorCode,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Error {
    pub fn new(code: ErrorCode, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { code, line, column, message: message.into() }
    }

    pub fn at(code: ErrorCode, span: &Span, message: impl Into<String>) -> Self {
        Self::new(code, span.line, span.column, message)
    }

    pub fn kind(&self) -> FaultKind {
        self.code.kind()
    }

    pub fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }
}
