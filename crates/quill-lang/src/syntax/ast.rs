use std::fmt;

use crate::error::{Error, ErrorCode};

/// Source location attached to every node for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// ─── Node kinds ──────────────────────────────────────────────────────────────

/// The closed set of AST tags. Arity per tag is fixed by the parser:
///
/// | tag                         | children                                   |
/// |-----------------------------|--------------------------------------------|
/// | literals, `VarRef`          | none (payload in `text`)                   |
/// | binary operators            | exactly 2                                  |
/// | `Statement`                 | exactly 1                                  |
/// | `StatementList`, `Unit`     | 1 or more `Statement`                      |
/// | `Definition`                | `VarRef`                                   |
/// | `Assignment`                | `VarRef`, value                            |
/// | `If`                        | condition, `StatementList`, optional `Else`|
/// | `Else`                      | `StatementList`                            |
/// | `While`                     | condition, `StatementList`                 |
/// | `Function`                  | `ParameterList`, `StatementList`           |
/// | `ParameterList`             | 0 or more `VarRef`                         |
/// | `FnCall`                    | `ArgumentList`                             |
/// | `ArgumentList`              | 0 or more expressions                      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    IntLiteral,
    StrLiteral,
    VarRef,

    Add,
    Sub,
    Multiply,
    Divide,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    Equal,
    NotEqual,
    LogicalAnd,
    LogicalOr,

    Statement,
    StatementList,
    Definition,
    Assignment,
    If,
    Else,
    While,
    Function,
    FnCall,
    ArgumentList,
    ParameterList,
    Unit,
}

impl NodeKind {
    pub fn is_binary(&self) -> bool {
        self.is_arithmetic() || self.is_comparison() || self.is_logical()
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Multiply | Self::Divide)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Greater | Self::Less | Self::GreaterEqual | Self::LessEqual | Self::Equal | Self::NotEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Self::LogicalAnd | Self::LogicalOr)
    }

    /// Source-level spelling of an operator tag.
    pub fn operator(&self) -> Option<&'static str> {
        Some(match self {
            Self::Add          => "+",
            Self::Sub          => "-",
            Self::Multiply     => "*",
            Self::Divide       => "/",
            Self::Greater      => ">",
            Self::Less         => "<",
            Self::GreaterEqual => ">=",
            Self::LessEqual    => "<=",
            Self::Equal        => "==",
            Self::NotEqual     => "!=",
            Self::LogicalAnd   => "&&",
            Self::LogicalOr    => "||",
            _ => return None,
        })
    }
}

// ─── Node ────────────────────────────────────────────────────────────────────

/// One AST node. Children are owned outright; a node never has two parents.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Identifier name or literal text. Empty for tags without a payload.
    pub text: String,
    pub children: Vec<Node>,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, text: String::new(), children: Vec::new(), span }
    }

    pub fn leaf(kind: NodeKind, text: impl Into<String>, span: Span) -> Self {
        Self { kind, text: text.into(), children: Vec::new(), span }
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>, span: Span) -> Self {
        Self { kind, text: String::new(), children, span }
    }

    pub fn binary(kind: NodeKind, left: Node, right: Node, span: Span) -> Self {
        Self::with_children(kind, vec![left, right], span)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn child(&self, i: usize) -> Option<&Node> {
        self.children.get(i)
    }

    /// Child `i`, or an internal fault when the node is malformed. The parser
    /// never builds such a node; this guards hand-built trees.
    pub fn kid(&self, i: usize) -> Result<&Node, Error> {
        self.children.get(i).ok_or_else(|| Error::at(
            ErrorCode::R001,
            &self.span,
            format!("malformed {} node: missing child {i}", self.kind.display_name()),
        ))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Tag/arity fingerprint used to compare tree shapes regardless of
    /// literal text and locations.
    pub fn shape(&self) -> Shape {
        Shape {
            kind: self.kind,
            children: self.children.iter().map(Node::shape).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub kind: NodeKind,
    pub children: Vec<Shape>,
}
