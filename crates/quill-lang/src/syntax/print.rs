//! Debug views of the AST: an indented tag tree and a source renderer.
//! Neither is used during evaluation.

use crate::error::Error;
use crate::syntax::ast::{Node, NodeKind};

impl NodeKind {
    /// Canonical display name of a tag.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Add           => "ADD",
            Self::Sub           => "SUB",
            Self::Multiply      => "MULTIPLY",
            Self::Divide        => "DIVIDE",
            Self::VarRef        => "VARREF",
            Self::IntLiteral    => "INT_LITERAL",
            Self::StrLiteral    => "STR_LITERAL",
            Self::Unit          => "UNIT",
            Self::Statement     => "STATEMENT",
            Self::Greater       => "GREATER_THAN",
            Self::Less          => "LESS_THAN",
            Self::GreaterEqual  => "GREATER_THAN_OR_EQUAL",
            Self::LessEqual     => "LESS_THAN_OR_EQUAL",
            Self::Equal         => "EQUAL",
            Self::NotEqual      => "NOT_EQUAL",
            Self::LogicalAnd    => "LOGICAL_AND",
            Self::LogicalOr     => "LOGICAL_OR",
            Self::Definition    => "DEFINITION",
            Self::Assignment    => "ASSIGNMENT",
            Self::If            => "IF",
            Self::Else          => "ELSE",
            Self::StatementList => "STATEMENT_LIST",
            Self::While         => "WHILE",
            Self::FnCall        => "FNCALL",
            Self::ArgumentList  => "ARGLIST",
            Self::Function      => "FUNCTION",
            Self::ParameterList => "PARAMETER_LIST",
        }
    }
}

// ─── Tree printer ─────────────────────────────────────────────────────────────

/// Renders a node as an indented tree, one node per line:
///
/// ```text
/// UNIT
/// +--STATEMENT
///    +--ADD
///       +--INT_LITERAL[2]
///       +--VARREF[x]
/// ```
#[derive(Debug, Default)]
pub struct TreePrinter;

impl TreePrinter {
    pub fn print(&self, root: &Node) -> String {
        let mut out = String::new();
        out.push_str(&label(root));
        out.push('\n');
        self.print_children(root, "", &mut out);
        out
    }

    fn print_children(&self, node: &Node, prefix: &str, out: &mut String) {
        let n = node.children.len();
        for (i, child) in node.children.iter().enumerate() {
            out.push_str(prefix);
            out.push_str("+--");
            out.push_str(&label(child));
            out.push('\n');
            let last = i + 1 == n;
            let next = format!("{prefix}{}", if last { "   " } else { "|  " });
            self.print_children(child, &next, out);
        }
    }
}

fn label(node: &Node) -> String {
    if node.text.is_empty() {
        node.kind.display_name().to_string()
    } else {
        format!("{}[{}]", node.kind.display_name(), node.text)
    }
}

// ─── Source renderer ──────────────────────────────────────────────────────────

/// Render a tree back to concrete syntax. Binary expressions and nested
/// assignments are fully parenthesized, so re-parsing the output gives a
/// tree with the same tag/arity shape.
pub fn to_source(root: &Node) -> Result<String, Error> {
    let mut out = String::new();
    match root.kind {
        NodeKind::Unit | NodeKind::StatementList => {
            for stmt in &root.children {
                write_stmt(stmt, 0, &mut out)?;
            }
        }
        NodeKind::Statement => write_stmt(root, 0, &mut out)?,
        _ => out.push_str(&expr(root)?),
    }
    Ok(out)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn write_stmt(stmt: &Node, depth: usize, out: &mut String) -> Result<(), Error> {
    let inner = stmt.kid(0)?;
    let pad = indent(depth);
    match inner.kind {
        NodeKind::If => {
            out.push_str(&format!("{pad}if ({}) {{\n", expr(inner.kid(0)?)?));
            write_block(inner.kid(1)?, depth + 1, out)?;
            out.push_str(&pad);
            out.push('}');
            if let Some(else_node) = inner.child(2) {
                out.push_str(" else {\n");
                write_block(else_node.kid(0)?, depth + 1, out)?;
                out.push_str(&pad);
                out.push('}');
            }
            out.push('\n');
        }
        NodeKind::While => {
            out.push_str(&format!("{pad}while ({}) {{\n", expr(inner.kid(0)?)?));
            write_block(inner.kid(1)?, depth + 1, out)?;
            out.push_str(&format!("{pad}}}\n"));
        }
        NodeKind::Function => {
            let params: Vec<&str> = inner.kid(0)?.children.iter().map(|p| p.text.as_str()).collect();
            out.push_str(&format!("{pad}function {}({}) {{\n", inner.text, params.join(", ")));
            write_block(inner.kid(1)?, depth + 1, out)?;
            out.push_str(&format!("{pad}}}\n"));
        }
        NodeKind::Definition => {
            out.push_str(&format!("{pad}var {};\n", inner.kid(0)?.text));
        }
        NodeKind::Assignment => {
            out.push_str(&format!("{pad}{};\n", assignment(inner)?));
        }
        _ => out.push_str(&format!("{pad}{};\n", expr(inner)?)),
    }
    Ok(())
}

fn write_block(list: &Node, depth: usize, out: &mut String) -> Result<(), Error> {
    for stmt in &list.children {
        write_stmt(stmt, depth, out)?;
    }
    Ok(())
}

fn assignment(node: &Node) -> Result<String, Error> {
    Ok(format!("{} = {}", node.kid(0)?.text, expr(node.kid(1)?)?))
}

fn expr(node: &Node) -> Result<String, Error> {
    if let Some(op) = node.kind.operator() {
        return Ok(format!("({} {op} {})", expr(node.kid(0)?)?, expr(node.kid(1)?)?));
    }
    Ok(match node.kind {
        NodeKind::IntLiteral => node.text.clone(),
        NodeKind::StrLiteral => format!("\"{}\"", escape(&node.text)),
        NodeKind::VarRef     => node.text.clone(),
        NodeKind::Assignment => format!("({})", assignment(node)?),
        NodeKind::FnCall => {
            let args = node.kid(0)?.children.iter()
                .map(expr)
                .collect::<Result<Vec<_>, _>>()?;
            format!("{}({})", node.text, args.join(", "))
        }
        _ => format!("<{}>", node.kind.display_name()),
    })
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '"'  => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c    => out.push(c),
        }
    }
    out
}
