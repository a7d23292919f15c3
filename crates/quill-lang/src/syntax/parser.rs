//! Recursive-descent parser. Builds the AST directly from the token stream.
//!
//! Grammar (`Unit` is the start symbol), lowest precedence first:
//!
//! ```text
//! Unit  -> Stmt+
//! Stmt  -> var ident ;
//!        | if ( A ) { SList } [ else { SList } ]
//!        | while ( A ) { SList }
//!        | function ident ( [ident (, ident)*] ) { SList }
//!        | A ;
//! SList -> Stmt+
//! A     -> ident = A | L
//! L     -> R [ (&& | ||) R ]
//! R     -> E [ (> | < | >= | <= | == | !=) E ]
//! E     -> T ( (+ | -) T )*
//! T     -> F ( (* | /) F )*
//! F     -> int | string | ident | ident ( [A (, A)*] ) | ( A )
//! ```
//!
//! `L` and `R` take at most one operator: `a < b < c` and `a && b || c`
//! are syntax errors unless parenthesized.

use crate::syntax::ast::*;
use crate::error::{Error, ErrorCode};
use crate::syntax::token::{Token, TokenKind, TokenStream};

pub struct Parser {
    tokens: TokenStream,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens: TokenStream::new(tokens) }
    }

    /// Parse a whole program. The first error aborts parsing.
    pub fn parse(mut self) -> Result<Node, Error> {
        let mut unit = Node::new(NodeKind::Unit, self.span());
        loop {
            unit.push(self.parse_stmt()?);
            if self.tokens.is_at_end() { break; }
        }
        tracing::debug!(statements = unit.len(), "parsed unit");
        Ok(unit)
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn parse_stmt(&mut self) -> Result<Node, Error> {
        let span = self.span();
        let inner = match self.tokens.peek().kind {
            TokenKind::Eof => {
                return Err(self.eof_error("statement"));
            }
            TokenKind::If       => return Ok(statement(self.parse_if()?, span)),
            TokenKind::While    => return Ok(statement(self.parse_while()?, span)),
            TokenKind::Function => return Ok(statement(self.parse_function()?, span)),
            TokenKind::Var      => self.parse_definition()?,
            _                   => self.parse_assign()?,
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(statement(inner, span))
    }

    fn parse_block(&mut self) -> Result<Node, Error> {
        let open = self.expect(TokenKind::LBrace)?;
        let mut list = Node::new(NodeKind::StatementList, span_of(&open));
        loop {
            list.push(self.parse_stmt()?);
            if self.check(&TokenKind::RBrace) { break; }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(list)
    }

    fn parse_definition(&mut self) -> Result<Node, Error> {
        let kw = self.expect(TokenKind::Var)?;
        let (name, name_span) = self.expect_ident()?;
        Ok(Node::with_children(
            NodeKind::Definition,
            vec![Node::leaf(NodeKind::VarRef, name, name_span)],
            span_of(&kw),
        ))
    }

    fn parse_if(&mut self) -> Result<Node, Error> {
        let kw = self.expect(TokenKind::If)?;
        let condition = self.parse_condition()?;
        let then_block = self.parse_block()?;
        let mut node = Node::with_children(NodeKind::If, vec![condition, then_block], span_of(&kw));
        if self.check(&TokenKind::Else) {
            let else_kw = self.tokens.next();
            let else_block = self.parse_block()?;
            node.push(Node::with_children(NodeKind::Else, vec![else_block], span_of(&else_kw)));
        }
        Ok(node)
    }

    fn parse_while(&mut self) -> Result<Node, Error> {
        let kw = self.expect(TokenKind::While)?;
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Node::with_children(NodeKind::While, vec![condition, body], span_of(&kw)))
    }

    /// `( A )` in `if` / `while` headers.
    fn parse_condition(&mut self) -> Result<Node, Error> {
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_assign()?;
        self.expect(TokenKind::RParen)?;
        Ok(cond)
    }

    fn parse_function(&mut self) -> Result<Node, Error> {
        let kw = self.expect(TokenKind::Function)?;
        let (name, _) = self.expect_ident()?;
        let open = self.expect(TokenKind::LParen)?;
        let mut params = Node::new(NodeKind::ParameterList, span_of(&open));
        if !self.check(&TokenKind::RParen) {
            loop {
                let (p, p_span) = self.expect_ident()?;
                params.push(Node::leaf(NodeKind::VarRef, p, p_span));
                if !self.matches(&TokenKind::Comma) { break; }
            }
        }
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Node::with_children(NodeKind::Function, vec![params, body], span_of(&kw)).with_text(name))
    }

    // ─── Expressions ─────────────────────────────────────────────────────────

    /// `A -> ident = A | L`. Needs two tokens of lookahead to tell an
    /// assignment from an expression that starts with an identifier.
    fn parse_assign(&mut self) -> Result<Node, Error> {
        let is_assign = matches!(self.tokens.peek().kind, TokenKind::Ident(_))
            && self.tokens.peek_nth(2).kind == TokenKind::Eq;
        if !is_assign {
            return self.parse_logical();
        }
        let (name, name_span) = self.expect_ident()?;
        let eq = self.expect(TokenKind::Eq)?;
        let value = self.parse_assign()?;
        Ok(Node::binary(
            NodeKind::Assignment,
            Node::leaf(NodeKind::VarRef, name, name_span),
            value,
            span_of(&eq),
        ))
    }

    fn parse_logical(&mut self) -> Result<Node, Error> {
        let left = self.parse_relational()?;
        let kind = match self.tokens.peek().kind {
            TokenKind::AndAnd => NodeKind::LogicalAnd,
            TokenKind::OrOr   => NodeKind::LogicalOr,
            _ => return Ok(left),
        };
        let op = self.tokens.next();
        let right = self.parse_relational()?;
        Ok(Node::binary(kind, left, right, span_of(&op)))
    }

    fn parse_relational(&mut self) -> Result<Node, Error> {
        let left = self.parse_additive()?;
        let kind = match self.tokens.peek().kind {
            TokenKind::Gt     => NodeKind::Greater,
            TokenKind::Lt     => NodeKind::Less,
            TokenKind::GtEq   => NodeKind::GreaterEqual,
            TokenKind::LtEq   => NodeKind::LessEqual,
            TokenKind::EqEq   => NodeKind::Equal,
            TokenKind::BangEq => NodeKind::NotEqual,
            _ => return Ok(left),
        };
        let op = self.tokens.next();
        let right = self.parse_additive()?;
        Ok(Node::binary(kind, left, right, span_of(&op)))
    }

    fn parse_additive(&mut self) -> Result<Node, Error> {
        let mut left = self.parse_multiplicative()?;
        while self.tokens.peek().kind.is_additive() {
            let op = self.tokens.next();
            let kind = if op.kind == TokenKind::Plus { NodeKind::Add } else { NodeKind::Sub };
            let right = self.parse_multiplicative()?;
            left = Node::binary(kind, left, right, span_of(&op));
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Node, Error> {
        let mut left = self.parse_primary()?;
        while self.tokens.peek().kind.is_multiplicative() {
            let op = self.tokens.next();
            let kind = if op.kind == TokenKind::Star { NodeKind::Multiply } else { NodeKind::Divide };
            let right = self.parse_primary()?;
            left = Node::binary(kind, left, right, span_of(&op));
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Node, Error> {
        let tok = self.tokens.peek().clone();
        let span = span_of(&tok);
        match tok.kind {
            TokenKind::Int(text) => {
                self.tokens.next();
                Ok(Node::leaf(NodeKind::IntLiteral, text, span))
            }
            TokenKind::Str(text) => {
                self.tokens.next();
                Ok(Node::leaf(NodeKind::StrLiteral, text, span))
            }
            TokenKind::Ident(name) => {
                if self.tokens.peek_nth(2).kind == TokenKind::LParen {
                    return self.parse_call();
                }
                self.tokens.next();
                Ok(Node::leaf(NodeKind::VarRef, name, span))
            }
            TokenKind::LParen => {
                self.tokens.next();
                let inner = self.parse_assign()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Eof => Err(self.eof_error("primary expression")),
            other => Err(Error::at(
                ErrorCode::P001,
                &span,
                format!("invalid primary expression, found `{other}`"),
            )),
        }
    }

    fn parse_call(&mut self) -> Result<Node, Error> {
        let (callee, span) = self.expect_ident()?;
        let open = self.expect(TokenKind::LParen)?;
        let mut args = Node::new(NodeKind::ArgumentList, span_of(&open));
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_assign()?);
                if !self.matches(&TokenKind::Comma) { break; }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(Node::with_children(NodeKind::FnCall, vec![args], span).with_text(callee))
    }

    // ─── Token primitives ────────────────────────────────────────────────────

    fn check(&self, kind: &TokenKind) -> bool {
        self.tokens.peek().kind == *kind
    }

    fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) { self.tokens.next(); true } else { false }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        if self.check(&kind) {
            return Ok(self.tokens.next());
        }
        let tok = self.tokens.peek();
        if tok.kind == TokenKind::Eof {
            return Err(self.eof_error(&format!("`{kind}`")));
        }
        Err(Error::new(
            ErrorCode::P001,
            tok.line,
            tok.column,
            format!("unexpected token `{}`, expected `{kind}`", tok.kind),
        ))
    }

    fn expect_ident(&mut self) -> Result<(String, Span), Error> {
        let tok = self.tokens.peek().clone();
        let span = span_of(&tok);
        match tok.kind {
            TokenKind::Ident(name) => {
                self.tokens.next();
                Ok((name, span))
            }
            TokenKind::Eof => Err(self.eof_error("identifier")),
            other => Err(Error::at(
                ErrorCode::P001,
                &span,
                format!("unexpected token `{other}`, expected identifier"),
            )),
        }
    }

    fn span(&self) -> Span {
        span_of(self.tokens.peek())
    }

    fn eof_error(&self, looking_for: &str) -> Error {
        let tok = self.tokens.peek();
        Error::new(
            ErrorCode::P002,
            tok.line,
            tok.column,
            format!("unexpected end of input looking for {looking_for}"),
        )
    }
}

fn span_of(tok: &Token) -> Span {
    Span::new(tok.line, tok.column)
}

fn statement(inner: Node, span: Span) -> Node {
    Node::with_children(NodeKind::Statement, vec![inner], span)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> Node {
        let tokens = Lexer::new(src).tokenize().expect("lex failed");
        Parser::new(tokens).parse().expect("parse failed")
    }

    fn parse_err(src: &str) -> Error {
        let tokens = Lexer::new(src).tokenize().expect("lex failed");
        match Parser::new(tokens).parse() {
            Ok(n) => panic!("expected parse to fail, got {n:#?}"),
            Err(e) => e,
        }
    }

    /// The expression inside the first `Statement`.
    fn first(src: &str) -> Node {
        let unit = parse(src);
        unit.children[0].children[0].clone()
    }

    fn kinds(n: &Node) -> Vec<NodeKind> {
        n.children.iter().map(|c| c.kind).collect()
    }

    // ── program structure ─────────────────────────────────────────────────────

    #[test]
    fn unit_wraps_statements() {
        let unit = parse("1; 2; 3;");
        assert_eq!(unit.kind, NodeKind::Unit);
        assert_eq!(kinds(&unit), vec![NodeKind::Statement; 3]);
        assert!(unit.children.iter().all(|s| s.len() == 1));
    }

    #[test]
    fn empty_program_is_error() {
        let tokens = Lexer::new("").tokenize().unwrap();
        let e = Parser::new(tokens).parse().unwrap_err();
        assert_eq!(e.code, ErrorCode::P002);
    }

    // ── definition / assignment ───────────────────────────────────────────────

    #[test]
    fn var_definition() {
        let def = first("var x;");
        assert_eq!(def.kind, NodeKind::Definition);
        assert_eq!(def.children[0].kind, NodeKind::VarRef);
        assert_eq!(def.children[0].text, "x");
    }

    #[test]
    fn var_definition_missing_name() {
        let e = parse_err("var 3;");
        assert_eq!(e.code, ErrorCode::P001);
        assert!(e.message.contains("identifier"));
    }

    #[test]
    fn assignment() {
        let a = first("x = 1 + 2;");
        assert_eq!(a.kind, NodeKind::Assignment);
        assert_eq!(a.children[0].text, "x");
        assert_eq!(a.children[1].kind, NodeKind::Add);
    }

    #[test]
    fn assignment_is_right_associative() {
        let a = first("x = y = 3;");
        assert_eq!(a.kind, NodeKind::Assignment);
        assert_eq!(a.children[0].text, "x");
        let inner = &a.children[1];
        assert_eq!(inner.kind, NodeKind::Assignment);
        assert_eq!(inner.children[0].text, "y");
        assert_eq!(inner.children[1].text, "3");
    }

    #[test]
    fn assignment_to_expression_is_error() {
        let e = parse_err("(x) = 3;");
        assert_eq!(e.code, ErrorCode::P001);
    }

    #[test]
    fn assignment_carries_eq_location() {
        let a = first("abc = 4;");
        assert_eq!(a.span, Span::new(1, 5));
    }

    // ── precedence / associativity ────────────────────────────────────────────

    #[test]
    fn mul_binds_tighter_than_add() {
        let e = first("2 + 3 * 4;");
        assert_eq!(e.kind, NodeKind::Add);
        assert_eq!(e.children[0].text, "2");
        assert_eq!(e.children[1].kind, NodeKind::Multiply);
    }

    #[test]
    fn parens_override_precedence() {
        let e = first("(2 + 3) * 4;");
        assert_eq!(e.kind, NodeKind::Multiply);
        assert_eq!(e.children[0].kind, NodeKind::Add);
    }

    #[test]
    fn subtraction_is_left_associative() {
        let e = first("10 - 3 - 2;");
        assert_eq!(e.kind, NodeKind::Sub);
        assert_eq!(e.children[0].kind, NodeKind::Sub);
        assert_eq!(e.children[1].text, "2");
    }

    #[test]
    fn division_is_left_associative() {
        let e = first("8 / 4 / 2;");
        assert_eq!(e.kind, NodeKind::Divide);
        assert_eq!(e.children[0].kind, NodeKind::Divide);
    }

    #[test]
    fn comparison_below_arithmetic() {
        let e = first("a + 1 >= b * 2;");
        assert_eq!(e.kind, NodeKind::GreaterEqual);
        assert_eq!(kinds(&e), vec![NodeKind::Add, NodeKind::Multiply]);
    }

    #[test]
    fn logical_below_comparison() {
        let e = first("a < 1 && b != 2;");
        assert_eq!(e.kind, NodeKind::LogicalAnd);
        assert_eq!(kinds(&e), vec![NodeKind::Less, NodeKind::NotEqual]);
    }

    #[test]
    fn all_comparison_ops() {
        for (src, kind) in [
            ("a > b;", NodeKind::Greater),
            ("a < b;", NodeKind::Less),
            ("a >= b;", NodeKind::GreaterEqual),
            ("a <= b;", NodeKind::LessEqual),
            ("a == b;", NodeKind::Equal),
            ("a != b;", NodeKind::NotEqual),
        ] {
            assert_eq!(first(src).kind, kind, "{src}");
        }
    }

    #[test]
    fn chained_comparison_is_error() {
        let e = parse_err("a < b < c;");
        assert_eq!(e.code, ErrorCode::P001);
        assert_eq!(e.column, 7);
    }

    #[test]
    fn chained_logical_is_error() {
        assert_eq!(parse_err("a && b || c;").code, ErrorCode::P001);
    }

    #[test]
    fn chained_logical_with_parens() {
        let e = first("(a && b) || c;");
        assert_eq!(e.kind, NodeKind::LogicalOr);
        assert_eq!(e.children[0].kind, NodeKind::LogicalAnd);
    }

    #[test]
    fn operator_nodes_carry_operator_location() {
        let e = first("10 - 3 - 2;");
        assert_eq!(e.span, Span::new(1, 8));
        assert_eq!(e.children[0].span, Span::new(1, 4));
    }

    // ── primaries ─────────────────────────────────────────────────────────────

    #[test]
    fn literals() {
        assert_eq!(first("42;").kind, NodeKind::IntLiteral);
        let s = first(r#""hey";"#);
        assert_eq!(s.kind, NodeKind::StrLiteral);
        assert_eq!(s.text, "hey");
    }

    #[test]
    fn call_with_args() {
        let call = first("add(1, x * 2);");
        assert_eq!(call.kind, NodeKind::FnCall);
        assert_eq!(call.text, "add");
        assert_eq!(call.len(), 1);
        let args = &call.children[0];
        assert_eq!(args.kind, NodeKind::ArgumentList);
        assert_eq!(kinds(args), vec![NodeKind::IntLiteral, NodeKind::Multiply]);
    }

    #[test]
    fn call_without_args() {
        let call = first("readint();");
        assert_eq!(call.children[0].kind, NodeKind::ArgumentList);
        assert!(call.children[0].is_empty());
    }

    #[test]
    fn call_inside_expression() {
        let e = first("1 + f(2);");
        assert_eq!(kinds(&e), vec![NodeKind::IntLiteral, NodeKind::FnCall]);
    }

    #[test]
    fn invalid_primary() {
        let e = parse_err("1 + ;");
        assert_eq!(e.code, ErrorCode::P001);
        assert!(e.message.contains("primary"));
    }

    #[test]
    fn premature_end_in_expression() {
        let e = parse_err("1 +");
        assert_eq!(e.code, ErrorCode::P002);
    }

    #[test]
    fn missing_semicolon() {
        let e = parse_err("x = 1");
        assert_eq!(e.code, ErrorCode::P002);
        assert!(e.message.contains(";"));
    }

    #[test]
    fn missing_closing_paren() {
        let e = parse_err("(1 + 2;");
        assert_eq!(e.code, ErrorCode::P001);
        assert!(e.message.contains(")"));
    }

    // ── control flow ──────────────────────────────────────────────────────────

    #[test]
    fn if_without_else() {
        let i = first("if (x > 0) { x = 1; }");
        assert_eq!(i.kind, NodeKind::If);
        assert_eq!(kinds(&i), vec![NodeKind::Greater, NodeKind::StatementList]);
    }

    #[test]
    fn if_with_else() {
        let i = first("if (x) { 1; } else { 2; 3; }");
        assert_eq!(kinds(&i), vec![NodeKind::VarRef, NodeKind::StatementList, NodeKind::Else]);
        let else_node = &i.children[2];
        assert_eq!(else_node.len(), 1);
        assert_eq!(else_node.children[0].kind, NodeKind::StatementList);
        assert_eq!(else_node.children[0].len(), 2);
    }

    #[test]
    fn if_needs_no_semicolon() {
        let unit = parse("if (1) { 2; } 3;");
        assert_eq!(unit.len(), 2);
    }

    #[test]
    fn if_requires_parens() {
        assert_eq!(parse_err("if x { 1; }").code, ErrorCode::P001);
    }

    #[test]
    fn while_loop() {
        let w = first("while (i < 10) { i = i + 1; }");
        assert_eq!(w.kind, NodeKind::While);
        assert_eq!(kinds(&w), vec![NodeKind::Less, NodeKind::StatementList]);
    }

    #[test]
    fn empty_block_is_error() {
        assert_eq!(parse_err("while (1) { }").code, ErrorCode::P001);
    }

    #[test]
    fn unterminated_block() {
        assert_eq!(parse_err("while (1) { x = 1;").code, ErrorCode::P002);
    }

    // ── functions ─────────────────────────────────────────────────────────────

    #[test]
    fn function_definition() {
        let f = first("function add(a, b) { a + b; }");
        assert_eq!(f.kind, NodeKind::Function);
        assert_eq!(f.text, "add");
        assert_eq!(kinds(&f), vec![NodeKind::ParameterList, NodeKind::StatementList]);
        let params: Vec<&str> = f.children[0].children.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(params, vec!["a", "b"]);
    }

    #[test]
    fn function_without_params() {
        let f = first("function answer() { 42; }");
        assert_eq!(f.children[0].kind, NodeKind::ParameterList);
        assert!(f.children[0].is_empty());
    }

    #[test]
    fn function_trailing_comma_is_error() {
        assert_eq!(parse_err("function f(a,) { a; }").code, ErrorCode::P001);
    }

    #[test]
    fn nested_function() {
        let f = first("function outer() { function inner() { 1; } inner(); }");
        let body = &f.children[1];
        assert_eq!(body.len(), 2);
        assert_eq!(body.children[0].children[0].kind, NodeKind::Function);
    }
}
