use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(String), // raw digits, parsed by the evaluator
    Str(String),
    Ident(String),

    // Keywords
    Var,
    If,
    Else,
    While,
    Function,

    // Operators
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Eq,         // =
    EqEq,       // ==
    BangEq,     // !=
    Lt,         // <
    LtEq,       // <=
    Gt,         // >
    GtEq,       // >=
    AndAnd,     // &&
    OrOr,       // ||

    // Punctuation
    Comma,      // ,
    Semicolon,  // ;
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }

    Eof,
}

impl TokenKind {
    pub fn is_additive(&self) -> bool {
        matches!(self, Self::Plus | Self::Minus)
    }

    pub fn is_multiplicative(&self) -> bool {
        matches!(self, Self::Star | Self::Slash)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self, Self::EqEq | Self::BangEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Self::AndAnd | Self::OrOr)
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, Self::Var | Self::If | Self::Else | Self::While | Self::Function)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(s)    => write!(f, "{s}"),
            Self::Str(s)    => write!(f, "\"{s}\""),
            Self::Ident(s)  => write!(f, "{s}"),
            Self::Var       => f.write_str("var"),
            Self::If        => f.write_str("if"),
            Self::Else      => f.write_str("else"),
            Self::While     => f.write_str("while"),
            Self::Function  => f.write_str("function"),
            Self::Plus      => f.write_str("+"),
            Self::Minus     => f.write_str("-"),
            Self::Star      => f.write_str("*"),
            Self::Slash     => f.write_str("/"),
            Self::Eq        => f.write_str("="),
            Self::EqEq      => f.write_str("=="),
            Self::BangEq    => f.write_str("!="),
            Self::Lt        => f.write_str("<"),
            Self::LtEq      => f.write_str("<="),
            Self::Gt        => f.write_str(">"),
            Self::GtEq      => f.write_str(">="),
            Self::AndAnd    => f.write_str("&&"),
            Self::OrOr      => f.write_str("||"),
            Self::Comma     => f.write_str(","),
            Self::Semicolon => f.write_str(";"),
            Self::LParen    => f.write_str("("),
            Self::RParen    => f.write_str(")"),
            Self::LBrace    => f.write_str("{"),
            Self::RBrace    => f.write_str("}"),
            Self::Eof       => f.write_str("end of input"),
        }
    }
}

/// Maps an identifier string to its keyword token, or returns `Ident`.
pub fn keyword_or_ident(s: String) -> TokenKind {
    match s.as_str() {
        "var"      => TokenKind::Var,
        "if"       => TokenKind::If,
        "else"     => TokenKind::Else,
        "while"    => TokenKind::While,
        "function" => TokenKind::Function,
        _          => TokenKind::Ident(s),
    }
}

// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}

// ─── Token stream ─────────────────────────────────────────────────────────────

/// Cursor over a lexed token sequence with one- and two-token lookahead.
///
/// The sequence always ends in an `Eof` token; once the cursor reaches it,
/// `peek`, `peek_nth` and `next` keep returning it.
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let (line, column) = tokens.last().map(|t| (t.line, t.column + 1)).unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::Eof, line, column));
        }
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> &Token {
        self.peek_nth(1)
    }

    /// `peek_nth(1)` is the next token, `peek_nth(2)` the one after it.
    pub fn peek_nth(&self, n: usize) -> &Token {
        let idx = (self.pos + n.saturating_sub(1)).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub fn next(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() { self.pos += 1; }
        tok
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, column: usize) -> Token {
        Token::new(kind, 1, column)
    }

    #[test]
    fn two_token_lookahead() {
        let ts = TokenStream::new(vec![
            tok(TokenKind::Ident("x".into()), 1),
            tok(TokenKind::Eq, 3),
            tok(TokenKind::Int("1".into()), 5),
        ]);
        assert_eq!(ts.peek().kind, TokenKind::Ident("x".into()));
        assert_eq!(ts.peek_nth(2).kind, TokenKind::Eq);
    }

    #[test]
    fn eof_appended_and_sticky() {
        let mut ts = TokenStream::new(vec![tok(TokenKind::Semicolon, 1)]);
        assert_eq!(ts.next().kind, TokenKind::Semicolon);
        assert!(ts.is_at_end());
        assert_eq!(ts.next().kind, TokenKind::Eof);
        assert_eq!(ts.next().kind, TokenKind::Eof);
        assert_eq!(ts.peek_nth(2).kind, TokenKind::Eof);
    }

    #[test]
    fn empty_stream_is_eof() {
        let ts = TokenStream::new(Vec::new());
        assert!(ts.is_at_end());
        assert_eq!(ts.peek().line, 1);
    }

    #[test]
    fn keyword_lookup() {
        assert_eq!(keyword_or_ident("function".into()), TokenKind::Function);
        assert_eq!(keyword_or_ident("func".into()), TokenKind::Ident("func".into()));
        assert!(TokenKind::While.is_keyword());
        assert!(TokenKind::LtEq.is_comparison());
        assert!(TokenKind::OrOr.is_logical());
    }
}
