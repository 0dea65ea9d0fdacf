// src/lexer/tokens.rs
use serde::Serialize;

use super::{context::PositionContext, pattern::Pattern};

/// A lexeme tagged with a kind and the position where it starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token<K> {
    pub kind: K,
    pub text: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl<K> Token<K> {
    pub fn new(kind: K, text: &str, at: &PositionContext) -> Self {
        Self {
            kind,
            text: text.to_string(),
            offset: at.offset(),
            line: at.line(),
            column: at.column(),
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Token kinds for the built-in C-like token set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Ident,
    Int,
    Double,
    String,
    White,
    LineComment,
    BlockComment,

    // keywords
    If,
    Else,
    While,
    Return,
    Fn,
    Let,

    // single-char punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Plus,
    Minus,
    Star,
    Slash,
    Assign,
    Not,
    Lt,
    Gt,
    Ampersand,
    Pipe,
    Comma,
    Semicolon,

    // two-char operators
    Le,
    Ge,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
}

impl TokenKind {
    /// Whitespace and comments; parsers usually drop these.
    pub fn is_trivia(self) -> bool {
        use TokenKind::*;
        matches!(self, White | LineComment | BlockComment)
    }
}

/// Rules for the built-in token set, in declaration order.
pub fn default_patterns() -> Vec<Pattern<Token<TokenKind>>> {
    use TokenKind::*;
    let keywords = [
        ("if", If),
        ("else", Else),
        ("while", While),
        ("return", Return),
        ("fn", Fn),
        ("let", Let),
    ];
    let punct = [
        (r"\(", LParen),
        (r"\)", RParen),
        (r"\[", LBracket),
        (r"\]", RBracket),
        (r"\{", LBrace),
        (r"\}", RBrace),
        (r"\+", Plus),
        ("-", Minus),
        (r"\*", Star),
        ("/", Slash),
        ("=", Assign),
        ("!", Not),
        ("<", Lt),
        (">", Gt),
        ("&", Ampersand),
        (r"\|", Pipe),
        (",", Comma),
        (";", Semicolon),
        ("<=", Le),
        (">=", Ge),
        ("==", EqEq),
        ("!=", NotEq),
        ("&&", AndAnd),
        (r"\|\|", OrOr),
    ];

    let mut out = vec![
        Pattern::token(r"[A-Za-z_][A-Za-z0-9_]*", Ident),
        Pattern::token(r"[0-9]+", Int),
        Pattern::token(r"[0-9]+\.[0-9]+", Double),
        Pattern::token(r#""([^"\\\n]|\\.)*""#, String),
        Pattern::token(r"\s+", White),
        Pattern::token(r"//[^\n]*", LineComment),
        Pattern::token(r"/\*([^*]|\*+[^*/])*\*+/", BlockComment),
    ];
    out.extend(keywords.into_iter().map(|(src, k)| Pattern::token(src, k).strong()));
    out.extend(punct.into_iter().map(|(src, k)| Pattern::token(src, k)));
    out
}
