use logos::Logos;
use std::fmt;

use crate::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"\s+")] // Skip whitespace
pub enum TokenKind {
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    // Anything that is neither whitespace nor a bracket belongs to a word
    #[regex(r"[^\s\[\]]+", |lex| lex.slice().to_string())]
    Word(String),
}

impl TokenKind {
    /// Classifies an already-split token string.
    pub fn from_text(text: &str) -> Self {
        match text {
            "[" => TokenKind::LBracket,
            "]" => TokenKind::RBracket,
            word => TokenKind::Word(word.to_string()),
        }
    }
}

// Implement Display for easy printing
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Word(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Splits `input` into spanned tokens. Lexing cannot fail: every character
/// is whitespace, a bracket, or part of a word.
pub fn tokenize(input: &str) -> Vec<Token> {
    TokenKind::lexer(input)
        .spanned()
        .map(|(result, range)| Token {
            // The word regex covers every non-skipped character, but keep the
            // slice as a word rather than dropping input if logos disagrees.
            kind: result.unwrap_or_else(|()| TokenKind::Word(input[range.clone()].to_string())),
            span: Span::from(range),
        })
        .collect()
}

/// Token strings only, in source order.
pub fn lex(input: &str) -> Vec<String> {
    tokenize(input)
        .into_iter()
        .map(|token| token.kind.to_string())
        .collect()
}
