use crate::{MAX_NESTING_DEPTH, Span};
use crate::lexer::{Token, TokenKind};
use crate::types::Tree;
use std::iter::Peekable;
use std::vec::IntoIter; // To iterate over Vec<Token>
use thiserror::Error;

/// Bracket irregularities. The default parser recovers from these silently;
/// strict parsing reports the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Parse Error [at {span}]: unmatched ']'")]
    UnmatchedClose { span: Span },
    #[error("Parse Error [at {span}]: '[' is never closed")]
    UnclosedOpen { span: Span },
    /// Parsing stops at the first `[` nested deeper than [`MAX_NESTING_DEPTH`].
    #[error("Parse Error [at {span}]: quotations nested deeper than {limit} levels")]
    TooDeeplyNested { span: Span, limit: usize },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnmatchedClose { span }
            | ParseError::UnclosedOpen { span }
            | ParseError::TooDeeplyNested { span, .. } => *span,
        }
    }
}

// Result type alias for convenience
pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    // We iterate over owned Tokens, consuming them.
    tokens: Peekable<IntoIter<Token>>,
    issues: Vec<ParseError>,
    // Set once nesting overflows; every open level then returns what it has
    halted: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens: tokens.into_iter().peekable(),
            issues: Vec::new(),
            halted: false,
        }
    }

    // Consumes the next token if available.
    fn next_token(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    /// Parses the whole token stream into a program.
    ///
    /// A stray `]` ends the current level early (at top level, the remaining
    /// tokens are dropped) and a `[` left open closes at end of input. Both
    /// are recorded in [`Parser::issues`]. A `[` opening a level past
    /// [`MAX_NESTING_DEPTH`] ends parsing; the input after it is dropped.
    pub fn parse(&mut self) -> Vec<Tree> {
        self.parse_sequence(None, 0)
    }

    /// Like [`Parser::parse`], but fails on the first bracket irregularity.
    pub fn parse_strict(mut self) -> ParseResult<Vec<Tree>> {
        let program = self.parse();
        match self.issues.into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(program),
        }
    }

    pub fn issues(&self) -> &[ParseError] {
        &self.issues
    }

    /// Accumulates trees until end of input or a closing `]`.
    /// `open` is the span of the `[` that started this level, if any, and
    /// `depth` the number of quotations currently open.
    fn parse_sequence(&mut self, open: Option<Span>, depth: usize) -> Vec<Tree> {
        let mut items = Vec::new();
        loop {
            match self.next_token() {
                Some(Token {
                    kind: TokenKind::LBracket,
                    span,
                }) => {
                    if depth >= MAX_NESTING_DEPTH {
                        self.issues.push(ParseError::TooDeeplyNested {
                            span,
                            limit: MAX_NESTING_DEPTH,
                        });
                        self.halted = true;
                        return items;
                    }
                    let nested = self.parse_sequence(Some(span), depth + 1);
                    items.push(Tree::Quotation(nested));
                    if self.halted {
                        return items;
                    }
                }
                Some(Token {
                    kind: TokenKind::RBracket,
                    span,
                }) => {
                    if open.is_none() {
                        self.issues.push(ParseError::UnmatchedClose { span });
                    }
                    return items;
                }
                Some(Token {
                    kind: TokenKind::Word(word),
                    ..
                }) => items.push(Tree::Symbol(word)),
                None => {
                    if let Some(span) = open {
                        self.issues.push(ParseError::UnclosedOpen { span });
                    }
                    return items;
                }
            }
        }
    }
}

/// Parses token strings as produced by [`crate::lexer::lex`].
pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Vec<Tree> {
    let tokens = tokens
        .iter()
        .map(|text| Token {
            kind: TokenKind::from_text(text.as_ref()),
            span: Span::default(),
        })
        .collect();
    Parser::new(tokens).parse()
}

// Helper function to lex and parse a string directly (useful for tests and REPL)
pub fn parse_str(input: &str) -> Vec<Tree> {
    Parser::new(crate::lexer::tokenize(input)).parse()
}

pub fn parse_str_strict(input: &str) -> ParseResult<Vec<Tree>> {
    Parser::new(crate::lexer::tokenize(input)).parse_strict()
}
