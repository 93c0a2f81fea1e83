// Declare modules publicly so they are part of the library interface
pub mod dictionary;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod pretty_print;
pub mod printer;
pub mod session;
pub mod source;
pub mod types;

/// Deepest quotation nesting the parser accepts and `cons` will build.
/// Trees are compared, printed and dropped recursively, so this bounds the
/// host stack those operations need.
pub const MAX_NESTING_DEPTH: usize = 1024;

pub use dictionary::Dictionary;
pub use evaluator::{EvalError, EvalResult, Rule, State, evaluate, evaluate_with_limit, run};
pub use lexer::{Token, TokenKind, lex, tokenize};
pub use parser::{ParseError, Parser, parse, parse_str, parse_str_strict};
pub use printer::print;
pub use session::{PRELUDE, Session, SessionError};
pub use source::Span;
pub use types::{Program, Stack, Tree};
