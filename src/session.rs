//! A running session: the dictionary and stack carried from one input to the
//! next. Each input is atomic; if it fails, the session keeps the state it had
//! before the call.

use crate::dictionary::Dictionary;
use crate::evaluator::{EvalError, Rule, State, evaluate, run};
use crate::parser::{ParseError, parse_str, parse_str_strict};
use crate::types::{Program, Stack};
use thiserror::Error;

/// Derived words built from the four primitives, one definition per line.
pub const PRELUDE: &str = include_str!("prelude.txt");

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    dictionary: Dictionary,
    stack: Stack,
    step_limit: Option<usize>,
    strict: bool,
}

impl Session {
    /// An empty dictionary and stack, permissive parsing, no step limit.
    pub fn new() -> Self {
        Session::default()
    }

    /// A session whose dictionary already holds the prelude words.
    pub fn with_prelude() -> Self {
        let program = Program::from(parse_str(PRELUDE));
        let (dictionary, stack, _) = evaluate(Dictionary::new(), Stack::new(), program);
        Session {
            dictionary,
            stack,
            ..Session::default()
        }
    }

    pub fn with_step_limit(mut self, limit: Option<usize>) -> Self {
        self.step_limit = limit;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn set_step_limit(&mut self, limit: Option<usize>) {
        self.step_limit = limit;
    }

    pub fn step_limit(&self) -> Option<usize> {
        self.step_limit
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn clear_stack(&mut self) {
        self.stack.clear();
    }

    /// Runs one input against the current dictionary and stack.
    pub fn eval_str(&mut self, input: &str) -> Result<(), SessionError> {
        self.eval_str_traced(input, |_, _| {})
    }

    /// Like [`Session::eval_str`], reporting every rewrite step to `observe`.
    pub fn eval_str_traced<F>(&mut self, input: &str, observe: F) -> Result<(), SessionError>
    where
        F: FnMut(Rule, &State),
    {
        let trees = if self.strict {
            parse_str_strict(input)?
        } else {
            parse_str(input)
        };
        let state = State::new(
            self.dictionary.clone(),
            self.stack.clone(),
            Program::from(trees),
        );
        let state = run(state, self.step_limit, observe)?;
        self.dictionary = state.dictionary;
        self.stack = state.stack;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    // Helper: fresh prelude session, one input, printed stack (bottom first)
    fn assert_prelude(input: &str, expected: &str) {
        let mut session = Session::with_prelude();
        match session.eval_str(input) {
            Ok(()) => assert_eq!(session.stack().to_string(), expected, "Input: '{}'", input),
            Err(e) => panic!("Evaluation failed for input '{}': {}", input, e),
        }
    }

    #[test]
    fn test_state_threads_between_inputs() {
        let mut session = Session::new();
        session.eval_str("[cons cons cons] cons3 let").unwrap();
        session.eval_str("a b c").unwrap();
        session.eval_str("[] cons3").unwrap();
        assert_eq!(session.stack().to_string(), "[a b c]");
        assert!(session.dictionary().contains("cons3"));
    }

    #[test]
    fn test_clear_stack_keeps_dictionary() {
        let mut session = Session::new();
        session.eval_str("v x let w").unwrap();
        session.clear_stack();
        assert!(session.stack().is_empty());
        session.eval_str("x").unwrap();
        assert_eq!(session.stack().to_string(), "v");
    }

    #[test]
    fn test_prelude_loads_words() {
        let session = Session::with_prelude();
        assert!(session.stack().is_empty());
        for word in ["i", "drop", "quote", "unquote", "dup", "swap", "=", "not", "if", "and", "or"] {
            assert!(session.dictionary().contains(word), "missing {}", word);
        }
    }

    #[test]
    fn test_prelude_stack_words() {
        assert_prelude("x drop", "");
        assert_prelude("a quote", "[a]");
        assert_prelude("[a] unquote", "a");
        assert_prelude("a dup", "a a");
        assert_prelude("[x [y]] dup", "[x [y]] [x [y]]");
        assert_prelude("a b swap", "b a");
        assert_prelude("[a] b swap", "b [a]");
    }

    #[test]
    fn test_dup_does_not_run_bound_words() {
        // `i` is bound, but dup copies the symbol as data
        assert_prelude("[i] unquote dup", "i i");
        assert_prelude("[i] unquote [x] swap", "[x] i");
    }

    #[test]
    fn test_prelude_apply() {
        assert_prelude("[a b] i", "a b");
        assert_prelude("x [dup] i", "x x");
        assert_prelude("[] i", "");
    }

    #[test]
    fn test_prelude_booleans() {
        assert_prelude("a a =", "true");
        assert_prelude("a b =", "false");
        assert_prelude("[a [b]] [a [b]] =", "true");
        assert_prelude("true not", "false");
        assert_prelude("false not", "true");
        assert_prelude("true true and", "true");
        assert_prelude("true false and", "false");
        assert_prelude("false true and", "false");
        assert_prelude("false true or", "true");
        assert_prelude("false false or", "false");
    }

    #[test]
    fn test_prelude_if() {
        assert_prelude("true [yes] [no] if", "yes");
        assert_prelude("false [yes] [no] if", "no");
        assert_prelude("a b = [same] [different] if", "different");
        assert_prelude("k true [dup] [drop] if", "k k");
        assert_prelude("k false [dup] [drop] if", "");
        // Nested conditionals
        assert_prelude("false true [[a] [b] if] [c] if", "b");
    }

    #[test]
    fn test_step_limit_rolls_back() {
        let mut session = Session::new().with_step_limit(Some(50));
        session.eval_str("keep").unwrap();
        let result = session.eval_str("lost x let [loop] loop let loop");
        assert_eq!(
            result,
            Err(SessionError::Eval(EvalError::StepLimitExceeded { limit: 50 }))
        );
        assert_eq!(session.stack().to_string(), "keep");
        assert!(!session.dictionary().contains("x"));
        assert!(!session.dictionary().contains("loop"));
    }

    #[test]
    fn test_strict_parsing() {
        let mut session = Session::new().with_strict(true);
        assert!(session.is_strict());
        let result = session.eval_str("a ] b");
        assert_eq!(
            result,
            Err(SessionError::Parse(ParseError::UnmatchedClose {
                span: Span::new(2, 3)
            }))
        );
        assert!(session.stack().is_empty());

        session.set_strict(false);
        session.eval_str("a ] b").unwrap();
        assert_eq!(session.stack().to_string(), "a");
    }

    #[test]
    fn test_traced_evaluation() {
        let mut session = Session::new();
        let mut lines = Vec::new();
        session
            .eval_str_traced("a [] cons", |rule, state| {
                lines.push(format!("{} {}", rule, state))
            })
            .unwrap();
        assert_eq!(
            lines,
            vec![
                "push a | [] cons".to_string(),
                "push a [] | cons".to_string(),
                "cons [a] | ".to_string(),
            ]
        );
    }

    #[test]
    fn test_deeply_nested_input() {
        let deep = "[".repeat(50_000);
        let input = format!("{deep} {deep} t f eq");

        let mut session = Session::new().with_strict(true);
        let result = session.eval_str(&input);
        assert_eq!(
            result,
            Err(SessionError::Parse(ParseError::TooDeeplyNested {
                span: Span::new(crate::MAX_NESTING_DEPTH, crate::MAX_NESTING_DEPTH + 1),
                limit: crate::MAX_NESTING_DEPTH,
            }))
        );
        assert!(session.stack().is_empty());

        // Permissively, only the levels before the limit survive
        session.set_strict(false);
        session.eval_str(&input).unwrap();
        assert_eq!(session.stack().len(), 1);
        assert_eq!(
            session.stack().peek(0).map(|tree| tree.depth()),
            Some(crate::MAX_NESTING_DEPTH)
        );
    }

    #[test]
    fn test_runaway_nesting_rolls_back() {
        let mut session = Session::with_prelude();
        session.eval_str("keep").unwrap();
        let result = session.eval_str("[quote wrap] wrap let a wrap");
        assert_eq!(
            result,
            Err(SessionError::Eval(EvalError::NestingTooDeep {
                limit: crate::MAX_NESTING_DEPTH
            }))
        );
        assert_eq!(session.stack().to_string(), "keep");
        assert!(!session.dictionary().contains("wrap"));
    }
}
