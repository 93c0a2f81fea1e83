use crate::MAX_NESTING_DEPTH;
use crate::dictionary::Dictionary;
use crate::types::{Program, Stack, Tree};
use std::fmt;
use thiserror::Error;

// --- Evaluation Error ---
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The program was still running after `limit` rewrite steps.
    #[error("Evaluation Error: expansion limit exceeded ({limit} rewrite steps)")]
    StepLimitExceeded { limit: usize },
    /// A `cons` would have built a quotation deeper than `limit` levels.
    #[error("Evaluation Error: cons would nest quotations deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

// Result type alias for convenience
pub type EvalResult<T = State> = Result<T, EvalError>;

/// The rewrite applied by a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Cons,
    Snoc,
    Eq,
    Let,
    /// A word bound to a symbol was replaced by that symbol.
    Alias,
    /// A word bound to a quotation was replaced by its contents.
    Expand,
    /// An unbound word or a quotation was pushed as data.
    Push,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::Cons => "cons",
            Rule::Snoc => "snoc",
            Rule::Eq => "eq",
            Rule::Let => "let",
            Rule::Alias => "alias",
            Rule::Expand => "expand",
            Rule::Push => "push",
        };
        f.pad(name)
    }
}

/// Words handled by a primitive rule before dictionary dispatch is tried.
pub fn primitive_identifiers() -> [&'static str; 4] {
    ["cons", "snoc", "eq", "let"]
}

/// The machine state: (dictionary, stack, program).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub dictionary: Dictionary,
    pub stack: Stack,
    pub program: Program,
}

impl State {
    pub fn new(dictionary: Dictionary, stack: Stack, program: Program) -> Self {
        State {
            dictionary,
            stack,
            program,
        }
    }

    /// Only an empty program halts; every other shape matches some rule.
    pub fn is_terminal(&self) -> bool {
        self.program.is_empty()
    }

    pub fn into_parts(self) -> (Dictionary, Stack, Program) {
        (self.dictionary, self.stack, self.program)
    }

    /// Applies the highest-priority rule that matches and reports which one,
    /// or returns `None` on a terminal state.
    ///
    /// Priority: cons, snoc, eq, let, then dictionary dispatch. A primitive
    /// word whose stack shape does not match falls through to dispatch like
    /// any other word. The only failure is a `cons` whose result would exceed
    /// [`MAX_NESTING_DEPTH`]; the state is then left as it was.
    pub fn step(&mut self) -> EvalResult<Option<Rule>> {
        let Some(head) = self.program.peek(0) else {
            return Ok(None);
        };
        let primitive = match head {
            Tree::Symbol(word) => match word.as_str() {
                "cons" => Some(Rule::Cons),
                "snoc" => Some(Rule::Snoc),
                "eq" => Some(Rule::Eq),
                _ => None,
            },
            Tree::Quotation(_) => None,
        };

        let fired = match primitive {
            Some(Rule::Cons) => self.apply_cons()?,
            Some(Rule::Snoc) => self.apply_snoc(),
            Some(Rule::Eq) => self.apply_eq(),
            _ => false,
        };
        if fired {
            self.program.pop_front();
            return Ok(primitive);
        }

        if self.apply_let() {
            return Ok(Some(Rule::Let));
        }

        Ok(self.dispatch())
    }

    // [q] under v  ->  [v q...]
    fn apply_cons(&mut self) -> EvalResult<bool> {
        match self.stack.take_top::<2>() {
            Some([value, Tree::Quotation(items)]) if value.depth() >= MAX_NESTING_DEPTH => {
                self.stack.extend([value, Tree::Quotation(items)]);
                Err(EvalError::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                })
            }
            Some([value, Tree::Quotation(mut items)]) => {
                items.insert(0, value);
                self.stack.push(Tree::Quotation(items));
                Ok(true)
            }
            Some(other) => {
                self.stack.extend(other);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    // [v q...]  ->  v under [q...]
    fn apply_snoc(&mut self) -> bool {
        match self.stack.take_top::<1>() {
            Some([Tree::Quotation(mut items)]) if !items.is_empty() => {
                let head = items.remove(0);
                self.stack.push(head);
                self.stack.push(Tree::Quotation(items));
                true
            }
            Some(other) => {
                self.stack.extend(other);
                false
            }
            None => false,
        }
    }

    // x y t f  ->  t if x == y, else f
    fn apply_eq(&mut self) -> bool {
        match self.stack.take_top::<4>() {
            Some([x, y, if_equal, if_not]) => {
                self.stack.push(if x == y { if_equal } else { if_not });
                true
            }
            None => false,
        }
    }

    // v with `n let` ahead binds n -> v without dispatching n
    fn apply_let(&mut self) -> bool {
        let name = match (self.program.peek(0), self.program.peek(1)) {
            (Some(Tree::Symbol(name)), Some(next)) if next.is_word("let") => name.clone(),
            _ => return false,
        };
        let Some(value) = self.stack.pop() else {
            return false;
        };
        self.program.pop_front();
        self.program.pop_front();
        self.dictionary.define(name, value);
        true
    }

    fn dispatch(&mut self) -> Option<Rule> {
        let word = self.program.pop_front()?;
        let bound = match &word {
            Tree::Symbol(name) => self.dictionary.get(name),
            Tree::Quotation(_) => None,
        };
        match bound {
            Some(Tree::Symbol(alias)) => {
                let alias = Tree::Symbol(alias.clone());
                self.program.prepend(vec![alias]);
                Some(Rule::Alias)
            }
            Some(Tree::Quotation(body)) => {
                let body = body.clone();
                self.program.prepend(body);
                Some(Rule::Expand)
            }
            None => {
                self.stack.push(word);
                Some(Rule::Push)
            }
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.stack, self.program)
    }
}

// --- Evaluate Functions ---

/// Rewrites until the program is empty. There is no step limit, so a
/// self-expanding word never returns; the loop itself uses constant host
/// stack. A `cons` past [`MAX_NESTING_DEPTH`] stops the loop early, and the
/// returned program still starts with that `cons`.
pub fn evaluate(
    dictionary: Dictionary,
    stack: Stack,
    program: Program,
) -> (Dictionary, Stack, Program) {
    let mut state = State::new(dictionary, stack, program);
    while let Ok(Some(_)) = state.step() {}
    state.into_parts()
}

/// Like [`evaluate`], but gives up once `limit` steps have run without
/// reaching a terminal state.
pub fn evaluate_with_limit(
    dictionary: Dictionary,
    stack: Stack,
    program: Program,
    limit: usize,
) -> EvalResult {
    run(State::new(dictionary, stack, program), Some(limit), |_, _| {})
}

/// The general rewrite loop. `observe` sees every applied rule together with
/// the state it produced.
pub fn run<F>(mut state: State, step_limit: Option<usize>, mut observe: F) -> EvalResult
where
    F: FnMut(Rule, &State),
{
    let mut steps: usize = 0;
    loop {
        if let Some(limit) = step_limit {
            if steps >= limit && !state.is_terminal() {
                return Err(EvalError::StepLimitExceeded { limit });
            }
        }
        match state.step()? {
            Some(rule) => {
                steps += 1;
                observe(rule, &state);
            }
            None => return Ok(state),
        }
    }
}
