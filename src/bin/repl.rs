use std::cell::RefCell;
use std::rc::Rc;

use fourfold::{Session, TokenKind, evaluator::primitive_identifiers, tokenize};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Cmd, Completer, Context, Editor, EventHandler, KeyCode, KeyEvent, Modifiers};
use rustyline::{Helper, Highlighter, Hinter, Validator};

const HISTORY_FILE: &str = "fourfold_history.txt";
const DEFAULT_STEP_LIMIT: usize = 1_000_000;

struct WordCompleter {
    session: Rc<RefCell<Session>>,
}

impl WordCompleter {
    fn new(session: Rc<RefCell<Session>>) -> Self {
        WordCompleter { session }
    }
}

impl rustyline::completion::Completer for WordCompleter {
    type Candidate = String;
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let prefix = match tokenize(&line[..pos]).pop() {
            // Only complete a word the cursor is still touching
            Some(token) if token.span.end == pos => match token.kind {
                TokenKind::Word(word) => word,
                _ => return Ok((pos, vec![])),
            },
            _ => return Ok((pos, vec![])),
        };
        let mut words: Vec<String> = self
            .session
            .borrow()
            .dictionary()
            .get_identifiers()
            .into_iter()
            .chain(primitive_identifiers().iter().map(|w| w.to_string()))
            .filter_map(|id| id.strip_prefix(prefix.as_str()).map(str::to_string))
            .filter(|rest| !rest.is_empty())
            .collect();
        words.sort();
        words.dedup();
        Ok((pos, words))
    }
}

#[derive(Completer, Helper, Highlighter, Hinter, Validator)]
struct InputValidator {
    #[rustyline(Validator)]
    validator: BracketValidator,
    #[rustyline(Highlighter)]
    highlighter: BracketHighlighter,
    #[rustyline(Completer)]
    completer: WordCompleter,
}

/// Keeps reading lines while a `[` is still open.
struct BracketValidator;

impl Validator for BracketValidator {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let mut depth: usize = 0;
        for c in ctx.input().chars() {
            match c {
                '[' => depth += 1,
                // A stray `]` is left to the parser (dropped, or an error in strict mode)
                ']' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        if depth > 0 {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

struct BracketHighlighter;

impl Highlighter for BracketHighlighter {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> std::borrow::Cow<'l, str> {
        // Open brackets as (byte offset in `line`, byte offset in `highlighted`)
        let mut stack: Vec<(usize, usize)> = Vec::new();
        let mut highlighted = String::new();

        for (offset, c) in line.char_indices() {
            match c {
                '[' => {
                    stack.push((offset, highlighted.len()));
                    highlighted.push(c);
                }
                ']' => match stack.pop() {
                    Some((open, at)) if open + 1 == pos || offset + 1 == pos => {
                        highlighted.push_str(&format!("\x1b[34m{}\x1b[0m", c)); // Blue for matching brackets
                        highlighted.replace_range(at..at + 1, "\x1b[1;34m[\x1b[0m");
                    }
                    Some(_) => highlighted.push(c),
                    None => {
                        highlighted.push_str(&format!("\x1b[31m{}\x1b[0m", c)); // Red for unmatched closing brackets
                    }
                },
                _ => {
                    highlighted.push(c);
                }
            }
        }

        std::borrow::Cow::Owned(highlighted)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

/// Reads the initial step ceiling from `FOURFOLD_STEP_LIMIT` (`off` disables it).
fn initial_step_limit() -> Option<usize> {
    match std::env::var("FOURFOLD_STEP_LIMIT") {
        Ok(value) => parse_limit(&value).unwrap_or_else(|| {
            eprintln!(
                "Ignoring FOURFOLD_STEP_LIMIT={:?}; using {}",
                value, DEFAULT_STEP_LIMIT
            );
            Some(DEFAULT_STEP_LIMIT)
        }),
        Err(_) => Some(DEFAULT_STEP_LIMIT),
    }
}

fn parse_limit(value: &str) -> Option<Option<usize>> {
    match value.trim() {
        "off" | "none" => Some(None),
        n => n.parse().ok().map(Some),
    }
}

fn print_dictionary(session: &Session) {
    for (name, value) in session.dictionary().sorted() {
        println!("  {} = {}", name, value);
    }
}

fn main() -> rustyline::Result<()> {
    println!("fourfold REPL v0.1.0");
    println!("Type 'exit' or press Ctrl-D to quit. Commands: :dict :clear :trace :strict :limit <n|off>");

    let session = Rc::new(RefCell::new(
        Session::with_prelude().with_step_limit(initial_step_limit()),
    ));
    let h = InputValidator {
        highlighter: BracketHighlighter,
        validator: BracketValidator,
        completer: WordCompleter::new(session.clone()),
    };
    let config = rustyline::config::Config::builder()
        .edit_mode(rustyline::EditMode::Vi)
        .build();
    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(h));
    rl.bind_sequence(
        KeyEvent(KeyCode::Char('s'), Modifiers::CTRL),
        EventHandler::Simple(Cmd::Newline),
    );
    if rl.load_history(HISTORY_FILE).is_err() {
        println!("No previous history.");
    }

    let mut trace = false;

    loop {
        let readline = rl.readline("fourfold> ");
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let trimmed_input = line.trim();
                if trimmed_input.is_empty() {
                    continue;
                }
                if trimmed_input.eq_ignore_ascii_case("exit") {
                    break;
                }

                match trimmed_input {
                    ":dict" => {
                        print_dictionary(&session.borrow());
                        continue;
                    }
                    ":clear" => {
                        session.borrow_mut().clear_stack();
                        continue;
                    }
                    ":trace" => {
                        trace = !trace;
                        println!("Tracing {}", if trace { "on" } else { "off" });
                        continue;
                    }
                    ":strict" => {
                        let mut session = session.borrow_mut();
                        let strict = !session.is_strict();
                        session.set_strict(strict);
                        println!("Strict parsing {}", if strict { "on" } else { "off" });
                        continue;
                    }
                    _ => {}
                }
                if let Some(arg) = trimmed_input.strip_prefix(":limit") {
                    match parse_limit(arg) {
                        Some(limit) => {
                            session.borrow_mut().set_step_limit(limit);
                            match limit {
                                Some(n) => println!("Step limit set to {}", n),
                                None => println!("Step limit disabled"),
                            }
                        }
                        None => eprintln!("Usage: :limit <n|off>"),
                    }
                    continue;
                }

                let result = if trace {
                    session
                        .borrow_mut()
                        .eval_str_traced(trimmed_input, |rule, state| {
                            println!("{:>6}  {}", rule, state)
                        })
                } else {
                    session.borrow_mut().eval_str(trimmed_input)
                };
                match result {
                    Ok(()) => println!("{}", session.borrow().stack()),
                    Err(e) => {
                        if e.pretty_print("REPL", trimmed_input).is_err() {
                            eprintln!("Error: {}", e);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                println!("Interrupted. Type 'exit' or Ctrl-D to quit.");
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                println!("\nExiting.");
                break;
            }
            Err(err) => {
                eprintln!("Readline Error: {:?}", err);
                break;
            }
        }
    }
    rl.save_history(HISTORY_FILE)
}
