use crate::{EvalError, ParseError, SessionError};
use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};
use std::io;
use std::ops::Range;

type Diagnostic<'a> = Report<'a, (&'a str, Range<usize>)>;

// Spans are byte offsets (as logos produces them), not char offsets
fn byte_config() -> Config {
    Config::default().with_index_type(IndexType::Byte)
}

impl ParseError {
    /// Builds a report pointing at the offending bracket.
    pub fn report<'a>(&self, source_id: &'a str, config: Config) -> Diagnostic<'a> {
        let range = self.span().to_range();
        let (message, label) = match self {
            ParseError::UnmatchedClose { .. } => {
                ("Unmatched ']'".to_string(), "This bracket closes nothing")
            }
            ParseError::UnclosedOpen { .. } => {
                ("Unclosed '['".to_string(), "This quotation is never closed")
            }
            ParseError::TooDeeplyNested { limit, .. } => (
                format!("Quotations nested deeper than {} levels", limit),
                "Parsing stopped at this bracket",
            ),
        };
        Report::build(ReportKind::Error, (source_id, range.clone()))
            .with_config(config)
            .with_message(message)
            .with_label(Label::new((source_id, range)).with_message(label))
            .finish()
    }

    /// Writes the report to stderr.
    pub fn pretty_print(&self, source_id: &str, input: &str) -> io::Result<()> {
        self.report(source_id, byte_config()).eprint((source_id, Source::from(input)))
    }
}

impl EvalError {
    // Trees carry no spans, so the whole input is labelled.
    pub fn report<'a>(&self, source_id: &'a str, input: &str, config: Config) -> Diagnostic<'a> {
        let range = 0..input.len();
        let (message, label, note) = match self {
            EvalError::StepLimitExceeded { limit } => (
                format!("Expansion limit of {} steps exceeded", limit),
                "Evaluating this input did not reach an empty program",
                "Raise the ceiling with `:limit <n>` or disable it with `:limit off`",
            ),
            EvalError::NestingTooDeep { limit } => (
                format!("Quotations nested deeper than {} levels", limit),
                "Evaluating this input kept wrapping a value in quotations",
                "A `cons` onto a value this deep is refused",
            ),
        };
        Report::build(ReportKind::Error, (source_id, range.clone()))
            .with_config(config)
            .with_message(message)
            .with_label(Label::new((source_id, range)).with_message(label))
            .with_note(note)
            .finish()
    }

    pub fn pretty_print(&self, source_id: &str, input: &str) -> io::Result<()> {
        self.report(source_id, input, byte_config()).eprint((source_id, Source::from(input)))
    }
}

impl SessionError {
    pub fn pretty_print(&self, source_id: &str, input: &str) -> io::Result<()> {
        match self {
            SessionError::Parse(err) => err.pretty_print(source_id, input),
            SessionError::Eval(err) => err.pretty_print(source_id, input),
        }
    }
}
