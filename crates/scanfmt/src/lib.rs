//! Extract typed values from free-form text.
//!
//! A format string such as `${command:String}: ${args:Int}, name:${n:String}`
//! is split into tokens on spaces, commas and colons (brackets, braces and
//! quotes are kept whole). The input line is split the same way and the two
//! token lists are compared position by position: literal tokens must be
//! equal, placeholder tokens capture the input token as a typed value.
//!
//! The score of a match is the fraction of format tokens that matched, where
//! a placeholder matches when the captured value has the declared kind.
//!
//! # Example
//!
//! ```
//! use scanfmt::{match_line, MatchError, Value};
//!
//! let result = match_line("${command:String}: ${args:Int}, name:${n:String}", "run: 3, name:bob").unwrap();
//! assert_eq!(result.score(), 1.0);
//! assert_eq!(result.bindings()["args"], Value::Int(3));
//!
//! // Too few input tokens is an error, not a low score.
//! assert!(matches!(
//!     match_line("a b c", "a"),
//!     Err(MatchError::Alignment { .. })
//! ));
//! ```

mod kind;
mod matcher;
mod placeholder;
mod template;
mod tokenize;
mod var;

pub use kind::{CoerceError, Kind, UnknownKind};
pub use matcher::{MatchError, MatchResult, Matcher};
pub use placeholder::{extract_var, is_placeholder, try_extract_var};
pub use scanfmt_literal::{evaluate, LiteralError, Value};
pub use template::TemplateVars;
pub use tokenize::tokenize;
pub use var::Var;

/// Matches `input` against `format` with default settings.
pub fn match_line(format: &str, input: &str) -> Result<MatchResult, MatchError> {
    Matcher::new(format).match_line(input)
}
