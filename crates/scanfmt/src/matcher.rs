//! Aligns a format string against an input line, one token at a time.

use crate::kind::Kind;
use crate::placeholder::{extract_var, split, try_extract_var};
use crate::template::TemplateVars;
use crate::tokenize::tokenize;
use crate::var::Var;
use scanfmt_literal::{evaluate, Value};
use std::collections::BTreeMap;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error(
        "input ran out at token {position}: format has {format_tokens} tokens, input has {input_tokens}"
    )]
    Alignment {
        position: usize,
        format_tokens: usize,
        input_tokens: usize,
    },
    #[error("placeholder '{name}' declares unknown kind '{kind}'")]
    UnknownKindName { name: String, kind: String },
}

/// A format string with `${name}` / `${name:Kind}` placeholders.
///
/// # Example
///
/// ```
/// use scanfmt::{Matcher, Value};
///
/// let matcher = Matcher::new("${command:String}: ${args:Int}, name:${n:String}");
/// let result = matcher.match_line("run: 3, name:bob").unwrap();
///
/// assert_eq!(result.score(), 1.0);
/// assert_eq!(result.variable("args").unwrap().value(), Some(&Value::Int(3)));
/// ```
#[derive(Debug, Clone)]
pub struct Matcher {
    format: String,
    strict_kinds: bool,
}

impl Matcher {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            strict_kinds: false,
        }
    }

    /// Report unknown kind names as [`MatchError::UnknownKindName`] instead of
    /// treating them as `Null`.
    pub fn strict_kinds(mut self, strict: bool) -> Self {
        self.strict_kinds = strict;
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn match_line(&self, input: &str) -> Result<MatchResult, MatchError> {
        let format_tokens = tokenize(&self.format);
        let input_tokens = tokenize(input);

        let mut vars = BTreeMap::new();
        let mut normalized = Vec::with_capacity(format_tokens.len());
        let mut matched = 0usize;
        let mut placeholders = 0usize;

        for (x, token) in format_tokens.iter().enumerate() {
            let Some(actual) = input_tokens.get(x) else {
                return Err(MatchError::Alignment {
                    position: x,
                    format_tokens: format_tokens.len(),
                    input_tokens: input_tokens.len(),
                });
            };

            let Some(mut var) = self.placeholder_var(token, placeholders)? else {
                let hit = token == actual;
                log::debug!("token {}: literal {:?} vs {:?}: {}", x, token, actual, hit);
                if hit {
                    matched += 1;
                }
                normalized.push(*token);
                continue;
            };
            placeholders += 1;

            let value = evaluate(actual);
            let inferred = Kind::of(&value);
            let expected = var.expected_kind();

            if expected == Kind::Array {
                matched += 1;
                var.bind(array_binding(value));
            } else {
                let hit = expected.accepts(inferred);
                if hit {
                    matched += 1;
                }
                var.bind(Some(value));
            }
            log::debug!(
                "token {}: {} expects {}, got {:?} ({})",
                x,
                var.name(),
                expected,
                actual,
                inferred
            );

            normalized.push(var.format_symbol());
            vars.insert(var.name().to_string(), var);
        }

        let score = if format_tokens.is_empty() {
            0.0
        } else {
            matched as f64 / format_tokens.len() as f64
        };

        Ok(MatchResult {
            line: input.to_string(),
            normalized: normalized.join(" "),
            vars,
            score,
        })
    }

    fn placeholder_var(&self, token: &str, position: usize) -> Result<Option<Var>, MatchError> {
        if !self.strict_kinds {
            return Ok(extract_var(token, position));
        }
        match try_extract_var(token, position) {
            None => Ok(None),
            Some(Ok(var)) => Ok(Some(var)),
            Some(Err(e)) => Err(MatchError::UnknownKindName {
                name: split(token).map_or(token, |(name, _)| name).to_string(),
                kind: e.0,
            }),
        }
    }
}

/// Array placeholders capture text as-is and otherwise take the first element.
fn array_binding(value: Value) -> Option<Value> {
    match value {
        Value::Array(_) | Value::Bytes(_) => value.first(),
        other => Some(other),
    }
}

/// Outcome of matching one input line.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    line: String,
    normalized: String,
    vars: BTreeMap<String, Var>,
    score: f64,
}

impl MatchResult {
    /// The input line, verbatim.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// The format with each placeholder replaced by its kind's format symbol.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Fraction of format tokens that matched, in `[0, 1]`.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn passes(&self, min_score: f64) -> bool {
        self.score >= min_score
    }

    pub fn variable(&self, name: &str) -> Option<&Var> {
        self.vars.get(name)
    }

    /// Variables in name order.
    pub fn vars(&self) -> impl Iterator<Item = &Var> {
        self.vars.values()
    }

    /// Name to captured value. Variables that captured nothing map to `Null`.
    pub fn bindings(&self) -> BTreeMap<String, Value> {
        self.vars
            .iter()
            .map(|(name, var)| (name.clone(), var.value().cloned().unwrap_or(Value::Null)))
            .collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.bindings().into_values().collect()
    }

    /// Variables that captured a value, and their share of all variables.
    pub fn captured(&self) -> (Vec<&Var>, f64) {
        let captured: Vec<&Var> = self.vars().filter(|v| v.value().is_some()).collect();
        let ratio = if self.vars.is_empty() {
            0.0
        } else {
            captured.len() as f64 / self.vars.len() as f64
        };
        (captured, ratio)
    }

    pub fn template_vars(&self) -> TemplateVars {
        let mut vars = TemplateVars::new();
        for (name, value) in self.bindings() {
            vars.set(name, value.to_string());
        }
        vars
    }

    /// Renders `template`, replacing `{{ name }}` tags with captured values.
    pub fn render(&self, template: &str) -> String {
        self.template_vars().apply(template)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W, template: &str) -> io::Result<usize> {
        self.template_vars().write_to(writer, template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMAND: &str = "${command:String}: ${args:Int}, name:${n:String}";

    fn matched(format: &str, input: &str) -> MatchResult {
        Matcher::new(format).match_line(input).unwrap()
    }

    #[test]
    fn test_command_line() {
        let result = matched(COMMAND, "run: 3, name:bob");
        assert_eq!(result.score(), 1.0);
        assert_eq!(result.line(), "run: 3, name:bob");
        assert_eq!(result.normalized(), "%s %d name %s");

        let bindings = result.bindings();
        assert_eq!(bindings["command"], Value::String("run".into()));
        assert_eq!(bindings["args"], Value::Int(3));
        assert_eq!(bindings["n"], Value::String("bob".into()));
    }

    #[test]
    fn test_kind_mismatch_lowers_score_but_binds() {
        let result = matched(COMMAND, "run: three, name:bob");
        assert_eq!(result.score(), 0.75);
        assert_eq!(
            result.variable("args").unwrap().value(),
            Some(&Value::String("three".into()))
        );
    }

    #[test]
    fn test_literal_mismatch() {
        let result = matched(COMMAND, "run: 3, user:bob");
        assert_eq!(result.score(), 0.75);
    }

    #[test]
    fn test_literals_compare_raw_text() {
        assert_eq!(matched("v 3", "v 3").score(), 1.0);
        assert_eq!(matched("v 3", "v 3.0").score(), 0.5);
    }

    #[test]
    fn test_any_always_counts() {
        let result = matched("${a} ${b}", "1 [x]");
        assert_eq!(result.score(), 1.0);
        assert_eq!(result.variable("a").unwrap().value(), Some(&Value::Int(1)));
    }

    #[test]
    fn test_array_takes_first_element() {
        let result = matched("${xs:Array}", "[1, 2, 3]");
        assert_eq!(result.score(), 1.0);
        assert_eq!(result.variable("xs").unwrap().value(), Some(&Value::Int(1)));
    }

    #[test]
    fn test_array_keeps_text() {
        let result = matched("${xs:Array}", "hello");
        assert_eq!(result.score(), 1.0);
        assert_eq!(
            result.variable("xs").unwrap().value(),
            Some(&Value::String("hello".into()))
        );
    }

    #[test]
    fn test_array_edge_values() {
        let empty = matched("${xs:Array}", "[]");
        assert_eq!(empty.variable("xs").unwrap().value(), None);
        assert_eq!(empty.bindings()["xs"], Value::Null);
        assert_eq!(empty.score(), 1.0);

        let scalar = matched("${xs:Array}", "7");
        assert_eq!(scalar.variable("xs").unwrap().value(), Some(&Value::Int(7)));
    }

    #[test]
    fn test_alignment_failure() {
        let err = Matcher::new("a b c").match_line("a").unwrap_err();
        assert_eq!(
            err,
            MatchError::Alignment {
                position: 1,
                format_tokens: 3,
                input_tokens: 1,
            }
        );
    }

    #[test]
    fn test_extra_input_tokens_are_ignored() {
        assert_eq!(matched("a ${n:Int}", "a 1 2 3").score(), 1.0);
    }

    #[test]
    fn test_empty_format_scores_zero() {
        let result = matched("", "anything");
        assert_eq!(result.score(), 0.0);
        assert!(result.bindings().is_empty());
        assert_eq!(result.normalized(), "");
    }

    #[test]
    fn test_duplicate_names_keep_last() {
        let result = matched("${x:Int} ${x:String}", "1 two");
        let var = result.variable("x").unwrap();
        assert_eq!(var.position(), 1);
        assert_eq!(var.value(), Some(&Value::String("two".into())));
        assert_eq!(result.bindings().len(), 1);
    }

    #[test]
    fn test_positions_count_placeholders_only() {
        let result = matched("lit ${a} lit ${b}", "lit 1 lit 2");
        assert_eq!(result.variable("a").unwrap().position(), 0);
        assert_eq!(result.variable("b").unwrap().position(), 1);
    }

    #[test]
    fn test_unknown_kind_lenient() {
        let result = matched("${n:Number}", "5");
        assert_eq!(result.variable("n").unwrap().expected_kind(), Kind::Null);
        assert_eq!(result.score(), 0.0);
        assert_eq!(result.variable("n").unwrap().value(), Some(&Value::Int(5)));
    }

    #[test]
    fn test_unknown_kind_strict() {
        let err = Matcher::new("${n:Number}")
            .strict_kinds(true)
            .match_line("5")
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::UnknownKindName {
                name: "n".to_string(),
                kind: "Number".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "placeholder 'n' declares unknown kind 'Number'"
        );
    }

    #[test]
    fn test_captured() {
        let result = matched("${a:Array} ${b}", "[] x");
        let (vars, ratio) = result.captured();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name(), "b");
        assert_eq!(ratio, 0.5);
    }

    #[test]
    fn test_render() {
        let result = matched(COMMAND, "run: 3, name:bob");
        assert_eq!(result.render("{{ n }} ran {{ command }} x{{ args }}"), "bob ran run x3");

        let mut out = Vec::new();
        result.write_to(&mut out, "{{ n }}").unwrap();
        assert_eq!(out, b"bob");
    }

    #[test]
    fn test_repeated_matches_are_identical() {
        let matcher = Matcher::new(COMMAND);
        let first = matcher.match_line("go: 1, name:x").unwrap();
        let second = matcher.match_line("go: 1, name:x").unwrap();
        assert_eq!(first, second);
    }
}
