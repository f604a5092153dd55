//! Literal value grammar for scanfmt.
//!
//! Recovers a typed [`Value`] from a single token of text. Supports:
//! - Integers: `42`, `-7`, `0xff`, `0o17`, `0b101` (values past `i64::MAX` become `Uint`)
//! - Floats: `1.5`, `-0.25`, `6.02e23`
//! - Booleans and null: `true`, `false`, `null`, `nil`
//! - Strings: `"hello"`, `'it\'s'`
//! - Byte strings: `b"raw"`
//! - Hex colors: `#ff8800`
//! - Arrays: `[1, 2, 3]`, `["a", [true]]`
//! - Maps: `{name: "bob", "age": 42}`
//!
//! # Example
//!
//! ```
//! use scanfmt_literal::{evaluate, parse, Value};
//!
//! assert_eq!(parse("[1, 2]").unwrap(), Value::Array(vec![Value::Int(1), Value::Int(2)]));
//!
//! // Anything that is not a literal comes back as plain text.
//! assert_eq!(evaluate("bob"), Value::String("bob".to_string()));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, delimited, opt, preceded, separated, terminated};
use winnow::error::{ContextError, ErrMode, ParserError};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

/// Deepest bracket nesting accepted by [`parse`].
pub const MAX_DEPTH: usize = 64;

// ============ Value Types ============

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Rgb([u8; 3]),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Rgb(_) => "rgb",
        }
    }

    /// First element of a sequence. Byte strings yield their first byte as a `Uint`.
    pub fn first(&self) -> Option<Value> {
        match self {
            Value::Array(items) => items.first().cloned(),
            Value::Bytes(bytes) => bytes.first().map(|b| Value::Uint(u64::from(*b))),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Uint(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bytes(bytes) => write!(f, "b{:?}", String::from_utf8_lossy(bytes)),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: ", key)?;
                    item.fmt_nested(f)?;
                }
                write!(f, "}}")
            }
            Value::Rgb([r, g, b]) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LiteralError {
    #[error("not a literal: {0}")]
    Syntax(String),
    #[error("unexpected trailing input: {0:?}")]
    TrailingInput(String),
    #[error("literal nests {depth} levels deep (limit {limit})")]
    TooDeep { depth: usize, limit: usize },
}

/// Decodes `rrggbb` or `#rrggbb` into its three channels.
pub fn hex_triplet(text: &str) -> Option<[u8; 3]> {
    let digits = text.strip_prefix('#').unwrap_or(text);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

// ============ Parser ============

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

fn ws<'a, P, O, E>(p: P) -> impl Parser<&'a str, O, E>
where
    P: Parser<&'a str, O, E>,
    E: ParserError<&'a str>,
{
    delimited(multispace0, p, multispace0)
}

fn ident(input: &mut &str) -> ModalResult<String> {
    let first: char = one_of(|c: char| c.is_ascii_alphabetic() || c == '_').parse_next(input)?;
    let rest: &str =
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)?;
    Ok(format!("{}{}", first, rest))
}

fn radix_prefix(input: &mut &str) -> ModalResult<u32> {
    alt((
        alt(("0x", "0X")).value(16),
        alt(("0o", "0O")).value(8),
        alt(("0b", "0B")).value(2),
    ))
    .parse_next(input)
}

fn integer(negative: bool, digits: &str, radix: u32) -> ModalResult<Value> {
    let magnitude = u64::from_str_radix(digits, radix).map_err(|_| backtrack())?;
    if negative {
        i64::try_from(-i128::from(magnitude))
            .map(Value::Int)
            .map_err(|_| backtrack())
    } else {
        Ok(i64::try_from(magnitude)
            .map(Value::Int)
            .unwrap_or(Value::Uint(magnitude)))
    }
}

fn number(input: &mut &str) -> ModalResult<Value> {
    let negative = opt(one_of(['+', '-'])).parse_next(input)? == Some('-');

    if let Some(radix) = opt(radix_prefix).parse_next(input)? {
        let digits: &str = take_while(1.., move |c: char| c.is_digit(radix)).parse_next(input)?;
        return integer(negative, digits, radix);
    }

    let exponent = (one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1);
    let text: &str = (digit1, opt(('.', digit1)), opt(exponent))
        .take()
        .parse_next(input)?;

    if text.contains(['.', 'e', 'E']) {
        let magnitude: f64 = text.parse().map_err(|_| backtrack())?;
        Ok(Value::Float(if negative { -magnitude } else { magnitude }))
    } else {
        integer(negative, text, 10)
    }
}

fn quoted(input: &mut &str) -> ModalResult<String> {
    let quote: char = one_of(['"', '\'']).parse_next(input)?;
    let mut text = String::new();
    loop {
        let c: char = any.parse_next(input)?;
        if c == quote {
            return Ok(text);
        }
        if c == '\\' {
            let escaped: char = any.parse_next(input)?;
            text.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
        } else {
            text.push(c);
        }
    }
}

fn bytes(input: &mut &str) -> ModalResult<Value> {
    let text = preceded('b', quoted).parse_next(input)?;
    Ok(Value::Bytes(text.into_bytes()))
}

fn color(input: &mut &str) -> ModalResult<Value> {
    let digits: &str =
        preceded('#', take_while(6, |c: char| c.is_ascii_hexdigit())).parse_next(input)?;
    hex_triplet(digits).map(Value::Rgb).ok_or_else(backtrack)
}

fn keyword(input: &mut &str) -> ModalResult<Value> {
    match ident.parse_next(input)?.as_str() {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        "null" | "nil" => Ok(Value::Null),
        _ => Err(backtrack()),
    }
}

fn array(input: &mut &str) -> ModalResult<Value> {
    let items: Vec<Value> = delimited(
        ('[', multispace0),
        terminated(separated(0.., ws(value), ws(',')), opt(ws(','))),
        (multispace0, ']'),
    )
    .parse_next(input)?;
    Ok(Value::Array(items))
}

fn map_entry(input: &mut &str) -> ModalResult<(String, Value)> {
    let key = ws(alt((quoted, ident))).parse_next(input)?;
    ':'.parse_next(input)?;
    let item = ws(value).parse_next(input)?;
    Ok((key, item))
}

fn map(input: &mut &str) -> ModalResult<Value> {
    let entries: Vec<(String, Value)> = delimited(
        ('{', multispace0),
        terminated(separated(0.., map_entry, ws(',')), opt(ws(','))),
        (multispace0, '}'),
    )
    .parse_next(input)?;
    Ok(Value::Map(entries.into_iter().collect()))
}

fn value(input: &mut &str) -> ModalResult<Value> {
    alt((
        array,
        map,
        quoted.map(Value::String),
        bytes,
        color,
        keyword,
        number,
    ))
    .parse_next(input)
}

fn nesting_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in text.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

// ============ Public API ============

pub fn parse(text: &str) -> Result<Value, LiteralError> {
    let depth = nesting_depth(text);
    if depth > MAX_DEPTH {
        return Err(LiteralError::TooDeep {
            depth,
            limit: MAX_DEPTH,
        });
    }

    let mut input = text.trim();
    let parsed = value
        .parse_next(&mut input)
        .map_err(|e| LiteralError::Syntax(format!("{:?}", e)))?;

    let remaining = input.trim();
    if remaining.is_empty() {
        Ok(parsed)
    } else {
        Err(LiteralError::TrailingInput(remaining.to_string()))
    }
}

/// Like [`parse`], but never fails: text that is not a literal is returned verbatim.
pub fn evaluate(text: &str) -> Value {
    match parse(text) {
        Ok(value) => value,
        Err(e) => {
            log::trace!("keeping {:?} as text: {}", text, e);
            Value::String(text.to_string())
        }
    }
}
