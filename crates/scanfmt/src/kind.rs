//! Value categories understood by the matcher.

use scanfmt_literal::{hex_triplet, parse, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Uint,
    Float,
    Byte,
    String,
    Map,
    Array,
    Any,
    RgbHex,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown kind '{0}'")]
pub struct UnknownKind(pub String);

#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot coerce {text:?} to {kind}")]
pub struct CoerceError {
    pub kind: Kind,
    pub text: String,
}

impl Kind {
    pub const ALL: [Kind; 11] = [
        Kind::Null,
        Kind::Bool,
        Kind::Int,
        Kind::Uint,
        Kind::Float,
        Kind::Byte,
        Kind::String,
        Kind::Map,
        Kind::Array,
        Kind::Any,
        Kind::RgbHex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "Null",
            Kind::Bool => "Bool",
            Kind::Int => "Int",
            Kind::Uint => "Uint",
            Kind::Float => "Float",
            Kind::Byte => "Byte",
            Kind::String => "String",
            Kind::Map => "Map",
            Kind::Array => "Array",
            Kind::Any => "Any",
            Kind::RgbHex => "RGBHex",
        }
    }

    /// Printf-style symbol used when rendering a normalized format string.
    pub fn format_symbol(self) -> &'static str {
        match self {
            Kind::Bool => "%t",
            Kind::Int | Kind::Uint => "%d",
            Kind::Float => "%f",
            Kind::String => "%s",
            Kind::RgbHex => "%02x%02x%02x",
            Kind::Null | Kind::Byte | Kind::Map | Kind::Array | Kind::Any => "%v",
        }
    }

    /// Infers the kind of a decoded value. Never yields `Any`.
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::Bytes(_) => Kind::Byte,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Map(_) => Kind::Map,
            Value::Rgb(_) => Kind::RgbHex,
        }
    }

    /// Whether a value of kind `inferred` satisfies this expected kind.
    /// `Any` accepts everything.
    pub fn accepts(self, inferred: Kind) -> bool {
        self == Kind::Any || self == inferred
    }

    pub fn zero_value(self) -> Value {
        match self {
            Kind::Null | Kind::Any => Value::Null,
            Kind::Bool => Value::Bool(false),
            Kind::Int => Value::Int(0),
            Kind::Uint => Value::Uint(0),
            Kind::Float => Value::Float(0.0),
            Kind::Byte => Value::Bytes(Vec::new()),
            Kind::String => Value::String(String::new()),
            Kind::Map => Value::Map(BTreeMap::new()),
            Kind::Array => Value::Array(Vec::new()),
            Kind::RgbHex => Value::Rgb([0, 0, 0]),
        }
    }

    /// Converts raw text into a value of this kind.
    pub fn coerce(self, text: &str) -> Result<Value, CoerceError> {
        let fail = || CoerceError {
            kind: self,
            text: text.to_string(),
        };
        let trimmed = text.trim();

        match self {
            Kind::String => Ok(Value::String(text.to_string())),
            Kind::Byte => Ok(Value::Bytes(text.as_bytes().to_vec())),
            Kind::Int => parse_signed(trimmed).map(Value::Int).ok_or_else(fail),
            Kind::Uint => parse_unsigned(trimmed).map(Value::Uint).ok_or_else(fail),
            Kind::Float => trimmed.parse().map(Value::Float).map_err(|_| fail()),
            Kind::Bool => parse_bool(trimmed).map(Value::Bool).ok_or_else(fail),
            Kind::RgbHex => hex_triplet(trimmed).map(Value::Rgb).ok_or_else(fail),
            Kind::Null => match trimmed {
                "" | "null" | "nil" => Ok(Value::Null),
                _ => Err(fail()),
            },
            Kind::Array | Kind::Map => match parse(trimmed) {
                Ok(value) if Kind::of(&value) == self => Ok(value),
                _ => Err(fail()),
            },
            Kind::Any => Ok(scanfmt_literal::evaluate(text)),
        }
    }
}

fn split_radix(text: &str) -> (&str, u32) {
    let lower = text.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (&text[2..], 16),
        Some("0o") => (&text[2..], 8),
        Some("0b") => (&text[2..], 2),
        _ => (text, 10),
    }
}

fn parse_unsigned(text: &str) -> Option<u64> {
    let text = text.strip_prefix('+').unwrap_or(text);
    let (digits, radix) = split_radix(text);
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

fn parse_signed(text: &str) -> Option<i64> {
    match text.strip_prefix('-') {
        Some(rest) => {
            let magnitude = parse_unsigned(rest)?;
            i64::try_from(-i128::from(magnitude)).ok()
        }
        None => i64::try_from(parse_unsigned(text)?).ok(),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "Float32" {
            return Ok(Kind::Float);
        }
        Kind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for kind in Kind::ALL {
            assert_eq!(kind.name().parse::<Kind>().unwrap(), kind);
        }
        assert_eq!("Float32".parse::<Kind>().unwrap(), Kind::Float);
        assert_eq!("RGBHex".parse::<Kind>().unwrap(), Kind::RgbHex);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = Kind::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Kind::ALL.len());
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(
            "Integer".parse::<Kind>(),
            Err(UnknownKind("Integer".to_string()))
        );
        assert!("int".parse::<Kind>().is_err());
    }

    #[test]
    fn test_format_symbols() {
        assert_eq!(Kind::Int.format_symbol(), "%d");
        assert_eq!(Kind::Float.format_symbol(), "%f");
        assert_eq!(Kind::String.format_symbol(), "%s");
        assert_eq!(Kind::Bool.format_symbol(), "%t");
        assert_eq!(Kind::Any.format_symbol(), "%v");
        assert_eq!(Kind::RgbHex.format_symbol(), "%02x%02x%02x");
    }

    #[test]
    fn test_inference() {
        assert_eq!(Kind::of(&Value::Int(3)), Kind::Int);
        assert_eq!(Kind::of(&Value::Uint(3)), Kind::Uint);
        assert_eq!(Kind::of(&Value::Float(0.5)), Kind::Float);
        assert_eq!(Kind::of(&Value::Bytes(vec![1])), Kind::Byte);
        assert_eq!(Kind::of(&Value::Array(vec![])), Kind::Array);
        assert_eq!(Kind::of(&Value::Map(BTreeMap::new())), Kind::Map);
        assert_eq!(Kind::of(&Value::String("x".into())), Kind::String);
        assert_eq!(Kind::of(&Value::Rgb([0, 0, 0])), Kind::RgbHex);
        assert_eq!(Kind::of(&Value::Null), Kind::Null);
    }

    #[test]
    fn test_any_accepts_everything() {
        for kind in Kind::ALL {
            assert!(Kind::Any.accepts(kind));
        }
        assert!(Kind::Int.accepts(Kind::Int));
        assert!(!Kind::Int.accepts(Kind::Float));
        assert!(!Kind::Int.accepts(Kind::Any));
    }

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(Kind::Int.coerce("42").unwrap(), Value::Int(42));
        assert_eq!(Kind::Int.coerce("-0x10").unwrap(), Value::Int(-16));
        assert_eq!(Kind::Int.coerce("0b11").unwrap(), Value::Int(3));
        assert_eq!(Kind::Uint.coerce("0o17").unwrap(), Value::Uint(15));
        assert_eq!(Kind::Float.coerce("3").unwrap(), Value::Float(3.0));
        assert!(Kind::Int.coerce("3.5").is_err());
        assert!(Kind::Int.coerce("--3").is_err());
        assert!(Kind::Uint.coerce("-1").is_err());
        assert!(Kind::Int.coerce("").is_err());
    }

    #[test]
    fn test_coerce_bool() {
        for text in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(Kind::Bool.coerce(text).unwrap(), Value::Bool(true));
        }
        for text in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(Kind::Bool.coerce(text).unwrap(), Value::Bool(false));
        }
        let err = Kind::Bool.coerce("yes").unwrap_err();
        assert_eq!(err.to_string(), r#"cannot coerce "yes" to Bool"#);
    }

    #[test]
    fn test_coerce_other_kinds() {
        assert_eq!(
            Kind::String.coerce(" a b ").unwrap(),
            Value::String(" a b ".to_string())
        );
        assert_eq!(Kind::Byte.coerce("hi").unwrap(), Value::Bytes(b"hi".to_vec()));
        assert_eq!(Kind::RgbHex.coerce("ff0000").unwrap(), Value::Rgb([255, 0, 0]));
        assert_eq!(Kind::Null.coerce("nil").unwrap(), Value::Null);
        assert_eq!(
            Kind::Array.coerce("[1]").unwrap(),
            Value::Array(vec![Value::Int(1)])
        );
        assert!(Kind::Array.coerce("{}").is_err());
        assert!(Kind::Map.coerce("[1]").is_err());
        assert_eq!(Kind::Any.coerce("2.5").unwrap(), Value::Float(2.5));
        assert_eq!(Kind::Any.coerce("bob").unwrap(), Value::String("bob".into()));
    }

    #[test]
    fn test_zero_values_have_their_kind() {
        for kind in Kind::ALL {
            let zero = kind.zero_value();
            assert!(kind.accepts(Kind::of(&zero)), "{} -> {:?}", kind, zero);
        }
    }
}
