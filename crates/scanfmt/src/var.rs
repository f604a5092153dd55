use crate::kind::{CoerceError, Kind};
use scanfmt_literal::Value;
use std::fmt;

/// A named placeholder from a format string and the value it captured.
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    name: String,
    position: usize,
    expected_kind: Kind,
    value: Option<Value>,
}

impl Var {
    pub fn new(name: impl Into<String>, position: usize, expected_kind: Kind) -> Self {
        Self {
            name: name.into(),
            position,
            expected_kind,
            value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of this placeholder among the placeholders of its format string.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn expected_kind(&self) -> Kind {
        self.expected_kind
    }

    pub fn format_symbol(&self) -> &'static str {
        self.expected_kind.format_symbol()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub(crate) fn bind(&mut self, value: Option<Value>) {
        self.value = value;
    }

    /// The captured value converted to the expected kind.
    ///
    /// Values that already have an acceptable kind are returned as-is. Others
    /// are converted from their text form, so `${n:Float}` bound to `3` yields
    /// `3.0`. A variable that captured nothing yields the kind's zero value.
    /// `Array` variables already hold the list's first element, which is kept.
    pub fn coerced(&self) -> Result<Value, CoerceError> {
        let Some(value) = &self.value else {
            return Ok(self.expected_kind.zero_value());
        };
        if self.expected_kind == Kind::Array || self.expected_kind.accepts(Kind::of(value)) {
            return Ok(value.clone());
        }
        match value {
            Value::String(text) => self.expected_kind.coerce(text),
            Value::Bytes(bytes) => self.expected_kind.coerce(&String::from_utf8_lossy(bytes)),
            other => self.expected_kind.coerce(&other.to_string()),
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} ({}): {}", self.name, self.expected_kind, value),
            None => write!(f, "{} ({}): <none>", self.name, self.expected_kind),
        }
    }
}
