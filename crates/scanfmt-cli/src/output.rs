use scanfmt::{MatchError, MatchResult, TemplateVars, Value};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

pub struct RenderOptions {
    pub template: Option<String>,
    pub compact: bool,
    pub coerce: bool,
}

pub struct Output {
    stderr: StandardStream,
    options: RenderOptions,
}

impl Output {
    pub fn new(color: bool, options: RenderOptions) -> Self {
        let color_choice = if color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stderr: StandardStream::stderr(color_choice),
            options,
        }
    }

    fn set_color(&mut self, color: Color) {
        let _ = self.stderr.set_color(ColorSpec::new().set_fg(Some(color)));
    }

    fn set_dim(&mut self) {
        let _ = self.stderr.set_color(ColorSpec::new().set_dimmed(true));
    }

    fn reset(&mut self) {
        let _ = self.stderr.reset();
    }

    /// The text printed on stdout for one match.
    pub fn render(&self, result: &MatchResult) -> String {
        let values = binding_values(result, self.options.coerce);
        match &self.options.template {
            Some(template) => {
                let mut vars = TemplateVars::new();
                for (name, value) in &values {
                    vars.set(name.as_str(), value.to_string());
                }
                vars.apply(template)
            }
            None => {
                let json = JsonValue::Object(
                    values
                        .iter()
                        .map(|(name, value)| (name.clone(), to_json(value)))
                        .collect(),
                );
                if self.options.compact {
                    json.to_string()
                } else {
                    // Serializing a `serde_json::Value` cannot fail.
                    serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
                }
            }
        }
    }

    pub fn print_match<W: Write>(&self, out: &mut W, result: &MatchResult) -> io::Result<()> {
        writeln!(out, "{}", self.render(result))
    }

    pub fn print_diagnostics(&mut self, result: &MatchResult) {
        let color = if result.score() >= 1.0 {
            Color::Green
        } else if result.score() > 0.0 {
            Color::Yellow
        } else {
            Color::Red
        };
        self.set_color(color);
        let _ = write!(self.stderr, "score {:.2}", result.score());
        self.reset();
        let _ = writeln!(self.stderr, "  {}", result.normalized());

        self.set_dim();
        for var in result.vars() {
            let _ = writeln!(self.stderr, "  {}", var);
        }
        self.reset();
    }

    pub fn print_error(&mut self, line: &str, error: &MatchError) {
        self.set_color(Color::Red);
        let _ = write!(self.stderr, "error");
        self.reset();
        let _ = writeln!(self.stderr, ": {:?}: {}", line, error);
    }
}

fn binding_values(result: &MatchResult, coerce: bool) -> BTreeMap<String, Value> {
    if !coerce {
        return result.bindings();
    }
    result
        .vars()
        .map(|var| {
            let value = var.coerced().unwrap_or_else(|e| {
                log::warn!("{}: {}", var.name(), e);
                var.value().cloned().unwrap_or(Value::Null)
            });
            (var.name().to_string(), value)
        })
        .collect()
}

pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(n) => JsonValue::from(*n),
        Value::Uint(n) => JsonValue::from(*n),
        Value::Float(n) => serde_json::Number::from_f64(*n).map_or(JsonValue::Null, JsonValue::Number),
        Value::Bytes(bytes) => JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect()),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Array(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        Value::Map(entries) => JsonValue::Object(
            entries
                .iter()
                .map(|(key, item)| (key.clone(), to_json(item)))
                .collect(),
        ),
        Value::Rgb(_) => JsonValue::String(value.to_string()),
    }
}
