use regex::Regex;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::LazyLock;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("tag pattern is valid"));

/// Values substituted into `{{ name }}` tags of an output template.
#[derive(Debug, Default)]
pub struct TemplateVars {
    vars: BTreeMap<String, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Replaces every known tag in `text`. Unknown tags are left as written.
    pub fn apply(&self, text: &str) -> String {
        TAG.replace_all(text, |caps: &regex::Captures| {
            match self.vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
    }

    /// Renders `text` into `writer`, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, writer: &mut W, text: &str) -> io::Result<usize> {
        let rendered = self.apply(text);
        writer.write_all(rendered.as_bytes())?;
        Ok(rendered.len())
    }
}
