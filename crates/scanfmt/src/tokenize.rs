//! Splits format strings and input lines into positionally aligned tokens.

fn is_separator(c: char) -> bool {
    c == ' ' || c == ',' || c == ':'
}

/// Splits `text` on spaces, commas and colons that sit outside brackets,
/// braces and quotes. Empty and whitespace-only tokens are dropped.
///
/// Unbalanced closing brackets never push the depth below zero, and an
/// unterminated quote keeps the rest of the text in one token.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '{' | '[' => depth += 1,
            '}' | ']' => depth = depth.saturating_sub(1),
            '\'' | '"' => in_string = !in_string,
            _ => {}
        }

        if depth == 0 && !in_string && is_separator(c) {
            push_token(&mut tokens, &text[start..i]);
            start = i + c.len_utf8();
        }
    }
    push_token(&mut tokens, &text[start..]);

    tokens
}

fn push_token<'a>(tokens: &mut Vec<&'a str>, token: &'a str) {
    if !token.trim().is_empty() {
        tokens.push(token);
    }
}
