//! Recognizes `${name}` and `${name:Kind}` tokens.

use crate::kind::{Kind, UnknownKind};
use crate::var::Var;

const OPEN: &str = "${";
const CLOSE: char = '}';

pub fn is_placeholder(token: &str) -> bool {
    token.starts_with(OPEN) && token.ends_with(CLOSE)
}

/// Splits a placeholder token into its name and declared kind name, if any.
pub(crate) fn split(token: &str) -> Option<(&str, Option<&str>)> {
    let inner = token.strip_prefix(OPEN)?.strip_suffix(CLOSE)?;
    Some(match inner.split_once(':') {
        Some((name, kind)) => (name.trim(), Some(kind.trim())),
        None => (inner.trim(), None),
    })
}

/// Builds the variable for a placeholder token, rejecting unknown kind names.
///
/// Returns `None` if `token` is not a placeholder.
pub fn try_extract_var(token: &str, position: usize) -> Option<Result<Var, UnknownKind>> {
    let (name, kind) = split(token)?;
    let kind = match kind {
        Some(kind_name) => kind_name.parse::<Kind>(),
        None => Ok(Kind::Any),
    };
    Some(kind.map(|kind| Var::new(name, position, kind)))
}

/// Builds the variable for a placeholder token. Unknown kind names fall back
/// to `Null`.
pub fn extract_var(token: &str, position: usize) -> Option<Var> {
    let (name, kind) = split(token)?;
    let kind = match kind {
        Some(kind_name) => kind_name.parse::<Kind>().unwrap_or_else(|e| {
            log::warn!("placeholder '{}': {}, using Null", name, e);
            Kind::Null
        }),
        None => Kind::Any,
    };
    Some(Var::new(name, position, kind))
}
