//! Quoting of recipe values for the generated shell.
//!
//! Two flavours:
//!
//! - [`literal`]: single-quoted via `shlex`, nothing inside is interpreted.
//!   Used for modes, owners, service names, patterns, lines and log text.
//! - [`expanding`]: double-quoted with `$NAME` / `${NAME}` references kept so
//!   paths can point at `$INSTALL_ROOT` or `$ASSET_DIR`. Every other `$`,
//!   backticks, `"` and `\` are escaped, which rules out command substitution.

use std::borrow::Cow;

use thiserror::Error;

/// Why a value could not be quoted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct QuoteError(pub String);

/// Quote a value so the shell sees it verbatim.
pub fn literal(value: &str) -> Result<Cow<'_, str>, QuoteError> {
    shlex::try_quote(value).map_err(|e| QuoteError(format!("cannot quote {:?}: {}", value, e)))
}

/// Quote a value inside double quotes, keeping variable references.
pub fn expanding(value: &str) -> Result<String, QuoteError> {
    if value.contains('\0') {
        return Err(QuoteError(format!("cannot quote {:?}: contains a NUL byte", value)));
    }

    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' | '"' | '`' => {
                out.push('\\');
                out.push(c);
            }
            '$' => match variable_ref_len(&chars[i + 1..]) {
                Some(len) => {
                    out.push('$');
                    out.extend(&chars[i + 1..i + 1 + len]);
                    i += len;
                }
                None => out.push_str("\\$"),
            },
            _ => out.push(c),
        }
        i += 1;
    }

    out.push('"');
    Ok(out)
}

/// Length of a `NAME` or `{NAME}` reference following a `$`, if any.
fn variable_ref_len(rest: &[char]) -> Option<usize> {
    match rest.first() {
        Some('{') => {
            let name_len = ident_len(&rest[1..]);
            (name_len > 0 && rest.get(1 + name_len) == Some(&'}')).then_some(name_len + 2)
        }
        Some(_) => Some(ident_len(rest)).filter(|len| *len > 0),
        None => None,
    }
}

fn ident_len(chars: &[char]) -> usize {
    match chars.first() {
        Some(c) if c.is_ascii_alphabetic() || *c == '_' => chars
            .iter()
            .take_while(|c| c.is_ascii_alphanumeric() || **c == '_')
            .count(),
        _ => 0,
    }
}

/// Whether `name` can be used as a shell variable name
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty() && ident_len(&name.chars().collect::<Vec<_>>()) == name.chars().count()
}
