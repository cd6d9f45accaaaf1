//! Literal validation and escaping.

use criteria::{CompileError, Result, Rule, ValueType};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::namespace::NamespaceResolver;

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?$").expect("valid regex"));

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:NOW|TODAY|\d{4}-\d{2}-\d{2}(?:T\d{2}:\d{2}(?::\d{2}(?:\.\d{1,9})?)?(?:Z|[+-]\d{2}:?\d{2})?)?)$",
    )
    .expect("valid regex")
});

/// A qualified field: `name` or `prefix:name`.
static FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][\w.-]*(?::[A-Za-z_][\w.-]*)?$").expect("valid regex")
});

/// Characters with a meaning in the target language.
const SPECIAL: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\', '/',
];

/// Wraps `value` in double quotes, escaping quotes and backslashes.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Escapes every special character and whitespace so `value` reads as a
/// single term. Used where quoting would disable wildcards.
pub fn escape_term(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if SPECIAL.contains(&c) || c.is_whitespace() {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Resolves the rule's field through `resolver`.
///
/// The resolved identifier is written unquoted, so it must be a plain
/// `name` or `prefix:name`.
pub fn field_ref(resolver: &dyn NamespaceResolver, rule: &Rule) -> Result<String> {
    let field = resolver
        .qualify(&rule.field)
        .ok_or_else(|| CompileError::malformed(rule, format!("cannot resolve field '{}'", rule.field)))?;
    if !FIELD.is_match(&field) {
        return Err(CompileError::malformed(
            rule,
            format!("'{field}' is not a valid field identifier"),
        ));
    }
    Ok(field)
}

/// Returns the literal at `index`, failing if it is missing or an embedded query.
pub fn literal_at(rule: &Rule, index: usize) -> Result<&str> {
    rule.literal(index)
        .ok_or_else(|| CompileError::malformed(rule, format!("value {} must be a literal", index + 1)))
}

/// Parses a boolean literal, ignoring case.
pub fn parse_bool(rule: &Rule, value: &str) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(CompileError::malformed(
            rule,
            format!("'{value}' is not a boolean literal"),
        ))
    }
}

/// Validates a numeric or date literal and returns it in target form.
///
/// Numbers are written bare, dates quoted.
pub fn scalar(rule: &Rule, value: &str) -> Result<String> {
    let value = value.trim();
    match rule.value_type {
        ValueType::Numeric if NUMBER.is_match(value) => Ok(value.to_string()),
        ValueType::Numeric => Err(CompileError::malformed(
            rule,
            format!("'{value}' is not a number"),
        )),
        ValueType::Date if DATE.is_match(value) => Ok(quote(value)),
        ValueType::Date => Err(CompileError::malformed(
            rule,
            format!("'{value}' is not an ISO-8601 date"),
        )),
        _ => Ok(quote(value)),
    }
}
