//! Declaration naming
//!
//! Names follow the json-schema-to-typescript conventions so the generated
//! file matches what downstream tooling expects.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

/// Prefix marking generated declarations as interfaces
pub const INTERFACE_PREFIX: &str = "I";

static LEADING_NON_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^\s*[^a-zA-Z_$])|([^a-zA-Z_$\d])").unwrap());
static LEADING_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^_[a-z]").unwrap());
static INNER_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_[a-z]").unwrap());
static DIGITS_THEN_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d$]+[a-zA-Z]").unwrap());
static SPACE_THEN_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+[a-zA-Z]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s").unwrap());

/// Name a schema node `I{key name | title | $id}`.
///
/// Returns `None` when the node has none of them, leaving the name to the
/// compiler.
pub fn interface_name(schema: &Value, key_name: Option<&str>) -> Option<String> {
    let name = key_name
        .or_else(|| schema.get("title").and_then(Value::as_str))
        .or_else(|| schema.get("$id").and_then(Value::as_str))?;
    Some(format!("{INTERFACE_PREFIX}{name}"))
}

/// Turn an arbitrary string into a PascalCase TypeScript identifier.
///
/// Characters that cannot appear in an identifier split words; a letter
/// following a run of digits is upper-cased (`A11y` becomes `A11Y`).
pub fn to_safe_string(input: &str) -> String {
    let s = LEADING_NON_IDENT.replace_all(input, " ");
    let s = LEADING_UNDERSCORE.replace_all(&s, |c: &Captures| c[0].to_uppercase());
    let s = INNER_UNDERSCORE.replace_all(&s, |c: &Captures| c[0][1..].to_uppercase());
    let s = DIGITS_THEN_LETTER.replace_all(&s, |c: &Captures| c[0].to_uppercase());
    let s = SPACE_THEN_LETTER.replace_all(&s, |c: &Captures| c[0].trim().to_uppercase());
    let s = WHITESPACE.replace_all(&s, "");
    upper_first(&s)
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `name` can be used as a property name without quoting
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
