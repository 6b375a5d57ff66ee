//! Escaping of schema-provided text embedded in generated Python source.

use once_cell::sync::Lazy;
use regex::Regex;

static SMART_PUNCTUATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\u{2018}\u{2019}\u{201C}\u{201D}]").expect("punctuation regex is valid")
});

/// Makes free text safe inside a `""" ... """` docstring.
///
/// Smart quotes become plain quotes, backslashes are escaped, and any run of
/// double quotes that could close the docstring early is escaped.
///
/// # Examples
/// ```
/// use clientgen::generation::sanitizers::sanitize_docstring;
///
/// assert_eq!(sanitize_docstring("  Returns \u{201C}all\u{201D} users "), "Returns \"all\" users");
/// assert_eq!(sanitize_docstring(r#"say """hi""""#), r#"say \"\"\"hi\"\"\""#);
/// ```
pub fn sanitize_docstring(input: &str) -> String {
    let plain = SMART_PUNCTUATION_RE.replace_all(input.trim(), |caps: &regex::Captures| {
        match &caps[0] {
            "\u{2018}" | "\u{2019}" => "'",
            _ => "\"",
        }
    });

    let escaped = plain.replace('\\', "\\\\");
    if escaped.contains("\"\"\"") || escaped.ends_with('"') {
        escaped.replace('"', "\\\"")
    } else {
        escaped
    }
}

/// Renders `input` as a single-quoted Python string literal.
///
/// ```
/// use clientgen::generation::sanitizers::python_string_literal;
///
/// assert_eq!(python_string_literal("/users/{id}"), "'/users/{id}'");
/// assert_eq!(python_string_literal("it's"), r"'it\'s'");
/// ```
pub fn python_string_literal(input: &str) -> String {
    let mut literal = String::with_capacity(input.len() + 2);
    literal.push('\'');
    for ch in input.chars() {
        match ch {
            '\\' => literal.push_str("\\\\"),
            '\'' => literal.push_str("\\'"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            other => literal.push(other),
        }
    }
    literal.push('\'');
    literal
}

/// Splits a description into trimmed lines for `#` comments.
pub fn comment_lines(description: &str) -> Vec<String> {
    description
        .lines()
        .map(|line| line.trim().to_string())
        .collect()
}
